use crate::error::{ErrorCode, GenError, Result};
use crate::invoke::ModelInvoker;
use chrono::Local;
use std::fs;
use std::path::{Path, PathBuf};
use std::sync::Mutex;

/// Scripted stand-in for the remote model.
///
/// Replies are handed out in order; the last one repeats once the script
/// runs dry. An empty script answers with an empty reply.
pub struct FakeModel {
    replies: Mutex<Vec<Result<String>>>,
    prompts: Mutex<Vec<String>>,
}

impl FakeModel {
    pub fn new(replies: Vec<Result<String>>) -> Self {
        Self { replies: Mutex::new(replies), prompts: Mutex::new(Vec::new()) }
    }

    pub fn always(reply: &str) -> Self {
        Self::new(vec![Ok(reply.to_string())])
    }

    pub fn call_count(&self) -> usize {
        self.prompts.lock().map(|p| p.len()).unwrap_or(0)
    }

    pub fn prompts(&self) -> Vec<String> {
        self.prompts.lock().map(|p| p.clone()).unwrap_or_default()
    }
}

impl ModelInvoker for FakeModel {
    fn generate(&self, prompt: &str) -> Result<String> {
        if let Ok(mut prompts) = self.prompts.lock() {
            prompts.push(prompt.to_string());
        }
        let mut replies = self.replies.lock().map_err(|_| GenError::Upstream {
            code: ErrorCode::UpstreamRequestFailed,
            message: "fake model script poisoned".to_string(),
            context: "fake".to_string(),
        })?;
        match replies.len() {
            0 => Ok(String::new()),
            1 => replies[0].clone(),
            _ => replies.remove(0),
        }
    }
}

pub fn make_sandbox() -> Result<PathBuf> {
    let dir = std::env::temp_dir().join(format!(
        "verigen_gauntlet_{}_{}",
        Local::now().format("%Y%m%d_%H%M%S%f"),
        std::process::id()
    ));
    fs::create_dir_all(&dir).map_err(|e| GenError::File {
        code: ErrorCode::FileWriteFailed,
        message: format!("create sandbox failed: {e}"),
        path: dir.clone(),
    })?;
    Ok(dir)
}

pub fn cleanup(dir: &Path) -> Result<()> {
    fs::remove_dir_all(dir).map_err(|e| GenError::File {
        code: ErrorCode::FileWriteFailed,
        message: format!("remove sandbox failed: {e}"),
        path: dir.to_path_buf(),
    })
}

pub fn case_header(log: &mut String, name: &str) {
    logln(log, format!("\n— Testing: {} —", name));
}

pub fn logln<S: Into<String>>(buf: &mut String, s: S) {
    if !buf.is_empty() && !buf.ends_with('\n') {
        buf.push('\n');
    }
    buf.push_str(&s.into());
}
