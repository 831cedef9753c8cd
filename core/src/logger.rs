use chrono::{Local, Utc};
use serde_json::json;
use std::sync::{Arc, Mutex};

/// Environment switch that silences the JSONL stream (`VERIGEN_LOG=quiet`).
pub const LOG_ENV: &str = "VERIGEN_LOG";

#[derive(Clone, Debug)]
pub struct Logger {
    rid: u64,
    quiet: bool,
    // Optional buffer for capturing records during tests
    output: Option<Arc<Mutex<String>>>,
}

impl Logger {
    /// Creates a new `Logger` that writes to stdout/stderr.
    ///
    /// # Panics
    ///
    /// Panics if `rid` is zero.
    #[must_use]
    pub fn new(rid: u64) -> Self {
        assert!(rid > 0, "Logger rid must be non-zero");
        let quiet = std::env::var(LOG_ENV)
            .map(|v| v.eq_ignore_ascii_case("quiet"))
            .unwrap_or(false);
        Self { rid, quiet, output: None }
    }

    /// Creates a logger that captures every record into `buffer`.
    #[must_use]
    pub fn capturing(rid: u64, buffer: Arc<Mutex<String>>) -> Self {
        assert!(rid > 0, "Logger rid must be non-zero");
        Self { rid, quiet: false, output: Some(buffer) }
    }

    /// Overrides the environment switch; captured loggers are unaffected.
    #[must_use]
    pub fn with_quiet(mut self, quiet: bool) -> Self {
        self.quiet = quiet;
        self
    }

    pub fn info(&self, subsystem: &str, action: &str, message: &str) {
        self.emit("info", subsystem, action, message);
    }

    pub fn error(&self, subsystem: &str, action: &str, message: &str) {
        self.emit("error", subsystem, action, message);
    }

    fn emit(&self, level: &str, subsystem: &str, action: &str, message: &str) {
        let rec = json!({
            "ts": Utc::now().to_rfc3339(),
            "level": level,
            "rid": self.rid,
            "subsystem": subsystem,
            "action": action,
            "msg": message,
        });

        if let Some(buf) = &self.output {
            // A poisoned buffer only loses test output.
            if let Ok(mut writer) = buf.lock() {
                writer.push_str(&rec.to_string());
                writer.push('\n');
            }
            return;
        }
        if self.quiet {
            return;
        }
        if level == "error" {
            eprintln!("{rec}");
        } else {
            println!("{rec}");
        }
    }
}

/// Request id: wall-clock millis mixed with the pid, never zero.
pub fn generate_rid() -> u64 {
    ((Local::now().timestamp_millis() as u64) ^ (std::process::id() as u64)).max(1)
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn captured_records_are_jsonl() {
        let buf = Arc::new(Mutex::new(String::new()));
        let logger = Logger::capturing(7, buf.clone());
        logger.info("extract", "scan", "found 2 block(s)");
        logger.error("invoke", "send", "timeout");

        let text = buf.lock().unwrap().clone();
        let lines: Vec<&str> = text.lines().collect();
        assert_eq!(lines.len(), 2);

        let first: serde_json::Value = serde_json::from_str(lines[0]).unwrap();
        assert_eq!(first["rid"], 7);
        assert_eq!(first["level"], "info");
        assert_eq!(first["subsystem"], "extract");
        assert_eq!(first["msg"], "found 2 block(s)");

        let second: serde_json::Value = serde_json::from_str(lines[1]).unwrap();
        assert_eq!(second["level"], "error");
    }

    #[test]
    fn rid_is_non_zero() {
        assert!(generate_rid() > 0);
    }
}
