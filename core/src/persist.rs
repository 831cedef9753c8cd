use crate::error::{ErrorCode, GenError, Result};
use crate::extract::CodeBlocks;
use std::fs;
use std::path::{Path, PathBuf};

/// Writes the primary block to `out_dir/file_name`, creating `out_dir` if
/// needed and overwriting any previous file.
pub fn save_code(out_dir: &Path, file_name: &str, blocks: &CodeBlocks) -> Result<PathBuf> {
    if file_name.is_empty() {
        return Err(GenError::Validation {
            code: ErrorCode::ConfigInvalid,
            message: "Output file name must not be empty".to_string(),
            context: out_dir.display().to_string(),
        });
    }

    fs::create_dir_all(out_dir).map_err(|e| GenError::File {
        code: ErrorCode::FileWriteFailed,
        message: format!("Failed to create output directory: {}", e),
        path: out_dir.to_path_buf(),
    })?;

    let file_path = out_dir.join(file_name);
    fs::write(&file_path, blocks.primary()).map_err(|e| GenError::File {
        code: ErrorCode::FileWriteFailed,
        message: format!("Failed to write generated code: {}", e),
        path: file_path.clone(),
    })?;

    Ok(file_path)
}

/// Copies a persisted design to a user-chosen destination ("download").
pub fn export_copy(src: &Path, dest: &Path) -> Result<()> {
    if !src.is_file() {
        return Err(GenError::File {
            code: ErrorCode::FileReadFailed,
            message: "Nothing to export yet".to_string(),
            path: src.to_path_buf(),
        });
    }
    if let Some(parent) = dest.parent().filter(|p| !p.as_os_str().is_empty()) {
        fs::create_dir_all(parent).map_err(|e| GenError::File {
            code: ErrorCode::FileWriteFailed,
            message: format!("Failed to create destination directory: {}", e),
            path: parent.to_path_buf(),
        })?;
    }
    fs::copy(src, dest).map_err(|e| GenError::File {
        code: ErrorCode::FileWriteFailed,
        message: format!("Failed to copy design: {}", e),
        path: dest.to_path_buf(),
    })?;
    Ok(())
}
