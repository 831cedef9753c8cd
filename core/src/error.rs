use std::path::PathBuf;
use thiserror::Error;

pub type Result<T> = std::result::Result<T, GenError>;

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum ErrorCode {
    // --- Startup ---
    CredentialMissing,
    ConfigInvalid,

    // --- Input ---
    EmptyInput,
    BoundsExceeded,

    // --- Extraction ---
    NoCodeFound,

    // --- Remote model ---
    UpstreamRequestFailed,
    UpstreamStatus,
    UpstreamMalformed,

    // --- File I/O ---
    FileReadFailed,
    FileWriteFailed,
}

#[derive(Debug, Clone, Error)]
pub enum GenError {
    #[error("Credential Error: {message} (variable: {variable})")]
    Credential { code: ErrorCode, message: String, variable: String },

    #[error("Validation Error: {message} (context: {context})")]
    Validation { code: ErrorCode, message: String, context: String },

    #[error("Extraction Error: {message} (context: {context})")]
    Extraction { code: ErrorCode, message: String, context: String },

    #[error("Upstream Error: {message} (context: {context})")]
    Upstream { code: ErrorCode, message: String, context: String },

    #[error("File Error: {message} (path: {path:?})")]
    File { code: ErrorCode, message: String, path: PathBuf },
}

impl GenError {
    pub fn code(&self) -> ErrorCode {
        match self {
            GenError::Credential { code, .. }
            | GenError::Validation { code, .. }
            | GenError::Extraction { code, .. }
            | GenError::Upstream { code, .. }
            | GenError::File { code, .. } => *code,
        }
    }

    /// Short message suitable for an inline UI banner.
    pub fn user_message(&self) -> String {
        match self.code() {
            ErrorCode::CredentialMissing => {
                "GEMINI_API_KEY not found. Please create a `.env` file with your key.".to_string()
            }
            ErrorCode::EmptyInput => "Please enter a specification first.".to_string(),
            ErrorCode::NoCodeFound => "No Verilog code found. Try refining your spec.".to_string(),
            _ => format!("Error: {self}"),
        }
    }
}
