use crate::error::{ErrorCode, GenError, Result};
use std::path::PathBuf;

pub const API_KEY_ENV: &str = "GEMINI_API_KEY";
pub const DEFAULT_MODEL: &str = "gemini-2.5-flash";
pub const DEFAULT_ENDPOINT: &str = "https://generativelanguage.googleapis.com";
pub const DEFAULT_OUT_DIR: &str = "out";
pub const DEFAULT_FILE_NAME: &str = "design.v";
pub const MAX_SPEC_SIZE: usize = 100_000;

#[derive(Debug, Clone)]
pub struct Config {
    pub api_key: String,
    pub model: String,
    pub endpoint: String,
    /// Zero disables extended reasoning on the model side.
    pub thinking_budget: u32,
    pub out_dir: PathBuf,
    pub file_name: String,
}

impl Config {
    pub fn new(api_key: impl Into<String>) -> Self {
        Self {
            api_key: api_key.into(),
            model: DEFAULT_MODEL.to_string(),
            endpoint: DEFAULT_ENDPOINT.to_string(),
            thinking_budget: 0,
            out_dir: PathBuf::from(DEFAULT_OUT_DIR),
            file_name: DEFAULT_FILE_NAME.to_string(),
        }
    }

    /// Loads `.env` (if present) and reads the API credential.
    pub fn from_env() -> Result<Self> {
        dotenv::dotenv().ok();
        Self::from_lookup(|name| std::env::var(name).ok())
    }

    /// Builds a config from an arbitrary variable source.
    pub fn from_lookup<F>(lookup: F) -> Result<Self>
    where
        F: Fn(&str) -> Option<String>,
    {
        let key = lookup(API_KEY_ENV)
            .map(|v| v.trim().to_string())
            .filter(|v| !v.is_empty())
            .ok_or_else(|| GenError::Credential {
                code: ErrorCode::CredentialMissing,
                message: format!("{} not found", API_KEY_ENV),
                variable: API_KEY_ENV.to_string(),
            })?;
        let config = Self::new(key);
        config.validate()?;
        Ok(config)
    }

    pub fn with_out_dir(mut self, out_dir: impl Into<PathBuf>) -> Self {
        self.out_dir = out_dir.into();
        self
    }

    pub fn output_path(&self) -> PathBuf {
        self.out_dir.join(&self.file_name)
    }

    pub fn validate(&self) -> Result<()> {
        if self.api_key.trim().is_empty() {
            return Err(GenError::Credential {
                code: ErrorCode::CredentialMissing,
                message: "API key is empty".to_string(),
                variable: API_KEY_ENV.to_string(),
            });
        }
        if self.model.trim().is_empty() {
            return Err(invalid("model", &self.model, "must not be empty"));
        }
        if !self.endpoint.starts_with("http://") && !self.endpoint.starts_with("https://") {
            return Err(invalid("endpoint", &self.endpoint, "must be an http(s) URL"));
        }
        if self.file_name.is_empty() || self.file_name.contains(['/', '\\']) {
            return Err(invalid("file_name", &self.file_name, "must be a bare file name"));
        }
        Ok(())
    }
}

fn invalid(field: &str, value: &str, reason: &str) -> GenError {
    GenError::Validation {
        code: ErrorCode::ConfigInvalid,
        message: format!("Invalid configuration: {} ({})", field, reason),
        context: value.to_string(),
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn missing_key_is_credential_error() {
        let err = Config::from_lookup(|_| None).unwrap_err();
        assert_eq!(err.code(), ErrorCode::CredentialMissing);
    }

    #[test]
    fn blank_key_is_credential_error() {
        let err = Config::from_lookup(|_| Some("   ".to_string())).unwrap_err();
        assert_eq!(err.code(), ErrorCode::CredentialMissing);
    }

    #[test]
    fn defaults_point_at_fixed_model_and_output() {
        let config = Config::from_lookup(|name| {
            (name == API_KEY_ENV).then(|| "secret".to_string())
        })
        .unwrap();
        assert_eq!(config.api_key, "secret");
        assert_eq!(config.model, "gemini-2.5-flash");
        assert_eq!(config.thinking_budget, 0);
        assert_eq!(config.output_path(), PathBuf::from("out").join("design.v"));
    }

    #[test]
    fn rejects_nested_file_name() {
        let mut config = Config::new("k");
        config.file_name = "sub/design.v".to_string();
        assert_eq!(config.validate().unwrap_err().code(), ErrorCode::ConfigInvalid);
    }
}
