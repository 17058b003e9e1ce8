//! Error types for Google Chat Desktop

use thiserror::Error;

/// Result type alias for shell operations
pub type ShellResult<T> = Result<T, ShellError>;

/// Main error type for the shell
#[derive(Error, Debug)]
pub enum ShellError {
    #[error("Icon cache error: {0}")]
    IconCache(String),

    #[error("Launch error: {0}")]
    Launch(String),

    #[error("Configuration error: {0}")]
    Config(String),

    #[error("IO error: {0}")]
    Io(#[from] std::io::Error),

    #[error("JSON error: {0}")]
    Json(#[from] serde_json::Error),

    #[error("Base64 error: {0}")]
    Base64(#[from] base64::DecodeError),
}

impl ShellError {
    /// Create a new icon cache error
    pub fn icon_cache(msg: impl Into<String>) -> Self {
        Self::IconCache(msg.into())
    }

    /// Create a new launch error
    pub fn launch(msg: impl Into<String>) -> Self {
        Self::Launch(msg.into())
    }

    /// Create a new configuration error
    pub fn config(msg: impl Into<String>) -> Self {
        Self::Config(msg.into())
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_io_errors_convert() {
        fn read_missing() -> ShellResult<String> {
            Ok(std::fs::read_to_string("/definitely/not/here/config.json")?)
        }
        assert!(matches!(read_missing(), Err(ShellError::Io(_))));
    }

    #[test]
    fn test_json_and_base64_errors_convert() {
        fn parse(raw: &str) -> ShellResult<serde_json::Value> {
            Ok(serde_json::from_str(raw)?)
        }
        fn decode(raw: &str) -> ShellResult<Vec<u8>> {
            use base64::Engine as _;
            Ok(base64::engine::general_purpose::STANDARD.decode(raw)?)
        }
        assert!(matches!(parse("{"), Err(ShellError::Json(_))));
        assert!(matches!(decode("***"), Err(ShellError::Base64(_))));
    }

    #[test]
    fn test_helper_messages() {
        assert_eq!(
            ShellError::launch("xdg-open missing").to_string(),
            "Launch error: xdg-open missing"
        );
        assert_eq!(
            ShellError::icon_cache("bad mime").to_string(),
            "Icon cache error: bad mime"
        );
    }
}
