//! Error types for tripmock
//!
//! Simulated backend failures are never errors: they travel in-band as
//! response status codes. These variants cover the harness around it.

use thiserror::Error;

/// Main error type for tripmock
#[derive(Error, Debug)]
pub enum TripmockError {
    #[error("Request error: {0}")]
    Request(#[from] reqwest::Error),

    #[error("IO error: {0}")]
    Io(#[from] std::io::Error),

    #[error("JSON error: {0}")]
    Json(#[from] serde_json::Error),

    #[error("URL parse error: {0}")]
    UrlParse(#[from] url::ParseError),

    #[error("Config error: {0}")]
    Config(String),

    #[error("Invalid argument: {0}")]
    Argument(String),

    #[error("Server error: {0}")]
    Server(String),
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_error_display() {
        let err = TripmockError::Config("missing API_BASE_URL".to_string());
        assert_eq!(err.to_string(), "Config error: missing API_BASE_URL");
    }

    #[test]
    fn test_from_io() {
        let io = std::io::Error::new(std::io::ErrorKind::AddrInUse, "port taken");
        let err: TripmockError = io.into();
        assert!(matches!(err, TripmockError::Io(_)));
    }

    #[test]
    fn test_from_url() {
        let err: TripmockError = url::Url::parse("not a url").unwrap_err().into();
        assert!(err.to_string().starts_with("URL parse error"));
    }
}
