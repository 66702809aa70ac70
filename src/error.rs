//! Error handling and custom error types
//!
//! Provides unified error handling across the crate using thiserror. The
//! response pipeline itself is total; these errors only come out of provider
//! calls, configuration and profile loading.

use std::time::Duration;
use thiserror::Error;

#[derive(Error, Debug)]
pub enum Error {
    #[error("IO error: {0}")]
    Io(#[from] std::io::Error),

    #[error("Serialization error: {0}")]
    Serialization(#[from] serde_json::Error),

    #[error("HTTP request error: {0}")]
    Http(#[from] reqwest::Error),

    #[error("AI provider error: {0}")]
    AiProvider(String),

    #[error("AI provider unavailable: {0}")]
    ProviderUnavailable(String),

    #[error("AI provider timed out after {}ms", .0.as_millis())]
    Timeout(Duration),

    #[error("Configuration error: {0}")]
    Config(String),

    #[error("Environment variable error: {0}")]
    EnvVar(#[from] dotenvy::Error),

    #[error("Invalid input: {0}")]
    InvalidInput(String),
}

pub type Result<T> = std::result::Result<T, Error>;

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_timeout_message_reports_millis() {
        let err = Error::Timeout(Duration::from_millis(2500));
        assert_eq!(err.to_string(), "AI provider timed out after 2500ms");
    }
}
