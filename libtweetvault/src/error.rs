//! Error types for Tweetvault

use std::time::Duration;
use thiserror::Error;

pub type Result<T> = std::result::Result<T, TweetvaultError>;

/// Result type used by the timeline API layer
pub type ApiResult<T> = std::result::Result<T, ApiError>;

#[derive(Error, Debug)]
pub enum TweetvaultError {
    #[error("Configuration error: {0}")]
    Config(#[from] ConfigError),

    #[error("Database error: {0}")]
    Database(#[from] DbError),

    #[error("API error: {0}")]
    Api(#[from] ApiError),

    #[error("Invalid input: {0}")]
    InvalidInput(String),
}

impl TweetvaultError {
    /// Returns the appropriate exit code for this error
    pub fn exit_code(&self) -> i32 {
        match self {
            TweetvaultError::InvalidInput(_) => 3,
            TweetvaultError::Api(ApiError::Authentication(_)) => 2,
            TweetvaultError::Api(_) => 1,
            TweetvaultError::Config(_) => 1,
            TweetvaultError::Database(_) => 1,
        }
    }
}

#[derive(Error, Debug)]
pub enum ConfigError {
    #[error("Failed to read profiles file: {0}")]
    ReadError(#[from] std::io::Error),

    #[error("Failed to parse profiles file: {0}")]
    ParseError(#[from] toml::de::Error),

    #[error("No such profile: {0}")]
    MissingProfile(String),

    #[error("Missing required field: {0}")]
    MissingField(String),
}

#[derive(Error, Debug)]
pub enum DbError {
    #[error("Database operation failed: {0}")]
    SqlxError(#[from] sqlx::Error),

    #[error("Migration failed: {0}")]
    MigrationError(#[from] sqlx::migrate::MigrateError),

    #[error("IO error: {0}")]
    IoError(#[from] std::io::Error),
}

/// Errors raised by the remote timeline API.
///
/// `RateLimited` is the only recoverable variant: callers inside the
/// archive engine sleep for `reset_after` and re-issue the same request.
/// Everything else propagates.
#[derive(Error, Debug, Clone)]
pub enum ApiError {
    #[error("rate limited, reset in {}s", reset_after.as_secs())]
    RateLimited { reset_after: Duration },

    #[error("Authentication failed: {0}")]
    Authentication(String),

    #[error("Network error: {0}")]
    Network(String),

    #[error("API request failed (HTTP {status}): {message}")]
    Request { status: u16, message: String },

    #[error("Unexpected API response: {0}")]
    Unexpected(String),
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_exit_code_invalid_input() {
        let error = TweetvaultError::InvalidInput("bad profile name".to_string());
        assert_eq!(error.exit_code(), 3);
    }

    #[test]
    fn test_exit_code_authentication_error() {
        let error = TweetvaultError::Api(ApiError::Authentication("bad token".to_string()));
        assert_eq!(error.exit_code(), 2);
    }

    #[test]
    fn test_exit_code_api_error() {
        let error = TweetvaultError::Api(ApiError::Request {
            status: 500,
            message: "server error".to_string(),
        });
        assert_eq!(error.exit_code(), 1);
    }

    #[test]
    fn test_exit_code_config_error() {
        let error = TweetvaultError::Config(ConfigError::MissingProfile("default".to_string()));
        assert_eq!(error.exit_code(), 1);
    }

    #[test]
    fn test_exit_code_database_error() {
        let db_error = DbError::IoError(std::io::Error::new(
            std::io::ErrorKind::NotFound,
            "file not found",
        ));
        let error = TweetvaultError::Database(db_error);
        assert_eq!(error.exit_code(), 1);
    }

    #[test]
    fn test_rate_limited_formatting() {
        let error = ApiError::RateLimited {
            reset_after: Duration::from_secs(42),
        };
        assert_eq!(format!("{}", error), "rate limited, reset in 42s");
    }

    #[test]
    fn test_error_conversion_from_api_error() {
        let api_error = ApiError::Unexpected("not a tweet object".to_string());
        let error: TweetvaultError = api_error.into();
        match error {
            TweetvaultError::Api(_) => {}
            _ => panic!("Expected TweetvaultError::Api"),
        }
    }

    #[test]
    fn test_missing_profile_formatting() {
        let error = TweetvaultError::Config(ConfigError::MissingProfile("alt".to_string()));
        assert_eq!(
            format!("{}", error),
            "Configuration error: No such profile: alt"
        );
    }
}
