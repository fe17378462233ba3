//! Error types for fetching catalog data.

use thiserror::Error;

/// Message stored on the catalog for every fetch failure.
pub const FETCH_FAILED_MESSAGE: &str = "Failed to fetch content";

/// Errors that can occur while fetching a batch from a [`crate::DataSource`].
#[derive(Debug, Clone, Error)]
#[non_exhaustive]
pub enum FetchError {
    /// The request could not be sent or the connection failed.
    #[error("transport error: {0}")]
    Transport(String),

    /// The endpoint answered with a non-success status.
    #[error("unexpected HTTP status {status}")]
    Status {
        /// The HTTP status code.
        status: u16,
    },

    /// The response body was not an array of item records.
    #[error("response parse error: {0}")]
    Parse(String),

    /// The source could not be constructed from its configuration.
    #[error("invalid source configuration: {0}")]
    Config(String),
}

impl FetchError {
    /// Returns the message shown to the user.
    ///
    /// Every variant maps to the same text; the detail is for logs only.
    #[must_use]
    pub fn user_message(&self) -> &'static str {
        FETCH_FAILED_MESSAGE
    }

    /// Returns whether fetching again may succeed.
    #[must_use]
    pub fn is_retryable(&self) -> bool {
        matches!(
            self,
            Self::Transport(_) | Self::Status { .. } | Self::Parse(_)
        )
    }
}

#[cfg(feature = "http")]
impl From<reqwest::Error> for FetchError {
    fn from(err: reqwest::Error) -> Self {
        if let Some(status) = err.status() {
            return Self::Status {
                status: status.as_u16(),
            };
        }
        if err.is_decode() {
            return Self::Parse(err.to_string());
        }
        Self::Transport(err.to_string())
    }
}

impl From<serde_json::Error> for FetchError {
    fn from(err: serde_json::Error) -> Self {
        Self::Parse(err.to_string())
    }
}

/// Result type alias for fetch operations.
pub type Result<T> = std::result::Result<T, FetchError>;

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_user_message_is_uniform() {
        let errors = [
            FetchError::Transport("connection refused".to_string()),
            FetchError::Status { status: 503 },
            FetchError::Parse("expected array".to_string()),
            FetchError::Config("bad endpoint".to_string()),
        ];
        for err in &errors {
            assert_eq!(err.user_message(), FETCH_FAILED_MESSAGE);
        }
    }

    #[test]
    fn test_retryable() {
        assert!(FetchError::Transport("timeout".to_string()).is_retryable());
        assert!(FetchError::Status { status: 500 }.is_retryable());
        assert!(FetchError::Parse("eof".to_string()).is_retryable());
        assert!(!FetchError::Config("empty endpoint".to_string()).is_retryable());
    }

    #[test]
    fn test_json_error_maps_to_parse() {
        let err = serde_json::from_str::<Vec<u8>>("{").unwrap_err();
        assert!(matches!(FetchError::from(err), FetchError::Parse(_)));
    }
}
