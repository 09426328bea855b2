//! Fetch error types.

use thiserror::Error;

// ============================================================================
// HTTP Error
// ============================================================================

/// HTTP-specific error type.
#[derive(Debug, Error)]
pub enum HttpError {
    /// Request error.
    #[error("Request error: {0}")]
    Request(#[source] reqwest::Error),

    /// Connect or read timeout exceeded.
    #[error("Request timed out")]
    Timeout,

    /// Server answered with a non-success status.
    #[error("Unexpected status code: {0}")]
    Status(u16),

    /// Domain not allowed.
    #[error("Domain not allowed: {0}")]
    DomainNotAllowed(String),

    /// Invalid URL.
    #[error("Invalid URL: {0}")]
    InvalidUrl(String),

    /// Client could not be built.
    #[error("Client setup failed: {0}")]
    Setup(String),

    /// Canned failure from a fixture source.
    #[error("Transport failure: {0}")]
    Transport(String),
}

impl From<reqwest::Error> for HttpError {
    fn from(err: reqwest::Error) -> Self {
        if err.is_timeout() {
            HttpError::Timeout
        } else {
            HttpError::Request(err)
        }
    }
}

impl HttpError {
    /// Returns true if a retry might succeed.
    pub fn is_transient(&self) -> bool {
        matches!(
            self,
            HttpError::Timeout | HttpError::Request(_) | HttpError::Transport(_)
        )
    }
}
