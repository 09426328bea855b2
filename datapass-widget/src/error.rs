//! Update error types.

use datapass_store::StoreError;
use thiserror::Error;

/// Errors returned by the orchestrator and scheduler.
#[derive(Debug, Error)]
pub enum UpdateError {
    /// An update for this instance is already running.
    #[error("Update already in progress for instance {0}")]
    ConcurrentRequestRejected(i32),

    /// The instance is not tracked.
    #[error("Unknown instance: {0}")]
    UnknownInstance(i32),

    /// Local state could not be written.
    #[error("Store error: {0}")]
    Store(#[from] StoreError),
}

impl UpdateError {
    /// Returns true for errors the user should never see.
    pub fn is_silent(&self) -> bool {
        matches!(self, UpdateError::ConcurrentRequestRejected(_))
    }
}
