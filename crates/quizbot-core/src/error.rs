//! Domain error types.

use thiserror::Error;

/// Errors surfaced by the conversation engine and its collaborators.
///
/// None of these messages are ever shown to chat users; adapters translate
/// them into a generic apology.
#[derive(Debug, Error)]
pub enum DomainError {
    /// The session store could not be reached or rejected the operation.
    #[error("session store unavailable: {0}")]
    StoreUnavailable(String),

    /// A session update failed and may or may not have been applied.
    #[error("session write unconfirmed: {0}")]
    WriteUnconfirmed(String),

    /// An internal invariant failed (for example a poisoned lock).
    #[error("infrastructure error: {0}")]
    Infrastructure(String),
}

impl DomainError {
    /// Returns `true` when the failure is transient and the caller may retry.
    #[must_use]
    pub fn is_retryable(&self) -> bool {
        matches!(self, Self::StoreUnavailable(_))
    }

    /// Reclassifies a failed write. A store that dropped the connection may
    /// have committed the write first, so the event must not be replayed.
    #[must_use]
    pub fn into_unconfirmed_write(self) -> Self {
        match self {
            Self::StoreUnavailable(message) => Self::WriteUnconfirmed(message),
            other => other,
        }
    }
}
