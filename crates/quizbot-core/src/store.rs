//! Session store abstraction.
//!
//! The store is a flat string key-value space. The conversation engine
//! composes each user's session out of several keys; see
//! `quizbot_conversation::domain::session::SessionKeys`.

use async_trait::async_trait;

use crate::error::DomainError;

/// Key read by the default [`SessionStore::ping`]. It is never written.
pub const READINESS_KEY: &str = "quizbot:readiness";

/// Key-value backend holding per-user session data.
///
/// Implementations must tolerate `get` returning `None` for any key at any
/// time. Every failure to reach the backend is reported as
/// [`DomainError::StoreUnavailable`]. A failed write may still have been
/// applied.
#[async_trait]
pub trait SessionStore: Send + Sync {
    /// Read a single key.
    async fn get(&self, key: &str) -> Result<Option<String>, DomainError>;

    /// Write a single key.
    async fn set(&self, key: &str, value: &str) -> Result<(), DomainError>;

    /// Read several keys; the result has one slot per requested key, in order.
    async fn get_many(&self, keys: &[String]) -> Result<Vec<Option<String>>, DomainError> {
        let mut values = Vec::with_capacity(keys.len());
        for key in keys {
            values.push(self.get(key).await?);
        }
        Ok(values)
    }

    /// Write several keys as one update.
    ///
    /// Backends that support transactions apply the batch atomically. The
    /// default implementation writes sequentially.
    async fn set_many(&self, entries: &[(String, String)]) -> Result<(), DomainError> {
        for (key, value) in entries {
            self.set(key, value).await?;
        }
        Ok(())
    }

    /// Checks that the backend answers. The default reads [`READINESS_KEY`].
    async fn ping(&self) -> Result<(), DomainError> {
        self.get(READINESS_KEY).await.map(|_| ())
    }
}
