//! The quiz bot application service.
//!
//! This is the single entry point both platform adapters call: load the
//! user's session, run the pure transition, persist the update, return the
//! reply.

use std::sync::{Arc, Mutex};

use quizbot_catalog::Catalog;
use quizbot_core::error::DomainError;
use quizbot_core::rng::DeterministicRng;
use quizbot_core::store::SessionStore;
use tracing::{debug, info, instrument};

use crate::domain::intent::Intent;
use crate::domain::reply::OutboundMessage;
use crate::domain::session::{SessionKeys, UserId, UserSession};
use crate::domain::transition::transition;

/// Conversation engine with its collaborators injected.
///
/// Safe to share across tasks. Concurrent calls for different users are
/// independent; concurrent calls for the same user resolve last-write-wins
/// at the store.
pub struct QuizBot {
    catalog: Arc<Catalog>,
    store: Arc<dyn SessionStore>,
    rng: Arc<Mutex<dyn DeterministicRng + Send>>,
}

impl std::fmt::Debug for QuizBot {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.debug_struct("QuizBot")
            .field("catalog_entries", &self.catalog.len())
            .finish_non_exhaustive()
    }
}

impl QuizBot {
    /// Creates the service.
    #[must_use]
    pub fn new(
        catalog: Arc<Catalog>,
        store: Arc<dyn SessionStore>,
        rng: Arc<Mutex<dyn DeterministicRng + Send>>,
    ) -> Self {
        Self {
            catalog,
            store,
            rng,
        }
    }

    /// Handles one inbound message from `user_id`.
    ///
    /// Returns `Ok(None)` when the message means nothing in the user's current
    /// state; nothing is written in that case.
    ///
    /// The `Mutex` is locked only around the synchronous transition call to
    /// avoid holding a `MutexGuard` across await points.
    ///
    /// # Errors
    ///
    /// Returns `DomainError::StoreUnavailable` if the session cannot be read,
    /// `DomainError::WriteUnconfirmed` if the update cannot be written, and
    /// `DomainError::Infrastructure` if the RNG lock is poisoned.
    #[instrument(skip(self, user_id, text), fields(user_id = %user_id))]
    pub async fn handle(
        &self,
        user_id: &UserId,
        text: &str,
    ) -> Result<Option<OutboundMessage>, DomainError> {
        let keys = SessionKeys::for_user(user_id);
        let intent = Intent::parse(text);
        let session = self.load(&keys).await?;

        let step = {
            let mut rng = self
                .rng
                .lock()
                .map_err(|e| DomainError::Infrastructure(format!("RNG mutex poisoned: {e}")))?;
            transition(&session, &intent, &self.catalog, &mut *rng)
        };

        let Some(step) = step else {
            debug!(state = %session.state, intent = intent.kind(), "no transition");
            return Ok(None);
        };

        self.store
            .set_many(&step.update.entries(&keys))
            .await
            .map_err(DomainError::into_unconfirmed_write)?;

        info!(
            from = %session.state,
            to = %step.update.state,
            outcome = step.outcome.as_str(),
            "conversation advanced"
        );
        Ok(Some(step.reply))
    }

    /// Reads the current session of `user_id`.
    ///
    /// # Errors
    ///
    /// Returns `DomainError::StoreUnavailable` if the store cannot be read.
    pub async fn session(&self, user_id: &UserId) -> Result<UserSession, DomainError> {
        self.load(&SessionKeys::for_user(user_id)).await
    }

    async fn load(&self, keys: &SessionKeys) -> Result<UserSession, DomainError> {
        let values = self.store.get_many(&keys.to_vec()).await?;
        let value = |index: usize| values.get(index).and_then(|v| v.as_deref());
        Ok(UserSession::from_stored(value(0), value(1), value(2)))
    }
}
