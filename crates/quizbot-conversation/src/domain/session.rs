//! Per-user session data and its layout in the key-value store.

use std::fmt;

use tracing::warn;

use super::state::ConversationState;

/// Platform user or chat identifier.
#[derive(Debug, Clone, PartialEq, Eq, Hash)]
pub struct UserId(String);

impl UserId {
    /// Wraps an identifier.
    #[must_use]
    pub fn new(id: impl Into<String>) -> Self {
        Self(id.into())
    }

    /// The identifier as text.
    #[must_use]
    pub fn as_str(&self) -> &str {
        &self.0
    }
}

impl fmt::Display for UserId {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(&self.0)
    }
}

impl From<i64> for UserId {
    fn from(id: i64) -> Self {
        Self(id.to_string())
    }
}

/// Store keys holding one user's session.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct SessionKeys {
    /// `{user_id}` → current question text.
    pub question: String,
    /// `State {user_id}` → state tag.
    pub state: String,
    /// `Score {user_id}` → decimal score.
    pub score: String,
}

impl SessionKeys {
    /// Keys for `user_id`.
    #[must_use]
    pub fn for_user(user_id: &UserId) -> Self {
        Self {
            question: user_id.as_str().to_owned(),
            state: format!("State {user_id}"),
            score: format!("Score {user_id}"),
        }
    }

    /// The keys in the order [`UserSession::from_stored`] expects them.
    #[must_use]
    pub fn to_vec(&self) -> Vec<String> {
        vec![self.state.clone(), self.question.clone(), self.score.clone()]
    }
}

/// Snapshot of a user's session as read from the store.
#[derive(Debug, Clone, PartialEq, Eq, Default)]
pub struct UserSession {
    /// Current state; `Idle` when nothing is stored.
    pub state: ConversationState,
    /// The outstanding question, if one was recorded.
    pub current_question: Option<String>,
    /// Correct answers so far; absent counts as zero.
    pub score: u64,
}

impl UserSession {
    /// Builds a session from raw stored values. Unreadable values are logged
    /// and treated as absent.
    #[must_use]
    pub fn from_stored(
        state: Option<&str>,
        current_question: Option<&str>,
        score: Option<&str>,
    ) -> Self {
        let state = state.map_or(ConversationState::Idle, |tag| {
            tag.parse().unwrap_or_else(|err| {
                warn!(%err, "treating unreadable session state as idle");
                ConversationState::Idle
            })
        });
        let score = score.map_or(0, |raw| {
            raw.trim().parse().unwrap_or_else(|_| {
                warn!(raw, "treating unreadable score as zero");
                0
            })
        });
        Self {
            state,
            current_question: current_question
                .filter(|q| !q.is_empty())
                .map(str::to_owned),
            score,
        }
    }
}

/// Mutation produced by one transition, written as a single batch.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct SessionUpdate {
    /// Next state; always written.
    pub state: ConversationState,
    /// New outstanding question, when one was issued.
    pub current_question: Option<String>,
    /// New score, when it changed.
    pub score: Option<u64>,
}

impl SessionUpdate {
    /// An update that only moves to `state`.
    #[must_use]
    pub fn state_only(state: ConversationState) -> Self {
        Self {
            state,
            current_question: None,
            score: None,
        }
    }

    /// Flattens the update into store entries.
    #[must_use]
    pub fn entries(&self, keys: &SessionKeys) -> Vec<(String, String)> {
        let mut entries = vec![(keys.state.clone(), self.state.as_tag().to_owned())];
        if let Some(question) = &self.current_question {
            entries.push((keys.question.clone(), question.clone()));
        }
        if let Some(score) = self.score {
            entries.push((keys.score.clone(), score.to_string()));
        }
        entries
    }
}
