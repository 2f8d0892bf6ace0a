//! Shared inbound event handling for every platform adapter.
//!
//! Adapters only extract `(user_id, peer_id, text)` from their payloads;
//! everything after that goes through [`dispatch`] so the same events yield
//! the same conversation on every platform.

use std::time::Duration;

use quizbot_conversation::domain::reply::texts;
use quizbot_conversation::{OutboundMessage, QuizBot, UserId};
use quizbot_core::error::DomainError;
use tracing::{debug, error, warn};

use crate::platform::MessageSender;

/// Attempts made before a store failure is reported to the user.
pub const DEFAULT_ATTEMPTS: u32 = 3;

/// Delay before the first retry; doubled on each further retry.
pub const DEFAULT_BASE_DELAY: Duration = Duration::from_millis(100);

/// How store failures are retried. Only failures to read the session are
/// retried; a failed write may already be applied.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct RetryPolicy {
    /// Total attempts, including the first one. At least one.
    pub attempts: u32,
    /// Delay before the first retry.
    pub base_delay: Duration,
}

impl Default for RetryPolicy {
    fn default() -> Self {
        Self {
            attempts: DEFAULT_ATTEMPTS,
            base_delay: DEFAULT_BASE_DELAY,
        }
    }
}

impl RetryPolicy {
    /// Delay to wait before retry number `retry` (1-based).
    #[must_use]
    pub fn delay_before(&self, retry: u32) -> Duration {
        let exponent = retry.saturating_sub(1).min(16);
        self.base_delay.saturating_mul(1 << exponent)
    }
}

/// What happened to an inbound event.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum DispatchOutcome {
    /// The conversation advanced and the reply was delivered.
    Replied,
    /// The message means nothing in the current state.
    Ignored,
    /// The store failed; the user got an apology.
    Apologized,
    /// A reply was due but the platform refused it.
    DeliveryFailed,
}

/// Runs one inbound message through the bot and delivers the reply.
///
/// Never fails: every error ends as a log record and, where possible, a
/// chat message, so the caller can always acknowledge the event.
pub async fn dispatch(
    bot: &QuizBot,
    sender: &dyn MessageSender,
    retry: RetryPolicy,
    user_id: &UserId,
    peer_id: &str,
    text: &str,
) -> DispatchOutcome {
    match handle_with_retry(bot, retry, user_id, text).await {
        Ok(Some(reply)) => deliver(sender, peer_id, &reply, DispatchOutcome::Replied).await,
        Ok(None) => {
            debug!(platform = %sender.platform(), "event ignored");
            DispatchOutcome::Ignored
        }
        Err(err) => {
            error!(platform = %sender.platform(), %user_id, %err, "failed to handle message");
            let apology = OutboundMessage::plain(texts::SERVICE_UNAVAILABLE);
            deliver(sender, peer_id, &apology, DispatchOutcome::Apologized).await
        }
    }
}

async fn handle_with_retry(
    bot: &QuizBot,
    retry: RetryPolicy,
    user_id: &UserId,
    text: &str,
) -> Result<Option<OutboundMessage>, DomainError> {
    let mut attempt = 1;
    loop {
        match bot.handle(user_id, text).await {
            Err(err) if err.is_retryable() && attempt < retry.attempts => {
                let delay = retry.delay_before(attempt);
                warn!(attempt, ?delay, %err, "session store unavailable, retrying");
                tokio::time::sleep(delay).await;
                attempt += 1;
            }
            result => return result,
        }
    }
}

async fn deliver(
    sender: &dyn MessageSender,
    peer_id: &str,
    message: &OutboundMessage,
    outcome: DispatchOutcome,
) -> DispatchOutcome {
    match sender.send(peer_id, message).await {
        Ok(()) => outcome,
        Err(err) => {
            error!(platform = %sender.platform(), peer_id, %err, "failed to deliver reply");
            DispatchOutcome::DeliveryFailed
        }
    }
}
