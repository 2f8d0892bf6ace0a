//! Outbound messaging platforms.
//!
//! Each platform turns an [`OutboundMessage`] into its own API call and
//! renders the abstract [`Keyboard`](quizbot_conversation::Keyboard) into its
//! own keyboard format.

pub mod telegram;
pub mod vk;

use async_trait::async_trait;
use quizbot_conversation::OutboundMessage;
use thiserror::Error;

/// Messaging platforms the bot is reachable on.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum Platform {
    /// Telegram Bot API.
    Telegram,
    /// VK community messages.
    Vk,
}

impl Platform {
    /// Lowercase name used in logs and error bodies.
    #[must_use]
    pub fn as_str(self) -> &'static str {
        match self {
            Self::Telegram => "telegram",
            Self::Vk => "vk",
        }
    }
}

impl std::fmt::Display for Platform {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.write_str(self.as_str())
    }
}

/// Errors raised while talking to a platform API.
#[derive(Debug, Error)]
pub enum PlatformError {
    /// The HTTP request itself failed.
    #[error("HTTP request failed: {0}")]
    Http(#[from] reqwest::Error),

    /// The platform answered but rejected the call.
    #[error("{platform} API error {code}: {description}")]
    Api {
        /// Platform that rejected the call.
        platform: Platform,
        /// Error code reported by the platform.
        code: i64,
        /// Error description reported by the platform.
        description: String,
    },

    /// The reply keyboard could not be rendered.
    #[error("failed to encode keyboard: {0}")]
    Encode(#[from] serde_json::Error),
}

/// Sends rendered replies to a chat on one platform.
///
/// Implementations emit no log records of their own: the admin log
/// forwarder sends through them, and a record per send would feed back
/// into the forwarder.
#[async_trait]
pub trait MessageSender: Send + Sync + std::fmt::Debug {
    /// The platform this sender talks to.
    fn platform(&self) -> Platform;

    /// Sends `message` to the chat identified by `peer_id`.
    ///
    /// # Errors
    ///
    /// Returns `PlatformError` if the request fails or the platform rejects it.
    async fn send(&self, peer_id: &str, message: &OutboundMessage) -> Result<(), PlatformError>;
}
