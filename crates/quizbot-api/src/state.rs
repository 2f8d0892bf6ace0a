//! Shared application state.

use std::sync::{Arc, Mutex};

use quizbot_catalog::Catalog;
use quizbot_conversation::QuizBot;
use quizbot_core::rng::DeterministicRng;
use quizbot_core::store::SessionStore;

use crate::dispatch::RetryPolicy;
use crate::platform::MessageSender;

/// Telegram webhook settings.
#[derive(Clone)]
pub struct TelegramEndpoint {
    /// Sends replies through the Bot API.
    pub sender: Arc<dyn MessageSender>,
    /// Expected value of the secret token header, if one was registered.
    pub webhook_secret: Option<String>,
}

/// VK Callback API settings.
#[derive(Clone)]
pub struct VkEndpoint {
    /// Sends replies through `messages.send`.
    pub sender: Arc<dyn MessageSender>,
    /// String returned for `confirmation` events.
    pub confirmation_code: String,
    /// Expected `secret` field of every event, if one is configured.
    pub secret: Option<String>,
}

impl std::fmt::Debug for TelegramEndpoint {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.debug_struct("TelegramEndpoint")
            .field("sender", &self.sender)
            .field("webhook_secret", &self.webhook_secret.is_some())
            .finish()
    }
}

impl std::fmt::Debug for VkEndpoint {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.debug_struct("VkEndpoint")
            .field("sender", &self.sender)
            .field("secret", &self.secret.is_some())
            .finish_non_exhaustive()
    }
}

/// Application state shared across all request handlers.
#[derive(Clone)]
pub struct AppState {
    /// Conversation engine.
    pub quiz_bot: Arc<QuizBot>,
    /// Session store, pinged by the readiness check.
    pub store: Arc<dyn SessionStore>,
    /// Telegram adapter, when a bot token is configured.
    pub telegram: Option<TelegramEndpoint>,
    /// VK adapter, when a community token is configured.
    pub vk: Option<VkEndpoint>,
    /// Retry policy for store failures.
    pub retry: RetryPolicy,
}

impl std::fmt::Debug for AppState {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.debug_struct("AppState")
            .field("quiz_bot", &self.quiz_bot)
            .field("telegram", &self.telegram)
            .field("vk", &self.vk)
            .field("retry", &self.retry)
            .finish_non_exhaustive()
    }
}

impl AppState {
    /// Create new application state with no platform enabled.
    #[must_use]
    pub fn new(
        catalog: Arc<Catalog>,
        store: Arc<dyn SessionStore>,
        rng: Arc<Mutex<dyn DeterministicRng + Send>>,
        retry: RetryPolicy,
    ) -> Self {
        let quiz_bot = Arc::new(QuizBot::new(catalog, Arc::clone(&store), rng));
        Self {
            quiz_bot,
            store,
            telegram: None,
            vk: None,
            retry,
        }
    }

    /// Enables the Telegram webhook.
    #[must_use]
    pub fn with_telegram(mut self, endpoint: TelegramEndpoint) -> Self {
        self.telegram = Some(endpoint);
        self
    }

    /// Enables the VK callback.
    #[must_use]
    pub fn with_vk(mut self, endpoint: VkEndpoint) -> Self {
        self.vk = Some(endpoint);
        self
    }

    /// Names of the enabled platforms.
    #[must_use]
    pub fn platforms(&self) -> Vec<&'static str> {
        let mut platforms = Vec::new();
        if self.telegram.is_some() {
            platforms.push("telegram");
        }
        if self.vk.is_some() {
            platforms.push("vk");
        }
        platforms
    }
}
