//! Telegram Bot API client and webhook payloads.

use async_trait::async_trait;
use quizbot_conversation::{Keyboard, OutboundMessage};
use serde::{Deserialize, Serialize};
use serde_json::{Value, json};

use super::{MessageSender, Platform, PlatformError};

/// Public Bot API endpoint.
pub const DEFAULT_API_URL: &str = "https://api.telegram.org";

/// Header Telegram uses to echo the webhook secret.
pub const SECRET_HEADER: &str = "x-telegram-bot-api-secret-token";

/// An incoming webhook update. Only the fields the bot needs are parsed.
#[derive(Debug, Deserialize)]
pub struct Update {
    /// Monotonic update identifier.
    pub update_id: i64,
    /// New incoming message, if this update carries one.
    #[serde(default)]
    pub message: Option<Message>,
}

/// A chat message.
#[derive(Debug, Deserialize)]
pub struct Message {
    /// Message identifier inside the chat.
    pub message_id: i64,
    /// Chat the message was sent to.
    pub chat: Chat,
    /// Text of the message; absent for stickers, photos and the like.
    #[serde(default)]
    pub text: Option<String>,
}

/// A Telegram chat.
#[derive(Debug, Deserialize)]
pub struct Chat {
    /// Chat identifier. For private chats it equals the user id.
    pub id: i64,
}

impl Update {
    /// Returns the chat id and text of a text message, if this update is one.
    #[must_use]
    pub fn text_message(&self) -> Option<(i64, &str)> {
        let message = self.message.as_ref()?;
        let text = message.text.as_deref()?;
        Some((message.chat.id, text))
    }
}

/// Renders a keyboard as a Bot API `reply_markup` object.
///
/// [`Keyboard::Unchanged`] renders to `None` so the field is omitted.
#[must_use]
pub fn reply_markup(keyboard: &Keyboard) -> Option<Value> {
    match keyboard {
        Keyboard::Buttons(buttons) => {
            let rows: Vec<Value> = buttons
                .iter()
                .map(|button| json!([{ "text": button.label() }]))
                .collect();
            Some(json!({ "keyboard": rows, "resize_keyboard": true }))
        }
        Keyboard::Remove => Some(json!({ "remove_keyboard": true })),
        Keyboard::Unchanged => None,
    }
}

#[derive(Debug, Serialize)]
struct SendMessageRequest<'a> {
    chat_id: &'a str,
    text: &'a str,
    #[serde(skip_serializing_if = "Option::is_none")]
    reply_markup: Option<Value>,
}

#[derive(Debug, Serialize)]
struct SetWebhookRequest<'a> {
    url: &'a str,
    #[serde(skip_serializing_if = "Option::is_none")]
    secret_token: Option<&'a str>,
    allowed_updates: [&'a str; 1],
}

#[derive(Debug, Deserialize)]
struct ApiResponse {
    ok: bool,
    #[serde(default)]
    error_code: Option<i64>,
    #[serde(default)]
    description: Option<String>,
}

impl ApiResponse {
    fn into_result(self) -> Result<(), PlatformError> {
        if self.ok {
            return Ok(());
        }
        Err(PlatformError::Api {
            platform: Platform::Telegram,
            code: self.error_code.unwrap_or_default(),
            description: self.description.unwrap_or_default(),
        })
    }
}

/// Bot API client for one bot token.
#[derive(Clone)]
pub struct TelegramClient {
    http: reqwest::Client,
    base_url: String,
}

impl std::fmt::Debug for TelegramClient {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        // The base URL embeds the bot token.
        f.debug_struct("TelegramClient").finish_non_exhaustive()
    }
}

impl TelegramClient {
    /// Creates a client for `token` against `api_url`.
    #[must_use]
    pub fn new(http: reqwest::Client, api_url: &str, token: &str) -> Self {
        Self {
            http,
            base_url: format!("{}/bot{token}", api_url.trim_end_matches('/')),
        }
    }

    /// Registers `url` as the webhook for this bot.
    ///
    /// # Errors
    ///
    /// Returns `PlatformError` if Telegram rejects the registration.
    pub async fn set_webhook(&self, url: &str, secret: Option<&str>) -> Result<(), PlatformError> {
        let request = SetWebhookRequest {
            url,
            secret_token: secret,
            allowed_updates: ["message"],
        };
        self.call("setWebhook", &request).await
    }

    async fn call<T: Serialize + Sync>(&self, method: &str, body: &T) -> Result<(), PlatformError> {
        let response: ApiResponse = self
            .http
            .post(format!("{}/{method}", self.base_url))
            .json(body)
            .send()
            .await?
            .json()
            .await?;
        response.into_result()
    }
}

#[async_trait]
impl MessageSender for TelegramClient {
    fn platform(&self) -> Platform {
        Platform::Telegram
    }

    async fn send(&self, peer_id: &str, message: &OutboundMessage) -> Result<(), PlatformError> {
        let request = SendMessageRequest {
            chat_id: peer_id,
            text: &message.text,
            reply_markup: reply_markup(&message.keyboard),
        };
        self.call("sendMessage", &request).await
    }
}
