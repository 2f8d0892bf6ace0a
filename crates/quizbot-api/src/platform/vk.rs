//! VK community messages client and Callback API payloads.

use async_trait::async_trait;
use quizbot_conversation::{Keyboard, OutboundMessage};
use serde::Deserialize;
use serde_json::{Value, json};

use super::{MessageSender, Platform, PlatformError};

/// Public VK API endpoint.
pub const DEFAULT_API_URL: &str = "https://api.vk.com/method";

/// VK API version the request parameters are written for.
pub const API_VERSION: &str = "5.199";

/// Callback event type sent when the server address is being confirmed.
pub const CONFIRMATION: &str = "confirmation";

/// Callback event type for a new incoming message.
pub const MESSAGE_NEW: &str = "message_new";

/// A Callback API event envelope.
///
/// `object` stays raw until the event type is known, so unknown event types
/// never fail to parse.
#[derive(Debug, Deserialize)]
pub struct CallbackEvent {
    /// Event type, e.g. `message_new`.
    #[serde(rename = "type")]
    pub kind: String,
    /// Community the event belongs to.
    #[serde(default)]
    pub group_id: Option<i64>,
    /// Secret key configured for the callback server.
    #[serde(default)]
    pub secret: Option<String>,
    /// Event payload.
    #[serde(default)]
    pub object: Value,
}

/// Payload of a `message_new` event.
#[derive(Debug, Deserialize)]
pub struct MessageNew {
    /// The incoming message.
    pub message: VkMessage,
}

/// An incoming personal or chat message.
#[derive(Debug, Deserialize)]
pub struct VkMessage {
    /// Author of the message.
    pub from_id: i64,
    /// Conversation the message belongs to; replies go here.
    pub peer_id: i64,
    /// Message text; empty for attachments only.
    #[serde(default)]
    pub text: String,
}

impl CallbackEvent {
    /// Parses the payload of a `message_new` event.
    ///
    /// # Errors
    ///
    /// Returns the `serde_json` error if `object` is not a message payload.
    pub fn message_new(&self) -> Result<MessageNew, serde_json::Error> {
        MessageNew::deserialize(&self.object)
    }
}

/// Renders a keyboard as the JSON string `messages.send` expects.
///
/// [`Keyboard::Remove`] becomes an empty one-time keyboard, which hides the
/// current one. [`Keyboard::Unchanged`] renders to `None`.
///
/// # Errors
///
/// Returns the `serde_json` error if the keyboard cannot be encoded.
pub fn keyboard_json(keyboard: &Keyboard) -> Result<Option<String>, serde_json::Error> {
    let value = match keyboard {
        Keyboard::Buttons(buttons) => {
            let row: Vec<Value> = buttons
                .iter()
                .map(|button| {
                    json!({
                        "action": { "type": "text", "label": button.label() },
                        "color": "secondary"
                    })
                })
                .collect();
            json!({ "one_time": true, "buttons": [row] })
        }
        Keyboard::Remove => json!({ "one_time": true, "buttons": [] }),
        Keyboard::Unchanged => return Ok(None),
    };
    serde_json::to_string(&value).map(Some)
}

#[derive(Debug, Deserialize)]
struct VkResponse {
    #[serde(default)]
    error: Option<VkApiError>,
}

#[derive(Debug, Deserialize)]
struct VkApiError {
    error_code: i64,
    #[serde(default)]
    error_msg: String,
}

impl VkResponse {
    fn into_result(self) -> Result<(), PlatformError> {
        match self.error {
            None => Ok(()),
            Some(error) => Err(PlatformError::Api {
                platform: Platform::Vk,
                code: error.error_code,
                description: error.error_msg,
            }),
        }
    }
}

/// VK API client for one community token.
#[derive(Clone)]
pub struct VkClient {
    http: reqwest::Client,
    api_url: String,
    token: String,
}

impl std::fmt::Debug for VkClient {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.debug_struct("VkClient")
            .field("api_url", &self.api_url)
            .finish_non_exhaustive()
    }
}

impl VkClient {
    /// Creates a client for the community `token` against `api_url`.
    #[must_use]
    pub fn new(http: reqwest::Client, api_url: &str, token: &str) -> Self {
        Self {
            http,
            api_url: api_url.trim_end_matches('/').to_owned(),
            token: token.to_owned(),
        }
    }
}

#[async_trait]
impl MessageSender for VkClient {
    fn platform(&self) -> Platform {
        Platform::Vk
    }

    async fn send(&self, peer_id: &str, message: &OutboundMessage) -> Result<(), PlatformError> {
        let random_id = rand::random::<i32>().to_string();
        let keyboard = keyboard_json(&message.keyboard)?;

        let mut params: Vec<(&str, &str)> = vec![
            ("access_token", self.token.as_str()),
            ("v", API_VERSION),
            ("peer_id", peer_id),
            ("message", message.text.as_str()),
            ("random_id", random_id.as_str()),
        ];
        if let Some(keyboard) = keyboard.as_deref() {
            params.push(("keyboard", keyboard));
        }

        let response: VkResponse = self
            .http
            .post(format!("{}/messages.send", self.api_url))
            .form(&params)
            .send()
            .await?
            .json()
            .await?;
        response.into_result()
    }
}

#[cfg(test)]
mod tests {
    use quizbot_conversation::{Button, Keyboard};
    use serde_json::{Value, json};

    use super::*;

    fn parsed(keyboard: &Keyboard) -> Option<Value> {
        keyboard_json(keyboard)
            .unwrap()
            .map(|raw| serde_json::from_str(&raw).unwrap())
    }

    #[test]
    fn test_buttons_render_in_one_secondary_row() {
        let keyboard = parsed(&Keyboard::buttons(&[Button::MyScore, Button::Surrender]));

        assert_eq!(
            keyboard,
            Some(json!({
                "one_time": true,
                "buttons": [[
                    { "action": { "type": "text", "label": "Мой счёт" }, "color": "secondary" },
                    { "action": { "type": "text", "label": "Сдаться" }, "color": "secondary" }
                ]]
            }))
        );
    }

    #[test]
    fn test_remove_renders_empty_keyboard() {
        assert_eq!(
            parsed(&Keyboard::Remove),
            Some(json!({ "one_time": true, "buttons": [] }))
        );
    }

    #[test]
    fn test_unchanged_sends_no_keyboard() {
        assert_eq!(keyboard_json(&Keyboard::Unchanged).unwrap(), None);
    }

    #[test]
    fn test_message_new_event_parses() {
        let event: CallbackEvent = serde_json::from_value(json!({
            "type": "message_new",
            "group_id": 1,
            "event_id": "abc",
            "v": "5.199",
            "secret": "s3cret",
            "object": {
                "message": { "id": 9, "from_id": 77, "peer_id": 77, "text": "Сдаться", "date": 1 },
                "client_info": {}
            }
        }))
        .unwrap();

        let message = event.message_new().unwrap().message;

        assert_eq!(event.kind, MESSAGE_NEW);
        assert_eq!(event.secret.as_deref(), Some("s3cret"));
        assert_eq!((message.from_id, message.peer_id), (77, 77));
        assert_eq!(message.text, "Сдаться");
    }

    #[test]
    fn test_confirmation_event_has_no_object() {
        let event: CallbackEvent =
            serde_json::from_value(json!({ "type": "confirmation", "group_id": 1 })).unwrap();

        assert_eq!(event.kind, CONFIRMATION);
        assert!(event.message_new().is_err());
    }

    #[test]
    fn test_error_response_becomes_api_error() {
        let response: VkResponse = serde_json::from_value(json!({
            "error": { "error_code": 901, "error_msg": "Can't send messages for users without permission" }
        }))
        .unwrap();

        match response.into_result() {
            Err(PlatformError::Api { code, platform, .. }) => {
                assert_eq!(code, 901);
                assert_eq!(platform, Platform::Vk);
            }
            other => panic!("expected Api error, got {other:?}"),
        }
    }

    #[test]
    fn test_success_response_is_ok() {
        let response: VkResponse = serde_json::from_value(json!({ "response": 123 })).unwrap();

        assert!(response.into_result().is_ok());
    }
}
