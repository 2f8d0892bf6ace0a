//! Shared test helpers for API integration tests.
#![allow(dead_code)]

use std::sync::{Arc, Mutex};
use std::time::Duration;

use async_trait::async_trait;
use axum::Router;
use axum::body::Body;
use axum::http::{Request, StatusCode};
use http_body_util::BodyExt;
use quizbot_catalog::{Catalog, QuizEntry};
use quizbot_conversation::OutboundMessage;
use quizbot_core::rng::DeterministicRng;
use quizbot_core::store::SessionStore;
use quizbot_test_support::MockRng;
use serde_json::{Value, json};
use tower::ServiceExt;

use quizbot_api::dispatch::RetryPolicy;
use quizbot_api::platform::{MessageSender, Platform, PlatformError};
use quizbot_api::routes;
use quizbot_api::state::{AppState, TelegramEndpoint, VkEndpoint};

/// Confirmation code configured for the VK endpoint.
pub const VK_CONFIRMATION_CODE: &str = "a1b2c3d4";

/// Secret configured by [`TestOptions::secured`] for both platforms.
pub const SECRET: &str = "s3cret";

/// A `MessageSender` that records every message instead of sending it.
#[derive(Debug)]
pub struct RecordingSender {
    platform: Platform,
    fails: bool,
    sent: Mutex<Vec<(String, OutboundMessage)>>,
}

impl RecordingSender {
    pub fn new(platform: Platform) -> Self {
        Self {
            platform,
            fails: false,
            sent: Mutex::new(Vec::new()),
        }
    }

    /// A sender whose platform rejects every message. Attempts are still
    /// recorded.
    pub fn failing(platform: Platform) -> Self {
        Self {
            fails: true,
            ..Self::new(platform)
        }
    }

    /// Every `(peer_id, message)` passed to `send` so far.
    pub fn sent(&self) -> Vec<(String, OutboundMessage)> {
        self.sent.lock().unwrap().clone()
    }

    /// Texts of every message sent so far.
    pub fn texts(&self) -> Vec<String> {
        self.sent().into_iter().map(|(_, m)| m.text).collect()
    }

    /// The most recent message, if any.
    pub fn last(&self) -> Option<OutboundMessage> {
        self.sent().pop().map(|(_, m)| m)
    }
}

#[async_trait]
impl MessageSender for RecordingSender {
    fn platform(&self) -> Platform {
        self.platform
    }

    async fn send(&self, peer_id: &str, message: &OutboundMessage) -> Result<(), PlatformError> {
        self.sent
            .lock()
            .unwrap()
            .push((peer_id.to_owned(), message.clone()));
        if self.fails {
            return Err(PlatformError::Api {
                platform: self.platform,
                code: 403,
                description: "Forbidden: bot was blocked by the user".to_owned(),
            });
        }
        Ok(())
    }
}

/// Which adapters the test app enables and how.
#[derive(Debug, Clone)]
pub struct TestOptions {
    pub telegram: bool,
    pub vk: bool,
    pub secret: Option<String>,
    pub failing_senders: bool,
}

impl Default for TestOptions {
    fn default() -> Self {
        Self {
            telegram: true,
            vk: true,
            secret: None,
            failing_senders: false,
        }
    }
}

impl TestOptions {
    /// Both adapters, both requiring [`SECRET`].
    pub fn secured() -> Self {
        Self {
            secret: Some(SECRET.to_owned()),
            ..Self::default()
        }
    }
}

/// The router plus the senders it replies through.
pub struct TestApp {
    pub router: Router,
    pub telegram: Arc<RecordingSender>,
    pub vk: Arc<RecordingSender>,
}

/// One-question catalog shared by the integration tests.
pub fn catalog() -> Arc<Catalog> {
    Arc::new(
        Catalog::from_entries([QuizEntry::new(
            "Столица Франции?",
            "Париж (столица Франции).",
        )])
        .unwrap(),
    )
}

/// Build the full app router with both adapters enabled and no secrets.
pub fn build_test_app(store: Arc<dyn SessionStore>) -> TestApp {
    build_test_app_with(store, &TestOptions::default())
}

/// Build the full app router with recording senders and a deterministic
/// RNG. Uses the same route structure as `main.rs`.
pub fn build_test_app_with(store: Arc<dyn SessionStore>, options: &TestOptions) -> TestApp {
    let new_sender = |platform| {
        if options.failing_senders {
            Arc::new(RecordingSender::failing(platform))
        } else {
            Arc::new(RecordingSender::new(platform))
        }
    };
    let telegram = new_sender(Platform::Telegram);
    let vk = new_sender(Platform::Vk);

    let rng: Arc<Mutex<dyn DeterministicRng + Send>> = Arc::new(Mutex::new(MockRng));
    let retry = RetryPolicy {
        attempts: 3,
        base_delay: Duration::ZERO,
    };
    let mut app_state = AppState::new(catalog(), store, rng, retry);
    if options.telegram {
        app_state = app_state.with_telegram(TelegramEndpoint {
            sender: telegram.clone(),
            webhook_secret: options.secret.clone(),
        });
    }
    if options.vk {
        app_state = app_state.with_vk(VkEndpoint {
            sender: vk.clone(),
            confirmation_code: VK_CONFIRMATION_CODE.to_owned(),
            secret: options.secret.clone(),
        });
    }

    TestApp {
        router: routes::app(app_state),
        telegram,
        vk,
    }
}

/// A Telegram update carrying a private text message.
pub fn telegram_update(chat_id: i64, text: &str) -> Value {
    json!({
        "update_id": 1,
        "message": {
            "message_id": 1,
            "date": 1_700_000_000,
            "chat": { "id": chat_id, "type": "private" },
            "from": { "id": chat_id, "is_bot": false, "first_name": "Test" },
            "text": text
        }
    })
}

/// A VK `message_new` callback event.
pub fn vk_message(from_id: i64, peer_id: i64, text: &str) -> Value {
    json!({
        "type": "message_new",
        "group_id": 1,
        "event_id": "e1",
        "v": "5.199",
        "object": {
            "message": { "id": 1, "date": 1, "from_id": from_id, "peer_id": peer_id, "text": text },
            "client_info": { "keyboard": true }
        }
    })
}

/// Send a POST request with a JSON body and extra headers; return the status
/// and the raw response body.
pub async fn post_json(
    app: Router,
    uri: &str,
    body: &Value,
    headers: &[(&str, &str)],
) -> (StatusCode, String) {
    let mut builder = Request::builder()
        .method("POST")
        .uri(uri)
        .header("content-type", "application/json");
    for (name, value) in headers {
        builder = builder.header(*name, *value);
    }
    let request = builder
        .body(Body::from(serde_json::to_vec(body).unwrap()))
        .unwrap();

    let response = app.oneshot(request).await.unwrap();
    let status = response.status();
    let body_bytes = response.into_body().collect().await.unwrap().to_bytes();

    (status, String::from_utf8(body_bytes.to_vec()).unwrap())
}

/// Send a GET request and return the response.
pub async fn get_json(app: Router, uri: &str) -> (StatusCode, Value) {
    let request = Request::builder()
        .method("GET")
        .uri(uri)
        .body(Body::empty())
        .unwrap();

    let response = app.oneshot(request).await.unwrap();
    let status = response.status();
    let body_bytes = response.into_body().collect().await.unwrap().to_bytes();
    let json: Value = serde_json::from_slice(&body_bytes).unwrap();

    (status, json)
}

/// Posts each text to the Telegram webhook as chat `chat_id`.
pub async fn telegram_says(app: &TestApp, chat_id: i64, texts: &[&str]) {
    for text in texts {
        let (status, _) = post_json(
            app.router.clone(),
            "/telegram/webhook",
            &telegram_update(chat_id, text),
            &[],
        )
        .await;
        assert_eq!(status, StatusCode::OK, "telegram rejected {text:?}");
    }
}

/// Posts each text to the VK callback as user `user_id` in their own dialog.
pub async fn vk_says(app: &TestApp, user_id: i64, texts: &[&str]) {
    for text in texts {
        let (status, body) = post_json(
            app.router.clone(),
            "/vk/callback",
            &vk_message(user_id, user_id, text),
            &[],
        )
        .await;
        assert_eq!(status, StatusCode::OK, "vk rejected {text:?}");
        assert_eq!(body, "ok");
    }
}
