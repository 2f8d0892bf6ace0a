//! Telegram webhook receiver.

use axum::extract::State;
use axum::http::{HeaderMap, StatusCode};
use axum::{Json, Router, routing::post};
use quizbot_conversation::UserId;
use tracing::{debug, instrument, warn};
use uuid::Uuid;

use crate::dispatch::dispatch;
use crate::error::ApiError;
use crate::platform::telegram::{SECRET_HEADER, Update};
use crate::state::{AppState, TelegramEndpoint};

/// POST /telegram/webhook
#[instrument(skip_all, fields(update_id = update.update_id))]
async fn webhook(
    State(state): State<AppState>,
    headers: HeaderMap,
    Json(update): Json<Update>,
) -> Result<StatusCode, ApiError> {
    let endpoint = state
        .telegram
        .as_ref()
        .ok_or(ApiError::PlatformDisabled("telegram"))?;
    verify_secret(endpoint, &headers)?;

    let correlation_id = Uuid::new_v4();
    let Some((chat_id, text)) = update.text_message() else {
        debug!(%correlation_id, "update without text ignored");
        return Ok(StatusCode::OK);
    };

    debug!(%correlation_id, chat_id, "handling telegram message");

    let outcome = dispatch(
        &state.quiz_bot,
        endpoint.sender.as_ref(),
        state.retry,
        &UserId::from(chat_id),
        &chat_id.to_string(),
        text,
    )
    .await;

    debug!(%correlation_id, ?outcome, "telegram update processed");
    Ok(StatusCode::OK)
}

fn verify_secret(endpoint: &TelegramEndpoint, headers: &HeaderMap) -> Result<(), ApiError> {
    let Some(expected) = endpoint.webhook_secret.as_deref() else {
        return Ok(());
    };
    let provided = headers.get(SECRET_HEADER).and_then(|v| v.to_str().ok());
    if provided == Some(expected) {
        Ok(())
    } else {
        warn!("telegram webhook called with a wrong secret token");
        Err(ApiError::Unauthorized)
    }
}

/// Returns the router for the Telegram adapter.
pub fn router() -> Router<AppState> {
    Router::new().route("/webhook", post(webhook))
}
