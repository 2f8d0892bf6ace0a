//! VK Callback API receiver.

use axum::extract::State;
use axum::{Json, Router, routing::post};
use quizbot_conversation::UserId;
use tracing::{debug, instrument, warn};
use uuid::Uuid;

use crate::dispatch::dispatch;
use crate::error::ApiError;
use crate::platform::vk::{CONFIRMATION, CallbackEvent, MESSAGE_NEW};
use crate::state::AppState;

/// Body VK expects for every handled event.
pub const ACK: &str = "ok";

/// POST /vk/callback
#[instrument(skip_all, fields(event_type = %event.kind))]
async fn callback(
    State(state): State<AppState>,
    Json(event): Json<CallbackEvent>,
) -> Result<String, ApiError> {
    let endpoint = state.vk.as_ref().ok_or(ApiError::PlatformDisabled("vk"))?;

    if let Some(expected) = endpoint.secret.as_deref() {
        if event.secret.as_deref() != Some(expected) {
            warn!(group_id = ?event.group_id, "vk callback called with a wrong secret");
            return Err(ApiError::Unauthorized);
        }
    }

    match event.kind.as_str() {
        CONFIRMATION => Ok(endpoint.confirmation_code.clone()),
        MESSAGE_NEW => {
            let correlation_id = Uuid::new_v4();
            let message = event
                .message_new()
                .map_err(|e| ApiError::BadPayload {
                    platform: "vk",
                    message: e.to_string(),
                })?
                .message;

            debug!(%correlation_id, from_id = message.from_id, "handling vk message");

            let outcome = dispatch(
                &state.quiz_bot,
                endpoint.sender.as_ref(),
                state.retry,
                &UserId::from(message.from_id),
                &message.peer_id.to_string(),
                &message.text,
            )
            .await;

            debug!(%correlation_id, ?outcome, "vk event processed");
            Ok(ACK.to_owned())
        }
        other => {
            debug!(event_type = other, "vk event ignored");
            Ok(ACK.to_owned())
        }
    }
}

/// Returns the router for the VK adapter.
pub fn router() -> Router<AppState> {
    Router::new().route("/callback", post(callback))
}
