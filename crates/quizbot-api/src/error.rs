//! Quiz bot: API error types.

use axum::Json;
use axum::http::StatusCode;
use axum::response::{IntoResponse, Response};
use quizbot_catalog::CatalogError;
use quizbot_core::error::DomainError;
use serde::Serialize;
use thiserror::Error;

use crate::platform::PlatformError;

/// Startup errors for the bot server. All of them are fatal.
#[derive(Debug, Error)]
pub enum AppError {
    /// A required setting is missing or invalid.
    #[error("configuration error: {0}")]
    Config(String),

    /// The quiz catalog could not be loaded.
    #[error("catalog error: {0}")]
    Catalog(#[from] CatalogError),

    /// The session store could not be reached.
    #[error("store error: {0}")]
    Store(#[from] DomainError),

    /// A platform API call made during startup failed.
    #[error("platform error: {0}")]
    Platform(#[from] PlatformError),

    /// Network binding or I/O error.
    #[error("server error: {0}")]
    Server(#[from] std::io::Error),
}

/// JSON body returned for error responses.
#[derive(Debug, Serialize)]
pub struct ErrorBody {
    /// Machine-readable error code.
    pub error: &'static str,
    /// Human-readable error message.
    pub message: String,
}

/// Errors returned to platform servers calling our webhooks.
#[derive(Debug, Error)]
pub enum ApiError {
    /// A domain failure that could not be handled as a chat reply.
    #[error(transparent)]
    Domain(#[from] DomainError),

    /// The webhook secret is missing or wrong.
    #[error("invalid or missing webhook secret")]
    Unauthorized,

    /// The addressed platform has no token configured.
    #[error("{0} adapter is not configured")]
    PlatformDisabled(&'static str),

    /// The payload parsed as JSON but not as the expected event.
    #[error("malformed {platform} payload: {message}")]
    BadPayload {
        /// Platform that sent the payload.
        platform: &'static str,
        /// What was wrong with it.
        message: String,
    },
}

impl IntoResponse for ApiError {
    fn into_response(self) -> Response {
        let (status, error_code) = match &self {
            Self::Domain(DomainError::StoreUnavailable(_) | DomainError::WriteUnconfirmed(_)) => {
                (StatusCode::SERVICE_UNAVAILABLE, "store_unavailable")
            }
            Self::Domain(DomainError::Infrastructure(_)) => {
                (StatusCode::INTERNAL_SERVER_ERROR, "infrastructure_error")
            }
            Self::Unauthorized => (StatusCode::UNAUTHORIZED, "unauthorized"),
            Self::PlatformDisabled(_) => (StatusCode::NOT_FOUND, "platform_disabled"),
            Self::BadPayload { .. } => (StatusCode::BAD_REQUEST, "bad_payload"),
        };

        let body = ErrorBody {
            error: error_code,
            message: self.to_string(),
        };

        (status, Json(body)).into_response()
    }
}
