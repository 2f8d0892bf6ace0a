//! HTTP route modules.

pub mod health;
pub mod telegram;
pub mod vk;

use axum::Router;

use crate::state::AppState;

/// Builds the full application router.
pub fn app(state: AppState) -> Router {
    Router::new()
        .merge(health::router())
        .nest("/telegram", telegram::router())
        .nest("/vk", vk::router())
        .with_state(state)
}
