//! Quiz bot: Telegram and VK adapters.
//!
//! Both adapters are webhook receivers on one axum server. They translate
//! platform payloads into calls to the shared `QuizBot` and render its
//! replies back into platform keyboards.

pub mod admin_log;
pub mod config;
pub mod dispatch;
pub mod error;
pub mod platform;
pub mod routes;
pub mod state;
