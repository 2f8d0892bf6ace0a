//! Quiz bot: conversation state machine.
//!
//! The domain layer is a pure transition function from (session, intent)
//! to (reply, session update). The application layer wraps it with session
//! loading and persistence so both platform adapters share one behaviour.

pub mod application;
pub mod domain;

pub use application::quiz_bot::QuizBot;
pub use domain::reply::{Button, Keyboard, OutboundMessage};
pub use domain::session::{UserId, UserSession};
pub use domain::state::ConversationState;
