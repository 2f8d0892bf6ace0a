//! Application services for the conversation context.

pub mod quiz_bot;
