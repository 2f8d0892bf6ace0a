//! Domain model for the conversation context.

pub mod intent;
pub mod reply;
pub mod session;
pub mod state;
pub mod transition;

#[cfg(test)]
mod proptests;
