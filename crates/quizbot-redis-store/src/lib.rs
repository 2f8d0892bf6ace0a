//! Redis implementation of the quiz bot's `SessionStore`.

pub mod redis_session_store;

pub use redis_session_store::{RedisSessionStore, RedisSettings};
