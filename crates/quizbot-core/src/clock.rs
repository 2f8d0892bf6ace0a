//! Wall-clock abstraction.
//!
//! The bot itself never branches on time; the clock only stamps log
//! records forwarded to admin chats, so tests can pin the rendered text.

use chrono::{DateTime, Utc};

/// Timestamp layout used for forwarded log records.
pub const LOG_TIMESTAMP_FORMAT: &str = "%Y-%m-%d %H:%M:%S,%3f";

/// Source of the current time.
pub trait Clock: Send + Sync {
    /// Returns the current time.
    fn now(&self) -> DateTime<Utc>;

    /// Returns the current time rendered with [`LOG_TIMESTAMP_FORMAT`].
    fn log_timestamp(&self) -> String {
        self.now().format(LOG_TIMESTAMP_FORMAT).to_string()
    }
}

/// Clock backed by the host's system time.
#[derive(Debug, Clone, Copy, Default)]
pub struct SystemClock;

impl Clock for SystemClock {
    fn now(&self) -> DateTime<Utc> {
        Utc::now()
    }
}
