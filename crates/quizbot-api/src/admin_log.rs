//! Forwarding of log records to admin chats.
//!
//! [`AdminLogLayer`] renders each record as `{timestamp} - {LEVEL} - {message}`
//! and queues it; [`forward`] drains the queue into every configured admin
//! chat. Records from the HTTP client stack and from this module are never
//! queued, so forwarding cannot trigger more forwarding. The queue is bounded;
//! records arriving while it is full are dropped.

use std::fmt::{self, Write as _};
use std::sync::Arc;

use quizbot_conversation::OutboundMessage;
use quizbot_core::clock::Clock;
use tokio::sync::mpsc;
use tracing::field::{Field, Visit};
use tracing::{Event, Level, Subscriber, debug};
use tracing_subscriber::layer::{Context, Layer};

use crate::platform::MessageSender;

/// Longest record sent, in characters. Telegram caps messages at 4096.
pub const MAX_RECORD_CHARS: usize = 4000;

/// Records held while the forwarder is busy sending.
pub const QUEUE_CAPACITY: usize = 256;

const EXCLUDED_TARGETS: &[&str] = &[
    module_path!(),
    "reqwest",
    "hyper",
    "hyper_util",
    "h2",
    "rustls",
];

/// A chat that receives forwarded records.
#[derive(Debug, Clone)]
pub struct AdminChat {
    /// Platform the chat lives on.
    pub sender: Arc<dyn MessageSender>,
    /// Chat or peer id on that platform.
    pub chat_id: String,
}

/// `tracing` layer that queues formatted records for the admin chats.
pub struct AdminLogLayer {
    clock: Arc<dyn Clock>,
    records: mpsc::Sender<String>,
}

impl fmt::Debug for AdminLogLayer {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.debug_struct("AdminLogLayer").finish_non_exhaustive()
    }
}

/// Creates the layer and the receiving end of its queue, which holds at most
/// `capacity` records.
///
/// # Panics
///
/// Panics if `capacity` is zero.
#[must_use]
pub fn channel(
    clock: Arc<dyn Clock>,
    capacity: usize,
) -> (AdminLogLayer, mpsc::Receiver<String>) {
    let (records, receiver) = mpsc::channel(capacity);
    (AdminLogLayer { clock, records }, receiver)
}

impl<S: Subscriber> Layer<S> for AdminLogLayer {
    fn on_event(&self, event: &Event<'_>, _ctx: Context<'_, S>) {
        let metadata = event.metadata();
        if is_excluded(metadata.target()) {
            return;
        }

        let mut visitor = RecordVisitor::default();
        event.record(&mut visitor);
        let record = format_record(&self.clock.log_timestamp(), *metadata.level(), &visitor.finish());

        // Full or closed queue: the record is dropped.
        let _ = self.records.try_send(record);
    }
}

/// Sends every queued record to every admin chat until the queue closes.
pub async fn forward(mut records: mpsc::Receiver<String>, chats: Vec<AdminChat>) {
    while let Some(record) = records.recv().await {
        let message = OutboundMessage::plain(record);
        for chat in &chats {
            if let Err(err) = chat.sender.send(&chat.chat_id, &message).await {
                debug!(platform = %chat.sender.platform(), %err, "failed to forward log record");
            }
        }
    }
}

fn is_excluded(target: &str) -> bool {
    EXCLUDED_TARGETS.iter().any(|excluded| {
        target
            .strip_prefix(excluded)
            .is_some_and(|rest| rest.is_empty() || rest.starts_with("::"))
    })
}

fn format_record(timestamp: &str, level: Level, body: &str) -> String {
    let record = format!("{timestamp} - {level} - {body}");
    match record.char_indices().nth(MAX_RECORD_CHARS) {
        Some((cut, _)) => record[..cut].to_owned(),
        None => record,
    }
}

#[derive(Default)]
struct RecordVisitor {
    message: String,
    fields: String,
}

impl RecordVisitor {
    fn finish(self) -> String {
        if self.message.is_empty() {
            self.fields.trim_start().to_owned()
        } else {
            self.message + &self.fields
        }
    }
}

impl Visit for RecordVisitor {
    fn record_str(&mut self, field: &Field, value: &str) {
        if field.name() == "message" {
            self.message.push_str(value);
        } else {
            let _ = write!(self.fields, " {}={value}", field.name());
        }
    }

    fn record_debug(&mut self, field: &Field, value: &dyn fmt::Debug) {
        if field.name() == "message" {
            let _ = write!(self.message, "{value:?}");
        } else {
            let _ = write!(self.fields, " {}={value:?}", field.name());
        }
    }
}
