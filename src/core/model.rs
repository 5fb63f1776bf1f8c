// Unicorn Logs - core/model.rs
//
// Core data model types. Pure data definitions with no I/O, no UI,
// no platform dependencies.
//
// These types are the shared vocabulary across all layers.

use crate::util::constants::DEBUG_MAX_PAYLOAD_PREVIEW;
use crate::util::error::RecordError;
use chrono::{DateTime, Local};
use serde::{Deserialize, Serialize};
use std::time::{Duration, Instant};

// =============================================================================
// Log record (wire payload of one `message` event)
// =============================================================================

/// One structured log line received from the event stream.
///
/// All four fields are required. Extra fields are ignored so the aggregator
/// can grow its payload without breaking older viewers.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct LogRecord {
    /// Address of the agent that shipped the line.
    pub ip: String,
    /// Timestamp as formatted by the aggregator (displayed verbatim).
    pub timestamp: String,
    /// Name of the container that produced the line.
    pub container_name: String,
    /// The log line body.
    pub content: String,
}

impl LogRecord {
    /// Decode a record from an event's data payload.
    pub fn from_json(data: &str) -> Result<Self, RecordError> {
        serde_json::from_str(data).map_err(|source| RecordError {
            preview: preview(data),
            source,
        })
    }

    /// The display line: `"<container_name> - <timestamp> - <content>"`.
    pub fn display_line(&self) -> String {
        format!(
            "{} - {} - {}",
            self.container_name, self.timestamp, self.content
        )
    }
}

/// Truncate a payload for logging, respecting char boundaries.
fn preview(data: &str) -> String {
    match data.char_indices().nth(DEBUG_MAX_PAYLOAD_PREVIEW) {
        Some((idx, _)) => format!("{}\u{2026}", &data[..idx]),
        None => data.to_string(),
    }
}

// =============================================================================
// Display entry
// =============================================================================

/// A rendered row of the entries list.
#[derive(Debug, Clone)]
pub struct DisplayEntry {
    /// Monotonically increasing ID within the session. Never reused.
    pub id: u64,
    /// Pre-formatted display line.
    pub text: String,
    /// The record this row was built from (kept for detail view and export).
    pub record: LogRecord,
    /// Wall-clock arrival time.
    pub received_at: DateTime<Local>,
    /// The highlight clears once `now >= highlight_until`. `None` once cleared.
    pub highlight_until: Option<Instant>,
}

impl DisplayEntry {
    /// Whether the row still carries the "freshly arrived" marker at `now`.
    pub fn is_highlighted(&self, now: Instant) -> bool {
        self.highlight_until.is_some_and(|until| now < until)
    }
}

// =============================================================================
// SSE event (decoded wire frame)
// =============================================================================

/// One dispatched server-sent event.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct SseEvent {
    /// Event type; `"message"` when the server sent no `event:` field.
    pub event_type: String,
    /// Data lines joined with `\n`.
    pub data: String,
}

// =============================================================================
// Stream progress (background thread -> UI)
// =============================================================================

/// Messages sent from the subscription thread to the UI thread.
#[derive(Debug)]
pub enum StreamProgress {
    /// A connection attempt is starting. `attempt` counts from 1 and resets
    /// after every successful connection.
    Connecting { url: String, attempt: u32 },

    /// The server accepted the subscription.
    Connected { url: String },

    /// A decoded event arrived.
    Event(SseEvent),

    /// The connection failed or dropped; the next attempt starts after
    /// `retry_in`.
    Error { message: String, retry_in: Duration },

    /// The subscription thread has exited.
    Stopped,
}

// =============================================================================
// Connection state (UI-side view of the subscription)
// =============================================================================

/// Informal state of the subscription, shown in the status bar.
#[derive(Debug, Clone, PartialEq, Eq, Default)]
pub enum ConnectionState {
    /// No subscription is running.
    #[default]
    Idle,
    Connecting {
        attempt: u32,
    },
    Connected,
    /// Waiting for the backoff delay to elapse. `since` marks when the wait
    /// began so the UI can show a countdown.
    Reconnecting {
        retry_in: Duration,
        since: Instant,
    },
    Stopped,
}

impl ConnectionState {
    /// Short label for the status bar.
    pub fn label(&self, now: Instant) -> String {
        match self {
            Self::Idle => "Idle".to_string(),
            Self::Connecting { attempt: 1 } => "Connecting\u{2026}".to_string(),
            Self::Connecting { attempt } => format!("Connecting (attempt {attempt})\u{2026}"),
            Self::Connected => "Connected".to_string(),
            Self::Reconnecting { retry_in, since } => {
                let left = retry_in.saturating_sub(now.saturating_duration_since(*since));
                let secs = left.as_secs() + u64::from(left.subsec_nanos() > 0);
                format!("Reconnecting in {secs}s")
            }
            Self::Stopped => "Stopped".to_string(),
        }
    }

    /// True while the stream is delivering events.
    pub fn is_connected(&self) -> bool {
        matches!(self, Self::Connected)
    }
}
