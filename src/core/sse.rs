// Unicorn Logs - core/sse.rs
//
// Incremental decoder for the server-sent event line protocol.
//
// The decoder is fed one line at a time (terminator already stripped) and
// yields an `SseEvent` whenever a blank line completes an event that carried
// data. Field handling:
//   - `data`  appends the value plus a newline to the data buffer
//   - `event` sets the event type for the pending event
//   - `id`    sets the last event ID (ignored if it contains NUL)
//   - `retry` sets the reconnection delay in ms (digits only, else ignored)
//   - lines starting with `:` are comments; unknown fields are ignored
// A single space after the colon is stripped from the value.
//
// No I/O here: the subscription thread owns the socket and line splitting.

use crate::core::model::SseEvent;
use crate::util::constants::MESSAGE_EVENT_TYPE;
use std::time::Duration;

/// Stateful SSE decoder for one connection.
#[derive(Debug, Default)]
pub struct SseDecoder {
    data: String,
    event_type: String,
    last_event_id: Option<String>,
    retry: Option<Duration>,
}

impl SseDecoder {
    pub fn new() -> Self {
        Self::default()
    }

    /// Last event ID seen so far. Persists across events, and is what a
    /// reconnect sends as `Last-Event-ID`.
    pub fn last_event_id(&self) -> Option<&str> {
        self.last_event_id.as_deref()
    }

    /// Reconnection delay requested by the server via `retry:`, if any.
    pub fn retry(&self) -> Option<Duration> {
        self.retry
    }

    /// Seed the last event ID (used when a reconnect resumes a stream).
    pub fn set_last_event_id(&mut self, id: Option<String>) {
        self.last_event_id = id;
    }

    /// Drop a partially accumulated event (e.g. after an oversized line).
    pub fn discard_pending(&mut self) {
        self.data.clear();
        self.event_type.clear();
    }

    /// Feed one line without its terminator. A trailing `\r` is tolerated.
    pub fn feed_line(&mut self, line: &str) -> Option<SseEvent> {
        let line = line.strip_suffix('\r').unwrap_or(line);

        if line.is_empty() {
            return self.dispatch();
        }

        if line.starts_with(':') {
            return None;
        }

        let (field, value) = match line.split_once(':') {
            Some((field, value)) => (field, value.strip_prefix(' ').unwrap_or(value)),
            None => (line, ""),
        };

        match field {
            "data" => {
                self.data.push_str(value);
                self.data.push('\n');
            }
            "event" => {
                self.event_type = value.to_string();
            }
            "id" => {
                if !value.contains('\0') {
                    self.last_event_id = if value.is_empty() {
                        None
                    } else {
                        Some(value.to_string())
                    };
                }
            }
            "retry" => {
                if !value.is_empty() && value.bytes().all(|b| b.is_ascii_digit()) {
                    if let Ok(ms) = value.parse::<u64>() {
                        self.retry = Some(Duration::from_millis(ms));
                    }
                }
            }
            other => {
                tracing::trace!(field = other, "SSE: ignoring unknown field");
            }
        }

        None
    }

    /// Complete the pending event on a blank line.
    fn dispatch(&mut self) -> Option<SseEvent> {
        if self.data.is_empty() {
            self.event_type.clear();
            return None;
        }

        let mut data = std::mem::take(&mut self.data);
        if data.ends_with('\n') {
            data.pop();
        }

        let event_type = match std::mem::take(&mut self.event_type) {
            t if t.is_empty() => MESSAGE_EVENT_TYPE.to_string(),
            t => t,
        };

        Some(SseEvent { event_type, data })
    }
}
