// Unicorn Logs - app/viewer.rs
//
// The log stream viewer: owns the entry list, the animated title, and the
// stream subscription handle. Constructed once at startup.
//
// Handlers (`on_message`, `on_error`) are invoked from `poll` on the UI
// thread, serially and never re-entrantly. All time-dependent work takes an
// explicit `now` so tests can drive the clock.

use crate::app::stream::{StreamConfig, StreamManager};
use crate::core::entries::EntryList;
use crate::core::model::{ConnectionState, DisplayEntry, LogRecord, SseEvent, StreamProgress};
use crate::core::rainbow::{RainbowTitle, XorShift};
use crate::util::constants::{
    HIGHLIGHT_DURATION_MS, MAX_STREAM_MESSAGES_PER_FRAME, MAX_WARNINGS, MESSAGE_EVENT_TYPE,
    TITLE_TEXT, TITLE_TICK_INTERVAL_MS,
};
use crate::util::error::{RecordError, UnicornError};
use chrono::{DateTime, Local};
use std::time::{Duration, Instant};

/// Startup settings for the viewer.
#[derive(Debug, Clone)]
pub struct ViewerSettings {
    pub stream: StreamConfig,
    pub max_entries: usize,
}

/// Single component behind the window: subscription, entries, title.
pub struct LogStreamViewer {
    /// Rendered entries, newest first.
    pub entries: EntryList,

    /// The decorative heading.
    pub title: RainbowTitle,

    /// Current subscription state.
    pub connection: ConnectionState,

    /// Status message for the status bar.
    pub status_message: String,

    /// Non-fatal warnings (config problems, stream errors).
    pub warnings: Vec<String>,

    /// ID of the entry shown in the detail pane.
    pub selected_id: Option<u64>,

    /// Keep the list scrolled to the newest entry.
    pub auto_scroll: bool,

    /// Records rendered this session.
    pub received_count: u64,

    /// Payloads dropped because they were not valid records.
    pub malformed_count: u64,

    /// Wall-clock time of the last rendered record.
    pub last_event_at: Option<DateTime<Local>>,

    stream_config: StreamConfig,
    stream: StreamManager,
    rng: XorShift,
}

impl LogStreamViewer {
    /// Create the viewer. The subscription is not opened until `start`.
    pub fn new(settings: ViewerSettings) -> Self {
        Self {
            entries: EntryList::new(
                settings.max_entries,
                Duration::from_millis(HIGHLIGHT_DURATION_MS),
            ),
            title: RainbowTitle::new(
                TITLE_TEXT,
                Duration::from_millis(TITLE_TICK_INTERVAL_MS),
            ),
            connection: ConnectionState::Idle,
            status_message: "Ready.".to_string(),
            warnings: Vec::new(),
            selected_id: None,
            auto_scroll: true,
            received_count: 0,
            malformed_count: 0,
            last_event_at: None,
            stream_config: settings.stream,
            stream: StreamManager::new(),
            rng: XorShift::from_clock(),
        }
    }

    /// Server base URL this viewer subscribes to.
    pub fn server_url(&self) -> &str {
        &self.stream_config.base_url
    }

    /// Open the subscription (or reopen it, resetting the backoff).
    pub fn start(&mut self) {
        match self.stream.start(self.stream_config.clone()) {
            Ok(()) => {
                self.connection = ConnectionState::Connecting { attempt: 1 };
                self.status_message = format!("Subscribing to {}\u{2026}", self.server_url());
            }
            Err(e) => {
                self.connection = ConnectionState::Stopped;
                self.report(e.into());
            }
        }
    }

    /// Stop the subscription.
    pub fn stop(&mut self) {
        self.stream.stop();
        self.connection = ConnectionState::Stopped;
        self.status_message = "Stream stopped.".to_string();
    }

    /// Whether a subscription thread is running.
    pub fn is_subscribed(&self) -> bool {
        self.stream.is_active()
    }

    /// Drain queued stream messages and run timers. Returns `true` if the
    /// view changed.
    pub fn poll(&mut self, now: Instant) -> bool {
        let messages = self.stream.poll_progress(MAX_STREAM_MESSAGES_PER_FRAME);
        let mut changed = !messages.is_empty();
        for msg in messages {
            self.handle_progress(msg, now);
        }
        changed |= self.tick(now);
        changed
    }

    /// Apply one message from the subscription thread.
    pub fn handle_progress(&mut self, msg: StreamProgress, now: Instant) {
        match msg {
            StreamProgress::Connecting { url, attempt } => {
                tracing::debug!(url = %url, attempt, "Connecting");
                self.connection = ConnectionState::Connecting { attempt };
            }
            StreamProgress::Connected { url } => {
                self.connection = ConnectionState::Connected;
                self.status_message = format!("Connected to {url}.");
            }
            StreamProgress::Event(event) => self.on_event(event, now),
            StreamProgress::Error { message, retry_in } => {
                self.on_error(&message, retry_in, now);
            }
            StreamProgress::Stopped => {
                self.stream.stop();
                self.connection = ConnectionState::Stopped;
                self.status_message = "Stream stopped.".to_string();
                tracing::info!("Stream subscription stopped");
            }
        }
    }

    /// Route a decoded event. Only `message` events carry records.
    fn on_event(&mut self, event: SseEvent, now: Instant) {
        if event.event_type != MESSAGE_EVENT_TYPE {
            tracing::debug!(event_type = %event.event_type, "Ignoring non-message event");
            return;
        }
        // Malformed payloads are reported and dropped; the stream stays open.
        if let Err(e) = self.on_message(&event.data, now) {
            self.report(e.into());
        }
    }

    /// Data-bearing event handler: decode and render one record.
    ///
    /// Returns the new entry's ID. A malformed payload leaves the list
    /// untouched.
    pub fn on_message(&mut self, data: &str, now: Instant) -> Result<u64, RecordError> {
        let record = match LogRecord::from_json(data) {
            Ok(r) => r,
            Err(e) => {
                self.malformed_count += 1;
                return Err(e);
            }
        };
        tracing::debug!(
            container = %record.container_name,
            ip = %record.ip,
            "Log record received"
        );

        let id = self.entries.push_front(record, now);
        self.received_count += 1;
        self.last_event_at = Some(Local::now());

        // A selection that fell off the end of the list is cleared.
        if let Some(sel) = self.selected_id {
            if self.entries.find(sel).is_none() {
                self.selected_id = None;
            }
        }
        Ok(id)
    }

    /// Connection-error handler: report and show the pending retry.
    pub fn on_error(&mut self, message: &str, retry_in: Duration, now: Instant) {
        tracing::warn!(error = message, "An error occurred on the event stream");
        self.connection = ConnectionState::Reconnecting {
            retry_in,
            since: now,
        };
        self.status_message = format!("Stream error: {message}");
        self.push_warning(format!("Stream error: {message}"));
    }

    /// Advance the title animation and expire highlights. Returns `true` if
    /// anything visible changed.
    pub fn tick(&mut self, now: Instant) -> bool {
        let recoloured = self.title.tick(now, &mut self.rng);
        let expired = self.entries.expire_highlights(now) > 0;
        recoloured || expired
    }

    /// Time until the next timer is due, for repaint scheduling.
    pub fn next_wakeup(&self, now: Instant) -> Option<Duration> {
        [self.title.next_tick(), self.entries.next_highlight_deadline()]
            .into_iter()
            .flatten()
            .min()
            .map(|at| at.saturating_duration_since(now))
    }

    /// Remove all rendered entries.
    pub fn clear(&mut self) {
        self.entries.clear();
        self.selected_id = None;
        self.status_message = "Entries cleared.".to_string();
    }

    /// Counters for the status bar, e.g.
    /// `"12/1000 entries \u{00b7} 15 received \u{00b7} 3 evicted"`.
    pub fn summary(&self) -> String {
        let mut summary = format!(
            "{}/{} entries \u{00b7} {} received",
            self.entries.len(),
            self.entries.capacity(),
            self.received_count
        );
        if self.entries.evicted() > 0 {
            summary.push_str(&format!(" \u{00b7} {} evicted", self.entries.evicted()));
        }
        if self.malformed_count > 0 {
            summary.push_str(&format!(" \u{00b7} {} malformed", self.malformed_count));
        }
        if let Some(at) = self.last_event_at {
            summary.push_str(&format!(" \u{00b7} last {}", at.format("%H:%M:%S")));
        }
        summary
    }

    /// Entry shown in the detail pane, if it is still in the list.
    pub fn selected_entry(&self) -> Option<&DisplayEntry> {
        self.selected_id.and_then(|id| self.entries.find(id))
    }

    /// Log a non-fatal error and surface it in the status bar.
    pub fn report(&mut self, error: UnicornError) {
        tracing::warn!(error = %error, "Viewer error");
        self.status_message = error.to_string();
        self.push_warning(error.to_string());
    }

    /// Record a warning, dropping the oldest beyond `MAX_WARNINGS`.
    pub fn push_warning(&mut self, warning: String) {
        if self.warnings.len() >= MAX_WARNINGS {
            self.warnings.remove(0);
        }
        self.warnings.push(warning);
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::core::rainbow::PALETTE;

    const WEB1: &str =
        r#"{"ip":"10.0.0.1","timestamp":"12:00:00","container_name":"web1","content":"started"}"#;

    fn viewer(max_entries: usize) -> LogStreamViewer {
        LogStreamViewer::new(ViewerSettings {
            stream: StreamConfig {
                base_url: "http://127.0.0.1:9".to_string(),
                reconnect_initial: Duration::from_millis(100),
                reconnect_max: Duration::from_millis(200),
            },
            max_entries,
        })
    }

    fn message(data: &str) -> StreamProgress {
        StreamProgress::Event(SseEvent {
            event_type: "message".to_string(),
            data: data.to_string(),
        })
    }

    #[test]
    fn test_message_renders_first_entry() {
        let now = Instant::now();
        let mut v = viewer(10);
        v.handle_progress(message(WEB1), now);
        assert_eq!(v.entries.len(), 1);
        assert_eq!(v.entries.get(0).unwrap().text, "web1 - 12:00:00 - started");
        assert!(v.entries.get(0).unwrap().is_highlighted(now));
        assert_eq!(v.received_count, 1);
    }

    #[test]
    fn test_malformed_payload_is_dropped() {
        let now = Instant::now();
        let mut v = viewer(10);
        v.handle_progress(StreamProgress::Connected { url: "u".into() }, now);
        v.handle_progress(message("{not json"), now);
        v.handle_progress(message(r#"{"ip":"x"}"#), now);
        assert!(v.entries.is_empty());
        assert_eq!(v.malformed_count, 2);
        assert_eq!(v.warnings.len(), 2);
        assert!(v.status_message.starts_with("Record error: Malformed log record"));
        assert!(v.connection.is_connected());

        v.handle_progress(message(WEB1), now);
        assert_eq!(v.entries.len(), 1);
    }

    #[test]
    fn test_other_event_types_ignored() {
        let now = Instant::now();
        let mut v = viewer(10);
        v.handle_progress(
            StreamProgress::Event(SseEvent {
                event_type: "heartbeat".to_string(),
                data: WEB1.to_string(),
                }),
            now,
        );
        assert!(v.entries.is_empty());
        assert_eq!(v.malformed_count, 0);
    }

    #[test]
    fn test_highlight_expires_on_tick() {
        let start = Instant::now();
        let mut v = viewer(10);
        v.on_message(WEB1, start).unwrap();
        v.tick(start + Duration::from_millis(1_000));
        assert!(v.entries.get(0).unwrap().highlight_until.is_some());
        assert!(v.tick(start + Duration::from_millis(2_000)));
        assert!(v.entries.get(0).unwrap().highlight_until.is_none());
    }

    #[test]
    fn test_title_keeps_letters_across_ticks() {
        let start = Instant::now();
        let mut v = viewer(10);
        for s in 0..5 {
            v.tick(start + Duration::from_secs(s));
        }
        let spans = v.title.spans();
        let letters: String = spans.iter().map(|(c, _)| *c).collect();
        assert_eq!(letters, "Unicorn Logs");
        assert!(spans
            .iter()
            .all(|(_, c)| matches!(c, Some(colour) if PALETTE.contains(colour))));
    }

    #[test]
    fn test_error_sets_reconnecting() {
        let now = Instant::now();
        let mut v = viewer(10);
        v.handle_progress(
            StreamProgress::Error {
                message: "connection refused".to_string(),
                retry_in: Duration::from_secs(2),
            },
            now,
        );
        assert!(matches!(v.connection, ConnectionState::Reconnecting { .. }));
        assert_eq!(v.warnings.len(), 1);
        assert!(v.status_message.contains("connection refused"));
    }

    #[test]
    fn test_selection_cleared_on_eviction() {
        let now = Instant::now();
        let mut v = viewer(1);
        let first = v.on_message(WEB1, now).unwrap();
        v.selected_id = Some(first);
        assert!(v.selected_entry().is_some());
        v.on_message(WEB1, now).unwrap();
        assert_eq!(v.selected_id, None);
    }

    #[test]
    fn test_next_wakeup_prefers_highlight_deadline() {
        let start = Instant::now();
        let mut v = viewer(10);
        v.tick(start); // schedules the title at +1s
        v.on_message(WEB1, start).unwrap(); // highlight until +2s
        assert_eq!(v.next_wakeup(start), Some(Duration::from_secs(1)));
        v.tick(start + Duration::from_secs(1));
        assert_eq!(
            v.next_wakeup(start + Duration::from_millis(1_500)),
            Some(Duration::from_millis(500))
        );
    }

    #[test]
    fn test_start_with_invalid_url_reports_error() {
        let mut v = LogStreamViewer::new(ViewerSettings {
            stream: StreamConfig {
                base_url: "not a url".to_string(),
                reconnect_initial: Duration::from_millis(100),
                reconnect_max: Duration::from_millis(200),
            },
            max_entries: 10,
        });
        v.start();
        assert_eq!(v.connection, ConnectionState::Stopped);
        assert!(!v.is_subscribed());
        assert_eq!(v.warnings.len(), 1);
        assert!(v.status_message.starts_with("Stream error: Invalid server URL"));
    }

    #[test]
    fn test_summary_counts_received_and_evicted() {
        let now = Instant::now();
        let mut v = viewer(10);
        assert_eq!(v.summary(), "0/10 entries \u{00b7} 0 received");

        for _ in 0..12 {
            v.on_message(WEB1, now).unwrap();
        }
        v.on_message("{bad", now).unwrap_err();
        let summary = v.summary();
        assert!(
            summary.starts_with("10/10 entries \u{00b7} 12 received \u{00b7} 2 evicted \u{00b7} 1 malformed"),
            "{summary}"
        );
    }

    #[test]
    fn test_warnings_bounded() {
        let mut v = viewer(10);
        for i in 0..(MAX_WARNINGS + 5) {
            v.push_warning(i.to_string());
        }
        assert_eq!(v.warnings.len(), MAX_WARNINGS);
        assert_eq!(v.warnings[0], "5");
    }
}
