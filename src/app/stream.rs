// Unicorn Logs - app/stream.rs
//
// Event stream subscription: keeps one long-lived `GET /stream` request open
// on a background thread and forwards decoded server-sent events to the UI.
//
// Architecture:
//   - `StreamManager` lives on the UI thread; `run_subscription` runs on a
//     background thread doing blocking reads through reqwest.
//   - An `Arc<AtomicBool>` cancel flag allows the UI to stop the subscription.
//   - Events are sent as `StreamProgress::Event` over an mpsc channel and the
//     UI drains the channel once per frame.
//
// Reconnect policy:
//   - Any connect failure, non-2xx status, read error, or server-side close
//     is reported as `StreamProgress::Error` and retried after a delay.
//   - The delay starts at the configured initial value (or the server's
//     `retry:` field once seen), doubles per consecutive failure, and is capped.
//   - A successful connection resets the delay and the attempt counter.
//   - `Last-Event-ID` is sent on reconnect when the server supplied event IDs.
//
// Cancellation is checked between lines and between sleep slices. A read that
// is blocked on an idle connection cannot be interrupted; stopping also drops
// the receiver, so the thread exits at its next send.

use crate::core::model::StreamProgress;
use crate::core::sse::SseDecoder;
use crate::util::constants::{
    CONNECT_TIMEOUT_SECS, MAX_SSE_LINE_BYTES, MIN_RECONNECT_MS, STREAM_CANCEL_CHECK_INTERVAL_MS,
    STREAM_PATH,
};
use crate::util::error::StreamError;
use std::io::{BufRead, BufReader, Read};
use std::sync::atomic::{AtomicBool, Ordering};
use std::sync::{mpsc, Arc};
use std::time::Duration;

// =============================================================================
// Configuration
// =============================================================================

/// Settings for one subscription.
#[derive(Debug, Clone)]
pub struct StreamConfig {
    /// Server base URL, e.g. `http://127.0.0.1:8000`.
    pub base_url: String,
    /// First reconnect delay.
    pub reconnect_initial: Duration,
    /// Cap for the exponential reconnect delay.
    pub reconnect_max: Duration,
}

/// Build the stream URL from a server base URL.
///
/// Trailing slashes are trimmed and `/stream` is appended unless the URL
/// already points at it.
pub fn stream_url(base_url: &str) -> Result<String, StreamError> {
    let trimmed = base_url.trim().trim_end_matches('/');

    let Some((scheme, rest)) = trimmed.split_once("://") else {
        return Err(StreamError::InvalidUrl {
            url: base_url.to_string(),
            reason: "missing scheme (expected http:// or https://)".to_string(),
        });
    };
    if !scheme.eq_ignore_ascii_case("http") && !scheme.eq_ignore_ascii_case("https") {
        return Err(StreamError::InvalidUrl {
            url: base_url.to_string(),
            reason: format!("unsupported scheme '{scheme}'"),
        });
    }
    if rest.is_empty() {
        return Err(StreamError::InvalidUrl {
            url: base_url.to_string(),
            reason: "missing host".to_string(),
        });
    }

    if trimmed.ends_with(STREAM_PATH) {
        Ok(trimmed.to_string())
    } else {
        Ok(format!("{trimmed}{STREAM_PATH}"))
    }
}

// =============================================================================
// Backoff
// =============================================================================

/// Exponential reconnect delay.
#[derive(Debug, Clone)]
pub struct Backoff {
    initial: Duration,
    max: Duration,
    current: Duration,
}

impl Backoff {
    pub fn new(initial: Duration, max: Duration) -> Self {
        let max = max.max(initial);
        Self {
            initial,
            max,
            current: initial,
        }
    }

    /// Delay to wait now; doubles the next one up to the cap.
    pub fn next_delay(&mut self) -> Duration {
        let delay = self.current;
        self.current = self.current.saturating_mul(2).min(self.max);
        delay
    }

    /// Back to the initial delay after a successful connection.
    pub fn reset(&mut self) {
        self.current = self.initial;
    }

    /// Adopt a server-requested initial delay (`retry:` field), clamped to
    /// `MIN_RECONNECT_MS..=max`.
    pub fn set_initial(&mut self, initial: Duration) {
        let floor = Duration::from_millis(MIN_RECONNECT_MS).min(self.max);
        self.initial = initial.clamp(floor, self.max);
    }
}

// =============================================================================
// StreamManager
// =============================================================================

/// Manages the event stream subscription on a background thread.
///
/// The manager lives on the UI thread and exposes a simple
/// start/stop/poll interface.
pub struct StreamManager {
    /// Channel receiver for the UI to poll stream messages.
    pub progress_rx: Option<mpsc::Receiver<StreamProgress>>,
    /// Cancel flag shared with the background thread.
    cancel_flag: Option<Arc<AtomicBool>>,
}

impl StreamManager {
    pub fn new() -> Self {
        Self {
            progress_rx: None,
            cancel_flag: None,
        }
    }

    /// Start subscribing. A running subscription is stopped first.
    pub fn start(&mut self, config: StreamConfig) -> Result<(), StreamError> {
        let url = stream_url(&config.base_url)?;
        self.stop();

        let (tx, rx) = mpsc::channel();
        let cancel = Arc::new(AtomicBool::new(false));

        self.progress_rx = Some(rx);
        self.cancel_flag = Some(Arc::clone(&cancel));

        tracing::info!(url = %url, "Stream subscription starting");
        std::thread::spawn(move || {
            run_subscription(url, config, tx, cancel);
        });

        Ok(())
    }

    /// Request the background thread to stop.
    pub fn stop(&mut self) {
        if let Some(flag) = &self.cancel_flag {
            flag.store(true, Ordering::SeqCst);
            tracing::info!("Stream subscription stopping");
        }
        self.cancel_flag = None;
        self.progress_rx = None;
    }

    /// Returns `true` if a subscription thread is currently active.
    pub fn is_active(&self) -> bool {
        self.cancel_flag.is_some()
    }

    /// Drain up to `limit` queued messages without blocking.
    pub fn poll_progress(&self, limit: usize) -> Vec<StreamProgress> {
        let mut messages = Vec::new();
        if let Some(ref rx) = self.progress_rx {
            while messages.len() < limit {
                match rx.try_recv() {
                    Ok(msg) => messages.push(msg),
                    Err(_) => break,
                }
            }
        }
        messages
    }
}

impl Default for StreamManager {
    fn default() -> Self {
        Self::new()
    }
}

impl Drop for StreamManager {
    fn drop(&mut self) {
        self.stop();
    }
}

// =============================================================================
// Background subscription
// =============================================================================

/// How a single connection's read loop ended.
enum ReadOutcome {
    Cancelled,
    ReceiverGone,
    Failed(StreamError),
}

/// Background connect/read/reconnect loop.
fn run_subscription(
    url: String,
    config: StreamConfig,
    tx: mpsc::Sender<StreamProgress>,
    cancel: Arc<AtomicBool>,
) {
    macro_rules! send {
        ($msg:expr) => {
            if tx.send($msg).is_err() {
                // UI channel closed; exit silently.
                return;
            }
        };
    }

    let client = match reqwest::blocking::Client::builder()
        .connect_timeout(Duration::from_secs(CONNECT_TIMEOUT_SECS))
        .timeout(None::<Duration>)
        .build()
    {
        Ok(c) => c,
        Err(e) => {
            tracing::error!(error = %e, "Cannot build HTTP client");
            send!(StreamProgress::Error {
                message: format!("Cannot build HTTP client: {e}"),
                retry_in: Duration::ZERO,
            });
            send!(StreamProgress::Stopped);
            return;
        }
    };

    let mut backoff = Backoff::new(config.reconnect_initial, config.reconnect_max);
    let mut last_event_id: Option<String> = None;
    let mut attempt: u32 = 0;

    loop {
        if cancel.load(Ordering::SeqCst) {
            send!(StreamProgress::Stopped);
            return;
        }

        attempt = attempt.saturating_add(1);
        send!(StreamProgress::Connecting {
            url: url.clone(),
            attempt,
        });

        let error = match open_stream(&client, &url, last_event_id.as_deref()) {
            Ok(response) => {
                attempt = 0;
                backoff.reset();
                tracing::info!(url = %url, "Stream connected");
                send!(StreamProgress::Connected { url: url.clone() });

                let mut decoder = SseDecoder::new();
                decoder.set_last_event_id(last_event_id.take());
                let outcome = read_events(response, &mut decoder, &url, &tx, &cancel);
                last_event_id = decoder.last_event_id().map(str::to_string);
                if let Some(retry) = decoder.retry() {
                    backoff.set_initial(retry);
                    backoff.reset();
                }

                match outcome {
                    ReadOutcome::Cancelled => {
                        send!(StreamProgress::Stopped);
                        return;
                    }
                    ReadOutcome::ReceiverGone => return,
                    ReadOutcome::Failed(e) => e,
                }
            }
            Err(e) => e,
        };

        let retry_in = backoff.next_delay();
        tracing::warn!(
            error = %error,
            retry_ms = u64::try_from(retry_in.as_millis()).unwrap_or(u64::MAX),
            "Stream error; will reconnect"
        );
        send!(StreamProgress::Error {
            message: error.to_string(),
            retry_in,
        });

        if !sleep_unless_cancelled(retry_in, &cancel) {
            send!(StreamProgress::Stopped);
            return;
        }
    }
}

/// Send the subscription request and check the status.
fn open_stream(
    client: &reqwest::blocking::Client,
    url: &str,
    last_event_id: Option<&str>,
) -> Result<reqwest::blocking::Response, StreamError> {
    let mut request = client
        .get(url)
        .header("Accept", "text/event-stream")
        .header("Cache-Control", "no-cache");
    if let Some(id) = last_event_id {
        request = request.header("Last-Event-ID", id);
    }

    let response = request.send().map_err(|e| StreamError::Connect {
        url: url.to_string(),
        source: e,
    })?;

    let status = response.status();
    if !status.is_success() {
        return Err(StreamError::HttpStatus {
            url: url.to_string(),
            status: status.as_u16(),
        });
    }
    Ok(response)
}

/// Read lines from an open stream until it fails, ends, or is cancelled.
fn read_events<R: Read>(
    body: R,
    decoder: &mut SseDecoder,
    url: &str,
    tx: &mpsc::Sender<StreamProgress>,
    cancel: &AtomicBool,
) -> ReadOutcome {
    let mut reader = BufReader::new(body);
    let mut buf: Vec<u8> = Vec::with_capacity(1024);
    // Room for a full-length line plus its CRLF terminator.
    let limit = MAX_SSE_LINE_BYTES as u64 + 2;

    loop {
        buf.clear();
        let read = (&mut reader).take(limit).read_until(b'\n', &mut buf);

        if cancel.load(Ordering::SeqCst) {
            return ReadOutcome::Cancelled;
        }

        match read {
            Ok(0) => {
                return ReadOutcome::Failed(StreamError::Ended {
                    url: url.to_string(),
                })
            }
            Ok(_) => {}
            Err(e) => {
                return ReadOutcome::Failed(StreamError::Read {
                    url: url.to_string(),
                    source: e,
                })
            }
        }

        let terminated = buf.last() == Some(&b'\n');
        if terminated {
            buf.pop();
            if buf.last() == Some(&b'\r') {
                buf.pop();
            }
        }

        // Unterminated at the limit means the line continues past it.
        let truncated = !terminated && buf.len() as u64 == limit;
        if truncated || buf.len() > MAX_SSE_LINE_BYTES {
            let err = StreamError::LineTooLong {
                length: buf.len(),
                max: MAX_SSE_LINE_BYTES,
            };
            tracing::warn!(error = %err, "Dropping oversized event");
            decoder.discard_pending();
            if truncated {
                if let Err(e) = skip_line(&mut reader) {
                    return ReadOutcome::Failed(StreamError::Read {
                        url: url.to_string(),
                        source: e,
                    });
                }
            }
            continue;
        }

        let line = String::from_utf8_lossy(&buf);

        if let Some(event) = decoder.feed_line(&line) {
            tracing::debug!(
                event_type = %event.event_type,
                bytes = event.data.len(),
                "Stream event"
            );
            if tx.send(StreamProgress::Event(event)).is_err() {
                return ReadOutcome::ReceiverGone;
            }
        }
    }
}

/// Consume the rest of the current line, including its newline.
fn skip_line<R: BufRead>(reader: &mut R) -> std::io::Result<()> {
    loop {
        let available = reader.fill_buf()?;
        if available.is_empty() {
            return Ok(());
        }
        match available.iter().position(|&b| b == b'\n') {
            Some(pos) => {
                reader.consume(pos + 1);
                return Ok(());
            }
            None => {
                let len = available.len();
                reader.consume(len);
            }
        }
    }
}

/// Sleep for `total`, waking every `STREAM_CANCEL_CHECK_INTERVAL_MS` to check
/// the cancel flag. Returns `false` if cancelled.
fn sleep_unless_cancelled(total: Duration, cancel: &AtomicBool) -> bool {
    let slice = Duration::from_millis(STREAM_CANCEL_CHECK_INTERVAL_MS);
    let mut remaining = total;
    while !remaining.is_zero() {
        if cancel.load(Ordering::SeqCst) {
            return false;
        }
        let step = remaining.min(slice);
        std::thread::sleep(step);
        remaining -= step;
    }
    !cancel.load(Ordering::SeqCst)
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::core::model::SseEvent;

    #[test]
    fn test_stream_url() {
        assert_eq!(
            stream_url("http://127.0.0.1:8000").unwrap(),
            "http://127.0.0.1:8000/stream"
        );
        assert_eq!(
            stream_url("https://logs.example.com/").unwrap(),
            "https://logs.example.com/stream"
        );
        assert_eq!(
            stream_url("http://host/stream").unwrap(),
            "http://host/stream"
        );
        assert!(matches!(
            stream_url("127.0.0.1:8000"),
            Err(StreamError::InvalidUrl { .. })
        ));
        assert!(matches!(
            stream_url("ftp://host"),
            Err(StreamError::InvalidUrl { .. })
        ));
        assert!(matches!(
            stream_url("http://"),
            Err(StreamError::InvalidUrl { .. })
        ));
    }

    #[test]
    fn test_backoff_doubles_caps_and_resets() {
        let mut backoff = Backoff::new(Duration::from_secs(1), Duration::from_secs(5));
        let delays: Vec<u64> = (0..5).map(|_| backoff.next_delay().as_secs()).collect();
        assert_eq!(delays, vec![1, 2, 4, 5, 5]);
        backoff.reset();
        assert_eq!(backoff.next_delay(), Duration::from_secs(1));
    }

    #[test]
    fn test_backoff_server_retry_is_capped() {
        let mut backoff = Backoff::new(Duration::from_secs(1), Duration::from_secs(5));
        backoff.set_initial(Duration::from_secs(60));
        backoff.reset();
        assert_eq!(backoff.next_delay(), Duration::from_secs(5));
    }

    #[test]
    fn test_backoff_server_retry_zero_keeps_floor_and_doubling() {
        let mut decoder = SseDecoder::new();
        assert!(decoder.feed_line("retry: 0").is_none());
        let retry = decoder.retry().unwrap();
        assert_eq!(retry, Duration::ZERO);

        let mut backoff = Backoff::new(Duration::from_secs(1), Duration::from_secs(30));
        backoff.set_initial(retry);
        backoff.reset();
        let delays: Vec<u64> = (0..5)
            .map(|_| backoff.next_delay().as_millis() as u64)
            .collect();
        assert_eq!(delays, vec![100, 200, 400, 800, 1_600]);
    }

    fn collect(body: &[u8]) -> (Vec<SseEvent>, ReadOutcome) {
        let (tx, rx) = mpsc::channel();
        let cancel = AtomicBool::new(false);
        let mut decoder = SseDecoder::new();
        let outcome = read_events(body, &mut decoder, "http://t/stream", &tx, &cancel);
        drop(tx);
        let events = rx
            .iter()
            .filter_map(|m| match m {
                StreamProgress::Event(e) => Some(e),
                _ => None,
            })
            .collect();
        (events, outcome)
    }

    #[test]
    fn test_read_events_until_end() {
        let body = b"data: {\"a\":1}\n\n: ping\n\ndata: two\r\n\r\n";
        let (events, outcome) = collect(body);
        assert_eq!(events.len(), 2);
        assert_eq!(events[1].data, "two");
        assert!(matches!(
            outcome,
            ReadOutcome::Failed(StreamError::Ended { .. })
        ));
    }

    #[test]
    fn test_oversized_line_is_dropped() {
        let mut body = Vec::new();
        body.extend_from_slice(b"data: ");
        body.extend(std::iter::repeat(b'x').take(MAX_SSE_LINE_BYTES + 10));
        body.extend_from_slice(b"\n\ndata: ok\n\n");
        let (events, _) = collect(&body);
        assert_eq!(events.len(), 1);
        assert_eq!(events[0].data, "ok");
    }

    #[test]
    fn test_full_length_crlf_line_is_kept() {
        let mut body = Vec::new();
        body.extend_from_slice(b"data:");
        body.extend(std::iter::repeat(b'x').take(MAX_SSE_LINE_BYTES - 5));
        body.extend_from_slice(b"\r\n\r\ndata: next\n\n");
        let (events, _) = collect(&body);
        assert_eq!(events.len(), 2);
        assert_eq!(events[0].data.len(), MAX_SSE_LINE_BYTES - 5);
        assert_eq!(events[1].data, "next");
    }

    #[test]
    fn test_line_one_byte_over_limit_is_dropped() {
        let mut body = Vec::new();
        body.extend_from_slice(b"data:");
        body.extend(std::iter::repeat(b'x').take(MAX_SSE_LINE_BYTES - 4));
        body.extend_from_slice(b"\n\ndata: next\n\n");
        let (events, _) = collect(&body);
        assert_eq!(events.len(), 1);
        assert_eq!(events[0].data, "next");
    }

    #[test]
    fn test_sleep_unless_cancelled() {
        let cancel = AtomicBool::new(false);
        assert!(sleep_unless_cancelled(Duration::from_millis(5), &cancel));
        cancel.store(true, Ordering::SeqCst);
        assert!(!sleep_unless_cancelled(Duration::from_secs(60), &cancel));
    }
}
