// Unicorn Logs - tests/e2e_stream.rs
//
// End-to-end tests for the stream subscription and config loading.
//
// A real TCP listener plays the log aggregator: it speaks just enough HTTP/1.1
// to serve `text/event-stream` bodies, so the viewer runs through reqwest,
// the SSE decoder, and the entry list exactly as it does in the app.

use std::io::{BufRead, BufReader, Write};
use std::net::{TcpListener, TcpStream};
use std::sync::mpsc;
use std::thread;
use std::time::{Duration, Instant};
use unicorn_logs::app::stream::StreamConfig;
use unicorn_logs::app::viewer::{LogStreamViewer, ViewerSettings};
use unicorn_logs::core::model::ConnectionState;
use unicorn_logs::platform::config::{load_config, AppConfig};

// =============================================================================
// Helpers
// =============================================================================

fn record(container: &str, ts: &str, content: &str) -> String {
    format!(
        r#"{{"ip":"10.0.0.7","timestamp":"{ts}","container_name":"{container}","content":"{content}"}}"#
    )
}

/// Read the request head and return its lines, lower-cased.
fn read_request(stream: &TcpStream) -> Vec<String> {
    let mut reader = BufReader::new(stream);
    let mut lines = Vec::new();
    loop {
        let mut line = String::new();
        if reader.read_line(&mut line).unwrap_or(0) == 0 {
            break;
        }
        let line = line.trim_end().to_string();
        if line.is_empty() {
            break;
        }
        lines.push(line.to_lowercase());
    }
    lines
}

fn write_event_stream(mut stream: &TcpStream, body: &str) {
    let head = "HTTP/1.1 200 OK\r\n\
                Content-Type: text/event-stream\r\n\
                Cache-Control: no-cache\r\n\
                Connection: close\r\n\r\n";
    stream.write_all(head.as_bytes()).unwrap();
    stream.write_all(body.as_bytes()).unwrap();
    stream.flush().unwrap();
}

fn viewer_for(port: u16) -> LogStreamViewer {
    LogStreamViewer::new(ViewerSettings {
        stream: StreamConfig {
            base_url: format!("http://127.0.0.1:{port}"),
            reconnect_initial: Duration::from_millis(100),
            reconnect_max: Duration::from_millis(400),
        },
        max_entries: 50,
    })
}

/// Poll the viewer until `done` holds or the deadline passes.
fn poll_until(viewer: &mut LogStreamViewer, done: impl Fn(&LogStreamViewer) -> bool) -> bool {
    let deadline = Instant::now() + Duration::from_secs(10);
    while Instant::now() < deadline {
        viewer.poll(Instant::now());
        if done(viewer) {
            return true;
        }
        thread::sleep(Duration::from_millis(20));
    }
    false
}

// =============================================================================
// Stream E2E
// =============================================================================

/// Records render newest first, a malformed payload is skipped without
/// dropping the connection, and a closed stream is reconnected with the
/// last event ID.
#[test]
fn e2e_stream_renders_records_and_reconnects() {
    let listener = TcpListener::bind("127.0.0.1:0").unwrap();
    let port = listener.local_addr().unwrap().port();
    let (headers_tx, headers_rx) = mpsc::channel::<Vec<String>>();

    let server = thread::spawn(move || {
        // First connection: two records around a bad payload, then close.
        let (first, _) = listener.accept().unwrap();
        headers_tx.send(read_request(&first)).unwrap();
        let body = format!(
            ": welcome\n\nid: 1\ndata: {}\n\ndata: {{not json\n\nid: 2\ndata: {}\n\n",
            record("web1", "12:00:00", "started"),
            record("db", "12:00:01", "ready"),
        );
        write_event_stream(&first, &body);
        drop(first);

        // Second connection: one more record, held open briefly.
        let (second, _) = listener.accept().unwrap();
        headers_tx.send(read_request(&second)).unwrap();
        let body = format!("id: 3\ndata: {}\n\n", record("web2", "12:00:05", "GET /"));
        write_event_stream(&second, &body);
        thread::sleep(Duration::from_millis(500));
    });

    let mut viewer = viewer_for(port);
    viewer.start();
    assert!(viewer.is_subscribed());

    let rendered = poll_until(&mut viewer, |v| v.entries.len() == 3);
    assert!(rendered, "only {} entries rendered", viewer.entries.len());

    let texts: Vec<&str> = viewer.entries.iter().map(|e| e.text.as_str()).collect();
    assert_eq!(
        texts,
        vec![
            "web2 - 12:00:05 - GET /",
            "db - 12:00:01 - ready",
            "web1 - 12:00:00 - started",
        ]
    );
    assert_eq!(viewer.malformed_count, 1);
    assert_eq!(viewer.received_count, 3);
    assert!(
        viewer.warnings.iter().any(|w| w.contains("closed")),
        "expected a stream-closed warning in {:?}",
        viewer.warnings
    );

    let first_headers = headers_rx.recv().unwrap();
    assert!(first_headers[0].starts_with("get /stream "));
    assert!(first_headers.contains(&"accept: text/event-stream".to_string()));
    assert!(!first_headers.iter().any(|h| h.starts_with("last-event-id")));

    let second_headers = headers_rx.recv().unwrap();
    assert!(
        second_headers.contains(&"last-event-id: 2".to_string()),
        "reconnect headers: {second_headers:?}"
    );

    viewer.stop();
    assert_eq!(viewer.connection, ConnectionState::Stopped);
    assert!(!viewer.is_subscribed());
    server.join().unwrap();
}

/// A non-2xx answer is reported as a connection error and retried.
#[test]
fn e2e_http_error_status_schedules_reconnect() {
    let listener = TcpListener::bind("127.0.0.1:0").unwrap();
    let port = listener.local_addr().unwrap().port();

    let server = thread::spawn(move || {
        let (mut conn, _) = listener.accept().unwrap();
        read_request(&conn);
        conn.write_all(
            b"HTTP/1.1 503 Service Unavailable\r\nContent-Length: 0\r\nConnection: close\r\n\r\n",
        )
        .unwrap();
    });

    let mut viewer = viewer_for(port);
    viewer.start();

    let errored = poll_until(&mut viewer, |v| {
        v.warnings.iter().any(|w| w.contains("HTTP status 503"))
    });
    assert!(errored, "warnings: {:?}", viewer.warnings);
    assert!(viewer.entries.is_empty());

    viewer.stop();
    server.join().unwrap();
}

/// An unreachable server never stops the subscription; it keeps retrying.
#[test]
fn e2e_unreachable_server_keeps_retrying() {
    // Bind then drop to get a port nothing listens on.
    let port = {
        let listener = TcpListener::bind("127.0.0.1:0").unwrap();
        listener.local_addr().unwrap().port()
    };

    let mut viewer = viewer_for(port);
    viewer.start();

    let retried = poll_until(&mut viewer, |v| {
        matches!(v.connection, ConnectionState::Connecting { attempt } if attempt >= 3)
    });
    assert!(retried, "connection state: {:?}", viewer.connection);
    assert!(viewer.is_subscribed());
    assert!(viewer.warnings.len() >= 2);

    viewer.stop();
}

// =============================================================================
// Config E2E
// =============================================================================

#[test]
fn e2e_missing_config_uses_defaults() {
    let dir = tempfile::tempdir().unwrap();
    let (config, warnings) = load_config(dir.path());
    assert_eq!(config, AppConfig::default());
    assert!(warnings.is_empty());
}

#[test]
fn e2e_config_file_is_applied() {
    let dir = tempfile::tempdir().unwrap();
    std::fs::write(
        dir.path().join("config.toml"),
        "[stream]\nurl = \"http://logs.lan:9000\"\n[ui]\nmax_entries = 200\n",
    )
    .unwrap();
    let (config, warnings) = load_config(dir.path());
    assert!(warnings.is_empty(), "{warnings:?}");
    assert_eq!(config.server_url, "http://logs.lan:9000");
    assert_eq!(config.max_entries, 200);
}

#[test]
fn e2e_unparseable_config_warns_and_uses_defaults() {
    let dir = tempfile::tempdir().unwrap();
    std::fs::write(dir.path().join("config.toml"), "[stream\nurl = ").unwrap();
    let (config, warnings) = load_config(dir.path());
    assert_eq!(config, AppConfig::default());
    assert_eq!(warnings.len(), 1);
    assert!(warnings[0].contains("Config parse error"));
}
