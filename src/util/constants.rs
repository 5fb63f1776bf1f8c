// Unicorn Logs - util/constants.rs
//
// Single source of truth for all named constants, limits, and defaults.

// =============================================================================
// Application metadata
// =============================================================================

/// Application display name.
pub const APP_NAME: &str = "Unicorn Logs";

/// Application identifier used for config/data directories.
pub const APP_ID: &str = "UnicornLogs";

/// Current application version (updated by release script).
pub const APP_VERSION: &str = env!("CARGO_PKG_VERSION");

// =============================================================================
// Event stream
// =============================================================================

/// Default base URL of the log aggregator.
pub const DEFAULT_SERVER_URL: &str = "http://127.0.0.1:8000";

/// Path of the server-sent event stream, relative to the base URL.
pub const STREAM_PATH: &str = "/stream";

/// SSE event type carrying log records. Events without an `event:` field
/// default to this type.
pub const MESSAGE_EVENT_TYPE: &str = "message";

/// Timeout for establishing the TCP/TLS connection (the stream itself has no
/// read timeout; it stays open indefinitely).
pub const CONNECT_TIMEOUT_SECS: u64 = 10;

/// Maximum length of a single SSE line in bytes. Longer lines are discarded
/// together with the event they belong to.
pub const MAX_SSE_LINE_BYTES: usize = 1024 * 1024; // 1 MiB

/// Delay before the first reconnect attempt (ms).
pub const DEFAULT_RECONNECT_INITIAL_MS: u64 = 1_000;

/// Upper bound of the exponential reconnect delay (ms).
pub const DEFAULT_RECONNECT_MAX_MS: u64 = 30_000;

/// Minimum user-configurable reconnect delay (ms).
pub const MIN_RECONNECT_MS: u64 = 100;

/// Maximum user-configurable reconnect delay (ms).
pub const MAX_RECONNECT_MS: u64 = 600_000; // 10 min

/// How often the cancel flag is checked while sleeping between reconnects (ms).
pub const STREAM_CANCEL_CHECK_INTERVAL_MS: u64 = 100;

/// How often the UI checks the stream channel while subscribed (ms).
pub const STREAM_UI_POLL_INTERVAL_MS: u64 = 100;

/// Maximum number of stream messages applied by the UI loop per frame.
/// The remainder stays queued for the next frame.
pub const MAX_STREAM_MESSAGES_PER_FRAME: usize = 200;

// =============================================================================
// Entry list
// =============================================================================

/// How long a freshly received entry stays highlighted (ms).
pub const HIGHLIGHT_DURATION_MS: u64 = 2_000;

/// Default cap on the number of displayed entries. Matches the history the
/// aggregator replays to new subscribers.
pub const DEFAULT_MAX_ENTRIES: usize = 1_000;

/// Minimum user-configurable entry cap.
pub const MIN_MAX_ENTRIES: usize = 10;

/// Maximum user-configurable entry cap.
pub const ABSOLUTE_MAX_ENTRIES: usize = 100_000;

/// Maximum number of characters of a malformed payload kept in error messages
/// and debug output.
pub const DEBUG_MAX_PAYLOAD_PREVIEW: usize = 200;

// =============================================================================
// Title animation
// =============================================================================

/// Text of the animated heading.
pub const TITLE_TEXT: &str = "Unicorn Logs";

/// Period of the heading re-colouring tick (ms).
pub const TITLE_TICK_INTERVAL_MS: u64 = 1_000;

// =============================================================================
// UI defaults
// =============================================================================

/// Default UI body font size in points.
pub const DEFAULT_FONT_SIZE: f32 = 14.0;

/// Minimum user-configurable UI font size (points).
pub const MIN_FONT_SIZE: f32 = 10.0;

/// Maximum user-configurable UI font size (points).
pub const MAX_FONT_SIZE: f32 = 24.0;

/// Maximum number of non-fatal warnings kept for display.
pub const MAX_WARNINGS: usize = 100;

// =============================================================================
// Logging
// =============================================================================

/// Default log level.
pub const DEFAULT_LOG_LEVEL: &str = "info";

// =============================================================================
// Configuration
// =============================================================================

/// Configuration file name.
pub const CONFIG_FILE_NAME: &str = "config.toml";
