// Unicorn Logs - util/error.rs
//
// Typed error hierarchy with context-preserving error chains.
// All errors preserve the causal chain for diagnostic logging.

use std::fmt;
use std::io;
use std::path::PathBuf;

/// Top-level error type for failures surfaced to the user.
/// Errors are categorised by the subsystem that produced them. Config
/// problems are reported as startup warnings instead.
#[derive(Debug)]
pub enum UnicornError {
    /// Event stream subscription failed.
    Stream(StreamError),

    /// A log record payload could not be decoded.
    Record(RecordError),

    /// Export operation failed.
    Export(ExportError),
}

impl fmt::Display for UnicornError {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            Self::Stream(e) => write!(f, "Stream error: {e}"),
            Self::Record(e) => write!(f, "Record error: {e}"),
            Self::Export(e) => write!(f, "Export error: {e}"),
        }
    }
}

impl std::error::Error for UnicornError {
    fn source(&self) -> Option<&(dyn std::error::Error + 'static)> {
        match self {
            Self::Stream(e) => Some(e),
            Self::Record(e) => Some(e),
            Self::Export(e) => Some(e),
        }
    }
}

// ---------------------------------------------------------------------------
// Stream errors
// ---------------------------------------------------------------------------

/// Errors raised by the event stream subscription.
#[derive(Debug)]
pub enum StreamError {
    /// The configured server URL cannot be turned into a stream URL.
    InvalidUrl { url: String, reason: String },

    /// The HTTP request could not be sent or the connection failed.
    Connect { url: String, source: reqwest::Error },

    /// The server answered with a non-success status.
    HttpStatus { url: String, status: u16 },

    /// Reading from an established stream failed.
    Read { url: String, source: io::Error },

    /// A single SSE line exceeded the allowed length.
    LineTooLong { length: usize, max: usize },

    /// The server closed the stream.
    Ended { url: String },
}

impl fmt::Display for StreamError {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            Self::InvalidUrl { url, reason } => {
                write!(f, "Invalid server URL '{url}': {reason}")
            }
            Self::Connect { url, source } => write!(f, "Cannot connect to '{url}': {source}"),
            Self::HttpStatus { url, status } => {
                write!(f, "'{url}' answered with HTTP status {status}")
            }
            Self::Read { url, source } => write!(f, "Read error on '{url}': {source}"),
            Self::LineTooLong { length, max } => write!(
                f,
                "Event line of {length} bytes exceeds maximum of {max} bytes"
            ),
            Self::Ended { url } => write!(f, "Server closed the stream '{url}'"),
        }
    }
}

impl std::error::Error for StreamError {
    fn source(&self) -> Option<&(dyn std::error::Error + 'static)> {
        match self {
            Self::Connect { source, .. } => Some(source),
            Self::Read { source, .. } => Some(source),
            _ => None,
        }
    }
}

impl From<StreamError> for UnicornError {
    fn from(e: StreamError) -> Self {
        Self::Stream(e)
    }
}

// ---------------------------------------------------------------------------
// Record errors
// ---------------------------------------------------------------------------

/// A `message` event payload that is not a valid log record.
#[derive(Debug)]
pub struct RecordError {
    /// Leading part of the offending payload (truncated).
    pub preview: String,
    pub source: serde_json::Error,
}

impl fmt::Display for RecordError {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(
            f,
            "Malformed log record '{}': {}",
            self.preview, self.source
        )
    }
}

impl std::error::Error for RecordError {
    fn source(&self) -> Option<&(dyn std::error::Error + 'static)> {
        Some(&self.source)
    }
}

impl From<RecordError> for UnicornError {
    fn from(e: RecordError) -> Self {
        Self::Record(e)
    }
}

// ---------------------------------------------------------------------------
// Export errors
// ---------------------------------------------------------------------------

/// Errors related to export operations.
#[derive(Debug)]
pub enum ExportError {
    /// I/O error writing the export file.
    Io { path: PathBuf, source: io::Error },

    /// CSV serialisation error.
    Csv { path: PathBuf, source: csv::Error },

    /// JSON serialisation error.
    Json {
        path: PathBuf,
        source: serde_json::Error,
    },
}

impl fmt::Display for ExportError {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            Self::Io { path, source } => {
                write!(f, "Export I/O error '{}': {source}", path.display())
            }
            Self::Csv { path, source } => {
                write!(f, "CSV export error '{}': {source}", path.display())
            }
            Self::Json { path, source } => {
                write!(f, "JSON export error '{}': {source}", path.display())
            }
        }
    }
}

impl std::error::Error for ExportError {
    fn source(&self) -> Option<&(dyn std::error::Error + 'static)> {
        match self {
            Self::Io { source, .. } => Some(source),
            Self::Csv { source, .. } => Some(source),
            Self::Json { source, .. } => Some(source),
        }
    }
}

impl From<ExportError> for UnicornError {
    fn from(e: ExportError) -> Self {
        Self::Export(e)
    }
}

// ---------------------------------------------------------------------------
// Config errors
// ---------------------------------------------------------------------------

/// Errors related to configuration loading.
#[derive(Debug)]
pub enum ConfigError {
    /// TOML parsing failed.
    TomlParse {
        path: PathBuf,
        source: toml::de::Error,
    },

    /// A config value is out of the allowed range.
    ValueOutOfRange {
        field: String,
        value: String,
        expected: String,
    },

    /// I/O error reading config file.
    Io { path: PathBuf, source: io::Error },
}

impl fmt::Display for ConfigError {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            Self::TomlParse { path, source } => {
                write!(f, "Config parse error '{}': {source}", path.display())
            }
            Self::ValueOutOfRange {
                field,
                value,
                expected,
            } => write!(
                f,
                "Config '{field}' = '{value}' is out of range. Expected: {expected}"
            ),
            Self::Io { path, source } => {
                write!(f, "Config I/O error '{}': {source}", path.display())
            }
        }
    }
}

impl std::error::Error for ConfigError {
    fn source(&self) -> Option<&(dyn std::error::Error + 'static)> {
        match self {
            Self::TomlParse { source, .. } => Some(source),
            Self::Io { source, .. } => Some(source),
            _ => None,
        }
    }
}

/// Convenience type alias for Unicorn Logs results.
pub type Result<T> = std::result::Result<T, UnicornError>;
