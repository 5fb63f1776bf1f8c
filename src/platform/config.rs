// Unicorn Logs - platform/config.rs
//
// Platform-specific configuration directory resolution and config.toml
// loading with startup validation.
//
// Uses the `directories` crate for XDG (Linux), AppData (Windows),
// Library (macOS) compliance.

use crate::util::constants;
use crate::util::error::ConfigError;
use directories::ProjectDirs;
use std::path::{Path, PathBuf};

/// Resolved platform paths for Unicorn Logs configuration.
#[derive(Debug, Clone)]
pub struct PlatformPaths {
    /// Configuration directory (e.g. ~/.config/unicornlogs/ or %APPDATA%\UnicornLogs\config\)
    pub config_dir: PathBuf,
}

impl PlatformPaths {
    /// Resolve platform-appropriate paths.
    ///
    /// Falls back to current directory if platform dirs cannot be determined.
    pub fn resolve() -> Self {
        if let Some(proj_dirs) = ProjectDirs::from("", "", constants::APP_ID) {
            let config_dir = proj_dirs.config_dir().to_path_buf();
            tracing::debug!(config = %config_dir.display(), "Platform paths resolved");
            Self { config_dir }
        } else {
            tracing::warn!("Could not determine platform directories, using current directory");
            Self {
                config_dir: PathBuf::from("."),
            }
        }
    }

    /// Full path of config.toml.
    pub fn config_file(&self) -> PathBuf {
        self.config_dir.join(constants::CONFIG_FILE_NAME)
    }
}

// =============================================================================
// config.toml loading and validation
// =============================================================================

/// Raw deserialisable shape of config.toml.
///
/// Unknown keys are silently ignored for forward compatibility.
#[derive(Debug, Default, serde::Deserialize)]
#[serde(default)]
pub struct RawConfig {
    /// `[stream]` section.
    pub stream: StreamSection,
    /// `[ui]` section.
    pub ui: UiSection,
    /// `[logging]` section.
    pub logging: LoggingSection,
}

/// `[stream]` config section.
#[derive(Debug, Default, serde::Deserialize)]
#[serde(default)]
pub struct StreamSection {
    /// Server base URL.
    pub url: Option<String>,
    /// First reconnect delay in ms.
    pub reconnect_initial_ms: Option<u64>,
    /// Reconnect delay cap in ms.
    pub reconnect_max_ms: Option<u64>,
}

/// `[ui]` config section.
#[derive(Debug, Default, serde::Deserialize)]
#[serde(default)]
pub struct UiSection {
    /// Theme: "dark" or "light".
    pub theme: Option<String>,
    /// Maximum number of displayed entries.
    pub max_entries: Option<usize>,
    /// Body font size in points.
    pub font_size: Option<f32>,
}

/// `[logging]` config section.
#[derive(Debug, Default, serde::Deserialize)]
#[serde(default)]
pub struct LoggingSection {
    /// Log level: "error", "warn", "info", "debug", "trace".
    pub level: Option<String>,
}

/// Validated application configuration derived from `config.toml`.
///
/// Invalid values produce actionable warnings and fall back to defaults.
#[derive(Debug, Clone, PartialEq)]
pub struct AppConfig {
    // -- Stream --
    /// Server base URL.
    pub server_url: String,
    /// First reconnect delay in ms.
    pub reconnect_initial_ms: u64,
    /// Reconnect delay cap in ms.
    pub reconnect_max_ms: u64,

    // -- UI --
    /// Dark mode (true) or light mode (false).
    pub dark_mode: bool,
    /// Maximum number of displayed entries.
    pub max_entries: usize,
    /// Body font size in points.
    pub font_size: f32,

    // -- Logging --
    /// Logging level string (for init before tracing is available).
    pub log_level: Option<String>,
}

impl Default for AppConfig {
    fn default() -> Self {
        Self {
            server_url: constants::DEFAULT_SERVER_URL.to_string(),
            reconnect_initial_ms: constants::DEFAULT_RECONNECT_INITIAL_MS,
            reconnect_max_ms: constants::DEFAULT_RECONNECT_MAX_MS,
            dark_mode: true,
            max_entries: constants::DEFAULT_MAX_ENTRIES,
            font_size: constants::DEFAULT_FONT_SIZE,
            log_level: None,
        }
    }
}

/// Load and validate `config.toml` from the given config directory.
///
/// Returns `AppConfig` with validated values and a list of non-fatal warnings.
/// If the file does not exist, returns defaults with no warnings (first-run).
/// If the file is unreadable or unparseable, returns defaults with a warning
/// so the application still starts but the user is informed.
pub fn load_config(config_dir: &Path) -> (AppConfig, Vec<String>) {
    let config_path = config_dir.join(constants::CONFIG_FILE_NAME);

    if !config_path.exists() {
        tracing::debug!(path = %config_path.display(), "No config.toml found; using defaults");
        return (AppConfig::default(), Vec::new());
    }

    match read_raw_config(&config_path) {
        Ok(raw) => {
            tracing::info!(path = %config_path.display(), "Loaded config.toml");
            validate(raw)
        }
        Err(e) => {
            let msg = format!("{e}. Using defaults.");
            tracing::warn!("{}", msg);
            (AppConfig::default(), vec![msg])
        }
    }
}

/// Read and parse config.toml without validating values.
pub fn read_raw_config(path: &Path) -> Result<RawConfig, ConfigError> {
    let content = std::fs::read_to_string(path).map_err(|e| ConfigError::Io {
        path: path.to_path_buf(),
        source: e,
    })?;
    toml::from_str(&content).map_err(|e| ConfigError::TomlParse {
        path: path.to_path_buf(),
        source: e,
    })
}

/// Validate each field against named constants, accumulating all problems.
pub fn validate(raw: RawConfig) -> (AppConfig, Vec<String>) {
    let mut config = AppConfig::default();
    let mut warnings: Vec<String> = Vec::new();

    let mut out_of_range = |field: &str, value: String, expected: String| {
        warnings.push(format!(
            "{}. Using default.",
            ConfigError::ValueOutOfRange {
                field: field.to_string(),
                value,
                expected,
            }
        ));
    };

    // -- Stream: url --
    if let Some(url) = raw.stream.url {
        let lower = url.trim().to_lowercase();
        if lower.starts_with("http://") || lower.starts_with("https://") {
            config.server_url = url.trim().to_string();
        } else {
            out_of_range("stream.url", url, "an http:// or https:// URL".into());
        }
    }

    // -- Stream: reconnect delays --
    let delay_range = constants::MIN_RECONNECT_MS..=constants::MAX_RECONNECT_MS;
    if let Some(ms) = raw.stream.reconnect_initial_ms {
        if delay_range.contains(&ms) {
            config.reconnect_initial_ms = ms;
        } else {
            out_of_range(
                "stream.reconnect_initial_ms",
                ms.to_string(),
                format!("{}-{}", delay_range.start(), delay_range.end()),
            );
        }
    }
    if let Some(ms) = raw.stream.reconnect_max_ms {
        if delay_range.contains(&ms) && ms >= config.reconnect_initial_ms {
            config.reconnect_max_ms = ms;
        } else {
            out_of_range(
                "stream.reconnect_max_ms",
                ms.to_string(),
                format!(
                    "{}-{} and not below reconnect_initial_ms",
                    config.reconnect_initial_ms,
                    delay_range.end()
                ),
            );
        }
    }

    // -- UI: theme --
    if let Some(ref theme) = raw.ui.theme {
        match theme.to_lowercase().as_str() {
            "dark" => config.dark_mode = true,
            "light" => config.dark_mode = false,
            other => out_of_range("ui.theme", other.to_string(), "\"dark\" or \"light\"".into()),
        }
    }

    // -- UI: max_entries --
    if let Some(n) = raw.ui.max_entries {
        if (constants::MIN_MAX_ENTRIES..=constants::ABSOLUTE_MAX_ENTRIES).contains(&n) {
            config.max_entries = n;
        } else {
            out_of_range(
                "ui.max_entries",
                n.to_string(),
                format!(
                    "{}-{}",
                    constants::MIN_MAX_ENTRIES,
                    constants::ABSOLUTE_MAX_ENTRIES
                ),
            );
        }
    }

    // -- UI: font_size --
    if let Some(size) = raw.ui.font_size {
        if (constants::MIN_FONT_SIZE..=constants::MAX_FONT_SIZE).contains(&size) {
            config.font_size = size;
        } else {
            out_of_range(
                "ui.font_size",
                size.to_string(),
                format!("{}-{}", constants::MIN_FONT_SIZE, constants::MAX_FONT_SIZE),
            );
        }
    }

    // -- Logging: level --
    if let Some(ref level) = raw.logging.level {
        let valid = ["error", "warn", "info", "debug", "trace"];
        if valid.contains(&level.to_lowercase().as_str()) {
            config.log_level = Some(level.to_lowercase());
        } else {
            out_of_range(
                "logging.level",
                level.clone(),
                "error, warn, info, debug, trace".into(),
            );
        }
    }

    if !warnings.is_empty() {
        tracing::warn!(
            count = warnings.len(),
            "Config validation produced warnings"
        );
    }

    (config, warnings)
}

#[cfg(test)]
mod tests {
    use super::*;

    fn parse(text: &str) -> (AppConfig, Vec<String>) {
        validate(toml::from_str(text).unwrap())
    }

    #[test]
    fn test_empty_config_is_default() {
        let (config, warnings) = parse("");
        assert_eq!(config, AppConfig::default());
        assert!(warnings.is_empty());
    }

    #[test]
    fn test_valid_values_applied() {
        let (config, warnings) = parse(
            r#"
            [stream]
            url = "https://logs.internal:8443"
            reconnect_initial_ms = 500
            reconnect_max_ms = 8000

            [ui]
            theme = "Light"
            max_entries = 250
            font_size = 16.0

            [logging]
            level = "DEBUG"
            "#,
        );
        assert!(warnings.is_empty(), "{warnings:?}");
        assert_eq!(config.server_url, "https://logs.internal:8443");
        assert_eq!(config.reconnect_initial_ms, 500);
        assert_eq!(config.reconnect_max_ms, 8_000);
        assert!(!config.dark_mode);
        assert_eq!(config.max_entries, 250);
        assert_eq!(config.log_level.as_deref(), Some("debug"));
    }

    #[test]
    fn test_out_of_range_values_fall_back() {
        let (config, warnings) = parse(
            r#"
            [stream]
            url = "localhost:8000"
            reconnect_initial_ms = 5
            [ui]
            theme = "neon"
            max_entries = 1
            font_size = 99.0
            [logging]
            level = "loud"
            "#,
        );
        assert_eq!(config, AppConfig::default());
        assert_eq!(warnings.len(), 6, "{warnings:?}");
        assert!(warnings.iter().any(|w| w.contains("ui.max_entries")));
    }

    #[test]
    fn test_max_below_initial_rejected() {
        let (config, warnings) = parse(
            "[stream]\nreconnect_initial_ms = 5000\nreconnect_max_ms = 1000\n",
        );
        assert_eq!(config.reconnect_initial_ms, 5_000);
        assert_eq!(config.reconnect_max_ms, constants::DEFAULT_RECONNECT_MAX_MS);
        assert_eq!(warnings.len(), 1);
    }

    #[test]
    fn test_unknown_keys_ignored() {
        let (_, warnings) = parse("[future]\nflag = true\n[ui]\nsparkles = 3\n");
        assert!(warnings.is_empty());
    }
}
