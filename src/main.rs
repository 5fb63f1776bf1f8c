// Unicorn Logs - main.rs
//
// Application entry point. Handles:
// 1. CLI argument parsing
// 2. Configuration loading (config.toml)
// 3. Logging initialisation (debug mode support)
// 4. eframe GUI launch

#![cfg_attr(not(debug_assertions), windows_subsystem = "windows")]

mod gui;

// Re-export modules from the library crate so that `gui.rs` can use
// `crate::app::...`, `crate::core::...` etc.
pub use unicorn_logs::app;
pub use unicorn_logs::core;
pub use unicorn_logs::platform;
pub use unicorn_logs::ui;
pub use unicorn_logs::util;

use clap::Parser;
use std::time::Duration;

/// Unicorn Logs - live viewer for the log aggregator's event stream.
///
/// Subscribes to `<URL>/stream` and shows every container log line as it
/// arrives, newest first.
#[derive(Parser, Debug)]
#[command(name = "unicorn-logs", version, about)]
struct Cli {
    /// Server base URL (default from config.toml, else http://127.0.0.1:8000).
    url: Option<String>,

    /// Maximum number of entries kept on screen.
    #[arg(short = 'n', long = "max-entries")]
    max_entries: Option<usize>,

    /// Enable debug logging (equivalent to RUST_LOG=debug).
    #[arg(short = 'd', long = "debug")]
    debug: bool,
}

/// Apply theme and font size from config.
fn configure_style(ctx: &egui::Context, dark_mode: bool, font_size: f32) {
    ctx.set_visuals(if dark_mode {
        egui::Visuals::dark()
    } else {
        egui::Visuals::light()
    });
    ctx.style_mut(|style| {
        for (text_style, font) in style.text_styles.iter_mut() {
            if matches!(
                text_style,
                egui::TextStyle::Body | egui::TextStyle::Monospace | egui::TextStyle::Button
            ) {
                font.size = font_size;
            }
        }
    });
}

fn main() {
    let cli = Cli::parse();

    // Config is read before logging so its [logging] level can take effect;
    // its own diagnostics are replayed once the subscriber is up.
    let platform_paths = platform::config::PlatformPaths::resolve();
    let (config, config_warnings) = platform::config::load_config(&platform_paths.config_dir);

    util::logging::init(cli.debug, config.log_level.as_deref());

    tracing::info!(
        version = util::constants::APP_VERSION,
        debug = cli.debug,
        config = %platform_paths.config_file().display(),
        "Unicorn Logs starting"
    );
    for warning in &config_warnings {
        tracing::warn!(warning = %warning, "Configuration warning");
    }

    // CLI beats config beats defaults.
    let server_url = cli.url.clone().unwrap_or_else(|| config.server_url.clone());
    let max_entries = match cli.max_entries {
        Some(n)
            if (util::constants::MIN_MAX_ENTRIES..=util::constants::ABSOLUTE_MAX_ENTRIES)
                .contains(&n) =>
        {
            n
        }
        Some(n) => {
            tracing::warn!(
                requested = n,
                using = config.max_entries,
                "--max-entries out of range; using configured value"
            );
            config.max_entries
        }
        None => config.max_entries,
    };

    let settings = app::viewer::ViewerSettings {
        stream: app::stream::StreamConfig {
            base_url: server_url,
            reconnect_initial: Duration::from_millis(config.reconnect_initial_ms),
            reconnect_max: Duration::from_millis(config.reconnect_max_ms),
        },
        max_entries,
    };

    let mut viewer = app::viewer::LogStreamViewer::new(settings);
    for warning in config_warnings {
        viewer.push_warning(warning);
    }

    let native_options = eframe::NativeOptions {
        viewport: egui::ViewportBuilder::default()
            .with_title(format!(
                "{} v{}",
                util::constants::APP_NAME,
                util::constants::APP_VERSION
            ))
            .with_inner_size([1000.0, 700.0])
            .with_min_inner_size([480.0, 320.0]),
        ..Default::default()
    };

    let dark_mode = config.dark_mode;
    let font_size = config.font_size;
    let result = eframe::run_native(
        util::constants::APP_NAME,
        native_options,
        Box::new(move |cc| {
            configure_style(&cc.egui_ctx, dark_mode, font_size);
            Ok(Box::new(gui::UnicornLogsApp::new(viewer, dark_mode)))
        }),
    );

    if let Err(e) = result {
        tracing::error!(error = %e, "Failed to launch GUI");
        eprintln!("Error: Failed to launch Unicorn Logs GUI: {e}");
        std::process::exit(1);
    }
}
