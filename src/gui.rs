// Unicorn Logs - gui.rs
//
// Top-level eframe::App implementation.
// Drives the viewer once per frame and wires together the UI panels.

use crate::app::viewer::LogStreamViewer;
use crate::core::model::ConnectionState;
use crate::ui;
use crate::util::constants::STREAM_UI_POLL_INTERVAL_MS;
use crate::util::error::{ExportError, Result};
use std::path::Path;
use std::time::{Duration, Instant};

/// Export file format chosen from the File menu.
#[derive(Debug, Clone, Copy)]
enum ExportFormat {
    Csv,
    Json,
}

/// The Unicorn Logs application window.
pub struct UnicornLogsApp {
    pub viewer: LogStreamViewer,
    pub dark_mode: bool,
}

impl UnicornLogsApp {
    /// Create the application and open the stream subscription.
    pub fn new(mut viewer: LogStreamViewer, dark_mode: bool) -> Self {
        viewer.start();
        Self { viewer, dark_mode }
    }

    fn export(&mut self, format: ExportFormat) {
        let (label, ext) = match format {
            ExportFormat::Csv => ("CSV", "csv"),
            ExportFormat::Json => ("JSON", "json"),
        };
        let Some(dest) = rfd::FileDialog::new()
            .add_filter(label, &[ext])
            .set_file_name(format!("unicorn-logs.{ext}"))
            .save_file()
        else {
            return;
        };

        match write_export(&self.viewer, format, &dest) {
            Ok(n) => {
                tracing::info!(entries = n, path = %dest.display(), "Export complete");
                self.viewer.status_message = format!("Exported {n} entries to {label}.");
            }
            Err(e) => self.viewer.report(e),
        }
    }
}

/// Write the displayed entries to `dest`, newest first.
fn write_export(viewer: &LogStreamViewer, format: ExportFormat, dest: &Path) -> Result<usize> {
    let file = std::fs::File::create(dest).map_err(|e| ExportError::Io {
        path: dest.to_path_buf(),
        source: e,
    })?;
    let entries = viewer.entries.iter();
    let written = match format {
        ExportFormat::Csv => crate::core::export::export_csv(entries, file, dest)?,
        ExportFormat::Json => crate::core::export::export_json(entries, file, dest)?,
    };
    Ok(written)
}

impl eframe::App for UnicornLogsApp {
    fn update(&mut self, ctx: &egui::Context, _frame: &mut eframe::Frame) {
        let now = Instant::now();

        // Stream messages and timers.
        if self.viewer.poll(now) {
            ctx.request_repaint();
        }
        if let Some(wait) = self.viewer.next_wakeup(now) {
            ctx.request_repaint_after(wait);
        }
        // The channel is filled from another thread; keep looking while
        // subscribed. Also keeps the reconnect countdown current.
        if self.viewer.is_subscribed() {
            ctx.request_repaint_after(Duration::from_millis(STREAM_UI_POLL_INTERVAL_MS));
        }

        // Top menu bar
        egui::TopBottomPanel::top("menu_bar").show(ctx, |ui| {
            egui::menu::bar(ui, |ui| {
                ui.menu_button("File", |ui| {
                    let has_entries = !self.viewer.entries.is_empty();
                    ui.add_enabled_ui(has_entries, |ui| {
                        ui.menu_button("Export", |ui| {
                            if ui.button("Export CSV\u{2026}").clicked() {
                                self.export(ExportFormat::Csv);
                                ui.close_menu();
                            }
                            if ui.button("Export JSON\u{2026}").clicked() {
                                self.export(ExportFormat::Json);
                                ui.close_menu();
                            }
                        });
                    });
                    ui.separator();
                    if ui.button("Exit").clicked() {
                        ctx.send_viewport_cmd(egui::ViewportCommand::Close);
                    }
                });
                ui.menu_button("Stream", |ui| {
                    if ui.button("Reconnect Now").clicked() {
                        self.viewer.start();
                        ui.close_menu();
                    }
                    ui.add_enabled_ui(self.viewer.is_subscribed(), |ui| {
                        if ui.button("Stop").clicked() {
                            self.viewer.stop();
                            ui.close_menu();
                        }
                    });
                    ui.separator();
                    if ui.button("Clear Entries").clicked() {
                        self.viewer.clear();
                        ui.close_menu();
                    }
                    ui.checkbox(&mut self.viewer.auto_scroll, "Auto-scroll to newest");
                });
            });
        });

        // Status bar
        egui::TopBottomPanel::bottom("status_bar").show(ctx, |ui| {
            ui.horizontal(|ui| {
                let (badge, colour) = match self.viewer.connection {
                    ConnectionState::Connected => (" \u{25cf} LIVE ", ui::theme::CONNECTED_COLOUR),
                    ConnectionState::Connecting { .. } | ConnectionState::Reconnecting { .. } => {
                        (" \u{25cb} OFFLINE ", ui::theme::RECONNECTING_COLOUR)
                    }
                    ConnectionState::Idle | ConnectionState::Stopped => {
                        (" \u{25a0} STOPPED ", ui::theme::STOPPED_COLOUR)
                    }
                };
                ui.label(egui::RichText::new(badge).strong().color(colour));
                ui.label(self.viewer.connection.label(now));
                ui.separator();
                ui.label(&self.viewer.status_message);

                if !self.viewer.warnings.is_empty() {
                    let count = self.viewer.warnings.len();
                    ui.label(
                        egui::RichText::new(format!("\u{26a0} {count}"))
                            .color(ui::theme::RECONNECTING_COLOUR),
                    )
                    .on_hover_text(self.viewer.warnings.join("\n"));
                }

                ui.with_layout(egui::Layout::right_to_left(egui::Align::Center), |ui| {
                    ui.label(self.viewer.summary());
                });
            });
        });

        // Detail pane (bottom)
        egui::TopBottomPanel::bottom("detail_pane")
            .resizable(true)
            .default_height(ui::theme::DETAIL_PANE_HEIGHT)
            .show(ctx, |ui| {
                ui::panels::detail::render(ui, &self.viewer);
            });

        // Heading + separator, then the entries list.
        egui::CentralPanel::default().show(ctx, |ui| {
            ui::panels::header::render(ui, &self.viewer, self.dark_mode);
            ui::panels::entries::render(ui, &mut self.viewer, self.dark_mode, now);
        });
    }

    /// Called by eframe when the application window is about to close.
    fn on_exit(&mut self, _gl: Option<&eframe::glow::Context>) {
        self.viewer.stop();
    }
}
