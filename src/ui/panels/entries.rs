// Unicorn Logs - ui/panels/entries.rs
//
// The `entries` list: one row per received record, newest at the top.
//
// Uses `ScrollArea::show_rows` so only visible rows are laid out. Freshly
// arrived rows get the highlight fill until their deadline passes. While
// auto-scroll is on the view is pinned to the top, where new rows appear.

use crate::app::viewer::LogStreamViewer;
use crate::ui::theme;
use std::time::Instant;

/// Render the entries list (central area).
pub fn render(ui: &mut egui::Ui, viewer: &mut LogStreamViewer, dark_mode: bool, now: Instant) {
    let count = viewer.entries.len();

    if count == 0 {
        ui.centered_and_justified(|ui| {
            if viewer.connection.is_connected() {
                ui.label("Connected. Waiting for log lines\u{2026}");
            } else {
                ui.label(format!("No log lines yet from {}.", viewer.server_url()));
            }
        });
        return;
    }

    // Applied after show_rows so `viewer` is not mutably borrowed while rows
    // hold references into the entry list.
    let mut clicked: Option<u64> = None;

    let mut area = egui::ScrollArea::vertical()
        .id_salt(theme::ENTRIES_ID)
        .auto_shrink([false; 2]);
    if viewer.auto_scroll {
        area = area.vertical_scroll_offset(0.0);
    }

    let text_colour = theme::row_text_colour(dark_mode);
    area.show_rows(ui, theme::ROW_HEIGHT, count, |ui, row_range| {
        for index in row_range {
            let Some(entry) = viewer.entries.get(index) else {
                continue;
            };

            let fill = if viewer.selected_id == Some(entry.id) {
                Some(theme::selection_fill(dark_mode))
            } else if entry.is_highlighted(now) {
                Some(theme::highlight_fill(dark_mode))
            } else {
                None
            };

            theme::log_entry_frame(fill).show(ui, |ui| {
                ui.set_width(ui.available_width());
                let label = egui::Label::new(
                    egui::RichText::new(&entry.text)
                        .monospace()
                        .color(text_colour),
                )
                .truncate()
                .sense(egui::Sense::click());
                if ui.add(label).on_hover_text(entry.text.as_str()).clicked() {
                    clicked = Some(entry.id);
                }
            });
        }
    });

    if let Some(id) = clicked {
        viewer.selected_id = if viewer.selected_id == Some(id) {
            None
        } else {
            Some(id)
        };
    }
}
