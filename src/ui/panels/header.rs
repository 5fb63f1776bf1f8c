// Unicorn Logs - ui/panels/header.rs
//
// Decorative heading ("Unicorn Logs") with per-character colours from the
// latest animation tick, followed by a horizontal separator.

use crate::app::viewer::LogStreamViewer;
use crate::ui::theme;
use egui::text::{LayoutJob, TextFormat};

/// Render the heading and separator at the top of the window.
pub fn render(ui: &mut egui::Ui, viewer: &LogStreamViewer, dark_mode: bool) {
    let font = theme::rainbow_font();
    let plain = theme::title_plain_colour(dark_mode);

    let mut job = LayoutJob::default();
    let mut buf = [0u8; 4];
    for (ch, colour) in viewer.title.spans() {
        job.append(
            ch.encode_utf8(&mut buf),
            0.0,
            TextFormat {
                font_id: font.clone(),
                color: colour.map(theme::palette_colour).unwrap_or(plain),
                ..Default::default()
            },
        );
    }

    ui.vertical_centered(|ui| {
        ui.label(job);
    });
    ui.separator();
}
