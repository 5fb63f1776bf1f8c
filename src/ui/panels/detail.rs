// Unicorn Logs - ui/panels/detail.rs
//
// Entry detail pane showing the full record of the selected row.

use crate::app::viewer::LogStreamViewer;

/// Render the detail pane (bottom panel).
pub fn render(ui: &mut egui::Ui, viewer: &LogStreamViewer) {
    if let Some(entry) = viewer.selected_entry() {
        let record = &entry.record;
        egui::Grid::new("detail_grid")
            .num_columns(2)
            .spacing([8.0, 4.0])
            .show(ui, |ui| {
                ui.label("Container:");
                ui.label(&record.container_name);
                ui.end_row();

                ui.label("Timestamp:");
                ui.label(&record.timestamp);
                ui.end_row();

                ui.label("Source IP:");
                ui.label(&record.ip);
                ui.end_row();

                ui.label("Received:");
                ui.label(entry.received_at.format("%Y-%m-%d %H:%M:%S").to_string());
                ui.end_row();
            });

        ui.separator();
        egui::ScrollArea::vertical()
            .max_height(80.0)
            .show(ui, |ui| {
                ui.label(egui::RichText::new(&record.content).monospace());
            });
    } else {
        ui.centered_and_justified(|ui| {
            ui.label("Select an entry to view details.");
        });
    }
}
