// Unicorn Logs - ui/theme.rs
//
// Colour scheme, style hooks, and layout constants.
// No dependencies on app state or business logic.
//
// Style hooks are named after the classes the stream's web page used:
//   log-entry    -> `log_entry_frame`, `row_text_colour`
//   highlight    -> `highlight_fill`
//   rainbow-text -> `rainbow_font`, `palette_colour`

use crate::core::rainbow::PaletteColour;
use egui::Color32;

/// Scroll area ID of the entries list.
pub const ENTRIES_ID: &str = "entries";

/// Heading colour for a palette entry.
pub fn palette_colour(colour: PaletteColour) -> Color32 {
    match colour {
        PaletteColour::Red => Color32::from_rgb(239, 68, 68),
        PaletteColour::Orange => Color32::from_rgb(249, 115, 22),
        PaletteColour::Yellow => Color32::from_rgb(234, 179, 8),
        PaletteColour::Green => Color32::from_rgb(34, 197, 94),
        PaletteColour::Blue => Color32::from_rgb(59, 130, 246),
        PaletteColour::Indigo => Color32::from_rgb(75, 0, 130),
        PaletteColour::Violet => Color32::from_rgb(238, 130, 238),
    }
}

/// Heading colour before the first animation tick.
pub fn title_plain_colour(dark_mode: bool) -> Color32 {
    if dark_mode {
        Color32::from_rgb(243, 244, 246) // Gray 100
    } else {
        Color32::from_rgb(17, 24, 39) // Gray 900
    }
}

/// Font for the `rainbow-text` heading.
pub fn rainbow_font() -> egui::FontId {
    egui::FontId::proportional(TITLE_FONT_SIZE)
}

/// Foreground colour for entry rows.
pub fn row_text_colour(dark_mode: bool) -> Color32 {
    if dark_mode {
        Color32::from_rgb(229, 231, 235) // Gray 200
    } else {
        Color32::from_rgb(31, 41, 55) // Gray 800
    }
}

/// Fill behind a freshly arrived (`highlight`) entry.
pub fn highlight_fill(dark_mode: bool) -> Color32 {
    if dark_mode {
        Color32::from_rgba_premultiplied(234, 179, 8, 45) // Yellow 500, faint
    } else {
        Color32::from_rgba_premultiplied(253, 224, 71, 110) // Yellow 300
    }
}

/// Fill behind the selected entry.
pub fn selection_fill(dark_mode: bool) -> Color32 {
    if dark_mode {
        Color32::from_rgba_premultiplied(59, 130, 246, 50)
    } else {
        Color32::from_rgba_premultiplied(147, 197, 253, 120)
    }
}

/// Frame of a single `log-entry` row.
pub fn log_entry_frame(fill: Option<Color32>) -> egui::Frame {
    egui::Frame::NONE
        .fill(fill.unwrap_or(Color32::TRANSPARENT))
        .inner_margin(egui::Margin::symmetric(6, 2))
}

/// Status badge colour for the connection state.
pub const CONNECTED_COLOUR: Color32 = Color32::from_rgb(34, 197, 94); // Green 500
pub const RECONNECTING_COLOUR: Color32 = Color32::from_rgb(217, 119, 6); // Amber 600
pub const STOPPED_COLOUR: Color32 = Color32::from_rgb(156, 163, 175); // Gray 400

/// Layout constants.
pub const TITLE_FONT_SIZE: f32 = 32.0;
pub const ROW_HEIGHT: f32 = 20.0;
pub const DETAIL_PANE_HEIGHT: f32 = 140.0;
