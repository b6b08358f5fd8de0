mod feedback;
mod header;
mod videos;
mod welcome;

pub use feedback::{PLACEHOLDER, feedback};
pub use header::header;
pub use videos::{videos, watch_url};
pub use welcome::{format_timestamp, welcome};

use egui::Ui;

use crate::utils::colors::COLOR_BLUE;

const AVATAR_RADIUS: f32 = 14.0;

/// Round badge with the user's initial.
pub fn avatar(ui: &mut Ui, initial: &str) {
    let (rect, _response) = ui.allocate_exact_size(
        egui::vec2(AVATAR_RADIUS * 2.0, AVATAR_RADIUS * 2.0),
        egui::Sense::hover(),
    );
    ui.painter()
        .circle_filled(rect.center(), AVATAR_RADIUS, COLOR_BLUE);
    ui.painter().text(
        rect.center(),
        egui::Align2::CENTER_CENTER,
        initial,
        egui::FontId::proportional(14.0),
        egui::Color32::WHITE,
    );
}
