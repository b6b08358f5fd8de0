//! The dashboard page.
//!
//! One view serves every variant; [`crate::state::ViewOptions`] decides which
//! sections are shown.

use dashboard_business::Session;
use egui::{RichText, Ui};

use crate::state::State;
use crate::utils::colors::COLOR_MUTED;
use crate::widgets;

pub fn dashboard_page(state: &mut State, ui: &mut Ui) {
    if state.ctx.state::<Session>().is_loading() {
        loading_page(ui);
        return;
    }

    widgets::header(&mut state.ctx, ui);
    ui.separator();

    egui::ScrollArea::vertical()
        .auto_shrink([false, false])
        .show(ui, |ui| {
            widgets::welcome(&state.ctx, ui);
            ui.add_space(12.0);
            widgets::videos(&mut state.ctx, ui, state.options.carousel);
            ui.add_space(12.0);
            widgets::feedback(state, ui);
        });
}

pub fn loading_page(ui: &mut Ui) {
    ui.vertical_centered(|ui| {
        ui.add_space(ui.available_height() / 3.0);
        ui.spinner();
        ui.add_space(12.0);
        ui.label(RichText::new("Loading Dashboard...").strong().size(20.0));
        ui.label(RichText::new("Preparing your analytics experience").color(COLOR_MUTED));
    });
}
