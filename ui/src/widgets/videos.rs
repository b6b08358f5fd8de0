use dashboard_business::{BusinessConfig, CarouselWindow};
use dashboard_states::StateCtx;
use egui::{RichText, Ui};
use ustr::Ustr;

use crate::utils::colors::COLOR_MUTED;

pub fn watch_url(video_id: Ustr) -> String {
    format!("https://www.youtube.com/watch?v={video_id}")
}

/// Tutorial link and, if enabled, the paged carousel.
pub fn videos(ctx: &mut StateCtx, ui: &mut Ui, show_carousel: bool) {
    let tutorial = ctx.state::<BusinessConfig>().tutorial_video;

    egui::Frame::group(ui.style()).show(ui, |ui| {
        ui.set_width(ui.available_width());
        ui.label(RichText::new("Getting Started Tutorial").strong());
        ui.hyperlink_to("Watch the tutorial video", watch_url(tutorial));
        ui.label(
            RichText::new("Watch this comprehensive guide to maximize your platform experience")
                .color(COLOR_MUTED)
                .small(),
        );

        if show_carousel {
            ui.separator();
            carousel(ctx.state_mut::<CarouselWindow>(), ui);
        }
    });
}

fn carousel(window: &mut CarouselWindow, ui: &mut Ui) {
    let total = window.items().len();
    if total == 0 {
        return;
    }

    ui.horizontal(|ui| {
        if ui.button("◀").on_hover_text("Previous videos").clicked() {
            window.retreat();
        }

        for (offset, id) in window.visible().iter().enumerate() {
            let number = window.start() + offset + 1;
            ui.hyperlink_to(format!("Video {number}"), watch_url(*id));
        }

        if ui.button("▶").on_hover_text("Next videos").clicked() {
            window.advance();
        }
    });

    let shown = window.visible().len();
    ui.label(
        RichText::new(format!(
            "{}-{} of {total}",
            window.start() + 1,
            window.start() + shown
        ))
        .color(COLOR_MUTED)
        .small(),
    );
}
