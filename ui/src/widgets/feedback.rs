//! Feedback form: text, optional attachment, submit button and notices.

use dashboard_business::feedback::can_submit;
use dashboard_business::{
    AttachmentSlot, FeedbackDraft, Greeting, MimeCategory, SubmissionStatus,
    SubmitFeedbackCommand, remove_attachment,
};
use dashboard_states::StateCtx;
use egui::{RichText, Ui};

use super::avatar;
use crate::state::State;
use crate::utils::colors::{COLOR_BLUE, COLOR_GREEN, COLOR_MUTED, COLOR_RED};
use crate::utils::format_size;

pub const PLACEHOLDER: &str =
    "We'd love to hear your thoughts, suggestions, or any questions you might have...";

pub fn feedback(state: &mut State, ui: &mut Ui) {
    let State { ctx, options, view } = state;
    let initial = ctx
        .cached::<Greeting>()
        .map(|greeting| greeting.initial.clone())
        .unwrap_or_default();

    egui::Frame::group(ui.style()).show(ui, |ui| {
        ui.set_width(ui.available_width());
        ui.horizontal(|ui| {
            avatar(ui, &initial);
            ui.label(RichText::new("Share Your Feedback").strong());
        });

        let draft = &mut ctx.state_mut::<FeedbackDraft>().text;
        ui.add(
            egui::TextEdit::multiline(draft)
                .hint_text(PLACEHOLDER)
                .desired_rows(5)
                .desired_width(f32::INFINITY),
        );

        if options.attachments {
            view.pick_file_requested |= attachment_row(ctx, ui);
        }

        ui.horizontal(|ui| {
            let counter = ctx.state::<FeedbackDraft>().counter_label();
            ui.label(RichText::new(counter).color(COLOR_MUTED).small());

            ui.with_layout(egui::Layout::right_to_left(egui::Align::Center), |ui| {
                submit_button(ctx, ui);
            });
        });

        if let Some(err) = ctx.cached::<SubmissionStatus>().and_then(SubmissionStatus::error) {
            ui.colored_label(COLOR_RED, err.to_string());
        }
    });
}

fn submit_button(ctx: &mut StateCtx, ui: &mut Ui) {
    let status = ctx.cached::<SubmissionStatus>().cloned().unwrap_or_default();
    let enabled = can_submit(
        ctx.state::<FeedbackDraft>(),
        &status,
        ctx.state::<AttachmentSlot>(),
    );

    let mut text = RichText::new(status.button_label());
    if status == SubmissionStatus::Submitted {
        text = text.color(COLOR_GREEN);
    } else if enabled {
        text = text.color(COLOR_BLUE);
    }

    if ui.add_enabled(enabled, egui::Button::new(text)).clicked() {
        ctx.enqueue_command::<SubmitFeedbackCommand>();
    }
}

/// Returns whether the user asked for the file dialog.
fn attachment_row(ctx: &mut StateCtx, ui: &mut Ui) -> bool {
    let slot = ctx.state::<AttachmentSlot>().clone();
    let mut pick = false;
    let mut remove = false;

    ui.horizontal(|ui| match slot.selected() {
        None => {
            pick = ui
                .button("Attach image or video")
                .on_hover_text("Images up to 5 MB, videos up to 20 MB (Ctrl+O)")
                .clicked();
        }
        Some(file) => {
            let kind = match file.category {
                MimeCategory::Video => "Video",
                MimeCategory::Image | MimeCategory::Rejected => "Image",
            };
            ui.label(format!("{kind}: {} ({})", file.name, format_size(file.size_bytes)));
            if slot.is_reading() {
                ui.spinner();
                ui.label(RichText::new("Reading...").color(COLOR_MUTED).small());
            }
            remove = ui.button("Remove").clicked();
        }
    });

    if let Some(notice) = slot.notice() {
        ui.colored_label(COLOR_RED, notice.to_string());
    }

    if remove {
        remove_attachment(ctx);
    }
    pick
}
