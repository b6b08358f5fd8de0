use chrono::{DateTime, Local, TimeZone};
use dashboard_business::Greeting;
use dashboard_states::StateCtx;
use egui::{RichText, Ui};

use crate::utils::colors::{COLOR_BLUE, COLOR_MUTED};

const PARAGRAPHS: [&str; 4] = [
    "We're absolutely delighted to have you join our platform today! Your journey towards \
     data-driven excellence starts right here, and we couldn't be more excited to be part of it.",
    "As you explore the dashboard, you'll discover a world of possibilities designed specifically \
     to streamline your workflow and enhance your decision-making process.",
    "Our team has worked tirelessly to create an experience that not only meets your needs but \
     exceeds your expectations. Everything is at your fingertips, ready to help you achieve your \
     goals more efficiently than ever before.",
    "Below, you'll find a helpful tutorial video that walks you through the essential features. \
     We highly recommend taking a few minutes to watch it.",
];

const CLOSING: &str = "Your feedback matters to us! Feel free to share your thoughts, \
                       suggestions, or any questions in the section below.";

/// `"Monday, January 5, 2026, 09:30 AM"`.
pub fn format_timestamp<Tz: TimeZone>(at: &DateTime<Tz>) -> String
where
    Tz::Offset: std::fmt::Display,
{
    at.format("%A, %B %-d, %Y, %I:%M %p").to_string()
}

pub fn welcome(ctx: &StateCtx, ui: &mut Ui) {
    let first_name = ctx
        .cached::<Greeting>()
        .map(|greeting| greeting.first_name.clone())
        .unwrap_or_default();

    egui::Frame::group(ui.style()).show(ui, |ui| {
        ui.set_width(ui.available_width());
        ui.label(RichText::new(format!("Dear {first_name},")).strong().size(20.0));
        ui.add_space(8.0);

        for paragraph in PARAGRAPHS {
            ui.label(paragraph);
            ui.add_space(4.0);
        }
        ui.label(RichText::new(CLOSING).color(COLOR_BLUE));

        ui.add_space(8.0);
        ui.label(RichText::new(format_timestamp(&Local::now())).color(COLOR_MUTED).small());
    });
}
