use dashboard_business::{Greeting, LogoutCommand, LogoutStatus};
use dashboard_states::StateCtx;
use egui::{RichText, Ui};

use super::avatar;

/// Top bar with the signed-in user and the sign-out button.
pub fn header(ctx: &mut StateCtx, ui: &mut Ui) {
    let greeting = ctx.cached::<Greeting>().cloned().unwrap_or_default();
    let logout = ctx.cached::<LogoutStatus>().copied().unwrap_or_default();

    ui.horizontal(|ui| {
        ui.label(RichText::new("Dashboard").strong().size(18.0));

        ui.with_layout(egui::Layout::right_to_left(egui::Align::Center), |ui| {
            let label = match logout {
                LogoutStatus::Idle => "Sign Out",
                LogoutStatus::SigningOut | LogoutStatus::SignedOut => "Signing out...",
            };
            let button = ui.add_enabled(logout == LogoutStatus::Idle, egui::Button::new(label));
            if button.clicked() {
                log::info!("Sign out requested");
                ctx.enqueue_command::<LogoutCommand>();
            }

            ui.label(RichText::new(&greeting.display_name).strong());
            avatar(ui, &greeting.initial);
        });
    });
}
