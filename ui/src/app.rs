use std::time::Duration;

use dashboard_business::{LogoutStatus, select_attachment};
use log::info;

use crate::pages::dashboard_page;
use crate::state::State;
use crate::utils::PickedFile;
use crate::utils::drop_handler::{DropHandler, SystemDropHandler};
use crate::utils::file_picker::{FilePickerHandler, SystemFilePickerHandler, open_shortcut_pressed};

/// How often to repaint while commands are still running.
const TASK_POLL_INTERVAL: Duration = Duration::from_millis(100);

pub struct DashboardApp {
    state: State,
    file_picker: Box<dyn FilePickerHandler>,
    drop_handler: Box<dyn DropHandler>,
}

impl DashboardApp {
    /// Called once before the first frame.
    pub fn new(state: State) -> Self {
        Self::with_handlers(
            state,
            Box::new(SystemFilePickerHandler),
            Box::new(SystemDropHandler),
        )
    }

    pub fn with_handlers(
        state: State,
        file_picker: Box<dyn FilePickerHandler>,
        drop_handler: Box<dyn DropHandler>,
    ) -> Self {
        Self {
            state,
            file_picker,
            drop_handler,
        }
    }

    pub fn state(&self) -> &State {
        &self.state
    }

    pub fn state_mut(&mut self) -> &mut State {
        &mut self.state
    }

    fn collect_attachment(&mut self, ctx: &egui::Context) {
        if !self.state.options.attachments {
            return;
        }

        let requested = std::mem::take(&mut self.state.view.pick_file_requested)
            || open_shortcut_pressed(ctx);
        let picked = self
            .drop_handler
            .take_drop(ctx)
            .or_else(|| requested.then(|| self.file_picker.pick_file()).flatten());

        if let Some(PickedFile { candidate, source }) = picked {
            select_attachment(&mut self.state.ctx, &candidate, source);
        }
    }
}

impl eframe::App for DashboardApp {
    fn update(&mut self, ctx: &egui::Context, _frame: &mut eframe::Frame) {
        // apply what finished since the last frame
        self.state.ctx.sync_computes();

        egui::CentralPanel::default().show(ctx, |ui| {
            dashboard_page(&mut self.state, ui);
        });

        self.collect_attachment(ctx);

        self.state.ctx.flush_commands();
        self.state.ctx.run_computed();

        if self.state.ctx.cached::<LogoutStatus>() == Some(&LogoutStatus::SignedOut) {
            info!("Signed out, closing the dashboard");
            ctx.send_viewport_cmd(egui::ViewportCommand::Close);
        }

        if self.state.ctx.task_count() > 0 {
            ctx.request_repaint_after(TASK_POLL_INTERVAL);
        }
    }
}
