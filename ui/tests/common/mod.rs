#![allow(dead_code, reason = "each test binary uses a different subset")]

use std::cell::RefCell;
use std::time::Duration;

use dashboard_ui::DashboardApp;
use dashboard_ui::state::{State, ViewOptions};
use dashboard_ui::utils::PickedFile;
use dashboard_ui::utils::drop_handler::DropHandler;
use dashboard_ui::utils::file_picker::FilePickerHandler;
use egui_kittest::Harness;
use wiremock::MockServer;

pub const ACCOUNT: &str = "Ada Lovelace";

/// Never opens a dialog.
pub struct NoFilePicker;

impl FilePickerHandler for NoFilePicker {
    fn pick_file(&self) -> Option<PickedFile> {
        None
    }
}

/// Hands out queued files as if they had been dropped, one per frame.
#[derive(Default)]
pub struct QueuedDrops {
    files: RefCell<Vec<PickedFile>>,
}

impl QueuedDrops {
    pub fn with(file: PickedFile) -> Self {
        Self {
            files: RefCell::new(vec![file]),
        }
    }
}

impl DropHandler for QueuedDrops {
    fn take_drop(&self, _ctx: &egui::Context) -> Option<PickedFile> {
        self.files.borrow_mut().pop()
    }
}

pub struct TestCtx {
    pub mock_server: MockServer,
    harness: Harness<'static, DashboardApp>,
}

impl TestCtx {
    pub async fn new_app(account: Option<&str>, options: ViewOptions) -> Self {
        Self::with_drops(account, options, QueuedDrops::default()).await
    }

    pub async fn with_drops(
        account: Option<&str>,
        options: ViewOptions,
        drops: QueuedDrops,
    ) -> Self {
        let mock_server = MockServer::start().await;
        let state = State::test(mock_server.uri(), account, options);
        let app = DashboardApp::with_handlers(state, Box::new(NoFilePicker), Box::new(drops));
        let harness = Harness::builder()
            .with_size(egui::vec2(1024.0, 2400.0))
            .build_eframe(|_| app);

        Self {
            mock_server,
            harness,
        }
    }

    pub fn harness_mut(&mut self) -> &mut Harness<'static, DashboardApp> {
        &mut self.harness
    }

    /// Steps frames while giving spawned commands time to run.
    pub async fn run_for(&mut self, millis: u64) {
        let rounds = (millis / 20).max(1);
        for _ in 0..rounds {
            self.harness.step();
            tokio::time::sleep(Duration::from_millis(20)).await;
        }
        self.harness.step();
    }
}
