#![cfg_attr(not(debug_assertions), windows_subsystem = "windows")]

use dashboard_ui::DashboardApp;
use dashboard_ui::state::State;

mod alloc {
    #[global_allocator]
    static MALLOC: mimalloc::MiMalloc = mimalloc::MiMalloc;
}

fn main() -> anyhow::Result<()> {
    if let Err(err) = dotenvy::dotenv() {
        // a missing .env file is fine
        if !err.not_found() {
            return Err(err.into());
        }
    }

    // Log to stderr (if you run with `RUST_LOG=debug`).
    env_logger::Builder::from_env(env_logger::Env::default().default_filter_or("info"))
        .filter_module("egui_winit::clipboard", log::LevelFilter::Off)
        .init();

    // command futures run here while the UI thread renders
    let runtime = tokio::runtime::Builder::new_multi_thread()
        .enable_all()
        .thread_name("dashboard-worker")
        .build()?;
    let _guard = runtime.enter();

    let state = State::from_env()?;

    let native_options = eframe::NativeOptions {
        viewport: egui::ViewportBuilder::default()
            .with_title("Dashboard")
            .with_inner_size([960.0, 720.0])
            .with_min_inner_size([480.0, 360.0])
            .with_drag_and_drop(true),
        ..Default::default()
    };

    eframe::run_native(
        "Dashboard",
        native_options,
        Box::new(move |_cc| Ok(Box::new(DashboardApp::new(state)))),
    )
    .map_err(|err| anyhow::anyhow!("failed to start the dashboard window: {err}"))
}
