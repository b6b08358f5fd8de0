//! Native egui front end of the dashboard.

pub mod app;
pub mod pages;
pub mod state;
pub mod utils;
pub mod widgets;

pub use app::DashboardApp;
