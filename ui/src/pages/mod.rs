mod dashboard_page;

pub use dashboard_page::{dashboard_page, loading_page};
