pub mod colors;
pub mod drop_handler;
pub mod file_picker;

use std::sync::Arc;

use dashboard_business::{ByteSource, FileCandidate};

/// A file chosen by the user, not yet validated.
#[derive(Debug, Clone)]
pub struct PickedFile {
    pub candidate: FileCandidate,
    pub source: Arc<dyn ByteSource>,
}

/// Human readable size, e.g. `"1.5 MB"`.
pub fn format_size(bytes: u64) -> String {
    const KB: f64 = 1024.0;
    const MB: f64 = KB * 1024.0;

    let value = bytes as f64;
    if value >= MB {
        format!("{:.1} MB", value / MB)
    } else if value >= KB {
        format!("{:.1} KB", value / KB)
    } else {
        format!("{bytes} B")
    }
}
