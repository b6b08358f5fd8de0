//! Drag-and-drop of an attachment onto the window.
//!
//! Depending on the backend egui reports a path or hands over the bytes.
//! Only the first dropped file is used.

use std::sync::Arc;

use dashboard_business::{FileCandidate, MemorySource};

use super::PickedFile;
use super::file_picker::picked_from_path;

/// Trait for handling dropped files, so tests can inject drops.
pub trait DropHandler {
    fn take_drop(&self, ctx: &egui::Context) -> Option<PickedFile>;
}

#[derive(Debug, Default)]
pub struct SystemDropHandler;

impl DropHandler for SystemDropHandler {
    fn take_drop(&self, ctx: &egui::Context) -> Option<PickedFile> {
        let dropped_files = ctx.input(|i| i.raw.dropped_files.clone());
        let file = dropped_files.first()?;

        log::trace!(
            target: "dashboard_ui::drop",
            "dropped_files={} first={} has_path={} has_bytes={}",
            dropped_files.len(),
            file.name,
            file.path.is_some(),
            file.bytes.is_some()
        );

        picked_from_drop(file)
    }
}

pub fn picked_from_drop(file: &egui::DroppedFile) -> Option<PickedFile> {
    let mime_type = Some(file.mime.clone()).filter(|mime| !mime.is_empty());

    if let Some(path) = &file.path {
        let mut picked = picked_from_path(path.clone())?;
        picked.candidate.mime_type = mime_type;
        return Some(picked);
    }

    if let Some(bytes) = &file.bytes {
        return Some(PickedFile {
            candidate: FileCandidate::new(file.name.clone(), mime_type, bytes.len() as u64),
            source: Arc::new(MemorySource(Arc::clone(bytes))),
        });
    }

    log::warn!(
        target: "dashboard_ui::drop",
        "dropped_file_missing_path_and_bytes name={}",
        file.name
    );
    None
}
