//! Native file dialog for choosing a feedback attachment.
//!
//! The dialog is opened from the attach button or with Ctrl+O / Cmd+O. It
//! only collects metadata; the bytes are read later by the encoder.

use std::sync::Arc;

use dashboard_business::{FileCandidate, PathSource};

use super::PickedFile;

/// Extensions offered in the dialog filter. The file guard still has the final say.
pub const MEDIA_EXTENSIONS: &[&str] = &[
    "png", "jpg", "jpeg", "gif", "bmp", "webp", "svg", "mp4", "webm", "mov", "mkv", "avi",
];

/// Trait for file picker operations, so tests can avoid system dialogs.
pub trait FilePickerHandler {
    fn pick_file(&self) -> Option<PickedFile>;
}

/// Whether the open-file shortcut was pressed this frame.
pub fn open_shortcut_pressed(ctx: &egui::Context) -> bool {
    ctx.input(|i| i.key_pressed(egui::Key::O) && i.modifiers.command_only())
}

#[derive(Debug, Default)]
pub struct SystemFilePickerHandler;

impl FilePickerHandler for SystemFilePickerHandler {
    fn pick_file(&self) -> Option<PickedFile> {
        let path = rfd::FileDialog::new()
            .add_filter("Image or video", MEDIA_EXTENSIONS)
            .set_title("Attach an image or video")
            .pick_file()?;

        log::info!("User selected file: {}", path.display());
        picked_from_path(path)
    }
}

/// Builds a candidate for a file on disk without reading its content.
pub fn picked_from_path(path: std::path::PathBuf) -> Option<PickedFile> {
    let size_bytes = match std::fs::metadata(&path) {
        Ok(meta) => meta.len(),
        Err(err) => {
            log::warn!("Failed to stat {}: {err}", path.display());
            return None;
        }
    };
    let name = path
        .file_name()
        .map(|name| name.to_string_lossy().into_owned())
        .unwrap_or_else(|| path.display().to_string());

    Some(PickedFile {
        candidate: FileCandidate::new(name, None, size_bytes),
        source: Arc::new(PathSource(path)),
    })
}
