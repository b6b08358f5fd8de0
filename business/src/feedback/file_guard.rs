//! Type and size policy for feedback attachments.

use thiserror::Error;

/// Largest accepted image, inclusive.
pub const MAX_IMAGE_BYTES: u64 = 5 * 1024 * 1024;
/// Largest accepted video, inclusive.
pub const MAX_VIDEO_BYTES: u64 = 20 * 1024 * 1024;

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum MimeCategory {
    Image,
    Video,
    Rejected,
}

impl MimeCategory {
    pub fn of(mime_type: &str) -> Self {
        let top_level = mime_type
            .split('/')
            .next()
            .unwrap_or_default()
            .trim()
            .to_ascii_lowercase();
        match top_level.as_str() {
            "image" => Self::Image,
            "video" => Self::Video,
            _ => Self::Rejected,
        }
    }
}

/// Generic type some platforms report when they do not know better.
const OCTET_STREAM: &str = "application/octet-stream";

/// A file offered by the picker or a drop, before any bytes are read.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct FileCandidate {
    pub name: String,
    /// MIME type reported by the environment, if any.
    pub mime_type: Option<String>,
    pub size_bytes: u64,
}

impl FileCandidate {
    pub fn new(name: impl Into<String>, mime_type: Option<String>, size_bytes: u64) -> Self {
        Self {
            name: name.into(),
            mime_type,
            size_bytes,
        }
    }

    /// The reported MIME type, or one guessed from the file extension when
    /// nothing specific was reported.
    pub fn resolved_mime(&self) -> String {
        match self.mime_type.as_deref().map(str::trim) {
            Some(mime) if !mime.is_empty() && !mime.eq_ignore_ascii_case(OCTET_STREAM) => {
                mime.to_owned()
            }
            _ => mime_guess::from_path(&self.name)
                .first_or_octet_stream()
                .essence_str()
                .to_owned(),
        }
    }

    pub fn category(&self) -> MimeCategory {
        MimeCategory::of(&self.resolved_mime())
    }
}

/// A candidate that passed [`validate`].
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct AcceptedFile {
    pub name: String,
    pub mime_type: String,
    pub size_bytes: u64,
    pub category: MimeCategory,
}

#[derive(Debug, Clone, Copy, Error, PartialEq, Eq)]
pub enum ValidationError {
    #[error("Please select an image or video file.")]
    UnsupportedType,
    #[error("Image files must be 5 MB or smaller.")]
    ImageTooLarge { size_bytes: u64 },
    #[error("Video files must be 20 MB or smaller.")]
    VideoTooLarge { size_bytes: u64 },
}

pub fn validate(candidate: &FileCandidate) -> Result<AcceptedFile, ValidationError> {
    let mime_type = candidate.resolved_mime();
    let category = MimeCategory::of(&mime_type);
    let size_bytes = candidate.size_bytes;

    check_size(category, size_bytes)?;

    Ok(AcceptedFile {
        name: candidate.name.clone(),
        mime_type,
        size_bytes,
        category,
    })
}

/// Applies the size limit of `category` to `size_bytes`.
pub fn check_size(category: MimeCategory, size_bytes: u64) -> Result<(), ValidationError> {
    match category {
        MimeCategory::Rejected => Err(ValidationError::UnsupportedType),
        MimeCategory::Image if size_bytes > MAX_IMAGE_BYTES => {
            Err(ValidationError::ImageTooLarge { size_bytes })
        }
        MimeCategory::Video if size_bytes > MAX_VIDEO_BYTES => {
            Err(ValidationError::VideoTooLarge { size_bytes })
        }
        MimeCategory::Image | MimeCategory::Video => Ok(()),
    }
}
