//! Feedback form pipeline: file guard, encoder, attachment slot, submission.

pub mod attachment;
pub mod encoder;
pub mod file_guard;
pub mod status;
pub mod submit;

pub use attachment::{
    AttachmentNotice, AttachmentSlot, EncodeAttachmentCommand, PendingFile, SelectedFile,
    remove_attachment, select_attachment,
};
pub use encoder::{ByteSource, EncodedAttachment, EncodingError, MemorySource, PathSource, encode};
pub use file_guard::{
    AcceptedFile, FileCandidate, MAX_IMAGE_BYTES, MAX_VIDEO_BYTES, MimeCategory, ValidationError,
    check_size, validate,
};
pub use status::{COOL_DOWN, StatusEvent, SubmissionStatus, transition};
pub use submit::{
    FeedbackDraft, FeedbackPayload, SubmitError, SubmitFeedbackCommand, can_submit,
    compose_payload, send_feedback,
};
