//! Dashboard core: session context, the feedback pipeline and the carousel.
//!
//! Nothing here renders. Every value lives in a [`dashboard_states::StateCtx`]
//! built by [`build_state_ctx`], so the view and the tests drive the same code.

pub mod api;
pub mod carousel;
mod config;
mod context;
pub mod feedback;
pub mod http;
pub mod session;

pub use api::{ApiRequest, ApiTransport, HttpTransport, TransportState};
pub use carousel::{CarouselWindow, PAGE_SIZE};
pub use config::BusinessConfig;
pub use context::build_state_ctx;
pub use feedback::{
    AttachmentNotice, AttachmentSlot, ByteSource, COOL_DOWN, EncodeAttachmentCommand,
    EncodedAttachment, EncodingError, FeedbackDraft, FeedbackPayload, FileCandidate,
    MemorySource, MimeCategory, PathSource, SelectedFile, SubmissionStatus, SubmitError,
    SubmitFeedbackCommand, ValidationError, remove_attachment, select_attachment,
};
pub use session::{
    Account, EnvIdentity, Greeting, IdentityProvider, IdentityState, LogoutCommand, LogoutError,
    LogoutStatus, Session,
};
