use dashboard_states::StateCtx;

use crate::api::TransportState;
use crate::carousel::CarouselWindow;
use crate::config::BusinessConfig;
use crate::feedback::{
    AttachmentSlot, EncodeAttachmentCommand, FeedbackDraft, SubmissionStatus,
    SubmitFeedbackCommand,
};
use crate::session::{Greeting, IdentityState, LogoutCommand, LogoutStatus, Session};

/// Registers everything one dashboard view needs.
///
/// The session is taken from `identity` once, here. Commands only ever see
/// the token through that session.
pub fn build_state_ctx(
    config: BusinessConfig,
    identity: IdentityState,
    transport: TransportState,
) -> StateCtx {
    let mut ctx = StateCtx::new();

    ctx.add_state(Session::from_provider(identity.0.as_ref()));
    ctx.add_state(CarouselWindow::new(config.carousel_videos.clone()));
    ctx.add_state(FeedbackDraft::default());
    ctx.add_state(AttachmentSlot::default());
    ctx.add_state(config);
    ctx.add_state(identity);
    ctx.add_state(transport);

    ctx.record_compute(Greeting::default());
    ctx.record_compute(SubmissionStatus::default());
    ctx.record_compute(LogoutStatus::default());

    ctx.record_command(EncodeAttachmentCommand);
    ctx.record_command(SubmitFeedbackCommand);
    ctx.record_command(LogoutCommand);

    ctx
}
