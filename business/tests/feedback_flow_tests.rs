//! Submission, cool-down and attachment races against an in-memory transport.

mod common;

use std::sync::Arc;
use std::time::Duration;

use common::{MockTransport, SlowSource, TOKEN, mock_ctx, settle};
use dashboard_business::{
    AttachmentNotice, AttachmentSlot, FeedbackDraft, FileCandidate, MemorySource,
    SubmissionStatus, SubmitError, SubmitFeedbackCommand, ValidationError, remove_attachment,
    select_attachment,
};
use dashboard_states::StateCtx;
use serde_json::json;

fn png(name: &str, size: u64) -> FileCandidate {
    FileCandidate::new(name, Some("image/png".to_owned()), size)
}

async fn drain(ctx: &mut StateCtx) {
    while ctx.task_set_mut().join_next().await.is_some() {}
    settle(ctx);
}

#[tokio::test(start_paused = true)]
async fn successful_submit_cools_down_then_clears_everything() {
    let transport = MockTransport::responding(201);
    let mut ctx = mock_ctx(transport.clone());

    select_attachment(
        &mut ctx,
        &png("dot.png", 3),
        Arc::new(MemorySource::new(b"abc".to_vec())),
    );
    ctx.flush_commands();
    drain(&mut ctx).await;
    assert!(ctx.state::<AttachmentSlot>().encoded().is_some());

    ctx.state_mut::<FeedbackDraft>().text = "Great work!".to_owned();
    ctx.dispatch::<SubmitFeedbackCommand>();
    assert_eq!(*ctx.compute::<SubmissionStatus>(), SubmissionStatus::Submitting);

    tokio::time::sleep(Duration::from_millis(1)).await;
    settle(&mut ctx);
    assert_eq!(*ctx.compute::<SubmissionStatus>(), SubmissionStatus::Submitted);

    let requests = transport.requests();
    assert_eq!(requests.len(), 1);
    assert_eq!(requests[0].bearer.as_deref(), Some(TOKEN));
    assert_eq!(
        transport.json_body(0),
        json!({"text": "Great work!", "fileUrl": "data:image/png;base64,YWJj"})
    );

    // t = 2999ms
    tokio::time::sleep(Duration::from_millis(2998)).await;
    settle(&mut ctx);
    assert_eq!(*ctx.compute::<SubmissionStatus>(), SubmissionStatus::Submitted);
    assert_eq!(ctx.state::<FeedbackDraft>().text, "Great work!");
    assert!(ctx.state::<AttachmentSlot>().selected().is_some());

    // t = 3001ms
    tokio::time::sleep(Duration::from_millis(2)).await;
    settle(&mut ctx);
    assert_eq!(*ctx.compute::<SubmissionStatus>(), SubmissionStatus::Idle);
    assert!(ctx.state::<FeedbackDraft>().text.is_empty());
    assert!(ctx.state::<AttachmentSlot>().selected().is_none());
    assert!(ctx.state::<AttachmentSlot>().encoded().is_none());
}

#[tokio::test(start_paused = true)]
async fn no_second_request_while_submitting_or_cooling_down() {
    let transport = MockTransport::responding(200);
    let mut ctx = mock_ctx(transport.clone());
    ctx.state_mut::<FeedbackDraft>().text = "twice?".to_owned();

    ctx.enqueue_command::<SubmitFeedbackCommand>();
    ctx.enqueue_command::<SubmitFeedbackCommand>();
    ctx.flush_commands();

    tokio::time::sleep(Duration::from_millis(1)).await;
    settle(&mut ctx);
    assert_eq!(*ctx.compute::<SubmissionStatus>(), SubmissionStatus::Submitted);

    ctx.dispatch::<SubmitFeedbackCommand>();
    tokio::time::sleep(Duration::from_millis(3100)).await;
    settle(&mut ctx);

    assert_eq!(transport.requests().len(), 1);
    assert_eq!(*ctx.compute::<SubmissionStatus>(), SubmissionStatus::Idle);
}

#[tokio::test(start_paused = true)]
async fn blank_text_is_a_no_op() {
    let transport = MockTransport::responding(200);
    let mut ctx = mock_ctx(transport.clone());

    select_attachment(
        &mut ctx,
        &png("dot.png", 3),
        Arc::new(MemorySource::new(b"abc".to_vec())),
    );
    ctx.flush_commands();
    drain(&mut ctx).await;

    ctx.state_mut::<FeedbackDraft>().text = "  \n\t ".to_owned();
    ctx.dispatch::<SubmitFeedbackCommand>();
    settle(&mut ctx);

    assert_eq!(ctx.task_count(), 0);
    assert!(transport.requests().is_empty());
    assert_eq!(*ctx.compute::<SubmissionStatus>(), SubmissionStatus::Idle);
    assert_eq!(ctx.state::<FeedbackDraft>().text, "  \n\t ");
}

#[tokio::test(start_paused = true)]
async fn failure_keeps_the_draft_until_a_manual_retry() {
    let transport = MockTransport::responding(500);
    let mut ctx = mock_ctx(transport.clone());
    ctx.state_mut::<FeedbackDraft>().text = "please keep me".to_owned();

    ctx.dispatch::<SubmitFeedbackCommand>();
    drain(&mut ctx).await;

    let status = ctx.compute::<SubmissionStatus>().clone();
    assert!(matches!(
        status,
        SubmissionStatus::Failed(SubmitError::Status { status: 500, .. })
    ));

    tokio::time::sleep(Duration::from_secs(10)).await;
    settle(&mut ctx);
    assert!(matches!(
        ctx.compute::<SubmissionStatus>(),
        SubmissionStatus::Failed(_)
    ));
    assert_eq!(ctx.state::<FeedbackDraft>().text, "please keep me");
    assert_eq!(transport.requests().len(), 1);

    transport.respond_with(201);
    ctx.dispatch::<SubmitFeedbackCommand>();
    assert_eq!(*ctx.compute::<SubmissionStatus>(), SubmissionStatus::Submitting);
    tokio::time::sleep(Duration::from_millis(1)).await;
    settle(&mut ctx);

    assert_eq!(*ctx.compute::<SubmissionStatus>(), SubmissionStatus::Submitted);
    assert_eq!(transport.requests().len(), 2);
    assert_eq!(
        transport.json_body(1),
        json!({"text": "please keep me", "fileUrl": null})
    );
}

#[tokio::test(start_paused = true)]
async fn oversized_image_never_reaches_the_slot() {
    let mut ctx = mock_ctx(MockTransport::responding(200));

    select_attachment(
        &mut ctx,
        &png("huge.png", 6 * 1024 * 1024),
        Arc::new(MemorySource::new(Vec::new())),
    );

    assert_eq!(ctx.pending_commands(), 0);
    let slot = ctx.state::<AttachmentSlot>();
    assert!(slot.selected().is_none());
    assert!(matches!(
        slot.notice(),
        Some(AttachmentNotice::Rejected(ValidationError::ImageTooLarge { .. }))
    ));
}

#[tokio::test(start_paused = true)]
async fn submit_waits_for_the_attachment_to_be_read() {
    let transport = MockTransport::responding(200);
    let mut ctx = mock_ctx(transport.clone());
    ctx.state_mut::<FeedbackDraft>().text = "with a clip".to_owned();

    let slow = SlowSource {
        delay: Duration::from_millis(500),
        bytes: b"abc".to_vec(),
    };
    select_attachment(&mut ctx, &png("dot.png", 3), Arc::new(slow));
    ctx.flush_commands();

    ctx.dispatch::<SubmitFeedbackCommand>();
    assert!(transport.requests().is_empty());
    assert_eq!(*ctx.compute::<SubmissionStatus>(), SubmissionStatus::Idle);
}

#[tokio::test(start_paused = true)]
async fn latest_selection_wins_over_a_slower_earlier_one() {
    let mut ctx = mock_ctx(MockTransport::responding(200));

    let slow = SlowSource {
        delay: Duration::from_millis(500),
        bytes: b"old".to_vec(),
    };
    select_attachment(&mut ctx, &png("first.png", 3), Arc::new(slow));
    ctx.flush_commands();

    select_attachment(
        &mut ctx,
        &png("second.png", 3),
        Arc::new(MemorySource::new(b"abc".to_vec())),
    );
    ctx.flush_commands();

    tokio::time::sleep(Duration::from_secs(1)).await;
    drain(&mut ctx).await;

    let slot = ctx.state::<AttachmentSlot>();
    let encoded = slot.encoded().expect("second selection is encoded");
    assert_eq!(encoded.source_file_name, "second.png");
    assert_eq!(&*encoded.data_uri, "data:image/png;base64,YWJj");
}

#[tokio::test(start_paused = true)]
async fn removing_a_file_discards_its_pending_encoding() {
    let mut ctx = mock_ctx(MockTransport::responding(200));

    let slow = SlowSource {
        delay: Duration::from_millis(500),
        bytes: b"abc".to_vec(),
    };
    select_attachment(&mut ctx, &png("dot.png", 3), Arc::new(slow));
    ctx.flush_commands();
    assert!(ctx.state::<AttachmentSlot>().is_reading());

    remove_attachment(&mut ctx);
    tokio::time::sleep(Duration::from_secs(1)).await;
    drain(&mut ctx).await;

    let slot = ctx.state::<AttachmentSlot>();
    assert!(slot.selected().is_none());
    assert!(slot.encoded().is_none());
    assert!(!slot.is_reading());
}

#[tokio::test(start_paused = true)]
async fn teardown_cancels_the_pending_reset() {
    let transport = MockTransport::responding(200);
    let mut ctx = mock_ctx(transport);
    ctx.state_mut::<FeedbackDraft>().text = "bye".to_owned();

    ctx.dispatch::<SubmitFeedbackCommand>();
    tokio::time::sleep(Duration::from_millis(1)).await;
    settle(&mut ctx);
    assert_eq!(ctx.task_count(), 1);

    ctx.shutdown().await;
    tokio::time::sleep(Duration::from_secs(5)).await;
    settle(&mut ctx);

    assert_eq!(ctx.task_count(), 0);
    assert_eq!(*ctx.compute::<SubmissionStatus>(), SubmissionStatus::Submitted);
    assert_eq!(ctx.state::<FeedbackDraft>().text, "bye");
}

#[tokio::test(start_paused = true)]
async fn file_picked_during_cool_down_survives_the_reset() {
    let transport = MockTransport::responding(201);
    let mut ctx = mock_ctx(transport.clone());
    ctx.state_mut::<FeedbackDraft>().text = "text only".to_owned();

    ctx.dispatch::<SubmitFeedbackCommand>();
    tokio::time::sleep(Duration::from_millis(1)).await;
    settle(&mut ctx);
    assert_eq!(*ctx.compute::<SubmissionStatus>(), SubmissionStatus::Submitted);

    select_attachment(
        &mut ctx,
        &png("later.png", 3),
        Arc::new(MemorySource::new(b"abc".to_vec())),
    );
    ctx.flush_commands();
    tokio::time::sleep(Duration::from_millis(1)).await;
    settle(&mut ctx);
    assert!(ctx.state::<AttachmentSlot>().encoded().is_some());

    tokio::time::sleep(Duration::from_millis(3000)).await;
    settle(&mut ctx);

    assert_eq!(*ctx.compute::<SubmissionStatus>(), SubmissionStatus::Idle);
    assert!(ctx.state::<FeedbackDraft>().text.is_empty());
    let slot = ctx.state::<AttachmentSlot>();
    assert_eq!(slot.selected().map(|f| f.name.as_str()), Some("later.png"));
    assert!(slot.encoded().is_some());
    assert_eq!(transport.requests().len(), 1);
    assert_eq!(transport.json_body(0), json!({"text": "text only", "fileUrl": null}));
}
