//! Composing and sending feedback.

use std::any::Any;
use std::sync::Arc;

use dashboard_states::{Command, CommandFuture, CommandSnapshot, LatestOnlyUpdater, State};
use log::{debug, info, warn};
use serde::Serialize;
use thiserror::Error;
use tokio_util::sync::CancellationToken;

use super::attachment::AttachmentSlot;
use super::encoder::EncodedAttachment;
use super::status::{COOL_DOWN, StatusEvent, SubmissionStatus};
use crate::BusinessConfig;
use crate::api::{ApiRequest, ApiTransport, TransportState};
use crate::http::Method;
use crate::session::Session;

/// The text the user is typing.
#[derive(Debug, Clone, Default, PartialEq, Eq)]
pub struct FeedbackDraft {
    pub text: String,
}

impl FeedbackDraft {
    pub fn new(text: impl Into<String>) -> Self {
        Self { text: text.into() }
    }

    pub fn is_blank(&self) -> bool {
        self.text.trim().is_empty()
    }

    pub fn char_count(&self) -> usize {
        self.text.chars().count()
    }

    /// `"{n} characters"`, or a prompt while empty.
    pub fn counter_label(&self) -> String {
        match self.char_count() {
            0 => "Start typing...".to_owned(),
            n => format!("{n} characters"),
        }
    }
}

impl State for FeedbackDraft {
    fn snapshot(&self) -> Option<Box<dyn Any + Send>> {
        Some(Box::new(self.clone()))
    }
}

/// Body of the message-creation request.
#[derive(Debug, Clone, PartialEq, Eq, Serialize)]
pub struct FeedbackPayload {
    pub text: String,
    #[serde(rename = "fileUrl")]
    pub file_url: Option<String>,
}

/// `None` when there is nothing to send.
pub fn compose_payload(
    draft: &FeedbackDraft,
    attachment: Option<&EncodedAttachment>,
) -> Option<FeedbackPayload> {
    let text = draft.text.trim();
    if text.is_empty() {
        return None;
    }
    Some(FeedbackPayload {
        text: text.to_owned(),
        file_url: attachment.map(|encoded| encoded.data_uri.to_string()),
    })
}

#[derive(Debug, Clone, Error, PartialEq, Eq)]
pub enum SubmitError {
    #[error("Could not reach the server: {0}")]
    Transport(String),
    #[error("The server rejected your feedback (status {status}).")]
    Status { status: u16, body: String },
    #[error("Could not prepare your feedback: {0}")]
    Serialize(String),
}

/// Posts `payload` once. There is no retry.
pub async fn send_feedback(
    transport: &dyn ApiTransport,
    url: String,
    token: Option<&str>,
    payload: &FeedbackPayload,
) -> Result<(), SubmitError> {
    let body = serde_json::to_vec(payload).map_err(|err| SubmitError::Serialize(err.to_string()))?;
    let request = ApiRequest::new(Method::Post, url)
        .with_json_body(body)
        .with_bearer(token);

    let response = transport
        .send(request)
        .await
        .map_err(|err| SubmitError::Transport(err.message))?;

    if response.is_success() {
        Ok(())
    } else {
        Err(SubmitError::Status {
            status: response.status,
            body: response.text(),
        })
    }
}

/// Whether a submit click would do anything right now.
///
/// Blank text, an attempt in flight or cooling down, and an attachment that is
/// still being read all turn the click into a no-op.
pub fn can_submit(
    draft: &FeedbackDraft,
    status: &SubmissionStatus,
    attachment: &AttachmentSlot,
) -> bool {
    !draft.is_blank() && status.can_submit() && !attachment.is_reading()
}

/// Sends the draft and drives [`SubmissionStatus`].
///
/// On success the status shows `Submitted` for [`COOL_DOWN`], then the draft
/// and the submitted attachment are cleared and the status returns to `Idle`.
/// A file selected after the submit started is kept. The wait
/// is part of the command task, so tearing down the context cancels it.
#[derive(Debug, Default)]
pub struct SubmitFeedbackCommand;

impl Command for SubmitFeedbackCommand {
    fn accepts(&self, snap: &CommandSnapshot) -> bool {
        can_submit(
            snap.state::<FeedbackDraft>(),
            snap.compute::<SubmissionStatus>(),
            snap.state::<AttachmentSlot>(),
        )
    }

    fn run(
        &self,
        snap: CommandSnapshot,
        updater: LatestOnlyUpdater,
        _cancel: CancellationToken,
    ) -> CommandFuture {
        let draft = snap.state::<FeedbackDraft>();
        let attachment = snap.state::<AttachmentSlot>();
        let submitted_selection = attachment.selection();
        let Some(payload) = compose_payload(draft, attachment.encoded()) else {
            return Box::pin(async {});
        };
        let url = snap.state::<BusinessConfig>().create_message_url();
        let token = snap.state::<Session>().access_token.clone();
        let transport: Arc<dyn ApiTransport> = snap.state::<TransportState>().transport();

        updater.update::<SubmissionStatus>(|status| status.apply(StatusEvent::Start));

        Box::pin(async move {
            info!(
                "Submitting feedback ({} characters, attachment: {})",
                payload.text.chars().count(),
                payload.file_url.is_some()
            );

            match send_feedback(transport.as_ref(), url, token.as_deref(), &payload).await {
                Ok(()) => {
                    updater.update::<SubmissionStatus>(|status| {
                        status.apply(StatusEvent::Succeeded);
                    });

                    tokio::time::sleep(COOL_DOWN).await;

                    debug!("Cool-down elapsed, clearing the draft");
                    updater.update::<FeedbackDraft>(|draft| draft.text.clear());
                    updater.update::<AttachmentSlot>(move |slot| {
                        slot.clear_if(submitted_selection);
                    });
                    updater.update::<SubmissionStatus>(|status| {
                        status.apply(StatusEvent::CoolDownElapsed);
                    });
                }
                Err(err) => {
                    warn!("Feedback submission failed: {err}");
                    updater.update::<SubmissionStatus>(move |status| {
                        status.apply(StatusEvent::Failed(err));
                    });
                }
            }
        })
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn payload_without_attachment_serializes_a_null_file_url() {
        let payload = compose_payload(&FeedbackDraft::new("  Great work!\n"), None)
            .expect("text is not blank");

        assert_eq!(
            serde_json::to_string(&payload).expect("payload serializes"),
            r#"{"text":"Great work!","fileUrl":null}"#
        );
    }

    #[test]
    fn payload_carries_the_data_uri() {
        let encoded = EncodedAttachment {
            data_uri: "data:image/png;base64,YWJj".into(),
            source_file_name: "dot.png".to_owned(),
        };
        let payload = compose_payload(&FeedbackDraft::new("see attached"), Some(&encoded))
            .expect("text is not blank");

        assert_eq!(payload.file_url.as_deref(), Some("data:image/png;base64,YWJj"));
    }

    #[test]
    fn blank_text_composes_nothing_even_with_an_attachment() {
        let encoded = EncodedAttachment {
            data_uri: "data:image/png;base64,".into(),
            source_file_name: "dot.png".to_owned(),
        };
        assert_eq!(compose_payload(&FeedbackDraft::new(" \t\n"), Some(&encoded)), None);
        assert_eq!(compose_payload(&FeedbackDraft::default(), None), None);
    }

    #[test]
    fn counter_label_counts_characters() {
        assert_eq!(FeedbackDraft::default().counter_label(), "Start typing...");
        assert_eq!(FeedbackDraft::new("héllo").counter_label(), "5 characters");
        assert_eq!(FeedbackDraft::new(" ").counter_label(), "1 characters");
    }

    #[test]
    fn submit_is_gated_on_text_status_and_reading() {
        let draft = FeedbackDraft::new("hi");
        let idle = SubmissionStatus::Idle;
        let empty = AttachmentSlot::default();

        assert!(can_submit(&draft, &idle, &empty));
        assert!(!can_submit(&FeedbackDraft::new("  "), &idle, &empty));
        assert!(!can_submit(&draft, &SubmissionStatus::Submitting, &empty));
        assert!(!can_submit(&draft, &SubmissionStatus::Submitted, &empty));
    }
}
