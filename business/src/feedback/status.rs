//! Submission status machine.
//!
//! ```text
//! Idle -> Submitting -> Submitted -> (COOL_DOWN) -> Idle
//!                    \-> Failed -> Submitting
//! ```

use std::any::Any;
use std::time::Duration;

use dashboard_states::{Compute, State};
use log::{info, warn};

use super::submit::SubmitError;

/// How long the confirmation stays up after a successful submit.
pub const COOL_DOWN: Duration = Duration::from_millis(3000);

#[derive(Debug, Clone, Default, PartialEq, Eq)]
pub enum SubmissionStatus {
    #[default]
    Idle,
    Submitting,
    Submitted,
    Failed(SubmitError),
}

#[derive(Debug, Clone, PartialEq, Eq)]
pub enum StatusEvent {
    Start,
    Succeeded,
    Failed(SubmitError),
    CoolDownElapsed,
}

/// The state `event` leads to from `status`, or `None` if it is not allowed.
pub fn transition(status: &SubmissionStatus, event: StatusEvent) -> Option<SubmissionStatus> {
    use SubmissionStatus as S;

    match (status, event) {
        (S::Idle | S::Failed(_), StatusEvent::Start) => Some(S::Submitting),
        (S::Submitting, StatusEvent::Succeeded) => Some(S::Submitted),
        (S::Submitting, StatusEvent::Failed(err)) => Some(S::Failed(err)),
        (S::Submitted, StatusEvent::CoolDownElapsed) => Some(S::Idle),
        _ => None,
    }
}

impl SubmissionStatus {
    /// Idle or a failed attempt waiting for a manual retry.
    pub fn can_submit(&self) -> bool {
        matches!(self, Self::Idle | Self::Failed(_))
    }

    pub fn error(&self) -> Option<&SubmitError> {
        match self {
            Self::Failed(err) => Some(err),
            _ => None,
        }
    }

    pub fn button_label(&self) -> &'static str {
        match self {
            Self::Submitting => "Submitting...",
            Self::Submitted => "Submitted!",
            Self::Idle | Self::Failed(_) => "Submit Feedback",
        }
    }

    /// Applies `event` in place. Disallowed events are logged and ignored.
    pub fn apply(&mut self, event: StatusEvent) {
        let label = format!("{event:?}");
        match transition(self, event) {
            Some(next) => {
                info!("Submission status {self:?} -> {next:?}");
                *self = next;
            }
            None => warn!("Ignoring {label} while submission is {self:?}"),
        }
    }
}

impl State for SubmissionStatus {
    fn snapshot(&self) -> Option<Box<dyn Any + Send>> {
        Some(Box::new(self.clone()))
    }
}

impl Compute for SubmissionStatus {}
