//! The single attachment slot of the feedback form.
//!
//! Every accepted selection gets a new selection id. Encoding results carry
//! the id they were started for and are discarded if the slot has moved on
//! (replaced, removed, or cleared after a submit) by the time they arrive.

use std::any::Any;
use std::sync::Arc;

use dashboard_states::{Command, CommandFuture, CommandSnapshot, LatestOnlyUpdater, State, StateCtx};
use log::{debug, info, warn};
use tokio_util::sync::CancellationToken;

use super::encoder::{ByteSource, EncodedAttachment, EncodingError, encode};
use super::file_guard::{AcceptedFile, FileCandidate, MimeCategory, ValidationError, validate};

/// The file currently held by the form.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct SelectedFile {
    pub name: String,
    pub size_bytes: u64,
    pub category: MimeCategory,
}

impl From<&AcceptedFile> for SelectedFile {
    fn from(file: &AcceptedFile) -> Self {
        Self {
            name: file.name.clone(),
            size_bytes: file.size_bytes,
            category: file.category,
        }
    }
}

/// An accepted file waiting for [`EncodeAttachmentCommand`].
#[derive(Debug, Clone)]
pub struct PendingFile {
    pub selection: u64,
    pub file: AcceptedFile,
    pub source: Arc<dyn ByteSource>,
}

#[derive(Debug, Clone, PartialEq, Eq)]
pub enum AttachmentNotice {
    Rejected(ValidationError),
    Unreadable(EncodingError),
}

impl std::fmt::Display for AttachmentNotice {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        match self {
            Self::Rejected(err) => err.fmt(f),
            Self::Unreadable(err) => err.fmt(f),
        }
    }
}

#[derive(Debug, Clone, Default)]
pub struct AttachmentSlot {
    selection: u64,
    pending: Option<PendingFile>,
    selected: Option<SelectedFile>,
    encoded: Option<EncodedAttachment>,
    notice: Option<AttachmentNotice>,
}

impl AttachmentSlot {
    pub fn selection(&self) -> u64 {
        self.selection
    }

    pub fn selected(&self) -> Option<&SelectedFile> {
        self.selected.as_ref()
    }

    pub fn encoded(&self) -> Option<&EncodedAttachment> {
        self.encoded.as_ref()
    }

    pub fn notice(&self) -> Option<&AttachmentNotice> {
        self.notice.as_ref()
    }

    pub fn pending(&self) -> Option<&PendingFile> {
        self.pending.as_ref()
    }

    /// A file is held but its bytes are not encoded yet.
    pub fn is_reading(&self) -> bool {
        self.selected.is_some() && self.encoded.is_none()
    }

    /// Validates `candidate` and, if accepted, makes it the held file.
    ///
    /// A rejected candidate only sets the notice; the held file is untouched.
    /// Returns whether encoding has to be started.
    pub fn offer(&mut self, candidate: &FileCandidate, source: Arc<dyn ByteSource>) -> bool {
        self.notice = None;
        match validate(candidate) {
            Ok(file) => {
                self.selection += 1;
                info!(
                    "Attachment {} accepted ({} bytes, selection {})",
                    file.name, file.size_bytes, self.selection
                );
                self.selected = Some(SelectedFile::from(&file));
                self.encoded = None;
                self.pending = Some(PendingFile {
                    selection: self.selection,
                    file,
                    source,
                });
                true
            }
            Err(err) => {
                warn!("Attachment {} rejected: {err}", candidate.name);
                self.notice = Some(AttachmentNotice::Rejected(err));
                false
            }
        }
    }

    /// Drops the held file. An encoding still in flight becomes stale.
    pub fn remove(&mut self) {
        self.clear();
        self.notice = None;
    }

    /// Clears the slot only if it still holds `selection`.
    pub(crate) fn clear_if(&mut self, selection: u64) {
        if self.selection == selection {
            self.clear();
        } else {
            debug!("Keeping selection {}, submitted was {selection}", self.selection);
        }
    }

    fn clear(&mut self) {
        self.selection += 1;
        self.pending = None;
        self.selected = None;
        self.encoded = None;
    }

    fn take_pending(&mut self, selection: u64) {
        if self.pending.as_ref().map(|pending| pending.selection) == Some(selection) {
            self.pending = None;
        }
    }

    fn finish(&mut self, selection: u64, result: Result<EncodedAttachment, EncodingError>) {
        if selection != self.selection {
            debug!(
                "Discarding encoding of selection {selection}, slot is at {}",
                self.selection
            );
            return;
        }
        match result {
            Ok(encoded) => {
                debug!("Attachment {} encoded", encoded.source_file_name);
                self.encoded = Some(encoded);
            }
            Err(err) => {
                warn!("{err}");
                self.selected = None;
                self.encoded = None;
                self.notice = Some(AttachmentNotice::Unreadable(err));
            }
        }
    }
}

impl State for AttachmentSlot {
    fn snapshot(&self) -> Option<Box<dyn Any + Send>> {
        Some(Box::new(self.clone()))
    }
}

/// Offers a file to the slot and queues its encoding when accepted.
pub fn select_attachment(ctx: &mut StateCtx, candidate: &FileCandidate, source: Arc<dyn ByteSource>) {
    if ctx.state_mut::<AttachmentSlot>().offer(candidate, source) {
        ctx.enqueue_command::<EncodeAttachmentCommand>();
    }
}

pub fn remove_attachment(ctx: &mut StateCtx) {
    ctx.state_mut::<AttachmentSlot>().remove();
}

/// Reads the pending file and publishes its data URI.
///
/// A newer run supersedes this one, and a selection change discards the
/// result when it arrives.
#[derive(Debug, Default)]
pub struct EncodeAttachmentCommand;

impl Command for EncodeAttachmentCommand {
    fn accepts(&self, snap: &CommandSnapshot) -> bool {
        snap.state::<AttachmentSlot>().pending().is_some()
    }

    fn run(
        &self,
        snap: CommandSnapshot,
        updater: LatestOnlyUpdater,
        _cancel: CancellationToken,
    ) -> CommandFuture {
        let Some(pending) = snap.state::<AttachmentSlot>().pending().cloned() else {
            return Box::pin(async {});
        };
        let selection = pending.selection;
        updater.update::<AttachmentSlot>(move |slot| slot.take_pending(selection));

        Box::pin(async move {
            let result = encode(&pending.file, pending.source.as_ref()).await;
            updater.update::<AttachmentSlot>(move |slot| slot.finish(selection, result));
        })
    }
}
