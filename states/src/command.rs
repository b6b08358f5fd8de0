use std::fmt::Debug;
use std::future::Future;
use std::pin::Pin;

use tokio_util::sync::CancellationToken;

use crate::{CommandSnapshot, LatestOnlyUpdater};

pub type CommandFuture = Pin<Box<dyn Future<Output = ()> + Send>>;

/// A user-triggered action, the only place side effects are allowed.
///
/// `run` is called synchronously while the command queue is flushed. Updates it
/// publishes before returning are applied before the next queued command takes
/// its snapshot, which lets a command claim a state (e.g. mark itself in flight)
/// atomically. The returned future is spawned on the context's task set and is
/// dropped when `cancel` fires.
pub trait Command: Send + Sync + Debug + 'static {
    /// Checked against the snapshot before anything else happens on flush.
    ///
    /// A rejected command is skipped: it does not supersede the previous run
    /// of the same command and `run` is not called.
    fn accepts(&self, _snap: &CommandSnapshot) -> bool {
        true
    }

    fn run(
        &self,
        snap: CommandSnapshot,
        updater: LatestOnlyUpdater,
        cancel: CancellationToken,
    ) -> CommandFuture;
}
