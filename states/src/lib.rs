//! Reactive state runtime shared by the dashboard business and view layers.
//!
//! Values live in a [`StateCtx`] keyed by their type. The view reads them
//! synchronously every frame, commands snapshot them and run their side effects
//! as spawned futures, and results flow back through an [`Updater`] channel that
//! is drained once per frame with [`StateCtx::sync_computes`].

mod command;
mod compute;
mod ctx;
mod dep;
mod error;
mod snapshot;
mod state;
mod task;
mod updater;

pub use command::{Command, CommandFuture};
pub use compute::Compute;
pub use ctx::StateCtx;
pub use dep::Dep;
pub use error::StateError;
pub use snapshot::CommandSnapshot;
pub use state::{AsAny, State};
pub use task::{TaskHandle, TaskId};
pub use updater::{LatestOnlyUpdater, Updater};
