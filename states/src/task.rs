//! Identifiers and handles for command tasks.
//!
//! Every flush of a command gets a [`TaskId`] made of the command's `TypeId` and
//! a per-type generation counter. The context keeps one [`TaskHandle`] per
//! command type: flushing the same command again cancels the previous task and
//! makes its [`crate::LatestOnlyUpdater`] stale.

use std::any::TypeId;

use tokio_util::sync::CancellationToken;

#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub struct TaskId {
    type_id: TypeId,
    generation: u64,
}

impl TaskId {
    pub fn new(type_id: TypeId, generation: u64) -> Self {
        Self {
            type_id,
            generation,
        }
    }

    pub fn type_id(&self) -> TypeId {
        self.type_id
    }

    /// Higher generations were flushed later.
    pub fn generation(&self) -> u64 {
        self.generation
    }
}

/// Cancellation handle of a spawned command future.
///
/// Cancelling is cooperative: the context drops the future at its next await
/// point once the token fires.
#[derive(Debug, Clone)]
pub struct TaskHandle {
    id: TaskId,
    cancel_token: CancellationToken,
}

impl TaskHandle {
    pub fn new(id: TaskId, cancel_token: CancellationToken) -> Self {
        Self { id, cancel_token }
    }

    pub fn id(&self) -> TaskId {
        self.id
    }

    pub fn cancellation_token(&self) -> CancellationToken {
        self.cancel_token.clone()
    }

    pub fn cancel(&self) {
        self.cancel_token.cancel();
    }

    pub fn is_cancelled(&self) -> bool {
        self.cancel_token.is_cancelled()
    }
}
