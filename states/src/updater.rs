use std::any::{Any, TypeId, type_name};

use flume::Sender;
use log::debug;

use crate::{State, TaskId};

type Apply = Box<dyn FnOnce(&mut dyn Any) + Send>;

/// A pending change to one registered value.
pub(crate) struct Update {
    pub(crate) target: TypeId,
    pub(crate) target_name: &'static str,
    pub(crate) origin: Option<TaskId>,
    pub(crate) apply: Apply,
}

impl Update {
    fn set<T: State>(value: T, origin: Option<TaskId>) -> Self {
        Self::update::<T>(move |slot| *slot = value, origin)
    }

    fn update<T: State>(f: impl FnOnce(&mut T) + Send + 'static, origin: Option<TaskId>) -> Self {
        Self {
            target: TypeId::of::<T>(),
            target_name: type_name::<T>(),
            origin,
            apply: Box::new(move |slot: &mut dyn Any| {
                if let Some(slot) = slot.downcast_mut::<T>() {
                    f(slot);
                }
            }),
        }
    }
}

/// Publishes changes to registered states and computes from anywhere.
///
/// Changes are queued and applied in order on the next `StateCtx::sync_computes`.
#[derive(Clone)]
pub struct Updater {
    send: Sender<Update>,
}

impl std::fmt::Debug for Updater {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.debug_struct("Updater")
            .field("pending", &self.send.len())
            .finish()
    }
}

impl Updater {
    pub(crate) fn new(send: Sender<Update>) -> Self {
        Self { send }
    }

    /// Replaces the registered `T`.
    pub fn set<T: State>(&self, value: T) {
        self.push(Update::set(value, None));
    }

    /// Mutates the registered `T` in place once the update is applied.
    pub fn update<T: State>(&self, f: impl FnOnce(&mut T) + Send + 'static) {
        self.push(Update::update(f, None));
    }

    pub(crate) fn push(&self, update: Update) {
        let name = update.target_name;
        if self.send.send(update).is_err() {
            debug!("state context dropped, discarding update for {name}");
        }
    }
}

/// An [`Updater`] bound to one run of a command.
///
/// Its changes are dropped at sync time if the same command was flushed again
/// after this run started, so only the latest run can publish.
#[derive(Clone, Debug)]
pub struct LatestOnlyUpdater {
    inner: Updater,
    origin: TaskId,
}

impl LatestOnlyUpdater {
    pub(crate) fn new(inner: Updater, origin: TaskId) -> Self {
        Self { inner, origin }
    }

    pub fn task_id(&self) -> TaskId {
        self.origin
    }

    pub fn set<T: State>(&self, value: T) {
        self.inner.push(Update::set(value, Some(self.origin)));
    }

    pub fn update<T: State>(&self, f: impl FnOnce(&mut T) + Send + 'static) {
        self.inner.push(Update::update(f, Some(self.origin)));
    }
}
