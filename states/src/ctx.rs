use std::any::{Any, TypeId, type_name};
use std::collections::{BTreeMap, BTreeSet, VecDeque};

use flume::{Receiver, Sender};
use log::{debug, trace, warn};
use tokio::task::JoinSet;
use tokio_util::sync::CancellationToken;

use crate::updater::Update;
use crate::{
    Command, CommandSnapshot, Compute, Dep, LatestOnlyUpdater, State, StateError, TaskHandle,
    TaskId, Updater,
};

/// Registry of every state, compute and command of one view instance.
///
/// Frame loop:
/// 1. `sync_computes` applies everything async work published.
/// 2. The view reads values and mutates states, enqueueing commands.
/// 3. `flush_commands` runs queued commands and spawns their futures.
/// 4. `run_computed` re-derives computes whose dependencies changed.
///
/// Dropping the context cancels every outstanding task.
pub struct StateCtx {
    states: BTreeMap<TypeId, Box<dyn State>>,
    computes: BTreeMap<TypeId, Box<dyn Compute>>,
    commands: BTreeMap<TypeId, Box<dyn Command>>,

    queue: VecDeque<(TypeId, &'static str)>,
    send: Sender<Update>,
    recv: Receiver<Update>,

    // types changed since the last `run_computed`
    dirty: BTreeSet<TypeId>,
    // computes that have never run
    fresh: BTreeSet<TypeId>,

    generations: BTreeMap<TypeId, u64>,
    handles: BTreeMap<TypeId, TaskHandle>,
    tasks: JoinSet<()>,
}

impl Default for StateCtx {
    fn default() -> Self {
        Self::new()
    }
}

impl std::fmt::Debug for StateCtx {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.debug_struct("StateCtx")
            .field("states", &self.states.len())
            .field("computes", &self.computes.len())
            .field("commands", &self.commands.len())
            .field("queued", &self.queue.len())
            .field("tasks", &self.tasks.len())
            .finish()
    }
}

impl StateCtx {
    pub fn new() -> Self {
        let (send, recv) = flume::unbounded();
        Self {
            states: BTreeMap::new(),
            computes: BTreeMap::new(),
            commands: BTreeMap::new(),
            queue: VecDeque::new(),
            send,
            recv,
            dirty: BTreeSet::new(),
            fresh: BTreeSet::new(),
            generations: BTreeMap::new(),
            handles: BTreeMap::new(),
            tasks: JoinSet::new(),
        }
    }

    pub fn add_state<T: State>(&mut self, state: T) {
        let id = TypeId::of::<T>();
        self.states.insert(id, Box::new(state));
        self.dirty.insert(id);
    }

    pub fn record_compute<T: Compute>(&mut self, compute: T) {
        let id = TypeId::of::<T>();
        self.computes.insert(id, Box::new(compute));
        self.fresh.insert(id);
        self.dirty.insert(id);
    }

    pub fn record_command<T: Command>(&mut self, command: T) {
        self.commands.insert(TypeId::of::<T>(), Box::new(command));
    }

    pub fn try_state<T: State>(&self) -> Result<&T, StateError> {
        self.states
            .get(&TypeId::of::<T>())
            .and_then(|value| (**value).as_any().downcast_ref::<T>())
            .ok_or_else(|| StateError::state_not_found(type_name::<T>(), "StateCtx::state"))
    }

    /// # Panics
    /// Panics if `T` was never registered with `add_state`.
    pub fn state<T: State>(&self) -> &T {
        match self.try_state::<T>() {
            Ok(value) => value,
            Err(err) => panic!("{err}"),
        }
    }

    /// Mutable access for the view. Marks `T` as changed.
    ///
    /// # Panics
    /// Panics if `T` was never registered with `add_state`.
    pub fn state_mut<T: State>(&mut self) -> &mut T {
        let id = TypeId::of::<T>();
        self.dirty.insert(id);
        match self
            .states
            .get_mut(&id)
            .and_then(|value| (**value).as_any_mut().downcast_mut::<T>())
        {
            Some(value) => value,
            None => panic!(
                "{}",
                StateError::state_not_found(type_name::<T>(), "StateCtx::state_mut")
            ),
        }
    }

    /// Applies `f` to the registered state `T` immediately.
    pub fn update<T: State>(&mut self, f: impl FnOnce(&mut T)) {
        f(self.state_mut::<T>());
    }

    /// The current value of compute `T`, if registered.
    pub fn cached<T: Compute>(&self) -> Option<&T> {
        self.computes
            .get(&TypeId::of::<T>())
            .and_then(|value| (**value).as_any().downcast_ref::<T>())
    }

    pub fn try_compute<T: Compute>(&self) -> Result<&T, StateError> {
        self.cached::<T>()
            .ok_or_else(|| StateError::compute_not_found(type_name::<T>(), "StateCtx::compute"))
    }

    /// # Panics
    /// Panics if `T` was never registered with `record_compute`.
    pub fn compute<T: Compute>(&self) -> &T {
        match self.try_compute::<T>() {
            Ok(value) => value,
            Err(err) => panic!("{err}"),
        }
    }

    pub fn updater(&self) -> Updater {
        Updater::new(self.send.clone())
    }

    pub fn enqueue_command<T: Command>(&mut self) {
        self.queue.push_back((TypeId::of::<T>(), type_name::<T>()));
    }

    /// Enqueues `T` and flushes the queue right away.
    pub fn dispatch<T: Command>(&mut self) {
        self.enqueue_command::<T>();
        self.flush_commands();
    }

    pub fn pending_commands(&self) -> usize {
        self.queue.len()
    }

    /// Runs every queued command in order.
    ///
    /// Each command sees a snapshot that already contains the synchronous
    /// updates of the commands flushed before it.
    pub fn flush_commands(&mut self) {
        while let Some((id, name)) = self.queue.pop_front() {
            let snap = self.snapshot();
            match self.commands.get(&id) {
                None => {
                    warn!("{}", StateError::CommandNotFound { name });
                    continue;
                }
                Some(command) if !command.accepts(&snap) => {
                    debug!("{name} rejected by its guard, skipping");
                    continue;
                }
                Some(_) => {}
            }

            let generation = {
                let counter = self.generations.entry(id).or_default();
                *counter += 1;
                *counter
            };
            let task_id = TaskId::new(id, generation);

            if let Some(previous) = self.handles.remove(&id) {
                trace!("superseding task generation {}", previous.id().generation());
                previous.cancel();
            }

            let token = CancellationToken::new();
            let updater = LatestOnlyUpdater::new(self.updater(), task_id);
            let future = match self.commands.get(&id) {
                Some(command) => {
                    debug!("flushing {command:?} (generation {generation})");
                    command.run(snap, updater, token.clone())
                }
                None => continue,
            };

            self.handles
                .insert(id, TaskHandle::new(task_id, token.clone()));
            self.tasks.spawn(async move {
                tokio::select! {
                    biased;
                    () = token.cancelled() => trace!("command task cancelled"),
                    () = future => {}
                }
            });

            self.sync_computes();
        }
    }

    fn snapshot(&self) -> CommandSnapshot {
        let mut snap = CommandSnapshot::new();
        for (id, value) in &self.states {
            if let Some(cloned) = (**value).snapshot() {
                snap.insert_state(*id, cloned);
            }
        }
        for (id, value) in &self.computes {
            if let Some(cloned) = (**value).snapshot() {
                snap.insert_compute(*id, cloned);
            }
        }
        snap
    }

    /// Applies every update published since the last sync and forgets
    /// finished tasks.
    pub fn sync_computes(&mut self) {
        while let Some(result) = self.tasks.try_join_next() {
            if let Err(err) = result
                && err.is_panic()
            {
                warn!("command task panicked: {err}");
            }
        }
        while let Ok(update) = self.recv.try_recv() {
            self.apply(update);
        }
    }

    fn apply(&mut self, update: Update) {
        if let Some(origin) = update.origin
            && self.generations.get(&origin.type_id()) != Some(&origin.generation())
        {
            debug!(
                "dropping stale update for {} from generation {}",
                update.target_name,
                origin.generation()
            );
            return;
        }

        let slot: Option<&mut dyn Any> = if let Some(value) = self.states.get_mut(&update.target) {
            Some((**value).as_any_mut())
        } else if let Some(value) = self.computes.get_mut(&update.target) {
            Some((**value).as_any_mut())
        } else {
            None
        };

        match slot {
            Some(slot) => {
                (update.apply)(slot);
                self.dirty.insert(update.target);
            }
            None => warn!("update for unregistered type {}", update.target_name),
        }
    }

    /// Re-runs computes that have never run or whose dependencies changed.
    pub fn run_computed(&mut self) {
        let dirty = std::mem::take(&mut self.dirty);
        for (id, compute) in &self.computes {
            let first_run = self.fresh.contains(id);
            if first_run || compute.deps().iter().any(|dep_id| dirty.contains(dep_id)) {
                trace!("running compute {compute:?}");
                compute.compute(
                    Dep::new(&self.states, &self.computes),
                    Updater::new(self.send.clone()),
                );
            }
        }
        self.fresh.clear();
    }

    pub fn task_count(&self) -> usize {
        self.tasks.len()
    }

    pub fn task_set_mut(&mut self) -> &mut JoinSet<()> {
        &mut self.tasks
    }

    /// Cancels every outstanding task without waiting for it.
    pub fn cancel_all(&mut self) {
        for handle in self.handles.values() {
            handle.cancel();
        }
        self.handles.clear();
        self.tasks.abort_all();
    }

    /// Cancels every outstanding task and waits until all of them are gone.
    pub async fn shutdown(&mut self) {
        self.cancel_all();
        while self.tasks.join_next().await.is_some() {}
        self.queue.clear();
    }
}

impl Drop for StateCtx {
    fn drop(&mut self) {
        self.cancel_all();
    }
}
