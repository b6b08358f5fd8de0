use std::any::{Any, TypeId, type_name};
use std::collections::BTreeMap;

use crate::{Compute, State, StateError};

/// Owned clones of every snapshot-able value, taken when a command is flushed.
///
/// Commands move what they need out of the snapshot into their future, so the
/// future never borrows the context.
#[derive(Default)]
pub struct CommandSnapshot {
    states: BTreeMap<TypeId, Box<dyn Any + Send>>,
    computes: BTreeMap<TypeId, Box<dyn Any + Send>>,
}

impl std::fmt::Debug for CommandSnapshot {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.debug_struct("CommandSnapshot")
            .field("states", &self.states.len())
            .field("computes", &self.computes.len())
            .finish()
    }
}

impl CommandSnapshot {
    pub fn new() -> Self {
        Self::default()
    }

    pub(crate) fn insert_state(&mut self, id: TypeId, value: Box<dyn Any + Send>) {
        self.states.insert(id, value);
    }

    pub(crate) fn insert_compute(&mut self, id: TypeId, value: Box<dyn Any + Send>) {
        self.computes.insert(id, value);
    }

    /// Adds a state clone directly. Used by tests that drive a command by hand.
    pub fn with_state<T: State>(mut self, value: T) -> Self {
        self.states.insert(TypeId::of::<T>(), Box::new(value));
        self
    }

    /// Adds a compute clone directly. Used by tests that drive a command by hand.
    pub fn with_compute<T: Compute>(mut self, value: T) -> Self {
        self.computes.insert(TypeId::of::<T>(), Box::new(value));
        self
    }

    pub fn try_state<T: State>(&self) -> Result<&T, StateError> {
        self.states
            .get(&TypeId::of::<T>())
            .and_then(|boxed| boxed.downcast_ref::<T>())
            .ok_or_else(|| StateError::state_not_found(type_name::<T>(), "command snapshot"))
    }

    pub fn try_compute<T: Compute>(&self) -> Result<&T, StateError> {
        self.computes
            .get(&TypeId::of::<T>())
            .and_then(|boxed| boxed.downcast_ref::<T>())
            .ok_or_else(|| StateError::compute_not_found(type_name::<T>(), "command snapshot"))
    }

    /// # Panics
    /// Panics if `T` is not registered or does not implement `State::snapshot`.
    pub fn state<T: State>(&self) -> &T {
        match self.try_state::<T>() {
            Ok(value) => value,
            Err(err) => panic!("{err}"),
        }
    }

    /// # Panics
    /// Panics if `T` is not registered or does not implement `State::snapshot`.
    pub fn compute<T: Compute>(&self) -> &T {
        match self.try_compute::<T>() {
            Ok(value) => value,
            Err(err) => panic!("{err}"),
        }
    }
}
