use std::any::{TypeId, type_name};
use std::collections::BTreeMap;

use crate::{Compute, State, StateError};

/// Read-only view over the context handed to [`Compute::compute`].
pub struct Dep<'a> {
    states: &'a BTreeMap<TypeId, Box<dyn State>>,
    computes: &'a BTreeMap<TypeId, Box<dyn Compute>>,
}

impl<'a> Dep<'a> {
    pub(crate) fn new(
        states: &'a BTreeMap<TypeId, Box<dyn State>>,
        computes: &'a BTreeMap<TypeId, Box<dyn Compute>>,
    ) -> Self {
        Self { states, computes }
    }

    pub fn try_state_ref<T: State>(&self) -> Result<&'a T, StateError> {
        self.states
            .get(&TypeId::of::<T>())
            .and_then(|value| (**value).as_any().downcast_ref::<T>())
            .ok_or_else(|| StateError::state_not_found(type_name::<T>(), "compute dependency"))
    }

    pub fn try_compute_ref<T: Compute>(&self) -> Result<&'a T, StateError> {
        self.computes
            .get(&TypeId::of::<T>())
            .and_then(|value| (**value).as_any().downcast_ref::<T>())
            .ok_or_else(|| StateError::compute_not_found(type_name::<T>(), "compute dependency"))
    }

    /// # Panics
    /// Panics if `T` was never registered with `add_state`.
    pub fn get_state_ref<T: State>(&self) -> &'a T {
        match self.try_state_ref::<T>() {
            Ok(value) => value,
            Err(err) => panic!("{err}"),
        }
    }

    /// # Panics
    /// Panics if `T` was never registered with `record_compute`.
    pub fn get_compute_ref<T: Compute>(&self) -> &'a T {
        match self.try_compute_ref::<T>() {
            Ok(value) => value,
            Err(err) => panic!("{err}"),
        }
    }
}
