use std::any::TypeId;

use crate::{Dep, State, Updater};

/// A state whose value is derived from other registered values.
///
/// `compute` is re-run by `StateCtx::run_computed` whenever one of the types
/// returned by `deps` changed since the previous run. Results are published
/// through the updater and become visible after the next sync. Computes that
/// are only ever written by commands return no deps and keep `compute` empty.
pub trait Compute: State {
    fn deps(&self) -> Vec<TypeId> {
        Vec::new()
    }

    fn compute(&self, _deps: Dep<'_>, _updater: Updater) {}
}
