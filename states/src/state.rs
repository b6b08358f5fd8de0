use std::any::Any;
use std::fmt::Debug;

/// Type-erased access to a stored value.
///
/// Implemented for every `Send + 'static` type, so [`State`] implementors never
/// write it by hand.
pub trait AsAny: Any {
    fn as_any(&self) -> &dyn Any;

    fn as_any_mut(&mut self) -> &mut dyn Any;
}

impl<T: Any + Send> AsAny for T {
    fn as_any(&self) -> &dyn Any {
        self
    }

    fn as_any_mut(&mut self) -> &mut dyn Any {
        self
    }
}

/// A value owned by [`crate::StateCtx`].
///
/// States are plain data. The view mutates them directly through
/// `StateCtx::state_mut`; async work mutates them through an [`crate::Updater`].
pub trait State: AsAny + Send + Debug {
    /// Clone handed to commands when they are flushed.
    ///
    /// Values returning `None` are not visible to commands.
    fn snapshot(&self) -> Option<Box<dyn Any + Send>> {
        None
    }
}
