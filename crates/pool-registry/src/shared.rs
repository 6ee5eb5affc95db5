//! Copy-on-write publication of a state value.

use {
    arc_swap::ArcSwap,
    std::sync::{Arc, Mutex, PoisonError},
};

/// A value read through immutable snapshots and written one mutation at a
/// time.
///
/// Readers load the currently published `Arc<T>` without locking. A writer
/// clones the published value, mutates the clone and publishes it only if
/// the mutation succeeded, so readers see either the whole mutation or none
/// of it.
#[derive(Debug)]
pub struct Shared<T> {
    current: ArcSwap<T>,
    writer: Mutex<()>,
}

impl<T: Clone> Shared<T> {
    pub fn new(value: T) -> Self {
        Self {
            current: ArcSwap::from_pointee(value),
            writer: Mutex::new(()),
        }
    }

    /// The last published state. Holding on to it does not block writers.
    pub fn snapshot(&self) -> Arc<T> {
        self.current.load_full()
    }

    /// Applies `mutation` to a copy of the current state and publishes the
    /// copy if the mutation returns `Ok`. On `Err` the published state is
    /// left untouched.
    pub fn update<R, E>(&self, mutation: impl FnOnce(&mut T) -> Result<R, E>) -> Result<R, E> {
        // A panicking mutation never published anything, so the guarded
        // state is still consistent.
        let _guard = self.writer.lock().unwrap_or_else(PoisonError::into_inner);
        let mut next = T::clone(&self.current.load());
        let result = mutation(&mut next)?;
        self.current.store(Arc::new(next));
        Ok(result)
    }
}

impl<T: Clone + Default> Default for Shared<T> {
    fn default() -> Self {
        Self::new(T::default())
    }
}
