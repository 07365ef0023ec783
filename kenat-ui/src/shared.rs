//! Thread-safe handle for binding engines to a UI toolkit.
//!
//! ## Usage
//!
//! Wrap an engine in [`Shared`] when event handlers and the render pass need
//! to reach the same instance.
//!
//! ```
//! use kenat_ui::{Engine, Shared, TimeConverterArgs, TimeConverterEngine};
//!
//! let engine = Shared::new(TimeConverterEngine::new(
//!     TimeConverterArgs::default().gregorian((14, 30)),
//! ));
//! let handler = engine.clone();
//! let transition = handler.with_mut(|engine| engine.set_gregorian_time(25, 70));
//! assert!(transition.is_committed());
//! let hour = engine.with(|engine| engine.state().gregorian.hour);
//! assert_eq!(23, hour);
//! ```

use std::{
    fmt,
    sync::{Arc, Weak},
};

use parking_lot::RwLock;

use crate::engine::{Engine, Transition};

/// Cloneable handle to a value behind a read-write lock.
///
/// Every clone refers to the same value.
pub struct Shared<T> {
    inner: Arc<RwLock<T>>,
}

impl<T> Shared<T> {
    /// Moves `value` behind a new handle.
    pub fn new(value: T) -> Self {
        Self {
            inner: Arc::new(RwLock::new(value)),
        }
    }

    /// Runs `f` with a shared reference to the value.
    pub fn with<R>(&self, f: impl FnOnce(&T) -> R) -> R {
        f(&self.inner.read())
    }

    /// Runs `f` with an exclusive reference to the value.
    ///
    /// The write lock is held for the whole call. Use [`Shared::dispatch`]
    /// for actions that notify listeners.
    pub fn with_mut<R>(&self, f: impl FnOnce(&mut T) -> R) -> R {
        f(&mut self.inner.write())
    }

    /// Returns a clone of the value.
    pub fn get(&self) -> T
    where
        T: Clone,
    {
        self.with(Clone::clone)
    }

    /// Replaces the value.
    pub fn set(&self, value: T) {
        self.with_mut(|slot| *slot = value);
    }

    /// Returns a handle that does not keep the value alive.
    pub fn downgrade(&self) -> WeakShared<T> {
        WeakShared {
            inner: Arc::downgrade(&self.inner),
        }
    }
}

/// Non-owning counterpart of [`Shared`], held by timer callbacks.
pub struct WeakShared<T> {
    inner: Weak<RwLock<T>>,
}

impl<T> WeakShared<T> {
    /// Returns the strong handle if the value is still alive.
    pub fn upgrade(&self) -> Option<Shared<T>> {
        self.inner.upgrade().map(|inner| Shared { inner })
    }
}

impl<T> Clone for WeakShared<T> {
    fn clone(&self) -> Self {
        Self {
            inner: Weak::clone(&self.inner),
        }
    }
}

impl<E: Engine> Shared<E> {
    /// Applies an action to the wrapped engine.
    ///
    /// Listeners queued by the action run after the write lock is released,
    /// so they may read or dispatch through this handle.
    pub fn dispatch(&self, action: E::Action) -> Transition {
        let (transition, effects) = self.with_mut(|engine| (engine.apply(action), engine.take_effects()));
        effects.run();
        transition
    }

    /// Returns a clone of the engine's current state.
    pub fn snapshot(&self) -> E::State
    where
        E::State: Clone,
    {
        self.with(|engine| engine.state().clone())
    }
}

impl<T> Clone for Shared<T> {
    fn clone(&self) -> Self {
        Self {
            inner: Arc::clone(&self.inner),
        }
    }
}

impl<T: fmt::Debug> fmt::Debug for Shared<T> {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.debug_tuple("Shared").field(&*self.inner.read()).finish()
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_clones_share_value() {
        let a = Shared::new(1);
        let b = a.clone();
        b.set(5);
        assert_eq!(5, a.get());
        a.with_mut(|value| *value += 1);
        assert_eq!(6, b.get());
    }

    #[test]
    fn test_weak_handle_expires() {
        let strong = Shared::new(String::from("ticks"));
        let weak = strong.downgrade();
        assert_eq!(Some(5), weak.upgrade().map(|s| s.with(|v| v.len())));
        drop(strong);
        assert!(weak.upgrade().is_none());
    }
}
