//! Listeners that engines notify after a commit.
//!
//! ## Usage
//!
//! Pass a closure as `on_tick` or `on_select`. The engine does not call it
//! while applying an action. It queues the call as an [`Effects`] entry, and
//! the caller runs the queue once the engine is no longer borrowed. A
//! listener can therefore dispatch back into the same [`Shared`] handle.
//!
//! [`Shared`]: crate::Shared

use std::{fmt, sync::Arc};

/// A listener with no arguments, used for timer ticks.
#[derive(Clone)]
pub struct Callback {
    handler: Arc<dyn Fn() + Send + Sync>,
}

impl Callback {
    /// Creates a callback from a closure.
    pub fn new<F>(handler: F) -> Self
    where
        F: Fn() + Send + Sync + 'static,
    {
        Self {
            handler: Arc::new(handler),
        }
    }

    /// Invokes the callback.
    pub fn call(&self) {
        (self.handler)();
    }
}

impl<F> From<F> for Callback
where
    F: Fn() + Send + Sync + 'static,
{
    fn from(handler: F) -> Self {
        Self::new(handler)
    }
}

impl fmt::Debug for Callback {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str("Callback")
    }
}

/// A listener that receives a committed value, such as a selected date.
pub struct CallbackWith<T> {
    handler: Arc<dyn Fn(T) + Send + Sync>,
}

impl<T> CallbackWith<T> {
    /// Creates a callback from a closure.
    pub fn new<F>(handler: F) -> Self
    where
        F: Fn(T) + Send + Sync + 'static,
    {
        Self {
            handler: Arc::new(handler),
        }
    }

    /// Invokes the callback with `value`.
    pub fn call(&self, value: T) {
        (self.handler)(value);
    }
}

impl<T: Send + Sync + 'static> CallbackWith<T> {
    /// Queues a call with `value` on `effects`.
    pub fn defer(&self, value: T, effects: &mut Effects) {
        let handler = Arc::clone(&self.handler);
        effects.push(move || handler(value));
    }
}

impl<T, F> From<F> for CallbackWith<T>
where
    F: Fn(T) + Send + Sync + 'static,
{
    fn from(handler: F) -> Self {
        Self::new(handler)
    }
}

impl<T> Clone for CallbackWith<T> {
    fn clone(&self) -> Self {
        Self {
            handler: Arc::clone(&self.handler),
        }
    }
}

impl<T> fmt::Debug for CallbackWith<T> {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str("CallbackWith")
    }
}

/// Listener calls queued by committed actions, in commit order.
#[derive(Default)]
#[must_use = "queued listeners only run when the effects are run"]
pub struct Effects {
    queue: Vec<Box<dyn FnOnce() + Send + Sync>>,
}

impl Effects {
    /// Appends a call to the queue.
    pub fn push<F>(&mut self, effect: F)
    where
        F: FnOnce() + Send + Sync + 'static,
    {
        self.queue.push(Box::new(effect));
    }

    /// Returns true when nothing is queued.
    pub fn is_empty(&self) -> bool {
        self.queue.is_empty()
    }

    /// Number of queued calls.
    pub fn len(&self) -> usize {
        self.queue.len()
    }

    /// Runs every queued call in order.
    pub fn run(self) {
        for effect in self.queue {
            effect();
        }
    }
}

impl fmt::Debug for Effects {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.debug_struct("Effects").field("len", &self.queue.len()).finish()
    }
}

#[cfg(test)]
mod tests {
    use std::sync::atomic::{AtomicUsize, Ordering};

    use parking_lot::Mutex;

    use super::*;

    #[test]
    fn test_callback_with_passes_value() {
        let seen = Arc::new(AtomicUsize::new(0));
        let sink = seen.clone();
        let callback = CallbackWith::new(move |value: usize| {
            sink.fetch_add(value, Ordering::SeqCst);
        });
        callback.call(3);
        callback.clone().call(4);
        assert_eq!(7, seen.load(Ordering::SeqCst));
    }

    #[test]
    fn test_deferred_calls_wait_for_run() {
        let order = Arc::new(Mutex::new(Vec::new()));
        let sink = order.clone();
        let callback = CallbackWith::new(move |value: u8| sink.lock().push(value));

        let mut effects = Effects::default();
        assert!(effects.is_empty());
        callback.defer(1, &mut effects);
        callback.defer(2, &mut effects);
        assert_eq!(2, effects.len());
        assert!(order.lock().is_empty());

        effects.run();
        assert_eq!(vec![1, 2], *order.lock());
    }
}
