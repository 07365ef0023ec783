//! Periodic tick sources.
//!
//! ## Usage
//!
//! A [`TickSource`] calls a [`Callback`] at a fixed period until the returned
//! [`TickSubscription`] is cancelled or dropped. [`ManualTicker`] moves only
//! when advanced, [`TokioTicker`] runs on a tokio interval.

use std::{fmt, sync::Arc, time::Duration};

use parking_lot::Mutex;
use tracing::trace;

use crate::listener::Callback;

/// Shortest period a subscription may use.
pub const MIN_TICK_PERIOD: Duration = Duration::from_millis(1);

/// Something that can call back periodically.
pub trait TickSource: Send + Sync {
    /// Calls `on_tick` every `period` until the subscription is released.
    fn subscribe(&self, period: Duration, on_tick: Callback) -> TickSubscription;
}

/// Handle to an active tick subscription.
///
/// Cancelling it, explicitly or by dropping, releases the timer exactly once.
#[must_use = "dropping the subscription cancels it immediately"]
pub struct TickSubscription {
    cancel: Option<Box<dyn FnOnce() + Send + Sync>>,
}

impl TickSubscription {
    /// Wraps the action that releases the underlying timer.
    pub fn new<F>(cancel: F) -> Self
    where
        F: FnOnce() + Send + Sync + 'static,
    {
        Self {
            cancel: Some(Box::new(cancel)),
        }
    }

    /// Releases the timer now.
    pub fn cancel(mut self) {
        self.release();
    }

    fn release(&mut self) {
        if let Some(cancel) = self.cancel.take() {
            cancel();
        }
    }
}

impl Drop for TickSubscription {
    fn drop(&mut self) {
        self.release();
    }
}

impl fmt::Debug for TickSubscription {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.debug_struct("TickSubscription")
            .field("active", &self.cancel.is_some())
            .finish()
    }
}

struct ManualSubscriber {
    id: u64,
    period: Duration,
    elapsed: Duration,
    on_tick: Callback,
}

#[derive(Default)]
struct ManualTickerInner {
    next_id: u64,
    subscribers: Vec<ManualSubscriber>,
}

/// A tick source driven by [`ManualTicker::advance`].
#[derive(Clone, Default)]
pub struct ManualTicker {
    inner: Arc<Mutex<ManualTickerInner>>,
}

impl ManualTicker {
    /// Creates a ticker with no subscribers.
    pub fn new() -> Self {
        Self::default()
    }

    /// Moves simulated time forward and fires every tick that became due.
    ///
    /// Callbacks run after the internal lock is released, so they may
    /// subscribe or cancel.
    pub fn advance(&self, by: Duration) {
        let due: Vec<(Callback, u32)> = {
            let mut inner = self.inner.lock();
            inner
                .subscribers
                .iter_mut()
                .filter_map(|subscriber| {
                    subscriber.elapsed += by;
                    let period = subscriber.period.as_nanos();
                    let count = subscriber.elapsed.as_nanos() / period;
                    if count == 0 {
                        return None;
                    }
                    let count = u32::try_from(count).unwrap_or(u32::MAX);
                    subscriber.elapsed -= subscriber.period.saturating_mul(count);
                    Some((subscriber.on_tick.clone(), count))
                })
                .collect()
        };
        for (on_tick, count) in due {
            for _ in 0..count {
                on_tick.call();
            }
        }
    }

    /// Returns the number of live subscriptions.
    pub fn subscriber_count(&self) -> usize {
        self.inner.lock().subscribers.len()
    }
}

impl TickSource for ManualTicker {
    fn subscribe(&self, period: Duration, on_tick: Callback) -> TickSubscription {
        let id = {
            let mut inner = self.inner.lock();
            let id = inner.next_id;
            inner.next_id += 1;
            inner.subscribers.push(ManualSubscriber {
                id,
                period: period.max(MIN_TICK_PERIOD),
                elapsed: Duration::ZERO,
                on_tick,
            });
            id
        };
        trace!(id, ?period, "manual ticker subscribed");
        let inner = Arc::downgrade(&self.inner);
        TickSubscription::new(move || {
            if let Some(inner) = inner.upgrade() {
                inner.lock().subscribers.retain(|subscriber| subscriber.id != id);
                trace!(id, "manual ticker unsubscribed");
            }
        })
    }
}

impl fmt::Debug for ManualTicker {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.debug_struct("ManualTicker")
            .field("subscribers", &self.subscriber_count())
            .finish()
    }
}

#[cfg(feature = "tokio")]
pub use self::tokio_ticker::TokioTicker;

#[cfg(feature = "tokio")]
mod tokio_ticker {
    use std::time::Duration;

    use tokio::{
        runtime::Handle,
        time::{Instant, MissedTickBehavior},
    };
    use tracing::trace;

    use super::{MIN_TICK_PERIOD, TickSource, TickSubscription};
    use crate::{error::TickerError, listener::Callback, tokio_runtime};

    /// A tick source backed by a tokio interval task per subscription.
    #[derive(Debug, Clone)]
    pub struct TokioTicker {
        handle: Handle,
    }

    impl TokioTicker {
        /// Spawns interval tasks onto the given runtime.
        pub fn new(handle: Handle) -> Self {
            Self { handle }
        }

        /// Uses the process-wide background runtime, starting it on first use.
        pub fn shared() -> Result<Self, TickerError> {
            Ok(Self::new(tokio_runtime::get()?.handle().clone()))
        }
    }

    impl TickSource for TokioTicker {
        fn subscribe(&self, period: Duration, on_tick: Callback) -> TickSubscription {
            let period = period.max(MIN_TICK_PERIOD);
            let task = self.handle.spawn(async move {
                let mut interval = tokio::time::interval_at(Instant::now() + period, period);
                interval.set_missed_tick_behavior(MissedTickBehavior::Skip);
                loop {
                    interval.tick().await;
                    trace!("tokio ticker fired");
                    on_tick.call();
                }
            });
            TickSubscription::new(move || task.abort())
        }
    }
}

#[cfg(test)]
mod tests {
    use std::sync::atomic::{AtomicUsize, Ordering};

    use super::*;

    fn counter() -> (Arc<AtomicUsize>, Callback) {
        let count = Arc::new(AtomicUsize::new(0));
        let sink = count.clone();
        let callback = Callback::new(move || {
            sink.fetch_add(1, Ordering::SeqCst);
        });
        (count, callback)
    }

    #[test]
    fn test_manual_ticker_fires_due_ticks() {
        let ticker = ManualTicker::new();
        let (count, callback) = counter();
        let subscription = ticker.subscribe(Duration::from_secs(1), callback);
        ticker.advance(Duration::from_millis(500));
        assert_eq!(0, count.load(Ordering::SeqCst));
        ticker.advance(Duration::from_millis(2600));
        assert_eq!(3, count.load(Ordering::SeqCst));
        drop(subscription);
        assert_eq!(0, ticker.subscriber_count());
        ticker.advance(Duration::from_secs(5));
        assert_eq!(3, count.load(Ordering::SeqCst));
    }

    #[test]
    fn test_cancel_releases_once() {
        let released = Arc::new(AtomicUsize::new(0));
        let sink = released.clone();
        let subscription = TickSubscription::new(move || {
            sink.fetch_add(1, Ordering::SeqCst);
        });
        subscription.cancel();
        assert_eq!(1, released.load(Ordering::SeqCst));
    }

    #[cfg(feature = "tokio")]
    #[test]
    fn test_tokio_ticker_stops_after_cancel() {
        let runtime = tokio::runtime::Builder::new_current_thread()
            .enable_time()
            .build()
            .unwrap();
        let ticker = TokioTicker::new(runtime.handle().clone());
        let (count, callback) = counter();
        let subscription = ticker.subscribe(Duration::from_millis(10), callback);
        runtime.block_on(async { tokio::time::sleep(Duration::from_millis(45)).await });
        let seen = count.load(Ordering::SeqCst);
        assert!(seen >= 1);
        subscription.cancel();
        runtime.block_on(async { tokio::time::sleep(Duration::from_millis(40)).await });
        assert_eq!(seen, count.load(Ordering::SeqCst));
    }
}
