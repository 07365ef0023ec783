//! A ticking clock with Gregorian and Ethiopian time-of-day views.
//!
//! ## Usage
//!
//! Put the engine in a [`Shared`] handle and call [`Shared::activate`] when
//! the clock becomes visible. Every tick samples the wall clock once and
//! derives both views from that sample.
//!
//! ```
//! use std::{sync::Arc, time::Duration};
//!
//! use kenat_calendar::{GregorianDate, GregorianDateTime, GregorianTime};
//! use kenat_ui::{ClockArgs, ClockEngine, ManualTicker, ManualWallClock, Shared};
//!
//! let wall = ManualWallClock::new(GregorianDateTime::new(
//!     GregorianDate::new(2024, 6, 14),
//!     GregorianTime::new(8, 15, 0),
//! ));
//! let ticker = ManualTicker::new();
//! let clock = Shared::new(ClockEngine::new(
//!     ClockArgs::default().wall_clock(Arc::new(wall.clone())),
//!     Arc::new(ticker.clone()),
//! ));
//! assert!(clock.activate().is_committed());
//!
//! wall.advance_seconds(60);
//! ticker.advance(Duration::from_secs(1));
//! let state = clock.snapshot();
//! assert_eq!("2:16 day", state.ethiopian.to_string());
//! ```

use std::{fmt, mem, sync::Arc, time::Duration};

use derive_setters::Setters;
use kenat_calendar::{EthiopianTime, GregorianDateTime, GregorianTime};
use tracing::{debug, trace};

use crate::{
    engine::{Engine, Transition},
    listener::{Callback, CallbackWith, Effects},
    shared::Shared,
    ticker::{TickSource, TickSubscription},
    wall_clock::{WallClock, WallClockDefaults},
};

/// Defaults for [`ClockArgs`].
pub struct ClockDefaults;

impl ClockDefaults {
    /// One tick per second.
    pub const PERIOD: Duration = Duration::from_secs(1);
}

/// Configuration for [`ClockEngine`].
#[derive(Clone, Setters)]
pub struct ClockArgs {
    /// Interval between samples.
    pub period: Duration,
    /// Source of the current instant.
    pub wall_clock: Arc<dyn WallClock>,
    /// Receives every snapshot committed by a tick, after the engine is
    /// released.
    #[setters(strip_option, into)]
    pub on_tick: Option<CallbackWith<ClockState>>,
}

impl Default for ClockArgs {
    fn default() -> Self {
        Self {
            period: ClockDefaults::PERIOD,
            wall_clock: WallClockDefaults::system(),
            on_tick: None,
        }
    }
}

impl fmt::Debug for ClockArgs {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.debug_struct("ClockArgs")
            .field("period", &self.period)
            .field("on_tick", &self.on_tick)
            .finish_non_exhaustive()
    }
}

/// Whether the clock is subscribed to its tick source.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default)]
pub enum ClockPhase {
    /// Not observing time.
    #[default]
    Idle,
    /// Sampling the wall clock on every tick.
    Ticking,
}

/// One consistent reading of the clock.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct ClockState {
    /// Current phase.
    pub phase: ClockPhase,
    /// The sampled instant.
    pub now: GregorianDateTime,
    /// Gregorian time of day, with seconds.
    pub gregorian: GregorianTime,
    /// Ethiopian time of day. Seconds are not carried over.
    pub ethiopian: EthiopianTime,
}

impl ClockState {
    fn sample(phase: ClockPhase, now: GregorianDateTime) -> Self {
        Self {
            phase,
            now,
            gregorian: now.time,
            ethiopian: EthiopianTime::from_gregorian(now.time.hour, now.time.minute),
        }
    }
}

/// Actions accepted by [`ClockEngine`].
///
/// Activation needs a handle to the engine and goes through
/// [`Shared::activate`] instead.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum ClockAction {
    /// Samples the wall clock. Ignored while idle.
    Tick,
    /// Cancels the subscription and returns to idle.
    Deactivate,
}

/// The clock engine.
pub struct ClockEngine {
    state: ClockState,
    period: Duration,
    wall_clock: Arc<dyn WallClock>,
    ticker: Arc<dyn TickSource>,
    on_tick: Option<CallbackWith<ClockState>>,
    subscription: Option<TickSubscription>,
    effects: Effects,
}

impl ClockEngine {
    /// Creates an idle clock holding one initial sample.
    pub fn new(args: ClockArgs, ticker: Arc<dyn TickSource>) -> Self {
        let now = args.wall_clock.now();
        Self {
            state: ClockState::sample(ClockPhase::Idle, now),
            period: args.period,
            wall_clock: args.wall_clock,
            ticker,
            on_tick: args.on_tick,
            subscription: None,
            effects: Effects::default(),
        }
    }

    /// Stops ticking. The timer is released before this returns.
    pub fn deactivate(&mut self) -> Transition {
        self.perform(ClockAction::Deactivate)
    }

    /// Returns true while subscribed.
    pub fn is_active(&self) -> bool {
        self.subscription.is_some()
    }

    fn start(&mut self, subscription: impl FnOnce(&dyn TickSource, Duration) -> TickSubscription) -> Transition {
        if self.state.phase == ClockPhase::Ticking {
            return Transition::Ignored;
        }
        self.subscription = Some(subscription(self.ticker.as_ref(), self.period));
        self.state = ClockState::sample(ClockPhase::Ticking, self.wall_clock.now());
        debug!(period = ?self.period, "clock activated");
        Transition::Committed
    }
}

impl Engine for ClockEngine {
    type State = ClockState;
    type Action = ClockAction;

    fn state(&self) -> &ClockState {
        &self.state
    }

    fn apply(&mut self, action: ClockAction) -> Transition {
        match action {
            ClockAction::Tick => {
                if self.state.phase != ClockPhase::Ticking {
                    return Transition::Ignored;
                }
                self.state = ClockState::sample(ClockPhase::Ticking, self.wall_clock.now());
                trace!(time = %self.state.gregorian, "clock ticked");
                if let Some(on_tick) = &self.on_tick {
                    on_tick.defer(self.state, &mut self.effects);
                }
                Transition::Committed
            }
            ClockAction::Deactivate => {
                let Some(subscription) = self.subscription.take() else {
                    return Transition::Ignored;
                };
                subscription.cancel();
                self.state.phase = ClockPhase::Idle;
                debug!("clock deactivated");
                Transition::Committed
            }
        }
    }

    fn take_effects(&mut self) -> Effects {
        mem::take(&mut self.effects)
    }
}

impl Drop for ClockEngine {
    fn drop(&mut self) {
        if let Some(subscription) = self.subscription.take() {
            subscription.cancel();
        }
    }
}

impl fmt::Debug for ClockEngine {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.debug_struct("ClockEngine")
            .field("state", &self.state)
            .field("period", &self.period)
            .finish_non_exhaustive()
    }
}

impl Shared<ClockEngine> {
    /// Subscribes the clock to its tick source.
    ///
    /// Ignored while already ticking. The timer callback holds only a weak
    /// handle, so dropping the last handle stops the clock.
    pub fn activate(&self) -> Transition {
        let handle = self.downgrade();
        self.with_mut(|clock| {
            clock.start(|ticker, period| {
                ticker.subscribe(
                    period,
                    Callback::new(move || {
                        if let Some(clock) = handle.upgrade() {
                            let _ = clock.dispatch(ClockAction::Tick);
                        }
                    }),
                )
            })
        })
    }

    /// Stops ticking.
    pub fn deactivate(&self) -> Transition {
        self.dispatch(ClockAction::Deactivate)
    }
}

#[cfg(test)]
mod tests {
    use std::sync::atomic::{AtomicUsize, Ordering};

    use kenat_calendar::{GregorianDate, TimePeriod};
    use parking_lot::Mutex;

    use super::*;
    use crate::{shared::WeakShared, ticker::ManualTicker, wall_clock::ManualWallClock};

    fn fixture() -> (ManualWallClock, ManualTicker, Shared<ClockEngine>) {
        let wall = ManualWallClock::new(GregorianDateTime::new(
            GregorianDate::new(2024, 6, 14),
            GregorianTime::new(17, 59, 58),
        ));
        let ticker = ManualTicker::new();
        let clock = Shared::new(ClockEngine::new(
            ClockArgs::default().wall_clock(Arc::new(wall.clone())),
            Arc::new(ticker.clone()),
        ));
        (wall, ticker, clock)
    }

    #[test]
    fn test_views_come_from_one_sample() {
        let (wall, ticker, clock) = fixture();
        assert!(clock.activate().is_committed());
        for _ in 0..3 {
            wall.advance_seconds(1);
            ticker.advance(Duration::from_secs(1));
            let state = clock.snapshot();
            assert_eq!(state.now.time, state.gregorian);
            assert_eq!(
                EthiopianTime::from_gregorian(state.gregorian.hour, state.gregorian.minute),
                state.ethiopian
            );
        }
        let state = clock.snapshot();
        assert_eq!(GregorianTime::new(18, 0, 1), state.gregorian);
        assert_eq!(12, state.ethiopian.hour());
        assert_eq!(TimePeriod::Night, state.ethiopian.period());
    }

    #[test]
    fn test_no_mutation_after_deactivate() {
        let (wall, ticker, clock) = fixture();
        assert!(clock.activate().is_committed());
        assert!(clock.deactivate().is_committed());
        assert_eq!(0, ticker.subscriber_count());
        let frozen = clock.snapshot();
        assert_eq!(ClockPhase::Idle, frozen.phase);

        wall.advance_seconds(3600);
        ticker.advance(Duration::from_secs(10));
        assert_eq!(frozen, clock.snapshot());
        assert_eq!(Transition::Ignored, clock.dispatch(ClockAction::Tick));
        assert_eq!(frozen, clock.snapshot());
    }

    #[test]
    fn test_never_double_subscribes() {
        let (_, ticker, clock) = fixture();
        assert!(clock.activate().is_committed());
        assert_eq!(Transition::Ignored, clock.activate());
        assert_eq!(1, ticker.subscriber_count());

        assert!(clock.deactivate().is_committed());
        assert_eq!(Transition::Ignored, clock.deactivate());
        assert!(clock.activate().is_committed());
        assert_eq!(1, ticker.subscriber_count());
    }

    #[test]
    fn test_drop_releases_timer() {
        let (_, ticker, clock) = fixture();
        assert!(clock.activate().is_committed());
        assert!(clock.with(ClockEngine::is_active));
        drop(clock);
        assert_eq!(0, ticker.subscriber_count());
    }

    #[test]
    fn test_on_tick_sees_committed_state() {
        let seen = Arc::new(AtomicUsize::new(0));
        let sink = seen.clone();
        let wall = ManualWallClock::new(GregorianDateTime::new(
            GregorianDate::new(2024, 6, 14),
            GregorianTime::new(6, 0, 0),
        ));
        let ticker = ManualTicker::new();
        let clock = Shared::new(ClockEngine::new(
            ClockArgs::default()
                .wall_clock(Arc::new(wall))
                .on_tick(move |state: ClockState| {
                    assert_eq!(ClockPhase::Ticking, state.phase);
                    sink.fetch_add(1, Ordering::SeqCst);
                }),
            Arc::new(ticker.clone()),
        ));
        assert!(clock.activate().is_committed());
        ticker.advance(Duration::from_secs(2));
        assert_eq!(2, seen.load(Ordering::SeqCst));
    }

    #[test]
    fn test_on_tick_can_deactivate_through_handle() {
        let seen = Arc::new(AtomicUsize::new(0));
        let handle: Arc<Mutex<Option<WeakShared<ClockEngine>>>> = Arc::new(Mutex::new(None));
        let (sink, slot) = (seen.clone(), handle.clone());
        let ticker = ManualTicker::new();
        let clock = Shared::new(ClockEngine::new(
            ClockArgs::default()
                .wall_clock(Arc::new(ManualWallClock::new(GregorianDateTime::new(
                    GregorianDate::new(2024, 6, 14),
                    GregorianTime::new(6, 0, 0),
                ))))
                .on_tick(move |_: ClockState| {
                    if sink.fetch_add(1, Ordering::SeqCst) + 1 == 2 {
                        let clock = slot.lock().as_ref().and_then(WeakShared::upgrade).unwrap();
                        assert_eq!(ClockPhase::Ticking, clock.snapshot().phase);
                        assert!(clock.deactivate().is_committed());
                    }
                }),
            Arc::new(ticker.clone()),
        ));
        *handle.lock() = Some(clock.downgrade());
        assert!(clock.activate().is_committed());

        ticker.advance(Duration::from_secs(5));
        assert_eq!(2, seen.load(Ordering::SeqCst));
        assert_eq!(ClockPhase::Idle, clock.snapshot().phase);
        assert_eq!(0, ticker.subscriber_count());
    }
}
