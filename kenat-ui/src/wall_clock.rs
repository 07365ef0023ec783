//! Sources of the current date and time.
//!
//! ## Usage
//!
//! Engines read "now" through [`WallClock`] so hosts can pin the time zone
//! and tests can pin the instant.

use std::sync::Arc;

use chrono::{DateTime, Datelike, FixedOffset, Local, TimeZone, Timelike, Utc};
use kenat_calendar::{EthiopianDate, GregorianDate, GregorianDateTime, GregorianTime, to_ethiopian};
use parking_lot::RwLock;
use tracing::warn;

/// Provides the current local instant.
pub trait WallClock: Send + Sync {
    /// Returns the current instant in local wall-clock terms.
    fn now(&self) -> GregorianDateTime;

    /// Returns today's Ethiopian date, or `None` when today lies outside the
    /// supported range.
    fn today_ethiopian(&self) -> Option<EthiopianDate> {
        let today = self.now().date;
        match to_ethiopian(today) {
            Ok(date) => Some(date),
            Err(err) => {
                warn!("today ({today}) has no Ethiopian date: {err}");
                None
            }
        }
    }
}

/// Defaults for wall clocks.
pub struct WallClockDefaults;

impl WallClockDefaults {
    /// Returns a shared system clock in the host's time zone.
    pub fn system() -> Arc<dyn WallClock> {
        Arc::new(SystemWallClock::default())
    }
}

/// Reads the operating system clock.
///
/// The default follows the host time zone, daylight saving included. Use
/// [`SystemWallClock::with_utc_offset`] to pin a fixed zone instead.
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq)]
pub struct SystemWallClock {
    utc_offset: Option<FixedOffset>,
}

impl SystemWallClock {
    /// Creates a clock pinned to a UTC offset in minutes.
    ///
    /// Offsets of a day or more fall back to the host time zone.
    pub fn with_utc_offset(utc_offset_minutes: i32) -> Self {
        let utc_offset = utc_offset_minutes
            .checked_mul(60)
            .and_then(FixedOffset::east_opt);
        if utc_offset.is_none() {
            warn!("UTC offset of {utc_offset_minutes} minutes is out of range, using host time zone");
        }
        Self { utc_offset }
    }

    /// Returns the pinned UTC offset in minutes, or `None` when the clock
    /// follows the host time zone.
    pub fn utc_offset_minutes(&self) -> Option<i32> {
        self.utc_offset.map(|offset| offset.local_minus_utc() / 60)
    }
}

impl WallClock for SystemWallClock {
    fn now(&self) -> GregorianDateTime {
        match self.utc_offset {
            Some(offset) => civil(Utc::now().with_timezone(&offset)),
            None => civil(Local::now()),
        }
    }
}

fn civil<Tz: TimeZone>(now: DateTime<Tz>) -> GregorianDateTime {
    GregorianDateTime::new(
        GregorianDate::new(now.year(), now.month() as u8, now.day() as u8),
        GregorianTime::new(now.hour() as u8, now.minute() as u8, now.second() as u8),
    )
}

/// A clock that only moves when told to.
#[derive(Debug, Clone)]
pub struct ManualWallClock {
    now: Arc<RwLock<GregorianDateTime>>,
}

impl ManualWallClock {
    /// Creates a clock frozen at `now`.
    pub fn new(now: GregorianDateTime) -> Self {
        Self {
            now: Arc::new(RwLock::new(now)),
        }
    }

    /// Moves the clock to `now`.
    pub fn set(&self, now: GregorianDateTime) {
        *self.now.write() = now;
    }

    /// Moves the clock forward by `seconds`. Out-of-range results are ignored.
    pub fn advance_seconds(&self, seconds: i64) {
        let mut now = self.now.write();
        match now.add_seconds(seconds) {
            Ok(next) => *now = next,
            Err(err) => warn!("manual clock cannot advance: {err}"),
        }
    }
}

impl WallClock for ManualWallClock {
    fn now(&self) -> GregorianDateTime {
        *self.now.read()
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_manual_clock_advances() {
        let clock = ManualWallClock::new(GregorianDateTime::new(
            GregorianDate::new(2023, 9, 11),
            GregorianTime::new(23, 59, 30),
        ));
        clock.advance_seconds(45);
        let now = clock.now();
        assert_eq!(GregorianDate::new(2023, 9, 12), now.date);
        assert_eq!(GregorianTime::new(0, 0, 15), now.time);
        assert_eq!(Some(EthiopianDate::new(2016, 1, 1)), clock.today_ethiopian());
    }

    /// Reads `clock` and returns its drift in seconds from `expected`,
    /// where both are local civil seconds since the epoch.
    fn drift(clock: &SystemWallClock, expected: impl Fn() -> i64) -> i64 {
        let before = expected();
        let seconds = clock.now().to_unix_seconds().expect("supported year");
        let after = expected();
        if seconds < before {
            before - seconds
        } else if seconds > after {
            seconds - after
        } else {
            0
        }
    }

    #[test]
    fn test_system_clock_follows_host_zone() {
        let clock = SystemWallClock::default();
        assert_eq!(None, clock.utc_offset_minutes());
        let host = || Local::now().naive_local().and_utc().timestamp();
        assert_eq!(0, drift(&clock, host));
    }

    #[test]
    fn test_system_clock_pinned_offset() {
        let clock = SystemWallClock::with_utc_offset(180);
        assert_eq!(Some(180), clock.utc_offset_minutes());
        let east_africa = || Utc::now().timestamp() + 10_800;
        assert_eq!(0, drift(&clock, east_africa));

        let clock = SystemWallClock::with_utc_offset(-330);
        assert_eq!(Some(-330), clock.utc_offset_minutes());
        assert_eq!(0, drift(&clock, || Utc::now().timestamp() - 19_800));
    }

    #[test]
    fn test_out_of_range_offset_uses_host_zone() {
        let clock = SystemWallClock::with_utc_offset(24 * 60);
        assert_eq!(None, clock.utc_offset_minutes());
        assert_eq!(SystemWallClock::default(), clock);
    }
}
