//! Clock time on the Ethiopian and Gregorian systems.
//!
//! The Ethiopian day starts at dawn: 6:00 civil time is 12:00 of the day
//! period, 7:00 is 1:00, and 18:00 begins the night period.

use std::fmt;

use crate::{date::GregorianDate, error::CalendarError};

/// Half of the Ethiopian day a clock reading belongs to.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Default)]
#[cfg_attr(feature = "serde", derive(serde::Serialize, serde::Deserialize))]
#[cfg_attr(feature = "serde", serde(rename_all = "lowercase"))]
pub enum TimePeriod {
    /// From dawn (6:00) to dusk (18:00).
    #[default]
    Day,
    /// From dusk (18:00) to dawn (6:00).
    Night,
}

/// A 24-hour Gregorian clock reading.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, PartialOrd, Ord, Default)]
#[cfg_attr(feature = "serde", derive(serde::Serialize, serde::Deserialize))]
pub struct GregorianTime {
    /// Hour, 0-23.
    pub hour: u8,
    /// Minute, 0-59.
    pub minute: u8,
    /// Second, 0-59.
    pub second: u8,
}

impl GregorianTime {
    /// Creates a clock reading without validating it.
    pub const fn new(hour: u8, minute: u8, second: u8) -> Self {
        Self {
            hour,
            minute,
            second,
        }
    }
}

impl fmt::Display for GregorianTime {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "{:02}:{:02}:{:02}", self.hour, self.minute, self.second)
    }
}

/// A 12-hour Ethiopian clock reading.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
#[cfg_attr(feature = "serde", derive(serde::Serialize, serde::Deserialize))]
pub struct EthiopianTime {
    hour: u8,
    minute: u8,
    period: TimePeriod,
}

impl EthiopianTime {
    /// Creates an Ethiopian time, rejecting hours outside 1-12 and minutes
    /// outside 0-59.
    pub fn new(hour: u8, minute: u8, period: TimePeriod) -> Result<Self, CalendarError> {
        if !(1..=12).contains(&hour) || minute > 59 {
            return Err(CalendarError::InvalidTime { hour, minute });
        }
        Ok(Self {
            hour,
            minute,
            period,
        })
    }

    /// Creates an Ethiopian time, pulling the hour into 1-12 and the minute
    /// into 0-59.
    pub fn saturating(hour: u8, minute: u8, period: TimePeriod) -> Self {
        Self {
            hour: hour.clamp(1, 12),
            minute: minute.min(59),
            period,
        }
    }

    /// Converts a Gregorian hour and minute. The hour is taken modulo 24.
    pub fn from_gregorian(hour: u8, minute: u8) -> Self {
        let shifted = (hour as i32 - 6).rem_euclid(24) as u8;
        let period = if shifted < 12 {
            TimePeriod::Day
        } else {
            TimePeriod::Night
        };
        let hour = match shifted % 12 {
            0 => 12,
            hour => hour,
        };
        Self {
            hour,
            minute: minute.min(59),
            period,
        }
    }

    /// Converts to a Gregorian reading. Seconds are always zero.
    pub fn to_gregorian(self) -> GregorianTime {
        let mut hour = self.hour % 12;
        if self.period == TimePeriod::Night {
            hour += 12;
        }
        GregorianTime::new((hour + 6) % 24, self.minute, 0)
    }

    /// Returns the hour, 1-12.
    pub fn hour(&self) -> u8 {
        self.hour
    }

    /// Returns the minute, 0-59.
    pub fn minute(&self) -> u8 {
        self.minute
    }

    /// Returns the day/night period.
    pub fn period(&self) -> TimePeriod {
        self.period
    }
}

impl fmt::Display for EthiopianTime {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        let period = match self.period {
            TimePeriod::Day => "day",
            TimePeriod::Night => "night",
        };
        write!(f, "{}:{:02} {period}", self.hour, self.minute)
    }
}

/// A Gregorian wall-clock instant with second precision.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, PartialOrd, Ord)]
#[cfg_attr(feature = "serde", derive(serde::Serialize, serde::Deserialize))]
pub struct GregorianDateTime {
    /// Calendar date.
    pub date: GregorianDate,
    /// Time of day.
    pub time: GregorianTime,
}

impl GregorianDateTime {
    /// Creates an instant from its parts.
    pub const fn new(date: GregorianDate, time: GregorianTime) -> Self {
        Self { date, time }
    }

    /// Creates an instant from seconds since the Unix epoch, shifted by a
    /// UTC offset in minutes.
    pub fn from_unix_seconds(seconds: i64, utc_offset_minutes: i32) -> Self {
        let local = seconds + utc_offset_minutes as i64 * 60;
        let days = local.div_euclid(86_400);
        let secs = local.rem_euclid(86_400);
        Self {
            date: GregorianDate::from_unix_days(days),
            time: GregorianTime::new(
                (secs / 3_600) as u8,
                ((secs / 60) % 60) as u8,
                (secs % 60) as u8,
            ),
        }
    }

    /// Returns seconds since the Unix epoch, treating the instant as UTC.
    pub fn to_unix_seconds(self) -> Result<i64, CalendarError> {
        // JDN 2_440_588 is 1970-01-01.
        let days = self.date.to_jdn()? - 2_440_588;
        Ok(days * 86_400
            + self.time.hour as i64 * 3_600
            + self.time.minute as i64 * 60
            + self.time.second as i64)
    }

    /// Moves the instant by `seconds`.
    pub fn add_seconds(self, seconds: i64) -> Result<Self, CalendarError> {
        Ok(Self::from_unix_seconds(self.to_unix_seconds()? + seconds, 0))
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_from_gregorian() {
        for (gregorian, hour, period) in [
            (6, 12, TimePeriod::Day),
            (7, 1, TimePeriod::Day),
            (14, 8, TimePeriod::Day),
            (17, 11, TimePeriod::Day),
            (18, 12, TimePeriod::Night),
            (0, 6, TimePeriod::Night),
            (5, 11, TimePeriod::Night),
        ] {
            let time = EthiopianTime::from_gregorian(gregorian, 30);
            assert_eq!((hour, 30, period), (time.hour(), time.minute(), time.period()));
        }
    }

    #[test]
    fn test_to_gregorian_round_trip() {
        for hour in 0..24 {
            let time = EthiopianTime::from_gregorian(hour, 15);
            assert_eq!(GregorianTime::new(hour, 15, 0), time.to_gregorian());
        }
    }

    #[test]
    fn test_new_rejects_out_of_range() {
        assert!(EthiopianTime::new(0, 0, TimePeriod::Day).is_err());
        assert!(EthiopianTime::new(13, 0, TimePeriod::Day).is_err());
        assert!(EthiopianTime::new(12, 60, TimePeriod::Night).is_err());
        assert!(EthiopianTime::new(12, 59, TimePeriod::Night).is_ok());
        let pulled = EthiopianTime::saturating(0, 75, TimePeriod::Night);
        assert_eq!((1, 59), (pulled.hour(), pulled.minute()));
    }

    #[test]
    fn test_unix_seconds_with_offset() {
        // 2024-06-13T21:30:05Z seen from UTC+03:00.
        let instant = GregorianDateTime::from_unix_seconds(1_718_314_205, 180);
        assert_eq!(GregorianDate::new(2024, 6, 14), instant.date);
        assert_eq!(GregorianTime::new(0, 30, 5), instant.time);
    }

    #[test]
    fn test_add_seconds_crosses_midnight() {
        let instant = GregorianDateTime::new(
            GregorianDate::new(2023, 12, 31),
            GregorianTime::new(23, 59, 59),
        );
        let next = instant.add_seconds(1).unwrap();
        assert_eq!(GregorianDate::new(2024, 1, 1), next.date);
        assert_eq!(GregorianTime::new(0, 0, 0), next.time);
    }
}
