//! Ethiopian and Gregorian calendar dates.
//!
//! Both calendars are mapped through the Julian day number (JDN), so a
//! conversion is a validation, a projection onto the day count, and a
//! projection back.

use std::{fmt, ops::RangeInclusive};

use crate::error::CalendarError;

/// Years accepted on the Gregorian calendar.
pub const SUPPORTED_YEARS: RangeInclusive<i32> = 1..=9999;

/// Years accepted on the Ethiopian calendar. Every day of them converts
/// into [`SUPPORTED_YEARS`]; year 9992 runs into Gregorian 10000.
pub const SUPPORTED_ETHIOPIAN_YEARS: RangeInclusive<i32> = 1..=9991;

/// JDN of 1 Mäskäräm, year 1 (Amete Mihret epoch).
const ETHIOPIAN_EPOCH: i64 = 1_724_221;

/// A date on the Ethiopian calendar.
///
/// Construction does not validate; [`to_gregorian`] and
/// [`EthiopianDate::validate`] do.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, PartialOrd, Ord)]
#[cfg_attr(feature = "serde", derive(serde::Serialize, serde::Deserialize))]
pub struct EthiopianDate {
    /// Year of the Amete Mihret era.
    pub year: i32,
    /// Month, 1-13. Month 13 is Pagumē.
    pub month: u8,
    /// Day of the month.
    pub day: u8,
}

impl EthiopianDate {
    /// Creates a date without validating it.
    pub const fn new(year: i32, month: u8, day: u8) -> Self {
        Self { year, month, day }
    }

    /// Returns true when Pagumē has six days in `year`.
    pub fn is_leap_year(year: i32) -> bool {
        year.rem_euclid(4) == 3
    }

    /// Returns the number of days in the month, or `None` for an invalid month.
    pub fn days_in_month(year: i32, month: u8) -> Option<u8> {
        match month {
            1..=12 => Some(30),
            13 if Self::is_leap_year(year) => Some(6),
            13 => Some(5),
            _ => None,
        }
    }

    /// Checks that the date exists and lies within [`SUPPORTED_ETHIOPIAN_YEARS`].
    pub fn validate(self) -> Result<Self, CalendarError> {
        if !SUPPORTED_ETHIOPIAN_YEARS.contains(&self.year) {
            return Err(CalendarError::YearOutOfRange(self.year));
        }
        match Self::days_in_month(self.year, self.month) {
            Some(max) if (1..=max).contains(&self.day) => Ok(self),
            _ => Err(CalendarError::InvalidEthiopianDate {
                year: self.year,
                month: self.month,
                day: self.day,
            }),
        }
    }

    /// Returns the Julian day number of the date.
    pub fn to_jdn(self) -> Result<i64, CalendarError> {
        let date = self.validate()?;
        let year = date.year as i64;
        Ok(ETHIOPIAN_EPOCH - 1
            + 365 * (year - 1)
            + year / 4
            + 30 * (date.month as i64 - 1)
            + date.day as i64)
    }

    /// Creates a date from a Julian day number.
    pub fn from_jdn(jdn: i64) -> Result<Self, CalendarError> {
        let offset = jdn - ETHIOPIAN_EPOCH;
        let year = (4 * offset + 1463).div_euclid(1461);
        let year = i32::try_from(year).map_err(|_| CalendarError::YearOutOfRange(i32::MAX))?;
        if !SUPPORTED_ETHIOPIAN_YEARS.contains(&year) {
            return Err(CalendarError::YearOutOfRange(year));
        }
        let new_year = Self::new(year, 1, 1).to_jdn()?;
        let day_of_year = jdn - new_year;
        Ok(Self {
            year,
            month: (day_of_year / 30 + 1) as u8,
            day: (day_of_year % 30 + 1) as u8,
        })
    }

    /// Returns the weekday, `0` for Sunday through `6` for Saturday.
    pub fn weekday(self) -> Result<u8, CalendarError> {
        self.to_jdn().map(weekday_from_jdn)
    }

    /// Moves the date by `days`, crossing months and years as needed.
    pub fn add_days(self, days: i64) -> Result<Self, CalendarError> {
        Self::from_jdn(self.to_jdn()? + days)
    }
}

impl fmt::Display for EthiopianDate {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "{}/{}/{}", self.year, self.month, self.day)
    }
}

/// A date on the proleptic Gregorian calendar.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, PartialOrd, Ord)]
#[cfg_attr(feature = "serde", derive(serde::Serialize, serde::Deserialize))]
pub struct GregorianDate {
    /// Year.
    pub year: i32,
    /// Month, 1-12.
    pub month: u8,
    /// Day of the month.
    pub day: u8,
}

impl GregorianDate {
    /// Creates a date without validating it.
    pub const fn new(year: i32, month: u8, day: u8) -> Self {
        Self { year, month, day }
    }

    /// Returns true for Gregorian leap years.
    pub fn is_leap_year(year: i32) -> bool {
        (year % 4 == 0 && year % 100 != 0) || (year % 400 == 0)
    }

    /// Returns the number of days in the month, or `None` for an invalid month.
    pub fn days_in_month(year: i32, month: u8) -> Option<u8> {
        match month {
            1 | 3 | 5 | 7 | 8 | 10 | 12 => Some(31),
            4 | 6 | 9 | 11 => Some(30),
            2 if Self::is_leap_year(year) => Some(29),
            2 => Some(28),
            _ => None,
        }
    }

    /// Checks that the date exists and lies within [`SUPPORTED_YEARS`].
    pub fn validate(self) -> Result<Self, CalendarError> {
        if !SUPPORTED_YEARS.contains(&self.year) {
            return Err(CalendarError::YearOutOfRange(self.year));
        }
        match Self::days_in_month(self.year, self.month) {
            Some(max) if (1..=max).contains(&self.day) => Ok(self),
            _ => Err(CalendarError::InvalidGregorianDate {
                year: self.year,
                month: self.month,
                day: self.day,
            }),
        }
    }

    /// Returns the Julian day number of the date.
    pub fn to_jdn(self) -> Result<i64, CalendarError> {
        let date = self.validate()?;
        let (y, m, d) = (date.year as i64, date.month as i64, date.day as i64);
        Ok(
            (1461 * (y + 4800 + (m - 14) / 12)) / 4 + (367 * (m - 2 - 12 * ((m - 14) / 12))) / 12
                - (3 * ((y + 4900 + (m - 14) / 12) / 100)) / 4
                + d
                - 32075,
        )
    }

    /// Creates a date from a Julian day number.
    pub fn from_jdn(jdn: i64) -> Result<Self, CalendarError> {
        let f = jdn + 1401 + (((4 * jdn + 274_277) / 146_097) * 3) / 4 - 38;
        let e = 4 * f + 3;
        let g = (e % 1461) / 4;
        let h = 5 * g + 2;
        let day = (h % 153) / 5 + 1;
        let month = (h / 153 + 2) % 12 + 1;
        let year = e / 1461 - 4716 + (12 + 2 - month) / 12;
        let year = i32::try_from(year).map_err(|_| CalendarError::YearOutOfRange(i32::MAX))?;
        if !SUPPORTED_YEARS.contains(&year) {
            return Err(CalendarError::YearOutOfRange(year));
        }
        Ok(Self::new(year, month as u8, day as u8))
    }

    /// Creates a date from a count of days since 1970-01-01.
    pub fn from_unix_days(days: i64) -> Self {
        let z = days + 719_468;
        let era = if z >= 0 { z } else { z - 146_096 } / 146_097;
        let doe = z - era * 146_097;
        let yoe = (doe - doe / 1_460 + doe / 36_524 - doe / 146_096) / 365;
        let y = yoe + era * 400;
        let doy = doe - (365 * yoe + yoe / 4 - yoe / 100);
        let mp = (5 * doy + 2) / 153;
        let day = doy - (153 * mp + 2) / 5 + 1;
        let month = mp + if mp < 10 { 3 } else { -9 };
        let year = y + if month <= 2 { 1 } else { 0 };
        Self::new(year as i32, month as u8, day as u8)
    }

    /// Returns the weekday, `0` for Sunday through `6` for Saturday.
    pub fn weekday(self) -> Result<u8, CalendarError> {
        self.to_jdn().map(weekday_from_jdn)
    }
}

impl fmt::Display for GregorianDate {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "{}/{}/{}", self.year, self.month, self.day)
    }
}

/// Converts an Ethiopian date to the Gregorian calendar.
pub fn to_gregorian(date: EthiopianDate) -> Result<GregorianDate, CalendarError> {
    GregorianDate::from_jdn(date.to_jdn()?)
}

/// Converts a Gregorian date to the Ethiopian calendar.
pub fn to_ethiopian(date: GregorianDate) -> Result<EthiopianDate, CalendarError> {
    EthiopianDate::from_jdn(date.to_jdn()?)
}

pub(crate) fn weekday_from_jdn(jdn: i64) -> u8 {
    (jdn + 1).rem_euclid(7) as u8
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_new_year_2016() {
        let gc = to_gregorian(EthiopianDate::new(2016, 1, 1)).unwrap();
        assert_eq!(GregorianDate::new(2023, 9, 12), gc);
    }

    #[test]
    fn test_known_pairs() {
        for (ec, gc) in [
            (EthiopianDate::new(2016, 10, 7), GregorianDate::new(2024, 6, 14)),
            (EthiopianDate::new(2015, 13, 6), GregorianDate::new(2023, 9, 11)),
            (EthiopianDate::new(2016, 4, 28), GregorianDate::new(2024, 1, 7)),
            (EthiopianDate::new(1992, 4, 22), GregorianDate::new(2000, 1, 1)),
        ] {
            assert_eq!(gc, to_gregorian(ec).unwrap(), "{ec}");
            assert_eq!(ec, to_ethiopian(gc).unwrap(), "{gc}");
        }
    }

    #[test]
    fn test_round_trip_across_leap_cycle() {
        let mut date = EthiopianDate::new(2011, 1, 1);
        while date.year < 2017 {
            let back = to_ethiopian(to_gregorian(date).unwrap()).unwrap();
            assert_eq!(date, back);
            date = date.add_days(1).unwrap();
        }
    }

    #[test]
    fn test_pagume_length() {
        assert!(EthiopianDate::new(2015, 13, 6).validate().is_ok());
        assert_eq!(
            Err(CalendarError::InvalidEthiopianDate {
                year: 2016,
                month: 13,
                day: 6
            }),
            EthiopianDate::new(2016, 13, 6).validate()
        );
    }

    #[test]
    fn test_invalid_inputs() {
        assert!(to_gregorian(EthiopianDate::new(2016, 14, 1)).is_err());
        assert!(to_gregorian(EthiopianDate::new(2016, 1, 31)).is_err());
        assert!(to_ethiopian(GregorianDate::new(2023, 2, 29)).is_err());
        assert_eq!(
            Err(CalendarError::YearOutOfRange(0)),
            to_gregorian(EthiopianDate::new(0, 1, 1))
        );
    }

    #[test]
    fn test_ethiopian_range_ends_inside_gregorian_range() {
        let last = EthiopianDate::new(9991, 13, 6);
        assert_eq!(Ok(GregorianDate::new(9999, 11, 10)), to_gregorian(last));
        assert_eq!(
            Err(CalendarError::YearOutOfRange(9992)),
            to_gregorian(EthiopianDate::new(9992, 1, 1))
        );
        assert_eq!(
            Err(CalendarError::YearOutOfRange(9992)),
            to_ethiopian(GregorianDate::new(9999, 12, 31))
        );
        assert_eq!(Ok(last), to_ethiopian(GregorianDate::new(9999, 11, 10)));
    }

    #[test]
    fn test_weekday() {
        // 2000-01-01 was a Saturday.
        assert_eq!(Ok(6), GregorianDate::new(2000, 1, 1).weekday());
        // 2023-09-12 was a Tuesday.
        assert_eq!(Ok(2), EthiopianDate::new(2016, 1, 1).weekday());
    }

    #[test]
    fn test_from_unix_days() {
        assert_eq!(GregorianDate::new(1970, 1, 1), GregorianDate::from_unix_days(0));
        assert_eq!(GregorianDate::new(2000, 3, 1), GregorianDate::from_unix_days(11_017));
    }
}
