//! Errors raised by calendar conversions and validation.

use thiserror::Error;

/// Errors that can occur while converting or validating calendar values.
#[derive(Debug, Clone, PartialEq, Eq, Error)]
pub enum CalendarError {
    /// The Ethiopian date does not exist.
    #[error("invalid Ethiopian date {year}/{month}/{day}")]
    InvalidEthiopianDate {
        /// Rejected year.
        year: i32,
        /// Rejected month.
        month: u8,
        /// Rejected day.
        day: u8,
    },
    /// The Gregorian date does not exist.
    #[error("invalid Gregorian date {year}/{month}/{day}")]
    InvalidGregorianDate {
        /// Rejected year.
        year: i32,
        /// Rejected month.
        month: u8,
        /// Rejected day.
        day: u8,
    },
    /// The year lies outside the supported range.
    #[error("year {0} is outside the supported range")]
    YearOutOfRange(i32),
    /// The month is not part of the Ethiopian calendar.
    #[error("month {0} is not between 1 and 13")]
    InvalidMonth(u8),
    /// The Ethiopian clock time does not exist.
    #[error("invalid Ethiopian time {hour}:{minute:02}")]
    InvalidTime {
        /// Rejected hour.
        hour: u8,
        /// Rejected minute.
        minute: u8,
    },
    /// Ge'ez numerals have no zero.
    #[error("Ge'ez numerals cannot represent zero")]
    ZeroNumeral,
}
