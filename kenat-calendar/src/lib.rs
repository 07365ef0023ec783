//! Ethiopian and Gregorian calendar primitives.
//!
//! ## Usage
//!
//! Convert dates between the two calendars, translate Ethiopian clock time,
//! render Ge'ez numerals, look up holidays and build month grids.
//!
//! ```
//! use kenat_calendar::{EthiopianDate, GregorianDate, to_ethiopian, to_gregorian};
//!
//! let ec = EthiopianDate::new(2016, 1, 1);
//! let gc = to_gregorian(ec).unwrap();
//! assert_eq!(GregorianDate::new(2023, 9, 12), gc);
//! assert_eq!(ec, to_ethiopian(gc).unwrap());
//! ```
#![deny(missing_docs, clippy::unwrap_used)]

pub mod date;
pub mod error;
pub mod geez;
pub mod grid;
pub mod holidays;
pub mod names;
pub mod time;

pub use crate::{
    date::{EthiopianDate, GregorianDate, SUPPORTED_ETHIOPIAN_YEARS, SUPPORTED_YEARS, to_ethiopian, to_gregorian},
    error::CalendarError,
    geez::to_geez,
    grid::{DayCell, GridCursor, GridDate, GridOptions, GridSpec, MonthGrid, Numeral, WeekStart},
    holidays::{Holiday, HolidayFilter, HolidayKey, HolidayTag, holidays_in_month, holidays_in_year},
    names::WeekdayLang,
    time::{EthiopianTime, GregorianDateTime, GregorianTime, TimePeriod},
};
