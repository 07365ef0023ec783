//! Month grids for calendar views.
//!
//! A [`MonthGrid`] is generated from a [`GridSpec`] and never mutated
//! afterwards. Navigation produces a new cursor and a new grid.

use std::fmt;

use smallvec::SmallVec;
use tracing::debug;

use crate::{
    date::{EthiopianDate, GregorianDate, SUPPORTED_ETHIOPIAN_YEARS, weekday_from_jdn},
    error::CalendarError,
    geez::to_geez,
    holidays::{Holiday, HolidayFilter, holidays_in_month},
    names::{WeekdayLang, month_name, weekday_headers, weekday_name},
};

const WEEK_LENGTH: usize = 7;

/// First column of the grid.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Default)]
#[cfg_attr(feature = "serde", derive(serde::Serialize, serde::Deserialize))]
pub enum WeekStart {
    /// Weeks start on Sunday (`0`).
    Sunday,
    /// Weeks start on Monday (`1`).
    #[default]
    Monday,
}

impl WeekStart {
    /// Returns the weekday index of the first column.
    pub fn index(self) -> u8 {
        match self {
            WeekStart::Sunday => 0,
            WeekStart::Monday => 1,
        }
    }
}

/// Display options for a generated grid.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Default)]
#[cfg_attr(feature = "serde", derive(serde::Serialize, serde::Deserialize))]
pub struct GridOptions {
    /// Render Ethiopian date fields as Ge'ez numerals.
    pub use_geez: bool,
    /// First column of each week.
    pub week_start: WeekStart,
    /// Language of headers, month names and holiday names.
    pub weekday_lang: WeekdayLang,
    /// Holiday tags to keep; `None` keeps every holiday.
    pub holiday_filter: Option<HolidayFilter>,
}

/// The Ethiopian year and month a grid shows.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, PartialOrd, Ord)]
#[cfg_attr(feature = "serde", derive(serde::Serialize, serde::Deserialize))]
pub struct GridCursor {
    year: i32,
    month: u8,
}

impl GridCursor {
    /// Creates a cursor, rejecting months outside 1-13 and unsupported years.
    pub fn new(year: i32, month: u8) -> Result<Self, CalendarError> {
        if !(1..=13).contains(&month) {
            return Err(CalendarError::InvalidMonth(month));
        }
        if !SUPPORTED_ETHIOPIAN_YEARS.contains(&year) {
            return Err(CalendarError::YearOutOfRange(year));
        }
        Ok(Self { year, month })
    }

    /// Returns the year.
    pub fn year(&self) -> i32 {
        self.year
    }

    /// Returns the month (1-13).
    pub fn month(&self) -> u8 {
        self.month
    }

    /// Moves by `delta` months. Month 13 wraps to month 1 of the next year.
    pub fn advance(&self, delta: i32) -> Result<Self, CalendarError> {
        let total = self.year as i64 * 13 + (self.month as i64 - 1) + delta as i64;
        let year = total.div_euclid(13);
        let month = (total.rem_euclid(13) + 1) as u8;
        let year = i32::try_from(year).map_err(|_| CalendarError::YearOutOfRange(i32::MAX))?;
        Self::new(year, month)
    }

    /// Moves by `delta` years, keeping the month.
    pub fn advance_years(&self, delta: i32) -> Result<Self, CalendarError> {
        Self::new(self.year.saturating_add(delta), self.month)
    }
}

/// Everything a grid is generated from.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub struct GridSpec {
    /// Year and month to show.
    pub cursor: GridCursor,
    /// Display options.
    pub options: GridOptions,
}

/// A number as it appears in a grid cell.
///
/// In Ge'ez mode the fields are text, not numbers. Consumers that need
/// arithmetic must go through [`Numeral::as_number`].
#[derive(Debug, Clone, PartialEq, Eq, Hash)]
#[cfg_attr(feature = "serde", derive(serde::Serialize, serde::Deserialize))]
pub enum Numeral {
    /// Western digits.
    Number(i32),
    /// Ge'ez numeral text.
    Geez(String),
}

impl Numeral {
    /// Returns the value when it is numeric.
    pub fn as_number(&self) -> Option<i32> {
        match self {
            Numeral::Number(value) => Some(*value),
            Numeral::Geez(_) => None,
        }
    }

    fn render(value: i32, use_geez: bool) -> Result<Self, CalendarError> {
        if !use_geez {
            return Ok(Numeral::Number(value));
        }
        let value = u32::try_from(value).map_err(|_| CalendarError::ZeroNumeral)?;
        to_geez(value).map(Numeral::Geez)
    }
}

impl fmt::Display for Numeral {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            Numeral::Number(value) => write!(f, "{value}"),
            Numeral::Geez(text) => f.write_str(text),
        }
    }
}

/// An Ethiopian date as shown in a grid cell.
#[derive(Debug, Clone, PartialEq, Eq, Hash)]
#[cfg_attr(feature = "serde", derive(serde::Serialize, serde::Deserialize))]
pub struct GridDate {
    /// Year.
    pub year: Numeral,
    /// Month.
    pub month: Numeral,
    /// Day.
    pub day: Numeral,
}

impl GridDate {
    /// Renders a date, optionally in Ge'ez numerals.
    pub fn render(date: EthiopianDate, use_geez: bool) -> Result<Self, CalendarError> {
        Ok(Self {
            year: Numeral::render(date.year, use_geez)?,
            month: Numeral::render(date.month as i32, use_geez)?,
            day: Numeral::render(date.day as i32, use_geez)?,
        })
    }

    /// Returns the numeric date, or `None` when any field is Ge'ez text or
    /// out of range for its type.
    pub fn to_ethiopian(&self) -> Option<EthiopianDate> {
        Some(EthiopianDate::new(
            self.year.as_number()?,
            u8::try_from(self.month.as_number()?).ok()?,
            u8::try_from(self.day.as_number()?).ok()?,
        ))
    }
}

impl From<EthiopianDate> for GridDate {
    fn from(date: EthiopianDate) -> Self {
        Self {
            year: Numeral::Number(date.year),
            month: Numeral::Number(date.month as i32),
            day: Numeral::Number(date.day as i32),
        }
    }
}

/// One day of a month grid.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct DayCell {
    /// Ethiopian date, possibly in Ge'ez numerals.
    pub ethiopian: GridDate,
    /// Gregorian date of the same day.
    pub gregorian: GregorianDate,
    /// Weekday index, `0` for Sunday.
    pub weekday: u8,
    /// Weekday name in the grid's language.
    pub weekday_name: &'static str,
    /// Whether this is the current day.
    pub is_today: bool,
    /// Holidays on this day that pass the grid's filter.
    pub holidays: SmallVec<[Holiday; 2]>,
}

/// A generated month view: headers plus complete weeks of day cells.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct MonthGrid {
    /// Ethiopian year shown.
    pub year: i32,
    /// Ethiopian month shown.
    pub month: u8,
    /// Month name in the grid's language.
    pub month_name: &'static str,
    /// Weekday labels, starting at the configured first day.
    pub headers: [&'static str; WEEK_LENGTH],
    /// Cells in row-major order. `None` pads partial weeks; the length is
    /// always a multiple of seven.
    pub days: Vec<Option<DayCell>>,
}

impl MonthGrid {
    /// Generates the grid for `spec`, marking `today` when it falls inside.
    pub fn generate(spec: &GridSpec, today: Option<EthiopianDate>) -> Result<Self, CalendarError> {
        let GridSpec { cursor, options } = *spec;
        let lang = options.weekday_lang;
        let days_in_month = EthiopianDate::days_in_month(cursor.year, cursor.month)
            .ok_or(CalendarError::InvalidMonth(cursor.month))?;
        let first_jdn = EthiopianDate::new(cursor.year, cursor.month, 1).to_jdn()?;
        let first_weekday = weekday_from_jdn(first_jdn);
        let leading = (first_weekday + 7 - options.week_start.index()) % 7;
        let holidays = holidays_in_month(cursor.year, cursor.month, options.holiday_filter.as_ref())?;

        let mut days = Vec::with_capacity(42);
        days.resize(leading as usize, None);
        for day in 1..=days_in_month {
            let ethiopian = EthiopianDate::new(cursor.year, cursor.month, day);
            let jdn = first_jdn + day as i64 - 1;
            let weekday = weekday_from_jdn(jdn);
            days.push(Some(DayCell {
                ethiopian: GridDate::render(ethiopian, options.use_geez)?,
                gregorian: GregorianDate::from_jdn(jdn)?,
                weekday,
                weekday_name: weekday_name(weekday, lang),
                is_today: today == Some(ethiopian),
                holidays: holidays
                    .iter()
                    .filter(|holiday| holiday.ethiopian == ethiopian)
                    .copied()
                    .collect(),
            }));
        }
        let trailing = (WEEK_LENGTH - days.len() % WEEK_LENGTH) % WEEK_LENGTH;
        days.resize(days.len() + trailing, None);

        debug!(
            year = cursor.year,
            month = cursor.month,
            cells = days.len(),
            "generated month grid"
        );
        Ok(Self {
            year: cursor.year,
            month: cursor.month,
            month_name: month_name(cursor.month, lang).unwrap_or_default(),
            headers: weekday_headers(options.week_start.index(), lang),
            days,
        })
    }

    /// Returns the cursor this grid was generated for.
    pub fn cursor(&self) -> GridCursor {
        GridCursor {
            year: self.year,
            month: self.month,
        }
    }

    /// Iterates over the grid one week at a time.
    pub fn weeks(&self) -> impl Iterator<Item = &[Option<DayCell>]> {
        self.days.chunks(WEEK_LENGTH)
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::holidays::{HolidayKey, HolidayTag};

    fn spec(year: i32, month: u8, options: GridOptions) -> GridSpec {
        GridSpec {
            cursor: GridCursor::new(year, month).unwrap(),
            options,
        }
    }

    #[test]
    fn test_complete_weeks() {
        for month in 1..=13 {
            let grid = MonthGrid::generate(&spec(2016, month, GridOptions::default()), None).unwrap();
            assert_eq!(0, grid.days.len() % 7, "month {month}");
            assert_eq!(7, grid.headers.len());
        }
    }

    #[test]
    fn test_leading_padding_follows_week_start() {
        // 1 Meskerem 2016 was a Tuesday.
        let monday = MonthGrid::generate(&spec(2016, 1, GridOptions::default()), None).unwrap();
        assert!(monday.days[0].is_none());
        assert!(monday.days[1].is_some());
        assert_eq!("ማክሰኞ", monday.days[1].as_ref().unwrap().weekday_name);

        let options = GridOptions {
            week_start: WeekStart::Sunday,
            weekday_lang: WeekdayLang::English,
            ..GridOptions::default()
        };
        let sunday = MonthGrid::generate(&spec(2016, 1, options), None).unwrap();
        assert!(sunday.days[..2].iter().all(Option::is_none));
        assert_eq!("Sunday", sunday.headers[0]);
        assert_eq!("Meskerem", sunday.month_name);
    }

    #[test]
    fn test_pagume_grid() {
        let grid = MonthGrid::generate(&spec(2015, 13, GridOptions::default()), None).unwrap();
        let days = grid.days.iter().flatten().count();
        assert_eq!(6, days);
    }

    #[test]
    fn test_today_and_holidays() {
        let today = EthiopianDate::new(2016, 1, 17);
        let grid = MonthGrid::generate(&spec(2016, 1, GridOptions::default()), Some(today)).unwrap();
        let marked: Vec<_> = grid.days.iter().flatten().filter(|cell| cell.is_today).collect();
        assert_eq!(1, marked.len());
        assert_eq!(HolidayKey::Meskel, marked[0].holidays[0].key);
    }

    #[test]
    fn test_holiday_filter_applies() {
        let options = GridOptions {
            holiday_filter: Some([HolidayTag::Muslim].into_iter().collect()),
            ..GridOptions::default()
        };
        let grid = MonthGrid::generate(&spec(2016, 1, options), None).unwrap();
        assert!(
            grid.days
                .iter()
                .flatten()
                .flat_map(|cell| cell.holidays.iter())
                .all(|holiday| holiday.tags().contains(&HolidayTag::Muslim))
        );
    }

    #[test]
    fn test_geez_cells_are_not_numeric() {
        let options = GridOptions {
            use_geez: true,
            ..GridOptions::default()
        };
        let grid = MonthGrid::generate(&spec(2016, 1, options), None).unwrap();
        let first = grid.days.iter().flatten().next().unwrap();
        assert_eq!(Numeral::Geez("፩".to_owned()), first.ethiopian.day);
        assert_eq!(None, first.ethiopian.to_ethiopian());
    }

    #[test]
    fn test_cursor_wraps_pagume() {
        let cursor = GridCursor::new(2016, 13).unwrap();
        assert_eq!(GridCursor::new(2017, 1).unwrap(), cursor.advance(1).unwrap());
        let cursor = GridCursor::new(2016, 1).unwrap();
        assert_eq!(GridCursor::new(2015, 13).unwrap(), cursor.advance(-1).unwrap());
        assert!(GridCursor::new(1, 1).unwrap().advance(-1).is_err());
    }

    #[test]
    fn test_cursor_stops_at_last_convertible_year() {
        let last = GridCursor::new(9991, 13).unwrap();
        assert_eq!(Err(CalendarError::YearOutOfRange(9992)), last.advance(1));
        assert_eq!(Err(CalendarError::YearOutOfRange(9992)), GridCursor::new(9992, 1));
        let grid = MonthGrid::generate(&spec(9991, 13, GridOptions::default()), None).unwrap();
        let cell = grid.days.iter().flatten().last().unwrap();
        assert_eq!(GregorianDate::new(9999, 11, 10), cell.gregorian);
    }
}
