//! Navigable month grid.
//!
//! ## Usage
//!
//! The engine holds a cursor, a set of [`GridOptions`] and the grid generated
//! from them. Every navigation or option change generates a fresh grid from
//! the new inputs; a generated grid is never patched.
//!
//! ```
//! use kenat_ui::{Engine, MonthGridArgs, MonthGridEngine};
//!
//! let mut grid = MonthGridEngine::new(MonthGridArgs::default().year(2016).month(13)).unwrap();
//! assert!(grid.go_next().is_committed());
//! assert_eq!((2017, 1), (grid.state().grid.year, grid.state().grid.month));
//! assert_eq!(0, grid.state().grid.days.len() % 7);
//! ```

use std::{fmt, sync::Arc};

use derive_setters::Setters;
use kenat_calendar::{CalendarError, GridCursor, GridOptions, GridSpec, MonthGrid, WeekdayLang};
use tracing::{debug, instrument, warn};

use crate::{
    engine::{Engine, Transition},
    error::EngineError,
    wall_clock::{WallClock, WallClockDefaults},
};

/// Defaults for [`MonthGridArgs`].
pub struct MonthGridDefaults;

impl MonthGridDefaults {
    /// Monday-first weeks, Amharic labels, western digits, every holiday.
    pub fn options() -> GridOptions {
        GridOptions {
            weekday_lang: WeekdayLang::Amharic,
            ..GridOptions::default()
        }
    }
}

/// Configuration for [`MonthGridEngine`].
#[derive(Clone, Setters)]
pub struct MonthGridArgs {
    /// Starting Ethiopian year. Defaults to the current year.
    #[setters(strip_option)]
    pub year: Option<i32>,
    /// Starting Ethiopian month. Defaults to the current month.
    #[setters(strip_option)]
    pub month: Option<u8>,
    /// Display options.
    pub options: GridOptions,
    /// Source of today's date, used for the default cursor and `is_today`.
    pub wall_clock: Arc<dyn WallClock>,
}

impl Default for MonthGridArgs {
    fn default() -> Self {
        Self {
            year: None,
            month: None,
            options: MonthGridDefaults::options(),
            wall_clock: WallClockDefaults::system(),
        }
    }
}

impl fmt::Debug for MonthGridArgs {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.debug_struct("MonthGridArgs")
            .field("year", &self.year)
            .field("month", &self.month)
            .field("options", &self.options)
            .finish_non_exhaustive()
    }
}

/// The committed cursor and options together with the grid built from them.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct MonthGridState {
    /// Year and month shown.
    pub cursor: GridCursor,
    /// Options the grid was built with.
    pub options: GridOptions,
    /// The generated grid.
    pub grid: Arc<MonthGrid>,
    /// Increases by one with every rebuild.
    pub generation: u64,
}

/// Actions accepted by [`MonthGridEngine`].
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum MonthGridAction {
    /// Next month, wrapping from month 13 into the next year.
    Next,
    /// Previous month, wrapping from month 1 into the previous year.
    Prev,
    /// Same month of the next year.
    NextYear,
    /// Same month of the previous year.
    PrevYear,
    /// Jumps to a year and month.
    GoTo {
        /// Ethiopian year.
        year: i32,
        /// Ethiopian month, 1-13.
        month: u8,
    },
    /// Replaces every option at once.
    SetOptions(GridOptions),
    /// Rebuilds without changing inputs, picking up a new `today`.
    Refresh,
}

/// The month grid engine.
pub struct MonthGridEngine {
    state: MonthGridState,
    wall_clock: Arc<dyn WallClock>,
}

impl MonthGridEngine {
    /// Creates the engine and generates its first grid.
    pub fn new(args: MonthGridArgs) -> Result<Self, EngineError> {
        let today = args.wall_clock.today_ethiopian();
        let year = args
            .year
            .or(today.map(|date| date.year))
            .ok_or_else(|| CalendarError::YearOutOfRange(args.wall_clock.now().date.year))?;
        let month = args.month.or(today.map(|date| date.month)).unwrap_or(1);
        let cursor = GridCursor::new(year, month)?;
        let grid = generate(cursor, args.options, args.wall_clock.as_ref())?;
        Ok(Self {
            state: MonthGridState {
                cursor,
                options: args.options,
                grid: Arc::new(grid),
                generation: 0,
            },
            wall_clock: args.wall_clock,
        })
    }

    /// Shows the next month.
    pub fn go_next(&mut self) -> Transition {
        self.apply(MonthGridAction::Next)
    }

    /// Shows the previous month.
    pub fn go_prev(&mut self) -> Transition {
        self.apply(MonthGridAction::Prev)
    }

    /// Shows the same month of the next year.
    pub fn next_year(&mut self) -> Transition {
        self.apply(MonthGridAction::NextYear)
    }

    /// Shows the same month of the previous year.
    pub fn prev_year(&mut self) -> Transition {
        self.apply(MonthGridAction::PrevYear)
    }

    /// Shows the given year and month.
    pub fn go_to(&mut self, year: i32, month: u8) -> Transition {
        self.apply(MonthGridAction::GoTo { year, month })
    }

    /// Replaces every option at once.
    pub fn set_options(&mut self, options: GridOptions) -> Transition {
        self.apply(MonthGridAction::SetOptions(options))
    }

    /// Edits a copy of the current options and commits it as one change.
    pub fn update_options(&mut self, update: impl FnOnce(&mut GridOptions)) -> Transition {
        let mut options = self.state.options;
        update(&mut options);
        self.set_options(options)
    }

    /// Rebuilds the grid for the current inputs.
    pub fn refresh(&mut self) -> Transition {
        self.apply(MonthGridAction::Refresh)
    }

    #[instrument(level = "debug", skip(self))]
    fn rebuild(&mut self, cursor: Result<GridCursor, CalendarError>, options: GridOptions) -> Transition {
        let grid = cursor.and_then(|cursor| Ok((cursor, generate(cursor, options, self.wall_clock.as_ref())?)));
        match grid {
            Ok((cursor, grid)) => {
                self.state = MonthGridState {
                    cursor,
                    options,
                    grid: Arc::new(grid),
                    generation: self.state.generation + 1,
                };
                debug!(
                    year = cursor.year(),
                    month = cursor.month(),
                    generation = self.state.generation,
                    "month grid committed"
                );
                Transition::Committed
            }
            Err(err) => {
                warn!("month grid change rejected: {err}");
                Transition::Rejected(err.into())
            }
        }
    }
}

fn generate(cursor: GridCursor, options: GridOptions, wall_clock: &dyn WallClock) -> Result<MonthGrid, CalendarError> {
    MonthGrid::generate(&GridSpec { cursor, options }, wall_clock.today_ethiopian())
}

impl Engine for MonthGridEngine {
    type State = MonthGridState;
    type Action = MonthGridAction;

    fn state(&self) -> &MonthGridState {
        &self.state
    }

    fn apply(&mut self, action: MonthGridAction) -> Transition {
        let MonthGridState { cursor, options, .. } = self.state;
        match action {
            MonthGridAction::Next => self.rebuild(cursor.advance(1), options),
            MonthGridAction::Prev => self.rebuild(cursor.advance(-1), options),
            MonthGridAction::NextYear => self.rebuild(cursor.advance_years(1), options),
            MonthGridAction::PrevYear => self.rebuild(cursor.advance_years(-1), options),
            MonthGridAction::GoTo { year, month } => self.rebuild(GridCursor::new(year, month), options),
            MonthGridAction::SetOptions(options) => self.rebuild(Ok(cursor), options),
            MonthGridAction::Refresh => self.rebuild(Ok(cursor), options),
        }
    }
}

impl fmt::Debug for MonthGridEngine {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.debug_struct("MonthGridEngine")
            .field("cursor", &self.state.cursor)
            .field("options", &self.state.options)
            .field("generation", &self.state.generation)
            .finish_non_exhaustive()
    }
}
