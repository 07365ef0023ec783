//! Date picker: a month grid with an open flag and a selection.
//!
//! ## Usage
//!
//! Render [`DatePickerEngine::grid`] while [`DatePickerState::open`] is set
//! and feed clicked cells to [`DatePickerEngine::select_date`]. A successful
//! selection closes the picker and calls `on_select` once.
//!
//! ```
//! use kenat_calendar::EthiopianDate;
//! use kenat_ui::{DatePickerArgs, DatePickerEngine, Engine};
//!
//! let mut picker = DatePickerEngine::new(
//!     DatePickerArgs::default().initial(EthiopianDate::new(2016, 10, 1)),
//! )
//! .unwrap();
//! let _ = picker.toggle_open();
//! let cell = picker.grid().grid.days.iter().flatten().nth(6).cloned();
//! assert!(picker.select_date(cell.as_ref()).is_committed());
//! assert!(!picker.state().open);
//! assert_eq!("2016/10/07", picker.formatted().unwrap());
//! ```

use std::{fmt, mem, sync::Arc};

use derive_setters::Setters;
use kenat_calendar::{DayCell, EthiopianDate, GridDate, GridOptions, Numeral};
use tracing::debug;

use crate::{
    engine::{Engine, Transition},
    error::{EngineError, MalformedStateError},
    month_grid::{MonthGridAction, MonthGridArgs, MonthGridDefaults, MonthGridEngine, MonthGridState},
    listener::{CallbackWith, Effects},
    wall_clock::{WallClock, WallClockDefaults},
};

/// Configuration for [`DatePickerEngine`].
#[derive(Clone, Setters)]
pub struct DatePickerArgs {
    /// Starting selection, which also decides the first month shown.
    /// Defaults to today.
    #[setters(strip_option)]
    pub initial: Option<EthiopianDate>,
    /// Grid options.
    pub options: GridOptions,
    /// Called with every committed selection, after the engine is released.
    #[setters(strip_option, into)]
    pub on_select: Option<CallbackWith<GridDate>>,
    /// Source of today's date.
    pub wall_clock: Arc<dyn WallClock>,
}

impl Default for DatePickerArgs {
    fn default() -> Self {
        Self {
            initial: None,
            options: MonthGridDefaults::options(),
            on_select: None,
            wall_clock: WallClockDefaults::system(),
        }
    }
}

impl fmt::Debug for DatePickerArgs {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.debug_struct("DatePickerArgs")
            .field("initial", &self.initial)
            .field("options", &self.options)
            .field("on_select", &self.on_select)
            .finish_non_exhaustive()
    }
}

/// Selection and visibility of the picker.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct DatePickerState {
    /// The selected date as the grid rendered it. Fields are Ge'ez text when
    /// the selection was made from a Ge'ez grid.
    pub selected: GridDate,
    /// Whether the popup is shown.
    pub open: bool,
}

impl DatePickerState {
    /// Returns the selection as a numeric date.
    pub fn selected_date(&self) -> Result<EthiopianDate, MalformedStateError> {
        MalformedStateError::check(&self.selected)?;
        self.selected.to_ethiopian().ok_or_else(|| MalformedStateError {
            field: "date",
            text: format!("{}/{}/{}", self.selected.year, self.selected.month, self.selected.day),
        })
    }

    /// Renders the selection as zero-padded `YYYY/MM/DD`.
    pub fn formatted(&self) -> Result<String, MalformedStateError> {
        MalformedStateError::check(&self.selected)?;
        let number = |numeral: &Numeral| numeral.as_number().unwrap_or_default();
        Ok(format!(
            "{:04}/{:02}/{:02}",
            number(&self.selected.year),
            number(&self.selected.month),
            number(&self.selected.day)
        ))
    }
}

/// Actions accepted by [`DatePickerEngine`].
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum DatePickerAction {
    /// Shows the popup.
    Open,
    /// Hides the popup.
    Close,
    /// Flips the popup.
    Toggle,
    /// Commits a clicked cell. `None` is ignored.
    Select(Option<GridDate>),
    /// Forwards to the month grid. Never changes `open` or the selection.
    Grid(MonthGridAction),
}

/// The date picker engine.
pub struct DatePickerEngine {
    state: DatePickerState,
    grid: MonthGridEngine,
    on_select: Option<CallbackWith<GridDate>>,
    effects: Effects,
}

impl DatePickerEngine {
    /// Creates a closed picker showing the month of the starting selection.
    pub fn new(args: DatePickerArgs) -> Result<Self, EngineError> {
        let mut grid_args = MonthGridArgs::default()
            .options(args.options)
            .wall_clock(Arc::clone(&args.wall_clock));
        let initial = args.initial.or_else(|| args.wall_clock.today_ethiopian());
        if let Some(date) = initial {
            grid_args = grid_args.year(date.year).month(date.month);
        }
        let grid = MonthGridEngine::new(grid_args)?;
        let selected = match initial {
            Some(date) => GridDate::from(date),
            None => GridDate::from(EthiopianDate::new(grid.state().cursor.year(), grid.state().cursor.month(), 1)),
        };
        Ok(Self {
            state: DatePickerState { selected, open: false },
            grid,
            on_select: args.on_select,
            effects: Effects::default(),
        })
    }

    /// Returns the month grid state.
    pub fn grid(&self) -> &MonthGridState {
        self.grid.state()
    }

    /// See [`DatePickerState::selected_date`].
    pub fn selected_date(&self) -> Result<EthiopianDate, MalformedStateError> {
        self.state.selected_date()
    }

    /// See [`DatePickerState::formatted`].
    pub fn formatted(&self) -> Result<String, MalformedStateError> {
        self.state.formatted()
    }

    /// Shows the popup.
    pub fn open(&mut self) -> Transition {
        self.apply(DatePickerAction::Open)
    }

    /// Hides the popup.
    pub fn close(&mut self) -> Transition {
        self.apply(DatePickerAction::Close)
    }

    /// Flips the popup.
    pub fn toggle_open(&mut self) -> Transition {
        self.apply(DatePickerAction::Toggle)
    }

    /// Commits the date of a clicked cell, closes the picker and then calls
    /// `on_select`.
    pub fn select_date(&mut self, day: Option<&DayCell>) -> Transition {
        self.perform(DatePickerAction::Select(day.map(|cell| cell.ethiopian.clone())))
    }

    /// Shows the next month.
    pub fn next_month(&mut self) -> Transition {
        self.apply(DatePickerAction::Grid(MonthGridAction::Next))
    }

    /// Shows the previous month.
    pub fn prev_month(&mut self) -> Transition {
        self.apply(DatePickerAction::Grid(MonthGridAction::Prev))
    }

    /// Shows the same month of the next year.
    pub fn next_year(&mut self) -> Transition {
        self.apply(DatePickerAction::Grid(MonthGridAction::NextYear))
    }

    /// Shows the same month of the previous year.
    pub fn prev_year(&mut self) -> Transition {
        self.apply(DatePickerAction::Grid(MonthGridAction::PrevYear))
    }

    /// Replaces the grid options.
    pub fn set_options(&mut self, options: GridOptions) -> Transition {
        self.apply(DatePickerAction::Grid(MonthGridAction::SetOptions(options)))
    }

    /// Edits the grid options as one change.
    pub fn update_options(&mut self, update: impl FnOnce(&mut GridOptions)) -> Transition {
        let mut options = self.grid.state().options;
        update(&mut options);
        self.set_options(options)
    }

    fn set_open(&mut self, open: bool) -> Transition {
        if self.state.open == open {
            return Transition::Ignored;
        }
        self.state.open = open;
        debug!(open, "date picker visibility changed");
        Transition::Committed
    }
}

impl Engine for DatePickerEngine {
    type State = DatePickerState;
    type Action = DatePickerAction;

    fn state(&self) -> &DatePickerState {
        &self.state
    }

    fn apply(&mut self, action: DatePickerAction) -> Transition {
        match action {
            DatePickerAction::Open => self.set_open(true),
            DatePickerAction::Close => self.set_open(false),
            DatePickerAction::Toggle => self.set_open(!self.state.open),
            DatePickerAction::Select(None) => Transition::Ignored,
            DatePickerAction::Select(Some(date)) => {
                self.state = DatePickerState {
                    selected: date,
                    open: false,
                };
                let GridDate { year, month, day } = &self.state.selected;
                debug!("date selected: {year}/{month}/{day}");
                if let Some(on_select) = &self.on_select {
                    on_select.defer(self.state.selected.clone(), &mut self.effects);
                }
                Transition::Committed
            }
            DatePickerAction::Grid(action) => self.grid.apply(action),
        }
    }

    fn take_effects(&mut self) -> Effects {
        mem::take(&mut self.effects)
    }
}

impl fmt::Debug for DatePickerEngine {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.debug_struct("DatePickerEngine")
            .field("state", &self.state)
            .field("grid", &self.grid)
            .finish_non_exhaustive()
    }
}
