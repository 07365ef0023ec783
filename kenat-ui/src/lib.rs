//! Headless Ethiopian calendar widgets.
//!
//! Each widget is an [`Engine`]: a read-only state snapshot plus named
//! actions that produce the next snapshot. Nothing here draws; a UI toolkit
//! renders the state and routes events back into the actions, usually
//! through a [`Shared`] handle.
//!
//! - [`ClockEngine`] ticks and shows the time on both clocks.
//! - [`TimeConverterEngine`] converts a time of day in either direction.
//! - [`DateConverterEngine`] converts dates in either direction.
//! - [`MonthGridEngine`] navigates month grids.
//! - [`DatePickerEngine`] adds a popup and a selection to a month grid.
//!
//! Call [`init_tracing`] to see what the engines commit and reject.
#![deny(missing_docs, clippy::unwrap_used)]

pub mod clock;
pub mod date_converter;
pub mod date_picker;
pub mod engine;
pub mod error;
pub mod gateway;
pub mod listener;
mod logging;
pub mod month_grid;
pub mod shared;
pub mod ticker;
pub mod time_converter;
#[cfg(feature = "tokio")]
mod tokio_runtime;
pub mod wall_clock;

pub use kenat_calendar;

#[cfg(feature = "tokio")]
pub use crate::ticker::TokioTicker;
pub use crate::{
    clock::{ClockAction, ClockArgs, ClockDefaults, ClockEngine, ClockPhase, ClockState},
    date_converter::{
        Conversion, DateConverterAction, DateConverterArgs, DateConverterEngine, DateConverterState,
        DateSyncPolicy,
    },
    date_picker::{DatePickerAction, DatePickerArgs, DatePickerEngine, DatePickerState},
    engine::{Engine, Transition},
    error::{EngineError, MalformedStateError, TickerError},
    gateway::ConversionGateway,
    logging::init_tracing,
    month_grid::{MonthGridAction, MonthGridArgs, MonthGridDefaults, MonthGridEngine, MonthGridState},
    listener::{Callback, CallbackWith, Effects},
    shared::{Shared, WeakShared},
    ticker::{ManualTicker, TickSource, TickSubscription},
    time_converter::{
        DialInput, EthiopianDial, GregorianDial, TimeConverterAction, TimeConverterArgs, TimeConverterEngine,
        TimeConverterState,
    },
    wall_clock::{ManualWallClock, SystemWallClock, WallClock, WallClockDefaults},
};
