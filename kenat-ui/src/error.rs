//! Errors surfaced by the engines.

use kenat_calendar::{CalendarError, GridDate};
use thiserror::Error;

/// A date field that held Ge'ez text where a number was required.
#[derive(Debug, Clone, PartialEq, Eq, Error)]
#[error("{field} of the selected date is not numeric: {text:?}")]
pub struct MalformedStateError {
    /// Name of the offending field (`year`, `month` or `day`).
    pub field: &'static str,
    /// The text found in that field.
    pub text: String,
}

impl MalformedStateError {
    /// Returns the first non-numeric field of `date`, if any.
    pub fn check(date: &GridDate) -> Result<(), Self> {
        for (field, numeral) in [("year", &date.year), ("month", &date.month), ("day", &date.day)] {
            if numeral.as_number().is_none() {
                return Err(Self {
                    field,
                    text: numeral.to_string(),
                });
            }
        }
        Ok(())
    }
}

/// Reasons an engine action was rejected.
#[derive(Debug, Clone, PartialEq, Eq, Error)]
pub enum EngineError {
    /// The calendar rejected the requested value.
    #[error(transparent)]
    Calendar(#[from] CalendarError),
    /// Engine state holds a value that cannot be used numerically.
    #[error(transparent)]
    MalformedState(#[from] MalformedStateError),
}

/// Failures while acquiring a timer.
#[derive(Debug, Error)]
pub enum TickerError {
    /// The async runtime could not be started.
    #[error("failed to start timer runtime: {0}")]
    Runtime(#[from] std::io::Error),
}
