//! Uniform wrapper around the calendar conversions.
//!
//! Engines never call [`kenat_calendar::to_gregorian`] directly; going through
//! [`ConversionGateway`] keeps failure logging in one place.

use kenat_calendar::{CalendarError, EthiopianDate, GregorianDate};
use tracing::warn;

/// Stateless conversion entry point.
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq)]
pub struct ConversionGateway;

impl ConversionGateway {
    /// Converts an Ethiopian date to the Gregorian calendar.
    pub fn to_gregorian(date: EthiopianDate) -> Result<GregorianDate, CalendarError> {
        kenat_calendar::to_gregorian(date).inspect_err(|err| {
            warn!("cannot convert {date} to Gregorian: {err}");
        })
    }

    /// Converts a Gregorian date to the Ethiopian calendar.
    pub fn to_ethiopian(date: GregorianDate) -> Result<EthiopianDate, CalendarError> {
        kenat_calendar::to_ethiopian(date).inspect_err(|err| {
            warn!("cannot convert {date} to Ethiopian: {err}");
        })
    }
}
