//! Two-way conversion between Gregorian and Ethiopian time of day.
//!
//! Inputs are dial values: anything out of range is pulled to the nearest
//! bound instead of being rejected.

use std::{fmt, sync::Arc};

use derive_setters::Setters;
use kenat_calendar::{EthiopianTime, GregorianTime, TimePeriod};
use tracing::debug;

use crate::{
    engine::{Engine, Transition},
    wall_clock::{WallClock, WallClockDefaults},
};

/// A raw hour or minute as typed or dragged by the user.
///
/// Text is parsed as a number. Values that are not numbers fall back to the
/// lower bound of the field; fractions are truncated toward zero.
#[derive(Debug, Clone, Copy, PartialEq)]
pub struct DialInput(Option<f64>);

impl DialInput {
    /// An input that is not a number.
    pub const INVALID: Self = Self(None);

    /// Pulls the input into `min..=max`.
    pub fn clamp(self, min: u8, max: u8) -> u8 {
        match self.0 {
            Some(value) if !value.is_nan() => value.trunc().clamp(min as f64, max as f64) as u8,
            _ => min,
        }
    }
}

macro_rules! dial_input_from_number {
    ($($ty:ty),*) => {
        $(
            impl From<$ty> for DialInput {
                fn from(value: $ty) -> Self {
                    Self(Some(value as f64))
                }
            }
        )*
    };
}

dial_input_from_number!(i8, i16, i32, i64, isize, u8, u16, u32, u64, usize, f32, f64);

impl From<&str> for DialInput {
    fn from(text: &str) -> Self {
        Self(text.trim().parse::<f64>().ok())
    }
}

impl From<String> for DialInput {
    fn from(text: String) -> Self {
        Self::from(text.as_str())
    }
}

impl<T: Into<DialInput>> From<Option<T>> for DialInput {
    fn from(value: Option<T>) -> Self {
        value.map_or(Self::INVALID, Into::into)
    }
}

/// A Gregorian hour and minute on the dial.
#[derive(Debug, Clone, Copy, PartialEq)]
pub struct GregorianDial {
    /// Hour, 0-23 after clamping.
    pub hour: DialInput,
    /// Minute, 0-59 after clamping.
    pub minute: DialInput,
}

impl GregorianDial {
    fn resolve(self) -> GregorianTime {
        GregorianTime::new(self.hour.clamp(0, 23), self.minute.clamp(0, 59), 0)
    }
}

impl<H: Into<DialInput>, M: Into<DialInput>> From<(H, M)> for GregorianDial {
    fn from((hour, minute): (H, M)) -> Self {
        Self {
            hour: hour.into(),
            minute: minute.into(),
        }
    }
}

/// An Ethiopian hour, minute and period on the dial.
#[derive(Debug, Clone, Copy, PartialEq)]
pub struct EthiopianDial {
    /// Hour, 1-12 after clamping.
    pub hour: DialInput,
    /// Minute, 0-59 after clamping.
    pub minute: DialInput,
    /// Taken as given.
    pub period: TimePeriod,
}

impl EthiopianDial {
    fn resolve(self) -> EthiopianTime {
        EthiopianTime::saturating(self.hour.clamp(1, 12), self.minute.clamp(0, 59), self.period)
    }
}

impl<H: Into<DialInput>, M: Into<DialInput>> From<(H, M, TimePeriod)> for EthiopianDial {
    fn from((hour, minute, period): (H, M, TimePeriod)) -> Self {
        Self {
            hour: hour.into(),
            minute: minute.into(),
            period,
        }
    }
}

/// Configuration for [`TimeConverterEngine`].
///
/// An Ethiopian starting time wins over a Gregorian one. With neither, both
/// views start at the wall clock's current time.
#[derive(Clone, Setters)]
pub struct TimeConverterArgs {
    /// Starting Ethiopian time.
    #[setters(strip_option, into)]
    pub ethiopian: Option<EthiopianDial>,
    /// Starting Gregorian time.
    #[setters(strip_option, into)]
    pub gregorian: Option<GregorianDial>,
    /// Source of the current time when no starting time is given.
    pub wall_clock: Arc<dyn WallClock>,
}

impl Default for TimeConverterArgs {
    fn default() -> Self {
        Self {
            ethiopian: None,
            gregorian: None,
            wall_clock: WallClockDefaults::system(),
        }
    }
}

impl fmt::Debug for TimeConverterArgs {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.debug_struct("TimeConverterArgs")
            .field("ethiopian", &self.ethiopian)
            .field("gregorian", &self.gregorian)
            .finish_non_exhaustive()
    }
}

/// Both views of the same time of day.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct TimeConverterState {
    /// Ethiopian reading.
    pub ethiopian: EthiopianTime,
    /// Gregorian reading. Seconds are always zero.
    pub gregorian: GregorianTime,
}

impl TimeConverterState {
    fn from_gregorian(gregorian: GregorianTime) -> Self {
        Self {
            ethiopian: EthiopianTime::from_gregorian(gregorian.hour, gregorian.minute),
            gregorian,
        }
    }

    fn from_ethiopian(ethiopian: EthiopianTime) -> Self {
        Self {
            ethiopian,
            gregorian: ethiopian.to_gregorian(),
        }
    }
}

/// Actions accepted by [`TimeConverterEngine`].
#[derive(Debug, Clone, Copy, PartialEq)]
pub enum TimeConverterAction {
    /// Sets the Gregorian side and derives the Ethiopian one.
    SetGregorian(GregorianDial),
    /// Sets the Ethiopian side and derives the Gregorian one.
    SetEthiopian(EthiopianDial),
}

/// The time converter engine.
#[derive(Debug, Clone)]
pub struct TimeConverterEngine {
    state: TimeConverterState,
}

impl TimeConverterEngine {
    /// Creates the engine from its starting time.
    pub fn new(args: TimeConverterArgs) -> Self {
        let state = match (args.ethiopian, args.gregorian) {
            (Some(ethiopian), _) => TimeConverterState::from_ethiopian(ethiopian.resolve()),
            (None, Some(gregorian)) => TimeConverterState::from_gregorian(gregorian.resolve()),
            (None, None) => {
                let now = args.wall_clock.now().time;
                TimeConverterState::from_gregorian(GregorianTime::new(now.hour, now.minute, 0))
            }
        };
        Self { state }
    }

    /// Sets the Gregorian hour and minute.
    pub fn set_gregorian_time(&mut self, hour: impl Into<DialInput>, minute: impl Into<DialInput>) -> Transition {
        self.apply(TimeConverterAction::SetGregorian((hour, minute).into()))
    }

    /// Sets the Ethiopian hour, minute and period.
    pub fn set_ethiopian_time(
        &mut self,
        hour: impl Into<DialInput>,
        minute: impl Into<DialInput>,
        period: TimePeriod,
    ) -> Transition {
        self.apply(TimeConverterAction::SetEthiopian((hour, minute, period).into()))
    }
}

impl Engine for TimeConverterEngine {
    type State = TimeConverterState;
    type Action = TimeConverterAction;

    fn state(&self) -> &TimeConverterState {
        &self.state
    }

    fn apply(&mut self, action: TimeConverterAction) -> Transition {
        self.state = match action {
            TimeConverterAction::SetGregorian(dial) => TimeConverterState::from_gregorian(dial.resolve()),
            TimeConverterAction::SetEthiopian(dial) => TimeConverterState::from_ethiopian(dial.resolve()),
        };
        debug!(
            gregorian = %self.state.gregorian,
            ethiopian = %self.state.ethiopian,
            "time converter updated"
        );
        Transition::Committed
    }
}
