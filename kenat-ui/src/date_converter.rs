//! Ethiopian and Gregorian date fields that convert into each other.
//!
//! Each field change runs one row of a fixed reaction table:
//!
//! | change       | conversion      | writes                                   |
//! |--------------|-----------------|------------------------------------------|
//! | `ec_date`    | `to_gregorian`  | `converted_gc`                           |
//! | `gc_date`    | `to_ethiopian`  | `converted_ec`, seeds `ec_date` once     |
//!
//! Under [`DateSyncPolicy::Mirror`] a successful conversion also overwrites
//! the opposite field. Writes made by a reaction never trigger another
//! reaction, except the one-time seed of `ec_date` which runs the `ec_date`
//! row so that `converted_gc` is filled in as well.

use std::{fmt, sync::Arc};

use derive_setters::Setters;
use kenat_calendar::{CalendarError, EthiopianDate, GregorianDate};
use tracing::debug;

use crate::{
    engine::{Engine, Transition},
    gateway::ConversionGateway,
    wall_clock::{WallClock, WallClockDefaults},
};

/// Result of converting one field, ready for display.
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum Conversion<D> {
    /// The converted date.
    Converted(D),
    /// Why the conversion failed.
    Failed(String),
}

impl<D: fmt::Display> Conversion<D> {
    /// Renders the date as `Y/M/D`, or the failure prefixed with `❌`.
    pub fn display(&self) -> String {
        self.to_string()
    }
}

impl<D: fmt::Display> fmt::Display for Conversion<D> {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            Conversion::Converted(date) => write!(f, "{date}"),
            Conversion::Failed(message) => write!(f, "❌ {message}"),
        }
    }
}

impl<D> Conversion<D> {
    /// Returns the converted date, if any.
    pub fn date(&self) -> Option<&D> {
        match self {
            Conversion::Converted(date) => Some(date),
            Conversion::Failed(_) => None,
        }
    }

    /// Returns true when the conversion failed.
    pub fn is_failed(&self) -> bool {
        matches!(self, Conversion::Failed(_))
    }
}

impl<D> From<Result<D, CalendarError>> for Conversion<D> {
    fn from(result: Result<D, CalendarError>) -> Self {
        match result {
            Ok(date) => Conversion::Converted(date),
            Err(err) => Conversion::Failed(err.to_string()),
        }
    }
}

/// How the two date fields follow each other.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default)]
#[cfg_attr(feature = "serde", derive(serde::Serialize, serde::Deserialize))]
pub enum DateSyncPolicy {
    /// The Gregorian field seeds an empty Ethiopian field once. After that
    /// the two fields are edited independently and may disagree.
    #[default]
    BootstrapOnce,
    /// The field edited last is authoritative and the other field is
    /// overwritten with its conversion.
    Mirror,
}

/// Configuration for [`DateConverterEngine`].
#[derive(Clone, Setters)]
pub struct DateConverterArgs {
    /// Starting Ethiopian date.
    #[setters(strip_option)]
    pub ec: Option<EthiopianDate>,
    /// Starting Gregorian date. Defaults to today when neither date is set.
    #[setters(strip_option)]
    pub gc: Option<GregorianDate>,
    /// Sync policy.
    pub policy: DateSyncPolicy,
    /// Source of today's date.
    pub wall_clock: Arc<dyn WallClock>,
}

impl Default for DateConverterArgs {
    fn default() -> Self {
        Self {
            ec: None,
            gc: None,
            policy: DateSyncPolicy::default(),
            wall_clock: WallClockDefaults::system(),
        }
    }
}

impl fmt::Debug for DateConverterArgs {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.debug_struct("DateConverterArgs")
            .field("ec", &self.ec)
            .field("gc", &self.gc)
            .field("policy", &self.policy)
            .finish_non_exhaustive()
    }
}

/// Snapshot of both fields and their conversions.
#[derive(Debug, Clone, PartialEq, Eq, Default)]
pub struct DateConverterState {
    /// Ethiopian field.
    pub ec_date: Option<EthiopianDate>,
    /// Gregorian field.
    pub gc_date: Option<GregorianDate>,
    /// Last conversion of the Gregorian field.
    pub converted_ec: Option<Conversion<EthiopianDate>>,
    /// Last conversion of the Ethiopian field.
    pub converted_gc: Option<Conversion<GregorianDate>>,
}

/// Actions accepted by [`DateConverterEngine`].
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum DateConverterAction {
    /// Replaces the Ethiopian field.
    SetEc(Option<EthiopianDate>),
    /// Replaces the Gregorian field.
    SetGc(Option<GregorianDate>),
}

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
enum Field {
    Ec,
    Gc,
}

/// The date converter engine.
#[derive(Debug, Clone)]
pub struct DateConverterEngine {
    state: DateConverterState,
    policy: DateSyncPolicy,
    ec_populated: bool,
}

impl DateConverterEngine {
    /// Creates the engine and settles the starting fields.
    pub fn new(args: DateConverterArgs) -> Self {
        let gc = match (args.ec, args.gc) {
            (None, None) => Some(args.wall_clock.now().date),
            (_, gc) => gc,
        };
        let mut engine = Self {
            state: DateConverterState::default(),
            policy: args.policy,
            ec_populated: false,
        };
        let mut next = engine.state.clone();
        next.ec_date = args.ec;
        next.gc_date = gc;
        if args.ec.is_some() {
            engine.ec_populated = true;
            engine.react(&mut next, Field::Ec);
        }
        if gc.is_some() {
            engine.react(&mut next, Field::Gc);
        }
        engine.state = next;
        engine
    }

    /// Returns the sync policy.
    pub fn policy(&self) -> DateSyncPolicy {
        self.policy
    }

    /// Replaces the Ethiopian field.
    pub fn set_ec_date(&mut self, date: Option<EthiopianDate>) -> Transition {
        self.apply(DateConverterAction::SetEc(date))
    }

    /// Replaces the Gregorian field.
    pub fn set_gc_date(&mut self, date: Option<GregorianDate>) -> Transition {
        self.apply(DateConverterAction::SetGc(date))
    }

    fn react(&mut self, next: &mut DateConverterState, changed: Field) {
        match changed {
            Field::Ec => {
                let Some(ec) = next.ec_date else {
                    return;
                };
                let converted = ConversionGateway::to_gregorian(ec);
                if let (DateSyncPolicy::Mirror, Ok(gc)) = (self.policy, &converted) {
                    next.gc_date = Some(*gc);
                    next.converted_ec = Some(Conversion::Converted(ec));
                }
                next.converted_gc = Some(converted.into());
            }
            Field::Gc => {
                let Some(gc) = next.gc_date else {
                    return;
                };
                let converted = ConversionGateway::to_ethiopian(gc);
                if let Ok(ec) = converted {
                    match self.policy {
                        DateSyncPolicy::BootstrapOnce if !self.ec_populated => {
                            next.ec_date = Some(ec);
                            self.ec_populated = true;
                            debug!(%ec, "seeded Ethiopian date from Gregorian");
                            self.react(next, Field::Ec);
                        }
                        DateSyncPolicy::BootstrapOnce => {}
                        DateSyncPolicy::Mirror => {
                            next.ec_date = Some(ec);
                            next.converted_gc = Some(Conversion::Converted(gc));
                        }
                    }
                }
                next.converted_ec = Some(converted.into());
            }
        }
    }
}

impl Engine for DateConverterEngine {
    type State = DateConverterState;
    type Action = DateConverterAction;

    fn state(&self) -> &DateConverterState {
        &self.state
    }

    fn apply(&mut self, action: DateConverterAction) -> Transition {
        let mut next = self.state.clone();
        let changed = match action {
            DateConverterAction::SetEc(date) => {
                next.ec_date = date;
                self.ec_populated |= date.is_some();
                Field::Ec
            }
            DateConverterAction::SetGc(date) => {
                next.gc_date = date;
                Field::Gc
            }
        };
        self.react(&mut next, changed);
        self.state = next;
        debug!(
            ec = ?self.state.ec_date,
            gc = ?self.state.gc_date,
            "date converter updated"
        );
        Transition::Committed
    }
}

#[cfg(test)]
mod tests {
    use kenat_calendar::{GregorianDateTime, GregorianTime};

    use super::*;
    use crate::wall_clock::ManualWallClock;

    #[test]
    fn test_gregorian_bootstraps_ethiopian_once() {
        let mut engine = DateConverterEngine::new(DateConverterArgs::default().gc(GregorianDate::new(2024, 6, 13)));
        let state = engine.state().clone();
        assert_eq!(Some(EthiopianDate::new(2016, 10, 6)), state.ec_date);
        assert_eq!("2016/10/6", state.converted_ec.unwrap().display());
        assert_eq!("2024/6/13", state.converted_gc.unwrap().display());

        let _ = engine.set_gc_date(Some(GregorianDate::new(2024, 1, 7)));
        let state = engine.state();
        assert_eq!(Some(EthiopianDate::new(2016, 10, 6)), state.ec_date);
        assert_eq!(
            Some(&EthiopianDate::new(2016, 4, 28)),
            state.converted_ec.as_ref().and_then(Conversion::date)
        );
    }

    #[test]
    fn test_ethiopian_edit_never_overwrites_gregorian() {
        let mut engine = DateConverterEngine::new(DateConverterArgs::default().gc(GregorianDate::new(2024, 6, 13)));
        let _ = engine.set_ec_date(Some(EthiopianDate::new(2015, 13, 6)));
        let state = engine.state();
        assert_eq!(Some(GregorianDate::new(2024, 6, 13)), state.gc_date);
        assert_eq!(
            Some("2023/9/11".to_string()),
            state.converted_gc.as_ref().map(Conversion::display)
        );
    }

    #[test]
    fn test_initial_ethiopian_leaves_gregorian_unset() {
        let engine = DateConverterEngine::new(DateConverterArgs::default().ec(EthiopianDate::new(2016, 10, 7)));
        let state = engine.state();
        assert_eq!(None, state.gc_date);
        assert_eq!(None, state.converted_ec);
        assert_eq!(
            Some(&GregorianDate::new(2024, 6, 14)),
            state.converted_gc.as_ref().and_then(Conversion::date)
        );
    }

    #[test]
    fn test_defaults_to_today() {
        let wall = ManualWallClock::new(GregorianDateTime::new(
            GregorianDate::new(2023, 9, 12),
            GregorianTime::new(9, 0, 0),
        ));
        let engine = DateConverterEngine::new(DateConverterArgs::default().wall_clock(Arc::new(wall)));
        assert_eq!(Some(GregorianDate::new(2023, 9, 12)), engine.state().gc_date);
        assert_eq!(Some(EthiopianDate::new(2016, 1, 1)), engine.state().ec_date);
    }

    #[test]
    fn test_failure_is_tagged_in_state() {
        let mut engine = DateConverterEngine::new(DateConverterArgs::default().ec(EthiopianDate::new(2016, 1, 1)));
        assert!(engine.set_ec_date(Some(EthiopianDate::new(2016, 13, 6))).is_committed());
        let converted = engine.state().converted_gc.clone().unwrap();
        assert!(converted.is_failed());
        assert!(converted.display().starts_with("❌ "));
        assert_eq!(Some(EthiopianDate::new(2016, 13, 6)), engine.state().ec_date);
    }

    #[test]
    fn test_clearing_a_field_keeps_last_conversion() {
        let mut engine = DateConverterEngine::new(DateConverterArgs::default().ec(EthiopianDate::new(2016, 10, 7)));
        let before = engine.state().converted_gc.clone();
        let _ = engine.set_ec_date(None);
        assert_eq!(None, engine.state().ec_date);
        assert_eq!(before, engine.state().converted_gc);
    }

    #[test]
    fn test_mirror_policy_keeps_fields_in_step() {
        let mut engine = DateConverterEngine::new(
            DateConverterArgs::default()
                .gc(GregorianDate::new(2024, 6, 13))
                .policy(DateSyncPolicy::Mirror),
        );
        let _ = engine.set_ec_date(Some(EthiopianDate::new(2016, 4, 28)));
        assert_eq!(Some(GregorianDate::new(2024, 1, 7)), engine.state().gc_date);

        let _ = engine.set_gc_date(Some(GregorianDate::new(2023, 9, 11)));
        let state = engine.state();
        assert_eq!(Some(EthiopianDate::new(2015, 13, 6)), state.ec_date);
        assert_eq!(
            Some(&GregorianDate::new(2023, 9, 11)),
            state.converted_gc.as_ref().and_then(Conversion::date)
        );

        let _ = engine.set_gc_date(Some(GregorianDate::new(2023, 2, 30)));
        let state = engine.state();
        assert_eq!(Some(EthiopianDate::new(2015, 13, 6)), state.ec_date);
        assert!(state.converted_ec.as_ref().is_some_and(Conversion::is_failed));
    }
}
