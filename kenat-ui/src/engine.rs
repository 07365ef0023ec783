//! The contract every headless engine follows.
//!
//! An engine owns a read-only state snapshot and changes it only through
//! [`Engine::apply`]. Named action methods on each engine are thin wrappers
//! that build an action and apply it.
//!
//! Listener calls triggered by an action are queued rather than made inside
//! [`Engine::apply`]. [`Engine::perform`] runs them right after the action,
//! and [`Shared::dispatch`](crate::Shared::dispatch) runs them after the
//! write lock is released.

use crate::{error::EngineError, listener::Effects};

/// Outcome of applying an action.
#[derive(Debug, Clone, PartialEq, Eq)]
#[must_use]
pub enum Transition {
    /// A new state snapshot was committed.
    Committed,
    /// The action did not apply to the current state; nothing changed.
    Ignored,
    /// The action was refused; nothing changed.
    Rejected(EngineError),
}

impl Transition {
    /// Returns true when a new snapshot was committed.
    pub fn is_committed(&self) -> bool {
        matches!(self, Transition::Committed)
    }

    /// Returns the rejection reason, if any.
    pub fn error(&self) -> Option<&EngineError> {
        match self {
            Transition::Rejected(err) => Some(err),
            _ => None,
        }
    }
}

/// A state container with an explicit transition function.
pub trait Engine {
    /// Read-only snapshot handed to renderers.
    type State;
    /// Named, side-effecting inputs.
    type Action;

    /// Returns the current snapshot.
    fn state(&self) -> &Self::State;

    /// Applies one action. All derived state commits together or not at all.
    ///
    /// Listener calls are queued, never made from here.
    fn apply(&mut self, action: Self::Action) -> Transition;

    /// Takes the listener calls queued by earlier actions.
    fn take_effects(&mut self) -> Effects {
        Effects::default()
    }

    /// Applies one action, then runs the listener calls it queued.
    fn perform(&mut self, action: Self::Action) -> Transition {
        let transition = self.apply(action);
        self.take_effects().run();
        transition
    }
}
