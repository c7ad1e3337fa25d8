//! Decides whether a transition may start.

use crate::backend::AnimationParams;
use crate::preferences::{InFlightPolicy, Preferences};
use crate::state::{Direction, MenuState};
use core::time::Duration;

/// Why a request was turned down.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum Denial {
    /// The menu is blocked and the request would reveal it.
    Blocked,
    /// The menu is already where the request would take it.
    AlreadySettled,
    /// A transition in the same direction is already running.
    InFlight,
    /// An observer answered `should_reveal` with false.
    Vetoed,
}

/// Outcome of evaluating a request.
#[derive(Debug, Clone, Copy, PartialEq)]
pub enum Decision {
    /// Start the transition with these parameters.
    Proceed(AnimationParams),
    /// Queue the request until the running transition settles.
    Defer,
    Deny(Denial),
}

/// Pure transition policy, derived from a controller’s preferences.
#[derive(Debug, Clone)]
pub struct TransitionPolicy {
    preferences: Preferences,
}

impl TransitionPolicy {
    pub fn new(preferences: &Preferences) -> TransitionPolicy {
        TransitionPolicy {
            preferences: preferences.clone(),
        }
    }

    /// Everything [`decide`](Self::decide) checks except the observer veto.
    pub fn should_allow(&self, state: MenuState, direction: Direction, blocked: bool) -> bool {
        self.precheck(state, direction, blocked).is_none()
    }

    /// Evaluates a request.
    ///
    /// `should_reveal` is consulted last and only for reveals that would otherwise proceed; hiding
    /// is never vetoed so the menu cannot become unclosable.
    pub fn decide<F>(
        &self,
        state: MenuState,
        direction: Direction,
        blocked: bool,
        animated: bool,
        should_reveal: F,
    ) -> Decision
    where
        F: FnOnce() -> bool,
    {
        if let Some(decision) = self.precheck(state, direction, blocked) {
            return decision;
        }
        if direction == Direction::Reveal && !should_reveal() {
            return Decision::Deny(Denial::Vetoed);
        }
        Decision::Proceed(self.params(direction, 0., 1., animated))
    }

    fn precheck(&self, state: MenuState, direction: Direction, blocked: bool) -> Option<Decision> {
        if blocked && direction == Direction::Reveal {
            return Some(Decision::Deny(Denial::Blocked));
        }
        match state.in_flight() {
            None if state == direction.target() => Some(Decision::Deny(Denial::AlreadySettled)),
            None => None,
            Some(running) if running != direction => Some(Decision::Defer),
            Some(_) => match self.preferences.same_direction_in_flight {
                InFlightPolicy::Ignore => Some(Decision::Deny(Denial::InFlight)),
                InFlightPolicy::Queue => Some(Decision::Defer),
            },
        }
    }

    /// Animation parameters for moving from `from` to `to` progress.
    ///
    /// The duration is scaled by the distance covered, so finishing a half-done pan takes half as
    /// long as a full transition.
    pub fn params(&self, direction: Direction, from: f64, to: f64, animated: bool) -> AnimationParams {
        let distance = (to - from).abs();
        let duration = if !animated {
            Duration::from_secs(0)
        } else if distance >= 1. {
            self.preferences.duration(direction)
        } else {
            self.preferences.duration(direction).mul_f64(distance)
        };
        AnimationParams {
            direction,
            from,
            to,
            duration,
            curve: self.preferences.curve,
        }
    }
}
