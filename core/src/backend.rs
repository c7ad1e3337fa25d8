//! Traits for host collaborators.
//!
//! The side menu never renders anything itself. Surfaces are placed by a [`Container`], movement
//! is carried out by an [`Animator`] and tactile feedback goes through a [`HapticEmitter`].

use crate::id::SurfaceId;
use crate::preferences::{AnimationCurve, ImpactStyle};
use crate::state::Direction;
use core::time::Duration;

/// How an attached surface is sized relative to its container.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum Attachment {
    /// Pinned to all four edges of the container.
    Constraints,
    /// Frame set to the container bounds once, then resized along with it.
    Autoresizing,
}

/// A host container that surfaces can be added to and removed from.
pub trait Container {
    /// Error type.
    type Error;

    /// Adds `surface` as a child of `into`.
    fn attach(
        &mut self,
        surface: SurfaceId,
        into: SurfaceId,
        attachment: Attachment,
    ) -> Result<(), Self::Error>;

    /// Removes `surface` from its parent.
    fn detach(&mut self, surface: SurfaceId) -> Result<(), Self::Error>;
}

/// Parameters for one transition effect.
#[derive(Debug, Clone, Copy, PartialEq)]
pub struct AnimationParams {
    pub direction: Direction,
    /// Progress the effect starts at.
    pub from: f64,
    /// Progress the effect ends at. 1 completes the transition; 0 reverts it.
    pub to: f64,
    pub duration: Duration,
    pub curve: AnimationCurve,
}

impl AnimationParams {
    pub fn is_instant(&self) -> bool {
        self.duration == Duration::from_secs(0)
    }
}

/// Runs transition effects.
///
/// `on_complete` must be called exactly once, with `true` if the effect ran to the end. It may be
/// called before `animate` returns.
pub trait Animator: Send + Sync {
    fn animate(&self, params: AnimationParams, on_complete: Box<dyn FnOnce(bool) + Send>);
}

/// An animator that finishes every effect immediately.
#[derive(Debug, Clone, Copy, Default)]
pub struct ImmediateAnimator;

impl Animator for ImmediateAnimator {
    fn animate(&self, _params: AnimationParams, on_complete: Box<dyn FnOnce(bool) + Send>) {
        on_complete(true);
    }
}

/// Fire-and-forget haptic feedback. Failures are swallowed by the implementation.
pub trait HapticEmitter: Send + Sync {
    fn impact(&self, style: ImpactStyle);
}

/// Emits nothing.
#[derive(Debug, Clone, Copy, Default)]
pub struct NoHaptics;

impl HapticEmitter for NoHaptics {
    fn impact(&self, _style: ImpactStyle) {}
}
