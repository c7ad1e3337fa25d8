//! Gesture events.

/// Kinds of gestures the side menu reacts to.
#[repr(u8)]
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum GestureKind {
    /// A horizontal pan that drags the menu in or out.
    Pan = 0,
    /// A tap on the content.
    Tap = 1,
}

/// Gesture phases, in the order a recognizer reports them.
#[repr(u8)]
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum GesturePhase {
    Began = 0,
    Changed = 1,
    /// The gesture ended normally; for pans, the final progress decides the outcome.
    Ended = 2,
    /// The recognizer gave up on the gesture, e.g. because another view took over the pointer.
    Cancelled = 3,
}

/// A gesture update from the host’s recognizer.
#[derive(Debug, Clone, Copy, PartialEq)]
pub struct GestureEvent {
    pub kind: GestureKind,
    pub phase: GesturePhase,
    /// Progress of the transition the gesture drives, between 0 and 1. Always 0 for taps.
    pub progress: f64,
}

impl GestureEvent {
    pub fn pan(phase: GesturePhase, progress: f64) -> GestureEvent {
        GestureEvent {
            kind: GestureKind::Pan,
            phase,
            progress,
        }
    }

    /// A completed tap.
    pub fn tap() -> GestureEvent {
        GestureEvent {
            kind: GestureKind::Tap,
            phase: GesturePhase::Ended,
            progress: 0.,
        }
    }

    /// Progress clamped to `0.0..=1.0`; NaN counts as zero.
    pub fn clamped_progress(&self) -> f64 {
        if self.progress.is_nan() {
            0.
        } else {
            self.progress.max(0.).min(1.)
        }
    }
}
