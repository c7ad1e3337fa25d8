//! Events.

use cgmath::{Point2, Vector2};
use core::time::Duration;

/// Types of pointing devices or mechanisms.
#[repr(u8)]
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum PointerDevice {
    /// Touch input from a finger or something of the sort; is expected to be imprecise.
    Touch = 0,

    /// Pen input.
    Pen = 1,

    /// Any indirect input mechanism.
    Cursor = 2,
}

impl PointerDevice {
    /// If true, the input mechanism is volatile and can’t be expected to hold perfectly still.
    ///
    /// A tap with these moves a tiny bit, e.g. when you lift the pen from the screen.
    pub fn is_volatile(&self) -> bool {
        match self {
            PointerDevice::Touch | PointerDevice::Pen => true,
            PointerDevice::Cursor => false,
        }
    }

    /// How far the pointer may travel before a press turns into a pan.
    pub fn slop(&self) -> f64 {
        if self.is_volatile() {
            10.
        } else {
            3.
        }
    }
}

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum PointerPhase {
    Down,
    Moved,
    Up,
    /// The system took the pointer away, e.g. for a system gesture.
    Cancelled,
}

/// A pointer event.
#[derive(Debug, Clone, Copy, PartialEq)]
pub struct Pointer {
    /// Unique ID of the pointer. Stays the same from `Down` to `Up`.
    pub id: u64,

    pub phase: PointerPhase,

    /// Event location in the window coordinate system.
    pub location: Point2<f64>,

    /// The device type that emitted this pointer event.
    pub device: PointerDevice,
}

impl Pointer {
    pub fn touch(id: u64, phase: PointerPhase, x: f64, y: f64) -> Pointer {
        Pointer {
            id,
            phase,
            location: Point2::new(x, y),
            device: PointerDevice::Touch,
        }
    }
}

/// Everything a [`Host`](crate::Host) reacts to.
#[derive(Debug, Clone, PartialEq)]
pub enum HostEvent {
    Pointer(Pointer),

    /// A display frame; time passed since the previous one.
    Frame(Duration),

    /// The window was resized.
    Resize(Vector2<f64>),

    /// Reveals the active side menu, e.g. from a toolbar button.
    Reveal,

    /// Hides the active side menu.
    Hide,

    /// Toggles the active side menu.
    Toggle,

    /// Blocks or unblocks revealing on every side menu.
    SetBlocked(bool),
}
