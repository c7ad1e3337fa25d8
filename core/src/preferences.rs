//! Side menu preferences.

use core::time::Duration;
use thiserror::Error;

#[cfg(feature = "serde")]
use serde::Deserialize;

/// Which edge of the container the menu is attached to.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
#[cfg_attr(feature = "serde", derive(Deserialize))]
pub enum MenuPosition {
    Left,
    Right,
}

impl MenuPosition {
    /// Sign of the horizontal translation that reveals the menu.
    pub fn reveal_sign(&self) -> f64 {
        match self {
            MenuPosition::Left => 1.,
            MenuPosition::Right => -1.,
        }
    }
}

/// How the menu is stacked relative to the content.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
#[cfg_attr(feature = "serde", derive(Deserialize))]
pub enum MenuPresentation {
    /// The menu slides in above the content.
    Above,
    /// The content slides away to uncover the menu.
    Below,
    /// Menu and content move together.
    SideBySide,
}

/// Timing curve handed to the animator. The curve itself is implemented by the host.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
#[cfg_attr(feature = "serde", derive(Deserialize))]
pub enum AnimationCurve {
    Linear,
    EaseIn,
    EaseOut,
    EaseInOut,
}

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
#[cfg_attr(feature = "serde", derive(Deserialize))]
pub enum BlurStyle {
    Light,
    Regular,
    Dark,
}

/// Treatment of the content while the menu is visible.
#[derive(Debug, Clone, Copy, PartialEq)]
#[cfg_attr(feature = "serde", derive(Deserialize))]
pub enum Dimming {
    None,
    /// Black overlay with the given alpha at full reveal.
    Color { alpha: f64 },
    Blur(BlurStyle),
}

/// Haptic impact strength.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
#[cfg_attr(feature = "serde", derive(Deserialize))]
pub enum ImpactStyle {
    Light,
    Medium,
    Heavy,
}

/// What happens to a request in the same direction as a transition that is already running.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
#[cfg_attr(feature = "serde", derive(Deserialize))]
pub enum InFlightPolicy {
    /// Drop it.
    Ignore,
    /// Queue it to run once the current transition settles.
    Queue,
}

/// Errors that may occur when loading or validating preferences.
#[derive(Debug, Error)]
pub enum ConfigError {
    #[error("menu width must be positive and finite, got {0}")]
    InvalidWidth(f64),
    #[error("completion threshold must be within 0..=1, got {0}")]
    InvalidThreshold(f64),
    #[error("edge pan tolerance must not be negative, got {0}")]
    InvalidEdgeTolerance(f64),
    #[error("dimming alpha must be within 0..=1, got {0}")]
    InvalidDimming(f64),
    #[cfg(feature = "serde")]
    #[error("failed to parse preferences: {0}")]
    Parse(#[from] ron::error::SpannedError),
}

/// Side menu configuration.
///
/// A controller copies its preferences when it is created and never changes them afterwards.
#[derive(Debug, Clone, PartialEq)]
#[cfg_attr(feature = "serde", derive(Deserialize))]
#[cfg_attr(feature = "serde", serde(default))]
pub struct Preferences {
    /// Menu width in points.
    pub menu_width: f64,
    pub position: MenuPosition,
    pub presentation: MenuPresentation,
    pub enable_pan_gesture: bool,
    /// If true, tapping the content while the menu is revealed hides it.
    pub enable_tap_to_hide: bool,
    pub reveal_duration: Duration,
    pub hide_duration: Duration,
    pub curve: AnimationCurve,
    pub dimming: Dimming,
    /// Distance from the container edge (in points) in which a pan may begin revealing the menu.
    pub edge_pan_tolerance: f64,
    /// Gesture progress at or above which a released pan completes its transition.
    pub completion_threshold: f64,
    pub same_direction_in_flight: InFlightPolicy,
    /// Impact emitted when a gesture commits a transition.
    pub haptic_feedback: Option<ImpactStyle>,
    /// Initial value of the controller’s block flag.
    pub blocked: bool,
}

impl Default for Preferences {
    fn default() -> Self {
        Preferences {
            menu_width: 300.,
            position: MenuPosition::Left,
            presentation: MenuPresentation::Below,
            enable_pan_gesture: true,
            enable_tap_to_hide: true,
            reveal_duration: Duration::from_millis(300),
            hide_duration: Duration::from_millis(300),
            curve: AnimationCurve::EaseInOut,
            dimming: Dimming::None,
            edge_pan_tolerance: 40.,
            completion_threshold: 0.5,
            same_direction_in_flight: InFlightPolicy::Ignore,
            haptic_feedback: Some(ImpactStyle::Light),
            blocked: false,
        }
    }
}

impl Preferences {
    pub fn with_menu_width(mut self, width: f64) -> Self {
        self.menu_width = width;
        self
    }

    pub fn with_position(mut self, position: MenuPosition) -> Self {
        self.position = position;
        self
    }

    pub fn with_presentation(mut self, presentation: MenuPresentation) -> Self {
        self.presentation = presentation;
        self
    }

    pub fn with_pan_gesture(mut self, enabled: bool) -> Self {
        self.enable_pan_gesture = enabled;
        self
    }

    pub fn with_tap_to_hide(mut self, enabled: bool) -> Self {
        self.enable_tap_to_hide = enabled;
        self
    }

    /// Sets both the reveal and the hide duration.
    pub fn with_duration(mut self, duration: Duration) -> Self {
        self.reveal_duration = duration;
        self.hide_duration = duration;
        self
    }

    pub fn with_curve(mut self, curve: AnimationCurve) -> Self {
        self.curve = curve;
        self
    }

    pub fn with_dimming(mut self, dimming: Dimming) -> Self {
        self.dimming = dimming;
        self
    }

    pub fn with_edge_pan_tolerance(mut self, tolerance: f64) -> Self {
        self.edge_pan_tolerance = tolerance;
        self
    }

    pub fn with_completion_threshold(mut self, threshold: f64) -> Self {
        self.completion_threshold = threshold;
        self
    }

    pub fn with_same_direction_in_flight(mut self, policy: InFlightPolicy) -> Self {
        self.same_direction_in_flight = policy;
        self
    }

    pub fn with_haptic_feedback(mut self, style: Option<ImpactStyle>) -> Self {
        self.haptic_feedback = style;
        self
    }

    pub fn with_blocked(mut self, blocked: bool) -> Self {
        self.blocked = blocked;
        self
    }

    /// Checks that all numeric values are in range.
    pub fn validate(&self) -> Result<(), ConfigError> {
        if !(self.menu_width.is_finite() && self.menu_width > 0.) {
            return Err(ConfigError::InvalidWidth(self.menu_width));
        }
        if !(0. ..=1.).contains(&self.completion_threshold) {
            return Err(ConfigError::InvalidThreshold(self.completion_threshold));
        }
        if !(self.edge_pan_tolerance >= 0.) {
            return Err(ConfigError::InvalidEdgeTolerance(self.edge_pan_tolerance));
        }
        if let Dimming::Color { alpha } = self.dimming {
            if !(0. ..=1.).contains(&alpha) {
                return Err(ConfigError::InvalidDimming(alpha));
            }
        }
        Ok(())
    }

    /// Parses and validates preferences from RON. Missing fields take their default values.
    #[cfg(feature = "serde")]
    pub fn from_ron(source: &str) -> Result<Preferences, ConfigError> {
        let preferences: Preferences = ron::from_str(source)?;
        preferences.validate()?;
        Ok(preferences)
    }

    /// The animation duration for a transition in the given direction.
    pub(crate) fn duration(&self, direction: crate::Direction) -> Duration {
        match direction {
            crate::Direction::Reveal => self.reveal_duration,
            crate::Direction::Hide => self.hide_duration,
        }
    }
}
