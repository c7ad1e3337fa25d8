//! Turns raw pointer input into side menu gestures.

use crate::events::{Pointer, PointerPhase};
use crate::rect::{reveal_edge, Rect};
use cgmath::{Point2, Vector2};
use log::trace;
use sidemenu::{Direction, GestureEvent, GesturePhase, MenuState, Preferences};

#[derive(Debug, Clone, Copy)]
struct Track {
    pointer: u64,
    start: Point2<f64>,
    direction: Direction,
    slop: f64,
    panning: bool,
}

/// Recognizes horizontal pans that drag the menu and taps on the revealed content.
///
/// While closed, a pan has to start within the edge tolerance on the menu side. While revealed,
/// it may start anywhere on the content.
#[derive(Debug)]
pub struct PanTracker {
    preferences: Preferences,
    track: Option<Track>,
}

impl PanTracker {
    pub fn new(preferences: &Preferences) -> PanTracker {
        PanTracker {
            preferences: preferences.clone(),
            track: None,
        }
    }

    pub fn is_tracking(&self) -> bool {
        self.track.is_some()
    }

    /// Feeds a pointer event.
    ///
    /// - `bounds`: the side menu container.
    /// - `content`: the current content frame.
    /// - `state`: the controller state when the event arrived.
    pub fn handle(
        &mut self,
        event: &Pointer,
        bounds: Rect,
        content: Rect,
        state: MenuState,
    ) -> Option<GestureEvent> {
        match event.phase {
            PointerPhase::Down => {
                self.begin(event, bounds, content, state);
                None
            }
            PointerPhase::Moved => {
                let progress = self.progress(event)?;
                let track = self.track.as_mut()?;
                if track.panning {
                    Some(GestureEvent::pan(GesturePhase::Changed, progress))
                } else if (event.location.x - track.start.x).abs() > track.slop {
                    track.panning = true;
                    trace!("pan {:?} recognized", track.direction);
                    Some(GestureEvent::pan(GesturePhase::Began, progress))
                } else {
                    None
                }
            }
            PointerPhase::Up => {
                let progress = self.progress(event)?;
                let track = self.track.take()?;
                if track.panning {
                    Some(GestureEvent::pan(GesturePhase::Ended, progress))
                } else if track.direction == Direction::Hide && content.contains(event.location) {
                    Some(GestureEvent::tap())
                } else {
                    None
                }
            }
            PointerPhase::Cancelled => {
                let progress = self.progress(event)?;
                let track = self.track.take()?;
                if track.panning {
                    Some(GestureEvent::pan(GesturePhase::Cancelled, progress))
                } else {
                    None
                }
            }
        }
    }

    fn begin(&mut self, event: &Pointer, bounds: Rect, content: Rect, state: MenuState) {
        if self.track.is_some() {
            // second finger
            return;
        }
        let direction = match state {
            MenuState::Closed if reveal_edge(bounds, &self.preferences).contains(event.location) => {
                Direction::Reveal
            }
            MenuState::Revealed if content.contains(event.location) => Direction::Hide,
            _ => return,
        };
        self.track = Some(Track {
            pointer: event.id,
            start: event.location,
            direction,
            slop: event.device.slop(),
            panning: false,
        });
    }

    /// Transition progress for an event of the tracked pointer.
    fn progress(&self, event: &Pointer) -> Option<f64> {
        let track = self.track.as_ref().filter(|t| t.pointer == event.id)?;
        let translation: Vector2<f64> = event.location - track.start;
        let towards_reveal = self.preferences.position.reveal_sign() * translation.x;
        let distance = match track.direction {
            Direction::Reveal => towards_reveal,
            Direction::Hide => -towards_reveal,
        };
        let width = self.preferences.menu_width;
        if width <= 0. {
            return Some(0.);
        }
        Some((distance / width).max(0.).min(1.))
    }
}
