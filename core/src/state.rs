use core::fmt;

/// Invoked once a request has either run to completion (`true`) or been turned down (`false`).
pub type Completion = Box<dyn FnOnce(bool) + Send>;

/// Presentation state of a side menu.
#[derive(Debug, Clone, Copy, PartialEq)]
pub enum MenuState {
    Closed,
    /// The menu is on its way in; carries the transition progress in `0.0..=1.0`.
    Revealing(f64),
    Revealed,
    /// The menu is on its way out; carries the transition progress in `0.0..=1.0`.
    Hiding(f64),
}

impl MenuState {
    /// Closed or Revealed.
    pub fn is_settled(&self) -> bool {
        match self {
            MenuState::Closed | MenuState::Revealed => true,
            MenuState::Revealing(_) | MenuState::Hiding(_) => false,
        }
    }

    pub fn is_revealed(&self) -> bool {
        *self == MenuState::Revealed
    }

    /// The direction of the transition in flight, if any.
    pub fn in_flight(&self) -> Option<Direction> {
        match self {
            MenuState::Revealing(_) => Some(Direction::Reveal),
            MenuState::Hiding(_) => Some(Direction::Hide),
            MenuState::Closed | MenuState::Revealed => None,
        }
    }

    /// How far the menu is revealed, from 0 (closed) to 1 (revealed).
    pub fn visible_fraction(&self) -> f64 {
        match *self {
            MenuState::Closed => 0.,
            MenuState::Revealing(p) => p,
            MenuState::Revealed => 1.,
            MenuState::Hiding(p) => 1. - p,
        }
    }
}

impl Default for MenuState {
    fn default() -> Self {
        MenuState::Closed
    }
}

#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub enum Direction {
    Reveal,
    Hide,
}

impl Direction {
    pub fn opposite(&self) -> Direction {
        match self {
            Direction::Reveal => Direction::Hide,
            Direction::Hide => Direction::Reveal,
        }
    }

    /// The settled state this direction leads to.
    pub fn target(&self) -> MenuState {
        match self {
            Direction::Reveal => MenuState::Revealed,
            Direction::Hide => MenuState::Closed,
        }
    }

    /// The settled state this direction starts from.
    pub fn origin(&self) -> MenuState {
        self.opposite().target()
    }

    /// The in-flight state at the given progress.
    pub(crate) fn in_flight(&self, progress: f64) -> MenuState {
        match self {
            Direction::Reveal => MenuState::Revealing(progress),
            Direction::Hide => MenuState::Hiding(progress),
        }
    }
}

/// What caused a transition request.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub enum Trigger {
    Gesture,
    Programmatic,
    Binding,
}

/// A request to move the menu.
pub struct TransitionRequest {
    pub direction: Direction,
    pub trigger: Trigger,
    pub animated: bool,
    pub completion: Option<Completion>,
}

impl TransitionRequest {
    pub fn new(direction: Direction, trigger: Trigger, animated: bool) -> Self {
        TransitionRequest {
            direction,
            trigger,
            animated,
            completion: None,
        }
    }

    pub fn with_completion(mut self, completion: Option<Completion>) -> Self {
        self.completion = completion;
        self
    }

    /// Consumes the request, reporting the outcome to its completion.
    pub(crate) fn finish(self, success: bool) {
        if let Some(completion) = self.completion {
            completion(success);
        }
    }
}

impl fmt::Debug for TransitionRequest {
    fn fmt(&self, f: &mut fmt::Formatter) -> fmt::Result {
        f.debug_struct("TransitionRequest")
            .field("direction", &self.direction)
            .field("trigger", &self.trigger)
            .field("animated", &self.animated)
            .field(
                "completion",
                &if self.completion.is_some() {
                    "Some(..)"
                } else {
                    "None"
                },
            )
            .finish()
    }
}
