//! Rectangles and side menu geometry.

use cgmath::{Point2, Vector2, Zero};
use sidemenu::preferences::{MenuPosition, MenuPresentation};
use sidemenu::Preferences;

/// A rectangle.
#[derive(Debug, Clone, Copy, PartialEq)]
pub struct Rect {
    /// Rectangle origin.
    pub origin: Point2<f64>,

    /// Rectangle size.
    pub size: Vector2<f64>,
}

impl Rect {
    /// Creates a new rectangle.
    pub fn new(origin: Point2<f64>, size: Vector2<f64>) -> Rect {
        Rect { origin, size }
    }

    /// Returns a zero-sized rectangle at the origin.
    pub fn zero() -> Rect {
        Rect {
            origin: Point2::new(0., 0.),
            size: Vector2::zero(),
        }
    }

    /// Returns a rectangle of the given size at the origin.
    pub fn from_size(size: Vector2<f64>) -> Rect {
        Rect::new(Point2::new(0., 0.), size)
    }

    pub fn max_x(&self) -> f64 {
        self.origin.x + self.size.x
    }

    /// Returns true if the point is inside the rectangle.
    pub fn contains(&self, point: Point2<f64>) -> bool {
        point.x >= self.origin.x
            && point.y >= self.origin.y
            && point.x < self.origin.x + self.size.x
            && point.y < self.origin.y + self.size.y
    }

    /// Returns a new rectangle with the given origin.
    pub fn with_origin(&self, origin: Point2<f64>) -> Rect {
        Rect {
            origin,
            size: self.size,
        }
    }

    /// Returns a new rectangle moved horizontally by `dx`.
    pub fn offset_x(&self, dx: f64) -> Rect {
        self.with_origin(Point2::new(self.origin.x + dx, self.origin.y))
    }

    /// Returns a new rectangle with the given size added to the current size.
    pub fn with_added_size(self, size: Vector2<f64>) -> Rect {
        Rect {
            origin: self.origin,
            size: self.size + size,
        }
    }
}

/// Where content and menu are placed for a given reveal fraction.
#[derive(Debug, Clone, Copy, PartialEq)]
pub struct MenuFrames {
    pub content: Rect,
    pub menu: Rect,
}

impl MenuFrames {
    /// Lays out content and menu inside `bounds` with the menu `fraction` revealed.
    pub fn compute(bounds: Rect, preferences: &Preferences, fraction: f64) -> MenuFrames {
        let fraction = fraction.max(0.).min(1.);
        let width = preferences.menu_width.min(bounds.size.x);
        let sign = preferences.position.reveal_sign();
        let travel = sign * width * fraction;

        let menu_rest = match preferences.position {
            MenuPosition::Left => bounds.origin.x,
            MenuPosition::Right => bounds.max_x() - width,
        };
        let menu_open = Rect::new(
            Point2::new(menu_rest, bounds.origin.y),
            Vector2::new(width, bounds.size.y),
        );
        let menu_closed = menu_open.offset_x(-sign * width);

        match preferences.presentation {
            MenuPresentation::Above => MenuFrames {
                content: bounds,
                menu: menu_closed.offset_x(travel),
            },
            MenuPresentation::Below => MenuFrames {
                content: bounds.offset_x(travel),
                menu: menu_open,
            },
            MenuPresentation::SideBySide => MenuFrames {
                content: bounds.offset_x(travel),
                menu: menu_closed.offset_x(travel),
            },
        }
    }
}

/// The strip along the menu edge in which a pan may start revealing the menu.
pub fn reveal_edge(bounds: Rect, preferences: &Preferences) -> Rect {
    let tolerance = preferences.edge_pan_tolerance.min(bounds.size.x);
    let x = match preferences.position {
        MenuPosition::Left => bounds.origin.x,
        MenuPosition::Right => bounds.max_x() - tolerance,
    };
    Rect::new(
        Point2::new(x, bounds.origin.y),
        Vector2::new(tolerance, bounds.size.y),
    )
}
