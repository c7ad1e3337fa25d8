//! Hosts a [`sidemenu`] controller in a retained surface hierarchy.
//!
//! A [`SideMenuView`] is a view like any other: put it at the root of a [`Host`] (or inside
//! another view), feed the host pointer events and display frames, and it takes care of laying
//! out the content and the menu, recognizing drags and taps, animating transitions and keeping
//! its `is_open` binding up to date.

#[macro_use]
mod view;
mod animator;
pub mod color;
mod container;
pub mod events;
mod gesture;
mod host;
mod hosting;
mod rect;
mod side_menu;

pub use animator::FrameAnimator;
pub use container::{load, unload, ContainerError, SurfaceStack};
pub use gesture::PanTracker;
pub use host::Host;
pub use hosting::Hosting;
pub use rect::{reveal_edge, MenuFrames, Rect};
pub use side_menu::{Coordinator, SideMenuState, SideMenuView};
pub use view::{Context, State, View};
