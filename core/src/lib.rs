//! Side menu controller.
//!
//! # Conceptual overview
//! A side menu is a content surface with a menu surface tucked away at one edge. The menu can be
//! revealed and hidden programmatically, by dragging, by tapping the content, by flipping a
//! bound `is_open` flag, or from anywhere in the app through a global accessor. This crate
//! contains the logic that decides and sequences all of that; drawing, layout and animation
//! curves belong to the host UI framework.
//!
//! ## State
//! Each [`SideMenuController`] owns one [`MenuState`]:
//!
//! ```text
//! Closed ──▶ Revealing(p) ──▶ Revealed ──▶ Hiding(p) ──▶ Closed
//! ```
//!
//! A pan released below the completion threshold goes back from `Revealing` to `Closed` (or from
//! `Hiding` to `Revealed`). Only one transition runs at a time; a request arriving meanwhile is
//! queued one deep (the newest request wins) or ignored, as decided by the [`TransitionPolicy`].
//!
//! ## Observers
//! Observers implement [`SideMenuDelegate`] and are called synchronously, in order:
//! `should_reveal` → `will_reveal`/`will_hide` → (effect) → `did_reveal`/`did_hide`. They are held
//! weakly and isolated from each other: a dropped observer is skipped, a panicking one is logged.
//!
//! ## Bindings
//! A [`BindingAdapter`] keeps an external [`Binding`] and the controller in agreement without
//! feedback loops.
//!
//! ## Global access
//! [`GlobalMenuManager::shared`] knows the most recently registered live controller.
//!
//! ## Host collaborators
//! The [`backend`] traits connect the controller to the host: a container for surfaces, an
//! animator for transition effects and an optional haptic emitter.

pub mod backend;
pub mod binding;
mod controller;
pub mod delegate;
pub mod events;
mod global;
mod id;
mod policy;
pub mod preferences;
mod state;

pub use binding::{Binding, BindingAdapter, Subscription};
pub use controller::{Builder, SideMenuController, WeakController};
pub use delegate::{Forwarding, SideMenuDelegate};
pub use events::{GestureEvent, GestureKind, GesturePhase};
pub use global::GlobalMenuManager;
pub use id::{ControllerId, ObserverId, SurfaceId};
pub use policy::{Decision, Denial, TransitionPolicy};
pub use preferences::{ConfigError, Preferences};
pub use state::{Completion, Direction, MenuState, TransitionRequest, Trigger};
