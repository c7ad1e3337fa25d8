use crate::container::SurfaceStack;
use crate::events::Pointer;
use crate::rect::Rect;
use core::any::Any;
use core::fmt;
use core::time::Duration;
use sidemenu::backend::HapticEmitter;
use sidemenu::{GlobalMenuManager, SurfaceId};
use std::sync::Arc;

/// Implements the `View` trait for a given struct.
///
/// Assumes that `PartialEq` is implemented.
///
/// Syntax:
///
/// ```text
/// impl_view! {
///     StructName;
///     fn new_state(&self) {
///         ... -> Box<dyn State>
///     }
/// }
/// ```
#[macro_export]
macro_rules! impl_view {
    (
        $(#[$attr:meta])*
        $struct:ty;
        fn new_state(&$ns_self:ident) $new_state:tt
        $($extra:tt)*
    ) => {
        $(#[$attr])*
        impl $crate::View for $struct {
            fn as_any(&self) -> &dyn ::core::any::Any {
                self
            }

            fn new_state(&$ns_self) -> Box<dyn $crate::State> {
                $new_state
            }

            fn eq(&self, other: &dyn $crate::View) -> bool {
                if let Some(other) = other.as_any().downcast_ref::<$struct>() {
                    self == other
                } else {
                    false
                }
            }

            $($extra)*
        }
    };
}

/// Views describe what a hosted surface shows.
///
/// `View` implementors themselves should be cheap to create and compare; anything long-lived
/// belongs in the [`State`] they create.
pub trait View: Any + fmt::Debug + Send + Sync {
    /// Creates a new state object for this view.
    fn new_state(&self) -> Box<dyn State>;

    /// Compares this view to another; used to skip redundant updates.
    fn eq(&self, other: &dyn View) -> bool;

    /// For downcasting.
    fn as_any(&self) -> &dyn Any;
}

/// View state associated with a view.
///
/// Will be dropped right after the view disappears.
pub trait State: Any + fmt::Debug {
    /// For downcasting.
    fn as_any(&self) -> &dyn Any;

    /// Called before the associated view appears.
    fn will_appear(&mut self, view: &dyn View, context: &mut Context) {
        let _ = (view, context);
    }

    /// Called before the state is updated from a new view of the same type.
    fn will_update(&mut self, view: &dyn View, context: &mut Context) {
        let _ = (view, context);
    }

    /// Called before the associated view disappears.
    fn will_disappear(&mut self, context: &mut Context) {
        let _ = context;
    }

    /// Handles a pointer event. Returns true if it was consumed.
    fn pointer(&mut self, event: &Pointer, context: &mut Context) -> bool {
        let _ = (event, context);
        false
    }

    /// Called once per display frame and after layout changes.
    fn frame(&mut self, elapsed: Duration, context: &mut Context) {
        let _ = (elapsed, context);
    }
}

/// Everything a state may touch while handling a callback.
pub struct Context<'a> {
    /// The surface the view is hosted in.
    pub surface: SurfaceId,
    pub bounds: Rect,
    pub container: &'a mut SurfaceStack,
    pub haptics: &'a Arc<dyn HapticEmitter>,
    pub menus: &'a GlobalMenuManager,
}

impl<'a> Context<'a> {
    /// A context for a surface hosted below this one.
    pub fn nested(&mut self, surface: SurfaceId) -> Context<'_> {
        let bounds = self
            .container
            .frame(surface)
            .map_or(self.bounds, |frame| Rect::from_size(frame.size));
        Context {
            surface,
            bounds,
            container: &mut *self.container,
            haptics: self.haptics,
            menus: self.menus,
        }
    }
}

impl fmt::Debug for Context<'_> {
    fn fmt(&self, f: &mut fmt::Formatter) -> fmt::Result {
        f.debug_struct("Context")
            .field("surface", &self.surface)
            .field("bounds", &self.bounds)
            .finish()
    }
}

impl_view! {
    /// An empty view type that does absolutely nothing.
    ();
    fn new_state(&self) {
        Box::new(())
    }
}

/// For stateless views.
impl State for () {
    fn as_any(&self) -> &dyn Any {
        self
    }
}
