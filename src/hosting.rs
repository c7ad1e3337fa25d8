use crate::color::Color;
use crate::events::Pointer;
use crate::view::{Context, State, View};
use core::fmt;
use core::time::Duration;
use log::trace;
use sidemenu::SurfaceId;
use std::sync::Arc;

/// A surface showing a root view.
///
/// The surface is transparent so that whatever is behind it stays visible. The root view can be
/// replaced at any time; a view of the same type keeps its state.
pub struct Hosting {
    surface: SurfaceId,
    view: Arc<dyn View>,
    state: Box<dyn State>,
    background: Color,
    appeared: bool,
}

impl Hosting {
    pub fn new(view: Arc<dyn View>) -> Hosting {
        let state = view.new_state();
        Hosting {
            surface: SurfaceId::new(),
            view,
            state,
            background: Color::clear(),
            appeared: false,
        }
    }

    pub fn surface(&self) -> SurfaceId {
        self.surface
    }

    pub fn view(&self) -> &Arc<dyn View> {
        &self.view
    }

    pub fn state(&self) -> &dyn State {
        &*self.state
    }

    pub fn background(&self) -> Color {
        self.background
    }

    pub fn is_visible(&self) -> bool {
        self.appeared
    }

    /// Shows the root view. `context` must refer to this hosting’s surface.
    pub fn appear(&mut self, context: &mut Context) {
        if self.appeared {
            return;
        }
        self.appeared = true;
        self.state.will_appear(&*self.view, context);
    }

    pub fn disappear(&mut self, context: &mut Context) {
        if !self.appeared {
            return;
        }
        self.appeared = false;
        self.state.will_disappear(context);
    }

    /// Replaces the root view.
    pub fn set_root(&mut self, view: Arc<dyn View>, context: &mut Context) {
        if Arc::ptr_eq(&self.view, &view) || View::eq(&*self.view, &*view) {
            return;
        }

        if self.view.as_any().type_id() == view.as_any().type_id() {
            trace!("hosting {:?}: updating root view", self.surface);
            if self.appeared {
                self.state.will_update(&*view, context);
            }
            self.view = view;
        } else {
            trace!("hosting {:?}: replacing root view", self.surface);
            let appeared = self.appeared;
            self.disappear(context);
            self.state = view.new_state();
            self.view = view;
            if appeared {
                self.appear(context);
            }
        }
    }

    pub fn pointer(&mut self, event: &Pointer, context: &mut Context) -> bool {
        self.appeared && self.state.pointer(event, context)
    }

    pub fn frame(&mut self, elapsed: Duration, context: &mut Context) {
        if self.appeared {
            self.state.frame(elapsed, context);
        }
    }
}

impl fmt::Debug for Hosting {
    fn fmt(&self, f: &mut fmt::Formatter) -> fmt::Result {
        f.debug_struct("Hosting")
            .field("surface", &self.surface)
            .field("view", &self.view)
            .field("appeared", &self.appeared)
            .finish()
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::container::SurfaceStack;
    use crate::rect::Rect;
    use cgmath::Vector2;
    use parking_lot::Mutex;
    use sidemenu::backend::{HapticEmitter, NoHaptics};
    use sidemenu::GlobalMenuManager;
    use std::any::Any;

    type Calls = Arc<Mutex<Vec<String>>>;

    #[derive(Debug)]
    struct Label {
        text: &'static str,
        calls: Calls,
    }

    impl PartialEq for Label {
        fn eq(&self, other: &Label) -> bool {
            self.text == other.text
        }
    }

    #[derive(Debug)]
    struct LabelState {
        calls: Calls,
    }

    fn text(view: &dyn View) -> &'static str {
        view.as_any().downcast_ref::<Label>().map_or("?", |l| l.text)
    }

    impl State for LabelState {
        fn as_any(&self) -> &dyn Any {
            self
        }
        fn will_appear(&mut self, view: &dyn View, _: &mut Context) {
            self.calls.lock().push(format!("appear {}", text(view)));
        }
        fn will_update(&mut self, view: &dyn View, _: &mut Context) {
            self.calls.lock().push(format!("update {}", text(view)));
        }
        fn will_disappear(&mut self, _: &mut Context) {
            self.calls.lock().push("disappear".to_string());
        }
    }

    impl_view! {
        Label;
        fn new_state(&self) {
            Box::new(LabelState { calls: Arc::clone(&self.calls) })
        }
    }

    #[test]
    fn root_views_are_updated_or_replaced() {
        let calls: Calls = Arc::default();
        let label = |text| -> Arc<dyn View> {
            Arc::new(Label {
                text,
                calls: Arc::clone(&calls),
            })
        };

        let mut stack = SurfaceStack::new(Vector2::new(100., 100.));
        let haptics: Arc<dyn HapticEmitter> = Arc::new(NoHaptics);
        let menus = GlobalMenuManager::new();
        let mut hosting = Hosting::new(label("a"));
        let mut context = Context {
            surface: hosting.surface(),
            bounds: Rect::from_size(Vector2::new(100., 100.)),
            container: &mut stack,
            haptics: &haptics,
            menus: &menus,
        };

        hosting.set_root(label("a"), &mut context);
        assert!(calls.lock().is_empty(), "nothing happens before appearing");

        hosting.appear(&mut context);
        hosting.appear(&mut context);
        hosting.set_root(label("a"), &mut context);
        hosting.set_root(label("b"), &mut context);
        hosting.set_root(Arc::new(()), &mut context);
        assert_eq!(
            *calls.lock(),
            vec!["appear a", "update b", "disappear"]
        );
        assert!(hosting.is_visible());
        assert_eq!(hosting.background(), Color::clear());
        assert!(hosting.state().as_any().is::<()>());
    }
}
