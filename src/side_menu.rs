//! The side menu as a view.

use crate::animator::FrameAnimator;
use crate::color::Color;
use crate::container::{load, unload};
use crate::events::Pointer;
use crate::gesture::PanTracker;
use crate::hosting::Hosting;
use crate::rect::MenuFrames;
use crate::view::{Context, State, View};
use core::any::Any;
use core::fmt;
use core::time::Duration;
use log::{debug, error, info, warn};
use sidemenu::backend::{Animator, Attachment};
use sidemenu::preferences::MenuPresentation;
use sidemenu::{
    Binding, BindingAdapter, Direction, MenuState, Preferences, SideMenuController,
    SideMenuDelegate, SurfaceId,
};
use std::sync::Arc;

/// A content view with a menu tucked away at one edge.
///
/// `is_open` is kept in sync with the menu in both directions: flip it to reveal or hide the
/// menu, read it to find out whether the user opened it.
#[derive(Debug)]
pub struct SideMenuView {
    pub preferences: Preferences,
    pub is_open: Binding,
    pub root: Arc<dyn View>,
    pub menu: Arc<dyn View>,
}

impl SideMenuView {
    pub fn new(
        preferences: Preferences,
        is_open: Binding,
        root: Arc<dyn View>,
        menu: Arc<dyn View>,
    ) -> SideMenuView {
        SideMenuView {
            preferences,
            is_open,
            root,
            menu,
        }
    }
}

impl PartialEq for SideMenuView {
    fn eq(&self, other: &SideMenuView) -> bool {
        self.preferences == other.preferences
            && self.is_open.ptr_eq(&other.is_open)
            && View::eq(&*self.root, &*other.root)
            && View::eq(&*self.menu, &*other.menu)
    }
}

impl_view! {
    SideMenuView;
    fn new_state(&self) {
        Box::new(SideMenuState::new(&self.preferences))
    }
}

/// Logs what the menu does.
#[derive(Debug, Default)]
pub struct Coordinator;

impl SideMenuDelegate for Coordinator {
    fn will_show(&self, _: &SideMenuController, surface: SurfaceId, animated: bool) {
        debug!("side menu: will show {:?} (animated: {})", surface, animated);
    }

    fn did_show(&self, _: &SideMenuController, surface: SurfaceId, animated: bool) {
        debug!("side menu: did show {:?} (animated: {})", surface, animated);
    }

    fn will_reveal(&self, _: &SideMenuController) {
        debug!("side menu: will reveal");
    }

    fn did_reveal(&self, _: &SideMenuController) {
        info!("side menu revealed");
    }

    fn will_hide(&self, _: &SideMenuController) {
        debug!("side menu: will hide");
    }

    fn did_hide(&self, _: &SideMenuController) {
        info!("side menu hidden");
    }

    fn did_cancel_transition(&self, _: &SideMenuController, direction: Direction) {
        debug!("side menu: {:?} cancelled", direction);
    }
}

pub struct SideMenuState {
    preferences: Preferences,
    animator: Arc<FrameAnimator>,
    coordinator: Arc<Coordinator>,
    tracker: PanTracker,
    controller: Option<SideMenuController>,
    adapter: Option<Arc<BindingAdapter>>,
    content: Option<Hosting>,
    menu: Option<Hosting>,
    frames: Option<MenuFrames>,
    dimming: Option<Color>,
}

impl SideMenuState {
    fn new(preferences: &Preferences) -> SideMenuState {
        let preferences = match preferences.validate() {
            Ok(()) => preferences.clone(),
            Err(err) => {
                warn!("side menu: {}; using default preferences", err);
                Preferences::default()
            }
        };
        SideMenuState {
            tracker: PanTracker::new(&preferences),
            preferences,
            animator: Arc::new(FrameAnimator::new()),
            coordinator: Arc::new(Coordinator),
            controller: None,
            adapter: None,
            content: None,
            menu: None,
            frames: None,
            dimming: None,
        }
    }

    /// The controller, once the view has appeared.
    pub fn controller(&self) -> Option<&SideMenuController> {
        self.controller.as_ref()
    }

    pub fn content(&self) -> Option<&Hosting> {
        self.content.as_ref()
    }

    pub fn menu(&self) -> Option<&Hosting> {
        self.menu.as_ref()
    }

    /// Content and menu frames from the last layout pass.
    pub fn frames(&self) -> Option<MenuFrames> {
        self.frames
    }

    /// Overlay color above the content from the last layout pass.
    pub fn dimming(&self) -> Option<Color> {
        self.dimming
    }

    fn layout(&mut self, context: &mut Context) {
        let controller = match &self.controller {
            Some(controller) => controller,
            None => return,
        };
        let fraction = self
            .animator
            .visible_fraction()
            .unwrap_or_else(|| controller.state().visible_fraction());
        let frames = MenuFrames::compute(context.bounds, &self.preferences, fraction);

        let placements = [
            (self.content.as_ref().map(Hosting::surface), frames.content),
            (self.menu.as_ref().map(Hosting::surface), frames.menu),
        ];
        for &(surface, frame) in &placements {
            if let Some(surface) = surface {
                if let Err(err) = context.container.set_frame(surface, frame) {
                    warn!("side menu: could not place {:?}: {}", surface, err);
                }
            }
        }
        self.frames = Some(frames);
        self.dimming = Color::dimming(self.preferences.dimming, fraction);
    }
}

impl State for SideMenuState {
    fn as_any(&self) -> &dyn Any {
        self
    }

    fn will_appear(&mut self, view: &dyn View, context: &mut Context) {
        let view = match view.as_any().downcast_ref::<SideMenuView>() {
            Some(view) => view,
            None => {
                error!("SideMenuState::will_appear: expected a SideMenuView");
                return;
            }
        };

        let mut content = Hosting::new(Arc::clone(&view.root));
        let mut menu = Hosting::new(Arc::clone(&view.menu));
        let animator: Arc<dyn Animator> = self.animator.clone();
        let controller = SideMenuController::builder(self.preferences.clone())
            .animator(animator)
            .haptics(Arc::clone(context.haptics))
            .content(content.surface())
            .menu(menu.surface())
            .build();
        controller.set_delegate(Some(&self.coordinator));

        let content_slot = (content.surface(), Attachment::Constraints);
        let menu_slot = (menu.surface(), Attachment::Autoresizing);
        let order = match self.preferences.presentation {
            MenuPresentation::Above => [content_slot, menu_slot],
            MenuPresentation::Below | MenuPresentation::SideBySide => [menu_slot, content_slot],
        };
        for &(surface, attachment) in &order {
            let into = context.surface;
            if let Err(err) = load(&mut *context.container, Some(surface), into, attachment) {
                error!("side menu: could not attach {:?}: {}", surface, err);
            }
        }

        let surface = content.surface();
        content.appear(&mut context.nested(surface));
        let surface = menu.surface();
        menu.appear(&mut context.nested(surface));

        context.menus.register(&controller);
        self.adapter = Some(BindingAdapter::attach(&controller, view.is_open.clone()));
        debug!("side menu {:?} appeared", controller.id());

        self.controller = Some(controller);
        self.content = Some(content);
        self.menu = Some(menu);
        self.layout(context);
    }

    fn will_update(&mut self, view: &dyn View, context: &mut Context) {
        let view = match view.as_any().downcast_ref::<SideMenuView>() {
            Some(view) => view,
            None => return,
        };
        if view.preferences != self.preferences {
            warn!("side menu: preferences cannot change once the menu is shown; ignored");
        }

        if let Some(content) = self.content.as_mut() {
            let surface = content.surface();
            content.set_root(Arc::clone(&view.root), &mut context.nested(surface));
        }
        if let Some(menu) = self.menu.as_mut() {
            let surface = menu.surface();
            menu.set_root(Arc::clone(&view.menu), &mut context.nested(surface));
        }

        let rebind = match &self.adapter {
            Some(adapter) => !adapter.binding().ptr_eq(&view.is_open),
            None => false,
        };
        if rebind {
            if let Some(controller) = &self.controller {
                debug!("side menu {:?}: new binding", controller.id());
                self.adapter = Some(BindingAdapter::attach(controller, view.is_open.clone()));
            }
        } else if let Some(adapter) = &self.adapter {
            adapter.reconcile();
        }
        self.layout(context);
    }

    fn will_disappear(&mut self, context: &mut Context) {
        if let Some(content) = self.content.as_mut() {
            let surface = content.surface();
            content.disappear(&mut context.nested(surface));
        }
        if let Some(menu) = self.menu.as_mut() {
            let surface = menu.surface();
            menu.disappear(&mut context.nested(surface));
        }
        for surface in &[
            self.content.take().map(|h| h.surface()),
            self.menu.take().map(|h| h.surface()),
        ] {
            if let Err(err) = unload(&mut *context.container, *surface) {
                warn!("side menu: could not detach {:?}: {}", surface, err);
            }
        }

        self.adapter = None;
        if let Some(controller) = self.controller.take() {
            context.menus.unregister(controller.id());
            debug!("side menu {:?} disappeared", controller.id());
        }
        self.animator.interrupt();
        self.frames = None;
        self.dimming = None;
    }

    fn pointer(&mut self, event: &Pointer, context: &mut Context) -> bool {
        let controller = match &self.controller {
            Some(controller) => controller,
            None => return false,
        };
        let content_frame = self.frames.map_or(context.bounds, |frames| frames.content);
        let gesture = self
            .tracker
            .handle(event, context.bounds, content_frame, controller.state());
        if let Some(gesture) = gesture {
            let handled = controller.handle_gesture(gesture);
            self.layout(context);
            return handled;
        }
        if self.tracker.is_tracking() {
            return true;
        }

        let menu_visible = controller.state() != MenuState::Closed;
        let in_menu = self
            .frames
            .map_or(false, |frames| frames.menu.contains(event.location));
        let target = if menu_visible && in_menu {
            self.menu.as_mut()
        } else {
            self.content.as_mut()
        };
        match target {
            Some(hosting) => {
                let surface = hosting.surface();
                hosting.pointer(event, &mut context.nested(surface))
            }
            None => false,
        }
    }

    fn frame(&mut self, elapsed: Duration, context: &mut Context) {
        self.animator.tick(elapsed);
        self.layout(context);
        for hosting in self.content.iter_mut().chain(self.menu.iter_mut()) {
            let surface = hosting.surface();
            hosting.frame(elapsed, &mut context.nested(surface));
        }
    }
}

impl fmt::Debug for SideMenuState {
    fn fmt(&self, f: &mut fmt::Formatter) -> fmt::Result {
        f.debug_struct("SideMenuState")
            .field("controller", &self.controller)
            .field("content", &self.content)
            .field("menu", &self.menu)
            .field("frames", &self.frames)
            .finish()
    }
}
