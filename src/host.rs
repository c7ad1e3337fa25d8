use crate::container::{load, SurfaceStack};
use crate::events::HostEvent;
use crate::hosting::Hosting;
use crate::rect::Rect;
use crate::view::{Context, View};
use cgmath::Vector2;
use core::time::Duration;
use crossbeam::channel::{self, Receiver, Sender, TryRecvError};
use log::{debug, error, trace};
use sidemenu::backend::{Attachment, HapticEmitter, NoHaptics};
use sidemenu::GlobalMenuManager;
use std::sync::Arc;

/// Connects a root view to a window.
///
/// Events can be sent from anywhere through [`sender`](Host::sender); they are applied on the
/// thread that calls [`poll`](Host::poll).
pub struct Host {
    stack: SurfaceStack,
    root: Hosting,
    haptics: Arc<dyn HapticEmitter>,
    menus: &'static GlobalMenuManager,
    event_send: Sender<HostEvent>,
    event_recv: Receiver<HostEvent>,
}

impl Host {
    /// Creates a new Host.
    ///
    /// The root view won’t appear until you call `poll`.
    pub fn new(root: Arc<dyn View>, size: Vector2<f64>) -> Host {
        let (event_send, event_recv) = channel::unbounded();

        Host {
            stack: SurfaceStack::new(size),
            root: Hosting::new(root),
            haptics: Arc::new(NoHaptics),
            menus: GlobalMenuManager::shared(),
            event_send,
            event_recv,
        }
    }

    pub fn with_haptics(mut self, haptics: Arc<dyn HapticEmitter>) -> Host {
        self.haptics = haptics;
        self
    }

    /// Registers side menus with `menus` instead of the process-wide manager.
    pub fn with_menus(mut self, menus: &'static GlobalMenuManager) -> Host {
        self.menus = menus;
        self
    }

    pub fn sender(&self) -> Sender<HostEvent> {
        self.event_send.clone()
    }

    pub fn stack(&self) -> &SurfaceStack {
        &self.stack
    }

    pub fn root(&self) -> &Hosting {
        &self.root
    }

    pub fn menus(&self) -> &'static GlobalMenuManager {
        self.menus
    }

    pub fn set_root(&mut self, view: Arc<dyn View>) {
        self.with_context(|root, context| root.set_root(view, context));
    }

    /// Receives all events from the event queue and updates the views accordingly.
    pub fn poll(&mut self) {
        if !self.root.is_visible() {
            self.appear();
        }
        loop {
            match self.event_recv.try_recv() {
                Ok(event) => self.handle(event),
                Err(TryRecvError::Empty) => break,
                // the host holds a sender itself
                Err(TryRecvError::Disconnected) => break,
            }
        }
    }

    fn appear(&mut self) {
        let surface = self.root.surface();
        let into = self.stack.root();
        if let Err(err) = load(&mut self.stack, Some(surface), into, Attachment::Constraints) {
            error!("host: could not attach the root surface: {}", err);
            return;
        }
        debug!("host: root view appearing");
        self.with_context(|root, context| root.appear(context));
    }

    fn handle(&mut self, event: HostEvent) {
        trace!("host: {:?}", event);
        match event {
            HostEvent::Pointer(pointer) => {
                self.with_context(|root, context| root.pointer(&pointer, context));
            }
            HostEvent::Frame(elapsed) => {
                self.with_context(|root, context| root.frame(elapsed, context));
                return;
            }
            HostEvent::Resize(size) => {
                let root = self.stack.root();
                if let Err(err) = self.stack.set_frame(root, Rect::from_size(size)) {
                    error!("host: could not resize: {}", err);
                }
            }
            HostEvent::Reveal => {
                self.menus.reveal();
            }
            HostEvent::Hide => {
                self.menus.hide();
            }
            HostEvent::Toggle => {
                self.menus.toggle();
            }
            HostEvent::SetBlocked(blocked) => self.menus.set_blocked(blocked),
        }
        // lay out right away instead of waiting for the next frame
        self.with_context(|root, context| root.frame(Duration::from_secs(0), context));
    }

    fn with_context<R>(&mut self, f: impl FnOnce(&mut Hosting, &mut Context) -> R) -> R {
        let Host {
            stack,
            root,
            haptics,
            menus,
            ..
        } = self;
        let surface = root.surface();
        let bounds = stack
            .frame(surface)
            .map_or_else(Rect::zero, |frame| Rect::from_size(frame.size));
        let mut context = Context {
            surface,
            bounds,
            container: stack,
            haptics,
            menus: *menus,
        };
        f(root, &mut context)
    }
}

impl Drop for Host {
    fn drop(&mut self) {
        self.with_context(|root, context| root.disappear(context));
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::events::{Pointer, PointerPhase};
    use crate::side_menu::{SideMenuState, SideMenuView};
    use parking_lot::Mutex;
    use sidemenu::preferences::{Dimming, ImpactStyle};
    use sidemenu::{Binding, MenuState, Preferences};

    #[derive(Default)]
    struct Haptics(Mutex<Vec<ImpactStyle>>);

    impl HapticEmitter for Haptics {
        fn impact(&self, style: ImpactStyle) {
            self.0.lock().push(style);
        }
    }

    fn isolated_menus() -> &'static GlobalMenuManager {
        Box::leak(Box::new(GlobalMenuManager::new()))
    }

    fn side_menu(is_open: &Binding) -> Arc<dyn View> {
        Arc::new(SideMenuView::new(
            Preferences::default()
                .with_menu_width(200.)
                .with_dimming(Dimming::Color { alpha: 0.5 }),
            is_open.clone(),
            Arc::new(()),
            Arc::new(()),
        ))
    }

    fn state(host: &Host) -> &SideMenuState {
        host.root()
            .state()
            .as_any()
            .downcast_ref::<SideMenuState>()
            .expect("root should be a side menu")
    }

    fn frame(host: &mut Host, ms: u64) {
        host.sender()
            .send(HostEvent::Frame(Duration::from_millis(ms)))
            .unwrap();
        host.poll();
    }

    #[test]
    fn side_menu_appears_in_the_stack() {
        let is_open = Binding::new(false);
        let mut host =
            Host::new(side_menu(&is_open), Vector2::new(400., 800.)).with_menus(isolated_menus());
        host.poll();

        let state = state(&host);
        let content = state.content().unwrap().surface();
        let menu = state.menu().unwrap().surface();
        assert_eq!(host.stack().children(host.root().surface()), &[menu, content]);
        assert_eq!(host.menus().is_open(), Some(false));
        assert_eq!(state.frames().unwrap().content.origin.x, 0.);
        assert_eq!(state.dimming(), None);
    }

    #[test]
    fn binding_drives_the_animation() {
        let is_open = Binding::new(false);
        let mut host =
            Host::new(side_menu(&is_open), Vector2::new(400., 800.)).with_menus(isolated_menus());
        host.poll();

        is_open.set(true);
        frame(&mut host, 150);
        let frames = state(&host).frames().unwrap();
        assert_eq!(frames.content.origin.x, 100.);
        assert_eq!(state(&host).controller().unwrap().state(), MenuState::Revealing(0.));

        frame(&mut host, 150);
        let controller = state(&host).controller().unwrap();
        assert!(controller.is_revealed());
        assert_eq!(state(&host).frames().unwrap().content.origin.x, 200.);
        assert_eq!(state(&host).dimming().map(|c| c.a), Some(0.5));
        assert_eq!(host.menus().is_open(), Some(true));
    }

    #[derive(Debug, PartialEq)]
    struct Page(&'static str);

    impl_view! {
        Page;
        fn new_state(&self) {
            Box::new(())
        }
    }

    fn page(hosting: Option<&Hosting>) -> Option<&'static str> {
        hosting?.view().as_any().downcast_ref::<Page>().map(|page| page.0)
    }

    #[test]
    fn updating_the_view_rebinds_and_swaps_pages() {
        let first = Binding::new(false);
        let mut host =
            Host::new(side_menu(&first), Vector2::new(400., 800.)).with_menus(isolated_menus());
        host.poll();
        let controller = state(&host).controller().unwrap().clone();
        let content = state(&host).content().unwrap().surface();

        let second = Binding::new(false);
        host.set_root(Arc::new(SideMenuView::new(
            Preferences::default().with_menu_width(320.),
            second.clone(),
            Arc::new(Page("inbox")),
            Arc::new(Page("folders")),
        )));
        {
            let state = state(&host);
            assert_eq!(state.controller().unwrap().id(), controller.id());
            assert_eq!(state.content().unwrap().surface(), content);
            assert!(state.content().unwrap().is_visible());
            assert_eq!(page(state.content()), Some("inbox"));
            assert_eq!(page(state.menu()), Some("folders"));
        }
        // a shown menu keeps the preferences it was built with
        assert_eq!(controller.preferences().menu_width, 200.);

        first.set(true);
        frame(&mut host, 1000);
        assert!(!controller.is_revealed());

        second.set(true);
        frame(&mut host, 1000);
        assert!(controller.is_revealed());
        assert_eq!(state(&host).frames().unwrap().content.origin.x, 200.);

        controller.hide(false, None);
        frame(&mut host, 0);
        assert!(!second.get());
        assert!(first.get());
    }

    #[test]
    fn dragging_from_the_edge_reveals_with_haptics() {
        let is_open = Binding::new(false);
        let haptics = Arc::new(Haptics::default());
        let mut host = Host::new(side_menu(&is_open), Vector2::new(400., 800.))
            .with_menus(isolated_menus())
            .with_haptics(haptics.clone());
        host.poll();

        let sender = host.sender();
        for &(phase, x) in &[
            (PointerPhase::Down, 5.),
            (PointerPhase::Moved, 60.),
            (PointerPhase::Moved, 155.),
            (PointerPhase::Up, 165.),
        ] {
            sender
                .send(HostEvent::Pointer(Pointer::touch(7, phase, x, 400.)))
                .unwrap();
        }
        host.poll();
        assert_eq!(*haptics.0.lock(), vec![ImpactStyle::Light]);

        frame(&mut host, 1000);
        assert!(state(&host).controller().unwrap().is_revealed());
        assert!(is_open.get());
    }

    #[test]
    fn global_events_reach_the_menu() {
        let is_open = Binding::new(false);
        let mut host =
            Host::new(side_menu(&is_open), Vector2::new(400., 800.)).with_menus(isolated_menus());
        host.poll();

        let sender = host.sender();
        sender.send(HostEvent::SetBlocked(true)).unwrap();
        sender.send(HostEvent::Toggle).unwrap();
        frame(&mut host, 1000);
        assert!(!is_open.get());

        sender.send(HostEvent::SetBlocked(false)).unwrap();
        sender.send(HostEvent::Reveal).unwrap();
        frame(&mut host, 1000);
        assert!(is_open.get());

        sender.send(HostEvent::Resize(Vector2::new(600., 900.))).unwrap();
        host.poll();
        let content = state(&host).frames().unwrap().content;
        assert_eq!(content.size, Vector2::new(600., 900.));
        assert_eq!(content.origin.x, 200.);
    }

    #[test]
    fn dropping_the_host_unregisters_the_menu() {
        let is_open = Binding::new(false);
        let menus = isolated_menus();
        let mut host = Host::new(side_menu(&is_open), Vector2::new(400., 800.)).with_menus(menus);
        host.poll();
        assert!(menus.active().is_some());

        drop(host);
        assert!(menus.active().is_none());
        assert!(!menus.reveal());
    }
}
