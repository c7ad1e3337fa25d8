//! Process-wide access to the current side menu.
//!
//! Code that has no reference to a controller, e.g. a button deep inside the content, goes through
//! a [`GlobalMenuManager`]. The most recently registered controller that is still alive is the
//! active one. Registering again supersedes silently, and a controller unregisters itself when its
//! last handle is dropped.

use crate::controller::{SideMenuController, WeakController};
use crate::delegate::SideMenuDelegate;
use crate::id::{ControllerId, ObserverId};
use lazy_static::lazy_static;
use log::debug;
use parking_lot::Mutex;
use std::sync::{Arc, Weak};

lazy_static! {
    static ref SHARED: GlobalMenuManager = GlobalMenuManager::new();
}

struct Entry {
    controller: WeakController,
    observer: ObserverId,
    /// Last settled state reported by the controller.
    is_open: bool,
}

#[derive(Default)]
struct Entries {
    /// In registration order; the last live entry is active.
    list: Vec<Entry>,
    blocked: bool,
}

impl Entries {
    fn position(&self, id: ControllerId) -> Option<usize> {
        self.list.iter().position(|e| e.controller.id() == id)
    }

    fn active(&self) -> Option<&Entry> {
        self.list.iter().rev().find(|e| e.controller.is_alive())
    }
}

/// Registry state shared between a manager and the controllers observing it.
#[derive(Default)]
pub(crate) struct Registry {
    entries: Mutex<Entries>,
}

impl Registry {
    /// Drops the entry for a controller that is being torn down.
    pub(crate) fn forget(&self, id: ControllerId) {
        let mut entries = self.entries.lock();
        if let Some(pos) = entries.position(id) {
            entries.list.remove(pos);
            debug!("global side menu: {:?} unregistered on teardown", id);
        }
    }

    fn set_open(&self, id: ControllerId, is_open: bool) {
        let mut entries = self.entries.lock();
        if let Some(pos) = entries.position(id) {
            entries.list[pos].is_open = is_open;
        }
    }
}

impl SideMenuDelegate for Registry {
    fn did_reveal(&self, controller: &SideMenuController) {
        self.set_open(controller.id(), controller.is_revealed());
    }

    fn did_hide(&self, controller: &SideMenuController) {
        self.set_open(controller.id(), controller.is_revealed());
    }
}

/// Named access to the active side menu.
///
/// Besides the process-wide [`shared`](Self::shared) instance, managers can be created for
/// isolated scopes such as tests.
pub struct GlobalMenuManager {
    registry: Arc<Registry>,
}

impl Default for GlobalMenuManager {
    fn default() -> Self {
        GlobalMenuManager::new()
    }
}

impl GlobalMenuManager {
    pub fn new() -> GlobalMenuManager {
        GlobalMenuManager {
            registry: Arc::new(Registry::default()),
        }
    }

    /// The process-wide manager.
    pub fn shared() -> &'static GlobalMenuManager {
        &SHARED
    }

    /// Makes `controller` the active menu. The previously active controller is not notified.
    pub fn register(&self, controller: &SideMenuController) {
        let id = controller.id();
        let (already_registered, blocked) = {
            let mut entries = self.registry.entries.lock();
            let existing = entries.position(id).map(|pos| entries.list.remove(pos));
            let blocked = entries.blocked;
            match existing {
                Some(entry) => {
                    entries.list.push(entry);
                    (true, blocked)
                }
                None => (false, blocked),
            }
        };

        if !already_registered {
            let observer = controller.add_observer(&self.registry);
            controller.track_registry(Arc::downgrade(&self.registry));
            self.registry.entries.lock().list.push(Entry {
                controller: controller.downgrade(),
                observer,
                is_open: controller.is_revealed(),
            });
        }
        if blocked {
            controller.set_blocked(true);
        }
        debug!("global side menu: {:?} registered", id);
    }

    /// Removes a controller. Returns false if it was not registered.
    pub fn unregister(&self, id: ControllerId) -> bool {
        let entry = {
            let mut entries = self.registry.entries.lock();
            entries.position(id).map(|pos| entries.list.remove(pos))
        };
        let entry = match entry {
            Some(entry) => entry,
            None => return false,
        };
        if let Some(controller) = entry.controller.upgrade() {
            controller.remove_observer(entry.observer);
            let registry: Weak<Registry> = Arc::downgrade(&self.registry);
            controller.untrack_registry(&registry);
        }
        debug!("global side menu: {:?} unregistered", id);
        true
    }

    /// The active controller, if any.
    pub fn active(&self) -> Option<SideMenuController> {
        let weak = self.registry.entries.lock().active()?.controller.clone();
        weak.upgrade()
    }

    pub fn is_registered(&self, id: ControllerId) -> bool {
        self.registry.entries.lock().position(id).is_some()
    }

    /// Reveals the active menu. Returns false if there is none or the reveal was turned down.
    pub fn reveal(&self) -> bool {
        match self.active() {
            Some(controller) => controller.reveal(true, None),
            None => {
                debug!("global side menu: reveal without a registered menu");
                false
            }
        }
    }

    /// Hides the active menu. Returns false if there is none or the hide was turned down.
    pub fn hide(&self) -> bool {
        match self.active() {
            Some(controller) => controller.hide(true, None),
            None => {
                debug!("global side menu: hide without a registered menu");
                false
            }
        }
    }

    pub fn toggle(&self) -> bool {
        match self.active() {
            Some(controller) => controller.toggle(true),
            None => false,
        }
    }

    /// Whether the active menu is open; `None` if no menu is registered.
    pub fn is_open(&self) -> Option<bool> {
        self.registry.entries.lock().active().map(|e| e.is_open)
    }

    /// Blocks or unblocks revealing on every registered menu, including ones registered later.
    pub fn set_blocked(&self, blocked: bool) {
        let controllers: Vec<WeakController> = {
            let mut entries = self.registry.entries.lock();
            entries.blocked = blocked;
            entries.list.iter().map(|e| e.controller.clone()).collect()
        };
        for controller in controllers.iter().filter_map(WeakController::upgrade) {
            controller.set_blocked(blocked);
        }
        debug!("global side menu: blocked = {}", blocked);
    }

    pub fn is_blocked(&self) -> bool {
        self.registry.entries.lock().blocked
    }
}
