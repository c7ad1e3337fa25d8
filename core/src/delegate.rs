//! Observers of a side menu controller.
//!
//! A controller keeps one direct delegate and any number of additional observers, all held
//! weakly: an observer that has been dropped is skipped and pruned, never called. Calls go out in
//! order (the delegate first, then observers in registration order) and each invocation is
//! isolated, so a panicking observer is logged and the transition carries on.
//!
//! [`Forwarding`] restores the classic single-delegate style where each link relays to the next.

use crate::controller::SideMenuController;
use crate::id::{ObserverId, SurfaceId};
use crate::state::Direction;
use log::error;
use parking_lot::Mutex;
use std::panic::{catch_unwind, AssertUnwindSafe};
use std::sync::{Arc, Weak};

/// Receives side menu lifecycle calls. Every method has a no-op default.
///
/// Per transition the order is `should_reveal` (reveals only) → `will_*` → effect → `did_*`.
/// A pan released below the completion threshold skips `did_*` and calls
/// `did_cancel_transition` instead.
pub trait SideMenuDelegate: Send + Sync {
    /// The content surface is about to change.
    fn will_show(&self, _controller: &SideMenuController, _surface: SurfaceId, _animated: bool) {}

    /// The content surface has changed.
    fn did_show(&self, _controller: &SideMenuController, _surface: SurfaceId, _animated: bool) {}

    /// Returning false prevents the menu from being revealed.
    fn should_reveal(&self, _controller: &SideMenuController) -> bool {
        true
    }

    fn will_reveal(&self, _controller: &SideMenuController) {}

    fn did_reveal(&self, _controller: &SideMenuController) {}

    fn will_hide(&self, _controller: &SideMenuController) {}

    fn did_hide(&self, _controller: &SideMenuController) {}

    /// A gesture-driven transition was abandoned and the menu went back to where it was.
    fn did_cancel_transition(&self, _controller: &SideMenuController, _direction: Direction) {}
}

/// Ordered, weakly held observers.
#[derive(Default)]
pub(crate) struct DelegateChain {
    delegate: Option<Weak<dyn SideMenuDelegate>>,
    observers: Vec<(ObserverId, Weak<dyn SideMenuDelegate>)>,
    next_id: u64,
}

impl DelegateChain {
    pub(crate) fn set_delegate(&mut self, delegate: Option<Weak<dyn SideMenuDelegate>>) {
        self.delegate = delegate;
    }

    pub(crate) fn add(&mut self, observer: Weak<dyn SideMenuDelegate>) -> ObserverId {
        let id = ObserverId(self.next_id);
        self.next_id += 1;
        self.observers.push((id, observer));
        id
    }

    pub(crate) fn remove(&mut self, id: ObserverId) -> bool {
        let len = self.observers.len();
        self.observers.retain(|(i, _)| *i != id);
        self.observers.len() != len
    }

    /// Returns all live links in call order and prunes dead ones.
    pub(crate) fn links(&mut self) -> Vec<Arc<dyn SideMenuDelegate>> {
        let mut links = Vec::with_capacity(self.observers.len() + 1);
        if let Some(delegate) = &self.delegate {
            match delegate.upgrade() {
                Some(delegate) => links.push(delegate),
                None => self.delegate = None,
            }
        }
        self.observers.retain(|(_, observer)| match observer.upgrade() {
            Some(observer) => {
                links.push(observer);
                true
            }
            None => false,
        });
        links
    }
}

/// Calls into one observer, logging instead of unwinding if it panics.
pub(crate) fn isolate<T>(event: &'static str, f: impl FnOnce() -> T) -> Option<T> {
    match catch_unwind(AssertUnwindSafe(f)) {
        Ok(value) => Some(value),
        Err(_) => {
            error!("side menu observer panicked in {}; continuing", event);
            None
        }
    }
}

/// Wraps an observer and relays every call to a weakly held `next` delegate afterwards.
///
/// `should_reveal` only asks `next` if the wrapped observer did not already veto.
pub struct Forwarding<D> {
    inner: D,
    next: Mutex<Option<Weak<dyn SideMenuDelegate>>>,
}

impl<D: SideMenuDelegate> Forwarding<D> {
    pub fn new(inner: D) -> Forwarding<D> {
        Forwarding {
            inner,
            next: Mutex::new(None),
        }
    }

    /// Sets the delegate calls are relayed to.
    pub fn forward_to<N: SideMenuDelegate + 'static>(&self, next: &Arc<N>) {
        let next: Weak<dyn SideMenuDelegate> = Arc::downgrade(next) as Weak<dyn SideMenuDelegate>;
        *self.next.lock() = Some(next);
    }

    pub fn clear_forwarding(&self) {
        *self.next.lock() = None;
    }

    pub fn inner(&self) -> &D {
        &self.inner
    }

    fn next(&self) -> Option<Arc<dyn SideMenuDelegate>> {
        self.next.lock().as_ref().and_then(Weak::upgrade)
    }
}

impl<D: SideMenuDelegate> SideMenuDelegate for Forwarding<D> {
    fn will_show(&self, controller: &SideMenuController, surface: SurfaceId, animated: bool) {
        self.inner.will_show(controller, surface, animated);
        if let Some(next) = self.next() {
            next.will_show(controller, surface, animated);
        }
    }

    fn did_show(&self, controller: &SideMenuController, surface: SurfaceId, animated: bool) {
        self.inner.did_show(controller, surface, animated);
        if let Some(next) = self.next() {
            next.did_show(controller, surface, animated);
        }
    }

    fn should_reveal(&self, controller: &SideMenuController) -> bool {
        self.inner.should_reveal(controller)
            && self.next().map_or(true, |next| next.should_reveal(controller))
    }

    fn will_reveal(&self, controller: &SideMenuController) {
        self.inner.will_reveal(controller);
        if let Some(next) = self.next() {
            next.will_reveal(controller);
        }
    }

    fn did_reveal(&self, controller: &SideMenuController) {
        self.inner.did_reveal(controller);
        if let Some(next) = self.next() {
            next.did_reveal(controller);
        }
    }

    fn will_hide(&self, controller: &SideMenuController) {
        self.inner.will_hide(controller);
        if let Some(next) = self.next() {
            next.will_hide(controller);
        }
    }

    fn did_hide(&self, controller: &SideMenuController) {
        self.inner.did_hide(controller);
        if let Some(next) = self.next() {
            next.did_hide(controller);
        }
    }

    fn did_cancel_transition(&self, controller: &SideMenuController, direction: Direction) {
        self.inner.did_cancel_transition(controller, direction);
        if let Some(next) = self.next() {
            next.did_cancel_transition(controller, direction);
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    struct Nop;
    impl SideMenuDelegate for Nop {}

    #[test]
    fn links_skip_and_prune_dropped_observers() {
        let mut chain = DelegateChain::default();
        let kept: Arc<dyn SideMenuDelegate> = Arc::new(Nop);
        let dropped: Arc<dyn SideMenuDelegate> = Arc::new(Nop);
        chain.add(Arc::downgrade(&kept));
        chain.add(Arc::downgrade(&dropped));
        drop(dropped);

        assert_eq!(chain.links().len(), 1);
        assert_eq!(chain.observers.len(), 1, "dead observer should have been pruned");
    }

    #[test]
    fn delegate_comes_first() {
        let mut chain = DelegateChain::default();
        let observer: Arc<dyn SideMenuDelegate> = Arc::new(Nop);
        let delegate: Arc<dyn SideMenuDelegate> = Arc::new(Nop);
        chain.add(Arc::downgrade(&observer));
        chain.set_delegate(Some(Arc::downgrade(&delegate)));

        let links = chain.links();
        assert!(Arc::ptr_eq(&links[0], &delegate));
        assert!(Arc::ptr_eq(&links[1], &observer));
    }

    #[test]
    fn removed_observers_stay_removed() {
        let mut chain = DelegateChain::default();
        let observer: Arc<dyn SideMenuDelegate> = Arc::new(Nop);
        let id = chain.add(Arc::downgrade(&observer));
        assert!(chain.remove(id));
        assert!(!chain.remove(id));
        assert!(chain.links().is_empty());
    }

    #[test]
    fn isolate_swallows_panics() {
        assert_eq!(isolate("test", || 3), Some(3));
        assert_eq!(isolate::<()>("test", || panic!("observer failure")), None);
    }
}
