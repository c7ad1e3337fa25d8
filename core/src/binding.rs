//! Two-way binding between an external "is open" flag and a controller.
//!
//! The [`BindingAdapter`] applies external flips to the controller and writes settled state
//! changes back. When it writes, it arms a one-shot suppression flag so that the change
//! notification caused by its own write does not bounce back into another request.

use crate::controller::{SideMenuController, WeakController};
use crate::delegate::SideMenuDelegate;
use crate::state::{Direction, MenuState, TransitionRequest, Trigger};
use log::{debug, trace};
use parking_lot::Mutex;
use std::sync::{Arc, Weak};

type Subscriber = dyn Fn(bool) + Send + Sync;

struct Cell {
    value: bool,
    version: u64,
    subscribers: Vec<Weak<Subscriber>>,
}

/// A shared boolean cell, e.g. the `is_open` state of a declarative view.
///
/// Clones refer to the same cell. Setting the value it already holds does nothing.
#[derive(Clone)]
pub struct Binding {
    cell: Arc<Mutex<Cell>>,
}

/// Keeps a change callback registered; dropping it unsubscribes.
#[must_use = "the callback is unsubscribed when the subscription is dropped"]
pub struct Subscription {
    _callback: Arc<Subscriber>,
}

impl Binding {
    pub fn new(value: bool) -> Binding {
        Binding {
            cell: Arc::new(Mutex::new(Cell {
                value,
                version: 0,
                subscribers: Vec::new(),
            })),
        }
    }

    pub fn get(&self) -> bool {
        self.cell.lock().value
    }

    /// Number of changes so far.
    pub fn version(&self) -> u64 {
        self.cell.lock().version
    }

    /// Sets the value and calls subscribers (in subscription order) if it changed.
    pub fn set(&self, value: bool) {
        let subscribers: Vec<Arc<Subscriber>> = {
            let mut cell = self.cell.lock();
            if cell.value == value {
                return;
            }
            cell.value = value;
            cell.version += 1;
            let mut live = Vec::with_capacity(cell.subscribers.len());
            cell.subscribers.retain(|s| match s.upgrade() {
                Some(s) => {
                    live.push(s);
                    true
                }
                None => false,
            });
            live
        };
        for subscriber in subscribers {
            subscriber(value);
        }
    }

    pub fn toggle(&self) {
        let value = self.get();
        self.set(!value);
    }

    /// Calls `f` with the new value after every change, until the subscription is dropped.
    pub fn subscribe<F>(&self, f: F) -> Subscription
    where
        F: Fn(bool) + Send + Sync + 'static,
    {
        let callback: Arc<Subscriber> = Arc::new(f);
        self.cell.lock().subscribers.push(Arc::downgrade(&callback));
        Subscription {
            _callback: callback,
        }
    }

    /// Returns true if both handles refer to the same cell.
    pub fn ptr_eq(&self, other: &Binding) -> bool {
        Arc::ptr_eq(&self.cell, &other.cell)
    }
}

impl core::fmt::Debug for Binding {
    fn fmt(&self, f: &mut core::fmt::Formatter) -> core::fmt::Result {
        let cell = self.cell.lock();
        write!(f, "Binding({}, v{})", cell.value, cell.version)
    }
}

#[derive(Debug, Default)]
struct LinkState {
    /// Set to the value the adapter just wrote; the next pass that sees it consumes it.
    suppress_once: Option<bool>,
    /// The external value changed while a transition was running.
    deferred: bool,
}

/// Reconciles a [`Binding`] with a controller in both directions.
///
/// After every settled state, `binding.get() == controller.is_revealed()`. While the menu is
/// moving the binding is left alone and external changes wait for settlement.
pub struct BindingAdapter {
    this: Weak<BindingAdapter>,
    binding: Binding,
    controller: WeakController,
    animated: bool,
    link: Mutex<LinkState>,
    subscription: Mutex<Option<Subscription>>,
}

impl BindingAdapter {
    /// Links `binding` to `controller` and reconciles once.
    ///
    /// The adapter lives as long as the returned handle; the controller and the binding only hold
    /// it weakly.
    pub fn attach(controller: &SideMenuController, binding: Binding) -> Arc<BindingAdapter> {
        let adapter = Arc::new_cyclic(|this| BindingAdapter {
            this: this.clone(),
            binding: binding.clone(),
            controller: controller.downgrade(),
            animated: true,
            link: Mutex::new(LinkState::default()),
            subscription: Mutex::new(None),
        });
        controller.add_observer(&adapter);

        let weak = Arc::downgrade(&adapter);
        let subscription = binding.subscribe(move |_| {
            if let Some(adapter) = weak.upgrade() {
                adapter.reconcile();
            }
        });
        *adapter.subscription.lock() = Some(subscription);

        adapter.reconcile();
        adapter
    }

    pub fn binding(&self) -> &Binding {
        &self.binding
    }

    /// Applies the external value to the controller if they disagree and the menu is settled.
    ///
    /// Called automatically when the binding changes; hosts may also call it from their update
    /// cycle.
    pub fn reconcile(&self) {
        let controller = match self.controller.upgrade() {
            Some(controller) => controller,
            None => return,
        };
        let external = self.binding.get();
        let state = controller.state();

        let direction = {
            let mut link = self.link.lock();
            if let Some(written) = link.suppress_once.take() {
                if written == external {
                    trace!("binding: own write suppressed");
                    return;
                }
            }
            if !state.is_settled() {
                link.deferred = true;
                trace!("binding: change to {} deferred until settled", external);
                return;
            }
            link.deferred = false;
            match (external, state) {
                (true, MenuState::Closed) => Direction::Reveal,
                (false, MenuState::Revealed) => Direction::Hide,
                _ => return,
            }
        };

        debug!("binding: external {} requests {:?}", external, direction);
        let adapter = self.this.clone();
        controller.request(
            TransitionRequest::new(direction, Trigger::Binding, self.animated).with_completion(
                Some(Box::new(move |success| {
                    if !success {
                        if let Some(adapter) = adapter.upgrade() {
                            adapter.settled();
                        }
                    }
                })),
            ),
        );
    }

    /// Brings the binding in line with a settled controller.
    fn settled(&self) {
        let controller = match self.controller.upgrade() {
            Some(controller) => controller,
            None => return,
        };
        let state = controller.state();
        if !state.is_settled() {
            return;
        }
        let desired = state.is_revealed();

        let deferred = {
            let mut link = self.link.lock();
            let deferred = link.deferred;
            link.deferred = false;
            if !deferred && self.binding.get() != desired {
                link.suppress_once = Some(desired);
            }
            deferred
        };

        if deferred {
            // the external side changed mid-transition; its latest value wins
            self.reconcile();
        } else if self.binding.get() != desired {
            debug!("binding: syncing external value to {}", desired);
            self.binding.set(desired);
        }
    }
}

impl SideMenuDelegate for BindingAdapter {
    fn did_reveal(&self, _controller: &SideMenuController) {
        self.settled();
    }

    fn did_hide(&self, _controller: &SideMenuController) {
        self.settled();
    }

    fn did_cancel_transition(&self, _controller: &SideMenuController, _direction: Direction) {
        self.settled();
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use std::sync::atomic::{AtomicUsize, Ordering};

    #[test]
    fn setting_an_equal_value_is_a_no_op() {
        let binding = Binding::new(false);
        let calls = Arc::new(AtomicUsize::new(0));
        let c = Arc::clone(&calls);
        let _subscription = binding.subscribe(move |_| {
            c.fetch_add(1, Ordering::SeqCst);
        });

        binding.set(false);
        assert_eq!(binding.version(), 0);
        binding.set(true);
        binding.toggle();
        assert_eq!(binding.version(), 2);
        assert!(!binding.get());
        assert_eq!(calls.load(Ordering::SeqCst), 2);
    }

    #[test]
    fn dropping_the_subscription_unsubscribes() {
        let binding = Binding::new(false);
        let calls = Arc::new(AtomicUsize::new(0));
        let c = Arc::clone(&calls);
        let subscription = binding.subscribe(move |_| {
            c.fetch_add(1, Ordering::SeqCst);
        });
        binding.set(true);
        drop(subscription);
        binding.set(false);
        assert_eq!(calls.load(Ordering::SeqCst), 1);
    }

    #[test]
    fn subscribers_may_write_back() {
        let binding = Binding::new(false);
        let inner = binding.clone();
        let _subscription = binding.subscribe(move |value| {
            if value {
                inner.set(false);
            }
        });
        binding.set(true);
        assert!(!binding.get());
        assert_eq!(binding.version(), 2);
    }
}
