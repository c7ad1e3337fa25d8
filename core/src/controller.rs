//! The reveal state machine.

use crate::backend::{AnimationParams, Animator, HapticEmitter, ImmediateAnimator, NoHaptics};
use crate::delegate::{isolate, DelegateChain, SideMenuDelegate};
use crate::events::{GestureEvent, GestureKind, GesturePhase};
use crate::global::Registry;
use crate::id::{ControllerId, ObserverId, SurfaceId};
use crate::policy::{Decision, TransitionPolicy};
use crate::preferences::Preferences;
use crate::state::{Completion, Direction, MenuState, TransitionRequest, Trigger};
use core::fmt;
use log::{debug, trace, warn};
use parking_lot::Mutex;
use std::collections::HashMap;
use std::sync::{Arc, Weak};

/// How the running transition is being driven.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
enum Phase {
    /// A pan is moving the menu; nothing is animating yet.
    Tracking,
    /// Animating towards the target state.
    Finishing,
    /// Animating back to the state the transition started from.
    Reverting,
}

struct ActiveTransition {
    direction: Direction,
    trigger: Trigger,
    generation: u64,
    phase: Phase,
    completion: Option<Completion>,
}

struct Machine {
    state: MenuState,
    blocked: bool,
    /// Bumped for every transition so that stale animator callbacks can be told apart.
    generation: u64,
    active: Option<ActiveTransition>,
    /// At most one request waiting for the running transition to settle.
    queued: Option<TransitionRequest>,
    /// Observers and the completion of a finished transition are being called. Requests made
    /// meanwhile wait in `queued`.
    settling: bool,
}

#[derive(Default)]
struct Surfaces {
    content: Option<SurfaceId>,
    menu: Option<SurfaceId>,
    cache: HashMap<String, SurfaceId>,
}

struct Shared {
    id: ControllerId,
    preferences: Preferences,
    policy: TransitionPolicy,
    animator: Arc<dyn Animator>,
    haptics: Arc<dyn HapticEmitter>,
    machine: Mutex<Machine>,
    chain: Mutex<DelegateChain>,
    surfaces: Mutex<Surfaces>,
    /// Global registries this controller is registered with.
    registries: Mutex<Vec<Weak<Registry>>>,
}

impl Drop for Shared {
    fn drop(&mut self) {
        for registry in self.registries.get_mut().drain(..) {
            if let Some(registry) = registry.upgrade() {
                registry.forget(self.id);
            }
        }
        debug!("side menu {:?} torn down", self.id);
    }
}

/// A side menu controller.
///
/// Owns the authoritative [`MenuState`] of one menu. This is a cheap handle; clones refer to the
/// same controller. The contract is single-threaded use from the host’s main thread. No internal
/// lock is held while observers, completions or the animator run, so they may call back in.
#[derive(Clone)]
pub struct SideMenuController {
    shared: Arc<Shared>,
}

/// A non-owning controller handle.
#[derive(Clone)]
pub struct WeakController {
    id: ControllerId,
    shared: Weak<Shared>,
}

impl WeakController {
    pub fn id(&self) -> ControllerId {
        self.id
    }

    pub fn upgrade(&self) -> Option<SideMenuController> {
        self.shared
            .upgrade()
            .map(|shared| SideMenuController { shared })
    }

    /// Returns true if the controller still exists. Does not keep it alive.
    pub fn is_alive(&self) -> bool {
        self.shared.strong_count() > 0
    }
}

impl fmt::Debug for WeakController {
    fn fmt(&self, f: &mut fmt::Formatter) -> fmt::Result {
        write!(f, "WeakController({:?})", self.id)
    }
}

/// Builds a [`SideMenuController`].
pub struct Builder {
    preferences: Preferences,
    animator: Arc<dyn Animator>,
    haptics: Arc<dyn HapticEmitter>,
    content: Option<SurfaceId>,
    menu: Option<SurfaceId>,
}

impl Builder {
    pub fn animator(mut self, animator: Arc<dyn Animator>) -> Self {
        self.animator = animator;
        self
    }

    pub fn haptics(mut self, haptics: Arc<dyn HapticEmitter>) -> Self {
        self.haptics = haptics;
        self
    }

    pub fn content(mut self, surface: SurfaceId) -> Self {
        self.content = Some(surface);
        self
    }

    pub fn menu(mut self, surface: SurfaceId) -> Self {
        self.menu = Some(surface);
        self
    }

    pub fn build(self) -> SideMenuController {
        let id = ControllerId::new();
        debug!("side menu {:?} created with {:?}", id, self.preferences);
        SideMenuController {
            shared: Arc::new(Shared {
                id,
                policy: TransitionPolicy::new(&self.preferences),
                machine: Mutex::new(Machine {
                    state: MenuState::Closed,
                    blocked: self.preferences.blocked,
                    generation: 0,
                    active: None,
                    queued: None,
                    settling: false,
                }),
                preferences: self.preferences,
                animator: self.animator,
                haptics: self.haptics,
                chain: Mutex::new(DelegateChain::default()),
                surfaces: Mutex::new(Surfaces {
                    content: self.content,
                    menu: self.menu,
                    cache: HashMap::new(),
                }),
                registries: Mutex::new(Vec::new()),
            }),
        }
    }
}

impl SideMenuController {
    /// Creates a controller whose transitions complete immediately and that emits no haptics.
    pub fn new(preferences: Preferences) -> SideMenuController {
        SideMenuController::builder(preferences).build()
    }

    pub fn builder(preferences: Preferences) -> Builder {
        Builder {
            preferences,
            animator: Arc::new(ImmediateAnimator),
            haptics: Arc::new(NoHaptics),
            content: None,
            menu: None,
        }
    }

    pub fn id(&self) -> ControllerId {
        self.shared.id
    }

    pub fn downgrade(&self) -> WeakController {
        WeakController {
            id: self.shared.id,
            shared: Arc::downgrade(&self.shared),
        }
    }

    pub fn preferences(&self) -> &Preferences {
        &self.shared.preferences
    }

    pub fn policy(&self) -> &TransitionPolicy {
        &self.shared.policy
    }

    pub fn state(&self) -> MenuState {
        self.shared.machine.lock().state
    }

    /// True only once a reveal has settled.
    pub fn is_revealed(&self) -> bool {
        self.state().is_revealed()
    }

    pub fn is_blocked(&self) -> bool {
        self.shared.machine.lock().blocked
    }

    /// Blocks or unblocks revealing. Hiding is always possible.
    pub fn set_blocked(&self, blocked: bool) {
        self.shared.machine.lock().blocked = blocked;
        debug!("side menu {:?} blocked: {}", self.shared.id, blocked);
    }

    /// Sets the direct delegate, which is called before any other observer.
    pub fn set_delegate<D: SideMenuDelegate + 'static>(&self, delegate: Option<&Arc<D>>) {
        let delegate = delegate.map(|d| Arc::downgrade(d) as Weak<dyn SideMenuDelegate>);
        self.shared.chain.lock().set_delegate(delegate);
    }

    /// Adds an observer after the delegate and all previously added observers.
    ///
    /// The controller does not keep the observer alive.
    pub fn add_observer<D: SideMenuDelegate + 'static>(&self, observer: &Arc<D>) -> ObserverId {
        let observer = Arc::downgrade(observer) as Weak<dyn SideMenuDelegate>;
        self.shared.chain.lock().add(observer)
    }

    pub fn remove_observer(&self, id: ObserverId) -> bool {
        self.shared.chain.lock().remove(id)
    }

    /// Reveals the menu. Returns false, and passes false to `completion`, if the request was
    /// turned down. A request queued behind a running transition returns true, and so does one made
    /// by an observer while a transition settles: it runs once every `did_*` call and the
    /// completion have returned.
    pub fn reveal(&self, animated: bool, completion: Option<Completion>) -> bool {
        self.request(
            TransitionRequest::new(Direction::Reveal, Trigger::Programmatic, animated)
                .with_completion(completion),
        )
    }

    /// Hides the menu. See [`reveal`](Self::reveal).
    pub fn hide(&self, animated: bool, completion: Option<Completion>) -> bool {
        self.request(
            TransitionRequest::new(Direction::Hide, Trigger::Programmatic, animated)
                .with_completion(completion),
        )
    }

    /// Reveals a closed menu or hides a revealed one. Ignored while a transition is running.
    pub fn toggle(&self, animated: bool) -> bool {
        match self.state() {
            MenuState::Closed => self.reveal(animated, None),
            MenuState::Revealed => self.hide(animated, None),
            state => {
                debug!("side menu {:?}: toggle ignored in {:?}", self.shared.id, state);
                false
            }
        }
    }

    /// Runs a transition request through the policy.
    pub fn request(&self, request: TransitionRequest) -> bool {
        let (state, blocked) = {
            let machine = self.shared.machine.lock();
            if machine.settling {
                drop(machine);
                return self.enqueue(request);
            }
            (machine.state, machine.blocked)
        };
        let decision = self.shared.policy.decide(
            state,
            request.direction,
            blocked,
            request.animated,
            || self.ask_should_reveal(),
        );

        match decision {
            Decision::Proceed(params) => self.begin(request, params),
            Decision::Defer => self.enqueue(request),
            Decision::Deny(denial) => {
                debug!(
                    "side menu {:?}: {:?} denied ({:?}) in {:?}",
                    self.shared.id, request, denial, state
                );
                request.finish(false);
                false
            }
        }
    }

    fn begin(&self, request: TransitionRequest, params: AnimationParams) -> bool {
        let direction = request.direction;
        let trigger = request.trigger;
        let generation = {
            let mut machine = self.shared.machine.lock();
            let idle = machine.active.is_none() && !machine.settling;
            if machine.state != direction.origin() || !idle {
                // an observer moved the menu while being asked; start over
                drop(machine);
                return self.request(request);
            }
            machine.generation += 1;
            machine.state = direction.in_flight(0.);
            machine.active = Some(ActiveTransition {
                direction,
                trigger,
                generation: machine.generation,
                phase: Phase::Finishing,
                completion: request.completion,
            });
            machine.generation
        };

        debug!(
            "side menu {:?}: {:?} started ({:?})",
            self.shared.id, direction, trigger
        );
        self.notify_will(direction);
        self.run_effect(generation, params);
        true
    }

    fn enqueue(&self, request: TransitionRequest) -> bool {
        let displaced = {
            let mut machine = self.shared.machine.lock();
            if machine.active.is_none() && !machine.settling {
                drop(machine);
                return self.request(request);
            }
            machine.queued.replace(request)
        };
        trace!("side menu {:?}: request queued", self.shared.id);
        if let Some(displaced) = displaced {
            warn!(
                "side menu {:?}: queued {:?} superseded by a newer request",
                self.shared.id, displaced
            );
            displaced.finish(false);
        }
        true
    }

    fn run_effect(&self, generation: u64, params: AnimationParams) {
        let controller = self.downgrade();
        self.shared.animator.animate(
            params,
            Box::new(move |finished| {
                if let Some(controller) = controller.upgrade() {
                    controller.effect_finished(generation, finished);
                }
            }),
        );
    }

    fn effect_finished(&self, generation: u64, finished: bool) {
        let active = {
            let mut machine = self.shared.machine.lock();
            let is_current = machine
                .active
                .as_ref()
                .map_or(false, |active| active.generation == generation);
            if !is_current {
                trace!("side menu {:?}: stale effect completion", self.shared.id);
                return;
            }
            let active = match machine.active.take() {
                Some(active) => active,
                None => return,
            };
            machine.state = match active.phase {
                Phase::Reverting => active.direction.origin(),
                Phase::Tracking | Phase::Finishing => active.direction.target(),
            };
            machine.settling = true;
            active
        };

        if !finished {
            debug!(
                "side menu {:?}: effect for {:?} was interrupted; settling anyway",
                self.shared.id, active.direction
            );
        }

        match active.phase {
            Phase::Reverting => {
                debug!(
                    "side menu {:?}: {:?} cancelled",
                    self.shared.id, active.direction
                );
                let direction = active.direction;
                self.notify("did_cancel_transition", |link| {
                    link.did_cancel_transition(self, direction)
                });
                if let Some(completion) = active.completion {
                    completion(false);
                }
            }
            Phase::Tracking | Phase::Finishing => {
                debug!(
                    "side menu {:?}: {:?} finished",
                    self.shared.id, active.direction
                );
                self.notify_did(active.direction);
                if let Some(completion) = active.completion {
                    completion(true);
                }
            }
        }

        self.shared.machine.lock().settling = false;
        self.run_queued();
    }

    fn run_queued(&self) {
        let queued = self.shared.machine.lock().queued.take();
        if let Some(request) = queued {
            trace!("side menu {:?}: running queued {:?}", self.shared.id, request);
            self.request(request);
        }
    }

    /// Feeds a gesture update from the host’s recognizer. Returns true if it was acted upon.
    pub fn handle_gesture(&self, event: GestureEvent) -> bool {
        let preferences = &self.shared.preferences;
        match (event.kind, event.phase) {
            (GestureKind::Tap, GesturePhase::Ended) => {
                if preferences.enable_tap_to_hide && self.is_revealed() {
                    self.request(TransitionRequest::new(
                        Direction::Hide,
                        Trigger::Gesture,
                        true,
                    ))
                } else {
                    false
                }
            }
            (GestureKind::Tap, _) => false,
            (GestureKind::Pan, _) if !preferences.enable_pan_gesture => false,
            (GestureKind::Pan, GesturePhase::Began) => self.begin_pan(event.clamped_progress()),
            (GestureKind::Pan, GesturePhase::Changed) => self.track_pan(event.clamped_progress()),
            (GestureKind::Pan, GesturePhase::Ended) => {
                self.end_pan(event.clamped_progress(), false)
            }
            (GestureKind::Pan, GesturePhase::Cancelled) => {
                self.end_pan(event.clamped_progress(), true)
            }
        }
    }

    fn begin_pan(&self, progress: f64) -> bool {
        let (state, blocked) = {
            let machine = self.shared.machine.lock();
            if machine.settling {
                trace!("side menu {:?}: pan ignored while settling", self.shared.id);
                return false;
            }
            (machine.state, machine.blocked)
        };
        let direction = match state {
            MenuState::Closed => Direction::Reveal,
            MenuState::Revealed => Direction::Hide,
            _ => {
                trace!("side menu {:?}: pan ignored mid-transition", self.shared.id);
                return false;
            }
        };

        match self
            .shared
            .policy
            .decide(state, direction, blocked, true, || self.ask_should_reveal())
        {
            Decision::Proceed(_) => {}
            decision => {
                debug!(
                    "side menu {:?}: pan {:?} not started ({:?})",
                    self.shared.id, direction, decision
                );
                return false;
            }
        }

        {
            let mut machine = self.shared.machine.lock();
            if machine.state != state || machine.active.is_some() || machine.settling {
                return false;
            }
            machine.generation += 1;
            machine.state = direction.in_flight(progress);
            machine.active = Some(ActiveTransition {
                direction,
                trigger: Trigger::Gesture,
                generation: machine.generation,
                phase: Phase::Tracking,
                completion: None,
            });
        }

        debug!("side menu {:?}: pan {:?} began", self.shared.id, direction);
        self.notify_will(direction);
        true
    }

    fn track_pan(&self, progress: f64) -> bool {
        let mut machine = self.shared.machine.lock();
        let direction = match &machine.active {
            Some(active) if active.phase == Phase::Tracking => active.direction,
            _ => return false,
        };
        machine.state = direction.in_flight(progress);
        trace!("side menu {:?}: pan at {:.3}", self.shared.id, progress);
        true
    }

    fn end_pan(&self, progress: f64, cancelled: bool) -> bool {
        let threshold = self.shared.preferences.completion_threshold;
        let commit = !cancelled && progress >= threshold;

        let (generation, params) = {
            let mut machine = self.shared.machine.lock();
            let active = match machine.active.as_mut() {
                Some(active) if active.phase == Phase::Tracking => active,
                _ => return false,
            };
            let direction = active.direction;
            let params = if commit {
                active.phase = Phase::Finishing;
                self.shared.policy.params(direction, progress, 1., true)
            } else {
                active.phase = Phase::Reverting;
                self.shared.policy.params(direction, progress, 0., true)
            };
            let generation = active.generation;
            machine.state = direction.in_flight(progress);
            (generation, params)
        };

        debug!(
            "side menu {:?}: pan ended at {:.3} ({})",
            self.shared.id,
            progress,
            if commit { "committing" } else { "reverting" }
        );
        if commit {
            if let Some(style) = self.shared.preferences.haptic_feedback {
                self.shared.haptics.impact(style);
            }
        }
        self.run_effect(generation, params);
        true
    }

    pub fn content(&self) -> Option<SurfaceId> {
        self.shared.surfaces.lock().content
    }

    pub fn menu(&self) -> Option<SurfaceId> {
        self.shared.surfaces.lock().menu
    }

    /// Replaces the content surface, notifying observers before and after.
    pub fn show_content(&self, surface: SurfaceId, animated: bool) {
        if self.content() == Some(surface) {
            return;
        }
        self.notify("will_show", |link| link.will_show(self, surface, animated));
        self.shared.surfaces.lock().content = Some(surface);
        self.notify("did_show", |link| link.did_show(self, surface, animated));
    }

    /// Remembers a content surface under a key for [`show_cached_content`](Self::show_cached_content).
    pub fn cache_content(&self, key: impl Into<String>, surface: SurfaceId) {
        self.shared.surfaces.lock().cache.insert(key.into(), surface);
    }

    /// Shows a cached content surface. Returns false if nothing is cached under `key`.
    pub fn show_cached_content(&self, key: &str, animated: bool) -> bool {
        let surface = self.shared.surfaces.lock().cache.get(key).copied();
        match surface {
            Some(surface) => {
                self.show_content(surface, animated);
                true
            }
            None => {
                debug!("side menu {:?}: no content cached as {:?}", self.shared.id, key);
                false
            }
        }
    }

    pub(crate) fn track_registry(&self, registry: Weak<Registry>) {
        let mut registries = self.shared.registries.lock();
        if !registries.iter().any(|r| r.ptr_eq(&registry)) {
            registries.push(registry);
        }
    }

    pub(crate) fn untrack_registry(&self, registry: &Weak<Registry>) {
        self.shared
            .registries
            .lock()
            .retain(|r| !r.ptr_eq(registry));
    }

    fn links(&self) -> Vec<Arc<dyn SideMenuDelegate>> {
        self.shared.chain.lock().links()
    }

    fn notify<F>(&self, event: &'static str, f: F)
    where
        F: Fn(&dyn SideMenuDelegate),
    {
        for link in self.links() {
            isolate(event, || f(&*link));
        }
    }

    fn notify_will(&self, direction: Direction) {
        match direction {
            Direction::Reveal => self.notify("will_reveal", |link| link.will_reveal(self)),
            Direction::Hide => self.notify("will_hide", |link| link.will_hide(self)),
        }
    }

    fn notify_did(&self, direction: Direction) {
        match direction {
            Direction::Reveal => self.notify("did_reveal", |link| link.did_reveal(self)),
            Direction::Hide => self.notify("did_hide", |link| link.did_hide(self)),
        }
    }

    /// Asks every link in order; the first veto wins.
    fn ask_should_reveal(&self) -> bool {
        for link in self.links() {
            if isolate("should_reveal", || link.should_reveal(self)) == Some(false) {
                debug!("side menu {:?}: reveal vetoed", self.shared.id);
                return false;
            }
        }
        true
    }
}

impl fmt::Debug for SideMenuController {
    fn fmt(&self, f: &mut fmt::Formatter) -> fmt::Result {
        f.debug_struct("SideMenuController")
            .field("id", &self.shared.id)
            .field("state", &self.state())
            .field("blocked", &self.is_blocked())
            .finish()
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::preferences::InFlightPolicy;

    /// Holds effects until the test finishes them.
    #[derive(Default)]
    struct ManualAnimator {
        pending: Mutex<Vec<(AnimationParams, Box<dyn FnOnce(bool) + Send>)>>,
    }

    impl ManualAnimator {
        fn finish_next(&self) -> Option<AnimationParams> {
            let next = {
                let mut pending = self.pending.lock();
                if pending.is_empty() {
                    None
                } else {
                    Some(pending.remove(0))
                }
            };
            next.map(|(params, on_complete)| {
                on_complete(true);
                params
            })
        }

        fn pending(&self) -> usize {
            self.pending.lock().len()
        }
    }

    impl Animator for ManualAnimator {
        fn animate(&self, params: AnimationParams, on_complete: Box<dyn FnOnce(bool) + Send>) {
            self.pending.lock().push((params, on_complete));
        }
    }

    #[derive(Default)]
    struct Log(Mutex<Vec<&'static str>>);

    impl Log {
        fn take(&self) -> Vec<&'static str> {
            std::mem::replace(&mut *self.0.lock(), Vec::new())
        }
    }

    impl SideMenuDelegate for Log {
        fn will_reveal(&self, _: &SideMenuController) {
            self.0.lock().push("will_reveal");
        }
        fn did_reveal(&self, _: &SideMenuController) {
            self.0.lock().push("did_reveal");
        }
        fn will_hide(&self, _: &SideMenuController) {
            self.0.lock().push("will_hide");
        }
        fn did_hide(&self, _: &SideMenuController) {
            self.0.lock().push("did_hide");
        }
        fn did_cancel_transition(&self, _: &SideMenuController, _: Direction) {
            self.0.lock().push("did_cancel");
        }
    }

    fn manual(preferences: Preferences) -> (SideMenuController, Arc<ManualAnimator>, Arc<Log>) {
        let animator = Arc::new(ManualAnimator::default());
        let controller = SideMenuController::builder(preferences)
            .animator(animator.clone())
            .build();
        let log = Arc::new(Log::default());
        controller.add_observer(&log);
        (controller, animator, log)
    }

    fn recorder() -> (Completion, Arc<Mutex<Vec<bool>>>) {
        let results = Arc::new(Mutex::new(Vec::new()));
        let r = Arc::clone(&results);
        (Box::new(move |ok| r.lock().push(ok)), results)
    }

    #[test]
    fn reveal_waits_for_the_effect() {
        let (controller, animator, log) = manual(Preferences::default());
        let (completion, results) = recorder();

        assert!(controller.reveal(true, Some(completion)));
        assert_eq!(controller.state(), MenuState::Revealing(0.));
        assert_eq!(log.take(), vec!["will_reveal"]);
        assert!(results.lock().is_empty());

        animator.finish_next().expect("an effect should be running");
        assert_eq!(controller.state(), MenuState::Revealed);
        assert_eq!(log.take(), vec!["did_reveal"]);
        assert_eq!(*results.lock(), vec![true]);
    }

    #[test]
    fn opposite_request_mid_flight_runs_after_settling() {
        let (controller, animator, log) = manual(Preferences::default());
        controller.reveal(true, None);
        assert!(controller.hide(true, None), "hide should be queued");
        assert_eq!(controller.state(), MenuState::Revealing(0.));

        animator.finish_next();
        assert_eq!(controller.state(), MenuState::Hiding(0.));
        animator.finish_next();
        assert_eq!(controller.state(), MenuState::Closed);
        assert_eq!(
            log.take(),
            vec!["will_reveal", "did_reveal", "will_hide", "did_hide"]
        );
    }

    #[test]
    fn same_direction_mid_flight_is_ignored_by_default() {
        let (controller, animator, log) = manual(Preferences::default());
        let (completion, results) = recorder();
        controller.reveal(true, None);
        assert!(!controller.reveal(true, Some(completion)));
        assert_eq!(*results.lock(), vec![false]);

        animator.finish_next();
        assert_eq!(animator.pending(), 0);
        assert_eq!(log.take(), vec!["will_reveal", "did_reveal"]);
    }

    #[test]
    fn queue_is_one_deep_and_latest_wins() {
        let prefs = Preferences::default().with_same_direction_in_flight(InFlightPolicy::Queue);
        let (controller, animator, _log) = manual(prefs);
        let (first, first_results) = recorder();
        let (second, second_results) = recorder();

        controller.reveal(true, None);
        controller.hide(true, Some(first));
        controller.hide(true, Some(second));
        assert_eq!(*first_results.lock(), vec![false], "displaced request fails");

        animator.finish_next();
        animator.finish_next();
        assert_eq!(controller.state(), MenuState::Closed);
        assert_eq!(*second_results.lock(), vec![true]);
    }

    #[test]
    fn toggle_is_ignored_mid_flight() {
        let (controller, animator, _log) = manual(Preferences::default());
        assert!(controller.toggle(false));
        assert!(!controller.toggle(false));
        animator.finish_next();
        assert!(controller.is_revealed());
        assert!(controller.toggle(false));
        animator.finish_next();
        assert_eq!(controller.state(), MenuState::Closed);
    }

    #[test]
    fn pan_below_threshold_reverts_without_did() {
        let (controller, animator, log) = manual(Preferences::default());
        assert!(controller.handle_gesture(GestureEvent::pan(GesturePhase::Began, 0.)));
        assert!(controller.handle_gesture(GestureEvent::pan(GesturePhase::Changed, 0.3)));
        assert_eq!(controller.state(), MenuState::Revealing(0.3));
        assert!(controller.handle_gesture(GestureEvent::pan(GesturePhase::Ended, 0.3)));

        let params = animator.finish_next().expect("revert effect");
        assert_eq!(params.to, 0.);
        assert_eq!(controller.state(), MenuState::Closed);
        assert_eq!(log.take(), vec!["will_reveal", "did_cancel"]);

        controller.reveal(false, None);
        animator.finish_next();
        assert!(controller.is_revealed());
        assert_eq!(log.take(), vec!["will_reveal", "did_reveal"]);
    }

    #[test]
    fn pan_above_threshold_completes_once() {
        struct Counter(Mutex<usize>);
        impl HapticEmitter for Counter {
            fn impact(&self, _: crate::preferences::ImpactStyle) {
                *self.0.lock() += 1;
            }
        }

        let animator = Arc::new(ManualAnimator::default());
        let haptics = Arc::new(Counter(Mutex::new(0)));
        let controller = SideMenuController::builder(Preferences::default())
            .animator(animator.clone())
            .haptics(haptics.clone())
            .build();
        let log = Arc::new(Log::default());
        controller.add_observer(&log);

        controller.handle_gesture(GestureEvent::pan(GesturePhase::Began, 0.1));
        controller.handle_gesture(GestureEvent::pan(GesturePhase::Changed, 0.7));
        controller.handle_gesture(GestureEvent::pan(GesturePhase::Ended, 0.8));
        let params = animator.finish_next().expect("finishing effect");
        assert_eq!(params.from, 0.8);
        assert_eq!(params.to, 1.);
        assert!(controller.is_revealed());
        assert_eq!(log.take(), vec!["will_reveal", "did_reveal"]);
        assert_eq!(*haptics.0.lock(), 1);
    }

    #[test]
    fn cancelled_pan_reverts_and_tap_hides() {
        let (controller, animator, log) = manual(Preferences::default());
        controller.reveal(false, None);
        animator.finish_next();
        log.take();

        controller.handle_gesture(GestureEvent::pan(GesturePhase::Began, 0.));
        controller.handle_gesture(GestureEvent::pan(GesturePhase::Cancelled, 0.9));
        animator.finish_next();
        assert!(controller.is_revealed());
        assert_eq!(log.take(), vec!["will_hide", "did_cancel"]);

        assert!(controller.handle_gesture(GestureEvent::tap()));
        animator.finish_next();
        assert_eq!(controller.state(), MenuState::Closed);
        assert!(!controller.handle_gesture(GestureEvent::tap()), "tap while closed");
    }

    #[test]
    fn disabled_pan_is_ignored() {
        let (controller, _animator, log) = manual(Preferences::default().with_pan_gesture(false));
        assert!(!controller.handle_gesture(GestureEvent::pan(GesturePhase::Began, 0.)));
        assert_eq!(controller.state(), MenuState::Closed);
        assert!(log.take().is_empty());
    }

    #[test]
    fn stale_completions_are_ignored() {
        let (controller, animator, _log) = manual(Preferences::default());
        controller.handle_gesture(GestureEvent::pan(GesturePhase::Began, 0.));
        controller.handle_gesture(GestureEvent::pan(GesturePhase::Ended, 0.1));
        animator.finish_next();
        assert_eq!(controller.state(), MenuState::Closed);

        // a completion for generation 1 arriving late must not touch the next transition
        controller.reveal(true, None);
        controller.effect_finished(1, true);
        assert_eq!(controller.state(), MenuState::Revealing(0.));
        animator.finish_next();
        assert!(controller.is_revealed());
    }

    #[test]
    fn panicking_observer_does_not_stop_the_transition() {
        struct Grumpy;
        impl SideMenuDelegate for Grumpy {
            fn will_reveal(&self, _: &SideMenuController) {
                panic!("grumpy observer");
            }
            fn should_reveal(&self, _: &SideMenuController) -> bool {
                panic!("grumpy observer");
            }
        }

        let controller = SideMenuController::new(Preferences::default());
        let grumpy = Arc::new(Grumpy);
        controller.set_delegate(Some(&grumpy));
        let log = Arc::new(Log::default());
        controller.add_observer(&log);

        assert!(controller.reveal(true, None));
        assert!(controller.is_revealed());
        assert_eq!(log.take(), vec!["will_reveal", "did_reveal"]);
    }

    #[test]
    fn show_content_notifies_around_the_swap() {
        #[derive(Default)]
        struct Shows(Mutex<Vec<(bool, Option<SurfaceId>)>>);
        impl SideMenuDelegate for Shows {
            fn will_show(&self, c: &SideMenuController, _: SurfaceId, _: bool) {
                self.0.lock().push((false, c.content()));
            }
            fn did_show(&self, c: &SideMenuController, _: SurfaceId, _: bool) {
                self.0.lock().push((true, c.content()));
            }
        }

        let first = SurfaceId::new();
        let second = SurfaceId::new();
        let controller = SideMenuController::builder(Preferences::default())
            .content(first)
            .build();
        let shows = Arc::new(Shows::default());
        controller.add_observer(&shows);

        controller.cache_content("settings", second);
        assert!(controller.show_cached_content("settings", true));
        assert!(!controller.show_cached_content("missing", true));
        assert_eq!(
            *shows.0.lock(),
            vec![(false, Some(first)), (true, Some(second))]
        );
    }
}
