//! Frame-driven transition effects.

use core::time::Duration;
use log::trace;
use parking_lot::Mutex;
use sidemenu::backend::{AnimationParams, Animator};
use sidemenu::preferences::AnimationCurve;
use sidemenu::Direction;

struct Effect {
    params: AnimationParams,
    elapsed: Duration,
    on_complete: Box<dyn FnOnce(bool) + Send>,
}

impl Effect {
    fn linear_time(&self) -> f64 {
        let total = self.params.duration.as_secs_f64();
        if total <= 0. {
            1.
        } else {
            (self.elapsed.as_secs_f64() / total).min(1.)
        }
    }

    fn progress(&self) -> f64 {
        let t = ease(self.params.curve, self.linear_time());
        self.params.from + (self.params.to - self.params.from) * t
    }
}

fn ease(curve: AnimationCurve, t: f64) -> f64 {
    match curve {
        AnimationCurve::Linear => t,
        AnimationCurve::EaseIn => t * t,
        AnimationCurve::EaseOut => t * (2. - t),
        AnimationCurve::EaseInOut => {
            if t < 0.5 {
                2. * t * t
            } else {
                -1. + (4. - 2. * t) * t
            }
        }
    }
}

/// An animator advanced by the host’s display frames.
///
/// Runs one effect at a time; starting another one interrupts the running effect, which then
/// completes with `false`.
#[derive(Default)]
pub struct FrameAnimator {
    running: Mutex<Option<Effect>>,
}

impl FrameAnimator {
    pub fn new() -> FrameAnimator {
        FrameAnimator::default()
    }

    pub fn is_running(&self) -> bool {
        self.running.lock().is_some()
    }

    /// The direction and current transition progress of the running effect.
    pub fn progress(&self) -> Option<(Direction, f64)> {
        self.running
            .lock()
            .as_ref()
            .map(|effect| (effect.params.direction, effect.progress()))
    }

    /// How far the menu is currently revealed by the running effect.
    pub fn visible_fraction(&self) -> Option<f64> {
        self.progress().map(|(direction, progress)| match direction {
            Direction::Reveal => progress,
            Direction::Hide => 1. - progress,
        })
    }

    /// Advances the running effect. Returns true if an effect finished.
    pub fn tick(&self, elapsed: Duration) -> bool {
        let finished = {
            let mut running = self.running.lock();
            let done = match running.as_mut() {
                Some(effect) => {
                    effect.elapsed += elapsed;
                    effect.elapsed >= effect.params.duration
                }
                None => false,
            };
            if done {
                running.take()
            } else {
                None
            }
        };

        match finished {
            Some(effect) => {
                trace!("effect {:?} finished", effect.params.direction);
                (effect.on_complete)(true);
                true
            }
            None => false,
        }
    }

    /// Stops the running effect where it is; it completes with `false`.
    pub fn interrupt(&self) {
        let interrupted = self.running.lock().take();
        if let Some(effect) = interrupted {
            trace!("effect {:?} interrupted", effect.params.direction);
            (effect.on_complete)(false);
        }
    }
}

impl Animator for FrameAnimator {
    fn animate(&self, params: AnimationParams, on_complete: Box<dyn FnOnce(bool) + Send>) {
        if params.is_instant() {
            self.interrupt();
            on_complete(true);
            return;
        }
        trace!("effect {:?} started: {:?}", params.direction, params);
        let displaced = self.running.lock().replace(Effect {
            params,
            elapsed: Duration::from_secs(0),
            on_complete,
        });
        if let Some(effect) = displaced {
            trace!("effect {:?} interrupted", effect.params.direction);
            (effect.on_complete)(false);
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use std::sync::atomic::{AtomicUsize, Ordering};
    use std::sync::Arc;

    fn params(duration_ms: u64) -> AnimationParams {
        AnimationParams {
            direction: Direction::Reveal,
            from: 0.,
            to: 1.,
            duration: Duration::from_millis(duration_ms),
            curve: AnimationCurve::Linear,
        }
    }

    fn counter() -> (Arc<AtomicUsize>, Box<dyn FnOnce(bool) + Send>) {
        let count = Arc::new(AtomicUsize::new(0));
        let c = Arc::clone(&count);
        (
            count,
            Box::new(move |finished| {
                if finished {
                    c.fetch_add(1, Ordering::SeqCst);
                }
            }),
        )
    }

    #[test]
    fn effects_run_for_their_duration() {
        let animator = FrameAnimator::new();
        let (count, on_complete) = counter();
        animator.animate(params(100), on_complete);

        assert!(!animator.tick(Duration::from_millis(50)));
        assert_eq!(animator.visible_fraction(), Some(0.5));
        assert!(animator.tick(Duration::from_millis(60)));
        assert_eq!(count.load(Ordering::SeqCst), 1);
        assert!(!animator.is_running());
        assert!(!animator.tick(Duration::from_millis(60)));
    }

    #[test]
    fn instant_effects_complete_right_away() {
        let animator = FrameAnimator::new();
        let (count, on_complete) = counter();
        animator.animate(params(0), on_complete);
        assert_eq!(count.load(Ordering::SeqCst), 1);
        assert!(!animator.is_running());
    }

    #[test]
    fn a_new_effect_interrupts_the_running_one() {
        let animator = FrameAnimator::new();
        let (first, on_complete) = counter();
        animator.animate(params(100), on_complete);
        let (second, on_complete) = counter();
        animator.animate(params(100), on_complete);
        animator.tick(Duration::from_millis(100));
        assert_eq!(first.load(Ordering::SeqCst), 0);
        assert_eq!(second.load(Ordering::SeqCst), 1);
    }

    #[test]
    fn curves_start_and_end_in_place() {
        for &curve in &[
            AnimationCurve::Linear,
            AnimationCurve::EaseIn,
            AnimationCurve::EaseOut,
            AnimationCurve::EaseInOut,
        ] {
            assert_eq!(ease(curve, 0.), 0.);
            assert_eq!(ease(curve, 1.), 1.);
        }
    }
}
