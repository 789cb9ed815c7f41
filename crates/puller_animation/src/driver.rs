//! Animation driver contract
//!
//! The engine never owns a frame clock. It hands each movement to an
//! [`AnimationDriver`] as a pair of callbacks: a frame callback receiving
//! normalized progress, and a completion callback receiving whether the
//! animation finished or was cancelled by a superseding movement.
//!
//! Two drivers ship with the crate:
//!
//! - [`TickDriver`] keeps registered animations in a slotmap and advances
//!   them from the host's frame loop via [`TickDriver::tick`]
//! - [`ImmediateDriver`] completes every animation synchronously; used by
//!   headless hosts and tests

use std::sync::{Arc, Mutex};

use slotmap::{new_key_type, SlotMap};

use crate::spring::{Spring, SpringConfig};
use crate::strategy::AnimationStrategy;

new_key_type! {
    /// Handle to a registered animation
    pub struct AnimationId;
}

/// How an animation ended
#[derive(Clone, Copy, Debug, PartialEq, Eq)]
pub enum AnimationOutcome {
    /// The animation ran to completion
    Finished,
    /// The animation was cancelled before completing
    Cancelled,
}

impl AnimationOutcome {
    pub fn was_cancelled(self) -> bool {
        matches!(self, AnimationOutcome::Cancelled)
    }
}

/// Per-frame progress callback; progress is eased, may overshoot 1.0 for
/// under-damped springs
pub type FrameFn = Box<dyn FnMut(f32) + Send>;

/// Completion callback
pub type DoneFn = Box<dyn FnOnce(AnimationOutcome) + Send>;

/// Contract for running one animation
///
/// Implementations must deliver frames in order, deliver the completion
/// exactly once, and report `Cancelled` when [`AnimationDriver::cancel`]
/// interrupts a running animation.
pub trait AnimationDriver: Send + Sync {
    /// Start an animation and return its handle
    fn animate(&self, strategy: AnimationStrategy, frame: FrameFn, done: DoneFn) -> AnimationId;

    /// Cancel a running animation
    ///
    /// The completion callback fires with `Cancelled`. Unknown or already
    /// completed handles are ignored.
    fn cancel(&self, id: AnimationId);
}

/// Springs animate toward this value instead of 1.0 so the spring's
/// pixel-tuned settle epsilons translate to sub-percent progress
const SPRING_PROGRESS_SCALE: f32 = 100.0;

struct ActiveAnimation {
    strategy: AnimationStrategy,
    elapsed: f32,
    spring: Option<Spring>,
    frame: FrameFn,
    done: Option<DoneFn>,
}

type SharedAnimations = Arc<Mutex<SlotMap<AnimationId, Arc<Mutex<ActiveAnimation>>>>>;

/// Frame-loop driven animation driver
///
/// The host calls [`TickDriver::tick`] once per frame with the elapsed
/// time. Callbacks are invoked outside the driver's internal locks, so a
/// completion callback may start or cancel further animations.
#[derive(Clone, Default)]
pub struct TickDriver {
    animations: SharedAnimations,
}

impl TickDriver {
    pub fn new() -> Self {
        Self {
            animations: Arc::new(Mutex::new(SlotMap::with_key())),
        }
    }

    /// Number of animations currently registered
    pub fn active_count(&self) -> usize {
        self.animations.lock().unwrap().len()
    }

    /// Advance all animations by `dt` seconds
    ///
    /// Returns true while any animation remains active. Must not be called
    /// from inside a frame or completion callback.
    pub fn tick(&self, dt: f32) -> bool {
        let entries: Vec<(AnimationId, Arc<Mutex<ActiveAnimation>>)> = {
            let map = self.animations.lock().unwrap();
            map.iter().map(|(id, a)| (id, Arc::clone(a))).collect()
        };

        let mut completions: Vec<DoneFn> = Vec::new();
        for (id, entry) in entries {
            let finished = {
                let mut anim = entry.lock().unwrap();
                anim.advance(dt)
            };
            if finished {
                let removed = self.animations.lock().unwrap().remove(id);
                if removed.is_some() {
                    let mut anim = entry.lock().unwrap();
                    if let Some(done) = anim.done.take() {
                        completions.push(done);
                    }
                }
            }
        }

        for done in completions {
            done(AnimationOutcome::Finished);
        }

        !self.animations.lock().unwrap().is_empty()
    }
}

impl ActiveAnimation {
    /// Step the animation; returns true when it finished
    fn advance(&mut self, dt: f32) -> bool {
        self.elapsed += dt;
        let t = self.elapsed - self.strategy.delay;
        if t < 0.0 {
            return false;
        }

        if self.strategy.is_springy() {
            let spring = self.spring.get_or_insert_with(|| {
                let config =
                    SpringConfig::with_response(self.strategy.duration, self.strategy.damping);
                let mut spring = Spring::new(config, 0.0);
                spring.set_target(SPRING_PROGRESS_SCALE);
                spring.set_velocity(self.strategy.initial_velocity * SPRING_PROGRESS_SCALE);
                spring
            });
            spring.step(dt);
            if spring.is_settled() {
                (self.frame)(1.0);
                true
            } else {
                let progress = spring.value() / SPRING_PROGRESS_SCALE;
                (self.frame)(progress);
                false
            }
        } else if t >= self.strategy.duration {
            (self.frame)(1.0);
            true
        } else {
            let progress = self.strategy.curve.eval(t / self.strategy.duration);
            (self.frame)(progress);
            false
        }
    }
}

impl AnimationDriver for TickDriver {
    fn animate(&self, strategy: AnimationStrategy, mut frame: FrameFn, done: DoneFn) -> AnimationId {
        if strategy.duration <= 0.0 && strategy.delay <= 0.0 {
            frame(1.0);
            done(AnimationOutcome::Finished);
            return AnimationId::default();
        }

        let entry = Arc::new(Mutex::new(ActiveAnimation {
            strategy,
            elapsed: 0.0,
            spring: None,
            frame,
            done: Some(done),
        }));
        let id = self.animations.lock().unwrap().insert(entry);
        tracing::trace!(?id, "animation registered");
        id
    }

    fn cancel(&self, id: AnimationId) {
        let removed = self.animations.lock().unwrap().remove(id);
        if let Some(entry) = removed {
            tracing::debug!(?id, "animation cancelled");
            let done = entry.lock().unwrap().done.take();
            if let Some(done) = done {
                done(AnimationOutcome::Cancelled);
            }
        }
    }
}

/// Driver that completes every animation synchronously
///
/// Frames jump straight to final progress and the completion fires before
/// `animate` returns. Suitable for headless hosts and unit tests.
#[derive(Clone, Copy, Debug, Default)]
pub struct ImmediateDriver;

impl ImmediateDriver {
    pub fn new() -> Self {
        Self
    }
}

impl AnimationDriver for ImmediateDriver {
    fn animate(&self, _strategy: AnimationStrategy, mut frame: FrameFn, done: DoneFn) -> AnimationId {
        frame(1.0);
        done(AnimationOutcome::Finished);
        AnimationId::default()
    }

    fn cancel(&self, _id: AnimationId) {}
}
