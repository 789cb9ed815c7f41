//! Animation strategy
//!
//! A strategy bundles the timing parameters for one sheet movement:
//! duration, delay, damping fraction, initial velocity, and curve. The
//! driver interprets it either as a timed curve (damping fraction >= 1)
//! or as a spring (damping fraction < 1, velocity carried in).

use crate::easing::Easing;

/// Timing parameters for sheet animations
#[derive(Clone, Copy, Debug, PartialEq)]
pub struct AnimationStrategy {
    /// Total duration in seconds
    pub duration: f32,
    /// Delay before the animation starts, in seconds
    pub delay: f32,
    /// Spring damping fraction; 1.0 and above run as a timed curve
    pub damping: f32,
    /// Initial velocity in normalized progress units per second
    pub initial_velocity: f32,
    /// Curve applied to timed progress
    pub curve: Easing,
}

impl AnimationStrategy {
    /// Critically damped movement, the standard sheet timing
    pub fn standard() -> Self {
        Self {
            duration: 0.5,
            delay: 0.0,
            damping: 1.0,
            initial_velocity: 0.0,
            curve: Easing::EaseInOut,
        }
    }

    /// Slightly under-damped movement with a visible overshoot
    pub fn spring() -> Self {
        Self {
            duration: 0.5,
            delay: 0.0,
            damping: 0.8,
            initial_velocity: 0.0,
            curve: Easing::EaseInOut,
        }
    }

    /// The same strategy with a different duration
    pub fn with_duration(mut self, duration: f32) -> Self {
        self.duration = duration;
        self
    }

    /// The same strategy with a different curve
    pub fn with_curve(mut self, curve: Easing) -> Self {
        self.curve = curve;
        self
    }

    /// The same strategy with an initial velocity carried into the spring
    pub fn with_initial_velocity(mut self, velocity: f32) -> Self {
        self.initial_velocity = velocity;
        self
    }

    /// Whether this strategy runs on the spring integrator
    pub fn is_springy(&self) -> bool {
        self.damping < 1.0
    }
}

impl Default for AnimationStrategy {
    fn default() -> Self {
        Self::standard()
    }
}
