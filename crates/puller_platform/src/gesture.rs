//! Pan gesture events
//!
//! The host's gesture recognizer delivers one event stream per physical
//! touch. Translation is cumulative since the gesture began; the engine
//! re-baselines internally where the original recognizer would have its
//! translation reset, so hosts never need to mutate recognizer state.

use puller_core::{Point, Vec2};

/// Phase of a pan gesture
#[derive(Clone, Copy, Debug, PartialEq, Eq)]
pub enum PanPhase {
    /// Touch down, movement threshold crossed
    Began,
    /// Touch moved
    Changed,
    /// Touch lifted
    Ended,
    /// Gesture cancelled by the system
    Cancelled,
}

/// One pan gesture update
#[derive(Clone, Copy, Debug, PartialEq)]
pub struct PanEvent {
    pub phase: PanPhase,
    /// Touch location in the sheet container's coordinate space
    pub location: Point,
    /// Cumulative translation since `Began`
    pub translation: Vec2,
    /// Instantaneous velocity in pixels per second
    pub velocity: Vec2,
}

impl PanEvent {
    pub fn new(phase: PanPhase, location: Point, translation: Vec2, velocity: Vec2) -> Self {
        Self {
            phase,
            location,
            translation,
            velocity,
        }
    }

    /// Whether this event terminates the gesture
    pub fn is_terminal(&self) -> bool {
        matches!(self.phase, PanPhase::Ended | PanPhase::Cancelled)
    }
}
