//! Gesture arbitration and the release solver
//!
//! One pan gesture may originate on the sheet background or inside an
//! embedded scroll region. A [`DragSession`] tracks the per-touch
//! arbitration state; the free functions here are the pure pieces of the
//! math: rubber-band compression past the edge detents and the
//! velocity-projected rest position used to pick the release detent.

use puller_core::{Transform2D, Vec2};

use crate::detent::Detent;
use crate::state::{DragAxis, GestureSource, MoveDirection};

/// Bounce compression exponent for dynamic-height sheets
pub(crate) const DYNAMIC_BOUNCE_EXPONENT: f32 = 0.7;
/// Bounce compression exponent for fixed-height dialog sheets
pub(crate) const DIALOG_BOUNCE_EXPONENT: f32 = 0.8;

/// Predicted rest position of a released drag
///
/// Closed form of integrating a velocity that decays by
/// `deceleration_rate` every millisecond: the geometric series sums to
/// `v/1000 * r / (1 - r)` pixels on top of the current offset.
pub(crate) fn rest_offset(current: f32, velocity: f32, deceleration_rate: f32) -> f32 {
    current + (velocity / 1000.0) * deceleration_rate / (1.0 - deceleration_rate)
}

/// Sign-preserving power compression for overdrag
pub(crate) fn rubber_band(offset: f32, exponent: f32) -> f32 {
    if offset >= 0.0 {
        offset.powf(exponent)
    } else {
        -((-offset).powf(exponent))
    }
}

/// Vertical boundaries of the active detent set, in pixels
#[derive(Clone, Copy, Debug)]
pub(crate) struct VerticalBounds {
    /// Pixel y of the lowest (first) detent
    pub first_y: f32,
    /// Pixel y of the highest (last) detent
    pub last_y: f32,
    pub modal_locked: bool,
    pub exponent: f32,
}

/// Outcome of one vertical drag update
#[derive(Clone, Copy, Debug, PartialEq)]
pub(crate) enum VerticalMove {
    /// The sheet moves to this y
    Track(f32),
    /// The sheet pins at the last detent and the scroll view takes the
    /// remainder of the gesture
    HandOff(f32),
}

/// Map an uncompressed track position to the sheet's vertical offset
///
/// Inside the detent range movement is 1:1. Past the last detent an
/// upward scroll-sourced drag hands off; everything else rubber-bands.
/// Past the first detent a modal-locked sheet rubber-bands while an
/// unlocked sheet keeps following the finger toward dismissal.
pub(crate) fn resolve_vertical(
    track_y: f32,
    source: GestureSource,
    direction: MoveDirection,
    bounds: VerticalBounds,
) -> VerticalMove {
    if track_y < bounds.last_y {
        if source == GestureSource::Scroll && direction == MoveDirection::Up {
            return VerticalMove::HandOff(bounds.last_y);
        }
        let excess = track_y - bounds.last_y;
        return VerticalMove::Track(bounds.last_y + rubber_band(excess, bounds.exponent));
    }

    if track_y > bounds.first_y && bounds.modal_locked {
        let excess = track_y - bounds.first_y;
        return VerticalMove::Track(bounds.first_y + rubber_band(excess, bounds.exponent));
    }

    VerticalMove::Track(track_y)
}

/// Arbitration state for one physical touch
#[derive(Clone, Debug)]
pub(crate) struct DragSession {
    pub axis: DragAxis,
    pub source: GestureSource,
    pub direction: MoveDirection,
    /// Detent resolved at touch begin, for keyboard-resign decisions
    pub begin_detent: Detent,
    /// Uncompressed vertical track position
    pub track_y: f32,
    /// Uncompressed horizontal track position, 0 at rest
    pub track_x: f32,
    /// Translation baseline; deltas are measured against it and it is
    /// advanced wherever the original recognizer would be re-zeroed
    pub baseline: Vec2,
    /// Accumulated non-bounce horizontal transform
    pub last_transform: Transform2D,
    /// Whether the sheet (not the scroll view) owns the movement
    pub needs_moving: bool,
    pub scroll_at_top_at_begin: bool,
    /// Cleared when the touch conflicts with a cross-axis animation;
    /// an invalid session is consumed without mutating any state
    pub valid: bool,
}

impl DragSession {
    /// Translation delta since the last re-baseline
    pub fn delta(&self, translation: Vec2) -> Vec2 {
        translation - self.baseline
    }

    pub fn rebaseline(&mut self, translation: Vec2) {
        self.baseline = translation;
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_rest_offset_zero_velocity() {
        assert_eq!(rest_offset(420.0, 0.0, 0.99), 420.0);
    }

    #[test]
    fn test_rest_offset_projects_along_velocity() {
        let down = rest_offset(400.0, 1000.0, 0.99);
        assert!(down > 400.0);
        let up = rest_offset(400.0, -1000.0, 0.99);
        assert!(up < 400.0);
        // r/(1-r) with r = 0.99 multiplies v/1000 by 99
        assert!((down - 499.0).abs() < 1e-3);
    }

    #[test]
    fn test_rest_offset_rate_sensitivity() {
        // A lower deceleration rate travels less far
        let fast_stop = rest_offset(0.0, 2000.0, 0.95);
        let slow_stop = rest_offset(0.0, 2000.0, 0.99);
        assert!(fast_stop < slow_stop);
    }

    #[test]
    fn test_rubber_band_compresses_and_keeps_sign() {
        assert_eq!(rubber_band(0.0, 0.7), 0.0);
        assert!(rubber_band(100.0, 0.7) < 100.0);
        assert!(rubber_band(100.0, 0.7) > 0.0);
        assert_eq!(rubber_band(-100.0, 0.7), -rubber_band(100.0, 0.7));
        // The dialog exponent compresses less
        assert!(rubber_band(100.0, 0.8) > rubber_band(100.0, 0.7));
    }

    fn bounds(modal: bool) -> VerticalBounds {
        VerticalBounds {
            first_y: 400.0,
            last_y: 64.0,
            modal_locked: modal,
            exponent: DYNAMIC_BOUNCE_EXPONENT,
        }
    }

    #[test]
    fn test_resolve_vertical_tracks_inside_range() {
        assert_eq!(
            resolve_vertical(
                200.0,
                GestureSource::View,
                MoveDirection::Up,
                bounds(false)
            ),
            VerticalMove::Track(200.0)
        );
    }

    #[test]
    fn test_resolve_vertical_bounces_past_last_detent() {
        let moved = resolve_vertical(
            14.0,
            GestureSource::View,
            MoveDirection::Up,
            bounds(false),
        );
        match moved {
            VerticalMove::Track(y) => {
                assert!(y < 64.0);
                assert!(y > 14.0);
            }
            VerticalMove::HandOff(_) => panic!("view-sourced drags never hand off"),
        }
    }

    #[test]
    fn test_resolve_vertical_hands_off_scroll_moving_up() {
        assert_eq!(
            resolve_vertical(
                14.0,
                GestureSource::Scroll,
                MoveDirection::Up,
                bounds(false)
            ),
            VerticalMove::HandOff(64.0)
        );
    }

    #[test]
    fn test_resolve_vertical_follows_finger_below_first_when_unlocked() {
        assert_eq!(
            resolve_vertical(
                600.0,
                GestureSource::View,
                MoveDirection::Down,
                bounds(false)
            ),
            VerticalMove::Track(600.0)
        );
    }

    #[test]
    fn test_resolve_vertical_bounces_below_first_when_modal_locked() {
        let moved = resolve_vertical(
            600.0,
            GestureSource::View,
            MoveDirection::Down,
            bounds(true),
        );
        match moved {
            VerticalMove::Track(y) => {
                assert!(y > 400.0);
                assert!(y < 600.0);
            }
            VerticalMove::HandOff(_) => panic!("modal bounce never hands off"),
        }
    }

    #[test]
    fn test_session_rebaseline() {
        let mut session = DragSession {
            axis: DragAxis::Vertical,
            source: GestureSource::View,
            direction: MoveDirection::Down,
            begin_detent: Detent::Medium,
            track_y: 400.0,
            track_x: 0.0,
            baseline: Vec2::ZERO,
            last_transform: Transform2D::IDENTITY,
            needs_moving: true,
            scroll_at_top_at_begin: true,
            valid: true,
        };

        let translation = Vec2::new(4.0, 30.0);
        assert_eq!(session.delta(translation), translation);
        session.rebaseline(translation);
        assert_eq!(session.delta(translation), Vec2::ZERO);
        assert_eq!(
            session.delta(Vec2::new(4.0, 42.0)),
            Vec2::new(0.0, 12.0)
        );
    }
}
