//! Keyboard coordination
//!
//! When the keyboard shows, the sheet must rise above it without losing
//! the detent the user chose. The planner computes the keyboard-adjusted
//! detent set and target offset; the controller owns applying it and
//! restoring the previous detent on hide.

use puller_animation::{AnimationStrategy, Easing};
use puller_platform::{KeyboardCurve, KeyboardTransition};

use crate::config::SheetConfig;
use crate::detent::{Detent, DetentList};

/// Result of planning a keyboard appearance
#[derive(Clone, Debug)]
pub(crate) struct KeyboardShowPlan {
    /// Detent set active while the keyboard is visible; always contains an
    /// entry exactly at the resting position
    pub detents: DetentList,
    /// Pixel y the sheet animates to
    pub target_y: f32,
    /// Correction added to the tracked sheet height (fixed-height sheets)
    pub height_delta: f32,
}

/// Plan the sheet's reaction to the keyboard appearing
///
/// The target is the current detent's position raised by the keyboard
/// height, clamped so the sheet never rises above the Large detent (or
/// above the screen top when the last detent is Full). With
/// `keyboard_expands` the sheet instead snaps straight to that bound and
/// a Large detent joins the set when the last detent is not yet expanded;
/// otherwise a synthetic fraction detent matching the clamped target is
/// appended.
pub(crate) fn plan_show(
    config: &SheetConfig,
    standard: &DetentList,
    selected: Detent,
    screen_height: f32,
    keyboard_height: f32,
) -> Option<KeyboardShowPlan> {
    let last = standard.last()?;
    let mut detents = standard.clone();

    let raw_y = selected.position(screen_height) - keyboard_height;
    let min_y = if last.is_full() {
        0.0
    } else {
        Detent::Large.position(screen_height)
    };

    let target_y = if config.keyboard_expands {
        if !last.is_expanded() {
            detents.insert_sorted(Detent::Large);
        }
        min_y
    } else {
        let target_y = raw_y.max(min_y);
        let value = (screen_height - target_y) / screen_height;
        detents.insert_sorted(Detent::Fraction(value));
        target_y
    };

    let height_delta = keyboard_height - (target_y - raw_y);

    Some(KeyboardShowPlan {
        detents,
        target_y,
        height_delta,
    })
}

/// Animation strategy matching the system keyboard's own timing
pub(crate) fn keyboard_strategy(transition: &KeyboardTransition) -> AnimationStrategy {
    let curve = match transition.curve {
        KeyboardCurve::Linear => Easing::Linear,
        KeyboardCurve::EaseIn => Easing::EaseIn,
        KeyboardCurve::EaseOut => Easing::EaseOut,
        KeyboardCurve::EaseInOut => Easing::EaseInOut,
    };
    AnimationStrategy::standard()
        .with_duration(transition.duration)
        .with_curve(curve)
}

#[cfg(test)]
mod tests {
    use super::*;

    const SCREEN_H: f32 = 844.0;

    #[test]
    fn test_expands_appends_large_and_targets_large() {
        let config = SheetConfig::new(&[Detent::Medium]).with_keyboard_expands(true);
        let standard = config.detents().clone();

        let plan = plan_show(&config, &standard, Detent::Medium, SCREEN_H, 300.0).unwrap();
        assert!(plan.detents.contains(Detent::Large));
        assert_eq!(plan.detents.last(), Some(Detent::Large));
        assert_eq!(plan.target_y, Detent::Large.position(SCREEN_H));
    }

    #[test]
    fn test_expands_skips_append_when_last_already_expanded() {
        let config = SheetConfig::new(&[Detent::Medium, Detent::Large]);
        let standard = config.detents().clone();

        let plan = plan_show(&config, &standard, Detent::Medium, SCREEN_H, 300.0).unwrap();
        assert_eq!(plan.detents.len(), standard.len());
        assert_eq!(plan.target_y, Detent::Large.position(SCREEN_H));
    }

    #[test]
    fn test_full_last_detent_allows_screen_top() {
        let config = SheetConfig::new(&[Detent::Medium, Detent::Full]);
        let standard = config.detents().clone();

        let plan = plan_show(&config, &standard, Detent::Full, SCREEN_H, 300.0).unwrap();
        assert_eq!(plan.target_y, 0.0);
    }

    #[test]
    fn test_non_expanding_appends_matching_fraction() {
        let config = SheetConfig::new(&[Detent::Fraction(0.3), Detent::Large])
            .with_keyboard_expands(false);
        let standard = config.detents().clone();

        let keyboard_height = 300.0;
        let plan = plan_show(
            &config,
            &standard,
            Detent::Fraction(0.3),
            SCREEN_H,
            keyboard_height,
        )
        .unwrap();

        let expected_y = Detent::Fraction(0.3).position(SCREEN_H) - keyboard_height;
        assert_eq!(plan.target_y, expected_y);

        // The set contains a detent resting exactly at the target
        let value = (SCREEN_H - expected_y) / SCREEN_H;
        assert!(plan
            .detents
            .iter()
            .any(|d| (d.value() - value).abs() < 1e-6));
    }

    #[test]
    fn test_non_expanding_clamps_to_large() {
        let config = SheetConfig::new(&[Detent::Medium, Detent::Large])
            .with_keyboard_expands(false);
        let standard = config.detents().clone();

        // A huge keyboard would push the sheet past Large; it clamps
        let plan = plan_show(&config, &standard, Detent::Medium, SCREEN_H, 600.0).unwrap();
        assert_eq!(plan.target_y, Detent::Large.position(SCREEN_H));
    }

    #[test]
    fn test_height_delta_accounts_for_clamp() {
        let config = SheetConfig::new(&[Detent::Medium, Detent::Large])
            .with_keyboard_expands(false);
        let standard = config.detents().clone();

        // Unclamped: the sheet absorbs the whole keyboard height
        let free = plan_show(&config, &standard, Detent::Medium, SCREEN_H, 100.0).unwrap();
        assert!((free.height_delta - 100.0).abs() < 1e-3);

        // Clamped: the correction shrinks by the clamped distance
        let clamped = plan_show(&config, &standard, Detent::Medium, SCREEN_H, 600.0).unwrap();
        assert!(clamped.height_delta < 600.0);
    }
}
