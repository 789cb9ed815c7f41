//! Derived visual properties
//!
//! Pure recomputation of every visual side-effect of the sheet's offset:
//! backdrop dimming, corner radii, presenting-view scale, drag-indicator
//! offset, and close-button placement. Stateless by construction - the
//! same inputs always produce the same outputs, so the controller can
//! recompute after every frame, gesture update, and geometry event.

use puller_core::Rect;
use puller_platform::DeviceIdiom;

use crate::config::SheetConfig;
use crate::detent::{Detent, DetentList};
use crate::state::DragAxis;

/// Drag indicator dimensions
pub const DRAG_INDICATOR_WIDTH: f32 = 36.0;
pub const DRAG_INDICATOR_HEIGHT: f32 = 5.0;

/// Close button edge length
pub const CLOSE_BUTTON_SIZE: f32 = 32.0;

/// Presenting-view scale when the sheet is fully expanded
const MIN_BACKGROUND_SCALE: f32 = 0.88;

/// Screen facts the visual computer needs
#[derive(Clone, Copy, Debug)]
pub struct ScreenInfo {
    pub width: f32,
    pub height: f32,
    pub safe_top: f32,
    pub safe_bottom: f32,
    pub display_corner_radius: f32,
    pub idiom: DeviceIdiom,
}

/// Inputs to one visual recomputation
pub struct VisualInputs<'a> {
    pub screen: ScreenInfo,
    pub config: &'a SheetConfig,
    /// Active detent set (standard or keyboard-adjusted)
    pub detents: &'a DetentList,
    pub dimmed_detent: Detent,
    pub selected: Detent,
    pub axis: DragAxis,
    /// Effective sheet top edge (frame plus transform)
    pub sheet_y: f32,
    /// Effective sheet left edge
    pub sheet_x: f32,
    pub sheet_width: f32,
    pub presenting_frame: Rect,
}

/// Outputs of one visual recomputation
#[derive(Clone, Copy, Debug, PartialEq)]
pub struct VisualOutputs {
    pub dimming_alpha: f32,
    pub sheet_corner_radius: f32,
    /// None leaves the presenting surface's radius untouched
    pub presenting_corner_radius: Option<f32>,
    pub presenting_scale: f32,
    /// Indicator offset from the sheet's top edge; None hides it
    pub drag_indicator_offset: Option<f32>,
    /// Close button frame in sheet-local coordinates; None hides it
    pub close_button_frame: Option<Rect>,
}

/// Interpolate between a collapsed and an expanded value
///
/// Parameterized by the sheet offset between the last two detents'
/// positions: `max_value` at the second-to-last detent (or the screen
/// bottom for single-detent sheets), `min_value` at the last detent.
fn ramp(
    current_y: f32,
    detents: &DetentList,
    screen_height: f32,
    max_value: f32,
    min_value: f32,
) -> f32 {
    let Some(last) = detents.last() else {
        return min_value;
    };
    let max_y = last.position(screen_height);
    let min_y = detents
        .second_to_last()
        .map(|d| d.position(screen_height))
        .unwrap_or(screen_height);
    let current = current_y.min(min_y).max(max_y);
    let delta = min_y - max_y;
    if delta == 0.0 {
        return min_value;
    }
    let step = (max_value - min_value) / delta;
    max_value - (min_y - current) * step
}

/// Backdrop alpha for the current offset
///
/// Clear at and below the largest undimmed detent, ramping linearly to
/// the configured maximum at the dimmed detent, constant above it.
fn dimming_alpha(inputs: &VisualInputs<'_>) -> f32 {
    let screen_h = inputs.screen.height;
    let undimmed_y = inputs
        .config
        .largest_undimmed_detent
        .position(screen_h);

    if inputs.axis == DragAxis::Horizontal {
        let alpha =
            inputs.config.dimmed_alpha * (inputs.screen.width - inputs.sheet_x) / inputs.screen.width;
        return if inputs.sheet_y < undimmed_y { alpha } else { 0.0 };
    }

    let dimmed_y = inputs.dimmed_detent.position(screen_h);
    let current = inputs.sheet_y.max(dimmed_y);
    let max_height = (undimmed_y - dimmed_y).max(0.0);
    let current_height = (undimmed_y - current).max(0.0);
    if max_height == 0.0 {
        0.0
    } else {
        inputs.config.dimmed_alpha * current_height / max_height
    }
}

/// Corner radii for the sheet and the presenting surface
fn corner_radii(inputs: &VisualInputs<'_>) -> (f32, Option<f32>) {
    let config = inputs.config;
    let screen = inputs.screen;

    if !config.dynamic_height {
        let radius = if screen.display_corner_radius > 0.0 {
            screen.display_corner_radius
        } else {
            config.corner_radius
        };
        return (radius, None);
    }

    let Some(last) = inputs.detents.last() else {
        return (config.corner_radius, None);
    };
    if !last.is_expanded() {
        return (config.corner_radius, None);
    }

    let max_radius = config.corner_radius;
    let min_radius = screen.display_corner_radius;

    let mut to_radius = if inputs.axis == DragAxis::Horizontal {
        inputs.sheet_x * (max_radius - min_radius) / screen.width + min_radius
    } else {
        ramp(
            inputs.sheet_y,
            inputs.detents,
            screen.height,
            max_radius,
            min_radius,
        )
    };

    let mut from_radius = max_radius + min_radius - to_radius;
    if inputs.axis == DragAxis::Horizontal {
        if !inputs.selected.is_expanded() {
            from_radius = min_radius;
        }
        to_radius = if inputs.selected.is_full() {
            min_radius
        } else {
            max_radius
        };
    }

    let portrait_phone = screen.idiom == DeviceIdiom::Phone && screen.width < screen.height;
    let sheet_radius = if last.is_full() && portrait_phone {
        to_radius
    } else {
        config.corner_radius
    };

    (sheet_radius, Some(from_radius))
}

/// Scale of the presenting surface behind the sheet
fn presenting_scale(inputs: &VisualInputs<'_>) -> f32 {
    let screen = inputs.screen;
    let expanded_last = inputs.detents.last().map(|d| d.is_expanded()).unwrap_or(false);
    let portrait = screen.height > screen.width;
    let presenting_tall =
        inputs.presenting_frame.height() > inputs.presenting_frame.width();

    if !expanded_last || screen.idiom != DeviceIdiom::Phone || !portrait || !presenting_tall {
        return 1.0;
    }

    if inputs.axis == DragAxis::Horizontal {
        if inputs.selected.is_expanded() {
            inputs.sheet_x * (1.0 - MIN_BACKGROUND_SCALE) / screen.width + MIN_BACKGROUND_SCALE
        } else {
            1.0
        }
    } else {
        ramp(
            inputs.sheet_y,
            inputs.detents,
            screen.height,
            1.0,
            MIN_BACKGROUND_SCALE,
        )
    }
}

/// Resting indicator offset for the current detent set
fn drag_indicator_base_offset(inputs: &VisualInputs<'_>) -> Option<f32> {
    let is_inside = inputs.config.drag_indicator.is_inside()?;
    let offset = if inputs.detents.last().map(|d| d.is_full()).unwrap_or(false) {
        inputs.screen.safe_top
    } else if is_inside {
        DRAG_INDICATOR_HEIGHT
    } else {
        -2.0 * DRAG_INDICATOR_HEIGHT
    };
    Some(offset)
}

/// Indicator offset from the sheet top, interpolated near the top edge
fn drag_indicator_offset(inputs: &VisualInputs<'_>) -> Option<f32> {
    let is_inside = inputs.config.drag_indicator.is_inside()?;
    let full_last = inputs.detents.last().map(|d| d.is_full()).unwrap_or(false);
    if !full_last {
        return drag_indicator_base_offset(inputs);
    }

    let max_offset = if is_inside {
        DRAG_INDICATOR_HEIGHT
    } else {
        -2.0 * DRAG_INDICATOR_HEIGHT
    };
    Some(ramp(
        inputs.sheet_y,
        inputs.detents,
        inputs.screen.height,
        max_offset,
        inputs.screen.safe_top,
    ))
}

/// Close button frame in sheet-local coordinates
fn close_button_frame(inputs: &VisualInputs<'_>) -> Option<Rect> {
    if !inputs.config.circle_close_button {
        return None;
    }

    let mut top_inset: f32 = if inputs.config.dynamic_height { 12.0 } else { 20.0 };
    let right_inset = top_inset + 3.0;

    if inputs.detents.last().map(|d| d.is_full()).unwrap_or(false) {
        top_inset = ramp(
            inputs.sheet_y,
            inputs.detents,
            inputs.screen.height,
            top_inset,
            inputs.screen.safe_top,
        );
    }

    Some(Rect::new(
        inputs.sheet_width - CLOSE_BUTTON_SIZE - right_inset,
        top_inset,
        CLOSE_BUTTON_SIZE,
        CLOSE_BUTTON_SIZE,
    ))
}

/// Recompute every derived visual for the given offset
pub fn compute(inputs: &VisualInputs<'_>) -> VisualOutputs {
    let (sheet_corner_radius, presenting_corner_radius) = corner_radii(inputs);
    VisualOutputs {
        dimming_alpha: dimming_alpha(inputs),
        sheet_corner_radius,
        presenting_corner_radius,
        presenting_scale: presenting_scale(inputs),
        drag_indicator_offset: drag_indicator_offset(inputs),
        close_button_frame: close_button_frame(inputs),
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::config::DragIndicator;
    use puller_core::Color;

    const SCREEN_W: f32 = 390.0;
    const SCREEN_H: f32 = 844.0;

    fn screen() -> ScreenInfo {
        ScreenInfo {
            width: SCREEN_W,
            height: SCREEN_H,
            safe_top: 47.0,
            safe_bottom: 34.0,
            display_corner_radius: 47.0,
            idiom: DeviceIdiom::Phone,
        }
    }

    fn inputs<'a>(config: &'a SheetConfig, detents: &'a DetentList, y: f32) -> VisualInputs<'a> {
        VisualInputs {
            screen: screen(),
            config,
            detents,
            dimmed_detent: detents.first().unwrap_or(Detent::Full),
            selected: detents.first().unwrap_or(Detent::Full),
            axis: DragAxis::Vertical,
            sheet_y: y,
            sheet_x: 0.0,
            sheet_width: SCREEN_W,
            presenting_frame: Rect::new(0.0, 0.0, SCREEN_W, SCREEN_H),
        }
    }

    #[test]
    fn test_dimming_alpha_monotonic_and_clamped() {
        let config = SheetConfig::new(&[Detent::Medium, Detent::Large]);
        let detents = config.detents().clone();

        let undimmed_y = Detent::ZERO.position(SCREEN_H);
        let dimmed_y = Detent::Medium.position(SCREEN_H);

        // Zero at and below the largest undimmed position
        let at_bottom = compute(&inputs(&config, &detents, undimmed_y));
        assert_eq!(at_bottom.dimming_alpha, 0.0);

        // Monotonically non-decreasing while rising toward the dimmed detent
        let mut prev = -1.0;
        let mut y = undimmed_y;
        while y >= dimmed_y {
            let alpha = compute(&inputs(&config, &detents, y)).dimming_alpha;
            assert!(alpha >= prev);
            assert!(alpha <= config.dimmed_alpha + 1e-6);
            prev = alpha;
            y -= 20.0;
        }

        // Saturated at and above the dimmed detent
        let at_dimmed = compute(&inputs(&config, &detents, dimmed_y));
        assert!((at_dimmed.dimming_alpha - config.dimmed_alpha).abs() < 1e-6);
        let above = compute(&inputs(&config, &detents, dimmed_y - 100.0));
        assert!((above.dimming_alpha - config.dimmed_alpha).abs() < 1e-6);
    }

    #[test]
    fn test_dimming_respects_largest_undimmed_detent() {
        let config = SheetConfig::new(&[Detent::Medium, Detent::Large])
            .with_largest_undimmed_detent(Detent::Medium);
        let detents = config.detents().clone();
        let mut input = inputs(&config, &detents, Detent::Medium.position(SCREEN_H));
        // The dimmed detent is the first detent above the undimmed one
        input.dimmed_detent = Detent::Large;

        assert_eq!(compute(&input).dimming_alpha, 0.0);

        input.sheet_y = Detent::Large.position(SCREEN_H);
        let at_large = compute(&input).dimming_alpha;
        assert!((at_large - config.dimmed_alpha).abs() < 1e-6);
    }

    #[test]
    fn test_compute_is_idempotent() {
        let config = SheetConfig::new(&[Detent::Medium, Detent::Full]);
        let detents = config.detents().clone();
        let input = inputs(&config, &detents, 300.0);
        assert_eq!(compute(&input), compute(&input));
    }

    #[test]
    fn test_corner_radius_ramps_between_last_two_detents() {
        let config = SheetConfig::new(&[Detent::Medium, Detent::Full]);
        let detents = config.detents().clone();

        // At the second-to-last detent the sheet keeps its configured radius
        let collapsed = compute(&inputs(&config, &detents, Detent::Medium.position(SCREEN_H)));
        assert!((collapsed.sheet_corner_radius - config.corner_radius).abs() < 1e-3);

        // At the full detent the sheet meets the display's own radius
        let expanded = compute(&inputs(&config, &detents, Detent::Full.position(SCREEN_H)));
        assert!((expanded.sheet_corner_radius - screen().display_corner_radius).abs() < 1e-3);

        // The presenting surface mirrors the interpolation
        let mid_y = (Detent::Medium.position(SCREEN_H) + Detent::Full.position(SCREEN_H)) / 2.0;
        let mid = compute(&inputs(&config, &detents, mid_y));
        let sum = config.corner_radius + screen().display_corner_radius;
        assert!((mid.sheet_corner_radius + mid.presenting_corner_radius.unwrap() - sum).abs() < 1e-3);
    }

    #[test]
    fn test_dialog_holds_constant_visuals() {
        let config = SheetConfig::new(&[Detent::Medium]).dialog();
        let detents = config.detents().clone();

        let low = compute(&inputs(&config, &detents, 600.0));
        let high = compute(&inputs(&config, &detents, 200.0));
        assert_eq!(low.sheet_corner_radius, high.sheet_corner_radius);
        assert_eq!(low.sheet_corner_radius, screen().display_corner_radius);
        assert_eq!(low.presenting_scale, 1.0);
        assert_eq!(high.presenting_scale, 1.0);
    }

    #[test]
    fn test_presenting_scale_gate() {
        // Expanded last detent on a portrait phone scales the background
        let config = SheetConfig::new(&[Detent::Medium, Detent::Large]);
        let detents = config.detents().clone();
        let expanded = compute(&inputs(&config, &detents, Detent::Large.position(SCREEN_H)));
        assert!((expanded.presenting_scale - MIN_BACKGROUND_SCALE).abs() < 1e-3);

        let collapsed = compute(&inputs(&config, &detents, Detent::Medium.position(SCREEN_H)));
        assert!((collapsed.presenting_scale - 1.0).abs() < 1e-3);

        // A non-expanded last detent never scales
        let config = SheetConfig::new(&[Detent::Fraction(0.3), Detent::Medium]);
        let detents = config.detents().clone();
        let top = compute(&inputs(&config, &detents, Detent::Medium.position(SCREEN_H)));
        assert_eq!(top.presenting_scale, 1.0);
    }

    #[test]
    fn test_presenting_scale_requires_phone() {
        let config = SheetConfig::new(&[Detent::Medium, Detent::Large]);
        let detents = config.detents().clone();
        let mut input = inputs(&config, &detents, Detent::Large.position(SCREEN_H));
        input.screen.idiom = DeviceIdiom::Tablet;
        assert_eq!(compute(&input).presenting_scale, 1.0);
    }

    #[test]
    fn test_drag_indicator_hidden_without_style() {
        let config = SheetConfig::new(&[Detent::Medium]);
        let detents = config.detents().clone();
        assert_eq!(
            compute(&inputs(&config, &detents, 400.0)).drag_indicator_offset,
            None
        );
    }

    #[test]
    fn test_drag_indicator_inside_offset() {
        let config = SheetConfig::new(&[Detent::Medium])
            .with_drag_indicator(DragIndicator::Inside(Color::WHITE));
        let detents = config.detents().clone();
        assert_eq!(
            compute(&inputs(&config, &detents, 400.0)).drag_indicator_offset,
            Some(DRAG_INDICATOR_HEIGHT)
        );

        let outside = SheetConfig::new(&[Detent::Medium])
            .with_drag_indicator(DragIndicator::Outside(Color::WHITE));
        assert_eq!(
            compute(&inputs(&outside, &detents, 400.0)).drag_indicator_offset,
            Some(-2.0 * DRAG_INDICATOR_HEIGHT)
        );
    }

    #[test]
    fn test_drag_indicator_meets_safe_area_at_full() {
        let config = SheetConfig::new(&[Detent::Medium, Detent::Full])
            .with_drag_indicator(DragIndicator::Inside(Color::WHITE));
        let detents = config.detents().clone();
        let at_full = compute(&inputs(&config, &detents, 0.0));
        assert_eq!(at_full.drag_indicator_offset, Some(screen().safe_top));
    }

    #[test]
    fn test_close_button_frame() {
        let config = SheetConfig::new(&[Detent::Medium]);
        let detents = config.detents().clone();
        let out = compute(&inputs(&config, &detents, 400.0));
        let frame = out.close_button_frame.expect("close button enabled");
        assert_eq!(frame.y(), 12.0);
        assert_eq!(frame.width(), CLOSE_BUTTON_SIZE);
        assert_eq!(
            frame.x(),
            SCREEN_W - CLOSE_BUTTON_SIZE - 15.0
        );

        let hidden = SheetConfig::new(&[Detent::Medium]).with_close_button(false);
        assert_eq!(
            compute(&inputs(&hidden, &detents, 400.0)).close_button_frame,
            None
        );
    }
}
