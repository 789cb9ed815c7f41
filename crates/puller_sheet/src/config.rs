//! Sheet configuration
//!
//! One immutable snapshot per presentation. Configs can be hot-swapped
//! while presented via `Sheet::apply_config`; the engine re-derives layout
//! and visuals without restarting the presentation.

use puller_animation::AnimationStrategy;
use puller_core::Color;

use crate::detent::{Detent, DetentList};

/// Drag indicator style
#[derive(Clone, Copy, Debug, PartialEq)]
pub enum DragIndicator {
    /// No indicator
    None,
    /// Indicator drawn inside the sheet's top edge
    Inside(Color),
    /// Indicator floating above the sheet's top edge
    Outside(Color),
}

impl DragIndicator {
    /// Whether the indicator sits inside the sheet; None when hidden
    pub fn is_inside(&self) -> Option<bool> {
        match self {
            DragIndicator::None => None,
            DragIndicator::Inside(_) => Some(true),
            DragIndicator::Outside(_) => Some(false),
        }
    }

    pub fn color(&self) -> Option<Color> {
        match self {
            DragIndicator::None => None,
            DragIndicator::Inside(color) | DragIndicator::Outside(color) => Some(*color),
        }
    }
}

/// Immutable per-presentation configuration
#[derive(Clone, Debug)]
pub struct SheetConfig {
    /// Timing used for every sheet movement
    pub animation: AnimationStrategy,
    /// Corner radius of the sheet when not expanded to the display edge
    pub corner_radius: f32,
    /// Drag indicator style
    pub drag_indicator: DragIndicator,
    /// Disables swipe and backdrop-tap dismissal
    pub modal_locked: bool,
    /// Largest detent at which the backdrop stays clear
    pub largest_undimmed_detent: Detent,
    /// Expand the sheet when an embedded scroll is pulled up at its top edge
    pub scrolling_expands_when_scrolled_to_edge: bool,
    /// Grow to the Large detent when the keyboard appears
    pub keyboard_expands: bool,
    /// Per-millisecond deceleration rate for the release solver
    pub deceleration_rate: f32,
    /// Maximum backdrop alpha
    pub dimmed_alpha: f32,
    /// Sheet height follows the drag offset; false gives a fixed-height
    /// dialog inset from the screen edges
    pub dynamic_height: bool,
    /// Show the circular close button
    pub circle_close_button: bool,
    /// Allow swipe-right dismissal (phones with dynamic height only)
    pub horizontal_dismiss: bool,
    /// Wrap oversized fits-content presentations in an internal scroll
    pub embed_in_scroll: bool,
    /// Use the compact 468pt sheet width on tablets
    pub compact_tablet_width: bool,

    detents: DetentList,
}

impl SheetConfig {
    pub fn new(detents: &[Detent]) -> Self {
        Self {
            animation: AnimationStrategy::standard(),
            corner_radius: 16.0,
            drag_indicator: DragIndicator::None,
            modal_locked: false,
            largest_undimmed_detent: Detent::ZERO,
            scrolling_expands_when_scrolled_to_edge: true,
            keyboard_expands: true,
            deceleration_rate: 0.99,
            dimmed_alpha: 0.4,
            dynamic_height: true,
            circle_close_button: true,
            horizontal_dismiss: true,
            embed_in_scroll: false,
            compact_tablet_width: true,
            detents: DetentList::normalized(detents),
        }
    }

    /// The normalized detent list
    pub fn detents(&self) -> &DetentList {
        &self.detents
    }

    /// Replace the detent list, re-normalizing
    pub fn set_detents(&mut self, detents: &[Detent]) {
        self.detents = DetentList::normalized(detents);
    }

    /// Horizontal inset of a fixed-height dialog sheet
    pub fn inset(&self) -> f32 {
        if self.dynamic_height {
            0.0
        } else {
            6.0
        }
    }

    pub fn with_animation(mut self, animation: AnimationStrategy) -> Self {
        self.animation = animation;
        self
    }

    pub fn with_corner_radius(mut self, radius: f32) -> Self {
        self.corner_radius = radius;
        self
    }

    pub fn with_drag_indicator(mut self, indicator: DragIndicator) -> Self {
        self.drag_indicator = indicator;
        self
    }

    pub fn modal(mut self, locked: bool) -> Self {
        self.modal_locked = locked;
        self
    }

    pub fn with_largest_undimmed_detent(mut self, detent: Detent) -> Self {
        self.largest_undimmed_detent = detent;
        self
    }

    pub fn with_keyboard_expands(mut self, expands: bool) -> Self {
        self.keyboard_expands = expands;
        self
    }

    pub fn with_scrolling_expands(mut self, expands: bool) -> Self {
        self.scrolling_expands_when_scrolled_to_edge = expands;
        self
    }

    pub fn with_deceleration_rate(mut self, rate: f32) -> Self {
        self.deceleration_rate = rate;
        self
    }

    pub fn with_dimmed_alpha(mut self, alpha: f32) -> Self {
        self.dimmed_alpha = alpha;
        self
    }

    pub fn dialog(mut self) -> Self {
        self.dynamic_height = false;
        self
    }

    pub fn with_horizontal_dismiss(mut self, enabled: bool) -> Self {
        self.horizontal_dismiss = enabled;
        self
    }

    pub fn with_close_button(mut self, enabled: bool) -> Self {
        self.circle_close_button = enabled;
        self
    }

    pub fn with_embed_in_scroll(mut self, enabled: bool) -> Self {
        self.embed_in_scroll = enabled;
        self
    }
}

/// Presentation lifecycle notifications
///
/// Registered on a sheet rather than carried inside the config so the
/// engine holds no ambient closures. Each method fires at most once per
/// logical event; `on_detent_changed` only when the resolved detent
/// differs from the previous selection.
pub trait SheetObserver: Send + Sync {
    /// The opening transition completed
    fn on_did_present(&self, detent: Detent) {
        let _ = detent;
    }

    /// The sheet settled on a different detent
    fn on_detent_changed(&self, detent: Detent) {
        let _ = detent;
    }

    /// The dismissal animation is about to start
    fn on_will_dismiss(&self) {}

    /// The dismissal animation completed
    fn on_did_dismiss(&self) {}
}
