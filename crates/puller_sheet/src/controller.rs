//! Sheet controller
//!
//! Single source of truth for one presented sheet: which detent is
//! selected, where the sheet is in pixels, which gesture owns it, and
//! what the keyboard and rotations have done to the detent set.
//!
//! Methods mutate state and surface writes directly but never call the
//! animation driver, haptics, host hooks, or observers themselves - those
//! are returned as [`Effect`]s and executed by the [`Sheet`](crate::Sheet)
//! facade after the controller lock is released. That keeps every
//! re-entrant path (synchronous drivers, observers calling back in) safe.

use std::sync::Arc;

use puller_animation::{AnimationId, AnimationOutcome, AnimationStrategy};
use puller_core::{advance, Point, Rect, Size, Transform2D};
use puller_platform::{
    is_at_top, DeviceIdiom, ImpactStyle, KeyboardEvent, KeyboardTransition, PanEvent,
    RenderSurface, ScreenMetrics, ScrollSurface, Shadow,
};
use tracing::{debug, warn};

use crate::config::SheetConfig;
use crate::detent::{Detent, DetentList};
use crate::gesture::{
    rest_offset, resolve_vertical, rubber_band, DragSession, VerticalBounds, VerticalMove,
    DIALOG_BOUNCE_EXPONENT, DYNAMIC_BOUNCE_EXPONENT,
};
use crate::keyboard::{keyboard_strategy, plan_show};
use crate::state::{sheet_events, DragAxis, GestureSource, MoveDirection, SheetState};
use crate::visuals::{self, ScreenInfo, VisualInputs, DRAG_INDICATOR_HEIGHT, DRAG_INDICATOR_WIDTH};

/// Compact tablet sheet width
const COMPACT_TABLET_WIDTH: f32 = 468.0;

/// The render surfaces one presentation writes to
#[derive(Clone)]
pub struct SheetSurfaces {
    /// The sheet itself
    pub sheet: Arc<dyn RenderSurface>,
    /// The presenting view behind the sheet (scale and corner radius)
    pub presenting: Arc<dyn RenderSurface>,
    /// The dimming backdrop (opacity)
    pub dimming: Arc<dyn RenderSurface>,
    /// The drop shadow mirroring the sheet
    pub shadow: Arc<dyn RenderSurface>,
    /// Optional drag indicator
    pub drag_indicator: Option<Arc<dyn RenderSurface>>,
    /// Optional circular close button
    pub close_button: Option<Arc<dyn RenderSurface>>,
}

/// Side effects a controller method requests from the facade
///
/// Animation effects carry their interpolation endpoints; notification
/// effects fire observers or host hooks. Effects are executed in order.
#[derive(Clone, Debug)]
pub(crate) enum Effect {
    CancelAnimation(AnimationId),
    Settle {
        from_y: f32,
        to_y: f32,
        strategy: AnimationStrategy,
        detent: Detent,
        notify_changed: bool,
    },
    Open {
        from_y: f32,
        to_y: f32,
        strategy: AnimationStrategy,
        detent: Detent,
    },
    KeyboardMove {
        from_y: f32,
        to_y: f32,
        strategy: AnimationStrategy,
    },
    RotationAdjust {
        from_y: f32,
        to_y: f32,
        strategy: AnimationStrategy,
    },
    SnapHorizontal {
        from_x: f32,
        to_x: f32,
        strategy: AnimationStrategy,
    },
    DismissVertical {
        from_y: f32,
        to_y: f32,
        strategy: AnimationStrategy,
    },
    DismissHorizontal {
        from_x: f32,
        to_x: f32,
        strategy: AnimationStrategy,
    },
    NotifyDidPresent(Detent),
    NotifyWillDismiss,
    NotifyDidDismiss,
    NotifyDetentChanged(Detent),
    ResignFocus,
    Haptic(ImpactStyle),
    EmbedInScroll {
        content_height: f32,
    },
}

/// Which completion handler an animation resolves to
#[derive(Clone, Copy, Debug)]
pub(crate) enum DoneKind {
    Settle { detent: Detent, notify: bool },
    Open { detent: Detent },
    Keyboard,
    Rotation,
    HorizontalSnap,
    Dismiss,
}

/// Animation channel; vertical and horizontal are mutually exclusive
#[derive(Clone, Copy, Debug, PartialEq, Eq)]
pub(crate) enum Channel {
    Vertical,
    Horizontal,
}

/// Runtime state of one active presentation
pub struct SheetController {
    config: SheetConfig,
    surfaces: SheetSurfaces,
    scroll: Option<Arc<dyn ScrollSurface>>,

    screen_width: f32,
    screen_height: f32,
    safe_top: f32,
    safe_bottom: f32,
    display_corner_radius: f32,
    idiom: DeviceIdiom,

    standard_detents: DetentList,
    keyboard_detents: DetentList,
    dimmed_detent: Detent,
    selected: Detent,
    previous_detent: Detent,

    state: SheetState,
    axis: DragAxis,
    drag: Option<DragSession>,

    keyboard_visible: bool,
    last_keyboard: Option<KeyboardTransition>,
    rotating: bool,

    vertical_animating: bool,
    horizontal_animating: bool,
    vertical_animation: Option<AnimationId>,
    horizontal_animation: Option<AnimationId>,

    min_height: f32,
    current_height: f32,
    default_height: f32,
    content_height: f32,
    is_fit_content: bool,

    scroll_base_bottom_inset: f32,
    scroll_horizontal_offset: Point,
    programmatic_scroll: bool,

    presenting_corner_radius: f32,
}

impl SheetController {
    pub(crate) fn new(
        config: SheetConfig,
        screen: &dyn ScreenMetrics,
        surfaces: SheetSurfaces,
    ) -> Self {
        let size = screen.size();
        let safe = screen.safe_area();
        let presenting_corner_radius = surfaces.presenting.corner_radius();

        let mut controller = Self {
            standard_detents: DetentList::default(),
            keyboard_detents: DetentList::default(),
            dimmed_detent: Detent::Full,
            selected: Detent::ZERO,
            previous_detent: Detent::ZERO,
            state: SheetState::Idle,
            axis: DragAxis::Vertical,
            drag: None,
            keyboard_visible: false,
            last_keyboard: None,
            rotating: false,
            vertical_animating: false,
            horizontal_animating: false,
            vertical_animation: None,
            horizontal_animation: None,
            min_height: 0.0,
            current_height: 0.0,
            default_height: 0.0,
            content_height: 0.0,
            is_fit_content: false,
            scroll_base_bottom_inset: 0.0,
            scroll_horizontal_offset: Point::ZERO,
            programmatic_scroll: false,
            presenting_corner_radius,
            screen_width: size.width,
            screen_height: size.height,
            safe_top: safe.top,
            safe_bottom: safe.bottom,
            display_corner_radius: screen.display_corner_radius(),
            idiom: screen.idiom(),
            scroll: None,
            config,
            surfaces,
        };
        controller.setup();
        controller
    }

    /// Re-derive everything the config determines
    fn setup(&mut self) {
        self.standard_detents = self.config.detents().clone();
        self.dimmed_detent = self
            .standard_detents
            .iter()
            .find(|d| d.value() > self.config.largest_undimmed_detent.value())
            .unwrap_or(Detent::Full);
    }

    // =========================================================================
    // Queries
    // =========================================================================

    pub fn selected_detent(&self) -> Detent {
        self.selected
    }

    pub fn state(&self) -> SheetState {
        self.state
    }

    pub fn is_programmatic_scroll(&self) -> bool {
        self.programmatic_scroll
    }

    pub(crate) fn active_detents(&self) -> &DetentList {
        if self.keyboard_visible {
            &self.keyboard_detents
        } else {
            &self.standard_detents
        }
    }

    fn position_of(&self, detent: Detent) -> f32 {
        detent.position(self.screen_height)
    }

    fn sheet_width(&self) -> f32 {
        if self.idiom == DeviceIdiom::Tablet && self.config.compact_tablet_width {
            COMPACT_TABLET_WIDTH
        } else {
            self.screen_width.min(self.screen_height)
        }
    }

    /// Horizontal placement: x origin, width, and dialog inset
    fn body(&self) -> (f32, f32, f32) {
        let inset = self.config.inset();
        let x = (self.screen_width - self.sheet_width()) / 2.0;
        (x + inset, self.sheet_width() - inset * 2.0, inset)
    }

    fn resting_x(&self) -> f32 {
        self.body().0
    }

    pub(crate) fn effective_y(&self) -> f32 {
        let frame = self.surfaces.sheet.frame();
        frame.y() + self.surfaces.sheet.transform().ty
    }

    pub(crate) fn effective_x(&self) -> f32 {
        let frame = self.surfaces.sheet.frame();
        frame.x() + self.surfaces.sheet.transform().tx
    }

    fn is_scroll_at_top(&self) -> bool {
        self.scroll.as_deref().map(is_at_top).unwrap_or(true)
    }

    /// Euclidean nearest detent to a pixel y
    ///
    /// The synthetic zero detent participates unless the sheet is
    /// modal-locked. Ties keep the earliest candidate.
    pub(crate) fn nearest_detent(&self, y: f32) -> Detent {
        let mut closest = Detent::Full;
        let mut minimum = f32::INFINITY;
        let zero = (!self.config.modal_locked).then_some(Detent::ZERO);
        for detent in zero.into_iter().chain(self.active_detents().iter()) {
            let distance = (y - self.position_of(detent)).abs();
            if distance < minimum {
                closest = detent;
                minimum = distance;
            }
        }
        closest
    }

    // =========================================================================
    // Layout and visuals
    // =========================================================================

    /// Frame for a given top edge, growing dynamic sheets to fill the
    /// space below
    fn layout_frame(&mut self, y: f32) -> Rect {
        let (x, width, inset) = self.body();
        if self.config.dynamic_height {
            self.current_height = (self.screen_height - y).max(self.min_height);
        }
        let height = if self.config.dynamic_height {
            self.current_height
        } else {
            self.current_height - inset
        };
        Rect::new(x, y, width, height)
    }

    /// Move the sheet's top edge and recompute everything derived from it
    pub(crate) fn apply_offset(&mut self, y: f32) {
        let frame = self.layout_frame(y);
        self.surfaces.sheet.set_frame(frame);
        self.refresh_visuals();
    }

    /// Horizontal placement during swipe-to-dismiss animations
    pub(crate) fn apply_horizontal(&mut self, x: f32) {
        let frame = self.surfaces.sheet.frame().with_x(x);
        self.surfaces.sheet.set_transform(Transform2D::IDENTITY);
        self.surfaces.sheet.set_frame(frame);
        self.refresh_visuals();
    }

    /// Recompute derived visuals for the current offset
    ///
    /// Idempotent: no integration state, safe to call any number of times.
    pub(crate) fn refresh_visuals(&mut self) {
        let frame = self.surfaces.sheet.frame();
        let inputs = VisualInputs {
            screen: ScreenInfo {
                width: self.screen_width,
                height: self.screen_height,
                safe_top: self.safe_top,
                safe_bottom: self.safe_bottom,
                display_corner_radius: self.display_corner_radius,
                idiom: self.idiom,
            },
            config: &self.config,
            detents: self.active_detents(),
            dimmed_detent: self.dimmed_detent,
            selected: self.selected,
            axis: self.axis,
            sheet_y: self.effective_y(),
            sheet_x: self.effective_x(),
            sheet_width: frame.width(),
            presenting_frame: self.surfaces.presenting.frame(),
        };
        let outputs = visuals::compute(&inputs);

        self.surfaces.dimming.set_opacity(outputs.dimming_alpha);
        self.surfaces
            .sheet
            .set_corner_radius(outputs.sheet_corner_radius);

        self.surfaces.shadow.set_frame(frame);
        self.surfaces
            .shadow
            .set_corner_radius(outputs.sheet_corner_radius);

        if let Some(radius) = outputs.presenting_corner_radius {
            self.surfaces.presenting.set_corner_radius(radius);
        }
        self.surfaces
            .presenting
            .set_transform(Transform2D::scale(outputs.presenting_scale));

        if let Some(indicator) = &self.surfaces.drag_indicator {
            match outputs.drag_indicator_offset {
                Some(offset) => {
                    let x = frame.x() + (frame.width() - DRAG_INDICATOR_WIDTH) / 2.0;
                    indicator.set_opacity(1.0);
                    indicator.set_frame(Rect::new(
                        x,
                        self.effective_y() + offset,
                        DRAG_INDICATOR_WIDTH,
                        DRAG_INDICATOR_HEIGHT,
                    ));
                }
                None => indicator.set_opacity(0.0),
            }
        }

        if let Some(close) = &self.surfaces.close_button {
            match outputs.close_button_frame {
                Some(local) => {
                    close.set_opacity(1.0);
                    close.set_frame(Rect::new(
                        frame.x() + local.x(),
                        self.effective_y() + local.y(),
                        local.width(),
                        local.height(),
                    ));
                }
                None => close.set_opacity(0.0),
            }
        }
    }

    // =========================================================================
    // Detent selection and configuration
    // =========================================================================

    /// Jump to a detent without animating
    ///
    /// Ignored unless `detent` is the synthetic zero or a member of the
    /// active set, which defends against stale references after a config
    /// swap.
    pub(crate) fn select(&mut self, detent: Detent) {
        if !detent.is_zero() && !self.active_detents().contains(detent) {
            warn!(?detent, "ignoring detent not in the active set");
            return;
        }
        self.surfaces.sheet.set_transform(Transform2D::IDENTITY);
        let y = self.position_of(detent);
        self.apply_offset(y);
        self.selected = detent;
        debug!(?detent, y, "detent selected");
    }

    /// Hot-swap the configuration, re-deriving layout and visuals
    pub(crate) fn apply_config(&mut self, config: SheetConfig) {
        self.config = config;
        self.setup();
        self.refresh_visuals();
    }

    /// Replace only the detent list
    pub(crate) fn apply_detents(&mut self, detents: &[Detent]) {
        self.config.set_detents(detents);
        self.setup();
    }

    pub(crate) fn attach_scroll(&mut self, scroll: Arc<dyn ScrollSurface>) {
        self.scroll_base_bottom_inset = scroll.content_inset().bottom;
        if self.is_fit_content && self.content_height > 0.0 {
            scroll.set_content_height(self.content_height);
        }
        self.scroll = Some(scroll);
    }

    fn pin_scroll_to_top(&mut self) {
        if let Some(scroll) = &self.scroll {
            self.programmatic_scroll = true;
            let offset = scroll.content_offset();
            scroll.set_content_offset(Point::new(offset.x, -scroll.content_inset().top));
            self.programmatic_scroll = false;
        }
    }

    // =========================================================================
    // Presentation open
    // =========================================================================

    /// Resolve detents, pre-select the first one, and position the sheet
    /// off-screen ready for the opening animation
    pub(crate) fn prepare_present(&mut self, intrinsic_height: Option<f32>) -> Vec<Effect> {
        let mut effects = Vec::new();

        let first = self.standard_detents.first().unwrap_or(Detent::FitsContent);
        let resolved = if first.is_fits_content() {
            self.is_fit_content = true;
            match intrinsic_height {
                Some(height) => {
                    self.content_height = height;
                    let detent =
                        resolve_fits_content(height + self.safe_bottom, self.screen_height);
                    self.apply_detents(&[detent]);
                    detent
                }
                None => {
                    warn!("fits-content detent without intrinsic height, falling back to Large");
                    self.apply_detents(&[Detent::Large]);
                    Detent::Large
                }
            }
        } else {
            first
        };

        let height = resolved.height(self.screen_height);
        self.current_height = height;
        self.min_height = height;
        self.default_height = height;
        self.selected = resolved;
        self.previous_detent = resolved;

        self.surfaces.sheet.set_transform(Transform2D::IDENTITY);
        self.surfaces.shadow.set_shadow(Shadow::default());
        let frame = self.layout_frame(self.screen_height);
        self.surfaces.sheet.set_frame(frame);
        self.refresh_visuals();

        if self.config.modal_locked {
            effects.push(Effect::Haptic(ImpactStyle::Light));
        }
        self.vertical_animating = true;
        effects.push(Effect::Open {
            from_y: self.screen_height,
            to_y: self.position_of(resolved),
            strategy: self.config.animation,
            detent: resolved,
        });
        if self.is_fit_content
            && self.config.embed_in_scroll
            && self.content_height > self.default_height
        {
            effects.push(Effect::EmbedInScroll {
                content_height: self.content_height,
            });
        }
        debug!(?resolved, "presentation prepared");
        effects
    }

    // =========================================================================
    // Pan gesture handling
    // =========================================================================

    pub(crate) fn handle_pan(&mut self, event: PanEvent) -> Vec<Effect> {
        use puller_platform::PanPhase;

        match event.phase {
            PanPhase::Began => self.begin_pan(&event),
            PanPhase::Changed => {
                let valid = self.drag.as_ref().map(|s| s.valid).unwrap_or(false);
                if !valid {
                    if let Some(session) = self.drag.as_mut() {
                        session.rebaseline(event.translation);
                    }
                    return Vec::new();
                }
                match self.drag.as_ref().map(|s| s.axis) {
                    Some(DragAxis::Horizontal) => self.horizontal_changed(&event),
                    Some(DragAxis::Vertical) => self.vertical_changed(&event),
                    None => {}
                }
                Vec::new()
            }
            PanPhase::Ended | PanPhase::Cancelled => {
                let valid = self.drag.as_ref().map(|s| s.valid).unwrap_or(false);
                if !valid {
                    self.drag = None;
                    return Vec::new();
                }
                match self.drag.as_ref().map(|s| s.axis) {
                    Some(DragAxis::Horizontal) => self.end_horizontal(&event),
                    Some(DragAxis::Vertical) => self.end_vertical(&event),
                    None => Vec::new(),
                }
            }
        }
    }

    fn begin_pan(&mut self, event: &PanEvent) -> Vec<Effect> {
        let mut effects = Vec::new();

        let direction = MoveDirection::from_velocity(event.velocity.y);
        let source = match &self.scroll {
            Some(scroll) if scroll.frame().contains(event.location) || scroll.is_dragging() => {
                GestureSource::Scroll
            }
            _ => GestureSource::View,
        };
        let scroll_at_top = self.is_scroll_at_top();
        let has_refresh = self
            .scroll
            .as_ref()
            .map(|s| s.has_refresh_control())
            .unwrap_or(false);

        let needs_moving = match source {
            GestureSource::View => true,
            GestureSource::Scroll => match direction {
                MoveDirection::Up => {
                    self.config.scrolling_expands_when_scrolled_to_edge && scroll_at_top
                }
                MoveDirection::Down => scroll_at_top && !has_refresh,
            },
        };

        let mut session = DragSession {
            axis: DragAxis::Vertical,
            source,
            direction,
            begin_detent: self.nearest_detent(self.effective_y()),
            track_y: self.effective_y(),
            track_x: 0.0,
            baseline: event.translation,
            last_transform: self.surfaces.sheet.transform(),
            needs_moving,
            scroll_at_top_at_begin: scroll_at_top,
            valid: !self.state.is_dismissing(),
        };

        let horizontal_eligible = self.idiom == DeviceIdiom::Phone
            && self.config.dynamic_height
            && self.config.horizontal_dismiss;
        if session.valid && horizontal_eligible {
            let horizontal = event.velocity.x.abs() > event.velocity.y.abs();
            if (self.horizontal_animating && !horizontal)
                || (self.vertical_animating && horizontal)
            {
                debug!(horizontal, "gesture conflicts with in-flight animation");
                session.valid = false;
            } else {
                let axis = if horizontal {
                    DragAxis::Horizontal
                } else {
                    DragAxis::Vertical
                };
                session.axis = axis;
                self.axis = axis;
                if let Some(scroll) = &self.scroll {
                    self.scroll_horizontal_offset = scroll.content_offset();
                }
            }
        } else if session.valid {
            self.axis = DragAxis::Vertical;
        }

        if session.valid {
            // A fresh touch supersedes any same-axis animation in flight
            match session.axis {
                DragAxis::Vertical => {
                    if let Some(id) = self.vertical_animation.take() {
                        self.vertical_animating = false;
                        effects.push(Effect::CancelAnimation(id));
                    }
                }
                DragAxis::Horizontal => {
                    if let Some(id) = self.horizontal_animation.take() {
                        self.horizontal_animating = false;
                        effects.push(Effect::CancelAnimation(id));
                    }
                }
            }
            advance(&mut self.state, sheet_events::DRAG_BEGAN);
        }
        self.drag = Some(session);
        effects
    }

    fn vertical_changed(&mut self, event: &PanEvent) {
        let Some(mut session) = self.drag.take() else {
            return;
        };

        session.direction = MoveDirection::from_velocity(event.velocity.y);

        let (Some(first), Some(last)) = (self.active_detents().first(), self.active_detents().last())
        else {
            self.drag = Some(session);
            return;
        };

        let at_top = self.is_scroll_at_top();
        let has_refresh = self
            .scroll
            .as_ref()
            .map(|s| s.has_refresh_control())
            .unwrap_or(false);

        // A scroll-sourced downward drag reaching the top edge hands the
        // movement to the sheet mid-gesture
        if session.source == GestureSource::Scroll
            && session.direction == MoveDirection::Down
            && session.scroll_at_top_at_begin
            && at_top
            && !session.needs_moving
            && !has_refresh
        {
            session.begin_detent = self.nearest_detent(self.effective_y());
            session.track_y = self.effective_y();
            session.needs_moving = true;
            session.rebaseline(event.translation);
            self.drag = Some(session);
            return;
        }

        let delta = session.delta(event.translation);
        session.track_y += delta.y;

        if !session.needs_moving {
            self.drag = Some(session);
            return;
        }

        if session.source == GestureSource::Scroll {
            self.pin_scroll_to_top();
        }

        let bounds = VerticalBounds {
            first_y: self.position_of(first),
            last_y: self.position_of(last),
            modal_locked: self.config.modal_locked,
            exponent: if self.config.dynamic_height {
                DYNAMIC_BOUNCE_EXPONENT
            } else {
                DIALOG_BOUNCE_EXPONENT
            },
        };

        match resolve_vertical(session.track_y, session.source, session.direction, bounds) {
            VerticalMove::Track(y) => {
                self.apply_offset(y);
            }
            VerticalMove::HandOff(y) => {
                self.apply_offset(y);
                session.track_y = y;
                session.needs_moving = false;
            }
        }
        session.rebaseline(event.translation);
        self.drag = Some(session);
    }

    fn end_vertical(&mut self, event: &PanEvent) -> Vec<Effect> {
        let Some(session) = self.drag.take() else {
            return Vec::new();
        };
        let mut effects = Vec::new();

        if !session.needs_moving {
            advance(&mut self.state, sheet_events::DRAG_ENDED);
            advance(&mut self.state, sheet_events::SETTLED);
            return effects;
        }

        let rest = rest_offset(
            self.effective_y(),
            event.velocity.y,
            self.config.deceleration_rate,
        );
        let closest = self.nearest_detent(rest);
        debug!(rest, ?closest, "vertical gesture released");

        if session.begin_detent.value() > closest.value() {
            effects.push(Effect::ResignFocus);
        }

        if !self.config.modal_locked && closest.is_zero() {
            effects.extend(self.begin_vertical_dismiss());
            return effects;
        }

        let changed = self.selected != closest;
        self.selected = closest;
        if self.standard_detents.contains(closest) {
            self.previous_detent = closest;
        }
        advance(&mut self.state, sheet_events::DRAG_ENDED);
        self.vertical_animating = true;
        effects.push(Effect::Settle {
            from_y: self.effective_y(),
            to_y: self.position_of(closest),
            strategy: self.config.animation,
            detent: closest,
            notify_changed: changed,
        });
        effects
    }

    fn horizontal_changed(&mut self, event: &PanEvent) {
        let Some(mut session) = self.drag.take() else {
            return;
        };

        let delta = session.delta(event.translation);
        session.track_x += delta.x;

        let bouncing = session.track_x < 0.0;
        if bouncing {
            let offset = rubber_band(session.track_x, DYNAMIC_BOUNCE_EXPONENT);
            self.surfaces
                .sheet
                .set_transform(session.last_transform.then_translate(offset, 0.0));
        } else {
            let transform = self
                .surfaces
                .sheet
                .transform()
                .then_translate(delta.x, 0.0);
            self.surfaces.sheet.set_transform(transform);
            session.last_transform = transform;
        }
        session.rebaseline(event.translation);
        self.refresh_visuals();
        self.drag = Some(session);
    }

    fn end_horizontal(&mut self, event: &PanEvent) -> Vec<Effect> {
        if self.drag.take().is_none() {
            return Vec::new();
        }
        let mut effects = Vec::new();

        let rest = rest_offset(
            self.effective_x(),
            event.velocity.x,
            self.config.deceleration_rate,
        );

        if let Some(scroll) = &self.scroll {
            self.programmatic_scroll = true;
            scroll.set_content_offset(self.scroll_horizontal_offset);
            self.programmatic_scroll = false;
        }

        if rest > self.screen_width / 2.0 {
            debug!(rest, "horizontal release dismisses");
            advance(&mut self.state, sheet_events::DISMISS);
            effects.push(Effect::NotifyWillDismiss);
            effects.push(Effect::DismissHorizontal {
                from_x: self.effective_x(),
                to_x: self.screen_width,
                strategy: self.config.animation,
            });
        } else {
            advance(&mut self.state, sheet_events::DRAG_ENDED);
            self.horizontal_animating = true;
            effects.push(Effect::SnapHorizontal {
                from_x: self.effective_x(),
                to_x: self.resting_x(),
                strategy: self.config.animation,
            });
        }
        effects
    }

    // =========================================================================
    // Dismissal
    // =========================================================================

    /// Begin the vertical dismissal sequence
    ///
    /// Rejected while a horizontal animation is in flight or a dismissal
    /// is already running.
    pub(crate) fn begin_vertical_dismiss(&mut self) -> Vec<Effect> {
        if self.horizontal_animating || self.state.is_dismissing() {
            return Vec::new();
        }
        let mut effects = Vec::new();
        if let Some(id) = self.vertical_animation.take() {
            self.vertical_animating = false;
            effects.push(Effect::CancelAnimation(id));
        }
        self.axis = DragAxis::Vertical;
        advance(&mut self.state, sheet_events::DISMISS);
        effects.push(Effect::NotifyWillDismiss);
        effects.push(Effect::DismissVertical {
            from_y: self.effective_y(),
            to_y: self.screen_height,
            strategy: self.config.animation,
        });
        effects
    }

    pub(crate) fn backdrop_tapped(&mut self) -> Vec<Effect> {
        if self.config.modal_locked {
            return Vec::new();
        }
        self.begin_vertical_dismiss()
    }

    // =========================================================================
    // Keyboard
    // =========================================================================

    pub(crate) fn handle_keyboard(&mut self, event: KeyboardEvent) -> Vec<Effect> {
        if self.state.is_dismissing() {
            return Vec::new();
        }
        match event {
            KeyboardEvent::WillShow(transition) => {
                self.last_keyboard = Some(transition);
                if self.rotating || self.keyboard_visible {
                    return Vec::new();
                }
                self.keyboard_show_effects(transition)
            }
            KeyboardEvent::DidShow(transition) => {
                if self.keyboard_visible {
                    if let Some(scroll) = &self.scroll {
                        scroll.set_bottom_inset(transition.target_height());
                    }
                }
                Vec::new()
            }
            KeyboardEvent::WillHide(_) => {
                if self.rotating || !self.keyboard_visible {
                    return Vec::new();
                }
                if let Some(scroll) = &self.scroll {
                    scroll.set_bottom_inset(self.scroll_base_bottom_inset);
                }
                self.keyboard_visible = false;
                let previous = self.previous_detent;
                self.current_height = previous.height(self.screen_height);
                self.select(previous);
                Vec::new()
            }
            KeyboardEvent::DidHide(_) => {
                self.last_keyboard = None;
                Vec::new()
            }
        }
    }

    fn keyboard_show_effects(&mut self, transition: KeyboardTransition) -> Vec<Effect> {
        let Some(plan) = plan_show(
            &self.config,
            &self.standard_detents,
            self.selected,
            self.screen_height,
            transition.target_height(),
        ) else {
            return Vec::new();
        };

        self.previous_detent = self.selected;
        self.keyboard_detents = plan.detents;
        self.keyboard_visible = true;
        self.current_height += plan.height_delta;

        let mut effects = Vec::new();
        if let Some(id) = self.vertical_animation.take() {
            self.vertical_animating = false;
            effects.push(Effect::CancelAnimation(id));
        }
        self.vertical_animating = true;
        effects.push(Effect::KeyboardMove {
            from_y: self.effective_y(),
            to_y: plan.target_y,
            strategy: keyboard_strategy(&transition),
        });
        debug!(target_y = plan.target_y, "keyboard show planned");
        effects
    }

    // =========================================================================
    // Rotation
    // =========================================================================

    /// React to the screen bounds changing (device rotation)
    ///
    /// Keyboard handling is suppressed until the transition settles; the
    /// sheet height is re-derived against the new bounds instead.
    pub(crate) fn set_screen_size(&mut self, size: Size) -> Vec<Effect> {
        if self.state.is_dismissing() {
            self.screen_width = size.width;
            self.screen_height = size.height;
            return Vec::new();
        }
        self.rotating = true;
        let Some(first) = self.active_detents().first() else {
            self.rotating = false;
            return Vec::new();
        };

        self.screen_width = size.width;
        self.screen_height = size.height;

        if self.is_fit_content {
            let detent = fits_content_capped_to_large(self.default_height, self.screen_height);
            self.apply_detents(&[detent]);
            self.min_height = detent.height(self.screen_height);
            if !self.selected.is_zero() {
                self.select(detent);
            }
        } else {
            self.min_height = first.height(self.screen_height);
        }

        let mut effects = Vec::new();
        if let Some(id) = self.vertical_animation.take() {
            self.vertical_animating = false;
            effects.push(Effect::CancelAnimation(id));
        }
        if self.keyboard_visible {
            // Hold position; the completion re-runs the keyboard layout
            let y = self.effective_y();
            self.vertical_animating = true;
            effects.push(Effect::RotationAdjust {
                from_y: y,
                to_y: y,
                strategy: self.config.animation,
            });
        } else {
            let target_height = self.selected.height(self.screen_height);
            let frame_height = self.surfaces.sheet.frame().height();
            if frame_height > target_height || self.current_height < target_height {
                self.current_height = target_height;
                self.vertical_animating = true;
                effects.push(Effect::RotationAdjust {
                    from_y: self.effective_y(),
                    to_y: self.screen_height - target_height,
                    strategy: self.config.animation,
                });
            } else {
                self.rotating = false;
            }
        }
        effects
    }

    // =========================================================================
    // Animation bookkeeping
    // =========================================================================

    /// Record the driver handle for a just-started animation
    ///
    /// Skipped when the matching flag has already been cleared, which
    /// happens when a synchronous driver completed before the handle was
    /// known.
    pub(crate) fn note_animation(&mut self, channel: Channel, id: AnimationId) {
        match channel {
            Channel::Vertical if self.vertical_animating => {
                self.vertical_animation = Some(id);
            }
            Channel::Horizontal if self.horizontal_animating => {
                self.horizontal_animation = Some(id);
            }
            _ => {}
        }
    }

    /// Completion handler for every animation the facade starts
    pub(crate) fn finish_animation(
        &mut self,
        kind: DoneKind,
        outcome: AnimationOutcome,
    ) -> Vec<Effect> {
        match kind {
            DoneKind::Settle { detent, notify } => {
                self.vertical_animating = false;
                self.vertical_animation = None;
                if outcome == AnimationOutcome::Finished {
                    advance(&mut self.state, sheet_events::SETTLED);
                    if notify {
                        return vec![Effect::NotifyDetentChanged(detent)];
                    }
                }
                Vec::new()
            }
            DoneKind::Open { detent } => {
                self.vertical_animating = false;
                self.vertical_animation = None;
                if outcome == AnimationOutcome::Finished {
                    return vec![
                        Effect::NotifyDetentChanged(detent),
                        Effect::NotifyDidPresent(detent),
                    ];
                }
                Vec::new()
            }
            DoneKind::Keyboard => {
                self.vertical_animating = false;
                self.vertical_animation = None;
                Vec::new()
            }
            DoneKind::Rotation => {
                self.vertical_animating = false;
                self.vertical_animation = None;
                self.rotating = false;
                if outcome == AnimationOutcome::Finished && self.keyboard_visible {
                    if let Some(transition) = self.last_keyboard {
                        self.keyboard_visible = false;
                        return self.keyboard_show_effects(transition);
                    }
                }
                Vec::new()
            }
            DoneKind::HorizontalSnap => {
                self.horizontal_animating = false;
                self.horizontal_animation = None;
                if outcome == AnimationOutcome::Finished {
                    advance(&mut self.state, sheet_events::SETTLED);
                }
                Vec::new()
            }
            DoneKind::Dismiss => {
                if outcome == AnimationOutcome::Finished {
                    self.finish_dismiss()
                } else {
                    Vec::new()
                }
            }
        }
    }

    /// Tear down after the dismissal animation lands
    fn finish_dismiss(&mut self) -> Vec<Effect> {
        self.surfaces.presenting.set_transform(Transform2D::IDENTITY);
        self.surfaces
            .presenting
            .set_corner_radius(self.presenting_corner_radius);
        self.surfaces.dimming.set_opacity(0.0);
        self.selected = Detent::ZERO;
        debug!("dismissal completed");
        vec![Effect::NotifyDidDismiss]
    }

    /// Relayout to the selected detent, used by `animate_changes`
    pub(crate) fn relayout_effects(&mut self) -> Vec<Effect> {
        if self.state.is_dismissing() {
            return Vec::new();
        }
        let mut effects = Vec::new();
        if let Some(id) = self.vertical_animation.take() {
            self.vertical_animating = false;
            effects.push(Effect::CancelAnimation(id));
        }
        self.vertical_animating = true;
        effects.push(Effect::Settle {
            from_y: self.effective_y(),
            to_y: self.position_of(self.selected),
            strategy: self.config.animation,
            detent: self.selected,
            notify_changed: false,
        });
        effects
    }
}

/// Resolve a fits-content height into a concrete detent at presentation
///
/// Heights between the Large detent and the full screen snap to Large;
/// the fraction is rounded to two decimals so rotations reproduce it.
fn resolve_fits_content(height: f32, screen_height: f32) -> Detent {
    let large_height = Detent::Large.value() * screen_height;
    let mut height = height.min(screen_height);
    if height > large_height && height < screen_height {
        height = large_height;
    }
    let value = (100.0 * height / screen_height).round() / 100.0;
    Detent::from_value(value)
}

/// Re-derive a fits-content detent after rotation, capped at Large
fn fits_content_capped_to_large(height: f32, screen_height: f32) -> Detent {
    let large_height = Detent::Large.value() * screen_height;
    let height = height.min(large_height);
    let value = (100.0 * height / screen_height).round() / 100.0;
    Detent::from_value(value)
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_resolve_fits_content_snaps_between_large_and_full() {
        let screen_h = 844.0;
        let large_h = 0.92 * screen_h;

        // Strictly between Large and full screen snaps to Large
        let detent = resolve_fits_content(large_h + 10.0, screen_h);
        assert_eq!(detent, Detent::Large);

        // At or above the screen height resolves to Full
        assert_eq!(resolve_fits_content(screen_h, screen_h), Detent::Full);
        assert_eq!(resolve_fits_content(screen_h + 500.0, screen_h), Detent::Full);
    }

    #[test]
    fn test_resolve_fits_content_small_height() {
        let detent = resolve_fits_content(422.0, 844.0);
        assert_eq!(detent, Detent::Medium);

        let detent = resolve_fits_content(300.0, 844.0);
        assert!(matches!(detent, Detent::Fraction(_)));
        assert!((detent.value() - 0.36).abs() < 1e-6);
    }

    #[test]
    fn test_fits_content_capped_to_large() {
        let screen_h = 844.0;
        assert_eq!(
            fits_content_capped_to_large(2.0 * screen_h, screen_h),
            Detent::Large
        );
        assert_eq!(
            fits_content_capped_to_large(422.0, screen_h),
            Detent::Medium
        );
    }
}
