//! Public sheet handle
//!
//! [`Sheet`] is the host-facing handle to one presentation. It wraps the
//! controller behind a mutex and executes the controller's requested
//! effects - animations, observer notifications, haptics, host hooks -
//! strictly after the controller lock is released. Synchronous animation
//! drivers and observers that call back into the sheet are therefore
//! safe.

use std::sync::{Arc, Mutex};

use puller_animation::{AnimationDriver, DoneFn, FrameFn};
use puller_core::{lerp, Size};
use puller_platform::{
    GeometryEvent, Haptics, KeyboardEvent, PanEvent, ScreenMetrics, ScrollSurface, SheetHost,
};

use crate::config::{SheetConfig, SheetObserver};
use crate::controller::{Channel, DoneKind, Effect, SheetController, SheetSurfaces};
use crate::detent::Detent;
use crate::state::SheetState;

pub(crate) struct SheetShared {
    controller: Mutex<SheetController>,
    observers: Mutex<Vec<Arc<dyn SheetObserver>>>,
    driver: Arc<dyn AnimationDriver>,
    haptics: Option<Arc<dyn Haptics>>,
    host: Option<Arc<dyn SheetHost>>,
}

/// Handle to one presented sheet
///
/// Cheap to clone; all clones address the same presentation.
#[derive(Clone)]
pub struct Sheet {
    shared: Arc<SheetShared>,
}

impl Sheet {
    /// Build a sheet over its surfaces, without starting the opening
    /// transition
    ///
    /// Most hosts go through [`SheetPresenter`](crate::SheetPresenter)
    /// instead, which also runs the open/close transitions and queues
    /// double presentations.
    pub fn new(
        config: SheetConfig,
        screen: &dyn ScreenMetrics,
        surfaces: SheetSurfaces,
        driver: Arc<dyn AnimationDriver>,
        haptics: Option<Arc<dyn Haptics>>,
        host: Option<Arc<dyn SheetHost>>,
    ) -> Self {
        let controller = SheetController::new(config, screen, surfaces);
        Self {
            shared: Arc::new(SheetShared {
                controller: Mutex::new(controller),
                observers: Mutex::new(Vec::new()),
                driver,
                haptics,
                host,
            }),
        }
    }

    /// Register a lifecycle observer
    pub fn add_observer(&self, observer: Arc<dyn SheetObserver>) {
        self.shared.observers.lock().unwrap().push(observer);
    }

    /// Attach the embedded scrollable content the sheet arbitrates with
    pub fn attach_scroll(&self, scroll: Arc<dyn ScrollSurface>) {
        self.shared.controller.lock().unwrap().attach_scroll(scroll);
    }

    // =========================================================================
    // State access
    // =========================================================================

    pub fn selected_detent(&self) -> Detent {
        self.shared.controller.lock().unwrap().selected_detent()
    }

    /// Programmatic detent selection; jumps without animating
    ///
    /// Ignored unless the detent is the synthetic zero or a member of the
    /// active set.
    pub fn set_selected_detent(&self, detent: Detent) {
        self.shared.controller.lock().unwrap().select(detent);
    }

    pub fn state(&self) -> SheetState {
        self.shared.controller.lock().unwrap().state()
    }

    /// The detent set currently in effect (keyboard-adjusted while the
    /// keyboard is visible)
    pub fn active_detents(&self) -> Vec<Detent> {
        self.shared
            .controller
            .lock()
            .unwrap()
            .active_detents()
            .iter()
            .collect()
    }

    /// Whether the engine is currently writing the scroll offset itself
    ///
    /// Hosts observing scroll offset changes use this to ignore the
    /// engine's own corrective writes.
    pub fn is_programmatic_scroll(&self) -> bool {
        self.shared
            .controller
            .lock()
            .unwrap()
            .is_programmatic_scroll()
    }

    // =========================================================================
    // Configuration
    // =========================================================================

    /// Hot-swap the configuration mid-presentation
    pub fn apply_config(&self, config: SheetConfig) {
        self.shared.controller.lock().unwrap().apply_config(config);
    }

    /// Replace the detent list mid-presentation
    pub fn apply_detents(&self, detents: &[Detent]) {
        let mut controller = self.shared.controller.lock().unwrap();
        controller.apply_detents(detents);
        controller.refresh_visuals();
    }

    /// Run a mutation inside the configured animation strategy and
    /// animate the resulting relayout
    pub fn animate_changes(&self, change: impl FnOnce()) {
        change();
        let effects = self.shared.controller.lock().unwrap().relayout_effects();
        self.run_effects(effects);
    }

    // =========================================================================
    // Input events
    // =========================================================================

    /// Feed one pan gesture update
    pub fn handle_pan(&self, event: PanEvent) {
        let effects = self.shared.controller.lock().unwrap().handle_pan(event);
        self.run_effects(effects);
    }

    /// Feed one keyboard lifecycle event
    pub fn handle_keyboard(&self, event: KeyboardEvent) {
        let effects = self.shared.controller.lock().unwrap().handle_keyboard(event);
        self.run_effects(effects);
    }

    /// A surface's geometry changed behind the engine's back
    pub fn on_geometry_changed(&self, _event: GeometryEvent) {
        self.shared.controller.lock().unwrap().refresh_visuals();
    }

    /// The screen bounds changed (device rotation)
    pub fn on_screen_size_changed(&self, size: Size) {
        let effects = self.shared.controller.lock().unwrap().set_screen_size(size);
        self.run_effects(effects);
    }

    /// The dimming backdrop was tapped
    pub fn on_backdrop_tapped(&self) {
        let effects = self.shared.controller.lock().unwrap().backdrop_tapped();
        self.run_effects(effects);
    }

    /// The circular close button was tapped
    pub fn on_close_button_tapped(&self) {
        self.dismiss();
    }

    /// Dismiss the sheet with the vertical transition
    pub fn dismiss(&self) {
        let effects = self
            .shared
            .controller
            .lock()
            .unwrap()
            .begin_vertical_dismiss();
        self.run_effects(effects);
    }

    /// Start the opening transition
    pub(crate) fn open(&self, intrinsic_height: Option<f32>) {
        let effects = self
            .shared
            .controller
            .lock()
            .unwrap()
            .prepare_present(intrinsic_height);
        self.run_effects(effects);
    }

    // =========================================================================
    // Effect execution
    // =========================================================================

    fn notify(&self, f: impl Fn(&dyn SheetObserver)) {
        let observers: Vec<Arc<dyn SheetObserver>> =
            self.shared.observers.lock().unwrap().clone();
        for observer in observers {
            f(observer.as_ref());
        }
    }

    fn run_effects(&self, effects: Vec<Effect>) {
        for effect in effects {
            match effect {
                Effect::CancelAnimation(id) => self.shared.driver.cancel(id),
                Effect::Settle {
                    from_y,
                    to_y,
                    strategy,
                    detent,
                    notify_changed,
                } => self.start_animation(
                    Channel::Vertical,
                    from_y,
                    to_y,
                    strategy,
                    DoneKind::Settle {
                        detent,
                        notify: notify_changed,
                    },
                ),
                Effect::Open {
                    from_y,
                    to_y,
                    strategy,
                    detent,
                } => self.start_animation(
                    Channel::Vertical,
                    from_y,
                    to_y,
                    strategy,
                    DoneKind::Open { detent },
                ),
                Effect::KeyboardMove {
                    from_y,
                    to_y,
                    strategy,
                } => self.start_animation(
                    Channel::Vertical,
                    from_y,
                    to_y,
                    strategy,
                    DoneKind::Keyboard,
                ),
                Effect::RotationAdjust {
                    from_y,
                    to_y,
                    strategy,
                } => self.start_animation(
                    Channel::Vertical,
                    from_y,
                    to_y,
                    strategy,
                    DoneKind::Rotation,
                ),
                Effect::SnapHorizontal {
                    from_x,
                    to_x,
                    strategy,
                } => self.start_animation(
                    Channel::Horizontal,
                    from_x,
                    to_x,
                    strategy,
                    DoneKind::HorizontalSnap,
                ),
                Effect::DismissVertical {
                    from_y,
                    to_y,
                    strategy,
                } => self.start_animation(
                    Channel::Vertical,
                    from_y,
                    to_y,
                    strategy,
                    DoneKind::Dismiss,
                ),
                Effect::DismissHorizontal {
                    from_x,
                    to_x,
                    strategy,
                } => self.start_animation(
                    Channel::Horizontal,
                    from_x,
                    to_x,
                    strategy,
                    DoneKind::Dismiss,
                ),
                Effect::NotifyDidPresent(detent) => {
                    self.notify(move |o| o.on_did_present(detent));
                }
                Effect::NotifyWillDismiss => self.notify(|o| o.on_will_dismiss()),
                Effect::NotifyDidDismiss => self.notify(|o| o.on_did_dismiss()),
                Effect::NotifyDetentChanged(detent) => {
                    self.notify(move |o| o.on_detent_changed(detent));
                }
                Effect::ResignFocus => {
                    if let Some(host) = &self.shared.host {
                        host.resign_focus();
                    }
                }
                Effect::Haptic(style) => {
                    if let Some(haptics) = &self.shared.haptics {
                        haptics.impact(style);
                    }
                }
                Effect::EmbedInScroll { content_height } => {
                    if let Some(host) = &self.shared.host {
                        host.embed_in_scroll(content_height);
                    }
                }
            }
        }
    }

    fn start_animation(&self, channel: Channel, from: f32, to: f32, strategy: puller_animation::AnimationStrategy, kind: DoneKind) {
        let weak = Arc::downgrade(&self.shared);
        let frame: FrameFn = Box::new(move |progress| {
            if let Some(shared) = weak.upgrade() {
                let mut controller = shared.controller.lock().unwrap();
                let value = lerp(from, to, progress);
                match channel {
                    Channel::Vertical => controller.apply_offset(value),
                    Channel::Horizontal => controller.apply_horizontal(value),
                }
            }
        });

        let weak = Arc::downgrade(&self.shared);
        let done: DoneFn = Box::new(move |outcome| {
            if let Some(shared) = weak.upgrade() {
                let effects = shared
                    .controller
                    .lock()
                    .unwrap()
                    .finish_animation(kind, outcome);
                Sheet { shared }.run_effects(effects);
            }
        });

        let id = self.shared.driver.animate(strategy, frame, done);
        self.shared
            .controller
            .lock()
            .unwrap()
            .note_animation(channel, id);
    }
}
