//! Presentation management
//!
//! The presenter owns the open/close transitions and the registry that
//! maps content identities to their live sheets - the explicit stand-in
//! for content needing a handle back to its own presentation. It also
//! serializes double presentations: presenting while another sheet is
//! active first dismisses the active one, then opens the new sheet from
//! the dismissal's completion.

use std::sync::{Arc, Mutex, Weak};

use rustc_hash::FxHashMap;
use tracing::debug;

use puller_animation::AnimationDriver;
use puller_platform::{Haptics, ScreenMetrics, SheetHost};

use crate::config::{SheetConfig, SheetObserver};
use crate::controller::SheetSurfaces;
use crate::sheet::Sheet;

/// Opaque identity of one piece of presented content
#[derive(Clone, Copy, Debug, PartialEq, Eq, Hash)]
pub struct ContentId(pub u64);

/// What the host wants presented
#[derive(Clone, Copy, Debug)]
pub struct SheetContent {
    pub id: ContentId,
    /// Intrinsic content height, consumed by fits-content resolution
    pub intrinsic_height: Option<f32>,
}

impl SheetContent {
    pub fn new(id: ContentId) -> Self {
        Self {
            id,
            intrinsic_height: None,
        }
    }

    pub fn with_intrinsic_height(mut self, height: f32) -> Self {
        self.intrinsic_height = Some(height);
        self
    }
}

struct Pending {
    content: SheetContent,
    sheet: Sheet,
}

struct PresenterState {
    active: Option<ContentId>,
    registry: FxHashMap<ContentId, Sheet>,
    pending: Option<Pending>,
}

struct PresenterInner {
    screen: Arc<dyn ScreenMetrics>,
    driver: Arc<dyn AnimationDriver>,
    haptics: Option<Arc<dyn Haptics>>,
    state: Mutex<PresenterState>,
}

/// Presents sheets over a host screen
#[derive(Clone)]
pub struct SheetPresenter {
    inner: Arc<PresenterInner>,
}

impl SheetPresenter {
    pub fn new(
        screen: Arc<dyn ScreenMetrics>,
        driver: Arc<dyn AnimationDriver>,
        haptics: Option<Arc<dyn Haptics>>,
    ) -> Self {
        Self {
            inner: Arc::new(PresenterInner {
                screen,
                driver,
                haptics,
                state: Mutex::new(PresenterState {
                    active: None,
                    registry: FxHashMap::default(),
                    pending: None,
                }),
            }),
        }
    }

    /// Begin a presentation
    ///
    /// Returns the sheet handle immediately. If another presentation is
    /// active it is dismissed first and the new sheet opens when that
    /// dismissal completes.
    pub fn present(
        &self,
        content: SheetContent,
        config: SheetConfig,
        surfaces: SheetSurfaces,
        host: Option<Arc<dyn SheetHost>>,
    ) -> Sheet {
        let sheet = Sheet::new(
            config,
            self.inner.screen.as_ref(),
            surfaces,
            Arc::clone(&self.inner.driver),
            self.inner.haptics.clone(),
            host,
        );
        sheet.add_observer(Arc::new(DismissalHook {
            inner: Arc::downgrade(&self.inner),
            id: content.id,
        }));

        let mut dismiss_first: Option<Sheet> = None;
        let mut open_now: Option<SheetContent> = None;
        {
            let mut state = self.inner.state.lock().unwrap();
            if let Some(active_id) = state.active {
                dismiss_first = state.registry.get(&active_id).cloned();
                state.registry.insert(content.id, sheet.clone());
                state.pending = Some(Pending {
                    content,
                    sheet: sheet.clone(),
                });
                debug!(?active_id, new = ?content.id, "queueing presentation behind active sheet");
            } else {
                state.registry.insert(content.id, sheet.clone());
                state.active = Some(content.id);
                open_now = Some(content);
            }
        }

        if let Some(active) = dismiss_first {
            active.dismiss();
        }
        if let Some(content) = open_now {
            sheet.open(content.intrinsic_height);
        }
        sheet
    }

    /// The currently active sheet, if any
    pub fn active_sheet(&self) -> Option<Sheet> {
        let state = self.inner.state.lock().unwrap();
        state
            .active
            .and_then(|id| state.registry.get(&id).cloned())
    }

    /// Look up a presentation by its content identity
    pub fn sheet_for(&self, id: ContentId) -> Option<Sheet> {
        self.inner.state.lock().unwrap().registry.get(&id).cloned()
    }

    /// Dismiss the active presentation
    pub fn dismiss_active(&self) {
        if let Some(sheet) = self.active_sheet() {
            sheet.dismiss();
        }
    }
}

/// Internal observer keeping the registry and pending queue in sync
struct DismissalHook {
    inner: Weak<PresenterInner>,
    id: ContentId,
}

impl SheetObserver for DismissalHook {
    fn on_did_dismiss(&self) {
        let Some(inner) = self.inner.upgrade() else {
            return;
        };

        let mut to_open: Option<(Sheet, Option<f32>)> = None;
        {
            let mut state = inner.state.lock().unwrap();
            state.registry.remove(&self.id);
            if state.active == Some(self.id) {
                state.active = None;
            }
            if state.active.is_none() {
                if let Some(pending) = state.pending.take() {
                    state.active = Some(pending.content.id);
                    state
                        .registry
                        .insert(pending.content.id, pending.sheet.clone());
                    to_open = Some((pending.sheet, pending.content.intrinsic_height));
                }
            }
        }

        if let Some((sheet, intrinsic_height)) = to_open {
            debug!("opening queued presentation");
            sheet.open(intrinsic_height);
        }
    }
}
