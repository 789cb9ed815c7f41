//! Puller Sheet Engine
//!
//! A headless bottom-sheet presentation engine: a sheet rests at
//! configurable detents, follows drags with rubber-band edges, arbitrates
//! gestures with embedded scrollable content, rises above the keyboard,
//! and drives backdrop dimming, corner radii, and background scale as
//! pure functions of its offset.
//!
//! The engine owns state and math only. Rendering, gesture recognition,
//! and keyboard notifications come from the host through the
//! `puller_platform` contracts; movement runs through the
//! `puller_animation` driver.
//!
//! # Example
//!
//! ```ignore
//! use puller_sheet::prelude::*;
//!
//! let presenter = SheetPresenter::new(screen, driver, None);
//! let sheet = presenter.present(
//!     SheetContent::new(ContentId(1)),
//!     SheetConfig::new(&[Detent::Medium, Detent::Large]),
//!     surfaces,
//!     None,
//! );
//!
//! // Wire host events in:
//! sheet.handle_pan(pan_event);
//! sheet.handle_keyboard(keyboard_event);
//! ```

pub mod config;
pub mod controller;
pub mod detent;
mod gesture;
mod keyboard;
pub mod presenter;
pub mod sheet;
pub mod state;
pub mod visuals;

pub use config::{DragIndicator, SheetConfig, SheetObserver};
pub use controller::{SheetController, SheetSurfaces};
pub use detent::{Detent, DetentList};
pub use presenter::{ContentId, SheetContent, SheetPresenter};
pub use sheet::Sheet;
pub use state::{DragAxis, GestureSource, MoveDirection, SheetState};
pub use visuals::{ScreenInfo, VisualInputs, VisualOutputs};

/// Prelude module for convenient imports
pub mod prelude {
    pub use crate::{
        ContentId, Detent, DetentList, DragIndicator, Sheet, SheetConfig, SheetContent,
        SheetObserver, SheetPresenter, SheetState, SheetSurfaces,
    };
    pub use puller_animation::{AnimationDriver, AnimationStrategy, ImmediateDriver, TickDriver};
    pub use puller_core::{Color, EdgeInsets, Point, Rect, Size, Vec2};
    pub use puller_platform::prelude::*;
}
