//! Puller Platform Contracts
//!
//! Capability traits the sheet engine consumes from its host, and the
//! event types the host feeds into it. The engine has no opinion about
//! windowing, rendering, or gesture recognition; it only requires:
//!
//! - [`ScreenMetrics`] - screen bounds, form factor, safe areas
//! - [`RenderSurface`] - frame/transform/radius/shadow/opacity writes
//! - [`PanEvent`] - pan gesture updates with location and velocity
//! - [`ScrollSurface`] - optional embedded scrollable content
//! - [`KeyboardEvent`] - keyboard show/hide transitions
//! - [`Haptics`] / [`SheetHost`] - optional feedback and content hooks
//!
//! Host integrations (native view bridges, compositor bindings) implement
//! these traits; the engine crates stay platform-free.

mod error;
mod gesture;
mod haptics;
mod host;
mod keyboard;
mod screen;
mod scrollable;
mod surface;

pub use error::{PlatformError, Result};
pub use gesture::{PanEvent, PanPhase};
pub use haptics::{Haptics, ImpactStyle};
pub use host::SheetHost;
pub use keyboard::{KeyboardCurve, KeyboardEvent, KeyboardTransition};
pub use screen::{DeviceIdiom, ScreenMetrics, StaticScreen};
pub use scrollable::{is_at_top, ScrollSurface};
pub use surface::{GeometryEvent, RenderSurface, Shadow};

/// Prelude module for convenient imports
pub mod prelude {
    pub use crate::{
        is_at_top, DeviceIdiom, GeometryEvent, Haptics, ImpactStyle, KeyboardCurve, KeyboardEvent,
        KeyboardTransition, PanEvent, PanPhase, PlatformError, RenderSurface, ScreenMetrics,
        ScrollSurface, Shadow, SheetHost, StaticScreen,
    };
}
