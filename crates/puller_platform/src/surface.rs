//! Render surface contract
//!
//! A render surface is one rectangle the host compositor draws: the sheet
//! itself, the presenting view behind it, the dimming backdrop, the shadow,
//! the drag indicator, the close button. The engine only ever writes frame,
//! transform, corner radius, shadow, and opacity; composition is the
//! host's business.

use puller_core::{Color, Rect, Transform2D, Vec2};

/// Drop shadow parameters
#[derive(Clone, Copy, Debug, PartialEq)]
pub struct Shadow {
    pub color: Color,
    pub opacity: f32,
    pub radius: f32,
    pub offset: Vec2,
}

impl Default for Shadow {
    fn default() -> Self {
        Self {
            color: Color::BLACK.with_alpha(0.15),
            opacity: 1.0,
            radius: 8.0,
            offset: Vec2::ZERO,
        }
    }
}

/// A geometry change observed on a render surface
///
/// Hosts that move surfaces behind the engine's back (layout passes,
/// their own animations) deliver these so derived visuals stay in sync.
#[derive(Clone, Copy, Debug, PartialEq, Eq)]
pub enum GeometryEvent {
    /// The surface frame changed
    FrameChanged,
    /// The surface transform changed
    TransformChanged,
}

/// Writable rectangle in the host's render tree
///
/// Reads return the last written value. Writes take effect on the next
/// composited frame; the engine assumes they are cheap and idempotent.
pub trait RenderSurface: Send + Sync {
    fn frame(&self) -> Rect;
    fn set_frame(&self, frame: Rect);

    fn transform(&self) -> Transform2D;
    fn set_transform(&self, transform: Transform2D);

    fn corner_radius(&self) -> f32;
    fn set_corner_radius(&self, radius: f32);

    fn set_shadow(&self, shadow: Shadow);

    fn opacity(&self) -> f32;
    fn set_opacity(&self, opacity: f32);
}
