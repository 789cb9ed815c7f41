//! Puller Core Primitives
//!
//! Foundational value types for the puller sheet engine:
//!
//! - **Geometry**: points, sizes, rects, vectors, edge insets, and the
//!   restricted affine transform the engine writes to render surfaces
//! - **Color**: RGBA color for backdrop dimming and drag indicators
//! - **State machines**: the `StateTransitions` trait used by the sheet's
//!   interaction state machine

pub mod color;
pub mod fsm;
pub mod geometry;

pub use color::Color;
pub use fsm::{advance, StateTransitions};
pub use geometry::{lerp, EdgeInsets, Point, Rect, Size, Transform2D, Vec2};
