//! Puller Animation Plumbing
//!
//! Everything the sheet engine needs to move pixels over time:
//!
//! - **Spring physics**: RK4-integrated springs with stiffness, damping,
//!   mass, and a response-time parameterization
//! - **Easing**: timing curves for non-spring movement
//! - **Strategy**: the per-movement timing bundle (duration, delay,
//!   damping fraction, initial velocity, curve)
//! - **Driver**: the animate-with-completion contract, with a host-ticked
//!   driver and a synchronous driver for headless use

pub mod driver;
pub mod easing;
pub mod spring;
pub mod strategy;

pub use driver::{
    AnimationDriver, AnimationId, AnimationOutcome, DoneFn, FrameFn, ImmediateDriver, TickDriver,
};
pub use easing::Easing;
pub use spring::{Spring, SpringConfig};
pub use strategy::AnimationStrategy;
