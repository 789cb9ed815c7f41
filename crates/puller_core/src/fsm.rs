//! Event-driven state machine trait
//!
//! Interaction states (drag, settle, dismiss) are modeled as small enums
//! with explicit transition tables. Events are plain `u32` identifiers so
//! state enums stay decoupled from the event sources that drive them.
//!
//! # Example
//!
//! ```
//! use puller_core::fsm::{advance, StateTransitions};
//!
//! #[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Default)]
//! enum Latch {
//!     #[default]
//!     Open,
//!     Closed,
//! }
//!
//! const CLOSE: u32 = 1;
//!
//! impl StateTransitions for Latch {
//!     fn on_event(&self, event: u32) -> Option<Self> {
//!         match (self, event) {
//!             (Latch::Open, CLOSE) => Some(Latch::Closed),
//!             _ => None,
//!         }
//!     }
//! }
//!
//! let mut latch = Latch::Open;
//! assert!(advance(&mut latch, CLOSE));
//! assert_eq!(latch, Latch::Closed);
//! ```

use std::hash::Hash;

/// Trait for state machines with event-driven transitions
pub trait StateTransitions:
    Clone + Copy + PartialEq + Eq + Hash + Send + Sync + std::fmt::Debug + 'static
{
    /// Handle an event and return the new state, or None if no transition
    fn on_event(&self, event: u32) -> Option<Self>;
}

/// Apply an event to a state in place
///
/// Returns true if the state changed. Transitions are logged at debug
/// level; events with no matching transition are silently ignored.
pub fn advance<S: StateTransitions>(state: &mut S, event: u32) -> bool {
    match state.on_event(event) {
        Some(next) => {
            tracing::debug!(from = ?state, to = ?next, event, "state transition");
            *state = next;
            true
        }
        None => false,
    }
}
