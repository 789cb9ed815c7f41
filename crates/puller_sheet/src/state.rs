//! Sheet interaction state machine
//!
//! ```text
//!              DRAG_BEGAN                DRAG_ENDED
//!     Idle ──────────────► Dragging ──────────────► Settling
//!       ▲                     ▲                        │
//!       │                     │ DRAG_BEGAN (supersede) │
//!       │ SETTLED             └────────────────────────┤
//!       └──────────────────────────────────────────────┘
//!
//!     any state ── DISMISS ──► Dismissing (absorbing)
//! ```
//!
//! Keyboard adjustment is deliberately not a state here: it nests
//! independently of dragging and is tracked as a flag on the controller.

use puller_core::StateTransitions;

/// Events driving [`SheetState`]
pub mod sheet_events {
    /// A valid pan gesture started owning the sheet
    pub const DRAG_BEGAN: u32 = 1;
    /// The owning pan gesture ended or was cancelled
    pub const DRAG_ENDED: u32 = 2;
    /// The settle animation completed
    pub const SETTLED: u32 = 3;
    /// Dismissal began
    pub const DISMISS: u32 = 4;
}

/// Interaction state of one presented sheet
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Default)]
pub enum SheetState {
    /// At rest on a detent
    #[default]
    Idle,
    /// A pan gesture owns the sheet position
    Dragging,
    /// Animating to the resolved detent after release
    Settling,
    /// Dismissal animation in flight; all input is rejected
    Dismissing,
}

impl SheetState {
    pub fn is_dismissing(&self) -> bool {
        matches!(self, SheetState::Dismissing)
    }

    pub fn is_dragging(&self) -> bool {
        matches!(self, SheetState::Dragging)
    }
}

impl StateTransitions for SheetState {
    fn on_event(&self, event: u32) -> Option<Self> {
        use sheet_events::*;

        match (self, event) {
            (SheetState::Idle, DRAG_BEGAN) => Some(SheetState::Dragging),

            (SheetState::Dragging, DRAG_ENDED) => Some(SheetState::Settling),

            (SheetState::Settling, SETTLED) => Some(SheetState::Idle),

            // A new touch supersedes an in-flight settle
            (SheetState::Settling, DRAG_BEGAN) => Some(SheetState::Dragging),

            (SheetState::Idle, DISMISS)
            | (SheetState::Dragging, DISMISS)
            | (SheetState::Settling, DISMISS) => Some(SheetState::Dismissing),

            _ => None,
        }
    }
}

/// Which axis the current gesture moves the sheet on
#[derive(Clone, Copy, Debug, PartialEq, Eq, Default)]
pub enum DragAxis {
    #[default]
    Vertical,
    Horizontal,
}

/// Where the active pan gesture originated
#[derive(Clone, Copy, Debug, PartialEq, Eq)]
pub enum GestureSource {
    /// The sheet's own background
    View,
    /// An embedded scrollable region
    Scroll,
}

/// Vertical movement direction, read from gesture velocity
#[derive(Clone, Copy, Debug, PartialEq, Eq)]
pub enum MoveDirection {
    Up,
    Down,
}

impl MoveDirection {
    /// Direction from a vertical velocity component
    pub fn from_velocity(vy: f32) -> Self {
        if vy < 0.0 {
            MoveDirection::Up
        } else {
            MoveDirection::Down
        }
    }
}

#[cfg(test)]
mod tests {
    use super::sheet_events::*;
    use super::*;
    use puller_core::advance;

    #[test]
    fn test_drag_settle_cycle() {
        let mut state = SheetState::Idle;
        assert!(advance(&mut state, DRAG_BEGAN));
        assert_eq!(state, SheetState::Dragging);
        assert!(advance(&mut state, DRAG_ENDED));
        assert_eq!(state, SheetState::Settling);
        assert!(advance(&mut state, SETTLED));
        assert_eq!(state, SheetState::Idle);
    }

    #[test]
    fn test_new_drag_supersedes_settle() {
        let mut state = SheetState::Settling;
        assert!(advance(&mut state, DRAG_BEGAN));
        assert_eq!(state, SheetState::Dragging);
    }

    #[test]
    fn test_dismissing_absorbs_everything() {
        let mut state = SheetState::Idle;
        assert!(advance(&mut state, DISMISS));
        assert_eq!(state, SheetState::Dismissing);

        for event in [DRAG_BEGAN, DRAG_ENDED, SETTLED, DISMISS] {
            assert!(!advance(&mut state, event));
            assert_eq!(state, SheetState::Dismissing);
        }
    }

    #[test]
    fn test_direction_from_velocity() {
        assert_eq!(MoveDirection::from_velocity(-10.0), MoveDirection::Up);
        assert_eq!(MoveDirection::from_velocity(10.0), MoveDirection::Down);
        // Zero velocity counts as downward, matching the release solver
        assert_eq!(MoveDirection::from_velocity(0.0), MoveDirection::Down);
    }
}
