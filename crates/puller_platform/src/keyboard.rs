//! Keyboard notification events

use puller_core::Rect;

/// Animation curve reported by the keyboard system
#[derive(Clone, Copy, Debug, Default, PartialEq, Eq)]
pub enum KeyboardCurve {
    Linear,
    EaseIn,
    EaseOut,
    #[default]
    EaseInOut,
}

/// One keyboard frame transition
#[derive(Clone, Copy, Debug, PartialEq)]
pub struct KeyboardTransition {
    /// Keyboard frame before the transition, in screen coordinates
    pub frame_from: Rect,
    /// Keyboard frame after the transition
    pub frame_to: Rect,
    /// Duration of the system keyboard animation in seconds
    pub duration: f32,
    /// Curve of the system keyboard animation
    pub curve: KeyboardCurve,
}

impl KeyboardTransition {
    /// Height the keyboard will occupy after the transition
    pub fn target_height(&self) -> f32 {
        self.frame_to.height()
    }
}

/// Keyboard lifecycle events delivered by the host
#[derive(Clone, Copy, Debug, PartialEq)]
pub enum KeyboardEvent {
    WillShow(KeyboardTransition),
    DidShow(KeyboardTransition),
    WillHide(KeyboardTransition),
    DidHide(KeyboardTransition),
}

impl KeyboardEvent {
    pub fn transition(&self) -> KeyboardTransition {
        match self {
            KeyboardEvent::WillShow(t)
            | KeyboardEvent::DidShow(t)
            | KeyboardEvent::WillHide(t)
            | KeyboardEvent::DidHide(t) => *t,
        }
    }
}
