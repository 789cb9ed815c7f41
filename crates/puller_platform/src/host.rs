//! Host-side hooks the engine calls back into

/// Actions the sheet engine asks its host to perform on the content
///
/// All methods have empty defaults; hosts implement what they support.
pub trait SheetHost: Send + Sync {
    /// Dismiss any active text input focus (end editing)
    ///
    /// Called when a drag settles below the detent it started from.
    fn resign_focus(&self) {}

    /// Wrap the presented content in an internal scroll container
    ///
    /// Called once after a fits-content presentation whose intrinsic
    /// content height exceeds the resolved sheet height, when the config
    /// opted into embedding. `content_height` is the full intrinsic
    /// height the scroll content should take.
    fn embed_in_scroll(&self, content_height: f32) {
        let _ = content_height;
    }
}
