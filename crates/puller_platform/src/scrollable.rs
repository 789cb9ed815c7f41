//! Embedded scrollable content contract

use puller_core::{EdgeInsets, Point, Rect};

/// Scrollable region nested inside the sheet's content
///
/// The engine reads scroll position to arbitrate gestures and writes it
/// to pin content while the sheet itself moves. Both the user and the
/// engine mutate offset and insets; hosts observing offset changes should
/// consult the engine's programmatic-scroll flag to tell the two apart.
pub trait ScrollSurface: Send + Sync {
    /// The scroll region's frame in the sheet container's coordinate space
    fn frame(&self) -> Rect;

    fn content_offset(&self) -> Point;
    fn set_content_offset(&self, offset: Point);

    fn content_inset(&self) -> EdgeInsets;
    /// Raise or restore the bottom content inset (keyboard avoidance)
    fn set_bottom_inset(&self, inset: f32);

    /// Whether the user's finger is actively dragging the scroll content
    fn is_dragging(&self) -> bool;

    /// Whether a pull-to-refresh control is attached
    fn has_refresh_control(&self) -> bool;

    /// Resize the scrollable content (fits-content embedding)
    fn set_content_height(&self, height: f32);
}

/// Whether the scroll content rests at its top edge
///
/// Top is inset-relative: an offset of `-inset.top` is at rest.
pub fn is_at_top(scroll: &dyn ScrollSurface) -> bool {
    scroll.content_inset().top + scroll.content_offset().y <= 0.0
}

#[cfg(test)]
mod tests {
    use super::*;
    use std::sync::Mutex;

    struct StubScroll {
        offset: Mutex<Point>,
        inset: EdgeInsets,
    }

    impl ScrollSurface for StubScroll {
        fn frame(&self) -> Rect {
            Rect::ZERO
        }

        fn content_offset(&self) -> Point {
            *self.offset.lock().unwrap()
        }

        fn set_content_offset(&self, offset: Point) {
            *self.offset.lock().unwrap() = offset;
        }

        fn content_inset(&self) -> EdgeInsets {
            self.inset
        }

        fn set_bottom_inset(&self, _inset: f32) {}

        fn is_dragging(&self) -> bool {
            false
        }

        fn has_refresh_control(&self) -> bool {
            false
        }

        fn set_content_height(&self, _height: f32) {}
    }

    #[test]
    fn test_is_at_top_respects_inset() {
        let scroll = StubScroll {
            offset: Mutex::new(Point::new(0.0, -20.0)),
            inset: EdgeInsets::new(20.0, 0.0, 0.0, 0.0),
        };
        assert!(is_at_top(&scroll));

        scroll.set_content_offset(Point::new(0.0, 5.0));
        assert!(!is_at_top(&scroll));
    }
}
