//! Screen metrics provider

use puller_core::{EdgeInsets, Size};

/// Device form-factor class
#[derive(Clone, Copy, Debug, PartialEq, Eq)]
pub enum DeviceIdiom {
    /// Phone-class device
    Phone,
    /// Tablet-class device
    Tablet,
}

/// Source of screen geometry for the sheet engine
///
/// Implemented by the host window system. Values are read once at
/// presentation time and again on orientation changes.
pub trait ScreenMetrics: Send + Sync {
    /// Current screen bounds in logical pixels
    fn size(&self) -> Size;

    /// Device form factor
    fn idiom(&self) -> DeviceIdiom;

    /// Safe-area insets of the hosting window
    fn safe_area(&self) -> EdgeInsets;

    /// Physical display corner radius, 0 when unknown
    fn display_corner_radius(&self) -> f32;
}

/// Fixed screen metrics
///
/// A plain value implementation for hosts with static bounds and for
/// tests.
#[derive(Clone, Copy, Debug)]
pub struct StaticScreen {
    pub size: Size,
    pub idiom: DeviceIdiom,
    pub safe_area: EdgeInsets,
    pub display_corner_radius: f32,
}

impl StaticScreen {
    /// A portrait phone screen with typical insets
    pub fn phone() -> Self {
        Self {
            size: Size::new(390.0, 844.0),
            idiom: DeviceIdiom::Phone,
            safe_area: EdgeInsets::new(47.0, 0.0, 34.0, 0.0),
            display_corner_radius: 47.0,
        }
    }

    /// A landscape tablet screen without insets
    pub fn tablet() -> Self {
        Self {
            size: Size::new(1180.0, 820.0),
            idiom: DeviceIdiom::Tablet,
            safe_area: EdgeInsets::ZERO,
            display_corner_radius: 18.0,
        }
    }
}

impl ScreenMetrics for StaticScreen {
    fn size(&self) -> Size {
        self.size
    }

    fn idiom(&self) -> DeviceIdiom {
        self.idiom
    }

    fn safe_area(&self) -> EdgeInsets {
        self.safe_area
    }

    fn display_corner_radius(&self) -> f32 {
        self.display_corner_radius
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_static_screen_presets() {
        let phone = StaticScreen::phone();
        assert_eq!(phone.idiom(), DeviceIdiom::Phone);
        assert!(phone.size().height > phone.size().width);

        let tablet = StaticScreen::tablet();
        assert_eq!(tablet.idiom(), DeviceIdiom::Tablet);
        assert_eq!(tablet.safe_area(), EdgeInsets::ZERO);
    }
}
