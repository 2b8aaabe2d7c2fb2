//! Coordinate transforms between marker percentages and image pixels.
//!
//! Marker positions are stored as percentages of the natural image size.
//! Everything in screen pixels is derived on demand from the current
//! [`ImageFrame`] and never written back.

use crate::marker::{Marker, MarkerPosition, MarkerStyle};
use kurbo::{Point, Rect, Size};
use serde::{Deserialize, Serialize};

/// Natural vs displayed size of the reference image at a point in time.
#[derive(Debug, Clone, Copy, PartialEq, Serialize, Deserialize)]
pub struct ImageFrame {
    /// Unscaled image size.
    pub natural: Size,
    /// Size the image is painted at.
    pub displayed: Size,
    /// `displayed / natural`.
    pub scale: f64,
}

impl ImageFrame {
    /// Create a frame from natural and displayed sizes.
    ///
    /// Returns `None` when the natural size has a non-positive dimension,
    /// since no transform exists for it.
    pub fn new(natural: Size, displayed: Size) -> Option<Self> {
        if !(natural.width > 0.0 && natural.height > 0.0) {
            return None;
        }
        Some(Self {
            natural,
            displayed,
            scale: displayed.width / natural.width,
        })
    }

    /// Fit an image into a container, preserving aspect ratio.
    pub fn fit(natural: Size, container: Size) -> Option<Self> {
        if !(natural.width > 0.0 && natural.height > 0.0) {
            return None;
        }
        let scale = (container.width / natural.width)
            .min(container.height / natural.height)
            .max(0.0);
        Some(Self {
            natural,
            displayed: Size::new(natural.width * scale, natural.height * scale),
            scale,
        })
    }

    /// Convert a stored position to a screen point.
    pub fn to_screen(&self, position: MarkerPosition) -> Point {
        let p = percent_to_pixel(position, self.natural.width, self.natural.height);
        Point::new(p.x * self.scale, p.y * self.scale)
    }

    /// Convert a screen point to a clamped position.
    pub fn to_position(&self, screen: Point) -> MarkerPosition {
        if self.scale <= 0.0 {
            return MarkerPosition::default();
        }
        clamp_position(pixel_to_percent(
            screen.x / self.scale,
            screen.y / self.scale,
            self.natural.width,
            self.natural.height,
        ))
    }

    /// Bounds of a marker in screen pixels.
    pub fn marker_bounds<T>(&self, marker: &Marker<T>, default_style: &MarkerStyle) -> MarkerBounds {
        get_marker_bounds(
            marker,
            self.natural.width,
            self.natural.height,
            self.scale,
            default_style,
        )
    }
}

/// Map a percentage position to natural-image pixels.
pub fn percent_to_pixel(position: MarkerPosition, natural_width: f64, natural_height: f64) -> Point {
    Point::new(
        position.x / 100.0 * natural_width,
        position.y / 100.0 * natural_height,
    )
}

/// Map natural-image pixels to a percentage position.
///
/// Callers must ensure both dimensions are positive.
pub fn pixel_to_percent(x: f64, y: f64, natural_width: f64, natural_height: f64) -> MarkerPosition {
    MarkerPosition {
        x: x / natural_width * 100.0,
        y: y / natural_height * 100.0,
    }
}

/// Clamp both axes into `[0, 100]`.
pub fn clamp_position(position: MarkerPosition) -> MarkerPosition {
    MarkerPosition {
        x: clamp_percent(position.x),
        y: clamp_percent(position.y),
    }
}

fn clamp_percent(value: f64) -> f64 {
    if value.is_nan() {
        0.0
    } else {
        value.clamp(0.0, 100.0)
    }
}

/// Axis-aligned marker box in screen pixels.
#[derive(Debug, Clone, Copy, PartialEq, Serialize, Deserialize)]
pub struct MarkerBounds {
    pub left: f64,
    pub top: f64,
    pub right: f64,
    pub bottom: f64,
    pub width: f64,
    pub height: f64,
}

impl MarkerBounds {
    /// Build bounds from a center and half extents.
    pub fn from_center(center: Point, half_width: f64, half_height: f64) -> Self {
        Self {
            left: center.x - half_width,
            top: center.y - half_height,
            right: center.x + half_width,
            bottom: center.y + half_height,
            width: half_width * 2.0,
            height: half_height * 2.0,
        }
    }

    /// Build bounds from a screen rectangle.
    pub fn from_rect(rect: Rect) -> Self {
        let rect = rect.abs();
        Self {
            left: rect.x0,
            top: rect.y0,
            right: rect.x1,
            bottom: rect.y1,
            width: rect.width(),
            height: rect.height(),
        }
    }

    /// Horizontal midpoint in screen pixels.
    pub fn center_x(&self) -> f64 {
        (self.left + self.right) / 2.0
    }

    /// Vertical midpoint in screen pixels.
    pub fn center_y(&self) -> f64 {
        (self.top + self.bottom) / 2.0
    }

    /// Midpoint of the box.
    pub fn center(&self) -> Point {
        Point::new(self.center_x(), self.center_y())
    }

    /// Check if a screen point falls inside (edges inclusive).
    pub fn contains(&self, point: Point) -> bool {
        point.x >= self.left && point.x <= self.right && point.y >= self.top && point.y <= self.bottom
    }
}

/// Compute a marker's screen bounds.
///
/// The center comes from the stored percentage position scaled to the
/// display; each half extent is the style dimension times `scale`.
pub fn get_marker_bounds<T>(
    marker: &Marker<T>,
    image_width: f64,
    image_height: f64,
    scale: f64,
    default_style: &MarkerStyle,
) -> MarkerBounds {
    let style = marker.style.as_ref().unwrap_or(default_style);
    let center = percent_to_pixel(marker.position, image_width, image_height);
    MarkerBounds::from_center(
        Point::new(center.x * scale, center.y * scale),
        style.width * scale,
        style.height * scale,
    )
}

#[cfg(test)]
mod tests {
    use super::*;

    fn marker_at(x: f64, y: f64, size: f64) -> Marker<()> {
        let mut marker = Marker::new("m", MarkerPosition::new(x, y));
        marker.style = Some(MarkerStyle::sized(size, size));
        marker
    }

    #[test]
    fn test_percent_to_pixel() {
        let p = percent_to_pixel(MarkerPosition::new(25.0, 50.0), 800.0, 400.0);
        assert!((p.x - 200.0).abs() < f64::EPSILON);
        assert!((p.y - 200.0).abs() < f64::EPSILON);
    }

    #[test]
    fn test_roundtrip_conversion() {
        let sizes = [(1000.0, 500.0), (1.0, 1.0), (4032.0, 3024.0), (333.0, 777.0)];
        let positions = [(0.0, 0.0), (100.0, 100.0), (12.5, 87.25), (33.333, 66.667)];
        for &(w, h) in &sizes {
            for &(x, y) in &positions {
                let original = MarkerPosition::new(x, y);
                let px = percent_to_pixel(original, w, h);
                let back = pixel_to_percent(px.x, px.y, w, h);
                assert!((back.x - original.x).abs() < 1e-9);
                assert!((back.y - original.y).abs() < 1e-9);
            }
        }
    }

    #[test]
    fn test_clamp_position() {
        let clamped = clamp_position(MarkerPosition::new(-5.0, 140.0));
        assert_eq!(clamped, MarkerPosition::new(0.0, 100.0));

        let inside = MarkerPosition::new(42.0, 7.5);
        assert_eq!(clamp_position(inside), inside);
    }

    #[test]
    fn test_clamp_idempotent() {
        for p in [
            MarkerPosition::new(-1.0, 50.0),
            MarkerPosition::new(101.0, -0.1),
            MarkerPosition::new(f64::NAN, 30.0),
            MarkerPosition::new(f64::INFINITY, f64::NEG_INFINITY),
        ] {
            let once = clamp_position(p);
            assert_eq!(clamp_position(once), once);
        }
    }

    #[test]
    fn test_marker_bounds() {
        let marker = marker_at(10.0, 10.0, 28.0);
        let bounds = get_marker_bounds(&marker, 1000.0, 500.0, 0.5, &MarkerStyle::default());
        assert!((bounds.left - 36.0).abs() < 1e-9);
        assert!((bounds.top - 11.0).abs() < 1e-9);
        assert!((bounds.right - 64.0).abs() < 1e-9);
        assert!((bounds.bottom - 39.0).abs() < 1e-9);
        assert_eq!(bounds.center(), Point::new(50.0, 25.0));
    }

    #[test]
    fn test_marker_bounds_uses_default_style() {
        let marker: Marker<()> = Marker::new("m", MarkerPosition::new(50.0, 50.0));
        let default_style = MarkerStyle::sized(10.0, 4.0);
        let bounds = get_marker_bounds(&marker, 200.0, 100.0, 1.0, &default_style);
        assert!((bounds.width - 20.0).abs() < 1e-9);
        assert!((bounds.height - 8.0).abs() < 1e-9);
    }

    #[test]
    fn test_fit_contain() {
        let frame = ImageFrame::fit(Size::new(1000.0, 500.0), Size::new(500.0, 500.0)).unwrap();
        assert!((frame.scale - 0.5).abs() < f64::EPSILON);
        assert_eq!(frame.displayed, Size::new(500.0, 250.0));

        let tall = ImageFrame::fit(Size::new(100.0, 400.0), Size::new(800.0, 200.0)).unwrap();
        assert!((tall.scale - 0.5).abs() < f64::EPSILON);
    }

    #[test]
    fn test_frame_rejects_empty_image() {
        assert!(ImageFrame::fit(Size::new(0.0, 10.0), Size::new(10.0, 10.0)).is_none());
        assert!(ImageFrame::new(Size::new(10.0, -1.0), Size::new(10.0, 10.0)).is_none());
    }

    #[test]
    fn test_screen_position_roundtrip() {
        let frame = ImageFrame::new(Size::new(1000.0, 500.0), Size::new(500.0, 250.0)).unwrap();
        let screen = frame.to_screen(MarkerPosition::new(10.0, 10.0));
        assert_eq!(screen, Point::new(50.0, 25.0));
        let back = frame.to_position(screen);
        assert!((back.x - 10.0).abs() < 1e-9);
        assert!((back.y - 10.0).abs() < 1e-9);
    }

    #[test]
    fn test_to_position_clamps() {
        let frame = ImageFrame::new(Size::new(100.0, 100.0), Size::new(100.0, 100.0)).unwrap();
        assert_eq!(frame.to_position(Point::new(-20.0, 500.0)), MarkerPosition::new(0.0, 100.0));
    }

    #[test]
    fn test_bounds_contains() {
        let bounds = MarkerBounds::from_center(Point::new(10.0, 10.0), 5.0, 5.0);
        assert!(bounds.contains(Point::new(15.0, 5.0)));
        assert!(!bounds.contains(Point::new(15.1, 10.0)));
    }
}
