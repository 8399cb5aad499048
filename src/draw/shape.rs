//! Geometry primitives shared by the surface and the preview layer.

use super::color::Color;
use crate::util::{self, Rect};
use serde::{Deserialize, Serialize};

/// Smallest stroke width accepted by the tool controller, in pixels.
pub const MIN_STROKE_WIDTH: f64 = 1.0;
/// Largest stroke width accepted by the tool controller, in pixels.
pub const MAX_STROKE_WIDTH: f64 = 100.0;

/// A position in surface-local coordinates.
///
/// Coordinates are floating point and relative to the surface's top-left
/// corner, not device pixels.
#[derive(Debug, Clone, Copy, PartialEq, Default, Serialize, Deserialize)]
pub struct Point {
    pub x: f64,
    pub y: f64,
}

impl Point {
    pub const fn new(x: f64, y: f64) -> Self {
        Self { x, y }
    }

    pub fn is_finite(&self) -> bool {
        self.x.is_finite() && self.y.is_finite()
    }

    /// Euclidean distance to `other`.
    pub fn distance_to(&self, other: Point) -> f64 {
        util::distance(self.x, self.y, other.x, other.y)
    }
}

impl From<(f64, f64)> for Point {
    fn from((x, y): (f64, f64)) -> Self {
        Self { x, y }
    }
}

/// Color and width of a single committed primitive.
#[derive(Debug, Clone, Copy, PartialEq)]
pub struct StrokeStyle {
    /// Stroke color
    pub color: Color,
    /// Line width in pixels (always positive)
    pub width: f64,
}

impl StrokeStyle {
    pub fn new(color: Color, width: f64) -> Self {
        Self { color, width }
    }
}

/// Outline primitives produced by the two-point shape tools.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub enum ShapeKind {
    /// Straight line between the two points
    Line,
    /// Axis-aligned rectangle with the two points as opposite corners
    Rectangle,
    /// Circle centered on the first point passing through the second
    Ellipse,
}

impl ShapeKind {
    /// Returns the pixel bounds touched by this shape, inflated by half the stroke width.
    ///
    /// Suitable for damage hints; returns `None` for non-finite input.
    pub fn bounds(self, from: Point, to: Point, width: f64) -> Option<Rect> {
        let half = width / 2.0 + 1.0;
        match self {
            ShapeKind::Line | ShapeKind::Rectangle => segment_bounds(from, to, width),
            ShapeKind::Ellipse => {
                let radius = from.distance_to(to);
                Rect::covering(
                    from.x - radius - half,
                    from.y - radius - half,
                    from.x + radius + half,
                    from.y + radius + half,
                )
            }
        }
    }
}

/// Bounding box of a round-capped segment, inflated by half the stroke width.
///
/// One extra pixel of padding covers antialiased edges.
pub fn segment_bounds(from: Point, to: Point, width: f64) -> Option<Rect> {
    let half = width / 2.0 + 1.0;
    Rect::covering(
        from.x.min(to.x) - half,
        from.y.min(to.y) - half,
        from.x.max(to.x) + half,
        from.y.max(to.y) + half,
    )
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn segment_bounds_cover_caps() {
        let rect = segment_bounds(Point::new(10.0, 10.0), Point::new(20.0, 10.0), 4.0).unwrap();
        assert_eq!(rect, Rect::new(7, 7, 16, 6).unwrap());
    }

    #[test]
    fn zero_length_segment_still_has_area() {
        let rect = segment_bounds(Point::new(5.0, 5.0), Point::new(5.0, 5.0), 2.0).unwrap();
        assert!(rect.is_valid());
        assert!(rect.contains(5, 5));
    }

    #[test]
    fn ellipse_bounds_use_distance_as_radius() {
        let rect = ShapeKind::Ellipse
            .bounds(Point::new(50.0, 50.0), Point::new(53.0, 54.0), 2.0)
            .unwrap();
        // radius 5, padding 2
        assert_eq!(rect, Rect::new(43, 43, 14, 14).unwrap());
    }

    #[test]
    fn huge_drags_have_no_pixel_bounds() {
        let from = Point::new(-2.0e9, 5.0);
        let to = Point::new(2.0e9, 5.0);
        assert_eq!(segment_bounds(from, to, 2.0), None);
        assert_eq!(ShapeKind::Line.bounds(from, to, 2.0), None);
        assert_eq!(ShapeKind::Ellipse.bounds(Point::new(0.0, 0.0), to, 2.0), None);
    }

    #[test]
    fn rectangle_bounds_ignore_drag_direction() {
        let a = ShapeKind::Rectangle.bounds(Point::new(0.0, 0.0), Point::new(10.0, 10.0), 2.0);
        let b = ShapeKind::Rectangle.bounds(Point::new(10.0, 10.0), Point::new(0.0, 0.0), 2.0);
        assert_eq!(a, b);
    }
}
