//! Utility functions for colors and geometry.
//!
//! This module provides:
//! - Color naming for status output and config parsing
//! - Axis-aligned rectangles for damage tracking

use crate::draw::{Color, color::*};

// ============================================================================
// Color Mapping
// ============================================================================

/// Maps color name strings to Color values.
///
/// Used by the configuration system and by [`Color::parse`].
///
/// # Supported Names (case-insensitive)
/// black, red, green, blue, yellow, magenta, cyan, orange, purple, pink,
/// brown, white
pub fn name_to_color(name: &str) -> Option<Color> {
    match name.trim().to_lowercase().as_str() {
        "black" => Some(BLACK),
        "red" => Some(RED),
        "green" => Some(GREEN),
        "blue" => Some(BLUE),
        "yellow" => Some(YELLOW),
        "magenta" => Some(MAGENTA),
        "cyan" => Some(CYAN),
        "orange" => Some(ORANGE),
        "purple" => Some(PURPLE),
        "pink" => Some(PINK),
        "brown" => Some(BROWN),
        "white" => Some(WHITE),
        _ => None,
    }
}

/// Maps a Color value to its palette name.
///
/// Matches on the 8-bit representation so parsed hex colors resolve to the
/// same name as the constants. Returns "Custom" for anything off-palette.
pub fn color_to_name(color: &Color) -> &'static str {
    const NAMES: [&str; 12] = [
        "Black", "Red", "Green", "Blue", "Yellow", "Magenta", "Cyan", "Orange", "Purple", "Pink",
        "Brown", "White",
    ];

    let rgba = color.to_rgba8();
    PALETTE
        .iter()
        .position(|candidate| candidate.to_rgba8() == rgba)
        .map(|idx| NAMES[idx])
        .unwrap_or("Custom")
}

// ============================================================================
// Geometry Utilities
// ============================================================================

/// Axis-aligned rectangle helper used for dirty region tracking.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct Rect {
    pub x: i32,
    pub y: i32,
    pub width: i32,
    pub height: i32,
}

impl Rect {
    /// Creates a new rectangle. Width/height must be positive.
    pub fn new(x: i32, y: i32, width: i32, height: i32) -> Option<Self> {
        if width <= 0 || height <= 0 {
            None
        } else {
            Some(Self {
                x,
                y,
                width,
                height,
            })
        }
    }

    /// Builds a rectangle from min/max bounds (inclusive min, exclusive max).
    ///
    /// Returns `None` when the extent does not fit in `i32`.
    pub fn from_min_max(min_x: i32, min_y: i32, max_x: i32, max_y: i32) -> Option<Self> {
        let width = max_x.checked_sub(min_x)?;
        let height = max_y.checked_sub(min_y)?;
        Self::new(min_x, min_y, width, height)
    }

    /// Builds the smallest integer rectangle covering the given float bounds.
    ///
    /// Non-finite or out-of-range bounds yield `None`, which damage tracking
    /// treats as a full repaint.
    pub fn covering(min_x: f64, min_y: f64, max_x: f64, max_y: f64) -> Option<Self> {
        let to_i32 = |v: f64| {
            if v.is_finite() {
                i32::try_from(v as i64).ok()
            } else {
                None
            }
        };
        Self::from_min_max(
            to_i32(min_x.floor())?,
            to_i32(min_y.floor())?,
            to_i32(max_x.ceil())?,
            to_i32(max_y.ceil())?,
        )
    }

    /// Clamps the rectangle to `0..width` x `0..height`, dropping it if nothing remains.
    pub fn clamp_to_bounds(self, width: i32, height: i32) -> Option<Rect> {
        let min_x = self.x.clamp(0, width);
        let min_y = self.y.clamp(0, height);
        let max_x = self.x.saturating_add(self.width).clamp(0, width);
        let max_y = self.y.saturating_add(self.height).clamp(0, height);
        Self::from_min_max(min_x, min_y, max_x, max_y)
    }

    /// Returns true if the pixel at (`px`, `py`) lies inside the rectangle.
    pub fn contains(&self, px: i32, py: i32) -> bool {
        px >= self.x
            && px < self.x.saturating_add(self.width)
            && py >= self.y
            && py < self.y.saturating_add(self.height)
    }

    /// Returns true if rectangle has a positive area.
    pub fn is_valid(&self) -> bool {
        self.width > 0 && self.height > 0
    }
}

/// Euclidean distance between two points.
///
/// The ellipse tool uses this as its radius: the drag starts at the center
/// and the pointer position lies on the outline.
pub fn distance(x1: f64, y1: f64, x2: f64, y2: f64) -> f64 {
    ((x2 - x1).powi(2) + (y2 - y1).powi(2)).sqrt()
}

/// Normalizes two opposite corners into `(x, y, w, h)` with non-negative size.
pub fn normalized_rect(x1: f64, y1: f64, x2: f64, y2: f64) -> (f64, f64, f64, f64) {
    (x1.min(x2), y1.min(y2), (x2 - x1).abs(), (y2 - y1).abs())
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn name_color_mapping_is_case_insensitive() {
        assert_eq!(name_to_color("white").unwrap(), WHITE);
        assert_eq!(name_to_color("Brown").unwrap(), BROWN);
        assert!(name_to_color("chartreuse").is_none());
    }

    #[test]
    fn color_to_name_matches_known_colors() {
        assert_eq!(color_to_name(&RED), "Red");
        assert_eq!(color_to_name(&Color::parse("#ffa500").unwrap()), "Orange");
        assert_eq!(color_to_name(&Color::new(0.42, 0.42, 0.42, 1.0)), "Custom");
    }

    #[test]
    fn rect_covering_rounds_outward() {
        let rect = Rect::covering(1.5, 2.2, 4.1, 4.9).unwrap();
        assert_eq!(rect, Rect::new(1, 2, 4, 3).unwrap());
        assert!(Rect::covering(f64::NAN, 0.0, 1.0, 1.0).is_none());
    }

    #[test]
    fn rect_covering_rejects_extents_beyond_i32() {
        assert!(Rect::covering(-2e9 - 3.0, 2.0, 2e9 + 3.0, 8.0).is_none());
        assert!(Rect::covering(0.0, 0.0, 1e12, 4.0).is_none());
        assert!(Rect::from_min_max(i32::MIN, 0, i32::MAX, 1).is_none());
        assert_eq!(
            Rect::covering(-1e9, 0.0, 1e9, 1.0),
            Rect::new(-1_000_000_000, 0, 2_000_000_000, 1)
        );
    }

    #[test]
    fn rect_clamp() {
        let off = Rect::new(-5, -5, 10, 10).unwrap();
        assert_eq!(off.clamp_to_bounds(100, 100), Rect::new(0, 0, 5, 5));
        assert!(Rect::new(200, 200, 5, 5).unwrap().clamp_to_bounds(100, 100).is_none());
    }

    #[test]
    fn normalized_rect_handles_any_drag_direction() {
        assert_eq!(normalized_rect(10.0, 10.0, 2.0, 4.0), (2.0, 4.0, 8.0, 6.0));
        assert_eq!(distance(0.0, 0.0, 3.0, 4.0), 5.0);
    }
}
