//! Dirty region tracking for incremental redraws.
//!
//! Collects axis-aligned rectangles of the canvas that changed since the host
//! last repainted.

use crate::util::Rect;

/// Past this many pending rectangles the tracker gives up and repaints everything.
const MAX_REGIONS: usize = 64;

/// Tracks dirty rectangles accumulated between repaints.
#[derive(Debug, Default)]
pub struct DirtyTracker {
    regions: Vec<Rect>,
    force_full: bool,
}

impl DirtyTracker {
    /// Creates a new, empty tracker.
    pub fn new() -> Self {
        Self::default()
    }

    /// Marks the entire canvas as dirty. Clears any accumulated rectangles.
    pub fn mark_full(&mut self) {
        self.force_full = true;
        self.regions.clear();
    }

    /// Adds a dirty rectangle if the tracker is not already full.
    pub fn mark_rect(&mut self, rect: Rect) {
        if !rect.is_valid() || self.force_full {
            return;
        }
        if self.regions.len() >= MAX_REGIONS {
            self.mark_full();
            return;
        }
        self.regions.push(rect);
    }

    /// Adds a dirty rectangle, or full damage if the bounds are unknown.
    pub fn mark_bounds(&mut self, rect: Option<Rect>) {
        match rect {
            Some(rect) => self.mark_rect(rect),
            None => self.mark_full(),
        }
    }

    /// Whether anything is waiting to be repainted.
    pub fn is_dirty(&self) -> bool {
        self.force_full || !self.regions.is_empty()
    }

    /// Drains the dirty regions gathered so far, clipped to the canvas.
    ///
    /// When the full canvas is marked, returns a single rectangle covering it;
    /// otherwise returns the accumulated rectangles that intersect it.
    pub fn take_regions(&mut self, width: i32, height: i32) -> Vec<Rect> {
        if self.force_full {
            self.force_full = false;
            self.regions.clear();
            if width > 0 && height > 0 {
                if let Some(full) = Rect::new(0, 0, width, height) {
                    return vec![full];
                }
            }
            Vec::new()
        } else {
            self.regions
                .drain(..)
                .filter_map(|rect| rect.clamp_to_bounds(width, height))
                .collect()
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::draw::shape::{Point, ShapeKind};

    #[test]
    fn mark_bounds_records_rectangles() {
        let mut tracker = DirtyTracker::new();
        tracker.mark_bounds(ShapeKind::Line.bounds(
            Point::new(0.0, 0.0),
            Point::new(10.0, 10.0),
            2.0,
        ));
        assert!(tracker.is_dirty());

        let rects = tracker.take_regions(100, 100);
        assert_eq!(rects.len(), 1);
        assert!(rects[0].width > 0);
        assert!(rects[0].height > 0);
        assert!(!tracker.is_dirty());
    }

    #[test]
    fn mark_full_takes_precedence() {
        let mut tracker = DirtyTracker::new();
        tracker.mark_rect(Rect::new(5, 5, 10, 10).unwrap());
        tracker.mark_full();
        tracker.mark_rect(Rect::new(20, 20, 15, 15).unwrap());

        let rects = tracker.take_regions(200, 100);
        assert_eq!(rects.len(), 1);
        assert_eq!(rects[0], Rect::new(0, 0, 200, 100).unwrap());
    }

    #[test]
    fn regions_outside_canvas_are_dropped() {
        let mut tracker = DirtyTracker::new();
        tracker.mark_rect(Rect::new(500, 500, 10, 10).unwrap());
        tracker.mark_rect(Rect::new(-5, -5, 10, 10).unwrap());
        let rects = tracker.take_regions(100, 100);
        assert_eq!(rects, vec![Rect::new(0, 0, 5, 5).unwrap()]);
    }

    #[test]
    fn long_drags_collapse_to_full_damage() {
        let mut tracker = DirtyTracker::new();
        for i in 0..=MAX_REGIONS as i32 {
            tracker.mark_rect(Rect::new(i, 0, 1, 1).unwrap());
        }
        assert_eq!(tracker.regions.len(), 0);
        assert_eq!(tracker.take_regions(10, 10), vec![Rect::new(0, 0, 10, 10).unwrap()]);
    }
}
