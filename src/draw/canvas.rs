//! The drawing engine's owned state: committed surface, preview overlay and history.

use super::color::Color;
use super::dirty::DirtyTracker;
use super::error::EngineError;
use super::history::{HistoryOptions, HistoryStore};
use super::preview::PreviewLayer;
use super::raster::Raster;
use super::render;
use super::shape::{self, Point, ShapeKind, StrokeStyle};
use super::surface::Surface;
use crate::util::Rect;

/// Construction options for a [`Canvas`].
#[derive(Debug, Clone)]
pub struct CanvasOptions {
    pub background: Color,
    pub history: HistoryOptions,
    pub dash_pattern: Vec<f64>,
}

impl Default for CanvasOptions {
    fn default() -> Self {
        Self {
            background: super::color::WHITE,
            history: HistoryOptions::default(),
            dash_pattern: super::preview::DEFAULT_DASH_PATTERN.to_vec(),
        }
    }
}

/// A surface, its preview layer and its undo history, kept in lockstep.
///
/// The history always holds at least one snapshot, and the snapshot under
/// the cursor matches the surface whenever no interaction is live. Resizing
/// replaces both buffers and resets the history to a single fresh snapshot.
pub struct Canvas {
    surface: Surface,
    preview: PreviewLayer,
    history: HistoryStore,
    dirty: DirtyTracker,
    preview_bounds: Option<Rect>,
}

impl Canvas {
    /// Creates a canvas filled with the background and records it as the initial snapshot.
    pub fn new(width: u32, height: u32, options: CanvasOptions) -> Result<Self, EngineError> {
        let surface = Surface::new(width, height, options.background)?;
        let preview = PreviewLayer::new(width, height)?.with_dash_pattern(&options.dash_pattern);
        let mut history = HistoryStore::new(options.history);
        history.push(surface.export_pixels()?)?;

        let mut dirty = DirtyTracker::new();
        dirty.mark_full();

        log::info!("Canvas created: {}x{}", width, height);
        Ok(Self {
            surface,
            preview,
            history,
            dirty,
            preview_bounds: None,
        })
    }

    pub fn width(&self) -> u32 {
        self.surface.width()
    }

    pub fn height(&self) -> u32 {
        self.surface.height()
    }

    pub fn surface(&self) -> &Surface {
        &self.surface
    }

    pub fn preview(&self) -> &PreviewLayer {
        &self.preview
    }

    pub fn history(&self) -> &HistoryStore {
        &self.history
    }

    /// Paints a stroke segment straight onto the committed surface.
    pub fn draw_segment(
        &mut self,
        from: Point,
        to: Point,
        style: &StrokeStyle,
        erasing: bool,
    ) -> Result<(), EngineError> {
        self.surface.draw_segment(from, to, style, erasing)?;
        self.dirty.mark_bounds(shape::segment_bounds(from, to, style.width));
        Ok(())
    }

    /// Replaces the preview with a dashed outline. The surface is untouched.
    pub fn draw_preview(
        &mut self,
        kind: ShapeKind,
        from: Point,
        to: Point,
        style: &StrokeStyle,
    ) -> Result<(), EngineError> {
        self.preview.draw_dashed_shape(kind, from, to, style)?;
        let bounds = kind.bounds(from, to, style.width);
        if let Some(previous) = self.preview_bounds.take() {
            self.dirty.mark_rect(previous);
        }
        self.dirty.mark_bounds(bounds);
        self.preview_bounds = bounds;
        Ok(())
    }

    /// Wipes the preview layer back to transparent.
    pub fn clear_preview(&mut self) -> Result<(), EngineError> {
        if let Some(previous) = self.preview_bounds.take() {
            self.dirty.mark_rect(previous);
        }
        self.preview.clear()
    }

    /// Paints the solid outline of a finished shape onto the surface.
    pub fn draw_shape(
        &mut self,
        kind: ShapeKind,
        from: Point,
        to: Point,
        style: &StrokeStyle,
    ) -> Result<(), EngineError> {
        self.surface.draw_shape(kind, from, to, style)?;
        self.dirty.mark_bounds(kind.bounds(from, to, style.width));
        Ok(())
    }

    /// Records the current surface contents as a new history entry.
    pub fn commit(&mut self) -> Result<(), EngineError> {
        self.history.push(self.surface.export_pixels()?)
    }

    /// Restores the surface to the snapshot under the history cursor.
    ///
    /// Used to throw away uncommitted stroke pixels.
    pub fn revert_uncommitted(&mut self) -> Result<(), EngineError> {
        if let Some(snapshot) = self.history.current()? {
            self.surface.restore(&snapshot)?;
            self.dirty.mark_full();
        }
        Ok(())
    }

    /// Fills the surface with the background and records it as one edit.
    pub fn clear(&mut self) -> Result<(), EngineError> {
        self.surface.clear()?;
        self.dirty.mark_full();
        self.commit()
    }

    /// Steps back one history entry and restores it onto the surface.
    ///
    /// The cursor only moves once the restore succeeded.
    pub fn undo(&mut self) -> Result<(), EngineError> {
        let snapshot = self.history.peek_undo()?;
        self.surface.restore(&snapshot)?;
        self.history.step_back();
        self.dirty.mark_full();
        log::debug!("Undo: cursor now {}", self.history.cursor());
        Ok(())
    }

    /// Steps forward one history entry and restores it onto the surface.
    pub fn redo(&mut self) -> Result<(), EngineError> {
        let snapshot = self.history.peek_redo()?;
        self.surface.restore(&snapshot)?;
        self.history.step_forward();
        self.dirty.mark_full();
        log::debug!("Redo: cursor now {}", self.history.cursor());
        Ok(())
    }

    /// Reallocates surface and preview at the new size.
    ///
    /// The new surface is filled with the background and becomes the only
    /// history entry; earlier snapshots cannot be restored afterwards.
    pub fn resize(&mut self, width: u32, height: u32) -> Result<(), EngineError> {
        self.surface.resize(width, height)?;
        self.preview.resize(width, height)?;
        self.preview_bounds = None;
        self.history.reset(self.surface.export_pixels()?)?;
        self.dirty.mark_full();
        log::info!("Canvas resized to {}x{}; history reset", width, height);
        Ok(())
    }

    /// Immutable copy of the committed pixels. The preview is never included.
    pub fn export_pixels(&self) -> Result<Raster, EngineError> {
        self.surface.export_pixels()
    }

    /// Paints the visible image (surface, then preview `Over` it) onto `ctx`.
    pub fn render_to(&self, ctx: &cairo::Context) -> Result<(), EngineError> {
        ctx.save()?;
        ctx.set_operator(cairo::Operator::Over);
        ctx.set_source_surface(self.surface.image(), 0.0, 0.0)?;
        ctx.paint()?;
        if !self.preview.is_clear() {
            ctx.set_source_surface(self.preview.image(), 0.0, 0.0)?;
            ctx.paint()?;
        }
        ctx.restore()?;
        Ok(())
    }

    /// Flattens what the user currently sees into a raster.
    pub fn composite(&self) -> Result<Raster, EngineError> {
        let image = render::allocate_image(self.width(), self.height())?;
        {
            let ctx = cairo::Context::new(&image)?;
            self.render_to(&ctx)?;
        }
        render::snapshot_image(&image)
    }

    /// Drains the regions changed since the last call, for partial repaints.
    pub fn take_damage(&mut self) -> Vec<Rect> {
        if !self.dirty.is_dirty() {
            return Vec::new();
        }
        self.dirty
            .take_regions(self.width() as i32, self.height() as i32)
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::draw::color::{BLACK, RED, WHITE};

    fn canvas(width: u32, height: u32) -> Canvas {
        Canvas::new(width, height, CanvasOptions::default()).unwrap()
    }

    #[test]
    fn new_canvas_has_initial_snapshot() {
        let canvas = canvas(20, 10);
        assert_eq!(canvas.history().len(), 1);
        assert_eq!(canvas.history().cursor(), 0);
        assert!(canvas.preview().is_clear());
        assert_eq!(
            canvas.export_pixels().unwrap().pixel(19, 9),
            Some([255, 255, 255, 255])
        );
    }

    #[test]
    fn zero_size_is_rejected() {
        assert!(matches!(
            Canvas::new(0, 10, CanvasOptions::default()),
            Err(EngineError::InvalidDimensions { .. })
        ));
    }

    #[test]
    fn composite_includes_preview_but_export_does_not() {
        let mut canvas = canvas(40, 40);
        canvas
            .draw_preview(
                ShapeKind::Line,
                Point::new(0.0, 20.0),
                Point::new(40.0, 20.0),
                &StrokeStyle::new(RED, 4.0),
            )
            .unwrap();

        assert_eq!(canvas.composite().unwrap().pixel(2, 20), Some([255, 0, 0, 255]));
        assert_eq!(
            canvas.export_pixels().unwrap().pixel(2, 20),
            Some([255, 255, 255, 255])
        );
        assert_eq!(canvas.history().len(), 1);
    }

    #[test]
    fn clear_is_one_history_entry() {
        let mut canvas = canvas(10, 10);
        canvas
            .draw_segment(Point::new(1.0, 1.0), Point::new(9.0, 9.0), &StrokeStyle::new(BLACK, 2.0), false)
            .unwrap();
        canvas.commit().unwrap();
        canvas.clear().unwrap();
        assert_eq!(canvas.history().len(), 3);

        canvas.undo().unwrap();
        assert_eq!(canvas.export_pixels().unwrap().pixel(5, 5), Some([0, 0, 0, 255]));
    }

    #[test]
    fn undo_redo_restore_surface() {
        let mut canvas = canvas(10, 10);
        let blank = canvas.export_pixels().unwrap();
        canvas
            .draw_segment(Point::new(0.0, 5.0), Point::new(10.0, 5.0), &StrokeStyle::new(RED, 3.0), false)
            .unwrap();
        canvas.commit().unwrap();
        let drawn = canvas.export_pixels().unwrap();

        canvas.undo().unwrap();
        assert_eq!(canvas.export_pixels().unwrap(), blank);
        canvas.redo().unwrap();
        assert_eq!(canvas.export_pixels().unwrap(), drawn);
        assert!(matches!(canvas.redo(), Err(EngineError::EmptyHistory)));
    }

    #[test]
    fn failed_restore_leaves_cursor_on_visible_snapshot() {
        let mut canvas = canvas(10, 10);
        let blank = canvas.export_pixels().unwrap();
        canvas
            .draw_segment(Point::new(0.0, 5.0), Point::new(10.0, 5.0), &StrokeStyle::new(RED, 3.0), false)
            .unwrap();
        canvas.commit().unwrap();
        let drawn = canvas.export_pixels().unwrap();

        // A second handle makes the pixel buffer non-exclusive
        let held = canvas.surface.image().clone();
        assert!(matches!(canvas.undo(), Err(EngineError::Borrow(_))));
        assert_eq!(canvas.history().cursor(), 1);
        assert_eq!(canvas.export_pixels().unwrap(), drawn);
        drop(held);

        canvas.undo().unwrap();
        assert_eq!(canvas.history().cursor(), 0);
        assert_eq!(canvas.export_pixels().unwrap(), blank);

        let held = canvas.surface.image().clone();
        assert!(matches!(canvas.redo(), Err(EngineError::Borrow(_))));
        assert_eq!(canvas.history().cursor(), 0);
        assert_eq!(canvas.export_pixels().unwrap(), blank);
        drop(held);

        canvas.redo().unwrap();
        assert_eq!(canvas.export_pixels().unwrap(), drawn);
    }

    #[test]
    fn revert_uncommitted_drops_live_stroke_pixels() {
        let mut canvas = canvas(10, 10);
        let blank = canvas.export_pixels().unwrap();
        canvas
            .draw_segment(Point::new(5.0, 5.0), Point::new(5.0, 5.0), &StrokeStyle::new(BLACK, 4.0), false)
            .unwrap();
        canvas.revert_uncommitted().unwrap();
        assert_eq!(canvas.export_pixels().unwrap(), blank);
        assert_eq!(canvas.history().len(), 1);
    }

    #[test]
    fn resize_resets_history() {
        let mut canvas = canvas(10, 10);
        for _ in 0..5 {
            canvas.clear().unwrap();
        }
        assert_eq!(canvas.history().len(), 6);
        canvas.resize(30, 20).unwrap();
        assert_eq!(canvas.history().len(), 1);
        assert_eq!((canvas.width(), canvas.height()), (30, 20));
        assert_eq!(canvas.preview().export_pixels().unwrap().width(), 30);
        assert!(matches!(canvas.undo(), Err(EngineError::EmptyHistory)));
    }

    #[test]
    fn damage_tracks_strokes_and_full_repaints() {
        let mut canvas = canvas(100, 100);
        assert_eq!(canvas.take_damage(), vec![Rect::new(0, 0, 100, 100).unwrap()]);

        canvas
            .draw_segment(Point::new(10.0, 10.0), Point::new(20.0, 10.0), &StrokeStyle::new(WHITE, 4.0), false)
            .unwrap();
        let damage = canvas.take_damage();
        assert_eq!(damage.len(), 1);
        assert!(damage[0].contains(15, 10));
        assert!(!damage[0].contains(50, 50));
        assert!(canvas.take_damage().is_empty());
    }
}
