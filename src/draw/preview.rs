//! Transient overlay for in-progress shape feedback.

use super::error::EngineError;
use super::raster::Raster;
use super::render;
use super::shape::{Point, ShapeKind, StrokeStyle};

/// Dash pattern used when no configuration overrides it.
pub const DEFAULT_DASH_PATTERN: [f64; 2] = [5.0, 5.0];

/// A transparent buffer the size of the surface, drawn on only while a shape
/// tool is being dragged.
///
/// The preview never writes into the committed surface and never appears in
/// history or export; it is composited on top of the surface for display.
pub struct PreviewLayer {
    image: cairo::ImageSurface,
    dash_pattern: Vec<f64>,
    is_clear: bool,
}

impl PreviewLayer {
    /// Allocates a fully transparent layer.
    pub fn new(width: u32, height: u32) -> Result<Self, EngineError> {
        Ok(Self {
            image: render::allocate_image(width, height)?,
            dash_pattern: DEFAULT_DASH_PATTERN.to_vec(),
            is_clear: true,
        })
    }

    /// Overrides the dash pattern used for previews.
    ///
    /// Patterns that Cairo would reject (empty, negative or all-zero entries)
    /// fall back to the default.
    pub fn with_dash_pattern(mut self, pattern: &[f64]) -> Self {
        self.dash_pattern = if valid_dash_pattern(pattern) {
            pattern.to_vec()
        } else {
            log::warn!("Ignoring invalid dash pattern {:?}", pattern);
            DEFAULT_DASH_PATTERN.to_vec()
        };
        self
    }

    pub fn dash_pattern(&self) -> &[f64] {
        &self.dash_pattern
    }

    /// Recreates the buffer at the new size. The layer is transparent afterwards.
    pub fn resize(&mut self, width: u32, height: u32) -> Result<(), EngineError> {
        self.image = render::allocate_image(width, height)?;
        self.is_clear = true;
        Ok(())
    }

    /// Resets the layer to fully transparent.
    pub fn clear(&mut self) -> Result<(), EngineError> {
        if self.is_clear {
            return Ok(());
        }
        let ctx = cairo::Context::new(&self.image)?;
        render::clear_transparent(&ctx)?;
        self.is_clear = true;
        Ok(())
    }

    /// Whether the layer currently holds no preview.
    pub fn is_clear(&self) -> bool {
        self.is_clear
    }

    /// Renders a dashed outline of `kind`, replacing the previous preview frame.
    ///
    /// Uses the same geometry as [`super::Surface::draw_shape`].
    pub fn draw_dashed_shape(
        &mut self,
        kind: ShapeKind,
        from: Point,
        to: Point,
        style: &StrokeStyle,
    ) -> Result<(), EngineError> {
        self.is_clear = false;
        let ctx = cairo::Context::new(&self.image)?;
        render::clear_transparent(&ctx)?;

        render::apply_stroke_style(&ctx, style);
        ctx.set_line_cap(cairo::LineCap::Butt);
        ctx.set_dash(&self.dash_pattern, 0.0);
        render::trace_shape(&ctx, kind, from, to);
        ctx.stroke()?;
        Ok(())
    }

    /// Copies the current preview pixels (mainly for inspection in tests).
    pub fn export_pixels(&self) -> Result<Raster, EngineError> {
        render::snapshot_image(&self.image)
    }

    /// The backing Cairo image, for compositing.
    pub(crate) fn image(&self) -> &cairo::ImageSurface {
        &self.image
    }
}

fn valid_dash_pattern(pattern: &[f64]) -> bool {
    !pattern.is_empty()
        && pattern.iter().all(|v| v.is_finite() && *v >= 0.0)
        && pattern.iter().any(|v| *v > 0.0)
}
