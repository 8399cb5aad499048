//! Cairo-based path construction and fill helpers.
//!
//! The surface and the preview layer share these so that a committed shape
//! and its dashed preview always trace exactly the same geometry.

use super::color::Color;
use super::error::EngineError;
use super::raster::Raster;
use super::shape::{Point, ShapeKind, StrokeStyle};
use crate::util;
use std::f64::consts::PI;

/// Allocates an `ARgb32` image surface, rejecting empty or oversized dimensions.
pub(crate) fn allocate_image(width: u32, height: u32) -> Result<cairo::ImageSurface, EngineError> {
    let invalid = || EngineError::InvalidDimensions { width, height };
    if width == 0 || height == 0 {
        return Err(invalid());
    }
    let w = i32::try_from(width).map_err(|_| invalid())?;
    let h = i32::try_from(height).map_err(|_| invalid())?;
    Ok(cairo::ImageSurface::create(cairo::Format::ARgb32, w, h)?)
}

/// Copies the current contents of `image` into an immutable [`Raster`].
///
/// Paints into a scratch surface so the caller only needs shared access to
/// the source image.
pub(crate) fn snapshot_image(image: &cairo::ImageSurface) -> Result<Raster, EngineError> {
    let mut copy = cairo::ImageSurface::create(cairo::Format::ARgb32, image.width(), image.height())?;
    {
        let ctx = cairo::Context::new(&copy)?;
        ctx.set_operator(cairo::Operator::Source);
        ctx.set_source_surface(image, 0.0, 0.0)?;
        ctx.paint()?;
    }

    let width = copy.width() as u32;
    let height = copy.height() as u32;
    let stride = copy.stride() as usize;
    let data = copy.data()?;
    Raster::from_argb32(width, height, stride, &data).ok_or(EngineError::InvalidDimensions { width, height })
}

/// Fills the whole target with `color`, replacing (not blending) existing pixels.
pub(crate) fn fill_solid(ctx: &cairo::Context, color: Color) -> Result<(), EngineError> {
    ctx.save()?;
    ctx.set_operator(cairo::Operator::Source);
    ctx.set_source_rgba(color.r, color.g, color.b, color.a);
    ctx.paint()?;
    ctx.restore()?;
    Ok(())
}

/// Resets every pixel of the target to fully transparent.
pub(crate) fn clear_transparent(ctx: &cairo::Context) -> Result<(), EngineError> {
    ctx.save()?;
    ctx.set_operator(cairo::Operator::Clear);
    ctx.paint()?;
    ctx.restore()?;
    Ok(())
}

/// Applies color, width and round caps/joins for a committed stroke.
pub(crate) fn apply_stroke_style(ctx: &cairo::Context, style: &StrokeStyle) {
    let color = style.color;
    ctx.set_source_rgba(color.r, color.g, color.b, color.a);
    ctx.set_line_width(style.width);
    ctx.set_line_cap(cairo::LineCap::Round);
    ctx.set_line_join(cairo::LineJoin::Round);
}

/// Traces a single segment. A zero-length segment becomes a round dot when
/// stroked with round caps.
pub(crate) fn trace_segment(ctx: &cairo::Context, from: Point, to: Point) {
    ctx.new_path();
    ctx.move_to(from.x, from.y);
    ctx.line_to(to.x, to.y);
}

/// Traces the outline of `kind` between the two drag points.
///
/// - Line: `from` and `to` are the endpoints
/// - Rectangle: `from` and `to` are opposite corners, in any order
/// - Ellipse: `from` is the center, the radius is the distance to `to`
pub(crate) fn trace_shape(ctx: &cairo::Context, kind: ShapeKind, from: Point, to: Point) {
    ctx.new_path();
    match kind {
        ShapeKind::Line => {
            ctx.move_to(from.x, from.y);
            ctx.line_to(to.x, to.y);
        }
        ShapeKind::Rectangle => {
            let (x, y, w, h) = util::normalized_rect(from.x, from.y, to.x, to.y);
            ctx.rectangle(x, y, w, h);
        }
        ShapeKind::Ellipse => {
            let radius = from.distance_to(to);
            ctx.new_sub_path();
            ctx.arc(from.x, from.y, radius, 0.0, 2.0 * PI);
            ctx.close_path();
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::draw::color::{RED, WHITE};

    #[test]
    fn allocate_rejects_empty_dimensions() {
        assert!(matches!(
            allocate_image(0, 10),
            Err(EngineError::InvalidDimensions { width: 0, height: 10 })
        ));
        assert!(allocate_image(u32::MAX, 1).is_err());
    }

    #[test]
    fn snapshot_copies_painted_pixels() {
        let image = allocate_image(4, 3).unwrap();
        {
            let ctx = cairo::Context::new(&image).unwrap();
            fill_solid(&ctx, RED).unwrap();
        }
        let raster = snapshot_image(&image).unwrap();
        assert_eq!((raster.width(), raster.height()), (4, 3));
        assert_eq!(raster.pixel(3, 2), Some([255, 0, 0, 255]));
    }

    #[test]
    fn clear_transparent_wipes_alpha() {
        let image = allocate_image(2, 2).unwrap();
        {
            let ctx = cairo::Context::new(&image).unwrap();
            fill_solid(&ctx, WHITE).unwrap();
            clear_transparent(&ctx).unwrap();
        }
        let raster = snapshot_image(&image).unwrap();
        assert_eq!(raster.pixel(0, 0), Some([0, 0, 0, 0]));
    }
}
