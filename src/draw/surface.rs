//! The committed raster surface.

use super::color::Color;
use super::error::EngineError;
use super::raster::Raster;
use super::render;
use super::shape::{Point, ShapeKind, StrokeStyle};

/// Owns the committed pixel buffer of a drawing session.
///
/// Every drawing call writes straight into the buffer; there is no retained
/// list of shapes. The buffer starts out (and is reset to) an opaque
/// background color. Dimensions only change through [`Surface::resize`], which
/// is a hard reset of the contents.
pub struct Surface {
    image: cairo::ImageSurface,
    width: u32,
    height: u32,
    background: Color,
}

impl Surface {
    /// Allocates a `width` x `height` surface filled with `background`.
    ///
    /// The background is forced opaque so that erasing and clearing always
    /// produce fully covered pixels.
    pub fn new(width: u32, height: u32, background: Color) -> Result<Self, EngineError> {
        let mut surface = Self {
            image: render::allocate_image(width, height)?,
            width,
            height,
            background: background.opaque(),
        };
        surface.clear()?;
        Ok(surface)
    }

    pub fn width(&self) -> u32 {
        self.width
    }

    pub fn height(&self) -> u32 {
        self.height
    }

    /// The opaque color used by clear, resize and the eraser.
    pub fn background(&self) -> Color {
        self.background
    }

    /// Reallocates the buffer at the new size and fills it with the background.
    ///
    /// Previous contents are discarded. Callers owning a history must reset it,
    /// since older snapshots no longer match these dimensions.
    pub fn resize(&mut self, width: u32, height: u32) -> Result<(), EngineError> {
        self.image = render::allocate_image(width, height)?;
        self.width = width;
        self.height = height;
        self.clear()?;
        log::debug!("Surface resized to {}x{}", width, height);
        Ok(())
    }

    /// Paints one round-capped, round-joined segment of a freehand or eraser stroke.
    ///
    /// When `erasing` is set the segment is painted in the background color,
    /// replacing whatever was underneath.
    pub fn draw_segment(
        &mut self,
        from: Point,
        to: Point,
        style: &StrokeStyle,
        erasing: bool,
    ) -> Result<(), EngineError> {
        let ctx = cairo::Context::new(&self.image)?;
        if erasing {
            render::apply_stroke_style(&ctx, &StrokeStyle::new(self.background, style.width));
            ctx.set_operator(cairo::Operator::Source);
        } else {
            render::apply_stroke_style(&ctx, style);
        }
        render::trace_segment(&ctx, from, to);
        ctx.stroke()?;
        Ok(())
    }

    /// Paints the solid outline of a line, rectangle or ellipse in one call.
    pub fn draw_shape(
        &mut self,
        kind: ShapeKind,
        from: Point,
        to: Point,
        style: &StrokeStyle,
    ) -> Result<(), EngineError> {
        let ctx = cairo::Context::new(&self.image)?;
        render::apply_stroke_style(&ctx, style);
        render::trace_shape(&ctx, kind, from, to);
        ctx.stroke()?;
        Ok(())
    }

    /// Fills the whole buffer with the background color.
    pub fn clear(&mut self) -> Result<(), EngineError> {
        let ctx = cairo::Context::new(&self.image)?;
        render::fill_solid(&ctx, self.background)
    }

    /// Replaces the buffer contents with a snapshot.
    ///
    /// The snapshot must come from a surface of the same dimensions; anything
    /// else is rejected with [`EngineError::DimensionMismatch`] and the
    /// current contents are left untouched.
    pub fn restore(&mut self, snapshot: &Raster) -> Result<(), EngineError> {
        let stride = self.image.stride() as usize;
        if snapshot.width() != self.width
            || snapshot.height() != self.height
            || snapshot.stride() != stride
        {
            return Err(EngineError::DimensionMismatch {
                expected_width: self.width,
                expected_height: self.height,
                found_width: snapshot.width(),
                found_height: snapshot.height(),
            });
        }

        let mut data = self.image.data()?;
        data.copy_from_slice(snapshot.bytes());
        Ok(())
    }

    /// Returns an immutable copy of the committed pixels.
    pub fn export_pixels(&self) -> Result<Raster, EngineError> {
        render::snapshot_image(&self.image)
    }

    /// The backing Cairo image. Hosts composite through [`super::Canvas::render_to`].
    pub(crate) fn image(&self) -> &cairo::ImageSurface {
        &self.image
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::draw::color::{BLACK, RED, WHITE};

    fn style(color: Color, width: f64) -> StrokeStyle {
        StrokeStyle::new(color, width)
    }

    #[test]
    fn new_surface_is_opaque_background() {
        let surface = Surface::new(10, 8, Color::new(1.0, 1.0, 1.0, 0.2)).unwrap();
        let pixels = surface.export_pixels().unwrap();
        assert_eq!(pixels.pixel(0, 0), Some([255, 255, 255, 255]));
        assert_eq!(pixels.pixel(9, 7), Some([255, 255, 255, 255]));
        assert!(surface.background().is_opaque());
    }

    #[test]
    fn zero_length_segment_leaves_a_dot() {
        let mut surface = Surface::new(20, 20, WHITE).unwrap();
        let p = Point::new(10.0, 10.0);
        surface.draw_segment(p, p, &style(BLACK, 6.0), false).unwrap();

        let pixels = surface.export_pixels().unwrap();
        assert_eq!(pixels.pixel(10, 10), Some([0, 0, 0, 255]));
        assert_eq!(pixels.pixel(0, 0), Some([255, 255, 255, 255]));
    }

    #[test]
    fn erasing_paints_background() {
        let mut surface = Surface::new(20, 20, WHITE).unwrap();
        let a = Point::new(2.0, 10.0);
        let b = Point::new(18.0, 10.0);
        surface.draw_segment(a, b, &style(RED, 6.0), false).unwrap();
        assert_eq!(surface.export_pixels().unwrap().pixel(10, 10), Some([255, 0, 0, 255]));

        surface.draw_segment(a, b, &style(RED, 8.0), true).unwrap();
        assert_eq!(
            surface.export_pixels().unwrap().pixel(10, 10),
            Some([255, 255, 255, 255])
        );
    }

    #[test]
    fn rectangle_outline_leaves_interior_untouched() {
        let mut surface = Surface::new(40, 40, WHITE).unwrap();
        surface
            .draw_shape(
                ShapeKind::Rectangle,
                Point::new(30.0, 30.0),
                Point::new(10.0, 10.0),
                &style(BLACK, 2.0),
            )
            .unwrap();
        let pixels = surface.export_pixels().unwrap();
        assert_eq!(pixels.pixel(10, 20), Some([0, 0, 0, 255]));
        assert_eq!(pixels.pixel(20, 20), Some([255, 255, 255, 255]));
    }

    #[test]
    fn ellipse_radius_is_distance_to_pointer() {
        let mut surface = Surface::new(60, 60, WHITE).unwrap();
        surface
            .draw_shape(
                ShapeKind::Ellipse,
                Point::new(30.0, 30.0),
                Point::new(30.0, 50.0),
                &style(BLACK, 2.0),
            )
            .unwrap();
        let pixels = surface.export_pixels().unwrap();
        // Outline crosses the axes at radius 20.
        assert_eq!(pixels.pixel(49, 30).map(|p| p[0] < 128), Some(true));
        assert_eq!(pixels.pixel(30, 10).map(|p| p[0] < 128), Some(true));
        assert_eq!(pixels.pixel(30, 30), Some([255, 255, 255, 255]));
    }

    #[test]
    fn restore_rejects_mismatched_snapshot() {
        let mut surface = Surface::new(10, 10, WHITE).unwrap();
        let other = Surface::new(12, 10, BLACK).unwrap().export_pixels().unwrap();

        let err = surface.restore(&other).unwrap_err();
        assert!(matches!(
            err,
            EngineError::DimensionMismatch {
                expected_width: 10,
                found_width: 12,
                ..
            }
        ));
        assert_eq!(
            surface.export_pixels().unwrap().pixel(0, 0),
            Some([255, 255, 255, 255])
        );
    }

    #[test]
    fn restore_replaces_contents() {
        let mut surface = Surface::new(10, 10, WHITE).unwrap();
        let blank = surface.export_pixels().unwrap();
        surface
            .draw_segment(Point::new(0.0, 5.0), Point::new(10.0, 5.0), &style(RED, 4.0), false)
            .unwrap();
        assert_ne!(surface.export_pixels().unwrap(), blank);

        surface.restore(&blank).unwrap();
        assert_eq!(surface.export_pixels().unwrap(), blank);
    }

    #[test]
    fn resize_resets_contents_and_dimensions() {
        let mut surface = Surface::new(10, 10, WHITE).unwrap();
        surface
            .draw_segment(Point::new(0.0, 0.0), Point::new(10.0, 10.0), &style(RED, 4.0), false)
            .unwrap();
        surface.resize(25, 15).unwrap();

        let pixels = surface.export_pixels().unwrap();
        assert_eq!((pixels.width(), pixels.height()), (25, 15));
        assert!(
            (0..25).all(|x| (0..15).all(|y| pixels.pixel(x, y) == Some([255, 255, 255, 255])))
        );
        assert!(surface.resize(0, 5).is_err());
    }
}
