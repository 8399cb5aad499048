//! Immutable pixel buffer copies used for history snapshots and export.

use super::error::EngineError;
use std::io::Write;
use std::sync::Arc;

/// An immutable copy of a surface's pixels at one point in time.
///
/// Pixels are stored in Cairo's `ARgb32` layout: one native-endian `u32` per
/// pixel, alpha in the high byte, color channels premultiplied by alpha. Rows
/// are `stride` bytes apart. The byte buffer is shared, so cloning a raster is
/// cheap and never lets the holder mutate the surface it came from.
#[derive(Clone, PartialEq, Eq)]
pub struct Raster {
    width: u32,
    height: u32,
    stride: usize,
    data: Arc<[u8]>,
}

impl std::fmt::Debug for Raster {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.debug_struct("Raster")
            .field("width", &self.width)
            .field("height", &self.height)
            .field("stride", &self.stride)
            .field("bytes", &self.data.len())
            .finish()
    }
}

impl Raster {
    /// Wraps raw `ARgb32` bytes.
    ///
    /// Returns `None` if the buffer is too small for the given geometry.
    pub fn from_argb32(width: u32, height: u32, stride: usize, data: &[u8]) -> Option<Self> {
        let needed = stride.checked_mul(height as usize)?;
        if stride < width as usize * 4 || data.len() < needed {
            return None;
        }
        Some(Self {
            width,
            height,
            stride,
            data: Arc::from(&data[..needed]),
        })
    }

    pub fn width(&self) -> u32 {
        self.width
    }

    pub fn height(&self) -> u32 {
        self.height
    }

    /// Number of bytes between the starts of consecutive rows.
    pub fn stride(&self) -> usize {
        self.stride
    }

    /// Raw `ARgb32` bytes, `stride * height` long.
    pub fn bytes(&self) -> &[u8] {
        &self.data
    }

    /// Whether `other` has identical geometry and can be restored in place of `self`.
    pub fn same_geometry(&self, other: &Raster) -> bool {
        self.width == other.width && self.height == other.height && self.stride == other.stride
    }

    /// Returns the straight (non-premultiplied) RGBA value of the pixel at (`x`, `y`).
    pub fn pixel(&self, x: u32, y: u32) -> Option<[u8; 4]> {
        if x >= self.width || y >= self.height {
            return None;
        }
        let offset = y as usize * self.stride + x as usize * 4;
        let bytes: [u8; 4] = self.data[offset..offset + 4].try_into().ok()?;
        let value = u32::from_ne_bytes(bytes);

        let a = (value >> 24) as u8;
        let unpremultiply = |c: u32| -> u8 {
            if a == 0 {
                0
            } else {
                ((c * 255 + a as u32 / 2) / a as u32).min(255) as u8
            }
        };
        Some([
            unpremultiply((value >> 16) & 0xff),
            unpremultiply((value >> 8) & 0xff),
            unpremultiply(value & 0xff),
            a,
        ])
    }

    /// Iterates over the coordinates of pixels that differ from `other`.
    ///
    /// Both rasters must share the same geometry; otherwise nothing is yielded.
    pub fn diff<'a>(&'a self, other: &'a Raster) -> impl Iterator<Item = (u32, u32)> + 'a {
        let comparable = self.same_geometry(other);
        let width = if comparable { self.width } else { 0 };
        let height = if comparable { self.height } else { 0 };
        (0..height).flat_map(move |y| {
            (0..width).filter_map(move |x| {
                let offset = y as usize * self.stride + x as usize * 4;
                (self.data[offset..offset + 4] != other.data[offset..offset + 4]).then_some((x, y))
            })
        })
    }

    /// Size of the pixel payload in bytes.
    pub fn byte_len(&self) -> usize {
        self.data.len()
    }

    /// Rebuilds a Cairo image surface holding a private copy of these pixels.
    pub fn to_image_surface(&self) -> Result<cairo::ImageSurface, EngineError> {
        let surface = cairo::ImageSurface::create_for_data(
            self.data.to_vec(),
            cairo::Format::ARgb32,
            self.width as i32,
            self.height as i32,
            self.stride as i32,
        )?;
        Ok(surface)
    }

    /// Encodes the raster as PNG into `writer`.
    pub fn write_png<W: Write>(&self, writer: &mut W) -> Result<(), EngineError> {
        let surface = self.to_image_surface()?;
        surface.write_to_png(writer).map_err(|err| match err {
            cairo::IoError::Io(io) => EngineError::Io(io),
            cairo::IoError::Cairo(cairo) => EngineError::Cairo(cairo),
        })
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    fn solid(width: u32, height: u32, argb: u32) -> Raster {
        let stride = width as usize * 4;
        let mut data = Vec::with_capacity(stride * height as usize);
        for _ in 0..width * height {
            data.extend_from_slice(&argb.to_ne_bytes());
        }
        Raster::from_argb32(width, height, stride, &data).unwrap()
    }

    #[test]
    fn rejects_short_buffers() {
        assert!(Raster::from_argb32(4, 4, 16, &[0u8; 63]).is_none());
        assert!(Raster::from_argb32(4, 4, 8, &[0u8; 64]).is_none());
    }

    #[test]
    fn pixel_unpremultiplies() {
        let opaque = solid(2, 2, 0xff_ff_00_00);
        assert_eq!(opaque.pixel(1, 1), Some([255, 0, 0, 255]));
        assert_eq!(opaque.pixel(2, 0), None);

        // 50% red premultiplied is 0x80800000
        let half = solid(1, 1, 0x80_80_00_00);
        assert_eq!(half.pixel(0, 0), Some([255, 0, 0, 128]));

        let clear = solid(1, 1, 0);
        assert_eq!(clear.pixel(0, 0), Some([0, 0, 0, 0]));
    }

    #[test]
    fn diff_lists_changed_pixels() {
        let a = solid(3, 3, 0xff_ff_ff_ff);
        let mut bytes = a.bytes().to_vec();
        let offset = a.stride() + 2 * 4;
        bytes[offset..offset + 4].copy_from_slice(&0xff_00_00_00u32.to_ne_bytes());
        let b = Raster::from_argb32(3, 3, a.stride(), &bytes).unwrap();

        assert_eq!(a.diff(&b).collect::<Vec<_>>(), vec![(2, 1)]);
        assert_eq!(a.diff(&a).count(), 0);
        assert_eq!(a.diff(&solid(2, 2, 0)).count(), 0);
    }

    #[test]
    fn png_encoding_writes_signature() {
        let raster = solid(8, 8, 0xff_00_00_ff);
        let mut buffer = Vec::new();
        raster.write_png(&mut buffer).unwrap();
        assert_eq!(&buffer[0..8], &[137, 80, 78, 71, 13, 10, 26, 10]);
    }
}
