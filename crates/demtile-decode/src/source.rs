//! Raw pixel sources handed to the decoder.
//!
//! A tile arrives either as a still-compressed bitmap (PNG or WebP bytes
//! straight off the network) or as pixels somebody already decoded. Both go
//! through [`PixelSource::to_rgba`] so the decoder never cares which it got.

use std::borrow::Cow;

use image::RgbaImage;

use crate::error::DecodeResult;

/// A raw DEM pixel source.
#[derive(Debug, Clone)]
pub enum PixelSource {
    /// Encoded image bytes that still need decompressing.
    RawBitmap(Vec<u8>),
    /// An already decoded RGBA pixel array.
    Decoded(RgbaImage),
}

impl PixelSource {
    /// Produce the RGBA pixels of this source.
    ///
    /// Decoded sources are borrowed; bitmaps are decompressed.
    pub fn to_rgba(&self) -> DecodeResult<Cow<'_, RgbaImage>> {
        match self {
            Self::RawBitmap(bytes) => {
                let image = image::load_from_memory(bytes)?;
                Ok(Cow::Owned(image.into_rgba8()))
            }
            Self::Decoded(image) => Ok(Cow::Borrowed(image)),
        }
    }
}

impl From<RgbaImage> for PixelSource {
    fn from(image: RgbaImage) -> Self {
        Self::Decoded(image)
    }
}

/// Everything the decoder needs for one tile.
#[derive(Debug, Clone)]
pub struct RawTile {
    /// Elevation pixels, optionally with the stats band appended as the
    /// rightmost column.
    pub pixels: PixelSource,
    /// Stats band supplied separately (4 bytes per slot). Takes precedence
    /// over an appended column.
    pub stats: Option<Vec<u8>>,
}

impl RawTile {
    /// Create a raw tile whose stats band is appended to the pixels.
    #[must_use]
    pub fn new(pixels: impl Into<PixelSource>) -> Self {
        Self {
            pixels: pixels.into(),
            stats: None,
        }
    }

    /// Attach a separately supplied stats band.
    #[must_use]
    pub fn with_stats(mut self, stats: Vec<u8>) -> Self {
        self.stats = Some(stats);
        self
    }
}

/// How pixels outside the source are filled when a padding ring has to be
/// synthesized for a legacy unpadded tile.
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq)]
pub enum EdgeFill {
    /// Repeat the nearest edge pixel.
    #[default]
    Replicate,
    /// Leave the ring as transparent black.
    Zero,
}

/// Copy a `width` x `height` region starting at the signed origin `(x0, y0)`.
///
/// Only pixels inside `bounds` (clamped to the image) count as present;
/// everything else is filled according to `fill`.
#[allow(clippy::cast_sign_loss, clippy::cast_possible_truncation)]
pub(crate) fn extract_region(
    image: &RgbaImage,
    (x0, y0): (i32, i32),
    (width, height): (u32, u32),
    bounds: (u32, u32),
    fill: EdgeFill,
) -> Vec<u8> {
    let bound_w = i64::from(bounds.0.min(image.width()));
    let bound_h = i64::from(bounds.1.min(image.height()));
    let mut out = Vec::with_capacity(width as usize * height as usize * 4);

    for row in 0..height {
        let sy = i64::from(y0) + i64::from(row);
        for col in 0..width {
            let sx = i64::from(x0) + i64::from(col);
            let inside = (0..bound_w).contains(&sx) && (0..bound_h).contains(&sy);

            let source = if inside {
                Some((sx, sy))
            } else if fill == EdgeFill::Replicate && bound_w > 0 && bound_h > 0 {
                Some((sx.clamp(0, bound_w - 1), sy.clamp(0, bound_h - 1)))
            } else {
                None
            };

            match source {
                // Both coordinates are within the image after the checks above.
                Some((px, py)) => out.extend_from_slice(&image.get_pixel(px as u32, py as u32).0),
                None => out.extend_from_slice(&[0; 4]),
            }
        }
    }

    out
}

#[cfg(test)]
mod tests {
    use super::*;
    use image::Rgba;

    fn gradient(width: u32, height: u32) -> RgbaImage {
        RgbaImage::from_fn(width, height, |x, y| Rgba([x as u8, y as u8, 0, 255]))
    }

    #[test]
    fn test_decoded_source_is_borrowed() {
        let source = PixelSource::from(gradient(2, 2));
        assert!(matches!(source.to_rgba().unwrap(), Cow::Borrowed(_)));
    }

    #[test]
    fn test_raw_bitmap_round_trip() {
        let image = gradient(3, 2);
        let mut png = Vec::new();
        image
            .write_to(&mut std::io::Cursor::new(&mut png), image::ImageFormat::Png)
            .unwrap();

        let source = PixelSource::RawBitmap(png);
        let decoded = source.to_rgba().unwrap();
        assert_eq!(decoded.dimensions(), (3, 2));
        assert_eq!(decoded.get_pixel(2, 1).0, [2, 1, 0, 255]);
    }

    #[test]
    fn test_raw_bitmap_garbage_fails() {
        let source = PixelSource::RawBitmap(vec![1, 2, 3]);
        let result = source.to_rgba();
        assert!(matches!(result, Err(crate::DecodeError::Image { .. })));
    }

    #[test]
    fn test_extract_offset_replicates_edges() {
        let image = gradient(2, 2);
        let out = extract_region(&image, (-1, -1), (4, 4), (2, 2), EdgeFill::Replicate);
        assert_eq!(out.len(), 4 * 4 * 4);

        // Top-left ring pixel repeats (0, 0).
        assert_eq!(&out[0..4], &[0, 0, 0, 255]);
        // Interior pixel (1, 1) of the output is source (0, 0).
        assert_eq!(&out[(4 + 1) * 4..(4 + 2) * 4], &[0, 0, 0, 255]);
        // Bottom-right ring pixel repeats (1, 1).
        assert_eq!(&out[15 * 4..16 * 4], &[1, 1, 0, 255]);
    }

    #[test]
    fn test_extract_offset_zero_fill() {
        let image = gradient(2, 2);
        let out = extract_region(&image, (-1, -1), (4, 4), (2, 2), EdgeFill::Zero);
        assert_eq!(&out[0..4], &[0, 0, 0, 0]);
        assert_eq!(&out[(2 * 4 + 2) * 4..(2 * 4 + 3) * 4], &[1, 1, 0, 255]);
    }

    #[test]
    fn test_extract_respects_bounds() {
        // The third column is outside the bounds and must not leak into the region.
        let image = gradient(3, 2);
        let out = extract_region(&image, (1, 0), (2, 1), (2, 2), EdgeFill::Replicate);
        assert_eq!(&out[4..8], &[1, 0, 0, 255]);
    }
}
