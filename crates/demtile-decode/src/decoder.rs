//! Tile decoding: raw pixels in, padded elevation grid out.

use crate::error::{DecodeError, DecodeResult};
use crate::grid::ElevationGrid;
use crate::key::TileKey;
use crate::source::{EdgeFill, RawTile, extract_region};

/// Nominal interior resolution of a DEM tile.
pub const TILE_DIM: u32 = 512;

/// Side length of the padded working buffer.
pub const TILE_STRIDE: u32 = TILE_DIM + 2;

/// Read offset applied when extracting the working buffer from a source of
/// the given height.
///
/// Legacy 512 px tiles carry no border and are read from `(-1, -1)` so a ring
/// is synthesized around them; 514 px tiles are already padded. Any other
/// height is not a DEM tile.
#[must_use]
pub fn padding_for(height: u32) -> Option<i32> {
    match height {
        TILE_DIM => Some(-1),
        TILE_STRIDE => Some(0),
        _ => None,
    }
}

/// Decodes raw DEM tiles into [`ElevationGrid`]s.
#[derive(Debug, Clone, Copy, Default)]
pub struct TileDecoder {
    edge_fill: EdgeFill,
}

impl TileDecoder {
    /// Create a decoder that replicates edge pixels into synthesized rings.
    #[must_use]
    pub fn new() -> Self {
        Self::default()
    }

    /// Choose how the ring of unpadded tiles is filled.
    #[must_use]
    pub fn with_edge_fill(mut self, edge_fill: EdgeFill) -> Self {
        self.edge_fill = edge_fill;
        self
    }

    /// Decode one tile.
    ///
    /// The source must be 512 or 514 pixels tall and either square or one
    /// pixel wider, in which case the extra column is the stats band. A stats
    /// band supplied on the [`RawTile`] wins over an appended column.
    #[allow(clippy::cast_possible_wrap)]
    pub fn decode(&self, key: impl Into<TileKey>, raw: &RawTile) -> DecodeResult<ElevationGrid> {
        let key = key.into();
        let image = raw.pixels.to_rgba()?;
        let (width, height) = image.dimensions();
        let invalid = || DecodeError::InvalidTileDimensions { width, height };

        let padding = padding_for(height).ok_or_else(invalid)?;
        let side = height;
        let appended_stats = if width == side {
            false
        } else if width == side + 1 {
            true
        } else {
            return Err(invalid());
        };

        if padding != 0 {
            tracing::debug!(tile = %key, "synthesizing padding ring for unpadded tile");
        }

        let samples = extract_region(
            &image,
            (padding, padding),
            (TILE_STRIDE, TILE_STRIDE),
            (side, side),
            self.edge_fill,
        );

        let stats = match (&raw.stats, appended_stats) {
            (Some(stats), _) => stats.clone(),
            (None, true) => extract_region(
                &image,
                (side as i32, 0),
                (1, side),
                (side + 1, side),
                EdgeFill::Zero,
            ),
            (None, false) => {
                return Err(DecodeError::MissingStats {
                    detail: "no stats band supplied or appended".to_string(),
                });
            }
        };

        let grid = ElevationGrid::from_parts(key, TILE_STRIDE, samples, stats)?;
        tracing::trace!(
            tile = %grid.tile_key(),
            min = grid.min_elevation(),
            max = grid.max_elevation(),
            "decoded dem tile"
        );
        Ok(grid)
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::encoding::{encode_elevation, encode_stat};
    use crate::source::PixelSource;
    use image::{Rgba, RgbaImage};

    /// Elevation used for source pixel `(x, y)`.
    fn elevation_at(x: u32, y: u32) -> f32 {
        x as f32 + y as f32 * 0.5
    }

    /// Build a terrarium tile of `side` pixels, with the stats band appended
    /// when `append_stats` is set.
    fn build_tile(side: u32, append_stats: bool) -> RgbaImage {
        let width = if append_stats { side + 1 } else { side };
        let stats = stats_band(0.0, 800.0);
        RgbaImage::from_fn(width, side, |x, y| {
            if x == side {
                let slot = (y as usize) * 4;
                let bytes = stats.get(slot..slot + 4).unwrap_or(&[0, 0, 0, 0]);
                Rgba([bytes[0], bytes[1], bytes[2], bytes[3]])
            } else {
                let [r, g, b] = encode_elevation(elevation_at(x, y));
                Rgba([r, g, b, 255])
            }
        })
    }

    fn stats_band(min: f64, max: f64) -> Vec<u8> {
        [encode_stat(min), encode_stat(max)].concat()
    }

    fn assert_close(actual: f32, expected: f32) {
        assert!(
            (actual - expected).abs() <= 1.0 / 256.0,
            "expected {expected}, got {actual}"
        );
    }

    #[test]
    fn test_padding_selection() {
        assert_eq!(padding_for(512), Some(-1));
        assert_eq!(padding_for(514), Some(0));
        assert_eq!(padding_for(256), None);
    }

    #[test]
    fn test_decode_padded_tile() {
        let raw = RawTile::new(build_tile(514, true));
        let grid = TileDecoder::new().decode("t", &raw).unwrap();

        assert_eq!(grid.stride(), 514);
        assert_eq!(grid.dim(), 512);
        // No offset: grid (-1, -1) is source (0, 0) and grid (0, 0) is source (1, 1).
        assert_close(grid.get(-1, -1).unwrap(), elevation_at(0, 0));
        assert_close(grid.get(0, 0).unwrap(), elevation_at(1, 1));
        assert_close(grid.get(512, 512).unwrap(), elevation_at(513, 513));
        assert!((grid.min_elevation() - 0.0).abs() < 0.01);
        assert!((grid.max_elevation() - 800.0).abs() < 0.01);
    }

    #[test]
    fn test_decode_legacy_tile_synthesizes_ring() {
        let raw = RawTile::new(build_tile(512, true));
        let grid = TileDecoder::new().decode("legacy", &raw).unwrap();

        assert_eq!(grid.stride(), 514);
        assert_eq!(grid.dim(), 512);
        assert_close(grid.get(0, 0).unwrap(), elevation_at(0, 0));
        assert_close(grid.get(511, 511).unwrap(), elevation_at(511, 511));
        // The ring repeats the nearest interior pixel, never the stats column.
        assert_close(grid.get(-1, -1).unwrap(), elevation_at(0, 0));
        assert_close(grid.get(512, 7).unwrap(), elevation_at(511, 7));
        assert_close(grid.get(7, 512).unwrap(), elevation_at(7, 511));
        assert!((grid.max_elevation() - 800.0).abs() < 0.01);
    }

    #[test]
    fn test_decode_legacy_tile_zero_fill() {
        let raw = RawTile::new(build_tile(512, true));
        let grid = TileDecoder::new()
            .with_edge_fill(EdgeFill::Zero)
            .decode("legacy", &raw)
            .unwrap();

        assert_close(grid.get(-1, 3).unwrap(), -32768.0);
        assert_close(grid.get(3, 3).unwrap(), elevation_at(3, 3));
    }

    #[test]
    fn test_decode_separate_stats() {
        let raw = RawTile::new(build_tile(514, false)).with_stats(stats_band(-5.0, 12.5));
        let grid = TileDecoder::new().decode(9u64, &raw).unwrap();

        assert_eq!(grid.tile_key(), &TileKey::Id(9));
        assert!((grid.min_elevation() - -5.0).abs() < 0.01);
        assert!((grid.max_elevation() - 12.5).abs() < 0.01);
    }

    #[test]
    fn test_decode_missing_stats() {
        let raw = RawTile::new(build_tile(514, false));
        let result = TileDecoder::new().decode("t", &raw);
        assert!(matches!(result, Err(DecodeError::MissingStats { .. })));

        let raw = RawTile::new(build_tile(514, false)).with_stats(vec![0; 4]);
        let result = TileDecoder::new().decode("t", &raw);
        assert!(matches!(result, Err(DecodeError::MissingStats { .. })));
    }

    #[test]
    fn test_decode_invalid_dimensions() {
        let raw = RawTile::new(RgbaImage::new(257, 256));
        assert_eq!(
            TileDecoder::new().decode("t", &raw).unwrap_err(),
            DecodeError::InvalidTileDimensions {
                width: 257,
                height: 256
            }
        );

        let raw = RawTile::new(RgbaImage::new(600, 514));
        assert!(matches!(
            TileDecoder::new().decode("t", &raw),
            Err(DecodeError::InvalidTileDimensions { .. })
        ));
    }

    #[test]
    fn test_decode_raw_bitmap() {
        let mut png = Vec::new();
        build_tile(514, true)
            .write_to(&mut std::io::Cursor::new(&mut png), image::ImageFormat::Png)
            .unwrap();

        let raw = RawTile::new(PixelSource::RawBitmap(png));
        let grid = TileDecoder::new().decode("png", &raw).unwrap();
        assert_close(grid.get(100, 200).unwrap(), elevation_at(101, 201));
    }
}
