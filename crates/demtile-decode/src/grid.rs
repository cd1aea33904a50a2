//! Padded elevation grids.

use crate::encoding::{UNPACK_VECTOR, decode_elevation, decode_stat};
use crate::error::{DecodeError, DecodeResult};
use crate::key::TileKey;

/// Bytes per sample and per stats slot.
const CHANNELS: usize = 4;

/// Decoded, padded elevation samples for one tile.
///
/// The samples are stored exactly as they arrived (terrarium RGBA) so the
/// buffer can be uploaded as a texture unchanged; [`ElevationGrid::get`]
/// decodes on read. The outermost ring of `stride * stride` samples is padding
/// copied from (or approximating) the neighbouring tiles, addressed with the
/// coordinates `-1` and `dim`.
#[derive(Debug, Clone, PartialEq)]
#[cfg_attr(feature = "serde", derive(serde::Serialize, serde::Deserialize))]
#[cfg_attr(
    feature = "serde",
    serde(try_from = "GridParts", into = "GridParts")
)]
pub struct ElevationGrid {
    tile_key: TileKey,
    stride: u32,
    dim: u32,
    samples: Vec<u8>,
    stats: Vec<u8>,
    min_elevation: f32,
    max_elevation: f32,
}

/// Borrowed view of a grid's padded RGBA buffer, ready for texture upload.
#[derive(Debug, Clone, Copy)]
pub struct GridPixels<'a> {
    pub width: u32,
    pub height: u32,
    pub data: &'a [u8],
}

impl ElevationGrid {
    /// Assemble a grid from its padded samples and stats band.
    ///
    /// `samples` must hold exactly `stride * stride` RGBA samples. `stats`
    /// must hold between two and `stride` slots; it is zero-extended to
    /// `stride` slots. Min and max elevation are taken from stats slots 0
    /// and 1.
    pub fn from_parts(
        tile_key: TileKey,
        stride: u32,
        samples: Vec<u8>,
        mut stats: Vec<u8>,
    ) -> DecodeResult<Self> {
        if stride < 3 {
            return Err(DecodeError::InvalidFormat {
                context: "elevation grid",
                detail: format!("stride {stride} leaves no interior"),
            });
        }

        let side = stride as usize;
        let expected = side * side * CHANNELS;
        if samples.len() != expected {
            return Err(DecodeError::InvalidFormat {
                context: "elevation grid",
                detail: format!(
                    "expected {expected} sample bytes for stride {stride}, got {}",
                    samples.len()
                ),
            });
        }

        if stats.len() % CHANNELS != 0 {
            return Err(DecodeError::MissingStats {
                detail: format!("band length {} is not a multiple of 4", stats.len()),
            });
        }
        if stats.len() < 2 * CHANNELS {
            return Err(DecodeError::MissingStats {
                detail: format!("band holds {} slots, need min and max", stats.len() / 4),
            });
        }
        if stats.len() > side * CHANNELS {
            return Err(DecodeError::MissingStats {
                detail: format!(
                    "band holds {} slots, more than the stride {stride}",
                    stats.len() / 4
                ),
            });
        }
        stats.resize(side * CHANNELS, 0);

        #[allow(clippy::cast_possible_truncation)]
        let min_elevation = read_stat(&stats, 0)? as f32;
        #[allow(clippy::cast_possible_truncation)]
        let max_elevation = read_stat(&stats, 1)? as f32;
        if min_elevation > max_elevation {
            return Err(DecodeError::MissingStats {
                detail: format!("min elevation {min_elevation} exceeds max {max_elevation}"),
            });
        }

        Ok(Self {
            tile_key,
            stride,
            dim: stride - 2,
            samples,
            stats,
            min_elevation,
            max_elevation,
        })
    }

    /// The tile's unique key.
    #[must_use]
    pub fn tile_key(&self) -> &TileKey {
        &self.tile_key
    }

    /// Padded side length.
    #[must_use]
    pub fn stride(&self) -> u32 {
        self.stride
    }

    /// Interior side length (`stride - 2`).
    #[must_use]
    pub fn dim(&self) -> u32 {
        self.dim
    }

    /// Minimum elevation, from the stats band.
    #[must_use]
    pub fn min_elevation(&self) -> f32 {
        self.min_elevation
    }

    /// Maximum elevation, from the stats band.
    #[must_use]
    pub fn max_elevation(&self) -> f32 {
        self.max_elevation
    }

    /// Raw terrarium-encoded samples, `stride * stride * 4` bytes.
    #[must_use]
    pub fn samples(&self) -> &[u8] {
        &self.samples
    }

    /// Raw stats band, `stride * 4` bytes.
    #[must_use]
    pub fn stats(&self) -> &[u8] {
        &self.stats
    }

    /// The padded buffer with its dimensions, for binding as a texture.
    #[must_use]
    pub fn pixels(&self) -> GridPixels<'_> {
        GridPixels {
            width: self.stride,
            height: self.stride,
            data: &self.samples,
        }
    }

    /// Coefficients the shading stage uses to decode texels itself.
    #[must_use]
    pub fn unpack_vector(&self) -> [f32; 4] {
        UNPACK_VECTOR
    }

    /// Map a coordinate in `[-1, dim]` to its sample index.
    ///
    /// The index counts samples, not bytes. Coordinates outside the padded
    /// range are an error rather than being wrapped or clamped.
    #[allow(clippy::cast_sign_loss)]
    pub fn index(&self, x: i32, y: i32) -> DecodeResult<usize> {
        let dim = i64::from(self.dim);
        let range = -1..=dim;
        if !range.contains(&i64::from(x)) || !range.contains(&i64::from(y)) {
            return Err(DecodeError::OutOfRangeCoordinate {
                x,
                y,
                dim: self.dim,
            });
        }

        // Both offsets are non-negative after the range check.
        let row = (y + 1) as usize;
        let col = (x + 1) as usize;
        Ok(row * self.stride as usize + col)
    }

    /// Decoded elevation at `(x, y)` in meters.
    pub fn get(&self, x: i32, y: i32) -> DecodeResult<f32> {
        let offset = self.index(x, y)? * CHANNELS;
        let texel = &self.samples[offset..offset + CHANNELS];
        Ok(decode_elevation(texel[0], texel[1], texel[2]))
    }

    /// Decoded value of stats slot `slot`.
    ///
    /// Slot 0 is the minimum and slot 1 the maximum elevation; other slots
    /// are reserved and returned undecorated.
    pub fn stat(&self, slot: usize) -> DecodeResult<f64> {
        read_stat(&self.stats, slot)
    }

    /// Return a copy of this grid whose border facing `neighbour` is filled
    /// with the neighbour's adjacent interior samples.
    ///
    /// `(dx, dy)` is the neighbour's position relative to this tile, each in
    /// `-1..=1` and not both zero. Edge neighbours fill one side of the ring,
    /// diagonal neighbours a single corner.
    pub fn with_backfilled_border(
        &self,
        neighbour: &ElevationGrid,
        dx: i32,
        dy: i32,
    ) -> DecodeResult<ElevationGrid> {
        if self.dim != neighbour.dim {
            return Err(DecodeError::DimensionMismatch {
                expected: self.dim,
                actual: neighbour.dim,
            });
        }
        if !(-1..=1).contains(&dx) || !(-1..=1).contains(&dy) || (dx == 0 && dy == 0) {
            return Err(DecodeError::InvalidFormat {
                context: "backfill",
                detail: format!("invalid neighbour offset ({dx}, {dy})"),
            });
        }

        let dim = i32::try_from(self.dim).map_err(|_| DecodeError::InvalidFormat {
            context: "backfill",
            detail: format!("dimension {} too large", self.dim),
        })?;
        let xs = border_span(dx, dim);
        let ys = border_span(dy, dim);
        let (ox, oy) = (-dx * dim, -dy * dim);

        let mut filled = self.clone();
        for y in ys {
            for x in xs.clone() {
                let to = self.index(x, y)? * CHANNELS;
                let from = neighbour.index(x + ox, y + oy)? * CHANNELS;
                filled.samples[to..to + CHANNELS]
                    .copy_from_slice(&neighbour.samples[from..from + CHANNELS]);
            }
        }

        tracing::trace!(tile = %self.tile_key, dx, dy, "backfilled border");
        Ok(filled)
    }
}

/// Coordinates along one axis that a neighbour at offset `d` supplies.
fn border_span(d: i32, dim: i32) -> std::ops::Range<i32> {
    match d {
        -1 => -1..0,
        1 => dim..dim + 1,
        _ => 0..dim,
    }
}

fn read_stat(stats: &[u8], slot: usize) -> DecodeResult<f64> {
    let bytes = slot
        .checked_mul(CHANNELS)
        .and_then(|offset| stats.get(offset..offset + 3))
        .ok_or_else(|| DecodeError::MissingStats {
            detail: format!("slot {slot} is beyond the {}-slot band", stats.len() / 4),
        })?;
    Ok(decode_stat(bytes[0], bytes[1], bytes[2]))
}

/// Wire form of a grid; deserializing re-validates through
/// [`ElevationGrid::from_parts`].
#[cfg(feature = "serde")]
#[derive(serde::Serialize, serde::Deserialize)]
struct GridParts {
    tile_key: TileKey,
    stride: u32,
    samples: Vec<u8>,
    stats: Vec<u8>,
}

#[cfg(feature = "serde")]
impl TryFrom<GridParts> for ElevationGrid {
    type Error = DecodeError;

    fn try_from(parts: GridParts) -> DecodeResult<Self> {
        Self::from_parts(parts.tile_key, parts.stride, parts.samples, parts.stats)
    }
}

#[cfg(feature = "serde")]
impl From<ElevationGrid> for GridParts {
    fn from(grid: ElevationGrid) -> Self {
        Self {
            tile_key: grid.tile_key,
            stride: grid.stride,
            samples: grid.samples,
            stats: grid.stats,
        }
    }
}
