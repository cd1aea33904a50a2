//! Decode terrarium-encoded DEM tiles into padded elevation grids.
//!
//! This crate provides pure synchronous decoding of raster elevation tiles
//! into [`ElevationGrid`]s: a one-sample padding ring around a 512 x 512
//! interior, strict coordinate bounds checking, and min/max elevation read
//! from an out-of-band stats band.
//!
//! # Design principles
//!
//! - **Synchronous**: No async, no threading primitives
//! - **User-controlled parallelism**: Callers decide where decoding runs
//! - **Immutable output**: Grids never change after construction; seam
//!   backfill returns a new grid
//!
//! # Example
//!
//! ```ignore
//! use demtile_decode::{RawTile, TileDecoder};
//!
//! let grid = TileDecoder::new().decode("12/2048/1361", &RawTile::new(pixels))?;
//! let summit = grid.get(256, 256)?;
//! ```

mod decoder;
mod encoding;
mod error;
mod grid;
mod key;
mod source;

pub use decoder::{TILE_DIM, TILE_STRIDE, TileDecoder, padding_for};
pub use encoding::{UNPACK_VECTOR, decode_elevation, decode_stat, encode_elevation, encode_stat};
pub use error::{DecodeError, DecodeResult};
pub use grid::{ElevationGrid, GridPixels};
pub use key::TileKey;
pub use source::{EdgeFill, PixelSource, RawTile};

// Re-export the image type accepted by `PixelSource::Decoded`.
pub use image::RgbaImage;
