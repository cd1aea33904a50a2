//! Async DEM tile cache and hillshade shading parameters.
//!
//! This crate sits between a tile scheduler and a hillshade renderer. Raw DEM
//! pixels go into an [`ElevationTileCache`], which decodes them with
//! [`demtile_decode`]; the resulting grids and the live view/style state are
//! turned into the uniform bundles the prepare and shade passes consume.
//!
//! # Design principles
//!
//! - **Runtime-agnostic**: `load` returns a `Send + 'static` future that works
//!   with any executor
//! - **Sync decoding**: Decoding is synchronous; callers parallelize
//! - **Caller-driven eviction**: The cache never drops tiles on its own
//!
//! # Example
//!
//! ```ignore
//! use demtile::{
//!     ElevationTileCache, HillshadePaint, MapTransform, prepare_uniforms, shade_uniforms,
//! };
//!
//! let cache = ElevationTileCache::new();
//! let grid = cache.load("12/2148/1460", raw_tile).await?;
//!
//! let prepare = prepare_uniforms(&tile_id, &grid);
//! let shade = shade_uniforms(&transform, &tile_id, None, &HillshadePaint::default());
//! ```

pub mod cache;
mod error;
pub mod mercator;
pub mod paint;
pub mod shading;
pub mod tile_id;
pub mod transform;
pub mod uniforms;

pub use cache::{ElevationTileCache, LoadFuture};
pub use error::{Error, Result};
pub use paint::{HillshadePaint, IlluminationAnchor};
pub use shading::{EXTENT, illumination_azimuth, prepare_uniforms, shade_uniforms};
pub use tile_id::{CanonicalTileId, OverscaledTileId, UnwrappedTileId};
pub use transform::{ElevationRange, MapTransform, ViewTransform};
pub use uniforms::{HillshadePrepareUniforms, HillshadeUniforms, UniformValue};

// Re-export decode types for convenience.
pub use demtile_decode::{
    DecodeError, EdgeFill, ElevationGrid, PixelSource, RawTile, TileDecoder, TileKey,
};
