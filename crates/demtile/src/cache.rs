//! In-memory store of decoded elevation grids.
//!
//! The cache is driven entirely by an external tile scheduler: it loads what
//! it is told to load and evicts what it is told to evict. There is no size
//! limit and no LRU policy; capacity decisions belong to the scheduler.

use std::{
    collections::HashMap,
    future::Future,
    pin::Pin,
    sync::{Arc, PoisonError, RwLock, RwLockReadGuard, RwLockWriteGuard},
};

use demtile_decode::{ElevationGrid, RawTile, TileDecoder, TileKey};

use crate::error::Result;
use crate::transform::ElevationRange;

type TileMap = HashMap<TileKey, Arc<ElevationGrid>>;

/// Future type for cache load operations.
pub type LoadFuture = Pin<Box<dyn Future<Output = Result<Arc<ElevationGrid>>> + Send + 'static>>;

/// Decoded elevation grids keyed by tile.
///
/// Entries are whole `Arc<ElevationGrid>` values swapped in under a write
/// lock, so readers only ever see fully constructed grids. Cloning the cache
/// shares the underlying map.
#[derive(Debug, Clone, Default)]
pub struct ElevationTileCache {
    tiles: Arc<RwLock<TileMap>>,
    decoder: TileDecoder,
}

impl ElevationTileCache {
    /// Create an empty cache with the default decoder.
    #[must_use]
    pub fn new() -> Self {
        Self::default()
    }

    /// Create an empty cache that decodes with `decoder`.
    #[must_use]
    pub fn with_decoder(decoder: TileDecoder) -> Self {
        Self {
            tiles: Arc::default(),
            decoder,
        }
    }

    /// Load a tile, decoding it unless it is already cached.
    ///
    /// The returned future owns everything it needs, so it can be spawned on
    /// any executor. Loads of the same key may race and decode twice; the
    /// last one to finish wins. A load finishing after [`remove`] re-inserts
    /// its grid.
    ///
    /// [`remove`]: Self::remove
    pub fn load(&self, key: impl Into<TileKey>, raw: RawTile) -> LoadFuture {
        let key = key.into();
        let tiles = Arc::clone(&self.tiles);
        let decoder = self.decoder;

        Box::pin(async move {
            if let Some(grid) = read(&tiles).get(&key) {
                tracing::debug!(tile = %key, "cache hit");
                return Ok(Arc::clone(grid));
            }

            tracing::debug!(tile = %key, "decoding");
            let grid = Arc::new(decoder.decode(key.clone(), &raw)?);
            write(&tiles).insert(key, Arc::clone(&grid));
            Ok(grid)
        })
    }

    /// Get a cached grid.
    #[must_use]
    pub fn get(&self, key: &TileKey) -> Option<Arc<ElevationGrid>> {
        read(&self.tiles).get(key).cloned()
    }

    /// Check if a tile is cached.
    #[must_use]
    pub fn contains(&self, key: &TileKey) -> bool {
        read(&self.tiles).contains_key(key)
    }

    /// Evict a tile. Evicting an absent tile does nothing.
    ///
    /// Readers holding the grid keep it alive until they drop it.
    pub fn remove(&self, key: &TileKey) -> Option<Arc<ElevationGrid>> {
        let removed = write(&self.tiles).remove(key);
        if removed.is_some() {
            tracing::debug!(tile = %key, "evicted");
        }
        removed
    }

    /// Evict every tile.
    pub fn clear(&self) {
        write(&self.tiles).clear();
    }

    /// Keys of all cached tiles, in no particular order.
    #[must_use]
    pub fn keys(&self) -> Vec<TileKey> {
        read(&self.tiles).keys().cloned().collect()
    }

    /// Get the number of cached tiles.
    #[must_use]
    pub fn len(&self) -> usize {
        read(&self.tiles).len()
    }

    /// Check if the cache is empty.
    #[must_use]
    pub fn is_empty(&self) -> bool {
        self.len() == 0
    }

    /// Elevation range over all cached tiles, from their stats bands.
    #[must_use]
    pub fn elevation_range(&self) -> Option<ElevationRange> {
        ElevationRange::from_grids(read(&self.tiles).values().map(Arc::as_ref))
    }
}

// A panic while holding the lock cannot leave a half-written entry behind
// (entries are replaced whole), so poisoning is ignored.
fn read(tiles: &RwLock<TileMap>) -> RwLockReadGuard<'_, TileMap> {
    tiles.read().unwrap_or_else(PoisonError::into_inner)
}

fn write(tiles: &RwLock<TileMap>) -> RwLockWriteGuard<'_, TileMap> {
    tiles.write().unwrap_or_else(PoisonError::into_inner)
}
