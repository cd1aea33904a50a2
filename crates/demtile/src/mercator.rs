//! Web mercator latitude helpers.

use std::f64::consts::PI;

use crate::tile_id::CanonicalTileId;

/// Latitude in degrees of a normalized mercator y coordinate (0 at the top
/// of the world, 1 at the bottom).
#[must_use]
pub fn lat_from_mercator_y(y: f64) -> f64 {
    let y2 = 180.0 - y * 360.0;
    360.0 / PI * (y2 * PI / 180.0).exp().atan() - 90.0
}

/// Latitudes of a tile's top and bottom edges.
///
/// The shading stage scales slope magnitude by these to account for the
/// ground distance a pixel covers at that latitude.
#[must_use]
pub fn tile_lat_range(tile: &CanonicalTileId) -> [f64; 2] {
    let tiles = tile.tiles_at_zoom();
    let y = f64::from(tile.y);
    [
        lat_from_mercator_y(y / tiles),
        lat_from_mercator_y((y + 1.0) / tiles),
    ]
}

#[cfg(test)]
mod tests {
    use super::*;

    const MAX_LAT: f64 = 85.051_128_779_806_59;

    #[test]
    fn test_world_edges() {
        assert!((lat_from_mercator_y(0.0) - MAX_LAT).abs() < 1e-9);
        assert!(lat_from_mercator_y(0.5).abs() < 1e-9);
        assert!((lat_from_mercator_y(1.0) + MAX_LAT).abs() < 1e-9);
    }

    #[test]
    fn test_root_tile_range() {
        let [top, bottom] = tile_lat_range(&CanonicalTileId::new(0, 0, 0));
        assert!((top - MAX_LAT).abs() < 1e-9);
        assert!((bottom + MAX_LAT).abs() < 1e-9);
    }

    #[test]
    fn test_northern_hemisphere_tile() {
        // Zoom 1, row 0 spans from the top of the world to the equator.
        let [top, bottom] = tile_lat_range(&CanonicalTileId::new(1, 1, 0));
        assert!(top > bottom);
        assert!(bottom.abs() < 1e-9);
    }
}
