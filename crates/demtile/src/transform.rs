//! View transform collaborator.
//!
//! The shading parameters need a handful of values from the live map view:
//! its rotation, whether the camera is moving, tile position matrices and the
//! elevation range aggregated over the visible tiles. [`ViewTransform`] is the
//! seam; [`MapTransform`] is a minimal implementation for tools and tests.

use glam::{DVec3, Mat4};

use demtile_decode::ElevationGrid;

use crate::shading::EXTENT;
use crate::tile_id::UnwrappedTileId;

/// Side length of a tile in screen pixels at its own zoom.
const TILE_SIZE: f64 = 512.0;

/// Elevation bounds in meters.
#[derive(Debug, Clone, Copy, PartialEq)]
pub struct ElevationRange {
    pub min: f32,
    pub max: f32,
}

impl ElevationRange {
    #[must_use]
    pub fn new(min: f32, max: f32) -> Self {
        Self { min, max }
    }

    /// The range of a single grid, from its stats band.
    #[must_use]
    pub fn of_grid(grid: &ElevationGrid) -> Self {
        Self::new(grid.min_elevation(), grid.max_elevation())
    }

    /// Aggregate the stats of several grids. `None` when there are none.
    pub fn from_grids<'a>(grids: impl IntoIterator<Item = &'a ElevationGrid>) -> Option<Self> {
        grids
            .into_iter()
            .map(Self::of_grid)
            .reduce(|acc, range| acc.union(range))
    }

    /// Smallest range covering both.
    #[must_use]
    pub fn union(self, other: Self) -> Self {
        Self::new(self.min.min(other.min), self.max.max(other.max))
    }
}

impl Default for ElevationRange {
    fn default() -> Self {
        Self::new(0.0, 0.0)
    }
}

/// The parts of the map view the shading parameters depend on.
pub trait ViewTransform {
    /// View rotation in radians.
    fn angle(&self) -> f32;

    /// Whether the camera is currently in motion.
    fn is_moving(&self) -> bool;

    /// Matrix placing a tile's `[0, EXTENT]` coordinates in clip space.
    ///
    /// When `aligned` is set the tile may be snapped to whole pixels.
    fn calculate_pos_matrix(&self, tile: UnwrappedTileId, aligned: bool) -> Mat4;

    /// Elevation range aggregated over the visible tiles.
    fn elevation_range(&self) -> ElevationRange;
}

/// A flat map view: zoom, rotation and a projection matrix.
#[derive(Debug, Clone)]
pub struct MapTransform {
    zoom: f64,
    angle: f32,
    projection: Mat4,
    moving: bool,
    elevation_range: ElevationRange,
}

impl MapTransform {
    /// Create a transform at `zoom` with an identity projection.
    #[must_use]
    pub fn new(zoom: f64) -> Self {
        Self {
            zoom,
            angle: 0.0,
            projection: Mat4::IDENTITY,
            moving: false,
            elevation_range: ElevationRange::default(),
        }
    }

    /// Set the view rotation in radians.
    #[must_use]
    pub fn with_angle(mut self, angle: f32) -> Self {
        self.angle = angle;
        self
    }

    /// Set the world-pixel to clip-space projection.
    #[must_use]
    pub fn with_projection(mut self, projection: Mat4) -> Self {
        self.projection = projection;
        self
    }

    /// Mark the camera as moving.
    #[must_use]
    pub fn with_moving(mut self, moving: bool) -> Self {
        self.moving = moving;
        self
    }

    /// Set the aggregated elevation range.
    #[must_use]
    pub fn with_elevation_range(mut self, range: ElevationRange) -> Self {
        self.elevation_range = range;
        self
    }

    /// Replace the aggregated elevation range, e.g. after the visible tile
    /// set changed.
    pub fn set_elevation_range(&mut self, range: ElevationRange) {
        self.elevation_range = range;
    }

    /// Update the camera motion flag.
    pub fn set_moving(&mut self, moving: bool) {
        self.moving = moving;
    }

    #[must_use]
    pub fn zoom(&self) -> f64 {
        self.zoom
    }
}

impl ViewTransform for MapTransform {
    fn angle(&self) -> f32 {
        self.angle
    }

    fn is_moving(&self) -> bool {
        self.moving
    }

    #[allow(clippy::cast_possible_truncation)]
    fn calculate_pos_matrix(&self, tile: UnwrappedTileId, aligned: bool) -> Mat4 {
        let tiles = tile.canonical.tiles_at_zoom();
        let world_size = TILE_SIZE * 2f64.powf(self.zoom);
        let scale = world_size / tiles;

        let mut origin = DVec3::new(
            (f64::from(tile.canonical.x) + f64::from(tile.wrap) * tiles) * scale,
            f64::from(tile.canonical.y) * scale,
            0.0,
        );
        if aligned {
            origin = origin.round();
        }

        let units = (scale / f64::from(EXTENT)) as f32;
        self.projection
            * Mat4::from_translation(origin.as_vec3())
            * Mat4::from_scale(glam::Vec3::new(units, units, 1.0))
    }

    fn elevation_range(&self) -> ElevationRange {
        self.elevation_range
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::tile_id::CanonicalTileId;
    use glam::Vec4;

    #[test]
    fn test_union() {
        let a = ElevationRange::new(-10.0, 100.0);
        let b = ElevationRange::new(5.0, 250.0);
        assert_eq!(a.union(b), ElevationRange::new(-10.0, 250.0));
    }

    #[test]
    fn test_from_no_grids() {
        assert_eq!(ElevationRange::from_grids(std::iter::empty()), None);
    }

    #[test]
    fn test_pos_matrix_places_tile() {
        let transform = MapTransform::new(1.0);
        let tile = UnwrappedTileId {
            wrap: 0,
            canonical: CanonicalTileId::new(1, 1, 0),
        };
        let matrix = transform.calculate_pos_matrix(tile, true);

        // At zoom 1 the world is 1024 px wide, so tile 1/1/0 starts at x = 512.
        let origin = matrix * Vec4::new(0.0, 0.0, 0.0, 1.0);
        assert!((origin.x - 512.0).abs() < 1e-3);
        assert!(origin.y.abs() < 1e-3);

        let corner = matrix * Vec4::new(EXTENT, EXTENT, 0.0, 1.0);
        assert!((corner.x - 1024.0).abs() < 1e-3);
        assert!((corner.y - 512.0).abs() < 1e-3);
    }

    #[test]
    fn test_pos_matrix_wraps_world() {
        let transform = MapTransform::new(0.0);
        let tile = UnwrappedTileId {
            wrap: -1,
            canonical: CanonicalTileId::new(0, 0, 0),
        };
        let origin = transform.calculate_pos_matrix(tile, false) * Vec4::new(0.0, 0.0, 0.0, 1.0);
        assert!((origin.x + 512.0).abs() < 1e-3);
    }

    #[test]
    fn test_alignment_snaps_to_pixels() {
        let transform = MapTransform::new(0.3);
        let tile = UnwrappedTileId {
            wrap: 0,
            canonical: CanonicalTileId::new(2, 1, 1),
        };
        let snapped = transform.calculate_pos_matrix(tile, true) * Vec4::new(0.0, 0.0, 0.0, 1.0);
        let free = transform.calculate_pos_matrix(tile, false) * Vec4::new(0.0, 0.0, 0.0, 1.0);

        assert!((snapped.x - snapped.x.round()).abs() < 1e-3);
        assert!((free.x - free.x.round()).abs() > 1e-3);
    }

    #[test]
    fn test_setters_update_view_state() {
        let mut transform = MapTransform::new(4.5).with_moving(true);
        assert!((transform.zoom() - 4.5).abs() < f64::EPSILON);
        assert!(transform.is_moving());

        transform.set_moving(false);
        transform.set_elevation_range(ElevationRange::new(-20.0, 1500.0));

        assert!(!transform.is_moving());
        assert_eq!(
            transform.elevation_range(),
            ElevationRange::new(-20.0, 1500.0)
        );
    }
}
