//! Tile identifiers in the web mercator tile pyramid.

use std::fmt;

/// A tile's position in the pyramid, without world wrapping.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub struct CanonicalTileId {
    pub z: u8,
    pub x: u32,
    pub y: u32,
}

impl CanonicalTileId {
    #[must_use]
    pub fn new(z: u8, x: u32, y: u32) -> Self {
        Self { z, x, y }
    }

    /// Number of tiles along one axis at this zoom.
    #[must_use]
    pub fn tiles_at_zoom(&self) -> f64 {
        2f64.powi(i32::from(self.z))
    }
}

impl fmt::Display for CanonicalTileId {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "{}/{}/{}", self.z, self.x, self.y)
    }
}

/// A canonical tile placed in a specific copy of the world.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub struct UnwrappedTileId {
    pub wrap: i32,
    pub canonical: CanonicalTileId,
}

/// A tile as rendered, possibly overscaled past its source zoom.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub struct OverscaledTileId {
    pub overscaled_z: u8,
    pub wrap: i32,
    pub canonical: CanonicalTileId,
}

impl OverscaledTileId {
    #[must_use]
    pub fn new(overscaled_z: u8, wrap: i32, canonical: CanonicalTileId) -> Self {
        Self {
            overscaled_z,
            wrap,
            canonical,
        }
    }

    #[must_use]
    pub fn to_unwrapped(&self) -> UnwrappedTileId {
        UnwrappedTileId {
            wrap: self.wrap,
            canonical: self.canonical,
        }
    }
}

impl fmt::Display for OverscaledTileId {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "{}@{}w{}", self.canonical, self.overscaled_z, self.wrap)
    }
}
