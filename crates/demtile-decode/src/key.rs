//! Tile identity.

use std::fmt;

/// Opaque identifier for a DEM tile, unique per tile.
///
/// Tile schedulers key tiles either by a numeric uid or by a string such as
/// `"12/2048/1361"`; both forms are accepted and never interpreted.
#[derive(Debug, Clone, PartialEq, Eq, Hash, PartialOrd, Ord)]
#[cfg_attr(feature = "serde", derive(serde::Serialize, serde::Deserialize))]
#[cfg_attr(feature = "serde", serde(untagged))]
pub enum TileKey {
    /// Numeric uid.
    Id(u64),
    /// String uid.
    Name(String),
}

impl fmt::Display for TileKey {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            Self::Id(id) => write!(f, "{id}"),
            Self::Name(name) => f.write_str(name),
        }
    }
}

impl From<u64> for TileKey {
    fn from(id: u64) -> Self {
        Self::Id(id)
    }
}

impl From<&str> for TileKey {
    fn from(name: &str) -> Self {
        Self::Name(name.to_string())
    }
}

impl From<String> for TileKey {
    fn from(name: String) -> Self {
        Self::Name(name)
    }
}
