//! Error types for decoding operations.

use std::fmt;

/// Errors that can occur while decoding or addressing DEM tile data.
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum DecodeError {
    /// The raw pixel source is neither 512 nor 514 pixels tall, or its width
    /// does not match the tile side (optionally plus one stats column).
    InvalidTileDimensions { width: u32, height: u32 },
    /// A grid coordinate fell outside `[-1, dim]` on either axis.
    OutOfRangeCoordinate { x: i32, y: i32, dim: u32 },
    /// The stats band is absent, too short, or indexed past its end.
    MissingStats { detail: String },
    /// Two grids that must share a dimension do not.
    DimensionMismatch { expected: u32, actual: u32 },
    /// The bitmap could not be decompressed.
    Image { message: String },
    /// Invalid data format or structure.
    InvalidFormat {
        context: &'static str,
        detail: String,
    },
}

impl fmt::Display for DecodeError {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            Self::InvalidTileDimensions { width, height } => {
                write!(
                    f,
                    "invalid dem tile dimensions {width}x{height}: expected a height of 512 or 514"
                )
            }
            Self::OutOfRangeCoordinate { x, y, dim } => {
                write!(
                    f,
                    "coordinate ({x}, {y}) out of range for dem data of dimension {dim}"
                )
            }
            Self::MissingStats { detail } => write!(f, "missing dem stats: {detail}"),
            Self::DimensionMismatch { expected, actual } => {
                write!(f, "dem dimension mismatch: expected {expected}, got {actual}")
            }
            Self::Image { message } => write!(f, "failed to decode bitmap: {message}"),
            Self::InvalidFormat { context, detail } => {
                write!(f, "invalid format in {context}: {detail}")
            }
        }
    }
}

impl std::error::Error for DecodeError {}

impl From<image::ImageError> for DecodeError {
    fn from(e: image::ImageError) -> Self {
        Self::Image {
            message: e.to_string(),
        }
    }
}

/// Result type for decoding operations.
pub type DecodeResult<T> = Result<T, DecodeError>;
