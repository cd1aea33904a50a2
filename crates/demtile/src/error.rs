//! Error types for the demtile crate.

use std::fmt;

/// Result type for demtile operations.
pub type Result<T> = std::result::Result<T, Error>;

/// Errors that can occur in demtile operations.
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum Error {
    /// Tile decoding failed.
    Decode(demtile_decode::DecodeError),
}

impl fmt::Display for Error {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            Error::Decode(e) => write!(f, "decode error: {e}"),
        }
    }
}

impl std::error::Error for Error {
    fn source(&self) -> Option<&(dyn std::error::Error + 'static)> {
        match self {
            Error::Decode(e) => Some(e),
        }
    }
}

impl From<demtile_decode::DecodeError> for Error {
    fn from(e: demtile_decode::DecodeError) -> Self {
        Error::Decode(e)
    }
}
