//! World store errors.

use crate::error::{ErrorSeverity, GameError};
use crate::state::Coord;

/// Errors raised by the layered world store.
#[derive(Clone, Debug, PartialEq, Eq, thiserror::Error)]
#[cfg_attr(feature = "serde", derive(serde::Serialize, serde::Deserialize))]
pub enum WorldError {
    #[error("no unit at {0}")]
    UnitNotFound(Coord),

    #[error("no tile at {0}")]
    TileNotFound(Coord),

    #[error("destination {0} is already occupied")]
    Occupied(Coord),

    /// `pop` or `commit` was called with only the base layer left.
    #[error("cannot {operation} the base layer")]
    BaseLayer { operation: &'static str },

    #[error("snapshot key `{key}` is not a `q,r` coordinate")]
    InvalidKey { key: String },

    #[error("snapshot key `{key}` does not match entry coordinate {coord}")]
    KeyMismatch { key: String, coord: Coord },
}

impl GameError for WorldError {
    fn severity(&self) -> ErrorSeverity {
        use WorldError::*;
        match self {
            UnitNotFound(_) | TileNotFound(_) | Occupied(_) => ErrorSeverity::Validation,
            BaseLayer { .. } => ErrorSeverity::Internal,
            InvalidKey { .. } | KeyMismatch { .. } => ErrorSeverity::Fatal,
        }
    }

    fn error_code(&self) -> &'static str {
        use WorldError::*;
        match self {
            UnitNotFound(_) => "WORLD_UNIT_NOT_FOUND",
            TileNotFound(_) => "WORLD_TILE_NOT_FOUND",
            Occupied(_) => "WORLD_OCCUPIED",
            BaseLayer { .. } => "WORLD_BASE_LAYER",
            InvalidKey { .. } => "WORLD_INVALID_KEY",
            KeyMismatch { .. } => "WORLD_KEY_MISMATCH",
        }
    }
}
