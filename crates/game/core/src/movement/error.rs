use crate::error::{ErrorSeverity, GameError};
use crate::state::Coord;

/// Path planning failures.
#[derive(Clone, Debug, PartialEq, Eq, thiserror::Error)]
#[cfg_attr(feature = "serde", derive(serde::Serialize, serde::Deserialize))]
pub enum PathError {
    #[error("destination {to} is not reachable from {from}")]
    Unreachable { from: Coord, to: Coord },

    #[error("destination {0} is occupied")]
    Occupied(Coord),

    #[error("destination {0} has no tile")]
    NoTile(Coord),

    /// Predecessor chain broken while rebuilding a path.
    #[error("path to {0} could not be reconstructed")]
    BrokenChain(Coord),
}

impl GameError for PathError {
    fn severity(&self) -> ErrorSeverity {
        match self {
            PathError::Unreachable { .. } | PathError::Occupied(_) | PathError::NoTile(_) => {
                ErrorSeverity::Validation
            }
            PathError::BrokenChain(_) => ErrorSeverity::Internal,
        }
    }

    fn error_code(&self) -> &'static str {
        match self {
            PathError::Unreachable { .. } => "PATH_UNREACHABLE",
            PathError::Occupied(_) => "PATH_OCCUPIED",
            PathError::NoTile(_) => "PATH_NO_TILE",
            PathError::BrokenChain(_) => "PATH_BROKEN_CHAIN",
        }
    }
}
