//! Error types raised by repository implementations.

use thiserror::Error;

/// Errors surfaced by repository implementations.
#[derive(Debug, Error)]
pub enum RepositoryError {
    #[error("game repository lock was poisoned")]
    LockPoisoned,

    #[error("game {0} already exists")]
    AlreadyExists(String),

    #[error("game {0} not found")]
    NotFound(String),

    /// The stored game moved on since the caller loaded it.
    #[error("version conflict on game {game_id}: expected {expected}, stored {found}")]
    VersionConflict {
        game_id: String,
        expected: u64,
        found: u64,
    },

    #[error("I/O error: {0}")]
    Io(#[from] std::io::Error),

    #[error("JSON error: {0}")]
    Json(#[from] serde_json::Error),

    #[error("corrupted data: {0}")]
    CorruptedData(String),
}

impl RepositoryError {
    pub fn is_version_conflict(&self) -> bool {
        matches!(self, RepositoryError::VersionConflict { .. })
    }
}

pub type Result<T> = std::result::Result<T, RepositoryError>;
