//! Errors surfaced by game sessions and replicas.

use hexline_core::{ExecuteError, GameError, OptionsError, ReplayError};
use thiserror::Error;

pub use crate::repository::RepositoryError;

pub type Result<T> = std::result::Result<T, RuntimeError>;

#[derive(Debug, Error)]
pub enum RuntimeError {
    /// The engine rejected a move; the stored game is unchanged.
    #[error("move rejected: {0}")]
    Rejected(#[from] ExecuteError),

    #[error(transparent)]
    Repository(#[from] RepositoryError),

    #[error("game {0} not found")]
    UnknownGame(String),

    #[error("invalid option query: {0}")]
    Options(#[from] OptionsError),

    #[error("replica diverged: {0}")]
    Replay(#[from] ReplayError),

    #[error("replica expected move {expected}, received {received}")]
    OutOfOrder { expected: u64, received: u64 },

    #[error("failed to load content: {0}")]
    Content(String),
}

impl RuntimeError {
    /// Whether reloading the game and proposing again may succeed.
    ///
    /// Only version conflicts qualify; rejected moves stay rejected until
    /// the caller changes them.
    pub fn is_retryable(&self) -> bool {
        matches!(self, RuntimeError::Repository(err) if err.is_version_conflict())
    }

    /// Stable code of the underlying engine error, if any.
    pub fn error_code(&self) -> Option<&'static str> {
        match self {
            RuntimeError::Rejected(err) => Some(err.error_code()),
            RuntimeError::Options(err) => Some(err.error_code()),
            RuntimeError::Replay(err) => Some(err.error_code()),
            _ => None,
        }
    }
}
