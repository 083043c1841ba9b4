use crate::env::OracleError;
use crate::error::{ErrorSeverity, GameError};
use crate::state::Coord;

#[derive(Clone, Debug, PartialEq, Eq, thiserror::Error)]
#[cfg_attr(feature = "serde", derive(serde::Serialize, serde::Deserialize))]
pub enum CombatError {
    #[error(transparent)]
    Oracle(#[from] OracleError),

    /// The attacker's table has no entry for the target's class and terrain.
    #[error("{attacker} cannot attack {target}")]
    CannotAttack { attacker: String, target: String },

    #[error("no tile under unit at {0}")]
    MissingTile(Coord),
}

impl GameError for CombatError {
    fn severity(&self) -> ErrorSeverity {
        match self {
            CombatError::Oracle(inner) => inner.severity(),
            CombatError::CannotAttack { .. } => ErrorSeverity::Validation,
            CombatError::MissingTile(_) => ErrorSeverity::Internal,
        }
    }

    fn error_code(&self) -> &'static str {
        match self {
            CombatError::Oracle(inner) => inner.error_code(),
            CombatError::CannotAttack { .. } => "COMBAT_CANNOT_ATTACK",
            CombatError::MissingTile(_) => "COMBAT_MISSING_TILE",
        }
    }
}
