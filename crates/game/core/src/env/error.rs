//! Oracle access errors.

use crate::error::{ErrorSeverity, GameError};
use crate::state::{TerrainId, UnitTypeId};

/// Errors that occur when accessing rules or settings.
///
/// The engine cannot proceed without its tables, so most of these are fatal.
#[derive(Clone, Debug, PartialEq, Eq, thiserror::Error)]
#[cfg_attr(feature = "serde", derive(serde::Serialize, serde::Deserialize))]
pub enum OracleError {
    #[error("RulesOracle not available")]
    RulesNotAvailable,

    #[error("SettingsOracle not available")]
    SettingsNotAvailable,

    #[error("unit type {0} is not defined")]
    UnknownUnit(UnitTypeId),

    #[error("terrain type {0} is not defined")]
    UnknownTerrain(TerrainId),

    #[error("invalid rules: {0}")]
    InvalidRules(String),
}

impl GameError for OracleError {
    fn severity(&self) -> ErrorSeverity {
        ErrorSeverity::Fatal
    }

    fn error_code(&self) -> &'static str {
        use OracleError::*;
        match self {
            RulesNotAvailable => "ORACLE_RULES_NOT_AVAILABLE",
            SettingsNotAvailable => "ORACLE_SETTINGS_NOT_AVAILABLE",
            UnknownUnit(_) => "ORACLE_UNKNOWN_UNIT",
            UnknownTerrain(_) => "ORACLE_UNKNOWN_TERRAIN",
            InvalidRules(_) => "ORACLE_INVALID_RULES",
        }
    }
}
