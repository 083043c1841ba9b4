use crate::action::ActionKind;
use crate::error::{ErrorSeverity, GameError};

#[derive(Clone, Debug, PartialEq, Eq, thiserror::Error)]
#[cfg_attr(feature = "serde", derive(serde::Serialize, serde::Deserialize))]
pub enum ProgressionError {
    #[error("{action} is not open at progression step {step} (allowed: {allowed:?})")]
    NotAllowed {
        action: ActionKind,
        step: u32,
        allowed: Vec<ActionKind>,
    },
}

impl GameError for ProgressionError {
    fn severity(&self) -> ErrorSeverity {
        ErrorSeverity::Validation
    }

    fn error_code(&self) -> &'static str {
        match self {
            ProgressionError::NotAllowed { .. } => "PROGRESSION_NOT_ALLOWED",
        }
    }
}
