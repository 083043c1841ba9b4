//! Error types for the move execution pipeline.

use crate::action::{
    ActionTransition, AttackUnitAction, BuildUnitAction, CaptureBuildingAction, EndTurnAction,
    HealUnitAction, MoveUnitAction,
};
use crate::error::{ErrorContext, ErrorSeverity, GameError};
use crate::state::{PlayerId, WorldError};

/// Identifies which stage of the transition pipeline produced an error.
#[derive(Clone, Copy, Debug, PartialEq, Eq)]
#[cfg_attr(feature = "serde", derive(serde::Serialize, serde::Deserialize))]
pub enum TransitionPhase {
    PreValidate,
    Apply,
    PostValidate,
}

impl TransitionPhase {
    pub fn as_str(&self) -> &'static str {
        match self {
            TransitionPhase::PreValidate => "pre_validate",
            TransitionPhase::Apply => "apply",
            TransitionPhase::PostValidate => "post_validate",
        }
    }
}

/// Associates a transition phase with the underlying error.
#[derive(Clone, Debug, PartialEq, Eq)]
pub struct TransitionPhaseError<E> {
    pub phase: TransitionPhase,
    pub error: E,
}

impl<E> TransitionPhaseError<E> {
    pub fn new(phase: TransitionPhase, error: E) -> Self {
        Self { phase, error }
    }
}

impl<E: std::fmt::Display> std::fmt::Display for TransitionPhaseError<E> {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        write!(f, "{} failed: {}", self.phase.as_str(), self.error)
    }
}

impl<E: std::fmt::Display + std::fmt::Debug> std::error::Error for TransitionPhaseError<E> {}

impl<E: GameError> GameError for TransitionPhaseError<E> {
    fn severity(&self) -> ErrorSeverity {
        self.error.severity()
    }

    fn context(&self) -> Option<&ErrorContext> {
        self.error.context()
    }

    fn error_code(&self) -> &'static str {
        self.error.error_code()
    }
}

type PhaseError<T> = TransitionPhaseError<<T as ActionTransition>::Error>;

/// Errors surfaced while executing a move through the game engine.
#[derive(Clone, Debug, PartialEq, Eq, thiserror::Error)]
pub enum ExecuteError {
    #[error("move unit failed: {0}")]
    Move(PhaseError<MoveUnitAction>),

    #[error("attack unit failed: {0}")]
    Attack(PhaseError<AttackUnitAction>),

    #[error("build unit failed: {0}")]
    Build(PhaseError<BuildUnitAction>),

    #[error("capture building failed: {0}")]
    Capture(PhaseError<CaptureBuildingAction>),

    #[error("heal unit failed: {0}")]
    Heal(PhaseError<HealUnitAction>),

    #[error("end turn failed: {0}")]
    EndTurn(PhaseError<EndTurnAction>),

    #[error("game is over: player {winner} won")]
    GameFinished { winner: PlayerId },

    #[error("move {index} of the batch failed: {source}")]
    Batch {
        index: usize,
        source: Box<ExecuteError>,
    },

    #[error("transaction layer error: {0}")]
    World(#[from] WorldError),
}

impl ExecuteError {
    /// Pipeline phase that rejected the move, if a transition did.
    pub fn phase(&self) -> Option<TransitionPhase> {
        use ExecuteError::*;
        match self {
            Move(e) => Some(e.phase),
            Attack(e) => Some(e.phase),
            Build(e) => Some(e.phase),
            Capture(e) => Some(e.phase),
            Heal(e) => Some(e.phase),
            EndTurn(e) => Some(e.phase),
            Batch { source, .. } => source.phase(),
            GameFinished { .. } | World(_) => None,
        }
    }
}

impl GameError for ExecuteError {
    fn severity(&self) -> ErrorSeverity {
        use ExecuteError::*;
        match self {
            Move(e) => e.severity(),
            Attack(e) => e.severity(),
            Build(e) => e.severity(),
            Capture(e) => e.severity(),
            Heal(e) => e.severity(),
            EndTurn(e) => e.severity(),
            GameFinished { .. } => ErrorSeverity::Validation,
            Batch { source, .. } => source.severity(),
            World(_) => ErrorSeverity::Internal,
        }
    }

    fn context(&self) -> Option<&ErrorContext> {
        use ExecuteError::*;
        match self {
            Move(e) => e.context(),
            Attack(e) => e.context(),
            Build(e) => e.context(),
            Capture(e) => e.context(),
            Heal(e) => e.context(),
            EndTurn(e) => e.context(),
            Batch { source, .. } => source.context(),
            GameFinished { .. } | World(_) => None,
        }
    }

    fn error_code(&self) -> &'static str {
        use ExecuteError::*;
        match self {
            Move(e) => e.error_code(),
            Attack(e) => e.error_code(),
            Build(e) => e.error_code(),
            Capture(e) => e.error_code(),
            Heal(e) => e.error_code(),
            EndTurn(e) => e.error_code(),
            GameFinished { .. } => "GAME_FINISHED",
            Batch { source, .. } => source.error_code(),
            World(_) => "ENGINE_LAYER",
        }
    }
}
