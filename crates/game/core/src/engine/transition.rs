//! Move transition dispatch.

use crate::action::{ActionTransition, Move};
use crate::change::Change;
use crate::env::GameEnv;
use crate::state::GameState;

use super::errors::{ExecuteError, TransitionPhase, TransitionPhaseError};

/// Runs a transition through the three-phase pipeline.
///
/// Phases:
/// 1. `pre_validate` - Check preconditions before mutation
/// 2. `apply` - Mutate the game state and record changes
/// 3. `post_validate` - Verify postconditions after mutation
#[inline]
fn drive_transition<T>(
    transition: &T,
    state: &mut GameState,
    env: &GameEnv<'_>,
    changes: &mut Vec<Change>,
) -> Result<(), TransitionPhaseError<T::Error>>
where
    T: ActionTransition,
{
    transition
        .pre_validate(state, env)
        .map_err(|error| TransitionPhaseError::new(TransitionPhase::PreValidate, error))?;

    transition
        .apply(state, env, changes)
        .map_err(|error| TransitionPhaseError::new(TransitionPhase::Apply, error))?;

    transition
        .post_validate(state, env)
        .map_err(|error| TransitionPhaseError::new(TransitionPhase::PostValidate, error))
}

/// Routes a move to its transition and returns the changes it made.
///
/// The caller owns the transaction: a failed transition may leave partial
/// mutations behind, which the engine discards with its layer.
pub(super) fn execute_transition(
    mv: &Move,
    state: &mut GameState,
    env: &GameEnv<'_>,
) -> Result<Vec<Change>, ExecuteError> {
    let mut changes = Vec::new();
    match mv {
        Move::MoveUnit(transition) => {
            drive_transition(transition, state, env, &mut changes).map_err(ExecuteError::Move)?
        }
        Move::AttackUnit(transition) => {
            drive_transition(transition, state, env, &mut changes).map_err(ExecuteError::Attack)?
        }
        Move::BuildUnit(transition) => {
            drive_transition(transition, state, env, &mut changes).map_err(ExecuteError::Build)?
        }
        Move::CaptureBuilding(transition) => drive_transition(transition, state, env, &mut changes)
            .map_err(ExecuteError::Capture)?,
        Move::HealUnit(transition) => {
            drive_transition(transition, state, env, &mut changes).map_err(ExecuteError::Heal)?
        }
        Move::EndTurn(transition) => drive_transition(transition, state, env, &mut changes)
            .map_err(ExecuteError::EndTurn)?,
    }
    Ok(changes)
}
