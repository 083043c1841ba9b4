//! Move execution pipeline.
//!
//! The [`GameEngine`] is the authoritative reducer for [`GameState`]. Every
//! move runs inside a world transaction layer: the transition's mutations
//! are committed only when all three phases succeed, otherwise the layer is
//! popped and the scalar fields (player, turn, coins, RNG, status) are
//! restored, so a rejected move leaves no trace.

mod errors;
mod transition;

pub use errors::{ExecuteError, TransitionPhase, TransitionPhaseError};

use crate::action::Move;
use crate::change::Change;
use crate::env::GameEnv;
use crate::state::{Checkpoint, GameState};

/// Outcome of one committed move.
#[derive(Clone, Debug, PartialEq)]
#[cfg_attr(feature = "serde", derive(serde::Serialize, serde::Deserialize))]
pub struct ExecutionOutcome {
    /// Changes in the order the move made them.
    pub changes: Vec<Change>,

    /// State version after the move.
    pub version: u64,
}

/// Game engine that validates and applies moves.
///
/// All state mutations flow through the three-phase transition pipeline:
/// pre_validate → apply → post_validate
pub struct GameEngine<'a> {
    state: &'a mut GameState,
}

impl<'a> GameEngine<'a> {
    pub fn new(state: &'a mut GameState) -> Self {
        Self { state }
    }

    pub fn state(&self) -> &GameState {
        self.state
    }

    /// Executes a move and bumps the state version.
    ///
    /// Returns the changes the move produced. On error the state is exactly
    /// as it was before the call.
    pub fn execute(&mut self, env: GameEnv<'_>, mv: &Move) -> Result<ExecutionOutcome, ExecuteError> {
        self.ensure_in_progress()?;

        let checkpoint = self.state.checkpoint();
        self.state.world.push();
        match transition::execute_transition(mv, self.state, &env) {
            Ok(changes) => {
                self.state.world.commit()?;
                self.state.version += 1;
                Ok(ExecutionOutcome {
                    changes,
                    version: self.state.version,
                })
            }
            Err(error) => {
                self.rollback(checkpoint)?;
                Err(error)
            }
        }
    }

    /// Runs a move through the full pipeline and discards the result.
    ///
    /// The returned changes are exactly what [`execute`](Self::execute)
    /// would produce from the current state. The RNG and version are left
    /// untouched.
    pub fn dry_run(&mut self, env: GameEnv<'_>, mv: &Move) -> Result<Vec<Change>, ExecuteError> {
        self.ensure_in_progress()?;

        let checkpoint = self.state.checkpoint();
        self.state.world.push();
        let result = transition::execute_transition(mv, self.state, &env);
        self.rollback(checkpoint)?;
        result
    }

    /// Executes `moves` in order as one unit: either every move commits or
    /// the state is left as it was.
    pub fn execute_all(
        &mut self,
        env: GameEnv<'_>,
        moves: &[Move],
    ) -> Result<Vec<ExecutionOutcome>, ExecuteError> {
        let checkpoint = self.state.checkpoint();
        let version = self.state.version;
        self.state.world.push();

        let mut outcomes = Vec::with_capacity(moves.len());
        for (index, mv) in moves.iter().enumerate() {
            match self.execute(env, mv) {
                Ok(outcome) => outcomes.push(outcome),
                Err(error) => {
                    self.rollback(checkpoint)?;
                    self.state.version = version;
                    return Err(ExecuteError::Batch {
                        index,
                        source: Box::new(error),
                    });
                }
            }
        }

        self.state.world.commit()?;
        Ok(outcomes)
    }

    fn ensure_in_progress(&self) -> Result<(), ExecuteError> {
        match self.state.status.winner() {
            Some(winner) => Err(ExecuteError::GameFinished { winner }),
            None => Ok(()),
        }
    }

    fn rollback(&mut self, checkpoint: Checkpoint) -> Result<(), ExecuteError> {
        self.state.world.pop()?;
        self.state.restore(checkpoint);
        Ok(())
    }
}
