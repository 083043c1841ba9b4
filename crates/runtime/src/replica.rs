//! Read-side copies of a game that follow the recorded change stream.

use hexline_core::{GameState, History, RecordedMove, replay};
use tracing::{debug, instrument};

use crate::error::{Result, RuntimeError};
use crate::repository::GameRecord;

/// A game state kept in sync by replaying recorded changes instead of
/// re-running the engine.
#[derive(Clone, Debug)]
pub struct Replica {
    state: GameState,
    last_sequence: u64,
}

impl Replica {
    /// Replica at the start of a game.
    pub fn new(initial: GameState) -> Self {
        Self {
            state: initial,
            last_sequence: 0,
        }
    }

    /// Replica of a stored game, rebuilt from its initial state.
    pub fn from_record(record: &GameRecord) -> Result<Self> {
        let mut replica = Self::new(record.initial.clone());
        replica.catch_up(&record.history)?;
        Ok(replica)
    }

    pub fn state(&self) -> &GameState {
        &self.state
    }

    pub fn last_sequence(&self) -> u64 {
        self.last_sequence
    }

    /// Applies the next recorded move.
    ///
    /// Moves must arrive in sequence order. A move that fails to apply
    /// leaves the replica unchanged.
    pub fn apply(&mut self, recorded: &RecordedMove) -> Result<()> {
        let expected = self.last_sequence + 1;
        if recorded.sequence != expected {
            return Err(RuntimeError::OutOfOrder {
                expected,
                received: recorded.sequence,
            });
        }

        let mut next = self.state.clone();
        replay(&mut next, &recorded.changes)?;
        next.version += 1;

        self.state = next;
        self.last_sequence = recorded.sequence;
        Ok(())
    }

    /// Applies every move in `history` this replica has not seen yet.
    ///
    /// Returns how many moves were applied.
    #[instrument(skip_all, fields(from = self.last_sequence))]
    pub fn catch_up(&mut self, history: &History) -> Result<usize> {
        let mut applied = 0;
        for recorded in history.since(self.last_sequence) {
            self.apply(recorded)?;
            applied += 1;
        }
        debug!(applied, version = self.state.version, "replica caught up");
        Ok(applied)
    }

    /// Applies a batch fetched with `GameSession::moves_since`.
    pub fn extend<'a>(&mut self, moves: impl IntoIterator<Item = &'a RecordedMove>) -> Result<usize> {
        let mut applied = 0;
        for recorded in moves {
            self.apply(recorded)?;
            applied += 1;
        }
        debug!(applied, version = self.state.version, "replica applied moves");
        Ok(applied)
    }
}
