//! Recorded moves and change replay.
//!
//! Unit changes carry whole units, so applying an authoritative change list
//! onto an identically initialised state reproduces its world, coins, player,
//! turn and status without re-running any rule. Replicas use this to follow a
//! game they do not execute themselves. The RNG is not part of the change
//! stream and stays where the replica's copy left it.

use crate::action::Move;
use crate::change::Change;
use crate::error::{ErrorSeverity, GameError};
use crate::state::{GameState, GameStatus, WorldError};

/// A recorded change that does not fit the state it is replayed onto.
#[derive(Clone, Debug, PartialEq, Eq, thiserror::Error)]
#[error("change {index} ({kind}) does not apply: {source}")]
pub struct ReplayError {
    pub index: usize,
    pub kind: &'static str,
    pub source: WorldError,
}

impl GameError for ReplayError {
    fn severity(&self) -> ErrorSeverity {
        ErrorSeverity::Internal
    }

    fn error_code(&self) -> &'static str {
        "REPLAY_MISMATCH"
    }
}

/// Applies one change to `state` without validating it.
pub fn apply_change(state: &mut GameState, change: &Change) -> Result<(), WorldError> {
    match change {
        Change::UnitMoved { previous, updated } => {
            state.world.remove_unit(previous.coord)?;
            state.world.add_unit(updated.clone());
        }
        Change::UnitUpdated { updated, .. }
        | Change::UnitDamaged { updated, .. }
        | Change::UnitHealed { updated, .. } => {
            state.world.add_unit(updated.clone());
        }
        Change::UnitKilled { unit } => {
            state.world.remove_unit(unit.coord)?;
        }
        Change::UnitBuilt { unit, tile, .. } => {
            if unit.shortcut.is_some() {
                state.world.next_unit_shortcut(unit.player);
            }
            state.world.add_unit(unit.clone());
            let turn = state.turn;
            let tile = state
                .world
                .tile_at_mut(*tile)
                .ok_or(WorldError::TileNotFound(*tile))?;
            tile.last_acted_turn = turn;
        }
        Change::CoinsChanged { player, new, .. } => state.set_coins(*player, *new),
        Change::PlayerChanged {
            new_player,
            new_turn,
            reset_units,
            ..
        } => {
            state.current_player = *new_player;
            state.turn = *new_turn;
            for unit in reset_units {
                state.world.add_unit(unit.clone());
            }
        }
        Change::CaptureStarted { unit, .. } => {
            state.world.add_unit(unit.clone());
        }
        // The capturer's cleared marker arrives with its next unit change.
        Change::CaptureCompleted { .. } => {}
        Change::TileOwnershipChanged {
            coord, new_owner, ..
        } => {
            let tile = state
                .world
                .tile_at_mut(*coord)
                .ok_or(WorldError::TileNotFound(*coord))?;
            tile.player = *new_owner;
        }
        Change::GameEnded { winner } => {
            state.status = GameStatus::Finished { winner: *winner };
        }
    }
    Ok(())
}

/// Applies `changes` in order.
pub fn replay(state: &mut GameState, changes: &[Change]) -> Result<(), ReplayError> {
    for (index, change) in changes.iter().enumerate() {
        apply_change(state, change).map_err(|source| ReplayError {
            index,
            kind: change.kind(),
            source,
        })?;
    }
    Ok(())
}

/// One executed move and the changes it produced.
#[derive(Clone, Debug, PartialEq)]
#[cfg_attr(feature = "serde", derive(serde::Serialize, serde::Deserialize))]
pub struct RecordedMove {
    /// Position in the game's move stream, starting at 1.
    pub sequence: u64,
    pub mv: Move,
    pub changes: Vec<Change>,
}

/// Moves committed together.
#[derive(Clone, Debug, Default, PartialEq)]
#[cfg_attr(feature = "serde", derive(serde::Serialize, serde::Deserialize))]
pub struct MoveGroup {
    pub moves: Vec<RecordedMove>,
}

impl MoveGroup {
    pub fn changes(&self) -> impl Iterator<Item = &Change> {
        self.moves.iter().flat_map(|recorded| recorded.changes.iter())
    }
}

/// Ordered groups of recorded moves for one game.
#[derive(Clone, Debug, Default, PartialEq)]
#[cfg_attr(feature = "serde", derive(serde::Serialize, serde::Deserialize))]
pub struct History {
    groups: Vec<MoveGroup>,
}

impl History {
    pub fn new() -> Self {
        Self::default()
    }

    pub fn groups(&self) -> &[MoveGroup] {
        &self.groups
    }

    pub fn moves(&self) -> impl Iterator<Item = &RecordedMove> {
        self.groups.iter().flat_map(|group| group.moves.iter())
    }

    /// Sequence number of the latest recorded move, 0 when empty.
    pub fn last_sequence(&self) -> u64 {
        self.moves().last().map_or(0, |recorded| recorded.sequence)
    }

    /// Moves recorded after `sequence`.
    pub fn since(&self, sequence: u64) -> impl Iterator<Item = &RecordedMove> {
        self.moves().filter(move |recorded| recorded.sequence > sequence)
    }

    /// Appends a group, numbering its moves after the latest one.
    pub fn push_group<I>(&mut self, entries: I) -> &MoveGroup
    where
        I: IntoIterator<Item = (Move, Vec<Change>)>,
    {
        let mut sequence = self.last_sequence();
        let moves = entries
            .into_iter()
            .map(|(mv, changes)| {
                sequence += 1;
                RecordedMove {
                    sequence,
                    mv,
                    changes,
                }
            })
            .collect();
        self.groups.push(MoveGroup { moves });
        &self.groups[self.groups.len() - 1]
    }

    /// Replays every recorded move onto `state`, one version per move.
    pub fn replay_onto(&self, state: &mut GameState) -> Result<(), ReplayError> {
        for recorded in self.moves() {
            replay(state, &recorded.changes)?;
            state.version += 1;
        }
        Ok(())
    }
}
