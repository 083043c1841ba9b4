//! Typed records of state changes produced by executed moves.
//!
//! Every mutation a move performs is described by one [`Change`]. Unit
//! changes carry the complete unit after the change, so replaying a change
//! list onto an identical starting state reproduces the authoritative state
//! exactly (see [`crate::history`]).
use crate::state::{Coord, PlayerId, TerrainId, Turn, Unit};

/// Why a player's coin balance changed.
#[derive(Clone, Copy, Debug, PartialEq, Eq, strum::Display, strum::IntoStaticStr)]
#[cfg_attr(feature = "serde", derive(serde::Serialize, serde::Deserialize))]
#[cfg_attr(feature = "serde", serde(rename_all = "snake_case"))]
#[strum(serialize_all = "snake_case")]
pub enum CoinReason {
    Build,
    Income,
}

/// One state change.
#[derive(Clone, Debug, PartialEq)]
#[cfg_attr(feature = "serde", derive(serde::Serialize, serde::Deserialize))]
pub enum Change {
    UnitMoved {
        previous: Unit,
        updated: Unit,
    },
    /// A unit changed without moving or taking damage.
    UnitUpdated {
        previous: Unit,
        updated: Unit,
    },
    UnitDamaged {
        previous: Unit,
        updated: Unit,
        damage: u32,
    },
    /// The unit (as it was before the fatal blow) left the board.
    UnitKilled {
        unit: Unit,
    },
    UnitBuilt {
        unit: Unit,
        tile: Coord,
        cost: i64,
        player_coins: i64,
    },
    CoinsChanged {
        player: PlayerId,
        previous: i64,
        new: i64,
        reason: CoinReason,
    },
    PlayerChanged {
        previous_player: PlayerId,
        new_player: PlayerId,
        previous_turn: Turn,
        new_turn: Turn,
        /// Incoming player's units after their refresh.
        reset_units: Vec<Unit>,
    },
    CaptureStarted {
        unit: Unit,
        tile: Coord,
        tile_type: TerrainId,
        current_owner: PlayerId,
    },
    CaptureCompleted {
        coord: Coord,
        player: PlayerId,
    },
    TileOwnershipChanged {
        coord: Coord,
        previous_owner: PlayerId,
        new_owner: PlayerId,
    },
    UnitHealed {
        previous: Unit,
        updated: Unit,
        amount: u32,
    },
    GameEnded {
        winner: PlayerId,
    },
}

impl Change {
    /// Stable snake_case name of the change kind, for logs and metrics.
    pub fn kind(&self) -> &'static str {
        match self {
            Change::UnitMoved { .. } => "unit_moved",
            Change::UnitUpdated { .. } => "unit_updated",
            Change::UnitDamaged { .. } => "unit_damaged",
            Change::UnitKilled { .. } => "unit_killed",
            Change::UnitBuilt { .. } => "unit_built",
            Change::CoinsChanged { .. } => "coins_changed",
            Change::PlayerChanged { .. } => "player_changed",
            Change::CaptureStarted { .. } => "capture_started",
            Change::CaptureCompleted { .. } => "capture_completed",
            Change::TileOwnershipChanged { .. } => "tile_ownership_changed",
            Change::UnitHealed { .. } => "unit_healed",
            Change::GameEnded { .. } => "game_ended",
        }
    }
}
