//! Persisted shapes of the world and the whole game.
use std::collections::BTreeMap;

use crate::env::GameRng;

use super::{GameStatus, PlayerId, Tile, Turn, Unit};

/// Flattened world keyed by `"q,r"` strings.
#[derive(Clone, Debug, Default, PartialEq)]
#[cfg_attr(feature = "serde", derive(serde::Serialize, serde::Deserialize))]
pub struct WorldSnapshot {
    pub tiles: BTreeMap<String, Tile>,
    pub units: BTreeMap<String, Unit>,
    /// Last shortcut number handed out per player.
    #[cfg_attr(feature = "serde", serde(default))]
    pub unit_counters: BTreeMap<PlayerId, u32>,
    #[cfg_attr(feature = "serde", serde(default))]
    pub tile_counters: BTreeMap<PlayerId, u32>,
}

/// Complete persisted game.
///
/// This is the serde representation of [`GameState`](super::GameState) and
/// the input of its digest.
#[derive(Clone, Debug, PartialEq)]
#[cfg_attr(feature = "serde", derive(serde::Serialize, serde::Deserialize))]
pub struct GameSnapshot {
    pub current_player: PlayerId,
    pub turn: Turn,
    pub version: u64,
    pub player_count: u32,
    pub world: WorldSnapshot,
    pub coins: BTreeMap<PlayerId, i64>,
    pub rng: GameRng,
    pub status: GameStatus,
}
