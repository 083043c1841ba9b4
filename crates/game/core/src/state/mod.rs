//! Authoritative game state.
//!
//! [`GameState`] owns the layered [`World`], the scalar turn bookkeeping
//! (current player, turn, coins, status), the per-game RNG and the version
//! counter used for optimistic concurrency. It is mutated only by the
//! [`GameEngine`](crate::engine::GameEngine) and by change replay.
mod coord;
mod error;
mod snapshot;
mod tile;
mod unit;
mod world;

use std::collections::BTreeMap;

pub use coord::{Coord, CoordParseError, Direction};
pub use error::WorldError;
pub use snapshot::{GameSnapshot, WorldSnapshot};
pub use tile::{Crossing, NEUTRAL, Tile};
pub use unit::{AttackRecord, Unit};
pub use world::World;

use crate::env::GameRng;

/// Player identifier. Players are numbered `1..=player_count`; 0 is neutral.
pub type PlayerId = u32;

/// Unit type identifier in the rules table.
pub type UnitTypeId = u32;

/// Terrain (tile type) identifier in the rules table.
pub type TerrainId = u32;

/// Turn counter. Starts at 1 and increases when the last player ends a turn.
pub type Turn = u32;

/// Whether the game still accepts moves.
#[derive(Clone, Copy, Debug, Default, PartialEq, Eq)]
#[cfg_attr(feature = "serde", derive(serde::Serialize, serde::Deserialize))]
pub enum GameStatus {
    #[default]
    InProgress,
    Finished {
        winner: PlayerId,
    },
}

impl GameStatus {
    pub fn is_finished(&self) -> bool {
        matches!(self, GameStatus::Finished { .. })
    }

    pub fn winner(&self) -> Option<PlayerId> {
        match self {
            GameStatus::InProgress => None,
            GameStatus::Finished { winner } => Some(*winner),
        }
    }
}

/// Scalar fields captured before a transaction so a failed move can be
/// rolled back together with its world layer.
#[derive(Clone, Debug, PartialEq)]
pub(crate) struct Checkpoint {
    current_player: PlayerId,
    turn: Turn,
    coins: BTreeMap<PlayerId, i64>,
    rng: GameRng,
    status: GameStatus,
}

/// Canonical game state.
#[derive(Clone, Debug, PartialEq)]
#[cfg_attr(
    feature = "serde",
    derive(serde::Serialize, serde::Deserialize),
    serde(into = "GameSnapshot", try_from = "GameSnapshot")
)]
pub struct GameState {
    pub current_player: PlayerId,
    pub turn: Turn,
    /// Incremented once per successfully executed move.
    pub version: u64,
    pub player_count: u32,
    pub coins: BTreeMap<PlayerId, i64>,
    pub world: World,
    pub rng: GameRng,
    pub status: GameStatus,
}

impl GameState {
    /// Starts a game on `world` with player 1 to move on turn 1.
    pub fn new(world: World, seed: u64, player_count: u32, starting_coins: i64) -> Self {
        let coins = (1..=player_count)
            .map(|player| (player, starting_coins))
            .collect();
        Self {
            current_player: 1,
            turn: 1,
            version: 0,
            player_count,
            coins,
            world,
            rng: GameRng::from_seed(seed),
            status: GameStatus::InProgress,
        }
    }

    pub fn coins(&self, player: PlayerId) -> i64 {
        self.coins.get(&player).copied().unwrap_or(0)
    }

    pub fn set_coins(&mut self, player: PlayerId, amount: i64) {
        self.coins.insert(player, amount);
    }

    /// Players `1..=player_count`.
    pub fn players(&self) -> impl Iterator<Item = PlayerId> {
        1..=self.player_count
    }

    /// Player that moves after the current one, and the turn they move in.
    pub fn next_player(&self) -> (PlayerId, Turn) {
        if self.current_player >= self.player_count {
            (1, self.turn + 1)
        } else {
            (self.current_player + 1, self.turn)
        }
    }

    pub(crate) fn checkpoint(&self) -> Checkpoint {
        Checkpoint {
            current_player: self.current_player,
            turn: self.turn,
            coins: self.coins.clone(),
            rng: self.rng,
            status: self.status,
        }
    }

    pub(crate) fn restore(&mut self, checkpoint: Checkpoint) {
        self.current_player = checkpoint.current_player;
        self.turn = checkpoint.turn;
        self.coins = checkpoint.coins;
        self.rng = checkpoint.rng;
        self.status = checkpoint.status;
    }

    /// Flattens the state into its persisted shape.
    pub fn to_snapshot(&self) -> GameSnapshot {
        GameSnapshot {
            current_player: self.current_player,
            turn: self.turn,
            version: self.version,
            player_count: self.player_count,
            world: self.world.to_snapshot(),
            coins: self.coins.clone(),
            rng: self.rng,
            status: self.status,
        }
    }

    pub fn from_snapshot(snapshot: GameSnapshot) -> Result<Self, WorldError> {
        Ok(Self {
            current_player: snapshot.current_player,
            turn: snapshot.turn,
            version: snapshot.version,
            player_count: snapshot.player_count,
            coins: snapshot.coins,
            world: World::from_snapshot(snapshot.world)?,
            rng: snapshot.rng,
            status: snapshot.status,
        })
    }

    /// SHA-256 over the bincode encoding of the persisted shape.
    ///
    /// Two independent runs that end in the same state produce the same
    /// digest.
    #[cfg(feature = "serde")]
    pub fn digest(&self) -> [u8; 32] {
        use sha2::{Digest, Sha256};

        // The snapshot holds only plain structs, sequences and numbers, which
        // bincode always encodes.
        let bytes = bincode::serialize(&self.to_snapshot())
            .expect("GameSnapshot serialization should not fail");
        let hash = Sha256::digest(&bytes);
        let mut out = [0u8; 32];
        out.copy_from_slice(&hash);
        out
    }
}

impl From<GameState> for GameSnapshot {
    fn from(state: GameState) -> Self {
        state.to_snapshot()
    }
}

impl TryFrom<GameSnapshot> for GameState {
    type Error = WorldError;

    fn try_from(snapshot: GameSnapshot) -> Result<Self, Self::Error> {
        GameState::from_snapshot(snapshot)
    }
}
