//! Deterministic rules for a hex-grid tactics game.
//!
//! `hexline-core` defines the canonical state (layered world, units, tiles,
//! coins), the move transitions and the change stream they produce. It
//! performs no I/O and holds no global state: rules and settings arrive as
//! oracles through [`Env`], and the per-game RNG lives in [`GameState`].
//! All state mutation flows through [`engine::GameEngine`]; replicas follow
//! along by replaying [`Change`]s with [`history::replay`].
pub mod action;
pub mod change;
pub mod combat;
pub mod engine;
pub mod env;
pub mod error;
pub mod history;
pub mod movement;
pub mod progression;
pub mod state;

#[cfg(test)]
mod test_support;

pub use action::{
    ActionKind, ActionTransition, AttackUnitAction, BuildUnitAction, CaptureBuildingAction,
    EndTurnAction, HealUnitAction, Move, MoveUnitAction, OptionsError, TileOptions, UnitOptions,
    tile_options, unit_options,
};
pub use change::{Change, CoinReason};
pub use engine::{ExecuteError, ExecutionOutcome, GameEngine, TransitionPhase, TransitionPhaseError};
pub use env::{
    Env, GameEnv, GameRng, GameSettings, IncomeConfig, PassThrough, RulesOracle, RulesTable,
    SettingsOracle, TerrainDefinition, TerrainUnitProperties, UnitDefinition, UnitTerrain,
};
pub use error::{ErrorContext, ErrorSeverity, GameError};
pub use history::{History, MoveGroup, RecordedMove, ReplayError, apply_change, replay};
pub use state::{
    Coord, Crossing, GameSnapshot, GameState, GameStatus, NEUTRAL, PlayerId, TerrainId, Tile, Turn,
    Unit, UnitTypeId, World, WorldError,
};
