//! Data-driven rules, settings and maps.
//!
//! This crate loads authored content from RON/TOML files:
//! - Rules tables: units, terrains and terrain-unit properties (RON)
//! - Per-game settings: player count, income, unit restrictions (TOML)
//! - Starting maps: tiles and initial units (RON)
//!
//! Content feeds the engine's oracles and the initial world; it never
//! appears in game state on its own.
//!
//! All loaders deserialize `hexline-core` types directly through serde.

#[cfg(feature = "loaders")]
pub mod loaders;

#[cfg(feature = "loaders")]
pub use loaders::{
    ContentFactory, LoadResult, MapData, MapLoader, MapTile, MapUnit, RulesLoader, SettingsLoader,
};
