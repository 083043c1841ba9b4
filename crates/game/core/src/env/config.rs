//! Game settings oracle.
//!
//! Settings vary per game (player count, income table, unit restrictions)
//! while the rules table is shared by every game.
use crate::state::{TerrainId, UnitTypeId};

use super::rules::tiles;

/// Per-game configuration visible to the engine.
pub trait SettingsOracle: Send + Sync {
    fn income(&self) -> &IncomeConfig;

    /// Units that may be built; `None` allows every unit.
    fn allowed_units(&self) -> Option<&[UnitTypeId]>;

    fn pass_through(&self) -> PassThrough;

    fn is_unit_allowed(&self, unit: UnitTypeId) -> bool {
        self.allowed_units()
            .is_none_or(|allowed| allowed.contains(&unit))
    }
}

/// Whether paths may cross tiles occupied by other units.
///
/// With `Allow`, occupied tiles are costed and reported as pass-through
/// edges but are never destinations. With `Forbid` they are not expanded.
#[derive(Clone, Copy, Debug, Default, PartialEq, Eq, Hash)]
#[cfg_attr(feature = "serde", derive(serde::Serialize, serde::Deserialize))]
#[cfg_attr(feature = "serde", serde(rename_all = "snake_case"))]
pub enum PassThrough {
    #[default]
    Allow,
    Forbid,
}

/// Income per owned building plus a flat per-turn amount.
///
/// A zero entry falls back to the built-in default for that building.
#[derive(Clone, Debug, Default, PartialEq, Eq)]
#[cfg_attr(feature = "serde", derive(serde::Serialize, serde::Deserialize))]
#[cfg_attr(feature = "serde", serde(default))]
pub struct IncomeConfig {
    pub landbase: i64,
    pub navalbase: i64,
    pub airportbase: i64,
    pub missilesilo: i64,
    pub mines: i64,
    pub game_income: i64,
}

impl IncomeConfig {
    pub const DEFAULT_LANDBASE: i64 = 100;
    pub const DEFAULT_NAVALBASE: i64 = 150;
    pub const DEFAULT_AIRPORTBASE: i64 = 200;
    pub const DEFAULT_MISSILESILO: i64 = 300;
    pub const DEFAULT_MINES: i64 = 500;

    /// Income a tile of `terrain` yields its owner per turn.
    pub fn tile_income(&self, terrain: TerrainId) -> i64 {
        let (configured, fallback) = match terrain {
            tiles::LAND_BASE => (self.landbase, Self::DEFAULT_LANDBASE),
            tiles::NAVAL_BASE => (self.navalbase, Self::DEFAULT_NAVALBASE),
            tiles::AIRPORT_BASE => (self.airportbase, Self::DEFAULT_AIRPORTBASE),
            tiles::MISSILE_SILO => (self.missilesilo, Self::DEFAULT_MISSILESILO),
            tiles::MINES => (self.mines, Self::DEFAULT_MINES),
            _ => return 0,
        };
        if configured > 0 { configured } else { fallback }
    }

    /// Total income for a player owning tiles of the given terrains.
    pub fn player_income(&self, owned: impl IntoIterator<Item = TerrainId>) -> i64 {
        let buildings: i64 = owned
            .into_iter()
            .map(|terrain| self.tile_income(terrain))
            .sum();
        buildings + self.game_income.max(0)
    }
}

/// Concrete settings for one game.
#[derive(Clone, Debug, PartialEq, Eq)]
#[cfg_attr(feature = "serde", derive(serde::Serialize, serde::Deserialize))]
#[cfg_attr(feature = "serde", serde(default))]
pub struct GameSettings {
    pub player_count: u32,
    pub starting_coins: i64,
    pub income: IncomeConfig,
    pub allowed_units: Option<Vec<UnitTypeId>>,
    pub pass_through: PassThrough,
}

impl GameSettings {
    pub const DEFAULT_PLAYER_COUNT: u32 = 2;
    pub const DEFAULT_STARTING_COINS: i64 = 300;
}

impl Default for GameSettings {
    fn default() -> Self {
        Self {
            player_count: Self::DEFAULT_PLAYER_COUNT,
            starting_coins: Self::DEFAULT_STARTING_COINS,
            income: IncomeConfig::default(),
            allowed_units: None,
            pass_through: PassThrough::Allow,
        }
    }
}

impl SettingsOracle for GameSettings {
    fn income(&self) -> &IncomeConfig {
        &self.income
    }

    fn allowed_units(&self) -> Option<&[UnitTypeId]> {
        self.allowed_units.as_deref()
    }

    fn pass_through(&self) -> PassThrough {
        self.pass_through
    }
}
