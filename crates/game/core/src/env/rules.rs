//! Rules oracle: unit, terrain and terrain-unit definitions.
use std::collections::BTreeMap;

use crate::state::{TerrainId, UnitTypeId};

/// Movement cost used when a terrain-unit pair has no positive cost.
pub const DEFAULT_MOVEMENT_COST: f64 = 1.0;

/// Default action order when a unit definition lists none.
pub const DEFAULT_ACTION_ORDER: [&str; 2] = ["move", "attack|capture"];

/// Well-known terrain ids referenced by the rules.
pub mod tiles {
    use crate::state::TerrainId;

    pub const LAND_BASE: TerrainId = 1;
    pub const NAVAL_BASE: TerrainId = 2;
    pub const AIRPORT_BASE: TerrainId = 3;
    pub const DESERT: TerrainId = 4;
    pub const GRASS: TerrainId = 5;
    pub const WATER_REGULAR: TerrainId = 10;
    pub const WATER_SHALLOW: TerrainId = 14;
    pub const WATER_DEEP: TerrainId = 15;
    pub const MISSILE_SILO: TerrainId = 16;
    pub const BRIDGE_REGULAR: TerrainId = 17;
    pub const BRIDGE_SHALLOW: TerrainId = 18;
    pub const BRIDGE_DEEP: TerrainId = 19;
    pub const MINES: TerrainId = 20;
    pub const ROAD: TerrainId = 22;

    /// Name of the only terrain on which air units regenerate.
    pub const AIRPORT_BASE_NAME: &str = "Airport Base";
}

/// Movement domain of a unit. Its `Display` form is the second half of the
/// attack table key (`"Light:Land"`).
#[derive(Clone, Copy, Debug, Default, PartialEq, Eq, Hash, strum::Display, strum::EnumString)]
#[cfg_attr(feature = "serde", derive(serde::Serialize, serde::Deserialize))]
pub enum UnitTerrain {
    #[default]
    Land,
    Water,
    Air,
}

/// Static definition of a unit type.
#[derive(Clone, Debug, PartialEq)]
#[cfg_attr(feature = "serde", derive(serde::Serialize, serde::Deserialize))]
pub struct UnitDefinition {
    pub id: UnitTypeId,
    pub name: String,
    /// Maximum health.
    pub health: u32,
    /// Build cost.
    pub coins: i64,
    pub movement_points: f64,
    #[cfg_attr(feature = "serde", serde(default))]
    pub retreat_points: f64,
    pub attack_range: u32,
    pub defense: i32,
    pub unit_class: String,
    #[cfg_attr(feature = "serde", serde(default))]
    pub unit_terrain: UnitTerrain,
    /// Base attack keyed by `"<class>:<terrain>"` of the defender.
    #[cfg_attr(feature = "serde", serde(default))]
    pub attack_vs_class: BTreeMap<String, i32>,
    #[cfg_attr(feature = "serde", serde(default))]
    pub splash_damage: u32,
    /// Repair strength `F`; zero means the unit cannot fix others.
    #[cfg_attr(feature = "serde", serde(default))]
    pub fix_value: i32,
    /// Progression slots; each slot lists `|`-separated alternatives.
    #[cfg_attr(feature = "serde", serde(default))]
    pub action_order: Vec<String>,
}

impl UnitDefinition {
    /// Key other attackers use to look this unit up in their attack table.
    pub fn class_key(&self) -> String {
        format!("{}:{}", self.unit_class, self.unit_terrain)
    }

    pub fn attack_against(&self, target: &UnitDefinition) -> Option<i32> {
        self.attack_vs_class.get(&target.class_key()).copied()
    }

    /// The configured action order, or [`DEFAULT_ACTION_ORDER`] when empty.
    pub fn action_slots(&self) -> Vec<&str> {
        if self.action_order.is_empty() {
            DEFAULT_ACTION_ORDER.to_vec()
        } else {
            self.action_order.iter().map(String::as_str).collect()
        }
    }

    pub fn is_air(&self) -> bool {
        self.unit_terrain == UnitTerrain::Air
    }

    pub fn can_fix(&self) -> bool {
        self.fix_value > 0
    }

    /// Unit terrains this unit repairs: the built-in list for the well-known
    /// repair units, its own terrain otherwise.
    pub fn fix_targets(&self) -> Vec<UnitTerrain> {
        repair::default_targets(self.id).map_or_else(|| vec![self.unit_terrain], <[_]>::to_vec)
    }
}

/// Built-in repair units and their defaults.
pub mod repair {
    use super::UnitTerrain;
    use crate::state::UnitTypeId;

    pub const MEDIC: UnitTypeId = 27;
    pub const STRATOTANKER: UnitTypeId = 28;
    pub const ENGINEER: UnitTypeId = 29;
    pub const TUGBOAT: UnitTypeId = 31;
    pub const AIRCRAFT_CARRIER: UnitTypeId = 39;

    /// Fix value given to a built-in repair unit whose definition sets none.
    pub const DEFAULT_FIX_VALUE: i32 = 10;

    pub fn default_fix_value(unit: UnitTypeId) -> Option<i32> {
        matches!(unit, MEDIC | STRATOTANKER | ENGINEER | TUGBOAT | AIRCRAFT_CARRIER)
            .then_some(DEFAULT_FIX_VALUE)
    }

    /// Unit terrains a built-in repair unit may fix. The carrier is a water
    /// unit that repairs aircraft.
    pub fn default_targets(unit: UnitTypeId) -> Option<&'static [UnitTerrain]> {
        match unit {
            MEDIC | ENGINEER => Some(&[UnitTerrain::Land]),
            STRATOTANKER | AIRCRAFT_CARRIER => Some(&[UnitTerrain::Air]),
            TUGBOAT => Some(&[UnitTerrain::Water]),
            _ => None,
        }
    }
}

/// Static definition of a terrain type.
#[derive(Clone, Debug, PartialEq, Eq)]
#[cfg_attr(feature = "serde", derive(serde::Serialize, serde::Deserialize))]
pub struct TerrainDefinition {
    pub id: TerrainId,
    pub name: String,
    #[cfg_attr(feature = "serde", serde(default))]
    pub buildable_unit_ids: Vec<UnitTypeId>,
}

impl TerrainDefinition {
    pub fn can_build(&self, unit_type: UnitTypeId) -> bool {
        self.buildable_unit_ids.contains(&unit_type)
    }
}

/// Per terrain-unit pair properties.
#[derive(Clone, Debug, Default, PartialEq)]
#[cfg_attr(feature = "serde", derive(serde::Serialize, serde::Deserialize))]
#[cfg_attr(feature = "serde", serde(default))]
pub struct TerrainUnitProperties {
    pub terrain_id: TerrainId,
    pub unit_id: UnitTypeId,
    pub movement_cost: f64,
    pub attack_bonus: i32,
    pub defense_bonus: i32,
    pub healing_bonus: u32,
    pub can_capture: bool,
}

/// Read-only access to the game's rule tables.
///
/// Implementations must be deterministic; the engine never mutates them.
pub trait RulesOracle: Send + Sync {
    fn unit(&self, id: UnitTypeId) -> Option<&UnitDefinition>;

    fn terrain(&self, id: TerrainId) -> Option<&TerrainDefinition>;

    fn terrain_unit(&self, terrain: TerrainId, unit: UnitTypeId)
    -> Option<&TerrainUnitProperties>;

    /// Unit definition or [`OracleError::UnknownUnit`](super::OracleError).
    fn unit_def(&self, id: UnitTypeId) -> Result<&UnitDefinition, super::OracleError> {
        self.unit(id).ok_or(super::OracleError::UnknownUnit(id))
    }

    fn terrain_def(&self, id: TerrainId) -> Result<&TerrainDefinition, super::OracleError> {
        self.terrain(id).ok_or(super::OracleError::UnknownTerrain(id))
    }

    /// Cost for `unit` to enter a tile of `terrain`.
    fn movement_cost(&self, unit: UnitTypeId, terrain: TerrainId) -> f64 {
        match self.terrain_unit(terrain, unit) {
            Some(props) if props.movement_cost > 0.0 => props.movement_cost,
            _ => DEFAULT_MOVEMENT_COST,
        }
    }

    fn attack_bonus(&self, unit: UnitTypeId, terrain: TerrainId) -> i32 {
        self.terrain_unit(terrain, unit)
            .map_or(0, |props| props.attack_bonus)
    }

    fn defense_bonus(&self, unit: UnitTypeId, terrain: TerrainId) -> i32 {
        self.terrain_unit(terrain, unit)
            .map_or(0, |props| props.defense_bonus)
    }

    fn healing_bonus(&self, unit: UnitTypeId, terrain: TerrainId) -> u32 {
        self.terrain_unit(terrain, unit)
            .map_or(0, |props| props.healing_bonus)
    }

    fn can_capture(&self, unit: UnitTypeId, terrain: TerrainId) -> bool {
        self.terrain_unit(terrain, unit)
            .is_some_and(|props| props.can_capture)
    }
}
