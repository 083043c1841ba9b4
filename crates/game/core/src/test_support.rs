//! Rules and board fixtures shared by unit tests.
use std::collections::BTreeMap;

use crate::env::{
    GameSettings, RulesTable, TerrainDefinition, TerrainUnitProperties, UnitDefinition,
    UnitTerrain, tiles,
};
use crate::state::{Coord, GameState, PlayerId, Tile, Unit, UnitTypeId, World};

pub const SOLDIER: UnitTypeId = 1;
pub const TANK: UnitTypeId = 2;
pub const ARTILLERY: UnitTypeId = 3;
pub const SCOUT: UnitTypeId = 4;
pub const JET: UnitTypeId = 5;

pub const MOUNTAINS: u32 = 9;

pub fn unit(q: i32, r: i32, player: PlayerId, unit_type: UnitTypeId) -> Unit {
    Unit::new(Coord::new(q, r), player, unit_type, 10)
}

pub fn tile(q: i32, r: i32) -> Tile {
    Tile::new(Coord::new(q, r), tiles::GRASS)
}

fn attacks(entries: &[(&str, i32)]) -> BTreeMap<String, i32> {
    entries
        .iter()
        .map(|(key, value)| (key.to_string(), *value))
        .collect()
}

fn definition(id: UnitTypeId, name: &str) -> UnitDefinition {
    UnitDefinition {
        id,
        name: name.into(),
        health: 10,
        coins: 75,
        movement_points: 3.0,
        retreat_points: 0.0,
        attack_range: 1,
        defense: 6,
        unit_class: "Light".into(),
        unit_terrain: UnitTerrain::Land,
        attack_vs_class: BTreeMap::new(),
        splash_damage: 0,
        fix_value: 0,
        action_order: Vec::new(),
    }
}

/// A single "Light:Land" unit type with the given attack and defense.
pub fn duel_rules(attack: i32, defense: i32) -> RulesTable {
    RulesTable::new()
        .with_unit(UnitDefinition {
            defense,
            attack_vs_class: attacks(&[("Light:Land", attack)]),
            ..definition(SOLDIER, "Soldier")
        })
        .with_terrain(TerrainDefinition {
            id: tiles::GRASS,
            name: "Grass".into(),
            buildable_unit_ids: Vec::new(),
        })
}

/// A small but complete rule set covering every action.
pub fn standard_rules() -> RulesTable {
    RulesTable::new()
        .with_unit(UnitDefinition {
            attack_vs_class: attacks(&[("Light:Land", 6), ("Heavy:Land", 3)]),
            ..definition(SOLDIER, "Soldier")
        })
        .with_unit(UnitDefinition {
            coins: 200,
            movement_points: 4.0,
            defense: 10,
            unit_class: "Heavy".into(),
            attack_vs_class: attacks(&[("Light:Land", 10), ("Heavy:Land", 7)]),
            ..definition(TANK, "Tank")
        })
        .with_unit(UnitDefinition {
            coins: 200,
            movement_points: 2.0,
            attack_range: 3,
            defense: 4,
            unit_class: "Heavy".into(),
            attack_vs_class: attacks(&[("Light:Land", 8), ("Heavy:Land", 6)]),
            splash_damage: 1,
            action_order: vec!["move|attack".into()],
            ..definition(ARTILLERY, "Artillery")
        })
        .with_unit(UnitDefinition {
            retreat_points: 1.0,
            attack_vs_class: attacks(&[("Light:Land", 5)]),
            action_order: vec!["move".into(), "attack".into(), "retreat".into()],
            ..definition(SCOUT, "Scout")
        })
        .with_unit(UnitDefinition {
            coins: 300,
            movement_points: 6.0,
            unit_terrain: UnitTerrain::Air,
            attack_vs_class: attacks(&[("Light:Land", 8)]),
            ..definition(JET, "Jet")
        })
        .with_terrain(TerrainDefinition {
            id: tiles::LAND_BASE,
            name: "Land Base".into(),
            buildable_unit_ids: vec![SOLDIER, TANK, ARTILLERY, SCOUT],
        })
        .with_terrain(TerrainDefinition {
            id: tiles::AIRPORT_BASE,
            name: tiles::AIRPORT_BASE_NAME.into(),
            buildable_unit_ids: vec![JET],
        })
        .with_terrain(TerrainDefinition {
            id: tiles::GRASS,
            name: "Grass".into(),
            buildable_unit_ids: Vec::new(),
        })
        .with_terrain(TerrainDefinition {
            id: MOUNTAINS,
            name: "Mountains".into(),
            buildable_unit_ids: Vec::new(),
        })
        .with_terrain(TerrainDefinition {
            id: tiles::MINES,
            name: "Mines".into(),
            buildable_unit_ids: Vec::new(),
        })
        .with_terrain_unit(TerrainUnitProperties {
            terrain_id: tiles::LAND_BASE,
            unit_id: SOLDIER,
            healing_bonus: 2,
            can_capture: true,
            ..Default::default()
        })
        .with_terrain_unit(TerrainUnitProperties {
            terrain_id: tiles::MINES,
            unit_id: SOLDIER,
            healing_bonus: 1,
            can_capture: true,
            ..Default::default()
        })
        .with_terrain_unit(TerrainUnitProperties {
            terrain_id: tiles::LAND_BASE,
            unit_id: TANK,
            healing_bonus: 2,
            ..Default::default()
        })
        .with_terrain_unit(TerrainUnitProperties {
            terrain_id: MOUNTAINS,
            unit_id: SOLDIER,
            movement_cost: 3.0,
            defense_bonus: 2,
            ..Default::default()
        })
        .with_terrain_unit(TerrainUnitProperties {
            terrain_id: tiles::AIRPORT_BASE,
            unit_id: JET,
            healing_bonus: 3,
            ..Default::default()
        })
        .with_terrain_unit(TerrainUnitProperties {
            terrain_id: tiles::LAND_BASE,
            unit_id: JET,
            healing_bonus: 3,
            ..Default::default()
        })
}

/// Hexagon of grass tiles around the origin.
pub fn grass_world(radius: u32) -> World {
    let mut world = World::new();
    for coord in Coord::ORIGIN.within(radius) {
        world.add_tile(Tile::new(coord, tiles::GRASS));
    }
    world
}

/// Two-player game on `world`, units topped up for turn 1.
pub fn game(world: World) -> GameState {
    GameState::new(world, 42, 2, GameSettings::DEFAULT_STARTING_COINS)
}

/// Unit already refreshed for `turn` with its full movement budget.
pub fn ready_unit(
    rules: &RulesTable,
    q: i32,
    r: i32,
    player: PlayerId,
    unit_type: UnitTypeId,
    turn: u32,
) -> Unit {
    use crate::env::RulesOracle;

    let mut unit = unit(q, r, player, unit_type);
    if let Some(def) = rules.unit(unit_type) {
        unit.health = def.health;
        unit.distance_left = def.movement_points;
    }
    unit.last_topped_up_turn = turn;
    unit
}
