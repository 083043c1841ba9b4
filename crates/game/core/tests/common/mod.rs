#![allow(dead_code)]

use std::collections::BTreeMap;

use hexline_core::env::tiles;
use hexline_core::{
    Coord, GameState, PlayerId, RulesTable, TerrainDefinition, TerrainUnitProperties, Tile, Unit,
    UnitDefinition, UnitTerrain, UnitTypeId, World,
};

pub const SOLDIER: UnitTypeId = 1;
pub const TANK: UnitTypeId = 2;

pub fn rules() -> RulesTable {
    let soldier = UnitDefinition {
        id: SOLDIER,
        name: "Soldier".into(),
        health: 10,
        coins: 75,
        movement_points: 3.0,
        retreat_points: 0.0,
        attack_range: 1,
        defense: 6,
        unit_class: "Light".into(),
        unit_terrain: UnitTerrain::Land,
        attack_vs_class: BTreeMap::from([("Light:Land".into(), 6), ("Heavy:Land".into(), 3)]),
        splash_damage: 0,
        fix_value: 0,
        action_order: Vec::new(),
    };
    let tank = UnitDefinition {
        id: TANK,
        name: "Tank".into(),
        coins: 200,
        movement_points: 4.0,
        defense: 10,
        unit_class: "Heavy".into(),
        attack_vs_class: BTreeMap::from([("Light:Land".into(), 10), ("Heavy:Land".into(), 7)]),
        ..soldier.clone()
    };

    RulesTable::new()
        .with_unit(soldier)
        .with_unit(tank)
        .with_terrain(TerrainDefinition {
            id: tiles::GRASS,
            name: "Grass".into(),
            buildable_unit_ids: Vec::new(),
        })
        .with_terrain(TerrainDefinition {
            id: tiles::LAND_BASE,
            name: "Land Base".into(),
            buildable_unit_ids: vec![SOLDIER, TANK],
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
            can_capture: true,
            ..Default::default()
        })
}

/// Grass hexagon with a land base for each of two players on the q axis.
pub fn board(radius: u32) -> World {
    let mut world = World::new();
    for coord in Coord::ORIGIN.within(radius) {
        world.add_tile(Tile::new(coord, tiles::GRASS));
    }
    let edge = radius as i32;
    world.add_tile(Tile::new(Coord::new(-edge, 0), tiles::LAND_BASE).with_owner(1));
    world.add_tile(Tile::new(Coord::new(edge, 0), tiles::LAND_BASE).with_owner(2));
    world
}

pub fn unit(q: i32, r: i32, player: PlayerId, unit_type: UnitTypeId) -> Unit {
    Unit::new(Coord::new(q, r), player, unit_type, 10)
}

pub fn two_player_game(world: World, seed: u64) -> GameState {
    GameState::new(world, seed, 2, 300)
}
