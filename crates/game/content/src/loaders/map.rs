//! Map data loader.
//!
//! A map lists tiles by axial coordinate and the units placed on them at the
//! start of a game. Units take their starting health from the rules.

use std::path::Path;

use anyhow::{Context, bail};
use hexline_core::{
    Coord, Crossing, NEUTRAL, PlayerId, RulesOracle, TerrainId, Tile, Unit, UnitTypeId, World,
};
use serde::{Deserialize, Serialize};

use crate::loaders::{LoadResult, read_file};

/// One tile entry in a map file.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct MapTile {
    pub q: i32,
    pub r: i32,
    pub tile_type: TerrainId,
    #[serde(default = "neutral")]
    pub player: PlayerId,
    #[serde(default)]
    pub crossing: Option<Crossing>,
}

/// One starting unit in a map file.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct MapUnit {
    pub q: i32,
    pub r: i32,
    pub player: PlayerId,
    pub unit_type: UnitTypeId,
}

fn neutral() -> PlayerId {
    NEUTRAL
}

/// Map data structure for RON files.
#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize, Deserialize)]
pub struct MapData {
    pub tiles: Vec<MapTile>,
    #[serde(default)]
    pub units: Vec<MapUnit>,
}

impl MapData {
    /// Builds the starting world.
    ///
    /// Every tile and unit type must exist in `rules`, each coordinate may
    /// hold at most one tile and one unit, and units must stand on a tile.
    pub fn into_world(self, rules: &impl RulesOracle) -> LoadResult<World> {
        let mut world = World::new();

        for tile in self.tiles {
            let coord = Coord::new(tile.q, tile.r);
            if rules.terrain(tile.tile_type).is_none() {
                bail!("tile {} uses undefined terrain {}", coord, tile.tile_type);
            }
            let mut placed = Tile::new(coord, tile.tile_type).with_owner(tile.player);
            placed.crossing = tile.crossing;
            placed.shortcut = world.next_tile_shortcut(tile.player);
            if world.add_tile(placed).is_some() {
                bail!("duplicate tile at {}", coord);
            }
        }

        for unit in self.units {
            let coord = Coord::new(unit.q, unit.r);
            let def = rules.unit(unit.unit_type).with_context(|| {
                format!("unit at {} uses undefined type {}", coord, unit.unit_type)
            })?;
            if world.tile_at(coord).is_none() {
                bail!("unit at {} stands outside the map", coord);
            }
            let mut placed = Unit::new(coord, unit.player, unit.unit_type, def.health);
            placed.shortcut = world.next_unit_shortcut(unit.player);
            if world.add_unit(placed).is_some() {
                bail!("duplicate unit at {}", coord);
            }
        }

        Ok(world)
    }
}

/// Loader for map data from RON files.
pub struct MapLoader;

impl MapLoader {
    /// Load map data from a RON file.
    pub fn load(path: &Path) -> LoadResult<MapData> {
        let content = read_file(path)?;
        Self::parse(&content).with_context(|| format!("in map file {}", path.display()))
    }

    /// Parse map data from RON text.
    pub fn parse(content: &str) -> LoadResult<MapData> {
        ron::from_str(content).map_err(|e| anyhow::anyhow!("Failed to parse map RON: {}", e))
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use hexline_core::RulesTable;
    use hexline_core::env::{TerrainDefinition, UnitDefinition, tiles};

    fn rules() -> RulesTable {
        RulesTable::new()
            .with_unit(UnitDefinition {
                id: 1,
                name: "Soldier".into(),
                health: 10,
                coins: 75,
                movement_points: 3.0,
                retreat_points: 0.0,
                attack_range: 1,
                defense: 6,
                unit_class: "Light".into(),
                unit_terrain: Default::default(),
                attack_vs_class: Default::default(),
                splash_damage: 0,
                fix_value: 0,
                action_order: Vec::new(),
            })
            .with_terrain(TerrainDefinition {
                id: tiles::GRASS,
                name: "Grass".into(),
                buildable_unit_ids: Vec::new(),
            })
    }

    const MAP: &str = r#"(
        tiles: [
            (q: 0, r: 0, tile_type: 5),
            (q: 1, r: 0, tile_type: 5, player: 2),
            (q: 0, r: 1, tile_type: 5, crossing: Some(bridge)),
        ],
        units: [
            (q: 0, r: 0, player: 1, unit_type: 1),
            (q: 1, r: 0, player: 2, unit_type: 1),
        ],
    )"#;

    #[test]
    fn builds_world_with_rule_health() {
        let world = MapLoader::parse(MAP).unwrap().into_world(&rules()).unwrap();

        assert_eq!(world.num_tiles(), 3);
        assert_eq!(world.tile_at(Coord::ORIGIN).map(|t| t.player), Some(NEUTRAL));
        assert_eq!(world.tile_at(Coord::ORIGIN).and_then(|t| t.crossing), None);
        assert_eq!(
            world.tile_at(Coord::new(0, 1)).and_then(|t| t.crossing),
            Some(Crossing::Bridge)
        );
        let unit = world.unit_at(Coord::new(1, 0)).unwrap();
        assert_eq!((unit.player, unit.health), (2, 10));
        assert_eq!(unit.shortcut.as_deref(), Some("B1"));
    }

    #[test]
    fn rejects_units_off_the_map() {
        let mut map = MapLoader::parse(MAP).unwrap();
        map.units.push(MapUnit {
            q: 4,
            r: 4,
            player: 1,
            unit_type: 1,
        });
        let err = map.into_world(&rules()).unwrap_err();
        assert!(err.to_string().contains("outside the map"), "{err}");
    }

    #[test]
    fn rejects_unknown_terrain() {
        let map = MapData {
            tiles: vec![MapTile {
                q: 0,
                r: 0,
                tile_type: 99,
                player: NEUTRAL,
                crossing: None,
            }],
            units: Vec::new(),
        };
        assert!(map.into_world(&rules()).is_err());
    }
}
