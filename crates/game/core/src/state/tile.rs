use super::{Coord, PlayerId, TerrainId, Turn};
use crate::env::tiles;

/// Neutral owner marker.
pub const NEUTRAL: PlayerId = 0;

/// Road or bridge laid over a tile's base terrain.
#[derive(Clone, Copy, Debug, PartialEq, Eq, Hash, strum::Display, strum::EnumString)]
#[cfg_attr(feature = "serde", derive(serde::Serialize, serde::Deserialize))]
#[cfg_attr(feature = "serde", serde(rename_all = "snake_case"))]
#[strum(serialize_all = "snake_case")]
pub enum Crossing {
    Road,
    Bridge,
}

/// A board tile.
#[derive(Clone, Debug, PartialEq, Eq)]
#[cfg_attr(feature = "serde", derive(serde::Serialize, serde::Deserialize))]
pub struct Tile {
    pub coord: Coord,
    pub tile_type: TerrainId,
    /// Owning player, [`NEUTRAL`] when unowned.
    pub player: PlayerId,
    pub shortcut: Option<String>,
    /// Turn in which this tile last built a unit.
    pub last_acted_turn: Turn,
    #[cfg_attr(feature = "serde", serde(default))]
    pub crossing: Option<Crossing>,
}

impl Tile {
    pub fn new(coord: Coord, tile_type: TerrainId) -> Self {
        Self {
            coord,
            tile_type,
            player: NEUTRAL,
            shortcut: None,
            last_acted_turn: 0,
            crossing: None,
        }
    }

    #[must_use]
    pub fn with_crossing(mut self, crossing: Crossing) -> Self {
        self.crossing = Some(crossing);
        self
    }

    #[must_use]
    pub fn with_owner(mut self, player: PlayerId) -> Self {
        self.player = player;
        self
    }

    pub fn is_neutral(&self) -> bool {
        self.player == NEUTRAL
    }

    pub fn is_owned_by(&self, player: PlayerId) -> bool {
        self.player == player
    }

    /// Terrain used for movement lookups.
    ///
    /// A road always moves like [`tiles::ROAD`]. A bridge moves like the
    /// bridge matching the water depth below it, the regular bridge when the
    /// base terrain is not water.
    pub fn effective_type(&self) -> TerrainId {
        match self.crossing {
            None => self.tile_type,
            Some(Crossing::Road) => tiles::ROAD,
            Some(Crossing::Bridge) => match self.tile_type {
                tiles::WATER_SHALLOW => tiles::BRIDGE_SHALLOW,
                tiles::WATER_DEEP => tiles::BRIDGE_DEEP,
                _ => tiles::BRIDGE_REGULAR,
            },
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn crossings_override_the_base_terrain() {
        let grass = Tile::new(Coord::ORIGIN, tiles::GRASS);
        assert_eq!(grass.effective_type(), tiles::GRASS);
        assert_eq!(grass.clone().with_crossing(Crossing::Road).effective_type(), tiles::ROAD);
        assert_eq!(
            grass.with_crossing(Crossing::Bridge).effective_type(),
            tiles::BRIDGE_REGULAR
        );

        let bridge = |water| Tile::new(Coord::ORIGIN, water).with_crossing(Crossing::Bridge);
        assert_eq!(bridge(tiles::WATER_SHALLOW).effective_type(), tiles::BRIDGE_SHALLOW);
        assert_eq!(bridge(tiles::WATER_REGULAR).effective_type(), tiles::BRIDGE_REGULAR);
        assert_eq!(bridge(tiles::WATER_DEEP).effective_type(), tiles::BRIDGE_DEEP);
        assert_eq!("bridge".parse::<Crossing>(), Ok(Crossing::Bridge));
    }
}
