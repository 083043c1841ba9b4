//! Copy-on-write layered world store.
//!
//! The world is an arena of overlay layers (`Vec<Layer>`). Layer 0 is the
//! base; every other layer records its parent index. Reads walk from the top
//! layer down and stop at the first layer that either holds an entry or
//! tombstones the coordinate. Writes only ever touch the top layer, so a
//! speculative transaction is discarded with [`World::pop`] and made durable
//! with [`World::commit`].
use std::collections::{BTreeMap, BTreeSet};

use arrayvec::ArrayVec;

use super::snapshot::WorldSnapshot;
use super::{Coord, PlayerId, Tile, Unit, WorldError};

/// Shortcut labels use one letter per player, so only players 1..=26 get one.
const MAX_LABELLED_PLAYER: PlayerId = 26;

#[derive(Clone, Debug, Default)]
struct Layer {
    parent: Option<usize>,
    units: BTreeMap<Coord, Unit>,
    tiles: BTreeMap<Coord, Tile>,
    unit_tombstones: BTreeSet<Coord>,
    tile_tombstones: BTreeSet<Coord>,
    unit_counters: BTreeMap<PlayerId, u32>,
    tile_counters: BTreeMap<PlayerId, u32>,
}

impl Layer {
    fn child_of(index: usize, parent: &Layer) -> Self {
        Self {
            parent: Some(index),
            unit_counters: parent.unit_counters.clone(),
            tile_counters: parent.tile_counters.clone(),
            ..Self::default()
        }
    }

    fn is_base(&self) -> bool {
        self.parent.is_none()
    }
}

/// Layered store of tiles and units keyed by coordinate.
#[derive(Clone, Debug)]
pub struct World {
    layers: Vec<Layer>,
}

impl Default for World {
    fn default() -> Self {
        Self::new()
    }
}

impl World {
    /// Empty world with a single base layer.
    pub fn new() -> Self {
        Self {
            layers: vec![Layer::default()],
        }
    }

    /// Number of layers including the base.
    pub fn depth(&self) -> usize {
        self.layers.len()
    }

    fn top(&self) -> &Layer {
        &self.layers[self.layers.len() - 1]
    }

    fn top_mut(&mut self) -> &mut Layer {
        let index = self.layers.len() - 1;
        &mut self.layers[index]
    }

    /// Walks the layer chain from the top towards the base.
    fn chain(&self) -> impl Iterator<Item = &Layer> {
        let mut next = Some(self.layers.len() - 1);
        core::iter::from_fn(move || {
            let index = next?;
            let layer = &self.layers[index];
            next = layer.parent;
            Some(layer)
        })
    }

    // ------------------------------------------------------------------
    // Layer management
    // ------------------------------------------------------------------

    /// Opens a child layer over the current top.
    pub fn push(&mut self) {
        let index = self.layers.len() - 1;
        let child = Layer::child_of(index, &self.layers[index]);
        self.layers.push(child);
    }

    /// Discards the top layer, restoring exactly the state before `push`.
    pub fn pop(&mut self) -> Result<(), WorldError> {
        if self.top().is_base() {
            return Err(WorldError::BaseLayer { operation: "pop" });
        }
        self.layers.pop();
        Ok(())
    }

    /// Merges the top layer into its parent.
    pub fn commit(&mut self) -> Result<(), WorldError> {
        if self.top().is_base() {
            return Err(WorldError::BaseLayer { operation: "commit" });
        }
        let Some(child) = self.layers.pop() else {
            return Err(WorldError::BaseLayer { operation: "commit" });
        };
        let parent = self.top_mut();
        let keep_tombstones = !parent.is_base();

        for coord in child.unit_tombstones {
            parent.units.remove(&coord);
            if keep_tombstones {
                parent.unit_tombstones.insert(coord);
            }
        }
        for (coord, unit) in child.units {
            parent.unit_tombstones.remove(&coord);
            parent.units.insert(coord, unit);
        }
        for coord in child.tile_tombstones {
            parent.tiles.remove(&coord);
            if keep_tombstones {
                parent.tile_tombstones.insert(coord);
            }
        }
        for (coord, tile) in child.tiles {
            parent.tile_tombstones.remove(&coord);
            parent.tiles.insert(coord, tile);
        }
        parent.unit_counters = child.unit_counters;
        parent.tile_counters = child.tile_counters;
        Ok(())
    }

    // ------------------------------------------------------------------
    // Units
    // ------------------------------------------------------------------

    pub fn unit_at(&self, coord: Coord) -> Option<&Unit> {
        for layer in self.chain() {
            if let Some(unit) = layer.units.get(&coord) {
                return Some(unit);
            }
            if layer.unit_tombstones.contains(&coord) {
                return None;
            }
        }
        None
    }

    pub fn has_unit(&self, coord: Coord) -> bool {
        self.unit_at(coord).is_some()
    }

    /// Mutable access to the unit at `coord`.
    ///
    /// A unit inherited from a parent layer is copied into the top layer
    /// first, so the parent never observes the mutation.
    pub fn unit_at_mut(&mut self, coord: Coord) -> Option<&mut Unit> {
        if !self.top().units.contains_key(&coord) {
            let inherited = self.unit_at(coord)?.clone();
            self.top_mut().units.insert(coord, inherited);
        }
        self.top_mut().units.get_mut(&coord)
    }

    /// Places `unit` at its own coordinate, returning the replaced occupant.
    pub fn add_unit(&mut self, unit: Unit) -> Option<Unit> {
        let coord = unit.coord;
        let previous = self.unit_at(coord).cloned();
        let top = self.top_mut();
        top.unit_tombstones.remove(&coord);
        top.units.insert(coord, unit);
        previous
    }

    pub fn remove_unit(&mut self, coord: Coord) -> Result<Unit, WorldError> {
        let unit = self
            .unit_at(coord)
            .cloned()
            .ok_or(WorldError::UnitNotFound(coord))?;
        let top = self.top_mut();
        top.units.remove(&coord);
        if !top.is_base() {
            top.unit_tombstones.insert(coord);
        }
        Ok(unit)
    }

    /// Relocates the unit at `from` to `to` inside the top layer.
    pub fn move_unit(&mut self, from: Coord, to: Coord) -> Result<(), WorldError> {
        if from == to {
            return if self.has_unit(from) {
                Ok(())
            } else {
                Err(WorldError::UnitNotFound(from))
            };
        }
        if self.has_unit(to) {
            return Err(WorldError::Occupied(to));
        }
        let mut unit = self.remove_unit(from)?;
        unit.coord = to;
        self.add_unit(unit);
        Ok(())
    }

    /// Merged view of all live units, ordered by coordinate.
    pub fn units(&self) -> impl Iterator<Item = &Unit> {
        let mut shadowed = BTreeSet::new();
        let mut merged = BTreeMap::new();
        for layer in self.chain() {
            for (coord, unit) in &layer.units {
                if shadowed.insert(*coord) {
                    merged.insert(*coord, unit);
                }
            }
            shadowed.extend(layer.unit_tombstones.iter().copied());
        }
        merged.into_values()
    }

    pub fn num_units(&self) -> usize {
        self.units().count()
    }

    pub fn player_units(&self, player: PlayerId) -> impl Iterator<Item = &Unit> {
        self.units().filter(move |unit| unit.player == player)
    }

    /// Coordinates of the player's units, collected so callers can mutate.
    pub fn player_unit_coords(&self, player: PlayerId) -> Vec<Coord> {
        self.player_units(player).map(|unit| unit.coord).collect()
    }

    // ------------------------------------------------------------------
    // Tiles
    // ------------------------------------------------------------------

    pub fn tile_at(&self, coord: Coord) -> Option<&Tile> {
        for layer in self.chain() {
            if let Some(tile) = layer.tiles.get(&coord) {
                return Some(tile);
            }
            if layer.tile_tombstones.contains(&coord) {
                return None;
            }
        }
        None
    }

    pub fn tile_at_mut(&mut self, coord: Coord) -> Option<&mut Tile> {
        if !self.top().tiles.contains_key(&coord) {
            let inherited = self.tile_at(coord)?.clone();
            self.top_mut().tiles.insert(coord, inherited);
        }
        self.top_mut().tiles.get_mut(&coord)
    }

    pub fn add_tile(&mut self, tile: Tile) -> Option<Tile> {
        let coord = tile.coord;
        let previous = self.tile_at(coord).cloned();
        let top = self.top_mut();
        top.tile_tombstones.remove(&coord);
        top.tiles.insert(coord, tile);
        previous
    }

    pub fn remove_tile(&mut self, coord: Coord) -> Result<Tile, WorldError> {
        let tile = self
            .tile_at(coord)
            .cloned()
            .ok_or(WorldError::TileNotFound(coord))?;
        let top = self.top_mut();
        top.tiles.remove(&coord);
        if !top.is_base() {
            top.tile_tombstones.insert(coord);
        }
        Ok(tile)
    }

    pub fn tiles(&self) -> impl Iterator<Item = &Tile> {
        let mut shadowed = BTreeSet::new();
        let mut merged = BTreeMap::new();
        for layer in self.chain() {
            for (coord, tile) in &layer.tiles {
                if shadowed.insert(*coord) {
                    merged.insert(*coord, tile);
                }
            }
            shadowed.extend(layer.tile_tombstones.iter().copied());
        }
        merged.into_values()
    }

    pub fn num_tiles(&self) -> usize {
        self.tiles().count()
    }

    pub fn player_tiles(&self, player: PlayerId) -> impl Iterator<Item = &Tile> {
        self.tiles().filter(move |tile| tile.player == player)
    }

    /// Neighbouring coordinates that hold a tile, in canonical direction order.
    pub fn neighbors(&self, coord: Coord) -> ArrayVec<Coord, 6> {
        coord
            .neighbors()
            .into_iter()
            .filter(|neighbor| self.tile_at(*neighbor).is_some())
            .collect()
    }

    // ------------------------------------------------------------------
    // Shortcut labels
    // ------------------------------------------------------------------

    /// Allocates the next `A1`-style unit label for `player`.
    ///
    /// Returns `None` for neutral players and players beyond `Z`.
    pub fn next_unit_shortcut(&mut self, player: PlayerId) -> Option<String> {
        let letter = player_letter(player)?;
        let counter = self.top_mut().unit_counters.entry(player).or_insert(0);
        *counter += 1;
        Some(format!("{letter}{counter}"))
    }

    pub fn next_tile_shortcut(&mut self, player: PlayerId) -> Option<String> {
        let letter = player_letter(player)?;
        let counter = self.top_mut().tile_counters.entry(player).or_insert(0);
        *counter += 1;
        Some(format!("{letter}{counter}"))
    }

    pub fn unit_by_shortcut(&self, shortcut: &str) -> Option<&Unit> {
        self.units()
            .find(|unit| unit.shortcut.as_deref() == Some(shortcut))
    }

    pub fn tile_by_shortcut(&self, shortcut: &str) -> Option<&Tile> {
        self.tiles()
            .find(|tile| tile.shortcut.as_deref() == Some(shortcut))
    }

    // ------------------------------------------------------------------
    // Snapshots
    // ------------------------------------------------------------------

    /// Flattens the merged view into the persisted shape.
    pub fn to_snapshot(&self) -> WorldSnapshot {
        WorldSnapshot {
            tiles: self
                .tiles()
                .map(|tile| (tile.coord.key(), tile.clone()))
                .collect(),
            units: self
                .units()
                .map(|unit| (unit.coord.key(), unit.clone()))
                .collect(),
            unit_counters: self.top().unit_counters.clone(),
            tile_counters: self.top().tile_counters.clone(),
        }
    }

    /// Rebuilds a single-layer world, checking every key against its entry.
    pub fn from_snapshot(snapshot: WorldSnapshot) -> Result<Self, WorldError> {
        let mut base = Layer::default();
        for (key, tile) in snapshot.tiles {
            check_key(&key, tile.coord)?;
            base.tiles.insert(tile.coord, tile);
        }
        for (key, unit) in snapshot.units {
            check_key(&key, unit.coord)?;
            base.units.insert(unit.coord, unit);
        }
        base.unit_counters = snapshot.unit_counters;
        base.tile_counters = snapshot.tile_counters;
        Ok(Self { layers: vec![base] })
    }
}

impl PartialEq for World {
    fn eq(&self, other: &Self) -> bool {
        self.units().eq(other.units())
            && self.tiles().eq(other.tiles())
            && self.top().unit_counters == other.top().unit_counters
            && self.top().tile_counters == other.top().tile_counters
    }
}

fn player_letter(player: PlayerId) -> Option<char> {
    if player == 0 || player > MAX_LABELLED_PLAYER {
        return None;
    }
    char::from_u32('A' as u32 + player - 1)
}

fn check_key(key: &str, coord: Coord) -> Result<(), WorldError> {
    let parsed = Coord::parse_key(key).map_err(|_| WorldError::InvalidKey {
        key: key.to_string(),
    })?;
    if parsed != coord {
        return Err(WorldError::KeyMismatch {
            key: key.to_string(),
            coord,
        });
    }
    Ok(())
}

#[cfg(test)]
mod tests {
    use super::*;

    fn unit(q: i32, r: i32, player: PlayerId) -> Unit {
        Unit::new(Coord::new(q, r), player, 1, 10)
    }

    #[test]
    fn add_unit_replaces_occupant() {
        let mut world = World::new();
        assert!(world.add_unit(unit(0, 0, 1)).is_none());
        let replaced = world.add_unit(unit(0, 0, 2));
        assert_eq!(replaced.map(|u| u.player), Some(1));
        assert_eq!(world.num_units(), 1);
        assert_eq!(world.unit_at(Coord::ORIGIN).map(|u| u.player), Some(2));
    }

    #[test]
    fn child_mutations_are_invisible_until_commit() {
        let mut world = World::new();
        world.add_unit(unit(0, 0, 1));
        let before = world.clone();

        world.push();
        world.move_unit(Coord::ORIGIN, Coord::new(1, 0)).unwrap();
        world.add_unit(unit(2, 0, 2));
        assert_eq!(world.depth(), 2);
        assert!(world.unit_at(Coord::ORIGIN).is_none());
        assert_eq!(world.num_units(), 2);

        world.pop().unwrap();
        assert_eq!(world, before);
        assert!(world.unit_at(Coord::ORIGIN).is_some());
        assert_eq!(world.num_units(), 1);
    }

    #[test]
    fn commit_applies_entries_and_tombstones() {
        let mut world = World::new();
        world.add_unit(unit(0, 0, 1));
        world.add_unit(unit(3, 0, 2));

        world.push();
        world.remove_unit(Coord::new(3, 0)).unwrap();
        world.move_unit(Coord::ORIGIN, Coord::new(0, 1)).unwrap();
        world.commit().unwrap();

        assert_eq!(world.depth(), 1);
        assert_eq!(world.num_units(), 1);
        assert_eq!(
            world.unit_at(Coord::new(0, 1)).map(|u| u.coord),
            Some(Coord::new(0, 1))
        );
    }

    #[test]
    fn copy_on_write_leaves_parent_untouched() {
        let mut world = World::new();
        world.add_unit(unit(0, 0, 1));
        world.push();
        world.unit_at_mut(Coord::ORIGIN).unwrap().health = 3;
        assert_eq!(world.unit_at(Coord::ORIGIN).map(|u| u.health), Some(3));
        world.pop().unwrap();
        assert_eq!(world.unit_at(Coord::ORIGIN).map(|u| u.health), Some(10));
    }

    #[test]
    fn nested_tombstones_survive_intermediate_commit() {
        let mut world = World::new();
        world.add_unit(unit(0, 0, 1));
        world.push();
        world.push();
        world.remove_unit(Coord::ORIGIN).unwrap();
        world.commit().unwrap();
        assert!(world.unit_at(Coord::ORIGIN).is_none());
        world.pop().unwrap();
        assert!(world.unit_at(Coord::ORIGIN).is_some());
    }

    #[test]
    fn base_layer_cannot_be_popped_or_committed() {
        let mut world = World::new();
        assert!(matches!(world.pop(), Err(WorldError::BaseLayer { .. })));
        assert!(matches!(world.commit(), Err(WorldError::BaseLayer { .. })));
    }

    #[test]
    fn move_into_occupied_fails() {
        let mut world = World::new();
        world.add_unit(unit(0, 0, 1));
        world.add_unit(unit(1, 0, 1));
        assert_eq!(
            world.move_unit(Coord::ORIGIN, Coord::new(1, 0)),
            Err(WorldError::Occupied(Coord::new(1, 0)))
        );
        assert_eq!(
            world.remove_unit(Coord::new(5, 5)),
            Err(WorldError::UnitNotFound(Coord::new(5, 5)))
        );
    }

    #[test]
    fn neighbors_only_report_tiles() {
        let mut world = World::new();
        world.add_tile(Tile::new(Coord::ORIGIN, 5));
        world.add_tile(Tile::new(Coord::new(1, 0), 5));
        world.add_tile(Tile::new(Coord::new(-1, 1), 5));
        let neighbors = world.neighbors(Coord::ORIGIN);
        assert_eq!(neighbors.as_slice(), &[Coord::new(1, 0), Coord::new(-1, 1)]);
    }

    #[test]
    fn shortcuts_count_per_player_and_are_layered() {
        let mut world = World::new();
        assert_eq!(world.next_unit_shortcut(1).as_deref(), Some("A1"));
        assert_eq!(world.next_unit_shortcut(2).as_deref(), Some("B1"));
        world.push();
        assert_eq!(world.next_unit_shortcut(1).as_deref(), Some("A2"));
        world.pop().unwrap();
        assert_eq!(world.next_unit_shortcut(1).as_deref(), Some("A2"));
        assert_eq!(world.next_unit_shortcut(0), None);
        assert_eq!(world.next_unit_shortcut(27), None);

        let mut labelled = unit(4, 4, 1);
        labelled.shortcut = Some("A9".into());
        world.add_unit(labelled);
        assert_eq!(
            world.unit_by_shortcut("A9").map(|u| u.coord),
            Some(Coord::new(4, 4))
        );
    }

    #[test]
    fn snapshot_keys_are_checked() {
        let mut world = World::new();
        world.add_tile(Tile::new(Coord::new(1, -1), 5).with_owner(1));
        world.add_unit(unit(1, -1, 1));
        let snapshot = world.to_snapshot();
        assert!(snapshot.units.contains_key("1,-1"));
        assert_eq!(World::from_snapshot(snapshot.clone()), Ok(world));

        let mut broken = snapshot;
        let tile = broken.tiles.remove("1,-1").unwrap();
        broken.tiles.insert("2,2".into(), tile);
        assert!(matches!(
            World::from_snapshot(broken),
            Err(WorldError::KeyMismatch { .. })
        ));
    }
}
