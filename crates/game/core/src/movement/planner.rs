use std::cmp::Ordering;
use std::collections::{BTreeMap, BinaryHeap};

use crate::env::{PassThrough, RulesOracle};
use crate::state::{Coord, Unit, World};

use super::PathError;

/// Cheapest known step into `to`.
#[derive(Clone, Copy, Debug, PartialEq)]
#[cfg_attr(feature = "serde", derive(serde::Serialize, serde::Deserialize))]
pub struct PathEdge {
    pub from: Coord,
    pub to: Coord,
    /// Cost of entering `to`.
    pub movement_cost: f64,
    /// Accumulated cost from the source to `to`.
    pub total_cost: f64,
    /// `to` holds a unit: the edge may be crossed but not landed on.
    pub is_occupied: bool,
}

/// Result of a movement search: one best edge per reached coordinate.
#[derive(Clone, Debug, PartialEq)]
#[cfg_attr(feature = "serde", derive(serde::Serialize, serde::Deserialize))]
pub struct AllPaths {
    pub source: Coord,
    pub edges: BTreeMap<Coord, PathEdge>,
}

impl AllPaths {
    pub fn edge(&self, to: Coord) -> Option<&PathEdge> {
        self.edges.get(&to)
    }

    pub fn cost_to(&self, to: Coord) -> Option<f64> {
        if to == self.source {
            return Some(0.0);
        }
        self.edges.get(&to).map(|edge| edge.total_cost)
    }

    /// Whether `to` can be landed on.
    pub fn can_reach(&self, to: Coord) -> bool {
        self.edges.get(&to).is_some_and(|edge| !edge.is_occupied)
    }
}

/// Ordered list of steps from a source to a destination.
#[derive(Clone, Debug, Default, PartialEq)]
#[cfg_attr(feature = "serde", derive(serde::Serialize, serde::Deserialize))]
pub struct Path {
    pub edges: Vec<PathEdge>,
    pub total_cost: f64,
}

impl Path {
    pub fn is_empty(&self) -> bool {
        self.edges.is_empty()
    }

    pub fn coords(&self) -> impl Iterator<Item = Coord> + '_ {
        self.edges.iter().map(|edge| edge.to)
    }
}

/// Min-heap entry; ties broken by coordinate so expansion order is stable.
#[derive(Clone, Copy, Debug)]
struct Frontier {
    cost: f64,
    coord: Coord,
}

impl PartialEq for Frontier {
    fn eq(&self, other: &Self) -> bool {
        self.cmp(other) == Ordering::Equal
    }
}

impl Eq for Frontier {}

impl PartialOrd for Frontier {
    fn partial_cmp(&self, other: &Self) -> Option<Ordering> {
        Some(self.cmp(other))
    }
}

impl Ord for Frontier {
    fn cmp(&self, other: &Self) -> Ordering {
        other
            .cost
            .total_cmp(&self.cost)
            .then_with(|| other.coord.cmp(&self.coord))
    }
}

/// Every coordinate reachable by `unit` within `budget`.
pub fn movement_options<R>(
    world: &World,
    rules: &R,
    unit: &Unit,
    budget: f64,
    policy: PassThrough,
) -> AllPaths
where
    R: RulesOracle + ?Sized,
{
    let source = unit.coord;
    let mut best: BTreeMap<Coord, f64> = BTreeMap::new();
    let mut edges = BTreeMap::new();
    let mut frontier = BinaryHeap::new();

    best.insert(source, 0.0);
    frontier.push(Frontier {
        cost: 0.0,
        coord: source,
    });

    while let Some(Frontier { cost, coord }) = frontier.pop() {
        if best.get(&coord).is_some_and(|known| cost > *known) {
            continue;
        }

        for neighbor in world.neighbors(coord) {
            let is_occupied = world.has_unit(neighbor);
            if is_occupied && policy == PassThrough::Forbid {
                continue;
            }
            let Some(tile) = world.tile_at(neighbor) else {
                continue;
            };

            let movement_cost = rules.movement_cost(unit.unit_type, tile.effective_type());
            let total_cost = cost + movement_cost;
            if total_cost > budget {
                continue;
            }
            if best.get(&neighbor).is_some_and(|known| total_cost >= *known) {
                continue;
            }

            best.insert(neighbor, total_cost);
            frontier.push(Frontier {
                cost: total_cost,
                coord: neighbor,
            });
            edges.insert(
                neighbor,
                PathEdge {
                    from: coord,
                    to: neighbor,
                    movement_cost,
                    total_cost,
                    is_occupied,
                },
            );
        }
    }

    AllPaths { source, edges }
}

/// Rebuilds the path to `dest` from the predecessor edges.
pub fn reconstruct_path(all_paths: &AllPaths, dest: Coord) -> Result<Path, PathError> {
    if dest == all_paths.source {
        return Ok(Path::default());
    }
    let last = all_paths.edge(dest).ok_or(PathError::Unreachable {
        from: all_paths.source,
        to: dest,
    })?;
    let total_cost = last.total_cost;

    let mut steps = vec![*last];
    let mut cursor = last.from;
    while cursor != all_paths.source {
        // A chain longer than the edge set means a cycle.
        if steps.len() > all_paths.edges.len() {
            return Err(PathError::BrokenChain(dest));
        }
        let edge = all_paths
            .edge(cursor)
            .ok_or(PathError::BrokenChain(dest))?;
        steps.push(*edge);
        cursor = edge.from;
    }
    steps.reverse();

    Ok(Path {
        edges: steps,
        total_cost,
    })
}

/// Cheapest path for `unit` to `dest` within its remaining budget.
///
/// Staying in place is always a valid, free path.
pub fn find_path<R>(
    world: &World,
    rules: &R,
    unit: &Unit,
    dest: Coord,
    policy: PassThrough,
) -> Result<Path, PathError>
where
    R: RulesOracle + ?Sized,
{
    if dest == unit.coord {
        return Ok(Path::default());
    }
    if world.tile_at(dest).is_none() {
        return Err(PathError::NoTile(dest));
    }
    if world.has_unit(dest) {
        return Err(PathError::Occupied(dest));
    }
    let all_paths = movement_options(world, rules, unit, unit.distance_left, policy);
    reconstruct_path(&all_paths, dest)
}

/// Coordinates a unit may end its move on.
pub fn destinations(all_paths: &AllPaths) -> Vec<Coord> {
    all_paths
        .edges
        .values()
        .filter(|edge| !edge.is_occupied)
        .map(|edge| edge.to)
        .collect()
}
