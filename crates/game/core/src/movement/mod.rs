//! Movement planning over the layered world.
//!
//! [`movement_options`] runs Dijkstra from a unit's coordinate and records,
//! for every reachable coordinate, the cheapest edge that reached it. Paths
//! are reconstructed by walking those edges back to the source.
mod error;
mod planner;

pub use crate::env::PassThrough;
pub use error::PathError;
pub use planner::{
    AllPaths, Path, PathEdge, destinations, find_path, movement_options, reconstruct_path,
};
