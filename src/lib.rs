#![no_std]

extern crate alloc;

pub mod bsp;
pub mod cellular;
pub mod coord;
#[cfg(feature = "pathfinding")]
pub mod dijkstra;
pub mod dungeon;
pub mod error;
#[cfg(feature = "pathfinding")]
pub mod flood;
#[cfg(feature = "fov")]
pub mod fov;
#[cfg(feature = "pathfinding")]
pub mod graph;
pub mod grid;
pub mod heap;
pub mod line;
pub mod map;
pub mod maze;
pub mod neighborhood;
#[cfg(feature = "pathfinding")]
pub mod path;
mod rng;
pub mod tile;

pub use bsp::{Bsp, BspNode, NodeId, SplitDirection};
pub use cellular::AutomataConfig;
pub use coord::{Coord2, Point};
pub use dungeon::{BspDungeonConfig, CorridorConnection};
pub use error::MapgenError;
#[cfg(feature = "pathfinding")]
pub use flood::{cull_unconnected, is_connected, largest_connected_area};
#[cfg(feature = "fov")]
pub use fov::{shadowcast, Fov, Visibility, MAX_RECURSION};
#[cfg(feature = "pathfinding")]
pub use graph::{Graph, GraphNode, MAX_NEIGHBORS};
pub use grid::Grid;
pub use heap::Heap;
pub use line::line;
pub use map::{Map, Walls};
#[cfg(feature = "pathfinding")]
pub use path::{find_path, Path};
pub use tile::Tile;
