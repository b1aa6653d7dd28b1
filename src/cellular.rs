use rand_core::RngCore;

use crate::coord::Coord2;
use crate::error::MapgenError;
use crate::map::Map;
use crate::neighborhood::Dir8;
use crate::tile::Tile;

#[cfg(feature = "pathfinding")]
use alloc::vec::Vec;

#[cfg(feature = "pathfinding")]
use crate::dijkstra;
#[cfg(feature = "pathfinding")]
use crate::dungeon::carve_corridor;
#[cfg(feature = "pathfinding")]
use crate::flood;
#[cfg(feature = "pathfinding")]
use crate::graph::Graph;
#[cfg(feature = "pathfinding")]
use crate::grid::Grid;
#[cfg(feature = "pathfinding")]
use crate::rng;

#[derive(Clone, Debug)]
#[cfg_attr(feature = "serde", derive(serde::Serialize, serde::Deserialize))]
pub struct AutomataConfig {
    /// Percent chance, 1..=100, that a cell starts as Rock.
    pub chance_cell_initialized: u32,
    /// A dead cell with at least this many alive neighbours is born.
    pub birth_threshold: u32,
    /// An alive cell with at least this many alive neighbours survives.
    pub survival_threshold: u32,
    pub max_iterations: u32,
    /// Carve a corridor between every pair of disconnected cave regions.
    #[cfg(feature = "pathfinding")]
    pub draw_corridors: bool,
    /// Demote everything outside the largest connected area back to Rock.
    #[cfg(feature = "pathfinding")]
    pub cull_unconnected: bool,
    /// Stamp Rock around the map edges after iteration.
    pub fill_border: bool,
}

impl Default for AutomataConfig {
    fn default() -> Self {
        Self {
            chance_cell_initialized: 45,
            birth_threshold: 5,
            survival_threshold: 4,
            max_iterations: 5,
            #[cfg(feature = "pathfinding")]
            draw_corridors: true,
            #[cfg(feature = "pathfinding")]
            cull_unconnected: true,
            fill_border: true,
        }
    }
}

/// Cave generator: random fill, then birth/survival smoothing over the
/// 8-neighbourhood with out-of-bounds counted as alive, then the optional
/// connectivity, cull, and border passes.
pub fn generate(
    map: &mut Map,
    config: &AutomataConfig,
    rng: &mut impl RngCore,
) -> Result<(), MapgenError> {
    validate(map, config)?;

    for index in 0..map.len() {
        let coord = Coord2::from_index(index, map.width());
        let tile = if rng.next_u32() % 100 < config.chance_cell_initialized {
            Tile::Rock
        } else {
            Tile::Room
        };
        map.set_tile(coord, tile);
    }

    for _ in 0..config.max_iterations {
        let mut next = map.clone();
        for index in 0..map.len() {
            let coord = Coord2::from_index(index, map.width());
            let alive = alive_neighbors(map, coord);
            let currently_alive = map.tile_is(coord, Tile::Rock);
            let tile = if currently_alive {
                if alive >= config.survival_threshold {
                    Tile::Rock
                } else {
                    Tile::Room
                }
            } else if alive >= config.birth_threshold {
                Tile::Rock
            } else {
                Tile::Room
            };
            next.set_tile(coord, tile);
        }
        *map = next;
    }

    #[cfg(feature = "pathfinding")]
    if config.draw_corridors {
        connect_regions(map, rng);
    }
    #[cfg(feature = "pathfinding")]
    if config.cull_unconnected {
        flood::cull_unconnected(map);
    }

    if config.fill_border {
        fill_border(map);
    }

    Ok(())
}

fn validate(map: &Map, config: &AutomataConfig) -> Result<(), MapgenError> {
    if map.width() == 0 || map.height() == 0 {
        return Err(MapgenError::MapTooSmall {
            width: map.width(),
            height: map.height(),
        });
    }
    if config.chance_cell_initialized == 0 || config.chance_cell_initialized > 100 {
        return Err(MapgenError::InvalidConfig(
            "chance_cell_initialized must be 1..=100",
        ));
    }
    if !(1..=8).contains(&config.birth_threshold) || !(1..=8).contains(&config.survival_threshold) {
        return Err(MapgenError::InvalidConfig("thresholds must be 1..=8"));
    }
    Ok(())
}

/// Rock neighbours in the 8-ring; cells beyond the edge count as alive so
/// caves close up against the border.
fn alive_neighbors(map: &Map, coord: Coord2) -> u32 {
    let mut count = 0;
    for dir in Dir8::ALL {
        let neighbor = coord + dir.offset();
        if !map.in_bounds(neighbor) || map.tile_is(neighbor, Tile::Rock) {
            count += 1;
        }
    }
    count
}

/// One flood per distinct cave region; any split map gets each region
/// carved toward a randomly chosen other region with the corridor-biased
/// Dijkstra dig.
#[cfg(feature = "pathfinding")]
fn connect_regions(map: &mut Map, rng: &mut impl RngCore) {
    let mut visited = Grid::new_filled(map.width(), map.height(), false);
    let mut regions: Vec<Graph> = Vec::new();

    for index in 0..map.len() {
        let coord = Coord2::from_index(index, map.width());
        if !map.is_passable(coord) || *visited.get(coord).unwrap_or(&true) {
            continue;
        }
        let mut graph = Graph::passable(map, true, |m, c| m.is_passable(c));
        dijkstra::score(&mut graph, coord, dijkstra::step_cost);
        for node in graph.nodes() {
            if node.is_scored() {
                visited.set(node.coord, true);
            }
        }
        regions.push(graph);
    }

    if regions.len() < 2 {
        return;
    }
    for index in 0..regions.len() {
        let mut other = rng::range_u32(rng, 0, regions.len() as u32 - 1) as usize;
        if other == index {
            other = (other + 1) % regions.len();
        }
        let (Some(from), Some(to)) = (
            random_region_cell(&regions[index], rng),
            random_region_cell(&regions[other], rng),
        ) else {
            continue;
        };
        carve_corridor(map, from, to, false);
    }
}

#[cfg(feature = "pathfinding")]
fn random_region_cell(region: &Graph, rng: &mut impl RngCore) -> Option<Coord2> {
    let scored = region.scored_count();
    if scored == 0 {
        return None;
    }
    let pick = rng::range_u32(rng, 0, scored as u32 - 1) as usize;
    region
        .nodes()
        .iter()
        .filter(|n| n.is_scored())
        .nth(pick)
        .map(|n| n.coord)
}

fn fill_border(map: &mut Map) {
    let width = map.width() as i32;
    let height = map.height() as i32;
    for x in 0..width {
        map.set_tile(Coord2::new(x, 0), Tile::Rock);
        map.set_tile(Coord2::new(x, height - 1), Tile::Rock);
    }
    for y in 0..height {
        map.set_tile(Coord2::new(0, y), Tile::Rock);
        map.set_tile(Coord2::new(width - 1, y), Tile::Rock);
    }
}
