use rand_core::RngCore;

use crate::bsp::{Bsp, NodeId};
use crate::coord::Coord2;
use crate::error::MapgenError;
use crate::map::Map;
use crate::rng;
use crate::tile::Tile;

#[cfg(feature = "pathfinding")]
use crate::dijkstra;
#[cfg(feature = "pathfinding")]
use crate::flood;
#[cfg(feature = "pathfinding")]
use crate::graph::{Graph, GraphNode};
#[cfg(feature = "pathfinding")]
use crate::path;

/// Corridor strategy for the BSP dungeon generator.
#[derive(Copy, Clone, Debug, PartialEq, Eq)]
#[cfg_attr(feature = "serde", derive(serde::Serialize, serde::Deserialize))]
pub enum CorridorConnection {
    /// Rooms only; leave the map disconnected.
    None,
    /// L-shaped corridors between sibling subtrees, no pathfinding.
    Simple,
    /// Sibling-subtree connection carved by corridor-biased Dijkstra.
    #[cfg(feature = "pathfinding")]
    Bsp,
    /// Every leaf carves to a random leaf anywhere in the tree, then the
    /// map is culled to its largest connected area.
    #[cfg(feature = "pathfinding")]
    Randomly,
}

#[cfg(feature = "pathfinding")]
const DEFAULT_CORRIDORS: CorridorConnection = CorridorConnection::Randomly;
#[cfg(not(feature = "pathfinding"))]
const DEFAULT_CORRIDORS: CorridorConnection = CorridorConnection::Simple;

#[derive(Clone, Debug)]
#[cfg_attr(feature = "serde", derive(serde::Serialize, serde::Deserialize))]
pub struct BspDungeonConfig {
    pub room_min_width: u32,
    pub room_max_width: u32,
    pub room_min_height: u32,
    pub room_max_height: u32,
    pub room_padding: u32,
    pub draw_corridors: CorridorConnection,
    pub draw_doors: bool,
    /// When off, rooms are centred in their leaves instead of placed at a
    /// random offset.
    pub randomize_room_location: bool,
    pub max_splits: u32,
}

impl Default for BspDungeonConfig {
    fn default() -> Self {
        Self {
            room_min_width: 4,
            room_max_width: 6,
            room_min_height: 4,
            room_max_height: 6,
            room_padding: 1,
            draw_corridors: DEFAULT_CORRIDORS,
            draw_doors: true,
            randomize_room_location: true,
            max_splits: 100,
        }
    }
}

/// Generates a room-and-corridor dungeon: recursive BSP split, one room per
/// leaf, then corridor connection per the configured strategy. The map is
/// reset to Rock first. Returns the split tree so callers can keep using
/// the leaf geometry.
pub fn generate(
    map: &mut Map,
    config: &BspDungeonConfig,
    rng: &mut impl RngCore,
) -> Result<Bsp, MapgenError> {
    validate(map, config)?;
    map.fill(Tile::Rock);

    let mut bsp = Bsp::new(map.width(), map.height());
    bsp.recursive_split(
        Bsp::ROOT,
        config.room_max_width + config.room_padding,
        config.room_max_height + config.room_padding,
        config.max_splits,
        rng,
    );
    generate_rooms(&bsp, map, config, rng);

    match config.draw_corridors {
        CorridorConnection::None => {}
        CorridorConnection::Simple => connect_subtrees(map, &bsp, Bsp::ROOT, config, rng),
        #[cfg(feature = "pathfinding")]
        CorridorConnection::Bsp => connect_subtrees(map, &bsp, Bsp::ROOT, config, rng),
        #[cfg(feature = "pathfinding")]
        CorridorConnection::Randomly => {
            connect_randomly(map, &bsp, config, rng);
            flood::cull_unconnected(map);
        }
    }

    Ok(bsp)
}

fn validate(map: &Map, config: &BspDungeonConfig) -> Result<(), MapgenError> {
    if map.width() == 0 || map.height() == 0 {
        return Err(MapgenError::MapTooSmall {
            width: map.width(),
            height: map.height(),
        });
    }
    if config.room_min_width == 0 || config.room_min_height == 0 {
        return Err(MapgenError::InvalidConfig("room minimums must be positive"));
    }
    if config.room_max_width < config.room_min_width
        || config.room_max_height < config.room_min_height
    {
        return Err(MapgenError::InvalidConfig("room maximum below minimum"));
    }
    Ok(())
}

/// Stamps a room into every child leaf: walls on the rectangle boundary,
/// Room tiles inside. A single-leaf tree (no parent) gets no room.
fn generate_rooms(bsp: &Bsp, map: &mut Map, config: &BspDungeonConfig, rng: &mut impl RngCore) {
    for leaf in bsp.leaves() {
        if bsp.parent(leaf).is_none() {
            continue;
        }
        let node = bsp.node(leaf);
        let (leaf_x, leaf_y) = (node.x, node.y);
        let (leaf_w, leaf_h) = (node.width, node.height);
        let pad = config.room_padding;

        let mut width = rng::range_u32(rng, config.room_min_width, config.room_max_width);
        if width + pad * 2 > leaf_w {
            width = leaf_w.saturating_sub(pad * 2);
        }
        let mut height = rng::range_u32(rng, config.room_min_height, config.room_max_height);
        if height + pad * 2 > leaf_h {
            height = leaf_h.saturating_sub(pad * 2);
        }
        if width == 0 || height == 0 {
            continue;
        }

        let (x, y) = if config.randomize_room_location {
            (
                rng::range_i32(
                    rng,
                    leaf_x + pad as i32,
                    leaf_x + (leaf_w - width - pad) as i32,
                ),
                rng::range_i32(
                    rng,
                    leaf_y + pad as i32,
                    leaf_y + (leaf_h - height - pad) as i32,
                ),
            )
        } else {
            (
                leaf_x + ((leaf_w - width) / 2) as i32,
                leaf_y + ((leaf_h - height) / 2) as i32,
            )
        };

        stamp_room(map, x, y, width, height);
    }
}

fn stamp_room(map: &mut Map, x: i32, y: i32, width: u32, height: u32) {
    for cy in y..y + height as i32 {
        for cx in x..x + width as i32 {
            let boundary =
                cx == x || cx == x + width as i32 - 1 || cy == y || cy == y + height as i32 - 1;
            let tile = if boundary { Tile::Rock } else { Tile::Room };
            map.set_tile(Coord2::new(cx, cy), tile);
        }
    }
}

/// Carves one corridor per internal node, between the rooms of a random
/// leaf from each child subtree, then recurses into both children.
fn connect_subtrees(
    map: &mut Map,
    bsp: &Bsp,
    node: NodeId,
    config: &BspDungeonConfig,
    rng: &mut impl RngCore,
) {
    let (Some(left), Some(right)) = (bsp.left(node), bsp.right(node)) else {
        return;
    };
    let left_leaf = bsp.random_leaf(left, rng);
    let right_leaf = bsp.random_leaf(right, rng);
    if let (Some(from), Some(to)) = (bsp.find_room(left_leaf, map), bsp.find_room(right_leaf, map))
    {
        match config.draw_corridors {
            #[cfg(feature = "pathfinding")]
            CorridorConnection::Bsp => carve_corridor(map, from, to, config.draw_doors),
            _ => carve_l(map, from, to, config.draw_doors),
        }
    }
    connect_subtrees(map, bsp, left, config, rng);
    connect_subtrees(map, bsp, right, config, rng);
}

/// Pairs every leaf with a random leaf from the whole tree. The random
/// picks leave stray rooms behind; the caller culls afterwards.
#[cfg(feature = "pathfinding")]
fn connect_randomly(map: &mut Map, bsp: &Bsp, config: &BspDungeonConfig, rng: &mut impl RngCore) {
    for leaf in bsp.leaves() {
        let Some(from) = bsp.find_room(leaf, map) else {
            continue;
        };
        let other = bsp.random_leaf(Bsp::ROOT, rng);
        if other == leaf {
            continue;
        }
        let Some(to) = bsp.find_room(other, map) else {
            continue;
        };
        carve_corridor(map, from, to, config.draw_doors);
    }
}

/// L-shaped carve between two cells, longer axis first.
fn carve_l(map: &mut Map, from: Coord2, to: Coord2, draw_doors: bool) {
    let dx = to.x - from.x;
    let dy = to.y - from.y;
    if dx.abs() >= dy.abs() {
        for x in axis_range(from.x, to.x) {
            carve_tile(map, Coord2::new(x, from.y), draw_doors);
        }
        for y in axis_range(from.y, to.y) {
            carve_tile(map, Coord2::new(to.x, y), draw_doors);
        }
    } else {
        for y in axis_range(from.y, to.y) {
            carve_tile(map, Coord2::new(from.x, y), draw_doors);
        }
        for x in axis_range(from.x, to.x) {
            carve_tile(map, Coord2::new(x, to.y), draw_doors);
        }
    }
}

fn axis_range(a: i32, b: i32) -> core::ops::RangeInclusive<i32> {
    if a <= b {
        a..=b
    } else {
        b..=a
    }
}

/// Carves a corridor along a Dijkstra path scored with the corridor cost,
/// so the dig re-uses doors, skirts corners, and avoids hugging existing
/// walls into double-wide corridors.
#[cfg(feature = "pathfinding")]
pub(crate) fn carve_corridor(map: &mut Map, from: Coord2, to: Coord2, draw_doors: bool) {
    let mut graph = Graph::open(map, false);
    dijkstra::score_with(&mut graph, to, |current, neighbor| {
        corridor_cost(map, current, neighbor)
    });
    let route = path::from_scored(&graph, from);
    for coord in route {
        carve_tile(map, coord, draw_doors);
    }
}

/// Cost of digging into `neighbor`: the Manhattan step, plus 9 for leaving
/// a wall in a double-wide scar, plus 99 for punching through a corner.
/// Existing doors are free so carves funnel through them.
#[cfg(feature = "pathfinding")]
fn corridor_cost(map: &Map, current: &GraphNode, neighbor: &GraphNode) -> f64 {
    let base = current.score + dijkstra::manhattan(current.coord, neighbor.coord);
    if map.tile_is(neighbor.coord, Tile::Door) {
        base
    } else if map.is_corner_wall(neighbor.coord) {
        base + 99.0
    } else if map.is_wall(neighbor.coord) {
        base + 9.0
    } else {
        base
    }
}

/// Rock becomes Corridor, or a Door where the dig crosses a room wall.
/// Anything already passable is left alone.
fn carve_tile(map: &mut Map, coord: Coord2, draw_doors: bool) {
    if !map.tile_is(coord, Tile::Rock) {
        return;
    }
    let tile = if draw_doors && map.is_room_wall(coord) {
        Tile::Door
    } else {
        Tile::Corridor
    };
    map.set_tile(coord, tile);
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::rng::testing::TestRng;

    fn count(map: &Map, tile: Tile) -> usize {
        map.tiles().cells().iter().filter(|&&t| t == tile).count()
    }

    #[test]
    fn dungeon_invalid_configs() {
        let mut map = Map::new(40, 30);
        let mut rng = TestRng(1);
        let config = BspDungeonConfig {
            room_min_width: 0,
            ..Default::default()
        };
        assert_eq!(
            generate(&mut map, &config, &mut rng).unwrap_err(),
            MapgenError::InvalidConfig("room minimums must be positive")
        );
        let config = BspDungeonConfig {
            room_max_height: 2,
            ..Default::default()
        };
        assert_eq!(
            generate(&mut map, &config, &mut rng).unwrap_err(),
            MapgenError::InvalidConfig("room maximum below minimum")
        );
    }

    #[test]
    fn dungeon_zero_splits_carves_nothing() {
        let mut map = Map::new(40, 30);
        let mut rng = TestRng(2);
        let config = BspDungeonConfig {
            max_splits: 0,
            ..Default::default()
        };
        let bsp = generate(&mut map, &config, &mut rng).unwrap();
        assert!(bsp.is_leaf(Bsp::ROOT));
        assert_eq!(count(&map, Tile::Room), 0);
        assert_eq!(count(&map, Tile::Corridor), 0);
    }

    #[test]
    fn dungeon_rooms_only() {
        let mut map = Map::new(60, 40);
        let mut rng = TestRng(3);
        let config = BspDungeonConfig {
            draw_corridors: CorridorConnection::None,
            ..Default::default()
        };
        generate(&mut map, &config, &mut rng).unwrap();
        assert!(count(&map, Tile::Room) > 0);
        assert_eq!(count(&map, Tile::Corridor), 0);
        assert_eq!(count(&map, Tile::Door), 0);
    }

    #[test]
    fn dungeon_simple_connects_siblings() {
        let mut map = Map::new(60, 40);
        let mut rng = TestRng(4);
        let config = BspDungeonConfig {
            draw_corridors: CorridorConnection::Simple,
            ..Default::default()
        };
        generate(&mut map, &config, &mut rng).unwrap();
        assert!(count(&map, Tile::Room) > 0);
        assert!(count(&map, Tile::Corridor) > 0);
    }

    #[test]
    fn dungeon_room_sizes_within_bounds() {
        let mut map = Map::new(80, 50);
        let mut rng = TestRng(5);
        let config = BspDungeonConfig {
            draw_corridors: CorridorConnection::None,
            ..Default::default()
        };
        let bsp = generate(&mut map, &config, &mut rng).unwrap();
        // Interiors are bounded by the configured maximum minus walls.
        for leaf in bsp.leaves() {
            let node = bsp.node(leaf);
            let mut interior = 0;
            for y in node.y..node.y + node.height as i32 {
                for x in node.x..node.x + node.width as i32 {
                    if map.tile_is(Coord2::new(x, y), Tile::Room) {
                        interior += 1;
                    }
                }
            }
            let max_interior =
                (config.room_max_width - 2) as i32 * (config.room_max_height - 2) as i32;
            assert!(interior <= max_interior);
        }
    }

    #[test]
    fn dungeon_centered_rooms() {
        let mut map = Map::new(60, 40);
        let mut rng = TestRng(6);
        let config = BspDungeonConfig {
            draw_corridors: CorridorConnection::None,
            randomize_room_location: false,
            ..Default::default()
        };
        generate(&mut map, &config, &mut rng).unwrap();
        assert!(count(&map, Tile::Room) > 0);
    }

    #[cfg(feature = "pathfinding")]
    #[test]
    fn dungeon_bsp_corridors_connect() {
        let mut map = Map::new(60, 40);
        let mut rng = TestRng(7);
        let config = BspDungeonConfig {
            draw_corridors: CorridorConnection::Bsp,
            ..Default::default()
        };
        generate(&mut map, &config, &mut rng).unwrap();
        assert!(count(&map, Tile::Corridor) > 0);
        assert!(crate::flood::is_connected(&map));
    }

    #[cfg(feature = "pathfinding")]
    #[test]
    fn dungeon_randomly_is_fully_connected() {
        let mut map = Map::new(80, 25);
        let mut rng = TestRng(8);
        generate(&mut map, &BspDungeonConfig::default(), &mut rng).unwrap();
        assert!(count(&map, Tile::Room) >= 2);
        assert!(count(&map, Tile::Corridor) >= 1);
        assert!(crate::flood::is_connected(&map));
    }

    #[cfg(feature = "pathfinding")]
    #[test]
    fn dungeon_doors_guard_rooms() {
        let mut map = Map::new(80, 25);
        let mut rng = TestRng(9);
        generate(&mut map, &BspDungeonConfig::default(), &mut rng).unwrap();
        assert!(count(&map, Tile::Door) >= 1);
    }

    #[cfg(feature = "pathfinding")]
    #[test]
    fn dungeon_no_doors_when_disabled() {
        let mut map = Map::new(80, 25);
        let mut rng = TestRng(10);
        let config = BspDungeonConfig {
            draw_doors: false,
            ..Default::default()
        };
        generate(&mut map, &config, &mut rng).unwrap();
        assert_eq!(count(&map, Tile::Door), 0);
    }

    #[test]
    fn dungeon_wall_invariant() {
        let mut map = Map::new(60, 40);
        let mut rng = TestRng(11);
        generate(&mut map, &BspDungeonConfig::default(), &mut rng).unwrap();
        for (coord, _) in map.tiles().iter_coords() {
            if map.is_wall(coord) {
                assert!(!map.is_passable(coord) || map.tile_is(coord, Tile::Door));
            }
        }
    }
}
