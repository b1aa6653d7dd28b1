use catacomb::{Coord2, Heap, Map, Point, Tile};
use rand_chacha::rand_core::SeedableRng;
use rand_chacha::ChaCha8Rng;

fn count(map: &Map, tile: Tile) -> usize {
    map.tiles().cells().iter().filter(|&&t| t == tile).count()
}

fn passable_count(map: &Map) -> usize {
    map.tiles().cells().iter().filter(|t| t.is_passable()).count()
}

#[cfg(feature = "pathfinding")]
#[test]
fn bsp_dungeon_end_to_end() {
    let mut rng = ChaCha8Rng::seed_from_u64(1);
    let mut map = Map::new(80, 25);
    let config = catacomb::BspDungeonConfig::default();
    catacomb::dungeon::generate(&mut map, &config, &mut rng).unwrap();

    assert!(count(&map, Tile::Room) >= 2, "expected at least two room cells");
    assert!(count(&map, Tile::Corridor) >= 1, "expected a corridor");
    assert!(count(&map, Tile::Door) >= 1, "expected a door");

    // Full reachability: the largest connected area covers every passable
    // cell.
    let largest = catacomb::largest_connected_area(&map).unwrap();
    assert_eq!(largest.scored_count(), passable_count(&map));

    // The corridor-biased cost keeps corridors single-width: no 2x2 block
    // of corridor tiles anywhere.
    for y in 0..24 {
        for x in 0..79 {
            let block = [
                Coord2::new(x, y),
                Coord2::new(x + 1, y),
                Coord2::new(x, y + 1),
                Coord2::new(x + 1, y + 1),
            ];
            assert!(
                !block.iter().all(|&c| map.tile_is(c, Tile::Corridor)),
                "double-wide corridor at ({x},{y})"
            );
        }
    }
}

#[test]
fn bsp_dungeon_is_deterministic_per_seed() {
    let config = catacomb::BspDungeonConfig::default();
    let mut first = Map::new(60, 30);
    catacomb::dungeon::generate(&mut first, &config, &mut ChaCha8Rng::seed_from_u64(7)).unwrap();
    let mut second = Map::new(60, 30);
    catacomb::dungeon::generate(&mut second, &config, &mut ChaCha8Rng::seed_from_u64(7)).unwrap();
    assert_eq!(first, second);
}

#[test]
fn heap_pops_priorities_in_order() {
    let mut heap = Heap::new(8, |a: &u32, b: &u32| a > b);
    for priority in [100u32, 99, 98, 97, 99, 98] {
        heap.insert(priority);
    }
    let mut popped = Vec::new();
    while let Some(p) = heap.pop() {
        popped.push(p);
    }
    assert_eq!(popped, vec![100, 99, 99, 98, 98, 97]);
}

#[cfg(feature = "pathfinding")]
#[test]
fn dijkstra_scores_a_strip() {
    let mut map = Map::new(3, 1);
    for x in 0..3 {
        map.set_tile(Coord2::new(x, 0), Tile::Room);
    }
    let mut graph = catacomb::Graph::passable(&map, true, |m, c| m.is_passable(c));
    catacomb::dijkstra::score(&mut graph, Coord2::new(2, 0), catacomb::dijkstra::step_cost);
    assert!((graph.node(Coord2::new(0, 0)).unwrap().score - 2.0).abs() < 1e-9);
    assert!((graph.node(Coord2::new(1, 0)).unwrap().score - 1.0).abs() < 1e-9);
    assert_eq!(graph.node(Coord2::new(2, 0)).unwrap().score, 0.0);
}

#[cfg(feature = "pathfinding")]
#[test]
fn path_walks_to_completion() {
    let mut map = Map::new(10, 5);
    for y in 0..5 {
        for x in 0..10 {
            map.set_tile(Coord2::new(x, y), Tile::Room);
        }
    }
    let start = Coord2::new(0, 0);
    let end = Coord2::new(9, 4);
    let mut path = catacomb::find_path(&map, start, end, catacomb::dijkstra::step_cost, true);
    assert_eq!(path.peek(), Some(start));
    let mut last = None;
    while let Some(step) = path.walk() {
        last = Some(step);
    }
    assert!(path.is_empty());
    assert_eq!(last, Some(end));
}

#[test]
fn line_rasterises_a_shallow_slope() {
    let points = catacomb::line(Point::new(0.0, 0.0), Point::new(5.0, 3.0), 1.0);
    for pair in points.windows(2) {
        assert!(pair[1].x > pair[0].x, "x must advance every step");
    }
    assert!(points.iter().any(|p| p.y == 1.0));
    assert!(points.iter().any(|p| p.y == 2.0));
    assert_eq!(points.first().copied(), Some(Point::new(0.0, 0.0)));
    assert_eq!(points.last().copied(), Some(Point::new(5.0, 3.0)));
}

#[cfg(feature = "fov")]
#[test]
fn fov_small_room_is_fully_visible() {
    let mut map = Map::new(5, 5);
    for y in 0..5 {
        for x in 0..5 {
            map.set_tile(Coord2::new(x, y), Tile::Room);
        }
    }
    let origin = Coord2::new(2, 2);
    let mut fov = catacomb::Fov::new(5, 5);
    fov.compute(&map, origin, 2);
    for (coord, _) in map.tiles().iter_coords() {
        assert!(fov.is_visible(coord), "{coord:?} within radius 2");
    }
}

#[cfg(feature = "pathfinding")]
#[test]
fn maze_is_perfect() {
    let mut rng = ChaCha8Rng::seed_from_u64(21);
    let mut map = Map::new(21, 21);
    catacomb::maze::generate(&mut map, &mut rng).unwrap();

    // Every odd-parity interior cell is carved.
    for y in (1..20).step_by(2) {
        for x in (1..20).step_by(2) {
            assert!(map.tile_is(Coord2::new(x, y), Tile::Corridor));
        }
    }

    // One connected component covering every corridor cell...
    let corridors = count(&map, Tile::Corridor);
    let largest = catacomb::largest_connected_area(&map).unwrap();
    assert_eq!(largest.scored_count(), corridors);

    // ...and exactly cells-1 adjacencies: a spanning tree, no cycles.
    let mut edges = 0usize;
    for (coord, &tile) in map.tiles().iter_coords() {
        if tile != Tile::Corridor {
            continue;
        }
        for offset in [Coord2::new(1, 0), Coord2::new(0, 1)] {
            if map.tile_is(coord + offset, Tile::Corridor) {
                edges += 1;
            }
        }
    }
    assert_eq!(edges, corridors - 1);
}

#[test]
fn automata_caves_end_to_end() {
    let mut rng = ChaCha8Rng::seed_from_u64(3);
    let mut map = Map::new(64, 40);
    catacomb::cellular::generate(&mut map, &catacomb::AutomataConfig::default(), &mut rng)
        .unwrap();

    assert!(passable_count(&map) > 0, "caves should leave open space");
    for x in 0..64 {
        assert!(map.tile_is(Coord2::new(x, 0), Tile::Rock));
        assert!(map.tile_is(Coord2::new(x, 39), Tile::Rock));
    }
}

#[cfg(feature = "pathfinding")]
#[test]
fn automata_caves_are_connected() {
    // The border pass can clip cells after the cull, so connectivity is
    // checked with it off.
    let mut rng = ChaCha8Rng::seed_from_u64(3);
    let mut map = Map::new(64, 40);
    let config = catacomb::AutomataConfig {
        fill_border: false,
        ..Default::default()
    };
    catacomb::cellular::generate(&mut map, &config, &mut rng).unwrap();

    let floor = passable_count(&map);
    assert!(floor > 0);
    let largest = catacomb::largest_connected_area(&map).unwrap();
    assert_eq!(largest.scored_count(), floor);
}
