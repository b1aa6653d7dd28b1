use crate::coord::Coord2;
use crate::dijkstra;
use crate::graph::Graph;
use crate::grid::Grid;
use crate::map::Map;
use crate::tile::Tile;

/// Largest connected region of passable tiles, as the scored graph of a
/// Dijkstra run seeded inside it. Every unvisited passable cell starts a
/// fresh flood; the biggest one wins. None for maps with no passable cell.
pub fn largest_connected_area(map: &Map) -> Option<Graph> {
    let mut visited = Grid::new_filled(map.width(), map.height(), false);
    let mut best: Option<(usize, Graph)> = None;

    for index in 0..map.len() {
        let coord = Coord2::from_index(index, map.width());
        if !map.is_passable(coord) || *visited.get(coord).unwrap_or(&true) {
            continue;
        }
        let mut graph = Graph::passable(map, true, |m, c| m.is_passable(c));
        dijkstra::score(&mut graph, coord, dijkstra::step_cost);
        let mut scored = 0usize;
        for node in graph.nodes() {
            if node.is_scored() {
                visited.set(node.coord, true);
                scored += 1;
            }
        }
        if best.as_ref().map_or(true, |(count, _)| scored > *count) {
            best = Some((scored, graph));
        }
    }

    best.map(|(_, graph)| graph)
}

/// True when every passable cell can reach every other passable cell.
pub fn is_connected(map: &Map) -> bool {
    let passable_total = map
        .tiles()
        .cells()
        .iter()
        .filter(|t| t.is_passable())
        .count();
    if passable_total <= 1 {
        return true;
    }
    match largest_connected_area(map) {
        Some(graph) => graph.scored_count() == passable_total,
        None => true,
    }
}

/// Demotes every passable cell outside the largest connected region back to
/// Rock. Generators run this to guarantee full reachability.
pub fn cull_unconnected(map: &mut Map) {
    let Some(largest) = largest_connected_area(map) else {
        return;
    };
    for index in 0..map.len() {
        let coord = Coord2::from_index(index, map.width());
        if map.is_passable(coord) && !largest.node(coord).is_some_and(|n| n.is_scored()) {
            map.set_tile(coord, Tile::Rock);
        }
    }
}
