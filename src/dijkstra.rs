use crate::coord::Coord2;
use crate::graph::{Graph, GraphNode};
use crate::heap::Heap;

/// `|dx| + |dy|`.
pub fn manhattan(from: Coord2, to: Coord2) -> f64 {
    from.manhattan_distance(to) as f64
}

/// `sqrt(dx^2 + dy^2)`.
pub fn euclidean(from: Coord2, to: Coord2) -> f64 {
    let dx = (from.x - to.x) as f64;
    let dy = (from.y - to.y) as f64;
    libm::sqrt(dx * dx + dy * dy)
}

/// `max(|dx|, |dy|)` ("chessboard distance").
pub fn chebyshev(from: Coord2, to: Coord2) -> f64 {
    from.chebyshev_distance(to) as f64
}

/// Default metric for adjacent cells when no distance function is chosen:
/// 0 for the same cell, 1 orthogonally, 1.4 diagonally.
pub fn step_cost(from: Coord2, to: Coord2) -> f64 {
    if from == to {
        return 0.0;
    }
    if from.x == to.x || from.y == to.y {
        return 1.0;
    }
    1.4
}

/// Scores the graph from `seed` using a plain distance function: each edge
/// costs `distance(current, neighbour)` on top of the current score.
pub fn score(graph: &mut Graph, seed: Coord2, distance: impl Fn(Coord2, Coord2) -> f64) {
    score_with(graph, seed, |current: &GraphNode, neighbor: &GraphNode| {
        current.score + distance(current.coord, neighbor.coord)
    });
}

/// Scores the graph from `seed` with a fully custom edge cost. The cost
/// function receives the current and candidate nodes and must itself
/// incorporate `current.score`; anything else the policy needs is captured
/// by the closure. Corridor carving rides on this to price doors, corners,
/// and walls differently.
pub fn score_with(
    graph: &mut Graph,
    seed: Coord2,
    mut cost: impl FnMut(&GraphNode, &GraphNode) -> f64,
) {
    for index in 0..graph.len() {
        graph.node_at_mut(index).score = f64::INFINITY;
    }
    let Some(seed_index) = graph.index_of(seed) else {
        return;
    };
    graph.node_at_mut(seed_index).score = 0.0;

    let mut open: Heap<(f64, u32), _> = Heap::new(graph.len(), |a: &(f64, u32), b: &(f64, u32)| {
        a.0 < b.0
    });
    open.insert((0.0, seed_index as u32));

    while let Some((popped_score, index)) = open.pop() {
        let index = index as usize;
        if popped_score > graph.node_at(index).score {
            continue;
        }
        for slot in 0..graph.node_at(index).neighbors().len() {
            let neighbor_index = graph.node_at(index).neighbors()[slot] as usize;
            let tentative = cost(graph.node_at(index), graph.node_at(neighbor_index));
            if tentative < graph.node_at(neighbor_index).score {
                graph.node_at_mut(neighbor_index).score = tentative;
                open.insert((tentative, neighbor_index as u32));
            }
        }
    }
}
