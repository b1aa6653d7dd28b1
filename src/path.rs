use alloc::collections::VecDeque;

use crate::coord::Coord2;
use crate::dijkstra;
use crate::graph::Graph;
use crate::map::Map;

/// An ordered walk of grid cells, consumed front to back. `walk` hands out
/// the next cell and drops it; walking to the end leaves an empty path.
#[derive(Clone, Debug, Default, PartialEq, Eq)]
pub struct Path {
    points: VecDeque<Coord2>,
}

impl Path {
    pub fn new(points: impl IntoIterator<Item = Coord2>) -> Self {
        Self {
            points: points.into_iter().collect(),
        }
    }

    /// Removes and returns the head of the path.
    pub fn walk(&mut self) -> Option<Coord2> {
        self.points.pop_front()
    }

    /// The current head without consuming it.
    pub fn peek(&self) -> Option<Coord2> {
        self.points.front().copied()
    }

    #[inline]
    pub fn len(&self) -> usize {
        self.points.len()
    }

    #[inline]
    pub fn is_empty(&self) -> bool {
        self.points.is_empty()
    }

    pub fn points(&self) -> impl Iterator<Item = Coord2> + '_ {
        self.points.iter().copied()
    }
}

impl Iterator for Path {
    type Item = Coord2;

    fn next(&mut self) -> Option<Coord2> {
        self.walk()
    }
}

/// Shortest path from `start` to `end` over passable tiles. The graph is
/// scored from `end` so the walk descends scores from `start` down to the
/// seed. An unreachable `end` yields a path holding only `start`.
pub fn find_path(
    map: &Map,
    start: Coord2,
    end: Coord2,
    distance: impl Fn(Coord2, Coord2) -> f64,
    allow_diagonals: bool,
) -> Path {
    let mut graph = Graph::passable(map, allow_diagonals, |m, c| m.is_passable(c));
    dijkstra::score(&mut graph, end, distance);
    from_scored(&graph, start)
}

/// Descends a scored graph from `start`, at each step moving to the
/// lowest-scored neighbour, stopping at the seed (score 0) or wherever no
/// neighbour improves on the current score.
pub fn from_scored(graph: &Graph, start: Coord2) -> Path {
    let mut points = VecDeque::new();
    points.push_back(start);
    let Some(mut current) = graph.index_of(start) else {
        return Path { points };
    };
    let mut remaining = graph.len();
    while graph.node_at(current).score != 0.0 {
        let Some(next) = lowest_neighbor_index(graph, current) else {
            break;
        };
        if graph.node_at(next).score >= graph.node_at(current).score {
            break;
        }
        points.push_back(graph.node_at(next).coord);
        current = next;
        // Strictly decreasing scores cannot revisit a node; this guards
        // against a malformed graph.
        remaining -= 1;
        if remaining == 0 {
            break;
        }
    }
    Path { points }
}

fn lowest_neighbor_index(graph: &Graph, index: usize) -> Option<usize> {
    let mut best: Option<usize> = None;
    for &neighbor in graph.node_at(index).neighbors() {
        let neighbor = neighbor as usize;
        if best.map_or(true, |b| graph.node_at(neighbor).score < graph.node_at(b).score) {
            best = Some(neighbor);
        }
    }
    best.filter(|&b| graph.node_at(b).is_scored())
}
