use alloc::vec::Vec;

use crate::coord::Coord2;
use crate::map::Map;
use crate::neighborhood::Dir8;

/// Upper bound on neighbours per graph node.
pub const MAX_NEIGHBORS: usize = 8;

/// One cell of a scored graph. `score` is `f64::INFINITY` until a Dijkstra
/// pass reaches the node.
#[derive(Clone, Debug)]
pub struct GraphNode {
    pub score: f64,
    pub coord: Coord2,
    neighbors: [u32; MAX_NEIGHBORS],
    neighbor_len: u8,
}

impl GraphNode {
    fn new(coord: Coord2) -> Self {
        Self {
            score: f64::INFINITY,
            coord,
            neighbors: [0; MAX_NEIGHBORS],
            neighbor_len: 0,
        }
    }

    #[inline]
    pub fn neighbors(&self) -> &[u32] {
        &self.neighbors[..self.neighbor_len as usize]
    }

    #[inline]
    pub fn is_scored(&self) -> bool {
        self.score < f64::INFINITY
    }

    fn push_neighbor(&mut self, index: u32) {
        self.neighbors[self.neighbor_len as usize] = index;
        self.neighbor_len += 1;
    }
}

/// Per-cell neighbour graph over a map. Every cell gets a node; the
/// passability predicate filters which cells appear as neighbours of
/// others. Neighbour references are indices into the node vector, so the
/// graph stays valid when moved.
#[derive(Clone, Debug)]
pub struct Graph {
    width: u32,
    height: u32,
    nodes: Vec<GraphNode>,
}

impl Graph {
    /// Graph over every cell with no passability filter. Used by the
    /// corridor carvers, which tunnel through solid rock.
    pub fn open(map: &Map, allow_diagonals: bool) -> Self {
        Self::build(map, allow_diagonals, |_, _| true)
    }

    /// Graph whose neighbour lists only contain cells satisfying the
    /// predicate.
    pub fn passable(
        map: &Map,
        allow_diagonals: bool,
        pred: impl Fn(&Map, Coord2) -> bool,
    ) -> Self {
        Self::build(map, allow_diagonals, pred)
    }

    fn build(map: &Map, allow_diagonals: bool, pred: impl Fn(&Map, Coord2) -> bool) -> Self {
        let width = map.width();
        let height = map.height();
        let mut nodes = Vec::with_capacity(map.len());
        for index in 0..map.len() {
            let coord = Coord2::from_index(index, width);
            let mut node = GraphNode::new(coord);
            for dir in Dir8::ALL {
                if dir.is_diagonal() && !allow_diagonals {
                    continue;
                }
                let neighbor = coord + dir.offset();
                if !map.in_bounds(neighbor) || !pred(map, neighbor) {
                    continue;
                }
                let Some(neighbor_index) = neighbor.to_index(width) else {
                    continue;
                };
                node.push_neighbor(neighbor_index as u32);
            }
            nodes.push(node);
        }
        Self {
            width,
            height,
            nodes,
        }
    }

    #[inline]
    pub fn width(&self) -> u32 {
        self.width
    }

    #[inline]
    pub fn height(&self) -> u32 {
        self.height
    }

    #[inline]
    pub fn len(&self) -> usize {
        self.nodes.len()
    }

    #[inline]
    pub fn is_empty(&self) -> bool {
        self.nodes.is_empty()
    }

    pub fn node(&self, coord: Coord2) -> Option<&GraphNode> {
        coord.to_index(self.width).and_then(|i| self.nodes.get(i))
    }

    #[inline]
    pub fn nodes(&self) -> &[GraphNode] {
        &self.nodes
    }

    #[inline]
    pub(crate) fn index_of(&self, coord: Coord2) -> Option<usize> {
        if coord.y < 0 || coord.y >= self.height as i32 {
            return None;
        }
        coord.to_index(self.width)
    }

    #[inline]
    pub(crate) fn node_at(&self, index: usize) -> &GraphNode {
        &self.nodes[index]
    }

    #[inline]
    pub(crate) fn node_at_mut(&mut self, index: usize) -> &mut GraphNode {
        &mut self.nodes[index]
    }

    /// Number of nodes reached by the last scoring pass.
    pub fn scored_count(&self) -> usize {
        self.nodes.iter().filter(|n| n.is_scored()).count()
    }

    /// The neighbour with the minimum score, or None when the node is
    /// isolated or every neighbour is unscored.
    pub fn lowest_scored_neighbor(&self, coord: Coord2) -> Option<&GraphNode> {
        let node = self.node(coord)?;
        let mut best: Option<&GraphNode> = None;
        for &index in node.neighbors() {
            let neighbor = &self.nodes[index as usize];
            if best.map_or(true, |b| neighbor.score < b.score) {
                best = Some(neighbor);
            }
        }
        best.filter(|b| b.is_scored())
    }
}
