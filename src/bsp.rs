use alloc::vec::Vec;

use rand_core::RngCore;

use crate::coord::Coord2;
use crate::map::Map;
use crate::rng;
use crate::tile::Tile;

/// Index of a node in a [`Bsp`] arena.
#[derive(Copy, Clone, Debug, PartialEq, Eq, Hash)]
pub struct NodeId(u32);

#[derive(Copy, Clone, Debug, PartialEq, Eq)]
pub enum SplitDirection {
    /// Split the width; children sit side by side along x.
    Horizontal,
    /// Split the height; children stack along y.
    Vertical,
}

/// Axis-aligned rectangle node. Children, when present, tile the parent
/// exactly along one axis.
#[derive(Clone, Debug)]
pub struct BspNode {
    pub x: i32,
    pub y: i32,
    pub width: u32,
    pub height: u32,
    parent: Option<NodeId>,
    left: Option<NodeId>,
    right: Option<NodeId>,
}

impl BspNode {
    fn leaf(x: i32, y: i32, width: u32, height: u32, parent: Option<NodeId>) -> Self {
        Self {
            x,
            y,
            width,
            height,
            parent,
            left: None,
            right: None,
        }
    }
}

/// Binary space partition tree stored as an arena; `parent`/`left`/`right`
/// are indices into the node vector.
#[derive(Clone, Debug)]
pub struct Bsp {
    nodes: Vec<BspNode>,
}

impl Bsp {
    pub const ROOT: NodeId = NodeId(0);

    pub fn new(width: u32, height: u32) -> Self {
        debug_assert!(width > 0 && height > 0, "bsp dimensions must be positive");
        Self {
            nodes: alloc::vec![BspNode::leaf(0, 0, width, height, None)],
        }
    }

    #[inline]
    pub fn node(&self, id: NodeId) -> &BspNode {
        &self.nodes[id.0 as usize]
    }

    #[inline]
    pub fn node_count(&self) -> usize {
        self.nodes.len()
    }

    #[inline]
    pub fn is_leaf(&self, id: NodeId) -> bool {
        self.node(id).left.is_none()
    }

    #[inline]
    pub fn parent(&self, id: NodeId) -> Option<NodeId> {
        self.node(id).parent
    }

    #[inline]
    pub fn left(&self, id: NodeId) -> Option<NodeId> {
        self.node(id).left
    }

    #[inline]
    pub fn right(&self, id: NodeId) -> Option<NodeId> {
        self.node(id).right
    }

    pub fn sibling(&self, id: NodeId) -> Option<NodeId> {
        let parent = self.parent(id)?;
        if self.left(parent) == Some(id) {
            self.right(parent)
        } else {
            self.left(parent)
        }
    }

    /// Splits a leaf into two children. No-op when the node already has
    /// children or the position is not strictly inside the split dimension.
    pub fn split(&mut self, id: NodeId, position: u32, direction: SplitDirection) {
        let node = self.node(id);
        debug_assert!(node.left.is_none() && node.right.is_none(), "node already split");
        if node.left.is_some() || node.right.is_some() {
            return;
        }
        let (x, y, width, height) = (node.x, node.y, node.width, node.height);
        match direction {
            SplitDirection::Horizontal => {
                if position == 0 || position >= width {
                    return;
                }
                let left = BspNode::leaf(x, y, position, height, Some(id));
                let right =
                    BspNode::leaf(x + position as i32, y, width - position, height, Some(id));
                self.attach(id, left, right);
            }
            SplitDirection::Vertical => {
                if position == 0 || position >= height {
                    return;
                }
                let left = BspNode::leaf(x, y, width, position, Some(id));
                let right =
                    BspNode::leaf(x, y + position as i32, width, height - position, Some(id));
                self.attach(id, left, right);
            }
        }
    }

    fn attach(&mut self, id: NodeId, left: BspNode, right: BspNode) {
        let left_id = NodeId(self.nodes.len() as u32);
        self.nodes.push(left);
        let right_id = NodeId(self.nodes.len() as u32);
        self.nodes.push(right);
        let node = &mut self.nodes[id.0 as usize];
        node.left = Some(left_id);
        node.right = Some(right_id);
    }

    /// Recursively splits at the midpoint, coin-flipping the direction and
    /// overriding the flip when the losing axis is too small. Stops when
    /// both axes are below `2 * min` or the recursion budget is spent.
    pub fn recursive_split(
        &mut self,
        id: NodeId,
        min_width: u32,
        min_height: u32,
        max_recursion: u32,
        rng: &mut impl RngCore,
    ) {
        debug_assert!(min_width > 0 && min_height > 0);
        if max_recursion == 0 {
            return;
        }
        let node = self.node(id);
        let (width, height) = (node.width, node.height);

        let direction = if rng::coin(rng) {
            if width < min_width * 2 {
                SplitDirection::Vertical
            } else {
                SplitDirection::Horizontal
            }
        } else if height < min_height * 2 {
            SplitDirection::Horizontal
        } else {
            SplitDirection::Vertical
        };

        let position = match direction {
            SplitDirection::Horizontal => {
                if width < min_width * 2 {
                    return;
                }
                width / 2
            }
            SplitDirection::Vertical => {
                if height < min_height * 2 {
                    return;
                }
                height / 2
            }
        };

        self.split(id, position, direction);
        let (Some(left), Some(right)) = (self.left(id), self.right(id)) else {
            return;
        };
        self.recursive_split(left, min_width, min_height, max_recursion - 1, rng);
        self.recursive_split(right, min_width, min_height, max_recursion - 1, rng);
    }

    /// Leftmost leaf of the subtree rooted at `id`.
    pub fn first_leaf(&self, id: NodeId) -> NodeId {
        let mut current = id;
        while let Some(left) = self.left(current) {
            current = left;
        }
        current
    }

    /// In-order leaf traversal: ascend until the current node is its
    /// parent's left child, then take the leftmost leaf of the right
    /// subtree. None at the rightmost leaf.
    pub fn next_leaf(&self, id: NodeId) -> Option<NodeId> {
        let mut current = id;
        loop {
            let parent = self.parent(current)?;
            if self.left(parent) == Some(current) {
                return Some(self.first_leaf(self.right(parent)?));
            }
            current = parent;
        }
    }

    /// Iterates every leaf of the tree in traversal order.
    pub fn leaves(&self) -> Leaves<'_> {
        Leaves {
            bsp: self,
            next: Some(self.first_leaf(Self::ROOT)),
        }
    }

    pub fn leaf_count(&self, id: NodeId) -> usize {
        match (self.left(id), self.right(id)) {
            (Some(left), Some(right)) => self.leaf_count(left) + self.leaf_count(right),
            _ => 1,
        }
    }

    /// Coin-flip descent to a leaf. Not uniform over leaves when depths
    /// differ; shallow leaves are favoured.
    pub fn random_leaf(&self, id: NodeId, rng: &mut impl RngCore) -> NodeId {
        let mut current = id;
        while let (Some(left), Some(right)) = (self.left(current), self.right(current)) {
            current = if rng::coin(rng) { left } else { right };
        }
        current
    }

    /// Centre of the first contiguous Room span inside the node's
    /// rectangle, scanning row-major. Corridor endpoints are picked from
    /// here so non-trivial room shapes still connect sensibly.
    pub fn find_room(&self, id: NodeId, map: &Map) -> Option<Coord2> {
        let node = self.node(id);
        for y in node.y..node.y + node.height as i32 {
            for x in node.x..node.x + node.width as i32 {
                if !map.tile_is(Coord2::new(x, y), Tile::Room) {
                    continue;
                }
                let mut x_end = x;
                while map.tile_is(Coord2::new(x_end + 1, y), Tile::Room) {
                    x_end += 1;
                }
                let mid_x = (x + x_end) / 2;
                let mut y_end = y;
                while map.tile_is(Coord2::new(mid_x, y_end + 1), Tile::Room) {
                    y_end += 1;
                }
                return Some(Coord2::new(mid_x, (y + y_end) / 2));
            }
        }
        None
    }
}

pub struct Leaves<'a> {
    bsp: &'a Bsp,
    next: Option<NodeId>,
}

impl Iterator for Leaves<'_> {
    type Item = NodeId;

    fn next(&mut self) -> Option<NodeId> {
        let current = self.next?;
        self.next = self.bsp.next_leaf(current);
        Some(current)
    }
}
