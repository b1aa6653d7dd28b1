use core::fmt::{self, Write};

use bitflags::bitflags;

use crate::coord::Coord2;
use crate::grid::Grid;
use crate::neighborhood::{Dir4, Dir8};
use crate::tile::Tile;

bitflags! {
    /// Cardinal wall-connection mask, used by renderers to pick
    /// line-drawing glyphs. `OTHER` marks a wall with no connected
    /// cardinal neighbour.
    #[derive(Copy, Clone, Debug, PartialEq, Eq)]
    pub struct Walls: u8 {
        const WEST = 1;
        const EAST = 1 << 1;
        const NORTH = 1 << 2;
        const SOUTH = 1 << 3;
        const OTHER = 1 << 4;
    }
}

impl Walls {
    const CARDINALS: [(Walls, Dir4); 4] = [
        (Walls::WEST, Dir4::West),
        (Walls::EAST, Dir4::East),
        (Walls::NORTH, Dir4::North),
        (Walls::SOUTH, Dir4::South),
    ];
}

/// Rectangular tile map. Storage starts zeroed to Rock; every coordinate
/// query is total and treats out-of-bounds cells as solid rock.
#[derive(Clone, Debug, PartialEq, Eq)]
pub struct Map {
    tiles: Grid<Tile>,
}

impl Map {
    pub fn new(width: u32, height: u32) -> Self {
        debug_assert!(width > 0 && height > 0, "map dimensions must be positive");
        Self {
            tiles: Grid::new_filled(width, height, Tile::Rock),
        }
    }

    #[inline]
    pub const fn width(&self) -> u32 {
        self.tiles.width()
    }

    #[inline]
    pub const fn height(&self) -> u32 {
        self.tiles.height()
    }

    #[inline]
    pub fn len(&self) -> usize {
        self.tiles.len()
    }

    #[inline]
    pub fn is_empty(&self) -> bool {
        self.tiles.is_empty()
    }

    #[inline]
    pub fn in_bounds(&self, coord: Coord2) -> bool {
        self.tiles.in_bounds(coord)
    }

    pub fn tile(&self, coord: Coord2) -> Option<Tile> {
        self.tiles.get(coord).copied()
    }

    pub fn tile_is(&self, coord: Coord2, tile: Tile) -> bool {
        self.tile(coord) == Some(tile)
    }

    pub fn set_tile(&mut self, coord: Coord2, tile: Tile) {
        self.tiles.set(coord, tile);
    }

    pub fn fill(&mut self, tile: Tile) {
        self.tiles.fill(tile);
    }

    #[inline]
    pub fn tiles(&self) -> &Grid<Tile> {
        &self.tiles
    }

    pub fn is_passable(&self, coord: Coord2) -> bool {
        self.tile(coord).map_or(false, Tile::is_passable)
    }

    /// Out-of-bounds cells block sight.
    pub fn is_opaque(&self, coord: Coord2) -> bool {
        self.tile(coord).map_or(true, Tile::is_opaque)
    }

    /// A wall is a solid cell (or closed door) with at least one passable
    /// cell in its 8-neighbourhood. Walls are never stored explicitly; this
    /// recovers the boundary between rock and walkable space.
    pub fn is_wall(&self, coord: Coord2) -> bool {
        let Some(tile) = self.tile(coord) else {
            return false;
        };
        if tile.is_passable() && tile != Tile::Door {
            return false;
        }
        Dir8::ALL
            .iter()
            .any(|dir| self.is_passable(coord + dir.offset()))
    }

    /// A wall touching at least one Room tile.
    pub fn is_room_wall(&self, coord: Coord2) -> bool {
        self.is_wall(coord)
            && Dir8::ALL
                .iter()
                .any(|dir| self.tile_is(coord + dir.offset(), Tile::Room))
    }

    /// Two cells connect when some passable 8-neighbour of `from` also
    /// touches `to`. Detached wall strings separated by solid rock do not
    /// connect even when adjacent.
    pub fn is_connecting(&self, from: Coord2, to: Coord2) -> bool {
        Dir8::ALL.iter().any(|dir| {
            let between = from + dir.offset();
            self.is_passable(between) && between.chebyshev_distance(to) == 1
        })
    }

    /// Mask of cardinal directions whose neighbour is a connected wall.
    /// Empty for non-walls; `OTHER` for an isolated wall cell.
    pub fn wall_mask(&self, coord: Coord2) -> Walls {
        self.mask_by(coord, Self::is_wall)
    }

    /// Like [`Map::wall_mask`] but only room walls set bits, so renderers
    /// can light room perimeters separately from corridor walls.
    pub fn room_wall_mask(&self, coord: Coord2) -> Walls {
        self.mask_by(coord, Self::is_room_wall)
    }

    /// A wall whose mask holds both a vertical and a horizontal bit.
    pub fn is_corner_wall(&self, coord: Coord2) -> bool {
        let mask = self.wall_mask(coord);
        mask.intersects(Walls::NORTH | Walls::SOUTH) && mask.intersects(Walls::EAST | Walls::WEST)
    }

    fn mask_by(&self, coord: Coord2, pred: impl Fn(&Self, Coord2) -> bool) -> Walls {
        if !pred(self, coord) {
            return Walls::empty();
        }
        let mut mask = Walls::empty();
        for (bit, dir) in Walls::CARDINALS {
            let neighbor = coord + dir.offset();
            if pred(self, neighbor) && self.is_connecting(coord, neighbor) {
                mask |= bit;
            }
        }
        if mask.is_empty() {
            mask = Walls::OTHER;
        }
        mask
    }
}

impl fmt::Display for Map {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        for y in 0..self.height() {
            for tile in self.tiles.row(y) {
                f.write_char(tile.as_char())?;
            }
            f.write_char('\n')?;
        }
        Ok(())
    }
}
