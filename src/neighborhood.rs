use crate::coord::Coord2;

/// 4-directional movement (Von Neumann neighborhood).
#[derive(Copy, Clone, Debug, PartialEq, Eq, Hash)]
pub enum Dir4 {
    North,
    East,
    South,
    West,
}

impl Dir4 {
    pub const ALL: [Dir4; 4] = [Dir4::North, Dir4::East, Dir4::South, Dir4::West];

    #[inline]
    pub const fn offset(self) -> Coord2 {
        match self {
            Dir4::North => Coord2::new(0, -1),
            Dir4::East => Coord2::new(1, 0),
            Dir4::South => Coord2::new(0, 1),
            Dir4::West => Coord2::new(-1, 0),
        }
    }
}

/// 8-directional movement (Moore neighborhood).
#[derive(Copy, Clone, Debug, PartialEq, Eq, Hash)]
pub enum Dir8 {
    N,
    NE,
    E,
    SE,
    S,
    SW,
    W,
    NW,
}

impl Dir8 {
    pub const ALL: [Dir8; 8] = [
        Dir8::N,
        Dir8::NE,
        Dir8::E,
        Dir8::SE,
        Dir8::S,
        Dir8::SW,
        Dir8::W,
        Dir8::NW,
    ];

    #[inline]
    pub const fn offset(self) -> Coord2 {
        match self {
            Dir8::N => Coord2::new(0, -1),
            Dir8::NE => Coord2::new(1, -1),
            Dir8::E => Coord2::new(1, 0),
            Dir8::SE => Coord2::new(1, 1),
            Dir8::S => Coord2::new(0, 1),
            Dir8::SW => Coord2::new(-1, 1),
            Dir8::W => Coord2::new(-1, 0),
            Dir8::NW => Coord2::new(-1, -1),
        }
    }

    #[inline]
    pub const fn is_diagonal(self) -> bool {
        matches!(self, Dir8::NE | Dir8::SE | Dir8::SW | Dir8::NW)
    }
}
