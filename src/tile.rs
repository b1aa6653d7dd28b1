/// One map cell, stored as its printable byte so a grid can be written to a
/// text stream without translation. The byte values are a stability
/// contract and must not change.
#[repr(u8)]
#[derive(Copy, Clone, Debug, Default, PartialEq, Eq, Hash)]
#[cfg_attr(feature = "serde", derive(serde::Serialize, serde::Deserialize))]
pub enum Tile {
    #[default]
    Rock = b' ',
    Room = b'.',
    Corridor = b'#',
    Door = b'+',
    DoorOpen = b'=',
}

impl Tile {
    /// An agent may occupy Room, Corridor, and Door tiles. Rock is solid.
    #[inline]
    pub const fn is_passable(self) -> bool {
        !matches!(self, Tile::Rock)
    }

    /// Blocks sight. A closed Door is passable but opaque.
    #[inline]
    pub const fn is_opaque(self) -> bool {
        matches!(self, Tile::Rock | Tile::Door)
    }

    #[inline]
    pub const fn as_byte(self) -> u8 {
        self as u8
    }

    #[inline]
    pub const fn as_char(self) -> char {
        self as u8 as char
    }

    pub const fn from_byte(byte: u8) -> Option<Tile> {
        match byte {
            b' ' => Some(Tile::Rock),
            b'.' => Some(Tile::Room),
            b'#' => Some(Tile::Corridor),
            b'+' => Some(Tile::Door),
            b'=' => Some(Tile::DoorOpen),
            _ => None,
        }
    }
}
