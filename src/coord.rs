use core::ops::{Add, Mul, Neg, Sub};

/// 2D integer coordinate for grid positions.
#[derive(Copy, Clone, Debug, Default, PartialEq, Eq, Hash)]
#[cfg_attr(feature = "serde", derive(serde::Serialize, serde::Deserialize))]
pub struct Coord2 {
    pub x: i32,
    pub y: i32,
}

impl Coord2 {
    pub const ZERO: Coord2 = Coord2 { x: 0, y: 0 };

    #[inline]
    pub const fn new(x: i32, y: i32) -> Self {
        Self { x, y }
    }

    #[inline]
    pub fn manhattan_distance(self, other: Coord2) -> u32 {
        (self.x - other.x).unsigned_abs() + (self.y - other.y).unsigned_abs()
    }

    #[inline]
    pub fn chebyshev_distance(self, other: Coord2) -> u32 {
        (self.x - other.x)
            .unsigned_abs()
            .max((self.y - other.y).unsigned_abs())
    }

    #[inline]
    pub fn to_index(self, width: u32) -> Option<usize> {
        if width == 0 || self.x < 0 || self.y < 0 || self.x >= width as i32 {
            return None;
        }
        Some((self.y as usize) * (width as usize) + (self.x as usize))
    }

    #[inline]
    pub fn from_index(index: usize, width: u32) -> Self {
        if width == 0 {
            return Coord2::ZERO;
        }
        Self {
            x: (index % width as usize) as i32,
            y: (index / width as usize) as i32,
        }
    }
}

impl Add for Coord2 {
    type Output = Coord2;

    fn add(self, rhs: Self) -> Self::Output {
        Coord2::new(self.x + rhs.x, self.y + rhs.y)
    }
}

impl Sub for Coord2 {
    type Output = Coord2;

    fn sub(self, rhs: Self) -> Self::Output {
        Coord2::new(self.x - rhs.x, self.y - rhs.y)
    }
}

impl Neg for Coord2 {
    type Output = Coord2;

    fn neg(self) -> Self::Output {
        Coord2::new(-self.x, -self.y)
    }
}

impl Mul<i32> for Coord2 {
    type Output = Coord2;

    fn mul(self, rhs: i32) -> Self::Output {
        Coord2::new(self.x * rhs, self.y * rhs)
    }
}

/// Real-valued point for the line rasteriser. Grid cells are addressed by
/// flooring each component.
#[derive(Copy, Clone, Debug, Default, PartialEq)]
#[cfg_attr(feature = "serde", derive(serde::Serialize, serde::Deserialize))]
pub struct Point {
    pub x: f64,
    pub y: f64,
}

impl Point {
    #[inline]
    pub const fn new(x: f64, y: f64) -> Self {
        Self { x, y }
    }

    #[inline]
    pub fn floor(self) -> Coord2 {
        Coord2::new(libm::floor(self.x) as i32, libm::floor(self.y) as i32)
    }
}

impl From<Coord2> for Point {
    fn from(coord: Coord2) -> Self {
        Point::new(coord.x as f64, coord.y as f64)
    }
}

impl Add for Point {
    type Output = Point;

    fn add(self, rhs: Self) -> Self::Output {
        Point::new(self.x + rhs.x, self.y + rhs.y)
    }
}

impl Sub for Point {
    type Output = Point;

    fn sub(self, rhs: Self) -> Self::Output {
        Point::new(self.x - rhs.x, self.y - rhs.y)
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn coord2_add() {
        assert_eq!(Coord2::new(1, 2) + Coord2::new(3, 4), Coord2::new(4, 6));
    }

    #[test]
    fn coord2_sub() {
        assert_eq!(Coord2::new(5, 6) - Coord2::new(1, 4), Coord2::new(4, 2));
    }

    #[test]
    fn coord2_manhattan() {
        assert_eq!(Coord2::new(0, 0).manhattan_distance(Coord2::new(3, 4)), 7);
    }

    #[test]
    fn coord2_chebyshev() {
        assert_eq!(Coord2::new(0, 0).chebyshev_distance(Coord2::new(3, 4)), 4);
    }

    #[test]
    fn coord2_index_roundtrip() {
        let c = Coord2::new(3, 5);
        let idx = c.to_index(10).unwrap();
        assert_eq!(Coord2::from_index(idx, 10), c);
    }

    #[test]
    fn coord2_out_of_bounds() {
        assert_eq!(Coord2::new(-1, 0).to_index(10), None);
        assert_eq!(Coord2::new(10, 0).to_index(10), None);
    }

    #[test]
    fn point_floor() {
        assert_eq!(Point::new(2.7, 3.1).floor(), Coord2::new(2, 3));
        assert_eq!(Point::new(-0.5, 0.0).floor(), Coord2::new(-1, 0));
    }

    #[test]
    fn point_from_coord() {
        let p = Point::from(Coord2::new(4, -2));
        assert_eq!(p, Point::new(4.0, -2.0));
    }
}
