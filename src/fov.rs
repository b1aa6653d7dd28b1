use crate::coord::Coord2;
use crate::grid::Grid;
use crate::map::Map;

/// Hard ceiling on shadowcast column recursion; bounds an unbounded-radius
/// field of view.
pub const MAX_RECURSION: u32 = 100;

/// Per-cell visibility state, parallel to the tile map.
#[repr(u8)]
#[derive(Copy, Clone, Debug, Default, PartialEq, Eq)]
#[cfg_attr(feature = "serde", derive(serde::Serialize, serde::Deserialize))]
pub enum Visibility {
    #[default]
    CannotSee = 0,
    Seen,
    Visible,
}

/// Field-of-view state for one observer. Recomputing demotes everything
/// currently Visible to Seen, then marks the freshly visible set; the
/// origin is always Visible.
#[derive(Clone, Debug)]
pub struct Fov {
    visibility: Grid<Visibility>,
}

impl Fov {
    pub fn new(width: u32, height: u32) -> Self {
        Self {
            visibility: Grid::new_filled(width, height, Visibility::CannotSee),
        }
    }

    #[inline]
    pub fn width(&self) -> u32 {
        self.visibility.width()
    }

    #[inline]
    pub fn height(&self) -> u32 {
        self.visibility.height()
    }

    pub fn visibility(&self, coord: Coord2) -> Visibility {
        self.visibility
            .get(coord)
            .copied()
            .unwrap_or(Visibility::CannotSee)
    }

    pub fn is_visible(&self, coord: Coord2) -> bool {
        self.visibility(coord) == Visibility::Visible
    }

    /// Previously seen but not currently visible.
    pub fn is_seen(&self, coord: Coord2) -> bool {
        self.visibility(coord) == Visibility::Seen
    }

    #[inline]
    pub fn grid(&self) -> &Grid<Visibility> {
        &self.visibility
    }

    /// Recomputes visibility from `origin`. A negative radius is unbounded
    /// (clamped only by [`MAX_RECURSION`]); otherwise cells beyond the
    /// Chebyshev radius stay dark.
    pub fn compute(&mut self, map: &Map, origin: Coord2, radius: i32) {
        for cell in self.visibility.cells_mut() {
            if *cell == Visibility::Visible {
                *cell = Visibility::Seen;
            }
        }
        if !self.visibility.in_bounds(origin) {
            return;
        }
        let visibility = &mut self.visibility;
        shadowcast(
            origin,
            |coord| radius < 0 || origin.chebyshev_distance(coord) <= radius as u32,
            |coord| map.is_opaque(coord),
            |coord| visibility.set(coord, Visibility::Visible),
        );
    }
}

/// Slope through tile corners, kept as an exact ratio.
#[derive(Copy, Clone, Debug)]
struct Slope {
    num: i32,
    den: i32,
}

impl Slope {
    const fn new(num: i32, den: i32) -> Self {
        Self { num, den }
    }
}

/// Recursive shadowcasting over eight octants. `in_range` bounds the
/// field, `is_opaque` reads the world, `mark_visible` receives every
/// visible cell except the origin itself (which the caller owns).
pub fn shadowcast(
    origin: Coord2,
    in_range: impl Fn(Coord2) -> bool,
    is_opaque: impl Fn(Coord2) -> bool,
    mut mark_visible: impl FnMut(Coord2),
) {
    if in_range(origin) {
        mark_visible(origin);
    }
    for octant in 0..8 {
        scan_octant(
            origin,
            octant,
            1,
            Slope::new(0, 1),
            Slope::new(1, 1),
            &in_range,
            &is_opaque,
            &mut mark_visible,
        );
    }
}

/// Maps octant-local (depth, col) back to grid coordinates. Depth runs
/// along the octant's cardinal axis, col from that axis to the diagonal.
fn transform_octant(origin: Coord2, octant: u8, depth: i32, col: i32) -> Coord2 {
    match octant {
        0 => Coord2::new(origin.x + depth, origin.y - col),
        1 => Coord2::new(origin.x + col, origin.y - depth),
        2 => Coord2::new(origin.x - col, origin.y - depth),
        3 => Coord2::new(origin.x - depth, origin.y - col),
        4 => Coord2::new(origin.x - depth, origin.y + col),
        5 => Coord2::new(origin.x - col, origin.y + depth),
        6 => Coord2::new(origin.x + col, origin.y + depth),
        _ => Coord2::new(origin.x + depth, origin.y + col),
    }
}

#[allow(clippy::too_many_arguments)]
fn scan_octant(
    origin: Coord2,
    octant: u8,
    depth: i32,
    mut start: Slope,
    end: Slope,
    in_range: &impl Fn(Coord2) -> bool,
    is_opaque: &impl Fn(Coord2) -> bool,
    mark_visible: &mut impl FnMut(Coord2),
) {
    if depth as u32 > MAX_RECURSION {
        return;
    }
    let min_col = round_ties_up(depth, start);
    let max_col = round_ties_down(depth, end);
    let mut prev_opaque: Option<bool> = None;

    for col in min_col..=max_col {
        let coord = transform_octant(origin, octant, depth, col);
        let opaque = is_opaque(coord);
        if (opaque || wedge_contains(depth, col, start, end)) && in_range(coord) {
            mark_visible(coord);
        }
        if prev_opaque == Some(true) && !opaque {
            start = Slope::new(2 * col - 1, 2 * depth);
        }
        if prev_opaque == Some(false) && opaque {
            scan_octant(
                origin,
                octant,
                depth + 1,
                start,
                Slope::new(2 * col - 1, 2 * depth),
                in_range,
                is_opaque,
                mark_visible,
            );
        }
        prev_opaque = Some(opaque);
    }

    if prev_opaque == Some(false) {
        scan_octant(
            origin,
            octant,
            depth + 1,
            start,
            end,
            in_range,
            is_opaque,
            mark_visible,
        );
    }
}

/// Floor cells on the wedge boundary only count when their centre lies
/// inside it, which is what makes the field symmetric. Without the
/// symmetric build every wedge-touching cell counts.
fn wedge_contains(depth: i32, col: i32, start: Slope, end: Slope) -> bool {
    if !cfg!(feature = "fov-symmetric") {
        return true;
    }
    col * start.den >= depth * start.num && col * end.den <= depth * end.num
}

/// floor(depth * slope + 1/2)
fn round_ties_up(depth: i32, slope: Slope) -> i32 {
    (2 * depth * slope.num + slope.den) / (2 * slope.den)
}

/// ceil(depth * slope - 1/2)
fn round_ties_down(depth: i32, slope: Slope) -> i32 {
    (2 * depth * slope.num + slope.den - 1) / (2 * slope.den)
}
