use alloc::collections::VecDeque;

use rand_core::RngCore;

use crate::coord::Coord2;
use crate::error::MapgenError;
use crate::map::Map;
use crate::neighborhood::Dir4;
use crate::rng;
use crate::tile::Tile;

/// Perfect-maze generator: randomised BFS over the odd-parity lattice,
/// knocking out the wall between each visited cell and its chosen two-step
/// neighbour. Exactly one corridor path exists between any two cells of the
/// result. The map is reset to Rock first.
pub fn generate(map: &mut Map, rng: &mut impl RngCore) -> Result<(), MapgenError> {
    if map.width() < 3 || map.height() < 3 {
        return Err(MapgenError::MapTooSmall {
            width: map.width(),
            height: map.height(),
        });
    }
    map.fill(Tile::Rock);

    let start = random_odd_cell(map, rng);
    map.set_tile(start, Tile::Corridor);

    let mut frontier = VecDeque::new();
    frontier.push_back(start);

    while let Some(current) = frontier.pop_front() {
        let mut candidates = [Coord2::ZERO; 4];
        let mut candidate_count = 0;
        for dir in Dir4::ALL {
            let target = current + dir.offset() * 2;
            if in_lattice(map, target) && map.tile_is(target, Tile::Rock) {
                candidates[candidate_count] = target;
                candidate_count += 1;
            }
        }
        if candidate_count == 0 {
            continue;
        }
        let target = candidates[rng::range_u32(rng, 0, candidate_count as u32 - 1) as usize];
        let between = Coord2::new((current.x + target.x) / 2, (current.y + target.y) / 2);
        map.set_tile(between, Tile::Corridor);
        map.set_tile(target, Tile::Corridor);
        frontier.push_back(current);
        frontier.push_back(target);
    }

    Ok(())
}

/// Random odd-parity cell inside the 1-cell border.
fn random_odd_cell(map: &Map, rng: &mut impl RngCore) -> Coord2 {
    let max_x = (map.width() as i32 - 3) / 2;
    let max_y = (map.height() as i32 - 3) / 2;
    let x = 1 + 2 * rng::range_i32(rng, 0, max_x);
    let y = 1 + 2 * rng::range_i32(rng, 0, max_y);
    Coord2::new(x, y)
}

/// Carve targets stay inside the 1-cell border.
fn in_lattice(map: &Map, coord: Coord2) -> bool {
    coord.x >= 1
        && coord.y >= 1
        && coord.x < map.width() as i32 - 1
        && coord.y < map.height() as i32 - 1
}
