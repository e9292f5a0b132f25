//! Match detection - pure functions over the visible grid
//!
//! A cell is matched when it belongs to a straight horizontal or vertical run of
//! three or more equal tiles. Rather than walking runs, each cell is tested
//! against six local patterns:
//!
//! ```text
//!   two left     two right    two up    two down   h-center    v-center
//!   X X [t]      [t] X X        X        [t]       X [t] X        X
//!                               X         X                      [t]
//!                              [t]        X                       X
//! ```
//!
//! Any run of length three or more marks every member, because each member sees
//! at least one of the patterns. Longer runs are simply more matched cells.
//!
//! Off-grid neighbours come back as `None` from [`TileGrid::get`] and never
//! equal a tile. [`EMPTY`] cells never match.

use crate::grid::TileGrid;
use crate::types::{Position, EMPTY};

/// Neighbour pairs that, if both equal to the centre tile, complete a run of three
const PATTERNS: [[(isize, isize); 2]; 6] = [
    [(0, -1), (0, -2)],
    [(0, 1), (0, 2)],
    [(-1, 0), (1, 0)],
    [(0, -1), (0, 1)],
    [(-1, 0), (-2, 0)],
    [(1, 0), (2, 0)],
];

/// True iff `a` and `b` are orthogonal neighbours
#[inline]
pub fn is_adjacent(a: Position, b: Position) -> bool {
    a.is_adjacent(b)
}

/// Check if the tile at `pos` is part of any straight run of three or more
pub fn is_matched_at(grid: &TileGrid, pos: Position) -> bool {
    let Some(tile) = grid.get(pos) else {
        return false;
    };
    if tile == EMPTY {
        return false;
    }

    let same = |d_row: isize, d_col: isize| {
        pos.offset(d_row, d_col).and_then(|p| grid.get(p)) == Some(tile)
    };

    PATTERNS
        .iter()
        .any(|pair| pair.iter().all(|&(d_row, d_col)| same(d_row, d_col)))
}

/// Collect every matched position into `out` (cleared first), row-major.
///
/// Lets callers reuse one buffer across cascade passes.
pub fn find_all_matches_into(grid: &TileGrid, out: &mut Vec<Position>) {
    out.clear();
    out.extend(grid.positions().filter(|&pos| is_matched_at(grid, pos)));
}

/// All matched positions in row-major order
pub fn find_all_matches(grid: &TileGrid) -> Vec<Position> {
    let mut out = Vec::new();
    find_all_matches_into(grid, &mut out);
    out
}

/// Short-circuiting form of `!find_all_matches(grid).is_empty()`
pub fn has_any_match(grid: &TileGrid) -> bool {
    grid.positions().any(|pos| is_matched_at(grid, pos))
}
