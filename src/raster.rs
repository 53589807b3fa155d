//! Cell-set algorithms behind the multi-cell paint tools.
//!
//! [`line_cells`] rasterizes a straight line between two cells (Bresenham,
//! 8-connected); [`fill_region`] discovers a flood-fill region (4-connected).
//! Both only compute positions; applying color changes is the edit
//! engine's job, so every touched cell can be recorded as its own
//! reversible action.

use std::collections::{HashMap, HashSet, VecDeque};

use crate::models::{ContentGrid, Position};

/// Integer cells on the straight line from `(r0, c0)` to `(r1, c1)`,
/// endpoints inclusive, ordered start to end.
///
/// # Examples
///
/// ```
/// use termcel::raster::line_cells;
/// use termcel::models::Position;
///
/// let cells = line_cells(0, 0, 0, 3);
/// assert_eq!(cells.len(), 4);
/// assert_eq!(cells[0], Position::new(0, 0));
/// assert_eq!(cells[3], Position::new(0, 3));
/// ```
pub fn line_cells(r0: usize, c0: usize, r1: usize, c1: usize) -> Vec<Position> {
    let mut cells = Vec::new();

    let (mut x, mut y) = (c0 as i64, r0 as i64);
    let (x1, y1) = (c1 as i64, r1 as i64);

    let dx = (x1 - x).abs();
    let dy = -(y1 - y).abs();
    let sx = if x < x1 { 1 } else { -1 };
    let sy = if y < y1 { 1 } else { -1 };
    let mut err = dx + dy;

    loop {
        cells.push(Position::new(y as usize, x as usize));

        if x == x1 && y == y1 {
            break;
        }

        let e2 = 2 * err;
        if e2 >= dy {
            err += dy;
            x += sx;
        }
        if e2 <= dx {
            err += dx;
            y += sy;
        }
    }

    cells
}

/// Discovers the 4-connected flood-fill region around `seed`.
///
/// The target color is whatever `colors` holds at the seed, including
/// "no color". The frontier only crosses cells that are paintable in
/// `grid` (non-blank characters) and whose current color equals the
/// target; blank cells and differently-colored cells bound the region.
/// Returns positions in visit order; the region itself is
/// order-independent. A blank or out-of-range seed yields an empty
/// region.
pub fn fill_region(
    grid: &ContentGrid,
    colors: &HashMap<Position, u8>,
    seed: Position,
) -> Vec<Position> {
    if !grid.is_paintable(seed.row, seed.col) {
        return Vec::new();
    }

    let target = colors.get(&seed).copied();
    let mut region = Vec::new();
    let mut visited = HashSet::new();
    let mut queue = VecDeque::new();
    queue.push_back(seed);

    while let Some(pos) = queue.pop_front() {
        if !visited.insert(pos) {
            continue;
        }
        if !grid.is_paintable(pos.row, pos.col) {
            continue;
        }
        if colors.get(&pos).copied() != target {
            continue;
        }

        region.push(pos);

        if pos.row > 0 {
            queue.push_back(Position::new(pos.row - 1, pos.col));
        }
        queue.push_back(Position::new(pos.row + 1, pos.col));
        if pos.col > 0 {
            queue.push_back(Position::new(pos.row, pos.col - 1));
        }
        queue.push_back(Position::new(pos.row, pos.col + 1));
    }

    region
}
