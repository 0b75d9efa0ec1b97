//! Neighbourhood patterns for stair pockets and dead ends, as row/col offsets from the tested cell.

use crate::types::{Direction, Pos};

use super::cell::CellFlags;
use super::grid::Grid;

type Offsets = &'static [(i32, i32)];

/// A corridor end shaped for a staircase: three corridor cells in a line, walled on three sides.
pub(super) struct StairEnd {
    pub(super) dir: Direction,
    pub(super) walled: Offsets,
    pub(super) corridor: Offsets,
    pub(super) next: (i32, i32),
}

/// A one-cell dead end: walled on three sides, open only toward `recurse`.
pub(super) struct CloseEnd {
    pub(super) dir: Direction,
    pub(super) walled: Offsets,
    pub(super) recurse: (i32, i32),
}

pub(super) const STAIR_ENDS: [StairEnd; 4] = [
    StairEnd {
        dir: Direction::North,
        walled: &[(1, -1), (0, -1), (-1, -1), (-1, 0), (-1, 1), (0, 1), (1, 1)],
        corridor: &[(0, 0), (1, 0), (2, 0)],
        next: (1, 0),
    },
    StairEnd {
        dir: Direction::South,
        walled: &[(-1, -1), (0, -1), (1, -1), (1, 0), (1, 1), (0, 1), (-1, 1)],
        corridor: &[(0, 0), (-1, 0), (-2, 0)],
        next: (-1, 0),
    },
    StairEnd {
        dir: Direction::West,
        walled: &[(-1, 1), (-1, 0), (-1, -1), (0, -1), (1, -1), (1, 0), (1, 1)],
        corridor: &[(0, 0), (0, 1), (0, 2)],
        next: (0, 1),
    },
    StairEnd {
        dir: Direction::East,
        walled: &[(-1, -1), (-1, 0), (-1, 1), (0, 1), (1, 1), (1, 0), (1, -1)],
        corridor: &[(0, 0), (0, -1), (0, -2)],
        next: (0, -1),
    },
];

pub(super) const CLOSE_ENDS: [CloseEnd; 4] = [
    CloseEnd {
        dir: Direction::North,
        walled: &[(0, -1), (1, -1), (1, 0), (1, 1), (0, 1)],
        recurse: (-1, 0),
    },
    CloseEnd {
        dir: Direction::South,
        walled: &[(0, -1), (-1, -1), (-1, 0), (-1, 1), (0, 1)],
        recurse: (1, 0),
    },
    CloseEnd {
        dir: Direction::West,
        walled: &[(-1, 0), (-1, 1), (0, 1), (1, 1), (1, 0)],
        recurse: (0, -1),
    },
    CloseEnd {
        dir: Direction::East,
        walled: &[(-1, 0), (-1, -1), (0, -1), (1, -1), (1, 0)],
        recurse: (0, 1),
    },
];

/// Every `corridor` offset must be a corridor and no `walled` offset may be open space.
/// Off-grid cells count as walls.
pub(super) fn check_tunnel(grid: &Grid, pos: Pos, corridor: Offsets, walled: Offsets) -> bool {
    corridor.iter().all(|&(d_row, d_col)| grid.has(pos.offset(d_row, d_col), CellFlags::CORRIDOR))
        && walled.iter().all(|&(d_row, d_col)| !grid.is_openspace(pos.offset(d_row, d_col)))
}
