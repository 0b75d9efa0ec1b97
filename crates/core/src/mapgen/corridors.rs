//! Maze-growth tunneling between intersections. The walk is an explicit depth-first stack so
//! large grids cannot exhaust the call stack; each frame fixes its direction order on entry,
//! which keeps the random draws in the same order a recursive walk would make them.

use tracing::debug;

use crate::rng::DungeonRng;
use crate::types::{Direction, Pos};

use super::cell::CellFlags;
use super::generator::BuildContext;
use super::grid::Grid;

struct Frame {
    i: i32,
    j: i32,
    dirs: Vec<Direction>,
    next: usize,
}

pub(super) fn carve_corridors(ctx: &mut BuildContext<'_>) {
    let mut walks = 0;
    for i in 0..ctx.n_i {
        for j in 0..ctx.n_j {
            let start = Pos::intersection(i, j);
            if ctx.grid.has(start, CellFlags::CORRIDOR) || ctx.grid.has(start, CellFlags::BLOCKED) {
                continue;
            }
            tunnel(&mut ctx.grid, ctx.rng, ctx.straightness, i, j);
            walks += 1;
        }
    }
    let corridor_cells =
        ctx.grid.cells().iter().filter(|cell| cell.has(CellFlags::CORRIDOR)).count();
    debug!(walks, corridor_cells, "corridors carved");
}

fn tunnel(grid: &mut Grid, rng: &mut DungeonRng, straightness: u8, i: i32, j: i32) {
    let dirs = tunnel_dirs(rng, straightness, None);
    let mut stack = vec![Frame { i, j, dirs, next: 0 }];

    while let Some(frame) = stack.last_mut() {
        let Some(&dir) = frame.dirs.get(frame.next) else {
            stack.pop();
            continue;
        };
        frame.next += 1;
        let (i, j) = (frame.i, frame.j);

        if open_tunnel(grid, i, j, dir) {
            let dirs = tunnel_dirs(rng, straightness, Some(dir));
            stack.push(Frame { i: i + dir.d_row(), j: j + dir.d_col(), dirs, next: 0 });
        }
    }
}

/// Shuffled direction order; with probability `straightness`% the previous direction is tried
/// first.
pub(super) fn tunnel_dirs(
    rng: &mut DungeonRng,
    straightness: u8,
    last_dir: Option<Direction>,
) -> Vec<Direction> {
    let mut dirs = Direction::ALL.to_vec();
    rng.shuffle(&mut dirs);

    if let Some(last) = last_dir
        && straightness > 0
        && rng.percent_chance(straightness)
    {
        dirs.retain(|&dir| dir != last);
        dirs.insert(0, last);
    }
    dirs
}

fn open_tunnel(grid: &mut Grid, i: i32, j: i32, dir: Direction) -> bool {
    let this = Pos::intersection(i, j);
    let next = Pos::intersection(i + dir.d_row(), j + dir.d_col());
    let mid = this.step(dir, 1);

    if !sound_tunnel(grid, mid, next) {
        return false;
    }
    delve_tunnel(grid, this, next);
    true
}

fn sound_tunnel(grid: &Grid, mid: Pos, next: Pos) -> bool {
    if next.row < 0 || next.row > grid.n_rows() || next.col < 0 || next.col > grid.n_cols() {
        return false;
    }
    [mid, next]
        .into_iter()
        .all(|pos| grid.get(pos).is_some_and(|cell| !cell.is_blocked_corridor()))
}

fn delve_tunnel(grid: &mut Grid, this: Pos, next: Pos) {
    for row in this.row.min(next.row)..=this.row.max(next.row) {
        for col in this.col.min(next.col)..=this.col.max(next.col) {
            grid.update(Pos { row, col }, |cell| {
                cell.remove(CellFlags::ENTRANCE);
                cell.insert(CellFlags::CORRIDOR);
            });
        }
    }
}
