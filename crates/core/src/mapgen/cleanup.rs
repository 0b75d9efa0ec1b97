//! Final pass: dead-end collapse, door reconciliation between rooms, and block clearing.

use std::collections::BTreeSet;
use std::mem;

use tracing::debug;

use crate::types::{Direction, Pos};

use super::cell::{Cell, CellFlags};
use super::generator::BuildContext;
use super::grid::Grid;
use super::model::{Door, DoorGroup};
use super::templates::{CLOSE_ENDS, check_tunnel};

pub(super) fn clean_dungeon(ctx: &mut BuildContext<'_>) {
    let percent = ctx.options.remove_deadends;
    if percent > 0 {
        let removed = collapse_tunnels(ctx, percent);
        debug!(removed, "dead ends collapsed");
    }
    fix_doors(ctx);
    debug!(door_groups = ctx.door_groups.len(), "doors reconciled");
    empty_blocks(&mut ctx.grid);
}

/// Tries to collapse each open intersection with probability `percent`; returns the number of
/// cells cleared.
pub(super) fn collapse_tunnels(ctx: &mut BuildContext<'_>, percent: u8) -> usize {
    if percent == 0 {
        return 0;
    }
    let all = percent >= 100;
    let mut removed = 0;

    for i in 0..ctx.n_i {
        for j in 0..ctx.n_j {
            let pos = Pos::intersection(i, j);
            let Some(cell) = ctx.grid.get(pos) else {
                continue;
            };
            if !cell.is_openspace() || cell.is_stairs() {
                continue;
            }
            if !(all || ctx.rng.percent_chance(percent)) {
                continue;
            }
            removed += collapse(&mut ctx.grid, pos);
        }
    }
    removed
}

struct CollapseFrame {
    pos: Pos,
    next: usize,
}

/// Clears a dead-end cell and follows the corridor behind it while it keeps ending blind.
/// Room and stair cells are never cleared.
fn collapse(grid: &mut Grid, start: Pos) -> usize {
    let collapsible = |grid: &Grid, pos: Pos| {
        grid.get(pos).is_some_and(|cell| {
            cell.is_openspace() && !cell.has(CellFlags::ROOM) && !cell.is_stairs()
        })
    };
    if !collapsible(grid, start) {
        return 0;
    }

    let mut removed = 0;
    let mut stack = vec![CollapseFrame { pos: start, next: 0 }];
    while let Some(frame) = stack.last_mut() {
        let Some(end) = CLOSE_ENDS.get(frame.next) else {
            stack.pop();
            continue;
        };
        frame.next += 1;
        let pos = frame.pos;

        if !check_tunnel(grid, pos, &[], end.walled) {
            continue;
        }
        if grid.get(pos).is_some_and(|cell| !cell.is_empty()) {
            removed += 1;
        }
        grid.update(pos, Cell::reset);

        let behind = pos.offset(end.recurse.0, end.recurse.1);
        if collapsible(grid, behind) {
            stack.push(CollapseFrame { pos: behind, next: 0 });
        }
    }
    removed
}

/// Drops doors whose wall cell is no longer open, mirrors each surviving door into the room on
/// its far side, and records one door group per room wall.
pub(super) fn fix_doors(ctx: &mut BuildContext<'_>) {
    let mut fixed = BTreeSet::new();
    let ids: Vec<u32> = ctx.rooms.keys().copied().collect();

    for room_id in ids {
        let Some(room) = ctx.rooms.get_mut(&room_id) else {
            continue;
        };
        let doors = mem::take(&mut room.doors);
        let mut mirrors: Vec<(u32, Direction, Door)> = Vec::new();

        for (dir, list) in doors {
            let mut kept = Vec::with_capacity(list.len());
            for door in list {
                if !ctx.grid.is_openspace(door.pos) {
                    ctx.grid.update(door.pos, |cell| {
                        cell.clear_espace();
                        cell.insert(CellFlags::PERIMETER);
                    });
                    continue;
                }
                if fixed.insert(door.pos)
                    && let Some(out_id) = door.out_id
                {
                    let mirror = Door { out_id: Some(room_id), ..door };
                    mirrors.push((out_id, dir.opposite(), mirror));
                }
                kept.push(door);
            }

            if kept.is_empty() {
                continue;
            }
            ctx.door_groups.push(DoorGroup { room_id, dir, doors: kept.clone() });
            if let Some(room) = ctx.rooms.get_mut(&room_id) {
                room.doors.insert(dir, kept);
            }
        }

        for (out_id, dir, mirror) in mirrors {
            if let Some(out_room) = ctx.rooms.get_mut(&out_id) {
                out_room.doors.entry(dir).or_default().push(mirror);
            }
        }
    }
}

/// Resets every cell still carrying the layout mask.
pub(super) fn empty_blocks(grid: &mut Grid) {
    for cell in grid.cells_mut() {
        if cell.has(CellFlags::BLOCKED) {
            cell.reset();
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::mapgen::model::{DoorKind, Room};
    use crate::options::Options;
    use crate::rng::DungeonRng;

    fn corridor(grid: &mut Grid, cells: &[(i32, i32)]) {
        for &(row, col) in cells {
            grid.update(Pos::new(row, col), |cell| cell.insert(CellFlags::CORRIDOR));
        }
    }

    #[test]
    fn dead_end_spur_collapses_back_to_the_junction() {
        let mut grid = Grid::new(10, 10);
        // Main corridor along row 1, spur down column 3 to row 5.
        corridor(
            &mut grid,
            &[(1, 1), (1, 2), (1, 3), (1, 4), (1, 5), (2, 3), (3, 3), (4, 3), (5, 3)],
        );

        let removed = collapse(&mut grid, Pos::new(5, 3));
        assert_eq!(removed, 4);
        for row in 2..=5 {
            assert!(grid.get(Pos::new(row, 3)).is_some_and(Cell::is_empty));
        }
        assert!(grid.has(Pos::new(1, 3), CellFlags::CORRIDOR));
    }

    #[test]
    fn isolated_corridor_run_disappears_entirely() {
        let mut grid = Grid::new(10, 10);
        corridor(&mut grid, &[(1, 1), (1, 2), (1, 3)]);
        assert_eq!(collapse(&mut grid, Pos::new(1, 1)), 3);
        assert!(grid.cells().iter().all(Cell::is_empty));
    }

    #[test]
    fn loops_never_collapse() {
        let mut grid = Grid::new(10, 10);
        corridor(&mut grid, &[(1, 1), (1, 2), (1, 3), (2, 1), (2, 3), (3, 1), (3, 2), (3, 3)]);
        let before = grid.clone();
        assert_eq!(collapse(&mut grid, Pos::new(1, 1)), 0);
        assert_eq!(grid, before);
    }

    #[test]
    fn rooms_and_stairs_stop_the_collapse() {
        let mut grid = Grid::new(10, 10);
        corridor(&mut grid, &[(1, 1), (1, 2), (1, 3)]);
        grid.update(Pos::new(1, 1), |cell| cell.insert(CellFlags::STAIR_DN));
        assert_eq!(collapse(&mut grid, Pos::new(1, 3)), 2);
        assert!(grid.has(Pos::new(1, 1), CellFlags::STAIR_DN));
        assert!(grid.get(Pos::new(1, 2)).is_some_and(Cell::is_empty));

        let mut grid = Grid::new(10, 10);
        grid.update(Pos::new(1, 1), |cell| cell.claim_for_room(1));
        assert_eq!(collapse(&mut grid, Pos::new(1, 1)), 0);
        assert_eq!(grid.get(Pos::new(1, 1)).and_then(Cell::room_id), Some(1));
    }

    #[test]
    fn zero_percent_skips_collapse_and_draws_nothing() {
        let options = Options { n_rows: 11, n_cols: 11, ..Options::default() };
        let mut rng = DungeonRng::from_seed(1);
        let mut ctx = BuildContext::new(&options, &mut rng);
        corridor(&mut ctx.grid, &[(1, 1), (1, 2), (1, 3)]);
        assert_eq!(collapse_tunnels(&mut ctx, 0), 0);
        assert!(ctx.grid.has(Pos::new(1, 1), CellFlags::CORRIDOR));

        let mut reference = DungeonRng::from_seed(1);
        assert_eq!(ctx.rng.below(1_000), reference.below(1_000));
    }

    fn two_rooms(ctx: &mut BuildContext<'_>) {
        // Rooms 1 (rows 1..=3, cols 1..=3) and 2 (rows 1..=3, cols 5..=7) share wall column 4.
        for (id, west) in [(1, 1), (2, 5)] {
            for row in 1..=3 {
                for col in west..=west + 2 {
                    ctx.grid.update(Pos::new(row, col), |cell| cell.claim_for_room(id));
                }
            }
            ctx.rooms.insert(id, Room::new(id, 1, west, 3, west + 2));
        }
        ctx.n_rooms = 2;
    }

    fn carve_door(ctx: &mut BuildContext<'_>, room_id: u32, dir: Direction, door: Door) {
        ctx.grid.update(door.pos, |cell| {
            cell.insert(door.kind.flag());
            cell.set_label(door.kind.glyph());
        });
        if let Some(room) = ctx.rooms.get_mut(&room_id) {
            room.doors.entry(dir).or_default().push(door);
        }
    }

    #[test]
    fn surviving_doors_are_mirrored_once() {
        let options = Options { n_rows: 11, n_cols: 11, ..Options::default() };
        let mut rng = DungeonRng::from_seed(2);
        let mut ctx = BuildContext::new(&options, &mut rng);
        two_rooms(&mut ctx);

        let door = Door { pos: Pos::new(1, 4), kind: DoorKind::Lock, out_id: Some(2) };
        carve_door(&mut ctx, 1, Direction::East, door);
        corridor(&mut ctx.grid, &[(1, 4)]);

        fix_doors(&mut ctx);
        assert_eq!(ctx.rooms[&1].doors_toward(Direction::East), &[door]);
        assert_eq!(
            ctx.rooms[&2].doors_toward(Direction::West),
            &[Door { out_id: Some(1), ..door }]
        );
        assert_eq!(ctx.door_groups.len(), 2);
        assert_eq!((ctx.door_groups[0].room_id, ctx.door_groups[0].dir), (1, Direction::East));
        assert_eq!((ctx.door_groups[1].room_id, ctx.door_groups[1].dir), (2, Direction::West));
    }

    #[test]
    fn doors_into_closed_cells_are_dropped_and_walled() {
        let options = Options { n_rows: 11, n_cols: 11, ..Options::default() };
        let mut rng = DungeonRng::from_seed(3);
        let mut ctx = BuildContext::new(&options, &mut rng);
        two_rooms(&mut ctx);

        let door = Door { pos: Pos::new(3, 4), kind: DoorKind::Arch, out_id: Some(2) };
        carve_door(&mut ctx, 1, Direction::East, door);

        fix_doors(&mut ctx);
        assert!(ctx.rooms[&1].doors.is_empty());
        assert!(ctx.rooms[&2].doors.is_empty());
        assert!(ctx.door_groups.is_empty());
        let cell = ctx.grid.get(door.pos).copied().unwrap_or_default();
        assert!(!cell.is_doorspace());
        assert_eq!(cell.label(), None);
        assert!(cell.has(CellFlags::PERIMETER));
    }

    #[test]
    fn corridor_doors_are_kept_without_mirrors() {
        let options = Options { n_rows: 11, n_cols: 11, ..Options::default() };
        let mut rng = DungeonRng::from_seed(4);
        let mut ctx = BuildContext::new(&options, &mut rng);
        two_rooms(&mut ctx);

        let door = Door { pos: Pos::new(4, 2), kind: DoorKind::Open, out_id: None };
        carve_door(&mut ctx, 1, Direction::South, door);
        corridor(&mut ctx.grid, &[(4, 2), (5, 1), (5, 2), (5, 3)]);

        fix_doors(&mut ctx);
        assert_eq!(ctx.rooms[&1].doors_toward(Direction::South), &[door]);
        assert_eq!(ctx.rooms[&2].door_count(), 0);
        assert_eq!(ctx.door_groups.len(), 1);
    }

    #[test]
    fn clearing_blocks_is_idempotent() {
        let mut grid = Grid::new(6, 6);
        grid.update(Pos::new(2, 2), Cell::block);
        grid.update(Pos::new(3, 3), |cell| cell.insert(CellFlags::CORRIDOR));

        empty_blocks(&mut grid);
        let once = grid.clone();
        empty_blocks(&mut grid);
        assert_eq!(grid, once);
        assert!(grid.cells().iter().all(|cell| !cell.has(CellFlags::BLOCKED)));
        assert!(grid.has(Pos::new(3, 3), CellFlags::CORRIDOR));
    }
}
