//! Room emplacement: packed or scattered placement, collision sounding, perimeter marking and
//! room-number labels.

use std::collections::BTreeMap;

use tracing::trace;

use crate::options::{MAX_ROOMS, RoomLayout};
use crate::types::Pos;

use super::cell::{Cell, CellFlags};
use super::generator::BuildContext;
use super::grid::Grid;
use super::model::Room;

/// Why an emplacement attempt left the grid untouched.
#[derive(Clone, Copy, Debug, PartialEq, Eq)]
pub enum Rejection {
    RoomCap,
    OutOfBounds,
    Blocked,
    Overlap { rooms: usize },
}

#[derive(Clone, Copy, Debug, PartialEq, Eq)]
pub enum Placement {
    Placed(u32),
    Rejected(Rejection),
}

/// Half-grid room request; unset fields are drawn at random.
#[derive(Clone, Copy, Debug, Default, PartialEq, Eq)]
pub(super) struct RoomRequest {
    pub(super) i: Option<i32>,
    pub(super) j: Option<i32>,
    pub(super) height: Option<i32>,
    pub(super) width: Option<i32>,
}

impl RoomRequest {
    pub(super) fn anchored(i: i32, j: i32) -> Self {
        Self { i: Some(i), j: Some(j), ..Self::default() }
    }
}

#[derive(Debug, PartialEq, Eq)]
enum Sounding {
    Clear,
    Blocked,
    /// Cell counts per overlapped room id.
    Hit(BTreeMap<u32, u32>),
}

pub(super) fn emplace_rooms(ctx: &mut BuildContext<'_>) {
    match ctx.options.room_layout {
        RoomLayout::Packed => pack_rooms(ctx),
        RoomLayout::Scattered => scatter_rooms(ctx),
    }
}

fn pack_rooms(ctx: &mut BuildContext<'_>) {
    for i in 0..ctx.n_i {
        for j in 0..ctx.n_j {
            if ctx.grid.has(Pos::intersection(i, j), CellFlags::ROOM) {
                continue;
            }
            if (i == 0 || j == 0) && ctx.rng.coin() {
                continue;
            }
            emplace_room(ctx, RoomRequest::anchored(i, j));
        }
    }
}

fn scatter_rooms(ctx: &mut BuildContext<'_>) {
    for _ in 0..alloc_rooms(ctx) {
        emplace_room(ctx, RoomRequest::default());
    }
}

/// Number of scattered placement attempts for the grid's area.
pub(super) fn alloc_rooms(ctx: &BuildContext<'_>) -> i32 {
    let dungeon_area = ctx.grid.n_rows() * ctx.grid.n_cols();
    let room_area = ctx.options.room_max.saturating_mul(ctx.options.room_max).max(1);
    dungeon_area / room_area
}

pub(super) fn emplace_room(ctx: &mut BuildContext<'_>, request: RoomRequest) -> Placement {
    if ctx.n_rooms >= MAX_ROOMS {
        return Placement::Rejected(Rejection::RoomCap);
    }

    let (i, j, height, width) = resolve_room(ctx, request);
    let (r1, r2) = cell_span(i, height);
    let (c1, c2) = cell_span(j, width);

    let max_row = i64::from(ctx.grid.n_rows() - 1);
    let max_col = i64::from(ctx.grid.n_cols() - 1);
    if r1 < 1 || r2 > max_row || c1 < 1 || c2 > max_col || r2 < r1 || c2 < c1 {
        trace!(r1, c1, r2, c2, "room out of bounds");
        return Placement::Rejected(Rejection::OutOfBounds);
    }
    // In bounds, so every coordinate fits the grid's i32 range.
    let (r1, c1, r2, c2) = (r1 as i32, c1 as i32, r2 as i32, c2 as i32);

    match sound_room(&ctx.grid, r1, c1, r2, c2) {
        Sounding::Clear => {}
        Sounding::Blocked => {
            trace!(r1, c1, r2, c2, "room overlaps blocked cells");
            return Placement::Rejected(Rejection::Blocked);
        }
        Sounding::Hit(hit) => {
            trace!(r1, c1, r2, c2, rooms = hit.len(), "room overlaps existing rooms");
            return Placement::Rejected(Rejection::Overlap { rooms: hit.len() });
        }
    }

    ctx.n_rooms += 1;
    let room_id = ctx.n_rooms;

    for row in r1..=r2 {
        for col in c1..=c2 {
            ctx.grid.update(Pos { row, col }, |cell| cell.claim_for_room(room_id));
        }
    }
    ctx.rooms.insert(room_id, Room::new(room_id, r1, c1, r2, c2));
    mark_perimeter(&mut ctx.grid, r1, c1, r2, c2);

    Placement::Placed(room_id)
}

/// First and last cell of a half-grid span, widened so huge sizes cannot overflow.
fn cell_span(start: i32, len: i32) -> (i64, i64) {
    let start = i64::from(start);
    (start * 2 + 1, (start + i64::from(len)) * 2 - 1)
}

/// Resolves unset size and anchor fields. Sizes are drawn before anchors so the anchor range
/// can keep the room inside the grid.
fn resolve_room(ctx: &mut BuildContext<'_>, request: RoomRequest) -> (i32, i32, i32, i32) {
    let base = ctx.options.room_base();
    let radix = ctx.options.room_radix();

    let height = request.height.unwrap_or_else(|| {
        let range = match request.i {
            None => radix,
            Some(i) => ctx.n_i.saturating_sub(base).saturating_sub(i).clamp(0, radix),
        };
        ctx.rng.below(range).saturating_add(base)
    });
    let width = request.width.unwrap_or_else(|| {
        let range = match request.j {
            None => radix,
            Some(j) => ctx.n_j.saturating_sub(base).saturating_sub(j).clamp(0, radix),
        };
        ctx.rng.below(range).saturating_add(base)
    });

    let i = request.i.unwrap_or_else(|| ctx.rng.below(ctx.n_i.saturating_sub(height)));
    let j = request.j.unwrap_or_else(|| ctx.rng.below(ctx.n_j.saturating_sub(width)));
    (i, j, height, width)
}

fn sound_room(grid: &Grid, r1: i32, c1: i32, r2: i32, c2: i32) -> Sounding {
    let mut hit = BTreeMap::new();
    for row in r1..=r2 {
        for col in c1..=c2 {
            let Some(cell) = grid.get(Pos { row, col }) else {
                return Sounding::Blocked;
            };
            if cell.has(CellFlags::BLOCKED) {
                return Sounding::Blocked;
            }
            if let Some(id) = cell.room_id() {
                *hit.entry(id).or_insert(0) += 1;
            }
        }
    }
    if hit.is_empty() { Sounding::Clear } else { Sounding::Hit(hit) }
}

fn mark_perimeter(grid: &mut Grid, r1: i32, c1: i32, r2: i32, c2: i32) {
    let mut mark = |pos: Pos| {
        grid.update(pos, |cell| {
            if !cell.flags().intersects(CellFlags::ROOM | CellFlags::ENTRANCE) {
                cell.insert(CellFlags::PERIMETER);
            }
        });
    };
    for row in (r1 - 1)..=(r2 + 1) {
        mark(Pos { row, col: c1 - 1 });
        mark(Pos { row, col: c2 + 1 });
    }
    for col in (c1 - 1)..=(c2 + 1) {
        mark(Pos { row: r1 - 1, col });
        mark(Pos { row: r2 + 1, col });
    }
}

/// Writes each room's id, one digit per cell, centred on its middle row.
pub(super) fn label_rooms(ctx: &mut BuildContext<'_>) {
    for room in ctx.rooms.values() {
        let label = room.id.to_string();
        let len = label.len() as i32;
        let row = (room.north + room.south) / 2;
        let first_col = (room.west + room.east - len) / 2 + 1;

        for (offset, digit) in label.chars().enumerate() {
            let pos = Pos { row, col: first_col + offset as i32 };
            if room.contains(pos) {
                ctx.grid.update(pos, |cell: &mut Cell| cell.set_label(digit));
            }
        }
    }
}
