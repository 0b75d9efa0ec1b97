//! Door carving: collects wall openings ("sills") around each room, opens a random subset and
//! records one door per opening.

use std::collections::BTreeSet;

use tracing::debug;

use crate::rng::DungeonRng;
use crate::types::{Direction, Pos};

use super::cell::CellFlags;
use super::generator::BuildContext;
use super::grid::Grid;
use super::model::{Door, DoorKind, Room};

/// A candidate opening: `sill` is the room's edge cell, `door` the wall cell beyond it.
#[derive(Clone, Copy, Debug, PartialEq, Eq)]
pub(super) struct Sill {
    pub(super) sill: Pos,
    pub(super) dir: Direction,
    pub(super) door: Pos,
    pub(super) out_id: Option<u32>,
}

/// Unordered room pairs already joined by a door.
type Connections = BTreeSet<(u32, u32)>;

pub(super) fn open_rooms(ctx: &mut BuildContext<'_>) {
    let mut connected = Connections::new();
    let ids: Vec<u32> = ctx.rooms.keys().copied().collect();
    for id in ids {
        open_room(ctx, id, &mut connected);
    }
    debug!(connections = connected.len(), "room doors carved");
}

fn open_room(ctx: &mut BuildContext<'_>, room_id: u32, connected: &mut Connections) {
    let Some(room) = ctx.rooms.get(&room_id) else {
        return;
    };
    let mut sills = door_sills(&ctx.grid, room);
    if sills.is_empty() {
        return;
    }
    let mut n_opens = alloc_opens(ctx.rng, room);

    let mut attempt = 0;
    while attempt < n_opens && !sills.is_empty() {
        attempt += 1;
        let sill = sills.remove(ctx.rng.index(sills.len()));

        if ctx.grid.get(sill.door).is_some_and(|cell| cell.is_doorspace()) {
            n_opens -= 1;
            continue;
        }
        if let Some(out_id) = sill.out_id {
            let pair = (room_id.min(out_id), room_id.max(out_id));
            if !connected.insert(pair) {
                n_opens -= 1;
                continue;
            }
        }

        for depth in 0..3 {
            ctx.grid.update(sill.sill.step(sill.dir, depth), |cell| {
                cell.remove(CellFlags::PERIMETER);
                cell.insert(CellFlags::ENTRANCE);
            });
        }

        let kind = DoorKind::from_roll(ctx.rng.below(DoorKind::ROLL_RANGE));
        ctx.grid.update(sill.door, |cell| {
            cell.insert(kind.flag());
            cell.set_label(kind.glyph());
        });

        let door = Door { pos: sill.door, kind, out_id: sill.out_id };
        if let Some(room) = ctx.rooms.get_mut(&room_id) {
            room.doors.entry(sill.dir).or_default().push(door);
        }
    }
}

/// Opening budget: `floor(sqrt(w*h))` plus a random extra of up to the same amount, with `w`
/// and `h` in half-grid units.
fn alloc_opens(rng: &mut DungeonRng, room: &Room) -> i32 {
    let room_h = (room.south - room.north) / 2 + 1;
    let room_w = (room.east - room.west) / 2 + 1;
    let flumph = f64::from(room_h * room_w).sqrt() as i32;
    flumph + rng.below(flumph)
}

pub(super) fn door_sills(grid: &Grid, room: &Room) -> Vec<Sill> {
    let mut sills = Vec::new();
    let mut collect = |sill: Pos, dir: Direction| {
        if let Some(found) = check_sill(grid, sill, dir) {
            sills.push(found);
        }
    };

    if room.north >= 3 {
        for col in (room.west..=room.east).step_by(2) {
            collect(Pos { row: room.north, col }, Direction::North);
        }
    }
    if room.south <= grid.n_rows() - 3 {
        for col in (room.west..=room.east).step_by(2) {
            collect(Pos { row: room.south, col }, Direction::South);
        }
    }
    if room.west >= 3 {
        for row in (room.north..=room.south).step_by(2) {
            collect(Pos { row, col: room.west }, Direction::West);
        }
    }
    if room.east <= grid.n_cols() - 3 {
        for row in (room.north..=room.south).step_by(2) {
            collect(Pos { row, col: room.east }, Direction::East);
        }
    }
    sills
}

fn check_sill(grid: &Grid, sill: Pos, dir: Direction) -> Option<Sill> {
    let door = sill.step(dir, 1);
    let door_cell = grid.get(door)?;
    if !door_cell.has(CellFlags::PERIMETER) || door_cell.is_blocked_door() {
        return None;
    }

    let out_cell = grid.get(door.step(dir, 1))?;
    if out_cell.has(CellFlags::BLOCKED) {
        return None;
    }
    Some(Sill { sill, dir, door, out_id: out_cell.room_id() })
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::mapgen::cell::Cell;
    use crate::mapgen::rooms::{Placement, RoomRequest, emplace_room};
    use crate::options::Options;

    fn place(ctx: &mut BuildContext<'_>, i: i32, j: i32, height: i32, width: i32) -> u32 {
        let request =
            RoomRequest { i: Some(i), j: Some(j), height: Some(height), width: Some(width) };
        match emplace_room(ctx, request) {
            Placement::Placed(id) => id,
            Placement::Rejected(reason) => panic!("room should fit: {reason:?}"),
        }
    }

    #[test]
    fn sills_ring_an_interior_room() {
        let options = Options { n_rows: 21, n_cols: 21, ..Options::default() };
        let mut rng = DungeonRng::from_seed(1);
        let mut ctx = BuildContext::new(&options, &mut rng);
        let id = place(&mut ctx, 3, 3, 2, 3);

        let sills = door_sills(&ctx.grid, &ctx.rooms[&id]);
        let count = |dir| sills.iter().filter(|sill| sill.dir == dir).count();
        assert_eq!(count(Direction::North), 3);
        assert_eq!(count(Direction::South), 3);
        assert_eq!(count(Direction::West), 2);
        assert_eq!(count(Direction::East), 2);
        assert!(sills.iter().all(|sill| sill.out_id.is_none()));
        assert!(sills.iter().all(|sill| ctx.grid.has(sill.door, CellFlags::PERIMETER)));
    }

    #[test]
    fn rooms_on_the_border_get_no_outward_sills() {
        let options = Options { n_rows: 21, n_cols: 21, ..Options::default() };
        let mut rng = DungeonRng::from_seed(2);
        let mut ctx = BuildContext::new(&options, &mut rng);
        let id = place(&mut ctx, 0, 0, 2, 2);

        let sills = door_sills(&ctx.grid, &ctx.rooms[&id]);
        assert!(sills.iter().all(|sill| matches!(sill.dir, Direction::South | Direction::East)));
    }

    #[test]
    fn sills_name_the_neighbouring_room() {
        let options = Options { n_rows: 21, n_cols: 21, ..Options::default() };
        let mut rng = DungeonRng::from_seed(3);
        let mut ctx = BuildContext::new(&options, &mut rng);
        let west = place(&mut ctx, 2, 1, 2, 2);
        let east = place(&mut ctx, 2, 3, 2, 2);

        let sills = door_sills(&ctx.grid, &ctx.rooms[&west]);
        let toward_east: Vec<&Sill> =
            sills.iter().filter(|sill| sill.dir == Direction::East).collect();
        assert_eq!(toward_east.len(), 2);
        assert!(toward_east.iter().all(|sill| sill.out_id == Some(east)));
    }

    #[test]
    fn blocked_far_side_is_not_a_sill() {
        let options = Options { n_rows: 21, n_cols: 21, ..Options::default() };
        let mut rng = DungeonRng::from_seed(4);
        let mut ctx = BuildContext::new(&options, &mut rng);
        let id = place(&mut ctx, 3, 3, 1, 1);
        ctx.grid.update(Pos { row: 7, col: 5 }, Cell::block);
        ctx.grid.update(Pos { row: 7, col: 9 }, Cell::block);

        let sills = door_sills(&ctx.grid, &ctx.rooms[&id]);
        assert_eq!(sills.len(), 2);
        assert!(sills.iter().all(|sill| matches!(sill.dir, Direction::North | Direction::South)));
    }

    #[test]
    fn carved_doors_are_flagged_labelled_and_recorded() {
        let options = Options { n_rows: 21, n_cols: 21, ..Options::default() };
        for seed in 0..20 {
            let mut rng = DungeonRng::from_seed(seed);
            let mut ctx = BuildContext::new(&options, &mut rng);
            place(&mut ctx, 3, 3, 3, 3);
            open_rooms(&mut ctx);

            let room = &ctx.rooms[&1];
            assert!(room.door_count() >= 1, "seed={seed}");
            for (&dir, doors) in &room.doors {
                for door in doors {
                    let cell = ctx.grid.get(door.pos).copied().unwrap_or_default();
                    assert!(cell.has(door.kind.flag()));
                    assert_eq!(cell.label(), Some(door.kind.glyph()));
                    assert!(!cell.has(CellFlags::PERIMETER));
                    assert!(ctx.grid.has(door.pos.step(dir, 1), CellFlags::ENTRANCE));
                    assert!(ctx.grid.has(door.pos.step(dir, -1), CellFlags::ENTRANCE));
                }
            }
        }
    }

    #[test]
    fn each_room_pair_is_joined_once() {
        let options = Options { n_rows: 21, n_cols: 21, ..Options::default() };
        for seed in 0..30 {
            let mut rng = DungeonRng::from_seed(seed);
            let mut ctx = BuildContext::new(&options, &mut rng);
            let west = place(&mut ctx, 2, 1, 4, 2);
            let east = place(&mut ctx, 2, 3, 4, 2);
            open_rooms(&mut ctx);

            let links = ctx.rooms[&west]
                .doors_toward(Direction::East)
                .iter()
                .chain(ctx.rooms[&east].doors_toward(Direction::West))
                .filter(|door| door.out_id.is_some())
                .count();
            assert!(links <= 1, "seed={seed} produced {links} direct links");
        }
    }

    #[test]
    fn skipped_sills_still_spend_the_opening_budget() {
        let options = Options { n_rows: 21, n_cols: 21, ..Options::default() };
        let mut rng = DungeonRng::from_seed(5);
        let mut ctx = BuildContext::new(&options, &mut rng);
        let centre = place(&mut ctx, 2, 2, 3, 3);
        let neighbours = [
            place(&mut ctx, 0, 2, 2, 3),
            place(&mut ctx, 5, 2, 2, 3),
            place(&mut ctx, 2, 0, 3, 2),
            place(&mut ctx, 2, 5, 3, 2),
        ];
        let sills = door_sills(&ctx.grid, &ctx.rooms[&centre]);
        assert_eq!(sills.len(), 12);
        assert!(sills.iter().all(|sill| sill.out_id.is_some_and(|id| neighbours.contains(&id))));

        // Every neighbour is already joined, so each draw is a skip.
        let mut connected: Connections =
            neighbours.iter().map(|&id| (centre.min(id), centre.max(id))).collect();

        // A 3x3 room budgets 3 + below(3) openings; a skip uses its attempt and one opening.
        let mut reference = ctx.rng.clone();
        let budget = 3 + reference.below(3);
        let attempts = (budget + 1) / 2;
        for taken in 0..attempts {
            reference.index(sills.len() - taken as usize);
        }

        open_room(&mut ctx, centre, &mut connected);
        assert_eq!(ctx.rooms[&centre].door_count(), 0);
        assert_eq!(connected.len(), 4);
        assert!((attempts as usize) < sills.len(), "skips must not retry every sill");
        assert_eq!(ctx.rng.below(1_000_000), reference.below(1_000_000));
    }
}
