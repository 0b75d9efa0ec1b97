//! Structural checks every finished dungeon must pass. Used by the fuzz harness and tests.

use std::collections::{BTreeMap, BTreeSet, VecDeque};

use thiserror::Error;

use crate::mapgen::{CellFlags, Dungeon, Grid};
use crate::options::DungeonLayout;
use crate::types::{Direction, Pos};

#[derive(Clone, Debug, PartialEq, Eq, Error)]
pub enum Violation {
    #[error("rooms {first} and {second} overlap")]
    RoomOverlap { first: u32, second: u32 },
    #[error("cell {pos:?} inside room {room_id} is not stamped with it")]
    UnstampedRoomCell { room_id: u32, pos: Pos },
    #[error("cell {pos:?} carries room id {room_id} outside that room")]
    StrayRoomId { room_id: u32, pos: Pos },
    #[error("door at {pos:?} carries {flags} door flags instead of one")]
    DoorFlags { pos: Pos, flags: u32 },
    #[error("door at {pos:?} in room {room_id} is missing its mirror in room {out_id}")]
    MissingMirror { room_id: u32, out_id: u32, pos: Pos },
    #[error("door cell {pos:?} is not recorded by any room")]
    UnrecordedDoor { pos: Pos },
    #[error("cell {pos:?} is still blocked")]
    ResidualBlock { pos: Pos },
    #[error("stair at {pos:?} lost its flag")]
    UnflaggedStair { pos: Pos },
    #[error("{placed} stairs placed but only {requested} requested")]
    TooManyStairs { placed: usize, requested: u32 },
    #[error("corridors at {first:?} and {second:?} are split without a wall between them")]
    SplitCorridor { first: Pos, second: Pos },
}

pub fn check_dungeon(dungeon: &Dungeon) -> Result<(), Violation> {
    check_rooms(dungeon)?;
    check_doors(dungeon)?;
    check_cells(dungeon)?;
    check_stairs(dungeon)?;
    check_corridors(dungeon)
}

/// Labels every corridor cell with the index of its orthogonally connected component.
pub fn corridor_components(grid: &Grid) -> BTreeMap<Pos, usize> {
    let mut labels = BTreeMap::new();
    let mut next_label = 0;
    for start in grid.positions() {
        if !grid.has(start, CellFlags::CORRIDOR) || labels.contains_key(&start) {
            continue;
        }
        labels.insert(start, next_label);
        let mut open = VecDeque::from([start]);
        while let Some(pos) = open.pop_front() {
            for dir in Direction::ALL {
                let next = pos.step(dir, 1);
                if grid.has(next, CellFlags::CORRIDOR) && !labels.contains_key(&next) {
                    labels.insert(next, next_label);
                    open.push_back(next);
                }
            }
        }
        next_label += 1;
    }
    labels
}

fn check_rooms(dungeon: &Dungeon) -> Result<(), Violation> {
    let rooms: Vec<_> = dungeon.rooms.values().collect();
    for (index, first) in rooms.iter().enumerate() {
        for second in &rooms[index + 1..] {
            let rows_meet = first.north <= second.south && second.north <= first.south;
            let cols_meet = first.west <= second.east && second.west <= first.east;
            if rows_meet && cols_meet {
                return Err(Violation::RoomOverlap { first: first.id, second: second.id });
            }
        }

        for row in first.north..=first.south {
            for col in first.west..=first.east {
                let pos = Pos { row, col };
                let stamped = dungeon.cell(pos).is_some_and(|cell| {
                    cell.has(CellFlags::ROOM) && cell.room_id() == Some(first.id)
                });
                if !stamped {
                    return Err(Violation::UnstampedRoomCell { room_id: first.id, pos });
                }
            }
        }
    }
    Ok(())
}

fn check_doors(dungeon: &Dungeon) -> Result<(), Violation> {
    for (room, dir, door) in dungeon.doors() {
        let flags = dungeon
            .cell(door.pos)
            .map_or(0, |cell| (cell.flags() & CellFlags::DOORSPACE).bits().count_ones());
        if flags != 1 {
            return Err(Violation::DoorFlags { pos: door.pos, flags });
        }

        if let Some(out_id) = door.out_id {
            let mirrored = dungeon.room(out_id).is_some_and(|out_room| {
                out_room.doors_toward(dir.opposite()).iter().any(|other| other.pos == door.pos)
            });
            if !mirrored {
                return Err(Violation::MissingMirror { room_id: room.id, out_id, pos: door.pos });
            }
        }
    }
    Ok(())
}

fn check_cells(dungeon: &Dungeon) -> Result<(), Violation> {
    let recorded: BTreeSet<Pos> = dungeon.doors().map(|(_, _, door)| door.pos).collect();

    for pos in dungeon.grid.positions() {
        let Some(cell) = dungeon.cell(pos) else {
            continue;
        };
        if cell.has(CellFlags::BLOCKED) {
            return Err(Violation::ResidualBlock { pos });
        }
        if let Some(room_id) = cell.room_id()
            && !dungeon.room(room_id).is_some_and(|room| room.contains(pos))
        {
            return Err(Violation::StrayRoomId { room_id, pos });
        }
        if cell.is_doorspace() && !recorded.contains(&pos) {
            return Err(Violation::UnrecordedDoor { pos });
        }
    }
    Ok(())
}

fn check_stairs(dungeon: &Dungeon) -> Result<(), Violation> {
    let requested = dungeon.options.add_stairs;
    if dungeon.stairs.len() > requested as usize {
        return Err(Violation::TooManyStairs { placed: dungeon.stairs.len(), requested });
    }
    for stair in &dungeon.stairs {
        if !dungeon.cell(stair.pos).is_some_and(|cell| cell.has(stair.key.flag())) {
            return Err(Violation::UnflaggedStair { pos: stair.pos });
        }
    }
    Ok(())
}

/// Separate corridor networks are allowed only where a wall keeps them apart: two corridor
/// intersections one step apart with no perimeter or block between them share a network.
/// Masked layouts are skipped because cleanup erases their blocked cells.
fn check_corridors(dungeon: &Dungeon) -> Result<(), Violation> {
    if dungeon.options.dungeon_layout != DungeonLayout::Full {
        return Ok(());
    }
    let labels = corridor_components(&dungeon.grid);
    for (&pos, &label) in &labels {
        if pos.row % 2 == 0 || pos.col % 2 == 0 {
            continue;
        }
        for dir in [Direction::South, Direction::East] {
            let next = pos.step(dir, 2);
            let Some(&other) = labels.get(&next) else {
                continue;
            };
            let between = pos.step(dir, 1);
            let walled = dungeon.grid.has(between, CellFlags::PERIMETER)
                || dungeon.grid.has(between, CellFlags::BLOCKED);
            if !walled && other != label {
                return Err(Violation::SplitCorridor { first: pos, second: next });
            }
        }
    }
    Ok(())
}
