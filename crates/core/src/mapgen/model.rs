//! Public data models for a finished dungeon: rooms, doors, stairs, and the grid that holds them.

use std::collections::BTreeMap;

use serde::{Deserialize, Serialize};
use xxhash_rust::xxh3::xxh3_64;

use crate::options::Options;
use crate::types::{Direction, Pos};

use super::cell::{Cell, CellFlags};
use super::grid::Grid;

#[derive(Clone, Copy, Debug, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum DoorKind {
    Arch,
    Open,
    Lock,
    Trap,
    Secret,
    Portc,
}

impl DoorKind {
    /// Draw range out of 110; each kind owns a contiguous slice.
    pub(crate) const ROLL_RANGE: i32 = 110;

    pub(crate) fn from_roll(roll: i32) -> Self {
        match roll {
            ..15 => Self::Arch,
            15..60 => Self::Open,
            60..75 => Self::Lock,
            75..90 => Self::Trap,
            90..100 => Self::Secret,
            _ => Self::Portc,
        }
    }

    pub const fn flag(self) -> CellFlags {
        match self {
            Self::Arch => CellFlags::ARCH,
            Self::Open => CellFlags::DOOR,
            Self::Lock => CellFlags::LOCKED,
            Self::Trap => CellFlags::TRAPPED,
            Self::Secret => CellFlags::SECRET,
            Self::Portc => CellFlags::PORTC,
        }
    }

    pub const fn glyph(self) -> char {
        match self {
            Self::Arch => 'a',
            Self::Open => 'o',
            Self::Lock => 'x',
            Self::Trap => 't',
            Self::Secret => 's',
            Self::Portc => 'p',
        }
    }

    pub const fn key(self) -> &'static str {
        match self {
            Self::Arch => "arch",
            Self::Open => "open",
            Self::Lock => "lock",
            Self::Trap => "trap",
            Self::Secret => "secret",
            Self::Portc => "portc",
        }
    }

    pub const fn description(self) -> &'static str {
        match self {
            Self::Arch => "Archway",
            Self::Open => "Unlocked Door",
            Self::Lock => "Locked Door",
            Self::Trap => "Trapped Door",
            Self::Secret => "Secret Door",
            Self::Portc => "Portcullis",
        }
    }
}

#[derive(Clone, Copy, Debug, PartialEq, Eq, Hash, Serialize, Deserialize)]
pub struct Door {
    pub pos: Pos,
    pub kind: DoorKind,
    /// Room on the far side when the door was carved straight into a sibling room.
    pub out_id: Option<u32>,
}

#[derive(Clone, Debug, PartialEq, Eq, Serialize, Deserialize)]
pub struct Room {
    pub id: u32,
    pub row: i32,
    pub col: i32,
    pub north: i32,
    pub south: i32,
    pub west: i32,
    pub east: i32,
    pub height: i32,
    pub width: i32,
    pub area: i32,
    pub doors: BTreeMap<Direction, Vec<Door>>,
}

impl Room {
    pub(crate) fn new(id: u32, north: i32, west: i32, south: i32, east: i32) -> Self {
        let height = south - north + 1;
        let width = east - west + 1;
        Self {
            id,
            row: north,
            col: west,
            north,
            south,
            west,
            east,
            height,
            width,
            area: height * width,
            doors: BTreeMap::new(),
        }
    }

    pub fn contains(&self, pos: Pos) -> bool {
        (self.north..=self.south).contains(&pos.row) && (self.west..=self.east).contains(&pos.col)
    }

    pub fn door_count(&self) -> usize {
        self.doors.values().map(Vec::len).sum()
    }

    pub fn doors_toward(&self, dir: Direction) -> &[Door] {
        self.doors.get(&dir).map_or(&[], Vec::as_slice)
    }
}

#[derive(Clone, Copy, Debug, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum StairKey {
    Up,
    Down,
}

impl StairKey {
    pub const fn flag(self) -> CellFlags {
        match self {
            Self::Up => CellFlags::STAIR_UP,
            Self::Down => CellFlags::STAIR_DN,
        }
    }

    pub const fn glyph(self) -> char {
        match self {
            Self::Up => 'u',
            Self::Down => 'd',
        }
    }
}

#[derive(Clone, Copy, Debug, PartialEq, Eq, Hash, Serialize, Deserialize)]
pub struct Stairs {
    pub pos: Pos,
    /// The corridor cell the stair opens onto.
    pub next: Pos,
    pub key: StairKey,
}

/// Surviving doors of one room wall after reconciliation.
#[derive(Clone, Debug, PartialEq, Eq, Serialize, Deserialize)]
pub struct DoorGroup {
    pub room_id: u32,
    pub dir: Direction,
    pub doors: Vec<Door>,
}

#[derive(Clone, Debug, PartialEq, Eq)]
pub struct Dungeon {
    pub options: Options,
    pub grid: Grid,
    pub rooms: BTreeMap<u32, Room>,
    pub stairs: Vec<Stairs>,
    pub door_groups: Vec<DoorGroup>,
}

impl Dungeon {
    pub fn cell(&self, pos: Pos) -> Option<&Cell> {
        self.grid.get(pos)
    }

    pub fn rows(&self) -> usize {
        self.grid.height()
    }

    pub fn cols(&self) -> usize {
        self.grid.width()
    }

    pub fn room(&self, id: u32) -> Option<&Room> {
        self.rooms.get(&id)
    }

    pub fn doors(&self) -> impl Iterator<Item = (&Room, Direction, &Door)> {
        self.rooms.values().flat_map(|room| {
            room.doors
                .iter()
                .flat_map(move |(&dir, doors)| doors.iter().map(move |door| (room, dir, door)))
        })
    }

    pub fn canonical_bytes(&self) -> Vec<u8> {
        let mut bytes = Vec::new();
        bytes.extend((self.grid.height() as u32).to_le_bytes());
        bytes.extend((self.grid.width() as u32).to_le_bytes());
        for cell in self.grid.cells() {
            bytes.extend(cell.flags().bits().to_le_bytes());
            bytes.extend(cell.room_id().unwrap_or(0).to_le_bytes());
            bytes.extend(u32::from(cell.label().unwrap_or('\0')).to_le_bytes());
        }

        bytes.extend((self.rooms.len() as u32).to_le_bytes());
        for room in self.rooms.values() {
            bytes.extend(room.id.to_le_bytes());
            for edge in [room.north, room.south, room.west, room.east] {
                bytes.extend(edge.to_le_bytes());
            }
            for (dir, doors) in &room.doors {
                bytes.push(*dir as u8);
                bytes.extend((doors.len() as u32).to_le_bytes());
                for door in doors {
                    bytes.extend(door.pos.row.to_le_bytes());
                    bytes.extend(door.pos.col.to_le_bytes());
                    bytes.push(door.kind as u8);
                    bytes.extend(door.out_id.unwrap_or(0).to_le_bytes());
                }
            }
        }

        bytes.extend((self.stairs.len() as u32).to_le_bytes());
        for stair in &self.stairs {
            bytes.extend(stair.pos.row.to_le_bytes());
            bytes.extend(stair.pos.col.to_le_bytes());
            bytes.push(stair.key as u8);
        }

        bytes
    }

    pub fn fingerprint(&self) -> u64 {
        xxh3_64(&self.canonical_bytes())
    }
}
