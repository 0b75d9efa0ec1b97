//! Per-cell flag set and the named predicates every stage queries.

use bitflags::bitflags;
use serde::{Deserialize, Serialize};

bitflags! {
    /// Cell classification flags. Several may be set at once (a door cell that a corridor ran
    /// through is `PERIMETER`-free, `CORRIDOR` and e.g. `LOCKED`).
    #[derive(Debug, Clone, Copy, Default, PartialEq, Eq, Hash, Serialize, Deserialize)]
    pub struct CellFlags: u16 {
        const BLOCKED = 1 << 0;
        const ROOM = 1 << 1;
        const CORRIDOR = 1 << 2;
        const PERIMETER = 1 << 3;
        const ENTRANCE = 1 << 4;
        const ARCH = 1 << 5;
        const DOOR = 1 << 6;
        const LOCKED = 1 << 7;
        const TRAPPED = 1 << 8;
        const SECRET = 1 << 9;
        const PORTC = 1 << 10;
        const STAIR_DN = 1 << 11;
        const STAIR_UP = 1 << 12;

        const OPENSPACE = Self::ROOM.bits() | Self::CORRIDOR.bits();
        const DOORSPACE = Self::ARCH.bits()
            | Self::DOOR.bits()
            | Self::LOCKED.bits()
            | Self::TRAPPED.bits()
            | Self::SECRET.bits()
            | Self::PORTC.bits();
        const STAIRS = Self::STAIR_DN.bits() | Self::STAIR_UP.bits();
        const BLOCK_ROOM = Self::BLOCKED.bits() | Self::ROOM.bits();
        const BLOCK_CORR = Self::BLOCKED.bits() | Self::PERIMETER.bits() | Self::CORRIDOR.bits();
        const BLOCK_DOOR = Self::BLOCKED.bits() | Self::DOORSPACE.bits();
        const ESPACE = Self::ENTRANCE.bits() | Self::DOORSPACE.bits();
    }
}

#[derive(Clone, Copy, Debug, Default, PartialEq, Eq, Hash, Serialize, Deserialize)]
pub struct Cell {
    flags: CellFlags,
    room_id: Option<u32>,
    label: Option<char>,
}

impl Cell {
    pub fn flags(&self) -> CellFlags {
        self.flags
    }

    pub fn has(&self, flag: CellFlags) -> bool {
        self.flags.contains(flag)
    }

    /// Owning room, only meaningful while `ROOM` is set.
    pub fn room_id(&self) -> Option<u32> {
        if self.has(CellFlags::ROOM) { self.room_id } else { None }
    }

    pub fn label(&self) -> Option<char> {
        self.label
    }

    pub fn is_openspace(&self) -> bool {
        self.flags.intersects(CellFlags::OPENSPACE)
    }

    pub fn is_doorspace(&self) -> bool {
        self.flags.intersects(CellFlags::DOORSPACE)
    }

    pub fn is_stairs(&self) -> bool {
        self.flags.intersects(CellFlags::STAIRS)
    }

    pub fn is_blocked_room(&self) -> bool {
        self.flags.intersects(CellFlags::BLOCK_ROOM)
    }

    pub fn is_blocked_corridor(&self) -> bool {
        self.flags.intersects(CellFlags::BLOCK_CORR)
    }

    pub fn is_blocked_door(&self) -> bool {
        self.flags.intersects(CellFlags::BLOCK_DOOR)
    }

    pub fn is_espace(&self) -> bool {
        self.flags.intersects(CellFlags::ESPACE) || self.label.is_some()
    }

    pub fn is_empty(&self) -> bool {
        self.flags.is_empty() && self.label.is_none()
    }

    pub(crate) fn insert(&mut self, flag: CellFlags) {
        debug_assert!(
            !(flag.intersects(CellFlags::OPENSPACE) && self.has(CellFlags::BLOCKED)),
            "blocked cells cannot become open space"
        );
        self.flags.insert(flag);
    }

    pub(crate) fn remove(&mut self, flag: CellFlags) {
        self.flags.remove(flag);
    }

    /// Replace every flag with `BLOCKED`.
    pub(crate) fn block(&mut self) {
        self.flags = CellFlags::BLOCKED;
    }

    pub(crate) fn claim_for_room(&mut self, room_id: u32) {
        if self.has(CellFlags::ENTRANCE) {
            self.clear_espace();
        } else {
            self.remove(CellFlags::PERIMETER);
        }
        self.insert(CellFlags::ROOM);
        self.room_id = Some(room_id);
    }

    pub(crate) fn set_label(&mut self, label: char) {
        self.label = Some(label);
    }

    pub(crate) fn clear_espace(&mut self) {
        self.label = None;
        self.flags.remove(CellFlags::ESPACE);
    }

    pub(crate) fn reset(&mut self) {
        *self = Self::default();
    }
}
