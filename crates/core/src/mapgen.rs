//! Procedural dungeon generation split into one submodule per pipeline stage.

pub mod cell;
pub mod grid;
pub mod model;

mod cleanup;
mod corridors;
mod doors;
mod generator;
mod mask;
mod rooms;
mod stairs;
mod templates;

pub use cell::{Cell, CellFlags};
pub use generator::DungeonGenerator;
pub use grid::Grid;
pub use model::{Door, DoorGroup, DoorKind, Dungeon, Room, StairKey, Stairs};
pub use rooms::{Placement, Rejection};

use crate::options::Options;

pub fn generate_dungeon(options: &Options, seed: u64) -> Dungeon {
    DungeonGenerator::new(options.clone()).generate(seed)
}
