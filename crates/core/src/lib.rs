pub mod invariants;
pub mod mapgen;
pub mod options;
pub mod rng;
pub mod types;

pub use invariants::{Violation, check_dungeon, corridor_components};
pub use mapgen::{
    Cell, CellFlags, Door, DoorGroup, DoorKind, Dungeon, DungeonGenerator, Grid, Room, StairKey,
    Stairs, generate_dungeon,
};
pub use options::{
    CorridorLayout, CorridorPreset, DungeonLayout, MAX_GRID_DIM, MAX_ROOMS, Options, OptionsError,
    RoomLayout,
};
pub use rng::DungeonRng;
pub use types::*;
