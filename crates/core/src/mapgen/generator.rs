//! Generation orchestration: owns the in-progress build state and runs the stages in order.

use std::collections::BTreeMap;

use tracing::{debug, debug_span};

use crate::options::Options;
use crate::rng::DungeonRng;

use super::cleanup::clean_dungeon;
use super::corridors::carve_corridors;
use super::doors::open_rooms;
use super::grid::Grid;
use super::mask::apply_layout;
use super::model::{DoorGroup, Dungeon, Room, Stairs};
use super::rooms::{emplace_rooms, label_rooms};
use super::stairs::emplace_stairs;

/// Mutable state shared by every stage of one generation run.
pub(super) struct BuildContext<'a> {
    pub(super) options: &'a Options,
    pub(super) rng: &'a mut DungeonRng,
    pub(super) grid: Grid,
    pub(super) rooms: BTreeMap<u32, Room>,
    pub(super) stairs: Vec<Stairs>,
    pub(super) door_groups: Vec<DoorGroup>,
    /// Intersection counts along each axis.
    pub(super) n_i: i32,
    pub(super) n_j: i32,
    pub(super) n_rooms: u32,
    pub(super) straightness: u8,
}

impl<'a> BuildContext<'a> {
    /// Allocates the padded grid and applies the layout mask.
    pub(super) fn new(options: &'a Options, rng: &'a mut DungeonRng) -> Self {
        let n_i = options.n_i();
        let n_j = options.n_j();
        let mut grid = Grid::new(n_i * 2, n_j * 2);
        apply_layout(&mut grid, options.dungeon_layout);

        Self {
            options,
            rng,
            grid,
            rooms: BTreeMap::new(),
            stairs: Vec::new(),
            door_groups: Vec::new(),
            n_i,
            n_j,
            n_rooms: 0,
            straightness: options.corridor_layout.straightness().min(100),
        }
    }

    fn finish(self) -> Dungeon {
        Dungeon {
            options: self.options.clone(),
            grid: self.grid,
            rooms: self.rooms,
            stairs: self.stairs,
            door_groups: self.door_groups,
        }
    }
}

pub struct DungeonGenerator {
    options: Options,
}

impl DungeonGenerator {
    pub fn new(options: Options) -> Self {
        Self { options }
    }

    pub fn options(&self) -> &Options {
        &self.options
    }

    pub fn generate(&self, seed: u64) -> Dungeon {
        let _span = debug_span!("generate", seed).entered();
        let mut rng = DungeonRng::from_seed(seed);
        self.generate_with_rng(&mut rng)
    }

    /// Runs the full pipeline drawing from a caller-owned stream.
    pub fn generate_with_rng(&self, rng: &mut DungeonRng) -> Dungeon {
        let mut ctx = BuildContext::new(&self.options, rng);
        debug!(rows = ctx.grid.n_rows(), cols = ctx.grid.n_cols(), "grid initialised");

        emplace_rooms(&mut ctx);
        debug!(rooms = ctx.rooms.len(), "rooms placed");

        open_rooms(&mut ctx);
        label_rooms(&mut ctx);
        carve_corridors(&mut ctx);

        if self.options.add_stairs > 0 {
            emplace_stairs(&mut ctx);
        }
        clean_dungeon(&mut ctx);

        ctx.finish()
    }
}
