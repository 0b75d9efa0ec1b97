//! Generation options consumed by the pipeline, with the defaults of the classic generator.
//!
//! The core accepts any `Options` value and degrades gracefully on degenerate ones; front-ends are
//! expected to call [`Options::validate`] before handing user input over.

use serde::{Deserialize, Serialize};
use thiserror::Error;

/// Hard cap on the number of rooms a single dungeon can hold.
pub const MAX_ROOMS: u32 = 999;

/// Largest accepted row or column count. Larger requests are clamped by the core.
pub const MAX_GRID_DIM: i32 = 2001;

#[derive(Clone, Copy, Debug, Default, PartialEq, Eq, Hash, Serialize, Deserialize)]
pub enum DungeonLayout {
    /// No mask: the full rectangle is usable.
    #[default]
    #[serde(rename = "None")]
    Full,
    Box,
    Cross,
    Round,
}

impl DungeonLayout {
    /// 3x3 stencil for the stencil-based layouts; zero cells are blocked.
    pub const fn stencil(self) -> Option<&'static [[u8; 3]; 3]> {
        match self {
            Self::Box => Some(&[[1, 1, 1], [1, 0, 1], [1, 1, 1]]),
            Self::Cross => Some(&[[0, 1, 0], [1, 1, 1], [0, 1, 0]]),
            Self::Full | Self::Round => None,
        }
    }
}

#[derive(Clone, Copy, Debug, Default, PartialEq, Eq, Hash, Serialize, Deserialize)]
pub enum RoomLayout {
    Packed,
    #[default]
    Scattered,
}

#[derive(Clone, Copy, Debug, PartialEq, Eq, Hash, Serialize, Deserialize)]
pub enum CorridorPreset {
    Labyrinth,
    Bent,
    Straight,
}

/// How strongly the tunneler prefers to keep going in its last direction.
#[derive(Clone, Copy, Debug, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(untagged)]
pub enum CorridorLayout {
    Preset(CorridorPreset),
    /// Raw straightness percentage, 0..=100.
    Straightness(u8),
}

impl CorridorLayout {
    pub const LABYRINTH: Self = Self::Preset(CorridorPreset::Labyrinth);
    pub const BENT: Self = Self::Preset(CorridorPreset::Bent);
    pub const STRAIGHT: Self = Self::Preset(CorridorPreset::Straight);

    pub const fn straightness(self) -> u8 {
        match self {
            Self::Preset(CorridorPreset::Labyrinth) => 0,
            Self::Preset(CorridorPreset::Bent) => 50,
            Self::Preset(CorridorPreset::Straight) => 100,
            Self::Straightness(percent) => percent,
        }
    }
}

impl Default for CorridorLayout {
    fn default() -> Self {
        Self::STRAIGHT
    }
}

#[derive(Clone, Debug, PartialEq, Eq, Serialize, Deserialize)]
#[serde(default)]
pub struct Options {
    /// Requested row count; odd values are expected, even ones are coerced.
    pub n_rows: i32,
    pub n_cols: i32,
    pub dungeon_layout: DungeonLayout,
    /// Room size bounds in cells.
    pub room_min: i32,
    pub room_max: i32,
    pub room_layout: RoomLayout,
    pub corridor_layout: CorridorLayout,
    /// Percentage of dead ends to collapse.
    pub remove_deadends: u8,
    pub add_stairs: u32,
    /// Only read by renderers.
    pub map_style: String,
    pub cell_size: u32,
}

impl Default for Options {
    fn default() -> Self {
        Self {
            n_rows: 39,
            n_cols: 39,
            dungeon_layout: DungeonLayout::Full,
            room_min: 3,
            room_max: 9,
            room_layout: RoomLayout::Scattered,
            corridor_layout: CorridorLayout::STRAIGHT,
            remove_deadends: 100,
            add_stairs: 2,
            map_style: "Standard".to_string(),
            cell_size: 18,
        }
    }
}

#[derive(Clone, Debug, PartialEq, Eq, Error)]
pub enum OptionsError {
    #[error("dungeon must be at least 3x3 cells, got {n_rows}x{n_cols}")]
    GridTooSmall { n_rows: i32, n_cols: i32 },
    #[error(
        "dungeon must be at most {limit} cells a side, got {n_rows}x{n_cols}",
        limit = MAX_GRID_DIM
    )]
    GridTooLarge { n_rows: i32, n_cols: i32 },
    #[error("room_min must be at least 1, got {0}")]
    RoomMinTooSmall(i32),
    #[error("room_min ({room_min}) must not exceed room_max ({room_max})")]
    RoomBoundsInverted { room_min: i32, room_max: i32 },
    #[error("remove_deadends is a percentage, got {0}")]
    DeadendPercentOutOfRange(u8),
    #[error("corridor straightness is a percentage, got {0}")]
    StraightnessOutOfRange(u8),
}

impl Options {
    pub fn validate(&self) -> Result<(), OptionsError> {
        if self.n_rows < 3 || self.n_cols < 3 {
            return Err(OptionsError::GridTooSmall { n_rows: self.n_rows, n_cols: self.n_cols });
        }
        if self.n_rows > MAX_GRID_DIM || self.n_cols > MAX_GRID_DIM {
            return Err(OptionsError::GridTooLarge { n_rows: self.n_rows, n_cols: self.n_cols });
        }
        if self.room_min < 1 {
            return Err(OptionsError::RoomMinTooSmall(self.room_min));
        }
        if self.room_min > self.room_max {
            return Err(OptionsError::RoomBoundsInverted {
                room_min: self.room_min,
                room_max: self.room_max,
            });
        }
        if self.remove_deadends > 100 {
            return Err(OptionsError::DeadendPercentOutOfRange(self.remove_deadends));
        }
        let straightness = self.corridor_layout.straightness();
        if straightness > 100 {
            return Err(OptionsError::StraightnessOutOfRange(straightness));
        }
        Ok(())
    }

    /// Half-grid row count (number of room/corridor intersections per column).
    pub fn n_i(&self) -> i32 {
        self.n_rows.clamp(0, MAX_GRID_DIM) / 2
    }

    pub fn n_j(&self) -> i32 {
        self.n_cols.clamp(0, MAX_GRID_DIM) / 2
    }

    /// Smallest room edge in half-grid units.
    pub fn room_base(&self) -> i32 {
        self.room_min.saturating_add(1) / 2
    }

    /// Number of distinct room edge lengths above `room_base`, in half-grid units.
    pub fn room_radix(&self) -> i32 {
        (self.room_max.saturating_sub(self.room_min) / 2).saturating_add(1).max(0)
    }
}
