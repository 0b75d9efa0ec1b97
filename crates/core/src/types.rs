use serde::{Deserialize, Serialize};

/// A cell address on the padded grid. Signed so that neighbour arithmetic can step off the
/// edge and be rejected by bounds-checked lookups instead of wrapping.
#[derive(Clone, Copy, Debug, PartialEq, Eq, PartialOrd, Ord, Hash, Serialize, Deserialize)]
pub struct Pos {
    pub row: i32,
    pub col: i32,
}

impl Pos {
    pub const fn new(row: i32, col: i32) -> Self {
        Self { row, col }
    }

    /// Full-grid cell at the centre of half-grid intersection `(i, j)`.
    pub const fn intersection(i: i32, j: i32) -> Self {
        Self { row: i * 2 + 1, col: j * 2 + 1 }
    }

    pub const fn offset(self, d_row: i32, d_col: i32) -> Self {
        Self { row: self.row + d_row, col: self.col + d_col }
    }

    pub const fn step(self, dir: Direction, distance: i32) -> Self {
        self.offset(dir.d_row() * distance, dir.d_col() * distance)
    }

    pub const fn is_intersection(self) -> bool {
        self.row % 2 == 1 && self.col % 2 == 1
    }
}

#[derive(Clone, Copy, Debug, PartialEq, Eq, PartialOrd, Ord, Hash, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum Direction {
    North,
    South,
    West,
    East,
}

impl Direction {
    pub const ALL: [Direction; 4] =
        [Direction::North, Direction::South, Direction::West, Direction::East];

    pub const fn d_row(self) -> i32 {
        match self {
            Self::North => -1,
            Self::South => 1,
            Self::West | Self::East => 0,
        }
    }

    pub const fn d_col(self) -> i32 {
        match self {
            Self::West => -1,
            Self::East => 1,
            Self::North | Self::South => 0,
        }
    }

    pub const fn opposite(self) -> Self {
        match self {
            Self::North => Self::South,
            Self::South => Self::North,
            Self::West => Self::East,
            Self::East => Self::West,
        }
    }

    pub const fn key(self) -> &'static str {
        match self {
            Self::North => "north",
            Self::South => "south",
            Self::West => "west",
            Self::East => "east",
        }
    }
}
