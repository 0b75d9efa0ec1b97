//! Bounds-checked cell storage. The grid keeps one extra row and column past the nominal play
//! area so perimeter marks around edge rooms always land inside it.

use serde::{Deserialize, Serialize};

use crate::types::Pos;

use super::cell::{Cell, CellFlags};

#[derive(Clone, Debug, PartialEq, Eq, Serialize, Deserialize)]
pub struct Grid {
    n_rows: i32,
    n_cols: i32,
    cells: Vec<Cell>,
}

impl Grid {
    /// `n_rows`/`n_cols` are the even nominal dimensions; storage is `(n_rows+1) x (n_cols+1)`.
    pub fn new(n_rows: i32, n_cols: i32) -> Self {
        let n_rows = n_rows.max(0);
        let n_cols = n_cols.max(0);
        let len = (n_rows as usize + 1).saturating_mul(n_cols as usize + 1);
        Self { n_rows, n_cols, cells: vec![Cell::default(); len] }
    }

    pub fn n_rows(&self) -> i32 {
        self.n_rows
    }

    pub fn n_cols(&self) -> i32 {
        self.n_cols
    }

    /// Addressable row count, including the padding row.
    pub fn height(&self) -> usize {
        (self.n_rows + 1) as usize
    }

    pub fn width(&self) -> usize {
        (self.n_cols + 1) as usize
    }

    pub fn in_bounds(&self, pos: Pos) -> bool {
        pos.row >= 0 && pos.col >= 0 && pos.row <= self.n_rows && pos.col <= self.n_cols
    }

    pub fn get(&self, pos: Pos) -> Option<&Cell> {
        self.index(pos).map(|idx| &self.cells[idx])
    }

    pub(crate) fn get_mut(&mut self, pos: Pos) -> Option<&mut Cell> {
        self.index(pos).map(|idx| &mut self.cells[idx])
    }

    /// Off-grid positions read as empty cells.
    pub fn has(&self, pos: Pos, flag: CellFlags) -> bool {
        self.get(pos).is_some_and(|cell| cell.has(flag))
    }

    pub fn is_openspace(&self, pos: Pos) -> bool {
        self.get(pos).is_some_and(Cell::is_openspace)
    }

    pub(crate) fn update(&mut self, pos: Pos, edit: impl FnOnce(&mut Cell)) {
        if let Some(cell) = self.get_mut(pos) {
            edit(cell);
        }
    }

    pub fn rows(&self) -> impl Iterator<Item = &[Cell]> {
        self.cells.chunks(self.width())
    }

    pub fn positions(&self) -> impl Iterator<Item = Pos> + use<> {
        let (n_rows, n_cols) = (self.n_rows, self.n_cols);
        (0..=n_rows).flat_map(move |row| (0..=n_cols).map(move |col| Pos { row, col }))
    }

    pub fn cells(&self) -> &[Cell] {
        &self.cells
    }

    pub(crate) fn cells_mut(&mut self) -> &mut [Cell] {
        &mut self.cells
    }

    fn index(&self, pos: Pos) -> Option<usize> {
        if !self.in_bounds(pos) {
            return None;
        }
        Some((pos.row as usize) * self.width() + (pos.col as usize))
    }
}
