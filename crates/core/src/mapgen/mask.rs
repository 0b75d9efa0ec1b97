//! Pre-blocks cells outside the dungeon's outline before anything is placed.

use crate::options::DungeonLayout;
use crate::types::Pos;

use super::grid::Grid;

pub(super) fn apply_layout(grid: &mut Grid, layout: DungeonLayout) {
    if let Some(stencil) = layout.stencil() {
        mask_cells(grid, stencil);
    } else if layout == DungeonLayout::Round {
        round_mask(grid);
    }
}

/// Samples `stencil` scaled over the padded grid; zero entries block the cell.
fn mask_cells<const N: usize>(grid: &mut Grid, stencil: &[[u8; N]; N]) {
    let row_scale = N as f64 / f64::from(grid.n_rows() + 1);
    let col_scale = N as f64 / f64::from(grid.n_cols() + 1);

    for row in 0..grid.n_rows() {
        let stencil_row = &stencil[(f64::from(row) * row_scale) as usize];
        for col in 0..grid.n_cols() {
            if stencil_row[(f64::from(col) * col_scale) as usize] == 0 {
                grid.update(Pos { row, col }, |cell| cell.block());
            }
        }
    }
}

fn round_mask(grid: &mut Grid) {
    let center_row = grid.n_rows() / 2;
    let center_col = grid.n_cols() / 2;
    let radius = f64::from(center_col);

    for row in 0..grid.n_rows() {
        for col in 0..grid.n_cols() {
            let d_row = f64::from(row - center_row);
            let d_col = f64::from(col - center_col);
            if d_row.hypot(d_col) > radius {
                grid.update(Pos { row, col }, |cell| cell.block());
            }
        }
    }
}
