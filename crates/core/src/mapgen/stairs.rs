//! Stair placement in corridor dead-end pockets.

use tracing::debug;

use crate::types::Pos;

use super::cell::CellFlags;
use super::generator::BuildContext;
use super::grid::Grid;
use super::model::{StairKey, Stairs};
use super::templates::{STAIR_ENDS, check_tunnel};

/// A corridor intersection shaped like a stair pocket, before a key is assigned.
#[derive(Clone, Copy, Debug, PartialEq, Eq)]
pub(super) struct StairEndpoint {
    pub(super) pos: Pos,
    pub(super) next: Pos,
}

pub(super) fn emplace_stairs(ctx: &mut BuildContext<'_>) {
    let mut ends = stair_ends(&ctx.grid, ctx.n_i, ctx.n_j);
    let candidates = ends.len();

    for placed in 0..ctx.options.add_stairs {
        if ends.is_empty() {
            break;
        }
        let end = ends.remove(ctx.rng.index(ends.len()));
        let key = match placed {
            0 => StairKey::Down,
            1 => StairKey::Up,
            _ if ctx.rng.coin() => StairKey::Up,
            _ => StairKey::Down,
        };

        ctx.grid.update(end.pos, |cell| {
            cell.insert(key.flag());
            cell.set_label(key.glyph());
        });
        ctx.stairs.push(Stairs { pos: end.pos, next: end.next, key });
    }
    debug!(candidates, placed = ctx.stairs.len(), "stairs placed");
}

/// Corridor intersections that end in a stair-shaped pocket; the first matching direction wins.
pub(super) fn stair_ends(grid: &Grid, n_i: i32, n_j: i32) -> Vec<StairEndpoint> {
    let mut ends = Vec::new();
    for i in 0..n_i {
        for j in 0..n_j {
            let pos = Pos::intersection(i, j);
            let Some(cell) = grid.get(pos) else {
                continue;
            };
            if !cell.has(CellFlags::CORRIDOR) || cell.is_stairs() {
                continue;
            }
            if let Some(end) =
                STAIR_ENDS.iter().find(|end| check_tunnel(grid, pos, end.corridor, end.walled))
            {
                let next = pos.offset(end.next.0, end.next.1);
                ends.push(StairEndpoint { pos, next });
            }
        }
    }
    ends
}
