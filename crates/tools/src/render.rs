//! Plain-text rendering: one glyph per cell, space separated.

use dungeon::{Cell, CellFlags, Dungeon, StairKey};
use serde::Serialize;

pub fn cell_glyph(cell: &Cell) -> char {
    if let Some(label) = cell.label() {
        label
    } else if cell.has(CellFlags::ROOM) {
        'X'
    } else if cell.has(CellFlags::CORRIDOR) {
        'x'
    } else if cell.is_doorspace() {
        'D'
    } else {
        ' '
    }
}

pub fn render_ascii(dungeon: &Dungeon) -> String {
    let mut out = String::with_capacity(dungeon.rows() * (dungeon.cols() * 2 + 1));
    for row in dungeon.grid.rows() {
        for cell in row {
            out.push(cell_glyph(cell));
            out.push(' ');
        }
        out.push('\n');
    }
    out
}

/// Machine-readable run report.
#[derive(Debug, Serialize)]
pub struct Summary {
    pub seed: u64,
    pub seed_source: &'static str,
    pub rows: usize,
    pub cols: usize,
    pub rooms: usize,
    pub doors: usize,
    pub door_groups: usize,
    pub stairs_down: usize,
    pub stairs_up: usize,
    pub fingerprint: String,
}

impl Summary {
    pub fn new(dungeon: &Dungeon, seed: u64, seed_source: &'static str) -> Self {
        let stairs_down =
            dungeon.stairs.iter().filter(|stair| stair.key == StairKey::Down).count();
        Self {
            seed,
            seed_source,
            rows: dungeon.rows(),
            cols: dungeon.cols(),
            rooms: dungeon.rooms.len(),
            doors: dungeon.doors().count(),
            door_groups: dungeon.door_groups.len(),
            stairs_down,
            stairs_up: dungeon.stairs.len() - stairs_down,
            fingerprint: format!("{:016x}", dungeon.fingerprint()),
        }
    }
}

#[cfg(test)]
mod tests {
    use dungeon::{Options, Pos, generate_dungeon};

    use super::*;

    #[test]
    fn glyph_priority_prefers_labels() {
        let dungeon = generate_dungeon(&Options::default(), 21);
        for room in dungeon.rooms.values() {
            let centre = Pos::new((room.north + room.south) / 2, room.west);
            let glyph = dungeon.cell(centre).map(cell_glyph);
            assert!(matches!(glyph, Some('X' | '0'..='9')));
        }
        for (_, _, door) in dungeon.doors() {
            let glyph = dungeon.cell(door.pos).map(cell_glyph);
            assert_eq!(glyph, Some(door.kind.glyph()));
        }
    }

    #[test]
    fn rendering_has_one_line_per_row() {
        let options = Options { n_rows: 11, n_cols: 15, ..Options::default() };
        let dungeon = generate_dungeon(&options, 3);
        let text = render_ascii(&dungeon);
        let lines: Vec<&str> = text.lines().collect();
        assert_eq!(lines.len(), 11);
        assert!(lines.iter().all(|line| line.chars().count() == 15 * 2));
    }

    #[test]
    fn summary_counts_match_the_dungeon() {
        let dungeon = generate_dungeon(&Options::default(), 8);
        let summary = Summary::new(&dungeon, 8, "cli");
        assert_eq!(summary.rooms, dungeon.rooms.len());
        assert_eq!(summary.stairs_down + summary.stairs_up, dungeon.stairs.len());
        assert_eq!(summary.fingerprint.len(), 16);
        let json = serde_json::to_value(&summary).expect("summary should serialize");
        assert_eq!(json["seed_source"], "cli");
    }
}
