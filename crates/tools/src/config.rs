//! Loads `Options` from a TOML or JSON file and layers command-line overrides on top.

use std::fs;
use std::path::Path;

use anyhow::{Context, Result};
use clap::ValueEnum;
use dungeon::{CorridorLayout, CorridorPreset, DungeonLayout, Options, RoomLayout};
use tracing::debug;

#[derive(Clone, Copy, Debug, PartialEq, Eq, ValueEnum)]
pub enum LayoutArg {
    None,
    Box,
    Cross,
    Round,
}

impl From<LayoutArg> for DungeonLayout {
    fn from(arg: LayoutArg) -> Self {
        match arg {
            LayoutArg::None => Self::Full,
            LayoutArg::Box => Self::Box,
            LayoutArg::Cross => Self::Cross,
            LayoutArg::Round => Self::Round,
        }
    }
}

#[derive(Clone, Copy, Debug, PartialEq, Eq, ValueEnum)]
pub enum RoomLayoutArg {
    Packed,
    Scattered,
}

impl From<RoomLayoutArg> for RoomLayout {
    fn from(arg: RoomLayoutArg) -> Self {
        match arg {
            RoomLayoutArg::Packed => Self::Packed,
            RoomLayoutArg::Scattered => Self::Scattered,
        }
    }
}

/// Corridor preset name or a raw straightness percentage.
pub fn parse_corridor_layout(raw: &str) -> Result<CorridorLayout, String> {
    match raw.to_ascii_lowercase().as_str() {
        "labyrinth" => Ok(CorridorLayout::Preset(CorridorPreset::Labyrinth)),
        "bent" => Ok(CorridorLayout::Preset(CorridorPreset::Bent)),
        "straight" => Ok(CorridorLayout::Preset(CorridorPreset::Straight)),
        other => other.parse::<u8>().map(CorridorLayout::Straightness).map_err(|_| {
            format!("corridor layout '{raw}' must be labyrinth, bent, straight or a percentage")
        }),
    }
}

/// Command-line values that replace fields of the loaded options when present.
#[derive(Clone, Debug, Default, PartialEq, Eq)]
pub struct Overrides {
    pub n_rows: Option<i32>,
    pub n_cols: Option<i32>,
    pub dungeon_layout: Option<DungeonLayout>,
    pub room_min: Option<i32>,
    pub room_max: Option<i32>,
    pub room_layout: Option<RoomLayout>,
    pub corridor_layout: Option<CorridorLayout>,
    pub remove_deadends: Option<u8>,
    pub add_stairs: Option<u32>,
}

impl Overrides {
    pub fn apply(&self, options: &mut Options) {
        if let Some(n_rows) = self.n_rows {
            options.n_rows = n_rows;
        }
        if let Some(n_cols) = self.n_cols {
            options.n_cols = n_cols;
        }
        if let Some(layout) = self.dungeon_layout {
            options.dungeon_layout = layout;
        }
        if let Some(room_min) = self.room_min {
            options.room_min = room_min;
        }
        if let Some(room_max) = self.room_max {
            options.room_max = room_max;
        }
        if let Some(layout) = self.room_layout {
            options.room_layout = layout;
        }
        if let Some(layout) = self.corridor_layout {
            options.corridor_layout = layout;
        }
        if let Some(percent) = self.remove_deadends {
            options.remove_deadends = percent;
        }
        if let Some(count) = self.add_stairs {
            options.add_stairs = count;
        }
    }
}

/// Reads options from `path`; `.json` files are parsed as JSON, anything else as TOML.
pub fn load_options(path: &Path) -> Result<Options> {
    let content = fs::read_to_string(path)
        .with_context(|| format!("Failed to read config file: {}", path.display()))?;

    let options = if path.extension().is_some_and(|ext| ext == "json") {
        serde_json::from_str(&content)
            .with_context(|| format!("Failed to parse JSON config: {}", path.display()))?
    } else {
        toml::from_str(&content)
            .with_context(|| format!("Failed to parse TOML config: {}", path.display()))?
    };
    debug!(path = %path.display(), "options loaded");
    Ok(options)
}

/// Defaults, then the optional file, then overrides; the result is validated.
pub fn resolve_options(path: Option<&Path>, overrides: &Overrides) -> Result<Options> {
    let mut options = match path {
        Some(path) => load_options(path)?,
        None => Options::default(),
    };
    overrides.apply(&mut options);
    options.validate().context("Invalid dungeon options")?;
    Ok(options)
}

#[cfg(test)]
mod tests {
    use super::*;
    use tempfile::tempdir;

    #[test]
    fn toml_config_fills_missing_fields_with_defaults() {
        let dir = tempdir().expect("tempdir");
        let path = dir.path().join("dungeon.toml");
        fs::write(
            &path,
            concat!(
                "n_rows = 21\n",
                "dungeon_layout = \"Round\"\n",
                "corridor_layout = \"Labyrinth\"\n",
                "remove_deadends = 40\n",
            ),
        )
        .expect("write config");

        let options = load_options(&path).expect("load");
        assert_eq!(options.n_rows, 21);
        assert_eq!(options.n_cols, 39);
        assert_eq!(options.dungeon_layout, DungeonLayout::Round);
        assert_eq!(options.corridor_layout.straightness(), 0);
        assert_eq!(options.remove_deadends, 40);
    }

    #[test]
    fn json_config_accepts_raw_straightness() {
        let dir = tempdir().expect("tempdir");
        let path = dir.path().join("dungeon.json");
        fs::write(&path, r#"{"corridor_layout": 65, "room_layout": "Packed"}"#)
            .expect("write config");

        let options = load_options(&path).expect("load");
        assert_eq!(options.corridor_layout, CorridorLayout::Straightness(65));
        assert_eq!(options.room_layout, RoomLayout::Packed);
    }

    #[test]
    fn unknown_layout_names_are_rejected() {
        let dir = tempdir().expect("tempdir");
        let path = dir.path().join("dungeon.toml");
        fs::write(&path, "dungeon_layout = \"Hexagon\"\n").expect("write config");

        let err = load_options(&path).expect_err("unknown layout should fail");
        assert!(format!("{err:#}").contains("Failed to parse TOML config"));
    }

    #[test]
    fn missing_file_reports_its_path() {
        let dir = tempdir().expect("tempdir");
        let path = dir.path().join("absent.toml");
        let err = load_options(&path).expect_err("missing file should fail");
        assert!(err.to_string().contains("absent.toml"));
    }

    #[test]
    fn overrides_win_over_file_values_and_are_validated() {
        let dir = tempdir().expect("tempdir");
        let path = dir.path().join("dungeon.toml");
        fs::write(&path, "n_rows = 21\nadd_stairs = 4\n").expect("write config");

        let overrides = Overrides { add_stairs: Some(1), n_cols: Some(25), ..Overrides::default() };
        let options = resolve_options(Some(&path), &overrides).expect("resolve");
        assert_eq!((options.n_rows, options.n_cols, options.add_stairs), (21, 25, 1));

        let inverted = Overrides { room_min: Some(9), room_max: Some(3), ..Overrides::default() };
        let err = resolve_options(None, &inverted).expect_err("inverted bounds should fail");
        assert!(format!("{err:#}").contains("must not exceed"));
    }

    #[test]
    fn corridor_argument_parses_names_and_percentages() {
        assert_eq!(parse_corridor_layout("Bent"), Ok(CorridorLayout::BENT));
        assert_eq!(parse_corridor_layout("70"), Ok(CorridorLayout::Straightness(70)));
        assert!(parse_corridor_layout("wiggly").is_err());
    }
}
