use std::path::PathBuf;

use anyhow::{Context, Result};
use clap::Parser;
use dungeon::DungeonGenerator;
use tools::config::{LayoutArg, Overrides, RoomLayoutArg, parse_corridor_layout, resolve_options};
use tools::render::{Summary, render_ascii};
use tools::seed::SeedChoice;
use tracing::info;

#[derive(Parser)]
#[command(author, version, about = "Generate a dungeon and print it as text", long_about = None)]
struct Args {
    /// TOML (or .json) file with generation options
    #[arg(short, long)]
    config: Option<PathBuf>,
    /// Seed for the random stream; generated when omitted
    #[arg(short, long)]
    seed: Option<u64>,
    #[arg(long)]
    rows: Option<i32>,
    #[arg(long)]
    cols: Option<i32>,
    #[arg(long, value_enum)]
    layout: Option<LayoutArg>,
    #[arg(long)]
    room_min: Option<i32>,
    #[arg(long)]
    room_max: Option<i32>,
    #[arg(long, value_enum)]
    room_layout: Option<RoomLayoutArg>,
    /// labyrinth, bent, straight, or a straightness percentage
    #[arg(long, value_parser = parse_corridor_layout)]
    corridor: Option<dungeon::CorridorLayout>,
    /// Percentage of dead ends to collapse
    #[arg(long)]
    remove_deadends: Option<u8>,
    #[arg(long)]
    stairs: Option<u32>,
    /// Print the summary as JSON instead of text
    #[arg(long)]
    json: bool,
    /// Skip the map and print only the summary
    #[arg(long)]
    quiet: bool,
}

impl Args {
    fn overrides(&self) -> Overrides {
        Overrides {
            n_rows: self.rows,
            n_cols: self.cols,
            dungeon_layout: self.layout.map(Into::into),
            room_min: self.room_min,
            room_max: self.room_max,
            room_layout: self.room_layout.map(Into::into),
            corridor_layout: self.corridor,
            remove_deadends: self.remove_deadends,
            add_stairs: self.stairs,
        }
    }
}

fn main() -> Result<()> {
    tools::init_tracing();
    let args = Args::parse();

    let options = resolve_options(args.config.as_deref(), &args.overrides())?;
    let seed = SeedChoice::resolve(args.seed);
    info!(seed = seed.value(), source = seed.source(), "generating dungeon");

    let dungeon = DungeonGenerator::new(options).generate(seed.value());
    let summary = Summary::new(&dungeon, seed.value(), seed.source());

    if !args.quiet {
        print!("{}", render_ascii(&dungeon));
    }
    if args.json {
        let json =
            serde_json::to_string_pretty(&summary).context("Failed to serialize summary JSON")?;
        println!("{json}");
    } else {
        println!("Seed: {} ({})", summary.seed, summary.seed_source);
        println!(
            "Rooms: {}  Doors: {}  Door groups: {}",
            summary.rooms, summary.doors, summary.door_groups
        );
        println!("Stairs: {} down, {} up", summary.stairs_down, summary.stairs_up);
        println!("Fingerprint: {}", summary.fingerprint);
    }

    Ok(())
}
