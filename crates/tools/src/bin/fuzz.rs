use anyhow::{Result, bail};
use clap::Parser;
use dungeon::{
    CorridorLayout, DungeonGenerator, DungeonLayout, Options, RoomLayout, check_dungeon,
};
use rand_chacha::{
    ChaCha8Rng,
    rand_core::{Rng, SeedableRng},
};
use tracing::{debug, info};

#[derive(Parser)]
#[command(author, version, about, long_about = None)]
struct Args {
    #[arg(short, long, default_value_t = 42)]
    seed: u64,
    #[arg(short, long, default_value_t = 500)]
    iterations: u32,
}

fn choose<T: Clone>(rng: &mut ChaCha8Rng, slice: &[T]) -> T {
    let p = rng.next_u64() as usize % slice.len();
    slice[p].clone()
}

fn between(rng: &mut ChaCha8Rng, low: i32, high: i32) -> i32 {
    low + (rng.next_u32() % (high - low + 1) as u32) as i32
}

fn random_options(rng: &mut ChaCha8Rng) -> Options {
    let room_min = between(rng, 1, 9);
    let corridor_layout = if rng.next_u32() % 4 == 0 {
        CorridorLayout::Straightness((rng.next_u32() % 101) as u8)
    } else {
        choose(rng, &[CorridorLayout::LABYRINTH, CorridorLayout::BENT, CorridorLayout::STRAIGHT])
    };

    Options {
        n_rows: between(rng, 3, 81),
        n_cols: between(rng, 3, 81),
        dungeon_layout: choose(
            rng,
            &[DungeonLayout::Full, DungeonLayout::Box, DungeonLayout::Cross, DungeonLayout::Round],
        ),
        room_min,
        room_max: between(rng, room_min, room_min + 10),
        room_layout: choose(rng, &[RoomLayout::Packed, RoomLayout::Scattered]),
        corridor_layout,
        remove_deadends: (rng.next_u32() % 101) as u8,
        add_stairs: rng.next_u32() % 8,
        ..Options::default()
    }
}

fn main() -> Result<()> {
    tools::init_tracing();
    let args = Args::parse();

    info!(seed = args.seed, iterations = args.iterations, "starting fuzz harness");
    let mut rng = ChaCha8Rng::seed_from_u64(args.seed);

    for iteration in 0..args.iterations {
        let options = random_options(&mut rng);
        let seed = rng.next_u64();
        options.validate()?;

        let generator = DungeonGenerator::new(options.clone());
        let dungeon = generator.generate(seed);
        if let Err(violation) = check_dungeon(&dungeon) {
            bail!("iteration {iteration}: {violation} (seed={seed}, options={options:?})");
        }
        if generator.generate(seed) != dungeon {
            bail!("iteration {iteration}: replay diverged (seed={seed}, options={options:?})");
        }
        debug!(iteration, seed, rooms = dungeon.rooms.len(), stairs = dungeon.stairs.len());
    }

    info!(iterations = args.iterations, "fuzz harness finished without violations");
    Ok(())
}
