use std::process;
use std::sync::atomic::{AtomicU64, Ordering};
use std::time::{SystemTime, UNIX_EPOCH};

#[derive(Clone, Copy, Debug, PartialEq, Eq)]
pub enum SeedChoice {
    Cli(u64),
    Generated(u64),
}

impl SeedChoice {
    /// An explicit `--seed` wins; otherwise a fresh seed is drawn for this run.
    pub fn resolve(cli_seed: Option<u64>) -> Self {
        cli_seed.map_or_else(|| Self::Generated(runtime_seed()), Self::Cli)
    }

    pub fn value(self) -> u64 {
        match self {
            Self::Cli(seed) | Self::Generated(seed) => seed,
        }
    }

    /// Label printed next to the seed so a generated run can be replayed with `--seed`.
    pub fn source(self) -> &'static str {
        match self {
            Self::Cli(_) => "cli",
            Self::Generated(_) => "generated",
        }
    }
}

/// Seeds handed out by this process; keeps back-to-back generated seeds apart.
static RUNS: AtomicU64 = AtomicU64::new(0);

/// Folds wall-clock time, the process id and the run count through [`mix_seed`].
fn runtime_seed() -> u64 {
    let elapsed = SystemTime::now().duration_since(UNIX_EPOCH).unwrap_or_default();
    let run = RUNS.fetch_add(1, Ordering::Relaxed);
    [elapsed.as_secs(), u64::from(elapsed.subsec_nanos()), u64::from(process::id()), run]
        .into_iter()
        .fold(0x6A09_E667_F3BC_C908, |state, word| mix_seed(state ^ word))
}

/// SplitMix64 finaliser.
pub fn mix_seed(mut value: u64) -> u64 {
    value ^= value >> 30;
    value = value.wrapping_mul(0xBF58_476D_1CE4_E5B9);
    value ^= value >> 27;
    value = value.wrapping_mul(0x94D0_49BB_1331_11EB);
    value ^ (value >> 31)
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn explicit_seed_is_kept() {
        let choice = SeedChoice::resolve(Some(4_242));
        assert_eq!(choice, SeedChoice::Cli(4_242));
        assert_eq!(choice.value(), 4_242);
        assert_eq!(choice.source(), "cli");
    }

    #[test]
    fn missing_seed_is_generated() {
        let choice = SeedChoice::resolve(None);
        assert!(matches!(choice, SeedChoice::Generated(_)));
        assert_eq!(choice.source(), "generated");
    }

    #[test]
    fn generated_seeds_differ_between_runs() {
        let first = SeedChoice::resolve(None).value();
        let second = SeedChoice::resolve(None).value();
        assert_ne!(first, second, "each run should draw its own seed");
    }

    #[test]
    fn mixing_spreads_neighbouring_inputs() {
        assert_ne!(mix_seed(1), mix_seed(2));
        assert_eq!(mix_seed(0), 0);
    }
}
