//! Seeded pseudo-random stream shared by every generation stage.

use rand_chacha::ChaCha8Rng;
use rand_chacha::rand_core::{Rng, SeedableRng};

/// Single random stream for one generation run. Stages draw from it in pipeline order, so a
/// seed fixes the whole dungeon.
#[derive(Clone, Debug)]
pub struct DungeonRng {
    inner: ChaCha8Rng,
}

impl DungeonRng {
    pub fn from_seed(seed: u64) -> Self {
        Self { inner: ChaCha8Rng::seed_from_u64(seed) }
    }

    /// Uniform draw in `[0, n)`. Non-positive bounds yield 0 without consuming the stream.
    pub fn below(&mut self, n: i32) -> i32 {
        if n <= 0 {
            return 0;
        }
        (self.inner.next_u64() % n as u64) as i32
    }

    /// Uniform index into a collection of `len` elements; `len` must be non-zero.
    pub fn index(&mut self, len: usize) -> usize {
        debug_assert!(len > 0);
        (self.inner.next_u64() % len as u64) as usize
    }

    pub fn coin(&mut self) -> bool {
        self.below(2) == 1
    }

    /// True with probability `percent`/100.
    pub fn percent_chance(&mut self, percent: u8) -> bool {
        self.below(100) < i32::from(percent)
    }

    pub fn shuffle<T>(&mut self, items: &mut [T]) {
        for upper in (1..items.len()).rev() {
            let pick = self.index(upper + 1);
            items.swap(upper, pick);
        }
    }
}
