//! Seeded per-octave sampling offsets and the seed sources that feed them.

use glam::DVec2;
use rand::{Rng, SeedableRng};
use rand_chacha::ChaCha8Rng;

/// Each octave offset is drawn from `[-OFFSET_RANGE, OFFSET_RANGE]` on both axes.
pub const OFFSET_RANGE: i32 = 100_000;

/// Supplies a seed when the caller does not pin one.
pub trait EntropySource {
    fn next_seed(&mut self) -> u64;
}

/// Seeds from the thread-local OS-seeded RNG; successive calls differ.
#[derive(Debug, Default, Clone, Copy)]
pub struct OsEntropy;

impl EntropySource for OsEntropy {
    fn next_seed(&mut self) -> u64 {
        rand::rng().random()
    }
}

/// Always hands out the same seed, for replaying a run.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct FixedSeed(pub u64);

impl EntropySource for FixedSeed {
    fn next_seed(&mut self) -> u64 {
        self.0
    }
}

/// Sampling offsets for every octave of one generation call.
#[derive(Debug, Clone, PartialEq)]
pub struct OctaveOffsets {
    offsets: Vec<DVec2>,
}

impl OctaveOffsets {
    /// Draw `octave_count` offsets from a ChaCha stream seeded with `seed`,
    /// shifted by the global `offset`.
    ///
    /// Offsets are drawn x then y, octave by octave, so octave `i` is the same
    /// for any `octave_count > i`.
    pub fn from_seed(seed: u64, octave_count: u32, offset: DVec2) -> Self {
        let mut rng = ChaCha8Rng::seed_from_u64(seed);
        let offsets: Vec<DVec2> = (0..octave_count)
            .map(|_| {
                let x = rng.random_range(-OFFSET_RANGE..=OFFSET_RANGE) as f64;
                let y = rng.random_range(-OFFSET_RANGE..=OFFSET_RANGE) as f64;
                DVec2::new(x, y) + offset
            })
            .collect();
        log::trace!("seed {seed} -> octave offsets {offsets:?}");
        Self { offsets }
    }

    /// Use explicit offsets, bypassing the random stream.
    pub fn from_vec(offsets: Vec<DVec2>) -> Self {
        Self { offsets }
    }

    pub fn len(&self) -> usize {
        self.offsets.len()
    }

    pub fn is_empty(&self) -> bool {
        self.offsets.is_empty()
    }

    pub fn as_slice(&self) -> &[DVec2] {
        &self.offsets
    }
}
