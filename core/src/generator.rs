//! Generation entry points: seed -> offsets -> fractal field -> [falloff] -> normalize.

use std::sync::Arc;
use std::sync::atomic::{AtomicBool, Ordering};

use crate::NoiseSource;
use crate::config::TerrainConfig;
use crate::error::Result;
use crate::falloff2::FalloffShaper;
use crate::fractal2::{FractalSampler, RawField};
use crate::heightmap::HeightMap;
use crate::offsets::{EntropySource, OctaveOffsets};
use crate::open_simplex::OpenSimplex2D;
use crate::utils::normalize2;

/// Shared stop flag, polled by the sampler once per row.
#[derive(Debug, Clone, Default)]
pub struct Cancellation(Arc<AtomicBool>);

impl Cancellation {
    pub fn new() -> Self {
        Self::default()
    }

    pub fn cancel(&self) {
        self.0.store(true, Ordering::Relaxed);
    }

    pub fn is_cancelled(&self) -> bool {
        self.0.load(Ordering::Relaxed)
    }
}

/// Standard fractal field, no island shaping.
pub fn generate<N: NoiseSource + ?Sized>(config: &TerrainConfig, noise: &N) -> Result<HeightMap> {
    run(config, noise, false, None)
}

/// Fractal field with radial falloff applied before normalization.
pub fn generate_island<N: NoiseSource + ?Sized>(
    config: &TerrainConfig,
    noise: &N,
) -> Result<HeightMap> {
    run(config, noise, true, None)
}

/// Raw fractal values before any shaping or normalization.
pub fn sample_raw<N: NoiseSource + ?Sized>(config: &TerrainConfig, noise: &N) -> Result<RawField> {
    config.validate_with_falloff(false)?;
    let offsets = OctaveOffsets::from_seed(config.seed, config.octave_count, config.offset);
    FractalSampler::new(config, &offsets, noise)?.sample(None)
}

fn run<N: NoiseSource + ?Sized>(
    config: &TerrainConfig,
    noise: &N,
    island: bool,
    cancel: Option<&Cancellation>,
) -> Result<HeightMap> {
    config.validate_with_falloff(island)?;
    log::debug!(
        "generating {}x{} field: {} octaves, seed {}, island {}",
        config.width,
        config.height,
        config.octave_count,
        config.seed,
        island
    );

    let offsets = OctaveOffsets::from_seed(config.seed, config.octave_count, config.offset);
    let mut field = FractalSampler::new(config, &offsets, noise)?.sample(cancel)?;

    if island {
        FalloffShaper::new(&config.falloff).apply(&mut field)?;
    }

    let degenerate = normalize2(&mut field)?;
    Ok(HeightMap::from_parts(
        field.width,
        field.height,
        field.values,
        config.seed,
        degenerate,
    ))
}

/// Owns a noise source and runs generation calls against it.
///
/// Holds no state between calls; every call builds a fresh [`HeightMap`].
pub struct TerrainGenerator<N> {
    noise: N,
}

impl TerrainGenerator<OpenSimplex2D> {
    pub fn open_simplex(noise_seed: u32) -> Self {
        Self::new(OpenSimplex2D::new(noise_seed))
    }
}

impl<N: NoiseSource> TerrainGenerator<N> {
    pub fn new(noise: N) -> Self {
        Self { noise }
    }

    pub fn noise(&self) -> &N {
        &self.noise
    }

    pub fn generate(&self, config: &TerrainConfig) -> Result<HeightMap> {
        generate(config, &self.noise)
    }

    pub fn generate_island(&self, config: &TerrainConfig) -> Result<HeightMap> {
        generate_island(config, &self.noise)
    }

    /// Plain or island generation, picked by `config.island_mode`.
    pub fn generate_configured(&self, config: &TerrainConfig) -> Result<HeightMap> {
        run(config, &self.noise, config.island_mode, None)
    }

    /// Like [`generate_configured`](Self::generate_configured) but ignores
    /// `config.seed` and draws one from `entropy` instead.
    ///
    /// The seed actually used is available through [`HeightMap::seed`] so the
    /// result can be replayed later.
    pub fn generate_fresh<E: EntropySource + ?Sized>(
        &self,
        config: &TerrainConfig,
        entropy: &mut E,
    ) -> Result<HeightMap> {
        let config = TerrainConfig {
            seed: entropy.next_seed(),
            ..config.clone()
        };
        self.generate_configured(&config)
    }

    /// Like [`generate_configured`](Self::generate_configured), stopping with
    /// [`crate::TerrainError::Cancelled`] once `cancel` is set.
    pub fn generate_cancellable(
        &self,
        config: &TerrainConfig,
        cancel: &Cancellation,
    ) -> Result<HeightMap> {
        run(config, &self.noise, config.island_mode, Some(cancel))
    }
}
