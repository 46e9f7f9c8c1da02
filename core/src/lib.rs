// heightfield: fractal height-field synthesis and terrain classification
pub mod config;
pub mod error;
pub mod falloff2;
pub mod fractal2;
pub mod generator;
pub mod heightmap;
pub mod offsets;
pub mod open_simplex;
pub mod perlin2;
pub mod regions;
pub mod simplex2;
pub mod utils;

pub use config::{FalloffBaseline, FalloffConfig, FalloffReach, MIN_NOISE_SCALE, TerrainConfig};
pub use error::TerrainError;
pub use falloff2::FalloffShaper;
pub use fractal2::{FractalSampler, RawField};
pub use generator::{Cancellation, TerrainGenerator, generate, generate_island, sample_raw};
pub use glam::DVec2;
pub use heightmap::HeightMap;
pub use offsets::{EntropySource, FixedSeed, OctaveOffsets, OsEntropy};
pub use open_simplex::OpenSimplex2D;
pub use perlin2::Perlin2D;
pub use regions::{RegionTable, TerrainType, classify};
pub use simplex2::Simplex2D;
pub use utils::normalize2;

/// Coherent 2D noise consumed by the fractal sampler.
///
/// `eval` must be deterministic for a fixed internal state, continuous in
/// `(x, y)`, and return values in `[0, 1]`. Any conforming primitive
/// (Perlin, simplex, value noise, a test stub) can be plugged in.
pub trait NoiseSource: Send + Sync {
    fn eval(&self, x: f64, y: f64) -> f64;
}

// Plain closures work as noise, handy for stubs
impl<F> NoiseSource for F
where
    F: Fn(f64, f64) -> f64 + Send + Sync,
{
    fn eval(&self, x: f64, y: f64) -> f64 {
        self(x, y)
    }
}
