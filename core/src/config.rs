use glam::DVec2;
use serde::{Deserialize, Serialize};

use crate::error::{Result, TerrainError};

/// Noise scale substituted when the configured one is zero or negative.
pub const MIN_NOISE_SCALE: f64 = 1e-4;

/// Which distance the radial falloff reaches zero at.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default, Serialize, Deserialize)]
pub enum FalloffReach {
    /// Gradient hits zero at the grid corners.
    #[default]
    Corner,
    // Gradient hits zero at the nearer pair of edges, corners stay clamped at zero
    Edge,
}

/// Level the falloff pulls the boundary towards.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default, Serialize, Deserialize)]
pub enum FalloffBaseline {
    /// Elevation is measured from the raw minimum, so the boundary lands on
    /// the field floor.
    #[default]
    Floor,
    /// Raw values are scaled as they are; the boundary lands on 0, which for
    /// signed noise can sit mid-range.
    Zero,
}

/// Island-mode shaping parameters.
#[derive(Debug, Clone, Copy, PartialEq, Serialize, Deserialize)]
#[serde(default)]
pub struct FalloffConfig {
    /// Power applied to the radial gradient, 1 = linear, 2 = sharper coast.
    pub exponent: f64,
    pub reach: FalloffReach,
    pub baseline: FalloffBaseline,
    /// Negate the shaped field so the boundary becomes the maximum.
    pub invert: bool,
}

impl Default for FalloffConfig {
    fn default() -> Self {
        Self {
            exponent: 1.0,
            reach: FalloffReach::Corner,
            baseline: FalloffBaseline::Floor,
            invert: false,
        }
    }
}

/// All inputs of one generation call.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(default)]
pub struct TerrainConfig {
    pub width: usize,
    pub height: usize,
    // Zoom level; cells per noise unit
    pub noise_scale: f64,
    pub octave_count: u32,
    // Amplitude decay per octave
    pub persistence: f64,
    // Frequency growth per octave
    pub lacunarity: f64,
    // Global coordinate bias added to every octave offset
    pub offset: DVec2,
    pub seed: u64,
    pub island_mode: bool,
    pub falloff: FalloffConfig,
}

impl Default for TerrainConfig {
    fn default() -> Self {
        Self {
            width: 500,
            height: 500,
            noise_scale: 100.0,
            octave_count: 5,
            persistence: 0.5,
            lacunarity: 2.0,
            offset: DVec2::ZERO,
            seed: 0,
            island_mode: false,
            falloff: FalloffConfig::default(),
        }
    }
}

impl TerrainConfig {
    /// Default preset with island shaping switched on.
    pub fn island() -> Self {
        Self {
            island_mode: true,
            ..Self::default()
        }
    }

    pub fn with_size(mut self, width: usize, height: usize) -> Self {
        self.width = width;
        self.height = height;
        self
    }

    pub fn with_seed(mut self, seed: u64) -> Self {
        self.seed = seed;
        self
    }

    pub fn with_island_mode(mut self, island_mode: bool) -> Self {
        self.island_mode = island_mode;
        self
    }

    /// Number of cells in the grid. Only meaningful after [`validate`](Self::validate).
    pub fn cell_count(&self) -> usize {
        self.width * self.height
    }

    /// Noise scale actually used for sampling.
    ///
    /// Values at or below zero are replaced by [`MIN_NOISE_SCALE`].
    pub fn effective_noise_scale(&self) -> f64 {
        if self.noise_scale <= 0.0 {
            MIN_NOISE_SCALE
        } else {
            self.noise_scale
        }
    }

    /// Reject configurations that cannot produce a height map.
    ///
    /// Runs before any sampling. The only silent correction is the
    /// noise-scale substitution in [`effective_noise_scale`](Self::effective_noise_scale).
    pub fn validate(&self) -> Result<()> {
        self.validate_with_falloff(self.island_mode)
    }

    // `island` overrides `island_mode` for the explicit island entry point
    pub(crate) fn validate_with_falloff(&self, island: bool) -> Result<()> {
        grid_cells(self.width, self.height)?;

        finite("noise_scale", self.noise_scale)?;
        finite("persistence", self.persistence)?;
        finite("lacunarity", self.lacunarity)?;
        finite("offset.x", self.offset.x)?;
        finite("offset.y", self.offset.y)?;

        if island {
            finite("falloff.exponent", self.falloff.exponent)?;
            if self.falloff.exponent <= 0.0 {
                return Err(TerrainError::InvalidFalloffExponent(self.falloff.exponent));
            }
        }

        if self.noise_scale <= 0.0 {
            log::debug!(
                "noise scale {} coerced to {}",
                self.noise_scale,
                MIN_NOISE_SCALE
            );
        }
        Ok(())
    }
}

/// Cell count of a `width` x `height` grid of `f64`, if such a grid can be allocated.
pub(crate) fn grid_cells(width: usize, height: usize) -> Result<usize> {
    if width == 0 || height == 0 {
        return Err(TerrainError::InvalidDimensions { width, height });
    }
    width
        .checked_mul(height)
        .filter(|cells| {
            cells
                .checked_mul(std::mem::size_of::<f64>())
                .is_some_and(|bytes| bytes <= isize::MAX as usize)
        })
        .ok_or(TerrainError::GridTooLarge { width, height })
}

fn finite(field: &'static str, value: f64) -> Result<()> {
    if value.is_finite() {
        Ok(())
    } else {
        Err(TerrainError::NonFinite { field, value })
    }
}
