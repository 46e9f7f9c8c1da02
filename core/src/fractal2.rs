use rayon::prelude::*;

use crate::NoiseSource;
use crate::config::{TerrainConfig, grid_cells};
use crate::error::{Result, TerrainError};
use crate::generator::Cancellation;
use crate::offsets::OctaveOffsets;

/// Un-normalized elevation grid, row-major, with its observed extrema.
#[derive(Debug, Clone, PartialEq)]
pub struct RawField {
    pub width: usize,
    pub height: usize,
    pub values: Vec<f64>,
    pub min: f64,
    pub max: f64,
}

impl RawField {
    #[inline]
    pub fn get(&self, x: usize, y: usize) -> f64 {
        self.values[y * self.width + x]
    }

    /// Reject fields whose buffer does not hold exactly `width * height` values.
    pub fn check_shape(&self) -> Result<()> {
        let cells = grid_cells(self.width, self.height)?;
        if cells != self.values.len() {
            return Err(TerrainError::FieldShapeMismatch {
                width: self.width,
                height: self.height,
                len: self.values.len(),
            });
        }
        Ok(())
    }

    /// Recompute `min`/`max` from the stored values.
    pub fn retrack(&mut self) {
        let (min, max) = self
            .values
            .iter()
            .fold((f64::INFINITY, f64::NEG_INFINITY), |(lo, hi), &v| {
                (lo.min(v), hi.max(v))
            });
        self.min = min;
        self.max = max;
    }
}

/// Sums octaves of a noise source into one raw elevation per cell
/// (fractal Brownian motion).
pub struct FractalSampler<'a, N: NoiseSource + ?Sized> {
    noise: &'a N,
    offsets: &'a OctaveOffsets,
    width: usize,
    height: usize,
    cells: usize,
    scale: f64,       // effective noise scale, always > 0
    persistence: f64, // amplitude multiplier per octave
    lacunarity: f64,  // frequency multiplier per octave
}

impl<'a, N: NoiseSource + ?Sized> FractalSampler<'a, N> {
    /// Takes grid size and octave parameters from `config`.
    ///
    /// Only the grid size is checked here; run [`TerrainConfig::validate`]
    /// first to catch non-finite parameters.
    pub fn new(config: &TerrainConfig, offsets: &'a OctaveOffsets, noise: &'a N) -> Result<Self> {
        let cells = grid_cells(config.width, config.height)?;
        Ok(Self {
            noise,
            offsets,
            width: config.width,
            height: config.height,
            cells,
            scale: config.effective_noise_scale(),
            persistence: config.persistence,
            lacunarity: config.lacunarity,
        })
    }

    /// Raw elevation at centered coordinates `(cx, cy)`.
    #[inline]
    pub fn sample_centered(&self, cx: f64, cy: f64) -> f64 {
        let mut amplitude = 1.0;
        let mut frequency = 1.0;
        let mut total = 0.0;

        for offset in self.offsets.as_slice() {
            let sample_x = cx / self.scale * frequency + offset.x;
            let sample_y = cy / self.scale * frequency + offset.y;
            // [0, 1] -> [-1, 1]
            let value = self.noise.eval(sample_x, sample_y) * 2.0 - 1.0;
            total += value * amplitude;

            amplitude *= self.persistence;
            frequency *= self.lacunarity;
        }
        total
    }

    /// Sample the whole grid centered on its midpoint.
    ///
    /// Rows are filled in parallel; each row reports its own extrema and
    /// they are reduced at the end, so the result matches a sequential pass.
    /// `cancel` is polled once per row.
    pub fn sample(&self, cancel: Option<&Cancellation>) -> Result<RawField> {
        let (width, height) = (self.width, self.height);
        let half_w = width as f64 / 2.0;
        let half_h = height as f64 / 2.0;
        let mut values = vec![0.0f64; self.cells];

        let row_extrema: Option<Vec<(f64, f64)>> = values
            .par_chunks_mut(width)
            .enumerate()
            .map(|(y, row)| {
                if cancel.is_some_and(Cancellation::is_cancelled) {
                    return None;
                }
                let cy = y as f64 - half_h;
                let mut lo = f64::INFINITY;
                let mut hi = f64::NEG_INFINITY;
                for (x, cell) in row.iter_mut().enumerate() {
                    let v = self.sample_centered(x as f64 - half_w, cy);
                    lo = lo.min(v);
                    hi = hi.max(v);
                    *cell = v;
                }
                Some((lo, hi))
            })
            .collect();

        let row_extrema = row_extrema.ok_or(TerrainError::Cancelled)?;
        let (min, max) = row_extrema
            .iter()
            .fold((f64::INFINITY, f64::NEG_INFINITY), |(lo, hi), &(a, b)| {
                (lo.min(a), hi.max(b))
            });

        Ok(RawField {
            width,
            height,
            values,
            min,
            max,
        })
    }
}

/// Peak contribution of each octave: `persistence^i`.
pub fn octave_amplitudes(persistence: f64, octave_count: u32) -> Vec<f64> {
    let mut amplitude = 1.0;
    (0..octave_count)
        .map(|_| {
            let current = amplitude;
            amplitude *= persistence;
            current
        })
        .collect()
}

#[cfg(test)]
mod tests {
    use glam::DVec2;

    use super::*;

    fn config(octaves: u32) -> TerrainConfig {
        TerrainConfig {
            width: 8,
            height: 6,
            noise_scale: 4.0,
            octave_count: octaves,
            ..Default::default()
        }
    }

    #[test]
    fn fractal2_dimensions() {
        let cfg = config(3);
        let offsets = OctaveOffsets::from_seed(1, 3, DVec2::ZERO);
        let noise = |x: f64, y: f64| (x.sin() * y.cos() + 1.0) / 2.0;
        let field = FractalSampler::new(&cfg, &offsets, &noise)
            .unwrap()
            .sample(None)
            .unwrap();
        assert_eq!(field.values.len(), 48);
        assert_eq!(field.width, 8);
        assert_eq!(field.height, 6);
    }

    #[test]
    fn constant_noise_sums_amplitudes() {
        // eval = 1 -> every octave contributes +amplitude
        let cfg = TerrainConfig {
            persistence: 0.5,
            ..config(3)
        };
        let offsets = OctaveOffsets::from_seed(0, 3, DVec2::ZERO);
        let noise = |_: f64, _: f64| 1.0;
        let sampler = FractalSampler::new(&cfg, &offsets, &noise).unwrap();
        assert!((sampler.sample_centered(3.0, -2.0) - 1.75).abs() < 1e-12);
    }

    #[test]
    fn zero_octaves_is_flat_zero() {
        let cfg = config(0);
        let offsets = OctaveOffsets::from_seed(0, 0, DVec2::ZERO);
        let noise = |x: f64, _: f64| x;
        let field = FractalSampler::new(&cfg, &offsets, &noise)
            .unwrap()
            .sample(None)
            .unwrap();
        assert!(field.values.iter().all(|&v| v == 0.0));
        assert_eq!((field.min, field.max), (0.0, 0.0));
    }

    #[test]
    fn tracked_extrema_match_values() {
        let cfg = config(4);
        let offsets = OctaveOffsets::from_seed(11, 4, DVec2::ZERO);
        let noise = |x: f64, y: f64| ((x * 0.7).sin() * (y * 1.3).cos() + 1.0) / 2.0;
        let field = FractalSampler::new(&cfg, &offsets, &noise)
            .unwrap()
            .sample(None)
            .unwrap();
        let mut copy = field.clone();
        copy.retrack();
        assert_eq!(copy.min, field.min);
        assert_eq!(copy.max, field.max);
    }

    #[test]
    fn cancelled_before_start_returns_error() {
        let cfg = config(2);
        let offsets = OctaveOffsets::from_seed(0, 2, DVec2::ZERO);
        let noise = |_: f64, _: f64| 0.5;
        let cancel = Cancellation::new();
        cancel.cancel();
        let res = FractalSampler::new(&cfg, &offsets, &noise)
            .unwrap()
            .sample(Some(&cancel));
        assert_eq!(res, Err(TerrainError::Cancelled));
    }

    #[test]
    fn sampler_rejects_bad_grid_sizes() {
        let offsets = OctaveOffsets::from_seed(0, 1, DVec2::ZERO);
        let noise = |_: f64, _: f64| 0.5;
        let cfg = TerrainConfig {
            width: 0,
            ..config(1)
        };
        assert_eq!(
            FractalSampler::new(&cfg, &offsets, &noise).err(),
            Some(TerrainError::InvalidDimensions {
                width: 0,
                height: 6
            })
        );
        let cfg = TerrainConfig {
            width: usize::MAX,
            height: 2,
            ..config(1)
        };
        assert!(matches!(
            FractalSampler::new(&cfg, &offsets, &noise).err(),
            Some(TerrainError::GridTooLarge { .. })
        ));
    }

    #[test]
    fn check_shape_catches_mismatched_buffers() {
        let mut field = RawField {
            width: 3,
            height: 2,
            values: vec![0.0; 6],
            min: 0.0,
            max: 0.0,
        };
        assert!(field.check_shape().is_ok());
        field.values.pop();
        assert_eq!(
            field.check_shape(),
            Err(TerrainError::FieldShapeMismatch {
                width: 3,
                height: 2,
                len: 5
            })
        );
        field.width = 0;
        assert!(matches!(
            field.check_shape(),
            Err(TerrainError::InvalidDimensions { .. })
        ));
    }

    #[test]
    fn amplitudes_strictly_decrease() {
        let amps = octave_amplitudes(0.5, 6);
        assert_eq!(amps[0], 1.0);
        assert!(amps.windows(2).all(|w| w[1] < w[0]));
        assert_eq!(amps[5], 0.03125);
    }
}
