use rayon::prelude::*;

use crate::config::{FalloffBaseline, FalloffConfig, FalloffReach};
use crate::error::Result;
use crate::fractal2::RawField;

/// Radial attenuation that turns an open noise field into an island.
///
/// Elevation is measured from the baseline and scaled by
/// `max(0, 1 - d / max_distance) ^ exponent`. With the default
/// [`FalloffBaseline::Floor`] the baseline is the raw minimum, so the boundary
/// sinks to the floor no matter what sign the noise had there.
#[derive(Debug, Clone, Copy, PartialEq)]
pub struct FalloffShaper {
    exponent: f64,
    reach: FalloffReach,
    baseline: FalloffBaseline,
    invert: bool,
}

impl FalloffShaper {
    pub fn new(config: &FalloffConfig) -> Self {
        Self {
            exponent: config.exponent,
            reach: config.reach,
            baseline: config.baseline,
            invert: config.invert,
        }
    }

    /// Distance at which the gradient reaches zero for a `width` x `height` grid.
    pub fn max_distance(&self, width: usize, height: usize) -> f64 {
        let half_w = width as f64 / 2.0;
        let half_h = height as f64 / 2.0;
        match self.reach {
            FalloffReach::Corner => (half_w * half_w + half_h * half_h).sqrt(),
            FalloffReach::Edge => half_w.max(half_h),
        }
    }

    /// Shaping factor in [0, 1] for cell `(x, y)`.
    pub fn gradient(&self, x: usize, y: usize, width: usize, height: usize) -> f64 {
        let dx = x as f64 - width as f64 / 2.0;
        let dy = y as f64 - height as f64 / 2.0;
        let distance = (dx * dx + dy * dy).sqrt();
        let linear = (1.0 - distance / self.max_distance(width, height)).max(0.0);
        if self.exponent == 1.0 {
            linear
        } else {
            linear.powf(self.exponent)
        }
    }

    /// Shape the field in place and re-track its extrema.
    pub fn apply(&self, field: &mut RawField) -> Result<()> {
        field.check_shape()?;
        let (width, height) = (field.width, field.height);
        let floor = match self.baseline {
            FalloffBaseline::Floor => field.min,
            FalloffBaseline::Zero => 0.0,
        };
        let sign = if self.invert { -1.0 } else { 1.0 };

        field
            .values
            .par_chunks_mut(width)
            .enumerate()
            .for_each(|(y, row)| {
                for (x, cell) in row.iter_mut().enumerate() {
                    *cell = sign * (*cell - floor) * self.gradient(x, y, width, height);
                }
            });

        field.retrack();
        Ok(())
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::error::TerrainError;

    fn field(width: usize, height: usize, values: Vec<f64>) -> RawField {
        let mut f = RawField {
            width,
            height,
            values,
            min: 0.0,
            max: 0.0,
        };
        f.retrack();
        f
    }

    #[test]
    fn gradient_is_one_at_center_and_zero_at_origin_corner() {
        let shaper = FalloffShaper::new(&FalloffConfig::default());
        assert_eq!(shaper.gradient(5, 5, 10, 10), 1.0);
        assert_eq!(shaper.gradient(0, 0, 10, 10), 0.0);
        let g = shaper.gradient(9, 9, 10, 10);
        assert!(g > 0.0 && g < 0.25);
    }

    #[test]
    fn edge_reach_clamps_corners() {
        let shaper = FalloffShaper::new(&FalloffConfig {
            reach: FalloffReach::Edge,
            ..Default::default()
        });
        assert_eq!(shaper.max_distance(10, 6), 5.0);
        // corner lies beyond the edge radius
        assert_eq!(shaper.gradient(0, 0, 10, 6), 0.0);
        assert_eq!(shaper.gradient(9, 0, 10, 6), 0.0);
        assert_eq!(shaper.gradient(0, 3, 10, 6), 0.0);
        assert!(shaper.gradient(9, 5, 10, 6) > 0.0);
    }

    #[test]
    fn squared_exponent_is_sharper() {
        let linear = FalloffShaper::new(&FalloffConfig::default());
        let squared = FalloffShaper::new(&FalloffConfig {
            exponent: 2.0,
            ..Default::default()
        });
        let a = linear.gradient(2, 3, 10, 10);
        let b = squared.gradient(2, 3, 10, 10);
        assert!((b - a * a).abs() < 1e-12);
        assert!(b < a);
    }

    #[test]
    fn apply_pins_origin_corner_to_floor() {
        // negative everywhere: plain multiplication would push the boundary up
        let mut f = field(4, 4, vec![-0.8; 16]);
        f.values[10] = -0.2;
        FalloffShaper::new(&FalloffConfig::default()).apply(&mut f).unwrap();
        assert_eq!(f.get(0, 0), 0.0);
        assert_eq!(f.min, 0.0);
        assert!(f.max > 0.0);
        assert!(f.values.iter().all(|&v| v >= 0.0));
    }

    #[test]
    fn invert_flips_boundary_to_maximum() {
        let mut f = field(4, 4, (0..16).map(|i| i as f64 * 0.1).collect());
        FalloffShaper::new(&FalloffConfig {
            invert: true,
            ..Default::default()
        })
        .apply(&mut f)
        .unwrap();
        assert_eq!(f.get(0, 0), 0.0);
        assert_eq!(f.max, 0.0);
        assert!(f.min < 0.0);
    }

    #[test]
    fn zero_baseline_scales_raw_values_directly() {
        let values: Vec<f64> = (0..16).map(|i| i as f64 * 0.1 - 0.8).collect();
        let mut f = field(4, 4, values.clone());
        let shaper = FalloffShaper::new(&FalloffConfig {
            baseline: FalloffBaseline::Zero,
            ..Default::default()
        });
        shaper.apply(&mut f).unwrap();
        for y in 0..4 {
            for x in 0..4 {
                let want = values[y * 4 + x] * shaper.gradient(x, y, 4, 4);
                assert_eq!(f.get(x, y), want);
            }
        }
        // signed input: the origin corner lands on 0, above the shaped minimum
        assert_eq!(f.get(0, 0), 0.0);
        assert!(f.min < 0.0);
    }

    #[test]
    fn malformed_field_is_rejected() {
        let shaper = FalloffShaper::new(&FalloffConfig::default());
        let mut f = RawField {
            width: 0,
            height: 4,
            values: vec![1.0; 4],
            min: 1.0,
            max: 1.0,
        };
        assert!(shaper.apply(&mut f).is_err());
        f.width = 3;
        assert_eq!(
            shaper.apply(&mut f),
            Err(TerrainError::FieldShapeMismatch {
                width: 3,
                height: 4,
                len: 4
            })
        );
        assert_eq!(f.values, vec![1.0; 4]);
    }
}
