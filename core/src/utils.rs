use rayon::prelude::*;

use crate::error::Result;
use crate::fractal2::RawField;

// Value every cell takes when the field has no range to stretch
pub const FLAT_FIELD_LEVEL: f64 = 0.5;

/// Stretch a raw field onto [0, 1] in place using its tracked extrema.
///
/// The minimum maps to exactly 0 and the maximum to exactly 1. A flat field
/// (`max == min`) cannot be stretched; every cell becomes
/// [`FLAT_FIELD_LEVEL`] and `true` is returned to flag it degenerate.
pub fn normalize2(field: &mut RawField) -> Result<bool> {
    field.check_shape()?;
    let (min, max) = (field.min, field.max);

    let range = max - min;
    // also catches NaN extrema from a misbehaving noise source
    if !range.is_finite() || range <= 0.0 {
        log::warn!(
            "degenerate {}x{} field (min {min}, max {max}), using constant {FLAT_FIELD_LEVEL}",
            field.width,
            field.height
        );
        field.values.fill(FLAT_FIELD_LEVEL);
        field.min = FLAT_FIELD_LEVEL;
        field.max = FLAT_FIELD_LEVEL;
        return Ok(true);
    }

    field
        .values
        .par_iter_mut()
        .for_each(|v| *v = ((*v - min) / range).clamp(0.0, 1.0));
    field.min = 0.0;
    field.max = 1.0;
    Ok(false)
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::error::TerrainError;

    fn raw(values: Vec<f64>) -> RawField {
        let mut f = RawField {
            width: values.len(),
            height: 1,
            values,
            min: 0.0,
            max: 0.0,
        };
        f.retrack();
        f
    }

    #[test]
    fn normalize2_hits_both_ends() {
        let mut f = raw(vec![-3.0, -1.0, 0.5, 2.0]);
        assert_eq!(normalize2(&mut f), Ok(false));
        assert_eq!(f.values, [0.0, 0.4, 0.7, 1.0]);
        assert_eq!((f.min, f.max), (0.0, 1.0));
    }

    #[test]
    fn flat_field_becomes_constant_half() {
        let mut f = raw(vec![0.25; 9]);
        assert_eq!(normalize2(&mut f), Ok(true));
        assert!(f.values.iter().all(|&v| v == FLAT_FIELD_LEVEL));
    }

    #[test]
    fn nan_extrema_treated_as_flat() {
        let mut f = RawField {
            width: 2,
            height: 1,
            values: vec![f64::NAN, 1.0],
            min: f64::NAN,
            max: 1.0,
        };
        assert_eq!(normalize2(&mut f), Ok(true));
        assert!(f.values.iter().all(|v| v.is_finite()));
    }

    #[test]
    fn mismatched_buffer_is_left_untouched() {
        let mut f = RawField {
            width: 3,
            height: 3,
            values: vec![-1.0, 1.0],
            min: -1.0,
            max: 1.0,
        };
        assert_eq!(
            normalize2(&mut f),
            Err(TerrainError::FieldShapeMismatch {
                width: 3,
                height: 3,
                len: 2
            })
        );
        assert_eq!(f.values, [-1.0, 1.0]);
    }
}
