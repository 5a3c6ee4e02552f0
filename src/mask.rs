/**
 * Threshold Masking
 *
 * Removes stipples wherever a selection mask is dark, leaving only the dots
 * that fall on the light parts of the mask.
 */

use crate::grid::{Grid, Result};

/// Default mask threshold
pub const DEFAULT_MASK_THRESHOLD: f32 = 0.5;

/// Remove stipples wherever the mask is dark
///
/// Returns a copy of `stipple` with every cell where `mask < threshold` set
/// to 1.0 (background). Cells where the mask is at or above the threshold
/// keep their stipple value. The two grids must have the same shape.
pub fn apply_mask(stipple: &Grid, mask: &Grid, threshold: f32) -> Result<Grid> {
    stipple.ensure_same_shape(mask)?;

    let mut masked = stipple.clone();
    for (out, &m) in masked.as_mut_slice().iter_mut().zip(mask.as_slice()) {
        if m < threshold {
            *out = 1.0;
        }
    }

    Ok(masked)
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::grid::GridError;

    #[test]
    fn test_left_half_masked_out() {
        let stipple = Grid::zeros(10, 10);
        let mask = Grid::from_fn(10, 10, |_, c| if c < 5 { 0.0 } else { 1.0 });

        let masked = apply_mask(&stipple, &mask, 0.5).unwrap();

        for row in 0..10 {
            for col in 0..10 {
                let expected = if col < 5 { 1.0 } else { 0.0 };
                assert_eq!(masked.get(row, col), expected, "cell ({row}, {col})");
            }
        }
    }

    #[test]
    fn test_threshold_is_exclusive() {
        let stipple = Grid::zeros(1, 3);
        let mask = Grid::from_vec(1, 3, vec![0.49, 0.5, 0.51]).unwrap();

        let masked = apply_mask(&stipple, &mask, DEFAULT_MASK_THRESHOLD).unwrap();
        assert_eq!(masked.as_slice(), &[1.0, 0.0, 0.0]);
    }

    #[test]
    fn test_background_untouched() {
        let stipple = Grid::filled(4, 4, 1.0);
        let mask = Grid::zeros(4, 4);
        let masked = apply_mask(&stipple, &mask, 0.5).unwrap();
        assert_eq!(masked, stipple);
    }

    #[test]
    fn test_shape_mismatch() {
        let stipple = Grid::zeros(10, 10);
        let mask = Grid::zeros(10, 8);
        let err = apply_mask(&stipple, &mask, 0.5).unwrap_err();
        assert!(matches!(
            err,
            GridError::ShapeMismatch {
                expected: (10, 10),
                actual: (10, 8)
            }
        ));
    }
}
