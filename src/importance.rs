/**
 * Importance Map
 *
 * Converts a grayscale grid into a per-pixel weight in [0, 1] describing how
 * strongly each location should attract stipples.
 *
 * Darker pixels start out more important (the map is built from the inverted
 * intensity), but pure blacks and pure whites are softly downweighted so they
 * do not swallow the whole point budget, and mid-tones around 0.65 receive a
 * Gaussian boost. The result is min-max normalised.
 */

use crate::grid::Grid;

/// Tunable parameters for [`compute_importance`]
#[derive(Debug, Clone, Copy, PartialEq)]
pub struct ImportanceParams {
    /// Strength of the extreme-tone downweighting (0 = off, 1 = maximum)
    pub extreme_downweight: f32,
    /// Intensities below this count as "very dark"
    pub extreme_threshold_low: f32,
    /// Intensities above this count as "very light"
    pub extreme_threshold_high: f32,
    /// Width of the extreme-tone transition (smaller = sharper)
    pub extreme_sigma: f32,
    /// Strength of the mid-tone emphasis (0 = off)
    pub mid_tone_boost: f32,
    /// Width of the mid-tone bump
    pub mid_tone_sigma: f32,
    /// Intensity at which the mid-tone bump peaks
    pub mid_tone_center: f32,
}

impl Default for ImportanceParams {
    fn default() -> Self {
        Self {
            extreme_downweight: 0.5,
            extreme_threshold_low: 0.4,
            extreme_threshold_high: 0.8,
            extreme_sigma: 0.1,
            mid_tone_boost: 0.4,
            mid_tone_sigma: 0.2,
            mid_tone_center: 0.65,
        }
    }
}

/// Unnormalised Gaussian bump evaluated at `value`
#[inline]
fn gaussian(value: f32, center: f32, sigma: f32) -> f32 {
    let d = value - center;
    (-(d * d) / (2.0 * sigma * sigma)).exp()
}

/// Rescale so the largest value is 1, unless every value is zero
fn normalize_by_max(values: &mut [f32]) {
    let max = values.iter().copied().fold(0.0f32, f32::max);
    if max > 0.0 {
        for v in values.iter_mut() {
            *v /= max;
        }
    }
}

/**
 * Compute the importance map of a grayscale grid
 *
 * Steps, all pointwise on the clipped intensity `I`:
 * 1. `inverted = 1 - I`
 * 2. dark bump (centred at 0, zero where `I >= low`), max-normalised
 * 3. light bump (centred at 1, zero where `I <= high`), max-normalised
 * 4. `importance = inverted * (1 - downweight * max(dark, light))`
 * 5. mid-tone bump (centred at `mid_tone_center`), max-normalised
 * 6. `importance *= 1 + mid_tone_boost * mid`
 * 7. min-max normalisation, skipped for a constant field
 */
pub fn compute_importance(gray: &Grid, params: &ImportanceParams) -> Grid {
    let input = gray.clipped();
    let values = input.as_slice();

    let mut dark: Vec<f32> = values
        .iter()
        .map(|&v| {
            if v < params.extreme_threshold_low {
                gaussian(v, 0.0, params.extreme_sigma)
            } else {
                0.0
            }
        })
        .collect();
    normalize_by_max(&mut dark);

    let mut light: Vec<f32> = values
        .iter()
        .map(|&v| {
            if v > params.extreme_threshold_high {
                gaussian(v, 1.0, params.extreme_sigma)
            } else {
                0.0
            }
        })
        .collect();
    normalize_by_max(&mut light);

    let mut mid: Vec<f32> = values
        .iter()
        .map(|&v| gaussian(v, params.mid_tone_center, params.mid_tone_sigma))
        .collect();
    normalize_by_max(&mut mid);

    let mut importance: Vec<f32> = values
        .iter()
        .enumerate()
        .map(|(i, &v)| {
            let extreme = dark[i].max(light[i]);
            let base = (1.0 - v) * (1.0 - params.extreme_downweight * extreme);
            base * (1.0 + params.mid_tone_boost * mid[i])
        })
        .collect();

    let min = importance.iter().copied().fold(f32::INFINITY, f32::min);
    let max = importance.iter().copied().fold(f32::NEG_INFINITY, f32::max);
    if max > min {
        let range = max - min;
        for v in importance.iter_mut() {
            *v = (*v - min) / range;
        }
    }

    Grid::from_raw_parts(input.height(), input.width(), importance)
}

#[cfg(test)]
mod tests {
    use super::*;

    fn ramp(height: usize, width: usize) -> Grid {
        let n = (height * width - 1).max(1) as f32;
        Grid::from_fn(height, width, |r, c| (r * width + c) as f32 / n)
    }

    #[test]
    fn test_default_params() {
        let params = ImportanceParams::default();
        assert_eq!(params.extreme_downweight, 0.5);
        assert_eq!(params.extreme_threshold_low, 0.4);
        assert_eq!(params.extreme_threshold_high, 0.8);
        assert_eq!(params.extreme_sigma, 0.1);
        assert_eq!(params.mid_tone_boost, 0.4);
        assert_eq!(params.mid_tone_sigma, 0.2);
        assert_eq!(params.mid_tone_center, 0.65);
    }

    #[test]
    fn test_constant_inputs_stay_constant() {
        for value in [0.0, 1.0, 0.5] {
            let gray = Grid::filled(16, 12, value);
            let importance = compute_importance(&gray, &ImportanceParams::default());

            let first = importance.get(0, 0);
            assert!(first.is_finite());
            assert!(importance.as_slice().iter().all(|&v| v == first));
        }
    }

    #[test]
    fn test_output_in_unit_range() {
        let gray = ramp(32, 32);
        let param_sets = [
            ImportanceParams::default(),
            ImportanceParams {
                extreme_downweight: 1.0,
                mid_tone_boost: 1.0,
                ..Default::default()
            },
            ImportanceParams {
                extreme_downweight: 0.0,
                mid_tone_boost: 0.0,
                extreme_sigma: 0.3,
                mid_tone_sigma: 0.05,
                ..Default::default()
            },
        ];

        for params in &param_sets {
            let importance = compute_importance(&gray, params);
            for &v in importance.as_slice() {
                assert!((0.0..=1.0).contains(&v), "value {v} out of range");
            }
            assert_eq!(importance.min(), Some(0.0));
            assert!((importance.max().unwrap() - 1.0).abs() < 1e-6);
        }
    }

    #[test]
    fn test_out_of_range_input_is_clipped() {
        let gray = Grid::from_vec(1, 4, vec![-1.0, 0.0, 1.0, 2.0]).unwrap();
        let importance = compute_importance(&gray, &ImportanceParams::default());
        assert_eq!(importance.get(0, 0), importance.get(0, 1));
        assert_eq!(importance.get(0, 2), importance.get(0, 3));
    }

    #[test]
    fn test_plain_inversion_without_shaping() {
        let params = ImportanceParams {
            extreme_downweight: 0.0,
            mid_tone_boost: 0.0,
            ..Default::default()
        };
        let gray = Grid::from_vec(1, 3, vec![0.0, 0.5, 1.0]).unwrap();
        let importance = compute_importance(&gray, &params);
        assert_eq!(importance.as_slice(), &[1.0, 0.5, 0.0]);
    }

    #[test]
    fn test_mid_tones_outrank_pure_black() {
        // Black is downweighted by half, 0.35 sits inside the mid-tone bump.
        let gray = Grid::from_vec(1, 3, vec![0.0, 0.35, 1.0]).unwrap();
        let importance = compute_importance(&gray, &ImportanceParams::default());
        assert!(importance.get(0, 1) > importance.get(0, 0));
        assert_eq!(importance.get(0, 2), 0.0);
    }

    #[test]
    fn test_shape_preserved() {
        let gray = ramp(7, 13);
        let importance = compute_importance(&gray, &ImportanceParams::default());
        assert_eq!(importance.shape(), (7, 13));
    }
}
