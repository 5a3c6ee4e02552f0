/**
 * Toroidal Gaussian Repulsion Kernel
 *
 * The kernel is a periodic 2D Gaussian centred at the grid origin (0, 0).
 * Distances wrap around at the edges (torus topology), so repulsion applied
 * near one border also suppresses selection near the opposite border and the
 * stipple spacing has no edge bias.
 */

use crate::grid::{Grid, Result};

/// Wraparound distance from `index` to 0 on an axis of length `len`
#[inline]
fn toroidal_distance(index: usize, len: usize) -> usize {
    index.min(len - index)
}

/**
 * Build a normalised H×W periodic Gaussian kernel centred at (0, 0)
 *
 * Each cell holds `exp(-d² / (2σ²))` where `d` is the toroidal Euclidean
 * distance to the origin. The kernel is divided by its sum so the total mass
 * is 1; the division is skipped if the sum is zero. `sigma` must be positive.
 */
pub fn toroidal_gaussian_kernel(height: usize, width: usize, sigma: f32) -> Grid {
    let divisor = 2.0 * sigma * sigma;

    let mut kernel = Grid::from_fn(height, width, |row, col| {
        let dy = toroidal_distance(row, height) as f32;
        let dx = toroidal_distance(col, width) as f32;
        (-(dx * dx + dy * dy) / divisor).exp()
    });

    let sum = kernel.sum();
    if sum > 0.0 {
        let sum = sum as f32;
        for v in kernel.as_mut_slice() {
            *v /= sum;
        }
    }

    kernel
}

/**
 * Add `kernel`, toroidally shifted so its origin lands on `(row, col)`, into
 * `energy`
 *
 * Equivalent to rolling the kernel by `row` along the rows and `col` along the
 * columns and adding the rolled copy, but indexes the kernel directly instead
 * of materialising the shifted copy.
 */
pub fn splat(energy: &mut Grid, kernel: &Grid, row: usize, col: usize) -> Result<()> {
    energy.ensure_same_shape(kernel)?;

    let (height, width) = kernel.shape();
    let src = kernel.as_slice();
    let dst = energy.as_mut_slice();

    for r in 0..height {
        let kr = (r + height - row) % height;
        let dst_row = &mut dst[r * width..(r + 1) * width];
        let src_row = &src[kr * width..(kr + 1) * width];

        // Columns from `col` onwards read the kernel from 0; the rest wrap.
        let (head, tail) = dst_row.split_at_mut(col);
        for (d, s) in tail.iter_mut().zip(&src_row[..width - col]) {
            *d += *s;
        }
        for (d, s) in head.iter_mut().zip(&src_row[width - col..]) {
            *d += *s;
        }
    }

    Ok(())
}

#[cfg(test)]
mod tests {
    use super::*;

    /// Shift-and-add reference using an explicitly rolled copy
    fn rolled(kernel: &Grid, row: usize, col: usize) -> Grid {
        let (h, w) = kernel.shape();
        Grid::from_fn(h, w, |r, c| kernel.get((r + h - row) % h, (c + w - col) % w))
    }

    #[test]
    fn test_toroidal_distance() {
        assert_eq!(toroidal_distance(0, 10), 0);
        assert_eq!(toroidal_distance(3, 10), 3);
        assert_eq!(toroidal_distance(5, 10), 5);
        assert_eq!(toroidal_distance(9, 10), 1);
    }

    #[test]
    fn test_kernel_sums_to_one() {
        for &(h, w, sigma) in &[(16, 16, 0.9), (37, 21, 1.9), (100, 100, 0.9), (5, 64, 4.0)] {
            let kernel = toroidal_gaussian_kernel(h, w, sigma);
            assert_eq!(kernel.shape(), (h, w));
            assert!((kernel.sum() - 1.0).abs() < 1e-5, "sum {}", kernel.sum());
        }
    }

    #[test]
    fn test_kernel_peak_at_origin() {
        let kernel = toroidal_gaussian_kernel(20, 30, 1.5);
        let max = kernel.max().unwrap();
        assert_eq!(kernel.get(0, 0), max);
        assert!(kernel.get(10, 15) < kernel.get(1, 1));
    }

    #[test]
    fn test_kernel_toroidal_symmetry() {
        let (h, w) = (13, 18);
        let kernel = toroidal_gaussian_kernel(h, w, 2.2);
        for i in 0..h {
            for j in 0..w {
                assert_eq!(kernel.get(i, j), kernel.get((h - i) % h, (w - j) % w));
            }
        }
    }

    #[test]
    fn test_kernel_wraps_across_edges() {
        let kernel = toroidal_gaussian_kernel(10, 10, 1.0);
        assert_eq!(kernel.get(0, 1), kernel.get(0, 9));
        assert_eq!(kernel.get(1, 0), kernel.get(9, 0));
        assert_eq!(kernel.get(1, 1), kernel.get(9, 9));
    }

    #[test]
    fn test_splat_matches_rolled_copy() {
        let kernel = toroidal_gaussian_kernel(9, 14, 1.3);
        let base = Grid::from_fn(9, 14, |r, c| (r as f32 * 0.1) - (c as f32 * 0.05));

        for &(row, col) in &[(0, 0), (4, 7), (8, 13), (0, 13), (8, 0)] {
            let mut energy = base.clone();
            splat(&mut energy, &kernel, row, col).unwrap();

            let shifted = rolled(&kernel, row, col);
            for (i, (&e, (&b, &s))) in energy
                .as_slice()
                .iter()
                .zip(base.as_slice().iter().zip(shifted.as_slice()))
                .enumerate()
            {
                assert_eq!(e, b + s, "cell {i} differs for splat at ({row}, {col})");
            }
        }
    }

    #[test]
    fn test_splat_peak_lands_on_target() {
        let kernel = toroidal_gaussian_kernel(12, 12, 1.0);
        let mut energy = Grid::zeros(12, 12);
        splat(&mut energy, &kernel, 3, 10).unwrap();

        assert_eq!(energy.get(3, 10), kernel.get(0, 0));
        assert_eq!(energy.get(3, 11), energy.get(3, 9));
        // Wraps past the right edge
        assert_eq!(energy.get(3, 0), kernel.get(0, 2));
    }

    #[test]
    fn test_splat_rejects_shape_mismatch() {
        let kernel = toroidal_gaussian_kernel(8, 8, 1.0);
        let mut energy = Grid::zeros(8, 9);
        assert!(splat(&mut energy, &kernel, 0, 0).is_err());
    }
}
