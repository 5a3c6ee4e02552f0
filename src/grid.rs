/**
 * Row-major Scalar Grid
 *
 * Every stage of the stippling pipeline exchanges dense H×W grids of `f32`
 * values: the grayscale input, the importance map, the repulsion kernel, the
 * energy field and the binary stipple image. This module holds the shared
 * container plus loading from and saving to image files.
 *
 * Values are conventionally in [0, 1] where 0.0 is black and 1.0 is white.
 */

use image::{imageops::FilterType, GrayImage, ImageBuffer, Luma};
use std::path::Path;
use thiserror::Error;

/// Error types for grid construction and I/O
#[derive(Error, Debug)]
pub enum GridError {
    /// Two grids that must line up have different shapes
    #[error("Shape mismatch: expected {expected:?} (height, width), got {actual:?}")]
    ShapeMismatch {
        /// Shape of the reference grid
        expected: (usize, usize),
        /// Shape of the offending grid
        actual: (usize, usize),
    },

    /// Height or width is zero
    #[error("Height and width must be positive")]
    InvalidDimensions,

    /// Backing buffer does not hold height × width values
    #[error("Data length {len} does not match {height}×{width}")]
    DataLength {
        /// Number of values supplied
        len: usize,
        /// Requested height
        height: usize,
        /// Requested width
        width: usize,
    },

    /// Failed to load or save an image
    #[error("Image error: {0}")]
    Image(#[from] image::ImageError),

    /// Failed to write a text output
    #[error("I/O error: {0}")]
    Io(#[from] std::io::Error),
}

/// Result type for grid operations
pub type Result<T> = std::result::Result<T, GridError>;

/// Dense row-major 2D grid of `f32` values
#[derive(Debug, Clone, PartialEq)]
pub struct Grid {
    data: Vec<f32>,
    height: usize,
    width: usize,
}

impl Grid {
    /// Create a grid filled with a single value
    pub fn filled(height: usize, width: usize, value: f32) -> Self {
        Self {
            data: vec![value; height * width],
            height,
            width,
        }
    }

    /// Create a grid of zeros
    pub fn zeros(height: usize, width: usize) -> Self {
        Self::filled(height, width, 0.0)
    }

    /// Wrap an existing row-major buffer
    pub fn from_vec(height: usize, width: usize, data: Vec<f32>) -> Result<Self> {
        if data.len() != height * width {
            return Err(GridError::DataLength {
                len: data.len(),
                height,
                width,
            });
        }
        Ok(Self {
            data,
            height,
            width,
        })
    }

    /// Wrap a buffer whose length is already known to be `height * width`
    pub(crate) fn from_raw_parts(height: usize, width: usize, data: Vec<f32>) -> Self {
        debug_assert_eq!(data.len(), height * width);
        Self {
            data,
            height,
            width,
        }
    }

    /// Build a grid by evaluating `f(row, col)` for every cell
    pub fn from_fn<F>(height: usize, width: usize, mut f: F) -> Self
    where
        F: FnMut(usize, usize) -> f32,
    {
        let mut data = Vec::with_capacity(height * width);
        for row in 0..height {
            for col in 0..width {
                data.push(f(row, col));
            }
        }
        Self {
            data,
            height,
            width,
        }
    }

    /// Number of rows
    pub fn height(&self) -> usize {
        self.height
    }

    /// Number of columns
    pub fn width(&self) -> usize {
        self.width
    }

    /// Shape as `(height, width)`
    pub fn shape(&self) -> (usize, usize) {
        (self.height, self.width)
    }

    /// Total number of cells
    pub fn len(&self) -> usize {
        self.data.len()
    }

    /// True when the grid has no cells
    pub fn is_empty(&self) -> bool {
        self.data.is_empty()
    }

    /// Row-major view of the values
    pub fn as_slice(&self) -> &[f32] {
        &self.data
    }

    /// Mutable row-major view of the values
    pub fn as_mut_slice(&mut self) -> &mut [f32] {
        &mut self.data
    }

    /// Value at `(row, col)`
    #[inline]
    pub fn get(&self, row: usize, col: usize) -> f32 {
        self.data[row * self.width + col]
    }

    /// Overwrite the value at `(row, col)`
    #[inline]
    pub fn set(&mut self, row: usize, col: usize, value: f32) {
        self.data[row * self.width + col] = value;
    }

    /// Apply `f` to every value, producing a new grid of the same shape
    pub fn map<F>(&self, f: F) -> Self
    where
        F: Fn(f32) -> f32,
    {
        Self {
            data: self.data.iter().map(|&v| f(v)).collect(),
            height: self.height,
            width: self.width,
        }
    }

    /// Copy with every value clamped to [0, 1]
    pub fn clipped(&self) -> Self {
        self.map(|v| v.clamp(0.0, 1.0))
    }

    /// Smallest value, or `None` for an empty grid
    pub fn min(&self) -> Option<f32> {
        self.data.iter().copied().reduce(f32::min)
    }

    /// Largest value, or `None` for an empty grid
    pub fn max(&self) -> Option<f32> {
        self.data.iter().copied().reduce(f32::max)
    }

    /// Sum of all values, accumulated in double precision
    pub fn sum(&self) -> f64 {
        self.data.iter().map(|&v| v as f64).sum()
    }

    /// Fail with [`GridError::ShapeMismatch`] unless `other` has this shape
    pub fn ensure_same_shape(&self, other: &Grid) -> Result<()> {
        if self.shape() != other.shape() {
            return Err(GridError::ShapeMismatch {
                expected: self.shape(),
                actual: other.shape(),
            });
        }
        Ok(())
    }

    /// Convert an 8-bit grayscale image to a grid in [0, 1]
    pub fn from_luma(img: &GrayImage) -> Self {
        let (width, height) = img.dimensions();
        Self {
            data: img.as_raw().iter().map(|&v| v as f32 / 255.0).collect(),
            height: height as usize,
            width: width as usize,
        }
    }

    /// Convert to an 8-bit grayscale image (values clamped to [0, 1])
    pub fn to_luma(&self) -> GrayImage {
        ImageBuffer::from_fn(self.width as u32, self.height as u32, |x, y| {
            Luma([to_u8(self.get(y as usize, x as usize))])
        })
    }

    /**
     * Load an image file as a grayscale grid
     *
     * Any format the `image` crate decodes is accepted; colour images are
     * converted to luma. When `width` is given the image is resized with
     * Lanczos3 to that width, keeping the aspect ratio.
     */
    pub fn load<P: AsRef<Path>>(path: P, width: Option<u32>) -> Result<Self> {
        let mut img = image::open(path)?;

        if let Some(width) = width {
            img = img.resize(width, u32::MAX, FilterType::Lanczos3);
        }

        let gray = img.to_luma8();
        let (w, h) = gray.dimensions();
        if w == 0 || h == 0 {
            return Err(GridError::InvalidDimensions);
        }

        Ok(Self::from_luma(&gray))
    }

    /// Save the grid as an 8-bit grayscale PNG
    pub fn save_png<P: AsRef<Path>>(&self, path: P) -> Result<()> {
        self.to_luma().save(path)?;
        Ok(())
    }
}

/// Map a [0, 1] value to a byte
#[inline]
pub(crate) fn to_u8(value: f32) -> u8 {
    (value.clamp(0.0, 1.0) * 255.0).round() as u8
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_from_vec_length_checked() {
        assert!(Grid::from_vec(2, 3, vec![0.0; 6]).is_ok());

        let err = Grid::from_vec(2, 3, vec![0.0; 5]).unwrap_err();
        assert!(matches!(err, GridError::DataLength { len: 5, .. }));
    }

    #[test]
    fn test_row_major_layout() {
        let grid = Grid::from_fn(2, 3, |r, c| (r * 10 + c) as f32);
        assert_eq!(grid.as_slice(), &[0.0, 1.0, 2.0, 10.0, 11.0, 12.0]);
        assert_eq!(grid.get(1, 2), 12.0);
        assert_eq!(grid.shape(), (2, 3));
    }

    #[test]
    fn test_from_raw_parts_matches_from_vec() {
        let data = vec![0.1, 0.2, 0.3, 0.4, 0.5, 0.6];
        let raw = Grid::from_raw_parts(3, 2, data.clone());
        assert_eq!(raw, Grid::from_vec(3, 2, data).unwrap());
        assert_eq!(raw.get(2, 1), 0.6);
    }

    #[test]
    fn test_clipped() {
        let grid = Grid::from_vec(1, 4, vec![-0.5, 0.25, 1.0, 3.0]).unwrap();
        assert_eq!(grid.clipped().as_slice(), &[0.0, 0.25, 1.0, 1.0]);
    }

    #[test]
    fn test_min_max_sum() {
        let grid = Grid::from_vec(2, 2, vec![0.5, -1.0, 2.0, 0.5]).unwrap();
        assert_eq!(grid.min(), Some(-1.0));
        assert_eq!(grid.max(), Some(2.0));
        assert!((grid.sum() - 2.0).abs() < 1e-12);

        let empty = Grid::zeros(0, 0);
        assert!(empty.is_empty());
        assert_eq!(empty.min(), None);
    }

    #[test]
    fn test_shape_mismatch_names_both_shapes() {
        let a = Grid::zeros(4, 5);
        let b = Grid::zeros(5, 4);
        let err = a.ensure_same_shape(&b).unwrap_err();
        let msg = err.to_string();
        assert!(msg.contains("(4, 5)"), "{msg}");
        assert!(msg.contains("(5, 4)"), "{msg}");
        assert!(a.ensure_same_shape(&Grid::zeros(4, 5)).is_ok());
    }

    #[test]
    fn test_luma_conversion() {
        let grid = Grid::from_vec(1, 3, vec![0.0, 0.5, 1.0]).unwrap();
        let img = grid.to_luma();
        assert_eq!(img.dimensions(), (3, 1));
        assert_eq!(img.as_raw(), &vec![0u8, 128, 255]);

        let back = Grid::from_luma(&img);
        assert_eq!(back.get(0, 0), 0.0);
        assert_eq!(back.get(0, 2), 1.0);
    }

    #[test]
    fn test_save_and_load_png() {
        let path = std::env::temp_dir().join("blue-noise-stipple-grid-test.png");
        let grid = Grid::from_fn(8, 12, |r, c| if (r + c) % 2 == 0 { 0.0 } else { 1.0 });

        grid.save_png(&path).unwrap();
        let loaded = Grid::load(&path, None).unwrap();

        assert_eq!(loaded, grid);
        let _ = std::fs::remove_file(&path);
    }
}
