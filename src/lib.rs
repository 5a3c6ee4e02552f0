//! Blue Noise Stippling Library
//!
//! Converts grayscale images into evenly spread point samples ("stipples")
//! whose local density follows image content, using a content-weighted
//! variant of Robert Ulichney's void-and-cluster algorithm.
//!
//! # Features
//!
//! - Importance map that favours dark and mid tones while softening pure
//!   blacks and whites
//! - Toroidal Gaussian repulsion kernel (no edge bias)
//! - Greedy energy minimisation with decaying exploration noise
//! - Reproducible results with seeded or caller-supplied random generators
//! - Threshold masking, block-letter masks and labelled multi-panel figures
//!
//! # Quick Start
//!
//! ```no_run
//! use blue_noise_stipple::{Grid, StippleConfig, StippleGenerator};
//!
//! let input = Grid::load("portrait.jpg", Some(256)).unwrap();
//! let config = StippleConfig {
//!     percentage: 0.08,
//!     seed: Some(42),
//!     ..Default::default()
//! };
//!
//! let generator = StippleGenerator::new(config).unwrap();
//! let result = generator.generate(&input, None).unwrap();
//! result.stipple.save_png("stipple.png").unwrap();
//! println!("placed {} stipples", result.samples.len());
//! ```
//!
//! ## Bringing your own random generator
//!
//! ```
//! use blue_noise_stipple::{void_and_cluster, Grid};
//! use rand::{rngs::StdRng, SeedableRng};
//!
//! let input = Grid::filled(40, 40, 0.5);
//! let mut rng = StdRng::seed_from_u64(7);
//! let result = void_and_cluster(&input, 0.05, 0.9, 0.9, None, 0.1, &mut rng).unwrap();
//! assert_eq!(result.samples.len(), 80);
//! ```
//!
//! # Algorithm
//!
//! 1. **Importance**: grayscale -> per-pixel weight in [0, 1]
//! 2. **Energy**: `-importance × content_bias`, lower is more attractive
//! 3. **Seed**: minimum energy in a small window around the image centre
//! 4. **Iterate**: add exploration noise, pick the global minimum, splat the
//!    repulsion kernel around it and retire it with +∞ energy
//!
//! All kernel operations use toroidal topology (wraparound edges).
//!
//! # References
//!
//! - Ulichney, R. (1993). "Void-and-cluster method for dither array generation"
//! - Ulichney, R. (1988). "Dithering with blue noise"

#![warn(missing_docs)]
#![warn(rust_2018_idioms)]

/// TrueType text rasterisation
pub mod font;
/// Dense scalar grids and image I/O
pub mod grid;
/// Importance map computation
pub mod importance;
/// Toroidal Gaussian repulsion kernel
pub mod kernel;
/// Block-letter masks
pub mod letter;
/// Threshold masking
pub mod mask;
/// Multi-panel figures
pub mod panel;
/// Void-and-cluster stipple placement
pub mod stipple;

// Re-export main types for convenience
pub use font::{FontError, TextFont};
pub use grid::{Grid, GridError};
pub use importance::{compute_importance, ImportanceParams};
pub use kernel::{splat, toroidal_gaussian_kernel};
pub use letter::{block_letter, block_letter_s, DEFAULT_FONT_SIZE_RATIO};
pub use mask::{apply_mask, DEFAULT_MASK_THRESHOLD};
pub use panel::{
    render_panels, save_panels, Color, PanelError, PanelOptions, DEFAULT_PANEL_LABELS,
};
pub use stipple::{
    void_and_cluster, write_samples_csv, Sample, StippleConfig, StippleError, StippleGenerator,
    StippleResult,
};
