/**
 * Content-Weighted Void-and-Cluster Stippling
 *
 * Places a fixed budget of stipples on a grayscale image so that the local
 * dot density follows image content while the dots stay evenly spread.
 *
 * ALGORITHM OVERVIEW
 * ==================
 *
 * An energy field starts at `-importance × content_bias`: the most important
 * pixels are the most attractive (lowest energy). Points are then placed one
 * at a time:
 *
 * 1. Pick the minimum-energy pixel ("void filling")
 * 2. Add a toroidal Gaussian kernel centred on it to the energy field, which
 *    makes its neighbourhood less attractive ("cluster suppression")
 * 3. Set its energy to +∞ so it can never be picked again
 *
 * The very first point is searched for only inside a small window around the
 * image centre, anchoring the pattern there instead of on an arbitrary corner.
 *
 * EXPLORATION NOISE
 * =================
 * Every later pick is made on a noisy copy of the energy field. The noise is
 * zero-mean Gaussian with standard deviation
 * `noise_scale_factor × content_bias × exploration`, where `exploration`
 * decays linearly from 1.0 to 0.5 over the run. Early picks explore (avoiding
 * an overly regular lattice), late picks follow the importance map. The
 * persistent energy field is never perturbed by the noise.
 *
 * TIE BREAKING
 * ============
 * All minimum searches scan in row-major order and keep the first strict
 * minimum, so equal energies resolve to the lowest linear index.
 *
 * COST
 * ====
 * Each placed point costs one full-grid noise draw, one full-grid argmin and
 * one full-grid splat: O(points × H × W) overall.
 */

use indicatif::{ProgressBar, ProgressStyle};
use rand::rngs::StdRng;
use rand::{Rng, SeedableRng};
use rand_distr::StandardNormal;
use std::io::Write;
use std::path::Path;
use thiserror::Error;
use tracing::{debug, info};

use crate::grid::{Grid, GridError};
use crate::importance::{compute_importance, ImportanceParams};
use crate::kernel::{splat, toroidal_gaussian_kernel};

/// Configuration for stipple placement
#[derive(Debug, Clone)]
pub struct StippleConfig {
    /// Fraction of pixels to stipple (typically 0.05-0.12)
    pub percentage: f64,
    /// Standard deviation of the repulsion kernel in pixels
    pub sigma: f32,
    /// Weight of the importance map in the energy field (typically 0.8-0.95)
    pub content_bias: f32,
    /// Scale of the exploration noise (typically 0.05-0.2)
    pub noise_scale_factor: f32,
    /// Parameters used when the importance map is computed from the input
    pub importance: ImportanceParams,
    /// Optional random seed for reproducible results
    pub seed: Option<u64>,
    /// Show a progress bar while placing points
    pub verbose: bool,
}

impl Default for StippleConfig {
    fn default() -> Self {
        Self {
            percentage: 0.08,
            sigma: 0.9,
            content_bias: 0.9,
            noise_scale_factor: 0.1,
            importance: ImportanceParams::default(),
            seed: None,
            verbose: false,
        }
    }
}

/// A placed stipple
#[derive(Debug, Clone, Copy, PartialEq)]
pub struct Sample {
    /// Row of the stipple
    pub row: usize,
    /// Column of the stipple
    pub col: usize,
    /// Source grayscale value at that location
    pub intensity: f32,
}

/// Result of stipple placement
#[derive(Debug, Clone)]
pub struct StippleResult {
    /// Binary image: 0.0 where a dot was placed, 1.0 elsewhere
    pub stipple: Grid,
    /// Placed points in emission order
    pub samples: Vec<Sample>,
}

/// Error types for stipple placement
#[derive(Error, Debug)]
pub enum StippleError {
    /// Stipple fraction is negative or not a number
    #[error("Percentage must be non-negative, got {0}")]
    InvalidPercentage(f64),

    /// Kernel spread is zero or negative
    #[error("Sigma must be positive, got {0}")]
    InvalidSigma(f32),

    /// Content bias is NaN or infinite
    #[error("Content bias must be finite, got {0}")]
    InvalidContentBias(f32),

    /// Noise scale is negative, NaN or infinite
    #[error("Noise scale factor must be finite and non-negative, got {0}")]
    InvalidNoiseScale(f32),

    /// Every remaining pixel has a NaN or infinite energy
    #[error("No selectable pixel left after {placed} stipples")]
    NoCandidate {
        /// Stipples placed before the search came up empty
        placed: usize,
    },

    /// Input grid is empty
    #[error("Input grid must have positive height and width")]
    InvalidDimensions,

    /// Grid shape or I/O problem
    #[error(transparent)]
    Grid(#[from] GridError),
}

/// Result type for stippling operations
pub type Result<T> = std::result::Result<T, StippleError>;

/// Half-width cap of the seed search window
const SEED_WINDOW_MAX: usize = 20;

/// Index of the first strict minimum in row-major order
///
/// Retired (`+∞`) and NaN cells never compare below the running minimum, so
/// `None` means nothing is left to select.
fn argmin(values: &[f32]) -> Option<usize> {
    let mut best_idx = None;
    let mut best = f32::INFINITY;

    for (i, &v) in values.iter().enumerate() {
        if v < best {
            best = v;
            best_idx = Some(i);
        }
    }

    best_idx
}

/// Noise standard deviation for the `i`-th of `n` picks
///
/// Decays linearly from `base` at the start of the run to `base / 2` at its end.
fn exploration_std(i: usize, n: usize, base: f32) -> f32 {
    let exploration = 1.0 - (i as f32 / n as f32) * 0.5;
    base * exploration
}

/// Perturb `energy` into `noisy` and return the noisy argmin
///
/// One `StandardNormal` draw per cell, even when `std_dev` is zero.
fn noisy_argmin<R: Rng + ?Sized>(
    energy: &[f32],
    noisy: &mut [f32],
    std_dev: f32,
    rng: &mut R,
) -> Option<usize> {
    for (n, &e) in noisy.iter_mut().zip(energy) {
        let z: f32 = rng.sample(StandardNormal);
        *n = e + z * std_dev;
    }
    argmin(noisy)
}

/**
 * Find the seed point: minimum energy inside a square window around the
 * grid centre
 *
 * The window covers rows `[cy - r, cy + r)` and columns `[cx - r, cx + r)`
 * with `r = min(20, H / 10, W / 10)`. Grids too small for a window
 * (`r == 0`) use the centre cell itself.
 */
fn find_seed(energy: &Grid) -> Option<(usize, usize)> {
    let (height, width) = energy.shape();
    let (cy, cx) = (height / 2, width / 2);
    let r = SEED_WINDOW_MAX.min(height / 10).min(width / 10);

    if r == 0 {
        return (energy.get(cy, cx) < f32::INFINITY).then_some((cy, cx));
    }

    let rows = cy.saturating_sub(r)..(cy + r).min(height);
    let cols = cx.saturating_sub(r)..(cx + r).min(width);

    let mut best = None;
    let mut best_energy = f32::INFINITY;

    for row in rows {
        for col in cols.clone() {
            let e = energy.get(row, col);
            if e < best_energy {
                best_energy = e;
                best = Some((row, col));
            }
        }
    }

    best
}

/**
 * Places stipples with the content-weighted void-and-cluster method
 */
pub struct StippleGenerator {
    percentage: f64,
    sigma: f32,
    content_bias: f32,
    noise_scale_factor: f32,
    importance: ImportanceParams,
    seed: Option<u64>,
    verbose: bool,
}

impl StippleGenerator {
    /// Create a new generator with the given configuration
    pub fn new(config: StippleConfig) -> Result<Self> {
        if config.percentage.is_nan() || config.percentage < 0.0 {
            return Err(StippleError::InvalidPercentage(config.percentage));
        }
        if config.sigma.is_nan() || config.sigma <= 0.0 {
            return Err(StippleError::InvalidSigma(config.sigma));
        }
        if !config.content_bias.is_finite() {
            return Err(StippleError::InvalidContentBias(config.content_bias));
        }
        if !config.noise_scale_factor.is_finite() || config.noise_scale_factor < 0.0 {
            return Err(StippleError::InvalidNoiseScale(config.noise_scale_factor));
        }

        Ok(Self {
            percentage: config.percentage,
            sigma: config.sigma,
            content_bias: config.content_bias,
            noise_scale_factor: config.noise_scale_factor,
            importance: config.importance,
            seed: config.seed,
            verbose: config.verbose,
        })
    }

    /// Number of points placed on a grid with `cells` pixels
    pub fn target_count(&self, cells: usize) -> usize {
        let target = (cells as f64 * self.percentage).floor() as usize;
        target.min(cells)
    }

    /**
     * Stipple `input`, drawing exploration noise from a generator seeded with
     * the configured seed (or from entropy when no seed is set)
     */
    pub fn generate(&self, input: &Grid, importance: Option<&Grid>) -> Result<StippleResult> {
        let mut rng = match self.seed {
            Some(seed) => StdRng::seed_from_u64(seed),
            None => StdRng::from_entropy(),
        };
        self.generate_with_rng(input, importance, &mut rng)
    }

    /**
     * Stipple `input` using the caller's random generator
     *
     * When `importance` is `None` the map is computed from `input`; a supplied
     * map is clipped to [0, 1] and must have the input's shape.
     */
    pub fn generate_with_rng<R: Rng + ?Sized>(
        &self,
        input: &Grid,
        importance: Option<&Grid>,
        rng: &mut R,
    ) -> Result<StippleResult> {
        let start_time = std::time::Instant::now();

        let input = input.clipped();
        let (height, width) = input.shape();
        if height == 0 || width == 0 {
            return Err(StippleError::InvalidDimensions);
        }

        let importance = match importance {
            Some(map) => {
                input.ensure_same_shape(map)?;
                map.clipped()
            }
            None => compute_importance(&input, &self.importance),
        };

        let kernel = toroidal_gaussian_kernel(height, width, self.sigma);
        let mut energy = importance.map(|v| -v * self.content_bias);
        let mut stipple = Grid::filled(height, width, 1.0);

        let num_points = self.target_count(input.len());
        debug!(
            height,
            width,
            num_points,
            sigma = self.sigma,
            content_bias = self.content_bias,
            "placing stipples"
        );

        if num_points == 0 {
            return Ok(StippleResult {
                stipple,
                samples: Vec::new(),
            });
        }

        let progress = self.progress_bar(num_points);
        let mut samples = Vec::with_capacity(num_points);

        let (row, col) = find_seed(&energy).ok_or(StippleError::NoCandidate { placed: 0 })?;
        debug!(row, col, "seed point");
        place_point(&mut energy, &kernel, &input, &mut stipple, &mut samples, row, col)?;

        let mut noisy = vec![0.0f32; energy.len()];
        let base_std = self.noise_scale_factor * self.content_bias;

        for i in 1..num_points {
            let std_dev = exploration_std(i, num_points, base_std);
            let idx = noisy_argmin(energy.as_slice(), &mut noisy, std_dev, rng)
                .ok_or(StippleError::NoCandidate { placed: i })?;
            place_point(
                &mut energy,
                &kernel,
                &input,
                &mut stipple,
                &mut samples,
                idx / width,
                idx % width,
            )?;

            if let Some(pb) = &progress {
                pb.inc(1);
            }
        }

        if let Some(pb) = &progress {
            pb.finish_with_message("Stippling complete");
        }

        info!(
            points = samples.len(),
            elapsed_ms = start_time.elapsed().as_millis() as u64,
            "stippling complete"
        );

        Ok(StippleResult { stipple, samples })
    }

    fn progress_bar(&self, num_points: usize) -> Option<ProgressBar> {
        if !self.verbose {
            return None;
        }

        let pb = ProgressBar::new(num_points as u64);
        let style = ProgressStyle::default_bar()
            .template("[{elapsed_precise}] {bar:40.cyan/blue} {pos:>7}/{len:7} {msg}")
            .unwrap_or_else(|_| ProgressStyle::default_bar())
            .progress_chars("##-");
        pb.set_style(style);
        pb.set_message("Placing stipples");
        // The seed point is already placed when the bar is first shown.
        pb.set_position(1);
        Some(pb)
    }
}

/// Splat, retire and record the point at `(row, col)`
fn place_point(
    energy: &mut Grid,
    kernel: &Grid,
    input: &Grid,
    stipple: &mut Grid,
    samples: &mut Vec<Sample>,
    row: usize,
    col: usize,
) -> Result<()> {
    splat(energy, kernel, row, col)?;
    energy.set(row, col, f32::INFINITY);
    samples.push(Sample {
        row,
        col,
        intensity: input.get(row, col),
    });
    stipple.set(row, col, 0.0);
    Ok(())
}

/**
 * Convenience function mirroring the full parameter list of the placer
 */
pub fn void_and_cluster<R: Rng + ?Sized>(
    input: &Grid,
    percentage: f64,
    sigma: f32,
    content_bias: f32,
    importance: Option<&Grid>,
    noise_scale_factor: f32,
    rng: &mut R,
) -> Result<StippleResult> {
    let config = StippleConfig {
        percentage,
        sigma,
        content_bias,
        noise_scale_factor,
        ..Default::default()
    };
    StippleGenerator::new(config)?.generate_with_rng(input, importance, rng)
}

/**
 * Write samples as `row,col,intensity` CSV lines with a header
 */
pub fn write_samples_csv<P: AsRef<Path>>(samples: &[Sample], path: P) -> Result<()> {
    write_csv(samples, path.as_ref()).map_err(GridError::from)?;
    Ok(())
}

fn write_csv(samples: &[Sample], path: &Path) -> std::io::Result<()> {
    let mut out = std::io::BufWriter::new(std::fs::File::create(path)?);
    writeln!(out, "row,col,intensity")?;
    for s in samples {
        writeln!(out, "{},{},{}", s.row, s.col, s.intensity)?;
    }
    out.flush()
}
