/**
 * Blue Noise Stipple CLI - stippling, masking and panel figures from the command line
 */

use anyhow::{Context, Result};
use clap::{Args, Parser, Subcommand};
use std::path::{Path, PathBuf};
use tracing_subscriber::EnvFilter;

use blue_noise_stipple::{
    apply_mask, block_letter, compute_importance, save_panels, write_samples_csv, Color, Grid,
    ImportanceParams, PanelOptions, StippleConfig, StippleGenerator, TextFont,
    DEFAULT_PANEL_LABELS,
};

/// Blue noise stippling tools
#[derive(Parser)]
#[command(name = "blue-noise-stipple")]
#[command(author = "Matthew Blode <m@blode.co>")]
#[command(version)]
#[command(about = "Content-weighted blue noise stippling", long_about = None)]
struct Cli {
    #[command(subcommand)]
    command: Commands,
}

/// Placement parameters shared by `stipple` and `panels`
#[derive(Args)]
struct PlacementArgs {
    /// Fraction of pixels to stipple (0.05-0.12 gives sparse, focused patterns)
    #[arg(short, long, default_value = "0.08")]
    percentage: f64,

    /// Repulsion kernel sigma in pixels (higher = wider spacing)
    #[arg(long, default_value = "0.9")]
    sigma: f32,

    /// Weight of image content in the energy field (0.8-0.95 follows the image closely)
    #[arg(long, default_value = "0.9")]
    content_bias: f32,

    /// Exploration noise scale (lower = crisper features)
    #[arg(long, default_value = "0.1")]
    noise_scale: f32,

    /// Random seed for reproducibility
    #[arg(long)]
    seed: Option<u64>,

    /// Show a progress bar
    #[arg(short, long)]
    verbose: bool,
}

/// Block letter used as the selection mask
#[derive(Args)]
struct LetterArgs {
    /// Letter drawn as the mask
    #[arg(long, default_value = "S")]
    letter: char,

    /// Letter height as a fraction of the image height
    #[arg(long, default_value = "0.9")]
    font_size_ratio: f32,

    /// TrueType font for the letter and labels (defaults to a system bold sans)
    #[arg(long)]
    font: Option<PathBuf>,
}

/// Importance map parameters
#[derive(Args)]
struct ImportanceArgs {
    /// Strength of extreme-tone downweighting (0 = off, 1 = maximum)
    #[arg(long, default_value = "0.5")]
    extreme_downweight: f32,

    /// Tones below this count as very dark
    #[arg(long, default_value = "0.4")]
    extreme_threshold_low: f32,

    /// Tones above this count as very light
    #[arg(long, default_value = "0.8")]
    extreme_threshold_high: f32,

    /// Width of the extreme-tone transition
    #[arg(long, default_value = "0.1")]
    extreme_sigma: f32,

    /// Strength of the mid-tone boost
    #[arg(long, default_value = "0.4")]
    mid_tone_boost: f32,

    /// Width of the mid-tone bump
    #[arg(long, default_value = "0.2")]
    mid_tone_sigma: f32,
}

impl ImportanceArgs {
    fn params(&self) -> ImportanceParams {
        ImportanceParams {
            extreme_downweight: self.extreme_downweight,
            extreme_threshold_low: self.extreme_threshold_low,
            extreme_threshold_high: self.extreme_threshold_high,
            extreme_sigma: self.extreme_sigma,
            mid_tone_boost: self.mid_tone_boost,
            mid_tone_sigma: self.mid_tone_sigma,
            ..Default::default()
        }
    }
}

#[derive(Subcommand)]
enum Commands {
    /// Stipple a grayscale image
    Stipple {
        /// Input image path
        #[arg(short, long)]
        input: PathBuf,

        /// Output stipple image path
        #[arg(short, long)]
        output: PathBuf,

        /// Resize the input to this width first (keeps aspect ratio)
        #[arg(short, long)]
        width: Option<u32>,

        /// Also write the placed samples as CSV
        #[arg(long)]
        samples: Option<PathBuf>,

        #[command(flatten)]
        placement: PlacementArgs,

        #[command(flatten)]
        importance: ImportanceArgs,
    },

    /// Write the importance map of an image
    Importance {
        /// Input image path
        #[arg(short, long)]
        input: PathBuf,

        /// Output importance map path
        #[arg(short, long)]
        output: PathBuf,

        /// Resize the input to this width first (keeps aspect ratio)
        #[arg(short, long)]
        width: Option<u32>,

        #[command(flatten)]
        importance: ImportanceArgs,
    },

    /// Remove stipples under the dark parts of a mask
    Mask {
        /// Stipple image path
        #[arg(short, long)]
        input: PathBuf,

        /// Output image path
        #[arg(short, long)]
        output: PathBuf,

        /// Mask image path (defaults to a block letter)
        #[arg(short, long)]
        mask: Option<PathBuf>,

        /// Mask values below this remove stipples
        #[arg(short, long, default_value = "0.5")]
        threshold: f32,

        #[command(flatten)]
        letter: LetterArgs,
    },

    /// Run the full pipeline and write a four-panel figure
    Panels {
        /// Input image path
        #[arg(short, long)]
        input: PathBuf,

        /// Output figure path
        #[arg(short, long)]
        output: PathBuf,

        /// Resize the input to this width first (keeps aspect ratio)
        #[arg(short, long, default_value = "200")]
        width: u32,

        /// Mask values below this remove stipples
        #[arg(short, long, default_value = "0.5")]
        threshold: f32,

        /// Integer upscaling of each panel
        #[arg(long, default_value = "2")]
        scale: u32,

        /// Figure background color (name such as "pink", or hex)
        #[arg(short, long, default_value = "white")]
        background: Color,

        /// Leave out the panel titles
        #[arg(long)]
        no_labels: bool,

        #[command(flatten)]
        letter: LetterArgs,

        #[command(flatten)]
        placement: PlacementArgs,
    },
}

fn init_tracing() {
    let filter = EnvFilter::try_from_default_env().unwrap_or_else(|_| EnvFilter::new("info"));
    tracing_subscriber::fmt()
        .with_env_filter(filter)
        .with_target(false)
        .init();
}

fn ensure_parent_dir(path: &Path) -> Result<()> {
    if let Some(parent) = path.parent() {
        if !parent.as_os_str().is_empty() {
            std::fs::create_dir_all(parent).context("Failed to create output directory")?;
        }
    }
    Ok(())
}

fn load_input(input: &Path, width: Option<u32>) -> Result<Grid> {
    if !input.exists() {
        anyhow::bail!("Input file does not exist: {}", input.display());
    }
    if width == Some(0) {
        anyhow::bail!("Width must be positive");
    }
    Grid::load(input, width).with_context(|| format!("Failed to load {}", input.display()))
}

fn load_font(path: Option<&Path>) -> Result<Option<TextFont>> {
    match path {
        Some(path) => {
            let font = TextFont::load(path).context("Failed to load font")?;
            Ok(Some(font))
        }
        None => {
            let font = TextFont::find_system();
            if font.is_none() {
                println!("No system font found; using the geometric letter S and no labels");
            }
            Ok(font)
        }
    }
}

fn build_generator(placement: &PlacementArgs, importance: ImportanceParams) -> Result<StippleGenerator> {
    let config = StippleConfig {
        percentage: placement.percentage,
        sigma: placement.sigma,
        content_bias: placement.content_bias,
        noise_scale_factor: placement.noise_scale,
        importance,
        seed: placement.seed,
        verbose: placement.verbose,
    };

    StippleGenerator::new(config).context("Invalid stippling parameters")
}

fn main() -> Result<()> {
    init_tracing();
    let cli = Cli::parse();

    match cli.command {
        Commands::Stipple {
            input,
            output,
            width,
            samples,
            placement,
            importance,
        } => {
            let generator = build_generator(&placement, importance.params())?;
            let gray = load_input(&input, width)?;

            println!("Processing: {}", input.display());
            println!("Size: {}×{}", gray.width(), gray.height());
            println!("Percentage: {}", placement.percentage);
            if let Some(s) = placement.seed {
                println!("Seed: {}", s);
            }
            println!("Output: {}", output.display());
            println!();

            let result = generator
                .generate(&gray, None)
                .context("Failed to place stipples")?;

            ensure_parent_dir(&output)?;
            result
                .stipple
                .save_png(&output)
                .context("Failed to save stipple image")?;

            if let Some(path) = samples {
                ensure_parent_dir(&path)?;
                write_samples_csv(&result.samples, &path).context("Failed to write samples")?;
                println!("Samples saved to: {}", path.display());
            }

            println!("Placed {} stipples", result.samples.len());
            println!("Done!");
        }

        Commands::Importance {
            input,
            output,
            width,
            importance,
        } => {
            let gray = load_input(&input, width)?;
            let map = compute_importance(&gray, &importance.params());

            ensure_parent_dir(&output)?;
            map.save_png(&output)
                .context("Failed to save importance map")?;

            println!("Importance map saved to: {}", output.display());
        }

        Commands::Mask {
            input,
            output,
            mask,
            threshold,
            letter,
        } => {
            let stipple = load_input(&input, None)?;
            let mask = match mask {
                Some(path) => load_input(&path, None)?,
                None => {
                    let font = load_font(letter.font.as_deref())?;
                    block_letter(
                        stipple.height(),
                        stipple.width(),
                        letter.letter,
                        font.as_ref(),
                        letter.font_size_ratio,
                    )
                }
            };

            let masked = apply_mask(&stipple, &mask, threshold).context("Failed to apply mask")?;

            ensure_parent_dir(&output)?;
            masked
                .save_png(&output)
                .context("Failed to save masked image")?;

            println!("Masked image saved to: {}", output.display());
        }

        Commands::Panels {
            input,
            output,
            width,
            threshold,
            scale,
            background,
            no_labels,
            letter,
            placement,
        } => {
            if scale == 0 {
                anyhow::bail!("Scale must be at least 1");
            }

            let generator = build_generator(&placement, ImportanceParams::default())?;
            let gray = load_input(&input, Some(width))?;
            let font = load_font(letter.font.as_deref())?;

            println!("Processing: {}", input.display());
            println!("Size: {}×{}", gray.width(), gray.height());
            println!();

            let result = generator
                .generate(&gray, None)
                .context("Failed to place stipples")?;
            let mask = block_letter(
                gray.height(),
                gray.width(),
                letter.letter,
                font.as_ref(),
                letter.font_size_ratio,
            );
            let masked =
                apply_mask(&result.stipple, &mask, threshold).context("Failed to apply mask")?;

            let labels = if no_labels {
                Vec::new()
            } else {
                DEFAULT_PANEL_LABELS.iter().map(|s| s.to_string()).collect()
            };
            let options = PanelOptions {
                scale,
                background,
                labels,
                font,
                ..Default::default()
            };

            ensure_parent_dir(&output)?;
            save_panels(&[&gray, &result.stipple, &mask, &masked], &options, &output)
                .context("Failed to save figure")?;

            println!("Panels: {}", DEFAULT_PANEL_LABELS.join(" | "));
            println!("Figure saved to: {}", output.display());
            println!("Done!");
        }
    }

    Ok(())
}
