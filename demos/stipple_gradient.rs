/**
 * Example: Stipple a synthetic gradient
 *
 * Builds a horizontal black-to-white gradient, stipples it and writes the
 * input, importance map and stipple image to PNG files.
 *
 * Run with:
 *   cargo run --example stipple_gradient
 */

use blue_noise_stipple::{compute_importance, Grid, ImportanceParams, StippleConfig, StippleGenerator};

fn main() -> Result<(), Box<dyn std::error::Error>> {
    println!("Stippling a gradient...\n");

    let (height, width) = (128, 256);
    let gradient = Grid::from_fn(height, width, |_, col| col as f32 / (width - 1) as f32);
    gradient.save_png("example-gradient.png")?;

    let importance = compute_importance(&gradient, &ImportanceParams::default());
    importance.save_png("example-importance.png")?;

    let config = StippleConfig {
        percentage: 0.1,
        seed: Some(42), // Use a seed for reproducibility
        verbose: true,
        ..Default::default()
    };

    let generator = StippleGenerator::new(config)?;
    let result = generator.generate(&gradient, Some(&importance))?;
    result.stipple.save_png("example-stipple.png")?;

    println!("\nStipple image saved to example-stipple.png");
    println!("Size: {}×{} pixels", width, height);
    println!("Stipples: {}", result.samples.len());

    Ok(())
}
