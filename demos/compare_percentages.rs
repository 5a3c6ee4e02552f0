/**
 * Example: Compare stipple densities
 *
 * Stipples the same radial gradient at several densities and places the
 * results side by side in one figure.
 *
 * Run with:
 *   cargo run --example compare_percentages
 */

use blue_noise_stipple::{save_panels, Grid, PanelOptions, StippleConfig, StippleGenerator};
use std::time::Instant;

fn main() -> Result<(), Box<dyn std::error::Error>> {
    let size = 128;
    let c = size as f32 / 2.0;
    let input = Grid::from_fn(size, size, |r, col| {
        let dy = r as f32 - c;
        let dx = col as f32 - c;
        ((dx * dx + dy * dy).sqrt() / c).min(1.0)
    });

    let percentages = [0.03, 0.06, 0.1, 0.15];
    let mut stipples = Vec::with_capacity(percentages.len());

    println!("Comparing stipple densities on a {}×{} radial gradient\n", size, size);

    for &percentage in &percentages {
        let config = StippleConfig {
            percentage,
            seed: Some(7),
            ..Default::default()
        };

        let start = Instant::now();
        let result = StippleGenerator::new(config)?.generate(&input, None)?;
        let elapsed = start.elapsed();

        println!(
            "  {:>5.1}% -> {:>5} stipples in {:.2}s",
            percentage * 100.0,
            result.samples.len(),
            elapsed.as_secs_f32()
        );
        stipples.push(result.stipple);
    }

    let panels: Vec<&Grid> = stipples.iter().collect();
    save_panels(&panels, &PanelOptions::default(), "example-percentages.png")?;

    println!("\nFigure saved to example-percentages.png");

    Ok(())
}
