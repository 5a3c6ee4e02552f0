/**
 * Example: Using blue-noise-stipple as a library
 *
 * Runs the whole pipeline in memory with a caller-owned random generator:
 * stipple, mask with a block letter, and assemble a four-panel figure.
 *
 * Run with:
 *   cargo run --example library_integration
 */

use blue_noise_stipple::{
    apply_mask, block_letter, compute_importance, render_panels, Color, Grid, ImportanceParams,
    PanelOptions, StippleConfig, StippleGenerator, TextFont, DEFAULT_FONT_SIZE_RATIO,
    DEFAULT_PANEL_LABELS,
};
use rand::{rngs::StdRng, SeedableRng};

fn create_test_image(size: usize) -> Grid {
    // Diagonal gradient with a dark disc in the middle
    let c = size as f32 / 2.0;
    Grid::from_fn(size, size, |r, col| {
        let dy = r as f32 - c;
        let dx = col as f32 - c;
        if (dx * dx + dy * dy).sqrt() < size as f32 / 6.0 {
            0.1
        } else {
            (r + col) as f32 / (2 * size) as f32
        }
    })
}

fn main() -> Result<(), Box<dyn std::error::Error>> {
    println!("Library Integration Example\n");

    let input = create_test_image(150);
    println!("Step 1: Created {}×{} test image", input.width(), input.height());

    // Tweak the importance map instead of using the defaults
    let params = ImportanceParams {
        mid_tone_boost: 0.6,
        ..Default::default()
    };
    let importance = compute_importance(&input, &params);
    println!("Step 2: Computed importance map");

    let generator = StippleGenerator::new(StippleConfig {
        percentage: 0.08,
        ..Default::default()
    })?;
    let mut rng = StdRng::seed_from_u64(2024);
    let result = generator.generate_with_rng(&input, Some(&importance), &mut rng)?;
    println!("Step 3: Placed {} stipples", result.samples.len());

    let first = result.samples[0];
    println!(
        "        seed point at ({}, {}) with intensity {:.2}",
        first.row, first.col, first.intensity
    );

    // Falls back to a geometric S and unlabelled panels without a system font
    let font = TextFont::find_system();
    let letter = block_letter(
        input.height(),
        input.width(),
        'S',
        font.as_ref(),
        DEFAULT_FONT_SIZE_RATIO,
    );
    let masked = apply_mask(&result.stipple, &letter, 0.5)?;
    let kept = masked.as_slice().iter().filter(|&&v| v == 0.0).count();
    println!("Step 4: Mask kept {} of {} stipples", kept, result.samples.len());

    let options = PanelOptions {
        background: Color::parse("linen")?,
        labels: DEFAULT_PANEL_LABELS.iter().map(|s| s.to_string()).collect(),
        font,
        ..Default::default()
    };
    let figure = render_panels(&[&input, &result.stipple, &letter, &masked], &options)?;
    figure.save("example-panels.png")?;
    println!("Step 5: Saved example-panels.png ({}×{})", figure.width(), figure.height());

    Ok(())
}
