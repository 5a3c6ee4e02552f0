/**
 * Block-Letter Masks
 *
 * A letter is black (0.0) on a white (1.0) background and serves as the
 * selection mask handed to `apply_mask`. Letters are drawn with a TrueType
 * font when one is available; otherwise a geometric "S" built from five
 * rectangles stands in.
 */

use tracing::debug;

use crate::font::TextFont;
use crate::grid::Grid;

/// Letter height as a fraction of the grid height
pub const DEFAULT_FONT_SIZE_RATIO: f32 = 0.9;

/// Fill the inclusive pixel rectangle `[x0, x1] × [y0, y1]` with black,
/// clipped to the grid
fn fill_rect(grid: &mut Grid, x0: f32, y0: f32, x1: f32, y1: f32) {
    let (height, width) = grid.shape();
    if height == 0 || width == 0 || x1 < 0.0 || y1 < 0.0 {
        return;
    }

    let col_start = x0.max(0.0) as usize;
    let row_start = y0.max(0.0) as usize;
    let col_end = (x1 as usize).min(width - 1);
    let row_end = (y1 as usize).min(height - 1);

    for row in row_start..=row_end {
        for col in col_start..=col_end {
            grid.set(row, col, 0.0);
        }
    }
}

/**
 * Rasterise a block "S" filling most of an H×W grid
 *
 * Built from five strokes: top bar, upper-left stem, middle bar,
 * lower-right stem and bottom bar. Margins are 20% of the width and 10% of
 * the height; the stroke is 15% of the shorter side.
 */
pub fn block_letter_s(height: usize, width: usize) -> Grid {
    let mut grid = Grid::filled(height, width, 1.0);

    let (h, w) = (height as f32, width as f32);
    let margin_x = w * 0.2;
    let margin_y = h * 0.1;
    let stroke = (height.min(width) as f32 * 0.15).floor();
    let mid_y = h * 0.4;

    // top bar
    fill_rect(&mut grid, margin_x, margin_y, w - margin_x, margin_y + stroke);
    // upper-left stem
    fill_rect(&mut grid, margin_x, margin_y, margin_x + stroke, mid_y);
    // middle bar
    fill_rect(&mut grid, margin_x, mid_y, w - margin_x, mid_y + stroke);
    // lower-right stem
    fill_rect(&mut grid, w - margin_x - stroke, mid_y, w - margin_x, h - margin_y);
    // bottom bar
    let bottom_y = h - margin_y - stroke;
    fill_rect(&mut grid, margin_x, bottom_y, w - margin_x, h - margin_y);

    grid
}

/**
 * Rasterise `letter` centred on an H×W grid
 *
 * The font size is `floor(height × font_size_ratio)` pixels and the inked
 * area of the glyph is centred. Anti-aliased edges become intermediate gray
 * levels. Without a font, or when the glyph leaves no ink, the geometric
 * block "S" of [`block_letter_s`] is returned regardless of `letter`.
 */
pub fn block_letter(
    height: usize,
    width: usize,
    letter: char,
    font: Option<&TextFont>,
    font_size_ratio: f32,
) -> Grid {
    if let Some(grid) = font.and_then(|f| render_glyph(f, height, width, letter, font_size_ratio)) {
        return grid;
    }

    debug!(%letter, "no font glyph available, using geometric S");
    block_letter_s(height, width)
}

fn render_glyph(
    font: &TextFont,
    height: usize,
    width: usize,
    letter: char,
    font_size_ratio: f32,
) -> Option<Grid> {
    let size = (height as f32 * font_size_ratio).floor();
    if height == 0 || width == 0 || size.is_nan() || size <= 0.0 {
        return None;
    }

    let text = letter.to_string();
    let (x0, y0, x1, y1) = font.ink_bounds(&text, size)?;
    let left = (width as i32 - (x1 - x0)) / 2 - x0;
    let top = (height as i32 - (y1 - y0)) / 2 - y0;

    let mut grid = Grid::filled(height, width, 1.0);
    font.draw(&text, size, left as f32, top as f32, |x, y, coverage| {
        if x < 0 || y < 0 || x as usize >= width || y as usize >= height {
            return;
        }
        let (row, col) = (y as usize, x as usize);
        let value = (1.0 - coverage).clamp(0.0, 1.0);
        if value < grid.get(row, col) {
            grid.set(row, col, value);
        }
    });

    Some(grid)
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_shape_and_values() {
        let letter = block_letter_s(60, 40);
        assert_eq!(letter.shape(), (60, 40));
        assert!(letter.as_slice().iter().all(|&v| v == 0.0 || v == 1.0));
    }

    #[test]
    fn test_strokes_present() {
        let letter = block_letter_s(100, 100);

        // Corners stay white
        assert_eq!(letter.get(0, 0), 1.0);
        assert_eq!(letter.get(99, 99), 1.0);
        // top bar, middle bar, bottom bar
        assert_eq!(letter.get(12, 50), 0.0);
        assert_eq!(letter.get(45, 50), 0.0);
        assert_eq!(letter.get(85, 50), 0.0);
        // upper-left stem, lower-right stem
        assert_eq!(letter.get(30, 22), 0.0);
        assert_eq!(letter.get(70, 78), 0.0);
        // the opposite sides are open, which is what makes it an S
        assert_eq!(letter.get(30, 78), 1.0);
        assert_eq!(letter.get(70, 22), 1.0);
    }

    #[test]
    fn test_tiny_grid_does_not_panic() {
        let letter = block_letter_s(1, 1);
        assert_eq!(letter.shape(), (1, 1));
        let empty = block_letter_s(0, 5);
        assert!(empty.is_empty());
    }

    #[test]
    fn test_block_letter_without_font_falls_back() {
        assert_eq!(
            block_letter(100, 80, 'S', None, DEFAULT_FONT_SIZE_RATIO),
            block_letter_s(100, 80)
        );
        // Any letter falls back to the same geometric S
        assert_eq!(
            block_letter(40, 40, 'A', None, DEFAULT_FONT_SIZE_RATIO),
            block_letter_s(40, 40)
        );
    }

    #[test]
    fn test_block_letter_with_font_is_centred() {
        let Some(font) = TextFont::find_system() else {
            return;
        };

        let letter = block_letter(120, 120, 'S', Some(&font), DEFAULT_FONT_SIZE_RATIO);
        assert_eq!(letter.shape(), (120, 120));
        assert!(letter.as_slice().iter().all(|&v| (0.0..=1.0).contains(&v)));

        // Corners stay white, the glyph leaves solid ink
        assert_eq!(letter.get(0, 0), 1.0);
        assert_eq!(letter.get(119, 119), 1.0);
        let ink = letter.as_slice().iter().filter(|&&v| v < 0.5).count();
        assert!(ink > 120 * 120 / 20, "only {ink} dark pixels");

        // Inked rows and columns are balanced around the centre
        let dark_rows: Vec<usize> = (0..120)
            .filter(|&r| (0..120).any(|c| letter.get(r, c) < 0.5))
            .collect();
        let dark_cols: Vec<usize> = (0..120)
            .filter(|&c| (0..120).any(|r| letter.get(r, c) < 0.5))
            .collect();
        let top_gap = dark_rows[0] as i32;
        let bottom_gap = 119 - *dark_rows.last().unwrap() as i32;
        let left_gap = dark_cols[0] as i32;
        let right_gap = 119 - *dark_cols.last().unwrap() as i32;
        assert!((top_gap - bottom_gap).abs() <= 3, "{top_gap} vs {bottom_gap}");
        assert!((left_gap - right_gap).abs() <= 3, "{left_gap} vs {right_gap}");
    }

    #[test]
    fn test_block_letter_blank_glyph_falls_back() {
        let Some(font) = TextFont::find_system() else {
            return;
        };
        assert_eq!(
            block_letter(50, 50, ' ', Some(&font), DEFAULT_FONT_SIZE_RATIO),
            block_letter_s(50, 50)
        );
        assert_eq!(
            block_letter(50, 50, 'S', Some(&font), 0.0),
            block_letter_s(50, 50)
        );
    }
}
