/**
 * Multi-Panel Figure Assembly
 *
 * Lays out several grids side by side on a coloured background, each framed
 * by a black border, and writes the result as an RGB image. Used to show the
 * original image, its stippling, the selection mask and the masked stippling
 * next to each other.
 *
 * When labels and a font are given, each panel gets a centred title in a
 * band above the row of panels. Without a font the labels are skipped and
 * the layout is the same as an unlabelled figure.
 */

use image::{Rgb, RgbImage};
use std::path::Path;
use std::str::FromStr;
use thiserror::Error;
use tracing::warn;

use crate::font::TextFont;
use crate::grid::{to_u8, Grid};

/// Titles of the four-panel selection-bias figure, left to right
pub const DEFAULT_PANEL_LABELS: [&str; 4] = ["Reality", "Your Model", "Selection Bias", "Estimate"];

/// Color names accepted by [`Color::parse`]
const NAMED_COLORS: &[(&str, [u8; 3])] = &[
    ("white", [255, 255, 255]),
    ("black", [0, 0, 0]),
    ("pink", [255, 192, 203]),
    ("lightpink", [255, 182, 193]),
    ("red", [255, 0, 0]),
    ("green", [0, 128, 0]),
    ("blue", [0, 0, 255]),
    ("yellow", [255, 255, 0]),
    ("orange", [255, 165, 0]),
    ("purple", [128, 0, 128]),
    ("gray", [128, 128, 128]),
    ("grey", [128, 128, 128]),
    ("lightgray", [211, 211, 211]),
    ("lightgrey", [211, 211, 211]),
    ("silver", [192, 192, 192]),
    ("beige", [245, 245, 220]),
    ("ivory", [255, 255, 240]),
    ("linen", [250, 240, 230]),
    ("lavender", [230, 230, 250]),
    ("navy", [0, 0, 128]),
];

/// RGB color representation
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct Color {
    /// Red component (0-255)
    pub r: u8,
    /// Green component (0-255)
    pub g: u8,
    /// Blue component (0-255)
    pub b: u8,
}

impl Color {
    /// Create a new color from RGB values
    pub fn new(r: u8, g: u8, b: u8) -> Self {
        Self { r, g, b }
    }

    /// Parse a hex color string (e.g., "#FF0000" or "FF0000")
    pub fn from_hex(hex: &str) -> Result<Self> {
        let hex = hex.trim_start_matches('#');

        if hex.len() != 6 || !hex.is_ascii() {
            return Err(PanelError::InvalidHexColor(hex.to_string()));
        }

        let channel = |range: std::ops::Range<usize>| {
            u8::from_str_radix(&hex[range], 16)
                .map_err(|_| PanelError::InvalidHexColor(hex.to_string()))
        };

        Ok(Self {
            r: channel(0..2)?,
            g: channel(2..4)?,
            b: channel(4..6)?,
        })
    }

    /**
     * Parse a color name ("white", "pink", ...) or a hex string
     *
     * Names are case-insensitive. Anything that is neither a known name nor
     * six hex digits is rejected.
     */
    pub fn parse(spec: &str) -> Result<Self> {
        let spec = spec.trim();
        if spec.starts_with('#') {
            return Self::from_hex(spec);
        }

        let name = spec.to_ascii_lowercase();
        if let Some(&(_, [r, g, b])) = NAMED_COLORS.iter().find(|(n, _)| *n == name) {
            return Ok(Self::new(r, g, b));
        }

        Self::from_hex(spec).map_err(|_| PanelError::UnknownColor(spec.to_string()))
    }

    fn rgb(self) -> Rgb<u8> {
        Rgb([self.r, self.g, self.b])
    }
}

impl FromStr for Color {
    type Err = PanelError;

    fn from_str(s: &str) -> Result<Self> {
        Self::parse(s)
    }
}

/// Layout options for [`render_panels`]
#[derive(Debug, Clone)]
pub struct PanelOptions {
    /// Integer upscaling factor applied to every panel (nearest neighbour)
    pub scale: u32,
    /// Width of the black frame around each panel, in output pixels
    pub border: u32,
    /// Space between neighbouring panels
    pub gap: u32,
    /// Space around the whole row of panels
    pub margin: u32,
    /// Figure background
    pub background: Color,
    /// One title per panel, or empty for no titles
    pub labels: Vec<String>,
    /// Title font size in pixels
    pub label_size: f32,
    /// Space between the titles and the panel frames
    pub label_pad: u32,
    /// Title text color
    pub label_color: Color,
    /// Font used for titles; titles are skipped when `None`
    pub font: Option<TextFont>,
}

impl Default for PanelOptions {
    fn default() -> Self {
        Self {
            scale: 2,
            border: 2,
            gap: 16,
            margin: 24,
            background: Color::new(255, 255, 255),
            labels: Vec::new(),
            label_size: 24.0,
            label_pad: 12,
            label_color: Color::new(0, 0, 0),
            font: None,
        }
    }
}

/// Error types for panel rendering
#[derive(Error, Debug)]
pub enum PanelError {
    /// Invalid hex color string format
    #[error("Invalid hex color: {0}")]
    InvalidHexColor(String),

    /// Neither a known color name nor a hex string
    #[error("Unknown color: {0}")]
    UnknownColor(String),

    /// Labels given, but not one per panel
    #[error("Got {labels} labels for {panels} panels")]
    LabelCount {
        /// Number of labels supplied
        labels: usize,
        /// Number of panels to render
        panels: usize,
    },

    /// Nothing to render
    #[error("At least one panel is required")]
    NoPanels,

    /// Scale factor of zero
    #[error("Scale must be at least 1")]
    InvalidScale,

    /// Failed to save the figure
    #[error("Failed to save image: {0}")]
    Image(#[from] image::ImageError),
}

/// Result type for panel rendering
pub type Result<T> = std::result::Result<T, PanelError>;

/**
 * Render grids left to right into one RGB image
 *
 * Panels are top aligned; the figure is as tall as the tallest panel plus
 * borders, margins and the title band. Grid values are drawn as gray levels.
 */
pub fn render_panels(panels: &[&Grid], options: &PanelOptions) -> Result<RgbImage> {
    if panels.is_empty() {
        return Err(PanelError::NoPanels);
    }
    if options.scale == 0 {
        return Err(PanelError::InvalidScale);
    }
    if !options.labels.is_empty() && options.labels.len() != panels.len() {
        return Err(PanelError::LabelCount {
            labels: options.labels.len(),
            panels: panels.len(),
        });
    }

    let font = match &options.font {
        Some(font) if !options.labels.is_empty() => Some(font),
        None if !options.labels.is_empty() => {
            warn!("no font available, panel labels skipped");
            None
        }
        _ => None,
    };
    let title_band = font
        .map(|f| f.line_height(options.label_size).ceil() as u32 + options.label_pad)
        .unwrap_or(0);

    let scale = options.scale;
    let framed = |grid: &Grid| {
        (
            grid.width() as u32 * scale + 2 * options.border,
            grid.height() as u32 * scale + 2 * options.border,
        )
    };

    let content_width: u32 = panels.iter().map(|g| framed(*g).0).sum::<u32>()
        + options.gap * (panels.len() as u32 - 1);
    let content_height = panels.iter().map(|g| framed(*g).1).max().unwrap_or(0);

    let mut img = RgbImage::from_pixel(
        content_width + 2 * options.margin,
        content_height + title_band + 2 * options.margin,
        options.background.rgb(),
    );

    let black = Rgb([0, 0, 0]);
    let mut left = options.margin;
    let top = options.margin + title_band;

    for (i, &grid) in panels.iter().enumerate() {
        let (frame_w, frame_h) = framed(grid);

        if let Some(font) = font {
            let label = &options.labels[i];
            let text_w = font.text_width(label, options.label_size);
            let x = left as f32 + (frame_w as f32 - text_w) / 2.0;
            draw_label(&mut img, font, label, options, x, options.margin as f32);
        }

        for y in top..top + frame_h {
            for x in left..left + frame_w {
                img.put_pixel(x, y, black);
            }
        }

        let inner_left = left + options.border;
        let inner_top = top + options.border;
        for row in 0..grid.height() {
            for col in 0..grid.width() {
                let v = to_u8(grid.get(row, col));
                let px = Rgb([v, v, v]);
                let x0 = inner_left + col as u32 * scale;
                let y0 = inner_top + row as u32 * scale;
                for dy in 0..scale {
                    for dx in 0..scale {
                        img.put_pixel(x0 + dx, y0 + dy, px);
                    }
                }
            }
        }

        left += frame_w + options.gap;
    }

    Ok(img)
}

/// Alpha-blend a title onto the figure
fn draw_label(img: &mut RgbImage, font: &TextFont, text: &str, options: &PanelOptions, x: f32, y: f32) {
    let ink = options.label_color;
    let (width, height) = img.dimensions();

    font.draw(text, options.label_size, x, y, |px, py, coverage| {
        if px < 0 || py < 0 || px as u32 >= width || py as u32 >= height {
            return;
        }
        let pixel = img.get_pixel_mut(px as u32, py as u32);
        let a = coverage.clamp(0.0, 1.0);
        for (channel, target) in pixel.0.iter_mut().zip([ink.r, ink.g, ink.b]) {
            let blended = *channel as f32 * (1.0 - a) + target as f32 * a;
            *channel = blended.round() as u8;
        }
    });
}

/// Render panels and save them to `path`
pub fn save_panels<P: AsRef<Path>>(panels: &[&Grid], options: &PanelOptions, path: P) -> Result<()> {
    let img = render_panels(panels, options)?;
    img.save(path)?;
    Ok(())
}
