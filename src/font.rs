/**
 * TrueType Text Rasterisation
 *
 * Panel titles and font-drawn block letters are rendered with `rusttype`.
 * The crate ships no font: one is loaded from an explicit path or looked up
 * among common system locations, and callers fall back to font-free output
 * when nothing is found.
 *
 * COORDINATES
 * ===========
 * Text is positioned by its top-left corner. The baseline sits `ascent`
 * pixels below `top`, so a line occupies `[top, top + line_height)`.
 */

use rusttype::{point, Font, PositionedGlyph, Scale};
use std::fmt;
use std::path::{Path, PathBuf};
use thiserror::Error;
use tracing::debug;

/// Bold sans-serif fonts tried by [`TextFont::find_system`], in order
pub const SYSTEM_FONT_PATHS: &[&str] = &[
    "/System/Library/Fonts/Supplemental/Arial Bold.ttf",
    "/Library/Fonts/Arial Bold.ttf",
    "/System/Library/Fonts/Helvetica.ttc",
    "/usr/share/fonts/truetype/dejavu/DejaVuSans-Bold.ttf",
    "/usr/share/fonts/dejavu/DejaVuSans-Bold.ttf",
    "/usr/share/fonts/TTF/DejaVuSans-Bold.ttf",
    "/usr/share/fonts/truetype/liberation/LiberationSans-Bold.ttf",
    "/usr/share/fonts/liberation-sans/LiberationSans-Bold.ttf",
    "C:\\Windows\\Fonts\\arialbd.ttf",
];

/// Error types for font loading
#[derive(Error, Debug)]
pub enum FontError {
    /// The font file could not be read
    #[error("Failed to read font {path}: {source}")]
    Io {
        /// Font file that failed
        path: PathBuf,
        /// Underlying I/O error
        #[source]
        source: std::io::Error,
    },

    /// The file is not a TrueType/OpenType font
    #[error("Not a usable font file: {0}")]
    Parse(PathBuf),
}

/// Result type for font operations
pub type Result<T> = std::result::Result<T, FontError>;

/// Pixel extent of inked text: `(min_x, min_y, max_x, max_y)`, max exclusive
pub type InkBounds = (i32, i32, i32, i32);

/// A loaded font plus the file it came from
#[derive(Clone)]
pub struct TextFont {
    font: Font<'static>,
    source: PathBuf,
}

impl fmt::Debug for TextFont {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "TextFont({})", self.source.display())
    }
}

impl TextFont {
    /// Load a font file (`.ttf`, `.otf`, or the first face of a `.ttc`)
    pub fn load<P: AsRef<Path>>(path: P) -> Result<Self> {
        let path = path.as_ref();
        let data = std::fs::read(path).map_err(|source| FontError::Io {
            path: path.to_path_buf(),
            source,
        })?;
        let font = Font::try_from_vec(data).ok_or_else(|| FontError::Parse(path.to_path_buf()))?;

        Ok(Self {
            font,
            source: path.to_path_buf(),
        })
    }

    /// First loadable font from [`SYSTEM_FONT_PATHS`]
    pub fn find_system() -> Option<Self> {
        for candidate in SYSTEM_FONT_PATHS {
            let path = Path::new(candidate);
            if !path.exists() {
                continue;
            }
            match Self::load(path) {
                Ok(font) => {
                    debug!(path = %path.display(), "using system font");
                    return Some(font);
                }
                Err(err) => debug!(%err, "skipping font"),
            }
        }
        None
    }

    /// File the font was loaded from
    pub fn source(&self) -> &Path {
        &self.source
    }

    /// Distance from the top of a line to its baseline
    pub fn ascent(&self, size: f32) -> f32 {
        self.font.v_metrics(Scale::uniform(size)).ascent
    }

    /// Height of one line of text (ascent plus descent, no line gap)
    pub fn line_height(&self, size: f32) -> f32 {
        let v = self.font.v_metrics(Scale::uniform(size));
        v.ascent - v.descent
    }

    /// Advance width of `text`, including kerning
    pub fn text_width(&self, text: &str, size: f32) -> f32 {
        self.layout(text, size, 0.0, 0.0)
            .last()
            .map(|g| g.position().x + g.unpositioned().h_metrics().advance_width)
            .unwrap_or(0.0)
    }

    /// Union of the glyph pixel boxes of `text` drawn at `(0, 0)`
    ///
    /// `None` when no glyph leaves ink (empty text, spaces).
    pub fn ink_bounds(&self, text: &str, size: f32) -> Option<InkBounds> {
        self.layout(text, size, 0.0, 0.0)
            .filter_map(|g| g.pixel_bounding_box())
            .map(|bb| (bb.min.x, bb.min.y, bb.max.x, bb.max.y))
            .reduce(|a, b| (a.0.min(b.0), a.1.min(b.1), a.2.max(b.2), a.3.max(b.3)))
    }

    /**
     * Rasterise `text` with its top-left corner at `(left, top)`
     *
     * `plot(x, y, coverage)` is called for every pixel a glyph touches, with
     * coverage in [0, 1]. Coordinates may fall outside the caller's canvas.
     */
    pub fn draw<F>(&self, text: &str, size: f32, left: f32, top: f32, mut plot: F)
    where
        F: FnMut(i32, i32, f32),
    {
        for glyph in self.layout(text, size, left, top) {
            if let Some(bb) = glyph.pixel_bounding_box() {
                glyph.draw(|x, y, v| plot(bb.min.x + x as i32, bb.min.y + y as i32, v));
            }
        }
    }

    fn layout<'a>(
        &'a self,
        text: &'a str,
        size: f32,
        left: f32,
        top: f32,
    ) -> impl Iterator<Item = PositionedGlyph<'static>> + 'a {
        let scale = Scale::uniform(size);
        let baseline = top + self.font.v_metrics(scale).ascent;
        self.font.layout(text, scale, point(left, baseline))
    }
}
