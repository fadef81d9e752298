//! Font lookup and glyph drawing.
//!
//! Fonts are found by name in the configured and platform font directories,
//! or loaded from an explicit path. The name `builtin` selects an embedded
//! 8x8 bitmap face that needs no font files at all; it is also what the
//! title compositor falls back to.

use std::path::{Path, PathBuf};

use ab_glyph::{Font, FontVec, PxScale, ScaleFont};
use codecard_common::error::{CardError, CardResult};
use codecard_model::FontSize;
use font8x8::UnicodeFonts;
use image::{Rgb, RgbImage};
use walkdir::WalkDir;

/// Font name that selects the embedded bitmap face.
pub const BUILTIN_FONT_NAME: &str = "builtin";

const FONT_EXTENSIONS: [&str; 3] = ["ttf", "otf", "ttc"];
const BITMAP_GLYPH_SIZE: u32 = 8;

/// A loaded face at a fixed pixel size.
pub enum CardFont {
    Outline(OutlineFont),
    Builtin(BitmapFont),
}

/// A TrueType/OpenType face.
pub struct OutlineFont {
    name: String,
    font: FontVec,
    scale: PxScale,
}

/// The embedded 8x8 face, magnified by an integer factor.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct BitmapFont {
    magnify: u32,
}

impl std::fmt::Debug for CardFont {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        match self {
            CardFont::Outline(outline) => f
                .debug_struct("Outline")
                .field("name", &outline.name)
                .field("scale", &outline.scale)
                .finish(),
            CardFont::Builtin(bitmap) => f.debug_tuple("Builtin").field(bitmap).finish(),
        }
    }
}

impl CardFont {
    /// The embedded face, magnified to roughly `size` pixels.
    pub fn builtin(size: FontSize) -> Self {
        CardFont::Builtin(BitmapFont {
            magnify: (size.get() / BITMAP_GLYPH_SIZE).max(1),
        })
    }

    pub fn name(&self) -> &str {
        match self {
            CardFont::Outline(outline) => &outline.name,
            CardFont::Builtin(_) => BUILTIN_FONT_NAME,
        }
    }

    pub fn is_builtin(&self) -> bool {
        matches!(self, CardFont::Builtin(_))
    }

    /// Horizontal advance of one monospace cell.
    pub fn cell_width(&self) -> u32 {
        match self {
            CardFont::Outline(outline) => {
                let scaled = outline.font.as_scaled(outline.scale);
                (scaled.h_advance(scaled.glyph_id('M')).ceil() as u32).max(1)
            }
            CardFont::Builtin(bitmap) => BITMAP_GLYPH_SIZE * bitmap.magnify,
        }
    }

    /// Height of one line of text, without extra spacing.
    pub fn line_height(&self) -> u32 {
        match self {
            CardFont::Outline(outline) => {
                let scaled = outline.font.as_scaled(outline.scale);
                ((scaled.ascent() - scaled.descent() + scaled.line_gap()).ceil() as u32).max(1)
            }
            CardFont::Builtin(bitmap) => BITMAP_GLYPH_SIZE * bitmap.magnify,
        }
    }

    /// Pixel width and height of `text` drawn on one line.
    pub fn text_size(&self, text: &str) -> (u32, u32) {
        match self {
            CardFont::Outline(outline) => {
                imageproc::drawing::text_size(outline.scale, &outline.font, text)
            }
            CardFont::Builtin(bitmap) => {
                let side = BITMAP_GLYPH_SIZE * bitmap.magnify;
                (text.chars().count() as u32 * side, side)
            }
        }
    }

    /// Draw `text` with its top-left corner at `(x, y)`. Anything outside
    /// the canvas is clipped.
    pub fn draw_text(&self, canvas: &mut RgbImage, color: Rgb<u8>, x: i32, y: i32, text: &str) {
        match self {
            CardFont::Outline(outline) => imageproc::drawing::draw_text_mut(
                canvas,
                color,
                x,
                y,
                outline.scale,
                &outline.font,
                text,
            ),
            CardFont::Builtin(bitmap) => {
                let advance = (BITMAP_GLYPH_SIZE * bitmap.magnify) as i32;
                for (i, ch) in text.chars().enumerate() {
                    bitmap.draw_glyph(canvas, color, x + i as i32 * advance, y, ch);
                }
            }
        }
    }
}

impl BitmapFont {
    fn glyph(ch: char) -> [u8; 8] {
        font8x8::BASIC_FONTS
            .get(ch)
            .or_else(|| font8x8::LATIN_FONTS.get(ch))
            .or_else(|| font8x8::BOX_FONTS.get(ch))
            .or_else(|| font8x8::BLOCK_FONTS.get(ch))
            .or_else(|| font8x8::GREEK_FONTS.get(ch))
            .or_else(|| font8x8::BASIC_FONTS.get('?'))
            .unwrap_or([0; 8])
    }

    fn draw_glyph(&self, canvas: &mut RgbImage, color: Rgb<u8>, x: i32, y: i32, ch: char) {
        let (width, height) = (canvas.width() as i64, canvas.height() as i64);
        let m = self.magnify as i64;
        for (row, bits) in Self::glyph(ch).iter().enumerate() {
            for col in 0..BITMAP_GLYPH_SIZE as i64 {
                // Bit 0 is the leftmost pixel.
                if bits & (1 << col) == 0 {
                    continue;
                }
                for dy in 0..m {
                    for dx in 0..m {
                        let px = x as i64 + col * m + dx;
                        let py = y as i64 + row as i64 * m + dy;
                        if (0..width).contains(&px) && (0..height).contains(&py) {
                            canvas.put_pixel(px as u32, py as u32, color);
                        }
                    }
                }
            }
        }
    }
}

/// Finds font files by name.
#[derive(Debug, Clone)]
pub struct FontLocator {
    search_dirs: Vec<PathBuf>,
}

impl Default for FontLocator {
    fn default() -> Self {
        Self::new(Vec::new())
    }
}

impl FontLocator {
    /// Search `extra_dirs` first, then the platform font directories.
    pub fn new(extra_dirs: impl IntoIterator<Item = PathBuf>) -> Self {
        let mut search_dirs: Vec<PathBuf> = extra_dirs.into_iter().collect();
        search_dirs.extend(platform_font_dirs());
        Self { search_dirs }
    }

    /// Search exactly `dirs`, nothing else.
    pub fn with_dirs(dirs: Vec<PathBuf>) -> Self {
        Self { search_dirs: dirs }
    }

    pub fn search_dirs(&self) -> &[PathBuf] {
        &self.search_dirs
    }

    /// Every font file under the search directories, in search order.
    pub fn discover(&self) -> Vec<PathBuf> {
        self.search_dirs
            .iter()
            .filter(|dir| dir.is_dir())
            .flat_map(|dir| font_files(dir))
            .collect()
    }

    /// Path of the first font file matching `name`. A path to an existing
    /// file is returned as is.
    pub fn find(&self, name: &str) -> Option<PathBuf> {
        let direct = Path::new(name);
        if direct.is_file() {
            return Some(direct.to_path_buf());
        }

        let wanted = normalize_font_name(name);
        if wanted.is_empty() {
            return None;
        }

        self.search_dirs
            .iter()
            .filter(|dir| dir.is_dir())
            .flat_map(|dir| font_files(dir))
            .find(|path| {
                path.file_stem()
                    .and_then(|stem| stem.to_str())
                    .is_some_and(|stem| stem_matches(&normalize_font_name(stem), &wanted))
            })
    }

    /// Load `name` at `size`. Fails when no file matches or the file is not a
    /// usable font.
    pub fn load(&self, name: &str, size: FontSize) -> CardResult<CardFont> {
        if name.trim().eq_ignore_ascii_case(BUILTIN_FONT_NAME) {
            return Ok(CardFont::builtin(size));
        }

        let path = self
            .find(name)
            .ok_or_else(|| CardError::font_load(name, "no matching font file"))?;
        let data = std::fs::read(&path)
            .map_err(|e| CardError::font_load(name, format!("{}: {e}", path.display())))?;
        let font = FontVec::try_from_vec_and_index(data, 0)
            .map_err(|e| CardError::font_load(name, format!("{}: {e}", path.display())))?;
        let scale = font
            .pt_to_px_scale(size.get() as f32)
            .unwrap_or_else(|| PxScale::from(size.get() as f32));

        tracing::debug!(font = name, path = %path.display(), size = size.get(), "Loaded font");

        Ok(CardFont::Outline(OutlineFont {
            name: name.to_string(),
            font,
            scale,
        }))
    }

    /// Load `name` at `size`, falling back to the builtin face on any
    /// failure.
    pub fn load_or_builtin(&self, name: &str, size: FontSize) -> CardFont {
        match self.load(name, size) {
            Ok(font) => font,
            Err(e) => {
                tracing::warn!(font = name, error = %e, "Falling back to builtin font");
                CardFont::builtin(size)
            }
        }
    }
}

fn font_files(dir: &Path) -> impl Iterator<Item = PathBuf> {
    WalkDir::new(dir)
        .follow_links(true)
        .sort_by_file_name()
        .into_iter()
        .filter_map(Result::ok)
        .filter(|entry| entry.file_type().is_file())
        .map(|entry| entry.into_path())
        .filter(|path| {
            path.extension()
                .and_then(|ext| ext.to_str())
                .is_some_and(|ext| {
                    FONT_EXTENSIONS
                        .iter()
                        .any(|known| ext.eq_ignore_ascii_case(known))
                })
        })
}

/// Lowercase with spaces, dashes, and underscores removed.
fn normalize_font_name(name: &str) -> String {
    name.chars()
        .filter(|c| !matches!(c, ' ' | '-' | '_'))
        .flat_map(char::to_lowercase)
        .collect()
}

fn stem_matches(stem: &str, wanted: &str) -> bool {
    stem == wanted
        || stem
            .strip_prefix(wanted)
            .is_some_and(|rest| matches!(rest, "regular" | "book" | "r"))
}

fn platform_font_dirs() -> Vec<PathBuf> {
    let mut dirs = Vec::new();

    if let Ok(data) = std::env::var("XDG_DATA_HOME") {
        dirs.push(PathBuf::from(data).join("fonts"));
    }
    if let Ok(home) = std::env::var("HOME") {
        let home = PathBuf::from(home);
        dirs.push(home.join(".local").join("share").join("fonts"));
        dirs.push(home.join(".fonts"));
        dirs.push(home.join("Library").join("Fonts"));
    }
    for system in [
        "/usr/share/fonts",
        "/usr/local/share/fonts",
        "/Library/Fonts",
        "/System/Library/Fonts",
    ] {
        dirs.push(PathBuf::from(system));
    }
    if let Ok(windir) = std::env::var("WINDIR") {
        dirs.push(PathBuf::from(windir).join("Fonts"));
    }

    dirs
}

#[cfg(test)]
mod tests {
    use super::*;

    fn size(px: u32) -> FontSize {
        FontSize::new(px).unwrap()
    }

    #[test]
    fn test_normalize_font_name() {
        assert_eq!(normalize_font_name("DejaVu Sans Mono"), "dejavusansmono");
        assert_eq!(normalize_font_name("DejaVuSansMono"), "dejavusansmono");
        assert_eq!(normalize_font_name("fira_code-Regular"), "firacoderegular");
    }

    #[test]
    fn test_stem_matches_regular_suffix() {
        assert!(stem_matches("firacoderegular", "firacode"));
        assert!(stem_matches("firacode", "firacode"));
        assert!(!stem_matches("firacodebold", "firacode"));
    }

    #[test]
    fn test_find_by_name_in_search_dirs() {
        let dir = tempfile::tempdir().unwrap();
        let nested = dir.path().join("truetype").join("fira");
        std::fs::create_dir_all(&nested).unwrap();
        std::fs::write(nested.join("FiraCode-Regular.ttf"), b"").unwrap();
        std::fs::write(nested.join("FiraCode-Bold.ttf"), b"").unwrap();
        std::fs::write(nested.join("README.txt"), b"").unwrap();

        let locator = FontLocator::with_dirs(vec![dir.path().to_path_buf()]);
        let found = locator.find("Fira Code").unwrap();
        assert_eq!(found.file_name().unwrap(), "FiraCode-Regular.ttf");
        assert!(locator.find("Consolas").is_none());
        assert_eq!(locator.discover().len(), 2);
    }

    #[test]
    fn test_missing_font_is_an_error() {
        let dir = tempfile::tempdir().unwrap();
        let locator = FontLocator::with_dirs(vec![dir.path().to_path_buf()]);
        let err = locator.load("Consolas", size(24)).unwrap_err();
        assert!(matches!(err, CardError::FontLoad { .. }));
    }

    #[test]
    fn test_corrupt_font_is_an_error() {
        let dir = tempfile::tempdir().unwrap();
        std::fs::write(dir.path().join("Broken.ttf"), b"not a font").unwrap();
        let locator = FontLocator::with_dirs(vec![dir.path().to_path_buf()]);
        assert!(locator.load("Broken", size(24)).is_err());
    }

    #[test]
    fn test_load_or_builtin_never_fails() {
        let locator = FontLocator::with_dirs(Vec::new());
        let font = locator.load_or_builtin("No Such Font", size(32));
        assert!(font.is_builtin());
        assert_eq!(font.text_size("ab"), (64, 32));
    }

    #[test]
    fn test_builtin_by_name() {
        let locator = FontLocator::with_dirs(Vec::new());
        let font = locator.load("Builtin", size(16)).unwrap();
        assert!(font.is_builtin());
        assert_eq!(font.cell_width(), 16);
        assert_eq!(font.line_height(), 16);
    }

    #[test]
    fn test_builtin_magnification_never_below_one() {
        let font = CardFont::builtin(size(3));
        assert_eq!(font.cell_width(), 8);
    }

    #[test]
    fn test_builtin_draws_and_clips() {
        let font = CardFont::builtin(size(8));
        let mut canvas = RgbImage::from_pixel(12, 12, Rgb([0, 0, 0]));
        font.draw_text(&mut canvas, Rgb([255, 255, 255]), -4, 6, "A");
        assert!(canvas.pixels().any(|p| p.0 == [255, 255, 255]));

        let mut blank = RgbImage::from_pixel(12, 12, Rgb([0, 0, 0]));
        font.draw_text(&mut blank, Rgb([255, 255, 255]), 0, 0, " ");
        assert!(blank.pixels().all(|p| p.0 == [0, 0, 0]));
    }
}
