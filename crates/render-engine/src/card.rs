//! Card renderer: paints highlighted source onto a raster image.
//!
//! Layout follows the classic image-formatter defaults: a fixed outer
//! padding, a little extra spacing between lines, and an optional gutter of
//! right-aligned line numbers separated from the code by a 1px rule.

use std::io::Cursor;

use codecard_common::error::{CardError, CardResult};
use codecard_model::{HighlightStyle, ThemeParameters};
use image::{DynamicImage, ImageFormat, Rgb, RgbImage};
use imageproc::drawing::{draw_filled_rect_mut, draw_line_segment_mut};
use imageproc::rect::Rect;
use syntect::easy::HighlightLines;
use syntect::highlighting::Theme as HighlightTheme;
use syntect::parsing::SyntaxSet;
use syntect::util::LinesWithEndings;
use two_face::theme::{EmbeddedLazyThemeSet, EmbeddedThemeName};
use unicode_width::UnicodeWidthChar;

use crate::fonts::CardFont;
use crate::language::ResolvedLanguage;

/// Padding around the whole image.
pub const IMAGE_PAD: u32 = 10;
/// Extra spacing added below every line.
pub const LINE_PAD: u32 = 2;
/// Padding on each side of the line numbers.
pub const LINE_NUMBER_PAD: u32 = 6;
/// The gutter is never narrower than this many digits.
pub const MIN_LINE_NUMBER_CHARS: usize = 2;
/// Tab stops every this many columns.
pub const TAB_WIDTH: usize = 4;
/// Largest width or height a card may have, in pixels.
pub const MAX_CARD_DIMENSION: u32 = 32_767;

/// An in-memory RGB raster.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct RenderedImage {
    pixels: RgbImage,
}

impl RenderedImage {
    pub fn from_pixels(pixels: RgbImage) -> Self {
        Self { pixels }
    }

    pub fn width(&self) -> u32 {
        self.pixels.width()
    }

    pub fn height(&self) -> u32 {
        self.pixels.height()
    }

    pub fn pixels(&self) -> &RgbImage {
        &self.pixels
    }

    /// Encode as an uncompressed 24-bit BMP.
    pub fn to_bmp_bytes(&self) -> CardResult<Vec<u8>> {
        let mut buffer = Cursor::new(Vec::new());
        DynamicImage::ImageRgb8(self.pixels.clone())
            .write_to(&mut buffer, ImageFormat::Bmp)
            .map_err(|e| CardError::render(format!("BMP encoding failed: {e}")))?;
        Ok(buffer.into_inner())
    }
}

/// A run of text sharing one foreground color, tabs already expanded.
#[derive(Debug, Clone, PartialEq, Eq)]
struct StyledRun {
    color: Rgb<u8>,
    text: String,
}

type StyledLine = Vec<StyledRun>;

/// Renders highlighted code with a syntax set and theme bundle.
pub struct CardRenderer<'a> {
    syntax_set: &'a SyntaxSet,
    theme_set: &'a EmbeddedLazyThemeSet,
}

impl<'a> CardRenderer<'a> {
    pub fn new(syntax_set: &'a SyntaxSet, theme_set: &'a EmbeddedLazyThemeSet) -> Self {
        Self {
            syntax_set,
            theme_set,
        }
    }

    fn highlight_theme(&self, style: HighlightStyle) -> &'a HighlightTheme {
        let name = match style {
            HighlightStyle::InspiredGithub => EmbeddedThemeName::InspiredGithub,
            HighlightStyle::MonokaiExtended => EmbeddedThemeName::MonokaiExtended,
        };
        self.theme_set.get(name)
    }

    /// Render every line of `contents` with `font`, adding a line-number
    /// gutter when `show_line_numbers` is set.
    pub fn render(
        &self,
        contents: &str,
        language: &ResolvedLanguage<'_>,
        font: &CardFont,
        show_line_numbers: bool,
        params: &ThemeParameters,
    ) -> CardResult<RenderedImage> {
        let theme = self.highlight_theme(params.highlight_style);
        let background = theme
            .settings
            .background
            .map(to_rgb)
            .unwrap_or(Rgb(params.title_background.channels()));
        let foreground = theme
            .settings
            .foreground
            .map(to_rgb)
            .unwrap_or(Rgb(params.title_foreground.channels()));

        let lines = self.highlight(contents, language, theme, foreground)?;

        let cell_width = font.cell_width();
        let line_height = font.line_height() + LINE_PAD;
        let max_columns = lines.iter().map(|line| line_columns(line)).max().unwrap_or(0);
        let gutter_width = if show_line_numbers {
            gutter_width(lines.len(), cell_width)
        } else {
            0
        };

        let (width, height) =
            canvas_size(gutter_width, max_columns, lines.len(), cell_width, line_height)?;

        tracing::debug!(
            language = language.name(),
            style = params.highlight_style.name(),
            lines = lines.len(),
            width,
            height,
            "Rendering card"
        );

        let mut canvas = RgbImage::from_pixel(width, height, background);

        if show_line_numbers {
            let gutter_bg = Rgb(params.line_number_background.channels());
            let gutter_fg = Rgb(params.line_number_foreground.channels());
            draw_filled_rect_mut(
                &mut canvas,
                Rect::at(0, 0).of_size(gutter_width, height),
                gutter_bg,
            );
            let rule_x = (gutter_width - 1) as f32;
            draw_line_segment_mut(
                &mut canvas,
                (rule_x, 0.0),
                (rule_x, (height - 1) as f32),
                gutter_fg,
            );

            for index in 0..lines.len() {
                let number = (index + 1).to_string();
                let number_width = to_u32(number.len()) * cell_width;
                let x = gutter_width - LINE_NUMBER_PAD - number_width;
                let y = IMAGE_PAD + to_u32(index) * line_height;
                draw_cells(&mut canvas, font, gutter_fg, x, y, cell_width, &number);
            }
        }

        let code_x = gutter_width + IMAGE_PAD;
        for (index, line) in lines.iter().enumerate() {
            let y = IMAGE_PAD + to_u32(index) * line_height;
            let mut column = 0u32;
            for run in line {
                column = draw_run(&mut canvas, font, run, code_x, y, cell_width, column);
            }
        }

        Ok(RenderedImage::from_pixels(canvas))
    }

    /// Tokenize and color every line. Empty input yields one empty line.
    fn highlight(
        &self,
        contents: &str,
        language: &ResolvedLanguage<'_>,
        theme: &HighlightTheme,
        foreground: Rgb<u8>,
    ) -> CardResult<Vec<StyledLine>> {
        let mut highlighter = HighlightLines::new(language.syntax(), theme);
        let mut lines = Vec::new();

        for line in LinesWithEndings::from(contents) {
            let ranges = highlighter
                .highlight_line(line, self.syntax_set)
                .map_err(|e| {
                    CardError::render(format!("highlighting as {} failed: {e}", language.name()))
                })?;

            let mut styled = Vec::with_capacity(ranges.len());
            let mut column = 0usize;
            for (style, text) in ranges {
                let text = expand_tabs(text, &mut column);
                if text.is_empty() {
                    continue;
                }
                let color = if style.foreground.a == 0 {
                    foreground
                } else {
                    to_rgb(style.foreground)
                };
                styled.push(StyledRun { color, text });
            }
            lines.push(styled);
        }

        if lines.is_empty() {
            lines.push(Vec::new());
        }
        Ok(lines)
    }
}

fn to_rgb(color: syntect::highlighting::Color) -> Rgb<u8> {
    Rgb([color.r, color.g, color.b])
}

fn to_u32(n: usize) -> u32 {
    u32::try_from(n).unwrap_or(u32::MAX)
}

/// Strip line terminators and expand tabs, tracking the display column
/// across runs of the same line.
fn expand_tabs(text: &str, column: &mut usize) -> String {
    let mut out = String::with_capacity(text.len());
    for ch in text.chars() {
        match ch {
            '\n' | '\r' => {}
            '\t' => {
                let spaces = TAB_WIDTH - *column % TAB_WIDTH;
                out.extend(std::iter::repeat(' ').take(spaces));
                *column += spaces;
            }
            _ => {
                out.push(ch);
                *column += ch.width().unwrap_or(0);
            }
        }
    }
    out
}

fn line_columns(line: &StyledLine) -> usize {
    line.iter()
        .flat_map(|run| run.text.chars())
        .map(|ch| ch.width().unwrap_or(0))
        .sum()
}

/// Canvas size for the given grid, rejecting cards past [`MAX_CARD_DIMENSION`].
fn canvas_size(
    gutter_width: u32,
    columns: usize,
    lines: usize,
    cell_width: u32,
    line_height: u32,
) -> CardResult<(u32, u32)> {
    let pad = u64::from(IMAGE_PAD) * 2;
    let width = (columns as u64)
        .saturating_mul(u64::from(cell_width))
        .saturating_add(u64::from(gutter_width))
        .saturating_add(pad);
    let height = (lines as u64)
        .saturating_mul(u64::from(line_height))
        .saturating_add(pad);

    let limit = u64::from(MAX_CARD_DIMENSION);
    if width > limit || height > limit {
        return Err(CardError::render(format!(
            "card would be {width}x{height} pixels, larger than the {limit}px limit"
        )));
    }
    Ok((width as u32, height as u32))
}

fn gutter_width(line_count: usize, cell_width: u32) -> u32 {
    let digits = line_count.max(1).to_string().len().max(MIN_LINE_NUMBER_CHARS);
    to_u32(digits) * cell_width + LINE_NUMBER_PAD * 2
}

/// Draw `text` one character per cell starting at `x`.
fn draw_cells(
    canvas: &mut RgbImage,
    font: &CardFont,
    color: Rgb<u8>,
    x: u32,
    y: u32,
    cell_width: u32,
    text: &str,
) {
    let mut buf = [0u8; 4];
    for (i, ch) in text.chars().enumerate() {
        let cell_x = x + to_u32(i) * cell_width;
        font.draw_text(canvas, color, cell_x as i32, y as i32, ch.encode_utf8(&mut buf));
    }
}

/// Draw one run on the monospace grid and return the next free column.
/// Wide characters take two cells; zero-width ones are skipped.
fn draw_run(
    canvas: &mut RgbImage,
    font: &CardFont,
    run: &StyledRun,
    origin_x: u32,
    y: u32,
    cell_width: u32,
    mut column: u32,
) -> u32 {
    let mut buf = [0u8; 4];
    for ch in run.text.chars() {
        let cells = to_u32(ch.width().unwrap_or(0));
        if cells == 0 {
            continue;
        }
        if !ch.is_whitespace() {
            let x = origin_x + column * cell_width;
            font.draw_text(canvas, run.color, x as i32, y as i32, ch.encode_utf8(&mut buf));
        }
        column += cells;
    }
    column
}
