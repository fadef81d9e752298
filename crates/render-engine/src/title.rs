//! Title compositor: adds a band with a centered title above a card.
//!
//! The band is as tall as the title text plus a 10px margin above and
//! below it. Titles wider than the card are neither wrapped nor truncated;
//! whatever falls outside the canvas is clipped.

use codecard_model::{map_theme, FontSize, Theme, ThemeParameters};
use image::{imageops, Rgb, RgbImage};

use crate::card::RenderedImage;
use crate::fonts::{CardFont, FontLocator};

/// Title text is drawn this many pixels larger than the code.
pub const TITLE_FONT_GROWTH: u32 = 8;

/// Space above the title text; the same space again sits below it.
pub const TITLE_MARGIN: u32 = 10;

/// Placement of the title band and its text.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct TitleBand {
    /// Height added above the original image.
    pub band_height: u32,
    /// Left edge of the text; negative when the title overflows.
    pub text_x: i32,
    /// Top edge of the text.
    pub text_y: i32,
}

impl TitleBand {
    /// Compute the band for text measuring `text_width` x `text_height` above
    /// an image `image_width` pixels wide.
    pub fn layout(image_width: u32, text_width: u32, text_height: u32) -> Self {
        let slack = image_width as i64 - text_width as i64;
        Self {
            band_height: text_height + TITLE_MARGIN * 2,
            text_x: (slack.div_euclid(2)).clamp(i32::MIN as i64, i32::MAX as i64) as i32,
            text_y: TITLE_MARGIN as i32,
        }
    }
}

/// Add a title band to `image`. The title font is `font_name` at
/// `font_size + 8`, or the builtin face when that cannot be loaded; this
/// never fails.
pub fn add_title(
    image: &RenderedImage,
    title: &str,
    theme: Theme,
    font_name: &str,
    font_size: FontSize,
    fonts: &FontLocator,
) -> RenderedImage {
    let font = fonts.load_or_builtin(font_name, font_size.enlarged(TITLE_FONT_GROWTH));
    composite_title(image, title, &map_theme(theme), &font)
}

/// Add a title band drawn with an already loaded font.
pub fn composite_title(
    image: &RenderedImage,
    title: &str,
    params: &ThemeParameters,
    font: &CardFont,
) -> RenderedImage {
    let (text_width, text_height) = font.text_size(title);
    let band = TitleBand::layout(image.width(), text_width, text_height);

    tracing::debug!(
        title,
        font = font.name(),
        text_width,
        text_height,
        band_height = band.band_height,
        "Compositing title"
    );

    let mut canvas = RgbImage::from_pixel(
        image.width(),
        image.height() + band.band_height,
        Rgb(params.title_background.channels()),
    );
    imageops::replace(&mut canvas, image.pixels(), 0, band.band_height as i64);
    font.draw_text(
        &mut canvas,
        Rgb(params.title_foreground.channels()),
        band.text_x,
        band.text_y,
        title,
    );

    RenderedImage::from_pixels(canvas)
}

#[cfg(test)]
mod tests {
    use super::*;

    fn card(width: u32, height: u32, fill: [u8; 3]) -> RenderedImage {
        RenderedImage::from_pixels(RgbImage::from_pixel(width, height, Rgb(fill)))
    }

    #[test]
    fn test_layout_centers_text() {
        let band = TitleBand::layout(200, 100, 30);
        assert_eq!(band.band_height, 50);
        assert_eq!(band.text_x, 50);
        assert_eq!(band.text_y, 10);
    }

    #[test]
    fn test_layout_overflow_goes_negative() {
        let band = TitleBand::layout(100, 161, 16);
        assert_eq!(band.text_x, -31);
    }

    #[test]
    fn test_height_grows_by_text_height_plus_margins() {
        let font = CardFont::builtin(FontSize::new(32).unwrap());
        let base = card(300, 120, [1, 2, 3]);
        let titled = composite_title(&base, "hello.rs", &map_theme(Theme::Light), &font);

        let (_, text_height) = font.text_size("hello.rs");
        assert_eq!(titled.width(), 300);
        assert_eq!(titled.height(), 120 + text_height + 20);
    }

    #[test]
    fn test_original_pasted_below_band() {
        let font = CardFont::builtin(FontSize::new(16).unwrap());
        let base = card(100, 40, [9, 9, 9]);
        let titled = composite_title(&base, "x", &map_theme(Theme::Dark), &font);

        let band = 16 + 20;
        assert_eq!(titled.pixels().get_pixel(0, band).0, [9, 9, 9]);
        assert_eq!(titled.pixels().get_pixel(99, band + 39).0, [9, 9, 9]);
        assert_eq!(titled.pixels().get_pixel(0, 0).0, [40, 40, 40]);
    }

    #[test]
    fn test_title_text_uses_theme_color() {
        let font = CardFont::builtin(FontSize::new(16).unwrap());
        let base = card(100, 10, [128, 128, 128]);

        let light = composite_title(&base, "AB", &map_theme(Theme::Light), &font);
        let band: Vec<_> = (0..36)
            .flat_map(|y| (0..100).map(move |x| (x, y)))
            .map(|(x, y)| light.pixels().get_pixel(x, y).0)
            .collect();
        assert!(band.contains(&[0, 0, 0]));
        assert!(band.contains(&[255, 255, 255]));

        let dark = composite_title(&base, "AB", &map_theme(Theme::Dark), &font);
        assert!(dark.pixels().pixels().any(|p| p.0 == [255, 255, 255]));
    }

    #[test]
    fn test_overflowing_title_keeps_width() {
        let font = CardFont::builtin(FontSize::new(16).unwrap());
        let base = card(40, 10, [0, 0, 0]);
        let titled = composite_title(
            &base,
            "a title far wider than the card itself",
            &map_theme(Theme::Light),
            &font,
        );
        assert_eq!(titled.width(), 40);
        assert_eq!(titled.height(), 10 + 16 + 20);
    }

    #[test]
    fn test_unloadable_font_falls_back_to_builtin() {
        let fonts = FontLocator::with_dirs(Vec::new());
        let base = card(200, 50, [0, 0, 0]);
        let titled = add_title(
            &base,
            "Title",
            Theme::Dark,
            "definitely-not-installed",
            FontSize::new(24).unwrap(),
            &fonts,
        );
        // Builtin face at 24 + 8 = 32px.
        assert_eq!(titled.height(), 50 + 32 + 20);
        assert!(titled.to_bmp_bytes().is_ok());
    }
}
