//! Theme selector and the visual parameters derived from it.

use std::fmt;
use std::str::FromStr;

use serde::{Deserialize, Serialize};

/// The two visual variants a card can be rendered in.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Default, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum Theme {
    #[default]
    Light,
    Dark,
}

impl Theme {
    pub const ALL: [Theme; 2] = [Theme::Light, Theme::Dark];

    pub fn as_str(self) -> &'static str {
        match self {
            Theme::Light => "light",
            Theme::Dark => "dark",
        }
    }
}

impl fmt::Display for Theme {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.as_str())
    }
}

#[derive(Debug, Clone, PartialEq, Eq, thiserror::Error)]
#[error("unknown theme '{0}' (expected 'light' or 'dark')")]
pub struct ParseThemeError(String);

impl FromStr for Theme {
    type Err = ParseThemeError;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        match s.trim().to_ascii_lowercase().as_str() {
            "light" => Ok(Theme::Light),
            "dark" => Ok(Theme::Dark),
            _ => Err(ParseThemeError(s.to_string())),
        }
    }
}

/// 8-bit RGB color.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub struct Rgb {
    pub r: u8,
    pub g: u8,
    pub b: u8,
}

impl Rgb {
    pub const WHITE: Rgb = Rgb::new(255, 255, 255);
    pub const BLACK: Rgb = Rgb::new(0, 0, 0);

    pub const fn new(r: u8, g: u8, b: u8) -> Self {
        Self { r, g, b }
    }

    pub fn channels(self) -> [u8; 3] {
        [self.r, self.g, self.b]
    }
}

/// Highlight palettes the card renderer knows how to load.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub enum HighlightStyle {
    /// White background, GitHub-like token colors.
    InspiredGithub,
    /// Near-black background, Monokai token colors.
    MonokaiExtended,
}

impl HighlightStyle {
    pub fn name(self) -> &'static str {
        match self {
            HighlightStyle::InspiredGithub => "InspiredGitHub",
            HighlightStyle::MonokaiExtended => "Monokai Extended",
        }
    }
}

/// Visual parameters derived from a [`Theme`]. Never stored; recompute with
/// [`map_theme`].
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct ThemeParameters {
    pub highlight_style: HighlightStyle,
    pub line_number_background: Rgb,
    pub line_number_foreground: Rgb,
    /// Fill of the title band above the code.
    pub title_background: Rgb,
    /// Color of the title text.
    pub title_foreground: Rgb,
}

const NEAR_BLACK: Rgb = Rgb::new(40, 40, 40);

/// Map a theme onto its fixed parameter set.
pub fn map_theme(theme: Theme) -> ThemeParameters {
    match theme {
        Theme::Light => ThemeParameters {
            highlight_style: HighlightStyle::InspiredGithub,
            line_number_background: Rgb::WHITE,
            line_number_foreground: Rgb::new(80, 80, 80),
            title_background: Rgb::WHITE,
            title_foreground: Rgb::BLACK,
        },
        Theme::Dark => ThemeParameters {
            highlight_style: HighlightStyle::MonokaiExtended,
            line_number_background: NEAR_BLACK,
            line_number_foreground: Rgb::new(200, 200, 200),
            title_background: NEAR_BLACK,
            title_foreground: Rgb::WHITE,
        },
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_map_theme_is_deterministic() {
        for theme in Theme::ALL {
            assert_eq!(map_theme(theme), map_theme(theme));
        }
    }

    #[test]
    fn test_light_and_dark_never_share_colors() {
        let light = map_theme(Theme::Light);
        let dark = map_theme(Theme::Dark);
        assert_ne!(light.highlight_style, dark.highlight_style);
        assert_ne!(light.line_number_background, dark.line_number_background);
        assert_ne!(light.line_number_foreground, dark.line_number_foreground);
        assert_ne!(light.title_background, dark.title_background);
        assert_ne!(light.title_foreground, dark.title_foreground);
    }

    #[test]
    fn test_dark_uses_near_black_palette() {
        let dark = map_theme(Theme::Dark);
        assert_eq!(dark.highlight_style, HighlightStyle::MonokaiExtended);
        assert_eq!(dark.line_number_background, Rgb::new(40, 40, 40));
        assert_eq!(dark.line_number_foreground, Rgb::new(200, 200, 200));
        assert_eq!(dark.title_foreground, Rgb::WHITE);
    }

    #[test]
    fn test_light_is_inverse() {
        let light = map_theme(Theme::Light);
        assert_eq!(light.highlight_style, HighlightStyle::InspiredGithub);
        assert_eq!(light.line_number_background, Rgb::WHITE);
        assert_eq!(light.line_number_foreground, Rgb::new(80, 80, 80));
        assert_eq!(light.title_background, Rgb::WHITE);
        assert_eq!(light.title_foreground, Rgb::BLACK);
    }

    #[test]
    fn test_parse_theme() {
        assert_eq!("dark".parse::<Theme>().unwrap(), Theme::Dark);
        assert_eq!(" Light ".parse::<Theme>().unwrap(), Theme::Light);
        assert!("solarized".parse::<Theme>().is_err());
    }

    #[test]
    fn test_theme_serde_is_lowercase() {
        assert_eq!(serde_json::to_string(&Theme::Dark).unwrap(), "\"dark\"");
        let parsed: Theme = serde_json::from_str("\"light\"").unwrap();
        assert_eq!(parsed, Theme::Light);
    }
}
