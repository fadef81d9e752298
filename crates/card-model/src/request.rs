//! Render settings and per-file render requests.
//!
//! The front end collects every parameter once per "generate" action into a
//! [`CardSettings`]. Each input file then gets its own [`RenderRequest`]
//! carrying a copy of those settings; neither is mutated after construction.

use std::fmt;
use std::num::NonZeroU32;
use std::path::{Path, PathBuf};

use crate::theme::Theme;

/// Font size used when the supplied value is missing or not a positive integer.
pub const DEFAULT_FONT_SIZE: u32 = 24;

/// Font name used when the supplied name is empty.
pub const DEFAULT_FONT_NAME: &str = "Consolas";

/// Literal placeholder substituted in output name templates.
pub const BASENAME_PLACEHOLDER: &str = "{basename}";

/// A positive font size in pixels.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub struct FontSize(NonZeroU32);

impl FontSize {
    /// `None` for zero.
    pub fn new(px: u32) -> Option<Self> {
        NonZeroU32::new(px).map(Self)
    }

    /// Parse user text, falling back to [`DEFAULT_FONT_SIZE`] on anything
    /// that is not a positive integer.
    pub fn parse_or_default(input: &str) -> Self {
        input
            .trim()
            .parse::<u32>()
            .ok()
            .and_then(Self::new)
            .unwrap_or_default()
    }

    pub fn get(self) -> u32 {
        self.0.get()
    }

    /// This size grown by `px` pixels, saturating.
    pub fn enlarged(self, px: u32) -> Self {
        Self(self.0.saturating_add(px))
    }
}

impl Default for FontSize {
    fn default() -> Self {
        Self(NonZeroU32::new(DEFAULT_FONT_SIZE).unwrap_or(NonZeroU32::MIN))
    }
}

impl fmt::Display for FontSize {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "{}px", self.get())
    }
}

/// Everything the front end collects for one batch.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct CardSettings {
    pub theme: Theme,
    pub font_name: String,
    pub font_size: FontSize,
    pub show_line_numbers: bool,
    /// Output file name, optionally containing `{basename}`. Empty or `None`
    /// means `{basename}_card.bmp`.
    pub output_name_template: Option<String>,
    pub add_title: bool,
    /// Only honored when `add_title` is set.
    pub title_text: String,
}

impl Default for CardSettings {
    fn default() -> Self {
        Self {
            theme: Theme::Light,
            font_name: DEFAULT_FONT_NAME.to_string(),
            font_size: FontSize::default(),
            show_line_numbers: true,
            output_name_template: None,
            add_title: false,
            title_text: String::new(),
        }
    }
}

impl CardSettings {
    /// Replace the font name, keeping the default when `name` is blank.
    pub fn with_font_name(mut self, name: impl Into<String>) -> Self {
        let name = name.into();
        self.font_name = if name.trim().is_empty() {
            DEFAULT_FONT_NAME.to_string()
        } else {
            name
        };
        self
    }

    /// Request a title band with the given text.
    pub fn with_title(mut self, text: impl Into<String>) -> Self {
        self.add_title = true;
        self.title_text = text.into();
        self
    }

    /// The title to composite, if one was requested and is non-empty.
    pub fn title(&self) -> Option<&str> {
        if self.add_title && !self.title_text.is_empty() {
            Some(&self.title_text)
        } else {
            None
        }
    }

    /// The output name template, if a non-empty one was supplied.
    pub fn output_template(&self) -> Option<&str> {
        self.output_name_template
            .as_deref()
            .filter(|template| !template.is_empty())
    }
}

/// One file to render with the batch settings.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct RenderRequest {
    pub file_path: PathBuf,
    pub settings: CardSettings,
}

impl RenderRequest {
    pub fn new(file_path: impl Into<PathBuf>, settings: CardSettings) -> Self {
        Self {
            file_path: file_path.into(),
            settings,
        }
    }

    /// File name without directory or final extension.
    pub fn basename(&self) -> String {
        basename_of(&self.file_path)
    }
}

/// File name without directory or final extension. `archive.tar.gz` keeps
/// `archive.tar`; dotfiles such as `.bashrc` are kept whole.
pub fn basename_of(path: &Path) -> String {
    path.file_stem()
        .map(|stem| stem.to_string_lossy().into_owned())
        .unwrap_or_default()
}

/// Split a `;`-separated list of paths, dropping blank entries.
pub fn parse_file_list(input: &str) -> Vec<PathBuf> {
    input
        .split(';')
        .map(str::trim)
        .filter(|entry| !entry.is_empty())
        .map(PathBuf::from)
        .collect()
}
