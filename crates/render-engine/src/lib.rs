//! Codecard Render Engine
//!
//! Turns one source file into one card image. Each file passes through the
//! stages strictly left to right; a failure aborts that file only.
//!
//! # Pipeline Architecture
//!
//! ```text
//! foo.rs ──┐
//!          ├── Language Resolver (extension → first line → guess → default)
//!          │         │
//! theme ───┼── Theme Mapper
//!          │         │
//! font ────┼── Font Locator ──── Card Renderer (syntect + ab_glyph)
//!          │                           │
//! title ───┘                           ├── Title Compositor (optional)
//!                                      │
//!                                      ▼
//!                               Encode (BMP)
//!                                      │
//!                                      ▼
//!                              foo_card.bmp
//! ```

pub mod card;
pub mod export;
pub mod fonts;
pub mod language;
pub mod title;

pub use card::{CardRenderer, RenderedImage};
pub use export::*;
pub use fonts::{CardFont, FontLocator, BUILTIN_FONT_NAME};
pub use language::{resolve_language, Resolution, ResolvedLanguage, DEFAULT_LANGUAGE};
pub use title::add_title;
