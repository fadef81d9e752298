//! List the font files the locator can find.

use std::path::PathBuf;

use codecard_common::config::CardConfig;
use codecard_render_engine::{FontLocator, BUILTIN_FONT_NAME};

pub fn run(font_dirs: Vec<PathBuf>, config: &CardConfig) -> anyhow::Result<()> {
    let mut dirs = font_dirs;
    dirs.extend(config.card.font_dirs.iter().cloned());
    let locator = FontLocator::new(dirs);

    println!("Font search directories:");
    for dir in locator.search_dirs() {
        let status = if dir.is_dir() { "OK" } else { "--" };
        println!("  [{status}] {}", dir.display());
    }

    let fonts = locator.discover();
    println!();
    println!("Fonts found: {}", fonts.len());
    for font in &fonts {
        println!("  {}", font.display());
    }

    println!();
    if config.card.font_name.eq_ignore_ascii_case(BUILTIN_FONT_NAME) {
        println!("Default font is the embedded bitmap face.");
        return Ok(());
    }
    match locator.find(&config.card.font_name) {
        Some(path) => println!(
            "Default font '{}' resolves to {}",
            config.card.font_name,
            path.display()
        ),
        None => println!(
            "Default font '{}' was not found; use --font or pass '{}' for the embedded face.",
            config.card.font_name, BUILTIN_FONT_NAME
        ),
    }

    Ok(())
}
