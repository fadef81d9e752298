//! List the languages the resolver can pick.

use codecard_render_engine::{CardEngine, FontLocator, DEFAULT_LANGUAGE};

pub fn run() -> anyhow::Result<()> {
    let engine = CardEngine::new(FontLocator::with_dirs(Vec::new()), ".");

    let mut syntaxes: Vec<_> = engine
        .syntax_set()
        .syntaxes()
        .iter()
        .filter(|syntax| !syntax.hidden)
        .collect();
    syntaxes.sort_by_key(|syntax| syntax.name.to_ascii_lowercase());

    println!("Supported languages ({}):", syntaxes.len());
    for syntax in syntaxes {
        let marker = if syntax.name == DEFAULT_LANGUAGE {
            " (default)"
        } else {
            ""
        };
        if syntax.file_extensions.is_empty() {
            println!("  {}{}", syntax.name, marker);
        } else {
            println!(
                "  {}{}  [{}]",
                syntax.name,
                marker,
                syntax.file_extensions.join(", ")
            );
        }
    }

    Ok(())
}
