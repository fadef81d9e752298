//! Render code cards for a list of files.

use std::path::PathBuf;

use codecard_common::config::CardConfig;
use codecard_model::{parse_file_list, CardSettings, FontSize, Theme};
use codecard_render_engine::{CardEngine, CardOutcome, FontLocator};

/// Raw `generate` arguments; anything left `None` comes from the config.
pub struct GenerateArgs {
    pub files: Vec<String>,
    pub theme: Option<String>,
    pub font: Option<String>,
    pub font_size: Option<String>,
    pub no_line_numbers: bool,
    pub output: Option<String>,
    pub output_dir: Option<PathBuf>,
    pub title: Option<String>,
    pub font_dirs: Vec<PathBuf>,
}

pub fn run(args: GenerateArgs, config: &CardConfig) -> anyhow::Result<()> {
    let files: Vec<PathBuf> = args
        .files
        .iter()
        .flat_map(|arg| parse_file_list(arg))
        .collect();
    if files.is_empty() {
        anyhow::bail!("No source files given");
    }

    let settings = build_settings(&args, config)?;
    let output_dir = args
        .output_dir
        .clone()
        .or_else(|| config.card.output_dir.clone())
        .unwrap_or_else(|| PathBuf::from("."));

    let mut font_dirs = args.font_dirs.clone();
    font_dirs.extend(config.card.font_dirs.iter().cloned());
    tracing::debug!(
        files = files.len(),
        theme = %settings.theme,
        font = %settings.font_name,
        size = %settings.font_size,
        line_numbers = settings.show_line_numbers,
        output_dir = %output_dir.display(),
        "Resolved generate settings"
    );
    let engine = CardEngine::new(FontLocator::new(font_dirs), output_dir);

    let print_outcome = |outcome: &CardOutcome| match &outcome.result {
        Ok(path) => println!("Generated: {}", path.display()),
        Err(e) => eprintln!("Error: {e}"),
    };
    let report = engine.generate_batch(&files, &settings, Some(&print_outcome));

    if report.failed() > 0 {
        anyhow::bail!(
            "{} of {} card(s) failed",
            report.failed(),
            report.outcomes.len()
        );
    }
    Ok(())
}

fn build_settings(args: &GenerateArgs, config: &CardConfig) -> anyhow::Result<CardSettings> {
    let defaults = &config.card;

    let theme: Theme = args
        .theme
        .as_deref()
        .unwrap_or(&defaults.theme)
        .parse()?;

    let font_size = match &args.font_size {
        Some(text) => FontSize::parse_or_default(text),
        None => FontSize::new(defaults.font_size).unwrap_or_default(),
    };

    let settings = CardSettings {
        theme,
        font_size,
        show_line_numbers: defaults.show_line_numbers && !args.no_line_numbers,
        output_name_template: args.output.clone(),
        ..CardSettings::default()
    }
    .with_font_name(args.font.clone().unwrap_or_else(|| defaults.font_name.clone()));

    Ok(match &args.title {
        Some(text) => settings.with_title(text.clone()),
        None => settings,
    })
}

#[cfg(test)]
mod tests {
    use super::*;

    fn args() -> GenerateArgs {
        GenerateArgs {
            files: vec!["a.rs".into()],
            theme: None,
            font: None,
            font_size: None,
            no_line_numbers: false,
            output: None,
            output_dir: None,
            title: None,
            font_dirs: Vec::new(),
        }
    }

    #[test]
    fn test_settings_fall_back_to_config() {
        let mut config = CardConfig::default();
        config.card.theme = "dark".into();
        config.card.font_size = 18;

        let settings = build_settings(&args(), &config).unwrap();
        assert_eq!(settings.theme, Theme::Dark);
        assert_eq!(settings.font_size.get(), 18);
        assert_eq!(settings.font_name, "Consolas");
        assert!(settings.show_line_numbers);
        assert_eq!(settings.title(), None);
    }

    #[test]
    fn test_flags_override_config() {
        let args = GenerateArgs {
            theme: Some("DARK".into()),
            font: Some("builtin".into()),
            font_size: Some("not a number".into()),
            no_line_numbers: true,
            output: Some("{basename}.bmp".into()),
            title: Some("Hello".into()),
            ..args()
        };
        let settings = build_settings(&args, &CardConfig::default()).unwrap();
        assert_eq!(settings.theme, Theme::Dark);
        assert_eq!(settings.font_name, "builtin");
        assert_eq!(settings.font_size.get(), 24);
        assert!(!settings.show_line_numbers);
        assert_eq!(settings.output_template(), Some("{basename}.bmp"));
        assert_eq!(settings.title(), Some("Hello"));
    }

    #[test]
    fn test_unknown_theme_is_rejected() {
        let args = GenerateArgs {
            theme: Some("sepia".into()),
            ..args()
        };
        assert!(build_settings(&args, &CardConfig::default()).is_err());
    }
}
