//! Application configuration.

use std::path::{Path, PathBuf};

use serde::{Deserialize, Serialize};

/// Global application configuration.
#[derive(Debug, Clone, Default, Serialize, Deserialize)]
#[serde(default)]
pub struct CardConfig {
    /// Default card settings, overridable per invocation.
    pub card: CardDefaults,

    /// Logging configuration.
    pub logging: LoggingConfig,
}

/// Default card parameters.
#[derive(Debug, Clone, Serialize, Deserialize)]
#[serde(default)]
pub struct CardDefaults {
    /// Theme selector ("light" or "dark").
    pub theme: String,

    /// Font family name, font file stem, path, or "builtin".
    pub font_name: String,

    /// Font size in pixels.
    pub font_size: u32,

    /// Whether to draw the line-number gutter.
    pub show_line_numbers: bool,

    /// Directory output names are resolved against. `None` means the
    /// current working directory.
    pub output_dir: Option<PathBuf>,

    /// Extra directories searched for fonts before the platform ones.
    pub font_dirs: Vec<PathBuf>,
}

/// Logging configuration.
#[derive(Debug, Clone, Serialize, Deserialize)]
#[serde(default)]
pub struct LoggingConfig {
    /// Log level filter (e.g., "info", "debug", "codecard=debug,warn").
    pub level: String,

    /// Whether to output structured JSON logs.
    pub json: bool,
}

impl Default for CardDefaults {
    fn default() -> Self {
        Self {
            theme: "light".to_string(),
            font_name: "Consolas".to_string(),
            font_size: 24,
            show_line_numbers: true,
            output_dir: None,
            font_dirs: Vec::new(),
        }
    }
}

impl Default for LoggingConfig {
    fn default() -> Self {
        Self {
            level: crate::logging::DEFAULT_LOG_LEVEL.to_string(),
            json: false,
        }
    }
}

impl CardConfig {
    /// Load config from the standard location, falling back to defaults.
    pub fn load() -> Self {
        Self::load_from(&config_file_path())
    }

    /// Load config from an explicit path, falling back to defaults when the
    /// file is absent or unreadable.
    pub fn load_from(config_path: &Path) -> Self {
        if config_path.exists() {
            match std::fs::read_to_string(config_path) {
                Ok(content) => match serde_json::from_str(&content) {
                    Ok(config) => return config,
                    Err(e) => {
                        tracing::warn!("Failed to parse config at {:?}: {}", config_path, e);
                    }
                },
                Err(e) => {
                    tracing::warn!("Failed to read config at {:?}: {}", config_path, e);
                }
            }
        }
        Self::default()
    }

    /// Save config to the standard location.
    pub fn save(&self) -> Result<(), std::io::Error> {
        self.save_to(&config_file_path())
    }

    /// Save config to an explicit path.
    pub fn save_to(&self, config_path: &Path) -> Result<(), std::io::Error> {
        if let Some(parent) = config_path.parent() {
            std::fs::create_dir_all(parent)?;
        }
        let json = serde_json::to_string_pretty(self).map_err(std::io::Error::other)?;
        std::fs::write(config_path, json)
    }
}

/// Standard config file location.
pub fn config_file_path() -> PathBuf {
    let base = std::env::var("XDG_CONFIG_HOME")
        .map(PathBuf::from)
        .unwrap_or_else(|_| {
            let home = std::env::var("HOME").unwrap_or_else(|_| "/tmp".to_string());
            PathBuf::from(home).join(".config")
        });
    base.join("codecard").join("config.json")
}
