//! Tracing setup for the codecard binaries and tests.
//!
//! Everything goes to stderr; stdout is reserved for the per-card
//! "Generated: ..." lines.

use tracing_subscriber::EnvFilter;

use crate::config::LoggingConfig;

/// Level used when the configured one is blank or unparsable.
pub const DEFAULT_LOG_LEVEL: &str = "warn";

/// Install the global subscriber. `RUST_LOG` wins over `config.level`.
///
/// Returns `false` if a subscriber was already installed, which happens
/// when several tests in one binary initialize logging.
pub fn init_logging(config: &LoggingConfig) -> bool {
    let filter = match EnvFilter::try_from_default_env() {
        Ok(filter) => filter,
        Err(_) => level_filter(&config.level),
    };

    let builder = tracing_subscriber::fmt()
        .with_env_filter(filter)
        .with_writer(std::io::stderr)
        .with_target(false);

    let installed = if config.json {
        builder.json().try_init()
    } else {
        builder.compact().try_init()
    };
    installed.is_ok()
}

/// Shorthand for [`init_logging`] with the default config.
pub fn init_default_logging() {
    init_logging(&LoggingConfig::default());
}

/// Filter for a configured level such as `"info"` or `"codecard=debug"`.
fn level_filter(level: &str) -> EnvFilter {
    let level = level.trim();
    if level.is_empty() {
        return EnvFilter::new(DEFAULT_LOG_LEVEL);
    }
    EnvFilter::try_new(level).unwrap_or_else(|e| {
        eprintln!("Invalid log level '{level}' ({e}); using '{DEFAULT_LOG_LEVEL}'");
        EnvFilter::new(DEFAULT_LOG_LEVEL)
    })
}

#[cfg(test)]
mod tests {
    use super::*;
    use tracing_subscriber::filter::LevelFilter;

    #[test]
    fn test_configured_level_is_used() {
        assert_eq!(level_filter("debug").max_level_hint(), Some(LevelFilter::DEBUG));
        assert_eq!(level_filter(" info ").max_level_hint(), Some(LevelFilter::INFO));
    }

    #[test]
    fn test_bad_level_falls_back_to_warn() {
        assert_eq!(level_filter("").max_level_hint(), Some(LevelFilter::WARN));
        assert_eq!(
            level_filter("codecard=loudest").max_level_hint(),
            Some(LevelFilter::WARN)
        );
    }

    #[test]
    fn test_second_init_is_rejected() {
        let config = LoggingConfig::default();
        init_logging(&config);
        assert!(!init_logging(&config));
    }
}
