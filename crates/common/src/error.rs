//! Error types shared across codecard crates.

use std::path::PathBuf;

/// Top-level error type for card generation.
///
/// Every variant aborts the file currently being processed; none of them
/// stop the rest of a batch.
#[derive(Debug, thiserror::Error)]
pub enum CardError {
    #[error("File not found: {path}")]
    MissingFile { path: PathBuf },

    #[error("Failed to read {path}: {source}")]
    Read {
        path: PathBuf,
        #[source]
        source: std::io::Error,
    },

    #[error("Font '{name}' could not be loaded: {message}")]
    FontLoad { name: String, message: String },

    #[error("Render error: {message}")]
    Render { message: String },

    #[error("Failed to write {path}: {source}")]
    Write {
        path: PathBuf,
        #[source]
        source: std::io::Error,
    },
}

/// Result type alias using CardError.
pub type CardResult<T> = Result<T, CardError>;

impl CardError {
    pub fn font_load(name: impl Into<String>, msg: impl Into<String>) -> Self {
        Self::FontLoad {
            name: name.into(),
            message: msg.into(),
        }
    }

    pub fn render(msg: impl Into<String>) -> Self {
        Self::Render {
            message: msg.into(),
        }
    }

    pub fn write(path: impl Into<PathBuf>, source: std::io::Error) -> Self {
        Self::Write {
            path: path.into(),
            source,
        }
    }

    /// Whether this error means the input file was never found.
    pub fn is_missing_file(&self) -> bool {
        matches!(self, Self::MissingFile { .. })
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_missing_file_message_names_path() {
        let err = CardError::MissingFile {
            path: PathBuf::from("src/nope.rs"),
        };
        assert_eq!(err.to_string(), "File not found: src/nope.rs");
        assert!(err.is_missing_file());
    }

    #[test]
    fn test_font_load_message() {
        let err = CardError::font_load("Consolas", "no matching font file");
        assert_eq!(
            err.to_string(),
            "Font 'Consolas' could not be loaded: no matching font file"
        );
        assert!(!err.is_missing_file());
    }
}
