//! Card generation and export.
//!
//! [`CardEngine`] owns everything that is loaded once per run (syntax
//! definitions, highlight themes, the font locator) and drives each file
//! through the pipeline. Nothing mutable is shared between files.

use std::io::Write;
use std::path::{Path, PathBuf};

use codecard_common::error::{CardError, CardResult};
use codecard_model::{map_theme, CardSettings, RenderRequest, BASENAME_PLACEHOLDER};
use syntect::parsing::SyntaxSet;
use two_face::theme::EmbeddedLazyThemeSet;

use crate::card::{CardRenderer, RenderedImage};
use crate::fonts::FontLocator;
use crate::language::resolve_language;
use crate::title::add_title;

/// Appended to the basename when no output template is given.
pub const DEFAULT_OUTPUT_SUFFIX: &str = "_card.bmp";

/// Result of processing one input file.
#[derive(Debug)]
pub struct CardOutcome {
    /// The input path as given.
    pub source: PathBuf,
    /// Where the card was written, or why the file was abandoned.
    pub result: CardResult<PathBuf>,
}

/// Per-file outcomes of a batch, in input order.
#[derive(Debug, Default)]
pub struct BatchReport {
    pub outcomes: Vec<CardOutcome>,
}

impl BatchReport {
    pub fn written(&self) -> impl Iterator<Item = &Path> {
        self.outcomes
            .iter()
            .filter_map(|outcome| outcome.result.as_ref().ok().map(PathBuf::as_path))
    }

    pub fn failures(&self) -> impl Iterator<Item = (&Path, &CardError)> {
        self.outcomes.iter().filter_map(|outcome| {
            outcome
                .result
                .as_ref()
                .err()
                .map(|err| (outcome.source.as_path(), err))
        })
    }

    pub fn succeeded(&self) -> usize {
        self.written().count()
    }

    pub fn failed(&self) -> usize {
        self.outcomes.len() - self.succeeded()
    }
}

/// Called once per file as soon as that file is done.
pub type OutcomeCallback<'a> = &'a dyn Fn(&CardOutcome);

/// Shared, read-only state for rendering cards.
pub struct CardEngine {
    syntax_set: SyntaxSet,
    theme_set: EmbeddedLazyThemeSet,
    fonts: FontLocator,
    output_dir: PathBuf,
}

impl CardEngine {
    /// Create an engine writing cards under `output_dir`.
    pub fn new(fonts: FontLocator, output_dir: impl Into<PathBuf>) -> Self {
        Self {
            syntax_set: two_face::syntax::extra_newlines(),
            theme_set: two_face::theme::extra(),
            fonts,
            output_dir: output_dir.into(),
        }
    }

    pub fn syntax_set(&self) -> &SyntaxSet {
        &self.syntax_set
    }

    /// Run the pipeline up to (not including) writing: read, resolve,
    /// render, and optionally add the title.
    pub fn render_request(&self, request: &RenderRequest) -> CardResult<RenderedImage> {
        let path = &request.file_path;
        let settings = &request.settings;

        if !path.is_file() {
            return Err(CardError::MissingFile { path: path.clone() });
        }
        let contents = std::fs::read_to_string(path).map_err(|source| CardError::Read {
            path: path.clone(),
            source,
        })?;

        let language = resolve_language(&self.syntax_set, path, &contents);
        let params = map_theme(settings.theme);
        let font = self.fonts.load(&settings.font_name, settings.font_size)?;

        let renderer = CardRenderer::new(&self.syntax_set, &self.theme_set);
        let image = renderer.render(
            &contents,
            &language,
            &font,
            settings.show_line_numbers,
            &params,
        )?;

        Ok(match settings.title() {
            Some(title) => add_title(
                &image,
                title,
                settings.theme,
                &settings.font_name,
                settings.font_size,
                &self.fonts,
            ),
            None => image,
        })
    }

    /// Render one file and write its card. Returns the written path.
    pub fn generate_card(&self, request: &RenderRequest) -> CardResult<PathBuf> {
        tracing::info!(
            source = %request.file_path.display(),
            theme = %request.settings.theme,
            font = %request.settings.font_name,
            size = %request.settings.font_size,
            "Generating card"
        );

        let image = self.render_request(request)?;
        let bytes = image.to_bmp_bytes()?;
        let output = write_output(
            &bytes,
            &self.output_dir,
            request.settings.output_template(),
            &request.basename(),
        )?;

        tracing::info!(
            output = %output.display(),
            width = image.width(),
            height = image.height(),
            "Card written"
        );
        Ok(output)
    }

    /// Generate a card for every file in order. A failing file is reported
    /// and skipped; the rest of the batch still runs.
    pub fn generate_batch(
        &self,
        files: &[PathBuf],
        settings: &CardSettings,
        on_outcome: Option<OutcomeCallback<'_>>,
    ) -> BatchReport {
        let mut report = BatchReport::default();

        for file in files {
            let request = RenderRequest::new(file.clone(), settings.clone());
            let result = self.generate_card(&request);
            if let Err(e) = &result {
                tracing::warn!(source = %file.display(), error = %e, "Card generation failed");
            }

            let outcome = CardOutcome {
                source: file.clone(),
                result,
            };
            if let Some(cb) = on_outcome {
                cb(&outcome);
            }
            report.outcomes.push(outcome);
        }

        tracing::info!(
            succeeded = report.succeeded(),
            failed = report.failed(),
            "Batch complete"
        );
        report
    }
}

/// Output file name for `basename`. An empty or absent template gives
/// `{basename}_card.bmp`; otherwise every `{basename}` in the template is
/// substituted and the rest is kept verbatim, extension included.
pub fn resolve_output_name(template: Option<&str>, basename: &str) -> String {
    match template.filter(|template| !template.is_empty()) {
        Some(template) => template.replace(BASENAME_PLACEHOLDER, basename),
        None => format!("{basename}{DEFAULT_OUTPUT_SUFFIX}"),
    }
}

/// Write `bytes` to the resolved output name under `output_dir`,
/// replacing any existing file.
pub fn write_output(
    bytes: &[u8],
    output_dir: &Path,
    template: Option<&str>,
    basename: &str,
) -> CardResult<PathBuf> {
    let path = output_dir.join(resolve_output_name(template, basename));
    write_atomic(&path, bytes)?;
    Ok(path)
}

/// Write through a temporary file in the target directory and rename it
/// into place, so the target holds either the old bytes or all new bytes.
fn write_atomic(path: &Path, bytes: &[u8]) -> CardResult<()> {
    let parent = match path.parent() {
        Some(parent) if !parent.as_os_str().is_empty() => parent,
        _ => Path::new("."),
    };
    std::fs::create_dir_all(parent).map_err(|e| CardError::write(path, e))?;

    let mut tmp = tempfile::NamedTempFile::new_in(parent).map_err(|e| CardError::write(path, e))?;
    tmp.write_all(bytes).map_err(|e| CardError::write(path, e))?;
    tmp.flush().map_err(|e| CardError::write(path, e))?;
    tmp.persist(path)
        .map_err(|e| CardError::write(path, e.error))?;
    Ok(())
}
