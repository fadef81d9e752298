//! Language resolution: picks the syntax used to tokenize a file.
//!
//! Resolution is an ordered cascade that always ends in a usable syntax:
//! 1. the full file name (`Makefile`, `CMakeLists.txt`), then the extension
//! 2. first-line sniffing (shebangs, modelines, `<?xml`)
//! 3. heuristic guess from the contents, or plain text if nothing scores
//! 4. [`DEFAULT_LANGUAGE`] when the contents are blank

use std::path::Path;

use syntect::parsing::{SyntaxReference, SyntaxSet};

/// Syntax used for empty or whitespace-only files.
pub const DEFAULT_LANGUAGE: &str = "Python";

/// Which step of the cascade produced the syntax.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum Resolution {
    Extension,
    FileName,
    FirstLine,
    Guessed,
    PlainText,
    Default,
}

/// Tokenization rules chosen for one file.
#[derive(Debug, Clone, Copy)]
pub struct ResolvedLanguage<'a> {
    syntax: &'a SyntaxReference,
    resolution: Resolution,
}

impl<'a> ResolvedLanguage<'a> {
    pub fn name(&self) -> &'a str {
        &self.syntax.name
    }

    pub fn resolution(&self) -> Resolution {
        self.resolution
    }

    pub(crate) fn syntax(&self) -> &'a SyntaxReference {
        self.syntax
    }
}

/// Resolve the syntax for `path` with the given contents. Never fails.
pub fn resolve_language<'a>(
    syntax_set: &'a SyntaxSet,
    path: &Path,
    contents: &str,
) -> ResolvedLanguage<'a> {
    let (syntax, resolution) = by_name_or_first_line(syntax_set, path, contents)
        .or_else(|| guess(syntax_set, contents))
        .unwrap_or_else(|| fallback(syntax_set, contents));

    tracing::debug!(
        path = %path.display(),
        language = %syntax.name,
        ?resolution,
        "Resolved language"
    );

    ResolvedLanguage { syntax, resolution }
}

fn by_name_or_first_line<'a>(
    syntax_set: &'a SyntaxSet,
    path: &Path,
    contents: &str,
) -> Option<(&'a SyntaxReference, Resolution)> {
    if let Some(file_name) = path.file_name().and_then(|name| name.to_str()) {
        if let Some(syntax) = syntax_set.find_syntax_by_extension(file_name) {
            return Some((syntax, Resolution::FileName));
        }
    }

    if let Some(ext) = path.extension().and_then(|ext| ext.to_str()) {
        let found = syntax_set
            .find_syntax_by_extension(ext)
            .or_else(|| syntax_set.find_syntax_by_extension(&ext.to_ascii_lowercase()));
        if let Some(syntax) = found {
            return Some((syntax, Resolution::Extension));
        }
    }

    let first_line = contents.lines().next()?;
    syntax_set
        .find_syntax_by_first_line(first_line)
        .map(|syntax| (syntax, Resolution::FirstLine))
}

/// Textual markers that suggest a language. Each marker counts once.
struct Signature {
    language: &'static str,
    markers: &'static [&'static str],
}

const SIGNATURES: &[Signature] = &[
    Signature {
        language: "Rust",
        markers: &[
            "fn main(",
            "let mut ",
            "pub fn ",
            "impl ",
            "use std::",
            "-> Result<",
            "#[derive(",
            "match ",
        ],
    },
    Signature {
        language: "Python",
        markers: &[
            "def ",
            "elif ",
            "self.",
            "__init__",
            "print(",
            "import ",
            "None",
            "):\n",
        ],
    },
    Signature {
        language: "Go",
        markers: &["package ", "func ", ":= ", "fmt.", "go func", "chan "],
    },
    Signature {
        language: "C++",
        markers: &[
            "#include <iostream>",
            "std::",
            "namespace ",
            "template<",
            "cout <<",
            "nullptr",
        ],
    },
    Signature {
        language: "C",
        markers: &[
            "#include <stdio.h>",
            "#include <stdlib.h>",
            "int main(",
            "printf(",
            "malloc(",
            "#define ",
        ],
    },
    Signature {
        language: "Java",
        markers: &[
            "public class ",
            "public static void main",
            "System.out.",
            "private final ",
            "@Override",
            "import java.",
        ],
    },
    Signature {
        language: "JavaScript",
        markers: &[
            "function ",
            "const ",
            "=> {",
            "console.log(",
            "require(",
            "export default",
        ],
    },
    Signature {
        language: "PHP",
        markers: &["<?php", "$this->", "echo ", "namespace App"],
    },
    Signature {
        language: "HTML",
        markers: &["<!DOCTYPE html", "<html", "<div", "<body", "<head>"],
    },
    Signature {
        language: "Ruby",
        markers: &["require '", "puts ", "attr_accessor", "def self.", "end\n"],
    },
    Signature {
        language: "SQL",
        markers: &["SELECT ", "INSERT INTO", "CREATE TABLE", " FROM ", " WHERE "],
    },
    Signature {
        language: "Bourne Again Shell (bash)",
        markers: &["#!/bin/bash", "#!/bin/sh", "echo \"", "fi\n", "then\n", "$1"],
    },
];

fn score(signature: &Signature, contents: &str) -> usize {
    signature
        .markers
        .iter()
        .filter(|marker| contents.contains(*marker))
        .count()
}

/// Pick the best-scoring signature; ties keep the earlier entry.
fn guess<'a>(syntax_set: &'a SyntaxSet, contents: &str) -> Option<(&'a SyntaxReference, Resolution)> {
    if contents.trim().is_empty() {
        return None;
    }

    let mut best: Option<(&'a SyntaxReference, usize)> = None;
    for signature in SIGNATURES {
        let points = score(signature, contents);
        if points == 0 || best.is_some_and(|(_, top)| points <= top) {
            continue;
        }
        if let Some(syntax) = syntax_set.find_syntax_by_name(signature.language) {
            best = Some((syntax, points));
        }
    }

    best.map(|(syntax, _)| (syntax, Resolution::Guessed))
}

fn fallback<'a>(syntax_set: &'a SyntaxSet, contents: &str) -> (&'a SyntaxReference, Resolution) {
    if contents.trim().is_empty() {
        if let Some(syntax) = syntax_set.find_syntax_by_name(DEFAULT_LANGUAGE) {
            return (syntax, Resolution::Default);
        }
    }
    (syntax_set.find_syntax_plain_text(), Resolution::PlainText)
}
