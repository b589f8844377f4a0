//! Error types for markdown rendering and file imports.
use std::{io, path::PathBuf};

use thiserror::Error;

/// Errors raised while rendering a single markdown document.
#[derive(Debug, Error)]
pub enum MarkdownError {
  /// A `<!--sec ... ces-->` marker was never closed by `<!--endsec-->`.
  #[error(
    "Unterminated section \"{title}\" starting on line {line}: missing \
     <!--endsec-->"
  )]
  UnterminatedSection { line: usize, title: String },
}

/// Errors raised while expanding `@import` directives.
#[derive(Debug, Error)]
pub enum ImportError {
  #[error("Failed to import {}: {source}", path.display())]
  Read {
    path:   PathBuf,
    #[source]
    source: io::Error,
  },
}

/// Errors raised while turning a markdown file into a page body.
#[derive(Debug, Error)]
pub enum ProcessError {
  #[error("Failed to read markdown file {}: {source}", path.display())]
  Read {
    path:   PathBuf,
    #[source]
    source: io::Error,
  },

  #[error(transparent)]
  Import(#[from] ImportError),

  #[error("Failed to render {}: {source}", path.display())]
  Markdown {
    path:   PathBuf,
    #[source]
    source: MarkdownError,
  },
}
