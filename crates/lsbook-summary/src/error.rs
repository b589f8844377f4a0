use std::{io, path::PathBuf};

use thiserror::Error;

/// Error type for outline loading and parsing
#[derive(Debug, Error)]
pub enum SummaryError {
  #[error("No SUMMARY.md found in {}", dir.display())]
  NotFound { dir: PathBuf },

  #[error("Failed to read {}: {source}", path.display())]
  Read {
    path:   PathBuf,
    #[source]
    source: io::Error,
  },

  #[error("The outline contains no headings or chapter lists")]
  EmptyOutline,

  #[error("Non-root heading not allowed on line {line}: {title:?}")]
  NonRootHeading { line: usize, title: String },

  #[error("Malformed outline entry on line {line}:\n{fragment}")]
  MalformedEntry { line: usize, fragment: String },

  #[error(
    "The first chapter must be {expected}, found {}",
    found.as_deref().unwrap_or("no chapters")
  )]
  EntryDocument {
    expected: String,
    found:    Option<String>,
  },
}
