//! # lsbook-commonmark
//!
//! Markdown renderer for lsbook pages. Built on `comrak` with a few
//! extensions on top of CommonMark and GFM:
//!
//! - numbered headings with `anchor_N` IDs and a nested table of contents
//! - collapsible sections (`<!--sec title="..." show=true ces-->` ...
//!   `<!--endsec-->`)
//! - spoilers (`{%s%}hidden{%ends%}`)
//! - inline and display math, `mermaid` diagrams, lightbox images
//! - `@import "file" {lang}` transclusion
//!
//! ```rust
//! use lsbook_commonmark::{MarkdownOptions, MarkdownProcessor};
//!
//! let processor = MarkdownProcessor::new(MarkdownOptions::default());
//! let result = processor.render("# Hello\n\n## World\n").unwrap();
//!
//! assert_eq!(result.toc[0].children[0].label, "1. ");
//! assert!(result.html.contains("id=\"anchor_2\""));
//! ```
pub mod error;
pub mod imports;
pub mod processor;
mod types;
pub mod utils;

pub use crate::{
  error::{ImportError, MarkdownError, ProcessError},
  imports::{IMPORT_IMAGES_DIR, ImportContext, ImportResult, process_imports},
  processor::{
    MarkdownOptions,
    MarkdownOptionsBuilder,
    MarkdownProcessor,
    process_markdown_file,
    process_markdown_string,
  },
  types::{Features, MarkdownResult, PageRenderResult, TocEntry},
};
