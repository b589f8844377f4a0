//! Types for lsbook-commonmark public API and internal use.
use std::{collections::BTreeSet, path::PathBuf};

use serde::{Deserialize, Serialize};

/// One entry of the in-page table of contents.
#[derive(Debug, Clone, Serialize, Deserialize, PartialEq, Eq)]
pub struct TocEntry {
  /// Heading text (inline content, no markdown formatting).
  pub name:     String,
  /// Numbering label such as `"2.1. "`. Empty for top-level entries.
  pub label:    String,
  /// Anchor ID of the heading (`anchor_N`).
  pub anchor:   String,
  pub children: Vec<TocEntry>,
}

impl TocEntry {
  pub(crate) const fn new(name: String, label: String, anchor: String) -> Self {
    Self {
      name,
      label,
      anchor,
      children: Vec::new(),
    }
  }
}

/// Optional client-side bundles a rendered document depends on.
#[derive(Debug, Clone, Copy, Default, Serialize, Deserialize, PartialEq, Eq)]
#[allow(
  clippy::struct_excessive_bools,
  reason = "Independent usage flags, one per bundle"
)]
pub struct Features {
  /// Inline or display math was rendered.
  pub math:      bool,
  /// A `mermaid` diagram was rendered.
  pub diagram:   bool,
  /// A code block needing the client-side highlighter was rendered.
  pub highlight: bool,
  /// An image was wrapped for the lightbox gallery.
  pub gallery:   bool,
}

/// Result of Markdown processing.
#[derive(Debug, Clone, Serialize, Deserialize, PartialEq, Eq)]
pub struct MarkdownResult {
  /// Rendered HTML output.
  pub html: String,

  /// Nested heading outline (h1 > h2 > h3).
  pub toc: Vec<TocEntry>,

  /// Which optional bundles the HTML needs.
  pub features: Features,
}

/// Everything the page assembler needs from one markdown source file.
#[derive(Debug, Clone, Default, PartialEq, Eq)]
pub struct PageRenderResult {
  pub html:            String,
  pub toc:             Vec<TocEntry>,
  pub features:        Features,
  /// Absolute paths of imported images that live outside the book root and
  /// must be copied into the import image directory.
  pub external_images: BTreeSet<PathBuf>,
}
