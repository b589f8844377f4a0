//! Type definitions for the Markdown processor.
//!
//! Contains the configuration options (`MarkdownOptions`), the processor
//! itself (`MarkdownProcessor`) and the per-render counters (`RenderState`).
//!
//! # Examples
//!
//! ```
//! use lsbook_commonmark::{MarkdownOptions, MarkdownProcessor};
//!
//! let options = MarkdownOptions {
//!   math: false,
//!   ..Default::default()
//! };
//!
//! let processor = MarkdownProcessor::new(options);
//! ```
use crate::types::{Features, MarkdownResult, TocEntry};

/// Options for configuring the Markdown processor.
#[derive(Debug, Clone)]
pub struct MarkdownOptions {
  /// Enable GitHub Flavored Markdown extensions (tables, strikethrough, task
  /// lists, autolinks, footnotes).
  pub gfm: bool,

  /// Recognize `$...$` inline math and `$$...$$` display math.
  pub math: bool,

  /// Rewrite relative links to `.md` files into links to the generated
  /// `.html` pages.
  pub rewrite_markdown_links: bool,

  /// Highlighter language for fenced code without an info string.
  pub default_code_language: String,
}

impl Default for MarkdownOptions {
  fn default() -> Self {
    Self {
      gfm:                    true,
      math:                   true,
      rewrite_markdown_links: true,
      default_code_language:  "none".to_owned(),
    }
  }
}

/// Builder for constructing `MarkdownOptions` with method chaining.
#[derive(Debug, Clone, Default)]
pub struct MarkdownOptionsBuilder {
  options: MarkdownOptions,
}

impl MarkdownOptionsBuilder {
  #[must_use]
  pub fn new() -> Self {
    Self::default()
  }

  #[must_use]
  pub const fn gfm(mut self, enabled: bool) -> Self {
    self.options.gfm = enabled;
    self
  }

  #[must_use]
  pub const fn math(mut self, enabled: bool) -> Self {
    self.options.math = enabled;
    self
  }

  #[must_use]
  pub const fn rewrite_markdown_links(mut self, enabled: bool) -> Self {
    self.options.rewrite_markdown_links = enabled;
    self
  }

  #[must_use]
  pub fn default_code_language(mut self, language: impl Into<String>) -> Self {
    self.options.default_code_language = language.into();
    self
  }

  #[must_use]
  pub fn build(self) -> MarkdownOptions {
    self.options
  }
}

/// Main Markdown processor.
///
/// Holds only configuration, so one instance can be shared across threads
/// and every `render` call starts from fresh counters.
#[derive(Debug, Clone, Default)]
pub struct MarkdownProcessor {
  pub(crate) options: MarkdownOptions,
}

/// Counters and collected outputs for one render call.
#[derive(Debug, Default)]
pub(crate) struct RenderState {
  /// Per-level heading counters, h1 at index 0.
  pub heading_counts: [u32; 6],
  pub anchor_id:      u32,
  pub image_id:       u32,
  pub section_id:     u32,
  pub toc:            Vec<TocEntry>,
  pub features:       Features,
}

impl RenderState {
  /// Register a heading and return its anchor ID and numbering prefix.
  ///
  /// h1 starts a top-level TOC entry; h2 and h3 nest under the latest entry
  /// one level up and are dropped from the TOC (and left unnumbered) when no
  /// such parent exists. h4 to h6 get a numbering prefix but no TOC entry.
  pub fn register_heading(&mut self, level: u8, name: String) -> (String, String) {
    self.anchor_id += 1;
    let anchor = format!("anchor_{}", self.anchor_id);
    let level = usize::from(level.clamp(1, 6));

    let prefix = match level {
      1 => {
        self.bump(level);
        self.toc.push(TocEntry::new(name, String::new(), anchor.clone()));
        String::new()
      },
      2 => {
        if self.toc.is_empty() {
          return (anchor, String::new());
        }
        self.bump(level);
        let label = format!("{}. ", self.heading_counts[1]);
        if let Some(parent) = self.toc.last_mut() {
          parent
            .children
            .push(TocEntry::new(name, label.clone(), anchor.clone()));
        }
        label
      },
      3 => {
        let has_parent = self
          .toc
          .last()
          .is_some_and(|entry| !entry.children.is_empty());
        if !has_parent {
          return (anchor, String::new());
        }
        self.bump(level);
        let label =
          format!("{}.{}. ", self.heading_counts[1], self.heading_counts[2]);
        if let Some(parent) =
          self.toc.last_mut().and_then(|entry| entry.children.last_mut())
        {
          parent
            .children
            .push(TocEntry::new(name, label.clone(), anchor.clone()));
        }
        label
      },
      _ => {
        self.bump(level);
        let path = self.heading_counts[1..level]
          .iter()
          .map(u32::to_string)
          .collect::<Vec<_>>()
          .join(".");
        format!("{path}. ")
      },
    };

    (anchor, prefix)
  }

  /// Increment the counter for `level` (1-based) and reset all deeper ones.
  fn bump(&mut self, level: usize) {
    self.heading_counts[level - 1] += 1;
    for count in &mut self.heading_counts[level..] {
      *count = 0;
    }
  }

  pub fn next_image_id(&mut self) -> u32 {
    self.image_id += 1;
    self.features.gallery = true;
    self.image_id
  }

  pub fn next_section_id(&mut self) -> u32 {
    let id = self.section_id;
    self.section_id += 1;
    id
  }

  pub fn finish(self, html: String) -> MarkdownResult {
    MarkdownResult {
      html,
      toc: self.toc,
      features: self.features,
    }
  }
}
