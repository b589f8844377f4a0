use std::fmt;

use serde::Serialize;

/// Dotted position of a chapter in the outline, e.g. `[2, 1, 3]` for `2.1.3`.
#[derive(
  Debug, Clone, Default, PartialEq, Eq, Hash, PartialOrd, Ord, Serialize,
)]
pub struct Level(Vec<u32>);

impl Level {
  /// Level of the `index`-th section (1-based).
  #[must_use]
  pub fn section(index: u32) -> Self {
    Self(vec![index])
  }

  /// Level of the `index`-th child (1-based) of this node.
  #[must_use]
  pub fn child(&self, index: u32) -> Self {
    let mut parts = Vec::with_capacity(self.0.len() + 1);
    parts.extend_from_slice(&self.0);
    parts.push(index);
    Self(parts)
  }

  #[must_use]
  pub fn depth(&self) -> usize {
    self.0.len()
  }
}

impl fmt::Display for Level {
  fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
    for (idx, part) in self.0.iter().enumerate() {
      if idx > 0 {
        f.write_str(".")?;
      }
      write!(f, "{part}")?;
    }
    Ok(())
  }
}

/// One entry of the book outline.
#[derive(Debug, Clone, PartialEq, Eq, Serialize)]
pub struct ChapterNode {
  pub title:     String,
  /// Link target as written in the outline. `None` for section headers and
  /// group items.
  pub reference: Option<String>,
  pub level:     Level,
  pub children:  Vec<ChapterNode>,
}

impl ChapterNode {
  /// Whether this node is rendered as a page of the book.
  #[must_use]
  pub fn is_page(&self) -> bool {
    self.reference.as_deref().is_some_and(is_markdown_reference)
  }
}

/// A page in reading order.
#[derive(Debug, Clone, PartialEq, Eq, Serialize)]
pub struct NavigationEntry {
  pub level:     Level,
  pub reference: String,
  pub title:     String,
}

/// Parsed outline: the chapter tree and its pages in reading order.
#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize)]
pub struct Summary {
  /// Top-level sections, one per outline heading.
  pub chapters:   Vec<ChapterNode>,
  pub navigation: Vec<NavigationEntry>,
}

/// Whether an outline link points at a markdown page rather than an external
/// resource.
#[must_use]
pub fn is_markdown_reference(reference: &str) -> bool {
  let path = reference.split('#').next().unwrap_or_default();
  !lsbook_commonmark::utils::has_scheme(path)
    && path
      .rsplit_once('.')
      .is_some_and(|(_, ext)| lsbook_commonmark::utils::lang::is_markdown_extension(ext))
}
