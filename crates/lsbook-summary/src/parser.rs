//! Outline parsing.
//!
//! The outline is restricted markdown: headings open sections and nested
//! lists of links form the chapters inside them. Everything else is dropped
//! before parsing.
use std::{
  fs,
  path::{Path, PathBuf},
  sync::LazyLock,
};

use comrak::{
  Arena,
  nodes::{AstNode, NodeValue},
  options::Options,
  parse_document,
};
use log::{debug, trace};
use lsbook_commonmark::utils::{extract_inline_text, never_matching_regex};
use regex::Regex;

use crate::{
  error::SummaryError,
  types::{ChapterNode, Level, NavigationEntry, Summary},
};

/// Name of the page every book starts with.
pub const ENTRY_DOCUMENT: &str = "readme.md";

static COMMENT: LazyLock<Regex> = LazyLock::new(|| {
  Regex::new(r"(?s)<!--.*?-->").unwrap_or_else(|_| never_matching_regex())
});

static OUTLINE_LINE: LazyLock<Regex> = LazyLock::new(|| {
  Regex::new(r"^\s*(?:[*+-]|\d+[.)])\s|^\s{0,3}#{1,6}(?:\s|$)")
    .unwrap_or_else(|_| never_matching_regex())
});

/// Locate the outline file in `book_root`, matching `summary.md` in any case.
///
/// # Errors
///
/// Returns [`SummaryError::NotFound`] if there is no such file and
/// [`SummaryError::Read`] if the directory cannot be listed.
pub fn find_summary_file(book_root: &Path) -> Result<PathBuf, SummaryError> {
  let entries = fs::read_dir(book_root).map_err(|source| SummaryError::Read {
    path: book_root.to_path_buf(),
    source,
  })?;

  let mut candidates: Vec<PathBuf> = entries
    .filter_map(Result::ok)
    .map(|entry| entry.path())
    .filter(|path| {
      path.is_file()
        && path
          .file_name()
          .and_then(|name| name.to_str())
          .is_some_and(|name| name.eq_ignore_ascii_case("summary.md"))
    })
    .collect();
  // deterministic pick when several spellings exist
  candidates.sort();

  candidates
    .into_iter()
    .next()
    .ok_or_else(|| SummaryError::NotFound {
      dir: book_root.to_path_buf(),
    })
}

/// Keep only heading and list-item lines, with comments removed and no
/// blank lines.
#[must_use]
pub fn filter_outline(text: &str) -> String {
  let without_comments = COMMENT.replace_all(text, "");
  let mut filtered = String::with_capacity(without_comments.len());
  for line in without_comments.lines() {
    if OUTLINE_LINE.is_match(line) {
      filtered.push_str(line.trim_end());
      filtered.push('\n');
    }
  }
  filtered
}

impl Summary {
  /// Find, read and parse the outline of the book at `book_root`.
  ///
  /// # Errors
  ///
  /// Fails if the outline is missing, unreadable or malformed.
  pub fn load(book_root: &Path, default_title: &str) -> Result<Self, SummaryError> {
    let path = find_summary_file(book_root)?;
    debug!("Reading outline from {}", path.display());
    let text = fs::read_to_string(&path)
      .map_err(|source| SummaryError::Read { path, source })?;
    Self::parse(&text, default_title)
  }

  /// Parse outline text into the chapter tree and navigation list.
  ///
  /// `default_title` names a first section whose heading is blank and the
  /// implicit section opened by a list that precedes every heading.
  ///
  /// # Errors
  ///
  /// Fails on an empty outline, a heading nested inside a list, or a list
  /// item with neither link nor text.
  pub fn parse(text: &str, default_title: &str) -> Result<Self, SummaryError> {
    let filtered = filter_outline(text);
    let arena = Arena::new();
    let root = parse_document(&arena, &filtered, &Options::default());
    let parser = OutlineParser {
      source_lines: filtered.lines().collect(),
    };

    let mut chapters: Vec<ChapterNode> = Vec::new();
    for node in root.children() {
      match &node.data.borrow().value {
        NodeValue::Heading(_) => {
          let title = extract_inline_text(node).trim().to_owned();
          let title = if title.is_empty() && chapters.is_empty() {
            default_title.to_owned()
          } else {
            title
          };
          chapters.push(ChapterNode {
            title,
            reference: None,
            level: Level::section(next_index(chapters.len())),
            children: Vec::new(),
          });
        },
        NodeValue::List(_) => {
          if chapters.is_empty() {
            chapters.push(ChapterNode {
              title:     default_title.to_owned(),
              reference: None,
              level:     Level::section(1),
              children:  Vec::new(),
            });
          }
          if let Some(section) = chapters.last_mut() {
            let items = parser.parse_list(node, &section.level, section.children.len())?;
            section.children.extend(items);
          }
        },
        other => trace!("Ignoring outline node {other:?}"),
      }
    }

    if chapters.is_empty() {
      return Err(SummaryError::EmptyOutline);
    }

    let mut navigation = Vec::new();
    for chapter in &chapters {
      collect_navigation(chapter, &mut navigation);
    }
    debug!(
      "Parsed outline: {} sections, {} pages",
      chapters.len(),
      navigation.len()
    );

    Ok(Self {
      chapters,
      navigation,
    })
  }

  /// Check that reading starts at the book's entry document.
  ///
  /// # Errors
  ///
  /// Returns [`SummaryError::EntryDocument`] if the first page is anything
  /// other than [`ENTRY_DOCUMENT`] at the book root.
  pub fn validate_entry(&self) -> Result<(), SummaryError> {
    let first = self.navigation.first().map(|entry| entry.reference.as_str());
    let is_entry = first.is_some_and(|reference| {
      reference
        .trim_start_matches("./")
        .split('#')
        .next()
        .is_some_and(|path| path.eq_ignore_ascii_case(ENTRY_DOCUMENT))
    });
    if is_entry {
      Ok(())
    } else {
      Err(SummaryError::EntryDocument {
        expected: ENTRY_DOCUMENT.to_owned(),
        found:    first.map(str::to_owned),
      })
    }
  }
}

fn next_index(len: usize) -> u32 {
  u32::try_from(len).map_or(u32::MAX, |n| n.saturating_add(1))
}

fn collect_navigation(node: &ChapterNode, navigation: &mut Vec<NavigationEntry>) {
  if node.is_page() {
    if let Some(reference) = &node.reference {
      navigation.push(NavigationEntry {
        level:     node.level.clone(),
        reference: reference.clone(),
        title:     node.title.clone(),
      });
    }
  }
  for child in &node.children {
    collect_navigation(child, navigation);
  }
}

struct OutlineParser<'s> {
  /// Filtered outline, for quoting malformed entries.
  source_lines: Vec<&'s str>,
}

impl OutlineParser<'_> {
  /// Parse a list whose items continue numbering after `offset` existing
  /// siblings under `parent`.
  fn parse_list<'a>(
    &self,
    list: &'a AstNode<'a>,
    parent: &Level,
    offset: usize,
  ) -> Result<Vec<ChapterNode>, SummaryError> {
    let mut items = Vec::new();
    for item in list.children() {
      if !matches!(item.data.borrow().value, NodeValue::Item(_)) {
        continue;
      }
      let level = parent.child(next_index(offset + items.len()));
      items.push(self.parse_item(item, level)?);
    }
    Ok(items)
  }

  fn parse_item<'a>(
    &self,
    item: &'a AstNode<'a>,
    level: Level,
  ) -> Result<ChapterNode, SummaryError> {
    let mut title = String::new();
    let mut reference = None;
    let mut children: Vec<ChapterNode> = Vec::new();

    for child in item.children() {
      match &child.data.borrow().value {
        NodeValue::Paragraph if reference.is_none() && title.is_empty() => {
          (title, reference) = item_label(child);
        },
        NodeValue::List(_) => {
          let nested = self.parse_list(child, &level, children.len())?;
          children.extend(nested);
        },
        NodeValue::Heading(_) => {
          return Err(SummaryError::NonRootHeading {
            line:  start_line(child),
            title: extract_inline_text(child).trim().to_owned(),
          });
        },
        _ => {},
      }
    }

    if title.is_empty() && reference.is_none() {
      return Err(self.malformed(item));
    }

    Ok(ChapterNode {
      title,
      reference,
      level,
      children,
    })
  }

  fn malformed<'a>(&self, node: &'a AstNode<'a>) -> SummaryError {
    let (start, end) = {
      let pos = node.data.borrow().sourcepos;
      (pos.start.line, pos.end.line)
    };
    let fragment = self
      .source_lines
      .get(start.saturating_sub(1)..end.min(self.source_lines.len()))
      .map(|lines| lines.join("\n"))
      .unwrap_or_default();
    SummaryError::MalformedEntry {
      line: start,
      fragment,
    }
  }
}

fn start_line<'a>(node: &'a AstNode<'a>) -> usize {
  node.data.borrow().sourcepos.start.line
}

/// Title and link target of an outline item's first paragraph. The first link
/// wins; without one the paragraph text is the title of a group item.
fn item_label<'a>(paragraph: &'a AstNode<'a>) -> (String, Option<String>) {
  for node in paragraph.descendants() {
    if let NodeValue::Link(link) = &node.data.borrow().value {
      let url = link.url.trim().replace('\\', "/");
      let title = extract_inline_text(node).trim().to_owned();
      return (title, (!url.is_empty()).then_some(url));
    }
  }
  (extract_inline_text(paragraph).trim().to_owned(), None)
}
