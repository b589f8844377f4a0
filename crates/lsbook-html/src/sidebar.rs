//! Sidebar rendering.
//!
//! The whole outline is re-rendered for every page so that links are relative
//! to that page's directory and its own entry carries the `active` class.
use std::path::{Path, PathBuf};

use html_escape::{encode_double_quoted_attribute, encode_text};
use lsbook_commonmark::utils::{
  has_scheme,
  path::{normalize, relative_to, to_url_path},
};
use lsbook_summary::{ChapterNode, Level, Summary};
use lsbook_utils::{output_path, root_relative_path};
use serde::Serialize;

/// A previous/next navigation target, relative to the current page.
#[derive(Debug, Clone, PartialEq, Eq, Serialize)]
pub struct PageLink {
  pub title: String,
  pub href:  String,
}

/// Sidebar and navigation data for one page.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct SummaryRenderResult {
  /// `<li>` items of the sidebar, this page's entry marked active.
  pub summary_html: String,
  pub title:        String,
  pub level:        Level,
  pub prev:         Option<PageLink>,
  pub next:         Option<PageLink>,
  /// Output root as seen from this page, e.g. `"."` or `"../.."`.
  pub base_path:    String,
  /// Outline reference of the page, as written.
  pub reference:    String,
  /// Output file, relative to the output root.
  pub output_path:  PathBuf,
}

fn split_fragment(reference: &str) -> (&str, Option<&str>) {
  match reference.split_once('#') {
    Some((path, fragment)) => (path, Some(fragment)),
    None => (reference, None),
  }
}

fn with_fragment(mut href: String, fragment: Option<&str>) -> String {
  if let Some(fragment) = fragment {
    href.push('#');
    href.push_str(fragment);
  }
  href
}

/// Link from a page in `current_dir` (output-relative) to the page generated
/// for the outline reference `reference`.
#[must_use]
pub fn page_href(reference: &str, current_dir: &Path) -> String {
  let (_, fragment) = split_fragment(reference);
  let target = output_path(reference);
  with_fragment(to_url_path(&relative_to(&target, current_dir)), fragment)
}

/// Link to a non-page outline entry. Relative targets are rebased onto the
/// current page's directory; URLs pass through.
fn resource_href(reference: &str, current_dir: &Path) -> String {
  if has_scheme(reference) || reference.starts_with('/') {
    return reference.to_owned();
  }
  let (path, fragment) = split_fragment(reference);
  let rebased = relative_to(&normalize(Path::new(path)), current_dir);
  with_fragment(to_url_path(&rebased), fragment)
}

struct SidebarWalk<'a> {
  active:      &'a Level,
  current_dir: &'a Path,
}

impl SidebarWalk<'_> {
  fn section(&self, section: &ChapterNode, out: &mut String) {
    if !section.title.is_empty() {
      out.push_str("<li class=\"header\">");
      out.push_str(&encode_text(&section.title));
      out.push_str("</li>\n");
    }
    for child in &section.children {
      self.item(child, out);
    }
  }

  fn item(&self, node: &ChapterNode, out: &mut String) {
    let level = node.level.to_string();
    let label = format!("<b>{level}.</b> {}", encode_text(&node.title));

    match node.reference.as_deref() {
      Some(reference) if node.is_page() => {
        let href = page_href(reference, self.current_dir);
        let href = encode_double_quoted_attribute(&href);
        let class = if node.level == *self.active {
          "chapter active"
        } else {
          "chapter"
        };
        out.push_str(&format!(
          "<li class=\"{class}\" data-level=\"{level}\" \
           data-path=\"{href}\"><a href=\"{href}\">{label}</a>"
        ));
      },
      Some(reference) => {
        let href = resource_href(reference, self.current_dir);
        out.push_str(&format!(
          "<li class=\"chapter\" data-level=\"{level}\"><a href=\"{}\" \
           target=\"_blank\">{label}</a>",
          encode_double_quoted_attribute(&href)
        ));
      },
      None => {
        out.push_str(&format!(
          "<li class=\"chapter\" data-level=\"{level}\"><span>{label}</span>"
        ));
      },
    }

    if !node.children.is_empty() {
      out.push_str("\n<ul class=\"articles\">\n");
      for child in &node.children {
        self.item(child, out);
      }
      out.push_str("</ul>\n");
    }
    out.push_str("</li>\n");
  }
}

/// Render the sidebar and navigation for the page at `index` in the
/// navigation list. Returns `None` if `index` is out of range.
#[must_use]
pub fn render_for(summary: &Summary, index: usize) -> Option<SummaryRenderResult> {
  let entry = summary.navigation.get(index)?;
  let output = output_path(&entry.reference);
  let current_dir = output.parent().map(Path::to_path_buf).unwrap_or_default();

  let walk = SidebarWalk {
    active:      &entry.level,
    current_dir: &current_dir,
  };
  let mut summary_html = String::new();
  for section in &summary.chapters {
    walk.section(section, &mut summary_html);
  }

  let link = |idx: usize| {
    summary.navigation.get(idx).map(|neighbor| PageLink {
      title: neighbor.title.clone(),
      href:  page_href(&neighbor.reference, &current_dir),
    })
  };

  Some(SummaryRenderResult {
    summary_html,
    title: entry.title.clone(),
    level: entry.level.clone(),
    prev: index.checked_sub(1).and_then(&link),
    next: index.checked_add(1).and_then(&link),
    base_path: root_relative_path(&output),
    reference: entry.reference.clone(),
    output_path: output,
  })
}
