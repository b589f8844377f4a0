//! `search_plus_index.json`: one entry per page, keyed by its output URL.
use std::{fs, path::Path, sync::LazyLock};

use color_eyre::eyre::{Context, Result};
use lsbook_commonmark::utils::never_matching_regex;
use regex::Regex;
use serde::Serialize;
use serde_json::{Map, Value};

/// File name of the search index at the output root.
pub const SEARCH_INDEX_FILE: &str = "search_plus_index.json";

static TAG: LazyLock<Regex> = LazyLock::new(|| {
  Regex::new(r"(?s)<!--.*?-->|<[^>]*>").unwrap_or_else(|_| never_matching_regex())
});

#[derive(Debug, Clone, PartialEq, Eq, Serialize)]
pub struct SearchEntry {
  pub url:      String,
  pub title:    String,
  pub keywords: String,
  /// Page text without markup.
  pub body:     String,
}

/// Entries in insertion order, which is reading order when pages are added
/// in navigation order.
#[derive(Debug, Default)]
pub struct SearchIndex {
  entries: Map<String, Value>,
}

/// Strip tags from rendered HTML, decode entities and collapse whitespace.
#[must_use]
pub fn strip_tags(html: &str) -> String {
  let text = TAG.replace_all(html, " ");
  let text = html_escape::decode_html_entities(&text);
  text.split_whitespace().collect::<Vec<_>>().join(" ")
}

impl SearchIndex {
  #[must_use]
  pub fn new() -> Self {
    Self::default()
  }

  /// Add or replace the entry for `entry.url`.
  ///
  /// # Errors
  ///
  /// Returns an error if the entry cannot be converted to JSON.
  pub fn insert(&mut self, entry: SearchEntry) -> Result<()> {
    let url = entry.url.clone();
    let value = serde_json::to_value(entry)
      .wrap_err_with(|| format!("Failed to serialize search entry for {url}"))?;
    self.entries.insert(url, value);
    Ok(())
  }

  #[must_use]
  pub fn len(&self) -> usize {
    self.entries.len()
  }

  #[must_use]
  pub fn is_empty(&self) -> bool {
    self.entries.is_empty()
  }

  /// Write the index to [`SEARCH_INDEX_FILE`] under `output_dir`.
  ///
  /// # Errors
  ///
  /// Returns an error if serialization or the write fails.
  pub fn write(&self, output_dir: &Path) -> Result<()> {
    let path = output_dir.join(SEARCH_INDEX_FILE);
    let json = serde_json::to_string(&self.entries)
      .wrap_err("Failed to serialize search index")?;
    fs::write(&path, json)
      .wrap_err_with(|| format!("Failed to write search index to {}", path.display()))?;
    log::info!("Search index written with {} entries", self.entries.len());
    Ok(())
  }
}

#[cfg(test)]
mod tests {
  #![allow(clippy::expect_used, reason = "Fine in tests")]
  use super::*;

  #[test]
  fn tags_are_stripped_and_whitespace_collapsed() {
    let html = "<h1 id=\"a\">Title</h1>\n<!-- note -->\n<p>One &amp;\n  <em>two</em></p>";
    assert_eq!(strip_tags(html), "Title One & two");
  }

  #[test]
  fn index_keeps_insertion_order() {
    let dir = tempfile::tempdir().expect("tempdir");
    let mut index = SearchIndex::new();
    for url in ["index.html", "b.html", "a.html"] {
      index
        .insert(SearchEntry {
          url:      url.into(),
          title:    url.into(),
          keywords: String::new(),
          body:     "text".into(),
        })
        .expect("insert");
    }
    index.write(dir.path()).expect("write");

    let json = fs::read_to_string(dir.path().join(SEARCH_INDEX_FILE)).expect("read");
    let b = json.find("\"b.html\"").expect("b");
    let a = json.find("\"a.html\"").expect("a");
    assert!(b < a);
    let parsed: Value = serde_json::from_str(&json).expect("json");
    assert_eq!(parsed["index.html"]["body"], "text");
  }
}
