use std::{
  fs,
  path::{Path, PathBuf},
};

use globset::{GlobBuilder, GlobSet, GlobSetBuilder};
use serde::{Deserialize, Serialize};

use crate::error::ConfigError;

/// Name of the configuration file at the book root.
pub const CONFIG_FILE: &str = "book.json";

/// Locale used when `book.json` names none or one without a bundle.
pub const DEFAULT_LANGUAGE: &str = "zh-cn";

/// Book configuration, read from `book.json` at the book root.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(default)]
pub struct Config {
  /// Book title, shown in the header and the page `<title>`.
  pub title: String,

  pub author: String,

  /// Locale of the interface strings, e.g. `en` or `zh-cn`.
  pub language: String,

  /// Repository link shown in the page header.
  pub github_url: Option<String>,

  /// Glob patterns, relative to the book root, excluded from the raw copy.
  pub ignore: Vec<String>,
}

impl Default for Config {
  fn default() -> Self {
    Self {
      title:      String::new(),
      author:     String::new(),
      language:   DEFAULT_LANGUAGE.to_owned(),
      github_url: None,
      ignore:     Vec::new(),
    }
  }
}

impl Config {
  /// Load `book.json` from the book root.
  ///
  /// # Errors
  ///
  /// Fails if the file is missing, unreadable or not a JSON object with the
  /// expected field types.
  pub fn load(book_root: &Path) -> Result<Self, ConfigError> {
    let path = book_root.join(CONFIG_FILE);
    if !path.is_file() {
      return Err(ConfigError::NotFound { path });
    }
    Self::from_file(&path)
  }

  /// Load configuration from a specific JSON file.
  ///
  /// # Errors
  ///
  /// Fails if the file cannot be read or parsed.
  pub fn from_file(path: &Path) -> Result<Self, ConfigError> {
    let content = fs::read_to_string(path).map_err(|source| ConfigError::Io {
      path: path.to_path_buf(),
      source,
    })?;
    let config: Self =
      serde_json::from_str(&content).map_err(|source| ConfigError::Parse {
        path: path.to_path_buf(),
        source,
      })?;
    log::debug!("Loaded configuration from {}", path.display());
    Ok(config)
  }

  /// Compile the `ignore` patterns.
  ///
  /// # Errors
  ///
  /// Returns [`ConfigError::Glob`] for the first pattern that does not parse.
  pub fn ignore_set(&self) -> Result<GlobSet, ConfigError> {
    let mut builder = GlobSetBuilder::new();
    for pattern in &self.ignore {
      let trimmed = pattern.trim_start_matches("./").trim_end_matches('/');
      let glob = GlobBuilder::new(trimmed)
        .literal_separator(true)
        .build()
        .map_err(|source| ConfigError::Glob {
          pattern: pattern.clone(),
          source,
        })?;
      builder.add(glob);
    }
    builder.build().map_err(|source| ConfigError::Glob {
      pattern: self.ignore.join(", "),
      source,
    })
  }

  /// Path of the configuration file for a book root.
  #[must_use]
  pub fn path_in(book_root: &Path) -> PathBuf {
    book_root.join(CONFIG_FILE)
  }
}

#[cfg(test)]
mod tests {
  #![allow(clippy::expect_used, reason = "Fine in tests")]
  use super::*;

  #[test]
  fn missing_fields_take_defaults() {
    let config: Config =
      serde_json::from_str(r#"{"title": "Book"}"#).expect("parse");
    assert_eq!(config.title, "Book");
    assert_eq!(config.language, DEFAULT_LANGUAGE);
    assert!(config.ignore.is_empty());
    assert_eq!(config.github_url, None);
  }

  #[test]
  fn ignore_globs_respect_separators() {
    let config = Config {
      ignore: vec!["*.log".into(), "drafts/**".into(), "./tmp/".into()],
      ..Config::default()
    };
    let set = config.ignore_set().expect("globs compile");
    assert!(set.is_match("debug.log"));
    assert!(!set.is_match("logs/debug.log"));
    assert!(set.is_match("drafts/a/b.md"));
    assert!(set.is_match("tmp"));
    assert!(!set.is_match("chapter.md"));
  }

  #[test]
  fn bad_glob_is_reported() {
    let config = Config {
      ignore: vec!["[".into()],
      ..Config::default()
    };
    assert!(matches!(
      config.ignore_set(),
      Err(ConfigError::Glob { ref pattern, .. }) if pattern == "["
    ));
  }
}
