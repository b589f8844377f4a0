#![allow(clippy::expect_used, reason = "Fine in tests")]
use std::fs;

use lsbook_config::{Config, ConfigError};
use tempfile::tempdir;

#[test]
fn load_reads_book_json() {
  let dir = tempdir().expect("tempdir");
  fs::write(
    dir.path().join("book.json"),
    r#"{"title": "Guide", "author": "Ada", "language": "en", "github_url": "https://github.com/x/y", "ignore": ["*.tmp"], "plugins": ["ignored"]}"#,
  )
  .expect("write");

  let config = Config::load(dir.path()).expect("load");
  assert_eq!(config.title, "Guide");
  assert_eq!(config.author, "Ada");
  assert_eq!(config.language, "en");
  assert_eq!(config.github_url.as_deref(), Some("https://github.com/x/y"));
  assert_eq!(config.ignore, ["*.tmp"]);
}

#[test]
fn missing_book_json_is_fatal() {
  let dir = tempdir().expect("tempdir");
  assert!(matches!(
    Config::load(dir.path()),
    Err(ConfigError::NotFound { .. })
  ));
}

#[test]
fn invalid_json_is_fatal() {
  let dir = tempdir().expect("tempdir");
  fs::write(Config::path_in(dir.path()), "{ title: ").expect("write");
  assert!(matches!(
    Config::load(dir.path()),
    Err(ConfigError::Parse { .. })
  ));
}
