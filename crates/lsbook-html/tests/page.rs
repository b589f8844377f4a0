#![allow(clippy::expect_used, reason = "Fine in tests")]
use std::{fs, path::Path};

use lsbook_commonmark::{MarkdownOptions, MarkdownProcessor};
use lsbook_config::{Config, I18n};
use lsbook_html::{BookContext, PageRenderer, render_page};
use lsbook_summary::Summary;
use tempfile::tempdir;

fn write(root: &Path, path: &str, content: &str) {
  let file = root.join(path);
  fs::create_dir_all(file.parent().expect("parent")).expect("mkdir");
  fs::write(file, content).expect("write");
}

#[test]
fn pages_are_rendered_into_the_output_tree() {
  let dir = tempdir().expect("tempdir");
  let book = dir.path().join("book");
  let output = dir.path().join("out");
  write(&book, "book.json", r#"{"title": "Manual", "author": "Ann", "language": "en"}"#);
  write(
    &book,
    "SUMMARY.md",
    "# Start\n* [Welcome](README.md)\n* [Setup](guide/setup.md)\n",
  );
  write(
    &book,
    "README.md",
    "# Welcome\n\n## First steps\n\nRead the [setup](guide/setup.md).\n",
  );
  write(
    &book,
    "guide/setup.md",
    "# Setup\n\n@import \"snippet.rs\"\n\n@import \"../../shared/part.md\"\n",
  );
  write(&book, "guide/snippet.rs", "fn main() {}\n");
  write(dir.path(), "shared/part.md", "![diagram](img/d.png)\n");

  let config = Config::load(&book).expect("config");
  let i18n = I18n::load(&config.language).expect("i18n");
  let summary = Summary::load(&book, i18n.get("SUMMARY")).expect("summary");
  let processor = MarkdownProcessor::new(MarkdownOptions::default());
  let renderer = PageRenderer::new().expect("renderer");
  let ctx = BookContext {
    book_root:  &book,
    output_dir: &output,
    config:     &config,
    i18n:       &i18n,
    summary:    &summary,
    processor:  &processor,
    renderer:   &renderer,
  };

  let home = render_page(&ctx, 0).expect("home page");
  assert_eq!(home.search.url, "index.html");
  assert_eq!(home.search.keywords, "Welcome First steps");
  assert!(home.search.body.starts_with("Welcome 1. First steps"));
  assert!(home.external_images.is_empty());

  let index = fs::read_to_string(output.join("index.html")).expect("index");
  assert!(index.contains("<title>Manual - Welcome</title>"));
  assert!(index.contains("<a href=\"guide/setup.html\">setup</a>"));
  assert!(index.contains("class=\"navigation navigation-next\" href=\"guide/setup.html\""));
  assert!(index.contains("anchor-navigation-ex-navbar"));

  let setup = render_page(&ctx, 1).expect("setup page");
  assert_eq!(setup.search.url, "guide/setup.html");
  assert_eq!(setup.external_images.len(), 1);
  assert!(
    setup
      .external_images
      .iter()
      .all(|path| path.ends_with("shared/img/d.png"))
  );

  let page = fs::read_to_string(output.join("guide/setup.html")).expect("setup");
  assert!(page.contains("lang-rust"));
  assert!(page.contains("fn main() {}"));
  assert!(page.contains("href=\"../lsbook_import_img/d.png\""));
  assert!(page.contains("href=\"../lsbook/lsbook.css\""));
  assert!(page.contains("class=\"navigation navigation-prev\" href=\"../index.html\""));
}

#[test]
fn missing_import_fails_the_page() {
  let dir = tempdir().expect("tempdir");
  let book = dir.path();
  write(book, "SUMMARY.md", "# S\n* [Home](README.md)\n");
  write(book, "README.md", "@import \"gone.rs\"\n");

  let config = Config::default();
  let i18n = I18n::load("en").expect("i18n");
  let summary = Summary::load(book, "Summary").expect("summary");
  let processor = MarkdownProcessor::default();
  let renderer = PageRenderer::new().expect("renderer");
  let output = book.join("_book");
  let ctx = BookContext {
    book_root:  book,
    output_dir: &output,
    config:     &config,
    i18n:       &i18n,
    summary:    &summary,
    processor:  &processor,
    renderer:   &renderer,
  };

  assert!(render_page(&ctx, 0).is_err());
  assert!(!output.join("index.html").exists());
}
