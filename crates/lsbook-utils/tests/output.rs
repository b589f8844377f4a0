#![allow(clippy::expect_used, reason = "Fine in tests")]
use std::{collections::BTreeSet, fs};

use globset::{Glob, GlobSetBuilder};
use lsbook_utils::{CopyOptions, copy_external_images, copy_sources, prepare_output_dir, write_assets};
use tempfile::tempdir;

#[test]
fn copy_skips_inputs_hidden_output_and_ignored() {
  let dir = tempdir().expect("tempdir");
  let book = dir.path();
  let output = book.join("_book");
  for (path, content) in [
    ("README.md", "# Home"),
    ("SUMMARY.md", "* [Home](README.md)"),
    ("book.json", "{}"),
    ("img/logo.png", "png"),
    ("notes/draft.tmp", "tmp"),
    (".git/config", "git"),
    ("_book/stale.html", "old"),
  ] {
    let file = book.join(path);
    fs::create_dir_all(file.parent().expect("parent")).expect("mkdir");
    fs::write(file, content).expect("write");
  }

  let mut builder = GlobSetBuilder::new();
  builder.add(Glob::new("**/*.tmp").expect("glob"));
  let ignore = builder.build().expect("globset");

  prepare_output_dir(book, &output).expect("prepare");
  assert!(!output.join("stale.html").exists());

  let skip_files = [book.join("SUMMARY.md"), book.join("book.json")];
  let copied = copy_sources(book, &CopyOptions {
    output_dir:  &output,
    skip_files:  &skip_files,
    ignore:      &ignore,
  })
  .expect("copy");

  assert_eq!(copied, 2);
  assert!(output.join("README.md").is_file());
  assert!(output.join("img/logo.png").is_file());
  assert!(!output.join("SUMMARY.md").exists());
  assert!(!output.join("book.json").exists());
  assert!(!output.join("notes/draft.tmp").exists());
  assert!(!output.join(".git").exists());
  assert!(!output.join("_book").exists());
}

#[test]
fn refuses_to_clear_the_book_itself() {
  let dir = tempdir().expect("tempdir");
  assert!(prepare_output_dir(&dir.path().join("book"), dir.path()).is_err());
}

#[test]
fn assets_and_images_are_written() {
  let dir = tempdir().expect("tempdir");
  let output = dir.path().join("out");
  write_assets(&output).expect("assets");
  assert!(output.join("lsbook/lsbook.css").is_file());
  assert!(output.join("lsbook/lsbook.js").is_file());

  let image = dir.path().join("shared/pic.png");
  fs::create_dir_all(image.parent().expect("parent")).expect("mkdir");
  fs::write(&image, "png").expect("write");
  let images = BTreeSet::from([image, dir.path().join("shared/missing.png")]);
  copy_external_images(&images, &output).expect("copy images");
  assert!(output.join("lsbook_import_img/pic.png").is_file());
  assert!(!output.join("lsbook_import_img/missing.png").exists());
}

#[test]
fn ignored_directory_is_not_created() {
  let dir = tempdir().expect("tempdir");
  let book = dir.path().join("book");
  let output = dir.path().join("out");
  for path in ["README.md", "drafts/wip.md", "drafts/deep/notes.md", "guide/a.md"] {
    let file = book.join(path);
    fs::create_dir_all(file.parent().expect("parent")).expect("mkdir");
    fs::write(file, "text").expect("write");
  }
  fs::create_dir_all(book.join("empty")).expect("mkdir");

  let mut builder = GlobSetBuilder::new();
  builder.add(Glob::new("drafts/**").expect("glob"));
  let ignore = builder.build().expect("globset");

  let copied = copy_sources(&book, &CopyOptions {
    output_dir:  &output,
    skip_files:  &[],
    ignore:      &ignore,
  })
  .expect("copy");

  assert_eq!(copied, 2);
  assert!(output.join("guide/a.md").is_file());
  assert!(!output.join("drafts").exists());
  assert!(!output.join("empty").exists());
}

#[test]
fn images_sharing_a_name_are_copied_once() {
  let dir = tempdir().expect("tempdir");
  let output = dir.path().join("out");
  let first = dir.path().join("a/pic.png");
  let second = dir.path().join("b/pic.png");
  for (path, content) in [(&first, "from a"), (&second, "from b")] {
    fs::create_dir_all(path.parent().expect("parent")).expect("mkdir");
    fs::write(path, content).expect("write");
  }

  let images = BTreeSet::from([second, first]);
  copy_external_images(&images, &output).expect("copy images");

  let copied =
    fs::read_to_string(output.join("lsbook_import_img/pic.png")).expect("read");
  assert_eq!(copied, "from a");
}
