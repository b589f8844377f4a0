use std::path::{Path, PathBuf};

use lsbook_commonmark::utils::{
  lang::is_markdown_extension,
  path::{normalize, relative_to, to_url_path},
};

/// Output path, relative to the output root, of the page generated from the
/// outline reference `reference`.
///
/// `readme.md` (any case) becomes `index.html` in the same directory; other
/// markdown files keep their path with an `.html` extension. Fragments are
/// dropped.
#[must_use]
pub fn output_path(reference: &str) -> PathBuf {
  let source = reference.split('#').next().unwrap_or_default();
  let source = normalize(Path::new(source));

  let is_readme = source
    .file_stem()
    .and_then(|stem| stem.to_str())
    .is_some_and(|stem| stem.eq_ignore_ascii_case("readme"))
    && source
      .extension()
      .and_then(|ext| ext.to_str())
      .is_some_and(is_markdown_extension);

  if is_readme {
    source.with_file_name("index.html")
  } else {
    source.with_extension("html")
  }
}

/// Relative path from the directory of the output file `output_rel` back to
/// the output root: `"."` at the root, `".."` one level down, and so on.
#[must_use]
pub fn root_relative_path(output_rel: &Path) -> String {
  let dir = output_rel.parent().unwrap_or_else(|| Path::new(""));
  to_url_path(&relative_to(Path::new(""), dir))
}

#[cfg(test)]
mod tests {
  use super::*;

  #[test]
  fn readme_maps_to_index() {
    assert_eq!(output_path("README.md"), PathBuf::from("index.html"));
    assert_eq!(output_path("./guide/Readme.md"), PathBuf::from("guide/index.html"));
    assert_eq!(output_path("guide/setup.md#top"), PathBuf::from("guide/setup.html"));
    assert_eq!(output_path("readme-notes.md"), PathBuf::from("readme-notes.html"));
  }

  #[test]
  fn root_paths() {
    assert_eq!(root_relative_path(Path::new("index.html")), ".");
    assert_eq!(root_relative_path(Path::new("a/index.html")), "..");
    assert_eq!(root_relative_path(Path::new("a/b/c.html")), "../..");
  }
}
