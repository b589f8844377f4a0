//! `@import` transclusion.
//!
//! A line of the form `@import "path" {lang}` is replaced by the target file.
//! Markdown targets are inlined with their image links rebased onto the
//! importing page; anything else (or any target with an explicit `{lang}`)
//! becomes a fenced code block. Directives inside fenced code are ignored.
use std::{
  collections::BTreeSet,
  fs,
  path::{Path, PathBuf},
  sync::LazyLock,
};

use regex::{Captures, Regex};

use crate::{
  error::ImportError,
  utils::{
    FenceTracker,
    compile_regex,
    has_scheme,
    lang,
    path::{normalize, relative_to, to_url_path},
  },
};

/// Output directory, relative to the book root, for imported images that live
/// outside the book.
pub const IMPORT_IMAGES_DIR: &str = "lsbook_import_img";

static IMPORT_DIRECTIVE: LazyLock<Regex> = LazyLock::new(|| {
  compile_regex(r#"^(\s*)@import\s*["']([^"']+)["']\s*(?:\{\s*([^}]*?)\s*\})?\s*$"#)
});

static IMAGE_LINK: LazyLock<Regex> = LazyLock::new(|| {
  compile_regex(r"(!\[[^\]]*\]\()(<[^>]*>|[^)\s]+)((?:\s+[^)]*)?\))")
});

/// Where an import is resolved from and where its output will live.
#[derive(Debug, Clone, Copy)]
pub struct ImportContext<'a> {
  /// Directory of the page being rendered.
  pub page_dir:  &'a Path,
  /// Root directory of the book.
  pub book_root: &'a Path,
  /// Relative path from the page back to the output root, e.g. `".."`.
  pub base_path: &'a str,
}

#[derive(Debug, Clone, Default, PartialEq, Eq)]
pub struct ImportResult {
  pub content:         String,
  /// Images referenced by imported markdown that sit outside the book root.
  pub external_images: BTreeSet<PathBuf>,
}

struct ImportDirective<'l> {
  indent:   &'l str,
  target:   &'l str,
  language: Option<&'l str>,
}

fn parse_directive(line: &str) -> Option<ImportDirective<'_>> {
  let caps = IMPORT_DIRECTIVE.captures(line)?;
  Some(ImportDirective {
    indent:   caps.get(1).map_or("", |m| m.as_str()),
    target:   caps.get(2).map_or("", |m| m.as_str()),
    language: caps
      .get(3)
      .map(|m| m.as_str())
      .filter(|lang| !lang.is_empty()),
  })
}

fn is_markdown_file(path: &Path) -> bool {
  path
    .extension()
    .and_then(|ext| ext.to_str())
    .is_some_and(lang::is_markdown_extension)
}

fn read_target(path: &Path) -> Result<String, ImportError> {
  fs::read_to_string(path).map_err(|source| ImportError::Read {
    path: path.to_path_buf(),
    source,
  })
}

/// Split off the line terminator so directive matching sees the bare line.
fn split_eol(raw: &str) -> (&str, &str) {
  let line = raw.trim_end_matches(['\n', '\r']);
  (line, &raw[line.len()..])
}

/// Expand every `@import` directive in `content`.
///
/// Text without directives is returned byte-for-byte unchanged.
///
/// # Errors
///
/// Returns [`ImportError::Read`] if an import target cannot be read.
pub fn process_imports(
  content: &str,
  ctx: &ImportContext<'_>,
) -> Result<ImportResult, ImportError> {
  let mut result = ImportResult {
    content:         String::with_capacity(content.len()),
    external_images: BTreeSet::new(),
  };
  let mut fences = FenceTracker::new();

  for raw in content.split_inclusive('\n') {
    let (line, eol) = split_eol(raw);
    if fences.update(line) || fences.in_code_block() {
      result.content.push_str(raw);
      continue;
    }
    let Some(directive) = parse_directive(line) else {
      result.content.push_str(raw);
      continue;
    };
    if has_scheme(directive.target) {
      log::warn!("Skipping @import of remote target {}", directive.target);
      result.content.push_str(raw);
      continue;
    }

    let target = ctx.page_dir.join(directive.target);
    log::debug!("Importing {}", target.display());
    let text = read_target(&target)?;
    let expanded = if directive.language.is_none() && is_markdown_file(&target)
    {
      inline_markdown(&text, &target, ctx, &mut result.external_images)?
    } else {
      fence_code(&text, &target, &directive)
    };
    result.content.push_str(&expanded);
    result.content.push_str(eol);
  }

  Ok(result)
}

/// Inline an imported markdown file. Nested code imports resolve against the
/// imported file's directory; nested markdown imports are left as written.
fn inline_markdown(
  text: &str,
  source: &Path,
  ctx: &ImportContext<'_>,
  external_images: &mut BTreeSet<PathBuf>,
) -> Result<String, ImportError> {
  let source_dir = source.parent().unwrap_or_else(|| Path::new(""));
  let mut output = String::with_capacity(text.len());
  let mut fences = FenceTracker::new();

  for raw in text.split_inclusive('\n') {
    let (line, eol) = split_eol(raw);
    if fences.update(line) || fences.in_code_block() {
      output.push_str(raw);
      continue;
    }

    if let Some(directive) = parse_directive(line) {
      let target = source_dir.join(directive.target);
      let is_code = directive.language.is_some() || !is_markdown_file(&target);
      if is_code && !has_scheme(directive.target) {
        output.push_str(&fence_code(&read_target(&target)?, &target, &directive));
        output.push_str(eol);
      } else {
        output.push_str(raw);
      }
      continue;
    }

    output.push_str(&rebase_images(line, source_dir, ctx, external_images));
    output.push_str(eol);
  }

  let trimmed = output.trim_end_matches(['\n', '\r']).len();
  output.truncate(trimmed);
  Ok(output)
}

/// Rewrite image links in one line of imported markdown so they resolve from
/// the importing page.
fn rebase_images(
  line: &str,
  source_dir: &Path,
  ctx: &ImportContext<'_>,
  external_images: &mut BTreeSet<PathBuf>,
) -> String {
  if !line.contains("![") {
    return line.to_owned();
  }
  let book_root = normalize(ctx.book_root);

  IMAGE_LINK
    .replace_all(line, |caps: &Captures| {
      let dest = caps[2].trim_start_matches('<').trim_end_matches('>');
      if has_scheme(dest) || dest.starts_with('/') || dest.starts_with('#') {
        return caps[0].to_owned();
      }

      let resolved = normalize(&source_dir.join(dest));
      let new_dest = if resolved.starts_with(&book_root) {
        to_url_path(&relative_to(&resolved, ctx.page_dir))
      } else {
        let file_name = resolved
          .file_name()
          .map(|name| name.to_string_lossy().into_owned())
          .unwrap_or_default();
        external_images.insert(resolved);
        format!("{}/{IMPORT_IMAGES_DIR}/{file_name}", ctx.base_path)
      };
      format!("{}{new_dest}{}", &caps[1], &caps[3])
    })
    .into_owned()
}

/// Wrap `code` in a fence long enough that backtick runs inside it cannot
/// close it early, indenting every line like the directive.
fn fence_code(code: &str, source: &Path, directive: &ImportDirective<'_>) -> String {
  let language = directive.language.map_or_else(
    || {
      source
        .extension()
        .and_then(|ext| ext.to_str())
        .map_or("none", |ext| lang::language_for_extension(ext).unwrap_or(ext))
        .to_owned()
    },
    str::to_owned,
  );

  let longest_run = code
    .split(|c: char| c != '`')
    .map(str::len)
    .max()
    .unwrap_or_default();
  let fence = "`".repeat(longest_run.max(2) + 1);
  let indent = directive.indent;

  let mut block = format!("{indent}{fence}{language}\n");
  for line in code.lines() {
    block.push_str(indent);
    block.push_str(line);
    block.push('\n');
  }
  block.push_str(indent);
  block.push_str(&fence);
  block
}

#[cfg(test)]
mod tests {
  use super::*;

  #[test]
  fn directive_parsing() {
    let d = parse_directive("  @import \"src/main.rs\" {rust}").map(|d| {
      (d.indent.to_owned(), d.target.to_owned(), d.language.map(str::to_owned))
    });
    assert_eq!(
      d,
      Some(("  ".into(), "src/main.rs".into(), Some("rust".into())))
    );
    assert!(parse_directive("@import 'a.md'").is_some_and(|d| d.language.is_none()));
    assert!(parse_directive("text @import \"a.md\"").is_none());
  }

  #[test]
  fn fence_outgrows_backticks_in_code() {
    let directive = ImportDirective {
      indent:   "  ",
      target:   "x.md",
      language: None,
    };
    let block = fence_code("````\ninner\n````", Path::new("x.md"), &directive);
    assert!(block.starts_with("  `````markdown\n"));
    assert!(block.ends_with("\n  `````"));
  }

  #[test]
  fn text_without_directives_is_unchanged() {
    let ctx = ImportContext {
      page_dir:  Path::new("book"),
      book_root: Path::new("book"),
      base_path: ".",
    };
    let input = "# Title\r\n\n```\n@import \"missing.rs\"\n```\nno newline";
    let result = process_imports(input, &ctx);
    assert!(
      result.is_ok_and(|r| r.content == input && r.external_images.is_empty())
    );
  }
}
