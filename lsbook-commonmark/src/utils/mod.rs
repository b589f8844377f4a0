//! Shared helpers for markdown processing: fence tracking, inline text
//! extraction, link classification and lexical path arithmetic.
pub mod lang;
pub mod path;

use comrak::nodes::{AstNode, NodeValue};
use regex::Regex;

/// File extensions that open in a new tab because the browser downloads them.
const DOWNLOAD_EXTENSIONS: &[&str] = &[
  "sh", "iso", "rar", "zip", "7z", "exe", "pdf", "xls", "txt", "doc", "docx",
  "xlsx", "ppt", "mpp", "mpt", "xps", "xlsb", "csv", "xml",
];

/// Tracks whether a line-oriented scan is inside a fenced code block.
///
/// A fence opens with three or more backticks or tildes and closes with a
/// bare run of the same character that is at least as long. An opening run
/// indented by four or more columns is indented code, not a fence.
#[derive(Debug, Default, Clone, Copy)]
pub struct FenceTracker {
  open: Option<(char, usize)>,
}

impl FenceTracker {
  #[must_use]
  pub const fn new() -> Self {
    Self { open: None }
  }

  #[must_use]
  pub const fn in_code_block(&self) -> bool {
    self.open.is_some()
  }

  /// Feed the next line. Returns `true` if the line opened or closed a fence.
  pub fn update(&mut self, line: &str) -> bool {
    let trimmed = line.trim_start();
    // four columns of indentation make an indented code line, not a fence
    if self.open.is_none() && indent_columns(line) >= 4 {
      return false;
    }
    let Some(ch) = trimmed.chars().next().filter(|c| matches!(c, '`' | '~'))
    else {
      return false;
    };
    let count = trimmed.chars().take_while(|&c| c == ch).count();
    if count < 3 {
      return false;
    }

    match self.open {
      None => {
        self.open = Some((ch, count));
        true
      },
      Some((open_ch, open_count))
        if open_ch == ch
          && count >= open_count
          && trimmed[count * ch.len_utf8()..].trim().is_empty() =>
      {
        self.open = None;
        true
      },
      Some(_) => false,
    }
  }
}

/// Width of the leading whitespace of `line`, with tabs advancing to the next
/// multiple of four.
fn indent_columns(line: &str) -> usize {
  let mut columns = 0;
  for c in line.chars() {
    match c {
      ' ' => columns += 1,
      '\t' => columns += 4 - columns % 4,
      _ => break,
    }
  }
  columns
}

/// Regex that can never match. Stands in for a pattern that failed to
/// compile so callers degrade to "no match" instead of panicking.
#[must_use]
pub fn never_matching_regex() -> Regex {
  Regex::new(r"[^\s\S]").unwrap_or_else(|_| {
    #[allow(clippy::unwrap_used, reason = "Empty pattern always compiles")]
    Regex::new(r"^\b$").unwrap()
  })
}

/// Compile a static pattern, logging and degrading on failure.
pub(crate) fn compile_regex(pattern: &str) -> Regex {
  Regex::new(pattern).unwrap_or_else(|e| {
    log::error!("Failed to compile regex {pattern:?}: {e}");
    never_matching_regex()
  })
}

/// Extract all inline text from a heading or other inline container.
///
/// Formatting is dropped; inline code contributes its literal. Images and raw
/// HTML contribute nothing.
pub fn extract_inline_text<'a>(node: &'a AstNode<'a>) -> String {
  let mut text = String::new();
  for child in node.children() {
    match &child.data.borrow().value {
      NodeValue::Text(t) => text.push_str(t),
      NodeValue::Code(t) => text.push_str(&t.literal),
      NodeValue::Math(m) => text.push_str(&m.literal),
      NodeValue::SoftBreak | NodeValue::LineBreak => text.push(' '),
      NodeValue::Link(..)
      | NodeValue::Emph
      | NodeValue::Strong
      | NodeValue::Strikethrough
      | NodeValue::Superscript
      | NodeValue::Subscript => text.push_str(&extract_inline_text(child)),
      _ => {},
    }
  }
  text
}

/// Whether `target` carries a URI scheme such as `https:` or `mailto:`.
#[must_use]
pub fn has_scheme(target: &str) -> bool {
  target.split_once(':').is_some_and(|(scheme, _)| {
    scheme.len() > 1
      && scheme.starts_with(|c: char| c.is_ascii_alphabetic())
      && scheme
        .chars()
        .all(|c| c.is_ascii_alphanumeric() || matches!(c, '+' | '-' | '.'))
  })
}

/// Whether a link target should open in a new tab: absolute http(s) URLs and
/// anything that looks like a downloadable file.
#[must_use]
pub fn is_external_target(target: &str) -> bool {
  let is_web_url = ["http://", "https://"].iter().any(|prefix| {
    target
      .get(..prefix.len())
      .is_some_and(|p| p.eq_ignore_ascii_case(prefix))
      && target[prefix.len()..]
        .chars()
        .next()
        .is_some_and(|c| c.is_alphanumeric() || c == '_')
      && target.len() > prefix.len() + 1
  });
  if is_web_url {
    return true;
  }

  target.rsplit_once('.').is_some_and(|(_, ext)| {
    ext.chars().all(|c| c.is_alphanumeric() || c == '_')
      && DOWNLOAD_EXTENSIONS
        .iter()
        .any(|known| known.eq_ignore_ascii_case(ext))
  })
}

/// Rewrite a relative link to a markdown page into a link to its generated
/// HTML page. `README.md` becomes `index.html`; fragments are preserved.
/// Anything else is returned unchanged.
#[must_use]
pub fn rewrite_markdown_link(target: &str) -> String {
  if target.starts_with('#') || has_scheme(target) || target.starts_with("//")
  {
    return target.to_owned();
  }

  let (path, fragment) = match target.split_once('#') {
    Some((path, fragment)) => (path, Some(fragment)),
    None => (target, None),
  };
  let Some((stem, ext)) = path.rsplit_once('.') else {
    return target.to_owned();
  };
  if !lang::is_markdown_extension(ext) || stem.ends_with('/') || stem.is_empty()
  {
    return target.to_owned();
  }

  let (dir, name) = stem.rsplit_once('/').map_or(("", stem), |(d, n)| (d, n));
  let page = if name.eq_ignore_ascii_case("readme") {
    "index"
  } else {
    name
  };

  let mut rewritten = String::with_capacity(target.len() + 2);
  if !dir.is_empty() || stem.starts_with('/') {
    rewritten.push_str(dir);
    rewritten.push('/');
  }
  rewritten.push_str(page);
  rewritten.push_str(".html");
  if let Some(fragment) = fragment {
    rewritten.push('#');
    rewritten.push_str(fragment);
  }
  rewritten
}
