//! Line-level extensions applied before the markdown is parsed.
//!
//! Collapsible sections, spoilers and `$$` display-math blocks are rewritten
//! into raw HTML here; everything inside fenced code is left untouched.
use std::{borrow::Cow, sync::LazyLock};

use regex::{Captures, Regex};

use super::types::{MarkdownOptions, RenderState};
use crate::{
  error::MarkdownError,
  utils::{FenceTracker, compile_regex},
};

static SECTION_START: LazyLock<Regex> =
  LazyLock::new(|| compile_regex(r"^([\t ]*)<!--sec\b(.*?)ces-->\s*$"));

static SECTION_END: LazyLock<Regex> =
  LazyLock::new(|| compile_regex(r"^[\t ]*<!--endsec-->\s*$"));

static SECTION_ATTR: LazyLock<Regex> = LazyLock::new(|| {
  compile_regex(r#"([\w-]+)\s*=\s*(?:"([^"]*)"|'([^']*)'|([^\s"']+))"#)
});

static SPOILER: LazyLock<Regex> =
  LazyLock::new(|| compile_regex(r"\{%s%\}(.*?)\{%ends%\}"));

/// Attributes of a `<!--sec ... ces-->` start marker.
#[derive(Debug, Default, PartialEq, Eq)]
struct SectionAttrs {
  title: String,
  show:  bool,
}

fn parse_section_attrs(raw: &str) -> SectionAttrs {
  let mut attrs = SectionAttrs::default();
  for caps in SECTION_ATTR.captures_iter(raw) {
    let key = caps[1].to_ascii_lowercase();
    let value = caps
      .get(2)
      .or_else(|| caps.get(3))
      .or_else(|| caps.get(4))
      .map_or("", |m| m.as_str());

    if key.ends_with("title") {
      value.clone_into(&mut attrs.title);
    } else if key.ends_with("show") {
      attrs.show = value.eq_ignore_ascii_case("true");
    }
  }
  attrs
}

fn section_open(indent: &str, id: u32, attrs: &SectionAttrs) -> String {
  let title = html_escape::encode_text(&attrs.title);
  let title_attr = html_escape::encode_double_quoted_attribute(&attrs.title);
  let (button_class, icon, panel_class) = if attrs.show {
    (" sec-show", "up", "in")
  } else {
    ("", "down", "collapse")
  };
  format!(
    "{indent}<section class=\"sec\" data-title=\"{title_attr}\"><div \
     class=\"panel panel-default\"><div class=\"panel-heading\"><b>{title}<a \
     class=\"pull-right section atTitle btn btn-default{button_class}\" \
     target=\"sectionx{id}\"><span class=\"fa fa-angle-{icon}\"></span></a></\
     b></div><div class=\"panel-collapse {panel_class}\" \
     id=\"sectionx{id}\"><div class=\"panel-body\">"
  )
}

/// Wrap `{%s%}...{%ends%}` in a spoiler span, skipping matches that sit inside
/// an inline code span on the same line.
#[must_use]
pub fn process_spoilers(line: &str) -> Cow<'_, str> {
  if !line.contains("{%s%}") {
    return Cow::Borrowed(line);
  }
  SPOILER.replace_all(line, |caps: &Captures| {
    let start = caps.get(0).map_or(0, |m| m.start());
    if line[..start].matches('`').count() % 2 == 1 {
      caps[0].to_owned()
    } else {
      format!("<span class=\"spoiler\">{}</span>", &caps[1])
    }
  })
}

/// Find the closing `$$` line for a display-math block opened at `start`.
fn find_math_close(lines: &[&str], start: usize) -> Option<usize> {
  lines
    .iter()
    .enumerate()
    .skip(start + 1)
    .find(|(_, line)| line.trim() == "$$")
    .map(|(idx, _)| idx)
}

/// Rewrite section markers, spoilers and display-math blocks.
///
/// # Errors
///
/// Returns [`MarkdownError::UnterminatedSection`] if a section start marker
/// has no matching end marker.
pub(crate) fn preprocess(
  markdown: &str,
  options: &MarkdownOptions,
  state: &mut RenderState,
) -> Result<String, MarkdownError> {
  let lines: Vec<&str> = markdown.lines().collect();
  let mut output = String::with_capacity(markdown.len() + 256);
  let mut fences = FenceTracker::new();
  // (indent, start line, title) of every open section
  let mut open_sections: Vec<(String, usize, String)> = Vec::new();

  let mut idx = 0;
  while idx < lines.len() {
    let line = lines[idx];
    idx += 1;

    if fences.update(line) || fences.in_code_block() {
      output.push_str(line);
      output.push('\n');
      continue;
    }

    if options.math && line.trim() == "$$" {
      if let Some(close) = find_math_close(&lines, idx - 1) {
        // blank lines would end the raw HTML block early
        let body = lines[idx..close]
          .iter()
          .filter(|l| !l.trim().is_empty())
          .copied()
          .collect::<Vec<_>>()
          .join("\n");
        let indent = &line[..line.len() - line.trim_start().len()];
        output.push_str(indent);
        output.push_str("<div class=\"math-block\">\\[");
        output.push_str(&html_escape::encode_text(body.trim()));
        output.push_str("\\]</div>\n\n");
        state.features.math = true;
        idx = close + 1;
        continue;
      }
    }

    if let Some(caps) = SECTION_START.captures(line) {
      let attrs = parse_section_attrs(&caps[2]);
      let indent = caps[1].to_owned();
      let id = state.next_section_id();
      output.push_str(&section_open(&indent, id, &attrs));
      output.push_str("\n\n");
      open_sections.push((indent, idx, attrs.title));
      continue;
    }

    if SECTION_END.is_match(line) {
      if let Some((indent, ..)) = open_sections.pop() {
        output.push('\n');
        output.push_str(&indent);
        output.push_str("</div></div></div></section>\n\n");
        continue;
      }
      log::debug!("Ignoring <!--endsec--> without an open section on line {idx}");
    }

    output.push_str(&process_spoilers(line));
    output.push('\n');
  }

  if let Some((_, line, title)) = open_sections.into_iter().next_back() {
    return Err(MarkdownError::UnterminatedSection { line, title });
  }

  Ok(output)
}

#[cfg(test)]
mod tests {
  #![allow(clippy::expect_used, reason = "Fine in tests")]
  use super::*;

  fn run(markdown: &str) -> (String, RenderState) {
    let mut state = RenderState::default();
    let out = preprocess(markdown, &MarkdownOptions::default(), &mut state)
      .expect("preprocess should succeed");
    (out, state)
  }

  #[test]
  fn section_attributes_parse_quoted_and_bare_values() {
    let attrs = parse_section_attrs(r#" data-title="Hidden text" data-show=true"#);
    assert_eq!(attrs, SectionAttrs {
      title: "Hidden text".into(),
      show:  true,
    });
    assert!(!parse_section_attrs("title='x' show=false").show);
  }

  #[test]
  fn sections_get_sequential_ids() {
    let (out, state) = run(
      "<!--sec data-title=\"One\" data-show=true ces-->\nA\n<!--endsec-->\n\n<!--sec data-title=\"Two\" ces-->\nB\n<!--endsec-->\n",
    );
    assert!(out.contains("id=\"sectionx0\""));
    assert!(out.contains("id=\"sectionx1\""));
    assert!(out.contains("panel-collapse in"));
    assert!(out.contains("panel-collapse collapse"));
    assert_eq!(state.section_id, 2);
  }

  #[test]
  fn unterminated_section_is_an_error() {
    let mut state = RenderState::default();
    let err = preprocess(
      "text\n<!--sec title=\"Open\" ces-->\nbody\n",
      &MarkdownOptions::default(),
      &mut state,
    )
    .expect_err("missing end marker must fail");
    assert!(matches!(
      err,
      MarkdownError::UnterminatedSection { line: 2, ref title } if title == "Open"
    ));
  }

  #[test]
  fn markers_inside_code_fences_are_literal() {
    let (out, _) = run("```\n<!--sec title=\"x\" ces-->\n{%s%}a{%ends%}\n```\n");
    assert!(out.contains("<!--sec title=\"x\" ces-->"));
    assert!(out.contains("{%s%}a{%ends%}"));
  }

  #[test]
  fn indented_code_does_not_hide_section_markers() {
    let (out, state) = run(
      "    ```\n    x\n\n<!--sec title=\"T\" ces-->\nx\n<!--endsec-->\n",
    );
    assert!(out.contains("id=\"sectionx0\""));
    assert!(!out.contains("<!--sec"));
    assert_eq!(state.section_id, 1);

    let mut state = RenderState::default();
    assert!(
      preprocess(
        "    ```\n<!--sec title=\"T\" ces-->\nnever closed\n",
        &MarkdownOptions::default(),
        &mut state,
      )
      .is_err()
    );
  }

  #[test]
  fn spoilers_skip_inline_code() {
    assert_eq!(
      process_spoilers("{%s%}secret{%ends%} and `{%s%}code{%ends%}`"),
      "<span class=\"spoiler\">secret</span> and `{%s%}code{%ends%}`"
    );
    assert!(matches!(process_spoilers("plain"), Cow::Borrowed("plain")));
  }

  #[test]
  fn display_math_blocks() {
    let (out, state) = run("$$\na < b\n$$\nafter");
    assert!(out.contains("<div class=\"math-block\">\\[a &lt; b\\]</div>"));
    assert!(out.ends_with("after\n"));
    assert!(state.features.math);

    let (out, state) = run("$$\nnever closed");
    assert_eq!(out, "$$\nnever closed\n");
    assert!(!state.features.math);
  }
}
