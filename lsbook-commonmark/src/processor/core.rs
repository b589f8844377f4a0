//! Core implementation of the Markdown processor.
//!
//! Rendering runs in four steps: line-level extensions, comrak parsing, AST
//! rewriting of the custom constructs, and HTML formatting. All counters live
//! in a [`RenderState`] created per call.
use comrak::{
  Arena,
  nodes::{AstNode, NodeHtmlBlock, NodeValue},
  options::Options,
  parse_document,
};
use html_escape::{encode_double_quoted_attribute, encode_text};
use log::trace;

use super::{
  extensions,
  types::{MarkdownOptions, MarkdownProcessor, RenderState},
};
use crate::{
  error::MarkdownError,
  types::MarkdownResult,
  utils::{self, extract_inline_text, lang},
};

impl MarkdownProcessor {
  /// Create a new `MarkdownProcessor` with the given options.
  #[must_use]
  pub const fn new(options: MarkdownOptions) -> Self {
    Self { options }
  }

  /// Access processor options.
  #[must_use]
  pub const fn options(&self) -> &MarkdownOptions {
    &self.options
  }

  /// Render markdown to an HTML fragment plus its heading outline and the
  /// optional bundles it needs.
  ///
  /// # Errors
  ///
  /// Returns [`MarkdownError::UnterminatedSection`] when a collapsible section
  /// is opened and never closed. Any other malformed syntax renders as text.
  pub fn render(&self, markdown: &str) -> Result<MarkdownResult, MarkdownError> {
    let mut state = RenderState::default();
    let preprocessed = extensions::preprocess(markdown, &self.options, &mut state)?;

    let arena = Arena::new();
    let options = self.comrak_options();
    let root = parse_document(&arena, &preprocessed, &options);

    self.transform_document(root, &options, &mut state);

    let mut html = String::with_capacity(preprocessed.len() * 2);
    comrak::format_html(root, &options, &mut html).unwrap_or_default();

    trace!(
      "Rendered {} bytes of markdown into {} headings, {} images",
      markdown.len(),
      state.anchor_id,
      state.image_id
    );
    Ok(state.finish(html))
  }

  /// Build comrak options from `MarkdownOptions`.
  fn comrak_options(&self) -> Options<'_> {
    let mut options = Options::default();
    if self.options.gfm {
      options.extension.table = true;
      options.extension.footnotes = true;
      options.extension.strikethrough = true;
      options.extension.tasklist = true;
      options.extension.autolink = true;
    }
    options.extension.math_dollars = self.options.math;
    options.render.r#unsafe = true;
    options.extension.header_ids = None;
    options
  }

  /// Rewrite custom constructs in place.
  ///
  /// Headings are numbered first so anchor IDs follow document order. Code,
  /// math and images are replaced next; links after that so their rendered
  /// content already contains the gallery markup; headings last for the same
  /// reason.
  fn transform_document<'a>(
    &self,
    root: &'a AstNode<'a>,
    options: &Options<'_>,
    state: &mut RenderState,
  ) {
    let nodes: Vec<&'a AstNode<'a>> = root.descendants().collect();

    let mut headings = Vec::new();
    for node in &nodes {
      let level = match &node.data.borrow().value {
        NodeValue::Heading(heading) => heading.level,
        _ => continue,
      };
      let name = extract_inline_text(node).trim().to_owned();
      let (anchor, prefix) = state.register_heading(level, name);
      headings.push((*node, level, anchor, prefix));
    }

    for node in &nodes {
      if !is_attached(node, root) {
        continue;
      }
      let replacement = match &node.data.borrow().value {
        NodeValue::CodeBlock(block) => {
          Some(self.render_code_block(&block.info, &block.literal, state))
        },
        NodeValue::Math(math) => {
          state.features.math = true;
          let body = encode_text(&math.literal);
          Some(if math.display_math {
            NodeValue::HtmlInline(format!("\\[{body}\\]"))
          } else {
            NodeValue::HtmlInline(format!("\\({body}\\)"))
          })
        },
        NodeValue::Image(link) => {
          Some(render_image(node, &link.url, &link.title, state))
        },
        _ => None,
      };
      if let Some(value) = replacement {
        replace_node(node, value);
      }
    }

    for node in nodes.iter().rev() {
      if !is_attached(node, root) {
        continue;
      }
      let replacement = match &node.data.borrow().value {
        NodeValue::Link(link) => {
          Some(self.render_link(node, &link.url, &link.title, options))
        },
        _ => None,
      };
      if let Some(value) = replacement {
        replace_node(node, value);
      }
    }

    for (node, level, anchor, prefix) in headings {
      let inner = render_children(node, options);
      let html = format!(
        "<h{level} id=\"{anchor}\"><a class=\"anchor-navigation-ex-anchor\" \
         href=\"#{anchor}\" name=\"{anchor}\"><i aria-hidden=\"true\" \
         class=\"fa fa-link\"></i></a>{prefix}{inner}</h{level}>\n"
      );
      replace_node(
        node,
        NodeValue::HtmlBlock(NodeHtmlBlock {
          block_type: 0,
          literal:    html,
        }),
      );
    }
  }

  fn render_code_block(
    &self,
    info: &str,
    literal: &str,
    state: &mut RenderState,
  ) -> NodeValue {
    let tag = info.split_whitespace().next().unwrap_or_default();
    let code = encode_text(literal.trim_end_matches('\n'));

    let html = if tag.eq_ignore_ascii_case("mermaid") {
      state.features.diagram = true;
      format!("<div class=\"mermaid\">{code}</div>\n")
    } else {
      state.features.highlight = true;
      let language = if tag.is_empty() {
        lang::highlighter_alias(&self.options.default_code_language)
      } else {
        lang::highlighter_alias(tag)
      };
      format!(
        "<pre class=\"line-numbers\"><code class=\"lang-{} \
         rainbow-braces\">{code}</code></pre>\n",
        encode_double_quoted_attribute(&language)
      )
    };

    NodeValue::HtmlBlock(NodeHtmlBlock {
      block_type: 0,
      literal:    html,
    })
  }

  fn render_link<'a>(
    &self,
    node: &'a AstNode<'a>,
    url: &str,
    title: &str,
    options: &Options<'_>,
  ) -> NodeValue {
    let inner = render_children(node, options);
    let href = if self.options.rewrite_markdown_links {
      utils::rewrite_markdown_link(url)
    } else {
      url.to_owned()
    };

    let mut html = format!("<a href=\"{}\"", encode_double_quoted_attribute(&href));
    if utils::is_external_target(url) {
      html.push_str(" target=\"_blank\"");
    }
    if !title.is_empty() {
      html.push_str(" title=\"");
      html.push_str(&encode_double_quoted_attribute(title));
      html.push('"');
    }
    html.push('>');
    html.push_str(&inner);
    html.push_str("</a>");
    NodeValue::HtmlInline(html)
  }
}

fn render_image<'a>(
  node: &'a AstNode<'a>,
  url: &str,
  title: &str,
  state: &mut RenderState,
) -> NodeValue {
  let id = state.next_image_id();
  let alt = extract_inline_text(node);
  let title = if title.is_empty() { alt.as_str() } else { title };
  let src = encode_double_quoted_attribute(url);
  NodeValue::HtmlInline(format!(
    "<a data-lightbox=\"{id}\" href=\"{src}\"><img src=\"{src}\" alt=\"{}\" \
     title=\"{}\" /></a>",
    encode_double_quoted_attribute(&alt),
    encode_double_quoted_attribute(title)
  ))
}

/// Render the children of `node` to HTML.
fn render_children<'a>(node: &'a AstNode<'a>, options: &Options<'_>) -> String {
  let mut html = String::new();
  for child in node.children() {
    comrak::format_html(child, options, &mut html).unwrap_or_default();
  }
  html
}

/// Replace a node's value and drop its children, which the new raw HTML
/// already contains.
fn replace_node<'a>(node: &'a AstNode<'a>, value: NodeValue) {
  let children: Vec<_> = node.children().collect();
  for child in children {
    child.detach();
  }
  node.data.borrow_mut().value = value;
}

/// Whether `node` is still part of the tree rooted at `root`.
fn is_attached<'a>(node: &'a AstNode<'a>, root: &'a AstNode<'a>) -> bool {
  node.ancestors().any(|ancestor| std::ptr::eq(ancestor, root))
}

#[cfg(test)]
mod tests {
  #![allow(clippy::expect_used, reason = "Fine in tests")]
  use super::*;

  fn render(markdown: &str) -> MarkdownResult {
    MarkdownProcessor::new(MarkdownOptions::default())
      .render(markdown)
      .expect("render should succeed")
  }

  #[test]
  fn headings_get_anchor_markup() {
    let result = render("# Title\n\n## Part *one*\n");
    assert!(result.html.contains(
      "<h1 id=\"anchor_1\"><a class=\"anchor-navigation-ex-anchor\" \
       href=\"#anchor_1\" name=\"anchor_1\"><i aria-hidden=\"true\" \
       class=\"fa fa-link\"></i></a>Title</h1>"
    ));
    assert!(result.html.contains("</a>1. Part <em>one</em></h2>"));
    assert_eq!(result.toc[0].children[0].name, "Part one");
    assert_eq!(result.toc[0].children[0].anchor, "anchor_2");
  }

  #[test]
  fn toc_names_are_trimmed() {
    let result = render("# Top\n\n## Sub ![i](a.png)\n");
    assert_eq!(result.toc[0].children[0].name, "Sub");
  }

  #[test]
  fn backslash_parens_are_not_math() {
    let result = render("Call f\\(x\\) here.\n");
    assert!(result.html.contains("f(x)"));
    assert!(!result.features.math);
  }

  #[test]
  fn code_language_aliases_and_default() {
    let result = render("```py\nprint(1 < 2)\n```\n\n```\nplain\n```\n");
    assert!(result.html.contains(
      "<pre class=\"line-numbers\"><code class=\"lang-python \
       rainbow-braces\">print(1 &lt; 2)</code></pre>"
    ));
    assert!(result.html.contains("lang-none"));
    assert!(result.features.highlight);
    assert!(!result.features.diagram);
  }

  #[test]
  fn links_inside_headings_keep_their_markup() {
    let result = render("# See [docs](https://example.com)\n");
    assert!(result.html.contains(
      "See <a href=\"https://example.com\" target=\"_blank\">docs</a></h1>"
    ));
    assert_eq!(result.toc[0].name, "See docs");
  }

  #[test]
  fn image_inside_link_renders_once() {
    let result = render("[![logo](a.png)](page.md)\n");
    assert!(result.html.contains(
      "<a href=\"page.html\"><a data-lightbox=\"1\" href=\"a.png\"><img \
       src=\"a.png\" alt=\"logo\" title=\"logo\" /></a></a>"
    ));
  }
}
