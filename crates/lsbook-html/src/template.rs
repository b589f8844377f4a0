//! Page assembly through the embedded Tera template.
use color_eyre::eyre::{Context, Result};
use html_escape::encode_double_quoted_attribute;
use lsbook_commonmark::{Features, TocEntry};
use lsbook_config::{Config, I18n};
use lsbook_templates::{ASSETS_DIR, PAGE_TEMPLATE};
use tera::Tera;

use crate::sidebar::PageLink;

/// Everything that varies between pages.
#[derive(Debug, Clone, Copy)]
pub struct PageView<'a> {
  pub page_title:   &'a str,
  pub content:      &'a str,
  pub toc:          &'a [TocEntry],
  pub features:     Features,
  pub summary_html: &'a str,
  pub prev:         Option<&'a PageLink>,
  pub next:         Option<&'a PageLink>,
  pub base_path:    &'a str,
}

/// Copy of `link` whose href can be placed inside a double-quoted attribute.
/// The title is escaped by the template.
fn attribute_safe(link: &PageLink) -> PageLink {
  PageLink {
    title: link.title.clone(),
    href:  encode_double_quoted_attribute(&link.href).into_owned(),
  }
}

/// Renders full HTML documents. Built once per build and shared by every
/// page task.
#[derive(Debug)]
pub struct PageRenderer {
  tera: Tera,
  year: i16,
}

impl PageRenderer {
  /// Compile the page template.
  ///
  /// # Errors
  ///
  /// Returns an error if the embedded template fails to parse.
  pub fn new() -> Result<Self> {
    let mut tera = Tera::default();
    tera
      .add_raw_template("page", PAGE_TEMPLATE)
      .wrap_err("Failed to load page template")?;
    Ok(Self {
      tera,
      year: jiff::Zoned::now().year(),
    })
  }

  /// Year printed in the page footer.
  #[must_use]
  pub const fn year(&self) -> i16 {
    self.year
  }

  /// Render one page.
  ///
  /// # Errors
  ///
  /// Returns an error if template rendering fails.
  pub fn render(
    &self,
    config: &Config,
    i18n: &I18n,
    page: &PageView<'_>,
  ) -> Result<String> {
    let mut context = tera::Context::new();
    context.insert("lang", i18n.language());
    context.insert("book_title", &config.title);
    context.insert("author", &config.author);
    context.insert("github_url", &config.github_url);
    context.insert("i18n", i18n.strings());
    context.insert("year", &self.year);

    context.insert("page_title", page.page_title);
    context.insert("content", page.content);
    context.insert("toc", page.toc);
    context.insert("features", &page.features);
    context.insert("summary_html", page.summary_html);
    context.insert("prev", &page.prev.map(attribute_safe));
    context.insert("next", &page.next.map(attribute_safe));
    context.insert("base_path", page.base_path);
    context.insert(
      "assets_path",
      &format!("{}/{ASSETS_DIR}", page.base_path),
    );

    self
      .tera
      .render("page", &context)
      .wrap_err_with(|| format!("Failed to render page '{}'", page.page_title))
  }
}
