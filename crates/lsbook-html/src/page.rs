//! The per-page pipeline: expand imports, render markdown, build the sidebar,
//! assemble the document and write it.
use std::{
  collections::BTreeSet,
  fs,
  path::{Path, PathBuf},
};

use color_eyre::eyre::{Context, Result, eyre};
use log::debug;
use lsbook_commonmark::{
  ImportContext,
  MarkdownProcessor,
  TocEntry,
  process_markdown_file,
  utils::path::to_url_path,
};
use lsbook_config::{Config, I18n};
use lsbook_summary::Summary;

use crate::{
  search::{SearchEntry, strip_tags},
  sidebar::render_for,
  template::{PageRenderer, PageView},
};

/// Read-only state shared by every page task of a build.
#[derive(Debug, Clone, Copy)]
pub struct BookContext<'a> {
  pub book_root:  &'a Path,
  pub output_dir: &'a Path,
  pub config:     &'a Config,
  pub i18n:       &'a I18n,
  pub summary:    &'a Summary,
  pub processor:  &'a MarkdownProcessor,
  pub renderer:   &'a PageRenderer,
}

/// What a finished page contributes to the rest of the build.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct RenderedPage {
  pub search:          SearchEntry,
  pub external_images: BTreeSet<PathBuf>,
}

fn collect_names(entries: &[TocEntry], names: &mut Vec<String>) {
  for entry in entries {
    names.push(entry.name.clone());
    collect_names(&entry.children, names);
  }
}

/// Render the page at `index` of the navigation list and write it to the
/// output directory.
///
/// # Errors
///
/// Fails if the index is out of range, the source or an import target cannot
/// be read, a section is left open, or the output cannot be written.
pub fn render_page(ctx: &BookContext<'_>, index: usize) -> Result<RenderedPage> {
  let sidebar = render_for(ctx.summary, index)
    .ok_or_else(|| eyre!("Page index {index} is outside the navigation list"))?;

  let source_rel = sidebar.reference.split('#').next().unwrap_or_default();
  let source = ctx.book_root.join(source_rel);
  let page_dir = source.parent().unwrap_or(ctx.book_root);
  debug!("Rendering {} ({})", source_rel, sidebar.level);

  let import_ctx = ImportContext {
    page_dir,
    book_root: ctx.book_root,
    base_path: &sidebar.base_path,
  };
  let rendered = process_markdown_file(ctx.processor, &source, &import_ctx)
    .wrap_err_with(|| format!("Failed to render page {}", source.display()))?;

  let html = ctx.renderer.render(ctx.config, ctx.i18n, &PageView {
    page_title:   &sidebar.title,
    content:      &rendered.html,
    toc:          &rendered.toc,
    features:     rendered.features,
    summary_html: &sidebar.summary_html,
    prev:         sidebar.prev.as_ref(),
    next:         sidebar.next.as_ref(),
    base_path:    &sidebar.base_path,
  })?;

  let target = ctx.output_dir.join(&sidebar.output_path);
  if let Some(parent) = target.parent() {
    fs::create_dir_all(parent).wrap_err_with(|| {
      format!("Failed to create output directory {}", parent.display())
    })?;
  }
  fs::write(&target, html)
    .wrap_err_with(|| format!("Failed to write page {}", target.display()))?;

  let mut keywords = Vec::new();
  collect_names(&rendered.toc, &mut keywords);

  Ok(RenderedPage {
    search:          SearchEntry {
      url:      to_url_path(&sidebar.output_path),
      title:    sidebar.title,
      keywords: keywords.join(" "),
      body:     strip_tags(&rendered.html),
    },
    external_images: rendered.external_images,
  })
}
