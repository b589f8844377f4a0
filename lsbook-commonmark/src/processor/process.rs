//! File-level processing: read, expand imports, render.
use std::{fs, path::Path};

use log::debug;

use super::types::MarkdownProcessor;
use crate::{
  error::ProcessError,
  imports::{ImportContext, process_imports},
  types::PageRenderResult,
};

/// Process markdown text that belongs to a page, expanding `@import`
/// directives before rendering.
///
/// # Errors
///
/// Fails if an import target is missing or a collapsible section is left
/// open. `source` is only used to label the error.
pub fn process_markdown_string(
  processor: &MarkdownProcessor,
  markdown: &str,
  source: &Path,
  ctx: &ImportContext<'_>,
) -> Result<PageRenderResult, ProcessError> {
  let imported = process_imports(markdown, ctx)?;
  let rendered =
    processor
      .render(&imported.content)
      .map_err(|source_err| ProcessError::Markdown {
        path:   source.to_path_buf(),
        source: source_err,
      })?;

  Ok(PageRenderResult {
    html:            rendered.html,
    toc:             rendered.toc,
    features:        rendered.features,
    external_images: imported.external_images,
  })
}

/// Read and process a markdown file.
///
/// # Errors
///
/// Fails if the file cannot be read, or for any reason
/// [`process_markdown_string`] fails.
pub fn process_markdown_file(
  processor: &MarkdownProcessor,
  file_path: &Path,
  ctx: &ImportContext<'_>,
) -> Result<PageRenderResult, ProcessError> {
  debug!("Processing markdown file {}", file_path.display());
  let content =
    fs::read_to_string(file_path).map_err(|source| ProcessError::Read {
      path: file_path.to_path_buf(),
      source,
    })?;
  process_markdown_string(processor, &content, file_path, ctx)
}
