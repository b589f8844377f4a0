//! The build: load inputs, prepare the output tree, render every page in
//! parallel, then write the search index and imported images.
use std::{
  collections::{BTreeSet, HashSet},
  fs,
  path::{Path, PathBuf},
  time::{Duration, Instant},
};

use color_eyre::eyre::{Context, Result};
use log::{debug, info, warn};
use lsbook_commonmark::{MarkdownOptions, MarkdownProcessor, utils::path::normalize};
use lsbook_config::{Config, I18n};
use lsbook_html::{BookContext, PageRenderer, RenderedPage, SearchIndex, render_page};
use lsbook_summary::{Summary, find_summary_file};
use lsbook_utils::{
  CopyOptions,
  copy_external_images,
  copy_sources,
  output_path,
  prepare_output_dir,
  write_assets,
};
use rayon::prelude::*;

/// Output directory name used when none is given.
pub const DEFAULT_OUTPUT_DIR: &str = "_book";

#[derive(Debug, Clone, Default)]
pub struct BuildOptions {
  pub book:   PathBuf,
  pub output: Option<PathBuf>,
  /// Render threads; defaults to the number of CPUs.
  pub jobs:   Option<usize>,
}

#[derive(Debug, Clone)]
pub struct BuildReport {
  pub output_dir: PathBuf,
  pub pages:      usize,
  pub elapsed:    Duration,
}

fn resolve_output(book_root: &Path, output: Option<&Path>) -> Result<PathBuf> {
  let Some(output) = output else {
    return Ok(book_root.join(DEFAULT_OUTPUT_DIR));
  };
  let absolute = std::path::absolute(output).wrap_err_with(|| {
    format!("Failed to resolve output directory {}", output.display())
  })?;
  let normalized = normalize(&absolute);
  Ok(fs::canonicalize(&normalized).unwrap_or(normalized))
}

/// Indices of the navigation entries to render, skipping entries whose
/// output file an earlier entry already produces.
fn unique_pages(summary: &Summary) -> Vec<usize> {
  let mut seen = HashSet::new();
  summary
    .navigation
    .iter()
    .enumerate()
    .filter(|(_, entry)| {
      let fresh = seen.insert(output_path(&entry.reference));
      if !fresh {
        warn!("{} is listed more than once in the outline", entry.reference);
      }
      fresh
    })
    .map(|(idx, _)| idx)
    .collect()
}

/// Build the book described by `options`.
///
/// # Errors
///
/// Fails on a missing or invalid `book.json` or outline, an outline that does
/// not start at `README.md`, any page that fails to render, or any I/O error
/// while writing the output.
pub fn generate_book(options: &BuildOptions) -> Result<BuildReport> {
  let started = Instant::now();

  let book_root = fs::canonicalize(&options.book).wrap_err_with(|| {
    format!("Book directory {} does not exist", options.book.display())
  })?;
  let output_dir = resolve_output(&book_root, options.output.as_deref())?;
  info!("Building {} into {}", book_root.display(), output_dir.display());

  let config = Config::load(&book_root)?;
  let i18n = I18n::load(&config.language)?;
  let ignore = config.ignore_set()?;
  let summary_file = find_summary_file(&book_root)?;
  let summary = Summary::load(&book_root, i18n.get("SUMMARY"))?;
  summary.validate_entry()?;
  debug!(
    "Outline has {} sections and {} pages",
    summary.chapters.len(),
    summary.navigation.len()
  );

  prepare_output_dir(&book_root, &output_dir)?;
  let skip_files = [summary_file, Config::path_in(&book_root)];
  copy_sources(&book_root, &CopyOptions {
    output_dir:  &output_dir,
    skip_files:  &skip_files,
    ignore:      &ignore,
  })?;
  write_assets(&output_dir)?;

  let processor = MarkdownProcessor::new(MarkdownOptions::default());
  let renderer = PageRenderer::new()?;
  let ctx = BookContext {
    book_root:  &book_root,
    output_dir: &output_dir,
    config:     &config,
    i18n:       &i18n,
    summary:    &summary,
    processor:  &processor,
    renderer:   &renderer,
  };

  let thread_count = options.jobs.unwrap_or_else(num_cpus::get).max(1);
  let pool = rayon::ThreadPoolBuilder::new()
    .num_threads(thread_count)
    .build()
    .wrap_err("Failed to create render thread pool")?;
  debug!("Rendering with {thread_count} threads");

  let indices = unique_pages(&summary);
  let pages: Vec<RenderedPage> = pool.install(|| {
    indices
      .par_iter()
      .map(|&idx| render_page(&ctx, idx))
      .collect::<Result<Vec<_>>>()
  })?;

  let mut search = SearchIndex::new();
  let mut external_images = BTreeSet::new();
  for page in pages {
    search.insert(page.search)?;
    external_images.extend(page.external_images);
  }
  search.write(&output_dir)?;

  if !external_images.is_empty() {
    info!("Copying {} imported images", external_images.len());
  }
  pool.install(|| copy_external_images(&external_images, &output_dir))?;

  let report = BuildReport {
    output_dir,
    pages: search.len(),
    elapsed: started.elapsed(),
  };
  info!(
    "Generated {} pages in {:.2?} ({})",
    report.pages,
    report.elapsed,
    report.output_dir.display()
  );
  Ok(report)
}
