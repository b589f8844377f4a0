use std::{
  fs,
  path::{Path, PathBuf},
};

use color_eyre::eyre::{Context, Result, bail};
use globset::GlobSet;
use log::{debug, trace};
use walkdir::{DirEntry, WalkDir};

/// Remove and recreate the output directory.
///
/// # Errors
///
/// Refuses to delete a directory that contains the book itself, and fails if
/// the directory cannot be removed or created.
pub fn prepare_output_dir(book_root: &Path, output_dir: &Path) -> Result<()> {
  if book_root.starts_with(output_dir) {
    bail!(
      "Output directory {} contains the book at {}; refusing to clear it",
      output_dir.display(),
      book_root.display()
    );
  }

  if output_dir.exists() {
    debug!("Removing previous output in {}", output_dir.display());
    fs::remove_dir_all(output_dir).wrap_err_with(|| {
      format!("Failed to clear output directory {}", output_dir.display())
    })?;
  }
  fs::create_dir_all(output_dir).wrap_err_with(|| {
    format!("Failed to create output directory {}", output_dir.display())
  })
}

/// What the raw copy of the book sources leaves out.
#[derive(Debug, Clone, Copy)]
pub struct CopyOptions<'a> {
  pub output_dir: &'a Path,
  /// Files at the book root that are inputs, not content (outline, config).
  pub skip_files: &'a [PathBuf],
  /// User `ignore` patterns, matched against book-relative paths.
  pub ignore:     &'a GlobSet,
}

fn is_hidden(entry: &DirEntry) -> bool {
  entry
    .file_name()
    .to_str()
    .is_some_and(|name| name.starts_with('.'))
}

/// Copy every file of the book to the output, returning how many were copied.
/// Directories left empty by the filters are not created.
///
/// # Errors
///
/// Returns an error if the tree cannot be walked or a file cannot be copied.
pub fn copy_sources(book_root: &Path, options: &CopyOptions<'_>) -> Result<usize> {
  let walker = WalkDir::new(book_root)
    .min_depth(1)
    .follow_links(true)
    .into_iter()
    .filter_entry(|entry| {
      let path = entry.path();
      if is_hidden(entry) || path == options.output_dir {
        return false;
      }
      if options.skip_files.iter().any(|skip| skip == path) {
        return false;
      }
      let rel = path.strip_prefix(book_root).unwrap_or(path);
      if options.ignore.is_match(rel) {
        trace!("Ignoring {}", rel.display());
        return false;
      }
      true
    });

  let mut copied = 0;
  for entry in walker {
    let entry = entry.wrap_err("Failed to walk book directory")?;
    let rel = entry
      .path()
      .strip_prefix(book_root)
      .wrap_err("Walked outside the book directory")?;
    // directories appear only as parents of copied files
    if entry.file_type().is_dir() {
      continue;
    }

    let target = options.output_dir.join(rel);
    if let Some(parent) = target.parent() {
      fs::create_dir_all(parent).wrap_err_with(|| {
        format!("Failed to create directory {}", parent.display())
      })?;
    }
    fs::copy(entry.path(), &target).wrap_err_with(|| {
      format!(
        "Failed to copy {} to {}",
        entry.path().display(),
        target.display()
      )
    })?;
    copied += 1;
  }

  debug!("Copied {copied} source files");
  Ok(copied)
}
