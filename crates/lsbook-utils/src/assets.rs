use std::{
  collections::{BTreeMap, BTreeSet},
  ffi::OsStr,
  fs,
  path::{Path, PathBuf},
};

use color_eyre::eyre::{Context, Result};
use log::{debug, warn};
use lsbook_commonmark::IMPORT_IMAGES_DIR;
use lsbook_templates as templates;
use rayon::prelude::*;

/// Write the embedded stylesheet and script under `lsbook/` in the output.
///
/// # Errors
///
/// Returns an error if the directory or any asset cannot be written.
pub fn write_assets(output_dir: &Path) -> Result<()> {
  let assets_dir = output_dir.join(templates::ASSETS_DIR);
  fs::create_dir_all(&assets_dir).wrap_err_with(|| {
    format!("Failed to create assets directory {}", assets_dir.display())
  })?;

  for (filename, content) in templates::assets() {
    fs::write(assets_dir.join(filename), content)
      .wrap_err_with(|| format!("Failed to write {filename} to assets directory"))?;
  }
  Ok(())
}

/// Copy images that imported markdown referenced from outside the book into
/// the import image directory. Copies run in parallel; a missing source is
/// logged and skipped.
///
/// Images land under their file name. When several sources share a name, the
/// first in path order is copied and the rest are reported.
///
/// # Errors
///
/// Returns an error if the destination directory cannot be created or a
/// copy fails for a reason other than a missing source.
pub fn copy_external_images(
  images: &BTreeSet<PathBuf>,
  output_dir: &Path,
) -> Result<()> {
  if images.is_empty() {
    return Ok(());
  }

  let target_dir = output_dir.join(IMPORT_IMAGES_DIR);
  fs::create_dir_all(&target_dir).wrap_err_with(|| {
    format!("Failed to create image directory {}", target_dir.display())
  })?;

  let mut by_name: BTreeMap<&OsStr, &Path> = BTreeMap::new();
  for source in images {
    let Some(file_name) = source.file_name() else {
      warn!("Skipping image without a file name: {}", source.display());
      continue;
    };
    if let Some(kept) = by_name.get(file_name) {
      warn!(
        "Imported images {} and {} share a file name; keeping the first",
        kept.display(),
        source.display()
      );
      continue;
    }
    by_name.insert(file_name, source);
  }

  by_name.into_par_iter().try_for_each(|(file_name, source)| -> Result<()> {
    if !source.is_file() {
      warn!("Imported image not found: {}", source.display());
      return Ok(());
    }
    let target = target_dir.join(file_name);
    debug!("Copying {} to {}", source.display(), target.display());
    fs::copy(source, &target).wrap_err_with(|| {
      format!("Failed to copy {} to {}", source.display(), target.display())
    })?;
    Ok(())
  })
}
