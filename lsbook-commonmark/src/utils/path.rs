//! Lexical path arithmetic. Nothing here touches the filesystem, so paths
//! that do not exist yet (output pages, summary references) work too.
use std::path::{Component, Path, PathBuf};

/// Drop `.` components and fold `..` into the preceding normal component.
#[must_use]
pub fn normalize(path: &Path) -> PathBuf {
  let mut out = PathBuf::new();
  for component in path.components() {
    match component {
      Component::CurDir => {},
      Component::ParentDir => {
        match out.components().next_back() {
          Some(Component::Normal(_)) => {
            out.pop();
          },
          // `..` at the root stays at the root
          Some(Component::RootDir | Component::Prefix(_)) => {},
          _ => out.push(".."),
        }
      },
      other => out.push(other.as_os_str()),
    }
  }
  out
}

/// Path of `target` as seen from the directory `base`.
///
/// Both sides are normalized first. Identical paths yield an empty path.
#[must_use]
pub fn relative_to(target: &Path, base: &Path) -> PathBuf {
  let target = normalize(target);
  let base = normalize(base);
  let target: Vec<_> = target.components().collect();
  let base: Vec<_> = base.components().collect();

  let common = target
    .iter()
    .zip(&base)
    .take_while(|(t, b)| t == b)
    .count();

  let mut out = PathBuf::new();
  for _ in common..base.len() {
    out.push("..");
  }
  for component in &target[common..] {
    out.push(component.as_os_str());
  }
  out
}

/// Render a path with `/` separators for use in URLs. An empty path becomes
/// `"."`.
#[must_use]
pub fn to_url_path(path: &Path) -> String {
  let parts: Vec<_> = path
    .components()
    .map(|c| c.as_os_str().to_string_lossy().into_owned())
    .collect();
  if parts.is_empty() {
    ".".to_owned()
  } else {
    parts.join("/")
  }
}
