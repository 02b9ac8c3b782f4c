//! Path helpers shared by the stores and the remote collaborator

use std::path::{Component, Path};

/// Check if a repository reference is a local filesystem path (not a remote)
///
/// Returns true for:
/// - Absolute paths on Unix: /path/to/repo
/// - Absolute paths on Windows: C:\path\to\repo or C:/path/to/repo
/// - Relative paths: ./path or ../path
/// - UNC paths on Windows: \\server\share
///
/// Returns false for:
/// - SSH URLs: git@github.com:user/repo.git
/// - HTTPS URLs: <https://github.com/user/repo.git>
/// - GitHub shorthand: owner/name
pub fn is_local_path(path: &str) -> bool {
  let p = Path::new(path);

  if path.starts_with("./") || path.starts_with("../") {
    return true;
  }

  // Windows drive letter (C:\ or C:/); must be checked before the URL check
  if path.len() >= 3 {
    let bytes = path.as_bytes();
    if bytes[0].is_ascii_alphabetic() && bytes[1] == b':' && (bytes[2] == b'\\' || bytes[2] == b'/') {
      return true;
    }
  }

  if path.starts_with("\\\\") {
    return true;
  }

  // Unix absolute path; Path::is_absolute() is false for these on Windows
  if path.starts_with('/') && !path.contains("://") && !path.contains('@') {
    return true;
  }

  p.is_absolute()
}

/// Convert a path to the form used as an artifact key (always forward slashes)
pub fn path_to_key(path: &Path) -> String {
  let parts: Vec<String> = path
    .components()
    .filter_map(|c| match c {
      Component::Normal(part) => Some(part.to_string_lossy().to_string()),
      _ => None,
    })
    .collect();

  if parts.is_empty() {
    ".".to_string()
  } else {
    parts.join("/")
  }
}

/// Normalize a user-supplied artifact path into its key
///
/// Keys are relative to the repository root, use `/`, and never escape the
/// root. `./a/b/` and `a//b` both become `a/b`; the root itself is `.`.
pub fn normalize_artifact_path(input: &str) -> Result<String, String> {
  let unified = input.replace('\\', "/");
  let path = Path::new(&unified);

  let bytes = unified.as_bytes();
  let has_drive = bytes.len() >= 2 && bytes[0].is_ascii_alphabetic() && bytes[1] == b':';
  if unified.starts_with('/') || has_drive || path.is_absolute() {
    return Err("must be relative to the repository root".to_string());
  }
  if path.components().any(|c| matches!(c, Component::ParentDir)) {
    return Err("must not contain '..'".to_string());
  }

  Ok(path_to_key(path))
}
