//! Directory tree copying.

use std::fs;
use std::path::{Path, PathBuf};

use thiserror::Error;
use walkdir::WalkDir;

#[derive(Debug, Error)]
pub enum CopyError {
  #[error("failed to walk {}: {source}", path.display())]
  Walk { path: PathBuf, source: walkdir::Error },

  #[error("failed to copy {}: {source}", path.display())]
  Io { path: PathBuf, source: std::io::Error },
}

/// Recursively copy `src` into `dest`, overwriting files that already exist.
///
/// Directories are created as needed; symlinks are recreated rather than
/// followed. Returns the number of files copied.
pub fn copy_tree(src: &Path, dest: &Path) -> Result<usize, CopyError> {
  let mut copied = 0;

  for entry in WalkDir::new(src).sort_by_file_name() {
    let entry = entry.map_err(|source| CopyError::Walk {
      path: src.to_path_buf(),
      source,
    })?;
    let rel_path = entry.path().strip_prefix(src).unwrap_or(entry.path());
    let target = dest.join(rel_path);
    let io_err = |source| CopyError::Io {
      path: entry.path().to_path_buf(),
      source,
    };

    let file_type = entry.file_type();
    if file_type.is_dir() {
      fs::create_dir_all(&target).map_err(io_err)?;
    } else if file_type.is_symlink() {
      let link = fs::read_link(entry.path()).map_err(io_err)?;
      if target.symlink_metadata().is_ok() {
        fs::remove_file(&target).map_err(io_err)?;
      }
      symlink(&link, &target).map_err(io_err)?;
    } else if file_type.is_file() {
      fs::copy(entry.path(), &target).map_err(io_err)?;
      copied += 1;
    }
  }

  Ok(copied)
}

#[cfg(unix)]
fn symlink(original: &Path, link: &Path) -> std::io::Result<()> {
  std::os::unix::fs::symlink(original, link)
}

#[cfg(windows)]
fn symlink(original: &Path, link: &Path) -> std::io::Result<()> {
  std::os::windows::fs::symlink_file(original, link)
}
