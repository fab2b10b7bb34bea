//! Versioned build workspace.
//!
//! A workspace is a fresh copy of the packaging template tree plus the
//! top-level build descriptor, placed next to the template under a
//! directory named after the product and qualified version. The sequencer
//! owns the one workspace of a run and mutates its descriptor in place
//! between targets, so the workspace also remembers which target values the
//! descriptor currently holds and where in the file they sit.

use std::fs;
use std::path::{Path, PathBuf};

use thiserror::Error;
use tracing::{debug, info};

use crate::plan::TargetSpec;
use crate::template::SlotMap;
use crate::util::fs::{CopyError, copy_tree};

#[derive(Debug, Error)]
pub enum WorkspaceError {
  #[error("packaging template directory not found: {}", path.display())]
  TemplateMissing { path: PathBuf },

  #[error("build descriptor not found: {}", path.display())]
  DescriptorMissing { path: PathBuf },

  #[error("failed to remove {}: {source}", path.display())]
  Remove { path: PathBuf, source: std::io::Error },

  #[error("failed to populate workspace: {0}")]
  Copy(#[from] CopyError),
}

/// Where the workspace inputs live, relative to the project root.
#[derive(Debug, Clone)]
pub struct WorkspaceLayout {
  pub project_root: PathBuf,
  /// Template tree copied wholesale into the workspace.
  pub template_dir: PathBuf,
  /// Build descriptor copied to the workspace root.
  pub descriptor: PathBuf,
  /// Changelog location inside the workspace.
  pub changelog: PathBuf,
}

/// `<product>-<qualified version>`
pub fn build_dir_name(product: &str, qualified_version: &str) -> String {
  format!("{product}-{qualified_version}")
}

/// An instantiated build directory.
#[derive(Debug)]
pub struct BuildWorkspace {
  dir: PathBuf,
  name: String,
  descriptor: PathBuf,
  changelog: PathBuf,
  instantiated: Option<Instantiated>,
}

/// Target values written into the descriptor, and the slots holding them.
#[derive(Debug, Clone)]
pub(crate) struct Instantiated {
  pub target: TargetSpec,
  pub slots: SlotMap,
}

impl BuildWorkspace {
  pub fn dir(&self) -> &Path {
    &self.dir
  }

  /// Directory name, as substituted for the build-directory token.
  pub fn name(&self) -> &str {
    &self.name
  }

  /// The descriptor copy inside the workspace.
  pub fn descriptor(&self) -> &Path {
    &self.descriptor
  }

  pub fn changelog(&self) -> &Path {
    &self.changelog
  }

  /// Target values the descriptor currently holds, once instantiated.
  pub fn current_target(&self) -> Option<&TargetSpec> {
    self.instantiated.as_ref().map(|i| &i.target)
  }

  pub(crate) fn instantiated(&self) -> Option<&Instantiated> {
    self.instantiated.as_ref()
  }

  pub(crate) fn set_instantiated(&mut self, target: TargetSpec, slots: SlotMap) {
    self.instantiated = Some(Instantiated { target, slots });
  }
}

/// Remove `dir` if it exists. Returns whether anything was removed.
pub fn remove_dir(dir: &Path) -> Result<bool, WorkspaceError> {
  if !dir.exists() {
    return Ok(false);
  }
  fs::remove_dir_all(dir).map_err(|source| WorkspaceError::Remove {
    path: dir.to_path_buf(),
    source,
  })?;
  debug!(path = %dir.display(), "removed directory");
  Ok(true)
}

/// Create the workspace `name` under the project root from the template.
///
/// Any directory already at that path is removed first, so stale state from
/// an aborted run never leaks into a new one.
pub fn materialize(layout: &WorkspaceLayout, name: &str) -> Result<BuildWorkspace, WorkspaceError> {
  let template = layout.project_root.join(&layout.template_dir);
  let descriptor_src = layout.project_root.join(&layout.descriptor);
  let dir = layout.project_root.join(name);

  if !template.is_dir() {
    return Err(WorkspaceError::TemplateMissing { path: template });
  }
  if !descriptor_src.is_file() {
    return Err(WorkspaceError::DescriptorMissing { path: descriptor_src });
  }

  if remove_dir(&dir)? {
    info!(path = %dir.display(), "removed stale build workspace");
  }

  let files = copy_tree(&template, &dir)?;

  let descriptor_name = layout.descriptor.file_name().unwrap_or(layout.descriptor.as_os_str());
  let descriptor = dir.join(descriptor_name);
  fs::copy(&descriptor_src, &descriptor).map_err(|source| CopyError::Io {
    path: descriptor_src.clone(),
    source,
  })?;

  info!(path = %dir.display(), files = files + 1, "materialized build workspace");

  Ok(BuildWorkspace {
    changelog: dir.join(&layout.changelog),
    dir,
    name: name.to_string(),
    descriptor,
    instantiated: None,
  })
}
