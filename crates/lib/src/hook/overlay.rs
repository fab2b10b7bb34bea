//! Overlay customization: copy a target's file tree over the workspace.

use std::path::{Path, PathBuf};

use tracing::info;

use super::{Customization, HookError};
use crate::util::fs::copy_tree;

#[derive(Debug, Clone)]
pub struct OverlayCustomization {
  name: String,
  source: PathBuf,
}

impl OverlayCustomization {
  pub fn new(name: impl Into<String>, source: impl Into<PathBuf>) -> Self {
    Self {
      name: name.into(),
      source: source.into(),
    }
  }
}

impl Customization for OverlayCustomization {
  fn name(&self) -> &str {
    &self.name
  }

  fn perform_build_time_customization(&self, workspace: &Path) -> Result<(), HookError> {
    if !self.source.is_dir() {
      return Err(HookError::Failed {
        handler: self.name.clone(),
        message: format!("overlay directory not found: {}", self.source.display()),
      });
    }

    let files = copy_tree(&self.source, workspace).map_err(|source| HookError::Copy {
      handler: self.name.clone(),
      source,
    })?;
    info!(
      handler = %self.name,
      overlay = %self.source.display(),
      files,
      "applied overlay"
    );
    Ok(())
  }
}
