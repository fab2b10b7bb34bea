//! Package plan loading.
//!
//! The plan comes from a JSON metadata file with string version components
//! (`major`, `minor`, `patch`, `build`, `changeindex`) and an ordered
//! `platforms` array of `{odm, platform}` objects. Plan order is the build
//! order.

mod types;

use std::path::{Path, PathBuf};

use thiserror::Error;
use tracing::debug;

use crate::identity::BuildIdentity;

pub use types::{PackagePlan, TargetSpec, Version};
use types::PackageMetadata;

/// Errors raised while loading package metadata.
#[derive(Debug, Error)]
pub enum PlanError {
  #[error("package metadata not found: {}", path.display())]
  NotFound { path: PathBuf },

  #[error("failed to read package metadata {}: {source}", path.display())]
  Read { path: PathBuf, source: std::io::Error },

  #[error("malformed package metadata {}: {source}", path.display())]
  Parse { path: PathBuf, source: serde_json::Error },

  #[error("package metadata field '{field}' is empty")]
  EmptyField { field: String },
}

/// Load the package plan from a metadata file.
pub fn load(path: &Path, identity: &BuildIdentity) -> Result<PackagePlan, PlanError> {
  if !path.exists() {
    return Err(PlanError::NotFound { path: path.to_path_buf() });
  }

  let content = std::fs::read_to_string(path).map_err(|source| PlanError::Read {
    path: path.to_path_buf(),
    source,
  })?;

  let plan = parse(&content, identity).map_err(|e| match e {
    PlanError::Parse { source, .. } => PlanError::Parse {
      path: path.to_path_buf(),
      source,
    },
    other => other,
  })?;

  debug!(
    path = %path.display(),
    targets = plan.targets.len(),
    version = %plan.qualified_version(),
    "loaded package plan"
  );

  Ok(plan)
}

/// Parse metadata text into a plan.
pub fn parse(content: &str, identity: &BuildIdentity) -> Result<PackagePlan, PlanError> {
  let metadata: PackageMetadata = serde_json::from_str(content).map_err(|source| PlanError::Parse {
    path: PathBuf::new(),
    source,
  })?;

  for (field, value) in metadata.version.fields() {
    if value.trim().is_empty() {
      return Err(PlanError::EmptyField { field: field.to_string() });
    }
  }
  for target in &metadata.platforms {
    for (field, value) in [("platforms[].odm", &target.odm), ("platforms[].platform", &target.platform)] {
      if value.trim().is_empty() {
        return Err(PlanError::EmptyField { field: field.to_string() });
      }
    }
  }

  Ok(PackagePlan::new(metadata.platforms, metadata.version, identity))
}
