//! Artifact collection.
//!
//! The packaging toolchain writes a generically named package
//! (`<product>_<numeric version>*_<arch>.<ext>`) next to the workspace. The
//! emitter renames it to the target-qualified
//! `<product>_<target>-<qualified version>_<arch>.<ext>` and, for the
//! reserved image target, hands the package to the image builder.

use std::fs;
use std::path::{Path, PathBuf};

use serde::{Deserialize, Serialize};
use thiserror::Error;
use tracing::{info, warn};

use crate::exec::{CommandSpec, ExecError, Executor, FailurePolicy, execute};

#[derive(Debug, Error)]
pub enum EmitError {
  #[error("no package matching {pattern} in {}", dir.display())]
  ArtifactNotFound { pattern: String, dir: PathBuf },

  #[error("several packages match {pattern}: {}", matches.join(", "))]
  Ambiguous { pattern: String, matches: Vec<String> },

  #[error("failed to collect package in {}: {source}", path.display())]
  Io { path: PathBuf, source: std::io::Error },

  #[error(transparent)]
  Image(#[from] ExecError),
}

/// Naming convention for packages.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct ArtifactNaming {
  pub product: String,
  pub arch: String,
  pub package_ext: String,
}

impl Default for ArtifactNaming {
  fn default() -> Self {
    Self {
      product: "flexswitch".to_string(),
      arch: "amd64".to_string(),
      package_ext: "deb".to_string(),
    }
  }
}

impl ArtifactNaming {
  /// Final, target-qualified file name.
  pub fn artifact_name(&self, target: &str, qualified_version: &str) -> String {
    format!(
      "{}_{}-{}_{}.{}",
      self.product, target, qualified_version, self.arch, self.package_ext
    )
  }

  fn raw_prefix(&self, numeric_version: &str) -> String {
    format!("{}_{}", self.product, numeric_version)
  }

  fn raw_suffix(&self) -> String {
    format!("_{}.{}", self.arch, self.package_ext)
  }

  /// Glob-style description of the toolchain's raw output name.
  pub fn raw_pattern(&self, numeric_version: &str) -> String {
    format!("{}*{}", self.raw_prefix(numeric_version), self.raw_suffix())
  }

  /// Locate the single raw package in `dir`.
  pub fn find_raw(&self, dir: &Path, numeric_version: &str) -> Result<PathBuf, EmitError> {
    let prefix = self.raw_prefix(numeric_version);
    let suffix = self.raw_suffix();
    let io_err = |source| EmitError::Io {
      path: dir.to_path_buf(),
      source,
    };

    let mut matches = Vec::new();
    for entry in fs::read_dir(dir).map_err(io_err)? {
      let entry = entry.map_err(io_err)?;
      let name = entry.file_name().to_string_lossy().into_owned();
      if name.len() >= prefix.len() + suffix.len()
        && name.starts_with(&prefix)
        && name.ends_with(&suffix)
        && entry.file_type().map_err(io_err)?.is_file()
      {
        matches.push(name);
      }
    }
    matches.sort();

    match matches.len() {
      0 => Err(EmitError::ArtifactNotFound {
        pattern: self.raw_pattern(numeric_version),
        dir: dir.to_path_buf(),
      }),
      1 => Ok(dir.join(matches.remove(0))),
      _ => Err(EmitError::Ambiguous {
        pattern: self.raw_pattern(numeric_version),
        matches,
      }),
    }
  }
}

/// Settings for the image builder run against one reserved target.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct ImageSettings {
  /// Target identifier that triggers an image build.
  pub target: String,
  /// Command line; the package file name is appended.
  pub command: String,
  pub on_failure: FailurePolicy,
}

/// Outcome of an image build.
#[derive(Debug, Clone, PartialEq, Eq, Serialize)]
pub struct ImageOutcome {
  pub code: Option<i32>,
  pub success: bool,
}

/// A renamed package and, when applicable, the image built from it.
#[derive(Debug, Clone, PartialEq, Eq, Serialize)]
pub struct Artifact {
  pub target: String,
  pub path: PathBuf,
  pub image: Option<ImageOutcome>,
}

/// Renames raw packages and triggers image builds.
#[derive(Debug, Clone)]
pub struct Emitter {
  pub naming: ArtifactNaming,
  pub image: ImageSettings,
  /// Directory the toolchain writes packages into; artifacts stay there.
  pub output_dir: PathBuf,
}

impl Emitter {
  pub async fn emit<E: Executor>(
    &self,
    executor: &mut E,
    target: &str,
    numeric_version: &str,
    qualified_version: &str,
  ) -> Result<Artifact, EmitError> {
    let raw = self.naming.find_raw(&self.output_dir, numeric_version)?;
    let name = self.naming.artifact_name(target, qualified_version);
    let path = self.output_dir.join(&name);

    fs::rename(&raw, &path).map_err(|source| EmitError::Io {
      path: raw.clone(),
      source,
    })?;
    info!(odm = %target, artifact = %path.display(), "emitted package");

    let image = if target == self.image.target {
      Some(self.build_image(executor, &name).await?)
    } else {
      None
    };

    Ok(Artifact {
      target: target.to_string(),
      path,
      image,
    })
  }

  async fn build_image<E: Executor>(&self, executor: &mut E, package: &str) -> Result<ImageOutcome, EmitError> {
    info!(package = %package, "building image with package");

    let spec = CommandSpec::new(format!("{} {}", self.image.command, package), &self.output_dir)
      .with_policy(self.image.on_failure);
    let output = execute(executor, &spec).await?;

    if output.success() {
      info!(code = ?output.code, "image build finished");
    } else {
      warn!(code = ?output.code, "image build failed");
    }

    Ok(ImageOutcome {
      code: output.code,
      success: output.success(),
    })
  }
}
