mod build;
mod schedule;

use std::path::PathBuf;

use anyhow::{Context, Result};

use pkgforge_lib::config::BuildConfig;
use pkgforge_lib::consts::{CONFIG_FILENAME, METADATA_FILENAME};
use pkgforge_lib::identity::BuildIdentity;
use pkgforge_lib::plan::{self, PackagePlan};

use crate::output::OutputFormat;

pub use build::cmd_build;
pub use schedule::cmd_schedule;

/// Arguments shared by the build and dry-run paths.
#[derive(Debug, Clone)]
pub struct BuildArgs {
  pub release: bool,
  pub platform: String,
  pub project: PathBuf,
  pub metadata: Option<PathBuf>,
  pub config: Option<PathBuf>,
  pub keep_workspace: bool,
  pub output: OutputFormat,
}

/// Everything a run needs, resolved from the command line.
struct Resolved {
  root: PathBuf,
  plan: PackagePlan,
  config: BuildConfig,
}

impl BuildArgs {
  fn resolve(&self) -> Result<Resolved> {
    let root = dunce::canonicalize(&self.project)
      .with_context(|| format!("project directory not found: {}", self.project.display()))?;

    let mut config = match &self.config {
      Some(path) => BuildConfig::load(path)?,
      None => BuildConfig::load_or_default(&root.join(CONFIG_FILENAME))?,
    };
    if self.keep_workspace {
      config.keep_workspace = true;
    }

    let identity = BuildIdentity::detect(self.release);
    let metadata = self.metadata.clone().unwrap_or_else(|| root.join(METADATA_FILENAME));
    let plan = plan::load(&metadata, &identity)?;

    Ok(Resolved { root, plan, config })
  }
}
