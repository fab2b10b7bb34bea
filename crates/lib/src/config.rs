//! Build configuration.
//!
//! Every setting has a default matching the stock packaging layout, so a
//! project without a `pkgforge.toml` builds with the defaults. A config file
//! only needs the keys it changes:
//!
//! ```toml
//! product = "flexswitch"
//! image_failure = "fail-fast"
//!
//! [commands]
//! full_build = "make all"
//!
//! [customizations.ingrasys_s9100]
//! overlay = "overlays/ingrasys_s9100"
//! ```

use std::collections::BTreeMap;
use std::path::{Path, PathBuf};

use serde::{Deserialize, Serialize};
use thiserror::Error;
use tracing::debug;

use crate::emit::{ArtifactNaming, ImageSettings};
use crate::exec::FailurePolicy;
use crate::hook::{CustomizationRegistry, OverlayCustomization};
use crate::template::TemplateTokens;
use crate::workspace::WorkspaceLayout;

#[derive(Debug, Error)]
pub enum ConfigFileError {
  #[error("failed to read config {}: {source}", path.display())]
  Read { path: PathBuf, source: std::io::Error },

  #[error("invalid config {}: {source}", path.display())]
  Parse { path: PathBuf, source: toml::de::Error },
}

/// Toolchain command lines for each build phase.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(default, deny_unknown_fields)]
pub struct Commands {
  /// Project-wide clean, run before and after the run.
  pub clean_all: String,
  /// Full dependency chain, run once inside the workspace.
  pub full_build: String,
  /// Run in the project root right after the full build.
  pub post_full_build: Vec<String>,
  /// Target-specific rebuild for every later target.
  pub incremental_build: String,
  pub package_clean: String,
  pub package_build: String,
  pub package_binary: String,
  /// Image builder; the package file name is appended.
  pub image: String,
  /// Shell override for all commands.
  pub shell: Option<String>,
}

impl Default for Commands {
  fn default() -> Self {
    Self {
      clean_all: "make clean_all".to_string(),
      full_build: "make all".to_string(),
      post_full_build: vec!["python buildInfoGen.py".to_string()],
      incremental_build: "make asicd".to_string(),
      package_clean: "fakeroot debian/rules clean".to_string(),
      package_build: "fakeroot debian/rules build".to_string(),
      package_binary: "fakeroot debian/rules binary".to_string(),
      image: "python dockerGen/buildDocker.py".to_string(),
      shell: None,
    }
  }
}

/// Customization declared in the config file.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(deny_unknown_fields)]
pub struct CustomizationConfig {
  /// Directory, relative to the project root, copied over the workspace.
  pub overlay: PathBuf,
}

#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(default, deny_unknown_fields)]
pub struct BuildConfig {
  pub product: String,
  pub arch: String,
  pub package_ext: String,
  /// Target identifier that also gets a container image.
  pub image_target: String,
  pub image_failure: FailurePolicy,
  pub template_dir: PathBuf,
  pub descriptor: PathBuf,
  /// Relative to the workspace root.
  pub changelog: PathBuf,
  pub keep_workspace: bool,
  pub tokens: TemplateTokens,
  pub commands: Commands,
  pub customizations: BTreeMap<String, CustomizationConfig>,
}

impl Default for BuildConfig {
  fn default() -> Self {
    let naming = ArtifactNaming::default();
    Self {
      product: naming.product,
      arch: naming.arch,
      package_ext: naming.package_ext,
      image_target: "docker".to_string(),
      image_failure: FailurePolicy::LogAndContinue,
      template_dir: PathBuf::from("tmplPkgDir"),
      descriptor: PathBuf::from("Makefile"),
      changelog: PathBuf::from("debian/changelog"),
      keep_workspace: false,
      tokens: TemplateTokens::default(),
      commands: Commands::default(),
      customizations: BTreeMap::new(),
    }
  }
}

impl BuildConfig {
  /// Load from `path`, or defaults when the file does not exist.
  pub fn load_or_default(path: &Path) -> Result<Self, ConfigFileError> {
    if !path.exists() {
      debug!(path = %path.display(), "no config file, using defaults");
      return Ok(Self::default());
    }
    Self::load(path)
  }

  pub fn load(path: &Path) -> Result<Self, ConfigFileError> {
    let content = std::fs::read_to_string(path).map_err(|source| ConfigFileError::Read {
      path: path.to_path_buf(),
      source,
    })?;
    toml::from_str(&content).map_err(|source| ConfigFileError::Parse {
      path: path.to_path_buf(),
      source,
    })
  }

  pub fn naming(&self) -> ArtifactNaming {
    ArtifactNaming {
      product: self.product.clone(),
      arch: self.arch.clone(),
      package_ext: self.package_ext.clone(),
    }
  }

  pub fn image_settings(&self) -> ImageSettings {
    ImageSettings {
      target: self.image_target.clone(),
      command: self.commands.image.clone(),
      on_failure: self.image_failure,
    }
  }

  pub fn layout(&self, project_root: &Path) -> WorkspaceLayout {
    WorkspaceLayout {
      project_root: project_root.to_path_buf(),
      template_dir: self.template_dir.clone(),
      descriptor: self.descriptor.clone(),
      changelog: self.changelog.clone(),
    }
  }

  /// Overlay handlers for every configured customization.
  pub fn registry(&self, project_root: &Path) -> CustomizationRegistry {
    let mut registry = CustomizationRegistry::new();
    for (target, custom) in &self.customizations {
      let name = format!("overlay:{target}");
      registry.register(
        target.clone(),
        Box::new(OverlayCustomization::new(name, project_root.join(&custom.overlay))),
      );
    }
    registry
  }
}
