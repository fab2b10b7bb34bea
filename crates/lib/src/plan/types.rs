use std::fmt;

use serde::{Deserialize, Deserializer, Serialize};

use crate::identity::BuildIdentity;

/// One hardware target to build a package variant for.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct TargetSpec {
  /// Target identifier, also used in the artifact name.
  pub odm: String,
  /// Device family variant passed alongside the target.
  pub platform: String,
}

impl TargetSpec {
  pub fn new(odm: impl Into<String>, platform: impl Into<String>) -> Self {
    Self {
      odm: odm.into(),
      platform: platform.into(),
    }
  }
}

impl fmt::Display for TargetSpec {
  fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
    write!(f, "{}/{}", self.odm, self.platform)
  }
}

/// Version components exactly as they appear in the metadata.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct Version {
  #[serde(deserialize_with = "version_field")]
  pub major: String,
  #[serde(deserialize_with = "version_field")]
  pub minor: String,
  #[serde(deserialize_with = "version_field")]
  pub patch: String,
  #[serde(deserialize_with = "version_field")]
  pub build: String,
  #[serde(rename = "changeindex", deserialize_with = "version_field")]
  pub change_index: String,
}

impl Version {
  /// `major.minor.patch.build.changeindex`
  pub fn numeric(&self) -> String {
    format!(
      "{}.{}.{}.{}.{}",
      self.major, self.minor, self.patch, self.build, self.change_index
    )
  }

  pub(crate) fn fields(&self) -> [(&'static str, &str); 5] {
    [
      ("major", &self.major),
      ("minor", &self.minor),
      ("patch", &self.patch),
      ("build", &self.build),
      ("changeindex", &self.change_index),
    ]
  }
}

/// Metadata file layout: version components flattened next to the target list.
#[derive(Debug, Clone, Deserialize)]
pub(crate) struct PackageMetadata {
  #[serde(flatten)]
  pub version: Version,
  pub platforms: Vec<TargetSpec>,
}

/// The loaded, immutable description of one packaging run.
#[derive(Debug, Clone, PartialEq, Eq, Serialize)]
pub struct PackagePlan {
  pub targets: Vec<TargetSpec>,
  pub version: Version,
  pub identity: String,
}

impl PackagePlan {
  pub fn new(targets: Vec<TargetSpec>, version: Version, identity: &BuildIdentity) -> Self {
    Self {
      targets,
      version,
      identity: identity.as_str().to_string(),
    }
  }

  /// Version without identity prefix, matching the toolchain's own output naming.
  pub fn numeric_version(&self) -> String {
    self.version.numeric()
  }

  /// `<identity>_<numeric>`
  pub fn qualified_version(&self) -> String {
    format!("{}_{}", self.identity, self.numeric_version())
  }

  /// Targets that pass the platform filter, in plan order. An empty filter keeps all.
  pub fn selected<'a>(&'a self, filter: &'a str) -> impl Iterator<Item = &'a TargetSpec> + 'a {
    self
      .targets
      .iter()
      .filter(move |t| filter.is_empty() || t.odm == filter)
  }
}

#[derive(Deserialize)]
#[serde(untagged)]
enum RawField {
  Text(String),
  Number(u64),
}

fn version_field<'de, D>(deserializer: D) -> Result<String, D::Error>
where
  D: Deserializer<'de>,
{
  Ok(match RawField::deserialize(deserializer)? {
    RawField::Text(s) => s,
    RawField::Number(n) => n.to_string(),
  })
}
