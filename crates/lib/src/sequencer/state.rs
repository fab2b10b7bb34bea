use std::fmt;

use serde::Serialize;

use crate::plan::TargetSpec;

/// Which build path a target takes.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize)]
#[serde(rename_all = "kebab-case")]
pub enum BuildPhase {
  /// Full dependency chain; the first selected target only.
  Full,
  /// Target-specific rebuild against the already-built tree.
  Incremental,
}

impl fmt::Display for BuildPhase {
  fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
    match self {
      BuildPhase::Full => f.write_str("full"),
      BuildPhase::Incremental => f.write_str("incremental"),
    }
  }
}

/// Progress through the target list.
///
/// `previous` is unset until the first target is recorded, so "has built
/// once" and "knows the previous target" can never disagree.
#[derive(Debug, Clone, Default, PartialEq, Eq)]
pub struct SequencerState {
  previous: Option<TargetSpec>,
}

impl SequencerState {
  pub fn new() -> Self {
    Self::default()
  }

  pub fn has_built_once(&self) -> bool {
    self.previous.is_some()
  }

  /// Target whose values the build configuration currently holds.
  pub fn previous(&self) -> Option<&TargetSpec> {
    self.previous.as_ref()
  }

  /// Phase the next target will take.
  pub fn next_phase(&self) -> BuildPhase {
    if self.has_built_once() {
      BuildPhase::Incremental
    } else {
      BuildPhase::Full
    }
  }

  /// Mark `target` as the one just configured.
  pub fn record(&mut self, target: &TargetSpec) {
    self.previous = Some(target.clone());
  }
}
