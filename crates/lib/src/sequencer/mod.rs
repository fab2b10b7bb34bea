//! Target build sequencing.
//!
//! Targets are built strictly in plan order against a single shared
//! workspace. The first selected target instantiates the build
//! configuration and runs the full dependency chain; the configuration is
//! then narrowed to packaging inputs, and every later target only swaps the
//! previous target's values for its own and runs the incremental build.
//! Because each retarget depends on the values the previous target left in
//! the live descriptor, targets can never be reordered or run concurrently.
//!
//! Per target, after configuration:
//!
//! 1. package clean, package build
//! 2. customization hook, if one is registered for the target
//! 3. binary packaging
//! 4. emit (rename, plus image build for the image target)

mod state;

use std::path::{Path, PathBuf};
use std::time::{Duration, Instant};

use serde::Serialize;
use tracing::{error, info, warn};

use crate::Result;
use crate::config::BuildConfig;
use crate::emit::{Artifact, Emitter};
use crate::exec::{CommandSpec, Executor, execute, execute_all};
use crate::hook::CustomizationRegistry;
use crate::plan::{PackagePlan, TargetSpec};
use crate::template::Templater;
use crate::workspace::{self, BuildWorkspace, build_dir_name, materialize};

pub use state::{BuildPhase, SequencerState};

/// What happened for one target.
#[derive(Debug, Clone, PartialEq, Eq, Serialize)]
pub struct TargetReport {
  pub odm: String,
  pub platform: String,
  pub phase: BuildPhase,
  pub customization: Option<String>,
  pub artifact: Artifact,
}

/// Summary of a completed run.
#[derive(Debug, Clone, PartialEq, Eq, Serialize)]
pub struct RunReport {
  pub version: String,
  pub workspace: PathBuf,
  pub workspace_removed: bool,
  pub targets: Vec<TargetReport>,
  #[serde(with = "duration_secs")]
  pub elapsed: Duration,
}

/// Planned handling of one target, computed without running anything.
#[derive(Debug, Clone, PartialEq, Eq, Serialize)]
pub struct ScheduledTarget {
  pub odm: String,
  pub platform: String,
  pub phase: BuildPhase,
  pub artifact: String,
  pub customization: Option<String>,
  pub image: bool,
}

/// Drives a packaging run for one plan.
pub struct Sequencer<'a> {
  plan: &'a PackagePlan,
  config: &'a BuildConfig,
  registry: &'a CustomizationRegistry,
  project_root: PathBuf,
}

impl<'a> Sequencer<'a> {
  pub fn new(
    plan: &'a PackagePlan,
    config: &'a BuildConfig,
    registry: &'a CustomizationRegistry,
    project_root: impl Into<PathBuf>,
  ) -> Self {
    Self {
      plan,
      config,
      registry,
      project_root: project_root.into(),
    }
  }

  /// Name of the versioned workspace directory.
  pub fn build_dir_name(&self) -> String {
    build_dir_name(&self.config.product, &self.plan.qualified_version())
  }

  /// Selected targets with the path each would take, in build order.
  pub fn schedule(&self, filter: &str) -> Vec<ScheduledTarget> {
    let naming = self.config.naming();
    let qualified = self.plan.qualified_version();
    let mut state = SequencerState::new();

    self
      .plan
      .selected(filter)
      .map(|target| {
        let phase = state.next_phase();
        state.record(target);
        ScheduledTarget {
          odm: target.odm.clone(),
          platform: target.platform.clone(),
          phase,
          artifact: naming.artifact_name(&target.odm, &qualified),
          customization: self.registry.get(&target.odm).map(|h| h.name().to_string()),
          image: target.odm == self.config.image_target,
        }
      })
      .collect()
  }

  /// Build, package and emit every selected target.
  ///
  /// An empty `filter` selects all targets. The workspace is removed at the
  /// end of a successful run unless the config keeps it; after a failure it
  /// is left as-is for inspection and cleared by the next run.
  pub async fn run<E: Executor>(&self, executor: &mut E, filter: &str) -> Result<RunReport> {
    let started = Instant::now();
    let name = self.build_dir_name();
    let workspace_dir = self.project_root.join(&name);

    self.clean(executor, &workspace_dir).await?;

    let selected: Vec<&TargetSpec> = self.plan.selected(filter).collect();
    let mut targets = Vec::with_capacity(selected.len());

    if selected.is_empty() {
      warn!(filter = %filter, "no targets selected");
    } else {
      let mut ws = materialize(&self.config.layout(&self.project_root), &name)?;
      let emitter = Emitter {
        naming: self.config.naming(),
        image: self.config.image_settings(),
        output_dir: self.project_root.clone(),
      };
      let mut state = SequencerState::new();

      for target in selected {
        match self.build_target(executor, &mut ws, &mut state, &emitter, target).await {
          Ok(report) => targets.push(report),
          Err(e) => {
            error!(
              odm = %target.odm,
              workspace = %ws.dir().display(),
              "target failed, workspace left in place"
            );
            return Err(e);
          }
        }
      }
    }

    let workspace_removed = if self.config.keep_workspace {
      info!(path = %workspace_dir.display(), "keeping build workspace");
      false
    } else {
      self.clean(executor, &workspace_dir).await?;
      true
    };

    let elapsed = started.elapsed();
    info!(
      targets = targets.len(),
      elapsed = ?elapsed,
      "packaging run complete"
    );

    Ok(RunReport {
      version: self.plan.qualified_version(),
      workspace: workspace_dir,
      workspace_removed,
      targets,
      elapsed,
    })
  }

  /// Remove the workspace and clean the project tree.
  async fn clean<E: Executor>(&self, executor: &mut E, workspace_dir: &Path) -> Result<()> {
    workspace::remove_dir(workspace_dir)?;
    execute(
      executor,
      &CommandSpec::new(&self.config.commands.clean_all, &self.project_root),
    )
    .await?;
    Ok(())
  }

  async fn build_target<E: Executor>(
    &self,
    executor: &mut E,
    ws: &mut BuildWorkspace,
    state: &mut SequencerState,
    emitter: &Emitter,
    target: &TargetSpec,
  ) -> Result<TargetReport> {
    let commands = &self.config.commands;
    let templater = Templater::new(&self.config.tokens);
    let ws_dir = ws.dir().to_path_buf();
    let in_ws = |cmd: &str| CommandSpec::new(cmd, &ws_dir);
    let phase = state.next_phase();

    info!(odm = %target.odm, platform = %target.platform, phase = %phase, "building package");

    match state.previous() {
      None => {
        templater.instantiate(ws, target, &self.plan.numeric_version())?;
        execute(executor, &in_ws(&commands.full_build)).await?;
        let post: Vec<CommandSpec> = commands
          .post_full_build
          .iter()
          .map(|cmd| CommandSpec::new(cmd, &self.project_root))
          .collect();
        execute_all(executor, &post).await?;
        templater.restrict_to_packaging(ws)?;
      }
      Some(previous) => {
        let previous = previous.clone();
        templater.retarget(ws, &previous, target)?;
        execute(executor, &in_ws(&commands.incremental_build)).await?;
      }
    }
    state.record(target);

    execute_all(
      executor,
      &[in_ws(&commands.package_clean), in_ws(&commands.package_build)],
    )
    .await?;

    let customization = match self.registry.get(&target.odm) {
      Some(handler) => {
        info!(odm = %target.odm, handler = %handler.name(), "applying build-time customization");
        handler.perform_build_time_customization(&ws_dir)?;
        Some(handler.name().to_string())
      }
      None => None,
    };

    execute(executor, &in_ws(&commands.package_binary)).await?;

    let artifact = emitter
      .emit(
        executor,
        &target.odm,
        &self.plan.numeric_version(),
        &self.plan.qualified_version(),
      )
      .await?;

    Ok(TargetReport {
      odm: target.odm.clone(),
      platform: target.platform.clone(),
      phase,
      customization,
      artifact,
    })
  }
}

mod duration_secs {
  use std::time::Duration;

  use serde::Serializer;

  pub fn serialize<S: Serializer>(duration: &Duration, serializer: S) -> Result<S::Ok, S::Error> {
    serializer.serialize_f64(duration.as_secs_f64())
  }
}
