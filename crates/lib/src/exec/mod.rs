//! External command execution.
//!
//! Commands run one at a time and are awaited to completion before the
//! caller continues. Each command carries its own [`FailurePolicy`], so the
//! decision to abort on a non-zero exit is made in one place ([`execute`])
//! instead of depending on which helper ran the command.

mod shell;

use std::path::{Path, PathBuf};

use serde::{Deserialize, Serialize};
use thiserror::Error;
use tracing::{debug, info, warn};

pub use shell::ShellExecutor;

/// Errors raised by command execution.
#[derive(Debug, Error)]
pub enum ExecError {
  #[error("failed to start command '{cmd}': {source}")]
  Spawn { cmd: String, source: std::io::Error },

  #[error("command failed with exit code {code:?}: {cmd}")]
  CmdFailed {
    cmd: String,
    code: Option<i32>,
    stderr: String,
  },
}

/// What to do when a command exits non-zero.
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "kebab-case")]
pub enum FailurePolicy {
  /// Abort the run.
  #[default]
  FailFast,
  /// Log the failure and carry on.
  LogAndContinue,
}

/// A single shell command, where to run it, and how to treat failure.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct CommandSpec {
  pub cmd: String,
  pub cwd: PathBuf,
  pub policy: FailurePolicy,
}

impl CommandSpec {
  pub fn new(cmd: impl Into<String>, cwd: impl Into<PathBuf>) -> Self {
    Self {
      cmd: cmd.into(),
      cwd: cwd.into(),
      policy: FailurePolicy::FailFast,
    }
  }

  pub fn with_policy(mut self, policy: FailurePolicy) -> Self {
    self.policy = policy;
    self
  }
}

/// Captured result of a finished command.
#[derive(Debug, Clone, PartialEq, Eq, Serialize)]
pub struct CommandOutput {
  pub cmd: String,
  pub code: Option<i32>,
  pub stdout: String,
  pub stderr: String,
}

impl CommandOutput {
  pub fn success(&self) -> bool {
    self.code == Some(0)
  }
}

/// Runs a command to completion and reports what happened.
///
/// Implementations only spawn and capture; they must not interpret the exit
/// code. Policy is applied by [`execute`].
#[allow(async_fn_in_trait)]
pub trait Executor {
  async fn spawn(&mut self, cmd: &str, cwd: &Path) -> Result<CommandOutput, ExecError>;
}

/// Run one command and apply its failure policy.
pub async fn execute<E: Executor>(executor: &mut E, spec: &CommandSpec) -> Result<CommandOutput, ExecError> {
  info!(cmd = %spec.cmd, cwd = %spec.cwd.display(), "executing command");

  let output = executor.spawn(&spec.cmd, &spec.cwd).await?;

  if output.success() {
    if !output.stdout.is_empty() {
      debug!(stdout = %output.stdout.trim_end(), "command stdout");
    }
    if !output.stderr.is_empty() {
      debug!(stderr = %output.stderr.trim_end(), "command stderr");
    }
    return Ok(output);
  }

  if !output.stdout.is_empty() {
    warn!(stdout = %output.stdout.trim_end(), "command stdout");
  }
  if !output.stderr.is_empty() {
    warn!(stderr = %output.stderr.trim_end(), "command stderr");
  }

  match spec.policy {
    FailurePolicy::FailFast => Err(ExecError::CmdFailed {
      cmd: spec.cmd.clone(),
      code: output.code,
      stderr: output.stderr,
    }),
    FailurePolicy::LogAndContinue => {
      warn!(cmd = %spec.cmd, code = ?output.code, "command failed, continuing");
      Ok(output)
    }
  }
}

/// Run commands in order, stopping at the first fatal failure.
pub async fn execute_all<E: Executor>(
  executor: &mut E,
  specs: &[CommandSpec],
) -> Result<Vec<CommandOutput>, ExecError> {
  let mut outputs = Vec::with_capacity(specs.len());
  for spec in specs {
    outputs.push(execute(executor, spec).await?);
  }
  Ok(outputs)
}
