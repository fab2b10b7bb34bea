//! Test utilities for pkgforge-lib.
//!
//! [`RecordingExecutor`] stands in for the real toolchain: it records every
//! command, returns configured exit codes, and can run side effects (such as
//! dropping a fake package file) when a command matches.

use std::path::{Path, PathBuf};

use crate::exec::{CommandOutput, ExecError, Executor};

type Effect = Box<dyn FnMut(&Path)>;

#[derive(Default)]
pub struct RecordingExecutor {
  calls: Vec<(String, PathBuf)>,
  failures: Vec<(String, i32)>,
  stdout: Vec<(String, String)>,
  effects: Vec<(String, Effect)>,
}

impl RecordingExecutor {
  pub fn new() -> Self {
    Self::default()
  }

  /// Commands starting with `prefix` exit with `code`.
  pub fn fail_on(mut self, prefix: &str, code: i32) -> Self {
    self.failures.push((prefix.to_string(), code));
    self
  }

  /// Commands starting with `prefix` print `text` on stdout.
  pub fn with_stdout(mut self, prefix: &str, text: &str) -> Self {
    self.stdout.push((prefix.to_string(), text.to_string()));
    self
  }

  /// Run `effect` with the working directory whenever a command starts with `prefix`.
  pub fn on(mut self, prefix: &str, effect: impl FnMut(&Path) + 'static) -> Self {
    self.effects.push((prefix.to_string(), Box::new(effect)));
    self
  }

  /// Every command run so far, in order.
  pub fn commands(&self) -> Vec<&str> {
    self.calls.iter().map(|(cmd, _)| cmd.as_str()).collect()
  }

  /// Every (command, working directory) pair run so far.
  pub fn calls(&self) -> &[(String, PathBuf)] {
    &self.calls
  }

  /// How many commands equal `cmd` exactly.
  pub fn count(&self, cmd: &str) -> usize {
    self.calls.iter().filter(|(c, _)| c == cmd).count()
  }
}

impl Executor for RecordingExecutor {
  async fn spawn(&mut self, cmd: &str, cwd: &Path) -> Result<CommandOutput, ExecError> {
    self.calls.push((cmd.to_string(), cwd.to_path_buf()));

    for (prefix, effect) in &mut self.effects {
      if cmd.starts_with(prefix.as_str()) {
        effect(cwd);
      }
    }

    let code = self
      .failures
      .iter()
      .find(|(prefix, _)| cmd.starts_with(prefix.as_str()))
      .map(|(_, code)| *code)
      .unwrap_or(0);

    Ok(CommandOutput {
      cmd: cmd.to_string(),
      code: Some(code),
      stdout: self
        .stdout
        .iter()
        .find(|(prefix, _)| cmd.starts_with(prefix.as_str()))
        .map(|(_, text)| text.clone())
        .unwrap_or_default(),
      stderr: if code == 0 { String::new() } else { format!("{cmd}: failed") },
    })
  }
}
