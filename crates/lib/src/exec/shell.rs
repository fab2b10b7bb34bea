//! Shell-backed executor.
//!
//! Toolchain steps are plain command lines (`make all`, `fakeroot debian/rules build`),
//! so they are handed to a shell with the caller's environment intact.

use std::path::Path;
use std::process::Stdio;

use tokio::process::Command;
use tracing::debug;

use super::{CommandOutput, ExecError, Executor};

/// Runs commands through `/bin/sh -c` (or a configured shell).
#[derive(Debug, Clone, Default)]
pub struct ShellExecutor {
  shell: Option<String>,
}

impl ShellExecutor {
  pub fn new(shell: Option<String>) -> Self {
    Self { shell }
  }
}

impl Executor for ShellExecutor {
  async fn spawn(&mut self, cmd: &str, cwd: &Path) -> Result<CommandOutput, ExecError> {
    let (shell_cmd, shell_args) = get_shell(self.shell.as_deref());

    debug!(shell = %shell_cmd, working_dir = ?cwd, "spawning process");

    let output = Command::new(&shell_cmd)
      .args(&shell_args)
      .arg(cmd)
      .current_dir(cwd)
      .stdin(Stdio::null())
      .output()
      .await
      .map_err(|source| ExecError::Spawn {
        cmd: cmd.to_string(),
        source,
      })?;

    Ok(CommandOutput {
      cmd: cmd.to_string(),
      code: output.status.code(),
      stdout: String::from_utf8_lossy(&output.stdout).into_owned(),
      stderr: String::from_utf8_lossy(&output.stderr).into_owned(),
    })
  }
}

/// Shell binary and the flag that precedes the command string.
fn get_shell(override_shell: Option<&str>) -> (String, Vec<String>) {
  if let Some(shell) = override_shell {
    let args = if shell.contains("powershell") || shell.contains("pwsh") {
      vec!["-NoProfile".to_string(), "-Command".to_string()]
    } else if shell.contains("cmd") {
      vec!["/C".to_string()]
    } else {
      vec!["-c".to_string()]
    };
    return (shell.to_string(), args);
  }

  #[cfg(unix)]
  {
    ("/bin/sh".to_string(), vec!["-c".to_string()])
  }

  #[cfg(windows)]
  {
    ("cmd.exe".to_string(), vec!["/C".to_string()])
  }
}
