use thiserror::Error;

use crate::config::ConfigFileError;
use crate::emit::EmitError;
use crate::exec::ExecError;
use crate::hook::HookError;
use crate::plan::PlanError;
use crate::template::TemplateError;
use crate::workspace::WorkspaceError;

pub type Result<T> = std::result::Result<T, Error>;

/// Any failure that aborts a packaging run.
#[derive(Debug, Error)]
pub enum Error {
  #[error(transparent)]
  Config(#[from] ConfigFileError),

  #[error(transparent)]
  Plan(#[from] PlanError),

  #[error(transparent)]
  Workspace(#[from] WorkspaceError),

  #[error(transparent)]
  Template(#[from] TemplateError),

  #[error(transparent)]
  Command(#[from] ExecError),

  #[error(transparent)]
  Customization(#[from] HookError),

  #[error(transparent)]
  Emit(#[from] EmitError),
}
