//! Per-target build-time customization.
//!
//! Some targets need their workspace adjusted after the packaging build and
//! before the binary package is assembled. Handlers are registered per
//! target identifier; a target with no handler is simply left alone.

mod overlay;

use std::collections::BTreeMap;
use std::fmt;
use std::path::Path;

use thiserror::Error;

pub use overlay::OverlayCustomization;

#[derive(Debug, Error)]
pub enum HookError {
  #[error("customization '{handler}' failed: {message}")]
  Failed { handler: String, message: String },

  #[error("customization '{handler}' failed: {source}")]
  Copy {
    handler: String,
    source: crate::util::fs::CopyError,
  },
}

/// A target-specific workspace adjustment.
pub trait Customization {
  /// Short label for logs and reports.
  fn name(&self) -> &str;

  /// Adjust the workspace in place.
  fn perform_build_time_customization(&self, workspace: &Path) -> Result<(), HookError>;
}

/// Target identifier to customization handler.
#[derive(Default)]
pub struct CustomizationRegistry {
  handlers: BTreeMap<String, Box<dyn Customization>>,
}

impl CustomizationRegistry {
  pub fn new() -> Self {
    Self::default()
  }

  /// Register `handler` for `target`, replacing any previous handler.
  pub fn register(&mut self, target: impl Into<String>, handler: Box<dyn Customization>) {
    self.handlers.insert(target.into(), handler);
  }

  pub fn with(mut self, target: impl Into<String>, handler: impl Customization + 'static) -> Self {
    self.register(target, Box::new(handler));
    self
  }

  pub fn get(&self, target: &str) -> Option<&dyn Customization> {
    self.handlers.get(target).map(|h| h.as_ref())
  }
}

impl fmt::Debug for CustomizationRegistry {
  fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
    f.debug_map()
      .entries(self.handlers.iter().map(|(target, h)| (target, h.name())))
      .finish()
  }
}
