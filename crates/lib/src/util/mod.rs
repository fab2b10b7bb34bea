//! Shared utilities.
//!
//! Filesystem helpers used by the workspace and customization hooks, plus test helpers.

pub mod fs;

#[cfg(test)]
pub mod testutil;
