//! pkgforge-lib: multi-target package build sequencing.
//!
//! This crate turns one packaging template into a package per hardware target:
//! - `plan`: package metadata (version components and ordered targets)
//! - `workspace`: the versioned build directory materialized from the template
//! - `template`: placeholder substitution in the build descriptor and changelog
//! - `sequencer`: the full-then-incremental build state machine
//! - `hook`: optional per-target build-time customization
//! - `emit`: artifact renaming and image builds
//! - `exec`: external command execution with per-command failure policy

pub mod config;
pub mod consts;
pub mod emit;
mod error;
pub mod exec;
pub mod hook;
pub mod identity;
pub mod plan;
pub mod sequencer;
pub mod template;
pub mod util;
pub mod workspace;

pub use error::{Error, Result};
