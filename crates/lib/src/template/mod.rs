//! Build configuration templating.
//!
//! The packaging template ships a build descriptor and changelog that carry
//! a fixed set of literal placeholder tokens. Instantiation swaps each token
//! for its run-specific value; later targets then swap the *previous*
//! target's values for their own, mutating the live descriptor rather than
//! re-templating from scratch.
//!
//! Every replacement requires its token to be present. A missing token is a
//! [`TemplateError::Mismatch`], never a silent no-op, and an incremental
//! retarget is checked against the values the workspace actually holds so an
//! out-of-order retarget is rejected before it touches the file.
//!
//! The descriptor is rewritten by position, not by search. Instantiation
//! records where each placeholder sits ([`SlotMap`]); every later rewrite
//! touches only those slots, so a target value that also appears elsewhere
//! in the descriptor (or equals another slot's value) is never clobbered.

use std::fmt;
use std::path::{Path, PathBuf};

use serde::{Deserialize, Serialize};
use thiserror::Error;
use tracing::{debug, info};

use crate::plan::TargetSpec;
use crate::workspace::BuildWorkspace;

#[derive(Debug, Error)]
pub enum TemplateError {
  #[error("token '{token}' ({placeholder}) not found in {}", path.display())]
  Mismatch {
    placeholder: Placeholder,
    token: String,
    path: PathBuf,
  },

  #[error("workspace holds target {found} but retarget expected {expected}")]
  OutOfOrder { expected: TargetSpec, found: TargetSpec },

  #[error("workspace has not been instantiated for any target yet")]
  NotInstantiated,

  #[error("placeholders {first} and {second} overlap in {}", path.display())]
  Overlap {
    first: Placeholder,
    second: Placeholder,
    path: PathBuf,
  },

  #[error("value {value:?} for {placeholder} spans more than one line")]
  MultiLineValue { placeholder: Placeholder, value: String },

  #[error("failed to rewrite {}: {source}", path.display())]
  Io { path: PathBuf, source: std::io::Error },
}

/// The named placeholders a packaging template carries.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub enum Placeholder {
  BuildType,
  ChangelogVersion,
  BuildDir,
  BuildTarget,
  PlatformTarget,
  AllDeps,
}

impl Placeholder {
  pub const ALL: [Placeholder; 6] = [
    Placeholder::BuildType,
    Placeholder::ChangelogVersion,
    Placeholder::BuildDir,
    Placeholder::BuildTarget,
    Placeholder::PlatformTarget,
    Placeholder::AllDeps,
  ];

  /// Placeholders that live in the build descriptor.
  pub const DESCRIPTOR: [Placeholder; 5] = [
    Placeholder::BuildType,
    Placeholder::BuildDir,
    Placeholder::BuildTarget,
    Placeholder::PlatformTarget,
    Placeholder::AllDeps,
  ];

  pub fn as_str(&self) -> &'static str {
    match self {
      Placeholder::BuildType => "build-type",
      Placeholder::ChangelogVersion => "changelog-version",
      Placeholder::BuildDir => "build-dir",
      Placeholder::BuildTarget => "build-target",
      Placeholder::PlatformTarget => "platform-target",
      Placeholder::AllDeps => "all-deps",
    }
  }
}

impl fmt::Display for Placeholder {
  fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
    f.write_str(self.as_str())
  }
}

/// Literal token text for each placeholder, plus the fixed replacement values.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(default, deny_unknown_fields)]
pub struct TemplateTokens {
  pub build_type: String,
  pub changelog_version: String,
  pub build_dir: String,
  pub build_target: String,
  pub platform_target: String,
  pub all_deps: String,
  /// Replaces `build_type` on instantiation.
  pub package_build: String,
  /// Replaces `all_deps` once the full build has run.
  pub package_only_deps: String,
}

impl Default for TemplateTokens {
  fn default() -> Self {
    Self {
      build_type: "PKG_BUILD=FALSE".to_string(),
      changelog_version: "0.0.1".to_string(),
      build_dir: "flexswitch-0.0.1".to_string(),
      build_target: "cel_redstone".to_string(),
      platform_target: "dummy".to_string(),
      all_deps: "ALL_DEPS=buildinfogen codegen installdir ipc exe install".to_string(),
      package_build: "PKG_BUILD=TRUE".to_string(),
      package_only_deps: "ALL_DEPS=installdir install".to_string(),
    }
  }
}

impl TemplateTokens {
  pub fn token(&self, placeholder: Placeholder) -> &str {
    match placeholder {
      Placeholder::BuildType => &self.build_type,
      Placeholder::ChangelogVersion => &self.changelog_version,
      Placeholder::BuildDir => &self.build_dir,
      Placeholder::BuildTarget => &self.build_target,
      Placeholder::PlatformTarget => &self.platform_target,
      Placeholder::AllDeps => &self.all_deps,
    }
  }
}

/// Replace every occurrence of `token` in the file at `path` with `value`.
///
/// Returns the number of occurrences replaced. `placeholder` only labels the
/// error when the token is absent.
pub fn substitute(path: &Path, placeholder: Placeholder, token: &str, value: &str) -> Result<usize, TemplateError> {
  let io_err = |source| TemplateError::Io {
    path: path.to_path_buf(),
    source,
  };

  let content = std::fs::read_to_string(path).map_err(io_err)?;
  let count = content.matches(token).count();
  if token.is_empty() || count == 0 {
    return Err(TemplateError::Mismatch {
      placeholder,
      token: token.to_string(),
      path: path.to_path_buf(),
    });
  }

  std::fs::write(path, content.replace(token, value)).map_err(io_err)?;
  debug!(
    path = %path.display(),
    placeholder = %placeholder,
    token = %token,
    value = %value,
    count,
    "substituted token"
  );
  Ok(count)
}

#[derive(Debug, Clone, PartialEq, Eq)]
struct Slot {
  placeholder: Placeholder,
  line: usize,
  /// Byte offset within the line.
  start: usize,
  len: usize,
}

/// One placeholder rewrite: the text its slots must hold, and what replaces it.
struct Edit<'v> {
  placeholder: Placeholder,
  expected: &'v str,
  value: &'v str,
}

/// Positions of every descriptor placeholder, sorted by line and offset.
#[derive(Debug, Clone, PartialEq, Eq)]
pub(crate) struct SlotMap {
  slots: Vec<Slot>,
}

impl SlotMap {
  /// Locate every placeholder token in the pristine descriptor.
  fn scan(content: &str, tokens: &TemplateTokens, path: &Path) -> Result<Self, TemplateError> {
    let mut slots = Vec::new();
    for (line, text) in content.split_inclusive('\n').enumerate() {
      for placeholder in Placeholder::DESCRIPTOR {
        let token = tokens.token(placeholder);
        if token.is_empty() {
          continue;
        }
        slots.extend(text.match_indices(token).map(|(start, _)| Slot {
          placeholder,
          line,
          start,
          len: token.len(),
        }));
      }
    }
    slots.sort_by_key(|slot| (slot.line, slot.start));

    if let Some(pair) = slots
      .windows(2)
      .find(|pair| pair[0].line == pair[1].line && pair[0].start + pair[0].len > pair[1].start)
    {
      return Err(TemplateError::Overlap {
        first: pair[0].placeholder,
        second: pair[1].placeholder,
        path: path.to_path_buf(),
      });
    }

    for placeholder in Placeholder::DESCRIPTOR {
      if !slots.iter().any(|slot| slot.placeholder == placeholder) {
        return Err(TemplateError::Mismatch {
          placeholder,
          token: tokens.token(placeholder).to_string(),
          path: path.to_path_buf(),
        });
      }
    }

    Ok(Self { slots })
  }

  /// Apply `edits` to the slots of `content`, leaving all other text alone.
  ///
  /// Every slot of an edited placeholder must still hold the edit's expected
  /// text. Returns the new content and the slot positions within it.
  fn rewrite(&self, content: &str, path: &Path, edits: &[Edit<'_>]) -> Result<(String, SlotMap), TemplateError> {
    for edit in edits {
      if edit.value.contains('\n') {
        return Err(TemplateError::MultiLineValue {
          placeholder: edit.placeholder,
          value: edit.value.to_string(),
        });
      }
    }
    let mismatch = |placeholder: Placeholder, token: &str| TemplateError::Mismatch {
      placeholder,
      token: token.to_string(),
      path: path.to_path_buf(),
    };

    let mut out = String::with_capacity(content.len());
    let mut slots = Vec::with_capacity(self.slots.len());
    let mut pending = self.slots.iter().peekable();

    for (line, text) in content.split_inclusive('\n').enumerate() {
      let line_start = out.len();
      let mut cursor = 0;

      while let Some(slot) = pending.next_if(|slot| slot.line == line) {
        let edit = edits.iter().find(|edit| edit.placeholder == slot.placeholder);
        let expected = edit.map_or("", |edit| edit.expected);
        let held = text
          .get(slot.start..slot.start + slot.len)
          .ok_or_else(|| mismatch(slot.placeholder, expected))?;

        out.push_str(&text[cursor..slot.start]);
        let start = out.len() - line_start;
        let value = match edit {
          Some(edit) if held != edit.expected => return Err(mismatch(slot.placeholder, edit.expected)),
          Some(edit) => edit.value,
          None => held,
        };
        out.push_str(value);
        slots.push(Slot {
          placeholder: slot.placeholder,
          line,
          start,
          len: value.len(),
        });
        cursor = slot.start + slot.len;
      }

      out.push_str(&text[cursor..]);
    }

    if let Some(slot) = pending.next() {
      return Err(mismatch(slot.placeholder, ""));
    }

    debug!(path = %path.display(), edits = edits.len(), slots = slots.len(), "rewrote descriptor slots");
    Ok((out, SlotMap { slots }))
  }
}

fn read(path: &Path) -> Result<String, TemplateError> {
  std::fs::read_to_string(path).map_err(|source| TemplateError::Io {
    path: path.to_path_buf(),
    source,
  })
}

fn write(path: &Path, content: &str) -> Result<(), TemplateError> {
  std::fs::write(path, content).map_err(|source| TemplateError::Io {
    path: path.to_path_buf(),
    source,
  })
}

/// Applies the placeholder model to a workspace.
#[derive(Debug, Clone, Copy)]
pub struct Templater<'a> {
  tokens: &'a TemplateTokens,
}

impl<'a> Templater<'a> {
  pub fn new(tokens: &'a TemplateTokens) -> Self {
    Self { tokens }
  }

  fn edit<'v>(&'v self, placeholder: Placeholder, value: &'v str) -> Edit<'v> {
    Edit {
      placeholder,
      expected: self.tokens.token(placeholder),
      value,
    }
  }

  /// Check that every placeholder token is present before anything is rewritten.
  pub fn validate(&self, workspace: &BuildWorkspace) -> Result<(), TemplateError> {
    let descriptor = read(workspace.descriptor())?;
    let changelog = read(workspace.changelog())?;

    for placeholder in Placeholder::ALL {
      let (content, path) = match placeholder {
        Placeholder::ChangelogVersion => (&changelog, workspace.changelog()),
        _ => (&descriptor, workspace.descriptor()),
      };
      let token = self.tokens.token(placeholder);
      if token.is_empty() || !content.contains(token) {
        return Err(TemplateError::Mismatch {
          placeholder,
          token: token.to_string(),
          path: path.to_path_buf(),
        });
      }
    }
    Ok(())
  }

  /// Fill every placeholder for the first target of a run.
  pub fn instantiate(
    &self,
    workspace: &mut BuildWorkspace,
    target: &TargetSpec,
    numeric_version: &str,
  ) -> Result<(), TemplateError> {
    self.validate(workspace)?;
    let descriptor = workspace.descriptor().to_path_buf();
    let content = read(&descriptor)?;

    let pristine = SlotMap::scan(&content, self.tokens, &descriptor)?;
    let (content, slots) = pristine.rewrite(
      &content,
      &descriptor,
      &[
        self.edit(Placeholder::BuildDir, workspace.name()),
        self.edit(Placeholder::BuildType, &self.tokens.package_build),
        self.edit(Placeholder::BuildTarget, &target.odm),
        self.edit(Placeholder::PlatformTarget, &target.platform),
      ],
    )?;
    write(&descriptor, &content)?;
    substitute(
      workspace.changelog(),
      Placeholder::ChangelogVersion,
      &self.tokens.changelog_version,
      numeric_version,
    )?;

    workspace.set_instantiated(target.clone(), slots);
    info!(odm = %target.odm, platform = %target.platform, "instantiated build configuration");
    Ok(())
  }

  /// Narrow the dependency phase to packaging inputs only.
  pub fn restrict_to_packaging(&self, workspace: &mut BuildWorkspace) -> Result<(), TemplateError> {
    let state = workspace.instantiated().ok_or(TemplateError::NotInstantiated)?;
    let target = state.target.clone();
    let descriptor = workspace.descriptor().to_path_buf();

    let (content, slots) = state.slots.rewrite(
      &read(&descriptor)?,
      &descriptor,
      &[self.edit(Placeholder::AllDeps, &self.tokens.package_only_deps)],
    )?;
    write(&descriptor, &content)?;
    workspace.set_instantiated(target, slots);
    Ok(())
  }

  /// Swap `previous`'s values in the descriptor for `next`'s.
  ///
  /// `previous` must be the target the workspace currently holds. Only the
  /// target and platform slots are rewritten.
  pub fn retarget(
    &self,
    workspace: &mut BuildWorkspace,
    previous: &TargetSpec,
    next: &TargetSpec,
  ) -> Result<(), TemplateError> {
    let state = workspace.instantiated().ok_or(TemplateError::NotInstantiated)?;
    if state.target != *previous {
      return Err(TemplateError::OutOfOrder {
        expected: previous.clone(),
        found: state.target.clone(),
      });
    }

    let descriptor = workspace.descriptor().to_path_buf();
    let (content, slots) = state.slots.rewrite(
      &read(&descriptor)?,
      &descriptor,
      &[
        Edit {
          placeholder: Placeholder::BuildTarget,
          expected: &previous.odm,
          value: &next.odm,
        },
        Edit {
          placeholder: Placeholder::PlatformTarget,
          expected: &previous.platform,
          value: &next.platform,
        },
      ],
    )?;
    write(&descriptor, &content)?;

    workspace.set_instantiated(next.clone(), slots);
    info!(from = %previous, to = %next, "retargeted build configuration");
    Ok(())
  }
}

#[cfg(test)]
mod tests {
  use super::*;
  use crate::workspace::materialize;
  use crate::workspace::tests::project;
  use std::fs;
  use tempfile::TempDir;

  #[test]
  fn substitute_replaces_token() {
    let temp = TempDir::new().unwrap();
    let path = temp.path().join("Makefile");
    fs::write(&path, "TARGET=cel_redstone\n").unwrap();

    let count = substitute(&path, Placeholder::BuildTarget, "cel_redstone", "t1").unwrap();

    assert_eq!(count, 1);
    assert_eq!(fs::read_to_string(&path).unwrap(), "TARGET=t1\n");
  }

  #[test]
  fn substitute_missing_token_is_mismatch() {
    let temp = TempDir::new().unwrap();
    let path = temp.path().join("Makefile");
    fs::write(&path, "TARGET=t1\n").unwrap();

    let err = substitute(&path, Placeholder::BuildTarget, "cel_redstone", "t2").unwrap_err();

    assert!(matches!(err, TemplateError::Mismatch { placeholder: Placeholder::BuildTarget, .. }));
    assert_eq!(fs::read_to_string(&path).unwrap(), "TARGET=t1\n");
  }

  #[test]
  fn substitute_empty_token_is_mismatch() {
    let temp = TempDir::new().unwrap();
    let path = temp.path().join("Makefile");
    fs::write(&path, "x").unwrap();

    assert!(substitute(&path, Placeholder::BuildType, "", "y").is_err());
  }

  #[test]
  fn instantiate_fills_every_placeholder() {
    let (_temp, layout) = project();
    let mut ws = materialize(&layout, "flexswitch-release_1.0.0.1.0").unwrap();
    let tokens = TemplateTokens::default();

    Templater::new(&tokens)
      .instantiate(&mut ws, &TargetSpec::new("t1", "p1"), "1.0.0.1.0")
      .unwrap();

    let descriptor = fs::read_to_string(ws.descriptor()).unwrap();
    assert!(descriptor.contains("BUILD_DIR=flexswitch-release_1.0.0.1.0"));
    assert!(descriptor.contains("PKG_BUILD=TRUE"));
    assert!(descriptor.contains("TARGET=t1"));
    assert!(descriptor.contains("PLATFORM=p1"));
    let changelog = fs::read_to_string(ws.changelog()).unwrap();
    assert!(changelog.contains("(1.0.0.1.0)"));
    assert_eq!(ws.current_target(), Some(&TargetSpec::new("t1", "p1")));
  }

  #[test]
  fn instantiate_rejects_template_missing_a_token_untouched() {
    let (_temp, layout) = project();
    let mut ws = materialize(&layout, "ws").unwrap();
    fs::write(ws.descriptor(), "BUILD_DIR=flexswitch-0.0.1\nPKG_BUILD=FALSE\n").unwrap();
    let tokens = TemplateTokens::default();

    let err = Templater::new(&tokens)
      .instantiate(&mut ws, &TargetSpec::new("t1", "p1"), "1")
      .unwrap_err();

    assert!(matches!(err, TemplateError::Mismatch { placeholder: Placeholder::BuildTarget, .. }));
    assert_eq!(
      fs::read_to_string(ws.descriptor()).unwrap(),
      "BUILD_DIR=flexswitch-0.0.1\nPKG_BUILD=FALSE\n"
    );
    assert!(ws.current_target().is_none());
  }

  #[test]
  fn restrict_to_packaging_rewrites_deps_once() {
    let (_temp, layout) = project();
    let mut ws = materialize(&layout, "ws").unwrap();
    let tokens = TemplateTokens::default();
    let templater = Templater::new(&tokens);
    templater.instantiate(&mut ws, &TargetSpec::new("t1", "p1"), "1").unwrap();

    templater.restrict_to_packaging(&mut ws).unwrap();

    let descriptor = fs::read_to_string(ws.descriptor()).unwrap();
    assert!(descriptor.contains("ALL_DEPS=installdir install\n"));
    assert!(matches!(
      templater.restrict_to_packaging(&mut ws),
      Err(TemplateError::Mismatch { placeholder: Placeholder::AllDeps, .. })
    ));
  }

  #[test]
  fn retarget_swaps_previous_values() {
    let (_temp, layout) = project();
    let mut ws = materialize(&layout, "ws").unwrap();
    let tokens = TemplateTokens::default();
    let templater = Templater::new(&tokens);
    let t1 = TargetSpec::new("t1", "p1");
    let t2 = TargetSpec::new("t2", "p2");
    templater.instantiate(&mut ws, &t1, "1").unwrap();

    templater.retarget(&mut ws, &t1, &t2).unwrap();

    let descriptor = fs::read_to_string(ws.descriptor()).unwrap();
    assert!(descriptor.contains("TARGET=t2"));
    assert!(descriptor.contains("PLATFORM=p2"));
    assert!(!descriptor.contains("t1"));
    assert_eq!(ws.current_target(), Some(&t2));
  }

  #[test]
  fn retarget_with_shared_platform_keeps_platform() {
    let (_temp, layout) = project();
    let mut ws = materialize(&layout, "ws").unwrap();
    let tokens = TemplateTokens::default();
    let templater = Templater::new(&tokens);
    let t1 = TargetSpec::new("t1", "shared");
    let t2 = TargetSpec::new("t2", "shared");
    templater.instantiate(&mut ws, &t1, "1").unwrap();

    templater.retarget(&mut ws, &t1, &t2).unwrap();

    let descriptor = fs::read_to_string(ws.descriptor()).unwrap();
    assert!(descriptor.contains("TARGET=t2"));
    assert!(descriptor.contains("PLATFORM=shared"));
  }

  #[test]
  fn retarget_leaves_matching_text_outside_slots() {
    let (_temp, layout) = project();
    let mut ws = materialize(&layout, "ws").unwrap();
    let tokens = TemplateTokens::default();
    let templater = Templater::new(&tokens);
    let first = TargetSpec::new("install", "p1");
    let second = TargetSpec::new("t2", "p2");
    templater.instantiate(&mut ws, &first, "1").unwrap();

    templater.retarget(&mut ws, &first, &second).unwrap();

    let descriptor = fs::read_to_string(ws.descriptor()).unwrap();
    assert!(descriptor.contains("TARGET=t2\nPLATFORM=p2\n"));
    assert!(descriptor.contains("ALL_DEPS=buildinfogen codegen installdir ipc exe install\n"));
  }

  #[test]
  fn retarget_handles_odm_equal_to_platform() {
    let (_temp, layout) = project();
    let mut ws = materialize(&layout, "ws").unwrap();
    let tokens = TemplateTokens::default();
    let templater = Templater::new(&tokens);
    let first = TargetSpec::new("docker", "docker");
    let second = TargetSpec::new("ingrasys_s9100", "s9100");
    templater.instantiate(&mut ws, &first, "1").unwrap();
    templater.restrict_to_packaging(&mut ws).unwrap();

    templater.retarget(&mut ws, &first, &second).unwrap();

    let descriptor = fs::read_to_string(ws.descriptor()).unwrap();
    assert!(descriptor.contains("TARGET=ingrasys_s9100\nPLATFORM=s9100\n"));
    assert!(descriptor.contains("ALL_DEPS=installdir install\n"));
  }

  #[test]
  fn retarget_detects_descriptor_edited_behind_its_back() {
    let (_temp, layout) = project();
    let mut ws = materialize(&layout, "ws").unwrap();
    let tokens = TemplateTokens::default();
    let templater = Templater::new(&tokens);
    let t1 = TargetSpec::new("t1", "p1");
    templater.instantiate(&mut ws, &t1, "1").unwrap();
    let edited = fs::read_to_string(ws.descriptor()).unwrap().replace("TARGET=t1", "TARGET=zz");
    fs::write(ws.descriptor(), &edited).unwrap();

    let err = templater
      .retarget(&mut ws, &t1, &TargetSpec::new("t2", "p2"))
      .unwrap_err();

    assert!(matches!(err, TemplateError::Mismatch { placeholder: Placeholder::BuildTarget, .. }));
    assert_eq!(fs::read_to_string(ws.descriptor()).unwrap(), edited);
    assert_eq!(ws.current_target(), Some(&t1));
  }

  #[test]
  fn overlapping_tokens_are_rejected_before_rewrite() {
    let (_temp, layout) = project();
    let mut ws = materialize(&layout, "ws").unwrap();
    let before = fs::read_to_string(ws.descriptor()).unwrap();
    let tokens = TemplateTokens {
      platform_target: "redstone".to_string(),
      ..TemplateTokens::default()
    };

    let err = Templater::new(&tokens)
      .instantiate(&mut ws, &TargetSpec::new("t1", "p1"), "1")
      .unwrap_err();

    assert!(matches!(err, TemplateError::Overlap { .. }));
    assert_eq!(fs::read_to_string(ws.descriptor()).unwrap(), before);
  }

  #[test]
  fn multi_line_target_value_is_rejected() {
    let (_temp, layout) = project();
    let mut ws = materialize(&layout, "ws").unwrap();
    let tokens = TemplateTokens::default();

    let err = Templater::new(&tokens)
      .instantiate(&mut ws, &TargetSpec::new("t1\nEVIL=1", "p1"), "1")
      .unwrap_err();

    assert!(matches!(err, TemplateError::MultiLineValue { placeholder: Placeholder::BuildTarget, .. }));
    assert!(ws.current_target().is_none());
  }

  #[test]
  fn restrict_before_instantiate_is_rejected() {
    let (_temp, layout) = project();
    let mut ws = materialize(&layout, "ws").unwrap();
    let tokens = TemplateTokens::default();

    let err = Templater::new(&tokens).restrict_to_packaging(&mut ws).unwrap_err();

    assert!(matches!(err, TemplateError::NotInstantiated));
  }

  #[test]
  fn retarget_out_of_order_is_rejected() {
    let (_temp, layout) = project();
    let mut ws = materialize(&layout, "ws").unwrap();
    let tokens = TemplateTokens::default();
    let templater = Templater::new(&tokens);
    let t1 = TargetSpec::new("t1", "p1");
    let t2 = TargetSpec::new("t2", "p2");
    let t3 = TargetSpec::new("t3", "p3");
    templater.instantiate(&mut ws, &t1, "1").unwrap();
    let before = fs::read_to_string(ws.descriptor()).unwrap();

    // t3 applied as though t2 had already run
    let err = templater.retarget(&mut ws, &t2, &t3).unwrap_err();

    assert!(matches!(err, TemplateError::OutOfOrder { ref found, .. } if *found == t1));
    assert_eq!(fs::read_to_string(ws.descriptor()).unwrap(), before);
  }

  #[test]
  fn retarget_before_instantiate_is_rejected() {
    let (_temp, layout) = project();
    let mut ws = materialize(&layout, "ws").unwrap();
    let tokens = TemplateTokens::default();

    let err = Templater::new(&tokens)
      .retarget(&mut ws, &TargetSpec::new("a", "b"), &TargetSpec::new("c", "d"))
      .unwrap_err();

    assert!(matches!(err, TemplateError::NotInstantiated));
  }

  #[test]
  fn tokens_parse_from_partial_toml() {
    let tokens: TemplateTokens = toml::from_str("build_target = \"acme_board\"").unwrap();
    assert_eq!(tokens.build_target, "acme_board");
    assert_eq!(tokens.platform_target, "dummy");
  }
}
