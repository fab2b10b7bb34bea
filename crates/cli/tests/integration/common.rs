//! Shared test helpers for CLI integration tests.

use std::path::{Path, PathBuf};

use assert_cmd::Command;
use assert_cmd::cargo::cargo_bin_cmd;
use tempfile::TempDir;

pub const DESCRIPTOR: &str = "\
BUILD_DIR=flexswitch-0.0.1
PKG_BUILD=FALSE
TARGET=cel_redstone
PLATFORM=dummy
ALL_DEPS=buildinfogen codegen installdir ipc exe install
";

pub const METADATA: &str = r#"{
  "major": "1",
  "minor": "0",
  "patch": "0",
  "build": "1",
  "changeindex": "0",
  "platforms": [
    { "odm": "ingrasys_s9100", "platform": "s9100" },
    { "odm": "docker", "platform": "docker" }
  ]
}"#;

/// Toolchain stand-in: every phase succeeds and binary packaging drops a raw
/// package next to the workspace.
pub const CONFIG: &str = r#"
[commands]
clean_all = "true"
full_build = "true"
post_full_build = []
incremental_build = "true"
package_clean = "true"
package_build = "true"
package_binary = "touch ../flexswitch_1.0.0.1.0_amd64.deb"
image = "true"
"#;

pub const WORKSPACE: &str = "flexswitch-release_1.0.0.1.0";

/// Isolated packaging project in a temporary directory.
pub struct TestEnv {
  pub temp: TempDir,
}

impl TestEnv {
  /// Project with template, descriptor, metadata and a stand-in toolchain.
  pub fn new() -> Self {
    Self::with_config(CONFIG)
  }

  pub fn with_config(config: &str) -> Self {
    let env = Self::empty();
    env.write_file("tmplPkgDir/debian/changelog", "flexswitch (0.0.1) unstable; urgency=low\n");
    env.write_file("tmplPkgDir/debian/rules", "#!/usr/bin/make -f\n");
    env.write_file("Makefile", DESCRIPTOR);
    env.write_file("pkgInfo.json", METADATA);
    env.write_file("pkgforge.toml", config);
    env
  }

  pub fn empty() -> Self {
    Self {
      temp: TempDir::new().unwrap(),
    }
  }

  /// Write a file relative to the project root.
  pub fn write_file(&self, relative_path: &str, content: &str) {
    let path = self.temp.path().join(relative_path);
    if let Some(parent) = path.parent() {
      std::fs::create_dir_all(parent).unwrap();
    }
    std::fs::write(&path, content).unwrap();
  }

  pub fn root(&self) -> PathBuf {
    let p = self.temp.path().to_path_buf();
    dunce::canonicalize(&p).unwrap_or(p)
  }

  pub fn exists(&self, relative_path: impl AsRef<Path>) -> bool {
    self.root().join(relative_path).exists()
  }

  /// Command for the pkgforge binary, pointed at this project as a release build.
  pub fn pkgforge_cmd(&self) -> Command {
    let mut cmd: Command = cargo_bin_cmd!("pkgforge");
    cmd.arg("--project").arg(self.root()).arg("--release");
    cmd.env_remove("RUST_LOG");
    cmd
  }
}
