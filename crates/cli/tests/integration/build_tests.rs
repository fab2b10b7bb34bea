//! Build command integration tests.

use predicates::prelude::*;

use super::common::{CONFIG, TestEnv, WORKSPACE};

#[test]
fn build_emits_one_package_per_target() {
  let env = TestEnv::new();

  env
    .pkgforge_cmd()
    .assert()
    .success()
    .stdout(predicate::str::contains("Built 2 package(s) for version release_1.0.0.1.0"));

  assert!(env.exists("flexswitch_ingrasys_s9100-release_1.0.0.1.0_amd64.deb"));
  assert!(env.exists("flexswitch_docker-release_1.0.0.1.0_amd64.deb"));
  assert!(!env.exists("flexswitch_1.0.0.1.0_amd64.deb"));
  assert!(!env.exists(WORKSPACE));
}

#[test]
fn build_leaves_source_descriptor_untouched() {
  let env = TestEnv::new();

  env.pkgforge_cmd().assert().success();

  let descriptor = std::fs::read_to_string(env.root().join("Makefile")).unwrap();
  assert_eq!(descriptor, super::common::DESCRIPTOR);
}

#[test]
fn platform_filter_builds_single_target() {
  let env = TestEnv::new();

  env
    .pkgforge_cmd()
    .arg("--platform")
    .arg("docker")
    .assert()
    .success()
    .stdout(predicate::str::contains("Built 1 package(s)"));

  assert!(env.exists("flexswitch_docker-release_1.0.0.1.0_amd64.deb"));
  assert!(!env.exists("flexswitch_ingrasys_s9100-release_1.0.0.1.0_amd64.deb"));
}

#[test]
fn unmatched_filter_builds_nothing() {
  let env = TestEnv::new();

  env
    .pkgforge_cmd()
    .arg("--platform")
    .arg("nonexistent")
    .assert()
    .success()
    .stderr(predicate::str::contains("No targets matched"));

  assert!(!env.exists(WORKSPACE));
}

#[test]
fn json_output_reports_artifacts() {
  let env = TestEnv::new();

  let output = env.pkgforge_cmd().arg("--output").arg("json").output().unwrap();
  assert!(output.status.success());

  let report: serde_json::Value = serde_json::from_slice(&output.stdout).unwrap();
  assert_eq!(report["version"], "release_1.0.0.1.0");
  assert_eq!(report["workspace_removed"], true);

  let targets = report["targets"].as_array().unwrap();
  assert_eq!(targets.len(), 2);
  assert_eq!(targets[0]["phase"], "full");
  assert_eq!(targets[1]["phase"], "incremental");
  assert_eq!(targets[1]["artifact"]["image"]["success"], true);
}

#[test]
fn keep_workspace_flag_leaves_workspace() {
  let env = TestEnv::new();

  env
    .pkgforge_cmd()
    .arg("--keep-workspace")
    .assert()
    .success()
    .stdout(predicate::str::contains("Workspace"));

  let descriptor = std::fs::read_to_string(env.root().join(WORKSPACE).join("Makefile")).unwrap();
  assert!(descriptor.contains("TARGET=docker"));
  assert!(descriptor.contains("PKG_BUILD=TRUE"));
  assert!(descriptor.contains("ALL_DEPS=installdir install"));
}

#[test]
fn failing_build_exits_nonzero_and_keeps_workspace() {
  let config = CONFIG.replace("incremental_build = \"true\"", "incremental_build = \"false\"");
  let env = TestEnv::with_config(&config);

  env
    .pkgforge_cmd()
    .assert()
    .failure()
    .stderr(predicate::str::contains("command failed"));

  assert!(env.exists("flexswitch_ingrasys_s9100-release_1.0.0.1.0_amd64.deb"));
  assert!(!env.exists("flexswitch_docker-release_1.0.0.1.0_amd64.deb"));
  assert!(env.exists(WORKSPACE));
}

#[test]
fn image_failure_does_not_fail_the_run() {
  let config = CONFIG.replace("image = \"true\"", "image = \"false\"");
  let env = TestEnv::with_config(&config);

  env
    .pkgforge_cmd()
    .assert()
    .success()
    .stderr(predicate::str::contains("image build for docker failed"));

  assert!(env.exists("flexswitch_docker-release_1.0.0.1.0_amd64.deb"));
}

#[test]
fn image_failure_can_be_made_fatal() {
  let config = format!("image_failure = \"fail-fast\"\n{}", CONFIG.replace("image = \"true\"", "image = \"false\""));
  let env = TestEnv::with_config(&config);

  env.pkgforge_cmd().assert().failure();
}

#[test]
fn customization_overlay_is_applied_for_its_target() {
  let config = format!("{CONFIG}\n[customizations.ingrasys_s9100]\noverlay = \"overlays/s9100\"\n");
  let env = TestEnv::with_config(&config);
  env.write_file("overlays/s9100/etc/board.conf", "s9100\n");

  env
    .pkgforge_cmd()
    .arg("--keep-workspace")
    .assert()
    .success()
    .stdout(predicate::str::contains("customized by overlay:ingrasys_s9100"));

  assert!(env.exists(format!("{WORKSPACE}/etc/board.conf")));
}
