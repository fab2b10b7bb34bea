//! Dry-run integration tests.

use predicates::prelude::*;

use super::common::{TestEnv, WORKSPACE};

#[test]
fn dry_run_lists_targets_without_building() {
  let env = TestEnv::new();

  env
    .pkgforge_cmd()
    .arg("--dry-run")
    .assert()
    .success()
    .stdout(predicate::str::contains("ingrasys_s9100/s9100 (full)"))
    .stdout(predicate::str::contains("docker/docker (incremental)"))
    .stdout(predicate::str::contains("flexswitch_docker-release_1.0.0.1.0_amd64.deb [image]"));

  assert!(!env.exists(WORKSPACE));
  assert!(!env.exists("flexswitch_docker-release_1.0.0.1.0_amd64.deb"));
}

#[test]
fn dry_run_json_schedule() {
  let env = TestEnv::new();

  let output = env
    .pkgforge_cmd()
    .args(["--dry-run", "--output", "json", "--platform", "docker"])
    .output()
    .unwrap();
  assert!(output.status.success());

  let schedule: serde_json::Value = serde_json::from_slice(&output.stdout).unwrap();
  assert_eq!(schedule["workspace"], WORKSPACE);
  let targets = schedule["targets"].as_array().unwrap();
  assert_eq!(targets.len(), 1);
  assert_eq!(targets[0]["phase"], "full");
  assert_eq!(targets[0]["image"], true);
}
