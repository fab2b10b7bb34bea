//! Dry-run: show what a build would do without running anything.

use anyhow::Result;
use serde::Serialize;

use pkgforge_lib::hook::CustomizationRegistry;
use pkgforge_lib::sequencer::{ScheduledTarget, Sequencer};

use super::BuildArgs;
use crate::output::{print_info, print_json, print_stat, print_warning, symbols};

#[derive(Serialize)]
struct Schedule {
  version: String,
  workspace: String,
  targets: Vec<ScheduledTarget>,
}

pub fn cmd_schedule(args: &BuildArgs) -> Result<()> {
  let resolved = args.resolve()?;
  let registry: CustomizationRegistry = resolved.config.registry(&resolved.root);
  let sequencer = Sequencer::new(&resolved.plan, &resolved.config, &registry, &resolved.root);

  let schedule = Schedule {
    version: resolved.plan.qualified_version(),
    workspace: sequencer.build_dir_name(),
    targets: sequencer.schedule(&args.platform),
  };

  if args.output.is_json() {
    return print_json(&schedule);
  }

  if schedule.targets.is_empty() {
    print_warning("No targets matched; nothing would be built");
    return Ok(());
  }

  print_info(&format!("Build schedule for version {}", schedule.version));
  print_stat("Workspace", &schedule.workspace);
  println!();
  for target in &schedule.targets {
    let mut extras = Vec::new();
    if let Some(handler) = &target.customization {
      extras.push(handler.clone());
    }
    if target.image {
      extras.push("image".to_string());
    }
    let extras = if extras.is_empty() {
      String::new()
    } else {
      format!(" [{}]", extras.join(", "))
    };
    println!(
      "  {} {}/{} ({}) {} {}{}",
      symbols::INFO,
      target.odm,
      target.platform,
      target.phase,
      symbols::ARROW,
      target.artifact,
      extras
    );
  }

  Ok(())
}
