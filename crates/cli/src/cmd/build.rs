//! Build command implementation.
//!
//! Loads the plan and config, runs every selected target through the
//! sequencer, and reports the emitted artifacts.

use anyhow::Result;
use tracing::info;

use pkgforge_lib::exec::ShellExecutor;
use pkgforge_lib::sequencer::{RunReport, Sequencer};

use super::BuildArgs;
use crate::output::{format_elapsed, print_json, print_stat, print_success, print_warning, symbols};

pub fn cmd_build(args: &BuildArgs) -> Result<()> {
  let resolved = args.resolve()?;
  let registry = resolved.config.registry(&resolved.root);
  let sequencer = Sequencer::new(&resolved.plan, &resolved.config, &registry, &resolved.root);

  info!(
    version = %resolved.plan.qualified_version(),
    targets = resolved.plan.targets.len(),
    "starting packaging run"
  );

  let mut executor = ShellExecutor::new(resolved.config.commands.shell.clone());
  let runtime = tokio::runtime::Builder::new_current_thread().enable_all().build()?;
  let report = runtime.block_on(sequencer.run(&mut executor, &args.platform))?;

  if args.output.is_json() {
    print_json(&report)?;
  } else {
    print_report(&report);
  }

  Ok(())
}

fn print_report(report: &RunReport) {
  if report.targets.is_empty() {
    print_warning("No targets matched; nothing was built");
    return;
  }

  print_success(&format!(
    "Built {} package(s) for version {}",
    report.targets.len(),
    report.version
  ));
  print_stat("Elapsed", &format_elapsed(report.elapsed));
  if !report.workspace_removed {
    print_stat("Workspace", &report.workspace.display().to_string());
  }
  println!();

  for target in &report.targets {
    println!(
      "  {} {} ({}) {} {}",
      symbols::SUCCESS,
      target.odm,
      target.phase,
      symbols::ARROW,
      target.artifact.path.display()
    );
    if let Some(handler) = &target.customization {
      println!("      customized by {handler}");
    }
    if let Some(image) = &target.artifact.image {
      if image.success {
        println!("      image built");
      } else {
        print_warning(&format!("image build for {} failed (exit code {:?})", target.odm, image.code));
      }
    }
  }
}
