mod cmd;
mod output;

use std::path::PathBuf;
use std::process::ExitCode;

use clap::Parser;
use tracing_subscriber::EnvFilter;

use crate::cmd::BuildArgs;
use crate::output::{OutputFormat, print_error};

/// pkgforge - build one package per hardware target from a shared template
#[derive(Parser)]
#[command(name = "pkgforge")]
#[command(author, version, about, long_about = None)]
struct Cli {
  /// Release build: prefix versions with "release" instead of the user name
  #[arg(short, long)]
  release: bool,

  /// Only build the target with this identifier
  #[arg(long, value_name = "ODM", default_value = "")]
  platform: String,

  /// Project root holding the template, descriptor and metadata
  #[arg(short = 'C', long, default_value = ".")]
  project: PathBuf,

  /// Package metadata file (default: <project>/pkgInfo.json)
  #[arg(long)]
  metadata: Option<PathBuf>,

  /// Config file (default: <project>/pkgforge.toml, if present)
  #[arg(long)]
  config: Option<PathBuf>,

  /// Print the build schedule without running anything
  #[arg(long)]
  dry_run: bool,

  /// Leave the build workspace in place after the run
  #[arg(long)]
  keep_workspace: bool,

  /// Output format
  #[arg(short, long, value_enum, default_value_t = OutputFormat::Text)]
  output: OutputFormat,

  /// Enable verbose output
  #[arg(short, long)]
  verbose: bool,
}

fn main() -> ExitCode {
  let cli = Cli::parse();

  let default_level = if cli.verbose { "debug" } else { "info" };
  tracing_subscriber::fmt()
    .with_env_filter(EnvFilter::try_from_default_env().unwrap_or_else(|_| EnvFilter::new(default_level)))
    .with_writer(std::io::stderr)
    .without_time()
    .init();

  let args = BuildArgs {
    release: cli.release,
    platform: cli.platform,
    project: cli.project,
    metadata: cli.metadata,
    config: cli.config,
    keep_workspace: cli.keep_workspace,
    output: cli.output,
  };

  let result = if cli.dry_run {
    cmd::cmd_schedule(&args)
  } else {
    cmd::cmd_build(&args)
  };

  match result {
    Ok(()) => ExitCode::SUCCESS,
    Err(e) => {
      print_error(&format!("{e:#}"));
      ExitCode::FAILURE
    }
  }
}
