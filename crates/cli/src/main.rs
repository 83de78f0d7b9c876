mod cmd;
mod output;

use std::path::PathBuf;
use std::time::Duration;

use anyhow::Result;
use clap::{Parser, Subcommand};
use tracing_subscriber::EnvFilter;

use pbxdeps_lib::consts::{APP_NAME, DEFAULT_DEPENDENCY_FILE};

use crate::cmd::{AddArgs, cmd_add, cmd_inspect};
use crate::output::{OutputFormat, print_error};

/// pbxdeps - Add Swift package dependencies to an Xcode project
#[derive(Parser)]
#[command(name = APP_NAME)]
#[command(author, version, about, long_about = None)]
struct Cli {
  /// Enable debug logging
  #[arg(short, long, global = true)]
  verbose: bool,

  #[command(subcommand)]
  command: Commands,
}

#[derive(Subcommand)]
enum Commands {
  /// Add the packages listed in a dependency file
  Add {
    /// JSON list of packages to add
    #[arg(default_value = DEFAULT_DEPENDENCY_FILE)]
    file: PathBuf,

    /// The .xcodeproj to modify (default: $PBXDEPS_PROJECT, else the only one here)
    #[arg(short, long)]
    project: Option<PathBuf>,

    /// Show what would be added without writing anything
    #[arg(long)]
    dry_run: bool,

    /// Skip copying the project files to backups/ first
    #[arg(long)]
    no_backup: bool,

    /// Look up revisions with `git ls-remote` instead of writing placeholders
    #[arg(long)]
    resolve_revisions: bool,

    /// Time limit for each revision lookup (e.g., "15s", "1m")
    #[arg(long, value_parser = humantime::parse_duration, default_value = "15s")]
    timeout: Duration,

    /// Output format
    #[arg(short = 'o', long, value_enum, default_value = "text")]
    output: OutputFormat,
  },

  /// Show the structure the patcher relies on
  Inspect {
    /// The .xcodeproj to inspect (default: $PBXDEPS_PROJECT, else the only one here)
    #[arg(short, long)]
    project: Option<PathBuf>,

    /// Output format
    #[arg(short = 'o', long, value_enum, default_value = "text")]
    output: OutputFormat,
  },
}

fn main() {
  let cli = Cli::parse();

  let filter = if cli.verbose {
    EnvFilter::new("debug")
  } else {
    EnvFilter::try_from_default_env().unwrap_or_else(|_| EnvFilter::new("warn"))
  };
  tracing_subscriber::fmt()
    .with_env_filter(filter)
    .with_writer(std::io::stderr)
    .without_time()
    .init();

  if let Err(e) = run(cli.command) {
    print_error(&format!("{:#}", e));
    std::process::exit(1);
  }
}

fn run(command: Commands) -> Result<()> {
  match command {
    Commands::Add {
      file,
      project,
      dry_run,
      no_backup,
      resolve_revisions,
      timeout,
      output,
    } => cmd_add(AddArgs {
      file,
      project,
      dry_run,
      no_backup,
      resolve_revisions,
      timeout,
      output,
    }),
    Commands::Inspect { project, output } => cmd_inspect(project.as_deref(), output),
  }
}
