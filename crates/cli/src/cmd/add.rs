//! Implementation of the `pbxdeps add` command.
//!
//! Adds every package of a dependency file to the project manifest and
//! its `Package.resolved`, backing both up first.

use std::collections::BTreeMap;
use std::path::{Path, PathBuf};
use std::time::{Duration, Instant};

use anyhow::{Context, Result};
use owo_colors::OwoColorize;
use serde::Serialize;
use tracing::info;

use pbxdeps_lib::apply::{ApplyOptions, DependencyReport, apply_all_with};
use pbxdeps_lib::consts::BACKUP_DIR;
use pbxdeps_lib::dependency::load_descriptors;
use pbxdeps_lib::ident::RandomIds;
use pbxdeps_lib::lock::{MergeOutcome, ResolvedFile};
use pbxdeps_lib::project::{backup, discover};
use pbxdeps_lib::revision::{GitRevisionResolver, resolve_all};

use crate::output::{
  OutputFormat, format_duration, print_info, print_json, print_stat, print_success, print_warning, symbols,
  truncate_hash,
};

pub struct AddArgs {
  pub file: PathBuf,
  pub project: Option<PathBuf>,
  pub dry_run: bool,
  pub no_backup: bool,
  pub resolve_revisions: bool,
  pub timeout: Duration,
  pub output: OutputFormat,
}

#[derive(Debug, Serialize)]
#[serde(rename_all = "camelCase")]
struct AddSummary<'a> {
  project: &'a Path,
  dry_run: bool,
  backups: Vec<PathBuf>,
  dependencies: &'a [DependencyReport],
  placeholder_revisions: bool,
}

/// Execute the add command.
///
/// Nothing is written unless every dependency was added to both files in
/// memory first.
pub fn cmd_add(args: AddArgs) -> Result<()> {
  let start = Instant::now();
  let cwd = std::env::current_dir().context("Failed to read working directory")?;
  let paths = discover(args.project.as_deref(), &cwd).context("Failed to find Xcode project")?;

  let file = cwd.join(&args.file);
  let descriptors = load_descriptors(&file).with_context(|| format!("Failed to load {}", file.display()))?;
  info!(count = descriptors.len(), file = %file.display(), "loaded dependencies");

  let manifest = paths.read_manifest().context("Failed to read project manifest")?;
  let lock = ResolvedFile::load_or_new(&paths.resolved)
    .with_context(|| format!("Failed to load {}", paths.resolved.display()))?;

  let backups = if args.dry_run || args.no_backup {
    Vec::new()
  } else {
    backup(&paths, &cwd.join(BACKUP_DIR)).context("Failed to back up project files")?.files
  };

  let revisions = if args.resolve_revisions {
    resolve_all(&descriptors, &GitRevisionResolver::new(args.timeout))
  } else {
    BTreeMap::new()
  };

  let applied = apply_all_with(&manifest, &lock, &descriptors, &mut RandomIds, &ApplyOptions { revisions })
    .context("Failed to add dependencies")?;

  if !args.dry_run {
    paths
      .write(&applied.manifest, &applied.lock)
      .context("Failed to write project files")?;
  }

  if args.output.is_json() {
    return print_json(&AddSummary {
      project: &paths.xcodeproj,
      dry_run: args.dry_run,
      backups,
      dependencies: &applied.report,
      placeholder_revisions: applied.wrote_placeholders(),
    });
  }

  if args.dry_run {
    println!("{}", "Dry run - no changes written".yellow());
    println!();
  }

  for report in &applied.report {
    print_dependency(report, args.dry_run);
  }

  println!();
  for path in &backups {
    print_info(&format!("Backed up {}", path.display()));
  }
  let verb = if args.dry_run { "Would add" } else { "Added" };
  print_success(&format!(
    "{} {} package(s) to {} in {}",
    verb,
    applied.report.len(),
    paths.xcodeproj.display(),
    format_duration(start.elapsed())
  ));

  if applied.wrote_placeholders() {
    print_warning("Package.resolved contains placeholder revisions; Xcode replaces them on the next package resolution");
  }

  Ok(())
}

fn print_dependency(report: &DependencyReport, dry_run: bool) {
  let (symbol, action) = match (report.lock, dry_run) {
    (MergeOutcome::Added, false) => (symbols::ADD.green().to_string(), "pinned"),
    (MergeOutcome::Added, true) => (symbols::ADD.green().to_string(), "would pin"),
    (MergeOutcome::Updated, false) => (symbols::MODIFY.yellow().to_string(), "updated pin"),
    (MergeOutcome::Updated, true) => (symbols::MODIFY.yellow().to_string(), "would update pin"),
  };
  println!("  {} {} ({})", symbol, report.name.cyan(), action);

  print_stat("package", report.links.package_id.as_str());
  for product in &report.links.products {
    println!(
      "    {} {} {}",
      symbols::ARROW.dimmed(),
      product.product,
      format!("{} / {}", product.dependency_id, product.build_file_id).dimmed()
    );
  }
  print_stat(
    "frameworks phase",
    &format!("{} ({} match)", report.phase_record, report.shape.as_str()),
  );
  if let Some(revision) = &report.revision {
    print_stat("revision", truncate_hash(revision));
  }
}
