//! Implementation of the `pbxdeps inspect` command.
//!
//! Prints the sections and anchors the patcher looks for, so a manifest it
//! rejects can be fixed by hand.

use std::path::Path;

use anyhow::{Context, Result};
use owo_colors::{OwoColorize, Stream};
use serde::Serialize;

use pbxdeps_lib::pbxproj::inspect::{ManifestReport, inspect};

use crate::output::{OutputFormat, print_info, print_json, print_stat, print_success, print_warning, symbols};

#[derive(Debug, Serialize)]
#[serde(rename_all = "camelCase")]
struct InspectOutput<'a> {
  manifest: &'a Path,
  patchable: bool,
  #[serde(flatten)]
  report: &'a ManifestReport,
}

pub fn cmd_inspect(project: Option<&Path>, output: OutputFormat) -> Result<()> {
  let cwd = std::env::current_dir().context("Failed to read working directory")?;
  let paths = pbxdeps_lib::project::discover(project, &cwd).context("Failed to find Xcode project")?;
  let text = paths.read_manifest().context("Failed to read project manifest")?;
  let report = inspect(&text);

  if output.is_json() {
    return print_json(&InspectOutput {
      manifest: &paths.manifest,
      patchable: report.is_patchable(),
      report: &report,
    });
  }

  print_info(&format!("Manifest: {}", paths.manifest.display()));
  println!();

  println!("Sections:");
  for name in &report.sections {
    println!("  {}", name);
  }
  println!();

  println!("Anchors:");
  for anchor in &report.anchors {
    let mark = if anchor.found {
      symbols::SUCCESS.if_supports_color(Stream::Stdout, |s| s.green()).to_string()
    } else {
      symbols::ERROR.if_supports_color(Stream::Stdout, |s| s.red()).to_string()
    };
    println!("  {} {}", mark, anchor.anchor);
  }
  println!();

  match &report.build_phase {
    Some(phase) => print_stat(
      "Frameworks phase",
      &format!("{} ({} match)", phase.record_id, phase.shape.as_str()),
    ),
    None => print_stat("Frameworks phase", "not recognized"),
  }
  let packages = if report.packages.is_empty() {
    "none".to_string()
  } else {
    report.packages.join(", ")
  };
  print_stat("Packages", &packages);

  if let Some(excerpt) = &report.frameworks_excerpt {
    println!();
    println!("PBXFrameworksBuildPhase section:");
    println!("{}", excerpt.if_supports_color(Stream::Stdout, |s| s.dimmed()));
  }

  println!();
  if report.is_patchable() {
    print_success("Packages can be added to this project");
  } else {
    print_warning("Some anchors are missing; adding packages will fail");
  }

  Ok(())
}
