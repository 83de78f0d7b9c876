//! The per-dependency patch pipeline.
//!
//! Adding one package runs the [`Step`]s in [`Step::ORDER`]. Every step takes
//! the latest snapshot, locates its own anchors in it, and returns a new
//! snapshot. No offset survives from one step to the next.

use std::fmt;

use tracing::{debug, info, warn};

use super::link::{self, PackageLinks};
use super::locate::{self, PhaseMatch, ShapeKind};
use super::render;
use super::splice::{self, SpliceConflict};
use super::{PatchError, Section};
use crate::dependency::DependencyDescriptor;
use crate::ident::IdGenerator;
use crate::util::text::{excerpt, surrounding};

/// Longest excerpt of a section quoted in an error.
const EXCERPT_LEN: usize = 400;

/// One stage of adding a package to the manifest.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum Step {
  /// Append the `XCRemoteSwiftPackageReference` record.
  PackageReference,
  /// List the package in the project's `packageReferences`.
  ReferenceList,
  /// Append one `XCSwiftPackageProductDependency` per product.
  ProductDependencies,
  /// List each product's build file in the frameworks phase.
  FrameworksPhase,
  /// Append one `PBXBuildFile` per product.
  BuildFiles,
}

impl Step {
  pub const ORDER: [Step; 5] = [
    Step::PackageReference,
    Step::ReferenceList,
    Step::ProductDependencies,
    Step::FrameworksPhase,
    Step::BuildFiles,
  ];
}

impl fmt::Display for Step {
  fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
    let name = match self {
      Step::PackageReference => "package reference",
      Step::ReferenceList => "package reference list",
      Step::ProductDependencies => "product dependencies",
      Step::FrameworksPhase => "frameworks phase",
      Step::BuildFiles => "build files",
    };
    f.write_str(name)
  }
}

/// Result of adding one package.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct PatchOutcome {
  pub text: String,
  pub links: PackageLinks,
  /// Identifier of the frameworks phase record the products were listed in.
  pub phase_record: String,
  pub shape: ShapeKind,
}

/// Add `descriptor` to `text`.
///
/// The input is never modified; on error nothing of the partial result is
/// returned.
pub fn patch_manifest(
  text: &str,
  descriptor: &DependencyDescriptor,
  ids: &mut dyn IdGenerator,
) -> Result<PatchOutcome, PatchError> {
  let links = PackageLinks::mint(descriptor, ids, text)?;
  let mut pipeline = Pipeline {
    descriptor,
    links: &links,
    phase: None,
  };

  let mut current = text.to_string();
  for step in Step::ORDER {
    current = pipeline.run(step, &current)?;
    debug!(dependency = %descriptor.name, %step, len = current.len(), "step applied");
  }

  link::verify(&current, &descriptor.name, &links)?;

  let (phase_record, shape) = pipeline.phase.ok_or_else(|| PatchError::BrokenChain {
    dependency: descriptor.name.clone(),
    missing: "frameworks phase".to_string(),
  })?;
  info!(
    dependency = %descriptor.name,
    package = %links.package_id,
    products = links.products.len(),
    ?shape,
    "added package to manifest"
  );

  Ok(PatchOutcome {
    text: current,
    links,
    phase_record,
    shape,
  })
}

struct Pipeline<'a> {
  descriptor: &'a DependencyDescriptor,
  links: &'a PackageLinks,
  /// Set once the frameworks phase step has located its record.
  phase: Option<(String, ShapeKind)>,
}

impl Pipeline<'_> {
  fn run(&mut self, step: Step, text: &str) -> Result<String, PatchError> {
    let d = self.descriptor;
    let links = self.links;
    match step {
      Step::PackageReference => {
        let entry = render::package_reference(&links.package_id, &d.name, &d.url, &d.requirement);
        append_to_section(text, Section::RemotePackageReference, &entry, &d.name)
      }
      Step::ReferenceList => {
        let item = render::package_reference_item(&links.package_id, &d.name);
        extend_package_references(text, &item, &d.name)
      }
      Step::ProductDependencies => {
        let entries: String = links
          .products
          .iter()
          .map(|p| render::product_dependency(&p.dependency_id, &links.package_id, &d.name, &p.product))
          .collect();
        append_to_section(text, Section::PackageProductDependency, &entries, &d.name)
      }
      Step::FrameworksPhase => {
        let phase = locate::build_phase(text).ok_or_else(|| build_phase_not_found(text, &d.name))?;
        debug!(dependency = %d.name, record = %phase.record_id, shape = ?phase.shape, "located frameworks phase");
        let items: Vec<String> = links
          .products
          .iter()
          .map(|p| render::frameworks_item(&p.build_file_id, &p.product))
          .collect();
        let patched = apply_phase_entries(text, &phase, &items, &d.name)?;
        self.phase = Some((phase.record_id, phase.shape));
        Ok(patched)
      }
      Step::BuildFiles => {
        let entries: String = links
          .products
          .iter()
          .map(|p| render::build_file(&p.build_file_id, &p.dependency_id, &p.product))
          .collect();
        append_to_section(text, Section::BuildFile, &entries, &d.name)
      }
    }
  }
}

fn append_to_section(text: &str, section: Section, entry: &str, dependency: &str) -> Result<String, PatchError> {
  let offset = locate::section_end(text, section).ok_or_else(|| PatchError::AnchorNotFound {
    dependency: dependency.to_string(),
    anchor: format!("'{}'", section.end_marker()),
    context: sections_present(text),
  })?;
  splice::insert(text, offset, entry).map_err(|e| conflict(dependency, section, e))
}

fn extend_package_references(text: &str, item: &str, dependency: &str) -> Result<String, PatchError> {
  let list = locate::package_references_list(text).ok_or_else(|| PatchError::AnchorNotFound {
    dependency: dependency.to_string(),
    anchor: "the 'packageReferences = ( ... );' list".to_string(),
    context: section_excerpt(text, Section::Project),
  })?;
  let body = list.body(text);
  let replacement = splice::extend_list_body(body, &[item.to_string()], &list.indent);
  splice::replace_span(text, list.span.clone(), body, &replacement).map_err(|e| conflict(dependency, Section::Project, e))
}

/// List `items` in the phase's `files` list.
///
/// When the list no longer reads as it did when `phase` was located, the
/// list is searched again once by record identifier. If that also fails the
/// anchor is reported as missing.
pub(crate) fn apply_phase_entries(
  text: &str,
  phase: &PhaseMatch,
  items: &[String],
  dependency: &str,
) -> Result<String, PatchError> {
  let replacement = splice::extend_list_body(&phase.body, items, &phase.list.indent);
  let stale = match splice::replace_span(text, phase.list.span.clone(), &phase.body, &replacement) {
    Ok(patched) => return Ok(patched),
    Err(stale) => stale,
  };

  warn!(
    dependency,
    record = %phase.record_id,
    offset = stale.offset,
    "frameworks files list moved, re-locating by record id"
  );

  let not_found = || PatchError::AnchorNotFound {
    dependency: dependency.to_string(),
    anchor: format!("the 'files' list of frameworks phase {}", phase.record_id),
    context: format!(
      "near offset {}:\n{}",
      stale.offset,
      surrounding(text, stale.offset, EXCERPT_LEN / 2)
    ),
  };

  let list = locate::files_list_of_record(text, &phase.record_id).ok_or_else(not_found)?;
  let body = list.body(text);
  let replacement = splice::extend_list_body(body, items, &list.indent);
  splice::replace_span(text, list.span.clone(), body, &replacement).map_err(|_| not_found())
}

fn conflict(dependency: &str, section: Section, e: SpliceConflict) -> PatchError {
  PatchError::SpliceConflict {
    dependency: dependency.to_string(),
    section,
    offset: e.offset,
  }
}

fn build_phase_not_found(text: &str, dependency: &str) -> PatchError {
  let context = match locate::section_bounds(text, Section::FrameworksBuildPhase) {
    Some(_) => section_excerpt(text, Section::FrameworksBuildPhase),
    None => sections_present(text),
  };
  PatchError::AnchorNotFound {
    dependency: dependency.to_string(),
    anchor: "a PBXFrameworksBuildPhase record with a 'files' list".to_string(),
    context,
  }
}

fn sections_present(text: &str) -> String {
  let names = locate::section_names(text);
  if names.is_empty() {
    "no sections found".to_string()
  } else {
    format!("sections present: {}", names.join(", "))
  }
}

fn section_excerpt(text: &str, section: Section) -> String {
  match locate::section_bounds(text, section) {
    Some(bounds) => format!("{} section:\n{}", section, excerpt(text, bounds, EXCERPT_LEN)),
    None => sections_present(text),
  }
}
