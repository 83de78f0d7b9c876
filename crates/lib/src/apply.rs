//! Adding a batch of dependencies to a manifest and its lock file.
//!
//! [`apply_all`] is all-or-nothing: it borrows its inputs and returns new
//! values, so when any dependency fails the caller still holds the original
//! manifest text and lock document, byte for byte.

use std::collections::BTreeMap;

use serde::Serialize;
use thiserror::Error;
use tracing::info;

use crate::dependency::{DependencyDescriptor, ValidationError, validate_all};
use crate::ident::{IdGenerator, RandomIds};
use crate::lock::{MergeOutcome, ResolvedFile, merge_with_revision};
use crate::pbxproj::link::PackageLinks;
use crate::pbxproj::locate::ShapeKind;
use crate::pbxproj::{PatchError, patch_manifest};

/// Extra inputs to [`apply_all_with`].
#[derive(Debug, Clone, Default)]
pub struct ApplyOptions {
  /// Revisions already looked up, keyed by descriptor name.
  pub revisions: BTreeMap<String, String>,
}

/// What was done for one dependency.
#[derive(Debug, Clone, PartialEq, Eq, Serialize)]
#[serde(rename_all = "camelCase")]
pub struct DependencyReport {
  pub name: String,
  pub links: PackageLinks,
  pub phase_record: String,
  pub shape: ShapeKind,
  pub lock: MergeOutcome,
  /// Revision written to a new pin, when one was looked up.
  #[serde(skip_serializing_if = "Option::is_none")]
  pub revision: Option<String>,
}

/// The patched manifest and lock document.
#[derive(Debug, Clone)]
pub struct Applied {
  pub manifest: String,
  pub lock: ResolvedFile,
  /// One entry per descriptor, in input order.
  pub report: Vec<DependencyReport>,
}

impl Applied {
  /// True when a pin was added without a looked-up revision.
  pub fn wrote_placeholders(&self) -> bool {
    self
      .report
      .iter()
      .any(|r| r.lock == MergeOutcome::Added && r.revision.is_none())
  }
}

#[derive(Debug, Error)]
pub enum ApplyError {
  #[error(transparent)]
  Validation(#[from] ValidationError),

  #[error(transparent)]
  Patch(#[from] PatchError),
}

/// Add `descriptors` with random identifiers and placeholder revisions.
pub fn apply_all(
  manifest: &str,
  lock: &ResolvedFile,
  descriptors: &[DependencyDescriptor],
) -> Result<Applied, ApplyError> {
  apply_all_with(manifest, lock, descriptors, &mut RandomIds, &ApplyOptions::default())
}

/// Add `descriptors`, in order, to `manifest` and `lock`.
///
/// All descriptors are validated before anything is patched. Each
/// dependency is fully added to the manifest, then merged into the lock.
pub fn apply_all_with(
  manifest: &str,
  lock: &ResolvedFile,
  descriptors: &[DependencyDescriptor],
  ids: &mut dyn IdGenerator,
  options: &ApplyOptions,
) -> Result<Applied, ApplyError> {
  validate_all(descriptors)?;

  let mut text = manifest.to_string();
  let mut resolved = lock.clone();
  let mut report = Vec::with_capacity(descriptors.len());

  for descriptor in descriptors {
    let outcome = patch_manifest(&text, descriptor, ids)?;
    text = outcome.text;

    let revision = options.revisions.get(&descriptor.name).map(String::as_str);
    let merged = merge_with_revision(&mut resolved.pins, descriptor, revision);

    report.push(DependencyReport {
      name: descriptor.name.clone(),
      links: outcome.links,
      phase_record: outcome.phase_record,
      shape: outcome.shape,
      lock: merged,
      revision: revision.filter(|_| merged == MergeOutcome::Added).map(str::to_string),
    });
  }

  info!(dependencies = report.len(), "applied dependencies");
  Ok(Applied {
    manifest: text,
    lock: resolved,
    report,
  })
}
