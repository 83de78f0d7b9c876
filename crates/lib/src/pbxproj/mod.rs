//! Anchor-based patching of `project.pbxproj`.
//!
//! The manifest is never parsed into a tree. Instead the engine finds
//! textual anchors (section markers, list clauses, record shapes), renders
//! new entries in Xcode's own layout, and splices them into the text while
//! leaving every other byte untouched.
//!
//! # Modules
//!
//! - [`locate`] - Finding section markers and list boundaries
//! - [`render`] - Rendering new entries for each section kind
//! - [`splice`] - Pure text insertion and verified replacement
//! - [`link`] - Minting identifiers and verifying the cross-reference chain
//! - [`patch`] - The ordered per-dependency pipeline
//! - [`inspect`] - Diagnostic report of a manifest's structure

pub mod inspect;
pub mod link;
pub mod locate;
pub mod patch;
pub mod render;
pub mod splice;

use std::fmt;

use serde::Serialize;
use thiserror::Error;

use crate::ident::IdsExhausted;

pub use patch::{PatchOutcome, Step, patch_manifest};

/// Manifest sections touched when adding a package.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize)]
pub enum Section {
  BuildFile,
  FrameworksBuildPhase,
  Project,
  RemotePackageReference,
  PackageProductDependency,
}

impl Section {
  /// Sections that must exist for a package to be added.
  pub const REQUIRED: [Section; 5] = [
    Section::BuildFile,
    Section::FrameworksBuildPhase,
    Section::Project,
    Section::RemotePackageReference,
    Section::PackageProductDependency,
  ];

  /// The `isa` name Xcode uses for the section.
  pub fn isa(self) -> &'static str {
    match self {
      Section::BuildFile => "PBXBuildFile",
      Section::FrameworksBuildPhase => "PBXFrameworksBuildPhase",
      Section::Project => "PBXProject",
      Section::RemotePackageReference => "XCRemoteSwiftPackageReference",
      Section::PackageProductDependency => "XCSwiftPackageProductDependency",
    }
  }

  pub fn begin_marker(self) -> String {
    format!("/* Begin {} section */", self.isa())
  }

  pub fn end_marker(self) -> String {
    format!("/* End {} section */", self.isa())
  }
}

impl fmt::Display for Section {
  fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
    f.write_str(self.isa())
  }
}

/// Errors raised while patching the manifest.
///
/// Every variant carries enough context (dependency, anchor, surrounding
/// text) to fix the manifest by hand.
#[derive(Debug, Clone, PartialEq, Eq, Error)]
pub enum PatchError {
  /// A required marker or list could not be found by any known pattern.
  #[error("could not find {anchor} while adding '{dependency}'\n{context}")]
  AnchorNotFound {
    dependency: String,
    anchor: String,
    context: String,
  },

  /// A previously located region no longer matches the text verbatim.
  #[error("{section} changed since it was located (offset {offset}) while adding '{dependency}'")]
  SpliceConflict {
    dependency: String,
    section: Section,
    offset: usize,
  },

  /// No identifier could be drawn that the manifest does not already use.
  #[error("could not draw identifiers for '{dependency}': {source}")]
  IdsExhausted {
    dependency: String,
    #[source]
    source: IdsExhausted,
  },

  /// The patched text is missing one of the entries that must reference each other.
  #[error("incomplete entries for '{dependency}': {missing}")]
  BrokenChain { dependency: String, missing: String },
}
