use std::fmt;

use serde::{Deserialize, Serialize};
use thiserror::Error;

/// A Swift package to add to the project.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct DependencyDescriptor {
  /// Display name and lock file identity.
  pub name: String,
  /// Repository URL.
  pub url: String,
  /// Version constraint recorded in the project.
  pub requirement: Requirement,
  /// Products linked into the app target, in order.
  pub products: Vec<String>,
}

/// Version constraint of a package reference.
///
/// Serialized with a `kind` tag using the spellings Xcode writes into
/// `project.pbxproj`.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(tag = "kind")]
pub enum Requirement {
  #[serde(rename = "upToNextMajorVersion", rename_all = "camelCase")]
  UpToNextMajor { minimum_version: String },
  #[serde(rename = "exactVersion")]
  ExactVersion { version: String },
  #[serde(rename = "branch")]
  Branch { branch: String },
  #[serde(rename = "revision")]
  Revision { revision: String },
}

impl Requirement {
  pub const KINDS: [&'static str; 4] = ["upToNextMajorVersion", "exactVersion", "branch", "revision"];

  /// The `kind` tag of this requirement.
  pub fn kind(&self) -> &'static str {
    match self {
      Requirement::UpToNextMajor { .. } => "upToNextMajorVersion",
      Requirement::ExactVersion { .. } => "exactVersion",
      Requirement::Branch { .. } => "branch",
      Requirement::Revision { .. } => "revision",
    }
  }

  /// The single value carried by the requirement (version, branch or revision).
  pub fn value(&self) -> &str {
    match self {
      Requirement::UpToNextMajor { minimum_version } => minimum_version,
      Requirement::ExactVersion { version } => version,
      Requirement::Branch { branch } => branch,
      Requirement::Revision { revision } => revision,
    }
  }

  /// Name of the field holding [`Requirement::value`].
  pub fn value_field(&self) -> &'static str {
    match self {
      Requirement::UpToNextMajor { .. } => "minimumVersion",
      Requirement::ExactVersion { .. } => "version",
      Requirement::Branch { .. } => "branch",
      Requirement::Revision { .. } => "revision",
    }
  }

  /// Version pinned in the lock file, for version-based requirements.
  pub fn pinned_version(&self) -> Option<&str> {
    match self {
      Requirement::UpToNextMajor { minimum_version } => Some(minimum_version),
      Requirement::ExactVersion { version } => Some(version),
      Requirement::Branch { .. } | Requirement::Revision { .. } => None,
    }
  }

  /// The reference a remote lookup would resolve to a revision.
  ///
  /// `None` for `Revision`, which is already exact.
  pub fn lookup_reference(&self) -> Option<&str> {
    match self {
      Requirement::Revision { .. } => None,
      other => Some(other.value()),
    }
  }
}

/// Position (and name, when known) of a descriptor in its input list.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct DescriptorRef {
  pub index: usize,
  pub name: Option<String>,
}

impl DescriptorRef {
  pub fn new(index: usize, name: Option<&str>) -> Self {
    Self {
      index,
      name: name.map(str::to_string),
    }
  }
}

impl fmt::Display for DescriptorRef {
  fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
    match &self.name {
      Some(name) => write!(f, "dependency #{} ('{}')", self.index + 1, name),
      None => write!(f, "dependency #{}", self.index + 1),
    }
  }
}

/// A descriptor failed validation. Nothing has been mutated yet.
#[derive(Debug, Clone, PartialEq, Eq, Error)]
pub enum ValidationError {
  #[error("{at}: missing required field '{field}'")]
  MissingField { at: DescriptorRef, field: &'static str },

  #[error("{at}: field '{field}' must not be empty")]
  EmptyField { at: DescriptorRef, field: &'static str },

  #[error("{at}: 'products' must list at least one product")]
  NoProducts { at: DescriptorRef },

  #[error("{at}: unknown requirement kind '{kind}' (expected one of: {})", Requirement::KINDS.join(", "))]
  UnknownRequirementKind { at: DescriptorRef, kind: String },

  #[error("{at}: requirement of kind '{kind}' is missing '{field}'")]
  MissingRequirementField {
    at: DescriptorRef,
    kind: &'static str,
    field: &'static str,
  },
}

impl DependencyDescriptor {
  /// Check the invariants a typed descriptor can still violate.
  ///
  /// `index` is the descriptor's position in its batch, used for messages.
  pub fn validate(&self, index: usize) -> Result<(), ValidationError> {
    let at = || DescriptorRef::new(index, Some(&self.name).filter(|n| !n.trim().is_empty()).map(|n| n.as_str()));

    if self.name.trim().is_empty() {
      return Err(ValidationError::EmptyField { at: at(), field: "name" });
    }
    if self.url.trim().is_empty() {
      return Err(ValidationError::EmptyField { at: at(), field: "url" });
    }
    if self.requirement.value().trim().is_empty() {
      return Err(ValidationError::MissingRequirementField {
        at: at(),
        kind: self.requirement.kind(),
        field: self.requirement.value_field(),
      });
    }
    if self.products.is_empty() {
      return Err(ValidationError::NoProducts { at: at() });
    }
    if self.products.iter().any(|p| p.trim().is_empty()) {
      return Err(ValidationError::EmptyField {
        at: at(),
        field: "products",
      });
    }
    Ok(())
  }
}

/// Validate a whole batch, failing on the first invalid descriptor.
pub fn validate_all(descriptors: &[DependencyDescriptor]) -> Result<(), ValidationError> {
  descriptors
    .iter()
    .enumerate()
    .try_for_each(|(index, descriptor)| descriptor.validate(index))
}
