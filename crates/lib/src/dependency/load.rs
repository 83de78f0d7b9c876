//! Descriptor file parsing.
//!
//! Descriptor files are JSON arrays. Every entry is read into a loose
//! representation first so that a missing field is reported as a
//! [`ValidationError`] naming the field, rather than as a serde error.
//!
//! ```json
//! [
//!   {
//!     "name": "Alamofire",
//!     "url": "https://github.com/Alamofire/Alamofire",
//!     "requirement": { "kind": "upToNextMajorVersion", "minimumVersion": "5.8.0" },
//!     "products": ["Alamofire"]
//!   }
//! ]
//! ```

use std::fs;
use std::io;
use std::path::{Path, PathBuf};

use serde::Deserialize;
use thiserror::Error;
use tracing::debug;

use super::types::{DependencyDescriptor, DescriptorRef, Requirement, ValidationError};

/// Errors that can occur while loading a descriptor file.
#[derive(Debug, Error)]
pub enum DescriptorError {
  #[error("failed to read dependency file '{path}': {source}")]
  Read {
    path: PathBuf,
    #[source]
    source: io::Error,
  },

  #[error("failed to parse dependency list: {0}")]
  Parse(#[source] serde_json::Error),

  #[error(transparent)]
  Invalid(#[from] ValidationError),
}

#[derive(Debug, Deserialize)]
struct RawDescriptor {
  name: Option<String>,
  url: Option<String>,
  requirement: Option<RawRequirement>,
  products: Option<Vec<String>>,
}

#[derive(Debug, Deserialize)]
#[serde(rename_all = "camelCase")]
struct RawRequirement {
  kind: Option<String>,
  minimum_version: Option<String>,
  version: Option<String>,
  branch: Option<String>,
  revision: Option<String>,
}

impl RawRequirement {
  fn into_requirement(self, at: &DescriptorRef) -> Result<Requirement, ValidationError> {
    let kind = self.kind.ok_or_else(|| ValidationError::MissingRequirementField {
      at: at.clone(),
      kind: "<unspecified>",
      field: "kind",
    })?;

    let missing = |kind: &'static str, field: &'static str| ValidationError::MissingRequirementField {
      at: at.clone(),
      kind,
      field,
    };

    match kind.as_str() {
      "upToNextMajorVersion" => Ok(Requirement::UpToNextMajor {
        minimum_version: self
          .minimum_version
          .ok_or_else(|| missing("upToNextMajorVersion", "minimumVersion"))?,
      }),
      "exactVersion" => Ok(Requirement::ExactVersion {
        version: self.version.ok_or_else(|| missing("exactVersion", "version"))?,
      }),
      "branch" => Ok(Requirement::Branch {
        branch: self.branch.ok_or_else(|| missing("branch", "branch"))?,
      }),
      "revision" => Ok(Requirement::Revision {
        revision: self.revision.ok_or_else(|| missing("revision", "revision"))?,
      }),
      _ => Err(ValidationError::UnknownRequirementKind { at: at.clone(), kind }),
    }
  }
}

impl RawDescriptor {
  fn into_descriptor(self, index: usize) -> Result<DependencyDescriptor, ValidationError> {
    let at = DescriptorRef::new(index, self.name.as_deref());
    let missing = |field| ValidationError::MissingField { at: at.clone(), field };

    let name = self.name.ok_or_else(|| missing("name"))?;
    let url = self.url.ok_or_else(|| missing("url"))?;
    let requirement = self.requirement.ok_or_else(|| missing("requirement"))?;
    let products = self.products.ok_or_else(|| missing("products"))?;
    let requirement = requirement.into_requirement(&at)?;

    let descriptor = DependencyDescriptor {
      name,
      url,
      requirement,
      products,
    };
    descriptor.validate(index)?;
    Ok(descriptor)
  }
}

/// Parse and validate a JSON descriptor list.
///
/// Validation is all-or-nothing: the first invalid entry fails the whole list.
pub fn parse_descriptors(json: &str) -> Result<Vec<DependencyDescriptor>, DescriptorError> {
  let raw: Vec<RawDescriptor> = serde_json::from_str(json).map_err(DescriptorError::Parse)?;
  let descriptors = raw
    .into_iter()
    .enumerate()
    .map(|(index, raw)| raw.into_descriptor(index))
    .collect::<Result<Vec<_>, _>>()?;
  debug!(count = descriptors.len(), "parsed dependency descriptors");
  Ok(descriptors)
}

/// Read and validate a descriptor file.
pub fn load_descriptors(path: &Path) -> Result<Vec<DependencyDescriptor>, DescriptorError> {
  let content = fs::read_to_string(path).map_err(|source| DescriptorError::Read {
    path: path.to_path_buf(),
    source,
  })?;
  parse_descriptors(&content)
}
