//! The SwiftPM lock file, `Package.resolved`.
//!
//! Xcode keeps it at
//! `<Project>.xcodeproj/project.xcworkspace/xcshareddata/swiftpm/Package.resolved`
//! and pins every package to a revision.
//!
//! # Lock File Format
//!
//! ```json
//! {
//!   "originHash" : "2b1c0e8f...",
//!   "pins" : [
//!     {
//!       "identity" : "alamofire",
//!       "kind" : "remoteSourceControl",
//!       "location" : "https://github.com/Alamofire/Alamofire.git",
//!       "state" : {
//!         "revision" : "e16d3481...",
//!         "version" : "5.8.1"
//!       }
//!     }
//!   ],
//!   "version" : 3
//! }
//! ```
//!
//! Keys this crate does not model are kept as they were read.

pub mod merge;

use std::fs;
use std::io;
use std::path::Path;

use serde::{Deserialize, Serialize};
use serde_json::{Map, Value};
use thiserror::Error;

pub use merge::{MergeOutcome, find_pin, merge, merge_with_revision, new_pin};

/// Format versions this crate reads and writes.
pub const SUPPORTED_VERSIONS: [u32; 2] = [2, 3];

/// Version used when there is no lock file yet.
pub const DEFAULT_VERSION: u32 = 2;

/// `kind` of every pin this crate writes.
pub const PIN_KIND_REMOTE: &str = "remoteSourceControl";

/// Revision written when the real one is not known. Xcode replaces it on the
/// next package resolution.
pub const PLACEHOLDER_REVISION: &str = "placeholder-revision-hash";

/// The whole `Package.resolved` document.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct ResolvedFile {
  #[serde(default, skip_serializing_if = "Option::is_none")]
  pub origin_hash: Option<String>,
  #[serde(default)]
  pub pins: Vec<Pin>,
  pub version: u32,
  #[serde(flatten)]
  pub extra: Map<String, Value>,
}

/// One pinned package.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct Pin {
  pub identity: String,
  pub kind: String,
  pub location: String,
  pub state: PinState,
  #[serde(flatten)]
  pub extra: Map<String, Value>,
}

/// Where a pin points. Which fields are set depends on the requirement.
#[derive(Debug, Clone, Default, PartialEq, Serialize, Deserialize)]
pub struct PinState {
  #[serde(default, skip_serializing_if = "Option::is_none")]
  pub branch: Option<String>,
  #[serde(default, skip_serializing_if = "Option::is_none")]
  pub revision: Option<String>,
  #[serde(default, skip_serializing_if = "Option::is_none")]
  pub version: Option<String>,
  #[serde(flatten)]
  pub extra: Map<String, Value>,
}

/// Errors that can occur when working with the lock file.
#[derive(Debug, Error)]
pub enum LockError {
  #[error("failed to read lock file: {0}")]
  Read(#[source] io::Error),

  #[error("failed to write lock file: {0}")]
  Write(#[source] io::Error),

  #[error("failed to parse lock file: {0}")]
  Parse(#[source] serde_json::Error),

  #[error("failed to serialize lock file: {0}")]
  Serialize(#[source] serde_json::Error),

  #[error("unsupported lock file version {0}, expected one of {SUPPORTED_VERSIONS:?}")]
  UnsupportedVersion(u32),
}

impl Default for ResolvedFile {
  fn default() -> Self {
    Self::new()
  }
}

impl ResolvedFile {
  /// An empty lock file at [`DEFAULT_VERSION`].
  pub fn new() -> Self {
    Self {
      origin_hash: None,
      pins: Vec::new(),
      version: DEFAULT_VERSION,
      extra: Map::new(),
    }
  }

  /// Parse a lock file, rejecting unsupported versions.
  pub fn parse(content: &str) -> Result<Self, LockError> {
    let resolved: ResolvedFile = serde_json::from_str(content).map_err(LockError::Parse)?;
    if !SUPPORTED_VERSIONS.contains(&resolved.version) {
      return Err(LockError::UnsupportedVersion(resolved.version));
    }
    Ok(resolved)
  }

  /// Load a lock file from the given path.
  ///
  /// Returns `Ok(None)` if the file doesn't exist.
  pub fn load(path: &Path) -> Result<Option<Self>, LockError> {
    let content = match fs::read_to_string(path) {
      Ok(content) => content,
      Err(e) if e.kind() == io::ErrorKind::NotFound => return Ok(None),
      Err(e) => return Err(LockError::Read(e)),
    };
    Self::parse(&content).map(Some)
  }

  /// Load a lock file, or start an empty one if it doesn't exist.
  pub fn load_or_new(path: &Path) -> Result<Self, LockError> {
    Ok(Self::load(path)?.unwrap_or_default())
  }

  /// Pretty-printed JSON with a trailing newline.
  pub fn to_json(&self) -> Result<String, LockError> {
    let mut content = serde_json::to_string_pretty(self).map_err(LockError::Serialize)?;
    content.push('\n');
    Ok(content)
  }

  /// Save the lock file, creating parent directories as needed.
  pub fn save(&self, path: &Path) -> Result<(), LockError> {
    let content = self.to_json()?;
    if let Some(parent) = path.parent() {
      fs::create_dir_all(parent).map_err(LockError::Write)?;
    }
    fs::write(path, content).map_err(LockError::Write)?;
    Ok(())
  }
}
