//! Object identifiers for new manifest entries.
//!
//! Xcode keys every object in `project.pbxproj` by a 24 character uppercase
//! hexadecimal identifier. New identifiers are drawn from v4 UUIDs, which is
//! wide enough that collisions are a practical impossibility; callers that
//! hold the manifest text can still rule out clashes with
//! [`next_unused_id`].

use std::collections::HashSet;
use std::fmt;

use serde::Serialize;
use thiserror::Error;
use uuid::Uuid;

/// Width of a generated identifier.
pub const ID_LEN: usize = 24;

/// Draws [`next_unused_id`] makes before giving up.
pub const MAX_DRAWS: usize = 64;

/// An opaque manifest object identifier.
#[derive(Debug, Clone, PartialEq, Eq, Hash, PartialOrd, Ord, Serialize)]
#[serde(transparent)]
pub struct ObjectId(String);

impl ObjectId {
  pub fn as_str(&self) -> &str {
    &self.0
  }
}

impl fmt::Display for ObjectId {
  fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
    f.write_str(&self.0)
  }
}

impl From<&str> for ObjectId {
  fn from(id: &str) -> Self {
    Self(id.to_string())
  }
}

impl AsRef<str> for ObjectId {
  fn as_ref(&self) -> &str {
    &self.0
  }
}

/// Source of fresh identifiers.
pub trait IdGenerator {
  fn next_id(&mut self) -> ObjectId;
}

/// Random identifiers from v4 UUIDs.
#[derive(Debug, Default, Clone, Copy)]
pub struct RandomIds;

impl IdGenerator for RandomIds {
  fn next_id(&mut self) -> ObjectId {
    let hex = Uuid::new_v4().simple().to_string().to_ascii_uppercase();
    ObjectId(hex[..ID_LEN].to_string())
  }
}

/// Deterministic identifiers, counting up from a seed.
///
/// Used where output must be reproducible, such as tests.
#[derive(Debug, Clone)]
pub struct SequentialIds {
  next: u128,
}

impl SequentialIds {
  pub fn new(seed: u128) -> Self {
    Self { next: seed }
  }
}

impl Default for SequentialIds {
  fn default() -> Self {
    Self::new(0xABC0_0000_0000_0000_0000_0001)
  }
}

impl IdGenerator for SequentialIds {
  fn next_id(&mut self) -> ObjectId {
    let id = format!("{:0width$X}", self.next, width = ID_LEN);
    self.next = self.next.wrapping_add(1);
    ObjectId(id[id.len() - ID_LEN..].to_string())
  }
}

/// The generator kept returning identifiers that were already taken.
#[derive(Debug, Clone, PartialEq, Eq, Error)]
#[error("no unused identifier after {draws} draws")]
pub struct IdsExhausted {
  pub draws: usize,
}

/// Draw identifiers until one occurs neither in `text` nor in `issued`.
///
/// The returned identifier is recorded in `issued`. Gives up after
/// [`MAX_DRAWS`] candidates.
pub fn next_unused_id(
  ids: &mut dyn IdGenerator,
  text: &str,
  issued: &mut HashSet<ObjectId>,
) -> Result<ObjectId, IdsExhausted> {
  for _ in 0..MAX_DRAWS {
    let id = ids.next_id();
    if !issued.contains(&id) && !text.contains(id.as_str()) {
      issued.insert(id.clone());
      return Ok(id);
    }
  }
  Err(IdsExhausted { draws: MAX_DRAWS })
}
