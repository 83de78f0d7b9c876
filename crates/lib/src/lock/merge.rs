//! Insert-or-update of a dependency's pin.

use serde::Serialize;
use serde_json::Map;
use tracing::{debug, info};

use super::{PIN_KIND_REMOTE, PLACEHOLDER_REVISION, Pin, PinState};
use crate::dependency::{DependencyDescriptor, Requirement};

/// What merging did to the pin list.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize)]
#[serde(rename_all = "lowercase")]
pub enum MergeOutcome {
  Added,
  Updated,
}

/// Index of the pin matching `descriptor`.
///
/// A pin matches when its identity equals the descriptor's name, or its
/// location equals the descriptor's URL, ignoring ASCII case.
pub fn find_pin(pins: &[Pin], descriptor: &DependencyDescriptor) -> Option<usize> {
  pins.iter().position(|pin| {
    pin.identity.eq_ignore_ascii_case(&descriptor.name) || pin.location.eq_ignore_ascii_case(&descriptor.url)
  })
}

/// A fresh pin for `descriptor`.
///
/// `resolved` is the revision the requirement points at, if it was looked
/// up; otherwise [`PLACEHOLDER_REVISION`] is written.
pub fn new_pin(descriptor: &DependencyDescriptor, resolved: Option<&str>) -> Pin {
  let revision = resolved.unwrap_or(PLACEHOLDER_REVISION).to_string();
  let state = match &descriptor.requirement {
    Requirement::UpToNextMajor { minimum_version: version } | Requirement::ExactVersion { version } => PinState {
      revision: Some(revision),
      version: Some(version.clone()),
      ..PinState::default()
    },
    Requirement::Branch { branch } => PinState {
      branch: Some(branch.clone()),
      revision: Some(revision),
      ..PinState::default()
    },
    Requirement::Revision { revision } => PinState {
      revision: Some(revision.clone()),
      ..PinState::default()
    },
  };

  Pin {
    identity: descriptor.name.clone(),
    kind: PIN_KIND_REMOTE.to_string(),
    location: descriptor.url.clone(),
    state,
    extra: Map::new(),
  }
}

/// [`merge_with_revision`] without a looked-up revision.
pub fn merge(pins: &mut Vec<Pin>, descriptor: &DependencyDescriptor) -> MergeOutcome {
  merge_with_revision(pins, descriptor, None)
}

/// Add a pin for `descriptor`, or update the one already there.
///
/// An existing pin gets the descriptor's name and URL as identity and
/// location. Its state and any other fields are left alone.
pub fn merge_with_revision(
  pins: &mut Vec<Pin>,
  descriptor: &DependencyDescriptor,
  resolved: Option<&str>,
) -> MergeOutcome {
  if let Some(index) = find_pin(pins, descriptor) {
    let pin = &mut pins[index];
    info!(
      dependency = %descriptor.name,
      previous_identity = %pin.identity,
      previous_location = %pin.location,
      "updating existing pin"
    );
    pin.identity = descriptor.name.clone();
    pin.location = descriptor.url.clone();
    return MergeOutcome::Updated;
  }

  let pin = new_pin(descriptor, resolved);
  debug!(dependency = %descriptor.name, revision = ?pin.state.revision, "adding pin");
  pins.push(pin);
  MergeOutcome::Added
}
