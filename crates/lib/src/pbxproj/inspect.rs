//! Structural report of a manifest, for diagnosing anchor failures.

use std::sync::LazyLock;

use regex::Regex;
use serde::Serialize;

use super::Section;
use super::locate::{self, ShapeKind};
use crate::util::text::excerpt;

static PACKAGE_RECORD_RE: LazyLock<Regex> = LazyLock::new(|| {
  Regex::new(r#"(?m)^\s*\w+ /\* XCRemoteSwiftPackageReference "([^"]*)" \*/ = \{"#).expect("package record pattern")
});

const FRAMEWORKS_EXCERPT_LEN: usize = 500;

/// Whether one anchor used by the patch pipeline is present.
#[derive(Debug, Clone, PartialEq, Eq, Serialize)]
pub struct AnchorStatus {
  pub anchor: String,
  pub found: bool,
}

#[derive(Debug, Clone, PartialEq, Eq, Serialize)]
#[serde(rename_all = "camelCase")]
pub struct PhaseSummary {
  pub record_id: String,
  pub shape: ShapeKind,
}

/// What the patch pipeline would see in a manifest.
#[derive(Debug, Clone, PartialEq, Eq, Serialize)]
#[serde(rename_all = "camelCase")]
pub struct ManifestReport {
  /// Section names in file order.
  pub sections: Vec<String>,
  pub anchors: Vec<AnchorStatus>,
  pub build_phase: Option<PhaseSummary>,
  /// Start of the `PBXFrameworksBuildPhase` section content.
  pub frameworks_excerpt: Option<String>,
  /// Names of packages already referenced.
  pub packages: Vec<String>,
}

impl ManifestReport {
  /// True when every anchor is present and a build phase shape matched.
  pub fn is_patchable(&self) -> bool {
    self.anchors.iter().all(|a| a.found) && self.build_phase.is_some()
  }
}

pub fn inspect(text: &str) -> ManifestReport {
  let mut anchors: Vec<AnchorStatus> = Section::REQUIRED
    .iter()
    .map(|section| AnchorStatus {
      anchor: section.end_marker(),
      found: locate::section_end(text, *section).is_some(),
    })
    .collect();
  anchors.push(AnchorStatus {
    anchor: "packageReferences = ( ... );".to_string(),
    found: locate::package_references_list(text).is_some(),
  });

  let build_phase = locate::build_phase(text).map(|phase| PhaseSummary {
    record_id: phase.record_id,
    shape: phase.shape,
  });

  let frameworks_excerpt = locate::section_bounds(text, Section::FrameworksBuildPhase)
    .map(|bounds| excerpt(text, bounds, FRAMEWORKS_EXCERPT_LEN).trim_matches('\n').to_string());

  let packages = locate::section_bounds(text, Section::RemotePackageReference)
    .map(|bounds| {
      PACKAGE_RECORD_RE
        .captures_iter(&text[bounds])
        .map(|caps| caps[1].to_string())
        .collect()
    })
    .unwrap_or_default();

  ManifestReport {
    sections: locate::section_names(text),
    anchors,
    build_phase,
    frameworks_excerpt,
    packages,
  }
}
