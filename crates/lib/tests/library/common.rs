//! Shared helpers for library integration tests.

use std::path::{Path, PathBuf};

use pbxdeps_lib::project::ProjectPaths;

/// Get path to a fixture file.
pub fn fixture_path(name: &str) -> PathBuf {
  PathBuf::from(env!("CARGO_MANIFEST_DIR"))
    .join("tests")
    .join("fixtures")
    .join(name)
}

/// Read fixture content.
pub fn fixture_content(name: &str) -> String {
  std::fs::read_to_string(fixture_path(name)).unwrap_or_else(|e| panic!("Failed to load fixture {}: {}", name, e))
}

/// Lay out `Demo.xcodeproj` under `root` from fixtures.
///
/// `resolved` is copied to the lock file location when given.
pub fn make_project(root: &Path, manifest: &str, resolved: Option<&str>) -> ProjectPaths {
  let paths = ProjectPaths::new(root.join("Demo.xcodeproj"));
  std::fs::create_dir_all(&paths.xcodeproj).unwrap();
  std::fs::write(&paths.manifest, fixture_content(manifest)).unwrap();
  if let Some(resolved) = resolved {
    std::fs::create_dir_all(paths.resolved.parent().unwrap()).unwrap();
    std::fs::write(&paths.resolved, fixture_content(resolved)).unwrap();
  }
  paths
}
