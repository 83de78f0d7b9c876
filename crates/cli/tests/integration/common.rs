//! Shared test helpers for CLI integration tests.

use std::path::PathBuf;

use assert_cmd::Command;
use assert_cmd::cargo::cargo_bin_cmd;
use pbxdeps_lib::consts::PROJECT_ENV;
use pbxdeps_lib::lock::ResolvedFile;
use pbxdeps_lib::project::ProjectPaths;
use tempfile::TempDir;

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

/// Isolated working directory holding one Xcode project.
///
/// Layout:
/// - `Demo.xcodeproj/project.pbxproj`
/// - `Demo.xcodeproj/project.xcworkspace/xcshareddata/swiftpm/Package.resolved` (optional)
/// - `dependencies.json`
pub struct TestEnv {
  pub temp: TempDir,
  pub paths: ProjectPaths,
}

impl TestEnv {
  /// Create from a manifest fixture, with the fixture `Package.resolved`.
  pub fn from_fixture(manifest: &str) -> Self {
    let env = Self::without_lock(manifest);
    env.write_file(
      "Demo.xcodeproj/project.xcworkspace/xcshareddata/swiftpm/Package.resolved",
      &fixture_content("Package.resolved"),
    );
    env
  }

  /// Create from a manifest fixture with no lock file yet.
  pub fn without_lock(manifest: &str) -> Self {
    let temp = TempDir::new().unwrap();
    let root = dunce::canonicalize(temp.path()).unwrap_or_else(|_| temp.path().to_path_buf());
    let env = Self {
      paths: ProjectPaths::new(root.join("Demo.xcodeproj")),
      temp,
    };
    env.write_file("Demo.xcodeproj/project.pbxproj", &fixture_content(manifest));
    env.write_file("dependencies.json", &fixture_content("dependencies.json"));
    env
  }

  /// Write a file relative to the temp directory.
  pub fn write_file(&self, relative_path: &str, content: &str) {
    let path = self.temp.path().join(relative_path);
    if let Some(parent) = path.parent() {
      std::fs::create_dir_all(parent).unwrap();
    }
    std::fs::write(&path, content).unwrap();
  }

  pub fn manifest(&self) -> String {
    std::fs::read_to_string(&self.paths.manifest).unwrap()
  }

  pub fn lock(&self) -> ResolvedFile {
    ResolvedFile::load(&self.paths.resolved).unwrap().unwrap()
  }

  pub fn backups_dir(&self) -> PathBuf {
    self.temp.path().join("backups")
  }

  /// Get a Command for the pbxdeps binary, run inside the temp directory.
  pub fn cmd(&self) -> Command {
    let mut cmd: Command = cargo_bin_cmd!("pbxdeps");
    cmd.current_dir(self.temp.path());
    cmd.env_remove(PROJECT_ENV);
    cmd.env_remove("RUST_LOG");
    cmd
  }
}
