//! Reading, backing up and writing a project on disk.

use std::fs;

use pbxdeps_lib::apply::apply_all;
use pbxdeps_lib::dependency::load_descriptors;
use pbxdeps_lib::lock::ResolvedFile;
use pbxdeps_lib::project::{backup, discover};
use tempfile::TempDir;

use super::common::{fixture_content, fixture_path, make_project};

#[test]
fn full_run_on_disk() {
  let temp = TempDir::new().unwrap();
  let paths = make_project(temp.path(), "minimal.pbxproj", Some("Package.resolved"));
  let paths = discover(Some(paths.xcodeproj.as_path()), temp.path()).unwrap();

  let backups = backup(&paths, &temp.path().join("backups")).unwrap();
  assert_eq!(backups.files.len(), 2);

  let descriptors = load_descriptors(&fixture_path("dependencies.json")).unwrap();
  let manifest = paths.read_manifest().unwrap();
  let lock = ResolvedFile::load_or_new(&paths.resolved).unwrap();
  let applied = apply_all(&manifest, &lock, &descriptors).unwrap();

  paths.write(&applied.manifest, &applied.lock).unwrap();

  let written = paths.read_manifest().unwrap();
  assert!(written.contains("XCRemoteSwiftPackageReference \"Nuke\""));
  assert_eq!(ResolvedFile::load(&paths.resolved).unwrap().unwrap().pins.len(), 3);

  // Backups still hold the originals.
  assert_eq!(fs::read_to_string(&backups.files[0]).unwrap(), fixture_content("minimal.pbxproj"));
}

#[test]
fn missing_lock_file_is_created_at_v2() {
  let temp = TempDir::new().unwrap();
  let paths = make_project(temp.path(), "minimal.pbxproj", None);
  assert!(!paths.resolved.exists());

  let lock = ResolvedFile::load_or_new(&paths.resolved).unwrap();
  let descriptors = load_descriptors(&fixture_path("dependencies.json")).unwrap();
  let applied = apply_all(&paths.read_manifest().unwrap(), &lock, &descriptors).unwrap();
  applied.lock.save(&paths.resolved).unwrap();

  let saved = ResolvedFile::load(&paths.resolved).unwrap().unwrap();
  assert_eq!(saved.version, 2);
  assert_eq!(saved.pins.len(), 2);
}
