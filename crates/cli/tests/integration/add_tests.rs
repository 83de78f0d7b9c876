//! Add command integration tests.

use predicates::prelude::*;

use super::common::{TestEnv, fixture_content};

#[test]
fn add_writes_manifest_and_lock() {
  let env = TestEnv::from_fixture("minimal.pbxproj");

  env
    .cmd()
    .arg("add")
    .assert()
    .success()
    .stdout(predicate::str::contains("Added 2 package(s)"))
    .stderr(predicate::str::contains("placeholder revisions"));

  let manifest = env.manifest();
  assert!(manifest.contains("XCRemoteSwiftPackageReference \"Nuke\""));
  assert!(manifest.contains("XCRemoteSwiftPackageReference \"swift-collections\""));
  assert_eq!(manifest.matches("{isa = PBXBuildFile; productRef = ").count(), 3);

  let lock = env.lock();
  assert_eq!(lock.version, 3);
  assert_eq!(lock.pins.len(), 3);
}

#[test]
fn add_creates_backups() {
  let env = TestEnv::from_fixture("minimal.pbxproj");

  env.cmd().arg("add").assert().success();

  let backups = env.backups_dir();
  assert_eq!(std::fs::read_to_string(backups.join(".gitignore")).unwrap(), "*\n");
  let names: Vec<String> = std::fs::read_dir(&backups)
    .unwrap()
    .map(|e| e.unwrap().file_name().to_string_lossy().into_owned())
    .collect();
  assert!(names.iter().any(|n| n.starts_with("project.pbxproj.")));
  assert!(names.iter().any(|n| n.starts_with("Package.resolved.")));
}

#[test]
fn no_backup_flag_skips_backups() {
  let env = TestEnv::from_fixture("minimal.pbxproj");

  env.cmd().arg("add").arg("--no-backup").assert().success();

  assert!(!env.backups_dir().exists());
}

#[test]
fn dry_run_writes_nothing() {
  let env = TestEnv::from_fixture("minimal.pbxproj");

  env
    .cmd()
    .arg("add")
    .arg("--dry-run")
    .assert()
    .success()
    .stdout(predicate::str::contains("Dry run"))
    .stdout(predicate::str::contains("Would add 2 package(s)"));

  assert_eq!(env.manifest(), fixture_content("minimal.pbxproj"));
  assert_eq!(env.lock().pins.len(), 1);
  assert!(!env.backups_dir().exists());
}

#[test]
fn missing_lock_file_is_created() {
  let env = TestEnv::without_lock("minimal.pbxproj");
  assert!(!env.paths.resolved.exists());

  env.cmd().arg("add").assert().success();

  let lock = env.lock();
  assert_eq!(lock.version, 2);
  assert_eq!(lock.pins.len(), 2);
}

#[test]
fn json_output_reports_each_dependency() {
  let env = TestEnv::from_fixture("loose_phase.pbxproj");

  let output = env.cmd().args(["add", "-o", "json"]).output().unwrap();
  assert!(output.status.success());

  let json: serde_json::Value = serde_json::from_slice(&output.stdout).unwrap();
  assert_eq!(json["dependencies"].as_array().unwrap().len(), 2);
  assert_eq!(json["dependencies"][0]["name"], "Nuke");
  assert_eq!(json["dependencies"][0]["shape"], "loose");
  assert_eq!(json["dependencies"][0]["links"]["products"].as_array().unwrap().len(), 2);
  assert_eq!(json["placeholderRevisions"], true);
  assert_eq!(json["backups"].as_array().unwrap().len(), 2);
}

#[test]
fn explicit_dependency_file() {
  let env = TestEnv::from_fixture("minimal.pbxproj");
  env.write_file(
    "deps/one.json",
    r#"[{ "name": "Kingfisher", "url": "https://github.com/onevcat/Kingfisher.git",
          "requirement": { "kind": "exactVersion", "version": "7.10.0" }, "products": ["Kingfisher"] }]"#,
  );

  env
    .cmd()
    .args(["add", "deps/one.json", "--no-backup"])
    .assert()
    .success()
    .stdout(predicate::str::contains("Added 1 package(s)"));

  assert!(env.manifest().contains("version = 7.10.0;"));
}

#[test]
fn invalid_dependency_file_changes_nothing() {
  let env = TestEnv::from_fixture("minimal.pbxproj");
  env.write_file(
    "dependencies.json",
    r#"[{ "name": "Nuke", "url": "https://github.com/kean/Nuke",
          "requirement": { "kind": "upToNextMajorVersion", "minimumVersion": "12.0.0" } }]"#,
  );

  env
    .cmd()
    .arg("add")
    .assert()
    .failure()
    .stderr(predicate::str::contains("missing required field 'products'"));

  assert_eq!(env.manifest(), fixture_content("minimal.pbxproj"));
  assert!(!env.backups_dir().exists());
}

#[test]
fn missing_anchor_fails_without_writing() {
  let env = TestEnv::from_fixture("minimal.pbxproj");
  let broken = fixture_content("minimal.pbxproj").replace("packageReferences", "packageRefs");
  env.write_file("Demo.xcodeproj/project.pbxproj", &broken);

  env
    .cmd()
    .args(["add", "--no-backup"])
    .assert()
    .failure()
    .stderr(predicate::str::contains("packageReferences"))
    .stderr(predicate::str::contains("'Nuke'"));

  assert_eq!(env.manifest(), broken);
  assert_eq!(env.lock().pins.len(), 1);
}

#[test]
fn project_from_environment() {
  let env = TestEnv::from_fixture("minimal.pbxproj");
  env.write_file("Other.xcodeproj/project.pbxproj", &fixture_content("minimal.pbxproj"));

  env
    .cmd()
    .args(["add", "--no-backup"])
    .assert()
    .failure()
    .stderr(predicate::str::contains("more than one .xcodeproj"));

  env
    .cmd()
    .args(["add", "--no-backup"])
    .env("PBXDEPS_PROJECT", "Other.xcodeproj")
    .assert()
    .success();

  assert_eq!(env.manifest(), fixture_content("minimal.pbxproj"));
  let other = std::fs::read_to_string(env.temp.path().join("Other.xcodeproj/project.pbxproj")).unwrap();
  assert!(other.contains("XCRemoteSwiftPackageReference \"Nuke\""));
}

#[test]
fn project_flag() {
  let env = TestEnv::from_fixture("minimal.pbxproj");
  env.write_file("Other.xcodeproj/project.pbxproj", &fixture_content("minimal.pbxproj"));

  env
    .cmd()
    .args(["add", "--no-backup", "--project", "Demo.xcodeproj"])
    .env("PBXDEPS_PROJECT", "Other.xcodeproj")
    .assert()
    .success();

  assert!(env.manifest().contains("XCRemoteSwiftPackageReference \"Nuke\""));
}
