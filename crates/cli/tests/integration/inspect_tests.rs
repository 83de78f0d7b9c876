//! Inspect command integration tests.

use predicates::prelude::*;

use super::common::{TestEnv, fixture_content};

#[test]
fn inspect_lists_sections_and_anchors() {
  let env = TestEnv::from_fixture("minimal.pbxproj");

  env
    .cmd()
    .arg("inspect")
    .assert()
    .success()
    .stdout(predicate::str::contains("XCSwiftPackageProductDependency"))
    .stdout(predicate::str::contains("1D0A5C772B3F4A0100C1D2E3 (strict match)"))
    .stdout(predicate::str::contains("Packages can be added"));
}

#[test]
fn inspect_reports_loose_match() {
  let env = TestEnv::from_fixture("loose_phase.pbxproj");

  env
    .cmd()
    .arg("inspect")
    .assert()
    .success()
    .stdout(predicate::str::contains("(loose match)"));
}

#[test]
fn inspect_json() {
  let env = TestEnv::from_fixture("minimal.pbxproj");

  let output = env.cmd().args(["inspect", "-o", "json"]).output().unwrap();
  assert!(output.status.success());

  let json: serde_json::Value = serde_json::from_slice(&output.stdout).unwrap();
  assert_eq!(json["patchable"], true);
  assert_eq!(json["buildPhase"]["shape"], "strict");
  assert!(json["sections"].as_array().unwrap().len() >= 5);
}

#[test]
fn inspect_flags_missing_anchor() {
  let env = TestEnv::from_fixture("minimal.pbxproj");
  let broken = fixture_content("minimal.pbxproj").replace(
    "/* Begin XCSwiftPackageProductDependency section */\n/* End XCSwiftPackageProductDependency section */\n",
    "",
  );
  env.write_file("Demo.xcodeproj/project.pbxproj", &broken);

  env
    .cmd()
    .arg("inspect")
    .assert()
    .success()
    .stderr(predicate::str::contains("Some anchors are missing"));
}

#[test]
fn inspect_does_not_modify_project() {
  let env = TestEnv::from_fixture("minimal.pbxproj");
  env.cmd().arg("inspect").assert().success();
  assert_eq!(env.manifest(), fixture_content("minimal.pbxproj"));
}
