//! End-to-end runs of the in-memory pipeline over fixture files.

use pbxdeps_lib::apply::{ApplyError, apply_all};
use pbxdeps_lib::dependency::{
  DependencyDescriptor, DescriptorError, Requirement, ValidationError, load_descriptors, parse_descriptors,
};
use pbxdeps_lib::lock::{MergeOutcome, PLACEHOLDER_REVISION, ResolvedFile};
use pbxdeps_lib::pbxproj::inspect::inspect;
use pbxdeps_lib::pbxproj::link;
use pbxdeps_lib::pbxproj::locate::ShapeKind;

use super::common::{fixture_content, fixture_path};

mod manifest {
  use super::*;

  #[test]
  fn adds_every_dependency_from_file() {
    let descriptors = load_descriptors(&fixture_path("dependencies.json")).unwrap();
    let manifest = fixture_content("minimal.pbxproj");
    let lock = ResolvedFile::parse(&fixture_content("Package.resolved")).unwrap();

    let applied = apply_all(&manifest, &lock, &descriptors).unwrap();

    assert_eq!(applied.report.len(), 2);
    for r in &applied.report {
      link::verify(&applied.manifest, &r.name, &r.links).unwrap();
      assert_eq!(r.shape, ShapeKind::Strict);
    }

    // Nuke has two products, swift-collections one.
    assert_eq!(applied.manifest.matches("isa = XCSwiftPackageProductDependency;").count(), 3);
    assert_eq!(applied.manifest.matches("{isa = PBXBuildFile; productRef = ").count(), 3);
    assert_eq!(inspect(&applied.manifest).packages, vec!["Nuke", "swift-collections"]);
  }

  #[test]
  fn loose_phase_fixture_is_patched() {
    let descriptors = load_descriptors(&fixture_path("dependencies.json")).unwrap();
    let applied = apply_all(&fixture_content("loose_phase.pbxproj"), &ResolvedFile::new(), &descriptors).unwrap();
    assert!(applied.report.iter().all(|r| r.shape == ShapeKind::Loose));
  }

  #[test]
  fn patched_manifest_is_still_patchable() {
    let descriptors = load_descriptors(&fixture_path("dependencies.json")).unwrap();
    let applied = apply_all(&fixture_content("with_package.pbxproj"), &ResolvedFile::new(), &descriptors).unwrap();

    let report = inspect(&applied.manifest);
    assert!(report.is_patchable());
    assert_eq!(report.packages, vec!["Alamofire", "Nuke", "swift-collections"]);
  }
}

mod lock {
  use super::*;

  #[test]
  fn new_pins_carry_placeholder_revision() {
    let descriptors = load_descriptors(&fixture_path("dependencies.json")).unwrap();
    let lock = ResolvedFile::parse(&fixture_content("Package.resolved")).unwrap();
    let applied = apply_all(&fixture_content("minimal.pbxproj"), &lock, &descriptors).unwrap();

    let identities: Vec<&str> = applied.lock.pins.iter().map(|p| p.identity.as_str()).collect();
    assert_eq!(identities, vec!["alamofire", "Nuke", "swift-collections"]);

    let collections = &applied.lock.pins[2];
    assert_eq!(collections.state.branch.as_deref(), Some("main"));
    assert_eq!(collections.state.revision.as_deref(), Some(PLACEHOLDER_REVISION));
    assert!(applied.wrote_placeholders());
  }

  #[test]
  fn rerun_updates_instead_of_duplicating() {
    let descriptors = load_descriptors(&fixture_path("dependencies.json")).unwrap();
    let first = apply_all(&fixture_content("minimal.pbxproj"), &ResolvedFile::new(), &descriptors).unwrap();
    let second = apply_all(&first.manifest, &first.lock, &descriptors).unwrap();

    assert_eq!(second.lock.pins.len(), 2);
    assert!(second.report.iter().all(|r| r.lock == MergeOutcome::Updated));
  }
}

mod failures {
  use super::*;

  #[test]
  fn invalid_descriptor_changes_nothing() {
    let mut descriptors = load_descriptors(&fixture_path("dependencies.json")).unwrap();
    descriptors.push(DependencyDescriptor {
      name: "Bad".to_string(),
      url: "https://example.com/bad".to_string(),
      requirement: Requirement::ExactVersion {
        version: "1.0.0".to_string(),
      },
      products: Vec::new(),
    });
    let manifest = fixture_content("minimal.pbxproj");
    let lock_text = fixture_content("Package.resolved");
    let lock = ResolvedFile::parse(&lock_text).unwrap();

    let err = apply_all(&manifest, &lock, &descriptors).unwrap_err();
    assert!(matches!(err, ApplyError::Validation(ValidationError::NoProducts { .. })));
    assert!(err.to_string().contains("'Bad'"));

    assert_eq!(manifest, fixture_content("minimal.pbxproj"));
    assert_eq!(lock, ResolvedFile::parse(&lock_text).unwrap());
  }

  #[test]
  fn descriptor_file_errors_name_the_entry() {
    let err = parse_descriptors(
      r#"[
        { "name": "Ok", "url": "https://example.com/ok", "requirement": { "kind": "exactVersion", "version": "1.0.0" }, "products": ["Ok"] },
        { "name": "Odd", "url": "https://example.com/odd", "requirement": { "kind": "range", "version": "1.0.0" }, "products": ["Odd"] }
      ]"#,
    )
    .unwrap_err();
    assert!(matches!(
      err,
      DescriptorError::Invalid(ValidationError::UnknownRequirementKind { ref kind, .. }) if kind == "range"
    ));
    assert!(err.to_string().contains("dependency #2 ('Odd')"));
  }
}
