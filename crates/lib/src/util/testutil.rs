//! Test utilities for pbxdeps-lib.
//!
//! Fixture manifests shared by unit tests across modules, and shorthand
//! constructors for descriptors.

use crate::dependency::{DependencyDescriptor, Requirement};

/// Well-formed project with no packages and an empty frameworks phase.
pub const MINIMAL: &str = include_str!("../../tests/fixtures/minimal.pbxproj");

/// [`MINIMAL`] with its frameworks phase record missing the `/* Frameworks */` comment.
pub const LOOSE_PHASE: &str = include_str!("../../tests/fixtures/loose_phase.pbxproj");

/// [`MINIMAL`] with Alamofire already added.
pub const WITH_PACKAGE: &str = include_str!("../../tests/fixtures/with_package.pbxproj");

/// `Package.resolved` (v3) pinning Alamofire.
pub const RESOLVED: &str = include_str!("../../tests/fixtures/Package.resolved");

/// An up-to-next-major descriptor for a GitHub-hosted package.
pub fn descriptor(name: &str, products: &[&str]) -> DependencyDescriptor {
  DependencyDescriptor {
    name: name.to_string(),
    url: format!("https://github.com/example/{}", name),
    requirement: Requirement::UpToNextMajor {
      minimum_version: "1.0.0".to_string(),
    },
    products: products.iter().map(|p| p.to_string()).collect(),
  }
}

/// [`descriptor`] with a specific requirement.
pub fn descriptor_with(name: &str, requirement: Requirement, products: &[&str]) -> DependencyDescriptor {
  DependencyDescriptor {
    requirement,
    ..descriptor(name, products)
  }
}
