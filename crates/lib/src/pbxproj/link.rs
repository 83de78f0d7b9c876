//! Identifier wiring between the entries of one package.
//!
//! Adding a package creates, per product, a chain of records that refer to
//! each other by identifier:
//!
//! ```text
//! files list item ──> PBXBuildFile ──productRef──> XCSwiftPackageProductDependency
//!                                                        │ package
//!                                                        v
//!                     packageReferences item ──> XCRemoteSwiftPackageReference
//! ```
//!
//! [`PackageLinks::mint`] draws every identifier up front, before any text
//! is rendered, so each pipeline step only has to render what it is given.
//! [`verify`] checks the finished text for every link.

use std::collections::HashSet;

use serde::Serialize;

use super::locate::{self, ListMatch};
use super::{PatchError, Section};
use crate::dependency::DependencyDescriptor;
use crate::ident::{IdGenerator, ObjectId, next_unused_id};

/// Identifiers for one product of a package.
#[derive(Debug, Clone, PartialEq, Eq, Serialize)]
#[serde(rename_all = "camelCase")]
pub struct ProductLinks {
  pub product: String,
  /// The `XCSwiftPackageProductDependency` record.
  pub dependency_id: ObjectId,
  /// The `PBXBuildFile` record, also listed in the frameworks phase.
  pub build_file_id: ObjectId,
}

/// Identifiers for a package and all of its products.
#[derive(Debug, Clone, PartialEq, Eq, Serialize)]
#[serde(rename_all = "camelCase")]
pub struct PackageLinks {
  pub package_id: ObjectId,
  pub products: Vec<ProductLinks>,
}

impl PackageLinks {
  /// Draw fresh identifiers for `descriptor`, none of which occur in `text`.
  pub fn mint(
    descriptor: &DependencyDescriptor,
    ids: &mut dyn IdGenerator,
    text: &str,
  ) -> Result<Self, PatchError> {
    let mut issued = HashSet::new();
    let mut draw = || {
      next_unused_id(ids, text, &mut issued).map_err(|source| PatchError::IdsExhausted {
        dependency: descriptor.name.clone(),
        source,
      })
    };
    let package_id = draw()?;
    let products = descriptor
      .products
      .iter()
      .map(|product| {
        Ok(ProductLinks {
          product: product.clone(),
          dependency_id: draw()?,
          build_file_id: draw()?,
        })
      })
      .collect::<Result<_, PatchError>>()?;
    Ok(Self { package_id, products })
  }
}

/// The record keyed by `id` inside `section`, through its closing brace.
///
/// The header comment and the body are skipped as text, so a product
/// named `Core};Extra` does not cut the record short.
fn record<'a>(section: &'a str, id: &ObjectId) -> Option<&'a str> {
  let key = format!("{} /*", id);
  let start = section.find(&key)?;
  let header_end = start + key.len() + section[start + key.len()..].find("*/")? + 2;
  let open = header_end + section[header_end..].find('{')?;
  let close = locate::find_record_close(section, open + 1)?;
  Some(&section[start..=close])
}

fn section<'a>(text: &'a str, section: Section) -> Option<&'a str> {
  locate::section_bounds(text, section).map(|bounds| &text[bounds])
}

fn list_contains(text: &str, list: Option<ListMatch>, id: &ObjectId) -> bool {
  list.is_some_and(|list| list.body(text).contains(&format!("{} /*", id)))
}

/// Check that every link of `links` is present in `text`.
///
/// Fails with [`PatchError::BrokenChain`] naming the first missing link.
pub fn verify(text: &str, dependency: &str, links: &PackageLinks) -> Result<(), PatchError> {
  let broken = |missing: String| PatchError::BrokenChain {
    dependency: dependency.to_string(),
    missing,
  };

  let packages = section(text, Section::RemotePackageReference).unwrap_or_default();
  if record(packages, &links.package_id).is_none() {
    return Err(broken(format!("package reference {}", links.package_id)));
  }
  if !list_contains(text, locate::package_references_list(text), &links.package_id) {
    return Err(broken(format!("packageReferences item {}", links.package_id)));
  }

  let dependencies = section(text, Section::PackageProductDependency).unwrap_or_default();
  let build_files = section(text, Section::BuildFile).unwrap_or_default();
  let phase = locate::build_phase(text);

  for product in &links.products {
    let package_ref = format!("package = {} /*", links.package_id);
    if !record(dependencies, &product.dependency_id).is_some_and(|r| r.contains(&package_ref)) {
      return Err(broken(format!(
        "product dependency {} ({}) referencing package {}",
        product.dependency_id, product.product, links.package_id
      )));
    }

    let product_ref = format!("productRef = {} /*", product.dependency_id);
    if !record(build_files, &product.build_file_id).is_some_and(|r| r.contains(&product_ref)) {
      return Err(broken(format!(
        "build file {} ({}) referencing product dependency {}",
        product.build_file_id, product.product, product.dependency_id
      )));
    }

    if !list_contains(text, phase.as_ref().map(|p| p.list.clone()), &product.build_file_id) {
      return Err(broken(format!(
        "frameworks phase item {} ({})",
        product.build_file_id, product.product
      )));
    }
  }

  Ok(())
}
