//! Rendering of new manifest entries.
//!
//! Output follows the layout Xcode writes itself (tab indentation, field
//! order, one-line `PBXBuildFile` records) so a diff against a hand-edited
//! project stays minimal. List items are rendered without indentation or
//! trailing comma; [`super::splice::extend_list_body`] adds both.

use std::borrow::Cow;

use crate::dependency::Requirement;
use crate::ident::ObjectId;

/// Quote a value unless Xcode would write it bare.
///
/// Bare values use only `[A-Za-z0-9_$/:.]` and contain neither `//` nor `___`.
pub fn quote(value: &str) -> Cow<'_, str> {
  let bare = !value.is_empty()
    && value
      .chars()
      .all(|c| c.is_ascii_alphanumeric() || matches!(c, '_' | '$' | '/' | ':' | '.'))
    && !value.contains("//")
    && !value.contains("___");
  if bare {
    return Cow::Borrowed(value);
  }

  let mut quoted = String::with_capacity(value.len() + 2);
  quoted.push('"');
  for c in value.chars() {
    match c {
      '"' => quoted.push_str("\\\""),
      '\\' => quoted.push_str("\\\\"),
      '\n' => quoted.push_str("\\n"),
      '\t' => quoted.push_str("\\t"),
      other => quoted.push(other),
    }
  }
  quoted.push('"');
  Cow::Owned(quoted)
}

/// Text safe to place inside a `/* ... */` comment.
fn comment(text: &str) -> Cow<'_, str> {
  if text.contains("*/") {
    Cow::Owned(text.replace("*/", "* /"))
  } else {
    Cow::Borrowed(text)
  }
}

/// Requirement fields in the order Xcode writes them.
///
/// Every requirement kind has exactly one field set.
pub fn requirement_fields(requirement: &Requirement) -> [(&'static str, &str); 2] {
  match requirement {
    Requirement::UpToNextMajor { minimum_version } => [("kind", "upToNextMajorVersion"), ("minimumVersion", minimum_version)],
    Requirement::ExactVersion { version } => [("kind", "exactVersion"), ("version", version)],
    Requirement::Branch { branch } => [("branch", branch), ("kind", "branch")],
    Requirement::Revision { revision } => [("kind", "revision"), ("revision", revision)],
  }
}

fn package_comment(name: &str) -> String {
  format!("XCRemoteSwiftPackageReference \"{}\"", comment(name))
}

/// An `XCRemoteSwiftPackageReference` record.
pub fn package_reference(id: &ObjectId, name: &str, url: &str, requirement: &Requirement) -> String {
  let mut entry = format!("\t\t{} /* {} */ = {{\n", id, package_comment(name));
  entry.push_str("\t\t\tisa = XCRemoteSwiftPackageReference;\n");
  entry.push_str(&format!("\t\t\trepositoryURL = \"{}\";\n", url.replace('"', "\\\"")));
  entry.push_str("\t\t\trequirement = {\n");
  for (key, value) in requirement_fields(requirement) {
    entry.push_str(&format!("\t\t\t\t{} = {};\n", key, quote(value)));
  }
  entry.push_str("\t\t\t};\n");
  entry.push_str("\t\t};\n");
  entry
}

/// An item of the project's `packageReferences` list.
pub fn package_reference_item(id: &ObjectId, name: &str) -> String {
  format!("{} /* {} */", id, package_comment(name))
}

/// An `XCSwiftPackageProductDependency` record pointing back at its package.
pub fn product_dependency(id: &ObjectId, package_id: &ObjectId, package_name: &str, product: &str) -> String {
  let mut entry = format!("\t\t{} /* {} */ = {{\n", id, comment(product));
  entry.push_str("\t\t\tisa = XCSwiftPackageProductDependency;\n");
  entry.push_str(&format!("\t\t\tpackage = {} /* {} */;\n", package_id, package_comment(package_name)));
  entry.push_str(&format!("\t\t\tproductName = {};\n", quote(product)));
  entry.push_str("\t\t};\n");
  entry
}

/// An item of the frameworks build phase `files` list.
pub fn frameworks_item(build_file_id: &ObjectId, product: &str) -> String {
  format!("{} /* {} in Frameworks */", build_file_id, comment(product))
}

/// A one-line `PBXBuildFile` record linking a product into the build.
pub fn build_file(id: &ObjectId, dependency_id: &ObjectId, product: &str) -> String {
  let product = comment(product);
  format!(
    "\t\t{} /* {} in Frameworks */ = {{isa = PBXBuildFile; productRef = {} /* {} */; }};\n",
    id, product, dependency_id, product
  )
}
