//! Anchor search over the raw manifest text.
//!
//! All offsets returned here are byte offsets into the text that was
//! searched. They are only valid for that exact snapshot: callers locate,
//! splice once, and locate again against the new text.
//!
//! # Build phase shapes
//!
//! The `files = ( ... );` list of the frameworks build phase is found with
//! one of two [`PhaseShape`]s, tried in order:
//!
//! - [`StrictShape`]: `<ID> /* Frameworks */ = { isa = PBXFrameworksBuildPhase; ... files = (`
//! - [`LooseShape`]: any record whose `isa` is `PBXFrameworksBuildPhase`,
//!   with or without a comment and with fields in any order.
//!
//! The first shape that matches wins, even when a later one would match a
//! different record.

use std::ops::Range;
use std::sync::LazyLock;

use regex::Regex;
use serde::Serialize;

use super::Section;
use crate::util::text::line_indent;

static SECTION_BEGIN_RE: LazyLock<Regex> =
  LazyLock::new(|| Regex::new(r"/\* Begin (\w+) section \*/").expect("section marker pattern"));

static PACKAGE_REFERENCES_RE: LazyLock<Regex> =
  LazyLock::new(|| Regex::new(r"\bpackageReferences\s*=\s*\(").expect("packageReferences pattern"));

static STRICT_PHASE_RE: LazyLock<Regex> = LazyLock::new(|| {
  Regex::new(
    r"\b([A-F0-9]+)\s+/\*\s*Frameworks\s*\*/\s+=\s+\{\s*isa\s+=\s+PBXFrameworksBuildPhase;[^{]*?(?P<files>files)\s+=\s+\(",
  )
  .expect("strict build phase pattern")
});

static LOOSE_PHASE_RE: LazyLock<Regex> = LazyLock::new(|| {
  Regex::new(
    r"\b(\w+)\s*(?:/\*[^*]*\*/\s*)?=\s*\{[^{}]*?\bisa\s*=\s*PBXFrameworksBuildPhase\s*;[^{}]*?\b(?P<files>files)\s*=\s*\(",
  )
  .expect("loose build phase pattern")
});

/// Names of all sections present, in file order.
pub fn section_names(text: &str) -> Vec<String> {
  SECTION_BEGIN_RE
    .captures_iter(text)
    .map(|caps| caps[1].to_string())
    .collect()
}

/// Content between a section's begin and end markers.
pub fn section_bounds(text: &str, section: Section) -> Option<Range<usize>> {
  let begin = section.begin_marker();
  let start = text.find(&begin)? + begin.len();
  let end = start + text[start..].find(&section.end_marker())?;
  Some(start..end)
}

/// Offset of a section's end marker, where appended entries go.
pub fn section_end(text: &str, section: Section) -> Option<usize> {
  text.find(&section.end_marker())
}

/// A parenthesized list clause such as `files = ( ... );`.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct ListMatch {
  /// The list body: just after `(` up to, not including, `)`.
  pub span: Range<usize>,
  /// Indentation of the line holding the clause's key.
  pub indent: String,
}

impl ListMatch {
  pub fn body<'a>(&self, text: &'a str) -> &'a str {
    &text[self.span.clone()]
  }

  pub fn is_empty_in(&self, text: &str) -> bool {
    self.body(text).trim().is_empty()
  }
}

/// Build a [`ListMatch`] for a clause whose key starts at `key_start` and
/// whose opening parenthesis ends at `open`.
fn list_at(text: &str, key_start: usize, open: usize) -> Option<ListMatch> {
  let close = find_list_close(text, open)?;
  Some(ListMatch {
    span: open..close,
    indent: line_indent(text, key_start).to_string(),
  })
}

/// Find the `)` closing a list whose body starts at `from`.
///
/// Comments and quoted strings are skipped, so a `)` inside
/// `/* Foo (beta) */` does not end the list.
pub fn find_list_close(text: &str, from: usize) -> Option<usize> {
  find_close(text, from, b'(', b')')
}

/// Find the `}` closing a record whose body starts at `from`.
///
/// Skips comments and quoted strings like [`find_list_close`].
pub fn find_record_close(text: &str, from: usize) -> Option<usize> {
  find_close(text, from, b'{', b'}')
}

fn find_close(text: &str, from: usize, open: u8, close: u8) -> Option<usize> {
  let bytes = text.as_bytes();
  let mut depth = 0usize;
  let mut i = from;

  while i < bytes.len() {
    match bytes[i] {
      b'/' if bytes.get(i + 1) == Some(&b'*') => {
        let end = text[i + 2..].find("*/")?;
        i += 2 + end + 2;
        continue;
      }
      b'"' => {
        i += 1;
        while i < bytes.len() && bytes[i] != b'"' {
          i += if bytes[i] == b'\\' { 2 } else { 1 };
        }
      }
      b if b == open => depth += 1,
      b if b == close && depth == 0 => return Some(i),
      b if b == close => depth -= 1,
      _ => {}
    }
    i += 1;
  }
  None
}

/// The `packageReferences = ( ... );` list of the project object.
pub fn package_references_list(text: &str) -> Option<ListMatch> {
  let m = PACKAGE_REFERENCES_RE.find(text)?;
  list_at(text, m.start(), m.end())
}

/// Which pattern located the build phase.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize)]
#[serde(rename_all = "lowercase")]
pub enum ShapeKind {
  Strict,
  Loose,
}

impl ShapeKind {
  pub fn as_str(self) -> &'static str {
    match self {
      ShapeKind::Strict => "strict",
      ShapeKind::Loose => "loose",
    }
  }
}

/// A build phase record found inside a section's text.
///
/// Offsets are relative to the text handed to [`PhaseShape::find`].
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct ShapeMatch {
  pub record_id: String,
  /// Start of the `files` key.
  pub files_key: usize,
  /// Just after the list's opening parenthesis.
  pub list_open: usize,
}

/// One way of recognizing a frameworks build phase record.
pub trait PhaseShape {
  fn kind(&self) -> ShapeKind;

  /// Find the first matching record in the section content.
  fn find(&self, section: &str) -> Option<ShapeMatch>;
}

fn match_with(re: &Regex, section: &str) -> Option<ShapeMatch> {
  let caps = re.captures(section)?;
  Some(ShapeMatch {
    record_id: caps.get(1)?.as_str().to_string(),
    files_key: caps.name("files")?.start(),
    list_open: caps.get(0)?.end(),
  })
}

/// Identifier, `/* Frameworks */` comment, `isa` as first field, then `files`.
#[derive(Debug, Default, Clone, Copy)]
pub struct StrictShape;

impl PhaseShape for StrictShape {
  fn kind(&self) -> ShapeKind {
    ShapeKind::Strict
  }

  fn find(&self, section: &str) -> Option<ShapeMatch> {
    match_with(&STRICT_PHASE_RE, section)
  }
}

/// Any record with `isa = PBXFrameworksBuildPhase` and a later `files` list.
#[derive(Debug, Default, Clone, Copy)]
pub struct LooseShape;

impl PhaseShape for LooseShape {
  fn kind(&self) -> ShapeKind {
    ShapeKind::Loose
  }

  fn find(&self, section: &str) -> Option<ShapeMatch> {
    match_with(&LOOSE_PHASE_RE, section)
  }
}

/// Shapes tried by [`build_phase`], in precedence order.
pub const PHASE_SHAPES: [&dyn PhaseShape; 2] = [&StrictShape, &LooseShape];

/// The frameworks build phase's `files` list, as located in one snapshot.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct PhaseMatch {
  pub record_id: String,
  pub shape: ShapeKind,
  pub list: ListMatch,
  /// The list body at the time it was located.
  pub body: String,
}

/// Locate the frameworks build phase list using [`PHASE_SHAPES`].
pub fn build_phase(text: &str) -> Option<PhaseMatch> {
  let bounds = section_bounds(text, Section::FrameworksBuildPhase)?;
  build_phase_with(text, bounds, &PHASE_SHAPES)
}

/// Locate the frameworks build phase list within `bounds`, trying `shapes` in order.
pub fn build_phase_with(text: &str, bounds: Range<usize>, shapes: &[&dyn PhaseShape]) -> Option<PhaseMatch> {
  let section = &text[bounds.clone()];
  shapes.iter().find_map(|shape| {
    let found = shape.find(section)?;
    let list = list_at(text, bounds.start + found.files_key, bounds.start + found.list_open)?;
    if list.span.end > bounds.end {
      return None;
    }
    Some(PhaseMatch {
      record_id: found.record_id,
      shape: shape.kind(),
      body: list.body(text).to_string(),
      list,
    })
  })
}

/// The `files` list of the build phase record `record_id`, searched fresh.
pub fn files_list_of_record(text: &str, record_id: &str) -> Option<ListMatch> {
  let bounds = section_bounds(text, Section::FrameworksBuildPhase)?;
  let pattern = format!(
    r"\b{}\b[^{{}}=]*=\s*\{{[^{{}}]*?\b(?P<files>files)\s*=\s*\(",
    regex::escape(record_id)
  );
  let re = Regex::new(&pattern).ok()?;
  let caps = re.captures(&text[bounds.clone()])?;
  let key = bounds.start + caps.name("files")?.start();
  let open = bounds.start + caps.get(0)?.end();
  let list = list_at(text, key, open)?;
  (list.span.end <= bounds.end).then_some(list)
}
