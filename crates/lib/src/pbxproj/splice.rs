//! Pure text splicing.
//!
//! Each function takes one snapshot and returns a new one. A splice never
//! touches bytes outside the region it was given.

use std::ops::Range;

use thiserror::Error;

/// The region to splice no longer matches the snapshot it was located in.
#[derive(Debug, Clone, PartialEq, Eq, Error)]
#[error("text at offset {offset} no longer matches the located region")]
pub struct SpliceConflict {
  pub offset: usize,
}

/// Insert `new_text` at `offset`.
pub fn insert(text: &str, offset: usize, new_text: &str) -> Result<String, SpliceConflict> {
  if offset > text.len() || !text.is_char_boundary(offset) {
    return Err(SpliceConflict { offset });
  }
  let mut out = String::with_capacity(text.len() + new_text.len());
  out.push_str(&text[..offset]);
  out.push_str(new_text);
  out.push_str(&text[offset..]);
  Ok(out)
}

/// Replace `text[span]` with `replacement`, provided it still reads `expected`.
pub fn replace_span(text: &str, span: Range<usize>, expected: &str, replacement: &str) -> Result<String, SpliceConflict> {
  if text.get(span.clone()) != Some(expected) {
    return Err(SpliceConflict { offset: span.start });
  }
  let mut out = String::with_capacity(text.len() - expected.len() + replacement.len());
  out.push_str(&text[..span.start]);
  out.push_str(replacement);
  out.push_str(&text[span.end..]);
  Ok(out)
}

/// A list body with `items` appended.
///
/// `indent` is the indentation of the list's key line; items are indented
/// one tab deeper and each ends with a comma, as Xcode writes them.
///
/// - Empty body: items are written with no leading comma and the closing
///   parenthesis is put back on its own line at `indent`.
/// - Non-empty body: items follow the last existing item. If that item has
///   no trailing comma, one is added first. Whitespace before the closing
///   parenthesis is kept as it was.
pub fn extend_list_body(body: &str, items: &[String], indent: &str) -> String {
  let content = body.trim_end();
  let mut out = String::with_capacity(body.len() + items.iter().map(|i| i.len() + indent.len() + 3).sum::<usize>());

  let tail = if content.trim_start().is_empty() {
    format!("\n{}", indent)
  } else {
    out.push_str(content);
    if !content.ends_with(',') {
      out.push(',');
    }
    body[content.len()..].to_string()
  };

  for item in items {
    out.push('\n');
    out.push_str(indent);
    out.push('\t');
    out.push_str(item);
    out.push(',');
  }
  out.push_str(&tail);
  out
}
