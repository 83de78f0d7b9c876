//! Text helpers for working on the raw manifest buffer.

use std::ops::Range;

/// Leading whitespace of the line containing `offset`.
pub fn line_indent(text: &str, offset: usize) -> &str {
  let offset = offset.min(text.len());
  let line_start = text[..offset].rfind('\n').map(|i| i + 1).unwrap_or(0);
  let line = &text[line_start..];
  let width = line.len() - line.trim_start_matches([' ', '\t']).len();
  &line[..width]
}

/// A bounded excerpt of `text[range]` for error messages.
///
/// Excerpts longer than `max` characters are cut and suffixed with `...`.
pub fn excerpt(text: &str, range: Range<usize>, max: usize) -> String {
  let start = range.start.min(text.len());
  let end = range.end.clamp(start, text.len());
  let slice = &text[start..end];
  match slice.char_indices().nth(max) {
    Some((cut, _)) => format!("{}...", &slice[..cut]),
    None => slice.to_string(),
  }
}

/// Context around `offset`: up to `radius` characters on each side.
pub fn surrounding(text: &str, offset: usize, radius: usize) -> String {
  let offset = floor_boundary(text, offset.min(text.len()));
  let before: usize = text[..offset].chars().rev().take(radius).map(char::len_utf8).sum();
  let after: usize = text[offset..].chars().take(radius).map(char::len_utf8).sum();
  text[offset - before..offset + after].to_string()
}

fn floor_boundary(text: &str, mut offset: usize) -> usize {
  while !text.is_char_boundary(offset) {
    offset -= 1;
  }
  offset
}
