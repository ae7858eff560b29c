//! Conversions between character indices and byte offsets.

use std::ops::{
  Bound,
  Range,
  RangeBounds,
};

#[inline]
pub(crate) fn char_len(text: &str) -> usize {
  text.chars().count()
}

/// Byte offset of the character at `index`, or the length of `text` when
/// `index` is past the end.
pub(crate) fn byte_offset(text: &str, index: usize) -> usize {
  text
    .char_indices()
    .nth(index)
    .map_or(text.len(), |(offset, _)| offset)
}

/// The characters of `text` at indices `range`.
pub(crate) fn char_slice(text: &str, range: Range<usize>) -> &str {
  let start = byte_offset(text, range.start);
  let end = start + byte_offset(&text[start..], range.end.saturating_sub(range.start));
  &text[start..end]
}

/// Byte offsets of every character boundary of `text`, including its end.
pub(crate) fn boundaries(text: &str) -> Vec<usize> {
  text
    .char_indices()
    .map(|(offset, _)| offset)
    .chain(Some(text.len()))
    .collect()
}

/// Resolves `range` against a length, clamping both ends into `0..=len`.
pub(crate) fn clamp(range: impl RangeBounds<usize>, len: usize) -> Range<usize> {
  let start = match range.start_bound() {
    Bound::Included(&start) => start,
    Bound::Excluded(&start) => start.saturating_add(1),
    Bound::Unbounded => 0,
  }
  .min(len);

  let end = match range.end_bound() {
    Bound::Included(&end) => end.saturating_add(1),
    Bound::Excluded(&end) => end,
    Bound::Unbounded => len,
  }
  .min(len);

  start..end.max(start)
}

#[cfg(test)]
mod tests {
  use super::*;

  #[test]
  fn slices_by_character() {
    let text = "stra\u{DF}e \u{1F98A}!";
    assert_eq!(char_len(text), 9);
    assert_eq!(char_slice(text, 4..6), "\u{DF}e");
    assert_eq!(char_slice(text, 7..9), "\u{1F98A}!");
    assert_eq!(char_slice(text, 7..100), "\u{1F98A}!");
    assert_eq!(byte_offset(text, 5), 6);
    assert_eq!(boundaries("a\u{DF}"), vec![0, 1, 3]);
  }

  #[test]
  fn clamps_ranges() {
    assert_eq!(clamp(.., 5), 0..5);
    assert_eq!(clamp(2..=3, 5), 2..4);
    assert_eq!(clamp(4..2, 5), 4..4);
    assert_eq!(clamp(3..9, 5), 3..5);
  }
}
