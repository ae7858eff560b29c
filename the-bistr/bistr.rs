//! The bidirectionally transformed string.
//!
//! # Architecture
//!
//! A [`BiStr`] is immutable. Its two strings live behind [`Arc`]s and its
//! [`Alignment`] shares run storage, so clones are cheap and every operation
//! returns a new value:
//!
//! - **slicing** works on the modified text and carries along whatever part of
//!   the original text the alignment ties to it
//! - **transformations** (case mapping, stripping, replacing, ...) run a
//!   [`BistrBuilder`] over the modified text and compose the new alignment
//!   with the existing one
//! - **concatenation** shifts the appended alignment past the current ends
//!
//! Searching methods mirror their `str` counterparts but speak in character
//! indices and take a window of the modified text to search in.

use std::{
  fmt,
  ops::{
    Range,
    RangeBounds,
  },
  sync::Arc,
};

use regex_automata::meta::Regex;
use the_align::{
  Alignment,
  AlignmentBuilder,
  Cost,
  Side,
};

use crate::{
  BistrBuilder,
  Replacer,
  chars::{
    char_len,
    char_slice,
    clamp,
  },
  config::InferConfig,
  error::{
    BistrError,
    Result,
  },
  infer::heuristic_infer,
};

#[derive(Clone, PartialEq, Eq)]
pub struct BiStr {
  pub(crate) original:  Arc<str>,
  pub(crate) modified:  Arc<str>,
  pub(crate) alignment: Alignment,
}

impl BiStr {
  /// An unmodified string, aligned to itself character by character.
  pub fn new(text: &str) -> Self {
    let text: Arc<str> = Arc::from(text);
    Self {
      alignment: Alignment::identity(0..char_len(&text)),
      original:  Arc::clone(&text),
      modified:  text,
    }
  }

  /// Pairs two strings with the coarsest possible alignment: only their
  /// starts and ends are known to correspond.
  pub fn from_pair(original: &str, modified: &str) -> Self {
    Self {
      alignment: Alignment::spanning(0..char_len(original), 0..char_len(modified)),
      original:  Arc::from(original),
      modified:  Arc::from(modified),
    }
  }

  /// Pairs two strings with a known alignment, which must cover exactly the
  /// characters of each.
  pub fn with_alignment(original: &str, modified: &str, alignment: Alignment) -> Result<Self> {
    check_bounds(Side::Original, original, alignment.original_bounds())?;
    check_bounds(Side::Modified, modified, alignment.modified_bounds())?;
    Ok(Self {
      original: Arc::from(original),
      modified: Arc::from(modified),
      alignment,
    })
  }

  /// Guesses the alignment between two strings, discounting differences in
  /// case and similar characters. Takes `O(N * M)` time.
  pub fn infer(original: &str, modified: &str) -> Result<Self> {
    heuristic_infer(original, modified, &InferConfig::default())
  }

  /// Like [`BiStr::infer`], with custom edit weights.
  pub fn infer_with_config(original: &str, modified: &str, config: &InferConfig) -> Result<Self> {
    heuristic_infer(original, modified, config)
  }

  /// Infers the alignment with a character-level edit cost function, as in
  /// [`Alignment::infer_with_costs`].
  pub fn infer_with_costs<N, F>(original: &str, modified: &str, cost_fn: F) -> Result<Self>
  where
    N: Cost,
    F: Fn(Option<&char>, Option<&char>) -> N,
  {
    let o: Vec<char> = original.chars().collect();
    let m: Vec<char> = modified.chars().collect();
    let alignment = Alignment::infer_with_costs(&o, &m, cost_fn)?;
    Self::with_alignment(original, modified, alignment)
  }

  /// The string before any modifications.
  pub fn original(&self) -> &str {
    &self.original
  }

  /// The string after all modifications.
  pub fn modified(&self) -> &str {
    &self.modified
  }

  pub fn alignment(&self) -> &Alignment {
    &self.alignment
  }

  /// Length of the modified string, in characters.
  pub fn len(&self) -> usize {
    self.alignment.modified_bounds().end
  }

  pub fn is_empty(&self) -> bool {
    self.len() == 0
  }

  /// Characters of the modified string.
  pub fn chars(&self) -> std::str::Chars<'_> {
    self.modified.chars()
  }

  /// Swaps the original and modified strings.
  #[must_use]
  pub fn inverse(&self) -> Self {
    Self {
      original:  Arc::clone(&self.modified),
      modified:  Arc::clone(&self.original),
      alignment: self.alignment.inverse(),
    }
  }

  pub fn concat(&self, other: &BiStr) -> Result<Self> {
    let mut joined = Concatenation::new();
    joined.push(self)?;
    joined.push(other)?;
    joined.finish()
  }

  /// Appends unmodified text.
  pub fn concat_str(&self, text: &str) -> Result<Self> {
    self.concat(&BiStr::new(text))
  }

  /// The substring at `span` of the modified string, together with the part
  /// of the original string it came from.
  ///
  /// ```ignore
  /// let text = BiStr::new("TEST").lower()?;
  /// assert_eq!(text.slice(1..3)?, BiStr::new("ES").lower()?);
  /// ```
  pub fn slice(&self, span: impl RangeBounds<usize>) -> Result<Self> {
    let alignment = self.alignment.slice_by_modified(span)?;
    let original = alignment.original_bounds();
    let modified = alignment.modified_bounds();
    let alignment = alignment.shift(-(original.start as isize), -(modified.start as isize))?;

    Ok(Self {
      original: Arc::from(char_slice(&self.original, original)),
      modified: Arc::from(char_slice(&self.modified, modified)),
      alignment,
    })
  }

  /// Every pair of corresponding original and modified text, in order. Each
  /// chunk is the text between two consecutive pairs of the alignment.
  pub fn chunks(&self) -> impl Iterator<Item = BiStr> + '_ {
    self
      .alignment
      .iter()
      .zip(self.alignment.iter().skip(1))
      .map(|((i, k), (j, l))| {
        BiStr::from_pair(
          char_slice(&self.original, i..j),
          char_slice(&self.modified, k..l),
        )
      })
  }

  /// Number of non-overlapping occurrences of `needle` within `window`.
  pub fn count(&self, needle: &str, window: impl RangeBounds<usize>) -> usize {
    let (_, haystack) = self.window(window);
    haystack.matches(needle).count()
  }

  /// Position of the first occurrence of `needle` within `window`.
  pub fn find(&self, needle: &str, window: impl RangeBounds<usize>) -> Option<usize> {
    let (start, haystack) = self.window(window);
    haystack
      .find(needle)
      .map(|offset| start + char_len(&haystack[..offset]))
  }

  /// Span of the first occurrence of `needle` within `window`.
  pub fn find_bounds(&self, needle: &str, window: impl RangeBounds<usize>) -> Option<Range<usize>> {
    self
      .find(needle, window)
      .map(|start| start..start + char_len(needle))
  }

  /// Position of the last occurrence of `needle` within `window`.
  pub fn rfind(&self, needle: &str, window: impl RangeBounds<usize>) -> Option<usize> {
    let (start, haystack) = self.window(window);
    haystack
      .rfind(needle)
      .map(|offset| start + char_len(&haystack[..offset]))
  }

  pub fn rfind_bounds(&self, needle: &str, window: impl RangeBounds<usize>) -> Option<Range<usize>> {
    self
      .rfind(needle, window)
      .map(|start| start..start + char_len(needle))
  }

  /// Like [`BiStr::find`], failing when `needle` is absent.
  pub fn index(&self, needle: &str, window: impl RangeBounds<usize>) -> Result<usize> {
    self.find(needle, window).ok_or_else(|| not_found(needle))
  }

  pub fn index_bounds(&self, needle: &str, window: impl RangeBounds<usize>) -> Result<Range<usize>> {
    self
      .find_bounds(needle, window)
      .ok_or_else(|| not_found(needle))
  }

  /// Like [`BiStr::rfind`], failing when `needle` is absent.
  pub fn rindex(&self, needle: &str, window: impl RangeBounds<usize>) -> Result<usize> {
    self.rfind(needle, window).ok_or_else(|| not_found(needle))
  }

  pub fn rindex_bounds(&self, needle: &str, window: impl RangeBounds<usize>) -> Result<Range<usize>> {
    self
      .rfind_bounds(needle, window)
      .ok_or_else(|| not_found(needle))
  }

  pub fn starts_with(&self, prefix: &str) -> bool {
    self.modified.starts_with(prefix)
  }

  pub fn ends_with(&self, suffix: &str) -> bool {
    self.modified.ends_with(suffix)
  }

  /// Concatenates `items` with this string between each of them.
  pub fn join<T: Into<BiStr>>(&self, items: impl IntoIterator<Item = T>) -> Result<Self> {
    let mut joined = Concatenation::new();
    for (i, item) in items.into_iter().enumerate() {
      if i > 0 {
        joined.push(self)?;
      }
      joined.push(&item.into())?;
    }
    joined.finish()
  }

  /// Splits on `separator`, or on runs of whitespace when it is `None`, at
  /// most `max_splits` times.
  ///
  /// Splitting on whitespace drops empty pieces; splitting on a separator
  /// keeps them.
  pub fn split(&self, separator: Option<&str>, max_splits: Option<usize>) -> Result<Vec<Self>> {
    if separator == Some("") {
      return Err(BistrError::EmptySeparator);
    }

    let len = self.len();
    let mut pieces = Vec::new();
    let mut start = Some(0);

    while let Some(from) = start
      && max_splits.is_none_or(|max| pieces.len() < max)
    {
      let found = match separator {
        Some(separator) => self.find_bounds(separator, from..),
        None => self.find_whitespace(from),
      };
      let (end, next) = match found {
        Some(bounds) => (bounds.start, Some(bounds.end)),
        None => (len, None),
      };

      if end > from || separator.is_some() {
        pieces.push(self.slice(from..end)?);
      }
      start = next;
    }

    if let Some(from) = start {
      pieces.push(self.slice(from..)?);
    }
    Ok(pieces)
  }

  /// Splits around the first occurrence of `separator`. When it is absent,
  /// the whole string comes first.
  pub fn partition(&self, separator: &str) -> Result<(Self, Self, Self)> {
    match self.find_bounds(separator, ..) {
      Some(bounds) => self.split_around(bounds),
      None => Ok((self.clone(), BiStr::new(""), BiStr::new(""))),
    }
  }

  /// Splits around the last occurrence of `separator`. When it is absent,
  /// the whole string comes last.
  pub fn rpartition(&self, separator: &str) -> Result<(Self, Self, Self)> {
    match self.rfind_bounds(separator, ..) {
      Some(bounds) => self.split_around(bounds),
      None => Ok((BiStr::new(""), BiStr::new(""), self.clone())),
    }
  }

  /// Pads both ends with inserted `fill` up to `width` characters. An odd
  /// padding puts the extra character at the end.
  pub fn center(&self, width: usize, fill: char) -> Result<Self> {
    let pad = width.saturating_sub(self.len());
    if pad == 0 {
      return Ok(self.clone());
    }
    padding(fill, pad / 2)
      .concat(self)?
      .concat(&padding(fill, pad.div_ceil(2)))
  }

  /// Pads the end with inserted `fill` up to `width` characters.
  pub fn ljust(&self, width: usize, fill: char) -> Result<Self> {
    let pad = width.saturating_sub(self.len());
    if pad == 0 {
      return Ok(self.clone());
    }
    self.concat(&padding(fill, pad))
  }

  /// Pads the start with inserted `fill` up to `width` characters.
  pub fn rjust(&self, width: usize, fill: char) -> Result<Self> {
    let pad = width.saturating_sub(self.len());
    if pad == 0 {
      return Ok(self.clone());
    }
    padding(fill, pad).concat(self)
  }

  /// Replaces tabs with enough spaces to reach the next multiple of
  /// `tab_size` columns. Columns restart after `\n` and `\r`.
  pub fn expand_tabs(&self, tab_size: usize) -> Result<Self> {
    let mut builder = self.builder();
    let mut column = 0;
    for c in self.modified.chars() {
      match c {
        '\t' => {
          let spaces = match tab_size {
            0 => 0,
            size => size - column % size,
          };
          builder.replace(1, &" ".repeat(spaces))?;
          column += spaces;
        },
        '\n' | '\r' => {
          builder.skip(1)?;
          column = 0;
        },
        _ => {
          builder.skip(1)?;
          column += 1;
        },
      }
    }
    builder.build()
  }

  /// Replaces occurrences of `old` with `new`, at most `count` of them. An
  /// empty `old` inserts `new` around every character.
  pub fn replace(&self, old: &str, new: &str, count: Option<usize>) -> Result<Self> {
    let old_len = char_len(old);
    let mut builder = self.builder();
    // Byte and character offsets of the end of the last replacement.
    let (mut byte, mut index) = (0, 0);

    for (offset, _) in self
      .modified
      .match_indices(old)
      .take(count.unwrap_or(usize::MAX))
    {
      let start = index + char_len(&self.modified[byte..offset]);
      builder.skip(start - builder.position())?;
      builder.replace(old_len, new)?;
      (byte, index) = (offset + old.len(), start + old_len);
    }

    builder.skip_rest()?;
    builder.build()
  }

  /// Replaces every match of `regex` with `replacement`, which is either a
  /// template string (`$1`, `${name}`) or a closure over the match.
  pub fn sub(&self, regex: &Regex, replacement: impl Replacer) -> Result<Self> {
    let mut builder = self.builder();
    builder.replace_all(regex, replacement)?;
    builder.build()
  }

  /// Removes leading and trailing characters in `chars`, or whitespace when
  /// it is `None`.
  pub fn strip(&self, chars: Option<&str>) -> Result<Self> {
    let (pre, post) = self.strippable(chars);
    let mut builder = self.builder();
    builder.discard(pre)?;
    builder.skip(self.len() - pre - post)?;
    builder.discard_rest()?;
    builder.build()
  }

  pub fn lstrip(&self, chars: Option<&str>) -> Result<Self> {
    let pre = self
      .modified
      .chars()
      .take_while(|&c| should_strip(c, chars))
      .count();
    let mut builder = self.builder();
    builder.discard(pre)?;
    builder.skip_rest()?;
    builder.build()
  }

  pub fn rstrip(&self, chars: Option<&str>) -> Result<Self> {
    let post = self
      .modified
      .chars()
      .rev()
      .take_while(|&c| should_strip(c, chars))
      .count();
    let mut builder = self.builder();
    builder.skip(self.len() - post)?;
    builder.discard_rest()?;
    builder.build()
  }

  /// A builder transforming this string further.
  pub fn builder(&self) -> BistrBuilder {
    BistrBuilder::new(self.clone())
  }

  /// Start index and text of the characters of the modified string within
  /// `window`.
  fn window(&self, window: impl RangeBounds<usize>) -> (usize, &str) {
    let range = clamp(window, self.len());
    (range.start, char_slice(&self.modified, range.clone()))
  }

  /// The first run of whitespace at or after `from`.
  fn find_whitespace(&self, from: usize) -> Option<Range<usize>> {
    let mut chars = self.modified.chars().enumerate().skip(from);
    let (start, _) = chars.find(|(_, c)| c.is_whitespace())?;
    let end = chars
      .find(|(_, c)| !c.is_whitespace())
      .map_or(self.len(), |(i, _)| i);
    Some(start..end)
  }

  fn split_around(&self, bounds: Range<usize>) -> Result<(Self, Self, Self)> {
    Ok((
      self.slice(..bounds.start)?,
      self.slice(bounds.clone())?,
      self.slice(bounds.end..)?,
    ))
  }

  /// Numbers of leading and trailing characters to strip. They never
  /// overlap.
  fn strippable(&self, chars: Option<&str>) -> (usize, usize) {
    let pre = self
      .modified
      .chars()
      .take_while(|&c| should_strip(c, chars))
      .count();
    let post = self
      .modified
      .chars()
      .rev()
      .take_while(|&c| should_strip(c, chars))
      .count()
      .min(self.len() - pre);
    (pre, post)
  }
}

fn check_bounds(side: Side, text: &str, actual: Range<usize>) -> Result<()> {
  let expected = 0..char_len(text);
  if actual != expected {
    return Err(BistrError::AlignmentMismatch {
      side,
      expected,
      actual,
    });
  }
  Ok(())
}

fn not_found(needle: &str) -> BistrError {
  BistrError::NotFound {
    needle: needle.to_string(),
  }
}

fn should_strip(c: char, chars: Option<&str>) -> bool {
  match chars {
    Some(chars) => chars.contains(c),
    None => c.is_whitespace(),
  }
}

/// `count` copies of `fill`, inserted from nothing.
fn padding(fill: char, count: usize) -> BiStr {
  let fill: String = std::iter::repeat_n(fill, count).collect();
  BiStr::from_pair("", &fill)
}

/// Accumulates bistrs end to end.
struct Concatenation {
  original:  String,
  modified:  String,
  alignment: AlignmentBuilder,
  ends:      (usize, usize),
}

impl Concatenation {
  fn new() -> Self {
    Self {
      original:  String::new(),
      modified:  String::new(),
      alignment: AlignmentBuilder::new(),
      ends:      (0, 0),
    }
  }

  fn push(&mut self, text: &BiStr) -> Result<()> {
    let (o, m) = self.ends;
    let shifted = text.alignment.shift(o as isize, m as isize)?;
    self.alignment.extend_alignment(&shifted)?;
    self.original.push_str(&text.original);
    self.modified.push_str(&text.modified);
    self.ends = shifted.last();
    Ok(())
  }

  fn finish(self) -> Result<BiStr> {
    let alignment = if self.alignment.is_empty() {
      Alignment::identity(0..0)
    } else {
      self.alignment.build()?
    };
    Ok(BiStr {
      original: Arc::from(self.original),
      modified: Arc::from(self.modified),
      alignment,
    })
  }
}

impl From<&str> for BiStr {
  fn from(text: &str) -> Self {
    BiStr::new(text)
  }
}

impl From<String> for BiStr {
  fn from(text: String) -> Self {
    BiStr::new(&text)
  }
}

impl From<&BiStr> for BiStr {
  fn from(text: &BiStr) -> Self {
    text.clone()
  }
}

impl fmt::Display for BiStr {
  fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
    if self.original == self.modified {
      write!(f, "\u{2B8E}'{}'\u{2B8C}", self.original.escape_debug())
    } else {
      write!(
        f,
        "('{}' \u{21CB} '{}')",
        self.original.escape_debug(),
        self.modified.escape_debug()
      )
    }
  }
}

impl fmt::Debug for BiStr {
  fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
    let identity = self.original == self.modified
      && self.alignment.len() == char_len(&self.original) + 1;
    if identity {
      write!(f, "BiStr({:?})", self.original)
    } else if self.alignment.len() == 2 {
      write!(f, "BiStr({:?}, {:?})", self.original, self.modified)
    } else {
      write!(
        f,
        "BiStr({:?}, {:?}, {:?})",
        self.original, self.modified, self.alignment
      )
    }
  }
}
