//! Incremental construction of bidirectional strings.
//!
//! # Architecture
//!
//! A [`BistrBuilder`] walks the modified text of a source [`BiStr`] from left
//! to right. Every operation consumes some prefix of what is left and emits
//! replacement text, recording one aligned pair per step:
//!
//! - `skip` copies characters through unchanged, aligning them one to one
//! - `replace` swaps characters for new text as a single coarse chunk
//! - `insert` and `discard` are replacements with an empty side
//! - `append` splices in a whole [`BiStr`], keeping its fine alignment
//!
//! Regex operations (`skip_match`, `replace_match`, `replace_all`, ...) are
//! built on the same primitives. When the walk is complete, [`build`] composes
//! the recorded alignment with the source's, so the result still points at
//! the very first original string.
//!
//! [`build`]: BistrBuilder::build

use std::{
  ops::Range,
  sync::Arc,
};

use regex_automata::{
  Anchored,
  Input,
  meta::Regex,
  util::captures::Captures,
};
use the_align::{
  Alignment,
  AlignmentBuilder,
};

use crate::{
  BiStr,
  chars::boundaries,
  error::{
    BistrError,
    Result,
  },
};

/// Produces replacement text for a regex match.
///
/// Implemented for template strings, which expand `$1`, `${name}` and `$$`,
/// and for closures receiving the [`Captured`] groups.
pub trait Replacer {
  fn replace_append(&mut self, captures: &Captures, haystack: &str, dst: &mut String);
}

impl Replacer for &str {
  fn replace_append(&mut self, captures: &Captures, haystack: &str, dst: &mut String) {
    captures.interpolate_string_into(haystack, self, dst);
  }
}

impl Replacer for &String {
  fn replace_append(&mut self, captures: &Captures, haystack: &str, dst: &mut String) {
    captures.interpolate_string_into(haystack, self, dst);
  }
}

impl<F, T> Replacer for F
where
  F: FnMut(&Captured<'_>) -> T,
  T: AsRef<str>,
{
  fn replace_append(&mut self, captures: &Captures, haystack: &str, dst: &mut String) {
    let captured = Captured { captures, haystack };
    dst.push_str(self(&captured).as_ref());
  }
}

/// The groups of a single regex match.
#[derive(Debug, Clone, Copy)]
pub struct Captured<'a> {
  captures: &'a Captures,
  haystack: &'a str,
}

impl<'a> Captured<'a> {
  /// The text of the whole match.
  pub fn as_str(&self) -> &'a str {
    self.get(0).unwrap_or_default()
  }

  /// The text of group `index`, if it participated in the match.
  pub fn get(&self, index: usize) -> Option<&'a str> {
    let span = self.captures.get_group(index)?;
    self.haystack.get(span.range())
  }

  /// The text of the group called `name`, if it participated in the match.
  pub fn name(&self, name: &str) -> Option<&'a str> {
    let span = self.captures.get_group_by_name(name)?;
    self.haystack.get(span.range())
  }
}

/// Rewrites a [`BiStr`] piece by piece while tracking the alignment.
#[derive(Debug, Clone)]
pub struct BistrBuilder {
  source:    BiStr,
  /// Byte offset of every character boundary of the current text.
  offsets:   Vec<usize>,
  modified:  String,
  alignment: AlignmentBuilder,
  /// Characters consumed from the current text.
  opos:      usize,
  /// Characters emitted into the modified text.
  mpos:      usize,
}

impl BistrBuilder {
  pub fn new(text: impl Into<BiStr>) -> Self {
    let source = text.into();
    let offsets = boundaries(&source.modified);
    Self {
      source,
      offsets,
      modified: String::new(),
      alignment: AlignmentBuilder::new(),
      opos: 0,
      mpos: 0,
    }
  }

  /// The first original string, before any transformation.
  pub fn original(&self) -> &str {
    self.source.original()
  }

  /// The text being rewritten.
  pub fn current(&self) -> &str {
    self.source.modified()
  }

  /// The text produced so far.
  pub fn modified(&self) -> &str {
    &self.modified
  }

  /// The alignment between the consumed part of [`current`] and
  /// [`modified`].
  ///
  /// [`current`]: Self::current
  /// [`modified`]: Self::modified
  pub fn alignment(&self) -> Result<Alignment> {
    if self.alignment.is_empty() {
      return Ok(Alignment::identity(0..0));
    }
    Ok(self.alignment.build()?)
  }

  /// Number of characters of the current text consumed so far.
  pub fn position(&self) -> usize {
    self.opos
  }

  pub fn remaining(&self) -> usize {
    self.offsets.len() - 1 - self.opos
  }

  pub fn is_complete(&self) -> bool {
    self.remaining() == 0
  }

  /// The next `n` characters of the current text, or fewer near its end.
  pub fn peek(&self, n: usize) -> &str {
    let end = (self.opos + n).min(self.offsets.len() - 1);
    &self.source.modified[self.offsets[self.opos]..self.offsets[end]]
  }

  /// Copies the next `n` characters unchanged.
  pub fn skip(&mut self, n: usize) -> Result<()> {
    self.check_available(n)?;
    let (start, end) = (self.offsets[self.opos], self.offsets[self.opos + n]);
    self.modified.push_str(&self.source.modified[start..end]);
    for _ in 0..n {
      self.advance(1, 1)?;
    }
    Ok(())
  }

  pub fn skip_rest(&mut self) -> Result<()> {
    self.skip(self.remaining())
  }

  /// Emits `text` without consuming anything.
  pub fn insert(&mut self, text: &str) -> Result<()> {
    self.replace(0, text)
  }

  /// Drops the next `n` characters.
  pub fn discard(&mut self, n: usize) -> Result<()> {
    self.replace(n, "")
  }

  pub fn discard_rest(&mut self) -> Result<()> {
    self.discard(self.remaining())
  }

  /// Replaces the next `n` characters with `text`, aligning them as one
  /// chunk.
  pub fn replace(&mut self, n: usize, text: &str) -> Result<()> {
    self.check_available(n)?;
    self.modified.push_str(text);
    self.advance(n, text.chars().count())
  }

  /// Splices in `text`, whose original string must equal the upcoming
  /// characters. Its own alignment is kept.
  pub fn append(&mut self, text: &BiStr) -> Result<()> {
    let upcoming = self.peek(text.alignment.original_bounds().end);
    if upcoming != text.original() {
      return Err(BistrError::Mismatch {
        expected: upcoming.to_string(),
        found:    text.original().to_string(),
      });
    }

    self.modified.push_str(text.modified());
    let mut last = (0, 0);
    for (o, m) in text.alignment.iter() {
      self.advance(o - last.0, m - last.1)?;
      last = (o, m);
    }
    Ok(())
  }

  /// Skips a match of `regex` starting at the current position.
  pub fn skip_match(&mut self, regex: &Regex) -> Result<bool> {
    let Some(span) = self.find(regex, Anchored::Yes) else {
      return Ok(false);
    };
    self.skip(span.len())?;
    Ok(true)
  }

  /// Discards a match of `regex` starting at the current position.
  pub fn discard_match(&mut self, regex: &Regex) -> Result<bool> {
    let Some(span) = self.find(regex, Anchored::Yes) else {
      return Ok(false);
    };
    self.discard(span.len())?;
    Ok(true)
  }

  /// Replaces a match of `regex` starting at the current position.
  pub fn replace_match(&mut self, regex: &Regex, mut replacement: impl Replacer) -> Result<bool> {
    let Some((span, text)) = self.expand(regex, Anchored::Yes, &mut replacement) else {
      return Ok(false);
    };
    self.replace(span.len(), &text)?;
    Ok(true)
  }

  /// Replaces the next match of `regex`, skipping the text before it.
  pub fn replace_next(&mut self, regex: &Regex, mut replacement: impl Replacer) -> Result<bool> {
    let Some((span, text)) = self.expand(regex, Anchored::No, &mut replacement) else {
      return Ok(false);
    };
    self.skip(span.start - self.opos)?;
    self.replace(span.len(), &text)?;
    Ok(true)
  }

  /// Replaces every remaining match of `regex`, then skips to the end.
  pub fn replace_all(&mut self, regex: &Regex, mut replacement: impl Replacer) -> Result<()> {
    let current = Arc::clone(&self.source.modified);
    let input = Input::new(&*current).range(self.offsets[self.opos]..);
    let mut expanded = String::new();

    for captures in regex.captures_iter(input) {
      let Some(found) = captures.get_match() else {
        continue;
      };
      expanded.clear();
      replacement.replace_append(&captures, &current, &mut expanded);

      let span = self.char_span(found.range());
      self.skip(span.start - self.opos)?;
      self.replace(span.len(), &expanded)?;
    }

    self.skip_rest()
  }

  /// Finishes the walk, yielding a [`BiStr`] from the first original string
  /// to the text built here.
  pub fn build(&self) -> Result<BiStr> {
    if !self.is_complete() {
      return Err(BistrError::Incomplete {
        remaining: self.remaining(),
      });
    }

    let alignment = self.source.alignment.compose(&self.alignment()?)?;
    Ok(BiStr {
      original: Arc::clone(&self.source.original),
      modified: Arc::from(self.modified.as_str()),
      alignment,
    })
  }

  /// Builds the current result and starts a new walk over it.
  pub fn rewind(&mut self) -> Result<()> {
    *self = Self::new(self.build()?);
    Ok(())
  }

  fn check_available(&self, requested: usize) -> Result<()> {
    let remaining = self.remaining();
    if requested > remaining {
      return Err(BistrError::OutOfBounds {
        requested,
        remaining,
      });
    }
    Ok(())
  }

  fn advance(&mut self, o: usize, m: usize) -> Result<()> {
    if self.alignment.is_empty() {
      self.alignment.append(0, 0)?;
    }
    self.opos += o;
    self.mpos += m;
    if o > 0 || m > 0 {
      self.alignment.append(self.opos, self.mpos)?;
    }
    Ok(())
  }

  /// Character span of a byte range of the current text.
  fn char_span(&self, bytes: Range<usize>) -> Range<usize> {
    let start = self.offsets.partition_point(|&offset| offset < bytes.start);
    let end = self.offsets.partition_point(|&offset| offset < bytes.end);
    start..end
  }

  fn find(&self, regex: &Regex, anchored: Anchored) -> Option<Range<usize>> {
    let input = Input::new(self.current())
      .range(self.offsets[self.opos]..)
      .anchored(anchored);
    regex
      .search(&input)
      .map(|found| self.char_span(found.range()))
  }

  fn expand(
    &self,
    regex: &Regex,
    anchored: Anchored,
    replacement: &mut impl Replacer,
  ) -> Option<(Range<usize>, String)> {
    let input = Input::new(self.current())
      .range(self.offsets[self.opos]..)
      .anchored(anchored);
    let mut captures = regex.create_captures();
    regex.search_captures(&input, &mut captures);
    let found = captures.get_match()?;

    let mut text = String::new();
    replacement.replace_append(&captures, self.current(), &mut text);
    Some((self.char_span(found.range()), text))
  }
}
