//! Monotonic correspondences between positions in two sequences.
//!
//! An [`Alignment`] relates positions in an *original* sequence to positions
//! in a *modified* one, typically the input and output of a text
//! transformation. It is stored as parallel runs of
//! [`ArithmeticProgression`]s, one per side, so long stretches of unchanged
//! text cost a single run no matter how many positions they cover.
//!
//! # Architecture
//!
//! The logical content is a sequence of `(original, modified)` pairs that is
//! non-decreasing in both coordinates with no two adjacent pairs equal. The
//! runs are shared behind [`Arc`]s, so cloning, inverting and most
//! transformations never copy pair data:
//!
//! - **inverse** swaps the two sides
//! - **shift** moves each run, reusing the run lengths
//! - **slicing**, **concatenation** and **composition** rebuild runs through an
//!   [`AlignmentBuilder`]
//!
//! # Mapping spans
//!
//! [`Alignment::map_to_modified`] and [`Alignment::map_to_original`] take a
//! half-open span on one side and return the smallest span on the other side
//! that is guaranteed to contain its image:
//!
//! ```ignore
//! use the_align::Alignment;
//!
//! let alignment = Alignment::from_pairs([(0, 0), (1, 2), (2, 4), (3, 6)])?;
//! assert_eq!(alignment.map_to_original(2..5)?, 1..3);
//! assert_eq!(alignment.map_to_modified(1..1)?, 2..2);
//! ```
//!
//! A coarse alignment can only answer coarsely: results are conservative
//! supersets of the true image.
//!
//! # Composition
//!
//! Alignments chain through [`Alignment::compose`] when the first one's
//! modified domain equals the second one's original domain:
//!
//! ```ignore
//! let lowered = Alignment::identity(0..5);
//! let stripped = Alignment::from_pairs([(0, 0), (1, 0), (4, 3), (5, 3)])?;
//! let both = lowered.compose(&stripped)?;
//! ```
//!
//! # Error Handling
//!
//! All fallible operations return [`Result<T, AlignmentError>`]:
//!
//! - **OrderingViolation** - A position moved backwards during construction
//! - **EmptyAlignment** - No pairs to build an alignment from
//! - **IndexOutOfRange** - A pair index is past the end
//! - **RangeOutOfBounds** - A span leaves the alignment's domain
//! - **InvalidRange** - A span starts after it ends
//! - **ShiftOutOfRange** - Shifting would move a position below zero
//! - **IncompatibleAlignments** - Composed alignments disagree on the shared
//!   domain
//! - **InvalidStride** - A non-unit or zero stride was requested
//! - **PositionOverflow** - A progression would run past `usize::MAX`

use std::{
  fmt,
  iter::FusedIterator,
  ops::{
    Bound,
    Range,
    RangeBounds,
  },
  sync::Arc,
  time::Instant,
};

use thiserror::Error;

use crate::{
  builder::AlignmentBuilder,
  progression::ArithmeticProgression,
};

pub type Result<T> = std::result::Result<T, AlignmentError>;

/// One of the two sequences an alignment relates.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub enum Side {
  Original,
  Modified,
}

impl Side {
  pub fn other(self) -> Self {
    match self {
      Side::Original => Side::Modified,
      Side::Modified => Side::Original,
    }
  }
}

impl fmt::Display for Side {
  fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
    f.write_str(match self {
      Side::Original => "original",
      Side::Modified => "modified",
    })
  }
}

#[derive(Debug, Clone, Error, PartialEq, Eq)]
#[non_exhaustive]
pub enum AlignmentError {
  #[error("{side} position moved backwards from {from} to {to}")]
  OrderingViolation { side: Side, from: usize, to: usize },
  #[error("an alignment needs at least one pair of positions")]
  EmptyAlignment,
  #[error("index {index} is out of range for length {len}")]
  IndexOutOfRange { index: isize, len: usize },
  #[error("{side} range {start}..{stop} is out of bounds {bounds:?}")]
  RangeOutOfBounds {
    side:   Side,
    start:  usize,
    stop:   usize,
    bounds: Range<usize>,
  },
  #[error("invalid range: start {start} is after end {stop}")]
  InvalidRange { start: usize, stop: usize },
  #[error("shifting position {position} by {delta} is out of range")]
  ShiftOutOfRange { position: usize, delta: isize },
  #[error("cannot compose alignments: modified bounds {left:?} differ from original bounds {right:?}")]
  IncompatibleAlignments {
    left:  Range<usize>,
    right: Range<usize>,
  },
  #[error("unsupported stride {stride}")]
  InvalidStride { stride: usize },
  #[error("{length} positions from {first} by {stride} overflow usize")]
  PositionOverflow {
    first:  usize,
    stride: usize,
    length: usize,
  },
}

#[derive(Clone)]
pub struct Alignment {
  original: Arc<[ArithmeticProgression]>,
  modified: Arc<[ArithmeticProgression]>,
  /// `lengths[i]` is the number of pairs held by the runs before run `i`.
  lengths:  Arc<[usize]>,
}

impl Alignment {
  /// Maps every position of `range` (both ends included) to itself.
  ///
  /// An identity over a sequence of length `n` is `identity(0..n)` and holds
  /// `n + 1` pairs. A reversed range is treated as empty.
  ///
  /// # Panics
  ///
  /// If the range covers every `usize`, since the pair count would overflow.
  #[must_use]
  pub fn identity(range: Range<usize>) -> Self {
    let stop = range.end.max(range.start);
    let Some(length) = (stop - range.start).checked_add(1) else {
      panic!("identity over {}..{stop} holds too many pairs", range.start);
    };
    let run = ArithmeticProgression::new(range.start, 1, length);
    Self::from_runs(&[run], &[run])
  }

  /// The coarsest alignment between two spans: their starts and their ends
  /// correspond, and nothing in between is known. Reversed ranges are
  /// treated as empty.
  #[must_use]
  pub fn spanning(original: Range<usize>, modified: Range<usize>) -> Self {
    let o_len = original.end.saturating_sub(original.start);
    let m_len = modified.end.saturating_sub(modified.start);
    let length = if o_len == 0 && m_len == 0 { 1 } else { 2 };
    Self::from_runs(
      &[ArithmeticProgression::new(original.start, o_len, length)],
      &[ArithmeticProgression::new(modified.start, m_len, length)],
    )
  }

  /// Builds an alignment from `(original, modified)` pairs.
  pub fn from_pairs(pairs: impl IntoIterator<Item = (usize, usize)>) -> Result<Self> {
    let mut builder = AlignmentBuilder::new();
    builder.extend(pairs)?;
    builder.build()
  }

  pub(crate) fn from_runs(
    original: &[ArithmeticProgression],
    modified: &[ArithmeticProgression],
  ) -> Self {
    debug_assert_eq!(original.len(), modified.len());
    debug_assert!(!original.is_empty());

    let mut lengths = Vec::with_capacity(original.len() + 1);
    lengths.push(0);
    let mut total = 0;
    for run in original {
      total += run.len();
      lengths.push(total);
    }

    Self {
      original: Arc::from(original),
      modified: Arc::from(modified),
      lengths:  Arc::from(lengths),
    }
  }

  /// Number of aligned pairs.
  pub fn len(&self) -> usize {
    self.lengths[self.lengths.len() - 1]
  }

  /// Always false: an alignment holds at least one pair.
  pub fn is_empty(&self) -> bool {
    false
  }

  /// The pair at `index`, if any.
  pub fn get(&self, index: usize) -> Option<(usize, usize)> {
    (index < self.len()).then(|| self.pair_at(index))
  }

  pub fn first(&self) -> (usize, usize) {
    (self.original[0].first(), self.modified[0].first())
  }

  pub fn last(&self) -> (usize, usize) {
    let last = self.original.len() - 1;
    (self.original[last].last(), self.modified[last].last())
  }

  pub fn iter(&self) -> Pairs<'_> {
    Pairs {
      original:  &self.original,
      modified:  &self.modified,
      run:       0,
      offset:    0,
      remaining: self.len(),
    }
  }

  /// The runs backing this alignment, one progression per side.
  pub fn runs(
    &self,
  ) -> impl ExactSizeIterator<Item = (ArithmeticProgression, ArithmeticProgression)> + '_ {
    self
      .original
      .iter()
      .copied()
      .zip(self.modified.iter().copied())
  }

  /// The whole span of original positions covered.
  pub fn original_bounds(&self) -> Range<usize> {
    self.bounds(Side::Original)
  }

  /// The whole span of modified positions covered.
  pub fn modified_bounds(&self) -> Range<usize> {
    self.bounds(Side::Modified)
  }

  /// Maps a span of the modified sequence to the smallest span of the
  /// original sequence known to contain it. An unbounded span (`..`) maps to
  /// [`original_bounds`](Self::original_bounds).
  pub fn map_to_original(&self, span: impl RangeBounds<usize>) -> Result<Range<usize>> {
    self.map(Side::Modified, span)
  }

  /// Maps a span of the original sequence to the smallest span of the
  /// modified sequence known to contain it. An unbounded span (`..`) maps to
  /// [`modified_bounds`](Self::modified_bounds).
  pub fn map_to_modified(&self, span: impl RangeBounds<usize>) -> Result<Range<usize>> {
    self.map(Side::Original, span)
  }

  /// The pairs at indices `range`.
  pub fn slice(&self, range: impl RangeBounds<usize>) -> Result<Self> {
    let len = self.len();
    let start = match range.start_bound() {
      Bound::Included(&start) => start,
      Bound::Excluded(&start) => start.saturating_add(1),
      Bound::Unbounded => 0,
    };
    let stop = match range.end_bound() {
      Bound::Included(&stop) => stop.saturating_add(1),
      Bound::Excluded(&stop) => stop,
      Bound::Unbounded => len,
    };

    if start > stop {
      return Err(AlignmentError::InvalidRange { start, stop });
    }
    if stop > len {
      return Err(AlignmentError::IndexOutOfRange {
        index: isize::try_from(stop).unwrap_or(isize::MAX),
        len,
      });
    }

    let mut builder = AlignmentBuilder::new();
    for (o, m) in self.segment(start..stop) {
      builder.push_run(o, m)?;
    }
    builder.build()
  }

  /// Restricts the alignment to the original positions in `span`. The result
  /// covers exactly `span` on the original side.
  pub fn slice_by_original(&self, span: impl RangeBounds<usize>) -> Result<Self> {
    self.slice_by(Side::Original, span)
  }

  /// Restricts the alignment to the modified positions in `span`. The result
  /// covers exactly `span` on the modified side.
  pub fn slice_by_modified(&self, span: impl RangeBounds<usize>) -> Result<Self> {
    self.slice_by(Side::Modified, span)
  }

  /// Moves every original position by `delta_o` and every modified position
  /// by `delta_m`.
  pub fn shift(&self, delta_o: isize, delta_m: isize) -> Result<Self> {
    let original = self
      .original
      .iter()
      .map(|run| run.shift(delta_o))
      .collect::<Result<Arc<[_]>>>()?;
    let modified = self
      .modified
      .iter()
      .map(|run| run.shift(delta_m))
      .collect::<Result<Arc<[_]>>>()?;

    Ok(Self {
      original,
      modified,
      lengths: Arc::clone(&self.lengths),
    })
  }

  /// Appends `other`'s pairs after this alignment's. A shared boundary pair is
  /// kept once.
  pub fn concat(&self, other: &Self) -> Result<Self> {
    let mut builder = AlignmentBuilder::with_capacity(self.original.len() + other.original.len());
    builder.extend_alignment(self)?;
    builder.extend_alignment(other)?;
    builder.build()
  }

  /// Chains this alignment with `other`, which must start from this
  /// alignment's modified domain, into an alignment from this original
  /// sequence to `other`'s modified sequence.
  pub fn compose(&self, other: &Self) -> Result<Self> {
    let (left, right) = (self.modified_bounds(), other.original_bounds());
    if left != right {
      return Err(AlignmentError::IncompatibleAlignments { left, right });
    }

    let start = tracing::enabled!(tracing::Level::DEBUG).then(Instant::now);

    let mut builder = AlignmentBuilder::with_capacity(self.original.len() + other.original.len());
    let mut lhs = Cursor::new(self.iter());
    let mut rhs = Cursor::new(other.iter());

    while let Some((mut o, mut m)) = lhs.current {
      // Lower bound of `o` in `other`.
      while let Some((ro, _)) = rhs.current
        && ro < m
      {
        rhs.advance();
      }
      let Some((ro, rm)) = rhs.current else {
        break;
      };
      while m < ro
        && let Some((no, nm)) = lhs.next
        && nm <= ro
      {
        lhs.advance();
        (o, m) = (no, nm);
      }
      builder.append(o, rm)?;

      // Upper bound, if it differs.
      while let Some((no, nm)) = lhs.next
        && no == o
      {
        lhs.advance();
        m = nm;
      }
      let mut upper = None;
      while let Some((ro, rm)) = rhs.next
        && m >= ro
      {
        rhs.advance();
        upper = Some(rm);
      }
      if let Some(rm) = upper {
        builder.append(o, rm)?;
      }

      lhs.advance();
    }

    let composed = builder.build()?;
    if let Some(start) = start {
      tracing::debug!(
        "alignment compose of {} and {} runs took {}s",
        self.original.len(),
        other.original.len(),
        start.elapsed().as_secs_f64()
      );
    }
    Ok(composed)
  }

  /// Swaps the original and modified sides.
  #[must_use]
  pub fn inverse(&self) -> Self {
    Self {
      original: Arc::clone(&self.modified),
      modified: Arc::clone(&self.original),
      lengths:  Arc::clone(&self.lengths),
    }
  }

  fn side(&self, side: Side) -> &[ArithmeticProgression] {
    match side {
      Side::Original => &self.original,
      Side::Modified => &self.modified,
    }
  }

  fn bounds(&self, side: Side) -> Range<usize> {
    let runs = self.side(side);
    runs[0].first()..runs[runs.len() - 1].last()
  }

  /// Run and offset of the pair at `index`. `len()` maps one past the last
  /// run.
  fn locate(&self, index: usize) -> (usize, usize) {
    let run = self.lengths.partition_point(|&start| start <= index) - 1;
    (run, index - self.lengths[run])
  }

  fn pair_at(&self, index: usize) -> (usize, usize) {
    let (run, offset) = self.locate(index);
    (self.original[run].nth(offset), self.modified[run].nth(offset))
  }

  fn value_at(&self, side: Side, index: usize) -> usize {
    let (run, offset) = self.locate(index);
    self.side(side)[run].nth(offset)
  }

  /// The runs covering pair indices `range`, trimmed to it.
  fn segment(
    &self,
    range: Range<usize>,
  ) -> impl Iterator<Item = (ArithmeticProgression, ArithmeticProgression)> + '_ {
    let (first_run, first_offset) = self.locate(range.start);
    let (last_run, last_offset) = self.locate(range.end);
    let last_run = last_run.min(self.original.len() - 1);
    let end_offset = move |run: usize| {
      if run == last_run && range.end < self.len() {
        last_offset
      } else {
        self.original[run].len()
      }
    };

    (first_run..=last_run).filter_map(move |run| {
      let from = if run == first_run { first_offset } else { 0 };
      let to = end_offset(run);
      (from < to).then(|| {
        (
          self.original[run].range(from, to),
          self.modified[run].range(from, to),
        )
      })
    })
  }

  /// Number of pairs whose `side` position is at most `value`.
  fn count_at_most(&self, side: Side, value: usize) -> usize {
    let runs = self.side(side);
    let run = runs.partition_point(|ap| ap.first() <= value);
    if run == 0 {
      return 0;
    }

    let ap = &runs[run - 1];
    let within = match ap.stride() {
      0 => ap.len(),
      stride => ((value - ap.first()) / stride + 1).min(ap.len()),
    };
    self.lengths[run - 1] + within
  }

  /// Number of pairs whose `side` position is below `value`.
  fn count_below(&self, side: Side, value: usize) -> usize {
    let runs = self.side(side);
    let run = runs.partition_point(|ap| ap.first() < value);
    if run == 0 {
      return 0;
    }

    let ap = &runs[run - 1];
    let within = match ap.stride() {
      0 => ap.len(),
      stride => (value - ap.first()).div_ceil(stride).min(ap.len()),
    };
    self.lengths[run - 1] + within
  }

  fn resolve(&self, side: Side, span: impl RangeBounds<usize>) -> Result<Range<usize>> {
    let bounds = self.bounds(side);
    let start = match span.start_bound() {
      Bound::Included(&start) => start,
      Bound::Excluded(&start) => start.saturating_add(1),
      Bound::Unbounded => bounds.start,
    };
    let stop = match span.end_bound() {
      Bound::Included(&stop) => stop.saturating_add(1),
      Bound::Excluded(&stop) => stop,
      Bound::Unbounded => bounds.end,
    };

    if start > stop {
      return Err(AlignmentError::InvalidRange { start, stop });
    }
    if start < bounds.start || stop > bounds.end {
      return Err(AlignmentError::RangeOutOfBounds {
        side,
        start,
        stop,
        bounds,
      });
    }
    Ok(start..stop)
  }

  /// Pair indices `(lower, upper)` where `lower` is the last pair at or
  /// before `span.start` and `upper` the first pair from `lower` on at or
  /// after `span.end`. The span must be resolved.
  fn search(&self, side: Side, span: &Range<usize>) -> (usize, usize) {
    let lower = self.count_at_most(side, span.start) - 1;
    let upper = self.count_below(side, span.end).max(lower);
    (lower, upper)
  }

  fn map(&self, source: Side, span: impl RangeBounds<usize>) -> Result<Range<usize>> {
    let target = source.other();
    if let (Bound::Unbounded, Bound::Unbounded) = (span.start_bound(), span.end_bound()) {
      return Ok(self.bounds(target));
    }

    let span = self.resolve(source, span)?;
    let (lower, upper) = self.search(source, &span);
    Ok(self.value_at(target, lower)..self.value_at(target, upper))
  }

  fn slice_by(&self, side: Side, span: impl RangeBounds<usize>) -> Result<Self> {
    let span = self.resolve(side, span)?;
    let (lower, upper) = self.search(side, &span);

    // Only the end pairs can fall outside the span.
    let clamp = |(o, m): (usize, usize)| {
      match side {
        Side::Original => (o.clamp(span.start, span.end), m),
        Side::Modified => (o, m.clamp(span.start, span.end)),
      }
    };

    let mut builder = AlignmentBuilder::new();
    let (o, m) = clamp(self.pair_at(lower));
    builder.append(o, m)?;
    for (o, m) in self.segment(lower + 1..upper) {
      builder.push_run(o, m)?;
    }
    if upper > lower {
      let (o, m) = clamp(self.pair_at(upper));
      builder.append(o, m)?;
    }
    builder.build()
  }
}

impl PartialEq for Alignment {
  fn eq(&self, other: &Self) -> bool {
    self.len() == other.len() && self.iter().eq(other.iter())
  }
}

impl Eq for Alignment {}

impl fmt::Display for Alignment {
  fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
    let mut chunks = Vec::new();
    for (o, m) in self.runs() {
      let len = o.len();
      chunks.push(format!("{}⇋{}", o.first(), m.first()));
      if len > 1 {
        chunks.push(format!("{}⇋{}", o.nth(1), m.nth(1)));
      }
      if len > 3 {
        chunks.push("...".to_string());
      }
      if len > 2 {
        chunks.push(format!("{}⇋{}", o.last(), m.last()));
      }
    }
    write!(f, "[{}]", chunks.join(", "))
  }
}

impl fmt::Debug for Alignment {
  fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
    if self.original.len() == 1
      && self.original[0].stride() == 1
      && self.original[0] == self.modified[0]
    {
      let bounds = self.original_bounds();
      return write!(f, "Alignment::identity({}..{})", bounds.start, bounds.end);
    }

    let len = self.len();
    f.write_str("Alignment([")?;
    for (i, (o, m)) in self.iter().enumerate() {
      if len > 5 && (2..len - 2).contains(&i) {
        if i == 2 {
          f.write_str(", ...")?;
        }
        continue;
      }
      if i > 0 {
        f.write_str(", ")?;
      }
      write!(f, "({o}, {m})")?;
    }
    f.write_str("])")
  }
}

impl<'a> IntoIterator for &'a Alignment {
  type IntoIter = Pairs<'a>;
  type Item = (usize, usize);

  fn into_iter(self) -> Pairs<'a> {
    self.iter()
  }
}

/// Iterator over the pairs of an [`Alignment`].
#[derive(Debug, Clone)]
pub struct Pairs<'a> {
  original:  &'a [ArithmeticProgression],
  modified:  &'a [ArithmeticProgression],
  run:       usize,
  offset:    usize,
  remaining: usize,
}

impl Iterator for Pairs<'_> {
  type Item = (usize, usize);

  fn next(&mut self) -> Option<(usize, usize)> {
    let o = self.original.get(self.run)?;
    let m = self.modified.get(self.run)?;
    let pair = (o.nth(self.offset), m.nth(self.offset));

    self.offset += 1;
    if self.offset == o.len() {
      self.run += 1;
      self.offset = 0;
    }
    self.remaining -= 1;
    Some(pair)
  }

  fn size_hint(&self) -> (usize, Option<usize>) {
    (self.remaining, Some(self.remaining))
  }
}

impl ExactSizeIterator for Pairs<'_> {}

impl FusedIterator for Pairs<'_> {}

/// A pair iterator that also exposes the pair after the current one.
struct Cursor<I> {
  pairs:   I,
  current: Option<(usize, usize)>,
  next:    Option<(usize, usize)>,
}

impl<I: Iterator<Item = (usize, usize)>> Cursor<I> {
  fn new(mut pairs: I) -> Self {
    let current = pairs.next();
    let next = pairs.next();
    Self {
      pairs,
      current,
      next,
    }
  }

  fn advance(&mut self) {
    self.current = self.next;
    self.next = self.pairs.next();
  }
}

#[cfg(test)]
mod tests {
  use super::*;

  fn pairs(alignment: &Alignment) -> Vec<(usize, usize)> {
    alignment.iter().collect()
  }

  fn doubled() -> Alignment {
    Alignment::from_pairs([(0, 0), (1, 2), (2, 4), (3, 6)]).unwrap()
  }

  #[test]
  fn identity() {
    let alignment = Alignment::identity(1..6);
    assert_eq!(alignment.len(), 6);
    assert_eq!(alignment.runs().len(), 1);
    assert_eq!(alignment.original_bounds(), 1..6);
    assert_eq!(alignment.modified_bounds(), 1..6);
    assert_eq!(alignment.get(3), Some((4, 4)));
    assert_eq!(alignment.get(6), None);

    let empty = Alignment::identity(0..0);
    assert_eq!(pairs(&empty), vec![(0, 0)]);

    let top = Alignment::identity(usize::MAX - 2..usize::MAX);
    assert_eq!(top.len(), 3);
    assert_eq!(top.last(), (usize::MAX, usize::MAX));
  }

  #[test]
  #[should_panic(expected = "too many pairs")]
  fn identity_over_every_position() {
    let _ = Alignment::identity(0..usize::MAX);
  }

  #[test]
  fn spanning() {
    let alignment = Alignment::spanning(0..4, 0..8);
    assert_eq!(pairs(&alignment), vec![(0, 0), (4, 8)]);
    assert_eq!(alignment.map_to_original(2..3), Ok(0..4));

    assert_eq!(pairs(&Alignment::spanning(2..2, 3..5)), vec![(2, 3), (2, 5)]);
    assert_eq!(Alignment::spanning(0..0, 0..0), Alignment::identity(0..0));
  }

  #[test]
  fn equality_ignores_run_layout() {
    let a = Alignment::from_pairs([(0, 0), (1, 2), (1, 2), (2, 4)]).unwrap();
    let b = Alignment::from_pairs([(0, 0), (1, 2), (2, 4)]).unwrap();
    assert_eq!(a, b);

    let merged = Alignment::identity(0..4);
    let split = Alignment::identity(0..2)
      .concat(&Alignment::identity(2..4))
      .unwrap();
    assert_eq!(merged, split);
    assert_ne!(merged, Alignment::identity(0..3));
  }

  #[test]
  fn empty_pairs_fail() {
    assert_eq!(
      Alignment::from_pairs([]),
      Err(AlignmentError::EmptyAlignment)
    );
  }

  #[test]
  fn original_bounds() {
    let alignment = doubled();
    let cases = [
      ((0, 0), (0, 0)),
      ((0, 1), (0, 1)),
      ((0, 2), (0, 1)),
      ((0, 3), (0, 2)),
      ((1, 1), (0, 1)),
      ((1, 3), (0, 2)),
      ((1, 4), (0, 2)),
      ((2, 2), (1, 1)),
      ((2, 4), (1, 2)),
      ((2, 5), (1, 3)),
      ((3, 3), (1, 2)),
    ];
    for ((start, stop), (lo, hi)) in cases {
      assert_eq!(
        alignment.map_to_original(start..stop),
        Ok(lo..hi),
        "map_to_original({start}..{stop})"
      );
    }
    assert_eq!(alignment.map_to_original(..), Ok(0..3));
    assert_eq!(alignment.original_bounds(), 0..3);
  }

  #[test]
  fn modified_bounds() {
    let alignment = doubled();
    let cases = [
      ((0, 0), (0, 0)),
      ((0, 1), (0, 2)),
      ((0, 2), (0, 4)),
      ((0, 3), (0, 6)),
      ((1, 1), (2, 2)),
      ((2, 2), (4, 4)),
    ];
    for ((start, stop), (lo, hi)) in cases {
      assert_eq!(
        alignment.map_to_modified(start..stop),
        Ok(lo..hi),
        "map_to_modified({start}..{stop})"
      );
    }
    assert_eq!(alignment.modified_bounds(), 0..6);
  }

  #[test]
  fn span_errors() {
    let alignment = Alignment::identity(2..5);
    assert_eq!(
      alignment.map_to_modified(1..3),
      Err(AlignmentError::RangeOutOfBounds {
        side:   Side::Original,
        start:  1,
        stop:   3,
        bounds: 2..5,
      })
    );
    assert_eq!(
      alignment.map_to_original(4..6),
      Err(AlignmentError::RangeOutOfBounds {
        side:   Side::Modified,
        start:  4,
        stop:   6,
        bounds: 2..5,
      })
    );
    assert_eq!(
      alignment.map_to_original(4..3),
      Err(AlignmentError::InvalidRange { start: 4, stop: 3 })
    );
  }

  #[test]
  fn repeated_positions() {
    // "ab---" aligned to "ab": the dashes collapse onto position 2.
    let alignment =
      Alignment::from_pairs([(0, 0), (1, 1), (2, 2), (3, 2), (4, 2), (5, 2)]).unwrap();
    assert_eq!(alignment.map_to_modified(2..5), Ok(2..2));
    assert_eq!(alignment.map_to_modified(1..3), Ok(1..2));
    // An empty span snaps to the last pair at its position.
    assert_eq!(alignment.map_to_original(2..2), Ok(5..5));
    assert_eq!(alignment.map_to_original(1..2), Ok(1..2));
    assert_eq!(alignment.map_to_original(..), Ok(0..5));
    assert_eq!(alignment.map_to_original(0..2), Ok(0..2));
    assert_eq!(alignment.map_to_original(0..), Ok(0..2));
    assert_eq!(alignment.map_to_modified(..), Ok(0..2));
  }

  #[test]
  fn slicing_by_index() {
    let alignment = Alignment::identity(0..5);
    assert_eq!(alignment.slice(1..5).unwrap(), Alignment::identity(1..4));
    assert_eq!(alignment.slice(..).unwrap(), alignment);
    assert_eq!(alignment.slice(2..=2).unwrap(), Alignment::identity(2..2));
    assert_eq!(alignment.slice(3..3), Err(AlignmentError::EmptyAlignment));
    assert_eq!(
      alignment.slice(2..7),
      Err(AlignmentError::IndexOutOfRange { index: 7, len: 6 })
    );

    let mixed = Alignment::from_pairs([(0, 0), (1, 1), (2, 2), (4, 3), (6, 4), (7, 7)]).unwrap();
    assert_eq!(
      pairs(&mixed.slice(2..5).unwrap()),
      vec![(2, 2), (4, 3), (6, 4)]
    );
  }

  #[test]
  fn slicing_by_side() {
    let alignment = Alignment::identity(0..5).shift(1, 0).unwrap();
    let sliced = alignment.slice_by_original(2..4).unwrap();
    assert_eq!(pairs(&sliced), vec![(2, 1), (3, 2), (4, 3)]);
    assert_eq!(sliced.to_string(), "[2⇋1, 3⇋2, 4⇋3]");

    let coarse = Alignment::from_pairs([(0, 0), (4, 8)]).unwrap();
    let sliced = coarse.slice_by_modified(2..5).unwrap();
    assert_eq!(pairs(&sliced), vec![(0, 2), (4, 5)]);
    assert_eq!(sliced.modified_bounds(), 2..5);

    let sliced = coarse.slice_by_original(1..3).unwrap();
    assert_eq!(pairs(&sliced), vec![(1, 0), (3, 8)]);

    let sliced = doubled().slice_by_modified(3..3).unwrap();
    assert_eq!(pairs(&sliced), vec![(1, 3), (2, 3)]);
  }

  #[test]
  fn shifting() {
    let alignment = doubled().shift(2, 0).unwrap();
    assert_eq!(pairs(&alignment), vec![(2, 0), (3, 2), (4, 4), (5, 6)]);
    assert_eq!(
      doubled().shift(0, -1),
      Err(AlignmentError::ShiftOutOfRange {
        position: 0,
        delta:    -1,
      })
    );
  }

  #[test]
  fn concatenation() {
    let a = Alignment::from_pairs([(0, 0), (2, 1)]).unwrap();
    let b = Alignment::identity(0..3).shift(2, 1).unwrap();
    let joined = a.concat(&b).unwrap();
    assert_eq!(
      pairs(&joined),
      vec![(0, 0), (2, 1), (3, 2), (4, 3), (5, 4)]
    );
    assert_eq!(joined.original_bounds(), 0..5);
    assert_eq!(joined.modified_bounds(), 0..4);

    assert_eq!(
      a.concat(&Alignment::identity(0..3)),
      Err(AlignmentError::OrderingViolation {
        side: Side::Original,
        from: 2,
        to:   0,
      })
    );
  }

  #[test]
  fn inverse_round_trip() {
    let alignment = doubled();
    let inverse = alignment.inverse();
    assert_eq!(pairs(&inverse), vec![(0, 0), (2, 1), (4, 2), (6, 3)]);
    assert_eq!(inverse.inverse(), alignment);
    assert_eq!(
      Alignment::identity(0..7).inverse().inverse(),
      Alignment::identity(0..7)
    );
    assert_eq!(
      inverse.map_to_modified(2..5),
      alignment.map_to_original(2..5)
    );
  }

  #[test]
  fn compose_with_identity() {
    let alignment = Alignment::from_pairs([(0, 2), (2, 2), (4, 4), (6, 6), (8, 6)])
      .unwrap()
      .shift(0, -2)
      .unwrap();
    let left = Alignment::identity(0..8);
    let right = Alignment::identity(0..4);

    assert_eq!(left.compose(&alignment).unwrap(), alignment);
    assert_eq!(alignment.compose(&right).unwrap(), alignment);
    assert_eq!(
      alignment.inverse().compose(&left).unwrap(),
      alignment.inverse()
    );
  }

  #[test]
  fn compose_chains() {
    // Doubling then doubling again.
    let first = doubled();
    let second = Alignment::from_pairs((0..=6).map(|i| (i, 2 * i))).unwrap();
    let composed = first.compose(&second).unwrap();
    assert_eq!(pairs(&composed), vec![(0, 0), (1, 4), (2, 8), (3, 12)]);
    assert_eq!(composed.map_to_original(5..9), Ok(1..3));
  }

  #[test]
  fn compose_requires_matching_domains() {
    assert_eq!(
      doubled().compose(&Alignment::identity(0..5)),
      Err(AlignmentError::IncompatibleAlignments {
        left:  0..6,
        right: 0..5,
      })
    );
  }

  #[test]
  fn display_and_debug() {
    assert_eq!(
      Alignment::identity(0..5).to_string(),
      "[0⇋0, 1⇋1, ..., 5⇋5]"
    );
    assert_eq!(
      format!("{:?}", Alignment::identity(2..7)),
      "Alignment::identity(2..7)"
    );
    assert_eq!(
      format!("{:?}", doubled()),
      "Alignment([(0, 0), (1, 2), (2, 4), (3, 6)])"
    );

    let long = Alignment::from_pairs((0..8).map(|i| (i, i * i))).unwrap();
    assert_eq!(
      format!("{long:?}"),
      "Alignment([(0, 0), (1, 1), ..., (6, 36), (7, 49)])"
    );
  }
}
