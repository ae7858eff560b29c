//! Arithmetic progressions, the run encoding behind [`Alignment`].
//!
//! A progression holds `length` integers starting at `first`, each one
//! `stride` past the previous. A stride of zero repeats the same value, which
//! is how runs of length zero and one are canonicalized: two progressions
//! describing the same values always compare equal.
//!
//! [`Alignment`]: crate::Alignment

use std::{
  fmt,
  iter::FusedIterator,
  ops::{
    Bound,
    RangeBounds,
  },
};

use crate::alignment::{
  AlignmentError,
  Result,
};

#[derive(Debug, Clone, Copy, Default, PartialEq, Eq, Hash)]
pub struct ArithmeticProgression {
  first:  usize,
  last:   usize,
  stride: usize,
  length: usize,
}

impl ArithmeticProgression {
  /// # Panics
  ///
  /// If the last value does not fit in a `usize`. See [`Self::try_new`].
  #[must_use]
  pub fn new(first: usize, stride: usize, length: usize) -> Self {
    match Self::try_new(first, stride, length) {
      Ok(ap) => ap,
      Err(err) => panic!("{err}"),
    }
  }

  pub fn try_new(first: usize, stride: usize, length: usize) -> Result<Self> {
    match length {
      0 => Ok(Self::default()),
      1 => {
        Ok(Self {
          first,
          last: first,
          stride: 0,
          length,
        })
      },
      _ => {
        let last = (length - 1)
          .checked_mul(stride)
          .and_then(|span| first.checked_add(span))
          .ok_or(AlignmentError::PositionOverflow {
            first,
            stride,
            length,
          })?;
        Ok(Self {
          first,
          last,
          stride,
          length,
        })
      },
    }
  }

  /// A progression holding a single value.
  #[must_use]
  pub fn single(value: usize) -> Self {
    Self::new(value, 0, 1)
  }

  pub fn first(&self) -> usize {
    self.first
  }

  pub fn last(&self) -> usize {
    self.last
  }

  pub fn stride(&self) -> usize {
    self.stride
  }

  pub fn len(&self) -> usize {
    self.length
  }

  pub fn is_empty(&self) -> bool {
    self.length == 0
  }

  /// Returns the value at `index`. Negative indices count back from the end,
  /// so `-1` is the last value.
  pub fn get(&self, index: isize) -> Result<usize> {
    let resolved = if index < 0 {
      index.checked_add_unsigned(self.length)
    } else {
      Some(index)
    };

    match resolved {
      Some(i) if i >= 0 && (i as usize) < self.length => Ok(self.nth(i as usize)),
      _ => {
        Err(AlignmentError::IndexOutOfRange {
          index,
          len: self.length,
        })
      },
    }
  }

  /// Takes every `step`th value of the positions in `range`. The range is
  /// clamped to the progression, so an oversized range yields a shorter
  /// result rather than an error.
  pub fn slice(&self, range: impl RangeBounds<usize>, step: usize) -> Result<Self> {
    if step == 0 {
      return Err(AlignmentError::InvalidStride { stride: step });
    }

    let (start, stop) = clamp(range, self.length);
    let length = (stop - start).div_ceil(step);
    Ok(Self::new(self.nth(start), self.stride * step, length))
  }

  /// Adds `delta` to every value.
  pub fn shift(&self, delta: isize) -> Result<Self> {
    if self.is_empty() {
      return Ok(*self);
    }

    match (
      self.first.checked_add_signed(delta),
      self.last.checked_add_signed(delta),
    ) {
      (Some(first), Some(last)) => {
        Ok(Self {
          first,
          last,
          ..*self
        })
      },
      _ => {
        Err(AlignmentError::ShiftOutOfRange {
          position: if delta < 0 { self.first } else { self.last },
          delta,
        })
      },
    }
  }

  pub fn iter(&self) -> Iter {
    Iter {
      next:      self.first,
      stride:    self.stride,
      remaining: self.length,
    }
  }

  /// Value at `index` without bounds checks.
  pub(crate) fn nth(&self, index: usize) -> usize {
    self.first + index * self.stride
  }

  /// The values at positions `start..stop`, which must lie within the
  /// progression.
  pub(crate) fn range(&self, start: usize, stop: usize) -> Self {
    debug_assert!(start <= stop && stop <= self.length);
    Self::new(self.nth(start), self.stride, stop - start)
  }

  /// Drops the first value.
  pub(crate) fn tail(&self) -> Self {
    self.range(self.length.min(1), self.length)
  }

  /// Continues the progression with `count` more values spaced by `stride`.
  ///
  /// Only valid when the progression has at most one value or `stride`
  /// already matches its own stride.
  pub(crate) fn extend_by(&mut self, stride: usize, count: usize) {
    debug_assert!(self.length <= 1 || self.stride == stride);
    if count == 0 {
      return;
    }
    if self.length == 0 {
      *self = Self::new(self.first, stride, count);
      return;
    }

    self.stride = stride;
    self.last += stride * count;
    self.length += count;
  }
}

fn clamp(range: impl RangeBounds<usize>, len: usize) -> (usize, usize) {
  let start = match range.start_bound() {
    Bound::Included(&start) => start,
    Bound::Excluded(&start) => start.saturating_add(1),
    Bound::Unbounded => 0,
  }
  .min(len);

  let stop = match range.end_bound() {
    Bound::Included(&stop) => stop.saturating_add(1),
    Bound::Excluded(&stop) => stop,
    Bound::Unbounded => len,
  }
  .min(len);

  (start, stop.max(start))
}

impl fmt::Display for ArithmeticProgression {
  fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
    if self.length <= 3 {
      f.write_str("[")?;
      for (i, value) in self.iter().enumerate() {
        if i > 0 {
          f.write_str(", ")?;
        }
        write!(f, "{value}")?;
      }
      f.write_str("]")
    } else if self.stride == 0 {
      write!(f, "[{}] * {}", self.first, self.length)
    } else {
      write!(f, "[{}, {}, ..., {}]", self.first, self.nth(1), self.last)
    }
  }
}

#[derive(Debug, Clone)]
pub struct Iter {
  next:      usize,
  stride:    usize,
  remaining: usize,
}

impl Iterator for Iter {
  type Item = usize;

  fn next(&mut self) -> Option<usize> {
    if self.remaining == 0 {
      return None;
    }
    let value = self.next;
    self.remaining -= 1;
    if self.remaining > 0 {
      self.next += self.stride;
    }
    Some(value)
  }

  fn size_hint(&self) -> (usize, Option<usize>) {
    (self.remaining, Some(self.remaining))
  }
}

impl ExactSizeIterator for Iter {}

impl FusedIterator for Iter {}

impl IntoIterator for ArithmeticProgression {
  type IntoIter = Iter;
  type Item = usize;

  fn into_iter(self) -> Iter {
    self.iter()
  }
}

impl IntoIterator for &ArithmeticProgression {
  type IntoIter = Iter;
  type Item = usize;

  fn into_iter(self) -> Iter {
    self.iter()
  }
}
