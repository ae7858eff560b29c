//! Inferring alignments from edit distance.
//!
//! [`Alignment::infer`] finds a minimum-cost sequence of substitutions,
//! insertions and deletions turning one sequence into another, and records
//! it as an alignment. Short inputs are solved with the full Wagner-Fischer
//! matrix; longer ones with Hirschberg's divide and conquer, which keeps only
//! two rows of costs alive at a time.
//!
//! The search always runs along the longer input, swapping the arguments (and
//! the cost function's) when the original side is shorter, so
//! `infer(a, b) == infer(b, a).inverse()` whenever the lengths differ and the
//! costs are symmetric. Equal lengths can break ties either way; both
//! directions still find the optimal cost.
//!
//! Both take `O(N * M)` time for inputs of lengths `N` and `M`, so inference
//! is meant for short sequences. Space is `O(N + M)`, and the recursion depth
//! is bounded by `log2(N) + 1` because every level halves the original side.

use std::{
  ops::Add,
  time::Instant,
};

use crate::alignment::{
  Alignment,
  Result,
};

/// A cost produced by an edit cost function.
pub trait Cost: Copy + PartialOrd + Add<Output = Self> + Default {}

impl<N> Cost for N where N: Copy + PartialOrd + Add<Output = N> + Default {}

impl Alignment {
  /// Infers the alignment with the fewest edits, where replacing an element
  /// with an equal one is free and every other edit costs one.
  ///
  /// ```ignore
  /// let original: Vec<char> = "color".chars().collect();
  /// let modified: Vec<char> = "colour".chars().collect();
  /// let alignment = Alignment::infer(&original, &modified)?;
  /// assert_eq!(alignment.map_to_original(3..5)?, 3..4);
  /// ```
  pub fn infer<T, U>(original: &[T], modified: &[U]) -> Result<Self>
  where
    T: PartialEq<U>,
  {
    Self::infer_with_costs(original, modified, |a: Option<&T>, b: Option<&U>| {
      match (a, b) {
        (Some(a), Some(b)) => usize::from(a != b),
        _ => 1,
      }
    })
  }

  /// Infers the cheapest alignment under `cost_fn`.
  ///
  /// `cost_fn(Some(a), Some(b))` is the cost of replacing `a` with `b`,
  /// `cost_fn(Some(a), None)` of deleting `a` and `cost_fn(None, Some(b))` of
  /// inserting `b`.
  pub fn infer_with_costs<T, U, N, F>(original: &[T], modified: &[U], cost_fn: F) -> Result<Self>
  where
    N: Cost,
    F: Fn(Option<&T>, Option<&U>) -> N,
  {
    let start = tracing::enabled!(tracing::Level::DEBUG).then(Instant::now);

    let mut pairs = Vec::with_capacity(original.len() + modified.len() + 2);
    let alignment = if original.len() < modified.len() {
      // Recurse along the longer side.
      let swapped = |a: Option<&U>, b: Option<&T>| cost_fn(b, a);
      hirschberg(modified, original, (0, 0), &swapped, &mut pairs);
      Self::from_pairs(pairs)?.inverse()
    } else {
      hirschberg(original, modified, (0, 0), &cost_fn, &mut pairs);
      Self::from_pairs(pairs)?
    };

    if let Some(start) = start {
      tracing::debug!(
        "alignment inference of {}x{} elements took {}s",
        original.len(),
        modified.len(),
        start.elapsed().as_secs_f64()
      );
    }
    Ok(alignment)
  }
}

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
enum Direction {
  Forward,
  Backward,
}

impl Direction {
  fn order<X>(self, items: &[X]) -> Vec<&X> {
    match self {
      Direction::Forward => items.iter().collect(),
      Direction::Backward => items.iter().rev().collect(),
    }
  }
}

/// Backpointer of a cell in the full cost matrix.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
enum Step {
  Start,
  Substitute,
  Delete,
  Insert,
}

fn cheaper<N: PartialOrd>(a: N, b: N) -> N {
  if b < a { b } else { a }
}

/// Appends the optimal pairs for `original` against `modified`, offset by
/// `offset`, to `out`.
fn hirschberg<T, U, N, F>(
  original: &[T],
  modified: &[U],
  offset: (usize, usize),
  cost_fn: &F,
  out: &mut Vec<(usize, usize)>,
) where
  N: Cost,
  F: Fn(Option<&T>, Option<&U>) -> N,
{
  if original.len() <= 1 || modified.len() <= 1 {
    full_matrix(original, modified, offset, cost_fn, out);
    return;
  }

  let omid = original.len() / 2;
  let (oleft, oright) = original.split_at(omid);

  let lcosts = last_row(oleft, modified, Direction::Forward, cost_fn);
  let rcosts = last_row(oright, modified, Direction::Backward, cost_fn);

  let mut mmid = 0;
  let mut best = lcosts[0] + rcosts[0];
  for (i, (&l, &r)) in lcosts.iter().zip(&rcosts).enumerate().skip(1) {
    let total = l + r;
    if total < best {
      best = total;
      mmid = i;
    }
  }
  tracing::trace!(omid, mmid, "split alignment inference");

  let (mleft, mright) = modified.split_at(mmid);
  hirschberg(oleft, mleft, offset, cost_fn, out);
  hirschberg(
    oright,
    mright,
    (offset.0 + omid, offset.1 + mmid),
    cost_fn,
    out,
  );
}

/// The last row of the Wagner-Fischer cost matrix, computed in `O(M)`
/// space. Walking [`Direction::Backward`] aligns suffixes instead of
/// prefixes, and the row comes back indexed by suffix start.
fn last_row<T, U, N, F>(original: &[T], modified: &[U], direction: Direction, cost_fn: &F) -> Vec<N>
where
  N: Cost,
  F: Fn(Option<&T>, Option<&U>) -> N,
{
  let originals = direction.order(original);
  let modifieds = direction.order(modified);

  let mut row = Vec::with_capacity(modifieds.len() + 1);
  row.push(N::default());
  for (i, &m) in modifieds.iter().enumerate() {
    let cost = row[i] + cost_fn(None, Some(m));
    row.push(cost);
  }

  let mut prev = vec![N::default(); row.len()];
  for &o in &originals {
    std::mem::swap(&mut prev, &mut row);
    row[0] = prev[0] + cost_fn(Some(o), None);

    for (i, &m) in modifieds.iter().enumerate() {
      let sub_cost = prev[i] + cost_fn(Some(o), Some(m));
      let del_cost = prev[i + 1] + cost_fn(Some(o), None);
      let ins_cost = row[i] + cost_fn(None, Some(m));
      row[i + 1] = cheaper(cheaper(sub_cost, del_cost), ins_cost);
    }
  }

  if direction == Direction::Backward {
    row.reverse();
  }
  row
}

/// Solves the whole cost matrix and walks the backpointers.
fn full_matrix<T, U, N, F>(
  original: &[T],
  modified: &[U],
  offset: (usize, usize),
  cost_fn: &F,
  out: &mut Vec<(usize, usize)>,
) where
  N: Cost,
  F: Fn(Option<&T>, Option<&U>) -> N,
{
  let width = modified.len() + 1;
  let mut matrix: Vec<(N, Step)> = Vec::with_capacity((original.len() + 1) * width);

  matrix.push((N::default(), Step::Start));
  for (j, m) in modified.iter().enumerate() {
    let cost = matrix[j].0 + cost_fn(None, Some(m));
    matrix.push((cost, Step::Insert));
  }

  for (i, o) in original.iter().enumerate() {
    let above = i * width;
    let here = above + width;
    let cost = matrix[above].0 + cost_fn(Some(o), None);
    matrix.push((cost, Step::Delete));

    for (j, m) in modified.iter().enumerate() {
      let mut best = (matrix[above + j].0 + cost_fn(Some(o), Some(m)), Step::Substitute);

      let del_cost = matrix[above + j + 1].0 + cost_fn(Some(o), None);
      if del_cost < best.0 {
        best = (del_cost, Step::Delete);
      }

      let ins_cost = matrix[here + j].0 + cost_fn(None, Some(m));
      if ins_cost < best.0 {
        best = (ins_cost, Step::Insert);
      }

      matrix.push(best);
    }
  }

  let mut path = Vec::with_capacity(original.len() + modified.len() + 1);
  let (mut i, mut j) = (original.len(), modified.len());
  loop {
    path.push((i + offset.0, j + offset.1));
    match matrix[i * width + j].1 {
      Step::Start => break,
      Step::Substitute => {
        i -= 1;
        j -= 1;
      },
      Step::Delete => i -= 1,
      Step::Insert => j -= 1,
    }
  }

  out.extend(path.into_iter().rev());
}
