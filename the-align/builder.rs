use crate::{
  alignment::{
    Alignment,
    AlignmentError,
    Result,
    Side,
  },
  progression::ArithmeticProgression,
};

/// Incrementally assembles an [`Alignment`] from aligned pairs.
///
/// Pairs are merged greedily into runs: a pair extends the trailing run when
/// that run holds a single pair, or when the step from the previous pair
/// matches the run's strides on both sides. Anything else opens a new run.
#[derive(Debug, Default, Clone)]
pub struct AlignmentBuilder {
  original: Vec<ArithmeticProgression>,
  modified: Vec<ArithmeticProgression>,
}

impl AlignmentBuilder {
  pub fn new() -> Self {
    Self::default()
  }

  pub fn with_capacity(capacity: usize) -> Self {
    Self {
      original: Vec::with_capacity(capacity),
      modified: Vec::with_capacity(capacity),
    }
  }

  pub fn is_empty(&self) -> bool {
    self.original.is_empty()
  }

  /// The most recently appended pair.
  pub fn last(&self) -> Option<(usize, usize)> {
    Some((self.original.last()?.last(), self.modified.last()?.last()))
  }

  /// Appends one aligned pair. Appending the current last pair again is a
  /// no-op.
  pub fn append(&mut self, o: usize, m: usize) -> Result<()> {
    if let Some((lo, lm)) = self.last() {
      check_order(lo, lm, o, m)?;
      if (o, m) == (lo, lm) {
        return Ok(());
      }

      let (o_run, m_run) = self.trailing_mut();
      let (o_step, m_step) = (o - lo, m - lm);
      if o_run.len() == 1 || (o_step == o_run.stride() && m_step == m_run.stride()) {
        o_run.extend_by(o_step, 1);
        m_run.extend_by(m_step, 1);
        return Ok(());
      }
    }

    self.original.push(ArithmeticProgression::single(o));
    self.modified.push(ArithmeticProgression::single(m));
    Ok(())
  }

  pub fn extend(&mut self, pairs: impl IntoIterator<Item = (usize, usize)>) -> Result<()> {
    for (o, m) in pairs {
      self.append(o, m)?;
    }
    Ok(())
  }

  /// Appends every pair of `alignment`, merging whole runs at a time.
  pub fn extend_alignment(&mut self, alignment: &Alignment) -> Result<()> {
    for (o, m) in alignment.runs() {
      self.push_run(o, m)?;
    }
    Ok(())
  }

  /// Appends a run of pairs described by two progressions of equal length.
  ///
  /// Produces the same runs as appending the pairs one by one.
  pub(crate) fn push_run(
    &mut self,
    mut o: ArithmeticProgression,
    mut m: ArithmeticProgression,
  ) -> Result<()> {
    debug_assert_eq!(o.len(), m.len());
    if o.is_empty() {
      return Ok(());
    }

    if let Some((lo, lm)) = self.last() {
      check_order(lo, lm, o.first(), m.first())?;
      if (o.first(), m.first()) == (lo, lm) {
        o = o.tail();
        m = m.tail();
        if o.is_empty() {
          return Ok(());
        }
      }

      let (o_step, m_step) = (o.first() - lo, m.first() - lm);
      let (o_run, m_run) = self.trailing_mut();
      if o_run.len() == 1 || (o_step == o_run.stride() && m_step == m_run.stride()) {
        if o.len() == 1 || (o.stride() == o_step && m.stride() == m_step) {
          o_run.extend_by(o_step, o.len());
          m_run.extend_by(m_step, m.len());
          return Ok(());
        }

        // Only the head continues the trailing run.
        o_run.extend_by(o_step, 1);
        m_run.extend_by(m_step, 1);
        o = o.tail();
        m = m.tail();
      }
    }

    self.original.push(o);
    self.modified.push(m);
    Ok(())
  }

  /// Freezes the pairs appended so far into an [`Alignment`]. The builder
  /// keeps its state and can go on growing independently.
  pub fn build(&self) -> Result<Alignment> {
    if self.is_empty() {
      return Err(AlignmentError::EmptyAlignment);
    }
    Ok(Alignment::from_runs(&self.original, &self.modified))
  }

  /// Number of runs accumulated so far.
  pub fn runs(&self) -> usize {
    self.original.len()
  }

  fn trailing_mut(&mut self) -> (&mut ArithmeticProgression, &mut ArithmeticProgression) {
    let len = self.original.len();
    (&mut self.original[len - 1], &mut self.modified[len - 1])
  }
}

fn check_order(lo: usize, lm: usize, o: usize, m: usize) -> Result<()> {
  if o < lo {
    return Err(AlignmentError::OrderingViolation {
      side: Side::Original,
      from: lo,
      to:   o,
    });
  }
  if m < lm {
    return Err(AlignmentError::OrderingViolation {
      side: Side::Modified,
      from: lm,
      to:   m,
    });
  }
  Ok(())
}

#[cfg(test)]
mod tests {
  use super::*;

  fn runs_of(pairs: &[(usize, usize)]) -> usize {
    let mut builder = AlignmentBuilder::new();
    builder.extend(pairs.iter().copied()).unwrap();
    builder.runs()
  }

  #[test]
  fn stride_change_opens_a_run() {
    let mut builder = AlignmentBuilder::new();
    builder.append(0, 0).unwrap();
    builder.append(1, 1).unwrap();
    builder.append(2, 2).unwrap();
    builder.append(3, 4).unwrap();

    let alignment = builder.build().unwrap();
    assert_eq!(alignment.runs().len(), 2);
    assert_eq!(
      alignment.iter().collect::<Vec<_>>(),
      vec![(0, 0), (1, 1), (2, 2), (3, 4)]
    );
  }

  #[test]
  fn duplicates_collapse() {
    assert_eq!(runs_of(&[(0, 0), (1, 2), (1, 2), (2, 4)]), 1);
    assert_eq!(runs_of(&[(0, 0), (0, 0)]), 1);
  }

  #[test]
  fn singleton_run_adopts_next_stride() {
    // [0, 1] then [3, 5, 7] with a fresh stride after the first step.
    assert_eq!(runs_of(&[(0, 0), (1, 1), (3, 2), (5, 3), (7, 4)]), 2);
    assert_eq!(runs_of(&[(0, 0), (0, 1), (0, 2), (1, 3)]), 2);
  }

  #[test]
  fn backwards_movement_fails() {
    let mut builder = AlignmentBuilder::new();
    builder.append(2, 2).unwrap();
    assert_eq!(
      builder.append(1, 3),
      Err(AlignmentError::OrderingViolation {
        side: Side::Original,
        from: 2,
        to:   1,
      })
    );
    assert_eq!(
      builder.append(3, 1),
      Err(AlignmentError::OrderingViolation {
        side: Side::Modified,
        from: 2,
        to:   1,
      })
    );
    assert_eq!(builder.last(), Some((2, 2)));
  }

  #[test]
  fn empty_builder_fails() {
    assert_eq!(
      AlignmentBuilder::new().build(),
      Err(AlignmentError::EmptyAlignment)
    );
  }

  #[test]
  fn built_alignment_is_detached() {
    let mut builder = AlignmentBuilder::new();
    builder.extend([(0, 0), (1, 1)]).unwrap();
    let first = builder.build().unwrap();

    builder.append(2, 2).unwrap();
    let second = builder.build().unwrap();

    assert_eq!(first.len(), 2);
    assert_eq!(second.len(), 3);
    assert_eq!(first.last(), (1, 1));
  }

  #[test]
  fn run_merging_matches_pairwise_appends() {
    let pieces: [&[(usize, usize)]; 4] = [
      &[(0, 0), (1, 1), (2, 2)],
      &[(2, 2), (3, 3), (5, 4), (7, 5)],
      &[(8, 5), (9, 5), (10, 5)],
      &[(10, 7)],
    ];

    let mut pairwise = AlignmentBuilder::new();
    let mut runwise = AlignmentBuilder::new();
    for piece in pieces {
      pairwise.extend(piece.iter().copied()).unwrap();
      let alignment = Alignment::from_pairs(piece.iter().copied()).unwrap();
      runwise.extend_alignment(&alignment).unwrap();
    }

    assert_eq!(pairwise.runs(), runwise.runs());
    assert_eq!(pairwise.build(), runwise.build());
  }
}
