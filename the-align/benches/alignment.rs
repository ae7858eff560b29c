//! Benchmarks for alignment operations in the-align.
//!
//! Run with: `cargo bench -p the-align --bench alignment`

use divan::{
  Bencher,
  black_box,
};
use the_align::{
  Alignment,
  AlignmentBuilder,
};

fn main() {
  divan::main();
}

fn make_ascii_text(size: usize) -> Vec<char> {
  let line = "The quick brown fox jumps over the lazy dog. ";
  line.chars().cycle().take(size).collect()
}

/// Deletes one character out of every `period`, which breaks the alignment
/// into `size / period` pairs of runs.
fn make_edited(size: usize, period: usize) -> Alignment {
  let mut builder = AlignmentBuilder::with_capacity(2 * size / period + 1);
  let mut m = 0;
  for o in 0..=size {
    builder.append(o, m).unwrap();
    if o % period != 0 {
      m += 1;
    }
  }
  builder.build().unwrap()
}

/// Rewrites `count` evenly spaced characters of `text`.
fn make_typos(text: &[char], count: usize) -> Vec<char> {
  let step = text.len() / (count + 1);
  let mut out = text.to_vec();
  for i in 0..count {
    out[(i + 1) * step] = '#';
  }
  out
}

// `Alignment::map_to_*` benchmarks.

mod map {
  use super::*;

  const SIZE: usize = 100 * 1024;

  #[divan::bench(args = [2, 16, 256])]
  fn to_modified(bencher: Bencher, period: usize) {
    let alignment = make_edited(SIZE, period);
    let span = SIZE / 3..2 * SIZE / 3;

    bencher.bench(|| {
      let mapped = alignment.map_to_modified(black_box(span.clone())).unwrap();
      black_box(mapped);
    });
  }

  #[divan::bench(args = [2, 16, 256])]
  fn to_original(bencher: Bencher, period: usize) {
    let alignment = make_edited(SIZE, period);
    let bounds = alignment.modified_bounds();
    let span = bounds.end / 3..2 * bounds.end / 3;

    bencher.bench(|| {
      let mapped = alignment.map_to_original(black_box(span.clone())).unwrap();
      black_box(mapped);
    });
  }
}

// `Alignment::compose` benchmarks.

mod compose {
  use super::*;

  const SIZE: usize = 16 * 1024;

  #[divan::bench(args = [2, 16, 256])]
  fn identity(bencher: Bencher, period: usize) {
    let alignment = make_edited(SIZE, period);
    let identity = Alignment::identity(alignment.modified_bounds());

    bencher.bench(|| {
      let composed = black_box(&alignment).compose(black_box(&identity)).unwrap();
      black_box(composed);
    });
  }

  #[divan::bench(args = [2, 16, 256])]
  fn edited(bencher: Bencher, period: usize) {
    let first = make_edited(SIZE, period);
    let second = make_edited(first.modified_bounds().end, period);

    bencher.bench(|| {
      let composed = black_box(&first).compose(black_box(&second)).unwrap();
      black_box(composed);
    });
  }
}

// `Alignment::infer` benchmarks.

mod infer {
  use super::*;

  #[divan::bench(args = [64, 256, 1024])]
  fn typos(bencher: Bencher, size: usize) {
    let original = make_ascii_text(size);
    let modified = make_typos(&original, 8);

    bencher.bench(|| {
      let alignment = Alignment::infer(black_box(&original), black_box(&modified)).unwrap();
      black_box(alignment);
    });
  }

  #[divan::bench(args = [64, 256, 1024])]
  fn disjoint(bencher: Bencher, size: usize) {
    let original = make_ascii_text(size);
    let modified = vec!['#'; size / 2];

    bencher.bench(|| {
      let alignment = Alignment::infer(black_box(&original), black_box(&modified)).unwrap();
      black_box(alignment);
    });
  }
}

// `AlignmentBuilder` benchmarks.

mod builder {
  use super::*;

  const SIZE: usize = 100 * 1024;

  #[divan::bench]
  fn identity(bencher: Bencher) {
    bencher.bench(|| {
      let mut builder = AlignmentBuilder::new();
      builder.extend((0..=SIZE).map(|i| (i, i))).unwrap();
      black_box(builder.build().unwrap());
    });
  }

  #[divan::bench(args = [2, 16, 256])]
  fn concat(bencher: Bencher, period: usize) {
    let alignment = make_edited(SIZE / 2, period);
    let (o, m) = alignment.last();
    let tail = alignment.shift(o as isize, m as isize).unwrap();

    bencher.bench(|| {
      let joined = black_box(&alignment).concat(black_box(&tail)).unwrap();
      black_box(joined);
    });
  }
}
