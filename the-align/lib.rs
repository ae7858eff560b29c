//! Alignments between an original sequence and a modified one.
//!
//! The core types are [`Alignment`], an immutable monotonic correspondence
//! between positions, and [`AlignmentBuilder`], which assembles one pair at a
//! time. [`Alignment::infer`] recovers an alignment from two sequences by
//! minimizing edit cost.

pub mod alignment;
pub mod builder;
pub mod infer;
pub mod progression;

pub use alignment::{
  Alignment,
  AlignmentError,
  Pairs,
  Result,
  Side,
};
pub use builder::AlignmentBuilder;
pub use infer::Cost;
pub use progression::ArithmeticProgression;
