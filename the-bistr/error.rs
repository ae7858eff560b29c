//! Errors raised while building and transforming bidirectional strings.
//!
//! # Error Handling
//!
//! - **Alignment** - An alignment operation failed
//! - **AlignmentMismatch** - An alignment does not cover the strings it is
//!   paired with
//! - **Incomplete** - A builder was finished before consuming its input
//! - **OutOfBounds** - A builder was asked to consume more than is left
//! - **Mismatch** - Appended text does not match the upcoming input
//! - **NotFound** - A substring could not be found
//! - **EmptySeparator** - Splitting on an empty separator
//! - **UnknownForm** - A normalization form name was not recognized
//! - **Regex** - A pattern failed to compile
//! - **Config** - Cost configuration could not be parsed

use std::ops::Range;

use the_align::{
  AlignmentError,
  Side,
};
use thiserror::Error;

pub type Result<T> = std::result::Result<T, BistrError>;

#[derive(Debug, Error)]
#[non_exhaustive]
pub enum BistrError {
  #[error(transparent)]
  Alignment(#[from] AlignmentError),
  #[error("alignment covers {side} positions {actual:?} but the string spans {expected:?}")]
  AlignmentMismatch {
    side:     Side,
    expected: Range<usize>,
    actual:   Range<usize>,
  },
  #[error("the string is not completely built yet ({remaining} characters remaining)")]
  Incomplete { remaining: usize },
  #[error("cannot consume {requested} characters with {remaining} remaining")]
  OutOfBounds { requested: usize, remaining: usize },
  #[error("expected {expected:?} but found {found:?}")]
  Mismatch { expected: String, found: String },
  #[error("substring {needle:?} not found")]
  NotFound { needle: String },
  #[error("empty separator")]
  EmptySeparator,
  #[error("unknown normalization form {name:?}")]
  UnknownForm { name: String },
  #[error(transparent)]
  Regex(#[from] regex_automata::meta::BuildError),
  #[error("invalid cost configuration: {0}")]
  Config(#[from] toml::de::Error),
}
