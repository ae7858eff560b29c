//! Bidirectionally transformed strings.
//!
//! A [`BiStr`] keeps an original string, a modified version of it and the
//! [`Alignment`] between the two, so any span of the modified text can be
//! traced back to the text it came from. Transformations go through a
//! [`BistrBuilder`], which records every skip, replacement and deletion as it
//! rewrites the text.
//!
//! All positions are character (Unicode scalar value) indices.
//!
//! ```ignore
//! use the_bistr::BiStr;
//!
//! let text = BiStr::new("  Hello  WORLD  ").strip(None)?.lower()?;
//! assert_eq!(text.modified(), "hello  world");
//! assert_eq!(text.slice(7..12)?.original(), "WORLD");
//! ```

use smartstring::{
  LazyCompact,
  SmartString,
};

pub mod bistr;
pub mod builder;
mod case;
mod chars;
pub mod config;
pub mod error;
mod infer;
mod normalize;
pub mod token;

pub use bistr::BiStr;
pub use builder::{
  BistrBuilder,
  Captured,
  Replacer,
};
pub use config::InferConfig;
pub use error::{
  BistrError,
  Result,
};
pub use normalize::NormalizationForm;
pub use regex_automata::meta::Regex;
pub use the_align::{
  Alignment,
  Side,
};
pub use token::{
  CharacterTokenizer,
  RegexTokenizer,
  SentenceTokenizer,
  SplittingTokenizer,
  Token,
  Tokenization,
  Tokenizer,
  WordTokenizer,
};

pub type Tendril = SmartString<LazyCompact>;
