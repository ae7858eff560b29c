//! Tokens and tokenizers over bidirectional strings.
//!
//! # Architecture
//!
//! A [`Tokenization`] pairs a text with the tokens found in it and an
//! [`Alignment`] from text positions to token indices. Token `i` spanning
//! `start..end` contributes the pairs `(start, i)` and `(end, i + 1)`, so the
//! alignment machinery answers both "which text does this run of tokens
//! cover" and "which tokens does this span of text touch". Composing with the
//! text's own alignment extends both questions to the original string.
//!
//! Tokenizers only find token spans in the modified text. They are stateless
//! and can be shared between threads.

use std::{
  fmt,
  ops::{
    Range,
    RangeBounds,
  },
  time::Instant,
};

use once_cell::sync::Lazy;
use regex_automata::meta::Regex;
use the_align::Alignment;
use unicode_segmentation::UnicodeSegmentation;

use crate::{
  BiStr,
  chars::{
    char_len,
    clamp,
  },
  error::Result,
};

/// A token extracted from a text, with its character span in that text.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct Token {
  pub text:  BiStr,
  pub start: usize,
  pub end:   usize,
}

impl Token {
  pub fn new(text: impl Into<BiStr>, start: usize, end: usize) -> Self {
    Self {
      text: text.into(),
      start,
      end,
    }
  }

  /// The token covering `start..end` of `text`.
  pub fn slice(text: &BiStr, start: usize, end: usize) -> Result<Self> {
    Ok(Self::new(text.slice(start..end)?, start, end))
  }

  pub fn original(&self) -> &str {
    self.text.original()
  }

  pub fn modified(&self) -> &str {
    self.text.modified()
  }
}

impl fmt::Display for Token {
  fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
    write!(f, "[{}:{}]={}", self.start, self.end, self.text)
  }
}

/// A text and the tokens extracted from it.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct Tokenization {
  text:      BiStr,
  tokens:    Vec<Token>,
  /// From text positions to token indices.
  alignment: Alignment,
}

impl Tokenization {
  /// Tokens must be ordered and must not overlap.
  pub fn new(text: impl Into<BiStr>, tokens: impl IntoIterator<Item = Token>) -> Result<Self> {
    let text = text.into();
    let tokens: Vec<Token> = tokens.into_iter().collect();

    let pairs = tokens
      .iter()
      .enumerate()
      .flat_map(|(i, token)| [(token.start, i), (token.end, i + 1)]);
    let alignment = Alignment::from_pairs(
      std::iter::once((0, 0))
        .chain(pairs)
        .chain(std::iter::once((text.len(), tokens.len()))),
    )?;

    Ok(Self {
      text,
      tokens,
      alignment,
    })
  }

  /// Locates each token in turn by forward search from the end of the
  /// previous one.
  ///
  /// ```ignore
  /// let tokens = Tokenization::infer("hello, world!", ["hello", "world"])?;
  /// assert_eq!(tokens.get(1).map(|t| (t.start, t.end)), Some((7, 12)));
  /// ```
  pub fn infer<S: AsRef<str>>(
    text: impl Into<BiStr>,
    tokens: impl IntoIterator<Item = S>,
  ) -> Result<Self> {
    let text = text.into();
    let mut found = Vec::new();
    let mut start = 0;
    for token in tokens {
      let bounds = text.index_bounds(token.as_ref(), start..)?;
      start = bounds.end;
      found.push(Token::slice(&text, bounds.start, bounds.end)?);
    }
    Self::new(text, found)
  }

  pub fn text(&self) -> &BiStr {
    &self.text
  }

  pub fn alignment(&self) -> &Alignment {
    &self.alignment
  }

  pub fn len(&self) -> usize {
    self.tokens.len()
  }

  pub fn is_empty(&self) -> bool {
    self.tokens.is_empty()
  }

  pub fn get(&self, index: usize) -> Option<&Token> {
    self.tokens.get(index)
  }

  pub fn iter(&self) -> std::slice::Iter<'_, Token> {
    self.tokens.iter()
  }

  /// The tokens at `range`, over the text they cover. Token positions are
  /// rebased onto that text.
  pub fn slice(&self, range: impl RangeBounds<usize>) -> Result<Self> {
    let range = clamp(range, self.len());
    let text = self.substring(range.clone())?;
    let tokens = &self.tokens[range];
    let delta = tokens.first().map_or(0, |token| token.start);
    let tokens = tokens
      .iter()
      .map(|token| Token::new(&token.text, token.start - delta, token.end - delta));
    Self::new(text, tokens)
  }

  /// The text covered by a span of tokens.
  pub fn substring(&self, span: impl RangeBounds<usize>) -> Result<BiStr> {
    self.text.slice(self.text_bounds(span)?)
  }

  /// Maps a span of tokens to the span of text they cover.
  pub fn text_bounds(&self, span: impl RangeBounds<usize>) -> Result<Range<usize>> {
    Ok(self.alignment.map_to_original(span)?)
  }

  /// Maps a span of tokens to the span of original text they came from.
  pub fn original_bounds(&self, span: impl RangeBounds<usize>) -> Result<Range<usize>> {
    Ok(self.text.alignment().map_to_original(self.text_bounds(span)?)?)
  }

  /// Maps a span of text to the span of tokens it touches.
  pub fn bounds_for_text(&self, span: impl RangeBounds<usize>) -> Result<Range<usize>> {
    Ok(self.alignment.map_to_modified(span)?)
  }

  /// Maps a span of original text to the span of tokens it touches.
  pub fn bounds_for_original(&self, span: impl RangeBounds<usize>) -> Result<Range<usize>> {
    let text_bounds = self.text.alignment().map_to_modified(span)?;
    self.bounds_for_text(text_bounds)
  }

  pub fn slice_by_text(&self, span: impl RangeBounds<usize>) -> Result<Self> {
    self.slice(self.bounds_for_text(span)?)
  }

  pub fn slice_by_original(&self, span: impl RangeBounds<usize>) -> Result<Self> {
    self.slice(self.bounds_for_original(span)?)
  }

  /// Expands a span of text outwards to token boundaries.
  pub fn snap_text_bounds(&self, span: impl RangeBounds<usize>) -> Result<Range<usize>> {
    self.text_bounds(self.bounds_for_text(span)?)
  }

  /// Expands a span of original text outwards to token boundaries.
  pub fn snap_original_bounds(&self, span: impl RangeBounds<usize>) -> Result<Range<usize>> {
    self.original_bounds(self.bounds_for_original(span)?)
  }
}

impl<'a> IntoIterator for &'a Tokenization {
  type IntoIter = std::slice::Iter<'a, Token>;
  type Item = &'a Token;

  fn into_iter(self) -> Self::IntoIter {
    self.iter()
  }
}

impl fmt::Display for Tokenization {
  fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
    write!(f, "Tokenization({}, [", self.text)?;
    for (i, token) in self.tokens.iter().enumerate() {
      if i > 0 {
        f.write_str(", ")?;
      }
      write!(f, "{token}")?;
    }
    f.write_str("])")
  }
}

/// Splits text into tokens.
pub trait Tokenizer: Send + Sync {
  fn tokenize(&self, text: &BiStr) -> Result<Tokenization>;
}

/// Extracts every match of a regex as a token.
#[derive(Debug, Clone)]
pub struct RegexTokenizer {
  regex: Regex,
}

impl RegexTokenizer {
  pub fn new(pattern: &str) -> Result<Self> {
    Ok(Self::from_regex(Regex::new(pattern)?))
  }

  pub fn from_regex(regex: Regex) -> Self {
    Self { regex }
  }
}

impl Tokenizer for RegexTokenizer {
  fn tokenize(&self, text: &BiStr) -> Result<Tokenization> {
    let spans = self
      .regex
      .find_iter(text.modified())
      .map(|found| found.range());
    tokenize_spans("regex", text, spans)
  }
}

/// Splits text on the matches of a regex, which separate tokens. Empty
/// tokens are dropped.
#[derive(Debug, Clone)]
pub struct SplittingTokenizer {
  regex: Regex,
}

impl Default for SplittingTokenizer {
  /// Splits on runs of whitespace.
  fn default() -> Self {
    static WHITESPACE: Lazy<Regex> = Lazy::new(|| {
      Regex::builder()
        .build(r"\s+")
        .expect("whitespace regex should compile")
    });

    Self::from_regex(WHITESPACE.clone())
  }
}

impl SplittingTokenizer {
  pub fn new(pattern: &str) -> Result<Self> {
    Ok(Self::from_regex(Regex::new(pattern)?))
  }

  pub fn from_regex(regex: Regex) -> Self {
    Self { regex }
  }
}

impl Tokenizer for SplittingTokenizer {
  fn tokenize(&self, text: &BiStr) -> Result<Tokenization> {
    let modified = text.modified();
    let mut spans = Vec::new();
    let mut last = 0;
    for found in self.regex.find_iter(modified) {
      if found.start() > last {
        spans.push(last..found.start());
      }
      last = found.end();
    }
    if modified.len() > last {
      spans.push(last..modified.len());
    }
    tokenize_spans("splitting", text, spans)
  }
}

/// Splits text into extended grapheme clusters.
#[derive(Debug, Clone, Copy, Default)]
pub struct CharacterTokenizer;

impl Tokenizer for CharacterTokenizer {
  fn tokenize(&self, text: &BiStr) -> Result<Tokenization> {
    let spans = text
      .modified()
      .grapheme_indices(true)
      .map(|(offset, grapheme)| offset..offset + grapheme.len());
    tokenize_spans("character", text, spans)
  }
}

/// Splits text on word boundaries, keeping the segments that contain a letter
/// or digit.
#[derive(Debug, Clone, Copy, Default)]
pub struct WordTokenizer;

impl Tokenizer for WordTokenizer {
  fn tokenize(&self, text: &BiStr) -> Result<Tokenization> {
    let spans = text
      .modified()
      .split_word_bound_indices()
      .filter(|(_, word)| word.chars().any(char::is_alphanumeric))
      .map(|(offset, word)| offset..offset + word.len());
    tokenize_spans("word", text, spans)
  }
}

/// Splits text into sentences, each keeping its trailing whitespace.
#[derive(Debug, Clone, Copy, Default)]
pub struct SentenceTokenizer;

impl Tokenizer for SentenceTokenizer {
  fn tokenize(&self, text: &BiStr) -> Result<Tokenization> {
    let spans = text
      .modified()
      .split_sentence_bound_indices()
      .map(|(offset, sentence)| offset..offset + sentence.len());
    tokenize_spans("sentence", text, spans)
  }
}

/// Builds a tokenization from ordered byte spans of the modified text.
fn tokenize_spans(
  kind: &str,
  text: &BiStr,
  spans: impl IntoIterator<Item = Range<usize>>,
) -> Result<Tokenization> {
  let start = tracing::enabled!(tracing::Level::DEBUG).then(Instant::now);

  let modified = text.modified();
  // Byte and character offsets of the last converted position.
  let (mut byte, mut index) = (0, 0);
  let mut to_char = |offset: usize| {
    index += char_len(&modified[byte..offset]);
    byte = offset;
    index
  };

  let mut tokens = Vec::new();
  for span in spans {
    let first = to_char(span.start);
    let last = to_char(span.end);
    tokens.push(Token::slice(text, first, last)?);
  }
  let tokenization = Tokenization::new(text.clone(), tokens)?;

  if let Some(start) = start {
    tracing::debug!(
      "{} tokenization of {} characters took {}s",
      kind,
      text.len(),
      start.elapsed().as_secs_f64()
    );
  }
  Ok(tokenization)
}
