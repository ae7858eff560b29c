//! Unicode normalization over bidirectional strings.
//!
//! The modified text is cut into segments that normalize independently: a
//! segment starts at a starter (combining class zero) and runs through the
//! marks that follow it, and for the composing forms it also absorbs any
//! starter that would compose with it. Segments already in normal form are
//! skipped character by character, and every other segment becomes a single
//! replaced chunk, so `o` followed by a combining diaeresis maps to `ö` as a
//! whole.

use std::{
  fmt,
  str::FromStr,
  time::Instant,
};

use unicode_normalization::{
  UnicodeNormalization,
  char::{
    canonical_combining_class,
    compose,
    decompose_canonical,
    decompose_compatible,
  },
};

use crate::{
  BiStr,
  Tendril,
  error::{
    BistrError,
    Result,
  },
};

/// A Unicode normalization form.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub enum NormalizationForm {
  /// Canonical composition.
  Nfc,
  /// Canonical decomposition.
  Nfd,
  /// Compatibility composition.
  Nfkc,
  /// Compatibility decomposition.
  Nfkd,
}

impl NormalizationForm {
  fn composes(self) -> bool {
    matches!(self, Self::Nfc | Self::Nfkc)
  }

  fn compatible(self) -> bool {
    matches!(self, Self::Nfkc | Self::Nfkd)
  }

  fn apply(self, text: &str, out: &mut Tendril) {
    out.clear();
    match self {
      Self::Nfc => out.extend(text.nfc()),
      Self::Nfd => out.extend(text.nfd()),
      Self::Nfkc => out.extend(text.nfkc()),
      Self::Nfkd => out.extend(text.nfkd()),
    }
  }

  /// First character of the decomposition of `c` under this form.
  fn leading(self, c: char) -> char {
    let mut first = None;
    if self.compatible() {
      decompose_compatible(c, |d| {
        first.get_or_insert(d);
      });
    } else {
      decompose_canonical(c, |d| {
        first.get_or_insert(d);
      });
    }
    first.unwrap_or(c)
  }
}

impl FromStr for NormalizationForm {
  type Err = BistrError;

  fn from_str(name: &str) -> Result<Self> {
    match name.to_ascii_uppercase().as_str() {
      "NFC" => Ok(Self::Nfc),
      "NFD" => Ok(Self::Nfd),
      "NFKC" => Ok(Self::Nfkc),
      "NFKD" => Ok(Self::Nfkd),
      _ => {
        Err(BistrError::UnknownForm {
          name: name.to_string(),
        })
      },
    }
  }
}

impl fmt::Display for NormalizationForm {
  fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
    f.write_str(match self {
      Self::Nfc => "NFC",
      Self::Nfd => "NFD",
      Self::Nfkc => "NFKC",
      Self::Nfkd => "NFKD",
    })
  }
}

impl BiStr {
  /// Applies a Unicode normalization form to the modified text.
  ///
  /// ```ignore
  /// let text = BiStr::new("He\u{301}llo").normalize(NormalizationForm::Nfc)?;
  /// assert_eq!(text.modified(), "H\u{E9}llo");
  /// assert_eq!(text.slice(1..2)?.original(), "e\u{301}");
  /// ```
  pub fn normalize(&self, form: NormalizationForm) -> Result<Self> {
    let start = tracing::enabled!(tracing::Level::DEBUG).then(Instant::now);

    let chars: Vec<char> = self.modified.chars().collect();
    let mut builder = self.builder();
    let mut segment = Tendril::new();
    let mut normalized = Tendril::new();
    let mut replaced = 0;

    let mut i = 0;
    while i < chars.len() {
      segment.clear();
      segment.push(chars[i]);
      let mut end = i + 1;
      form.apply(&segment, &mut normalized);
      while end < chars.len() && joins(form, &normalized, chars[end]) {
        segment.push(chars[end]);
        end += 1;
        form.apply(&segment, &mut normalized);
      }

      if normalized == segment {
        builder.skip(end - i)?;
      } else {
        builder.replace(end - i, &normalized)?;
        replaced += 1;
      }
      i = end;
    }

    if let Some(start) = start {
      tracing::debug!(
        "{form} normalization of {} characters replaced {replaced} segments in {}s",
        chars.len(),
        start.elapsed().as_secs_f64()
      );
    }

    builder.build()
  }
}

/// Whether `next` belongs to the segment normalized so far as `normalized`.
fn joins(form: NormalizationForm, normalized: &str, next: char) -> bool {
  let leading = form.leading(next);
  if canonical_combining_class(leading) != 0 {
    return true;
  }
  if !form.composes() {
    return false;
  }

  // A starter only composes with a directly preceding starter.
  normalized
    .chars()
    .next_back()
    .filter(|&last| canonical_combining_class(last) == 0)
    .is_some_and(|last| compose(last, leading).is_some())
}
