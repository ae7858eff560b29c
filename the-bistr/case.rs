//! Unicode case mapping over bidirectional strings.
//!
//! Every mapping walks the modified text one character at a time. Characters
//! that map to themselves are skipped, keeping a one to one alignment, while
//! expansions such as `ß` to `SS` become a single replaced chunk.
//!
//! Mappings follow the default (untailored) Unicode rules, including the
//! final form of capital sigma when lowercasing.

use caseless::Caseless;
use smallvec::SmallVec;
use unicode_general_category::{
  GeneralCategory,
  get_general_category,
};
use unicode_segmentation::UnicodeSegmentation;

use crate::{
  BiStr,
  Tendril,
  error::Result,
};

type Mapped = SmallVec<[char; 3]>;

impl BiStr {
  /// Folds case for caseless matching. The result is not meant for display.
  pub fn casefold(&self) -> Result<Self> {
    self.map_chars(|_, _, c| fold(c))
  }

  pub fn lower(&self) -> Result<Self> {
    self.map_chars(lower)
  }

  pub fn upper(&self) -> Result<Self> {
    self.map_chars(|_, _, c| c.to_uppercase().collect())
  }

  /// Titlecases the first cased character of every word and lowercases the
  /// rest.
  pub fn title(&self) -> Result<Self> {
    let mut starts = vec![false; self.len()];
    let mut index = 0;
    for word in self.modified.split_word_bounds() {
      if let Some(offset) = word.chars().position(is_cased) {
        starts[index + offset] = true;
      }
      index += word.chars().count();
    }

    self.map_chars(|chars, i, c| {
      if starts[i] {
        titlecase(c)
      } else {
        lower(chars, i, c)
      }
    })
  }

  /// Titlecases the first character and lowercases the rest.
  pub fn capitalize(&self) -> Result<Self> {
    self.map_chars(|chars, i, c| {
      match i {
        0 => titlecase(c),
        _ => lower(chars, i, c),
      }
    })
  }

  /// Swaps uppercase letters for lowercase ones and vice versa. Titlecase
  /// letters are left alone.
  pub fn swapcase(&self) -> Result<Self> {
    self.map_chars(|chars, i, c| {
      match get_general_category(c) {
        GeneralCategory::LowercaseLetter => c.to_uppercase().collect(),
        GeneralCategory::UppercaseLetter => lower(chars, i, c),
        _ => Mapped::from_elem(c, 1),
      }
    })
  }

  fn map_chars(&self, mut mapping: impl FnMut(&[char], usize, char) -> Mapped) -> Result<Self> {
    let chars: Vec<char> = self.modified.chars().collect();
    let mut builder = self.builder();
    let mut buf = Tendril::new();

    for (i, &c) in chars.iter().enumerate() {
      let mapped = mapping(&chars, i, c);
      if mapped.as_slice() == [c] {
        builder.skip(1)?;
      } else {
        buf.clear();
        buf.extend(mapped);
        builder.replace(1, &buf)?;
      }
    }

    builder.build()
  }
}

// Full (untailored) folding from the Unicode CaseFolding table.
fn fold(c: char) -> Mapped {
  std::iter::once(c).default_case_fold().collect()
}

fn lower(chars: &[char], i: usize, c: char) -> Mapped {
  if c == 'Σ' && is_final(chars, i) {
    return Mapped::from_elem('ς', 1);
  }
  c.to_lowercase().collect()
}

fn titlecase(c: char) -> Mapped {
  let digraph = match c {
    '\u{1C4}'..='\u{1C6}' => Some('\u{1C5}'),
    '\u{1C7}'..='\u{1C9}' => Some('\u{1C8}'),
    '\u{1CA}'..='\u{1CC}' => Some('\u{1CB}'),
    '\u{1F1}'..='\u{1F3}' => Some('\u{1F2}'),
    _ => None,
  };
  if let Some(title) = digraph {
    return Mapped::from_elem(title, 1);
  }
  if get_general_category(c) == GeneralCategory::TitlecaseLetter {
    return Mapped::from_elem(c, 1);
  }

  let mut upper = c.to_uppercase();
  let mut mapped = Mapped::new();
  mapped.extend(upper.next());
  mapped.extend(upper.flat_map(char::to_lowercase));
  mapped
}

/// Whether a capital sigma at `i` ends a word: it follows a cased letter and
/// no cased letter follows, ignoring case-ignorable characters in between.
fn is_final(chars: &[char], i: usize) -> bool {
  let mut before = chars[..i].iter().rev().filter(|&&c| !is_case_ignorable(c));
  let mut after = chars[i + 1..].iter().filter(|&&c| !is_case_ignorable(c));
  before.next().is_some_and(|&c| is_cased(c)) && !after.next().is_some_and(|&c| is_cased(c))
}

fn is_cased(c: char) -> bool {
  c.is_lowercase() || c.is_uppercase() || get_general_category(c) == GeneralCategory::TitlecaseLetter
}

fn is_case_ignorable(c: char) -> bool {
  matches!(
    c,
    '\'' | '.' | ':' | '^' | '`' | '\u{B7}' | '\u{387}' | '\u{5F4}' | '\u{2018}' | '\u{2019}'
      | '\u{2024}' | '\u{FE13}' | '\u{FE52}' | '\u{FE55}' | '\u{FF07}' | '\u{FF0E}' | '\u{FF1A}'
  ) || matches!(
    get_general_category(c),
    GeneralCategory::NonspacingMark
      | GeneralCategory::EnclosingMark
      | GeneralCategory::Format
      | GeneralCategory::ModifierLetter
      | GeneralCategory::ModifierSymbol
  )
}

#[cfg(test)]
mod tests {
  use the_align::Alignment;

  use super::*;

  #[test]
  fn casefold() {
    let text = BiStr::new("Hi\u{301}\u{FB03}").casefold().unwrap();
    assert_eq!(text.modified(), "hi\u{301}ffi");
    assert_eq!(text.slice(4..5).unwrap(), BiStr::from_pair("\u{FB03}", "f"));

    let text = BiStr::new("stra\u{DF}e").casefold().unwrap();
    assert_eq!(text.modified(), "strasse");
    assert_eq!(text.slice(4..6).unwrap(), BiStr::from_pair("\u{DF}", "ss"));
  }

  #[test]
  fn casefold_uses_the_folding_table() {
    let text = BiStr::new("STRA\u{1E9E}E").casefold().unwrap();
    assert_eq!(text.modified(), "strasse");
    assert_eq!(text.slice(4..6).unwrap(), BiStr::from_pair("\u{1E9E}", "ss"));
    assert_eq!(text.casefold().unwrap().modified(), "strasse");

    // Dotless i has no folding, and Cherokee folds to uppercase.
    let text = BiStr::new("\u{131}\u{13F8}\u{AB70}").casefold().unwrap();
    assert_eq!(text.modified(), "\u{131}\u{13F0}\u{13A0}");
    assert_eq!(text.slice(0..1).unwrap(), BiStr::new("\u{131}"));

    let text = BiStr::new("\u{3C2}\u{3A3}").casefold().unwrap();
    assert_eq!(text.modified(), "\u{3C3}\u{3C3}");
  }

  #[test]
  fn upper_and_lower() {
    let text = BiStr::new("stra\u{DF}e").upper().unwrap();
    assert_eq!(text.modified(), "STRASSE");
    assert_eq!(text.slice(4..6).unwrap(), BiStr::from_pair("\u{DF}", "SS"));

    let text = BiStr::new("HELLO WORLD").lower().unwrap();
    assert_eq!(text.modified(), "hello world");
    assert_eq!(text.alignment(), &Alignment::identity(0..11));

    let text = BiStr::new("D\u{130}YARBAKIR").lower().unwrap();
    assert_eq!(text.modified(), "di\u{307}yarbakir");
    assert_eq!(text.slice(1..3).unwrap(), BiStr::from_pair("\u{130}", "i\u{307}"));
  }

  #[test]
  fn final_sigma() {
    let text = BiStr::new("\u{39F}\u{394}\u{3A5}\u{3A3}\u{3A3}\u{395}\u{3A5}\u{3A3}").lower().unwrap();
    assert_eq!(text.modified(), "\u{3BF}\u{3B4}\u{3C5}\u{3C3}\u{3C3}\u{3B5}\u{3C5}\u{3C2}");

    let text = BiStr::new("\u{3A3} \u{391}\u{3A3}'").lower().unwrap();
    assert_eq!(text.modified(), "\u{3C3} \u{3B1}\u{3C2}'");
  }

  #[test]
  fn title() {
    let text = BiStr::new("hello world").title().unwrap();
    assert_eq!(text.modified(), "Hello World");
    assert_eq!(text.alignment(), &Alignment::identity(0..11));

    let text = BiStr::new("\u{1C6}ungla O'NEIL").title().unwrap();
    assert_eq!(text.modified(), "\u{1C5}ungla O'neil");
  }

  #[test]
  fn capitalize() {
    let text = BiStr::new("hello WORLD").capitalize().unwrap();
    assert_eq!(text.modified(), "Hello world");
    assert_eq!(text.alignment(), &Alignment::identity(0..11));

    let text = BiStr::new("\u{3C4}\u{3B5}\u{3BB}\u{3B9}\u{3BA}\u{3CC}\u{3C2}").capitalize().unwrap();
    assert_eq!(text.modified(), "\u{3A4}\u{3B5}\u{3BB}\u{3B9}\u{3BA}\u{3CC}\u{3C2}");

    let text = BiStr::new("\u{1F34}\u{3A3}").capitalize().unwrap();
    assert_eq!(text.modified(), "\u{1F3C}\u{3C2}");
    assert_eq!(text.alignment(), &Alignment::identity(0..2));

    let text = BiStr::new("\u{FB03}x").capitalize().unwrap();
    assert_eq!(text.modified(), "Ffix");
  }

  #[test]
  fn swapcase() {
    let text = BiStr::new("hello WORLD").swapcase().unwrap();
    assert_eq!(text.modified(), "HELLO world");
    assert_eq!(text.alignment(), &Alignment::identity(0..11));

    let text = BiStr::new("\u{1C8}ep\u{F2}ta").swapcase().unwrap();
    assert_eq!(text.modified(), "\u{1C8}EP\u{D2}TA");
    assert_eq!(text.alignment(), &Alignment::identity(0..6));
  }

  #[test]
  fn chains_onto_earlier_transformations() {
    let text = BiStr::new("  Hello WORLD  ").strip(None).unwrap().casefold().unwrap();
    assert_eq!(text.modified(), "hello world");
    assert_eq!(
      text.alignment(),
      &Alignment::from_pairs(
        [(0, 0), (2, 0)]
          .into_iter()
          .chain((3..=13).map(|i| (i, i - 2)))
          .chain([(15, 11)])
      )
      .unwrap()
    );
  }
}
