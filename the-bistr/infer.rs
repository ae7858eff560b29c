//! Heuristic alignment inference between two strings.
//!
//! Plain edit distance treats `É` and `e` as different as `É` and `?`. The
//! heuristic instead augments each character with its compatibility
//! decomposition, its case fold and its Unicode general category, and
//! charges a substitution by how many of those attributes differ. Insertions and deletions cost more than any single
//! attribute, and less for combining marks, so accents are shed cheaply.
//!
//! The inference runs over NFKD normalized, case folded text, then composes
//! the result with the alignments of both sides to point back at the inputs.

use std::time::Instant;

use the_align::Alignment;
use unicode_general_category::{
  GeneralCategory,
  get_general_category,
};

use crate::{
  BiStr,
  Tendril,
  chars::char_slice,
  config::InferConfig,
  error::Result,
  normalize::NormalizationForm,
};

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
enum TopCategory {
  Letter,
  Mark,
  Number,
  Punctuation,
  Symbol,
  Separator,
  Other,
}

impl TopCategory {
  fn of(category: GeneralCategory) -> Self {
    use GeneralCategory::*;

    match category {
      UppercaseLetter | LowercaseLetter | TitlecaseLetter | ModifierLetter | OtherLetter => {
        Self::Letter
      },
      NonspacingMark | SpacingMark | EnclosingMark => Self::Mark,
      DecimalNumber | LetterNumber | OtherNumber => Self::Number,
      ConnectorPunctuation | DashPunctuation | OpenPunctuation | ClosePunctuation
      | InitialPunctuation | FinalPunctuation | OtherPunctuation => Self::Punctuation,
      MathSymbol | CurrencySymbol | ModifierSymbol | OtherSymbol => Self::Symbol,
      SpaceSeparator | LineSeparator | ParagraphSeparator => Self::Separator,
      _ => Self::Other,
    }
  }
}

/// A case folded character with the attributes the costs compare.
#[derive(Debug, Clone)]
struct AugmentedChar {
  folded:       char,
  /// The normalized text it was folded from.
  normalized:   Tendril,
  /// The input text it came from.
  original:     Tendril,
  top_category: TopCategory,
  category:     GeneralCategory,
}

impl AugmentedChar {
  fn indel_cost(&self, config: &InferConfig) -> u32 {
    match self.top_category {
      TopCategory::Mark => config.mark_indel,
      _ => config.indel,
    }
  }

  fn substitution_cost(&self, other: &Self, config: &InferConfig) -> u32 {
    let charge = |differs: bool, weight: u32| if differs { weight } else { 0 };
    charge(self.folded != other.folded, config.folded)
      + charge(self.normalized != other.normalized, config.normalized)
      + charge(self.original != other.original, config.original)
      + charge(self.top_category != other.top_category, config.top_category)
      + charge(self.category != other.category, config.category)
  }
}

/// A string's augmented characters and the alignment from the string to
/// them.
struct Augmented {
  chars:     Vec<AugmentedChar>,
  alignment: Alignment,
}

impl Augmented {
  fn new(text: &str) -> Result<Self> {
    let normalized = BiStr::new(text).normalize(NormalizationForm::Nfkd)?;
    let folded = BiStr::new(normalized.modified()).casefold()?;
    let chars = folded
      .modified()
      .chars()
      .enumerate()
      .map(|(i, folded_char)| {
        let normalized_span = folded.alignment().map_to_original(i..i + 1)?;
        let original_span = normalized
          .alignment()
          .map_to_original(normalized_span.clone())?;
        let category = get_general_category(folded_char);
        Ok(AugmentedChar {
          folded: folded_char,
          normalized: Tendril::from(char_slice(folded.original(), normalized_span)),
          original: Tendril::from(char_slice(text, original_span)),
          top_category: TopCategory::of(category),
          category,
        })
      })
      .collect::<Result<Vec<_>>>()?;

    Ok(Self {
      chars,
      alignment: normalized.alignment().compose(folded.alignment())?,
    })
  }
}

fn costs(config: &InferConfig) -> impl Fn(Option<&AugmentedChar>, Option<&AugmentedChar>) -> u32 + '_ {
  move |a: Option<&AugmentedChar>, b: Option<&AugmentedChar>| {
    match (a, b) {
      (Some(a), Some(b)) => a.substitution_cost(b, config),
      (Some(c), None) | (None, Some(c)) => c.indel_cost(config),
      (None, None) => 0,
    }
  }
}

pub(crate) fn heuristic_infer(original: &str, modified: &str, config: &InferConfig) -> Result<BiStr> {
  let start = tracing::enabled!(tracing::Level::DEBUG).then(Instant::now);

  let augmented_original = Augmented::new(original)?;
  let augmented_modified = Augmented::new(modified)?;
  let inferred = Alignment::infer_with_costs(
    &augmented_original.chars,
    &augmented_modified.chars,
    costs(config),
  )?;
  let alignment = augmented_original
    .alignment
    .compose(&inferred)?
    .compose(&augmented_modified.alignment.inverse())?;

  if let Some(start) = start {
    tracing::debug!(
      "heuristic inference of {}x{} characters took {}s",
      augmented_original.chars.len(),
      augmented_modified.chars.len(),
      start.elapsed().as_secs_f64()
    );
  }

  BiStr::with_alignment(original, modified, alignment)
}

#[cfg(test)]
mod tests {
  use super::*;

  #[test]
  fn identical_strings() {
    let text = BiStr::infer("test", "test").unwrap();
    assert_eq!(text, BiStr::new("test"));
  }

  #[test]
  fn spelling_variants() {
    let text = BiStr::infer("color", "colour").unwrap();
    assert_eq!(text.slice(3..5).unwrap().original(), "o");
    assert_eq!(text.inverse(), BiStr::infer("colour", "color").unwrap());
  }

  #[test]
  fn ignores_case_and_punctuation() {
    let text = BiStr::infer("--Hello, world!--", "hello world").unwrap();
    assert_eq!(
      text.slice(..5).unwrap(),
      BiStr::with_alignment("Hello", "hello", Alignment::identity(0..5)).unwrap()
    );
    assert_eq!(text.slice(6..).unwrap(), BiStr::new("world"));
  }

  #[test]
  fn matches_accented_text() {
    let text = BiStr::infer(
      "\u{1E6A}\u{1E27}\u{EB} q\u{FC}\u{EF}\u{10B}\u{1E33} \u{1F98A}",
      "the quick fox",
    )
    .unwrap();
    assert_eq!(text.slice(0..3).unwrap().original(), "\u{1E6A}\u{1E27}\u{EB}");
    assert_eq!(text.slice(4..9).unwrap().original(), "q\u{FC}\u{EF}\u{10B}\u{1E33}");
    assert_eq!(text.slice(10..13).unwrap().original(), "\u{1F98A}");
  }

  #[test]
  fn sheds_combining_marks_cheaply() {
    let text = BiStr::infer("cafe\u{301}s", "cafes").unwrap();
    assert_eq!(text.slice(3..4).unwrap().original(), "e");
    assert_eq!(text.slice(4..5).unwrap().original(), "s");
  }

  #[test]
  fn symmetric() {
    let forward = BiStr::infer("HELLO world", "hello, World!").unwrap();
    let backward = BiStr::infer("hello, World!", "HELLO world").unwrap();
    assert_eq!(forward.inverse(), backward);
  }

  #[test]
  fn compatibility_forms_align() {
    let text = BiStr::infer("\u{FB01}ne \u{2460}", "fine 1").unwrap();
    assert_eq!(text.slice(0..2).unwrap().original(), "\u{FB01}");
    assert_eq!(text.slice(2..4).unwrap().original(), "ne");
    assert_eq!(text.slice(5..6).unwrap().original(), "\u{2460}");
  }

  #[test]
  fn normalized_weight_is_charged() {
    let a = Augmented::new("\u{FB01}").unwrap();
    let b = Augmented::new("fi").unwrap();
    assert_eq!(a.chars.len(), 2);
    assert_eq!(&*a.chars[0].normalized, "f");
    assert_eq!(&*a.chars[0].original, "\u{FB01}");

    let config = InferConfig::default();
    // Same fold, form and category; only the original text differs.
    assert_eq!(a.chars[0].substitution_cost(&b.chars[0], &config), config.original);

    let upper = Augmented::new("\u{1E9E}").unwrap();
    let lower = Augmented::new("ss").unwrap();
    // Both fold to `s`; the capital eszett keeps its own normalized form.
    assert_eq!(
      upper.chars[0].substitution_cost(&lower.chars[0], &config),
      config.normalized + config.original
    );
  }

  /// Total heuristic cost of the edits an inferred alignment describes.
  fn edit_cost(alignment: &Alignment, a: &[AugmentedChar], b: &[AugmentedChar]) -> u32 {
    let config = InferConfig::default();
    let cost = costs(&config);
    let mut total = 0;
    let mut prev = (0, 0);
    for (o, m) in alignment.iter().skip(1) {
      total += match (o - prev.0, m - prev.1) {
        (1, 1) => cost(Some(&a[prev.0]), Some(&b[prev.1])),
        (1, 0) => cost(Some(&a[prev.0]), None),
        (0, 1) => cost(None, Some(&b[prev.1])),
        steps => panic!("unexpected step {steps:?}"),
      };
      prev = (o, m);
    }
    total
  }

  quickcheck::quickcheck! {
    fn heuristic_costs_are_symmetric(a: String, b: String) -> bool {
      let (a, b) = (Augmented::new(&a).unwrap(), Augmented::new(&b).unwrap());
      let config = InferConfig::default();
      let forward = Alignment::infer_with_costs(&a.chars, &b.chars, costs(&config)).unwrap();
      let backward = Alignment::infer_with_costs(&b.chars, &a.chars, costs(&config)).unwrap();
      if a.chars.len() == b.chars.len() {
        // Ties may resolve differently, but never at a higher cost.
        edit_cost(&forward, &a.chars, &b.chars) == edit_cost(&backward, &b.chars, &a.chars)
      } else {
        forward == backward.inverse()
      }
    }
  }

  #[test]
  fn custom_weights() {
    let config = InferConfig {
      indel: 1,
      ..InferConfig::default()
    };
    let text = BiStr::infer_with_config("ab", "ba", &config).unwrap();
    assert_eq!(text.modified(), "ba");
    assert_eq!(text.alignment().original_bounds(), 0..2);
  }
}
