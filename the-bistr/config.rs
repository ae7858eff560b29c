//! Cost weights for heuristic alignment inference.

use serde::{
  Deserialize,
  Serialize,
};

use crate::error::Result;

/// Weights of the heuristic edit costs used by [`BiStr::infer`].
///
/// Substituting one character for another costs the sum of the weights of
/// every attribute on which they differ. Inserting or deleting a character
/// costs `indel`, or `mark-indel` for combining marks.
///
/// ```toml
/// indel = 4
/// mark-indel = 1
/// category = 0
/// ```
///
/// [`BiStr::infer`]: crate::BiStr::infer
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "kebab-case", default, deny_unknown_fields)]
pub struct InferConfig {
  pub indel:        u32,
  pub mark_indel:   u32,
  /// Case folded forms differ.
  pub folded:       u32,
  /// Compatibility decomposed (NFKD) forms differ.
  pub normalized:   u32,
  /// Original forms differ.
  pub original:     u32,
  /// Top-level general categories (letter, mark, number, ...) differ.
  pub top_category: u32,
  pub category:     u32,
}

impl Default for InferConfig {
  fn default() -> Self {
    Self {
      indel:        3,
      mark_indel:   1,
      folded:       1,
      normalized:   1,
      original:     1,
      top_category: 1,
      category:     1,
    }
  }
}

impl InferConfig {
  pub fn from_toml(source: &str) -> Result<Self> {
    Ok(toml::from_str(source)?)
  }
}

#[cfg(test)]
mod tests {
  use super::*;
  use crate::BistrError;

  #[test]
  fn defaults() {
    let config = InferConfig::from_toml("").unwrap();
    assert_eq!(config, InferConfig::default());
    assert_eq!(config.indel, 3);
    assert_eq!(config.mark_indel, 1);
  }

  #[test]
  fn partial_override() {
    let config = InferConfig::from_toml("indel = 5\ntop-category = 2\nnormalized = 0\n").unwrap();
    assert_eq!(config, InferConfig {
      indel: 5,
      top_category: 2,
      normalized: 0,
      ..InferConfig::default()
    });
  }

  #[test]
  fn rejects_unknown_weights() {
    let err = InferConfig::from_toml("accent = 1").unwrap_err();
    assert!(matches!(err, BistrError::Config(_)));
  }
}
