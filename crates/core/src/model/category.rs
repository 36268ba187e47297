use serde::{Deserialize, Serialize};
use std::fmt;
use std::str::FromStr;
use thiserror::Error;

#[derive(Debug, Error, Clone, PartialEq, Eq)]
pub enum CategoryError {
    #[error("unknown category: {0:?} (expected one of: Hiragana, Katakana)")]
    Unknown(String),
}

/// Character system an item belongs to.
///
/// The set is closed: anything else is rejected when parsing user input or
/// persisted rows, so calculators never see an invalid category.
#[derive(
    Debug, Clone, Copy, PartialEq, Eq, Hash, PartialOrd, Ord, Serialize, Deserialize,
)]
pub enum Category {
    Hiragana,
    Katakana,
}

impl Category {
    pub const ALL: [Category; 2] = [Category::Hiragana, Category::Katakana];

    #[must_use]
    pub fn name(self) -> &'static str {
        match self {
            Category::Hiragana => "Hiragana",
            Category::Katakana => "Katakana",
        }
    }
}

impl fmt::Display for Category {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.name())
    }
}

impl FromStr for Category {
    type Err = CategoryError;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        let trimmed = s.trim();
        Category::ALL
            .into_iter()
            .find(|c| c.name().eq_ignore_ascii_case(trimmed))
            .ok_or_else(|| CategoryError::Unknown(s.to_owned()))
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn parses_case_insensitively() {
        assert_eq!("hiragana".parse::<Category>().unwrap(), Category::Hiragana);
        assert_eq!(" KATAKANA ".parse::<Category>().unwrap(), Category::Katakana);
    }

    #[test]
    fn rejects_unknown_names() {
        let err = "kanji".parse::<Category>().unwrap_err();
        assert_eq!(err, CategoryError::Unknown("kanji".into()));
    }

    #[test]
    fn display_matches_persisted_name() {
        assert_eq!(Category::Katakana.to_string(), "Katakana");
    }
}
