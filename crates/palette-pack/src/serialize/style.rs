//! Brace placement for generated initializers.

use std::fmt;
use std::str::FromStr;

use serde::{Deserialize, Serialize};

use crate::api::ReformError;

/// Where the opening brace of each initializer goes.
///
/// Parses from `knr` / `same-line` and `allman` / `next-line`
/// (case-insensitive).
///
/// # Example
///
/// ```
/// use palette_pack::BracketStyle;
///
/// assert_eq!("Allman".parse(), Ok(BracketStyle::NextLine));
/// assert_eq!(BracketStyle::SameLine.separator(), " ");
/// ```
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Default, Serialize, Deserialize)]
#[serde(try_from = "String", into = "String")]
pub enum BracketStyle {
    /// K&R: `= {` on the declaration line.
    #[default]
    SameLine,
    /// Allman: the brace opens the following line.
    NextLine,
}

impl BracketStyle {
    /// Text placed between `=` and `{`.
    pub fn separator(self) -> &'static str {
        match self {
            BracketStyle::SameLine => " ",
            BracketStyle::NextLine => "\n",
        }
    }

    pub fn name(self) -> &'static str {
        match self {
            BracketStyle::SameLine => "knr",
            BracketStyle::NextLine => "allman",
        }
    }
}

impl FromStr for BracketStyle {
    type Err = ReformError;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        match s.trim().to_ascii_lowercase().as_str() {
            "knr" | "k&r" | "same-line" | "sameline" => Ok(BracketStyle::SameLine),
            "allman" | "next-line" | "nextline" => Ok(BracketStyle::NextLine),
            _ => Err(ReformError::UnknownBracketStyle(s.to_string())),
        }
    }
}

impl TryFrom<String> for BracketStyle {
    type Error = ReformError;

    fn try_from(value: String) -> Result<Self, Self::Error> {
        value.parse()
    }
}

impl From<BracketStyle> for String {
    fn from(style: BracketStyle) -> Self {
        style.name().to_string()
    }
}

impl fmt::Display for BracketStyle {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.name())
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_parse_names() {
        for name in ["knr", "KnR", "same-line", "k&r"] {
            assert_eq!(name.parse(), Ok(BracketStyle::SameLine), "{name}");
        }
        for name in ["allman", "ALLMAN", "next-line"] {
            assert_eq!(name.parse(), Ok(BracketStyle::NextLine), "{name}");
        }
    }

    #[test]
    fn test_parse_unknown() {
        assert_eq!(
            "gnu".parse::<BracketStyle>(),
            Err(ReformError::UnknownBracketStyle("gnu".to_string()))
        );
    }

    #[test]
    fn test_serde_uses_names() {
        let json = serde_json::to_string(&BracketStyle::NextLine).unwrap();
        assert_eq!(json, "\"allman\"");
        let back: BracketStyle = serde_json::from_str("\"same-line\"").unwrap();
        assert_eq!(back, BracketStyle::SameLine);
        assert!(serde_json::from_str::<BracketStyle>("\"gnu\"").is_err());
    }
}
