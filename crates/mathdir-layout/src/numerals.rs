//! Numeral script transliteration.

use std::borrow::Cow;
use std::fmt;
use std::str::FromStr;

use mathdir_glyph::{GlyphNode, GlyphTree};

const WESTERN: [char; 10] = ['0', '1', '2', '3', '4', '5', '6', '7', '8', '9'];
const ARABIC_INDIC: [char; 10] = ['٠', '١', '٢', '٣', '٤', '٥', '٦', '٧', '٨', '٩'];
const EASTERN_ARABIC_INDIC: [char; 10] = ['۰', '۱', '۲', '۳', '۴', '۵', '۶', '۷', '۸', '۹'];

/// Digit glyph set.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Default)]
pub enum NumeralScript {
    /// `0`–`9`.
    Western,
    /// U+0660–U+0669.
    #[default]
    ArabicIndic,
    /// U+06F0–U+06F9 (Persian/Urdu forms).
    EasternArabicIndic,
}

impl NumeralScript {
    /// Name used in configuration.
    #[must_use]
    pub fn as_str(self) -> &'static str {
        match self {
            Self::Western => "western",
            Self::ArabicIndic => "arabic-indic",
            Self::EasternArabicIndic => "eastern-arabic-indic",
        }
    }

    /// The ten digit glyphs, indexed by value.
    #[must_use]
    pub fn digits(self) -> &'static [char; 10] {
        match self {
            Self::Western => &WESTERN,
            Self::ArabicIndic => &ARABIC_INDIC,
            Self::EasternArabicIndic => &EASTERN_ARABIC_INDIC,
        }
    }

    /// Value of `c` if it is a digit of this script.
    #[must_use]
    pub fn digit_value(self, c: char) -> Option<usize> {
        self.digits().iter().position(|&d| d == c)
    }
}

impl fmt::Display for NumeralScript {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.as_str())
    }
}

/// Error returned when parsing an unknown numeral script name.
#[derive(Debug, Clone, PartialEq, Eq, thiserror::Error)]
#[error("unknown numeral script '{0}' (valid: western, arabic-indic, eastern-arabic-indic)")]
pub struct ParseNumeralScriptError(pub String);

impl FromStr for NumeralScript {
    type Err = ParseNumeralScriptError;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        match s.trim().to_ascii_lowercase().replace('_', "-").as_str() {
            "western" | "latin" => Ok(Self::Western),
            "arabic-indic" | "arabic" => Ok(Self::ArabicIndic),
            "eastern-arabic-indic" | "persian" => Ok(Self::EasternArabicIndic),
            _ => Err(ParseNumeralScriptError(s.to_owned())),
        }
    }
}

/// Rewrite digit glyphs in `text` from one script to another.
///
/// Characters that are not digits of `from` pass through unchanged.
/// Borrows when nothing changes.
#[must_use]
pub fn transliterate_str(text: &str, from: NumeralScript, to: NumeralScript) -> Cow<'_, str> {
    if from == to || !text.chars().any(|c| from.digit_value(c).is_some()) {
        return Cow::Borrowed(text);
    }

    let target = to.digits();
    Cow::Owned(
        text.chars()
            .map(|c| from.digit_value(c).map_or(c, |value| target[value]))
            .collect(),
    )
}

/// Rewrite digit glyphs in every leaf of `tree`.
///
/// Only leaf text changes; structure, classes and markers are untouched.
pub fn transliterate(tree: &mut GlyphTree, from: NumeralScript, to: NumeralScript) {
    if from == to {
        return;
    }

    tree.root.for_each_leaf_mut(&mut |leaf: &mut GlyphNode| {
        if let Cow::Owned(text) = transliterate_str(&leaf.text, from, to) {
            leaf.text = text;
        }
    });
}
