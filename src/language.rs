//! The fixed language dictionary.
//!
//! Summaries can be requested in any of the [`LANGUAGES`] below. The table is
//! read-only; anything outside it collapses to [`DEFAULT_LANGUAGE`].

use serde::{Deserialize, Serialize};
use std::fmt;

/// Base code used when a requested language has no article.
pub const DEFAULT_LANGUAGE: &str = "en";

/// Supported codes and their display names, in selector order.
pub const LANGUAGES: &[(&str, &str)] = &[
    ("en", "English"),
    ("hi", "हिन्दी (Hindi)"),
    ("bn", "বাংলা (Bengali)"),
    ("te", "తెలుగు (Telugu)"),
    ("mr", "मराठी (Marathi)"),
    ("ta", "தமிழ் (Tamil)"),
    ("gu", "ગુજરાતી (Gujarati)"),
    ("kn", "ಕನ್ನಡ (Kannada)"),
    ("ml", "മലയാളം (Malayalam)"),
    ("or", "ଓଡ଼ିଆ (Odia)"),
    ("pa", "ਪੰਜਾਬੀ (Punjabi)"),
    ("as", "অসমীয়া (Assamese)"),
    ("ur", "اردو (Urdu)"),
    ("sa", "संस्कृत (Sanskrit)"),
    ("ne", "नेपाली (Nepali)"),
    ("si", "සිංහල (Sinhala)"),
    ("my", "မြန်မာ (Myanmar)"),
    ("es", "Español"),
    ("fr", "Français"),
    ("de", "Deutsch"),
    ("it", "Italiano"),
    ("pt", "Português"),
    ("ru", "Русский"),
    ("ja", "日本語"),
    ("zh", "中文"),
    ("ar", "العربية"),
    ("ko", "한국어"),
    ("nl", "Nederlands"),
    ("sv", "Svenska"),
    ("tr", "Türkçe"),
];

/// Codes shown under the "Indian & South-Asian Languages" group.
const SOUTH_ASIAN: &[&str] = &[
    "hi", "bn", "te", "mr", "ta", "gu", "kn", "ml", "or", "pa", "as", "ur", "sa", "ne", "si", "my",
];

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum LanguageGroup {
    SouthAsian,
    Other,
}

impl LanguageGroup {
    pub fn label(self) -> &'static str {
        match self {
            LanguageGroup::SouthAsian => "Indian & South-Asian Languages",
            LanguageGroup::Other => "Other Languages",
        }
    }
}

/// A language code guaranteed to be in [`LANGUAGES`].
///
/// Stored as an index into the table so it stays `Copy` and can be cycled
/// from the UI without string juggling.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub struct LanguageCode(usize);

impl LanguageCode {
    /// Looks up `code` in the dictionary. Returns `None` for unknown codes.
    pub fn parse(code: &str) -> Option<Self> {
        let code = code.trim();
        LANGUAGES
            .iter()
            .position(|(c, _)| c.eq_ignore_ascii_case(code))
            .map(LanguageCode)
    }

    /// Like [`parse`](Self::parse), but absent or invalid input yields the default.
    pub fn parse_or_default(code: Option<&str>) -> Self {
        code.and_then(Self::parse).unwrap_or_default()
    }

    pub fn code(self) -> &'static str {
        LANGUAGES[self.0].0
    }

    /// Native display name, e.g. `"Deutsch"`.
    pub fn display_name(self) -> &'static str {
        LANGUAGES[self.0].1
    }

    pub fn is_default(self) -> bool {
        self.code() == DEFAULT_LANGUAGE
    }

    pub fn group(self) -> LanguageGroup {
        if SOUTH_ASIAN.contains(&self.code()) {
            LanguageGroup::SouthAsian
        } else {
            LanguageGroup::Other
        }
    }

    pub fn next(self) -> Self {
        LanguageCode((self.0 + 1) % LANGUAGES.len())
    }

    pub fn prev(self) -> Self {
        LanguageCode(self.0.checked_sub(1).unwrap_or(LANGUAGES.len() - 1))
    }

    pub fn all() -> impl Iterator<Item = LanguageCode> {
        (0..LANGUAGES.len()).map(LanguageCode)
    }
}

impl Default for LanguageCode {
    fn default() -> Self {
        // "en" sits at the head of the table.
        LanguageCode(0)
    }
}

impl fmt::Display for LanguageCode {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.code())
    }
}

impl Serialize for LanguageCode {
    fn serialize<S: serde::Serializer>(&self, serializer: S) -> Result<S::Ok, S::Error> {
        serializer.serialize_str(self.code())
    }
}

// Invalid codes in config.toml fall back instead of failing the whole file.
impl<'de> Deserialize<'de> for LanguageCode {
    fn deserialize<D: serde::Deserializer<'de>>(deserializer: D) -> Result<Self, D::Error> {
        let raw = String::deserialize(deserializer)?;
        Ok(LanguageCode::parse_or_default(Some(&raw)))
    }
}
