//! Language codes and the per-deployment language registry

use std::collections::HashMap;
use std::fmt;

use once_cell::sync::Lazy;
use serde::{Deserialize, Serialize};

use crate::domain::DomainError;

/// Maximum number of languages offered per message.
///
/// Discord caps reactions per message at 20; other transports are unlikely
/// to usefully present more choices than that either.
pub const MAX_OFFERED_LANGUAGES: usize = 20;

const FALLBACK_FLAG: &str = "\u{1F3F3}\u{FE0F}";

/// Flag overrides for languages whose code does not match a country code
static DEFAULT_FLAGS: Lazy<HashMap<&'static str, &'static str>> = Lazy::new(|| {
    HashMap::from([
        ("en", "\u{1F1EC}\u{1F1E7}"), // 🇬🇧
        ("es", "\u{1F1EA}\u{1F1F8}"), // 🇪🇸
        ("fr", "\u{1F1EB}\u{1F1F7}"), // 🇫🇷
        ("de", "\u{1F1E9}\u{1F1EA}"), // 🇩🇪
        ("ru", "\u{1F1F7}\u{1F1FA}"), // 🇷🇺
        ("pt", "\u{1F1F5}\u{1F1F9}"), // 🇵🇹
    ])
});

/// Two-letter ISO 639-1 language code, lowercased on construction
#[derive(Debug, Clone, PartialEq, Eq, Hash, PartialOrd, Ord, Serialize, Deserialize)]
#[serde(try_from = "String", into = "String")]
pub struct LanguageCode(String);

impl LanguageCode {
    /// Parses a language code, rejecting anything that is not two ASCII letters
    pub fn parse(code: impl AsRef<str>) -> Result<Self, DomainError> {
        let code = code.as_ref().trim();

        if code.len() != 2 || !code.chars().all(|c| c.is_ascii_alphabetic()) {
            return Err(DomainError::unsupported_language(code));
        }

        Ok(Self(code.to_ascii_lowercase()))
    }

    pub fn as_str(&self) -> &str {
        &self.0
    }

    /// Regional-indicator emoji derived from the code letters (e.g. "ko" -> 🇰🇴)
    pub fn letter_emoji(&self) -> String {
        self.0
            .chars()
            .filter_map(|c| char::from_u32(0x1F1E6 + (c as u32 - 'a' as u32)))
            .collect()
    }
}

impl fmt::Display for LanguageCode {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(&self.0)
    }
}

impl TryFrom<String> for LanguageCode {
    type Error = DomainError;

    fn try_from(value: String) -> Result<Self, Self::Error> {
        Self::parse(value)
    }
}

impl From<LanguageCode> for String {
    fn from(code: LanguageCode) -> Self {
        code.0
    }
}

/// The set of languages a deployment offers, with their display flags
/// and presentation order
#[derive(Debug, Clone)]
pub struct LanguageRegistry {
    enabled: Vec<LanguageCode>,
    flags: HashMap<LanguageCode, String>,
    priority: Vec<LanguageCode>,
}

impl Default for LanguageRegistry {
    fn default() -> Self {
        let enabled = ["en", "es", "fr", "de", "ru", "pt"]
            .iter()
            .map(|c| LanguageCode::parse(c).expect("default language code"))
            .collect();

        let priority = [
            "en", "es", "fr", "de", "ru", "pt", "it", "pl", "ja", "ko", "zh", "ar", "hi", "nl",
            "sv", "no", "da", "fi", "tr", "cs",
        ]
        .iter()
        .map(|c| LanguageCode::parse(c).expect("default language code"))
        .collect();

        Self {
            enabled,
            flags: HashMap::new(),
            priority,
        }
    }
}

impl LanguageRegistry {
    pub fn new(
        enabled: Vec<LanguageCode>,
        flags: HashMap<LanguageCode, String>,
        priority: Vec<LanguageCode>,
    ) -> Self {
        Self {
            enabled,
            flags,
            priority,
        }
    }

    pub fn is_enabled(&self, code: &LanguageCode) -> bool {
        self.enabled.contains(code)
    }

    pub fn enabled(&self) -> &[LanguageCode] {
        &self.enabled
    }

    /// Flag emoji for a language: explicit override first, then the built-in
    /// defaults, then regional-indicator letters
    pub fn flag(&self, code: &LanguageCode) -> String {
        if let Some(flag) = self.flags.get(code) {
            return flag.clone();
        }

        if let Some(flag) = DEFAULT_FLAGS.get(code.as_str()) {
            return (*flag).to_string();
        }

        let emoji = code.letter_emoji();

        if emoji.is_empty() {
            FALLBACK_FLAG.to_string()
        } else {
            emoji
        }
    }

    /// Resolves a flag emoji back to the language it represents
    pub fn language_for_flag(&self, emoji: &str) -> Option<LanguageCode> {
        self.enabled
            .iter()
            .find(|code| self.flag(code) == emoji)
            .cloned()
    }

    /// Enabled languages in priority order, capped at [`MAX_OFFERED_LANGUAGES`]
    pub fn offered(&self) -> Vec<LanguageCode> {
        let rank = |code: &LanguageCode| {
            self.priority
                .iter()
                .position(|p| p == code)
                .unwrap_or(usize::MAX)
        };

        let mut sorted = self.enabled.clone();
        sorted.sort_by_key(|code| (rank(code), code.clone()));
        sorted.truncate(MAX_OFFERED_LANGUAGES);
        sorted
    }
}
