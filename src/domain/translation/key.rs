//! Cache/persistence key for translation requests

use std::fmt;

use crate::domain::language::LanguageCode;
use crate::domain::translation::TranslationRequest;

/// Language tag used for keys of requests without an explicit source language
pub const AUTO_SOURCE: &str = "auto";

/// Normalized identity of a translation request.
///
/// Two requests that differ only in letter case or surrounding whitespace
/// of the source text map to the same key, so they hit the same cache
/// entry and the same persisted row. Normalization is applied here, once,
/// so lookup and insert can never disagree.
#[derive(Debug, Clone, PartialEq, Eq, Hash)]
pub struct TranslationKey {
    normalized_text: String,
    source_lang: Option<LanguageCode>,
    target_lang: LanguageCode,
}

impl TranslationKey {
    pub fn from_request(request: &TranslationRequest) -> Self {
        Self::new(
            request.source_text(),
            request.source_lang().cloned(),
            request.target_lang().clone(),
        )
    }

    /// Builds a key directly, e.g. when rehydrating from storage.
    /// The text is normalized here too, so keys from any origin compare equal.
    pub fn new(
        text: impl AsRef<str>,
        source_lang: Option<LanguageCode>,
        target_lang: LanguageCode,
    ) -> Self {
        Self {
            normalized_text: normalize_text(text.as_ref()),
            source_lang,
            target_lang,
        }
    }

    pub fn normalized_text(&self) -> &str {
        &self.normalized_text
    }

    pub fn source_lang(&self) -> Option<&LanguageCode> {
        self.source_lang.as_ref()
    }

    pub fn target_lang(&self) -> &LanguageCode {
        &self.target_lang
    }

    /// Source language tag for storage: the code, or [`AUTO_SOURCE`]
    pub fn source_tag(&self) -> &str {
        self.source_lang
            .as_ref()
            .map(|l| l.as_str())
            .unwrap_or(AUTO_SOURCE)
    }
}

impl fmt::Display for TranslationKey {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(
            f,
            "{}->{}:{}",
            self.source_tag(),
            self.target_lang,
            self.normalized_text
        )
    }
}

fn normalize_text(text: &str) -> String {
    text.trim().to_lowercase()
}
