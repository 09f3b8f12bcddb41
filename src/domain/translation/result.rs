use chrono::{DateTime, Utc};
use serde::{Deserialize, Serialize};

use crate::domain::language::LanguageCode;

/// A completed translation, immutable once produced
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct TranslationResult {
    /// The translated text
    pub translated_text: String,
    /// Source language as reported by the provider, when it detects one
    pub detected_source_lang: Option<LanguageCode>,
    /// Name of the provider that produced this result
    pub provider: String,
    /// When the translation was produced
    pub translated_at: DateTime<Utc>,
}

impl TranslationResult {
    pub fn new(translated_text: impl Into<String>, provider: impl Into<String>) -> Self {
        Self {
            translated_text: translated_text.into(),
            detected_source_lang: None,
            provider: provider.into(),
            translated_at: Utc::now(),
        }
    }

    pub fn with_detected_source_lang(mut self, lang: LanguageCode) -> Self {
        self.detected_source_lang = Some(lang);
        self
    }

    pub fn with_translated_at(mut self, at: DateTime<Utc>) -> Self {
        self.translated_at = at;
        self
    }

    /// Two results agree if they carry the same translated text.
    ///
    /// Provider and timestamp are provenance, not identity; the
    /// persistence layer uses this to decide whether a re-store of an
    /// existing key is an idempotent no-op or a conflict.
    pub fn agrees_with(&self, other: &TranslationResult) -> bool {
        self.translated_text == other.translated_text
    }
}
