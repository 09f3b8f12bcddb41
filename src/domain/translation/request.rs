use crate::domain::language::LanguageCode;
use crate::domain::DomainError;

/// A single translation request, immutable once built
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct TranslationRequest {
    source_text: String,
    source_lang: Option<LanguageCode>,
    target_lang: LanguageCode,
}

impl TranslationRequest {
    pub fn builder() -> TranslationRequestBuilder {
        TranslationRequestBuilder::default()
    }

    pub fn new(
        source_text: impl Into<String>,
        source_lang: Option<LanguageCode>,
        target_lang: LanguageCode,
    ) -> Result<Self, DomainError> {
        let source_text = source_text.into();

        if source_text.trim().is_empty() {
            return Err(DomainError::validation("Source text is empty"));
        }

        Ok(Self {
            source_text,
            source_lang,
            target_lang,
        })
    }

    pub fn source_text(&self) -> &str {
        &self.source_text
    }

    pub fn source_lang(&self) -> Option<&LanguageCode> {
        self.source_lang.as_ref()
    }

    pub fn target_lang(&self) -> &LanguageCode {
        &self.target_lang
    }
}

/// Builder for [`TranslationRequest`]
#[derive(Debug, Default)]
pub struct TranslationRequestBuilder {
    source_text: String,
    source_lang: Option<LanguageCode>,
    target_lang: Option<LanguageCode>,
}

impl TranslationRequestBuilder {
    pub fn source_text(mut self, text: impl Into<String>) -> Self {
        self.source_text = text.into();
        self
    }

    pub fn source_lang(mut self, lang: LanguageCode) -> Self {
        self.source_lang = Some(lang);
        self
    }

    pub fn target_lang(mut self, lang: LanguageCode) -> Self {
        self.target_lang = Some(lang);
        self
    }

    pub fn build(self) -> Result<TranslationRequest, DomainError> {
        let target_lang = self
            .target_lang
            .ok_or_else(|| DomainError::validation("Target language is required"))?;

        TranslationRequest::new(self.source_text, self.source_lang, target_lang)
    }
}
