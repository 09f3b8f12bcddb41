//! DeepL translation provider
//!
//! Uses the v2 REST API. Target codes are uppercased, and the two codes
//! DeepL deprecated as bare targets are mapped to their regional variants
//! (`en` -> `EN-US`, `pt` -> `PT-PT`).

use std::sync::Arc;

use async_trait::async_trait;
use serde_json::json;
use tracing::debug;

use crate::domain::language::LanguageCode;
use crate::domain::translation::{TranslationProvider, TranslationRequest, TranslationResult};
use crate::domain::DomainError;
use crate::infrastructure::provider::http_client::{HttpClientTrait, HttpError};

pub const PROVIDER_NAME: &str = "deepl";

pub const DEFAULT_BASE_URL: &str = "https://api-free.deepl.com";

#[derive(Debug, Clone)]
pub struct DeepLConfig {
    pub api_key: String,
    pub base_url: String,
}

impl DeepLConfig {
    pub fn new(api_key: impl Into<String>) -> Self {
        Self {
            api_key: api_key.into(),
            base_url: DEFAULT_BASE_URL.to_string(),
        }
    }

    pub fn with_base_url(mut self, base_url: impl Into<String>) -> Self {
        self.base_url = base_url.into();
        self
    }
}

#[derive(Debug)]
pub struct DeepLProvider<C: HttpClientTrait> {
    config: DeepLConfig,
    http_client: Arc<C>,
}

impl<C: HttpClientTrait> DeepLProvider<C> {
    pub fn new(config: DeepLConfig, http_client: Arc<C>) -> Self {
        Self {
            config,
            http_client,
        }
    }

    fn translate_url(&self) -> String {
        format!("{}/v2/translate", self.config.base_url.trim_end_matches('/'))
    }

    fn map_error(&self, request: &TranslationRequest, error: HttpError) -> DomainError {
        match error {
            // 400 is what DeepL returns for a target_lang it does not support
            HttpError::Status { code: 400, .. } => {
                DomainError::unsupported_language(request.target_lang().as_str())
            }
            HttpError::Status { code, body } => DomainError::translation_unavailable(format!(
                "DeepL returned HTTP {}: {}",
                code, body
            )),
            HttpError::Transport(message) => DomainError::translation_unavailable(format!(
                "DeepL request failed: {}",
                message
            )),
        }
    }

    fn parse_response(response: &serde_json::Value) -> Result<TranslationResult, DomainError> {
        let translation = response
            .get("translations")
            .and_then(|t| t.as_array())
            .and_then(|t| t.first())
            .ok_or_else(|| {
                DomainError::translation_unavailable("DeepL response had no translations")
            })?;

        let text = translation
            .get("text")
            .and_then(|t| t.as_str())
            .ok_or_else(|| {
                DomainError::translation_unavailable("DeepL translation had no text")
            })?;

        let mut result = TranslationResult::new(text, PROVIDER_NAME);

        if let Some(detected) = translation
            .get("detected_source_language")
            .and_then(|l| l.as_str())
            .and_then(|l| LanguageCode::parse(l).ok())
        {
            result = result.with_detected_source_lang(detected);
        }

        Ok(result)
    }
}

/// DeepL rejects the bare `EN` and `PT` target codes
fn deepl_target_code(target: &LanguageCode) -> String {
    match target.as_str() {
        "en" => "EN-US".to_string(),
        "pt" => "PT-PT".to_string(),
        other => other.to_uppercase(),
    }
}

#[async_trait]
impl<C: HttpClientTrait> TranslationProvider for DeepLProvider<C> {
    async fn translate(
        &self,
        request: &TranslationRequest,
    ) -> Result<TranslationResult, DomainError> {
        let mut body = json!({
            "text": [request.source_text()],
            "target_lang": deepl_target_code(request.target_lang()),
        });

        if let Some(source) = request.source_lang() {
            body["source_lang"] = json!(source.as_str().to_uppercase());
        }

        debug!(
            target_lang = %request.target_lang(),
            chars = request.source_text().len(),
            "Calling DeepL"
        );

        let auth = format!("DeepL-Auth-Key {}", self.config.api_key);
        let response = self
            .http_client
            .post_json(&self.translate_url(), vec![("Authorization", &auth)], &body)
            .await
            .map_err(|e| self.map_error(request, e))?;

        Self::parse_response(&response)
    }

    fn provider_name(&self) -> &'static str {
        PROVIDER_NAME
    }
}
