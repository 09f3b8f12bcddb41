//! LibreTranslate translation provider
//!
//! Talks to a self-hosted or public LibreTranslate instance. Requests
//! without an explicit source language are sent with `source: "auto"`,
//! and the detected language reported by the server is carried into the
//! result.

use std::sync::Arc;

use async_trait::async_trait;
use serde_json::json;
use tracing::debug;

use crate::domain::language::LanguageCode;
use crate::domain::translation::{TranslationProvider, TranslationRequest, TranslationResult};
use crate::domain::DomainError;
use crate::infrastructure::provider::http_client::{HttpClientTrait, HttpError};

pub const PROVIDER_NAME: &str = "libretranslate";

pub const DEFAULT_URL: &str = "https://libretranslate.com/translate";

#[derive(Debug, Clone)]
pub struct LibreTranslateConfig {
    pub url: String,
    pub api_key: Option<String>,
}

impl LibreTranslateConfig {
    pub fn new(url: impl Into<String>) -> Self {
        Self {
            url: url.into(),
            api_key: None,
        }
    }

    pub fn with_api_key(mut self, api_key: impl Into<String>) -> Self {
        self.api_key = Some(api_key.into());
        self
    }
}

impl Default for LibreTranslateConfig {
    fn default() -> Self {
        Self::new(DEFAULT_URL)
    }
}

#[derive(Debug)]
pub struct LibreTranslateProvider<C: HttpClientTrait> {
    config: LibreTranslateConfig,
    http_client: Arc<C>,
}

impl<C: HttpClientTrait> LibreTranslateProvider<C> {
    pub fn new(config: LibreTranslateConfig, http_client: Arc<C>) -> Self {
        Self {
            config,
            http_client,
        }
    }

    fn map_error(&self, request: &TranslationRequest, error: HttpError) -> DomainError {
        match error {
            HttpError::Status { code: 400, body } if body.contains("not supported") => {
                DomainError::unsupported_language(request.target_lang().as_str())
            }
            HttpError::Status { code, body } => DomainError::translation_unavailable(format!(
                "LibreTranslate returned HTTP {}: {}",
                code, body
            )),
            HttpError::Transport(message) => DomainError::translation_unavailable(format!(
                "LibreTranslate request failed: {}",
                message
            )),
        }
    }
}

#[async_trait]
impl<C: HttpClientTrait> TranslationProvider for LibreTranslateProvider<C> {
    async fn translate(
        &self,
        request: &TranslationRequest,
    ) -> Result<TranslationResult, DomainError> {
        let source = request
            .source_lang()
            .map(|l| l.as_str().to_string())
            .unwrap_or_else(|| "auto".to_string());

        let mut body = json!({
            "q": request.source_text(),
            "source": source,
            "target": request.target_lang().as_str(),
            "format": "text",
        });

        if let Some(api_key) = &self.config.api_key {
            body["api_key"] = json!(api_key);
        }

        debug!(
            target_lang = %request.target_lang(),
            chars = request.source_text().len(),
            "Calling LibreTranslate"
        );

        let response = self
            .http_client
            .post_json(&self.config.url, vec![], &body)
            .await
            .map_err(|e| self.map_error(request, e))?;

        let text = response
            .get("translatedText")
            .and_then(|t| t.as_str())
            .ok_or_else(|| {
                DomainError::translation_unavailable("LibreTranslate response had no translatedText")
            })?;

        let mut result = TranslationResult::new(text, PROVIDER_NAME);

        if let Some(detected) = response
            .get("detectedLanguage")
            .and_then(|d| d.get("language"))
            .and_then(|l| l.as_str())
            .and_then(|l| LanguageCode::parse(l).ok())
        {
            result = result.with_detected_source_lang(detected);
        }

        Ok(result)
    }

    fn provider_name(&self) -> &'static str {
        PROVIDER_NAME
    }
}
