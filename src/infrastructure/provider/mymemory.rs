//! MyMemory translation provider
//!
//! Free GET-based API, used as the last resort in the default cascade.
//! MyMemory signals errors in the JSON body (`responseStatus`) rather than
//! the HTTP status line, so both are checked.

use std::sync::Arc;

use async_trait::async_trait;
use tracing::debug;

use crate::domain::translation::{
    TranslationProvider, TranslationRequest, TranslationResult, AUTO_SOURCE,
};
use crate::domain::DomainError;
use crate::infrastructure::provider::http_client::{HttpClientTrait, HttpError};

pub const PROVIDER_NAME: &str = "mymemory";

pub const DEFAULT_URL: &str = "https://api.mymemory.translated.net/get";

#[derive(Debug, Clone)]
pub struct MyMemoryConfig {
    pub url: String,
}

impl MyMemoryConfig {
    pub fn new(url: impl Into<String>) -> Self {
        Self { url: url.into() }
    }
}

impl Default for MyMemoryConfig {
    fn default() -> Self {
        Self::new(DEFAULT_URL)
    }
}

#[derive(Debug)]
pub struct MyMemoryProvider<C: HttpClientTrait> {
    config: MyMemoryConfig,
    http_client: Arc<C>,
}

impl<C: HttpClientTrait> MyMemoryProvider<C> {
    pub fn new(config: MyMemoryConfig, http_client: Arc<C>) -> Self {
        Self {
            config,
            http_client,
        }
    }
}

#[async_trait]
impl<C: HttpClientTrait> TranslationProvider for MyMemoryProvider<C> {
    async fn translate(
        &self,
        request: &TranslationRequest,
    ) -> Result<TranslationResult, DomainError> {
        let source = request
            .source_lang()
            .map(|l| l.as_str())
            .unwrap_or(AUTO_SOURCE);
        let langpair = format!("{}|{}", source, request.target_lang());

        debug!(
            langpair = %langpair,
            chars = request.source_text().len(),
            "Calling MyMemory"
        );

        let response = self
            .http_client
            .get_json(
                &self.config.url,
                &[("q", request.source_text()), ("langpair", &langpair)],
            )
            .await
            .map_err(|e| match e {
                HttpError::Status { code, body } => DomainError::translation_unavailable(
                    format!("MyMemory returned HTTP {}: {}", code, body),
                ),
                HttpError::Transport(message) => DomainError::translation_unavailable(
                    format!("MyMemory request failed: {}", message),
                ),
            })?;

        let status = response
            .get("responseStatus")
            .and_then(|s| s.as_i64())
            .unwrap_or(0);

        if status != 200 {
            let details = response
                .get("responseDetails")
                .and_then(|d| d.as_str())
                .unwrap_or("unknown error");

            // "INVALID TARGET LANGUAGE" and friends; everything else is
            // quota or availability trouble
            if details.to_uppercase().contains("INVALID") {
                return Err(DomainError::unsupported_language(
                    request.target_lang().as_str(),
                ));
            }

            return Err(DomainError::translation_unavailable(format!(
                "MyMemory returned status {}: {}",
                status, details
            )));
        }

        let text = response
            .get("responseData")
            .and_then(|d| d.get("translatedText"))
            .and_then(|t| t.as_str())
            .ok_or_else(|| {
                DomainError::translation_unavailable("MyMemory response had no translatedText")
            })?;

        Ok(TranslationResult::new(text, PROVIDER_NAME))
    }

    fn provider_name(&self) -> &'static str {
        PROVIDER_NAME
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::domain::language::LanguageCode;
    use crate::infrastructure::provider::http_client::mock::MockHttpClient;

    fn request() -> TranslationRequest {
        TranslationRequest::builder()
            .source_text("hello")
            .target_lang(LanguageCode::parse("de").unwrap())
            .build()
            .unwrap()
    }

    fn provider(client: MockHttpClient) -> MyMemoryProvider<MockHttpClient> {
        MyMemoryProvider::new(MyMemoryConfig::default(), Arc::new(client))
    }

    #[tokio::test]
    async fn test_successful_translation() {
        let client = MockHttpClient::new().with_response(
            DEFAULT_URL,
            serde_json::json!({
                "responseStatus": 200,
                "responseData": {"translatedText": "hallo"}
            }),
        );

        let result = provider(client).translate(&request()).await.unwrap();

        assert_eq!(result.translated_text, "hallo");
        assert_eq!(result.provider, "mymemory");
        assert_eq!(result.detected_source_lang, None);
    }

    #[tokio::test]
    async fn test_body_level_error_is_transient() {
        let client = MockHttpClient::new().with_response(
            DEFAULT_URL,
            serde_json::json!({
                "responseStatus": 429,
                "responseDetails": "YOU USED ALL AVAILABLE FREE TRANSLATIONS FOR TODAY"
            }),
        );

        let error = provider(client).translate(&request()).await.unwrap_err();

        assert!(error.is_transient());
    }

    #[tokio::test]
    async fn test_invalid_language_is_permanent() {
        let client = MockHttpClient::new().with_response(
            DEFAULT_URL,
            serde_json::json!({
                "responseStatus": 403,
                "responseDetails": "INVALID TARGET LANGUAGE"
            }),
        );

        let error = provider(client).translate(&request()).await.unwrap_err();

        assert!(matches!(error, DomainError::UnsupportedLanguage { .. }));
    }
}
