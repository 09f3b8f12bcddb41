//! Provider cascade
//!
//! Tries configured providers in order and returns the first success.
//! Failures are logged per provider and the cascade moves on. If every
//! provider fails, the reported error is transient when any individual
//! failure was transient, so callers still know a retry could help.

use std::sync::Arc;

use async_trait::async_trait;
use tracing::{debug, warn};

use crate::domain::translation::{TranslationProvider, TranslationRequest, TranslationResult};
use crate::domain::DomainError;

pub const PROVIDER_NAME: &str = "cascade";

#[derive(Debug)]
pub struct CascadeProvider {
    providers: Vec<Arc<dyn TranslationProvider>>,
}

impl CascadeProvider {
    pub fn new(providers: Vec<Arc<dyn TranslationProvider>>) -> Result<Self, DomainError> {
        if providers.is_empty() {
            return Err(DomainError::configuration(
                "cascade requires at least one provider",
            ));
        }

        Ok(Self { providers })
    }
}

#[async_trait]
impl TranslationProvider for CascadeProvider {
    async fn translate(
        &self,
        request: &TranslationRequest,
    ) -> Result<TranslationResult, DomainError> {
        let mut last_error: Option<DomainError> = None;
        let mut any_transient = false;

        for provider in &self.providers {
            debug!(provider = provider.provider_name(), "Trying provider");

            match provider.translate(request).await {
                Ok(result) => {
                    debug!(provider = provider.provider_name(), "Provider succeeded");
                    return Ok(result);
                }
                Err(error) => {
                    warn!(
                        provider = provider.provider_name(),
                        error = %error,
                        "Provider failed, trying next"
                    );
                    any_transient = any_transient || error.is_transient();
                    last_error = Some(error);
                }
            }
        }

        // A permanent error from the last provider must not mask an earlier
        // transient one, otherwise the caller would skip a useful retry
        if any_transient {
            return Err(DomainError::translation_unavailable(format!(
                "all {} providers failed for target {}",
                self.providers.len(),
                request.target_lang()
            )));
        }

        Err(last_error
            .unwrap_or_else(|| DomainError::internal("cascade finished without a result")))
    }

    fn provider_name(&self) -> &'static str {
        PROVIDER_NAME
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::domain::language::LanguageCode;
    use crate::domain::translation::MockTranslationProvider;

    fn request() -> TranslationRequest {
        TranslationRequest::builder()
            .source_text("hello")
            .target_lang(LanguageCode::parse("fr").unwrap())
            .build()
            .unwrap()
    }

    #[tokio::test]
    async fn test_first_success_short_circuits() {
        let first = Arc::new(
            MockTranslationProvider::new("first")
                .with_result(TranslationResult::new("bonjour", "first")),
        );
        let second = Arc::new(MockTranslationProvider::new("second"));
        let cascade =
            CascadeProvider::new(vec![first.clone() as _, second.clone() as _]).unwrap();

        let result = cascade.translate(&request()).await.unwrap();

        assert_eq!(result.translated_text, "bonjour");
        assert_eq!(first.calls(), 1);
        assert_eq!(second.calls(), 0);
    }

    #[tokio::test]
    async fn test_falls_through_to_next_provider() {
        let first = Arc::new(
            MockTranslationProvider::new("first")
                .with_error(DomainError::translation_unavailable("down")),
        );
        let second = Arc::new(
            MockTranslationProvider::new("second")
                .with_result(TranslationResult::new("bonjour", "second")),
        );
        let cascade =
            CascadeProvider::new(vec![first.clone() as _, second.clone() as _]).unwrap();

        let result = cascade.translate(&request()).await.unwrap();

        assert_eq!(result.provider, "second");
        assert_eq!(first.calls(), 1);
        assert_eq!(second.calls(), 1);
    }

    #[tokio::test]
    async fn test_all_transient_failures_stay_transient() {
        let first = Arc::new(
            MockTranslationProvider::new("first")
                .with_error(DomainError::translation_unavailable("down")),
        );
        let second = Arc::new(
            MockTranslationProvider::new("second")
                .with_error(DomainError::unsupported_language("fr")),
        );
        let cascade = CascadeProvider::new(vec![first as _, second as _]).unwrap();

        let error = cascade.translate(&request()).await.unwrap_err();

        assert!(error.is_transient());
    }

    #[tokio::test]
    async fn test_all_permanent_failures_propagate_last_error() {
        let first = Arc::new(
            MockTranslationProvider::new("first")
                .with_error(DomainError::unsupported_language("fr")),
        );
        let second = Arc::new(
            MockTranslationProvider::new("second")
                .with_error(DomainError::unsupported_language("fr")),
        );
        let cascade = CascadeProvider::new(vec![first as _, second as _]).unwrap();

        let error = cascade.translate(&request()).await.unwrap_err();

        assert!(matches!(error, DomainError::UnsupportedLanguage { .. }));
    }

    #[test]
    fn test_empty_cascade_is_rejected() {
        assert!(CascadeProvider::new(vec![]).is_err());
    }
}
