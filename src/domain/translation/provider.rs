use std::fmt::Debug;

use async_trait::async_trait;

use super::{TranslationRequest, TranslationResult};
use crate::domain::DomainError;

/// Trait for translation backends (DeepL, LibreTranslate, etc.)
#[async_trait]
pub trait TranslationProvider: Send + Sync + Debug {
    /// Translate the request's source text into its target language
    async fn translate(
        &self,
        request: &TranslationRequest,
    ) -> Result<TranslationResult, DomainError>;

    /// Get the provider name
    fn provider_name(&self) -> &'static str;
}

#[cfg(test)]
pub mod mock {
    use super::*;
    use std::sync::atomic::{AtomicUsize, Ordering};

    /// Mock provider returning a fixed result or error, counting calls
    #[derive(Debug)]
    pub struct MockTranslationProvider {
        name: &'static str,
        result: Option<TranslationResult>,
        error: Option<DomainError>,
        calls: AtomicUsize,
    }

    impl MockTranslationProvider {
        pub fn new(name: &'static str) -> Self {
            Self {
                name,
                result: None,
                error: None,
                calls: AtomicUsize::new(0),
            }
        }

        pub fn with_result(mut self, result: TranslationResult) -> Self {
            self.result = Some(result);
            self
        }

        pub fn with_error(mut self, error: DomainError) -> Self {
            self.error = Some(error);
            self
        }

        pub fn calls(&self) -> usize {
            self.calls.load(Ordering::SeqCst)
        }
    }

    #[async_trait]
    impl TranslationProvider for MockTranslationProvider {
        async fn translate(
            &self,
            _request: &TranslationRequest,
        ) -> Result<TranslationResult, DomainError> {
            self.calls.fetch_add(1, Ordering::SeqCst);

            if let Some(ref error) = self.error {
                return Err(error.clone());
            }

            self.result.clone().ok_or_else(|| {
                DomainError::internal(format!("No mock result configured for '{}'", self.name))
            })
        }

        fn provider_name(&self) -> &'static str {
            self.name
        }
    }
}
