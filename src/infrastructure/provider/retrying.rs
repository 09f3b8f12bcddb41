//! Retrying provider decorator
//!
//! Wraps any [`TranslationProvider`] and re-attempts calls that failed
//! transiently, sleeping per the configured [`RetryPolicy`] between
//! attempts. Permanent errors return immediately. An optional per-attempt
//! timeout converts a hung call into a transient failure so it, too, can
//! be retried.

use std::sync::Arc;
use std::time::Duration;

use async_trait::async_trait;
use tracing::warn;

use crate::domain::translation::{
    RetryPolicy, TranslationProvider, TranslationRequest, TranslationResult,
};
use crate::domain::DomainError;

#[derive(Debug)]
pub struct RetryingProvider {
    inner: Arc<dyn TranslationProvider>,
    policy: RetryPolicy,
    attempt_timeout: Option<Duration>,
}

impl RetryingProvider {
    pub fn new(inner: Arc<dyn TranslationProvider>, policy: RetryPolicy) -> Self {
        Self {
            inner,
            policy,
            attempt_timeout: None,
        }
    }

    pub fn with_attempt_timeout(mut self, timeout: Duration) -> Self {
        self.attempt_timeout = Some(timeout);
        self
    }

    async fn attempt(
        &self,
        request: &TranslationRequest,
    ) -> Result<TranslationResult, DomainError> {
        match self.attempt_timeout {
            Some(timeout) => tokio::time::timeout(timeout, self.inner.translate(request))
                .await
                .unwrap_or_else(|_| {
                    Err(DomainError::translation_unavailable(format!(
                        "provider '{}' timed out after {}ms",
                        self.inner.provider_name(),
                        timeout.as_millis()
                    )))
                }),
            None => self.inner.translate(request).await,
        }
    }
}

#[async_trait]
impl TranslationProvider for RetryingProvider {
    async fn translate(
        &self,
        request: &TranslationRequest,
    ) -> Result<TranslationResult, DomainError> {
        let max_attempts = self.policy.max_attempts.max(1);

        for attempt in 0..max_attempts {
            match self.attempt(request).await {
                Ok(result) => return Ok(result),
                Err(error) if error.is_transient() && attempt + 1 < max_attempts => {
                    let delay = self.policy.delay_for_retry(attempt);
                    warn!(
                        provider = self.inner.provider_name(),
                        attempt = attempt + 1,
                        delay_ms = delay.as_millis() as u64,
                        error = %error,
                        "Transient failure, retrying"
                    );
                    tokio::time::sleep(delay).await;
                }
                Err(error) => return Err(error),
            }
        }

        unreachable!("loop always returns on the last attempt")
    }

    fn provider_name(&self) -> &'static str {
        self.inner.provider_name()
    }
}
