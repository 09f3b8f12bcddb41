//! Translation pipeline orchestrator
//!
//! Resolves a request through the layers in order: LRU cache, in-flight
//! coalescing, persistent store, external provider. Fresh results are
//! written through to the store and cached. Store outages degrade the
//! pipeline to cache-only operation instead of failing requests.

use std::sync::Arc;

use tracing::{debug, error, info, warn};

use crate::domain::cache::TranslationCache;
use crate::domain::store::TranslationStore;
use crate::domain::translation::{
    TranslationKey, TranslationProvider, TranslationRequest, TranslationResult,
};
use crate::domain::DomainError;
use crate::infrastructure::pipeline::inflight::{InFlightRegistry, JoinOutcome};

/// Which layer produced the translation
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum OutcomeSource {
    /// Served from the in-memory cache
    Cache,
    /// Rehydrated from the persistent store
    Store,
    /// Freshly translated by an external provider
    Provider,
    /// Joined another caller's in-flight translation
    Coalesced,
}

#[derive(Debug, Clone)]
pub struct TranslationOutcome {
    pub result: TranslationResult,
    pub source: OutcomeSource,
}

#[derive(Debug)]
pub struct TranslationPipeline {
    cache: Arc<dyn TranslationCache>,
    store: Arc<dyn TranslationStore>,
    provider: Arc<dyn TranslationProvider>,
    inflight: Arc<InFlightRegistry>,
}

impl TranslationPipeline {
    pub fn new(
        cache: Arc<dyn TranslationCache>,
        store: Arc<dyn TranslationStore>,
        provider: Arc<dyn TranslationProvider>,
    ) -> Self {
        Self {
            cache,
            store,
            provider,
            inflight: Arc::new(InFlightRegistry::new()),
        }
    }

    /// Resolves a translation request through cache, store, and provider
    pub async fn translate(
        &self,
        request: &TranslationRequest,
    ) -> Result<TranslationOutcome, DomainError> {
        let key = TranslationKey::from_request(request);

        if let Some(result) = self.cache.lookup(&key).await {
            debug!(key = %key, "Cache hit");
            return Ok(TranslationOutcome {
                result,
                source: OutcomeSource::Cache,
            });
        }

        match self.inflight.join(&key) {
            JoinOutcome::Waiter(mut receiver) => {
                debug!(key = %key, "Joining in-flight translation");

                let outcome = receiver.recv().await.map_err(|_| {
                    DomainError::internal("in-flight translation ended without a result")
                })?;

                outcome.map(|result| TranslationOutcome {
                    result,
                    source: OutcomeSource::Coalesced,
                })
            }
            JoinOutcome::Leader(token) => {
                let resolved = self.resolve(&key, request).await;
                let waiters =
                    token.complete(resolved.clone().map(|(result, _)| result));

                if waiters > 0 {
                    debug!(key = %key, waiters, "Fanned out in-flight outcome");
                }

                resolved.map(|(result, source)| TranslationOutcome { result, source })
            }
        }
    }

    /// Leader path: store lookup, then the provider, then write-through
    async fn resolve(
        &self,
        key: &TranslationKey,
        request: &TranslationRequest,
    ) -> Result<(TranslationResult, OutcomeSource), DomainError> {
        match self.store.load(key).await {
            Ok(Some(result)) => {
                debug!(key = %key, "Store hit");
                self.cache.insert(key.clone(), result.clone()).await;
                return Ok((result, OutcomeSource::Store));
            }
            Ok(None) => {}
            Err(load_error) => {
                warn!(
                    key = %key,
                    error = %load_error,
                    "Store unavailable, continuing cache-only"
                );
            }
        }

        let result = self.provider.translate(request).await?;
        debug!(
            key = %key,
            provider = %result.provider,
            "Translated via provider"
        );

        if let Some(cache_value) = self.persist(key, &result).await {
            self.cache.insert(key.clone(), cache_value).await;
        }
        self.record_usage(&result.provider, request).await;

        Ok((result, OutcomeSource::Provider))
    }

    /// Write-through that never fails the request it serves.
    ///
    /// Returns the value the cache should hold for the key, so cache and
    /// store can never diverge. A conflict means the store already holds a
    /// different translation; the stored row wins, the cache gets that row
    /// (or nothing, if it cannot be re-read), and the fresh result is only
    /// used for the current response. Any other storage error is a
    /// degraded-mode condition: it is logged, and the fresh result is
    /// cached because there is no persisted row to diverge from.
    async fn persist(
        &self,
        key: &TranslationKey,
        result: &TranslationResult,
    ) -> Option<TranslationResult> {
        match self.store.store(key, result).await {
            Ok(()) => Some(result.clone()),
            Err(conflict @ DomainError::PersistenceConflict { .. }) => {
                error!(key = %key, error = %conflict, "Translation conflicts with stored row");

                match self.store.load(key).await {
                    Ok(stored) => stored,
                    Err(load_error) => {
                        warn!(
                            key = %key,
                            error = %load_error,
                            "Could not re-read conflicting row, skipping cache fill"
                        );
                        None
                    }
                }
            }
            Err(store_error) => {
                warn!(
                    key = %key,
                    error = %store_error,
                    "Failed to persist translation, continuing cache-only"
                );
                Some(result.clone())
            }
        }
    }

    async fn record_usage(&self, provider: &str, request: &TranslationRequest) {
        let characters = request.source_text().chars().count() as u64;

        if let Err(usage_error) = self.store.record_usage(provider, characters).await {
            warn!(error = %usage_error, "Failed to record provider usage");
        }
    }

    /// Preloads the cache with the most recently persisted translations
    pub async fn warm_cache(&self, limit: usize) -> Result<usize, DomainError> {
        let recent = self.store.load_recent(limit).await?;
        let count = recent.len();

        // Oldest first, so the newest entries end up most recently used
        for (key, result) in recent.into_iter().rev() {
            self.cache.insert(key, result).await;
        }

        info!(count, "Warmed translation cache");
        Ok(count)
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::domain::cache::MockTranslationCache;
    use crate::domain::language::LanguageCode;
    use crate::domain::store::MockTranslationStore;
    use crate::domain::translation::MockTranslationProvider;

    fn request(text: &str) -> TranslationRequest {
        TranslationRequest::builder()
            .source_text(text)
            .target_lang(LanguageCode::parse("fr").unwrap())
            .build()
            .unwrap()
    }

    fn key(text: &str) -> TranslationKey {
        TranslationKey::from_request(&request(text))
    }

    fn pipeline(
        store: MockTranslationStore,
        provider: MockTranslationProvider,
    ) -> TranslationPipeline {
        TranslationPipeline::new(
            Arc::new(MockTranslationCache::new()),
            Arc::new(store),
            Arc::new(provider),
        )
    }

    #[tokio::test]
    async fn test_provider_result_is_cached_and_persisted() {
        let pipeline = pipeline(
            MockTranslationStore::new(),
            MockTranslationProvider::new("mock")
                .with_result(TranslationResult::new("bonjour", "mock")),
        );

        let outcome = pipeline.translate(&request("hello")).await.unwrap();
        assert_eq!(outcome.source, OutcomeSource::Provider);
        assert_eq!(outcome.result.translated_text, "bonjour");

        // Second call is a cache hit; the provider is not consulted again
        let outcome = pipeline.translate(&request("hello")).await.unwrap();
        assert_eq!(outcome.source, OutcomeSource::Cache);

        assert_eq!(pipeline.store.load(&key("hello")).await.unwrap().unwrap()
            .translated_text, "bonjour");
    }

    #[tokio::test]
    async fn test_store_hit_skips_the_provider() {
        let provider = Arc::new(MockTranslationProvider::new("mock"));
        let store = MockTranslationStore::new()
            .with_entry(key("hello"), TranslationResult::new("bonjour", "mock"));
        let pipeline = TranslationPipeline::new(
            Arc::new(MockTranslationCache::new()),
            Arc::new(store),
            provider.clone(),
        );

        let outcome = pipeline.translate(&request("hello")).await.unwrap();

        assert_eq!(outcome.source, OutcomeSource::Store);
        assert_eq!(outcome.result.translated_text, "bonjour");
        assert_eq!(provider.calls(), 0);

        // The store hit also warmed the cache
        let outcome = pipeline.translate(&request("hello")).await.unwrap();
        assert_eq!(outcome.source, OutcomeSource::Cache);
    }

    #[tokio::test]
    async fn test_store_outage_degrades_to_cache_only() {
        let pipeline = pipeline(
            MockTranslationStore::new().with_error("connection refused"),
            MockTranslationProvider::new("mock")
                .with_result(TranslationResult::new("bonjour", "mock")),
        );

        let outcome = pipeline.translate(&request("hello")).await.unwrap();
        assert_eq!(outcome.source, OutcomeSource::Provider);

        // The result still landed in the cache despite the dead store
        let outcome = pipeline.translate(&request("hello")).await.unwrap();
        assert_eq!(outcome.source, OutcomeSource::Cache);
    }

    #[tokio::test]
    async fn test_provider_failure_propagates_and_writes_nothing() {
        let store = Arc::new(MockTranslationStore::new());
        let pipeline = TranslationPipeline::new(
            Arc::new(MockTranslationCache::new()),
            store.clone(),
            Arc::new(
                MockTranslationProvider::new("mock")
                    .with_error(DomainError::unsupported_language("xx")),
            ),
        );

        let error = pipeline.translate(&request("hello")).await.unwrap_err();

        assert!(matches!(error, DomainError::UnsupportedLanguage { .. }));
        assert_eq!(store.count().await.unwrap(), 0);
        assert!(store.recorded_usage().is_empty());
    }

    #[tokio::test]
    async fn test_conflicting_write_caches_the_stored_row() {
        use std::sync::atomic::{AtomicUsize, Ordering};

        use crate::domain::store::UsageSummary;

        /// Misses the first load so the provider runs, then rejects the
        /// write and serves the pre-existing row on re-read
        #[derive(Debug)]
        struct ConflictingStore {
            loads: AtomicUsize,
        }

        #[async_trait::async_trait]
        impl TranslationStore for ConflictingStore {
            async fn store(
                &self,
                key: &TranslationKey,
                _result: &TranslationResult,
            ) -> Result<(), DomainError> {
                Err(DomainError::persistence_conflict(
                    key.to_string(),
                    "stored result differs",
                ))
            }

            async fn load(
                &self,
                _key: &TranslationKey,
            ) -> Result<Option<TranslationResult>, DomainError> {
                if self.loads.fetch_add(1, Ordering::SeqCst) == 0 {
                    return Ok(None);
                }

                Ok(Some(TranslationResult::new("bonjour-stored", "other")))
            }

            async fn load_recent(
                &self,
                _limit: usize,
            ) -> Result<Vec<(TranslationKey, TranslationResult)>, DomainError> {
                Ok(Vec::new())
            }

            async fn record_usage(&self, _provider: &str, _chars: u64) -> Result<(), DomainError> {
                Ok(())
            }

            async fn usage_summary(&self) -> Result<Vec<UsageSummary>, DomainError> {
                Ok(Vec::new())
            }

            async fn count(&self) -> Result<usize, DomainError> {
                Ok(1)
            }
        }

        let pipeline = TranslationPipeline::new(
            Arc::new(MockTranslationCache::new()),
            Arc::new(ConflictingStore {
                loads: AtomicUsize::new(0),
            }),
            Arc::new(
                MockTranslationProvider::new("mock")
                    .with_result(TranslationResult::new("bonjour-fresh", "mock")),
            ),
        );

        // The losing fresh result still answers the current caller
        let outcome = pipeline.translate(&request("hello")).await.unwrap();
        assert_eq!(outcome.source, OutcomeSource::Provider);
        assert_eq!(outcome.result.translated_text, "bonjour-fresh");

        // But the cache now holds the persisted row, never the loser
        let outcome = pipeline.translate(&request("hello")).await.unwrap();
        assert_eq!(outcome.source, OutcomeSource::Cache);
        assert_eq!(outcome.result.translated_text, "bonjour-stored");
    }

    #[tokio::test]
    async fn test_usage_is_recorded_per_provider_call() {
        let store = Arc::new(MockTranslationStore::new());
        let pipeline = TranslationPipeline::new(
            Arc::new(MockTranslationCache::new()),
            store.clone(),
            Arc::new(
                MockTranslationProvider::new("mock")
                    .with_result(TranslationResult::new("bonjour", "mock")),
            ),
        );

        pipeline.translate(&request("hello")).await.unwrap();
        // Cache hit: no additional usage
        pipeline.translate(&request("hello")).await.unwrap();

        assert_eq!(store.recorded_usage(), vec![("mock".to_string(), 5)]);
    }

    #[tokio::test]
    async fn test_concurrent_requests_coalesce_into_one_call() {
        use std::sync::atomic::{AtomicUsize, Ordering};

        /// Slow provider that counts calls, to observe coalescing
        #[derive(Debug)]
        struct SlowProvider {
            calls: AtomicUsize,
        }

        #[async_trait::async_trait]
        impl TranslationProvider for SlowProvider {
            async fn translate(
                &self,
                _request: &TranslationRequest,
            ) -> Result<TranslationResult, DomainError> {
                self.calls.fetch_add(1, Ordering::SeqCst);
                tokio::time::sleep(std::time::Duration::from_millis(50)).await;
                Ok(TranslationResult::new("bonjour", "slow"))
            }

            fn provider_name(&self) -> &'static str {
                "slow"
            }
        }

        let provider = Arc::new(SlowProvider {
            calls: AtomicUsize::new(0),
        });
        let pipeline = Arc::new(TranslationPipeline::new(
            Arc::new(MockTranslationCache::new()),
            Arc::new(MockTranslationStore::new()),
            provider.clone(),
        ));

        let a = tokio::spawn({
            let pipeline = pipeline.clone();
            async move { pipeline.translate(&request("hello")).await }
        });
        let b = tokio::spawn({
            let pipeline = pipeline.clone();
            async move { pipeline.translate(&request("hello")).await }
        });

        let (a, b) = (a.await.unwrap().unwrap(), b.await.unwrap().unwrap());

        assert_eq!(a.result.translated_text, "bonjour");
        assert_eq!(b.result.translated_text, "bonjour");
        assert_eq!(provider.calls.load(Ordering::SeqCst), 1);

        let sources = [a.source, b.source];
        assert!(sources.contains(&OutcomeSource::Provider));
        assert!(sources.contains(&OutcomeSource::Coalesced));
    }

    #[tokio::test]
    async fn test_warm_cache_loads_recent_entries() {
        let store = MockTranslationStore::new()
            .with_entry(key("one"), TranslationResult::new("un", "mock"))
            .with_entry(key("two"), TranslationResult::new("deux", "mock"));
        let pipeline = pipeline(store, MockTranslationProvider::new("mock"));

        let warmed = pipeline.warm_cache(10).await.unwrap();
        assert_eq!(warmed, 2);

        let outcome = pipeline.translate(&request("one")).await.unwrap();
        assert_eq!(outcome.source, OutcomeSource::Cache);
    }
}
