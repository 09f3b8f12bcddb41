//! In-memory LRU cache implementation

use std::num::NonZeroUsize;

use async_trait::async_trait;
use lru::LruCache;
use tokio::sync::Mutex;

use crate::domain::cache::TranslationCache;
use crate::domain::translation::{TranslationKey, TranslationResult};
use crate::domain::DomainError;

const DEFAULT_CAPACITY: usize = 1000;

/// Configuration for the in-memory LRU cache
#[derive(Debug, Clone)]
pub struct LruCacheConfig {
    /// Maximum number of entries
    pub capacity: usize,
}

impl Default for LruCacheConfig {
    fn default() -> Self {
        Self {
            capacity: DEFAULT_CAPACITY,
        }
    }
}

impl LruCacheConfig {
    pub fn with_capacity(mut self, capacity: usize) -> Self {
        self.capacity = capacity;
        self
    }
}

/// Bounded translation cache with strict least-recently-used eviction.
///
/// A lookup counts as a use, so hot entries survive capacity pressure.
#[derive(Debug)]
pub struct LruTranslationCache {
    entries: Mutex<LruCache<TranslationKey, TranslationResult>>,
}

impl LruTranslationCache {
    pub fn new() -> Self {
        const CAPACITY: NonZeroUsize = match NonZeroUsize::new(DEFAULT_CAPACITY) {
            Some(capacity) => capacity,
            None => unreachable!(),
        };

        Self {
            entries: Mutex::new(LruCache::new(CAPACITY)),
        }
    }

    /// A zero capacity is a misconfiguration, not a request to disable
    /// caching, and is rejected
    pub fn with_config(config: LruCacheConfig) -> Result<Self, DomainError> {
        let capacity = NonZeroUsize::new(config.capacity)
            .ok_or_else(|| DomainError::configuration("cache capacity must be at least 1"))?;

        Ok(Self {
            entries: Mutex::new(LruCache::new(capacity)),
        })
    }
}

impl Default for LruTranslationCache {
    fn default() -> Self {
        Self::new()
    }
}

#[async_trait]
impl TranslationCache for LruTranslationCache {
    async fn lookup(&self, key: &TranslationKey) -> Option<TranslationResult> {
        self.entries.lock().await.get(key).cloned()
    }

    async fn insert(&self, key: TranslationKey, result: TranslationResult) {
        self.entries.lock().await.put(key, result);
    }

    async fn len(&self) -> usize {
        self.entries.lock().await.len()
    }

    async fn clear(&self) {
        self.entries.lock().await.clear();
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::domain::language::LanguageCode;
    use crate::domain::translation::TranslationRequest;

    fn key(text: &str) -> TranslationKey {
        let request = TranslationRequest::builder()
            .source_text(text)
            .target_lang(LanguageCode::parse("fr").unwrap())
            .build()
            .unwrap();

        TranslationKey::from_request(&request)
    }

    fn result(text: &str) -> TranslationResult {
        TranslationResult::new(text, "test")
    }

    #[tokio::test]
    async fn test_insert_then_lookup() {
        let cache = LruTranslationCache::new();

        cache.insert(key("hello"), result("bonjour")).await;

        let found = cache.lookup(&key("hello")).await.unwrap();
        assert_eq!(found.translated_text, "bonjour");
    }

    #[tokio::test]
    async fn test_lookup_missing() {
        let cache = LruTranslationCache::new();
        assert!(cache.lookup(&key("hello")).await.is_none());
    }

    #[tokio::test]
    async fn test_capacity_is_never_exceeded() {
        let cache = LruTranslationCache::with_config(LruCacheConfig::default().with_capacity(2))
            .unwrap();

        cache.insert(key("one"), result("un")).await;
        cache.insert(key("two"), result("deux")).await;
        cache.insert(key("three"), result("trois")).await;

        assert_eq!(cache.len().await, 2);
    }

    #[test]
    fn test_zero_capacity_is_rejected() {
        let error = LruTranslationCache::with_config(LruCacheConfig::default().with_capacity(0))
            .unwrap_err();

        assert!(matches!(error, DomainError::Configuration { .. }));
    }

    #[tokio::test]
    async fn test_eviction_removes_least_recently_used() {
        let cache = LruTranslationCache::with_config(LruCacheConfig::default().with_capacity(2))
            .unwrap();

        cache.insert(key("one"), result("un")).await;
        cache.insert(key("two"), result("deux")).await;

        // Touch "one" so "two" becomes the eviction candidate
        assert!(cache.lookup(&key("one")).await.is_some());

        cache.insert(key("three"), result("trois")).await;

        assert!(cache.lookup(&key("one")).await.is_some());
        assert!(cache.lookup(&key("two")).await.is_none());
        assert!(cache.lookup(&key("three")).await.is_some());
    }

    #[tokio::test]
    async fn test_reinsert_updates_value() {
        let cache = LruTranslationCache::new();

        cache.insert(key("hello"), result("bonjour")).await;
        cache.insert(key("hello"), result("salut")).await;

        assert_eq!(cache.len().await, 1);
        assert_eq!(
            cache.lookup(&key("hello")).await.unwrap().translated_text,
            "salut"
        );
    }

    #[tokio::test]
    async fn test_clear() {
        let cache = LruTranslationCache::new();

        cache.insert(key("hello"), result("bonjour")).await;
        cache.clear().await;

        assert_eq!(cache.len().await, 0);
    }
}
