//! In-memory translation store
//!
//! Used when persistence is disabled in configuration. Provides the same
//! idempotency and conflict semantics as the SQLite store, without
//! durability.

use std::collections::HashMap;

use async_trait::async_trait;
use tokio::sync::RwLock;

use crate::domain::store::{PersistedTranslation, TranslationStore, UsageSummary};
use crate::domain::translation::{TranslationKey, TranslationResult};
use crate::domain::DomainError;

#[derive(Debug, Default)]
pub struct InMemoryTranslationStore {
    entries: RwLock<Vec<(TranslationKey, PersistedTranslation)>>,
    usage: RwLock<Vec<(String, u64)>>,
}

impl InMemoryTranslationStore {
    pub fn new() -> Self {
        Self::default()
    }
}

#[async_trait]
impl TranslationStore for InMemoryTranslationStore {
    async fn store(
        &self,
        key: &TranslationKey,
        result: &TranslationResult,
    ) -> Result<(), DomainError> {
        let mut entries = self.entries.write().await;

        if let Some((_, existing)) = entries.iter().find(|(k, _)| k == key) {
            if existing.result.agrees_with(result) {
                return Ok(());
            }

            return Err(DomainError::persistence_conflict(
                key.to_string(),
                "stored result differs",
            ));
        }

        entries.push((key.clone(), PersistedTranslation::new(result.clone())));
        Ok(())
    }

    async fn load(
        &self,
        key: &TranslationKey,
    ) -> Result<Option<TranslationResult>, DomainError> {
        let entries = self.entries.read().await;

        Ok(entries
            .iter()
            .find(|(k, _)| k == key)
            .map(|(_, persisted)| persisted.result.clone()))
    }

    async fn load_recent(
        &self,
        limit: usize,
    ) -> Result<Vec<(TranslationKey, TranslationResult)>, DomainError> {
        let entries = self.entries.read().await;

        Ok(entries
            .iter()
            .rev()
            .take(limit)
            .map(|(key, persisted)| (key.clone(), persisted.result.clone()))
            .collect())
    }

    async fn record_usage(&self, provider: &str, characters: u64) -> Result<(), DomainError> {
        self.usage
            .write()
            .await
            .push((provider.to_string(), characters));
        Ok(())
    }

    async fn usage_summary(&self) -> Result<Vec<UsageSummary>, DomainError> {
        let usage = self.usage.read().await;
        let mut totals: HashMap<String, (u64, u64)> = HashMap::new();

        for (provider, characters) in usage.iter() {
            let entry = totals.entry(provider.clone()).or_default();
            entry.0 += 1;
            entry.1 += characters;
        }

        let mut summaries: Vec<UsageSummary> = totals
            .into_iter()
            .map(|(provider, (calls, characters))| UsageSummary {
                provider,
                calls,
                characters,
            })
            .collect();

        summaries.sort_by(|a, b| b.characters.cmp(&a.characters));
        Ok(summaries)
    }

    async fn count(&self) -> Result<usize, DomainError> {
        Ok(self.entries.read().await.len())
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::domain::language::LanguageCode;

    fn key(text: &str) -> TranslationKey {
        TranslationKey::new(text, None, LanguageCode::parse("fr").unwrap())
    }

    #[tokio::test]
    async fn test_round_trip_and_idempotency() {
        let store = InMemoryTranslationStore::new();
        let key = key("hello");
        let result = TranslationResult::new("bonjour", "deepl");

        store.store(&key, &result).await.unwrap();
        store.store(&key, &result).await.unwrap();

        assert_eq!(store.count().await.unwrap(), 1);
        assert_eq!(
            store.load(&key).await.unwrap().unwrap().translated_text,
            "bonjour"
        );
    }

    #[tokio::test]
    async fn test_conflict_keeps_first_write() {
        let store = InMemoryTranslationStore::new();
        let key = key("hello");

        store
            .store(&key, &TranslationResult::new("bonjour", "deepl"))
            .await
            .unwrap();

        let conflict = store
            .store(&key, &TranslationResult::new("salut", "deepl"))
            .await;

        assert!(matches!(
            conflict,
            Err(DomainError::PersistenceConflict { .. })
        ));
        assert_eq!(
            store.load(&key).await.unwrap().unwrap().translated_text,
            "bonjour"
        );
    }

    #[tokio::test]
    async fn test_load_recent_is_newest_first() {
        let store = InMemoryTranslationStore::new();

        store
            .store(&key("one"), &TranslationResult::new("un", "deepl"))
            .await
            .unwrap();
        store
            .store(&key("two"), &TranslationResult::new("deux", "deepl"))
            .await
            .unwrap();

        let recent = store.load_recent(1).await.unwrap();
        assert_eq!(recent.len(), 1);
        assert_eq!(recent[0].1.translated_text, "deux");
    }
}
