//! Persistent translation store trait definition

use std::fmt::Debug;

use async_trait::async_trait;
use chrono::{DateTime, Utc};
use serde::{Deserialize, Serialize};

use crate::domain::translation::{TranslationKey, TranslationResult};
use crate::domain::DomainError;

/// A translation as persisted, mirroring a cache entry plus its insertion time
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct PersistedTranslation {
    pub result: TranslationResult,
    pub stored_at: DateTime<Utc>,
}

impl PersistedTranslation {
    pub fn new(result: TranslationResult) -> Self {
        Self {
            result,
            stored_at: Utc::now(),
        }
    }
}

/// Per-provider usage totals, for quota tracking
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct UsageSummary {
    pub provider: String,
    pub calls: u64,
    pub characters: u64,
}

/// Durable record of translations, insert-only under normal operation.
///
/// `store` is idempotent: re-storing a key with an agreeing result is a
/// no-op. A key re-stored with a *different* translated text is a
/// `PersistenceConflict` and the existing row is kept (first write wins).
/// Backend unavailability surfaces as `Storage` errors that callers are
/// expected to degrade around, never to crash on.
#[async_trait]
pub trait TranslationStore: Send + Sync + Debug {
    /// Durably records a translation for the key
    async fn store(
        &self,
        key: &TranslationKey,
        result: &TranslationResult,
    ) -> Result<(), DomainError>;

    /// Loads the translation persisted for the key, if any
    async fn load(&self, key: &TranslationKey)
        -> Result<Option<TranslationResult>, DomainError>;

    /// Most recently stored translations, newest first; used for cache warming
    async fn load_recent(
        &self,
        limit: usize,
    ) -> Result<Vec<(TranslationKey, TranslationResult)>, DomainError>;

    /// Records characters sent to a provider, for quota tracking
    async fn record_usage(&self, provider: &str, characters: u64) -> Result<(), DomainError>;

    /// Aggregated per-provider usage, largest consumer first
    async fn usage_summary(&self) -> Result<Vec<UsageSummary>, DomainError>;

    /// Number of persisted translations
    async fn count(&self) -> Result<usize, DomainError>;
}
