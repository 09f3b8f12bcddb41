//! Translation cache trait definition

use std::fmt::Debug;

use async_trait::async_trait;

use crate::domain::translation::{TranslationKey, TranslationResult};

/// Bounded in-memory cache of completed translations.
///
/// Absence is a normal outcome, not an error, so the API is infallible.
/// Implementations must evict the least-recently-used entry when a new
/// insert would exceed capacity.
#[async_trait]
pub trait TranslationCache: Send + Sync + Debug {
    /// Looks up a translation, marking the entry as recently used on a hit
    async fn lookup(&self, key: &TranslationKey) -> Option<TranslationResult>;

    /// Inserts a translation, evicting the least-recently-used entry if full
    async fn insert(&self, key: TranslationKey, result: TranslationResult);

    /// Current number of cached entries
    async fn len(&self) -> usize;

    /// Drops every cached entry
    async fn clear(&self);
}
