//! Translation relay
//!
//! A translation pipeline for chat messages: requests flow through an LRU
//! cache, a persistent store, and a cascade of external translation
//! providers, with concurrent requests for the same text coalesced into a
//! single provider call. Store outages degrade the service to cache-only
//! operation instead of taking it down.

pub mod cli;
pub mod config;
pub mod domain;
pub mod infrastructure;

use std::collections::HashMap;
use std::sync::Arc;
use std::time::Duration;

use tracing::{info, warn};

use crate::config::AppConfig;
use crate::domain::cache::TranslationCache;
use crate::domain::language::{LanguageCode, LanguageRegistry};
use crate::domain::store::TranslationStore;
use crate::domain::translation::TranslationProvider;
use crate::domain::DomainError;
use crate::infrastructure::cache::{LruCacheConfig, LruTranslationCache};
use crate::infrastructure::pipeline::TranslationPipeline;
use crate::infrastructure::provider::{
    CascadeProvider, DeepLConfig, DeepLProvider, HttpClient, LibreTranslateConfig,
    LibreTranslateProvider, MyMemoryConfig, MyMemoryProvider, RetryingProvider,
};
use crate::infrastructure::store::{
    InMemoryTranslationStore, SqliteConfig, SqliteTranslationStore,
};

/// Builds the translation pipeline from configuration and warms the cache
/// when asked to
pub async fn create_pipeline(config: &AppConfig) -> Result<Arc<TranslationPipeline>, DomainError> {
    let cache: Arc<dyn TranslationCache> = Arc::new(LruTranslationCache::with_config(
        LruCacheConfig::default().with_capacity(config.cache.capacity),
    )?);
    let store = create_store(config).await?;
    let provider = create_provider(config)?;

    let pipeline = Arc::new(TranslationPipeline::new(cache, store, provider));

    if config.cache.warm_on_start {
        if let Err(warm_error) = pipeline.warm_cache(config.cache.warm_limit).await {
            warn!(error = %warm_error, "Cache warming failed, starting cold");
        }
    }

    Ok(pipeline)
}

pub async fn create_store(config: &AppConfig) -> Result<Arc<dyn TranslationStore>, DomainError> {
    if !config.store.enabled {
        info!("Persistence disabled, translations are kept in memory only");
        return Ok(Arc::new(InMemoryTranslationStore::new()));
    }

    let store = SqliteTranslationStore::connect(
        &SqliteConfig::new(&config.store.path)
            .with_max_connections(config.store.max_connections),
    )
    .await?;

    Ok(Arc::new(store))
}

/// Assembles the provider stack: each configured backend, in cascade
/// order, wrapped in retry-with-backoff
pub fn create_provider(config: &AppConfig) -> Result<Arc<dyn TranslationProvider>, DomainError> {
    let http_client = Arc::new(HttpClient::with_timeout(Duration::from_secs(
        config.providers.request_timeout_secs,
    )));

    let mut providers: Vec<Arc<dyn TranslationProvider>> = Vec::new();

    if let Some(api_key) = &config.providers.deepl_api_key {
        providers.push(Arc::new(DeepLProvider::new(
            DeepLConfig::new(api_key).with_base_url(&config.providers.deepl_base_url),
            http_client.clone(),
        )));
    } else {
        info!("No DeepL API key configured, skipping DeepL");
    }

    let mut libre_config = LibreTranslateConfig::new(&config.providers.libretranslate_url);
    if let Some(api_key) = &config.providers.libretranslate_api_key {
        libre_config = libre_config.with_api_key(api_key);
    }
    providers.push(Arc::new(LibreTranslateProvider::new(
        libre_config,
        http_client.clone(),
    )));

    providers.push(Arc::new(MyMemoryProvider::new(
        MyMemoryConfig::new(&config.providers.mymemory_url),
        http_client,
    )));

    let cascade = CascadeProvider::new(providers)?;
    let retrying = RetryingProvider::new(Arc::new(cascade), config.retry.to_policy())
        .with_attempt_timeout(Duration::from_secs(config.providers.request_timeout_secs));

    Ok(Arc::new(retrying))
}

/// Builds the language registry from configuration, falling back to the
/// built-in defaults when the enabled list is empty
pub fn create_language_registry(config: &AppConfig) -> Result<LanguageRegistry, DomainError> {
    if config.languages.enabled.is_empty() {
        return Ok(LanguageRegistry::default());
    }

    let enabled = parse_codes(&config.languages.enabled)?;
    let priority = parse_codes(&config.languages.priority)?;

    let mut flags = HashMap::new();
    for (code, flag) in &config.languages.flags {
        flags.insert(LanguageCode::parse(code)?, flag.clone());
    }

    Ok(LanguageRegistry::new(enabled, flags, priority))
}

fn parse_codes(codes: &[String]) -> Result<Vec<LanguageCode>, DomainError> {
    codes.iter().map(LanguageCode::parse).collect()
}
