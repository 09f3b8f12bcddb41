use std::collections::HashMap;

use serde::Deserialize;

use crate::domain::translation::RetryPolicy;

/// Application configuration
#[derive(Debug, Clone, Deserialize, Default)]
#[serde(default)]
pub struct AppConfig {
    pub logging: LoggingConfig,
    pub cache: CacheConfig,
    pub store: StoreConfig,
    pub providers: ProvidersConfig,
    pub retry: RetryConfig,
    pub languages: LanguagesConfig,
    pub intake: IntakeConfig,
}

#[derive(Debug, Clone, Deserialize)]
#[serde(default)]
pub struct LoggingConfig {
    pub level: String,
    pub format: LogFormat,
}

#[derive(Debug, Clone, Deserialize, Default)]
#[serde(rename_all = "lowercase")]
pub enum LogFormat {
    #[default]
    Pretty,
    Json,
}

#[derive(Debug, Clone, Deserialize)]
#[serde(default)]
pub struct CacheConfig {
    /// Maximum number of cached translations
    pub capacity: usize,
    /// Whether to preload the cache from the store at startup
    pub warm_on_start: bool,
    /// How many recent translations to preload
    pub warm_limit: usize,
}

#[derive(Debug, Clone, Deserialize)]
#[serde(default)]
pub struct StoreConfig {
    /// When false, translations are kept in memory only
    pub enabled: bool,
    /// SQLite database path, or `:memory:`
    pub path: String,
    pub max_connections: u32,
}

#[derive(Debug, Clone, Deserialize)]
#[serde(default)]
pub struct ProvidersConfig {
    /// DeepL is skipped entirely when no key is configured
    pub deepl_api_key: Option<String>,
    pub deepl_base_url: String,
    pub libretranslate_url: String,
    pub libretranslate_api_key: Option<String>,
    pub mymemory_url: String,
    /// Per-attempt timeout for provider HTTP calls
    pub request_timeout_secs: u64,
}

#[derive(Debug, Clone, Deserialize)]
#[serde(default)]
pub struct RetryConfig {
    pub max_attempts: u32,
    pub initial_delay_ms: u64,
    pub max_delay_ms: u64,
    pub backoff_multiplier: f64,
    pub jitter: bool,
}

#[derive(Debug, Clone, Deserialize, Default)]
#[serde(default)]
pub struct LanguagesConfig {
    /// Languages users may request; empty means the built-in default set
    pub enabled: Vec<String>,
    /// Flag emoji overrides per language code
    pub flags: HashMap<String, String>,
    /// Display/offer order; unlisted languages sort last
    pub priority: Vec<String>,
}

#[derive(Debug, Clone, Deserialize)]
#[serde(default)]
pub struct IntakeConfig {
    /// Largest reply sent in one chunk
    pub max_reply_chars: usize,
}

impl Default for LoggingConfig {
    fn default() -> Self {
        Self {
            level: "info".to_string(),
            format: LogFormat::default(),
        }
    }
}

impl Default for CacheConfig {
    fn default() -> Self {
        Self {
            capacity: 1000,
            warm_on_start: true,
            warm_limit: 200,
        }
    }
}

impl Default for StoreConfig {
    fn default() -> Self {
        Self {
            enabled: true,
            path: "data/translations.db".to_string(),
            max_connections: 5,
        }
    }
}

impl Default for ProvidersConfig {
    fn default() -> Self {
        Self {
            deepl_api_key: None,
            deepl_base_url: "https://api-free.deepl.com".to_string(),
            libretranslate_url: "https://libretranslate.com/translate".to_string(),
            libretranslate_api_key: None,
            mymemory_url: "https://api.mymemory.translated.net/get".to_string(),
            request_timeout_secs: 10,
        }
    }
}

impl Default for RetryConfig {
    fn default() -> Self {
        let policy = RetryPolicy::default();

        Self {
            max_attempts: policy.max_attempts,
            initial_delay_ms: policy.initial_delay_ms,
            max_delay_ms: policy.max_delay_ms,
            backoff_multiplier: policy.backoff_multiplier,
            jitter: policy.jitter,
        }
    }
}

impl Default for IntakeConfig {
    fn default() -> Self {
        Self {
            max_reply_chars: 2000,
        }
    }
}

impl RetryConfig {
    pub fn to_policy(&self) -> RetryPolicy {
        RetryPolicy {
            max_attempts: self.max_attempts,
            initial_delay_ms: self.initial_delay_ms,
            max_delay_ms: self.max_delay_ms,
            backoff_multiplier: self.backoff_multiplier,
            jitter: self.jitter,
        }
    }
}

impl AppConfig {
    pub fn load() -> Result<Self, config::ConfigError> {
        let config = config::Config::builder()
            .add_source(config::File::with_name("config/default").required(false))
            .add_source(config::File::with_name("config/local").required(false))
            .add_source(
                config::Environment::with_prefix("RELAY")
                    .separator("__")
                    .try_parsing(true),
            )
            .build()?;

        config.try_deserialize()
    }
}
