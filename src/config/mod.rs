//! Configuration module

mod app_config;

pub use app_config::{
    AppConfig, CacheConfig, IntakeConfig, LanguagesConfig, LogFormat, LoggingConfig,
    ProvidersConfig, RetryConfig, StoreConfig,
};
