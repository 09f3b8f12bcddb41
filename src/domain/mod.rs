//! Domain layer - Core entities, traits and errors

pub mod cache;
pub mod chat;
pub mod error;
pub mod language;
pub mod store;
pub mod translation;

pub use cache::TranslationCache;
pub use chat::{ChatContext, ChatTransport, InboundMessage};
pub use error::DomainError;
pub use language::{LanguageCode, LanguageRegistry, MAX_OFFERED_LANGUAGES};
pub use store::{PersistedTranslation, TranslationStore, UsageSummary};
pub use translation::{
    RetryPolicy, TranslationKey, TranslationProvider, TranslationRequest, TranslationResult,
    AUTO_SOURCE,
};
