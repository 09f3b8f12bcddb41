use thiserror::Error;

/// Core domain errors
///
/// `Clone` is required so a single failure can be fanned out to every
/// waiter coalesced onto the same in-flight translation.
#[derive(Debug, Clone, Error)]
pub enum DomainError {
    #[error("Unsupported language: {code}")]
    UnsupportedLanguage { code: String },

    #[error("Translation unavailable: {message}")]
    TranslationUnavailable { message: String },

    #[error("Persistence conflict for key '{key}': {message}")]
    PersistenceConflict { key: String, message: String },

    #[error("Storage error: {message}")]
    Storage { message: String },

    #[error("Validation error: {message}")]
    Validation { message: String },

    #[error("Configuration error: {message}")]
    Configuration { message: String },

    #[error("Internal error: {message}")]
    Internal { message: String },
}

impl DomainError {
    pub fn unsupported_language(code: impl Into<String>) -> Self {
        Self::UnsupportedLanguage { code: code.into() }
    }

    pub fn translation_unavailable(message: impl Into<String>) -> Self {
        Self::TranslationUnavailable {
            message: message.into(),
        }
    }

    pub fn persistence_conflict(key: impl Into<String>, message: impl Into<String>) -> Self {
        Self::PersistenceConflict {
            key: key.into(),
            message: message.into(),
        }
    }

    pub fn storage(message: impl Into<String>) -> Self {
        Self::Storage {
            message: message.into(),
        }
    }

    pub fn validation(message: impl Into<String>) -> Self {
        Self::Validation {
            message: message.into(),
        }
    }

    pub fn configuration(message: impl Into<String>) -> Self {
        Self::Configuration {
            message: message.into(),
        }
    }

    pub fn internal(message: impl Into<String>) -> Self {
        Self::Internal {
            message: message.into(),
        }
    }

    /// Whether a retry of the failed operation could reasonably succeed.
    ///
    /// Only transient provider failures (timeouts, rate limits, upstream
    /// outages) qualify. A bad language code stays bad no matter how often
    /// it is retried.
    pub fn is_transient(&self) -> bool {
        matches!(self, Self::TranslationUnavailable { .. })
    }
}
