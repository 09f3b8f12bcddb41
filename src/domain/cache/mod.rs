//! Cache domain - translation cache trait

mod repository;

pub use repository::TranslationCache;

#[cfg(test)]
pub use repository::mock::MockTranslationCache;
