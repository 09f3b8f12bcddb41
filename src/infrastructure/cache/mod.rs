//! Cache infrastructure - Cache implementations

mod lru;

pub use lru::{LruCacheConfig, LruTranslationCache};
