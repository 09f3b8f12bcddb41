//! Provider infrastructure - translation backends and decorators

mod cascade;
mod deepl;
pub mod http_client;
mod libretranslate;
mod mymemory;
mod retrying;

pub use cascade::CascadeProvider;
pub use deepl::{DeepLConfig, DeepLProvider};
pub use http_client::{HttpClient, HttpClientTrait, HttpError};
pub use libretranslate::{LibreTranslateConfig, LibreTranslateProvider};
pub use mymemory::{MyMemoryConfig, MyMemoryProvider};
pub use retrying::RetryingProvider;
