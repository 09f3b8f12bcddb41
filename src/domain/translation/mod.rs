//! Translation domain - requests, results, keys, provider trait

mod key;
mod provider;
mod request;
mod result;
mod retry;

pub use key::{TranslationKey, AUTO_SOURCE};
pub use provider::TranslationProvider;
pub use request::{TranslationRequest, TranslationRequestBuilder};
pub use result::TranslationResult;
pub use retry::RetryPolicy;

#[cfg(test)]
pub use provider::mock::MockTranslationProvider;
