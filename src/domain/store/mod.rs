//! Store domain - persistent translation store trait

mod repository;

pub use repository::{PersistedTranslation, TranslationStore, UsageSummary};

#[cfg(test)]
pub use repository::mock::MockTranslationStore;
