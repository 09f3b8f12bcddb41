//! Store infrastructure - persistent store implementations

mod in_memory;
mod sqlite;

pub use in_memory::InMemoryTranslationStore;
pub use sqlite::{SqliteConfig, SqliteTranslationStore};
