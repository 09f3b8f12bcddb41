//! Stats command - prints store counts and per-provider usage

use crate::config::AppConfig;
use crate::domain::store::TranslationStore;
use crate::infrastructure::logging;

pub async fn run() -> anyhow::Result<()> {
    dotenvy::dotenv().ok();

    let config = AppConfig::load().unwrap_or_default();
    logging::init_logging(&config.logging);

    let store = crate::create_store(&config).await?;

    let count = store.count().await?;
    println!("Stored translations: {}", count);

    let summaries = store.usage_summary().await?;

    if summaries.is_empty() {
        println!("No provider usage recorded.");
        return Ok(());
    }

    println!("Provider usage:");
    for summary in summaries {
        println!(
            "  {:<16} {:>8} calls  {:>12} characters",
            summary.provider, summary.calls, summary.characters
        );
    }

    Ok(())
}
