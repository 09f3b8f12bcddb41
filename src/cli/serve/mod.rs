//! Serve command - runs the relay against the console transport

use std::sync::Arc;

use tracing::info;

use crate::config::AppConfig;
use crate::infrastructure::chat::ConsoleTransport;
use crate::infrastructure::intake::IntakeService;
use crate::infrastructure::logging;

/// Run the relay until stdin closes
pub async fn run() -> anyhow::Result<()> {
    dotenvy::dotenv().ok();

    let config = AppConfig::load().unwrap_or_default();
    logging::init_logging(&config.logging);

    let pipeline = crate::create_pipeline(&config).await?;
    let registry = Arc::new(crate::create_language_registry(&config)?);
    let transport = Arc::new(ConsoleTransport::new(
        config.intake.max_reply_chars,
        registry.clone(),
    ));

    info!(
        languages = registry.offered().len(),
        "Relay ready, reading from stdin"
    );

    IntakeService::new(pipeline, transport, registry).run().await;

    info!("Relay shut down");
    Ok(())
}
