use clap::Parser;
use contact_relay::adapters::server;
use contact_relay::utils::logger::{self, LogFormat};
use contact_relay::utils::validation::Validate;
use contact_relay::{ApiKey, CliConfig, ContactRelay, ResendProvider};
use std::sync::Arc;

#[tokio::main]
async fn main() -> anyhow::Result<()> {
    let cli = CliConfig::parse();

    // The settings file can turn on verbose logging, so it is read before the logger exists.
    let config = match cli.resolve() {
        Ok(config) => config,
        Err(e) => {
            eprintln!("❌ {}", e);
            std::process::exit(1);
        }
    };

    logger::init_logger(LogFormat::Compact, config.verbose);

    tracing::info!("Starting contact-relay");
    tracing::debug!("Relay settings: {:?}", config.settings);

    if let Err(e) = config.settings.validate() {
        tracing::error!("❌ Configuration validation failed: {} (Category: {:?})", e, e.category());
        eprintln!("❌ {}", e);
        std::process::exit(1);
    }

    let api_key = ApiKey::from_env();
    tracing::debug!("Provider credential: {:?}", api_key);

    let provider = ResendProvider::new(&config.settings, api_key)?;
    let relay = Arc::new(ContactRelay::new(provider, config.settings)?);

    let listener = tokio::net::TcpListener::bind(&config.bind).await?;
    tracing::info!("📮 Listening on http://{}", listener.local_addr()?);

    server::serve(listener, server::router(relay)).await?;

    tracing::info!("contact-relay stopped");
    Ok(())
}
