use clap::Parser;
use tracing_subscriber::EnvFilter;

use lyric_relay::{Args, RelayConfig, RelayError};

#[tokio::main]
async fn main() -> Result<(), RelayError> {
    // .env must be loaded before clap reads the environment
    dotenv::dotenv().ok();

    let filter = EnvFilter::try_from_default_env().unwrap_or_else(|_| EnvFilter::new("info"));
    tracing_subscriber::fmt()
        .with_env_filter(filter)
        .with_target(false)
        .try_init()
        .map_err(|e| RelayError::Logging(e.to_string()))?;

    let config = RelayConfig::from_args(Args::parse()).inspect_err(|e| {
        tracing::error!(error = %e, "Invalid configuration");
    })?;

    lyric_relay::run(config).await.inspect_err(|e| {
        tracing::error!(error = %e, "Relay stopped with an error");
    })
}
