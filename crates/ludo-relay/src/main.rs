use ludo_relay::prelude::*;
use tracing_subscriber::EnvFilter;

#[tokio::main]
async fn main() -> Result<(), RelayError> {
    tracing_subscriber::fmt()
        .with_env_filter(
            EnvFilter::try_from_default_env()
                .unwrap_or_else(|_| EnvFilter::new("info")),
        )
        .init();

    let config = ServerConfig::from_env()?;
    tracing::info!(
        ws = %config.ws_addr(),
        status = %config.status_addr(),
        "starting ludo relay; probe /health on STATUS_PORT, not PORT"
    );

    let server = RelayServer::builder().config(&config).build().await?;
    server.run().await
}
