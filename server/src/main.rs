mod config;
mod error;
mod routes;
mod services;
mod state;

use error::RelayError;

#[tokio::main]
async fn main() -> Result<(), RelayError> {
    dotenvy::dotenv().ok();
    tracing_subscriber::fmt::init();

    let config = config::RelayConfig::from_env()?;
    let port = config.port;
    tracing::info!(upstream = %config.upstream_url, media_dir = %config.media_dir.display(), "relay configured");

    let keys = services::crypto::RelayKeys::generate(services::crypto::RELAY_KEY_BITS)?;
    tracing::info!(bits = services::crypto::RELAY_KEY_BITS, "relay key pair generated");

    let state = state::AppState::new(config, std::sync::Arc::new(keys));
    let app = routes::app(state);
    let listener = tokio::net::TcpListener::bind(format!("0.0.0.0:{port}")).await?;

    tracing::info!(%port, "roomchat relay listening");
    axum::serve(listener, app).await?;
    Ok(())
}
