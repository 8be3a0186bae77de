//! ValueMaster HTTP server.
//!
//! # Environment Variables
//!
//! - `VALUEMASTER_BIND_ADDR`: listen address (default: 0.0.0.0:3000)
//! - `VALUEMASTER_MODE`: `live` or `offline` (default: live)
//! - `VALUEMASTER_FRED_API_KEY` / `FRED_API_KEY`: FRED credential
//! - `RUST_LOG`: log filter (default: valuemaster=info,tower_http=info)

use tokio::net::TcpListener;
use tower_http::cors::CorsLayer;
use tower_http::trace::TraceLayer;
use tracing_subscriber::EnvFilter;
use valuemaster_web::{create_router, AppState, WebConfig};

const DEFAULT_LOG_FILTER: &str = "valuemaster=info,tower_http=info";

#[tokio::main]
async fn main() -> Result<(), Box<dyn std::error::Error>> {
    dotenvy::dotenv().ok();
    init_tracing();

    let config = WebConfig::from_env()?;
    let acquirers = config.acquirers.build();
    tracing::info!(mode = %acquirers.mode(), "acquirers configured");

    let app = create_router(AppState::new(acquirers))
        .layer(TraceLayer::new_for_http())
        .layer(CorsLayer::permissive());

    let listener = TcpListener::bind(config.bind_addr).await?;
    tracing::info!(addr = %config.bind_addr, "listening");

    axum::serve(listener, app)
        .with_graceful_shutdown(shutdown_signal())
        .await?;

    tracing::info!("server stopped");
    Ok(())
}

fn init_tracing() {
    tracing_subscriber::fmt()
        .with_env_filter(
            EnvFilter::try_from_default_env()
                .unwrap_or_else(|_| EnvFilter::new(DEFAULT_LOG_FILTER)),
        )
        .init();
}

async fn shutdown_signal() {
    if let Err(error) = tokio::signal::ctrl_c().await {
        tracing::error!(error = %error, "failed to listen for shutdown signal");
    }
}
