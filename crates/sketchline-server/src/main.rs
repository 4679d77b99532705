//! Sketchline shape store server.

use sketchline_server::{AppState, listen_addr, router};
use std::sync::Arc;
use tracing::info;

#[tokio::main]
async fn main() -> std::io::Result<()> {
    // Initialize tracing
    tracing_subscriber::fmt()
        .with_env_filter(
            tracing_subscriber::EnvFilter::try_from_default_env()
                .unwrap_or_else(|_| "sketchline_server=info,tower_http=info".into()),
        )
        .init();

    let state = Arc::new(AppState::new());
    let app = router(state);

    let addr = listen_addr();
    let listener = tokio::net::TcpListener::bind(addr).await?;
    info!("Sketchline shape store listening on {}", addr);

    axum::serve(listener, app).await
}
