//! HTTP server run loop.

use crate::config::ServerConfig;
use crate::handlers::router;
use ffta_core::TableStore;
use std::sync::Arc;
use tokio::net::TcpListener;
use tracing::{info, warn};

/// Serves the API until Ctrl-C is received.
pub async fn run(config: ServerConfig) -> std::io::Result<()> {
    let store = Arc::new(TableStore::new(config.store_config()));
    let listener = TcpListener::bind(config.bind_addr).await?;

    info!(
        addr = %listener.local_addr()?,
        data_dir = %config.data_dir.display(),
        "serving game data"
    );

    axum::serve(listener, router(store))
        .with_graceful_shutdown(shutdown_signal())
        .await
}

async fn shutdown_signal() {
    match tokio::signal::ctrl_c().await {
        Ok(()) => info!("shutdown requested"),
        Err(e) => {
            // Without a signal handler the server can only be killed.
            warn!(error = %e, "failed to listen for ctrl-c");
            std::future::pending::<()>().await;
        }
    }
}
