//! Extraction API server lifecycle.
//!
//! bind → spawn background task → return handle with shutdown channel.
//! The binary uses [`serve_until_ctrl_c`]; tests use [`start_server_on`]
//! with an ephemeral port.

use std::net::SocketAddr;

use tokio::sync::oneshot;

use crate::api::router::extraction_router;
use crate::api::types::ApiContext;

/// Handle to a running server.
pub struct ExtractionServer {
    /// Address actually bound; differs from the requested one for port 0.
    pub local_addr: SocketAddr,
    shutdown_tx: Option<oneshot::Sender<()>>,
    task: Option<tokio::task::JoinHandle<()>>,
}

impl ExtractionServer {
    /// Signal graceful shutdown. Safe to call more than once.
    pub fn shutdown(&mut self) {
        if let Some(tx) = self.shutdown_tx.take() {
            let _ = tx.send(());
            tracing::info!("Extraction server shutdown signal sent");
        }
    }

    /// Wait for the server task to finish.
    pub async fn stopped(&mut self) {
        if let Some(task) = self.task.take() {
            if let Err(e) = task.await {
                tracing::error!("Extraction server task failed: {e}");
            }
        }
    }
}

/// Bind `addr` and serve the extraction router in a background task.
pub async fn start_server_on(
    ctx: ApiContext,
    addr: SocketAddr,
) -> Result<ExtractionServer, std::io::Error> {
    let listener = tokio::net::TcpListener::bind(addr).await?;
    let addr = listener.local_addr()?;

    let app = extraction_router(ctx);

    let (shutdown_tx, shutdown_rx) = oneshot::channel::<()>();

    let task = tokio::spawn(async move {
        let shutdown_signal = async move {
            let _ = shutdown_rx.await;
            tracing::info!("Extraction server received shutdown signal");
        };

        tracing::info!(%addr, "Extraction server started");

        if let Err(e) = axum::serve(listener, app)
            .with_graceful_shutdown(shutdown_signal)
            .await
        {
            tracing::error!("Extraction server error: {e}");
        }

        tracing::info!("Extraction server stopped");
    });

    Ok(ExtractionServer {
        local_addr: addr,
        shutdown_tx: Some(shutdown_tx),
        task: Some(task),
    })
}

/// Serve until Ctrl-C, then drain in-flight requests.
pub async fn serve_until_ctrl_c(ctx: ApiContext, addr: SocketAddr) -> Result<(), std::io::Error> {
    let mut server = start_server_on(ctx, addr).await?;

    tokio::signal::ctrl_c().await?;
    tracing::info!("Ctrl-C received, shutting down");

    server.shutdown();
    server.stopped().await;
    Ok(())
}
