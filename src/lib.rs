pub mod api;
pub mod config;
pub mod pipeline;

use std::net::{SocketAddr, ToSocketAddrs};
use std::sync::Arc;

use anyhow::Context;
use tracing_subscriber::EnvFilter;

use crate::api::ApiContext;
use crate::config::{AppConfig, ModelConfig};
use crate::pipeline::structuring::{ExtractionError, GeminiClient, TranscriptExtractor};

/// Install the global tracing subscriber. `RUST_LOG` wins over the default filter.
pub fn init_tracing() {
    let _ = tracing_subscriber::fmt()
        .with_env_filter(
            EnvFilter::try_from_default_env()
                .unwrap_or_else(|_| EnvFilter::new(config::default_log_filter())),
        )
        .try_init();
}

/// Wire the configured model provider into an extractor.
pub fn build_extractor(model: &ModelConfig) -> Result<TranscriptExtractor, ExtractionError> {
    let client = GeminiClient::new(model)?;
    Ok(TranscriptExtractor::new(Box::new(client), &model.model))
}

/// Run the HTTP service until Ctrl-C.
///
/// The model client blocks on its own worker thread, so it is built before
/// the async runtime starts.
pub fn run(config: AppConfig) -> anyhow::Result<()> {
    tracing::info!("{} starting v{}", config::APP_NAME, config::APP_VERSION);
    tracing::debug!(?config, "Effective configuration");

    let extractor = Arc::new(build_extractor(&config.model).context("building model client")?);
    let ctx = ApiContext::new(extractor, &config.server);
    let addr = resolve_bind_addr(&config.bind_addr())?;

    let runtime = tokio::runtime::Builder::new_multi_thread()
        .enable_all()
        .build()
        .context("starting async runtime")?;

    runtime
        .block_on(api::serve_until_ctrl_c(ctx, addr))
        .with_context(|| format!("serving on {addr}"))?;

    tracing::info!("{} stopped", config::APP_NAME);
    Ok(())
}

fn resolve_bind_addr(bind: &str) -> anyhow::Result<SocketAddr> {
    bind.to_socket_addrs()
        .with_context(|| format!("invalid bind address {bind}"))?
        .next()
        .with_context(|| format!("bind address {bind} resolved to nothing"))
}
