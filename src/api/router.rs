//! Extraction API router.
//!
//! Returns a composable `Router` that can be mounted on any axum server.
//! Every route passes through the audit logger; the body limit applies to
//! uploads on `/v2/convert-text`.

use axum::extract::DefaultBodyLimit;
use axum::routing::{get, post};
use axum::Router;

use crate::api::endpoints;
use crate::api::middleware;
use crate::api::types::ApiContext;

/// Build the extraction API router.
pub fn extraction_router(ctx: ApiContext) -> Router {
    let body_limit = ctx.max_upload_bytes;

    Router::new()
        .route("/health", get(endpoints::health::check))
        .route("/convert-text", post(endpoints::convert::convert_stored))
        .route("/v2/convert-text", post(endpoints::convert::convert_upload))
        .with_state(ctx)
        .layer(DefaultBodyLimit::max(body_limit))
        .layer(axum::middleware::from_fn(middleware::audit::log_access))
}
