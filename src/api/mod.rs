//! HTTP surface for transcript extraction.
//!
//! The router is composable: `extraction_router()` returns a `Router` that
//! can be mounted on any axum server instance.

pub mod endpoints;
pub mod error;
pub mod middleware;
pub mod router;
pub mod server;
pub mod types;

pub use router::extraction_router;
pub use server::{serve_until_ctrl_c, start_server_on, ExtractionServer};
pub use types::ApiContext;
