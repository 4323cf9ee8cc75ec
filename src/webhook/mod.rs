//! Webhook intake
//!
//! HTTP endpoint for the transaction indexer. Parses the payload, spawns a
//! pipeline run, and acknowledges without waiting for it.

mod server;
mod types;

pub use server::{build_router, dispatch, run_server, shutdown_signal, AppState, HEALTH_PATH};
pub use types::{parse_webhook, WebhookError};
