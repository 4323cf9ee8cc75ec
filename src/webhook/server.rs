//! Axum server setup and webhook handling

use super::{parse_webhook, WebhookError};
use crate::pipeline::{EventPipeline, TransferEvent};
use crate::telemetry::{record_run, record_webhook, WebhookResult};
use axum::body::Bytes;
use axum::extract::State;
use axum::http::StatusCode;
use axum::response::{IntoResponse, Response};
use axum::routing::{get, post};
use axum::{Json, Router};
use serde::Serialize;
use serde_json::json;
use std::net::SocketAddr;
use std::sync::Arc;
use std::time::Duration;
use tokio::net::TcpListener;
use tokio::task::JoinHandle;

/// Path of the liveness endpoint, reserved alongside the webhook route
pub const HEALTH_PATH: &str = "/health";

/// Application state shared across all request handlers
#[derive(Clone)]
pub struct AppState {
    pub pipeline: Arc<EventPipeline>,
    /// End-to-end deadline for each spawned run
    pub run_deadline: Duration,
}

impl AppState {
    pub fn new(pipeline: Arc<EventPipeline>, run_deadline: Duration) -> Self {
        Self {
            pipeline,
            run_deadline,
        }
    }
}

/// Build the application router
pub fn build_router(state: AppState, webhook_path: &str) -> Router {
    Router::new()
        .route(HEALTH_PATH, get(health_check))
        .route(webhook_path, post(handle_webhook))
        .with_state(state)
}

/// Health check response
#[derive(Serialize)]
struct HealthResponse {
    status: &'static str,
    version: &'static str,
}

async fn health_check() -> impl IntoResponse {
    Json(HealthResponse {
        status: "healthy",
        version: env!("CARGO_PKG_VERSION"),
    })
}

/// Acknowledge once the payload is parsed; the run itself is detached
async fn handle_webhook(State(state): State<AppState>, body: Bytes) -> Response {
    match parse_webhook(&body) {
        Ok(Some(event)) => {
            record_webhook(WebhookResult::Dispatched);
            tracing::info!(
                token = %event.token_address,
                amount = %event.amount_transferred,
                "Webhook accepted"
            );
            dispatch(state.pipeline.clone(), event, state.run_deadline);
            (StatusCode::OK, Json(json!({ "status": "accepted" }))).into_response()
        }
        Ok(None) => {
            record_webhook(WebhookResult::NoTransfer);
            tracing::debug!("Webhook carried no token transfer");
            (StatusCode::OK, Json(json!({ "status": "ignored" }))).into_response()
        }
        Err(e) => malformed(e),
    }
}

fn malformed(error: WebhookError) -> Response {
    record_webhook(WebhookResult::Malformed);
    tracing::error!(error = %error, "Error processing webhook");
    (
        StatusCode::INTERNAL_SERVER_ERROR,
        Json(json!({ "error": error.to_string() })),
    )
        .into_response()
}

/// Spawn a pipeline run under a deadline, plus a supervisor that logs how it
/// ended
///
/// Returns the supervisor's handle, which completes once the run has been
/// accounted for. Nothing is reported back to the webhook caller.
pub fn dispatch(
    pipeline: Arc<EventPipeline>,
    event: TransferEvent,
    deadline: Duration,
) -> JoinHandle<()> {
    let token = event.token_address.clone();
    let run = tokio::spawn(async move {
        tokio::time::timeout(deadline, pipeline.process(event)).await
    });

    tokio::spawn(async move {
        match run.await {
            Ok(Ok(Ok(outcome))) => {
                tracing::info!(%token, outcome = outcome.label(), "Pipeline run finished");
            }
            Ok(Ok(Err(e))) => {
                tracing::error!(%token, error = %e, "Pipeline run failed");
            }
            Ok(Err(_)) => {
                record_run("deadline_exceeded", deadline);
                tracing::error!(
                    %token,
                    deadline_secs = deadline.as_secs(),
                    "Pipeline run exceeded its deadline"
                );
            }
            Err(e) if e.is_panic() => {
                record_run("panicked", Duration::ZERO);
                tracing::error!(%token, "Pipeline run panicked");
            }
            Err(e) => {
                tracing::error!(%token, error = %e, "Pipeline run cancelled");
            }
        }
    })
}

/// Run the server with graceful shutdown support
pub async fn run_server(router: Router, addr: SocketAddr) -> Result<(), std::io::Error> {
    let listener = TcpListener::bind(addr).await?;
    tracing::info!("Server listening on {}", addr);

    axum::serve(listener, router)
        .with_graceful_shutdown(shutdown_signal())
        .await
}

/// Completes when SIGINT or SIGTERM is received
pub async fn shutdown_signal() {
    let ctrl_c = async {
        if let Err(e) = tokio::signal::ctrl_c().await {
            tracing::error!(error = %e, "Failed to install SIGINT handler");
            std::future::pending::<()>().await;
        }
    };

    #[cfg(unix)]
    let terminate = async {
        use tokio::signal::unix::{signal, SignalKind};
        match signal(SignalKind::terminate()) {
            Ok(mut sigterm) => {
                sigterm.recv().await;
            }
            Err(e) => {
                tracing::error!(error = %e, "Failed to install SIGTERM handler");
                std::future::pending::<()>().await;
            }
        }
    };

    #[cfg(not(unix))]
    let terminate = std::future::pending::<()>();

    tokio::select! {
        _ = ctrl_c => {
            tracing::info!("Received SIGINT, initiating graceful shutdown");
        }
        _ = terminate => {
            tracing::info!("Received SIGTERM, initiating graceful shutdown");
        }
    }
}
