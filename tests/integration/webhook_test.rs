//! Webhook router tests

use async_trait::async_trait;
use axum::body::Body;
use axum::http::{Request, StatusCode};
use axum::Router;
use kol_agent::config::Config;
use kol_agent::generation::{GenerationError, GenerationRequest, TextService};
use kol_agent::pipeline::{EventPipeline, TransferEvent};
use kol_agent::post::DryRunFeed;
use kol_agent::price::{PriceLookup, TokenIdentity};
use kol_agent::webhook::{build_router, dispatch, AppState};
use metrics_exporter_prometheus::PrometheusBuilder;
use rust_decimal::Decimal;
use serde_json::Value;
use std::sync::atomic::{AtomicBool, AtomicU32, Ordering};
use std::sync::Arc;
use std::time::Duration;
use tower::ServiceExt;

/// Price lookup that takes its time and records what it saw
struct SlowLookup {
    delay: Duration,
    calls: AtomicU32,
    finished: AtomicBool,
    last_address: std::sync::Mutex<Option<String>>,
}

impl SlowLookup {
    fn new(delay: Duration) -> Arc<Self> {
        Arc::new(Self {
            delay,
            calls: AtomicU32::new(0),
            finished: AtomicBool::new(false),
            last_address: std::sync::Mutex::new(None),
        })
    }
}

#[async_trait]
impl PriceLookup for SlowLookup {
    async fn lookup(&self, address: &str, _amount: Option<Decimal>) -> TokenIdentity {
        self.calls.fetch_add(1, Ordering::SeqCst);
        *self.last_address.lock().unwrap() = Some(address.to_string());
        tokio::time::sleep(self.delay).await;
        self.finished.store(true, Ordering::SeqCst);
        TokenIdentity::unknown(address)
    }
}

struct UnusedService;

#[async_trait]
impl TextService for UnusedService {
    async fn complete(&self, _request: &GenerationRequest) -> Result<String, GenerationError> {
        Err(GenerationError::EmptyResponse)
    }
}

fn pipeline(lookup: Arc<SlowLookup>) -> Arc<EventPipeline> {
    Arc::new(
        EventPipeline::new(
            &Config::default(),
            lookup,
            Arc::new(UnusedService),
            Arc::new(DryRunFeed::new()),
        )
        .unwrap(),
    )
}

fn app(lookup: Arc<SlowLookup>) -> Router {
    let state = AppState::new(pipeline(lookup), Duration::from_secs(30));
    build_router(state, "/webhook")
}

fn webhook(body: &str) -> Request<Body> {
    Request::builder()
        .method("POST")
        .uri("/webhook")
        .header("content-type", "application/json")
        .body(Body::from(body.to_string()))
        .unwrap()
}

async fn json_body(response: axum::response::Response) -> Value {
    let bytes = axum::body::to_bytes(response.into_body(), usize::MAX)
        .await
        .unwrap();
    serde_json::from_slice(&bytes).unwrap()
}

#[tokio::test]
async fn test_health() {
    let response = app(SlowLookup::new(Duration::ZERO))
        .oneshot(Request::builder().uri("/health").body(Body::empty()).unwrap())
        .await
        .unwrap();

    assert_eq!(response.status(), StatusCode::OK);
    let body = json_body(response).await;
    assert_eq!(body["status"], "healthy");
    assert_eq!(body["version"], env!("CARGO_PKG_VERSION"));
}

#[tokio::test]
async fn test_acknowledges_before_slow_pipeline_finishes() {
    let lookup = SlowLookup::new(Duration::from_secs(10));
    let response = tokio::time::timeout(
        Duration::from_secs(2),
        app(lookup.clone()).oneshot(webhook(
            r#"[{"tokenTransfers": [{"mint": "ABC123", "tokenAmount": 1000}]}]"#,
        )),
    )
    .await
    .expect("handler waited for the pipeline")
    .unwrap();

    assert_eq!(response.status(), StatusCode::OK);
    assert_eq!(json_body(response).await["status"], "accepted");
    assert!(!lookup.finished.load(Ordering::SeqCst));
}

#[tokio::test]
async fn test_dispatches_last_transfer() {
    let lookup = SlowLookup::new(Duration::ZERO);
    let response = app(lookup.clone())
        .oneshot(webhook(
            r#"[{"tokenTransfers": [
                {"mint": "FIRST", "tokenAmount": "1"},
                {"mint": "SECOND", "tokenAmount": "2"},
                {"mint": "THIRD", "tokenAmount": "3"}
            ]}]"#,
        ))
        .await
        .unwrap();
    assert_eq!(response.status(), StatusCode::OK);

    for _ in 0..50 {
        if lookup.finished.load(Ordering::SeqCst) {
            break;
        }
        tokio::time::sleep(Duration::from_millis(10)).await;
    }
    assert_eq!(lookup.calls.load(Ordering::SeqCst), 1);
    assert_eq!(lookup.last_address.lock().unwrap().as_deref(), Some("THIRD"));
}

#[tokio::test]
async fn test_no_transfer_is_acknowledged_without_run() {
    let lookup = SlowLookup::new(Duration::ZERO);
    let bodies = [
        "[]",
        r#"[{"tokenTransfers": []}]"#,
        r#"[{"tokenTransfers": [{"mint": ""}]}]"#,
    ];
    for body in bodies {
        let response = app(lookup.clone()).oneshot(webhook(body)).await.unwrap();
        assert_eq!(response.status(), StatusCode::OK);
        assert_eq!(json_body(response).await["status"], "ignored");
    }

    tokio::time::sleep(Duration::from_millis(20)).await;
    assert_eq!(lookup.calls.load(Ordering::SeqCst), 0);
}

#[tokio::test]
async fn test_no_transfer_counts_webhook_but_not_run() {
    let recorder = PrometheusBuilder::new().build_recorder();
    let handle = recorder.handle();
    let _guard = metrics::set_default_local_recorder(&recorder);

    let lookup = SlowLookup::new(Duration::ZERO);
    let response = app(lookup).oneshot(webhook("[]")).await.unwrap();
    assert_eq!(response.status(), StatusCode::OK);

    let rendered = handle.render();
    assert!(rendered.contains(r#"kolagent_webhooks_total{result="no_transfer"} 1"#));
    assert!(!rendered.contains("kolagent_pipeline_runs_total"));
    assert!(!rendered.contains("kolagent_pipeline_duration_seconds"));
}

#[tokio::test]
async fn test_malformed_payload_is_500() {
    let lookup = SlowLookup::new(Duration::ZERO);
    for body in [
        "not json",
        r#"{"tokenTransfers": []}"#,
        r#"[{"tokenTransfers": [{"mint": 7}]}]"#,
        r#"[{"tokenTransfers": [{"mint": "A", "tokenAmount": "many"}]}]"#,
    ] {
        let response = app(lookup.clone()).oneshot(webhook(body)).await.unwrap();
        assert_eq!(response.status(), StatusCode::INTERNAL_SERVER_ERROR);
        assert!(json_body(response).await["error"].is_string());
    }

    tokio::time::sleep(Duration::from_millis(20)).await;
    assert_eq!(lookup.calls.load(Ordering::SeqCst), 0);
}

#[tokio::test]
async fn test_unknown_route_is_404() {
    let response = app(SlowLookup::new(Duration::ZERO))
        .oneshot(
            Request::builder()
                .method("POST")
                .uri("/other")
                .body(Body::from("[]"))
                .unwrap(),
        )
        .await
        .unwrap();
    assert_eq!(response.status(), StatusCode::NOT_FOUND);
}

#[tokio::test]
async fn test_dispatch_supervisor_survives_deadline() {
    let lookup = SlowLookup::new(Duration::from_secs(10));
    let supervisor = dispatch(
        pipeline(lookup.clone()),
        TransferEvent::new("ABC123", Decimal::ONE),
        Duration::from_millis(50),
    );

    tokio::time::timeout(Duration::from_secs(2), supervisor)
        .await
        .expect("supervisor did not observe the deadline")
        .unwrap();
    assert_eq!(lookup.calls.load(Ordering::SeqCst), 1);
    assert!(!lookup.finished.load(Ordering::SeqCst));
}

#[tokio::test]
async fn test_dispatch_supervisor_logs_completed_run() {
    let lookup = SlowLookup::new(Duration::ZERO);
    let supervisor = dispatch(
        pipeline(lookup.clone()),
        TransferEvent::new("ABC123", Decimal::ONE),
        Duration::from_secs(5),
    );

    supervisor.await.unwrap();
    assert!(lookup.finished.load(Ordering::SeqCst));
}
