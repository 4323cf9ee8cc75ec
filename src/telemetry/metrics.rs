//! Prometheus metrics

use metrics_exporter_prometheus::PrometheusBuilder;
use std::net::SocketAddr;
use std::time::Duration;

const WEBHOOKS_TOTAL: &str = "kolagent_webhooks_total";
const PIPELINE_RUNS_TOTAL: &str = "kolagent_pipeline_runs_total";
const PIPELINE_DURATION: &str = "kolagent_pipeline_duration_seconds";

/// Counter metric types
#[derive(Debug, Clone, Copy)]
pub enum CounterMetric {
    /// One call to the text generation service
    GenerationAttempt,
    /// One call to the social feed
    PublishAttempt,
}

impl CounterMetric {
    fn name(self) -> &'static str {
        match self {
            CounterMetric::GenerationAttempt => "kolagent_generation_attempts_total",
            CounterMetric::PublishAttempt => "kolagent_publish_attempts_total",
        }
    }
}

/// What the webhook endpoint did with a request
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum WebhookResult {
    /// A pipeline run was spawned
    Dispatched,
    /// Valid payload without a usable transfer
    NoTransfer,
    /// Payload could not be parsed
    Malformed,
}

impl WebhookResult {
    pub fn label(self) -> &'static str {
        match self {
            WebhookResult::Dispatched => "dispatched",
            WebhookResult::NoTransfer => "no_transfer",
            WebhookResult::Malformed => "malformed",
        }
    }
}

/// Increment a counter by one
pub fn increment(metric: CounterMetric) {
    metrics::counter!(metric.name()).increment(1);
}

/// Record an inbound webhook
pub fn record_webhook(result: WebhookResult) {
    metrics::counter!(WEBHOOKS_TOTAL, "result" => result.label()).increment(1);
}

/// Record a finished pipeline run
pub fn record_run(outcome: &'static str, duration: Duration) {
    metrics::counter!(PIPELINE_RUNS_TOTAL, "outcome" => outcome).increment(1);
    metrics::histogram!(PIPELINE_DURATION).record(duration.as_secs_f64());

    tracing::debug!(
        outcome,
        duration_ms = duration.as_millis() as u64,
        "Pipeline run recorded"
    );
}

/// Start the Prometheus scrape endpoint on `port`
///
/// Must be called from within a tokio runtime.
pub fn install_exporter(port: u16) -> anyhow::Result<()> {
    let addr = SocketAddr::from(([0, 0, 0, 0], port));
    PrometheusBuilder::new()
        .with_http_listener(addr)
        .install()
        .map_err(|e| anyhow::anyhow!("Failed to start metrics exporter: {}", e))?;

    describe();
    tracing::info!(%addr, "Metrics exporter listening");
    Ok(())
}

fn describe() {
    metrics::describe_counter!(WEBHOOKS_TOTAL, "Inbound webhooks by result");
    metrics::describe_counter!(PIPELINE_RUNS_TOTAL, "Pipeline runs by outcome");
    metrics::describe_counter!(
        CounterMetric::GenerationAttempt.name(),
        "Calls to the text generation service"
    );
    metrics::describe_counter!(
        CounterMetric::PublishAttempt.name(),
        "Calls to the social feed"
    );
    metrics::describe_histogram!(
        PIPELINE_DURATION,
        metrics::Unit::Seconds,
        "End-to-end pipeline run duration"
    );
}
