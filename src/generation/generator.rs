//! Text generator with bounded retry

use super::truncate::{clean_message, truncate_message};
use super::{GeneratedMessage, GenerationError, GenerationRequest, TextService};
use crate::config::GenerationConfig;
use crate::retry::{retry, RetryError, RetryPolicy};
use crate::telemetry::{increment, CounterMetric};
use std::sync::Arc;
use std::time::{Duration, Instant};

/// Calls the text service, retrying on rate limits, and validates the output
///
/// `ATTEMPT(n)` → success → clean, validate, truncate → `DONE`.
/// A rate limit with attempts left waits out the backoff and tries again.
/// Anything else, or an exhausted budget, is terminal.
pub struct TextGenerator {
    service: Arc<dyn TextService>,
    policy: RetryPolicy,
    hard_cap: usize,
    latency_budget: Duration,
}

impl TextGenerator {
    /// Create a generator from the generation config section
    pub fn new(service: Arc<dyn TextService>, config: &GenerationConfig) -> Self {
        Self {
            service,
            policy: config.retry_policy(),
            hard_cap: config.max_message_chars,
            latency_budget: config.latency_budget(),
        }
    }

    /// Override the retry policy
    pub fn with_policy(mut self, policy: RetryPolicy) -> Self {
        self.policy = policy;
        self
    }

    /// Service-agnostic length cap
    pub fn hard_cap(&self) -> usize {
        self.hard_cap
    }

    /// Generate a message no longer than `min(hard_cap, char_budget)` characters
    pub async fn generate(
        &self,
        request: &GenerationRequest,
        char_budget: usize,
    ) -> Result<GeneratedMessage, GenerationError> {
        let limit = self.hard_cap.min(char_budget);

        let result = retry(
            &self.policy,
            |attempt| async move {
                increment(CounterMetric::GenerationAttempt);
                tracing::debug!(attempt, "Requesting generated message");

                let started = Instant::now();
                let raw = self.service.complete(request).await?;
                let elapsed = started.elapsed();

                let text = clean_message(&raw);
                if text.is_empty() {
                    return Err(GenerationError::EmptyResponse);
                }
                Ok((text, elapsed))
            },
            GenerationError::is_rate_limit,
        )
        .await;

        let (text, elapsed) = result.map_err(|e| match e {
            RetryError::Exhausted { attempts, .. } => {
                GenerationError::RetriesExhausted { attempts }
            }
            RetryError::Aborted { error, .. } => error,
        })?;

        let source_latency_ok = elapsed <= self.latency_budget;
        if !source_latency_ok {
            tracing::warn!(
                elapsed_ms = elapsed.as_millis() as u64,
                budget_ms = self.latency_budget.as_millis() as u64,
                "Generation exceeded latency budget"
            );
        }

        let original_chars = text.chars().count();
        let text = truncate_message(&text, limit);
        if text.chars().count() < original_chars {
            tracing::info!(
                original_chars,
                truncated_chars = text.chars().count(),
                limit,
                "Truncated generated message"
            );
        }

        tracing::info!(message = %text, "Generated message");

        Ok(GeneratedMessage {
            text,
            source_latency_ok,
        })
    }
}
