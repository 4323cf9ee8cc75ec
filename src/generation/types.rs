//! Generation types

use serde::{Deserialize, Serialize};
use std::time::Duration;
use thiserror::Error;

/// A single request to the text service
///
/// Built fresh for every pipeline run.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct GenerationRequest {
    /// Rendered user prompt
    pub prompt_text: String,
    /// Optional system message
    pub system_instruction: Option<String>,
    /// Output token cap passed to the service
    pub max_output_tokens: u32,
}

/// Validated, length-capped message text
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct GeneratedMessage {
    /// Message body, without hashtag
    pub text: String,
    /// Whether the successful call finished within the latency budget
    pub source_latency_ok: bool,
}

/// Text generation errors
#[derive(Debug, Clone, Error)]
pub enum GenerationError {
    /// Service signalled rate limiting (HTTP 429)
    #[error("Generation service rate limited (retry after {retry_after:?})")]
    RateLimited { retry_after: Option<Duration> },
    /// Any other non-2xx response
    #[error("Generation service error: {status} - {body}")]
    Http { status: u16, body: String },
    /// Network or timeout failure
    #[error("Generation request failed: {0}")]
    Transport(String),
    /// Response body did not match the expected shape
    #[error("Malformed generation response: {0}")]
    Decode(String),
    /// Response contained no usable text
    #[error("Generation service returned no text")]
    EmptyResponse,
    /// Still rate limited after the whole retry budget
    #[error("Generation still rate limited after {attempts} attempts")]
    RetriesExhausted { attempts: u32 },
}

impl GenerationError {
    /// Only rate limiting is worth another attempt
    pub fn is_rate_limit(&self) -> bool {
        matches!(self, GenerationError::RateLimited { .. })
    }
}
