//! Post types

use chrono::{DateTime, Utc};
use serde::{Deserialize, Serialize};
use thiserror::Error;

/// Final post text, ready for submission
///
/// `text` is the whole post body, hashtag included.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct FormattedPost {
    pub text: String,
    /// Normalized hashtag, with exactly one leading `#`
    pub hashtag: String,
}

/// A post the platform accepted
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct PublishResult {
    /// Platform-assigned post identifier
    pub external_id: String,
    pub posted_at: DateTime<Utc>,
}

/// Formatting precondition failures
#[derive(Debug, Clone, PartialEq, Eq, Error)]
pub enum FormatError {
    /// Message plus separator plus hashtag exceeds the platform limit
    #[error("Post exceeds character limit ({length}/{limit})")]
    ContentTooLong { length: usize, limit: usize },
}

/// Publication errors
#[derive(Debug, Clone, Error)]
pub enum PublishError {
    /// Platform rate limit (HTTP 429)
    #[error("Publishing rate limited (resets at {reset_at:?})")]
    RateLimited { reset_at: Option<DateTime<Utc>> },
    /// Platform refused the post
    #[error("Post rejected: {status} {}: {detail}", .title.as_deref().unwrap_or("error"))]
    Rejected {
        status: u16,
        title: Option<String>,
        detail: String,
    },
    /// Network or timeout failure
    #[error("Publish request failed: {0}")]
    Transport(String),
    /// Response body did not match the expected shape
    #[error("Malformed publish response: {0}")]
    Decode(String),
    /// Still rate limited after the whole retry budget
    #[error("Publishing still rate limited after {attempts} attempts")]
    RetriesExhausted { attempts: u32 },
}

impl PublishError {
    /// Only the platform's rate limit is worth another attempt
    pub fn is_rate_limit(&self) -> bool {
        matches!(self, PublishError::RateLimited { .. })
    }
}
