//! Publisher with bounded retry

use super::{FormattedPost, PublishError, PublishResult, SocialFeed};
use crate::config::PublishConfig;
use crate::retry::{retry, RetryError, RetryPolicy};
use crate::telemetry::{increment, CounterMetric};
use chrono::Utc;
use std::sync::Arc;

/// Posts formatted content to the social feed
///
/// Only platform rate limits are retried, with the configured backoff.
/// No idempotency key is sent, so a re-delivered webhook yields a duplicate
/// post.
pub struct Publisher {
    feed: Arc<dyn SocialFeed>,
    policy: RetryPolicy,
}

impl Publisher {
    /// Create a publisher from the publish config section
    pub fn new(feed: Arc<dyn SocialFeed>, config: &PublishConfig) -> Self {
        Self {
            feed,
            policy: config.retry_policy(),
        }
    }

    /// Override the retry policy
    pub fn with_policy(mut self, policy: RetryPolicy) -> Self {
        self.policy = policy;
        self
    }

    /// Submit a post, returning the platform-assigned identifier
    pub async fn publish(&self, post: &FormattedPost) -> Result<PublishResult, PublishError> {
        let result = retry(
            &self.policy,
            |attempt| async move {
                increment(CounterMetric::PublishAttempt);
                tracing::debug!(attempt, chars = post.text.chars().count(), "Submitting post");
                self.feed.post(&post.text).await
            },
            PublishError::is_rate_limit,
        )
        .await;

        match result {
            Ok(external_id) => {
                tracing::info!(post_id = %external_id, "Post published");
                Ok(PublishResult {
                    external_id,
                    posted_at: Utc::now(),
                })
            }
            Err(RetryError::Exhausted { attempts, last }) => {
                tracing::error!(attempts, error = %last, "Failed to publish post after retries");
                Err(PublishError::RetriesExhausted { attempts })
            }
            Err(RetryError::Aborted { attempt, error }) => {
                tracing::error!(attempt, error = %error, "Failed to publish post");
                Err(error)
            }
        }
    }
}
