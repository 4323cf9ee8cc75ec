//! Dry-run feed: logs posts instead of sending them

use super::{PublishError, SocialFeed};
use async_trait::async_trait;
use std::sync::atomic::{AtomicU64, Ordering};
use uuid::Uuid;

/// Social feed that never touches the network
#[derive(Debug, Default)]
pub struct DryRunFeed {
    posted: AtomicU64,
}

impl DryRunFeed {
    pub fn new() -> Self {
        Self::default()
    }

    /// Number of posts accepted so far
    pub fn posted(&self) -> u64 {
        self.posted.load(Ordering::Relaxed)
    }
}

#[async_trait]
impl SocialFeed for DryRunFeed {
    async fn post(&self, text: &str) -> Result<String, PublishError> {
        let id = format!("dry-run-{}", Uuid::new_v4());
        self.posted.fetch_add(1, Ordering::Relaxed);
        tracing::info!(post_id = %id, text, "Dry run: post not sent");
        Ok(id)
    }
}
