//! Post formatting and publication
//!
//! Composes the final post (message plus one hashtag, within the platform
//! limit) and submits it to the social feed with bounded retry.

mod dry_run;
mod formatter;
mod publisher;
mod twitter;
mod types;

pub use dry_run::DryRunFeed;
pub use formatter::ContentFormatter;
pub use publisher::Publisher;
pub use twitter::{TwitterClient, TwitterConfig, TWITTER_API_URL};
pub use types::{FormatError, FormattedPost, PublishError, PublishResult};

use async_trait::async_trait;

/// Trait for social feed implementations
#[async_trait]
pub trait SocialFeed: Send + Sync {
    /// Post text, returning the platform-assigned identifier
    async fn post(&self, text: &str) -> Result<String, PublishError>;
}
