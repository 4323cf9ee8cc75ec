//! X (Twitter) API v2 client for posting

use super::{PublishError, SocialFeed};
use crate::config::PublishConfig;
use async_trait::async_trait;
use chrono::{DateTime, Utc};
use reqwest::header::HeaderMap;
use reqwest::{Client, StatusCode};
use serde::{Deserialize, Serialize};
use std::time::Duration;

/// X API base URL
pub const TWITTER_API_URL: &str = "https://api.twitter.com";

/// Configuration for the X client
#[derive(Clone)]
pub struct TwitterConfig {
    /// Base URL, without the API version
    pub base_url: String,
    /// OAuth 2.0 user-context access token with `tweet.write`
    pub access_token: String,
    /// Request timeout
    pub timeout: Duration,
}

impl TwitterConfig {
    /// Build from the publish section plus a credential
    pub fn from_publish(config: &PublishConfig, access_token: impl Into<String>) -> Self {
        Self {
            base_url: config.base_url.trim_end_matches('/').to_string(),
            access_token: access_token.into(),
            timeout: config.timeout(),
        }
    }
}

impl std::fmt::Debug for TwitterConfig {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.debug_struct("TwitterConfig")
            .field("base_url", &self.base_url)
            .field("timeout", &self.timeout)
            .finish_non_exhaustive()
    }
}

/// Client for `POST /2/tweets`
pub struct TwitterClient {
    config: TwitterConfig,
    client: Client,
}

impl TwitterClient {
    /// Create a new client
    pub fn new(config: TwitterConfig) -> Self {
        let client = Client::builder()
            .timeout(config.timeout)
            .build()
            .unwrap_or_else(|_| Client::new());

        Self { config, client }
    }
}

#[async_trait]
impl SocialFeed for TwitterClient {
    async fn post(&self, text: &str) -> Result<String, PublishError> {
        let url = format!("{}/2/tweets", self.config.base_url);

        let response = self
            .client
            .post(&url)
            .bearer_auth(&self.config.access_token)
            .json(&CreateTweet { text })
            .send()
            .await
            .map_err(|e| PublishError::Transport(e.to_string()))?;

        let status = response.status();
        if status == StatusCode::TOO_MANY_REQUESTS {
            return Err(PublishError::RateLimited {
                reset_at: rate_limit_reset(response.headers()),
            });
        }
        if !status.is_success() {
            let body = response.text().await.unwrap_or_default();
            let problem = serde_json::from_str::<ApiProblem>(&body).ok();
            return Err(PublishError::Rejected {
                status: status.as_u16(),
                title: problem.as_ref().and_then(|p| p.title.clone()),
                detail: problem.and_then(|p| p.detail).unwrap_or(body),
            });
        }

        let created: CreateTweetResponse = response
            .json()
            .await
            .map_err(|e| PublishError::Decode(e.to_string()))?;

        Ok(created.data.id)
    }
}

/// `x-rate-limit-reset` carries the reset time as epoch seconds
fn rate_limit_reset(headers: &HeaderMap) -> Option<DateTime<Utc>> {
    let secs = headers
        .get("x-rate-limit-reset")?
        .to_str()
        .ok()?
        .trim()
        .parse::<i64>()
        .ok()?;
    DateTime::from_timestamp(secs, 0)
}

#[derive(Debug, Serialize)]
struct CreateTweet<'a> {
    text: &'a str,
}

#[derive(Debug, Deserialize)]
struct CreateTweetResponse {
    data: CreatedTweet,
}

#[derive(Debug, Deserialize)]
struct CreatedTweet {
    id: String,
}

/// RFC 7807-style error body returned by the API
#[derive(Debug, Deserialize)]
struct ApiProblem {
    title: Option<String>,
    detail: Option<String>,
}
