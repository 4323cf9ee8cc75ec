//! Configuration types for kol-agent
//!
//! Everything here is loaded once at startup and treated as read-only for
//! the lifetime of the process. Secrets never live in the TOML file; they
//! are read from the environment into [`Credentials`].

use crate::retry::{Backoff, RetryPolicy};
use rust_decimal::Decimal;
use serde::Deserialize;
use std::net::SocketAddr;
use std::time::Duration;

/// Root configuration structure
#[derive(Debug, Clone, Default, Deserialize)]
#[serde(default)]
pub struct Config {
    pub server: ServerConfig,
    pub pipeline: PipelineConfig,
    pub price: PriceConfig,
    pub generation: GenerationConfig,
    pub publish: PublishConfig,
    pub telemetry: TelemetryConfig,
}

/// Webhook server configuration
#[derive(Debug, Clone, Deserialize)]
#[serde(default)]
pub struct ServerConfig {
    /// Socket address the webhook server binds to
    pub listen: SocketAddr,
    /// Route the upstream indexer posts transfer events to
    pub webhook_path: String,
    /// End-to-end deadline for a single pipeline run
    pub run_deadline_secs: u64,
}

impl Default for ServerConfig {
    fn default() -> Self {
        Self {
            listen: SocketAddr::from(([0, 0, 0, 0], 3000)),
            webhook_path: "/webhook".to_string(),
            run_deadline_secs: 30,
        }
    }
}

impl ServerConfig {
    pub fn run_deadline(&self) -> Duration {
        Duration::from_secs(self.run_deadline_secs)
    }
}

/// Eligibility filter configuration
#[derive(Debug, Clone, Default, Deserialize)]
#[serde(default)]
pub struct PipelineConfig {
    /// Minimum USD value of a transfer worth posting about (None = no minimum)
    pub min_transaction_usd: Option<Decimal>,
    /// Token addresses that never produce a post
    pub excluded_addresses: Vec<String>,
}

/// Price index configuration
#[derive(Debug, Clone, Deserialize)]
#[serde(default)]
pub struct PriceConfig {
    pub base_url: String,
    pub timeout_secs: u64,
}

impl Default for PriceConfig {
    fn default() -> Self {
        Self {
            base_url: "https://api.dexscreener.com".to_string(),
            timeout_secs: 10,
        }
    }
}

/// Text generation configuration
#[derive(Debug, Clone, Deserialize)]
#[serde(default)]
pub struct GenerationConfig {
    pub base_url: String,
    pub model: String,
    pub max_output_tokens: u32,
    /// Hard cap on generated message length, in characters
    pub max_message_chars: usize,
    pub system_instruction: Option<String>,
    pub max_attempts: u32,
    pub base_delay_ms: u64,
    pub backoff: Backoff,
    pub timeout_secs: u64,
    /// Calls slower than this are flagged on the generated message
    pub latency_budget_ms: u64,
}

impl Default for GenerationConfig {
    fn default() -> Self {
        Self {
            base_url: "https://api.openai.com/v1".to_string(),
            model: "gpt-4".to_string(),
            max_output_tokens: 100,
            max_message_chars: 240,
            system_instruction: Some(
                "You write short, punchy crypto posts for social media. \
                 Reply with the post text only."
                    .to_string(),
            ),
            max_attempts: 3,
            base_delay_ms: 1000,
            backoff: Backoff::Linear,
            timeout_secs: 30,
            latency_budget_ms: 10_000,
        }
    }
}

impl GenerationConfig {
    pub fn retry_policy(&self) -> RetryPolicy {
        RetryPolicy::new(self.max_attempts, Duration::from_millis(self.base_delay_ms))
            .backoff(self.backoff)
    }

    pub fn timeout(&self) -> Duration {
        Duration::from_secs(self.timeout_secs)
    }

    pub fn latency_budget(&self) -> Duration {
        Duration::from_millis(self.latency_budget_ms)
    }
}

/// Social feed publication configuration
#[derive(Debug, Clone, Deserialize)]
#[serde(default)]
pub struct PublishConfig {
    pub base_url: String,
    /// Platform character limit for a whole post
    pub char_limit: usize,
    /// Hashtag used when the ticker yields no usable tag
    pub fallback_hashtag: String,
    pub max_attempts: u32,
    pub retry_delay_ms: u64,
    pub backoff: Backoff,
    pub timeout_secs: u64,
    /// Log posts instead of sending them
    pub dry_run: bool,
}

impl Default for PublishConfig {
    fn default() -> Self {
        Self {
            base_url: "https://api.twitter.com".to_string(),
            char_limit: 280,
            fallback_hashtag: "Crypto".to_string(),
            max_attempts: 3,
            retry_delay_ms: 1000,
            backoff: Backoff::Linear,
            timeout_secs: 15,
            dry_run: false,
        }
    }
}

impl PublishConfig {
    pub fn retry_policy(&self) -> RetryPolicy {
        RetryPolicy::new(self.max_attempts, Duration::from_millis(self.retry_delay_ms))
            .backoff(self.backoff)
    }

    pub fn timeout(&self) -> Duration {
        Duration::from_secs(self.timeout_secs)
    }
}

/// Log output format
#[derive(Debug, Clone, Copy, Deserialize, PartialEq, Eq, Default)]
#[serde(rename_all = "lowercase")]
pub enum LogFormat {
    /// Human-readable format
    #[default]
    Pretty,
    /// JSON format for log aggregation
    Json,
}

/// Telemetry configuration
#[derive(Debug, Clone, Deserialize)]
#[serde(default)]
pub struct TelemetryConfig {
    pub log_level: String,
    pub log_format: LogFormat,
    /// Prometheus scrape port (None = metrics exporter disabled)
    pub metrics_port: Option<u16>,
}

impl Default for TelemetryConfig {
    fn default() -> Self {
        Self {
            log_level: "info".to_string(),
            log_format: LogFormat::Pretty,
            metrics_port: None,
        }
    }
}

impl Config {
    /// Load configuration from a TOML file
    pub fn load(path: impl AsRef<std::path::Path>) -> anyhow::Result<Self> {
        let content = std::fs::read_to_string(path)?;
        let config: Config = toml::from_str(&content)?;
        config.validate()?;
        Ok(config)
    }

    /// Apply environment overrides (currently `PORT`)
    pub fn apply_env(&mut self) -> anyhow::Result<()> {
        if let Ok(port) = std::env::var("PORT") {
            let port: u16 = port
                .parse()
                .map_err(|e| anyhow::anyhow!("Invalid PORT {:?}: {}", port, e))?;
            self.server.listen.set_port(port);
        }
        Ok(())
    }

    /// Reject settings that would make every run fail
    pub fn validate(&self) -> anyhow::Result<()> {
        if !self.server.webhook_path.starts_with('/') {
            anyhow::bail!(
                "server.webhook_path must start with '/': {}",
                self.server.webhook_path
            );
        }
        if self.server.webhook_path == crate::webhook::HEALTH_PATH {
            anyhow::bail!(
                "server.webhook_path is reserved for the health check: {}",
                self.server.webhook_path
            );
        }
        if self.generation.max_attempts == 0 {
            anyhow::bail!("generation.max_attempts must be at least 1");
        }
        if self.publish.max_attempts == 0 {
            anyhow::bail!("publish.max_attempts must be at least 1");
        }
        if self.publish.char_limit == 0 {
            anyhow::bail!("publish.char_limit must be positive");
        }
        if self.generation.max_message_chars == 0 {
            anyhow::bail!("generation.max_message_chars must be positive");
        }
        Ok(())
    }
}

/// Service credentials, read from the environment
#[derive(Clone, Default)]
pub struct Credentials {
    pub openai_api_key: Option<String>,
    pub twitter_access_token: Option<String>,
}

impl Credentials {
    pub const OPENAI_API_KEY: &'static str = "OPENAI_API_KEY";
    pub const TWITTER_ACCESS_TOKEN: &'static str = "TWITTER_ACCESS_TOKEN";

    /// Read credentials from the process environment (after `.env` is loaded)
    pub fn from_env() -> Self {
        Self {
            openai_api_key: non_empty_var(Self::OPENAI_API_KEY),
            twitter_access_token: non_empty_var(Self::TWITTER_ACCESS_TOKEN),
        }
    }

    pub fn require_openai(&self) -> anyhow::Result<&str> {
        self.openai_api_key
            .as_deref()
            .ok_or_else(|| anyhow::anyhow!("{} is not set", Self::OPENAI_API_KEY))
    }

    pub fn require_twitter(&self) -> anyhow::Result<&str> {
        self.twitter_access_token
            .as_deref()
            .ok_or_else(|| anyhow::anyhow!("{} is not set", Self::TWITTER_ACCESS_TOKEN))
    }
}

impl std::fmt::Debug for Credentials {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.debug_struct("Credentials")
            .field("openai_api_key", &self.openai_api_key.as_ref().map(|_| "<redacted>"))
            .field(
                "twitter_access_token",
                &self.twitter_access_token.as_ref().map(|_| "<redacted>"),
            )
            .finish()
    }
}

fn non_empty_var(key: &str) -> Option<String> {
    std::env::var(key).ok().filter(|v| !v.trim().is_empty())
}
