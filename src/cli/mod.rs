//! CLI interface for kol-agent
//!
//! Provides subcommands for:
//! - `serve`: Run the webhook server
//! - `trigger`: Run one pipeline pass for a token, without a webhook
//! - `config`: Show the effective configuration

mod serve;
mod trigger;

pub use serve::ServeArgs;
pub use trigger::TriggerArgs;

use crate::config::{Config, Credentials};
use clap::{Parser, Subcommand};

#[derive(Parser, Debug)]
#[command(name = "kol-agent")]
#[command(about = "Turns token transfer webhooks into generated social posts")]
#[command(version)]
pub struct Cli {
    #[command(subcommand)]
    pub command: Commands,

    /// Path to configuration file
    #[arg(short, long, default_value = "config.toml")]
    pub config: String,
}

#[derive(Subcommand, Debug)]
pub enum Commands {
    /// Run the webhook server
    Serve(ServeArgs),
    /// Process a single transfer and print the outcome
    Trigger(TriggerArgs),
    /// Show configuration
    Config,
}

/// Print the effective configuration; credentials show only as set or unset
pub fn print_config(config: &Config, credentials: &Credentials) {
    let set = |v: &Option<String>| if v.is_some() { "<set>" } else { "<unset>" };

    println!("Current configuration:");
    println!(
        "  Server: {}{} (run deadline {}s)",
        config.server.listen, config.server.webhook_path, config.server.run_deadline_secs
    );
    println!(
        "  Filters: min ${}, {} excluded address(es)",
        config
            .pipeline
            .min_transaction_usd
            .map(|v| v.to_string())
            .unwrap_or_else(|| "-".to_string()),
        config.pipeline.excluded_addresses.len()
    );
    println!("  Price: {}", config.price.base_url);
    println!(
        "  Generation: {} via {} (max {} chars, {} attempts, {:?} backoff)",
        config.generation.model,
        config.generation.base_url,
        config.generation.max_message_chars,
        config.generation.max_attempts,
        config.generation.backoff
    );
    println!(
        "  Publish: {} (limit {}, #{} fallback, {} attempts, dry run: {})",
        config.publish.base_url,
        config.publish.char_limit,
        config.publish.fallback_hashtag,
        config.publish.max_attempts,
        config.publish.dry_run
    );
    println!(
        "  Telemetry: {} ({:?}), metrics port {}",
        config.telemetry.log_level,
        config.telemetry.log_format,
        config
            .telemetry
            .metrics_port
            .map(|p| p.to_string())
            .unwrap_or_else(|| "-".to_string())
    );
    println!(
        "  Credentials: {}={}, {}={}",
        Credentials::OPENAI_API_KEY,
        set(&credentials.openai_api_key),
        Credentials::TWITTER_ACCESS_TOKEN,
        set(&credentials.twitter_access_token)
    );
}
