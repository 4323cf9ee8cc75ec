//! kol-agent: turns on-chain token transfers into generated social posts
//!
//! This library provides the core components for:
//! - Webhook intake for indexer transfer events
//! - Token identity and USD value lookup via DexScreener
//! - Eligibility filtering (exclusions, unknown tokens, minimum value)
//! - Randomised prompt selection over a fixed template pool
//! - Text generation with bounded retry and length control
//! - Post formatting within the platform character limit
//! - Publication to X with bounded retry, or a dry-run feed
//! - Structured logging and Prometheus metrics

pub mod cli;
pub mod config;
pub mod generation;
pub mod pipeline;
pub mod post;
pub mod price;
pub mod prompt;
pub mod retry;
pub mod telemetry;
pub mod webhook;
