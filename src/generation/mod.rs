//! Text generation
//!
//! Submits a [`GenerationRequest`] to an external generative-text service
//! with bounded retry, then validates and truncates the result.

mod generator;
mod openai;
mod truncate;
mod types;

pub use generator::TextGenerator;
pub use openai::{OpenAiClient, OpenAiConfig, OPENAI_API_URL};
pub use truncate::{clean_message, truncate_message};
pub use types::{GeneratedMessage, GenerationError, GenerationRequest};

use async_trait::async_trait;

/// Trait for generative-text service implementations
#[async_trait]
pub trait TextService: Send + Sync {
    /// Return the raw completion text for a request
    async fn complete(&self, request: &GenerationRequest) -> Result<String, GenerationError>;
}
