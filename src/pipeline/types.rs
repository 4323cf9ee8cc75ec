//! Pipeline types

use super::RejectReason;
use crate::generation::GenerationError;
use crate::post::{FormatError, PublishError};
use crate::prompt::PromptError;
use rust_decimal::Decimal;
use serde::{Deserialize, Serialize};
use thiserror::Error;

/// One token transfer extracted from an inbound webhook
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct TransferEvent {
    /// Token mint address
    pub token_address: String,
    /// Transferred amount, in whole tokens
    pub amount_transferred: Decimal,
}

impl TransferEvent {
    pub fn new(token_address: impl Into<String>, amount_transferred: Decimal) -> Self {
        Self {
            token_address: token_address.into(),
            amount_transferred,
        }
    }
}

/// How a pipeline run ended, short of an error
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum PipelineOutcome {
    /// A post went out
    Published { post_id: String, text: String },
    /// A filter stopped the run
    Skipped(RejectReason),
    /// The webhook carried no usable transfer
    NoTransfer,
}

impl PipelineOutcome {
    /// Stable label for metrics
    pub fn label(&self) -> &'static str {
        match self {
            PipelineOutcome::Published { .. } => "published",
            PipelineOutcome::Skipped(_) => "skipped",
            PipelineOutcome::NoTransfer => "no_transfer",
        }
    }
}

/// Pipeline run failures
#[derive(Debug, Error)]
pub enum PipelineError {
    /// Prompt could not be rendered
    #[error("Prompt rendering failed: {0}")]
    Prompt(#[from] PromptError),
    /// Text generation failed or exhausted its retries
    #[error("Message generation failed: {0}")]
    GenerationFailed(#[from] GenerationError),
    /// Formatted post would exceed the platform limit
    #[error("Formatted post rejected: {0}")]
    ContentTooLong(#[from] FormatError),
    /// Publication failed or exhausted its retries
    #[error("Publication failed: {0}")]
    PublishFailed(#[from] PublishError),
}

impl PipelineError {
    /// Stable label for metrics
    pub fn label(&self) -> &'static str {
        match self {
            PipelineError::Prompt(_) => "prompt_failed",
            PipelineError::GenerationFailed(_) => "generation_failed",
            PipelineError::ContentTooLong(_) => "content_too_long",
            PipelineError::PublishFailed(_) => "publish_failed",
        }
    }
}
