//! Inbound webhook payload
//!
//! The indexer posts a JSON array of enhanced transactions. Only the first
//! record is inspected, and within it only the last token transfer.

use crate::pipeline::TransferEvent;
use rust_decimal::Decimal;
use serde::Deserialize;
use std::str::FromStr;
use thiserror::Error;

/// Webhook payload errors
#[derive(Debug, Error)]
pub enum WebhookError {
    /// Body is not the expected JSON shape
    #[error("Malformed webhook payload: {0}")]
    Malformed(#[from] serde_json::Error),
    /// `tokenAmount` is not a decimal number
    #[error("Invalid token amount: {0:?}")]
    InvalidAmount(String),
}

/// The fields of a transaction record this service reads
#[derive(Debug, Deserialize)]
#[serde(rename_all = "camelCase")]
struct TransactionRecord {
    #[serde(default)]
    token_transfers: Option<Vec<serde_json::Value>>,
}

#[derive(Debug, Deserialize)]
#[serde(rename_all = "camelCase")]
struct TokenTransfer {
    #[serde(default)]
    mint: Option<String>,
    #[serde(default)]
    token_amount: Option<RawAmount>,
}

/// Indexers send amounts either as JSON numbers or as strings
#[derive(Debug, Deserialize)]
#[serde(untagged)]
enum RawAmount {
    Number(serde_json::Number),
    Text(String),
}

impl RawAmount {
    fn to_decimal(&self) -> Result<Decimal, WebhookError> {
        let raw = match self {
            RawAmount::Number(n) => n.to_string(),
            RawAmount::Text(s) => s.trim().to_string(),
        };
        Decimal::from_str(&raw)
            .or_else(|_| Decimal::from_scientific(&raw))
            .map_err(|_| WebhookError::InvalidAmount(raw))
    }
}

/// Extract the transfer to act on
///
/// Returns `Ok(None)` for well-formed payloads that carry nothing to post
/// about: an empty array, a first record without transfers, or a transfer
/// without a mint. A missing amount is zero.
pub fn parse_webhook(body: &[u8]) -> Result<Option<TransferEvent>, WebhookError> {
    let records: Vec<serde_json::Value> = serde_json::from_slice(body)?;

    let Some(first) = records.into_iter().next() else {
        return Ok(None);
    };

    let record: TransactionRecord = serde_json::from_value(first)?;
    let Some(last) = record.token_transfers.and_then(|t| t.into_iter().last()) else {
        return Ok(None);
    };

    let transfer: TokenTransfer = serde_json::from_value(last)?;
    let mint = match transfer.mint.as_deref().map(str::trim) {
        Some(mint) if !mint.is_empty() => mint.to_string(),
        _ => return Ok(None),
    };

    let amount = match &transfer.token_amount {
        Some(raw) => raw.to_decimal()?,
        None => Decimal::ZERO,
    };

    Ok(Some(TransferEvent::new(mint, amount)))
}
