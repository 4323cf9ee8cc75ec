//! Token price lookup
//!
//! Resolves a chain address to a ticker symbol and, when a transferred
//! amount is supplied, the USD value of the transfer.

mod dexscreener;

pub use dexscreener::{DexScreenerClient, DexScreenerConfig, DEXSCREENER_API_URL};

use async_trait::async_trait;
use rust_decimal::Decimal;
use serde::{Deserialize, Serialize};

/// What the price index knows about a token
///
/// Absent fields mean "unknown". Callers must treat them as a skip or
/// fallback condition, never as an error.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct TokenIdentity {
    /// Chain address of the token (mint)
    pub address: String,
    /// Market symbol, e.g. "FOO"
    pub ticker_symbol: Option<String>,
    /// Human-readable token name
    pub display_name: Option<String>,
    /// Price of one token in USD
    pub usd_price: Option<Decimal>,
    /// `usd_price × amount` when an amount was supplied
    pub transaction_value: Option<Decimal>,
}

impl TokenIdentity {
    /// Identity with every optional field absent
    pub fn unknown(address: impl Into<String>) -> Self {
        Self {
            address: address.into(),
            ticker_symbol: None,
            display_name: None,
            usd_price: None,
            transaction_value: None,
        }
    }

    /// Whether the lookup resolved a ticker
    pub fn is_resolved(&self) -> bool {
        self.ticker_symbol.is_some()
    }

    /// Fill in the transaction value for a transferred amount
    pub fn with_amount(mut self, amount: Option<Decimal>) -> Self {
        self.transaction_value = match (self.usd_price, amount) {
            (Some(price), Some(amount)) => price.checked_mul(amount),
            _ => None,
        };
        self
    }
}

/// Trait for price index implementations
///
/// Implementations never fail: every error degrades to
/// [`TokenIdentity::unknown`].
#[async_trait]
pub trait PriceLookup: Send + Sync {
    /// Look up a token by address
    async fn lookup(&self, address: &str, amount: Option<Decimal>) -> TokenIdentity;
}
