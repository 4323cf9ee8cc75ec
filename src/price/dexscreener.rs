//! DexScreener client for token identity and price
//!
//! Queries the token-pairs endpoint keyed by chain address. The first
//! listed pair is treated as authoritative.

use super::{PriceLookup, TokenIdentity};
use async_trait::async_trait;
use reqwest::{Client, Url};
use rust_decimal::Decimal;
use serde::Deserialize;
use std::str::FromStr;
use std::time::Duration;

/// DexScreener API base URL
pub const DEXSCREENER_API_URL: &str = "https://api.dexscreener.com";

/// Configuration for the DexScreener client
#[derive(Debug, Clone)]
pub struct DexScreenerConfig {
    /// Base URL for the DexScreener API
    pub base_url: String,
    /// Request timeout
    pub timeout: Duration,
}

impl Default for DexScreenerConfig {
    fn default() -> Self {
        Self {
            base_url: DEXSCREENER_API_URL.to_string(),
            timeout: Duration::from_secs(10),
        }
    }
}

impl From<&crate::config::PriceConfig> for DexScreenerConfig {
    fn from(config: &crate::config::PriceConfig) -> Self {
        Self {
            base_url: config.base_url.trim_end_matches('/').to_string(),
            timeout: Duration::from_secs(config.timeout_secs),
        }
    }
}

/// Client for DexScreener's token-pairs API
pub struct DexScreenerClient {
    config: DexScreenerConfig,
    client: Client,
}

impl DexScreenerClient {
    /// Create a new client with default configuration
    pub fn new() -> Self {
        Self::with_config(DexScreenerConfig::default())
    }

    /// Create a new client with custom configuration
    pub fn with_config(config: DexScreenerConfig) -> Self {
        let client = Client::builder()
            .timeout(config.timeout)
            .build()
            .unwrap_or_else(|_| Client::new());

        Self { config, client }
    }

    /// Fetch the identity of a token, surfacing every failure
    ///
    /// Returns `Ok(None)` when the index knows no pairs for the address.
    pub async fn fetch_identity(&self, address: &str) -> anyhow::Result<Option<TokenIdentity>> {
        let url = token_url(&self.config.base_url, address)?;

        tracing::debug!(url = %url, "Fetching token pairs from DexScreener");

        let response = self.client.get(url).send().await?;

        if !response.status().is_success() {
            let status = response.status();
            let body = response.text().await.unwrap_or_default();
            anyhow::bail!("DexScreener API error: {} - {}", status, body);
        }

        let pairs: TokenPairsResponse = response.json().await?;
        Ok(identity_from_pairs(address, pairs))
    }
}

impl Default for DexScreenerClient {
    fn default() -> Self {
        Self::new()
    }
}

#[async_trait]
impl PriceLookup for DexScreenerClient {
    async fn lookup(&self, address: &str, amount: Option<Decimal>) -> TokenIdentity {
        match self.fetch_identity(address).await {
            Ok(Some(identity)) => {
                let identity = identity.with_amount(amount);
                tracing::info!(
                    address,
                    ticker = identity.ticker_symbol.as_deref().unwrap_or("?"),
                    usd_price = ?identity.usd_price,
                    transaction_value = ?identity.transaction_value,
                    "Resolved token"
                );
                identity
            }
            Ok(None) => {
                tracing::info!(address, "No trading pairs found for token");
                TokenIdentity::unknown(address)
            }
            Err(e) => {
                tracing::warn!(address, error = %e, "Token lookup failed");
                TokenIdentity::unknown(address)
            }
        }
    }
}

/// Token-pairs response from DexScreener
#[derive(Debug, Deserialize)]
struct TokenPairsResponse {
    /// Null when the token has no pairs
    #[serde(default)]
    pairs: Option<Vec<DexPair>>,
}

/// One trading pair
#[derive(Debug, Deserialize)]
#[serde(rename_all = "camelCase")]
struct DexPair {
    base_token: DexToken,
    /// Decimal string, e.g. "0.00001234"
    price_usd: Option<String>,
}

#[derive(Debug, Deserialize)]
struct DexToken {
    symbol: Option<String>,
    name: Option<String>,
}

/// Build an identity from the first pair, if there is one
fn identity_from_pairs(address: &str, response: TokenPairsResponse) -> Option<TokenIdentity> {
    let pair = response.pairs?.into_iter().next()?;

    Some(TokenIdentity {
        address: address.to_string(),
        ticker_symbol: non_blank(pair.base_token.symbol),
        display_name: non_blank(pair.base_token.name),
        usd_price: pair.price_usd.as_deref().and_then(parse_price),
        transaction_value: None,
    })
}

fn non_blank(value: Option<String>) -> Option<String> {
    value
        .map(|v| v.trim().to_string())
        .filter(|v| !v.is_empty())
}

/// Build `{base}/latest/dex/tokens/{address}` with the address as one
/// percent-encoded path segment
fn token_url(base_url: &str, address: &str) -> anyhow::Result<Url> {
    let mut url = Url::parse(base_url)?;
    url.path_segments_mut()
        .map_err(|_| anyhow::anyhow!("DexScreener base URL cannot carry a path: {}", base_url))?
        .pop_if_empty()
        .extend(["latest", "dex", "tokens", address]);
    Ok(url)
}

/// Parse a price string, accepting scientific notation for tiny prices
fn parse_price(raw: &str) -> Option<Decimal> {
    let raw = raw.trim();
    Decimal::from_str(raw)
        .or_else(|_| Decimal::from_scientific(raw))
        .ok()
}
