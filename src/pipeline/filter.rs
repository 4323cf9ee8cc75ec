//! Eligibility filtering

use crate::config::PipelineConfig;
use crate::price::TokenIdentity;
use rust_decimal::Decimal;
use serde::{Deserialize, Serialize};
use std::collections::HashSet;
use std::fmt;

/// Result of applying filters to a transfer
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum FilterResult {
    /// Transfer passed all filters
    Pass,
    /// Transfer rejected
    Reject(RejectReason),
}

impl FilterResult {
    pub fn is_pass(&self) -> bool {
        matches!(self, FilterResult::Pass)
    }
}

/// Reason a transfer produces no post
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub enum RejectReason {
    /// Token address is on the exclusion list
    ExcludedAddress,
    /// Price index has no ticker for the token
    UnknownToken,
    /// Transfer value under the configured minimum
    BelowThreshold { value: Decimal, minimum: Decimal },
    /// A minimum is configured but the transfer value could not be computed
    ValueUnknown,
}

impl RejectReason {
    /// Stable label for metrics
    pub fn label(&self) -> &'static str {
        match self {
            RejectReason::ExcludedAddress => "excluded_address",
            RejectReason::UnknownToken => "unknown_token",
            RejectReason::BelowThreshold { .. } => "below_threshold",
            RejectReason::ValueUnknown => "value_unknown",
        }
    }
}

impl fmt::Display for RejectReason {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            RejectReason::ExcludedAddress => write!(f, "token address is excluded"),
            RejectReason::UnknownToken => write!(f, "token not found on price index"),
            RejectReason::BelowThreshold { value, minimum } => {
                write!(f, "transaction value ${} below minimum ${}", value, minimum)
            }
            RejectReason::ValueUnknown => write!(f, "transaction value unknown"),
        }
    }
}

/// Eligibility filter chain
///
/// Pure: holds only configuration and performs no I/O.
#[derive(Debug, Clone, Default)]
pub struct EligibilityFilter {
    excluded: HashSet<String>,
    min_transaction_usd: Option<Decimal>,
}

impl EligibilityFilter {
    /// Create a new filter from the pipeline config section
    pub fn new(config: &PipelineConfig) -> Self {
        Self {
            excluded: config
                .excluded_addresses
                .iter()
                .map(|a| a.trim().to_string())
                .filter(|a| !a.is_empty())
                .collect(),
            min_transaction_usd: config.min_transaction_usd,
        }
    }

    pub fn min_transaction_usd(&self) -> Option<Decimal> {
        self.min_transaction_usd
    }

    /// Address check, run before any lookup
    pub fn check_address(&self, address: &str) -> FilterResult {
        if self.excluded.contains(address) {
            return FilterResult::Reject(RejectReason::ExcludedAddress);
        }
        FilterResult::Pass
    }

    /// Apply the identity filters to a resolved token
    pub fn apply(&self, identity: &TokenIdentity) -> FilterResult {
        if let FilterResult::Reject(reason) = self.check_address(&identity.address) {
            return FilterResult::Reject(reason);
        }

        if !identity.is_resolved() {
            return FilterResult::Reject(RejectReason::UnknownToken);
        }

        if let Some(minimum) = self.min_transaction_usd {
            match identity.transaction_value {
                None => return FilterResult::Reject(RejectReason::ValueUnknown),
                Some(value) if value < minimum => {
                    return FilterResult::Reject(RejectReason::BelowThreshold { value, minimum });
                }
                Some(_) => {}
            }
        }

        FilterResult::Pass
    }
}
