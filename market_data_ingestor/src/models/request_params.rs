use chrono::{DateTime, Utc};
use serde::{Deserialize, Serialize};

use crate::{
    models::timeframe::TimeFrame,
    providers::alpaca_rest::params::AlpacaBarsParams,
};

/// Universal parameters for requesting time-series bar data from any market data provider.
///
/// This struct is vendor-agnostic and is the standard input for all
/// [`DataProvider`](crate::providers::DataProvider) implementations.
#[derive(Clone, Debug, Serialize, Deserialize)]
pub struct BarsRequestParams {
    /// List of symbols to request (e.g., `["AAPL", "SPY"]`).
    pub symbols: Vec<String>,

    /// The time interval for each bar (e.g., 1 day, 1 week).
    ///
    /// Validation of allowed values is performed by each data provider
    /// implementation, according to their own API rules.
    pub timeframe: TimeFrame,

    /// Start of the requested time range (inclusive, UTC).
    pub start: DateTime<Utc>,

    /// End of the requested time range (exclusive, UTC).
    pub end: DateTime<Utc>,

    /// Optional, provider-specific parameters.
    #[serde(default)]
    pub provider_specific: ProviderParams,
}

impl BarsRequestParams {
    /// Request with no provider-specific options.
    pub fn new(
        symbols: Vec<String>,
        timeframe: TimeFrame,
        start: DateTime<Utc>,
        end: DateTime<Utc>,
    ) -> Self {
        Self {
            symbols,
            timeframe,
            start,
            end,
            provider_specific: ProviderParams::None,
        }
    }

    /// Provider-independent sanity checks: at least one symbol and a
    /// non-empty half-open range.
    pub fn check(&self) -> Result<(), String> {
        if self.symbols.is_empty() {
            return Err("at least one symbol is required".into());
        }
        if let Some(blank) = self.symbols.iter().position(|s| s.trim().is_empty()) {
            return Err(format!("symbol at position {blank} is blank"));
        }
        if self.start >= self.end {
            return Err(format!(
                "empty date range: start {} is not before end {}",
                self.start, self.end
            ));
        }
        Ok(())
    }
}

/// An enum to hold provider-specific request parameters.
///
/// This allows callers to specify detailed, per-request options for a
/// particular provider without cluttering the universal `BarsRequestParams`.
#[derive(Clone, Debug, Default, Serialize, Deserialize)]
pub enum ProviderParams {
    #[default]
    None,
    Alpaca(AlpacaBarsParams),
}
