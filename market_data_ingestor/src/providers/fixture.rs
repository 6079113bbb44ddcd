//! Offline provider backed by a JSON file of bars per symbol.
//!
//! The file maps each symbol to an array of bars. Only `timestamp` and
//! `close` are required; missing open/high/low default to the close and a
//! missing volume to zero:
//!
//! ```json
//! {
//!   "AAPL": [
//!     { "timestamp": "2024-01-02T00:00:00Z", "close": 185.64 },
//!     { "timestamp": "2024-01-03T00:00:00Z", "close": 184.25, "volume": 58414460 }
//!   ]
//! }
//! ```
//!
//! Symbol keys are matched case-insensitively.

use std::path::Path;

use async_trait::async_trait;
use chrono::{DateTime, Utc};
use indexmap::IndexMap;
use serde::Deserialize;
use snafu::ResultExt;
use tracing::debug;

use crate::{
    models::{
        bar::{Bar, BarSeries},
        request_params::BarsRequestParams,
    },
    providers::{
        DataProvider, FixtureParseSnafu, FixtureReadSnafu, ProviderError, ProviderInitError,
        ValidationSnafu,
    },
};

#[derive(Debug, Clone, Deserialize)]
struct FixtureBar {
    timestamp: DateTime<Utc>,
    close: f64,
    #[serde(default)]
    open: Option<f64>,
    #[serde(default)]
    high: Option<f64>,
    #[serde(default)]
    low: Option<f64>,
    #[serde(default)]
    volume: Option<f64>,
}

impl From<FixtureBar> for Bar {
    fn from(fb: FixtureBar) -> Self {
        Bar {
            timestamp: fb.timestamp,
            open: fb.open.unwrap_or(fb.close),
            high: fb.high.unwrap_or(fb.close),
            low: fb.low.unwrap_or(fb.close),
            close: fb.close,
            volume: fb.volume.unwrap_or(0.0),
            trade_count: None,
            vwap: None,
        }
    }
}

/// Serves bars from memory. The requested timeframe is echoed back, not resampled.
pub struct FixtureProvider {
    /// Keyed by upper-cased symbol.
    bars: IndexMap<String, Vec<Bar>>,
}

impl FixtureProvider {
    /// Keys differing only in case are merged in file order.
    pub fn from_bars(bars: IndexMap<String, Vec<Bar>>) -> Self {
        let mut by_symbol: IndexMap<String, Vec<Bar>> = IndexMap::with_capacity(bars.len());
        for (symbol, bars) in bars {
            by_symbol
                .entry(symbol.trim().to_uppercase())
                .or_default()
                .extend(bars);
        }
        Self { bars: by_symbol }
    }

    pub fn from_json_str(json: &str) -> Result<Self, serde_json::Error> {
        let raw: IndexMap<String, Vec<FixtureBar>> = serde_json::from_str(json)?;
        let bars = raw
            .into_iter()
            .map(|(symbol, bars)| (symbol, bars.into_iter().map(Bar::from).collect()))
            .collect();
        Ok(Self::from_bars(bars))
    }

    pub fn from_path(path: impl AsRef<Path>) -> Result<Self, ProviderInitError> {
        let path = path.as_ref();
        let text = std::fs::read_to_string(path).context(FixtureReadSnafu { path })?;
        Self::from_json_str(&text).context(FixtureParseSnafu { path })
    }

    pub fn symbols(&self) -> impl Iterator<Item = &str> {
        self.bars.keys().map(String::as_str)
    }
}

#[async_trait]
impl DataProvider for FixtureProvider {
    fn name(&self) -> &'static str {
        "fixture"
    }

    async fn fetch_bars(&self, params: BarsRequestParams) -> Result<Vec<BarSeries>, ProviderError> {
        if let Err(message) = params.check() {
            return ValidationSnafu { message }.fail();
        }

        let result: Vec<BarSeries> = params
            .symbols
            .iter()
            .filter_map(|symbol| {
                let bars: Vec<Bar> = self
                    .bars
                    .get(&symbol.trim().to_uppercase())?
                    .iter()
                    .filter(|b| b.timestamp >= params.start && b.timestamp < params.end)
                    .cloned()
                    .collect();
                (!bars.is_empty()).then(|| BarSeries {
                    symbol: symbol.clone(),
                    timeframe: params.timeframe.clone(),
                    bars,
                })
            })
            .collect();

        debug!(
            requested = params.symbols.len(),
            returned = result.len(),
            "fixture bars served"
        );
        Ok(result)
    }
}
