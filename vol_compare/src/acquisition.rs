//! Boundary between the data provider and the engine.
//!
//! Every requested symbol comes back either as a non-empty [`BarSeries`] or as
//! an [`AcquisitionError::NoData`]; the engine never sees an empty series.

use indexmap::IndexMap;
use market_data_ingestor::{
    models::{
        bar::BarSeries,
        request_params::{BarsRequestParams, ProviderParams},
        timeframe::TimeFrame,
    },
    providers::{
        DataProvider, InitSnafu, ProviderError,
        alpaca_rest::{AlpacaBarsParams, AlpacaProvider},
        fixture::FixtureProvider,
    },
};
use snafu::ResultExt;
use thiserror::Error;
use tracing::{info, warn};
use volatility_engine::Frequency;

use crate::config::{ProviderCfg, RunSettings};

/// Why a symbol has no usable prices.
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum NoDataReason {
    /// The provider request failed (network, auth, validation...).
    ProviderFailed(String),
    /// The provider returned nothing for the symbol: unknown ticker or no bars in range.
    NotReturned,
    /// The provider returned the symbol with zero bars.
    Empty,
}

impl std::fmt::Display for NoDataReason {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        match self {
            NoDataReason::ProviderFailed(message) => write!(f, "provider failed: {message}"),
            NoDataReason::NotReturned => write!(f, "unknown symbol or no bars in range"),
            NoDataReason::Empty => write!(f, "empty series"),
        }
    }
}

#[derive(Debug, Clone, PartialEq, Eq, Error)]
pub enum AcquisitionError {
    #[error("no data for {symbol}: {reason}")]
    NoData { symbol: String, reason: NoDataReason },
}

/// Bar interval requested for a reporting frequency.
pub fn timeframe_for(frequency: Frequency) -> TimeFrame {
    match frequency {
        Frequency::Daily => TimeFrame::day(),
        Frequency::Weekly => TimeFrame::week(),
        Frequency::Monthly => TimeFrame::month(),
    }
}

/// Builds the provider named by the run configuration.
pub fn build_provider(cfg: &ProviderCfg) -> Result<Box<dyn DataProvider>, ProviderError> {
    match cfg {
        ProviderCfg::Alpaca { .. } => Ok(Box::new(AlpacaProvider::new().context(InitSnafu)?)),
        ProviderCfg::Fixture { path } => Ok(Box::new(
            FixtureProvider::from_path(path).context(InitSnafu)?,
        )),
    }
}

pub fn request_for(settings: &RunSettings) -> BarsRequestParams {
    let mut params = BarsRequestParams::new(
        settings.symbols.clone(),
        timeframe_for(settings.frequency),
        settings.start,
        settings.end,
    );
    if let ProviderCfg::Alpaca { adjustment, feed } = &settings.provider {
        params.provider_specific = ProviderParams::Alpaca(AlpacaBarsParams {
            adjustment: *adjustment,
            feed: *feed,
        });
    }
    params
}

/// Fetches every requested symbol, keyed in request order.
pub async fn acquire(
    provider: &dyn DataProvider,
    settings: &RunSettings,
) -> IndexMap<String, Result<BarSeries, AcquisitionError>> {
    let params = request_for(settings);
    info!(
        provider = provider.name(),
        symbols = ?settings.symbols,
        timeframe = %params.timeframe,
        start = %settings.start,
        end = %settings.end,
        "fetching bars"
    );

    match provider.fetch_bars(params).await {
        Ok(series) => collect_by_symbol(&settings.symbols, series),
        Err(err) => {
            warn!(provider = provider.name(), error = %err, "bar request failed");
            let message = err.to_string();
            settings
                .symbols
                .iter()
                .map(|symbol| {
                    let reason = NoDataReason::ProviderFailed(message.clone());
                    (symbol.clone(), Err(no_data(symbol, reason)))
                })
                .collect()
        }
    }
}

fn no_data(symbol: &str, reason: NoDataReason) -> AcquisitionError {
    AcquisitionError::NoData {
        symbol: symbol.to_string(),
        reason,
    }
}

/// Matches provider output back to the requested symbols.
pub fn collect_by_symbol(
    requested: &[String],
    series: Vec<BarSeries>,
) -> IndexMap<String, Result<BarSeries, AcquisitionError>> {
    let mut by_symbol: IndexMap<String, BarSeries> = series
        .into_iter()
        .map(|s| (s.symbol.to_uppercase(), s))
        .collect();

    requested
        .iter()
        .map(|symbol| {
            let outcome = match by_symbol.swap_remove(symbol) {
                Some(s) if s.is_empty() => Err(no_data(symbol, NoDataReason::Empty)),
                Some(s) => Ok(s),
                None => Err(no_data(symbol, NoDataReason::NotReturned)),
            };
            (symbol.clone(), outcome)
        })
        .collect()
}
