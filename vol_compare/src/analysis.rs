use indexmap::IndexMap;
use market_data_ingestor::{models::bar::BarSeries, providers::DataProvider};
use thiserror::Error;
use tracing::{info, warn};
use volatility_engine::{EngineError, PriceSeries, VolatilityEngine, VolatilityReport};

use crate::{
    acquisition::{AcquisitionError, acquire},
    config::RunSettings,
};

/// Why a symbol produced no report at all.
#[derive(Debug, Clone, PartialEq, Error)]
pub enum SymbolError {
    #[error(transparent)]
    NoData(#[from] AcquisitionError),

    #[error(transparent)]
    Engine(#[from] EngineError),
}

#[derive(Debug, Clone, PartialEq)]
pub struct SymbolResult {
    pub symbol: String,
    pub outcome: Result<VolatilityReport, SymbolError>,
}

/// Counts for the end-of-run summary line.
#[derive(Debug, Default, Clone, Copy, PartialEq, Eq)]
pub struct RunSummary {
    /// All three statistics defined.
    pub complete: usize,
    /// Total defined, downside and/or upside undefined.
    pub partial: usize,
    pub failed: usize,
}

impl RunSummary {
    pub fn from_results(results: &[SymbolResult]) -> Self {
        results
            .iter()
            .fold(RunSummary::default(), |mut acc, r| {
                match &r.outcome {
                    Ok(report) if report.is_complete() => acc.complete += 1,
                    Ok(_) => acc.partial += 1,
                    Err(_) => acc.failed += 1,
                }
                acc
            })
    }
}

fn analyze_symbol(
    engine: &VolatilityEngine,
    symbol: &str,
    bars: Result<BarSeries, AcquisitionError>,
) -> Result<VolatilityReport, SymbolError> {
    let bars = bars?;
    let series = PriceSeries::from_closes(symbol, bars.closes())?;
    Ok(engine.analyze(&series)?)
}

/// Runs the engine over every acquired symbol. One symbol's failure never
/// affects another's result.
pub fn analyze_acquired(
    engine: &VolatilityEngine,
    acquired: IndexMap<String, Result<BarSeries, AcquisitionError>>,
) -> Vec<SymbolResult> {
    acquired
        .into_iter()
        .map(|(symbol, bars)| {
            let outcome = analyze_symbol(engine, &symbol, bars);
            match &outcome {
                Ok(report) => {
                    for err in [&report.downside, &report.upside]
                        .into_iter()
                        .filter_map(|r| r.as_ref().err())
                    {
                        warn!(symbol = %symbol, error = %err, "statistic undefined");
                    }
                }
                Err(err) => warn!(symbol = %symbol, error = %err, "symbol skipped"),
            }
            SymbolResult { symbol, outcome }
        })
        .collect()
}

/// Fetch then analyze, using the settings' convention and scale.
pub async fn run(provider: &dyn DataProvider, settings: &RunSettings) -> Vec<SymbolResult> {
    let engine = VolatilityEngine::new(settings.convention, settings.scale);
    let acquired = acquire(provider, settings).await;
    let results = analyze_acquired(&engine, acquired);

    let summary = RunSummary::from_results(&results);
    info!(
        complete = summary.complete,
        partial = summary.partial,
        failed = summary.failed,
        "analysis finished"
    );
    results
}
