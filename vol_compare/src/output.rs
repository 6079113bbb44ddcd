//! Rendering of analysis results for a presentation layer.
//!
//! JSON output is a flat list of records, one per symbol and statistic kind,
//! ready to be plotted as volatility (x) against return (y) and colored by
//! symbol. Statistics that could not be computed are listed under `skipped`
//! with their reason instead of being given placeholder values.

use clap::ValueEnum;
use serde::Serialize;
use volatility_engine::{Frequency, ReturnConvention, VolatilityKind, VolatilityRecord};

use crate::analysis::SymbolResult;

#[derive(Debug, Clone, Copy, PartialEq, Eq, Default, ValueEnum)]
pub enum OutputFormat {
    #[default]
    Table,
    Json,
}

#[derive(Debug, Clone, PartialEq, Serialize)]
pub struct PlotRecord {
    pub symbol: String,
    #[serde(rename = "type")]
    pub kind: &'static str,
    #[serde(rename = "return")]
    pub mean_return: f64,
    pub volatility: f64,
}

impl From<VolatilityRecord> for PlotRecord {
    fn from(record: VolatilityRecord) -> Self {
        Self {
            symbol: record.symbol,
            kind: record.kind.label(),
            mean_return: record.mean_return,
            volatility: record.volatility,
        }
    }
}

#[derive(Debug, Clone, PartialEq, Serialize)]
pub struct SkippedRecord {
    pub symbol: String,
    /// `None` when the whole symbol was skipped.
    #[serde(rename = "type")]
    pub kind: Option<&'static str>,
    pub reason: String,
}

#[derive(Debug, Clone, PartialEq, Serialize)]
pub struct PlotData {
    pub frequency: Frequency,
    pub convention: ReturnConvention,
    pub records: Vec<PlotRecord>,
    pub skipped: Vec<SkippedRecord>,
}

impl PlotData {
    pub fn from_results(
        frequency: Frequency,
        convention: ReturnConvention,
        results: &[SymbolResult],
    ) -> Self {
        let mut records = Vec::new();
        let mut skipped = Vec::new();

        for result in results {
            match &result.outcome {
                Ok(report) => {
                    records.extend(report.records().into_iter().map(PlotRecord::from));
                    for (kind, stat) in VolatilityKind::ALL.into_iter().zip(report.statistics()) {
                        if let Err(err) = stat {
                            skipped.push(SkippedRecord {
                                symbol: result.symbol.clone(),
                                kind: Some(kind.label()),
                                reason: err.to_string(),
                            });
                        }
                    }
                }
                Err(err) => skipped.push(SkippedRecord {
                    symbol: result.symbol.clone(),
                    kind: None,
                    reason: err.to_string(),
                }),
            }
        }

        Self {
            frequency,
            convention,
            records,
            skipped,
        }
    }
}

pub fn render_json(data: &PlotData) -> serde_json::Result<String> {
    serde_json::to_string_pretty(data)
}

/// Aligned text table, one row per symbol and kind.
pub fn render_table(results: &[SymbolResult]) -> String {
    let mut out = format!(
        "{:<10} {:<20} {:>12} {:>12}\n",
        "SYMBOL", "TYPE", "RETURN", "VOLATILITY"
    );

    for result in results {
        match &result.outcome {
            Ok(report) => {
                for (kind, stat) in VolatilityKind::ALL.into_iter().zip(report.statistics()) {
                    let line = match stat {
                        Ok(stat) => format!(
                            "{:<10} {:<20} {:>12.4} {:>12.4}\n",
                            result.symbol,
                            kind.label(),
                            stat.mean_return,
                            stat.volatility
                        ),
                        Err(err) => format!(
                            "{:<10} {:<20} {:>12} {:>12}  ({err})\n",
                            result.symbol,
                            kind.label(),
                            "n/a",
                            "n/a"
                        ),
                    };
                    out.push_str(&line);
                }
            }
            Err(err) => out.push_str(&format!("{:<10} {:<20} {err}\n", result.symbol, "-")),
        }
    }
    out
}
