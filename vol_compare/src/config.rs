//! Run configuration: parsing, normalization, and resolution.
//!
//! A run is described by a TOML file (or the equivalent CLI flags):
//!
//! ```toml
//! symbols = ["AAPL", "msft", " spy "]
//! start = "2015-01-01"
//! end = "2025-01-01"
//! frequency = "1mo"
//! convention = "log"
//!
//! [provider]
//! kind = "fixture"
//! path = "prices.json"
//! ```
//!
//! Key behaviors:
//! - Symbols are trimmed, upper-cased and de-duplicated preserving order;
//!   blank entries are dropped. Comma-separated entries are split.
//! - `start` defaults to 1950-01-01 and `end` to the current UTC date. The
//!   range is half-open: bars at or after `end` are not requested.
//! - `frequency` must resolve to a known reporting frequency; there is no
//!   fallback.
//!
//! [`AnalysisConfig::resolve`] turns the raw file into [`RunSettings`].

use std::{collections::HashSet, path::PathBuf};

use anyhow::{Context, bail};
use chrono::{DateTime, NaiveDate, Utc};
use clap::ValueEnum;
use market_data_ingestor::providers::alpaca_rest::{Adjustment, Feed};
use serde::{Deserialize, Serialize};
use volatility_engine::{Frequency, ReturnConvention, ScaleConfig};

/// Where prices come from.
#[derive(Debug, Clone, PartialEq, Eq, Deserialize, Serialize)]
#[serde(tag = "kind", rename_all = "snake_case", deny_unknown_fields)]
pub enum ProviderCfg {
    /// Alpaca market data REST API (keys from the environment).
    Alpaca {
        #[serde(default)]
        adjustment: Option<Adjustment>,
        #[serde(default)]
        feed: Option<Feed>,
    },
    /// JSON file of bars per symbol.
    Fixture { path: PathBuf },
}

impl Default for ProviderCfg {
    fn default() -> Self {
        ProviderCfg::Alpaca {
            // split/dividend adjusted closes, like the adjusted close column of most chart tools
            adjustment: Some(Adjustment::All),
            feed: None,
        }
    }
}

/// Provider selector for the command line; the TOML form is [`ProviderCfg`].
#[derive(Debug, Clone, Copy, PartialEq, Eq, ValueEnum)]
pub enum ProviderKind {
    Alpaca,
    Fixture,
}

/// Raw, user-facing run configuration.
#[derive(Debug, Clone, Default, Deserialize, Serialize)]
#[serde(deny_unknown_fields)]
pub struct AnalysisConfig {
    /// Ticker symbols; entries may themselves be comma-separated lists.
    #[serde(default)]
    pub symbols: Vec<String>,
    pub start: Option<NaiveDate>,
    pub end: Option<NaiveDate>,
    /// Sampling frequency of the prices (`daily`/`1d`, `weekly`/`1wk`, `monthly`/`1mo`).
    pub frequency: Option<String>,
    /// `log` (default) or `simple`.
    pub convention: Option<String>,
    #[serde(default)]
    pub provider: ProviderCfg,
}

/// Fully validated settings for one run.
#[derive(Debug, Clone, PartialEq)]
pub struct RunSettings {
    pub symbols: Vec<String>,
    pub start: DateTime<Utc>,
    pub end: DateTime<Utc>,
    pub frequency: Frequency,
    pub convention: ReturnConvention,
    pub scale: ScaleConfig,
    pub provider: ProviderCfg,
}

pub fn default_start() -> NaiveDate {
    NaiveDate::from_ymd_opt(1950, 1, 1).unwrap_or(NaiveDate::MIN)
}

/// Splits on commas, trims, upper-cases, drops blanks and duplicates.
pub fn normalize_symbols<I, S>(raw: I) -> Vec<String>
where
    I: IntoIterator<Item = S>,
    S: AsRef<str>,
{
    let mut seen = HashSet::new();
    let mut out = Vec::new();
    for entry in raw {
        for symbol in entry.as_ref().split(',') {
            let symbol = symbol.trim().to_uppercase();
            if !symbol.is_empty() && seen.insert(symbol.clone()) {
                out.push(symbol);
            }
        }
    }
    out
}

fn midnight_utc(date: NaiveDate) -> DateTime<Utc> {
    date.and_time(chrono::NaiveTime::MIN).and_utc()
}

impl AnalysisConfig {
    /// Applies `--provider` and `--fixture` on top of the file's provider.
    ///
    /// A fixture path alone selects the fixture provider. Re-selecting the
    /// provider the file already names keeps its options (Alpaca adjustment
    /// and feed, fixture path).
    pub fn override_provider(
        &mut self,
        kind: Option<ProviderKind>,
        fixture: Option<PathBuf>,
    ) -> anyhow::Result<()> {
        self.provider = match (kind, fixture, &self.provider) {
            (None, None, _) => return Ok(()),
            (Some(ProviderKind::Alpaca), Some(path), _) => {
                bail!("--fixture {} conflicts with --provider alpaca", path.display())
            }
            (Some(ProviderKind::Alpaca), None, ProviderCfg::Alpaca { .. }) => return Ok(()),
            (Some(ProviderKind::Alpaca), None, ProviderCfg::Fixture { .. }) => {
                ProviderCfg::default()
            }
            (None | Some(ProviderKind::Fixture), Some(path), _) => ProviderCfg::Fixture { path },
            (Some(ProviderKind::Fixture), None, ProviderCfg::Fixture { .. }) => return Ok(()),
            (Some(ProviderKind::Fixture), None, ProviderCfg::Alpaca { .. }) => {
                bail!("--provider fixture needs a fixture file (--fixture <FILE>)")
            }
        };
        Ok(())
    }

    /// Validates and resolves the config against `today` (used when `end` is unset).
    ///
    /// Errors:
    /// - no symbols after normalization
    /// - `start` not before `end`
    /// - missing or unknown frequency, unknown return convention
    pub fn resolve(self, today: NaiveDate) -> anyhow::Result<RunSettings> {
        let symbols = normalize_symbols(&self.symbols);
        if symbols.is_empty() {
            bail!("no symbols given");
        }

        let start = self.start.unwrap_or_else(default_start);
        let end = self.end.unwrap_or(today);
        if start >= end {
            bail!("start date {start} must be before end date {end}");
        }

        let frequency_str = self
            .frequency
            .context("a reporting frequency is required (daily, weekly or monthly)")?;
        let frequency: Frequency = frequency_str
            .parse()
            .with_context(|| format!("resolve frequency {frequency_str:?}"))?;

        let convention: ReturnConvention = match &self.convention {
            Some(c) => c
                .parse()
                .with_context(|| format!("resolve return convention {c:?}"))?,
            None => ReturnConvention::default(),
        };

        Ok(RunSettings {
            symbols,
            start: midnight_utc(start),
            end: midnight_utc(end),
            frequency,
            convention,
            scale: ScaleConfig::for_frequency(frequency),
            provider: self.provider,
        })
    }
}

/// Parse a run configuration from a TOML string.
pub fn load_config_str(toml_str: &str) -> anyhow::Result<AnalysisConfig> {
    toml::from_str(toml_str).context("failed to parse run configuration TOML")
}

/// Read a run configuration TOML file from disk and parse it.
pub fn load_config_path(path: impl AsRef<std::path::Path>) -> anyhow::Result<AnalysisConfig> {
    let text = std::fs::read_to_string(path.as_ref())
        .with_context(|| format!("read config file {}", path.as_ref().display()))?;
    load_config_str(&text)
}
