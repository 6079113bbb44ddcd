//! Per-step returns derived from a [`PriceSeries`], plus the small set of
//! sample statistics the engine needs.

use std::{fmt, str::FromStr};

use serde::{Deserialize, Serialize};

use crate::{
    errors::{EngineError, MalformedInput},
    price_series::PriceSeries,
};

/// How a step from `P_{i-1}` to `P_i` is turned into a return.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Default, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum ReturnConvention {
    /// `ln(P_i / P_{i-1})`
    #[default]
    Log,
    /// `P_i / P_{i-1} - 1`
    Simple,
}

impl ReturnConvention {
    /// Return for a single step. Both prices must be positive.
    pub fn step(self, previous: f64, current: f64) -> f64 {
        let ratio = current / previous;
        match self {
            ReturnConvention::Log => ratio.ln(),
            ReturnConvention::Simple => ratio - 1.0,
        }
    }
}

impl fmt::Display for ReturnConvention {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            ReturnConvention::Log => write!(f, "log"),
            ReturnConvention::Simple => write!(f, "simple"),
        }
    }
}

impl FromStr for ReturnConvention {
    type Err = EngineError;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        match s.trim().to_lowercase().as_str() {
            "log" | "ln" | "logarithmic" => Ok(ReturnConvention::Log),
            "simple" | "pct" | "percentage" => Ok(ReturnConvention::Simple),
            other => Err(EngineError::invalid_config(format!(
                "unknown return convention: {other:?}"
            ))),
        }
    }
}

/// Returns derived from a price series, one element shorter than the series.
#[derive(Debug, Clone, PartialEq)]
pub struct ReturnSeries {
    convention: ReturnConvention,
    values: Vec<f64>,
}

impl ReturnSeries {
    /// Computes `|series| - 1` returns under `convention`.
    ///
    /// # Errors
    ///
    /// [`MalformedInput::NonFiniteReturn`] when a price ratio leaves the
    /// range of `f64`, e.g. a step from `1e-300` to `1e300`.
    pub fn from_prices(
        series: &PriceSeries,
        convention: ReturnConvention,
    ) -> Result<Self, EngineError> {
        let values = series
            .points()
            .windows(2)
            .enumerate()
            .map(|(index, pair)| {
                let value = convention.step(pair[0].price, pair[1].price);
                if value.is_finite() {
                    Ok(value)
                } else {
                    Err(MalformedInput::NonFiniteReturn { index, value })
                }
            })
            .collect::<Result<Vec<_>, _>>()?;
        Ok(Self { convention, values })
    }

    pub fn convention(&self) -> ReturnConvention {
        self.convention
    }

    pub fn values(&self) -> &[f64] {
        &self.values
    }

    pub fn len(&self) -> usize {
        self.values.len()
    }

    pub fn is_empty(&self) -> bool {
        self.values.is_empty()
    }

    /// Strictly negative returns, in order. Zeros are excluded.
    pub fn downside(&self) -> Vec<f64> {
        self.values.iter().copied().filter(|r| *r < 0.0).collect()
    }

    /// Strictly positive returns, in order. Zeros are excluded.
    pub fn upside(&self) -> Vec<f64> {
        self.values.iter().copied().filter(|r| *r > 0.0).collect()
    }
}

/// Arithmetic mean; `None` for an empty slice.
pub(crate) fn mean(values: &[f64]) -> Option<f64> {
    if values.is_empty() {
        return None;
    }
    Some(values.iter().sum::<f64>() / values.len() as f64)
}

/// Sample standard deviation (N-1 denominator); `None` below two values.
pub(crate) fn sample_std_dev(values: &[f64]) -> Option<f64> {
    if values.len() < 2 {
        return None;
    }
    let n = values.len() as f64;
    let m = values.iter().sum::<f64>() / n;
    let var = values
        .iter()
        .map(|r| {
            let diff = r - m;
            diff * diff
        })
        .sum::<f64>()
        / (n - 1.0);
    Some(var.sqrt())
}
