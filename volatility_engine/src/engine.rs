//! The return/volatility engine.
//!
//! A [`VolatilityEngine`] fixes the return convention and the scale for a
//! whole run, so every symbol analyzed through it is computed the same way.
//! It holds no mutable state: analyzing the same series twice yields
//! bit-identical reports, and symbols can be processed in any order.
//!
//! Downside and upside statistics report the mean of the *full* return
//! series next to the deviation of the filtered subset. Only the deviation
//! is a semi-deviation.
//!
//! Every statistic handed back in `Ok` is finite. Returns or scaled values
//! that leave the range of `f64` are reported as [`MalformedInput`].

use tracing::debug;

use crate::{
    errors::{EngineError, MalformedInput},
    price_series::PriceSeries,
    returns::{ReturnConvention, ReturnSeries, mean, sample_std_dev},
    scale::ScaleConfig,
    statistic::{VolatilityKind, VolatilityRecord, VolatilityStatistic},
};

#[derive(Debug, Clone, Copy, PartialEq)]
pub struct VolatilityEngine {
    convention: ReturnConvention,
    scale: ScaleConfig,
}

impl VolatilityEngine {
    pub const fn new(convention: ReturnConvention, scale: ScaleConfig) -> Self {
        Self { convention, scale }
    }

    pub const fn convention(&self) -> ReturnConvention {
        self.convention
    }

    pub const fn scale(&self) -> ScaleConfig {
        self.scale
    }

    /// Return series under this engine's convention.
    pub fn returns(&self, series: &PriceSeries) -> Result<ReturnSeries, EngineError> {
        ReturnSeries::from_prices(series, self.convention)
    }

    /// Scaled mean and volatility over every return.
    ///
    /// # Errors
    ///
    /// - [`MalformedInput::TooFewReturns`] below two returns.
    /// - [`EngineError::InvalidConfiguration`] if `returns` was computed
    ///   under a different convention than this engine's.
    /// - [`MalformedInput::NonFiniteStatistic`] if the scaled values overflow.
    pub fn total(&self, returns: &ReturnSeries) -> Result<VolatilityStatistic, EngineError> {
        self.check_convention(returns)?;
        let too_few = || MalformedInput::TooFewReturns { len: returns.len() };
        let mean_return = mean(returns.values()).ok_or_else(too_few)?;
        let deviation = sample_std_dev(returns.values()).ok_or_else(too_few)?;

        self.scaled(VolatilityKind::Total, mean_return, deviation)
    }

    /// Full-series mean with the deviation of strictly negative returns.
    pub fn downside(&self, returns: &ReturnSeries) -> Result<VolatilityStatistic, EngineError> {
        self.tail(returns, VolatilityKind::Downside, &returns.downside())
    }

    /// Full-series mean with the deviation of strictly positive returns.
    pub fn upside(&self, returns: &ReturnSeries) -> Result<VolatilityStatistic, EngineError> {
        self.tail(returns, VolatilityKind::Upside, &returns.upside())
    }

    /// Computes all three statistics for one symbol.
    ///
    /// Fails only when the total statistic is undefined; an undefined
    /// downside or upside statistic is carried inside the report.
    pub fn analyze(&self, series: &PriceSeries) -> Result<VolatilityReport, EngineError> {
        let returns = self.returns(series)?;
        debug!(
            symbol = series.symbol(),
            observations = returns.len(),
            convention = %self.convention,
            "computed return series"
        );

        let total = self.total(&returns)?;
        Ok(VolatilityReport {
            symbol: series.symbol().to_string(),
            observations: returns.len(),
            total,
            downside: self.downside(&returns),
            upside: self.upside(&returns),
        })
    }

    /// Analyzes each series independently, preserving input order.
    pub fn analyze_all<'a, I>(
        &self,
        series: I,
    ) -> Vec<(String, Result<VolatilityReport, EngineError>)>
    where
        I: IntoIterator<Item = &'a PriceSeries>,
    {
        series
            .into_iter()
            .map(|s| (s.symbol().to_string(), self.analyze(s)))
            .collect()
    }

    fn tail(
        &self,
        returns: &ReturnSeries,
        kind: VolatilityKind,
        subset: &[f64],
    ) -> Result<VolatilityStatistic, EngineError> {
        self.check_convention(returns)?;
        let mean_return = mean(returns.values())
            .ok_or(MalformedInput::TooFewReturns { len: returns.len() })?;
        let deviation = sample_std_dev(subset).ok_or(EngineError::InsufficientTailData {
            kind,
            observations: subset.len(),
        })?;

        self.scaled(kind, mean_return, deviation)
    }

    fn scaled(
        &self,
        kind: VolatilityKind,
        mean_return: f64,
        deviation: f64,
    ) -> Result<VolatilityStatistic, EngineError> {
        let statistic = VolatilityStatistic {
            kind,
            mean_return: mean_return * self.scale.return_scale(),
            volatility: deviation * self.scale.vol_scale(),
        };
        if !(statistic.mean_return.is_finite() && statistic.volatility.is_finite()) {
            return Err(MalformedInput::NonFiniteStatistic { kind }.into());
        }
        Ok(statistic)
    }

    fn check_convention(&self, returns: &ReturnSeries) -> Result<(), EngineError> {
        if returns.convention() != self.convention {
            return Err(EngineError::invalid_config(format!(
                "return series uses the {} convention but the engine is configured for {}",
                returns.convention(),
                self.convention
            )));
        }
        Ok(())
    }
}

/// Total, downside and upside statistics for one symbol.
#[derive(Debug, Clone, PartialEq)]
pub struct VolatilityReport {
    pub symbol: String,
    /// Number of returns the statistics were computed from.
    pub observations: usize,
    pub total: VolatilityStatistic,
    pub downside: Result<VolatilityStatistic, EngineError>,
    pub upside: Result<VolatilityStatistic, EngineError>,
}

impl VolatilityReport {
    /// All three outcomes in `Total, Downside, Upside` order.
    pub fn statistics(&self) -> [Result<&VolatilityStatistic, &EngineError>; 3] {
        [Ok(&self.total), self.downside.as_ref(), self.upside.as_ref()]
    }

    /// Only the defined statistics.
    pub fn defined(&self) -> impl Iterator<Item = &VolatilityStatistic> {
        self.statistics().into_iter().filter_map(Result::ok)
    }

    /// The defined statistics tagged with this report's symbol, in kind order.
    pub fn records(&self) -> Vec<VolatilityRecord> {
        self.defined()
            .map(|stat| VolatilityRecord::new(&self.symbol, stat))
            .collect()
    }

    pub fn is_complete(&self) -> bool {
        self.downside.is_ok() && self.upside.is_ok()
    }
}
