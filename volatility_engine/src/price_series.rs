//! Validated in-memory price history for a single symbol.
//!
//! A [`PriceSeries`] can only be obtained through [`PriceSeries::new`] (or
//! [`PriceSeries::from_closes`]), both of which reject input the engine cannot
//! turn into returns: fewer than two points, non-positive or non-finite prices,
//! and timestamps that are duplicated or out of order.

use chrono::{DateTime, Utc};
use serde::{Deserialize, Serialize};

use crate::errors::{EngineError, MalformedInput};

/// One observation: a price at a UTC timestamp.
#[derive(Debug, Clone, Copy, PartialEq, Serialize, Deserialize)]
pub struct PricePoint {
    pub timestamp: DateTime<Utc>,
    pub price: f64,
}

impl PricePoint {
    pub const fn new(timestamp: DateTime<Utc>, price: f64) -> Self {
        Self { timestamp, price }
    }
}

/// An ordered, validated sequence of [`PricePoint`]s for one symbol.
///
/// Timestamps are strictly increasing and every price is positive and finite,
/// so log returns are defined at every step.
#[derive(Debug, Clone, PartialEq, Serialize)]
pub struct PriceSeries {
    symbol: String,
    points: Vec<PricePoint>,
}

impl PriceSeries {
    /// Builds a series, reporting the first offending index on failure.
    ///
    /// # Errors
    ///
    /// [`EngineError::MalformedInput`] when the series has fewer than two
    /// points, a price is not a positive finite number, or a timestamp does
    /// not strictly follow its predecessor.
    pub fn new(symbol: impl Into<String>, points: Vec<PricePoint>) -> Result<Self, EngineError> {
        if points.len() < 2 {
            return Err(MalformedInput::TooFewPoints { len: points.len() }.into());
        }

        let mut previous: Option<DateTime<Utc>> = None;
        for (index, point) in points.iter().enumerate() {
            if !point.price.is_finite() || point.price <= 0.0 {
                return Err(MalformedInput::InvalidPrice {
                    index,
                    price: point.price,
                }
                .into());
            }
            if previous.is_some_and(|prev| point.timestamp <= prev) {
                return Err(MalformedInput::NonMonotonicTimestamp {
                    index,
                    timestamp: point.timestamp,
                }
                .into());
            }
            previous = Some(point.timestamp);
        }

        Ok(Self {
            symbol: symbol.into(),
            points,
        })
    }

    /// Convenience constructor from `(timestamp, close)` pairs.
    pub fn from_closes<I>(symbol: impl Into<String>, closes: I) -> Result<Self, EngineError>
    where
        I: IntoIterator<Item = (DateTime<Utc>, f64)>,
    {
        let points = closes
            .into_iter()
            .map(|(timestamp, price)| PricePoint::new(timestamp, price))
            .collect();
        Self::new(symbol, points)
    }

    pub fn symbol(&self) -> &str {
        &self.symbol
    }

    pub fn points(&self) -> &[PricePoint] {
        &self.points
    }

    pub fn prices(&self) -> impl Iterator<Item = f64> + '_ {
        self.points.iter().map(|p| p.price)
    }

    pub fn len(&self) -> usize {
        self.points.len()
    }

    /// Always `false`: a constructed series holds at least two points.
    pub fn is_empty(&self) -> bool {
        self.points.is_empty()
    }

    /// First and last timestamps of the series.
    pub fn date_range(&self) -> (DateTime<Utc>, DateTime<Utc>) {
        // len >= 2 is enforced by `new`
        let first = self.points[0].timestamp;
        let last = self.points[self.points.len() - 1].timestamp;
        (first, last)
    }
}
