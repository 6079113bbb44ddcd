use chrono::{DateTime, Utc};
use thiserror::Error;

use crate::statistic::VolatilityKind;

/// Reasons a price or return series cannot be fed through the engine.
#[derive(Debug, Clone, PartialEq, Error)]
pub enum MalformedInput {
    /// Fewer than two prices, so no return can be formed.
    #[error("price series has {len} point(s); at least 2 are required")]
    TooFewPoints { len: usize },

    /// Fewer than two returns, so the sample deviation is undefined.
    #[error("return series has {len} element(s); at least 2 are required")]
    TooFewReturns { len: usize },

    /// Price is zero, negative, NaN or infinite.
    #[error("price at index {index} is not a positive finite number: {price}")]
    InvalidPrice { index: usize, price: f64 },

    /// Timestamp is equal to or earlier than its predecessor.
    #[error("timestamp at index {index} ({timestamp}) does not strictly follow the previous one")]
    NonMonotonicTimestamp {
        index: usize,
        timestamp: DateTime<Utc>,
    },

    /// Price ratio overflowed or underflowed to an infinite or NaN return.
    /// `index` counts returns, so it is the step from price `index` to `index + 1`.
    #[error("return at index {index} is not finite: {value}")]
    NonFiniteReturn { index: usize, value: f64 },

    /// Returns are finite but the scaled statistic is not representable.
    #[error("{kind} statistic overflows: returns are too large in magnitude")]
    NonFiniteStatistic { kind: VolatilityKind },
}

/// The unified error type for the `volatility_engine` crate.
///
/// Every variant is propagated to the caller as-is; none of them is ever
/// turned into a zero or NaN statistic.
#[derive(Debug, Clone, PartialEq, Error)]
pub enum EngineError {
    /// The input series violates a structural requirement.
    #[error("malformed input: {0}")]
    MalformedInput(#[from] MalformedInput),

    /// Fewer than two strictly negative (or strictly positive) returns.
    #[error("insufficient {kind} data: {observations} observation(s), at least 2 required")]
    InsufficientTailData {
        kind: VolatilityKind,
        observations: usize,
    },

    /// Unknown reporting frequency, unusable scale or mismatched convention.
    #[error("invalid configuration: {message}")]
    InvalidConfiguration { message: String },
}

impl EngineError {
    pub(crate) fn invalid_config(message: impl Into<String>) -> Self {
        Self::InvalidConfiguration {
            message: message.into(),
        }
    }
}
