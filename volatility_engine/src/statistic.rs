use std::fmt;

use serde::{Deserialize, Serialize};

/// Which slice of the return series a statistic describes.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum VolatilityKind {
    /// All returns.
    Total,
    /// Strictly negative returns only.
    Downside,
    /// Strictly positive returns only.
    Upside,
}

impl VolatilityKind {
    pub const ALL: [VolatilityKind; 3] = [
        VolatilityKind::Total,
        VolatilityKind::Downside,
        VolatilityKind::Upside,
    ];

    /// Chart legend label.
    pub const fn label(self) -> &'static str {
        match self {
            VolatilityKind::Total => "Volatility",
            VolatilityKind::Downside => "Downside Volatility",
            VolatilityKind::Upside => "Upside Volatility",
        }
    }
}

impl fmt::Display for VolatilityKind {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        let s = match self {
            VolatilityKind::Total => "total",
            VolatilityKind::Downside => "downside",
            VolatilityKind::Upside => "upside",
        };
        f.write_str(s)
    }
}

/// A period-scaled mean return paired with a period-scaled volatility.
#[derive(Debug, Clone, Copy, PartialEq, Serialize)]
pub struct VolatilityStatistic {
    pub kind: VolatilityKind,
    pub mean_return: f64,
    pub volatility: f64,
}

/// One point of a return/volatility chart: a defined statistic and its symbol.
#[derive(Debug, Clone, PartialEq, Serialize)]
pub struct VolatilityRecord {
    pub symbol: String,
    pub kind: VolatilityKind,
    #[serde(rename = "return")]
    pub mean_return: f64,
    pub volatility: f64,
}

impl VolatilityRecord {
    pub fn new(symbol: impl Into<String>, statistic: &VolatilityStatistic) -> Self {
        Self {
            symbol: symbol.into(),
            kind: statistic.kind,
            mean_return: statistic.mean_return,
            volatility: statistic.volatility,
        }
    }
}
