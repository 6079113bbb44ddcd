//! Reporting frequencies and the scaling constants they select.
//!
//! Per-step statistics are scaled to a reporting period with two constants:
//! the mean return is multiplied by [`ScaleConfig::return_scale`] and the
//! sample deviation by [`ScaleConfig::vol_scale`]. For a [`Frequency`] the
//! return scale is its number of periods per year and the volatility scale is
//! its square root (random-walk scaling).
//!
//! ```
//! use volatility_engine::scale::{resolve_scale, Frequency, ScaleConfig};
//!
//! let daily = resolve_scale("1d").unwrap();
//! assert_eq!(daily, ScaleConfig::for_frequency(Frequency::Daily));
//! assert_eq!(daily.return_scale(), 252.0);
//! assert!(resolve_scale("hourly").is_err());
//! ```

use std::{fmt, str::FromStr};

use serde::{Deserialize, Serialize};

use crate::errors::EngineError;

/// Sampling frequency of the input prices.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum Frequency {
    Daily,
    Weekly,
    Monthly,
}

impl Frequency {
    pub const ALL: [Frequency; 3] = [Frequency::Daily, Frequency::Weekly, Frequency::Monthly];

    /// Periods per year used to annualize statistics at this frequency.
    pub const fn timescale(self) -> u32 {
        match self {
            Frequency::Daily => 252,
            Frequency::Weekly => 50,
            Frequency::Monthly => 12,
        }
    }
}

impl fmt::Display for Frequency {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        let s = match self {
            Frequency::Daily => "daily",
            Frequency::Weekly => "weekly",
            Frequency::Monthly => "monthly",
        };
        f.write_str(s)
    }
}

impl FromStr for Frequency {
    type Err = EngineError;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        match s.trim().to_lowercase().as_str() {
            "d" | "1d" | "day" | "daily" => Ok(Frequency::Daily),
            "w" | "1w" | "1wk" | "week" | "weekly" => Ok(Frequency::Weekly),
            "mo" | "1mo" | "month" | "monthly" => Ok(Frequency::Monthly),
            other => Err(EngineError::invalid_config(format!(
                "unknown reporting frequency: {other:?}"
            ))),
        }
    }
}

/// Return and volatility multipliers for one analysis run.
#[derive(Debug, Clone, Copy, PartialEq, Serialize)]
pub struct ScaleConfig {
    return_scale: f64,
    vol_scale: f64,
}

impl ScaleConfig {
    /// Explicit constants. Both must be finite and strictly positive.
    pub fn new(return_scale: f64, vol_scale: f64) -> Result<Self, EngineError> {
        for (name, value) in [("return_scale", return_scale), ("vol_scale", vol_scale)] {
            if !value.is_finite() || value <= 0.0 {
                return Err(EngineError::invalid_config(format!(
                    "{name} must be a positive finite number, got {value}"
                )));
            }
        }
        Ok(Self {
            return_scale,
            vol_scale,
        })
    }

    /// `return_scale = timescale`, `vol_scale = sqrt(timescale)`.
    pub fn from_timescale(timescale: f64) -> Result<Self, EngineError> {
        Self::new(timescale, timescale.sqrt())
    }

    pub fn for_frequency(frequency: Frequency) -> Self {
        let t = f64::from(frequency.timescale());
        Self {
            return_scale: t,
            vol_scale: t.sqrt(),
        }
    }

    pub fn return_scale(&self) -> f64 {
        self.return_scale
    }

    pub fn vol_scale(&self) -> f64 {
        self.vol_scale
    }
}

/// Resolves a user-supplied frequency string to its [`ScaleConfig`].
///
/// Unknown strings fail with [`EngineError::InvalidConfiguration`]; there is
/// no fallback scale.
pub fn resolve_scale(frequency: &str) -> Result<ScaleConfig, EngineError> {
    let frequency: Frequency = frequency.parse()?;
    Ok(ScaleConfig::for_frequency(frequency))
}
