//! Bar intervals expressed as an amount of a calendar unit.
//!
//! [`TimeFrame`] is deliberately permissive: any non-zero amount is accepted
//! here, and each provider enforces its own limits (see
//! [`validate_timeframe`](crate::providers::alpaca_rest::params::validate_timeframe)).
//!
//! The compact text form used by configs and the CLI is `<amount><unit>`,
//! e.g. `5m`, `3h`, `1D`, `1W`, `6M`.

use std::{fmt, str::FromStr};

use serde::{Deserialize, Serialize};
use thiserror::Error;

#[derive(Debug, Error, PartialEq, Eq)]
pub enum TimeFrameError {
    #[error("Invalid amount for {:?}: {}", unit, message)]
    InvalidAmount {
        unit: TimeFrameUnit,
        message: String,
    },

    #[error("Invalid input: {}", message)]
    InvalidInput { message: String },
}

#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
pub enum TimeFrameUnit {
    Minute,
    Hour,
    Day,
    Week,
    Month,
}

#[derive(Debug, Clone, PartialEq, Eq, Hash, Serialize, Deserialize)]
pub struct TimeFrame {
    pub amount: u32,
    pub unit: TimeFrameUnit,
}

impl TimeFrame {
    pub fn new(amount: u32, unit: TimeFrameUnit) -> Result<Self, TimeFrameError> {
        if amount == 0 {
            return Err(TimeFrameError::InvalidAmount {
                unit,
                message: "amount must be greater than zero".into(),
            });
        }
        Ok(Self { amount, unit })
    }

    pub const fn day() -> Self {
        Self {
            amount: 1,
            unit: TimeFrameUnit::Day,
        }
    }

    pub const fn week() -> Self {
        Self {
            amount: 1,
            unit: TimeFrameUnit::Week,
        }
    }

    pub const fn month() -> Self {
        Self {
            amount: 1,
            unit: TimeFrameUnit::Month,
        }
    }
}

impl fmt::Display for TimeFrame {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        let u = match self.unit {
            TimeFrameUnit::Minute => "m",
            TimeFrameUnit::Hour => "h",
            TimeFrameUnit::Day => "D",
            TimeFrameUnit::Week => "W",
            TimeFrameUnit::Month => "M",
        };
        write!(f, "{}{u}", self.amount)
    }
}

impl FromStr for TimeFrame {
    type Err = TimeFrameError;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        let s = s.trim();
        let split = s
            .find(|c: char| !c.is_ascii_digit())
            .ok_or_else(|| TimeFrameError::InvalidInput {
                message: format!("missing unit in timeframe {s:?}"),
            })?;
        let (digits, unit) = s.split_at(split);
        let amount: u32 = digits.parse().map_err(|_| TimeFrameError::InvalidInput {
            message: format!("invalid amount in timeframe {s:?}"),
        })?;
        // case matters for the single-letter forms: `m` is minute, `M` is month
        let unit = match unit {
            "m" | "min" | "Min" | "minute" => TimeFrameUnit::Minute,
            "h" | "H" | "hour" | "Hour" => TimeFrameUnit::Hour,
            "d" | "D" | "day" | "Day" => TimeFrameUnit::Day,
            "w" | "W" | "wk" | "week" | "Week" => TimeFrameUnit::Week,
            "M" | "mo" | "month" | "Month" => TimeFrameUnit::Month,
            _ => {
                return Err(TimeFrameError::InvalidInput {
                    message: format!("Invalid timeframe unit: {unit}"),
                });
            }
        };
        TimeFrame::new(amount, unit)
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_parse_compact_forms() {
        assert_eq!(
            "5m".parse::<TimeFrame>().unwrap(),
            TimeFrame::new(5, TimeFrameUnit::Minute).unwrap()
        );
        assert_eq!("1D".parse::<TimeFrame>().unwrap(), TimeFrame::day());
        assert_eq!("1wk".parse::<TimeFrame>().unwrap(), TimeFrame::week());
        assert_eq!("1mo".parse::<TimeFrame>().unwrap(), TimeFrame::month());
        assert_eq!(
            "6M".parse::<TimeFrame>().unwrap(),
            TimeFrame::new(6, TimeFrameUnit::Month).unwrap()
        );
    }

    #[test]
    fn test_display_round_trip() {
        for tf in [
            TimeFrame::new(15, TimeFrameUnit::Minute).unwrap(),
            TimeFrame::new(4, TimeFrameUnit::Hour).unwrap(),
            TimeFrame::day(),
            TimeFrame::week(),
            TimeFrame::new(3, TimeFrameUnit::Month).unwrap(),
        ] {
            assert_eq!(tf.to_string().parse::<TimeFrame>().unwrap(), tf);
        }
    }

    #[test]
    fn test_invalid_inputs() {
        assert!(matches!(
            "0D".parse::<TimeFrame>(),
            Err(TimeFrameError::InvalidAmount { .. })
        ));
        assert!(matches!(
            "15".parse::<TimeFrame>(),
            Err(TimeFrameError::InvalidInput { .. })
        ));
        assert!(matches!(
            "D".parse::<TimeFrame>(),
            Err(TimeFrameError::InvalidInput { .. })
        ));
        assert!(matches!(
            "1y".parse::<TimeFrame>(),
            Err(TimeFrameError::InvalidInput { .. })
        ));
    }
}
