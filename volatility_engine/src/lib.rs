//! Period-scaled return, volatility, and downside/upside semi-deviation for
//! price series.
//!
//! ```
//! use chrono::{Duration, TimeZone, Utc};
//! use volatility_engine::{
//!     PriceSeries, ReturnConvention, VolatilityEngine,
//!     scale::{Frequency, ScaleConfig},
//! };
//!
//! let t0 = Utc.with_ymd_and_hms(2024, 1, 2, 0, 0, 0).unwrap();
//! let closes = [100.0, 104.0, 101.0, 107.0, 103.0, 110.0];
//! let series = PriceSeries::from_closes(
//!     "AAPL",
//!     closes.iter().enumerate().map(|(i, p)| (t0 + Duration::days(i as i64), *p)),
//! )?;
//!
//! let engine = VolatilityEngine::new(
//!     ReturnConvention::Log,
//!     ScaleConfig::for_frequency(Frequency::Daily),
//! );
//! let report = engine.analyze(&series)?;
//! assert!(report.total.volatility > 0.0);
//! assert!(report.downside.is_ok() && report.upside.is_ok());
//! # Ok::<(), volatility_engine::EngineError>(())
//! ```

pub mod engine;
pub mod errors;
pub mod price_series;
pub mod returns;
pub mod scale;
pub mod statistic;

pub use crate::engine::{VolatilityEngine, VolatilityReport};
pub use crate::errors::{EngineError, MalformedInput};
pub use crate::price_series::{PricePoint, PriceSeries};
pub use crate::returns::{ReturnConvention, ReturnSeries};
pub use crate::scale::{Frequency, ScaleConfig, resolve_scale};
pub use crate::statistic::{VolatilityKind, VolatilityRecord, VolatilityStatistic};
