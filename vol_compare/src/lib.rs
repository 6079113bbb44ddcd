//! Return vs. downside/upside volatility comparison across symbols.
//!
//! The pipeline is: [`config`] resolves a run, [`acquisition`] fetches bars
//! and maps missing data to a per-symbol "no data" condition, [`analysis`]
//! runs the volatility engine per symbol, and [`output`] renders the results
//! for a plotting front-end.

pub mod acquisition;
pub mod analysis;
pub mod config;
pub mod output;
