//! Alpaca Market Data v2 REST provider for US equities.

pub mod params;
pub mod provider;
pub mod response;

pub use params::{Adjustment, AlpacaBarsParams, Feed};
pub use provider::AlpacaProvider;
