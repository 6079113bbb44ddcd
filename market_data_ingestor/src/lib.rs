//! Acquisition of historical price bars from market data vendors.
//!
//! [`models`] holds the vendor-agnostic bar and request types, and
//! [`providers`] the [`DataProvider`](providers::DataProvider) trait with its
//! Alpaca REST and JSON fixture implementations.

pub mod models;
pub mod providers;
