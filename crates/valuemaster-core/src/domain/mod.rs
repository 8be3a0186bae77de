//! # Domain Models
//!
//! Request-scoped value types produced by the acquirers.
//!
//! | Type | Description |
//! |------|-------------|
//! | [`RiskFreeRate`] | Average 10-year risk-free rate (decimal) |
//! | [`MarketReturn`] | Annualized 10-year market return (decimal) |
//! | [`UnleveredBeta`] | Industry unlevered beta |
//! | [`CountryRiskPremium`] | Country risk premium (decimal) |
//! | [`CountryRiskPremiums`] | Per-country batch result |
//! | [`ObservationSeries`] | Dated observations from a time-series source |
//! | [`LookupTable`] | Exact-match key/value table parsed from a document |
//!
//! Numeric models reject non-finite values at construction, so a value that
//! reaches the CAPM combiner is always a real number.

mod lookup;
mod models;
mod observation;

pub use lookup::LookupTable;
pub use models::{
    CountryRiskPremium, CountryRiskPremiums, MarketReturn, RiskFreeRate, UnleveredBeta,
};
pub use observation::{
    parse_observation_value, Observation, ObservationSeries, MISSING_VALUE_MARKER,
};
