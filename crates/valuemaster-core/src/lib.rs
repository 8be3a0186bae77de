//! # ValueMaster Core
//!
//! Market input acquisition and CAPM estimation for the ValueMaster calculator.
//!
//! ## Overview
//!
//! This crate reaches four uncontrolled upstream sources, reduces each response to
//! a single number expressed as a decimal fraction, and combines them:
//!
//! `expected = rf + beta * (rm - rf) + crp`
//!
//! - **Acquirer traits** for the risk-free rate, market return, unlevered beta and
//!   country risk premium
//! - **Live adapters** for FRED observations and the Damodaran HTML tables
//! - **Offline adapter** serving built-in sample tables
//! - **CAPM estimator** running all acquisitions concurrently
//!
//! ## Modules
//!
//! | Module | Description |
//! |--------|-------------|
//! | [`acquirer`] | Acquirer traits, requests and [`SourceError`] |
//! | [`adapters`] | FRED, Damodaran and offline implementations |
//! | [`capm`] | Combiner and [`CapmEstimator`] |
//! | [`domain`] | Validated value types and lookup tables |
//! | [`error`] | Validation errors |
//! | [`http_client`] | HTTP transport abstraction |
//! | [`series`] | Mean and annualized-return reductions |
//! | [`source`] | Upstream identifiers |
//! | [`sources`] | Live/offline acquirer set builder |
//! | [`table`] | HTML table extraction |
//!
//! ## Quick Start
//!
//! ```rust,ignore
//! use valuemaster_core::{AcquirerSetBuilder, CapmEstimator, CapmRequest};
//!
//! #[tokio::main]
//! async fn main() -> Result<(), Box<dyn std::error::Error>> {
//!     let acquirers = AcquirerSetBuilder::from_env()?.build();
//!     let estimator = CapmEstimator::new(acquirers);
//!
//!     let request = CapmRequest::new("Advertising", Some(String::from("Brazil")))?;
//!     let estimate = estimator.estimate(request).await?;
//!     println!("expected return: {:.4}", estimate.expected_return);
//!
//!     Ok(())
//! }
//! ```
//!
//! ## Error Handling
//!
//! Acquirers never return sentinel numbers. Every failure is a [`SourceError`]:
//!
//! ```rust
//! use valuemaster_core::{SourceError, SourceErrorKind};
//!
//! fn describe(error: &SourceError) -> String {
//!     match error.kind() {
//!         SourceErrorKind::NotFound => format!("missing: {}", error.missing().join(", ")),
//!         SourceErrorKind::InvalidInput => String::from("bad request"),
//!         SourceErrorKind::Unavailable | SourceErrorKind::Malformed => {
//!             String::from("upstream failure")
//!         }
//!     }
//! }
//! ```
//!
//! ## Security
//!
//! - The FRED API key is read from the environment and redacted from logs
//! - Request URLs are never included in transport error messages

pub mod acquirer;
pub mod adapters;
pub mod capm;
pub mod domain;
pub mod error;
pub mod http_client;
pub mod series;
pub mod source;
pub mod sources;
pub mod table;

pub use acquirer::{
    AcquireFuture, BetaRequest, CountryBatchRequest, CountryRequest, CountryRiskPremiumSource,
    MarketReturnSource, RiskFreeRateSource, SourceError, SourceErrorKind, UnleveredBetaSource,
};
pub use adapters::{
    DamodaranBetas, DamodaranCountryPremiums, FredMarketReturn, FredRiskFreeRate,
    FredSeriesClient, OfflineMarketData,
};
pub use capm::{expected_return, CapmEstimate, CapmEstimator, CapmInputs, CapmRequest};
pub use domain::{
    CountryRiskPremium, CountryRiskPremiums, LookupTable, MarketReturn, Observation,
    ObservationSeries, RiskFreeRate, UnleveredBeta,
};
pub use error::ValidationError;
pub use http_client::{
    FixtureHttpClient, HttpClient, HttpError, HttpRequest, HttpResponse, ReqwestHttpClient,
};
pub use source::SourceId;
pub use sources::{AcquirerSet, AcquirerSetBuilder, AcquisitionMode};
