//! Acquirer contracts and request/error types.
//!
//! Each market input has its own trait so that the four acquisitions stay
//! independent and can be swapped one at a time (live vs offline).
//!
//! | Trait | Request | Response |
//! |-------|---------|----------|
//! | [`RiskFreeRateSource`] | - | [`RiskFreeRate`] |
//! | [`MarketReturnSource`] | - | [`MarketReturn`] |
//! | [`UnleveredBetaSource`] | [`BetaRequest`] | [`UnleveredBeta`] |
//! | [`CountryRiskPremiumSource`] | [`CountryRequest`] / [`CountryBatchRequest`] | [`CountryRiskPremium`] / [`CountryRiskPremiums`] |

use std::fmt::{Display, Formatter};
use std::future::Future;
use std::pin::Pin;

use crate::{
    CountryRiskPremium, CountryRiskPremiums, MarketReturn, RiskFreeRate, SourceId,
    UnleveredBeta, ValidationError,
};

/// Acquisition error classification.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum SourceErrorKind {
    /// Transport failure, error status, or missing credentials.
    Unavailable,
    /// The upstream answered but its payload could not be reduced to a value.
    Malformed,
    /// Well-formed upstream with no record for the requested key(s).
    NotFound,
    /// Request rejected before any network call.
    InvalidInput,
}

/// Structured acquisition error.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct SourceError {
    kind: SourceErrorKind,
    message: String,
    missing: Vec<String>,
}

impl SourceError {
    pub fn unavailable(message: impl Into<String>) -> Self {
        Self {
            kind: SourceErrorKind::Unavailable,
            message: message.into(),
            missing: Vec::new(),
        }
    }

    pub fn malformed(message: impl Into<String>) -> Self {
        Self {
            kind: SourceErrorKind::Malformed,
            message: message.into(),
            missing: Vec::new(),
        }
    }

    /// `what` names the looked-up entity, e.g. "sector" or "country".
    pub fn not_found(what: &str, missing: Vec<String>) -> Self {
        Self {
            kind: SourceErrorKind::NotFound,
            message: format!("{what} not found in data: {}", missing.join(", ")),
            missing,
        }
    }

    pub fn invalid_input(message: impl Into<String>) -> Self {
        Self {
            kind: SourceErrorKind::InvalidInput,
            message: message.into(),
            missing: Vec::new(),
        }
    }

    pub const fn kind(&self) -> SourceErrorKind {
        self.kind
    }

    pub fn message(&self) -> &str {
        &self.message
    }

    /// Keys that had no match; empty unless the kind is `NotFound`.
    pub fn missing(&self) -> &[String] {
        &self.missing
    }

    pub const fn code(&self) -> &'static str {
        match self.kind {
            SourceErrorKind::Unavailable => "source.unavailable",
            SourceErrorKind::Malformed => "source.malformed",
            SourceErrorKind::NotFound => "source.not_found",
            SourceErrorKind::InvalidInput => "source.invalid_input",
        }
    }
}

impl Display for SourceError {
    fn fmt(&self, f: &mut Formatter<'_>) -> std::fmt::Result {
        write!(f, "{} ({})", self.message, self.code())
    }
}

impl std::error::Error for SourceError {}

impl From<ValidationError> for SourceError {
    fn from(error: ValidationError) -> Self {
        Self::malformed(error.to_string())
    }
}

/// Sector lookup request. The name is matched verbatim against the published table.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct BetaRequest {
    sector: String,
}

impl BetaRequest {
    pub fn new(sector: impl Into<String>) -> Result<Self, SourceError> {
        let sector = sector.into();
        if sector.trim().is_empty() {
            return Err(SourceError::invalid_input("sector parameter is required"));
        }
        Ok(Self { sector })
    }

    pub fn sector(&self) -> &str {
        &self.sector
    }
}

/// Single-country lookup request.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct CountryRequest {
    country: String,
}

impl CountryRequest {
    pub fn new(country: impl Into<String>) -> Result<Self, SourceError> {
        let country = country.into();
        if country.trim().is_empty() {
            return Err(SourceError::invalid_input("country parameter is required"));
        }
        Ok(Self { country })
    }

    pub fn country(&self) -> &str {
        &self.country
    }
}

/// Batch lookup request. Succeeds only if every country resolves.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct CountryBatchRequest {
    countries: Vec<String>,
}

impl CountryBatchRequest {
    pub fn new(countries: Vec<String>) -> Result<Self, SourceError> {
        if countries.is_empty() {
            return Err(SourceError::invalid_input(
                "countries must contain at least one name",
            ));
        }
        if countries.iter().any(|name| name.trim().is_empty()) {
            return Err(SourceError::invalid_input(
                "countries must not contain empty names",
            ));
        }
        Ok(Self { countries })
    }

    pub fn countries(&self) -> &[String] {
        &self.countries
    }
}

pub type AcquireFuture<'a, T> = Pin<Box<dyn Future<Output = Result<T, SourceError>> + Send + 'a>>;

/// Produces the 10-year risk-free rate as a decimal fraction.
pub trait RiskFreeRateSource: Send + Sync {
    fn id(&self) -> SourceId;

    /// # Errors
    ///
    /// `Unavailable` when the upstream cannot be reached, `Malformed` when no usable
    /// observations remain or the history requirement is not met.
    fn risk_free_rate(&self) -> AcquireFuture<'_, RiskFreeRate>;
}

/// Produces the annualized 10-year market return as a decimal fraction.
pub trait MarketReturnSource: Send + Sync {
    fn id(&self) -> SourceId;

    /// # Errors
    ///
    /// `Unavailable` when the upstream cannot be reached, `Malformed` when the trailing
    /// window is incomplete or the result is not finite.
    fn market_return(&self) -> AcquireFuture<'_, MarketReturn>;
}

/// Looks up an industry's unlevered beta.
pub trait UnleveredBetaSource: Send + Sync {
    fn id(&self) -> SourceId;

    /// # Errors
    ///
    /// `NotFound` when the sector is absent, distinct from `Unavailable`/`Malformed`.
    fn unlevered_beta<'a>(&'a self, req: BetaRequest) -> AcquireFuture<'a, UnleveredBeta>;
}

/// Looks up country risk premiums as decimal fractions.
pub trait CountryRiskPremiumSource: Send + Sync {
    fn id(&self) -> SourceId;

    /// # Errors
    ///
    /// `NotFound` carrying the country name when it is absent.
    fn country_risk_premium<'a>(
        &'a self,
        req: CountryRequest,
    ) -> AcquireFuture<'a, CountryRiskPremium>;

    /// # Errors
    ///
    /// `NotFound` listing every unmatched name, in request order, if any name is absent.
    fn country_risk_premiums<'a>(
        &'a self,
        req: CountryBatchRequest,
    ) -> AcquireFuture<'a, CountryRiskPremiums>;
}
