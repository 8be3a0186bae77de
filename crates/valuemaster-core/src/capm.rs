//! CAPM combiner and the concurrent estimator built on top of it.

use serde::{Deserialize, Serialize};

use crate::acquirer::{BetaRequest, CountryRequest, SourceError};
use crate::sources::AcquirerSet;

/// Market inputs to the CAPM formula, all decimal fractions except `beta`.
#[derive(Debug, Clone, Copy, PartialEq, Serialize, Deserialize)]
pub struct CapmInputs {
    pub risk_free_rate: f64,
    pub market_return: f64,
    pub beta: f64,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub country_risk_premium: Option<f64>,
}

impl CapmInputs {
    pub fn market_risk_premium(&self) -> f64 {
        self.market_return - self.risk_free_rate
    }

    pub fn expected_return(&self) -> f64 {
        expected_return(
            self.risk_free_rate,
            self.beta,
            self.market_return,
            self.country_risk_premium,
        )
    }
}

/// `rf + beta * (rm - rf) + crp`, with an absent premium counted as zero.
///
/// Inputs are not range-checked.
pub fn expected_return(
    risk_free_rate: f64,
    beta: f64,
    market_return: f64,
    country_risk_premium: Option<f64>,
) -> f64 {
    risk_free_rate
        + beta * (market_return - risk_free_rate)
        + country_risk_premium.unwrap_or(0.0)
}

#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct CapmEstimate {
    pub sector: String,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub country: Option<String>,
    pub inputs: CapmInputs,
    pub expected_return: f64,
}

/// Sector and optional country for one estimate.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct CapmRequest {
    beta: BetaRequest,
    country: Option<CountryRequest>,
}

impl CapmRequest {
    pub fn new(sector: impl Into<String>, country: Option<String>) -> Result<Self, SourceError> {
        let beta = BetaRequest::new(sector)?;
        let country = country.map(CountryRequest::new).transpose()?;
        Ok(Self { beta, country })
    }

    pub fn sector(&self) -> &str {
        self.beta.sector()
    }

    pub fn country(&self) -> Option<&str> {
        self.country.as_ref().map(CountryRequest::country)
    }
}

/// Runs the acquirers concurrently and combines their results.
#[derive(Clone)]
pub struct CapmEstimator {
    acquirers: AcquirerSet,
}

impl CapmEstimator {
    pub fn new(acquirers: AcquirerSet) -> Self {
        Self { acquirers }
    }

    pub fn acquirers(&self) -> &AcquirerSet {
        &self.acquirers
    }

    /// # Errors
    ///
    /// Waits for every acquisition, then reports the first failure in the order
    /// risk-free rate, market return, beta, country premium.
    pub async fn estimate(&self, req: CapmRequest) -> Result<CapmEstimate, SourceError> {
        let sector = req.sector().to_owned();
        let country = req.country().map(str::to_owned);
        let CapmRequest {
            beta: beta_request,
            country: country_request,
        } = req;

        let premium = async move {
            match country_request {
                Some(country) => self
                    .acquirers
                    .country_risk_premium()
                    .country_risk_premium(country)
                    .await
                    .map(|premium| Some(premium.risk)),
                None => Ok(None),
            }
        };

        let (risk_free_rate, market_return, beta, premium) = tokio::join!(
            self.acquirers.risk_free_rate().risk_free_rate(),
            self.acquirers.market_return().market_return(),
            self.acquirers.unlevered_beta().unlevered_beta(beta_request),
            premium,
        );

        let inputs = CapmInputs {
            risk_free_rate: risk_free_rate?.rate,
            market_return: market_return?.rate,
            beta: beta?.beta,
            country_risk_premium: premium?,
        };
        let expected_return = inputs.expected_return();

        tracing::info!(
            sector = %sector,
            country = country.as_deref().unwrap_or("-"),
            expected_return = expected_return,
            "computed CAPM estimate"
        );

        Ok(CapmEstimate {
            sector,
            country,
            inputs,
            expected_return,
        })
    }
}
