use std::env;
use std::fmt::{Display, Formatter};
use std::str::FromStr;
use std::sync::Arc;

use serde::{Deserialize, Serialize};

use crate::acquirer::{
    CountryRiskPremiumSource, MarketReturnSource, RiskFreeRateSource, UnleveredBetaSource,
};
use crate::adapters::{
    DamodaranBetas, DamodaranCountryPremiums, FredMarketReturn, FredRiskFreeRate,
    FredSeriesClient, OfflineMarketData,
};
use crate::http_client::{HttpClient, ReqwestHttpClient};
use crate::ValidationError;

/// Where market inputs come from.
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum AcquisitionMode {
    /// FRED and Damodaran over HTTP.
    #[default]
    Live,
    /// Built-in sample tables.
    Offline,
}

impl AcquisitionMode {
    pub const fn as_str(self) -> &'static str {
        match self {
            Self::Live => "live",
            Self::Offline => "offline",
        }
    }
}

impl Display for AcquisitionMode {
    fn fmt(&self, f: &mut Formatter<'_>) -> std::fmt::Result {
        f.write_str(self.as_str())
    }
}

impl FromStr for AcquisitionMode {
    type Err = ValidationError;

    fn from_str(value: &str) -> Result<Self, Self::Err> {
        match value.trim().to_ascii_lowercase().as_str() {
            "live" => Ok(Self::Live),
            "offline" => Ok(Self::Offline),
            _ => Err(ValidationError::InvalidMode {
                value: value.to_owned(),
            }),
        }
    }
}

/// One implementation per market input.
#[derive(Clone)]
pub struct AcquirerSet {
    mode: AcquisitionMode,
    risk_free_rate: Arc<dyn RiskFreeRateSource>,
    market_return: Arc<dyn MarketReturnSource>,
    unlevered_beta: Arc<dyn UnleveredBetaSource>,
    country_risk_premium: Arc<dyn CountryRiskPremiumSource>,
}

impl AcquirerSet {
    pub fn new(
        mode: AcquisitionMode,
        risk_free_rate: Arc<dyn RiskFreeRateSource>,
        market_return: Arc<dyn MarketReturnSource>,
        unlevered_beta: Arc<dyn UnleveredBetaSource>,
        country_risk_premium: Arc<dyn CountryRiskPremiumSource>,
    ) -> Self {
        Self {
            mode,
            risk_free_rate,
            market_return,
            unlevered_beta,
            country_risk_premium,
        }
    }

    /// Every input served from one offline data set.
    pub fn offline(data: OfflineMarketData) -> Self {
        let data = Arc::new(data);
        Self::new(
            AcquisitionMode::Offline,
            data.clone(),
            data.clone(),
            data.clone(),
            data,
        )
    }

    pub const fn mode(&self) -> AcquisitionMode {
        self.mode
    }

    pub fn risk_free_rate(&self) -> &dyn RiskFreeRateSource {
        self.risk_free_rate.as_ref()
    }

    pub fn market_return(&self) -> &dyn MarketReturnSource {
        self.market_return.as_ref()
    }

    pub fn unlevered_beta(&self) -> &dyn UnleveredBetaSource {
        self.unlevered_beta.as_ref()
    }

    pub fn country_risk_premium(&self) -> &dyn CountryRiskPremiumSource {
        self.country_risk_premium.as_ref()
    }
}

/// Builder for an [`AcquirerSet`].
///
/// # Environment Variables
///
/// | Setting | Primary Env Var | Fallback Env Var |
/// |---------|-----------------|------------------|
/// | Mode (`live` / `offline`) | `VALUEMASTER_MODE` | - |
/// | FRED API key | `VALUEMASTER_FRED_API_KEY` | `FRED_API_KEY` |
/// | FRED observations URL | `VALUEMASTER_FRED_BASE_URL` | - |
/// | Damodaran betas URL | `VALUEMASTER_BETAS_URL` | - |
/// | Damodaran country premium URL | `VALUEMASTER_COUNTRY_PREMIUM_URL` | - |
///
/// # Example
///
/// ```rust,ignore
/// use valuemaster_core::AcquirerSetBuilder;
///
/// let acquirers = AcquirerSetBuilder::from_env()?.build();
///
/// let offline = AcquirerSetBuilder::new().with_offline_mode().build();
/// ```
#[derive(Default)]
pub struct AcquirerSetBuilder {
    mode: AcquisitionMode,
    fred_api_key: Option<String>,
    fred_base_url: Option<String>,
    betas_url: Option<String>,
    country_premium_url: Option<String>,
    http_client: Option<Arc<dyn HttpClient>>,
    offline_data: Option<OfflineMarketData>,
}

impl AcquirerSetBuilder {
    pub fn new() -> Self {
        Self::default()
    }

    /// Read mode, credentials and endpoint overrides from the environment.
    ///
    /// # Errors
    ///
    /// `InvalidMode` when `VALUEMASTER_MODE` is set to an unknown value.
    pub fn from_env() -> Result<Self, ValidationError> {
        let mode = match non_empty_var("VALUEMASTER_MODE") {
            Some(value) => value.parse()?,
            None => AcquisitionMode::Live,
        };

        Ok(Self {
            mode,
            fred_api_key: non_empty_var("VALUEMASTER_FRED_API_KEY")
                .or_else(|| non_empty_var("FRED_API_KEY")),
            fred_base_url: non_empty_var("VALUEMASTER_FRED_BASE_URL"),
            betas_url: non_empty_var("VALUEMASTER_BETAS_URL"),
            country_premium_url: non_empty_var("VALUEMASTER_COUNTRY_PREMIUM_URL"),
            ..Self::default()
        })
    }

    pub fn with_mode(mut self, mode: AcquisitionMode) -> Self {
        self.mode = mode;
        self
    }

    pub fn with_offline_mode(self) -> Self {
        self.with_mode(AcquisitionMode::Offline)
    }

    pub fn with_fred_api_key(mut self, key: impl Into<String>) -> Self {
        self.fred_api_key = Some(key.into());
        self
    }

    pub fn with_fred_base_url(mut self, url: impl Into<String>) -> Self {
        self.fred_base_url = Some(url.into());
        self
    }

    pub fn with_betas_url(mut self, url: impl Into<String>) -> Self {
        self.betas_url = Some(url.into());
        self
    }

    pub fn with_country_premium_url(mut self, url: impl Into<String>) -> Self {
        self.country_premium_url = Some(url.into());
        self
    }

    /// Transport for live mode; defaults to a shared reqwest client.
    pub fn with_http_client(mut self, http_client: Arc<dyn HttpClient>) -> Self {
        self.http_client = Some(http_client);
        self
    }

    /// Data set for offline mode; defaults to the built-in sample tables.
    pub fn with_offline_data(mut self, data: OfflineMarketData) -> Self {
        self.offline_data = Some(data);
        self
    }

    pub fn mode(&self) -> AcquisitionMode {
        self.mode
    }

    pub fn build(self) -> AcquirerSet {
        if self.mode == AcquisitionMode::Offline {
            tracing::info!(mode = %self.mode, "using offline market data");
            return AcquirerSet::offline(self.offline_data.unwrap_or_default());
        }

        let http_client = self
            .http_client
            .unwrap_or_else(|| Arc::new(ReqwestHttpClient::new()));

        if self.fred_api_key.is_none() {
            tracing::warn!(
                "no FRED API key configured; risk-free rate and market return will be unavailable"
            );
        }

        let mut fred = FredSeriesClient::new(http_client.clone(), self.fred_api_key);
        if let Some(url) = self.fred_base_url {
            fred = fred.with_base_url(url);
        }

        let mut betas = DamodaranBetas::new(http_client.clone());
        if let Some(url) = self.betas_url {
            betas = betas.with_url(url);
        }

        let mut premiums = DamodaranCountryPremiums::new(http_client);
        if let Some(url) = self.country_premium_url {
            premiums = premiums.with_url(url);
        }

        tracing::info!(mode = %self.mode, "using live market data sources");
        AcquirerSet::new(
            AcquisitionMode::Live,
            Arc::new(FredRiskFreeRate::new(fred.clone())),
            Arc::new(FredMarketReturn::new(fred)),
            Arc::new(betas),
            Arc::new(premiums),
        )
    }
}

fn non_empty_var(name: &str) -> Option<String> {
    env::var(name)
        .ok()
        .map(|value| value.trim().to_owned())
        .filter(|value| !value.is_empty())
}
