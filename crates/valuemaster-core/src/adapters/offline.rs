use crate::acquirer::{
    AcquireFuture, BetaRequest, CountryBatchRequest, CountryRequest, CountryRiskPremiumSource,
    MarketReturnSource, RiskFreeRateSource, SourceError, UnleveredBetaSource,
};
use crate::adapters::damodaran::{resolve_countries, resolve_country};
use crate::{
    CountryRiskPremium, CountryRiskPremiums, LookupTable, MarketReturn, RiskFreeRate, SourceId,
    UnleveredBeta,
};

pub const OFFLINE_RISK_FREE_RATE: f64 = 0.0384;
pub const OFFLINE_MARKET_RETURN: f64 = 0.10;

/// Sample unlevered betas by industry.
const SAMPLE_BETAS: &[(&str, f64)] = &[
    ("Advertising", 0.92),
    ("Aerospace/Defense", 0.90),
    ("Air Transport", 0.78),
    ("Auto & Truck", 1.27),
    ("Banks (Regional)", 0.43),
    ("Computer Services", 0.95),
    ("Drugs (Pharmaceutical)", 0.97),
    ("Retail (General)", 0.83),
    ("Semiconductor", 1.35),
    ("Software (System & Application)", 1.20),
    ("Utility (General)", 0.36),
    ("Total Market", 0.72),
];

/// Sample country risk premiums, percent.
const SAMPLE_COUNTRY_PREMIUMS: &[(&str, f64)] = &[
    ("Argentina", 15.06),
    ("Brazil", 3.57),
    ("Canada", 0.00),
    ("China", 1.07),
    ("Germany", 0.00),
    ("India", 2.79),
    ("Japan", 0.89),
    ("Mexico", 2.79),
    ("South Africa", 4.10),
    ("United Kingdom", 1.07),
    ("United States", 0.00),
];

/// Table-backed implementation of all four acquirer traits; no network access.
#[derive(Debug, Clone)]
pub struct OfflineMarketData {
    risk_free_rate: f64,
    market_return: f64,
    betas: LookupTable,
    country_premiums: LookupTable,
}

impl Default for OfflineMarketData {
    fn default() -> Self {
        Self {
            risk_free_rate: OFFLINE_RISK_FREE_RATE,
            market_return: OFFLINE_MARKET_RETURN,
            betas: sample_table(SAMPLE_BETAS),
            country_premiums: sample_table(SAMPLE_COUNTRY_PREMIUMS),
        }
    }
}

impl OfflineMarketData {
    pub fn new() -> Self {
        Self::default()
    }

    /// No sectors or countries; rates keep their defaults.
    pub fn empty() -> Self {
        Self {
            betas: LookupTable::new(),
            country_premiums: LookupTable::new(),
            ..Self::default()
        }
    }

    pub fn with_risk_free_rate(mut self, rate: f64) -> Self {
        self.risk_free_rate = rate;
        self
    }

    pub fn with_market_return(mut self, rate: f64) -> Self {
        self.market_return = rate;
        self
    }

    /// Adds the sector, or replaces its beta when it is already listed.
    pub fn with_beta(mut self, sector: impl Into<String>, beta: f64) -> Self {
        self.betas.insert(sector, Some(beta));
        self
    }

    /// `percent` is in published units, e.g. `3.57` for 3.57%.
    pub fn with_country_premium(mut self, country: impl Into<String>, percent: f64) -> Self {
        self.country_premiums.insert(country, Some(percent));
        self
    }

    pub fn sectors(&self) -> impl Iterator<Item = &str> {
        self.betas.keys()
    }

    pub fn countries(&self) -> impl Iterator<Item = &str> {
        self.country_premiums.keys()
    }
}

impl RiskFreeRateSource for OfflineMarketData {
    fn id(&self) -> SourceId {
        SourceId::Offline
    }

    fn risk_free_rate(&self) -> AcquireFuture<'_, RiskFreeRate> {
        Box::pin(async move { Ok(RiskFreeRate::new(self.risk_free_rate)?) })
    }
}

impl MarketReturnSource for OfflineMarketData {
    fn id(&self) -> SourceId {
        SourceId::Offline
    }

    fn market_return(&self) -> AcquireFuture<'_, MarketReturn> {
        Box::pin(async move { Ok(MarketReturn::new(self.market_return)?) })
    }
}

impl UnleveredBetaSource for OfflineMarketData {
    fn id(&self) -> SourceId {
        SourceId::Offline
    }

    fn unlevered_beta<'a>(&'a self, req: BetaRequest) -> AcquireFuture<'a, UnleveredBeta> {
        Box::pin(async move {
            match self.betas.get(req.sector()) {
                Some(beta) => Ok(UnleveredBeta::new(beta)?),
                None => {
                    tracing::debug!(sector = req.sector(), "sector not in offline table");
                    Err(SourceError::not_found("sector", vec![req.sector().to_owned()]))
                }
            }
        })
    }
}

impl CountryRiskPremiumSource for OfflineMarketData {
    fn id(&self) -> SourceId {
        SourceId::Offline
    }

    fn country_risk_premium<'a>(
        &'a self,
        req: CountryRequest,
    ) -> AcquireFuture<'a, CountryRiskPremium> {
        Box::pin(async move { resolve_country(&self.country_premiums, req.country()) })
    }

    fn country_risk_premiums<'a>(
        &'a self,
        req: CountryBatchRequest,
    ) -> AcquireFuture<'a, CountryRiskPremiums> {
        Box::pin(async move { resolve_countries(&self.country_premiums, req.countries()) })
    }
}

fn sample_table(rows: &[(&str, f64)]) -> LookupTable {
    rows.iter()
        .map(|(key, value)| ((*key).to_owned(), Some(*value)))
        .collect()
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::acquirer::SourceErrorKind;

    #[tokio::test]
    async fn serves_default_rates() {
        let data = OfflineMarketData::new();

        assert_eq!(data.risk_free_rate().await.expect("offline").rate, 0.0384);
        assert_eq!(data.market_return().await.expect("offline").rate, 0.10);
    }

    #[tokio::test]
    async fn custom_sector_is_served() {
        let data = OfflineMarketData::empty().with_beta("Shipbuilding", 1.05);

        let beta = data
            .unlevered_beta(BetaRequest::new("Shipbuilding").expect("valid"))
            .await
            .expect("custom sector");

        assert_eq!(beta.beta, 1.05);
        assert_eq!(data.sectors().collect::<Vec<_>>(), vec!["Shipbuilding"]);
    }

    #[tokio::test]
    async fn overrides_replace_built_in_entries() {
        let data = OfflineMarketData::new()
            .with_beta("Advertising", 1.5)
            .with_country_premium("Brazil", 4.0);

        let beta = data
            .unlevered_beta(BetaRequest::new("Advertising").expect("valid"))
            .await
            .expect("listed sector");
        let premium = data
            .country_risk_premium(CountryRequest::new("Brazil").expect("valid"))
            .await
            .expect("listed country");

        assert_eq!(beta.beta, 1.5);
        assert!((premium.risk - 0.04).abs() < 1e-12);
        assert_eq!(data.sectors().filter(|sector| *sector == "Advertising").count(), 1);
    }

    #[tokio::test]
    async fn unknown_sector_is_not_found() {
        let error = OfflineMarketData::new()
            .unlevered_beta(BetaRequest::new("Time Travel").expect("valid"))
            .await
            .expect_err("not listed");

        assert_eq!(error.kind(), SourceErrorKind::NotFound);
    }

    #[tokio::test]
    async fn country_premiums_are_decimal_fractions() {
        let premium = OfflineMarketData::new()
            .country_risk_premium(CountryRequest::new("Brazil").expect("valid"))
            .await
            .expect("listed");

        assert!((premium.risk - 0.0357).abs() < 1e-12);
    }

    #[tokio::test]
    async fn non_finite_configured_rate_is_malformed() {
        let error = OfflineMarketData::new()
            .with_market_return(f64::NAN)
            .market_return()
            .await
            .expect_err("NaN rate");

        assert_eq!(error.kind(), SourceErrorKind::Malformed);
    }
}
