use std::sync::Arc;

use crate::acquirer::{
    AcquireFuture, BetaRequest, CountryBatchRequest, CountryRequest, CountryRiskPremiumSource,
    SourceError, UnleveredBetaSource,
};
use crate::http_client::{fetch_text, HttpClient, HttpRequest};
use crate::series::percent_to_fraction;
use crate::table::{parse_tables, HtmlTable, TableSelector};
use crate::{CountryRiskPremium, CountryRiskPremiums, LookupTable, SourceId, UnleveredBeta};

pub const DEFAULT_BETAS_URL: &str =
    "https://pages.stern.nyu.edu/~adamodar/New_Home_Page/datafile/Betas.html";
pub const DEFAULT_COUNTRY_PREMIUM_URL: &str =
    "https://pages.stern.nyu.edu/~adamodar/New_Home_Page/datafile/ctryprem.html";

pub const INDUSTRY_NAME_HEADER: &str = "Industry Name";
pub const UNLEVERED_BETA_HEADER: &str = "Unlevered beta";

/// Position of the premium table in the country premium document.
pub const COUNTRY_TABLE_POSITION: usize = 1;
pub const COUNTRY_KEY_COLUMN: usize = 0;
pub const COUNTRY_PREMIUM_COLUMN: usize = 3;

/// Industry unlevered betas scraped from the Damodaran betas page.
#[derive(Clone)]
pub struct DamodaranBetas {
    http_client: Arc<dyn HttpClient>,
    url: String,
}

impl DamodaranBetas {
    pub fn new(http_client: Arc<dyn HttpClient>) -> Self {
        Self {
            http_client,
            url: String::from(DEFAULT_BETAS_URL),
        }
    }

    pub fn with_url(mut self, url: impl Into<String>) -> Self {
        self.url = url.into();
        self
    }

    async fn fetch(&self, req: &BetaRequest) -> Result<UnleveredBeta, SourceError> {
        let body = fetch_text(
            self.http_client.as_ref(),
            HttpRequest::get(&self.url),
            "damodaran betas",
        )
        .await?;
        find_unlevered_beta(&body, req.sector())
    }
}

impl UnleveredBetaSource for DamodaranBetas {
    fn id(&self) -> SourceId {
        SourceId::Damodaran
    }

    fn unlevered_beta<'a>(&'a self, req: BetaRequest) -> AcquireFuture<'a, UnleveredBeta> {
        Box::pin(async move {
            let beta = self.fetch(&req).await?;
            tracing::info!(sector = req.sector(), beta = beta.beta, "acquired unlevered beta");
            Ok(beta)
        })
    }
}

/// Country risk premiums scraped from the Damodaran country premium page.
#[derive(Clone)]
pub struct DamodaranCountryPremiums {
    http_client: Arc<dyn HttpClient>,
    url: String,
}

impl DamodaranCountryPremiums {
    pub fn new(http_client: Arc<dyn HttpClient>) -> Self {
        Self {
            http_client,
            url: String::from(DEFAULT_COUNTRY_PREMIUM_URL),
        }
    }

    pub fn with_url(mut self, url: impl Into<String>) -> Self {
        self.url = url.into();
        self
    }

    async fn premium_table(&self) -> Result<LookupTable, SourceError> {
        let body = fetch_text(
            self.http_client.as_ref(),
            HttpRequest::get(&self.url),
            "damodaran country premiums",
        )
        .await?;
        country_premium_table(&body)
    }
}

impl CountryRiskPremiumSource for DamodaranCountryPremiums {
    fn id(&self) -> SourceId {
        SourceId::Damodaran
    }

    fn country_risk_premium<'a>(
        &'a self,
        req: CountryRequest,
    ) -> AcquireFuture<'a, CountryRiskPremium> {
        Box::pin(async move {
            let table = self.premium_table().await?;
            let premium = resolve_country(&table, req.country())?;
            tracing::info!(
                country = req.country(),
                risk = premium.risk,
                "acquired country risk premium"
            );
            Ok(premium)
        })
    }

    fn country_risk_premiums<'a>(
        &'a self,
        req: CountryBatchRequest,
    ) -> AcquireFuture<'a, CountryRiskPremiums> {
        Box::pin(async move {
            let table = self.premium_table().await?;
            let premiums = resolve_countries(&table, req.countries())?;
            tracing::info!(countries = premiums.len(), "acquired country risk premiums");
            Ok(premiums)
        })
    }
}

/// Locate the betas table by its headers and read the sector's unlevered beta.
pub fn find_unlevered_beta(document: &str, sector: &str) -> Result<UnleveredBeta, SourceError> {
    let tables = parse_tables(document);
    if tables.is_empty() {
        tracing::warn!("betas document contains no tables");
        return Err(SourceError::malformed("betas document contains no tables"));
    }

    let selector = TableSelector::by_headers(&[INDUSTRY_NAME_HEADER, UNLEVERED_BETA_HEADER]);
    let Some(table) = selector.select(&tables) else {
        tracing::warn!(tables = tables.len(), "no table carries the unlevered beta headers");
        return Err(SourceError::not_found("sector", vec![sector.to_owned()]));
    };
    tracing::debug!(rows = table.body_rows.len(), "selected betas table");

    match table.lookup_by_header(sector, INDUSTRY_NAME_HEADER, UNLEVERED_BETA_HEADER) {
        Some(beta) => Ok(UnleveredBeta::new(beta)?),
        None => {
            tracing::warn!(sector = sector, "sector not found in betas table");
            Err(SourceError::not_found("sector", vec![sector.to_owned()]))
        }
    }
}

/// Build the country → percent table from the positional premium table.
pub fn country_premium_table(document: &str) -> Result<LookupTable, SourceError> {
    let tables = parse_tables(document);
    let table: &HtmlTable = TableSelector::ByPosition(COUNTRY_TABLE_POSITION)
        .select(&tables)
        .ok_or_else(|| {
            tracing::warn!(tables = tables.len(), "country premium table is missing");
            SourceError::malformed(format!(
                "country premium document has {} tables, expected at least {}",
                tables.len(),
                COUNTRY_TABLE_POSITION + 1
            ))
        })?;
    tracing::debug!(rows = table.body_rows.len(), "selected country premium table");

    Ok(table.to_lookup_table(COUNTRY_KEY_COLUMN, COUNTRY_PREMIUM_COLUMN))
}

pub fn resolve_country(
    table: &LookupTable,
    country: &str,
) -> Result<CountryRiskPremium, SourceError> {
    match table.get(country) {
        Some(percent) => Ok(CountryRiskPremium::new(percent_to_fraction(percent))?),
        None => {
            tracing::warn!(country = country, "country not found in premium table");
            Err(SourceError::not_found("country", vec![country.to_owned()]))
        }
    }
}

/// All-or-nothing batch resolution; the error lists every unmatched name in input order.
pub fn resolve_countries(
    table: &LookupTable,
    countries: &[String],
) -> Result<CountryRiskPremiums, SourceError> {
    let mut premiums = CountryRiskPremiums::default();
    let mut missing = Vec::new();

    for country in countries {
        match table.get(country) {
            Some(percent) => {
                let premium = CountryRiskPremium::new(percent_to_fraction(percent))?;
                premiums.insert(country.clone(), premium);
            }
            None => {
                if !missing.contains(country) {
                    missing.push(country.clone());
                }
            }
        }
    }

    if !missing.is_empty() {
        tracing::warn!(missing = ?missing, "countries not found in premium table");
        return Err(SourceError::not_found("country", missing));
    }
    Ok(premiums)
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::acquirer::SourceErrorKind;
    use crate::http_client::FixtureHttpClient;

    const BETAS: &str = r#"
        <table><tr><td>Date updated:</td><td>January 2024</td></tr></table>
        <table>
          <tr><td>Industry Name</td><td>Number of firms</td><td>Beta</td><td>Unlevered beta</td></tr>
          <tr><td>Advertising</td><td>54</td><td>1.34</td><td>0.92</td></tr>
          <tr><td>Banks (Regional)</td><td>557</td><td>0.52</td><td>0.43</td></tr>
          <tr><td>Broken</td><td>1</td><td>1.0</td><td>n/a</td></tr>
        </table>
    "#;

    const PREMIUMS: &str = r#"
        <table><tr><td>Region</td></tr></table>
        <table>
          <tr><td>Country</td><td>Rating</td><td>Default spread</td><td>Country Risk Premium</td></tr>
          <tr><td>Brazil</td><td>Ba2</td><td>3.07%</td><td>3.57%</td></tr>
          <tr><td>Germany</td><td>Aaa</td><td>0.00%</td><td>0.00%</td></tr>
          <tr><td>India</td><td>Baa3</td><td>2.40%</td><td>2.79%</td></tr>
        </table>
    "#;

    #[test]
    fn finds_exact_sector_beta() {
        let beta = find_unlevered_beta(BETAS, "Banks (Regional)").expect("listed sector");
        assert_eq!(beta.beta, 0.43);
    }

    #[test]
    fn sector_match_is_case_sensitive() {
        let error = find_unlevered_beta(BETAS, "advertising").expect_err("case differs");
        assert_eq!(error.kind(), SourceErrorKind::NotFound);
        assert_eq!(error.missing(), ["advertising"]);
    }

    #[test]
    fn non_numeric_beta_is_not_found() {
        let error = find_unlevered_beta(BETAS, "Broken").expect_err("n/a cell");
        assert_eq!(error.kind(), SourceErrorKind::NotFound);
    }

    #[test]
    fn document_without_tables_is_malformed() {
        let error = find_unlevered_beta("<html><body>maintenance</body></html>", "Advertising")
            .expect_err("no tables");
        assert_eq!(error.kind(), SourceErrorKind::Malformed);
    }

    #[test]
    fn premiums_are_converted_to_decimal() {
        let table = country_premium_table(PREMIUMS).expect("second table present");

        let brazil = resolve_country(&table, "Brazil").expect("listed country");
        assert!((brazil.risk - 0.0357).abs() < 1e-12);
        assert_eq!(resolve_country(&table, "Germany").expect("listed").risk, 0.0);
    }

    #[test]
    fn batch_lists_every_missing_country_in_order() {
        let table = country_premium_table(PREMIUMS).expect("second table present");
        let countries = vec![
            String::from("Atlantis"),
            String::from("Brazil"),
            String::from("Narnia"),
        ];

        let error = resolve_countries(&table, &countries).expect_err("two unknown names");

        assert_eq!(error.kind(), SourceErrorKind::NotFound);
        assert_eq!(error.missing(), ["Atlantis", "Narnia"]);
        assert!(error.message().contains("Atlantis, Narnia"));
    }

    #[test]
    fn missing_premium_table_is_malformed() {
        let error = country_premium_table("<table><tr><td>only one</td></tr></table>")
            .expect_err("one table only");
        assert_eq!(error.kind(), SourceErrorKind::Malformed);
    }

    #[tokio::test]
    async fn batch_fetches_the_document_once() {
        let http =
            Arc::new(FixtureHttpClient::new().with_body(DEFAULT_COUNTRY_PREMIUM_URL, PREMIUMS));
        let source = DamodaranCountryPremiums::new(http.clone());
        let request = CountryBatchRequest::new(vec![String::from("Brazil"), String::from("India")])
            .expect("valid batch");

        let premiums = source.country_risk_premiums(request).await.expect("both listed");

        assert_eq!(premiums.len(), 2);
        assert!((premiums.get("India").expect("india") - 0.0279).abs() < 1e-12);
        assert_eq!(http.recorded_requests().len(), 1);
    }

    #[tokio::test]
    async fn upstream_outage_is_unavailable_not_missing() {
        let http = Arc::new(FixtureHttpClient::new().with_status(DEFAULT_BETAS_URL, 502, ""));
        let source = DamodaranBetas::new(http);

        let error = source
            .unlevered_beta(BetaRequest::new("Advertising").expect("valid sector"))
            .await
            .expect_err("bad gateway");

        assert_eq!(error.kind(), SourceErrorKind::Unavailable);
    }
}
