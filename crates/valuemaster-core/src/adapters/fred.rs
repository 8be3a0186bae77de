use std::sync::Arc;

use serde::Deserialize;
use time::macros::format_description;
use time::{Date, OffsetDateTime};

use crate::acquirer::{AcquireFuture, MarketReturnSource, RiskFreeRateSource, SourceError};
use crate::http_client::{fetch_text, HttpClient, HttpRequest};
use crate::series::{annualize, mean, percent_to_fraction, total_return, trailing_window};
use crate::{MarketReturn, Observation, ObservationSeries, RiskFreeRate, SourceId};

pub const DEFAULT_FRED_BASE_URL: &str = "https://api.stlouisfed.org/fred/series/observations";

/// 10-year Treasury constant maturity yield, percent.
pub const TREASURY_10Y_SERIES: &str = "DGS10";
/// S&P 500 daily close.
pub const SP500_SERIES: &str = "SP500";

pub const DEFAULT_LOOKBACK_YEARS: i32 = 10;
/// Ten years of trading days.
pub const MARKET_WINDOW_OBSERVATIONS: usize = 2520;
pub const MARKET_WINDOW_YEARS: f64 = 10.0;

const REDACTED: &str = "REDACTED";

/// Shared FRED observations client used by both FRED-backed acquirers.
#[derive(Clone)]
pub struct FredSeriesClient {
    http_client: Arc<dyn HttpClient>,
    api_key: Option<String>,
    base_url: String,
}

impl FredSeriesClient {
    pub fn new(http_client: Arc<dyn HttpClient>, api_key: Option<String>) -> Self {
        Self {
            http_client,
            api_key: api_key.filter(|key| !key.trim().is_empty()),
            base_url: String::from(DEFAULT_FRED_BASE_URL),
        }
    }

    pub fn with_base_url(mut self, base_url: impl Into<String>) -> Self {
        self.base_url = base_url.into();
        self
    }

    /// Fetch one series, optionally starting at `observation_start`.
    ///
    /// # Errors
    ///
    /// `Unavailable` without an API key or when the request fails, `Malformed` when the
    /// payload is not an observations document.
    pub async fn fetch_series(
        &self,
        series_id: &str,
        observation_start: Option<Date>,
    ) -> Result<ObservationSeries, SourceError> {
        let Some(api_key) = self.api_key.as_deref() else {
            return Err(SourceError::unavailable(
                "FRED API key is not configured; set VALUEMASTER_FRED_API_KEY",
            ));
        };

        let start = observation_start.map(format_date).transpose()?;
        let url = self.observations_url(series_id, start.as_deref(), api_key);
        tracing::debug!(
            series = series_id,
            url = %self.observations_url(series_id, start.as_deref(), REDACTED),
            "requesting FRED observations"
        );

        let body = fetch_text(self.http_client.as_ref(), HttpRequest::get(url), "fred").await?;
        let series = parse_observations(&body)?;
        tracing::debug!(
            series = series_id,
            observations = series.len(),
            "parsed FRED observations"
        );
        Ok(series)
    }

    fn observations_url(&self, series_id: &str, start: Option<&str>, api_key: &str) -> String {
        let mut url = format!(
            "{}?series_id={}&api_key={}&file_type=json",
            self.base_url,
            urlencoding::encode(series_id),
            urlencoding::encode(api_key)
        );
        if let Some(start) = start {
            url.push_str("&observation_start=");
            url.push_str(&urlencoding::encode(start));
        }
        url
    }
}

/// Average 10-year Treasury yield over a trailing lookback window.
#[derive(Clone)]
pub struct FredRiskFreeRate {
    client: FredSeriesClient,
    series_id: String,
    min_observations: usize,
}

impl FredRiskFreeRate {
    pub fn new(client: FredSeriesClient) -> Self {
        Self {
            client,
            series_id: String::from(TREASURY_10Y_SERIES),
            min_observations: 1,
        }
    }

    /// Valid observations required before averaging; shorter histories fail outright.
    pub fn with_min_observations(mut self, min_observations: usize) -> Self {
        self.min_observations = min_observations.max(1);
        self
    }

    async fn fetch(&self) -> Result<RiskFreeRate, SourceError> {
        let start = lookback_start(OffsetDateTime::now_utc().date(), DEFAULT_LOOKBACK_YEARS);
        let series = self.client.fetch_series(&self.series_id, Some(start)).await?;
        reduce_risk_free_rate(&series, self.min_observations)
    }
}

impl RiskFreeRateSource for FredRiskFreeRate {
    fn id(&self) -> SourceId {
        SourceId::Fred
    }

    fn risk_free_rate(&self) -> AcquireFuture<'_, RiskFreeRate> {
        Box::pin(async move {
            let rate = self.fetch().await?;
            tracing::info!(rate = rate.rate, "acquired risk-free rate");
            Ok(rate)
        })
    }
}

/// Annualized S&P 500 return over the trailing 2520 trading days.
#[derive(Clone)]
pub struct FredMarketReturn {
    client: FredSeriesClient,
    series_id: String,
    window: usize,
    years: f64,
}

impl FredMarketReturn {
    pub fn new(client: FredSeriesClient) -> Self {
        Self {
            client,
            series_id: String::from(SP500_SERIES),
            window: MARKET_WINDOW_OBSERVATIONS,
            years: MARKET_WINDOW_YEARS,
        }
    }

    async fn fetch(&self) -> Result<MarketReturn, SourceError> {
        let series = self.client.fetch_series(&self.series_id, None).await?;
        reduce_market_return(&series, self.window, self.years)
    }
}

impl MarketReturnSource for FredMarketReturn {
    fn id(&self) -> SourceId {
        SourceId::Fred
    }

    fn market_return(&self) -> AcquireFuture<'_, MarketReturn> {
        Box::pin(async move {
            let rate = self.fetch().await?;
            tracing::info!(rate = rate.rate, "acquired market return");
            Ok(rate)
        })
    }
}

/// Mean of the valid yields, percent to decimal.
pub fn reduce_risk_free_rate(
    series: &ObservationSeries,
    min_observations: usize,
) -> Result<RiskFreeRate, SourceError> {
    let values = series.valid_values();
    if values.is_empty() {
        tracing::warn!(observations = series.len(), "no valid treasury yield observations");
        return Err(SourceError::malformed(
            "no valid treasury yield observations in range",
        ));
    }
    if values.len() < min_observations {
        tracing::warn!(
            valid = values.len(),
            required = min_observations,
            "treasury yield history too short"
        );
        return Err(SourceError::malformed(format!(
            "not enough treasury yield history: {} valid observations, {} required",
            values.len(),
            min_observations
        )));
    }

    let average = mean(&values)
        .ok_or_else(|| SourceError::malformed("average treasury yield is not a number"))?;
    Ok(RiskFreeRate::new(percent_to_fraction(average))?)
}

/// Trailing-window geometric annualized return.
pub fn reduce_market_return(
    series: &ObservationSeries,
    window: usize,
    years: f64,
) -> Result<MarketReturn, SourceError> {
    let trailing = series.trailing(window).ok_or_else(|| {
        tracing::warn!(observations = series.len(), required = window, "market history too short");
        SourceError::malformed("not enough data points to calculate 10-year return")
    })?;

    let values: Vec<f64> = trailing
        .valid_values()
        .into_iter()
        .filter(|value| *value != 0.0)
        .collect();
    let values = trailing_window(&values, window).ok_or_else(|| {
        tracing::warn!(valid = values.len(), required = window, "market window has gaps");
        SourceError::malformed("not enough valid data points to calculate 10-year return")
    })?;

    let total = total_return(values)
        .ok_or_else(|| SourceError::malformed("market window starts at zero"))?;
    let annual = annualize(total, years)
        .ok_or_else(|| SourceError::malformed("annualized market return is not finite"))?;
    Ok(MarketReturn::new(annual)?)
}

fn lookback_start(today: Date, years: i32) -> Date {
    let year = today.year() - years;
    today
        .replace_year(year)
        .or_else(|_| today.replace_day(28).and_then(|day| day.replace_year(year)))
        .unwrap_or(today)
}

fn format_date(date: Date) -> Result<String, SourceError> {
    date.format(format_description!("[year]-[month]-[day]"))
        .map_err(|e| SourceError::malformed(format!("failed to format observation_start: {e}")))
}

fn parse_observations(body: &str) -> Result<ObservationSeries, SourceError> {
    let response: FredObservationsResponse = serde_json::from_str(body)
        .map_err(|e| SourceError::malformed(format!("failed to parse FRED response: {e}")))?;

    let observations = response
        .observations
        .ok_or_else(|| SourceError::malformed("FRED response has no observations"))?;

    observations
        .into_iter()
        .map(|payload| Observation::parse(&payload.date, &payload.value).map_err(SourceError::from))
        .collect::<Result<Vec<_>, _>>()
        .map(ObservationSeries::new)
}

#[derive(Debug, Deserialize)]
struct FredObservationsResponse {
    #[serde(default)]
    observations: Option<Vec<FredObservationPayload>>,
}

#[derive(Debug, Deserialize)]
struct FredObservationPayload {
    date: String,
    value: String,
}
