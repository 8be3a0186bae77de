use std::sync::Arc;

use axum::extract::rejection::{JsonRejection, QueryRejection};
use axum::extract::{Query, State};
use axum::routing::get;
use axum::{Json, Router};
use serde::{Deserialize, Serialize};
use valuemaster_core::{
    AcquirerSet, AcquisitionMode, BetaRequest, CapmEstimate, CapmEstimator, CapmRequest,
    CountryBatchRequest, CountryRequest, CountryRiskPremium, CountryRiskPremiums, MarketReturn,
    RiskFreeRate, UnleveredBeta,
};

use crate::error::ApiError;

/// Shared state for the HTTP server.
#[derive(Clone)]
pub struct AppState {
    estimator: Arc<CapmEstimator>,
}

impl AppState {
    #[must_use]
    pub fn new(acquirers: AcquirerSet) -> Self {
        Self {
            estimator: Arc::new(CapmEstimator::new(acquirers)),
        }
    }

    pub fn acquirers(&self) -> &AcquirerSet {
        self.estimator.acquirers()
    }

    pub fn mode(&self) -> AcquisitionMode {
        self.acquirers().mode()
    }
}

/// Create the router with every endpoint.
#[must_use]
pub fn create_router(state: AppState) -> Router {
    Router::new()
        .route("/health", get(health))
        .route("/api/risk-free-rate", get(risk_free_rate))
        .route("/api/market-return", get(market_return))
        .route("/api/unlevered-beta", get(unlevered_beta))
        .route(
            "/api/country-risk-premium",
            get(country_risk_premium).post(country_risk_premiums),
        )
        .route("/api/capm", get(capm))
        .with_state(state)
}

#[derive(Debug, Serialize, Deserialize, PartialEq, Eq)]
pub struct HealthResponse {
    pub status: String,
    pub version: String,
    pub mode: AcquisitionMode,
}

async fn health(State(state): State<AppState>) -> Json<HealthResponse> {
    Json(HealthResponse {
        status: String::from("healthy"),
        version: String::from(env!("CARGO_PKG_VERSION")),
        mode: state.mode(),
    })
}

async fn risk_free_rate(State(state): State<AppState>) -> Result<Json<RiskFreeRate>, ApiError> {
    const OPERATION: &str = "fetch risk-free rate";

    let rate = state
        .acquirers()
        .risk_free_rate()
        .risk_free_rate()
        .await
        .map_err(|error| ApiError::new(error, OPERATION).with_null_field("rate"))?;

    tracing::info!(rate = rate.rate, "served risk-free rate");
    Ok(Json(rate))
}

async fn market_return(State(state): State<AppState>) -> Result<Json<MarketReturn>, ApiError> {
    const OPERATION: &str = "fetch market return";

    let rate = state
        .acquirers()
        .market_return()
        .market_return()
        .await
        .map_err(|error| ApiError::new(error, OPERATION).with_null_field("rate"))?;

    tracing::info!(rate = rate.rate, "served market return");
    Ok(Json(rate))
}

#[derive(Debug, Default, Deserialize)]
pub struct SectorQuery {
    pub sector: Option<String>,
}

async fn unlevered_beta(
    State(state): State<AppState>,
    query: Result<Query<SectorQuery>, QueryRejection>,
) -> Result<Json<UnleveredBeta>, ApiError> {
    const OPERATION: &str = "fetch unlevered beta";

    let Query(query) =
        query.map_err(|rejection| ApiError::bad_request(rejection.body_text(), OPERATION))?;
    let request = BetaRequest::new(query.sector.unwrap_or_default())
        .map_err(|error| ApiError::new(error, OPERATION))?;

    let beta = state
        .acquirers()
        .unlevered_beta()
        .unlevered_beta(request)
        .await
        .map_err(|error| ApiError::new(error, OPERATION))?;

    tracing::info!(beta = beta.beta, "served unlevered beta");
    Ok(Json(beta))
}

#[derive(Debug, Default, Deserialize)]
pub struct CountryQuery {
    pub country: Option<String>,
}

async fn country_risk_premium(
    State(state): State<AppState>,
    query: Result<Query<CountryQuery>, QueryRejection>,
) -> Result<Json<CountryRiskPremium>, ApiError> {
    const OPERATION: &str = "fetch country risk premium";

    let Query(query) =
        query.map_err(|rejection| ApiError::bad_request(rejection.body_text(), OPERATION))?;
    let request = CountryRequest::new(query.country.unwrap_or_default())
        .map_err(|error| ApiError::new(error, OPERATION))?;

    let premium = state
        .acquirers()
        .country_risk_premium()
        .country_risk_premium(request)
        .await
        .map_err(|error| ApiError::new(error, OPERATION))?;

    tracing::info!(risk = premium.risk, "served country risk premium");
    Ok(Json(premium))
}

#[derive(Debug, Deserialize)]
pub struct CountriesBody {
    pub countries: Vec<String>,
}

async fn country_risk_premiums(
    State(state): State<AppState>,
    body: Result<Json<CountriesBody>, JsonRejection>,
) -> Result<Json<CountryRiskPremiums>, ApiError> {
    const OPERATION: &str = "fetch country risk premiums";

    let Json(body) = body.map_err(|_| {
        ApiError::bad_request("countries must be an array of country names", OPERATION)
    })?;
    let request = CountryBatchRequest::new(body.countries)
        .map_err(|error| ApiError::new(error, OPERATION))?;

    let premiums = state
        .acquirers()
        .country_risk_premium()
        .country_risk_premiums(request)
        .await
        .map_err(|error| ApiError::new(error, OPERATION))?;

    tracing::info!(count = premiums.len(), "served country risk premiums");
    Ok(Json(premiums))
}

#[derive(Debug, Default, Deserialize)]
pub struct CapmQuery {
    pub sector: Option<String>,
    pub country: Option<String>,
}

async fn capm(
    State(state): State<AppState>,
    query: Result<Query<CapmQuery>, QueryRejection>,
) -> Result<Json<CapmEstimate>, ApiError> {
    const OPERATION: &str = "estimate expected return";

    let Query(query) =
        query.map_err(|rejection| ApiError::bad_request(rejection.body_text(), OPERATION))?;
    // An empty `country=` means no country premium.
    let country = query.country.filter(|country| !country.trim().is_empty());
    let request = CapmRequest::new(query.sector.unwrap_or_default(), country)
        .map_err(|error| ApiError::new(error, OPERATION))?;

    let estimate = state
        .estimator
        .estimate(request)
        .await
        .map_err(|error| ApiError::new(error, OPERATION))?;

    tracing::info!(
        sector = estimate.sector.as_str(),
        expected_return = estimate.expected_return,
        "served capm estimate"
    );
    Ok(Json(estimate))
}

#[cfg(test)]
mod tests {
    use super::*;
    use axum::body::Body;
    use axum::http::{Request, StatusCode};
    use tower::ServiceExt;
    use valuemaster_core::OfflineMarketData;

    fn offline_router() -> Router {
        create_router(AppState::new(AcquirerSet::offline(OfflineMarketData::default())))
    }

    #[tokio::test]
    async fn health_reports_mode_and_version() {
        let response = offline_router()
            .oneshot(Request::get("/health").body(Body::empty()).expect("request"))
            .await
            .expect("response");

        assert_eq!(response.status(), StatusCode::OK);
        let body = axum::body::to_bytes(response.into_body(), usize::MAX)
            .await
            .expect("body");
        let health: HealthResponse = serde_json::from_slice(&body).expect("json");
        assert_eq!(health.status, "healthy");
        assert_eq!(health.mode, AcquisitionMode::Offline);
        assert_eq!(health.version, env!("CARGO_PKG_VERSION"));
    }

    #[tokio::test]
    async fn missing_sector_is_a_bad_request() {
        let response = offline_router()
            .oneshot(
                Request::get("/api/unlevered-beta")
                    .body(Body::empty())
                    .expect("request"),
            )
            .await
            .expect("response");

        assert_eq!(response.status(), StatusCode::BAD_REQUEST);
    }

    #[tokio::test]
    async fn unknown_route_is_not_found() {
        let response = offline_router()
            .oneshot(Request::get("/api/nothing").body(Body::empty()).expect("request"))
            .await
            .expect("response");

        assert_eq!(response.status(), StatusCode::NOT_FOUND);
    }
}
