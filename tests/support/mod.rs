//! Shared fixtures for the workspace behaviour tests.

#![allow(dead_code)]

use std::sync::Arc;

use time::macros::date;
use valuemaster_core::{AcquirerSet, AcquirerSetBuilder, FixtureHttpClient, OfflineMarketData};

pub const FRED_URL: &str = "https://fred.test/fred/series/observations";
pub const BETAS_URL: &str = "https://damodaran.test/datafile/Betas.html";
pub const PREMIUM_URL: &str = "https://damodaran.test/datafile/ctryprem.html";

pub const BETAS_HTML: &str = include_str!("../fixtures/betas.html");
pub const CTRYPREM_HTML: &str = include_str!("../fixtures/ctryprem.html");
pub const DGS10_JSON: &str = include_str!("../fixtures/dgs10.json");

/// Mean of the valid `dgs10.json` yields, as a decimal.
pub const DGS10_AVERAGE: f64 = 0.04;

/// FRED observations payload rising linearly from `first` to `last`.
pub fn sp500_payload(first: f64, last: f64, count: usize) -> String {
    let start = date!(2014 - 01 - 02);
    let step = if count > 1 {
        (last - first) / (count - 1) as f64
    } else {
        0.0
    };
    let observations: Vec<serde_json::Value> = (0..count)
        .map(|index| {
            let value = if index + 1 == count {
                last
            } else {
                first + step * index as f64
            };
            serde_json::json!({
                "date": (start + time::Duration::days(index as i64)).to_string(),
                "value": format!("{value:.2}"),
            })
        })
        .collect();
    serde_json::json!({ "observations": observations }).to_string()
}

/// Fixture transport answering every live upstream from the snapshots.
pub fn fixture_client() -> FixtureHttpClient {
    FixtureHttpClient::new()
        .with_body(&format!("{FRED_URL}?series_id=DGS10"), DGS10_JSON)
        .with_body(
            &format!("{FRED_URL}?series_id=SP500"),
            sp500_payload(2000.0, 4000.0, 2520),
        )
        .with_body(BETAS_URL, BETAS_HTML)
        .with_body(PREMIUM_URL, CTRYPREM_HTML)
}

pub fn live_acquirers(client: Arc<FixtureHttpClient>) -> AcquirerSet {
    AcquirerSetBuilder::new()
        .with_http_client(client)
        .with_fred_api_key("test-key")
        .with_fred_base_url(FRED_URL)
        .with_betas_url(BETAS_URL)
        .with_country_premium_url(PREMIUM_URL)
        .build()
}

/// Offline data set mirroring the fixture snapshots.
pub fn offline_acquirers() -> AcquirerSet {
    AcquirerSet::offline(
        OfflineMarketData::empty()
            .with_risk_free_rate(DGS10_AVERAGE)
            .with_market_return(2f64.powf(0.1) - 1.0)
            .with_beta("Advertising", 0.92)
            .with_beta("Banks (Regional)", 0.36)
            .with_country_premium("Brazil", 3.57)
            .with_country_premium("Germany", 0.0),
    )
}
