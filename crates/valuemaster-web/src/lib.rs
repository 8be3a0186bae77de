//! # ValueMaster Web
//!
//! JSON API over the ValueMaster acquirers and CAPM estimator.
//!
//! | Endpoint | Method | Body |
//! |----------|--------|------|
//! | `/health` | GET | `{ status, version, mode }` |
//! | `/api/risk-free-rate` | GET | `{ rate }` |
//! | `/api/market-return` | GET | `{ rate }` |
//! | `/api/unlevered-beta?sector=` | GET | `{ beta }` |
//! | `/api/country-risk-premium?country=` | GET | `{ risk }` |
//! | `/api/country-risk-premium` | POST | `{ risks }` |
//! | `/api/capm?sector=&country=` | GET | estimate with every input |
//!
//! Failures map to 400 (invalid input), 404 (missing key, with `missing` names)
//! and 500 (upstream failure, generic message).

pub mod config;
pub mod error;
pub mod routes;

pub use config::{ConfigError, WebConfig, DEFAULT_BIND_ADDR};
pub use error::ApiError;
pub use routes::{create_router, AppState, HealthResponse};
