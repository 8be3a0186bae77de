use std::collections::BTreeMap;
use std::fmt::{Display, Formatter};
use std::future::Future;
use std::pin::Pin;
use std::sync::{Arc, Mutex};
use std::time::Duration;

use crate::acquirer::SourceError;

/// Outgoing GET request issued by a live acquirer.
///
/// No timeout is set unless a caller asks for one; the transport default applies.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct HttpRequest {
    pub url: String,
    pub headers: BTreeMap<String, String>,
    pub timeout_ms: Option<u64>,
}

impl HttpRequest {
    pub fn get(url: impl Into<String>) -> Self {
        Self {
            url: url.into(),
            headers: BTreeMap::new(),
            timeout_ms: None,
        }
    }

    pub fn with_header(mut self, name: impl Into<String>, value: impl Into<String>) -> Self {
        self.headers
            .insert(name.into().to_ascii_lowercase(), value.into());
        self
    }

    pub fn with_timeout_ms(mut self, timeout_ms: u64) -> Self {
        self.timeout_ms = Some(timeout_ms);
        self
    }
}

/// Raw upstream response.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct HttpResponse {
    pub status: u16,
    pub body: String,
}

impl HttpResponse {
    pub fn ok(body: impl Into<String>) -> Self {
        Self {
            status: 200,
            body: body.into(),
        }
    }

    pub fn with_status(status: u16, body: impl Into<String>) -> Self {
        Self {
            status,
            body: body.into(),
        }
    }

    pub const fn is_success(&self) -> bool {
        self.status >= 200 && self.status < 300
    }
}

/// Transport-level HTTP error.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct HttpError {
    message: String,
}

impl HttpError {
    pub fn new(message: impl Into<String>) -> Self {
        Self {
            message: message.into(),
        }
    }

    pub fn message(&self) -> &str {
        &self.message
    }
}

impl Display for HttpError {
    fn fmt(&self, f: &mut Formatter<'_>) -> std::fmt::Result {
        f.write_str(&self.message)
    }
}

impl std::error::Error for HttpError {}

pub type HttpFuture<'a> =
    Pin<Box<dyn Future<Output = Result<HttpResponse, HttpError>> + Send + 'a>>;

/// Transport contract shared by every live acquirer.
pub trait HttpClient: Send + Sync {
    fn execute<'a>(&'a self, request: HttpRequest) -> HttpFuture<'a>;
}

/// Production HTTP client backed by reqwest.
#[derive(Debug, Clone)]
pub struct ReqwestHttpClient {
    client: Arc<reqwest::Client>,
}

impl ReqwestHttpClient {
    pub fn new() -> Self {
        Self {
            client: Arc::new(
                reqwest::Client::builder()
                    .user_agent(concat!("valuemaster/", env!("CARGO_PKG_VERSION")))
                    .build()
                    .unwrap_or_else(|_| reqwest::Client::new()),
            ),
        }
    }
}

impl Default for ReqwestHttpClient {
    fn default() -> Self {
        Self::new()
    }
}

impl HttpClient for ReqwestHttpClient {
    fn execute<'a>(&'a self, request: HttpRequest) -> HttpFuture<'a> {
        Box::pin(async move {
            let mut builder = self.client.get(&request.url);

            for (name, value) in &request.headers {
                builder = builder.header(name, value);
            }

            if let Some(timeout_ms) = request.timeout_ms {
                builder = builder.timeout(Duration::from_millis(timeout_ms));
            }

            let response = builder.send().await.map_err(|e| {
                if e.is_timeout() {
                    HttpError::new(format!("request timeout: {}", e.without_url()))
                } else if e.is_connect() {
                    HttpError::new(format!("connection failed: {}", e.without_url()))
                } else {
                    HttpError::new(format!("request failed: {}", e.without_url()))
                }
            })?;

            let status = response.status().as_u16();
            let body = response.text().await.map_err(|e| {
                HttpError::new(format!("failed to read response body: {}", e.without_url()))
            })?;

            Ok(HttpResponse { status, body })
        })
    }
}

/// Canned transport for offline runs and tests.
///
/// A route matches when its path equals the request path and every query pair it
/// names appears in the request; among matches the route naming the most pairs wins.
/// Unknown URLs answer 404. Every requested URL is recorded in full.
#[derive(Debug, Default)]
pub struct FixtureHttpClient {
    routes: Vec<(String, Result<HttpResponse, HttpError>)>,
    requests: Mutex<Vec<String>>,
}

impl FixtureHttpClient {
    pub fn new() -> Self {
        Self::default()
    }

    pub fn with_body(self, url: &str, body: impl Into<String>) -> Self {
        self.with_response(url, Ok(HttpResponse::ok(body)))
    }

    pub fn with_status(self, url: &str, status: u16, body: impl Into<String>) -> Self {
        self.with_response(url, Ok(HttpResponse::with_status(status, body)))
    }

    pub fn with_failure(self, url: &str, message: impl Into<String>) -> Self {
        self.with_response(url, Err(HttpError::new(message)))
    }

    fn with_response(mut self, url: &str, response: Result<HttpResponse, HttpError>) -> Self {
        self.routes.retain(|(route, _)| route != url);
        self.routes.push((url.to_owned(), response));
        self
    }

    fn route(&self, url: &str) -> Option<&Result<HttpResponse, HttpError>> {
        let (path, query) = split_url(url);
        self.routes
            .iter()
            .filter_map(|(route, response)| {
                let (route_path, route_query) = split_url(route);
                if route_path != path {
                    return None;
                }
                let pairs: Vec<&str> = query_pairs(route_query).collect();
                pairs
                    .iter()
                    .all(|pair| query_pairs(query).any(|candidate| candidate == *pair))
                    .then_some((pairs.len(), response))
            })
            .max_by_key(|(specificity, _)| *specificity)
            .map(|(_, response)| response)
    }

    pub fn recorded_requests(&self) -> Vec<String> {
        self.requests
            .lock()
            .unwrap_or_else(|poisoned| poisoned.into_inner())
            .clone()
    }
}

impl HttpClient for FixtureHttpClient {
    fn execute<'a>(&'a self, request: HttpRequest) -> HttpFuture<'a> {
        let response = self
            .route(&request.url)
            .cloned()
            .unwrap_or_else(|| Ok(HttpResponse::with_status(404, "")));
        self.requests
            .lock()
            .unwrap_or_else(|poisoned| poisoned.into_inner())
            .push(request.url);
        Box::pin(async move { response })
    }
}

fn split_url(url: &str) -> (&str, &str) {
    url.split_once('?').unwrap_or((url, ""))
}

fn query_pairs(query: &str) -> impl Iterator<Item = &str> {
    query.split('&').filter(|pair| !pair.is_empty())
}

/// Single-attempt fetch shared by the live acquirers.
///
/// `label` names the upstream in logs and errors; URLs may carry credentials and are
/// never logged.
pub async fn fetch_text(
    client: &dyn HttpClient,
    request: HttpRequest,
    label: &str,
) -> Result<String, SourceError> {
    let response = client.execute(request).await.map_err(|e| {
        tracing::warn!(source = label, error = %e, "upstream transport failed");
        SourceError::unavailable(format!("{label} transport error: {}", e.message()))
    })?;

    if !response.is_success() {
        tracing::warn!(source = label, status = response.status, "upstream returned error status");
        return Err(SourceError::unavailable(format!(
            "{label} returned status {}",
            response.status
        )));
    }

    tracing::debug!(source = label, bytes = response.body.len(), "fetched upstream document");
    Ok(response.body)
}
