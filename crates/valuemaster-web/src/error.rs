use axum::http::StatusCode;
use axum::response::{IntoResponse, Response};
use axum::Json;
use serde_json::{Map, Value};
use valuemaster_core::{SourceError, SourceErrorKind};

/// Acquisition failure rendered as a JSON error body.
///
/// Server-side failures carry a generic message; the underlying error is logged.
#[derive(Debug)]
pub struct ApiError {
    error: SourceError,
    operation: &'static str,
    null_field: Option<&'static str>,
}

impl ApiError {
    /// `operation` names what failed, e.g. "fetch unlevered beta".
    pub fn new(error: SourceError, operation: &'static str) -> Self {
        Self {
            error,
            operation,
            null_field: None,
        }
    }

    pub fn bad_request(message: impl Into<String>, operation: &'static str) -> Self {
        Self::new(SourceError::invalid_input(message), operation)
    }

    /// Include `"<field>": null` in the body so clients never read a number.
    pub fn with_null_field(mut self, field: &'static str) -> Self {
        self.null_field = Some(field);
        self
    }

    pub fn status(&self) -> StatusCode {
        match self.error.kind() {
            SourceErrorKind::InvalidInput => StatusCode::BAD_REQUEST,
            SourceErrorKind::NotFound => StatusCode::NOT_FOUND,
            SourceErrorKind::Unavailable | SourceErrorKind::Malformed => {
                StatusCode::INTERNAL_SERVER_ERROR
            }
        }
    }

    pub fn source_error(&self) -> &SourceError {
        &self.error
    }
}

impl IntoResponse for ApiError {
    fn into_response(self) -> Response {
        let status = self.status();

        let message = if status.is_server_error() {
            tracing::error!(
                operation = self.operation,
                code = self.error.code(),
                error = %self.error,
                "request failed upstream"
            );
            format!("Failed to {}", self.operation)
        } else {
            tracing::info!(
                operation = self.operation,
                code = self.error.code(),
                status = status.as_u16(),
                "request rejected"
            );
            self.error.message().to_owned()
        };

        let mut body = Map::new();
        if let Some(field) = self.null_field {
            body.insert(field.to_owned(), Value::Null);
        }
        body.insert(String::from("error"), Value::String(message));
        if !self.error.missing().is_empty() {
            body.insert(
                String::from("missing"),
                Value::Array(
                    self.error
                        .missing()
                        .iter()
                        .cloned()
                        .map(Value::String)
                        .collect(),
                ),
            );
        }

        (status, Json(Value::Object(body))).into_response()
    }
}
