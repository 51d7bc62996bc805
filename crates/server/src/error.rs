//! HTTP error mapping

use axum::http::StatusCode;
use axum::response::{IntoResponse, Response};
use axum::Json;
use pricing_spi::PricingError;
use serde::Serialize;
use thiserror::Error;

/// Error returned by API handlers
#[derive(Error, Debug)]
pub enum ApiError {
    #[error(transparent)]
    Pricing(#[from] PricingError),

    #[error("Unsupported method: {0}")]
    UnsupportedMethod(String),
}

/// JSON error body
#[derive(Debug, Serialize)]
pub struct ErrorResponse {
    pub error: String,
    pub kind: &'static str,
}

impl ApiError {
    pub fn status(&self) -> StatusCode {
        match self {
            ApiError::Pricing(PricingError::UnknownModel(_)) => StatusCode::NOT_FOUND,
            ApiError::Pricing(PricingError::DataSourceUnavailable(_)) => {
                StatusCode::SERVICE_UNAVAILABLE
            }
            ApiError::Pricing(PricingError::InvalidTable(_)) => StatusCode::INTERNAL_SERVER_ERROR,
            ApiError::Pricing(_) | ApiError::UnsupportedMethod(_) => {
                StatusCode::UNPROCESSABLE_ENTITY
            }
        }
    }

    pub fn kind(&self) -> &'static str {
        match self {
            ApiError::Pricing(e) => e.kind(),
            ApiError::UnsupportedMethod(_) => "unsupported_method",
        }
    }
}

impl IntoResponse for ApiError {
    fn into_response(self) -> Response {
        let status = self.status();
        if status.is_server_error() {
            tracing::error!(error = %self, "request failed");
        } else {
            tracing::debug!(error = %self, "rejected request");
        }
        let body = ErrorResponse {
            error: self.to_string(),
            kind: self.kind(),
        };
        (status, Json(body)).into_response()
    }
}
