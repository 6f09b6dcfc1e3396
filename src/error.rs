//! Error types for the REST API.

use crate::market_data::MarketDataError;
use crate::payoff::PayoffError;
use crate::portfolio::PortfolioError;
use axum::Json;
use axum::http::StatusCode;
use axum::response::{IntoResponse, Response};
use serde::Serialize;
use utoipa::ToSchema;


/// API error response body.
#[derive(Debug, Serialize, ToSchema)]
pub struct ErrorResponse {
    /// Error message.
    pub error: String,
    /// Error code.
    pub code: String,
}

/// API error types.
#[derive(Debug, thiserror::Error)]
pub enum ApiError {
    /// Invalid request.
    #[error("Invalid request: {0}")]
    InvalidRequest(String),

    /// A strategy leg failed validation.
    #[error("Invalid leg: {0}")]
    InvalidLeg(String),

    /// The price sweep has too few points.
    #[error("Invalid price sweep: {0}")]
    EmptySweep(String),

    /// Resource not found.
    #[error("Not found: {0}")]
    NotFound(String),

    /// An upstream data provider failed.
    #[error("Upstream error: {0}")]
    Upstream(String),

    /// A data provider is not configured.
    #[error("Not configured: {0}")]
    NotConfigured(String),
}

impl ApiError {
    /// HTTP status and machine-readable code for this error.
    #[must_use]
    pub fn status_and_code(&self) -> (StatusCode, &'static str) {
        match self {
            ApiError::InvalidRequest(_) => (StatusCode::BAD_REQUEST, "INVALID_REQUEST"),
            ApiError::InvalidLeg(_) => (StatusCode::BAD_REQUEST, "INVALID_LEG"),
            ApiError::EmptySweep(_) => (StatusCode::BAD_REQUEST, "EMPTY_SWEEP"),
            ApiError::NotFound(_) => (StatusCode::NOT_FOUND, "NOT_FOUND"),
            ApiError::Upstream(_) => (StatusCode::BAD_GATEWAY, "UPSTREAM_ERROR"),
            ApiError::NotConfigured(_) => (StatusCode::SERVICE_UNAVAILABLE, "NOT_CONFIGURED"),
        }
    }
}

impl IntoResponse for ApiError {
    fn into_response(self) -> Response {
        let (status, code) = self.status_and_code();

        let body = Json(ErrorResponse {
            error: self.to_string(),
            code: code.to_string(),
        });

        (status, body).into_response()
    }
}

impl From<PayoffError> for ApiError {
    fn from(err: PayoffError) -> Self {
        match err {
            PayoffError::InvalidLeg { .. } => ApiError::InvalidLeg(err.to_string()),
            PayoffError::EmptySweep { .. } | PayoffError::InvalidSweepPoint(_) => {
                ApiError::EmptySweep(err.to_string())
            }
            PayoffError::InvalidUnderlyingPrice(_) | PayoffError::InvalidLotSize => {
                ApiError::InvalidRequest(err.to_string())
            }
        }
    }
}

impl From<MarketDataError> for ApiError {
    fn from(err: MarketDataError) -> Self {
        match err {
            MarketDataError::NoData(symbol) => ApiError::NotFound(symbol),
            MarketDataError::NotConfigured(what) => ApiError::NotConfigured(what),
            other => ApiError::Upstream(other.to_string()),
        }
    }
}

impl From<PortfolioError> for ApiError {
    fn from(err: PortfolioError) -> Self {
        ApiError::InvalidRequest(err.to_string())
    }
}
