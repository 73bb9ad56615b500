//! Custom error types for the API service

use axum::{
    Json,
    http::StatusCode,
    response::{IntoResponse, Response},
};
use common::error::ForecastError;
use serde_json::json;
use thiserror::Error;

/// Custom error type for the API service
#[derive(Error, Debug)]
pub enum ApiError {
    /// Bad request with message
    #[error("Bad request: {0}")]
    BadRequest(String),

    /// Header mapping through the AI integration failed
    #[error("AI mapping error: {0}")]
    AiMapping(String),
}

impl From<ForecastError> for ApiError {
    fn from(err: ForecastError) -> Self {
        match err {
            ForecastError::InsufficientHistory { .. } => ApiError::BadRequest(
                "Not enough historical data to generate forecast (minimum 2 records required)."
                    .to_string(),
            ),
            ForecastError::InvalidHorizon | ForecastError::DateOutOfRange => {
                ApiError::BadRequest(err.to_string())
            }
        }
    }
}

impl IntoResponse for ApiError {
    fn into_response(self) -> Response {
        let (status, error_message) = match self {
            ApiError::BadRequest(msg) => (StatusCode::BAD_REQUEST, msg),
            ApiError::AiMapping(msg) => (StatusCode::INTERNAL_SERVER_ERROR, msg),
        };

        let body = Json(json!({
            "error": error_message,
        }));

        (status, body).into_response()
    }
}
