//! Error handling for the FieldSense server
//!
//! Provides consistent JSON error responses and maps forecast failures onto
//! the session's fetch-error state.

use axum::{
    http::StatusCode,
    response::{IntoResponse, Response},
    Json,
};
use serde::Serialize;
use shared::{FetchFailure, FetchFailureKind};
use thiserror::Error;

/// Application error types
#[derive(Error, Debug)]
pub enum AppError {
    // Validation errors
    #[error("Validation error: {message}")]
    Validation { field: String, message: String },

    #[error("Resource not found: {0}")]
    NotFound(String),

    // Forecast provider errors
    #[error("Weather API key is not configured")]
    WeatherNotConfigured,

    #[error("Weather API rejected the configured key")]
    WeatherUnauthorized,

    #[error("Weather API responded with status {status}")]
    WeatherUpstream { status: u16 },

    /// Transport or decode failure; the message never carries the request URL
    #[error("Weather API request failed: {0}")]
    WeatherRequest(String),
}

impl AppError {
    pub fn validation(field: &str, message: impl Into<String>) -> Self {
        AppError::Validation {
            field: field.to_string(),
            message: message.into(),
        }
    }

    /// Session-facing view of a forecast failure
    pub fn fetch_failure(&self) -> FetchFailure {
        let (kind, message) = match self {
            AppError::WeatherNotConfigured => (
                FetchFailureKind::Configuration,
                "Weather forecasts are unavailable: no API key is configured".to_string(),
            ),
            AppError::WeatherUnauthorized => (
                FetchFailureKind::Unauthorized,
                "The weather service rejected the API key".to_string(),
            ),
            AppError::WeatherUpstream { status } => (
                FetchFailureKind::Upstream,
                format!("The weather service responded with status {}", status),
            ),
            _ => (
                FetchFailureKind::Network,
                "The weather service could not be reached".to_string(),
            ),
        };
        FetchFailure { kind, message }
    }
}

/// Error response structure
#[derive(Serialize)]
pub struct ErrorResponse {
    pub error: ErrorDetail,
}

#[derive(Serialize)]
pub struct ErrorDetail {
    pub code: String,
    pub message: String,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub field: Option<String>,
}

impl IntoResponse for AppError {
    fn into_response(self) -> Response {
        let (status, error_detail) = match &self {
            AppError::Validation { field, message } => (
                StatusCode::BAD_REQUEST,
                ErrorDetail {
                    code: "VALIDATION_ERROR".to_string(),
                    message: message.clone(),
                    field: Some(field.clone()),
                },
            ),
            AppError::NotFound(resource) => (
                StatusCode::NOT_FOUND,
                ErrorDetail {
                    code: "NOT_FOUND".to_string(),
                    message: format!("{} not found", resource),
                    field: None,
                },
            ),
            AppError::WeatherNotConfigured => (
                StatusCode::SERVICE_UNAVAILABLE,
                ErrorDetail {
                    code: "WEATHER_NOT_CONFIGURED".to_string(),
                    message: "Weather forecasts are unavailable: no API key is configured"
                        .to_string(),
                    field: None,
                },
            ),
            AppError::WeatherUnauthorized => (
                StatusCode::BAD_GATEWAY,
                ErrorDetail {
                    code: "WEATHER_UNAUTHORIZED".to_string(),
                    message: "The weather service rejected the API key".to_string(),
                    field: None,
                },
            ),
            AppError::WeatherUpstream { status } => (
                StatusCode::BAD_GATEWAY,
                ErrorDetail {
                    code: "WEATHER_UPSTREAM_ERROR".to_string(),
                    message: format!("The weather service responded with status {}", status),
                    field: None,
                },
            ),
            AppError::WeatherRequest(_) => (
                StatusCode::BAD_GATEWAY,
                ErrorDetail {
                    code: "WEATHER_REQUEST_FAILED".to_string(),
                    message: "The weather service could not be reached".to_string(),
                    field: None,
                },
            ),
        };

        // Log the error for debugging
        tracing::error!("Error: {:?}", self);

        (status, Json(ErrorResponse { error: error_detail })).into_response()
    }
}

impl From<validator::ValidationErrors> for AppError {
    fn from(errors: validator::ValidationErrors) -> Self {
        let field = errors
            .field_errors()
            .keys()
            .next()
            .map(|f| f.to_string())
            .unwrap_or_default();
        AppError::Validation {
            field,
            message: errors.to_string(),
        }
    }
}

/// Result type alias for handlers
pub type AppResult<T> = Result<T, AppError>;
