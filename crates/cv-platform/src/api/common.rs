//! Common API types and utilities

use axum::{
    extract::rejection::{JsonRejection, PathRejection},
    http::{header::WWW_AUTHENTICATE, HeaderValue, StatusCode},
    response::{IntoResponse, Response},
    Json,
};
use serde::Serialize;
use tracing::error;
use utoipa::ToSchema;

use crate::error::{ErrorKind, PlatformError};

/// Standard API error response
#[derive(Debug, Serialize, ToSchema)]
pub struct ApiError {
    pub error: String,
    pub message: String,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub details: Option<serde_json::Value>,
}

impl ApiError {
    pub fn new(error: impl Into<String>, message: impl Into<String>) -> Self {
        Self {
            error: error.into(),
            message: message.into(),
            details: None,
        }
    }
}

/// HTTP status for a platform error.
pub fn status_for(err: &PlatformError) -> StatusCode {
    match err.kind() {
        ErrorKind::Validation => StatusCode::BAD_REQUEST,
        ErrorKind::Authentication => StatusCode::UNAUTHORIZED,
        ErrorKind::Authorization => StatusCode::FORBIDDEN,
        ErrorKind::NotFound => StatusCode::NOT_FOUND,
        ErrorKind::Conflict => StatusCode::CONFLICT,
        ErrorKind::Dependency => match err {
            PlatformError::StoreUnavailable { .. } => StatusCode::SERVICE_UNAVAILABLE,
            _ => StatusCode::INTERNAL_SERVER_ERROR,
        },
    }
}

impl IntoResponse for PlatformError {
    fn into_response(self) -> Response {
        let status = status_for(&self);

        // Dependency failures are logged in full and reported generically.
        let message = if self.kind() == ErrorKind::Dependency {
            error!(error = %self, "Request failed on a dependency");
            match &self {
                PlatformError::StoreUnavailable { .. } => "Service temporarily unavailable".to_string(),
                _ => "Internal server error".to_string(),
            }
        } else {
            self.to_string()
        };

        let body = Json(ApiError::new(self.code(), message));
        let mut response = (status, body).into_response();
        if status == StatusCode::UNAUTHORIZED {
            response
                .headers_mut()
                .insert(WWW_AUTHENTICATE, HeaderValue::from_static("Bearer"));
        }
        response
    }
}

impl From<JsonRejection> for PlatformError {
    fn from(rejection: JsonRejection) -> Self {
        PlatformError::validation(format!("invalid request body: {}", rejection.body_text()))
    }
}

impl From<PathRejection> for PlatformError {
    fn from(rejection: PathRejection) -> Self {
        PlatformError::validation(format!("invalid path parameter: {}", rejection.body_text()))
    }
}

/// Health check response
#[derive(Debug, Serialize, ToSchema)]
pub struct HealthResponse {
    pub status: String,
    pub version: String,
}
