//! API Middleware
//!
//! Bearer-token authentication for Axum handlers.

use std::sync::Arc;

use axum::{
    extract::FromRequestParts,
    http::{header::AUTHORIZATION, request::Parts},
    response::{IntoResponse, Response},
};

use crate::error::PlatformError;
use crate::service::{extract_bearer_token, AuthContext, AuthorizationService};

/// Shared state installed as a request extension
#[derive(Clone)]
pub struct AppState {
    pub authz_service: Arc<AuthorizationService>,
}

/// Extractor for authenticated requests.
///
/// Resolves the bearer token to an existing user. Handlers that take this
/// extractor never run for anonymous callers.
pub struct Authenticated(pub AuthContext);

#[axum::async_trait]
impl<S> FromRequestParts<S> for Authenticated
where
    S: Send + Sync,
{
    type Rejection = Response;

    async fn from_request_parts(parts: &mut Parts, _state: &S) -> Result<Self, Self::Rejection> {
        let app_state = parts
            .extensions
            .get::<AppState>()
            .cloned()
            .ok_or_else(|| {
                PlatformError::Internal {
                    message: "AppState extension missing".to_string(),
                }
                .into_response()
            })?;

        let token = match parts.headers.get(AUTHORIZATION) {
            None => None,
            Some(value) => {
                let header = value.to_str().map_err(|_| malformed_header().into_response())?;
                Some(extract_bearer_token(header).ok_or_else(|| malformed_header().into_response())?)
            }
        };

        let context = app_state
            .authz_service
            .resolve_caller(token)
            .await
            .map_err(IntoResponse::into_response)?;

        Ok(Authenticated(context))
    }
}

fn malformed_header() -> PlatformError {
    PlatformError::MalformedToken {
        message: "Authorization header must use the Bearer scheme".to_string(),
    }
}
