//! API Layer
//!
//! REST endpoints under `/api/v1`, plus health and Swagger UI.

pub mod attendees;
pub mod auth;
pub mod common;
pub mod events;
pub mod middleware;
pub mod openapi;

pub use attendees::{attendees_router, AttendeesState};
pub use auth::{auth_router, AuthApiState};
pub use common::*;
pub use events::{events_router, EventsState};
pub use middleware::{AppState, Authenticated};
pub use openapi::ConveneApiDoc;

use axum::{routing::get, Extension, Json, Router};
use utoipa::OpenApi;
use utoipa_swagger_ui::SwaggerUi;

use crate::platform::PlatformServices;

/// Transport options that do not belong to the core services
#[derive(Debug, Clone, Copy, Default)]
pub struct ApiSettings {
    pub case_insensitive_email: bool,
}

/// Liveness check
#[utoipa::path(
    get,
    path = "/health",
    tag = "monitoring",
    responses(
        (status = 200, description = "Service is up", body = HealthResponse)
    )
)]
pub async fn health() -> Json<HealthResponse> {
    Json(HealthResponse {
        status: "UP".to_string(),
        version: env!("CARGO_PKG_VERSION").to_string(),
    })
}

/// Build the full application router.
pub fn api_router(services: &PlatformServices, settings: ApiSettings) -> Router {
    let auth_state = AuthApiState {
        accounts: services.accounts.clone(),
        case_insensitive_email: settings.case_insensitive_email,
    };
    let events_state = EventsState {
        events: services.events.clone(),
        attendees: services.attendees.clone(),
    };
    let attendees_state = AttendeesState {
        attendees: services.attendees.clone(),
    };
    let app_state = AppState {
        authz_service: services.authz_service.clone(),
    };

    Router::new()
        .nest("/api/v1/auth", auth_router(auth_state))
        .nest("/api/v1/events", events_router(events_state))
        .nest("/api/v1/attendees", attendees_router(attendees_state))
        .route("/health", get(health))
        .merge(SwaggerUi::new("/swagger-ui").url("/api-doc/openapi.json", ConveneApiDoc::openapi()))
        .layer(Extension(app_state))
}
