//! OpenAPI Documentation

use utoipa::openapi::security::{HttpAuthScheme, HttpBuilder, SecurityScheme};
use utoipa::{Modify, OpenApi};

/// Convene API OpenAPI Documentation
#[derive(OpenApi)]
#[openapi(
    info(
        title = "Convene API",
        version = "1.0.0",
        description = "Users, events and attendee lists"
    ),
    servers(
        (url = "http://localhost:8080", description = "Local development")
    ),
    tags(
        (name = "auth", description = "Registration and login"),
        (name = "events", description = "Events and their attendees"),
        (name = "attendees", description = "Events per attendee"),
        (name = "monitoring", description = "Health")
    ),
    paths(
        super::auth::register,
        super::auth::login,
        super::events::list_events,
        super::events::get_event,
        super::events::create_event,
        super::events::update_event,
        super::events::delete_event,
        super::events::list_attendees,
        super::events::add_attendee,
        super::events::remove_attendee,
        super::attendees::list_events_for_attendee,
        super::health,
    ),
    components(
        schemas(
            super::auth::RegisterRequest,
            super::auth::LoginRequest,
            super::auth::LoginResponse,
            super::auth::UserResponse,
            super::events::EventRequest,
            super::events::EventResponse,
            super::events::AttendeeResponse,
            super::common::ApiError,
            super::common::HealthResponse,
        )
    ),
    modifiers(&BearerAuthAddon)
)]
pub struct ConveneApiDoc;

/// Registers the `bearer_auth` scheme referenced by protected paths.
struct BearerAuthAddon;

impl Modify for BearerAuthAddon {
    fn modify(&self, openapi: &mut utoipa::openapi::OpenApi) {
        let components = openapi.components.get_or_insert_with(Default::default);
        components.add_security_scheme(
            "bearer_auth",
            SecurityScheme::Http(
                HttpBuilder::new()
                    .scheme(HttpAuthScheme::Bearer)
                    .bearer_format("JWT")
                    .build(),
            ),
        );
    }
}
