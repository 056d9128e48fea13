//! Events API
//!
//! Event catalog and per-event attendee lists. Reads are public; writes
//! require a bearer token and ownership of the event.

use std::sync::Arc;

use axum::{
    extract::{Path, State},
    http::StatusCode,
    routing::{get, post},
    Json, Router,
};
use axum_extra::extract::WithRejection;
use chrono::{DateTime, Utc};
use serde::{Deserialize, Serialize};
use utoipa::ToSchema;

use crate::api::auth::UserResponse;
use crate::api::common::ApiError;
use crate::api::middleware::Authenticated;
use crate::domain::{Attendee, Event, EventDetails};
use crate::error::PlatformError;
use crate::service::{AttendeeService, EventService};

/// Create or replace event request.
///
/// There is no owner field: the owner is the caller on create and never
/// changes afterwards. An `ownerId` sent by the client is ignored.
#[derive(Debug, Deserialize, ToSchema)]
#[serde(rename_all = "camelCase")]
pub struct EventRequest {
    /// At least 3 characters
    pub name: String,
    /// At least 10 characters
    pub description: String,
    /// RFC 3339 timestamp
    pub date: DateTime<Utc>,
    /// At least 3 characters
    pub location: String,
}

impl EventRequest {
    fn into_details(self) -> Result<EventDetails, PlatformError> {
        if self.name.chars().count() < 3 {
            return Err(PlatformError::validation("name must be at least 3 characters"));
        }
        if self.description.chars().count() < 10 {
            return Err(PlatformError::validation("description must be at least 10 characters"));
        }
        if self.location.chars().count() < 3 {
            return Err(PlatformError::validation("location must be at least 3 characters"));
        }
        Ok(EventDetails {
            name: self.name,
            description: self.description,
            date: self.date,
            location: self.location,
        })
    }
}

/// Event response DTO
#[derive(Debug, Serialize, ToSchema)]
#[serde(rename_all = "camelCase")]
pub struct EventResponse {
    pub id: i64,
    pub owner_id: i64,
    pub name: String,
    pub description: String,
    pub date: DateTime<Utc>,
    pub location: String,
}

impl From<Event> for EventResponse {
    fn from(e: Event) -> Self {
        Self {
            id: e.id,
            owner_id: e.owner_id,
            name: e.details.name,
            description: e.details.description,
            date: e.details.date,
            location: e.details.location,
        }
    }
}

/// Attendee response DTO
#[derive(Debug, Serialize, ToSchema)]
#[serde(rename_all = "camelCase")]
pub struct AttendeeResponse {
    pub id: i64,
    pub event_id: i64,
    pub user_id: i64,
}

impl From<Attendee> for AttendeeResponse {
    fn from(a: Attendee) -> Self {
        Self {
            id: a.id,
            event_id: a.event_id,
            user_id: a.user_id,
        }
    }
}

/// Events service state
#[derive(Clone)]
pub struct EventsState {
    pub events: Arc<EventService>,
    pub attendees: Arc<AttendeeService>,
}

/// List all events
#[utoipa::path(
    get,
    path = "/api/v1/events",
    tag = "events",
    responses(
        (status = 200, description = "All events ordered by id", body = Vec<EventResponse>)
    )
)]
pub async fn list_events(State(state): State<EventsState>) -> Result<Json<Vec<EventResponse>>, PlatformError> {
    let events = state.events.list().await?;
    Ok(Json(events.into_iter().map(Into::into).collect()))
}

/// Get event by ID
#[utoipa::path(
    get,
    path = "/api/v1/events/{id}",
    tag = "events",
    params(
        ("id" = i64, Path, description = "Event ID")
    ),
    responses(
        (status = 200, description = "Event found", body = EventResponse),
        (status = 404, description = "Event not found", body = ApiError)
    )
)]
pub async fn get_event(
    State(state): State<EventsState>,
    WithRejection(Path(id), _): WithRejection<Path<i64>, PlatformError>,
) -> Result<Json<EventResponse>, PlatformError> {
    let event = state
        .events
        .get(id)
        .await?
        .ok_or_else(|| PlatformError::not_found("Event", id))?;
    Ok(Json(event.into()))
}

/// Create an event owned by the caller
#[utoipa::path(
    post,
    path = "/api/v1/events",
    tag = "events",
    request_body = EventRequest,
    responses(
        (status = 201, description = "Event created", body = EventResponse),
        (status = 400, description = "Validation error", body = ApiError),
        (status = 401, description = "Not authenticated", body = ApiError)
    ),
    security(("bearer_auth" = []))
)]
pub async fn create_event(
    State(state): State<EventsState>,
    auth: Authenticated,
    WithRejection(Json(req), _): WithRejection<Json<EventRequest>, PlatformError>,
) -> Result<(StatusCode, Json<EventResponse>), PlatformError> {
    let details = req.into_details()?;
    let event = state.events.create(&auth.0, details).await?;
    Ok((StatusCode::CREATED, Json(event.into())))
}

/// Replace an event's details
#[utoipa::path(
    put,
    path = "/api/v1/events/{id}",
    tag = "events",
    params(
        ("id" = i64, Path, description = "Event ID")
    ),
    request_body = EventRequest,
    responses(
        (status = 200, description = "Event updated", body = EventResponse),
        (status = 400, description = "Validation error", body = ApiError),
        (status = 401, description = "Not authenticated", body = ApiError),
        (status = 403, description = "Caller does not own the event", body = ApiError),
        (status = 404, description = "Event not found", body = ApiError)
    ),
    security(("bearer_auth" = []))
)]
pub async fn update_event(
    State(state): State<EventsState>,
    auth: Authenticated,
    WithRejection(Path(id), _): WithRejection<Path<i64>, PlatformError>,
    WithRejection(Json(req), _): WithRejection<Json<EventRequest>, PlatformError>,
) -> Result<Json<EventResponse>, PlatformError> {
    let details = req.into_details()?;
    let event = state.events.update(id, &auth.0, details).await?;
    Ok(Json(event.into()))
}

/// Delete an event and its attendee list
#[utoipa::path(
    delete,
    path = "/api/v1/events/{id}",
    tag = "events",
    params(
        ("id" = i64, Path, description = "Event ID")
    ),
    responses(
        (status = 204, description = "Event deleted"),
        (status = 401, description = "Not authenticated", body = ApiError),
        (status = 403, description = "Caller does not own the event", body = ApiError),
        (status = 404, description = "Event not found", body = ApiError)
    ),
    security(("bearer_auth" = []))
)]
pub async fn delete_event(
    State(state): State<EventsState>,
    auth: Authenticated,
    WithRejection(Path(id), _): WithRejection<Path<i64>, PlatformError>,
) -> Result<StatusCode, PlatformError> {
    state.events.delete(id, &auth.0).await?;
    Ok(StatusCode::NO_CONTENT)
}

/// List users attending an event
#[utoipa::path(
    get,
    path = "/api/v1/events/{id}/attendees",
    tag = "events",
    params(
        ("id" = i64, Path, description = "Event ID")
    ),
    responses(
        (status = 200, description = "Attending users ordered by id", body = Vec<UserResponse>)
    )
)]
pub async fn list_attendees(
    State(state): State<EventsState>,
    WithRejection(Path(id), _): WithRejection<Path<i64>, PlatformError>,
) -> Result<Json<Vec<UserResponse>>, PlatformError> {
    let users = state.attendees.list_by_event(id).await?;
    Ok(Json(users.into_iter().map(Into::into).collect()))
}

/// Add a user to an event's attendees
#[utoipa::path(
    post,
    path = "/api/v1/events/{id}/attendees/{userId}",
    tag = "events",
    params(
        ("id" = i64, Path, description = "Event ID"),
        ("userId" = i64, Path, description = "User ID")
    ),
    responses(
        (status = 201, description = "Attendee added", body = AttendeeResponse),
        (status = 401, description = "Not authenticated", body = ApiError),
        (status = 403, description = "Caller does not own the event", body = ApiError),
        (status = 404, description = "Event or user not found", body = ApiError),
        (status = 409, description = "User already attends", body = ApiError)
    ),
    security(("bearer_auth" = []))
)]
pub async fn add_attendee(
    State(state): State<EventsState>,
    auth: Authenticated,
    WithRejection(Path((id, user_id)), _): WithRejection<Path<(i64, i64)>, PlatformError>,
) -> Result<(StatusCode, Json<AttendeeResponse>), PlatformError> {
    let attendee = state.attendees.add(id, &auth.0, user_id).await?;
    Ok((StatusCode::CREATED, Json(attendee.into())))
}

/// Remove a user from an event's attendees
#[utoipa::path(
    delete,
    path = "/api/v1/events/{id}/attendees/{userId}",
    tag = "events",
    params(
        ("id" = i64, Path, description = "Event ID"),
        ("userId" = i64, Path, description = "User ID")
    ),
    responses(
        (status = 204, description = "Attendee removed, or was not attending"),
        (status = 401, description = "Not authenticated", body = ApiError),
        (status = 403, description = "Caller does not own the event", body = ApiError),
        (status = 404, description = "Event not found", body = ApiError)
    ),
    security(("bearer_auth" = []))
)]
pub async fn remove_attendee(
    State(state): State<EventsState>,
    auth: Authenticated,
    WithRejection(Path((id, user_id)), _): WithRejection<Path<(i64, i64)>, PlatformError>,
) -> Result<StatusCode, PlatformError> {
    state.attendees.remove(id, &auth.0, user_id).await?;
    Ok(StatusCode::NO_CONTENT)
}

pub fn events_router(state: EventsState) -> Router {
    Router::new()
        .route("/", get(list_events).post(create_event))
        .route("/:id", get(get_event).put(update_event).delete(delete_event))
        .route("/:id/attendees", get(list_attendees))
        .route("/:id/attendees/:user_id", post(add_attendee).delete(remove_attendee))
        .with_state(state)
}
