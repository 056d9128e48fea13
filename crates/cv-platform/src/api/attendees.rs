//! Attendees API

use std::sync::Arc;

use axum::{
    extract::{Path, State},
    routing::get,
    Json, Router,
};
use axum_extra::extract::WithRejection;

use crate::api::events::EventResponse;
use crate::error::PlatformError;
use crate::service::AttendeeService;

#[derive(Clone)]
pub struct AttendeesState {
    pub attendees: Arc<AttendeeService>,
}

/// List events a user attends
#[utoipa::path(
    get,
    path = "/api/v1/attendees/{id}/events",
    tag = "attendees",
    params(
        ("id" = i64, Path, description = "User ID")
    ),
    responses(
        (status = 200, description = "Events ordered by id", body = Vec<EventResponse>)
    )
)]
pub async fn list_events_for_attendee(
    State(state): State<AttendeesState>,
    WithRejection(Path(id), _): WithRejection<Path<i64>, PlatformError>,
) -> Result<Json<Vec<EventResponse>>, PlatformError> {
    let events = state.attendees.list_events_for_user(id).await?;
    Ok(Json(events.into_iter().map(Into::into).collect()))
}

pub fn attendees_router(state: AttendeesState) -> Router {
    Router::new()
        .route("/:id/events", get(list_events_for_attendee))
        .with_state(state)
}
