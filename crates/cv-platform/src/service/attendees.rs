//! Attendee Service
//!
//! Membership of users in events. Only the event owner edits the list;
//! reading it is public.

use std::sync::Arc;

use tracing::{debug, info};

use crate::domain::{Attendee, Event, User};
use crate::error::{PlatformError, Result};
use crate::repository::{AttendeeRepository, EventRepository, UserRepository};
use crate::service::authorization::{checks, AuthContext};

pub struct AttendeeService {
    attendee_repo: Arc<AttendeeRepository>,
    event_repo: Arc<EventRepository>,
    user_repo: Arc<UserRepository>,
}

impl AttendeeService {
    pub fn new(
        attendee_repo: Arc<AttendeeRepository>,
        event_repo: Arc<EventRepository>,
        user_repo: Arc<UserRepository>,
    ) -> Self {
        Self { attendee_repo, event_repo, user_repo }
    }

    /// Add `user_id` to the event's attendees.
    ///
    /// Checks run in order: event exists, caller owns it, user exists. The
    /// insert itself is atomic, so concurrent adds of the same pair leave one
    /// row and the losers get `AlreadyMember`.
    pub async fn add(&self, event_id: i64, ctx: &AuthContext, user_id: i64) -> Result<Attendee> {
        let event = self.require_event(event_id).await?;
        checks::require_owner(ctx, &event, "add attendees to")?;

        if self.user_repo.find_by_id(user_id).await?.is_none() {
            return Err(PlatformError::not_found("User", user_id));
        }

        let attendee = self.attendee_repo.insert(event_id, user_id).await?;
        info!(event_id, user_id, "Attendee added");
        Ok(attendee)
    }

    /// Remove `user_id` from the event. Removing a non-member succeeds.
    pub async fn remove(&self, event_id: i64, ctx: &AuthContext, user_id: i64) -> Result<()> {
        let event = self.require_event(event_id).await?;
        checks::require_owner(ctx, &event, "remove attendees from")?;

        if self.attendee_repo.delete(event_id, user_id).await? {
            info!(event_id, user_id, "Attendee removed");
        } else {
            debug!(event_id, user_id, "User was not attending; nothing removed");
        }
        Ok(())
    }

    /// Users attending the event, ordered by id. An unknown event has no
    /// attendees.
    pub async fn list_by_event(&self, event_id: i64) -> Result<Vec<User>> {
        self.attendee_repo.find_users_by_event(event_id).await
    }

    /// Events the user attends, ordered by id.
    pub async fn list_events_for_user(&self, user_id: i64) -> Result<Vec<Event>> {
        self.event_repo.find_by_attendee(user_id).await
    }

    async fn require_event(&self, id: i64) -> Result<Event> {
        self.event_repo
            .find_by_id(id)
            .await?
            .ok_or_else(|| PlatformError::not_found("Event", id))
    }
}
