//! Event Service

use std::sync::Arc;

use tracing::info;

use crate::domain::{Event, EventDetails};
use crate::error::{PlatformError, Result};
use crate::repository::EventRepository;
use crate::service::authorization::{checks, AuthContext};

pub struct EventService {
    event_repo: Arc<EventRepository>,
}

impl EventService {
    pub fn new(event_repo: Arc<EventRepository>) -> Self {
        Self { event_repo }
    }

    /// Create an event owned by the caller.
    pub async fn create(&self, ctx: &AuthContext, details: EventDetails) -> Result<Event> {
        let event = self.event_repo.insert(ctx.user_id(), &details).await?;
        info!(event_id = event.id, owner_id = event.owner_id, "Event created");
        Ok(event)
    }

    pub async fn get(&self, id: i64) -> Result<Option<Event>> {
        self.event_repo.find_by_id(id).await
    }

    pub async fn list(&self) -> Result<Vec<Event>> {
        self.event_repo.find_all().await
    }

    /// Replace the descriptive fields. The owner never changes.
    pub async fn update(&self, id: i64, ctx: &AuthContext, details: EventDetails) -> Result<Event> {
        let event = self.require_event(id).await?;
        checks::require_owner(ctx, &event, "update")?;

        let updated = self
            .event_repo
            .update_details(id, &details)
            .await?
            .ok_or_else(|| PlatformError::not_found("Event", id))?;

        info!(event_id = id, "Event updated");
        Ok(updated)
    }

    /// Delete the event together with its attendee list.
    pub async fn delete(&self, id: i64, ctx: &AuthContext) -> Result<()> {
        let event = self.require_event(id).await?;
        checks::require_owner(ctx, &event, "delete")?;

        if !self.event_repo.delete_cascade(id).await? {
            return Err(PlatformError::not_found("Event", id));
        }

        info!(event_id = id, "Event deleted");
        Ok(())
    }

    async fn require_event(&self, id: i64) -> Result<Event> {
        self.event_repo
            .find_by_id(id)
            .await?
            .ok_or_else(|| PlatformError::not_found("Event", id))
    }
}
