//! Event Repository

use chrono::{DateTime, Utc};
use sqlx::FromRow;
use tracing::debug;

use crate::domain::{Event, EventDetails};
use crate::error::{PlatformError, Result};
use crate::repository::{is_foreign_key_violation, Store};

#[derive(FromRow)]
pub(crate) struct EventRow {
    pub id: i64,
    pub owner_id: i64,
    pub name: String,
    pub description: String,
    pub date: DateTime<Utc>,
    pub location: String,
}

impl From<EventRow> for Event {
    fn from(row: EventRow) -> Self {
        let EventRow { id, owner_id, name, description, date, location } = row;
        Event {
            id,
            owner_id,
            details: EventDetails { name, description, date, location },
        }
    }
}

const SELECT_EVENT: &str = "SELECT id, owner_id, name, description, date, location FROM events";

pub struct EventRepository {
    store: Store,
}

impl EventRepository {
    pub fn new(store: &Store) -> Self {
        Self { store: store.clone() }
    }

    /// Insert an event for `owner_id`. The owner must exist.
    pub async fn insert(&self, owner_id: i64, details: &EventDetails) -> Result<Event> {
        let result = self
            .store
            .run(async {
                sqlx::query(
                    "INSERT INTO events (owner_id, name, description, date, location) VALUES (?, ?, ?, ?, ?)",
                )
                .bind(owner_id)
                .bind(&details.name)
                .bind(&details.description)
                .bind(details.date)
                .bind(&details.location)
                .execute(self.store.pool())
                .await
                .map_err(|e| {
                    if is_foreign_key_violation(&e) {
                        PlatformError::not_found("User", owner_id)
                    } else {
                        e.into()
                    }
                })
            })
            .await?;

        Ok(Event {
            id: result.last_insert_rowid(),
            owner_id,
            details: details.clone(),
        })
    }

    pub async fn find_by_id(&self, id: i64) -> Result<Option<Event>> {
        debug!(event_id = id, "Looking up event");
        let row = self
            .store
            .run(
                sqlx::query_as::<_, EventRow>(&format!("{} WHERE id = ?", SELECT_EVENT))
                    .bind(id)
                    .fetch_optional(self.store.pool()),
            )
            .await?;
        Ok(row.map(Into::into))
    }

    pub async fn find_all(&self) -> Result<Vec<Event>> {
        let rows = self
            .store
            .run(
                sqlx::query_as::<_, EventRow>(&format!("{} ORDER BY id", SELECT_EVENT))
                    .fetch_all(self.store.pool()),
            )
            .await?;
        Ok(rows.into_iter().map(Into::into).collect())
    }

    /// Events the user attends, via the attendees relation.
    pub async fn find_by_attendee(&self, user_id: i64) -> Result<Vec<Event>> {
        let rows = self
            .store
            .run(
                sqlx::query_as::<_, EventRow>(
                    r#"
                    SELECT e.id, e.owner_id, e.name, e.description, e.date, e.location
                    FROM events e
                    JOIN attendees a ON a.event_id = e.id
                    WHERE a.user_id = ?
                    ORDER BY e.id
                    "#,
                )
                .bind(user_id)
                .fetch_all(self.store.pool()),
            )
            .await?;
        Ok(rows.into_iter().map(Into::into).collect())
    }

    /// Replace the descriptive fields. `owner_id` is not part of the
    /// statement. Returns `None` when the row no longer exists.
    pub async fn update_details(&self, id: i64, details: &EventDetails) -> Result<Option<Event>> {
        let row = self
            .store
            .run(
                sqlx::query_as::<_, EventRow>(
                    r#"
                    UPDATE events
                    SET name = ?, description = ?, date = ?, location = ?
                    WHERE id = ?
                    RETURNING id, owner_id, name, description, date, location
                    "#,
                )
                .bind(&details.name)
                .bind(&details.description)
                .bind(details.date)
                .bind(&details.location)
                .bind(id)
                .fetch_optional(self.store.pool()),
            )
            .await?;
        Ok(row.map(Into::into))
    }

    /// Delete the event and its attendee rows in one transaction.
    pub async fn delete_cascade(&self, id: i64) -> Result<bool> {
        self.store
            .run(async {
                let mut tx = self.store.pool().begin().await?;

                let attendees = sqlx::query("DELETE FROM attendees WHERE event_id = ?")
                    .bind(id)
                    .execute(&mut *tx)
                    .await?;
                let events = sqlx::query("DELETE FROM events WHERE id = ?")
                    .bind(id)
                    .execute(&mut *tx)
                    .await?;

                tx.commit().await?;

                debug!(
                    event_id = id,
                    attendees_removed = attendees.rows_affected(),
                    "Event deleted"
                );
                Ok::<_, sqlx::Error>(events.rows_affected() > 0)
            })
            .await
    }
}
