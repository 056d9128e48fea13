//! Attendee Repository
//!
//! The `(event_id, user_id)` pair is unique in the schema, so membership is
//! created with a single INSERT and the constraint decides duplicates.

use crate::domain::{Attendee, User};
use crate::error::{PlatformError, Result};
use crate::repository::user::UserRow;
use crate::repository::{is_foreign_key_violation, is_unique_violation, Store};

/// Outcome of a failed membership insert, before it becomes an error.
enum InsertFailure {
    Duplicate,
    MissingReference,
    Store(sqlx::Error),
}

pub struct AttendeeRepository {
    store: Store,
}

impl AttendeeRepository {
    pub fn new(store: &Store) -> Self {
        Self { store: store.clone() }
    }

    /// Atomically insert the pair.
    ///
    /// Fails with `AlreadyMember` on a unique violation and with `NotFound`
    /// if the event or user row disappeared before the insert.
    pub async fn insert(&self, event_id: i64, user_id: i64) -> Result<Attendee> {
        let outcome = self
            .store
            .run(async {
                let result = sqlx::query("INSERT INTO attendees (event_id, user_id) VALUES (?, ?)")
                    .bind(event_id)
                    .bind(user_id)
                    .execute(self.store.pool())
                    .await;

                Ok::<_, PlatformError>(match result {
                    Ok(done) => Ok(done.last_insert_rowid()),
                    Err(e) if is_unique_violation(&e) => Err(InsertFailure::Duplicate),
                    Err(e) if is_foreign_key_violation(&e) => Err(InsertFailure::MissingReference),
                    Err(e) => Err(InsertFailure::Store(e)),
                })
            })
            .await?;

        match outcome {
            Ok(id) => Ok(Attendee { id, event_id, user_id }),
            Err(InsertFailure::Duplicate) => Err(PlatformError::AlreadyMember { event_id, user_id }),
            Err(InsertFailure::MissingReference) => Err(self.missing_reference(event_id, user_id).await),
            Err(InsertFailure::Store(e)) => Err(e.into()),
        }
    }

    // The store does not say which foreign key failed.
    async fn missing_reference(&self, event_id: i64, user_id: i64) -> PlatformError {
        let event_exists = self
            .store
            .run(
                sqlx::query_scalar::<_, i64>("SELECT COUNT(*) FROM events WHERE id = ?")
                    .bind(event_id)
                    .fetch_one(self.store.pool()),
            )
            .await;

        match event_exists {
            Ok(0) => PlatformError::not_found("Event", event_id),
            Ok(_) => PlatformError::not_found("User", user_id),
            Err(e) => e,
        }
    }

    /// Delete the pair if present. Returns whether a row was removed.
    pub async fn delete(&self, event_id: i64, user_id: i64) -> Result<bool> {
        let result = self
            .store
            .run(
                sqlx::query("DELETE FROM attendees WHERE event_id = ? AND user_id = ?")
                    .bind(event_id)
                    .bind(user_id)
                    .execute(self.store.pool()),
            )
            .await?;
        Ok(result.rows_affected() > 0)
    }

    /// Users attending the event.
    pub async fn find_users_by_event(&self, event_id: i64) -> Result<Vec<User>> {
        let rows = self
            .store
            .run(
                sqlx::query_as::<_, UserRow>(
                    r#"
                    SELECT u.id, u.email, u.name, u.password_hash
                    FROM users u
                    JOIN attendees a ON a.user_id = u.id
                    WHERE a.event_id = ?
                    ORDER BY u.id
                    "#,
                )
                .bind(event_id)
                .fetch_all(self.store.pool()),
            )
            .await?;
        Ok(rows.into_iter().map(Into::into).collect())
    }
}
