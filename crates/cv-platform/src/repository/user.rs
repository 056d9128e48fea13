//! User Repository

use sqlx::FromRow;
use tracing::debug;

use crate::domain::{NewUser, User};
use crate::error::{PlatformError, Result};
use crate::repository::{is_unique_violation, Store};

#[derive(FromRow)]
pub(crate) struct UserRow {
    pub id: i64,
    pub email: String,
    pub name: String,
    pub password_hash: String,
}

impl From<UserRow> for User {
    fn from(row: UserRow) -> Self {
        let UserRow { id, email, name, password_hash } = row;
        User { id, email, name, password_hash }
    }
}

pub struct UserRepository {
    store: Store,
}

impl UserRepository {
    pub fn new(store: &Store) -> Self {
        Self { store: store.clone() }
    }

    /// Insert a user. The email column is unique; a clash is reported as
    /// `Duplicate` rather than a store failure.
    pub async fn create(&self, new_user: &NewUser) -> Result<User> {
        let result = self
            .store
            .run(async {
                sqlx::query("INSERT INTO users (email, name, password_hash) VALUES (?, ?, ?)")
                    .bind(&new_user.email)
                    .bind(&new_user.name)
                    .bind(&new_user.password_hash)
                    .execute(self.store.pool())
                    .await
                    .map_err(|e| {
                        if is_unique_violation(&e) {
                            PlatformError::duplicate("User", "email", &new_user.email)
                        } else {
                            e.into()
                        }
                    })
            })
            .await?;

        Ok(User {
            id: result.last_insert_rowid(),
            email: new_user.email.clone(),
            name: new_user.name.clone(),
            password_hash: new_user.password_hash.clone(),
        })
    }

    pub async fn find_by_id(&self, id: i64) -> Result<Option<User>> {
        debug!(user_id = id, "Looking up user by id");
        let row = self
            .store
            .run(
                sqlx::query_as::<_, UserRow>(
                    "SELECT id, email, name, password_hash FROM users WHERE id = ?",
                )
                .bind(id)
                .fetch_optional(self.store.pool()),
            )
            .await?;
        Ok(row.map(Into::into))
    }

    /// Exact, case-sensitive match.
    pub async fn find_by_email(&self, email: &str) -> Result<Option<User>> {
        let row = self
            .store
            .run(
                sqlx::query_as::<_, UserRow>(
                    "SELECT id, email, name, password_hash FROM users WHERE email = ?",
                )
                .bind(email)
                .fetch_optional(self.store.pool()),
            )
            .await?;
        Ok(row.map(Into::into))
    }
}
