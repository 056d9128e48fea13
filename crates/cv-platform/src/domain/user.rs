//! User Entity

use serde::Serialize;
use std::fmt;

/// Registered user.
///
/// The password hash is write-only from the outside: it is skipped by serde
/// and redacted from `Debug` output.
#[derive(Clone, PartialEq, Eq, Serialize)]
#[serde(rename_all = "camelCase")]
pub struct User {
    pub id: i64,

    /// Unique, compared byte-for-byte
    pub email: String,

    pub name: String,

    #[serde(skip)]
    pub password_hash: String,
}

impl fmt::Debug for User {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.debug_struct("User")
            .field("id", &self.id)
            .field("email", &self.email)
            .field("name", &self.name)
            .field("password_hash", &"<redacted>")
            .finish()
    }
}

/// Data needed to insert a user; the id comes from the store.
#[derive(Clone)]
pub struct NewUser {
    pub email: String,
    pub password_hash: String,
    pub name: String,
}

impl NewUser {
    pub fn new(email: impl Into<String>, password_hash: impl Into<String>, name: impl Into<String>) -> Self {
        Self {
            email: email.into(),
            password_hash: password_hash.into(),
            name: name.into(),
        }
    }
}
