//! Account Service
//!
//! Registration and login. Argon2 work runs on the blocking pool so it does
//! not stall the async workers.

use std::sync::Arc;

use tracing::{info, warn};

use crate::domain::{NewUser, User};
use crate::error::{PlatformError, Result};
use crate::repository::UserRepository;
use crate::service::auth::{AuthService, IssuedToken};
use crate::service::password::PasswordService;

pub struct AccountService {
    user_repo: Arc<UserRepository>,
    password_service: Arc<PasswordService>,
    auth_service: Arc<AuthService>,
}

impl AccountService {
    pub fn new(
        user_repo: Arc<UserRepository>,
        password_service: Arc<PasswordService>,
        auth_service: Arc<AuthService>,
    ) -> Self {
        Self { user_repo, password_service, auth_service }
    }

    /// Hash the password and store a new user.
    ///
    /// Fails with `Duplicate` when the email is taken.
    pub async fn register(&self, email: &str, password: &str, name: &str) -> Result<User> {
        let hash = {
            let passwords = self.password_service.clone();
            let password = password.to_string();
            blocking(move || passwords.hash_password(&password)).await?
        };

        let user = self
            .user_repo
            .create(&NewUser::new(email, hash, name))
            .await
            .map_err(|e| {
                if matches!(e, PlatformError::Duplicate { .. }) {
                    warn!(email, "Registration rejected: email already registered");
                }
                e
            })?;

        info!(user_id = user.id, "User registered");
        Ok(user)
    }

    /// Check credentials and issue a session token.
    ///
    /// Unknown email and wrong password both give `InvalidCredentials`, and
    /// both pay for one Argon2 verification.
    pub async fn login(&self, email: &str, password: &str) -> Result<IssuedToken> {
        let user = self.user_repo.find_by_email(email).await?;

        let passwords = self.password_service.clone();
        let candidate = password.to_string();
        let stored_hash = user.as_ref().map(|u| u.password_hash.clone());
        let verified = blocking(move || match stored_hash {
            Some(hash) => passwords.verify_password(&candidate, &hash),
            None => {
                passwords.verify_dummy(&candidate);
                Ok(false)
            }
        })
        .await?;

        match (user, verified) {
            (Some(user), true) => {
                let token = self.auth_service.issue(user.id)?;
                info!(user_id = user.id, "User logged in");
                Ok(token)
            }
            _ => {
                warn!("Login failed: invalid credentials");
                Err(PlatformError::InvalidCredentials)
            }
        }
    }
}

async fn blocking<T, F>(f: F) -> Result<T>
where
    F: FnOnce() -> Result<T> + Send + 'static,
    T: Send + 'static,
{
    tokio::task::spawn_blocking(f)
        .await
        .map_err(|e| PlatformError::Internal {
            message: format!("blocking task failed: {}", e),
        })?
}
