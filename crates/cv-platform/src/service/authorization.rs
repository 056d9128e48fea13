//! Authorization Service
//!
//! Resolves the caller of a protected operation from a bearer token and
//! holds the ownership rule for events and their attendee lists.

use std::sync::Arc;

use tracing::{debug, warn};

use crate::domain::User;
use crate::error::{PlatformError, Result};
use crate::repository::UserRepository;
use crate::service::auth::AuthService;

/// Identity of a resolved caller.
///
/// Only [`AuthorizationService::resolve_caller`] can build one, so holding
/// an `&AuthContext` proves the token was checked and the user exists.
#[derive(Debug, Clone)]
pub struct AuthContext {
    user: User,
}

impl AuthContext {
    pub fn user(&self) -> &User {
        &self.user
    }

    pub fn user_id(&self) -> i64 {
        self.user.id
    }
}

pub struct AuthorizationService {
    auth_service: Arc<AuthService>,
    user_repo: Arc<UserRepository>,
}

impl AuthorizationService {
    pub fn new(auth_service: Arc<AuthService>, user_repo: Arc<UserRepository>) -> Self {
        Self { auth_service, user_repo }
    }

    /// Turn an optional bearer token into an [`AuthContext`].
    pub async fn resolve_caller(&self, token: Option<&str>) -> Result<AuthContext> {
        let token = token.ok_or(PlatformError::MissingToken)?;

        let claims = self.auth_service.validate(token).map_err(|e| {
            warn!(error = %e, "Rejected bearer token");
            e
        })?;

        match self.user_repo.find_by_id(claims.user_id).await? {
            Some(user) => {
                debug!(user_id = user.id, "Resolved caller");
                Ok(AuthContext { user })
            }
            None => {
                warn!(user_id = claims.user_id, "Token subject no longer exists");
                Err(PlatformError::UnknownSubject { user_id: claims.user_id })
            }
        }
    }
}

/// Ownership checks for event mutations.
pub mod checks {
    use tracing::warn;

    use super::AuthContext;
    use crate::domain::Event;
    use crate::error::{PlatformError, Result};

    /// True iff the acting user owns the resource.
    pub fn permits(acting_user_id: i64, resource_owner_id: i64) -> bool {
        acting_user_id == resource_owner_id
    }

    /// `Forbidden` unless the caller owns `event`.
    pub fn require_owner(ctx: &AuthContext, event: &Event, action: &str) -> Result<()> {
        if permits(ctx.user_id(), event.owner_id) {
            return Ok(());
        }
        warn!(
            user_id = ctx.user_id(),
            event_id = event.id,
            owner_id = event.owner_id,
            action,
            "Ownership check failed"
        );
        Err(PlatformError::forbidden(format!(
            "only the event owner may {} event {}",
            action, event.id
        )))
    }

}
