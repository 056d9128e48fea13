//! Platform Wiring
//!
//! Builds every repository and service once from a [`Store`] and the auth
//! settings. Handlers receive clones of the `Arc`s held here.

use std::sync::Arc;

use cv_config::AppConfig;
use tracing::info;

use crate::error::Result;
use crate::repository::{AttendeeRepository, EventRepository, Store, UserRepository};
use crate::service::{
    AccountService, Argon2Config, AttendeeService, AuthConfig, AuthService, AuthorizationService, EventService,
    PasswordService,
};

#[derive(Clone)]
pub struct PlatformServices {
    pub store: Store,
    pub auth_service: Arc<AuthService>,
    pub authz_service: Arc<AuthorizationService>,
    pub accounts: Arc<AccountService>,
    pub events: Arc<EventService>,
    pub attendees: Arc<AttendeeService>,
}

impl PlatformServices {
    pub fn new(store: Store, auth_config: AuthConfig, argon2_config: Argon2Config) -> Result<Self> {
        let user_repo = Arc::new(UserRepository::new(&store));
        let event_repo = Arc::new(EventRepository::new(&store));
        let attendee_repo = Arc::new(AttendeeRepository::new(&store));

        let auth_service = Arc::new(AuthService::new(auth_config)?);
        let password_service = Arc::new(PasswordService::new(argon2_config)?);

        let authz_service = Arc::new(AuthorizationService::new(auth_service.clone(), user_repo.clone()));
        let accounts = Arc::new(AccountService::new(
            user_repo.clone(),
            password_service,
            auth_service.clone(),
        ));
        let events = Arc::new(EventService::new(event_repo.clone()));
        let attendees = Arc::new(AttendeeService::new(attendee_repo, event_repo, user_repo));

        info!("Platform services initialized");
        Ok(Self {
            store,
            auth_service,
            authz_service,
            accounts,
            events,
            attendees,
        })
    }

    pub fn from_config(store: Store, config: &AppConfig) -> Result<Self> {
        Self::new(
            store,
            AuthConfig::from_settings(&config.auth),
            Argon2Config::from(config.auth.argon2),
        )
    }
}
