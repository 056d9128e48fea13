//! Shared fixtures for integration tests.

#![allow(dead_code)]

use std::time::Duration;

use chrono::{TimeZone, Utc};
use cv_config::DatabaseConfig;
use cv_platform::service::{Argon2Config, AuthConfig, AuthContext};
use cv_platform::{EventDetails, PlatformServices, Store, User};
use tempfile::TempDir;

pub const SECRET: &str = "integration-test-secret-0123456789abcdef";

/// Services over a fresh file-backed SQLite database. Keep the `TempDir`
/// alive for the duration of the test.
pub struct TestPlatform {
    pub services: PlatformServices,
    _dir: TempDir,
}

impl TestPlatform {
    pub async fn new() -> Self {
        let dir = TempDir::new().unwrap();
        let url = format!("sqlite://{}", dir.path().join("convene-test.db").display());
        let store = Store::connect(&DatabaseConfig {
            url,
            max_connections: 5,
            timeout_ms: 5000,
        })
        .await
        .unwrap();
        store.init_schema().await.unwrap();

        let services = PlatformServices::new(
            store,
            AuthConfig {
                secret_key: SECRET.to_string(),
                issuer: "convene".to_string(),
                token_ttl: Duration::from_secs(72 * 3600),
            },
            Argon2Config {
                memory_kib: 1024,
                iterations: 1,
                parallelism: 1,
            },
        )
        .unwrap();

        Self { services, _dir: dir }
    }

    /// Register a user and return it with a bearer token.
    pub async fn user(&self, email: &str, password: &str, name: &str) -> (User, String) {
        let user = self.services.accounts.register(email, password, name).await.unwrap();
        let token = self.services.accounts.login(email, password).await.unwrap().token;
        (user, token)
    }

    /// Register a user and resolve it into a caller context.
    pub async fn caller(&self, email: &str) -> AuthContext {
        let (_, token) = self.user(email, "password123", "Test User").await;
        self.services.authz_service.resolve_caller(Some(&token)).await.unwrap()
    }
}

pub fn details(name: &str) -> EventDetails {
    EventDetails {
        name: name.to_string(),
        description: "An event used in tests".to_string(),
        date: Utc.with_ymd_and_hms(2030, 6, 1, 18, 0, 0).unwrap(),
        location: "Main Hall".to_string(),
    }
}
