//! Auth API
//!
//! Public registration and login endpoints.

use std::sync::Arc;

use axum::{extract::State, http::StatusCode, routing::post, Json, Router};
use axum_extra::extract::WithRejection;
use chrono::{DateTime, Utc};
use serde::{Deserialize, Serialize};
use utoipa::ToSchema;

use crate::api::common::ApiError;
use crate::domain::User;
use crate::error::PlatformError;
use crate::service::AccountService;

/// Registration request
#[derive(Debug, Deserialize, ToSchema)]
#[serde(rename_all = "camelCase")]
pub struct RegisterRequest {
    pub email: String,

    /// At least 8 characters
    pub password: String,

    pub name: String,
}

impl RegisterRequest {
    fn validate(&self) -> Result<(), PlatformError> {
        if !self.email.contains('@') {
            return Err(PlatformError::validation("email must be a valid address"));
        }
        if self.password.chars().count() < 8 {
            return Err(PlatformError::validation("password must be at least 8 characters"));
        }
        if self.name.chars().count() < 2 {
            return Err(PlatformError::validation("name must be at least 2 characters"));
        }
        Ok(())
    }
}

/// Login request
#[derive(Debug, Deserialize, ToSchema)]
#[serde(rename_all = "camelCase")]
pub struct LoginRequest {
    pub email: String,
    pub password: String,
}

impl LoginRequest {
    fn validate(&self) -> Result<(), PlatformError> {
        if !self.email.contains('@') {
            return Err(PlatformError::validation("email must be a valid address"));
        }
        if self.password.is_empty() {
            return Err(PlatformError::validation("password is required"));
        }
        Ok(())
    }
}

/// Public view of a user. Never carries the password hash.
#[derive(Debug, Serialize, ToSchema)]
#[serde(rename_all = "camelCase")]
pub struct UserResponse {
    pub id: i64,
    pub email: String,
    pub name: String,
}

impl From<User> for UserResponse {
    fn from(u: User) -> Self {
        Self {
            id: u.id,
            email: u.email,
            name: u.name,
        }
    }
}

/// Login response
#[derive(Debug, Serialize, ToSchema)]
#[serde(rename_all = "camelCase")]
pub struct LoginResponse {
    pub token: String,
    pub token_type: String,
    pub expires_at: DateTime<Utc>,
}

/// Auth API state
#[derive(Clone)]
pub struct AuthApiState {
    pub accounts: Arc<AccountService>,
    /// Lowercase emails before they reach the account service
    pub case_insensitive_email: bool,
}

impl AuthApiState {
    fn normalize_email(&self, email: String) -> String {
        if self.case_insensitive_email {
            email.to_lowercase()
        } else {
            email
        }
    }
}

/// Register a new user
#[utoipa::path(
    post,
    path = "/api/v1/auth/register",
    tag = "auth",
    request_body = RegisterRequest,
    responses(
        (status = 201, description = "User registered", body = UserResponse),
        (status = 400, description = "Validation error", body = ApiError),
        (status = 409, description = "Email already registered", body = ApiError)
    )
)]
pub async fn register(
    State(state): State<AuthApiState>,
    WithRejection(Json(req), _): WithRejection<Json<RegisterRequest>, PlatformError>,
) -> Result<(StatusCode, Json<UserResponse>), PlatformError> {
    req.validate()?;
    let email = state.normalize_email(req.email);

    let user = state.accounts.register(&email, &req.password, &req.name).await?;
    Ok((StatusCode::CREATED, Json(user.into())))
}

/// Log in with email and password
#[utoipa::path(
    post,
    path = "/api/v1/auth/login",
    tag = "auth",
    request_body = LoginRequest,
    responses(
        (status = 200, description = "Session token issued", body = LoginResponse),
        (status = 400, description = "Validation error", body = ApiError),
        (status = 401, description = "Invalid email or password", body = ApiError)
    )
)]
pub async fn login(
    State(state): State<AuthApiState>,
    WithRejection(Json(req), _): WithRejection<Json<LoginRequest>, PlatformError>,
) -> Result<Json<LoginResponse>, PlatformError> {
    req.validate()?;
    let email = state.normalize_email(req.email);

    let issued = state.accounts.login(&email, &req.password).await?;
    Ok(Json(LoginResponse {
        token: issued.token,
        token_type: "Bearer".to_string(),
        expires_at: issued.expires_at,
    }))
}

pub fn auth_router(state: AuthApiState) -> Router {
    Router::new()
        .route("/register", post(register))
        .route("/login", post(login))
        .with_state(state)
}
