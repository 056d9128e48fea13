//! Service Layer
//!
//! Business logic for accounts, tokens, events and attendees. Protected
//! operations take an explicit [`AuthContext`].

pub mod accounts;
pub mod attendees;
pub mod auth;
pub mod authorization;
pub mod events;
pub mod password;

pub use accounts::AccountService;
pub use attendees::AttendeeService;
pub use auth::{extract_bearer_token, AuthConfig, AuthService, IssuedToken, SessionClaims, VerifiedClaims};
pub use authorization::{checks, AuthContext, AuthorizationService};
pub use events::EventService;
pub use password::{Argon2Config, PasswordService};
