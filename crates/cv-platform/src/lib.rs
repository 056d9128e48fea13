//! Convene Platform
//!
//! Backend for shared event planning:
//! - User registration and password login
//! - Stateless HS256 session tokens
//! - Events owned by the user who created them
//! - Attendee lists editable only by the event owner

pub mod api;
pub mod domain;
pub mod error;
pub mod platform;
pub mod repository;
pub mod service;

pub use domain::*;
pub use error::{ErrorKind, PlatformError, Result};
pub use platform::PlatformServices;
pub use repository::Store;
