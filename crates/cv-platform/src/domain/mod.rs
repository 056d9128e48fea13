//! Domain Models
//!
//! Core entities of the platform. Identifiers are store-assigned integers.

pub mod attendee;
pub mod event;
pub mod user;

pub use attendee::*;
pub use event::*;
pub use user::*;
