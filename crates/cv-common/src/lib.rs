//! Convene common runtime helpers
//!
//! Shared by the platform crate and the server binaries:
//! - Structured logging initialisation (tracing-subscriber)
//! - Graceful shutdown signal handling

pub mod logging;
pub mod shutdown;

pub use logging::{init_logging, LogFormat};
pub use shutdown::shutdown_signal;
