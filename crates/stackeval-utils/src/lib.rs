//! # stackeval utilities
//!
//! Shared helpers for the stackeval workspace. Right now that is the logging
//! setup built on `tracing`.

pub mod logging;

// Re-export commonly used logging functions for convenience
pub use logging::{init_logging, init_logging_with_level, LogFormat, LogGuard, LogLevel, LoggingError};
pub use tracing::{debug, error, info, trace, warn};
