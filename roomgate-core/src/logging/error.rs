//! Logging setup errors

use thiserror::Error;

#[derive(Debug, Clone, PartialEq, Eq, Error)]
pub enum LoggingError {
    /// A global subscriber was already installed
    #[error("Logging already initialized: {0}")]
    AlreadyInitialized(String),

    #[error("Unknown log level '{0}' (expected trace, debug, info, warn or error)")]
    UnknownLevel(String),
}
