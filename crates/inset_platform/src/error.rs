//! Platform error types

use thiserror::Error;

/// Platform-related errors
#[derive(Error, Debug)]
pub enum PlatformError {
    /// The event source failed while delivering events
    #[error("Event source failed: {0}")]
    EventSource(String),
}

/// Result type for platform operations
pub type Result<T> = std::result::Result<T, PlatformError>;
