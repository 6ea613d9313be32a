//! Error types for inset_core
//!
//! None of these are meant to reach the user. Configuration problems fall
//! back to a safe policy, stale blurs are ignored and bad geometry is
//! clamped. The worst outcome is a field partially hidden by the keyboard.

use inset_platform::ViewId;
use thiserror::Error;

/// Errors raised inside the coordinator
#[derive(Error, Debug, Clone, PartialEq)]
pub enum InsetError {
    /// Platform or policy could not be resolved
    #[error("Configuration error: {0}")]
    Configuration(String),

    /// Blur reported for a view that is not the current focus target
    #[error("Stale focus reference: view {} is not focused", .0.to_raw())]
    StaleFocusReference(ViewId),

    /// Negative or non-finite keyboard height, viewport or bounds
    #[error("Out of range geometry: {0}")]
    OutOfRangeGeometry(String),
}

/// Result type for inset_core operations
pub type Result<T> = std::result::Result<T, InsetError>;
