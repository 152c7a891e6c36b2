//! Error types for the image rotation controller.

use thiserror::Error;

/// Errors raised while configuring or driving the controller.
///
/// Operations invoked while no image is active are not errors; they are
/// silent no-ops.
#[derive(Debug, Clone, PartialEq, Eq, Error)]
pub enum RotateError {
    /// A module identifier in the configuration has no registered factory.
    #[error("Unknown module: {0}")]
    UnknownModule(String),

    /// The host rejected a DOM operation.
    #[error("Host operation failed: {0}")]
    Host(String),

    /// The configuration object could not be interpreted.
    #[error("Invalid options: {0}")]
    InvalidOptions(String),
}

/// Result alias used throughout the crate.
pub type Result<T> = std::result::Result<T, RotateError>;
