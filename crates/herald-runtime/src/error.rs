//! Runtime error types.

use herald_core::RegistryError;
use thiserror::Error;

use crate::config::ConfigError;
use crate::logging::LoggingError;

/// Errors that can occur while assembling or feeding the runtime.
#[derive(Error, Debug)]
pub enum RuntimeError {
    /// Configuration could not be loaded or is invalid.
    #[error(transparent)]
    Config(#[from] ConfigError),

    /// The configured log output could not be set up.
    #[error(transparent)]
    Logging(#[from] LoggingError),

    /// Two handler sets claimed the same kind.
    #[error(transparent)]
    Registry(#[from] RegistryError),

    /// The pump side of a frame channel is gone.
    #[error("Event stream closed")]
    StreamClosed,
}

/// Result type for runtime operations.
pub type RuntimeResult<T> = Result<T, RuntimeError>;
