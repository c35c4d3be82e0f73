//! Error types for the Herald core.

use thiserror::Error;

use crate::event::EventKind;

/// Reasons a frame is rejected before it becomes an [`Event`](crate::Event).
///
/// Every variant is recovered the same way: the frame is dropped, one
/// diagnostic is recorded and the stream continues.
#[derive(Debug, Error)]
pub enum DecodeError {
    /// The frame is not well-formed JSON.
    #[error("malformed frame: {0}")]
    Malformed(#[source] serde_json::Error),

    /// The frame is JSON but has no string `type` field.
    #[error("frame has no string `type` field")]
    MissingKind,

    /// The kind is recognized but the body cannot be read as its payload.
    #[error("invalid body for {kind}: {source}")]
    InvalidBody {
        /// The recognized kind.
        kind: EventKind,
        /// What the payload deserializer rejected.
        source: serde_json::Error,
    },
}

/// Errors raised while assembling a handler registry.
#[derive(Debug, Clone, Error)]
pub enum RegistryError {
    /// A second handler was registered for a kind.
    #[error("{kind} already handled by domain '{existing}', rejected duplicate from '{domain}'")]
    DuplicateHandler {
        /// The contested kind.
        kind: EventKind,
        /// Domain that registered first.
        existing: &'static str,
        /// Domain that tried to register again.
        domain: &'static str,
    },
}

/// Result type for decoding.
pub type DecodeResult<T> = Result<T, DecodeError>;

/// Result type for registry assembly.
pub type RegistryResult<T> = Result<T, RegistryError>;
