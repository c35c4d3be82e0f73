//! # Herald Core
//!
//! The decoding and dispatch core of the Herald event stream.
//!
//! Every server-pushed update passes through this crate on its way to the
//! domain state it mutates:
//!
//! ```text
//! ┌───────────┐    ┌─────────┐    ┌────────────┐    ┌──────────────────┐
//! │ raw frame │───▶│ decode  │───▶│ Dispatcher │───▶│ HandlerRegistry  │──▶ domain handler
//! └───────────┘    └─────────┘    └────────────┘    └──────────────────┘
//!                       │               │
//!                       └──── Diagnostics (malformed / unknown) ────▶ sink
//! ```
//!
//! - **Event model**: [`Event`] is a tagged union over [`EventKind`] with a
//!   typed payload per kind, plus [`Event::Unknown`] for forward compatibility
//! - **Decoder**: [`decode`] turns one text frame into an [`Event`]
//! - **Registry**: [`HandlerRegistry`] maps each kind to at most one handler;
//!   domain collaborators contribute through [`HandlerSet`]
//! - **Dispatcher**: [`Dispatcher`] routes envelopes and absorbs bad input,
//!   reporting it through a [`Diagnostics`] sink
//!
//! ## Example
//!
//! ```rust
//! use herald_core::{Dispatched, Dispatcher, EventKind, MessageCreated, RegistryBuilder};
//!
//! let mut registry = RegistryBuilder::new();
//! registry
//!     .on(|body: MessageCreated| assert!(!body.is_citing))
//!     .expect("first handler for the kind");
//! let dispatcher = Dispatcher::new(registry.build());
//!
//! let frame = r#"{"type":"MESSAGE_CREATED","body":{"id":"f1e2d3c4-b5a6-4978-8695-a4b3c2d1e0f9"}}"#;
//! assert_eq!(dispatcher.receive(frame), Dispatched::Handled(EventKind::MessageCreated));
//! ```

pub mod decode;
pub mod diagnostics;
pub mod dispatcher;
pub mod error;
pub mod event;
pub mod handler;
pub mod registry;

#[cfg(test)]
mod testing;

pub use decode::decode;
pub use diagnostics::{
    BoxedDiagnostics, DIAGNOSTICS_TARGET, Diagnostic, Diagnostics, MemoryDiagnostics,
    TracingDiagnostics,
};
pub use dispatcher::{Dispatched, Dispatcher};
pub use error::{DecodeError, DecodeResult, RegistryError, RegistryResult};
pub use event::*;
pub use handler::{BoxedHandler, ErasedHandler, HandlerFn, into_handler};
pub use registry::{HandlerRegistry, HandlerSet, RegistryBuilder, UNSCOPED_DOMAIN};

/// Prelude for common imports.
pub mod prelude {
    pub use super::{
        Dispatched, Dispatcher, Event, EventBody, EventKind, HandlerRegistry, HandlerSet,
        RegistryBuilder, RegistryResult,
    };
}
