//! Event dispatcher.
//!
//! The [`Dispatcher`] routes each envelope to at most one handler:
//!
//! 1. Unrecognized kind: record a diagnostic and stop
//! 2. Resolve the handler for the kind in the [`HandlerRegistry`]
//! 3. Found: invoke it synchronously with the payload
//! 4. Not found: do nothing (the kind is deliberately unwired)
//!
//! [`Dispatcher::receive`] adds the frame-level step in front: decode, and on
//! failure record a diagnostic and drop the frame.
//!
//! Handler failures are the handler's own business. The dispatcher neither
//! catches nor retries them.

use std::fmt;
use std::sync::Arc;

use tracing::{Level, span, trace};

use crate::decode::decode;
use crate::diagnostics::{BoxedDiagnostics, Diagnostic, TracingDiagnostics};
use crate::event::{Event, EventKind};
use crate::registry::HandlerRegistry;

/// What happened to one frame or envelope.
///
/// Informational only; nothing here is an error the caller has to handle.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum Dispatched {
    /// The kind's handler ran.
    Handled(EventKind),
    /// The kind is recognized but has no handler.
    Unwired(EventKind),
    /// The kind is not known to this build.
    Unrecognized,
    /// The frame failed to decode.
    Rejected,
}

impl Dispatched {
    /// Returns the recognized kind, if any.
    pub fn kind(self) -> Option<EventKind> {
        match self {
            Self::Handled(kind) | Self::Unwired(kind) => Some(kind),
            Self::Unrecognized | Self::Rejected => None,
        }
    }
}

/// Routes decoded events to their registered handler.
///
/// Cloning is cheap; clones share the registry and the diagnostics sink.
#[derive(Clone)]
pub struct Dispatcher {
    registry: Arc<HandlerRegistry>,
    diagnostics: BoxedDiagnostics,
}

impl Dispatcher {
    /// Creates a dispatcher that reports through [`TracingDiagnostics`].
    pub fn new(registry: HandlerRegistry) -> Self {
        Self {
            registry: Arc::new(registry),
            diagnostics: Arc::new(TracingDiagnostics::new()),
        }
    }

    /// Replaces the diagnostics sink.
    pub fn with_diagnostics(mut self, diagnostics: BoxedDiagnostics) -> Self {
        self.diagnostics = diagnostics;
        self
    }

    /// Returns the routing table.
    pub fn registry(&self) -> &HandlerRegistry {
        &self.registry
    }

    /// Decodes one raw frame and dispatches it.
    pub fn receive(&self, frame: &str) -> Dispatched {
        match decode(frame) {
            Ok(event) => self.dispatch(event),
            Err(error) => {
                self.diagnostics.record(Diagnostic::rejected(frame, &error));
                Dispatched::Rejected
            }
        }
    }

    /// Dispatches one decoded envelope.
    ///
    /// Returns once the handler (if any) has returned.
    pub fn dispatch(&self, event: Event) -> Dispatched {
        let Some(kind) = event.kind() else {
            self.diagnostics.record(Diagnostic::UnrecognizedKind {
                kind: event.wire_kind().to_owned(),
            });
            return Dispatched::Unrecognized;
        };

        let span = span!(Level::DEBUG, "dispatch", kind = %kind);
        let _enter = span.enter();

        match self.registry.resolve(kind) {
            Some(handler) => {
                trace!("Invoking handler");
                handler.call(event);
                Dispatched::Handled(kind)
            }
            None => {
                trace!("No handler wired, skipping");
                Dispatched::Unwired(kind)
            }
        }
    }
}

impl fmt::Debug for Dispatcher {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.debug_struct("Dispatcher")
            .field("registry", &self.registry)
            .finish()
    }
}
