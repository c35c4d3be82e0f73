//! Typed handlers and their type-erased form.
//!
//! Domain code writes handlers against a concrete payload:
//!
//! ```rust,ignore
//! let handler = into_handler(|body: MessageCreated| store.insert(body.id));
//! ```
//!
//! The registry stores them erased as [`BoxedHandler`] so that one table can
//! hold handlers for every kind.

use std::marker::PhantomData;

use crate::event::{Event, EventBody, EventKind};

/// A handler with its payload type erased.
pub trait ErasedHandler: Send + Sync {
    /// The kind this handler accepts.
    fn kind(&self) -> EventKind;

    /// Invokes the handler with an envelope of [`ErasedHandler::kind`].
    fn call(&self, event: Event);
}

/// An owned, type-erased handler.
pub type BoxedHandler = Box<dyn ErasedHandler>;

/// Adapts a closure over a payload type into an [`ErasedHandler`].
pub struct HandlerFn<B, F> {
    f: F,
    _marker: PhantomData<fn(B)>,
}

impl<B, F> HandlerFn<B, F>
where
    B: EventBody,
    F: Fn(B) + Send + Sync + 'static,
{
    /// Wraps `f`.
    pub fn new(f: F) -> Self {
        Self {
            f,
            _marker: PhantomData,
        }
    }
}

impl<B, F> ErasedHandler for HandlerFn<B, F>
where
    B: EventBody,
    F: Fn(B) + Send + Sync + 'static,
{
    fn kind(&self) -> EventKind {
        B::KIND
    }

    fn call(&self, event: Event) {
        // The registry only routes B::KIND here.
        if let Some(body) = B::from_event(event) {
            (self.f)(body);
        }
    }
}

/// Boxes a typed closure as a [`BoxedHandler`].
pub fn into_handler<B, F>(f: F) -> BoxedHandler
where
    B: EventBody,
    F: Fn(B) + Send + Sync + 'static,
{
    Box::new(HandlerFn::new(f))
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::event::{ChannelStared, ChannelUnstared};
    use std::sync::Arc;
    use std::sync::atomic::{AtomicUsize, Ordering};
    use uuid::Uuid;

    #[test]
    fn test_erased_handler_reports_kind() {
        let handler = into_handler(|_: ChannelStared| {});
        assert_eq!(handler.kind(), EventKind::ChannelStared);
    }

    #[test]
    fn test_erased_handler_passes_body() {
        let id = Uuid::new_v4();
        let seen = Arc::new(parking_lot::Mutex::new(None));
        let seen_clone = Arc::clone(&seen);
        let handler = into_handler(move |body: ChannelStared| {
            *seen_clone.lock() = Some(body.id);
        });

        handler.call(Event::from(ChannelStared { id }));
        assert_eq!(*seen.lock(), Some(id));
    }

    #[test]
    fn test_erased_handler_ignores_foreign_event() {
        let calls = Arc::new(AtomicUsize::new(0));
        let calls_clone = Arc::clone(&calls);
        let handler = into_handler(move |_: ChannelStared| {
            calls_clone.fetch_add(1, Ordering::SeqCst);
        });

        handler.call(Event::from(ChannelUnstared { id: Uuid::nil() }));
        assert_eq!(calls.load(Ordering::SeqCst), 0);
    }
}
