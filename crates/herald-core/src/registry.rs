//! Handler registry.
//!
//! The registry is the fixed `kind → handler` table the dispatcher consults.
//! It is assembled once at startup from [`HandlerSet`]s, one per domain
//! collaborator, and frozen by [`RegistryBuilder::build`]:
//!
//! ```rust,ignore
//! let registry = RegistryBuilder::new()
//!     .with(&user_store)?
//!     .with(&channel_store)?
//!     .build();
//! ```
//!
//! A kind with no handler is a valid state: such events are recognized and
//! silently skipped.

use std::collections::HashMap;
use std::fmt;

use tracing::trace;

use crate::error::{RegistryError, RegistryResult};
use crate::event::{EventBody, EventKind};
use crate::handler::{BoxedHandler, ErasedHandler, into_handler};

/// Domain name recorded for handlers registered outside any [`HandlerSet`].
pub const UNSCOPED_DOMAIN: &str = "unscoped";

/// A domain collaborator's contribution to the registry.
///
/// Implementors own a slice of application state and register one handler
/// per kind they apply.
pub trait HandlerSet {
    /// Short domain name used in logs and duplicate-handler errors.
    fn domain(&self) -> &'static str;

    /// Registers this domain's handlers.
    fn register(&self, registry: &mut RegistryBuilder) -> RegistryResult<()>;
}

struct Entry {
    domain: &'static str,
    handler: BoxedHandler,
}

/// Mutable registry under construction.
pub struct RegistryBuilder {
    entries: HashMap<EventKind, Entry>,
    domain: &'static str,
}

impl Default for RegistryBuilder {
    fn default() -> Self {
        Self::new()
    }
}

impl RegistryBuilder {
    /// Creates an empty builder.
    pub fn new() -> Self {
        Self {
            entries: HashMap::new(),
            domain: UNSCOPED_DOMAIN,
        }
    }

    /// Registers a typed handler for `B::KIND`.
    ///
    /// Fails if the kind already has a handler.
    pub fn on<B, F>(&mut self, handler: F) -> RegistryResult<&mut Self>
    where
        B: EventBody,
        F: Fn(B) + Send + Sync + 'static,
    {
        self.insert(into_handler(handler))?;
        Ok(self)
    }

    /// Registers an already-erased handler under its own kind.
    pub fn insert(&mut self, handler: BoxedHandler) -> RegistryResult<()> {
        let kind = handler.kind();
        if let Some(existing) = self.entries.get(&kind) {
            return Err(RegistryError::DuplicateHandler {
                kind,
                existing: existing.domain,
                domain: self.domain,
            });
        }

        trace!(kind = %kind, domain = self.domain, "Registered handler");
        self.entries.insert(
            kind,
            Entry {
                domain: self.domain,
                handler,
            },
        );
        Ok(())
    }

    /// Lets `set` register its handlers, tagged with its domain.
    pub fn register<S: HandlerSet + ?Sized>(&mut self, set: &S) -> RegistryResult<&mut Self> {
        let outer = std::mem::replace(&mut self.domain, set.domain());
        let result = set.register(self);
        self.domain = outer;
        result.map(|()| self)
    }

    /// Builder-style variant of [`RegistryBuilder::register`].
    pub fn with<S: HandlerSet + ?Sized>(mut self, set: &S) -> RegistryResult<Self> {
        self.register(set)?;
        Ok(self)
    }

    /// Freezes the table.
    pub fn build(self) -> HandlerRegistry {
        HandlerRegistry {
            entries: self.entries,
        }
    }
}

/// The frozen `kind → handler` table.
///
/// Read-only after construction; share it behind an `Arc`.
#[derive(Default)]
pub struct HandlerRegistry {
    entries: HashMap<EventKind, Entry>,
}

impl HandlerRegistry {
    /// Starts a new registry.
    pub fn builder() -> RegistryBuilder {
        RegistryBuilder::new()
    }

    /// Returns the handler registered for `kind`.
    pub fn resolve(&self, kind: EventKind) -> Option<&dyn ErasedHandler> {
        self.entries.get(&kind).map(|entry| entry.handler.as_ref())
    }

    /// Returns `true` if `kind` has a handler.
    pub fn is_wired(&self, kind: EventKind) -> bool {
        self.entries.contains_key(&kind)
    }

    /// Returns the domain that registered the handler for `kind`.
    pub fn domain_of(&self, kind: EventKind) -> Option<&'static str> {
        self.entries.get(&kind).map(|entry| entry.domain)
    }

    /// Kinds with a handler, in declaration order.
    pub fn wired_kinds(&self) -> Vec<EventKind> {
        EventKind::ALL
            .iter()
            .copied()
            .filter(|kind| self.is_wired(*kind))
            .collect()
    }

    /// Recognized kinds without a handler, in declaration order.
    pub fn unwired_kinds(&self) -> Vec<EventKind> {
        EventKind::ALL
            .iter()
            .copied()
            .filter(|kind| !self.is_wired(*kind))
            .collect()
    }

    /// Number of wired kinds.
    pub fn len(&self) -> usize {
        self.entries.len()
    }

    /// Returns `true` if no kind is wired.
    pub fn is_empty(&self) -> bool {
        self.entries.is_empty()
    }
}

impl fmt::Debug for HandlerRegistry {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.debug_struct("HandlerRegistry")
            .field("wired", &self.entries.len())
            .field("unwired", &(EventKind::ALL.len() - self.entries.len()))
            .finish()
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::event::{ChannelCreated, ChannelDeleted, UserJoined, UserLeft};

    struct Users;

    impl HandlerSet for Users {
        fn domain(&self) -> &'static str {
            "user"
        }

        fn register(&self, registry: &mut RegistryBuilder) -> RegistryResult<()> {
            registry
                .on(|_: UserJoined| {})?
                .on(|_: UserLeft| {})?;
            Ok(())
        }
    }

    struct Channels;

    impl HandlerSet for Channels {
        fn domain(&self) -> &'static str {
            "channel"
        }

        fn register(&self, registry: &mut RegistryBuilder) -> RegistryResult<()> {
            registry.on(|_: ChannelCreated| {})?;
            Ok(())
        }
    }

    struct Greedy;

    impl HandlerSet for Greedy {
        fn domain(&self) -> &'static str {
            "greedy"
        }

        fn register(&self, registry: &mut RegistryBuilder) -> RegistryResult<()> {
            registry.on(|_: UserJoined| {})?;
            Ok(())
        }
    }

    #[test]
    fn test_empty_registry_resolves_nothing() {
        let registry = HandlerRegistry::builder().build();
        assert!(registry.is_empty());
        for kind in EventKind::ALL {
            assert!(registry.resolve(*kind).is_none());
        }
        assert_eq!(registry.unwired_kinds().len(), EventKind::ALL.len());
    }

    #[test]
    fn test_sets_compose_and_record_domains() {
        let registry = RegistryBuilder::new()
            .with(&Users)
            .unwrap()
            .with(&Channels)
            .unwrap()
            .build();

        assert_eq!(registry.len(), 3);
        assert_eq!(registry.domain_of(EventKind::UserJoined), Some("user"));
        assert_eq!(registry.domain_of(EventKind::ChannelCreated), Some("channel"));
        assert_eq!(registry.domain_of(EventKind::ChannelDeleted), None);
        assert_eq!(
            registry.wired_kinds(),
            vec![
                EventKind::UserJoined,
                EventKind::UserLeft,
                EventKind::ChannelCreated
            ]
        );
    }

    #[test]
    fn test_resolved_handler_matches_kind() {
        let registry = RegistryBuilder::new().with(&Users).unwrap().build();
        let handler = registry.resolve(EventKind::UserLeft).unwrap();
        assert_eq!(handler.kind(), EventKind::UserLeft);
    }

    #[test]
    fn test_duplicate_handler_is_rejected() {
        let result = RegistryBuilder::new().with(&Users).unwrap().with(&Greedy);
        let Err(RegistryError::DuplicateHandler {
            kind,
            existing,
            domain,
        }) = result
        else {
            panic!("duplicate registration accepted");
        };
        assert_eq!(kind, EventKind::UserJoined);
        assert_eq!(existing, "user");
        assert_eq!(domain, "greedy");
    }

    #[test]
    fn test_domain_scope_is_restored() {
        let mut builder = RegistryBuilder::new();
        builder.register(&Users).unwrap();
        builder.on(|_: ChannelDeleted| {}).unwrap();
        let registry = builder.build();
        assert_eq!(
            registry.domain_of(EventKind::ChannelDeleted),
            Some(UNSCOPED_DOMAIN)
        );
    }
}
