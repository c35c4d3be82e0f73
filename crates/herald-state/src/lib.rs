//! # Herald State
//!
//! In-memory domain stores that keep local state in step with the event
//! stream. Each store owns one slice of state and plugs into the dispatcher
//! as a [`HandlerSet`]:
//!
//! | store            | domain    | kinds                         |
//! |------------------|-----------|-------------------------------|
//! | [`UserStore`]    | `user`    | `USER_*` except `USER_UPDATED` |
//! | [`ChannelStore`] | `channel` | `CHANNEL_*`                   |
//! | [`MessageStore`] | `message` | `MESSAGE_*`                   |
//! | [`StampStore`]   | `stamp`   | `STAMP_CREATED/UPDATED/DELETED` |
//!
//! Event bodies mostly carry ids, so every store also keeps a *stale* set:
//! entities the server says changed and whose full record must be refetched.
//! [`UserStore::take_stale`] and friends drain it.
//!
//! Stores are cheap handles; clones share the same state.

pub mod channel;
pub mod message;
pub mod stamp;
pub mod user;

use std::fmt;
use std::sync::Arc;

use herald_core::{HandlerSet, RegistryBuilder, RegistryResult};
use parking_lot::RwLock;

pub use channel::ChannelStore;
pub use message::{MessageStore, StampReaction};
pub use stamp::StampStore;
pub use user::{StaleUsers, UserStore, WebRtcPresence};

/// Builds a handler that applies `mutate` to the shared state under its write lock.
pub(crate) fn apply<S, B, M>(
    state: &Arc<RwLock<S>>,
    mutate: M,
) -> impl Fn(B) + Send + Sync + 'static
where
    S: Send + Sync + 'static,
    B: 'static,
    M: Fn(&mut S, B) + Send + Sync + 'static,
{
    let state = Arc::clone(state);
    move |body: B| {
        let mut guard = state.write();
        mutate(&mut *guard, body);
    }
}

/// Every domain store of the client.
#[derive(Debug, Clone, Default)]
pub struct Stores {
    pub users: UserStore,
    pub channels: ChannelStore,
    pub messages: MessageStore,
    pub stamps: StampStore,
}

impl Stores {
    /// Creates empty stores.
    pub fn new() -> Self {
        Self::default()
    }

    /// Counts of what each store currently holds.
    pub fn summary(&self) -> StoreSummary {
        StoreSummary {
            users: self.users.len(),
            online: self.users.online_users().len(),
            groups: self.users.group_count(),
            channels: self.channels.len(),
            starred: self.channels.starred().len(),
            messages: self.messages.len(),
            pins: self.messages.pin_count(),
            stamps: self.stamps.len(),
        }
    }
}

impl HandlerSet for Stores {
    fn domain(&self) -> &'static str {
        "app"
    }

    fn register(&self, registry: &mut RegistryBuilder) -> RegistryResult<()> {
        registry
            .register(&self.users)?
            .register(&self.channels)?
            .register(&self.messages)?
            .register(&self.stamps)?;
        Ok(())
    }
}

/// Sizes of the domain stores.
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq)]
pub struct StoreSummary {
    pub users: usize,
    pub online: usize,
    pub groups: usize,
    pub channels: usize,
    pub starred: usize,
    pub messages: usize,
    pub pins: usize,
    pub stamps: usize,
}

impl fmt::Display for StoreSummary {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(
            f,
            "Users: {} ({} online, {} groups), Channels: {} ({} starred), Messages: {} ({} pinned), Stamps: {}",
            self.users,
            self.online,
            self.groups,
            self.channels,
            self.starred,
            self.messages,
            self.pins,
            self.stamps
        )
    }
}
