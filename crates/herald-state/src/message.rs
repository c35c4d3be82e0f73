//! Message domain: messages, stamps, pins and unread channels.

use std::collections::{BTreeSet, HashMap, HashSet};
use std::sync::Arc;

use herald_core::{
    HandlerSet, MessageCreated, MessageDeleted, MessagePinned, MessageRead, MessageStamped,
    MessageUnpinned, MessageUnstamped, MessageUpdated, RegistryBuilder, RegistryResult,
};
use parking_lot::RwLock;
use tracing::{debug, trace};
use uuid::Uuid;

use crate::apply;

/// One user's reaction with one stamp.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct StampReaction {
    pub user_id: Uuid,
    pub stamp_id: Uuid,
    pub count: u32,
    pub created_at: String,
}

#[derive(Debug, Default)]
struct MessageEntry {
    stamps: Vec<StampReaction>,
    citing: bool,
}

#[derive(Debug, Default)]
struct MessageState {
    messages: HashMap<Uuid, MessageEntry>,
    /// message → channel
    pins: HashMap<Uuid, Uuid>,
    unread: HashSet<Uuid>,
    stale: BTreeSet<Uuid>,
}

impl MessageState {
    fn created(&mut self, body: MessageCreated) {
        debug!(message = %body.id, citing = body.is_citing, "Message created");
        self.messages.insert(
            body.id,
            MessageEntry {
                stamps: Vec::new(),
                citing: body.is_citing,
            },
        );
        self.stale.insert(body.id);
    }

    fn updated(&mut self, body: MessageUpdated) {
        if self.messages.contains_key(&body.id) {
            self.stale.insert(body.id);
        } else {
            trace!(message = %body.id, "Update for untracked message ignored");
        }
    }

    fn deleted(&mut self, body: MessageDeleted) {
        self.messages.remove(&body.id);
        self.pins.remove(&body.id);
        self.stale.remove(&body.id);
    }

    fn read(&mut self, body: MessageRead) {
        self.unread.remove(&body.id);
    }

    fn stamped(&mut self, body: MessageStamped) {
        let Some(entry) = self.messages.get_mut(&body.message_id) else {
            trace!(message = %body.message_id, "Stamp on untracked message ignored");
            return;
        };
        let reaction = StampReaction {
            user_id: body.user_id,
            stamp_id: body.stamp_id,
            count: body.count,
            created_at: body.created_at,
        };
        match entry
            .stamps
            .iter_mut()
            .find(|r| r.user_id == body.user_id && r.stamp_id == body.stamp_id)
        {
            Some(existing) => *existing = reaction,
            None => entry.stamps.push(reaction),
        }
    }

    fn unstamped(&mut self, body: MessageUnstamped) {
        if let Some(entry) = self.messages.get_mut(&body.message_id) {
            entry
                .stamps
                .retain(|r| !(r.user_id == body.user_id && r.stamp_id == body.stamp_id));
        }
    }

    fn pinned(&mut self, body: MessagePinned) {
        self.pins.insert(body.message_id, body.channel_id);
    }

    fn unpinned(&mut self, body: MessageUnpinned) {
        self.pins.remove(&body.message_id);
    }
}

/// Messages seen on the stream.
#[derive(Debug, Clone, Default)]
pub struct MessageStore {
    state: Arc<RwLock<MessageState>>,
}

impl MessageStore {
    pub fn new() -> Self {
        Self::default()
    }

    pub fn contains(&self, id: Uuid) -> bool {
        self.state.read().messages.contains_key(&id)
    }

    /// Number of tracked messages.
    pub fn len(&self) -> usize {
        self.state.read().messages.len()
    }

    pub fn is_empty(&self) -> bool {
        self.state.read().messages.is_empty()
    }

    /// Number of tracked messages that quote the current user.
    pub fn citing_count(&self) -> usize {
        self.state
            .read()
            .messages
            .values()
            .filter(|entry| entry.citing)
            .count()
    }

    pub fn pin_count(&self) -> usize {
        self.state.read().pins.len()
    }

    /// Pinned messages of a channel, sorted.
    pub fn pinned_in(&self, channel: Uuid) -> Vec<Uuid> {
        let mut pinned: Vec<_> = self
            .state
            .read()
            .pins
            .iter()
            .filter(|(_, c)| **c == channel)
            .map(|(m, _)| *m)
            .collect();
        pinned.sort_unstable();
        pinned
    }

    /// Stamps on a message, in the order they were first pressed.
    pub fn stamps(&self, message: Uuid) -> Vec<StampReaction> {
        self.state
            .read()
            .messages
            .get(&message)
            .map(|entry| entry.stamps.clone())
            .unwrap_or_default()
    }

    /// Marks a channel as having unread messages.
    ///
    /// `MESSAGE_READ` clears the mark.
    pub fn mark_unread(&self, channel: Uuid) {
        self.state.write().unread.insert(channel);
    }

    pub fn is_unread(&self, channel: Uuid) -> bool {
        self.state.read().unread.contains(&channel)
    }

    /// Drains the messages whose content must be refetched, sorted.
    pub fn take_stale(&self) -> Vec<Uuid> {
        std::mem::take(&mut self.state.write().stale)
            .into_iter()
            .collect()
    }
}

impl HandlerSet for MessageStore {
    fn domain(&self) -> &'static str {
        "message"
    }

    fn register(&self, registry: &mut RegistryBuilder) -> RegistryResult<()> {
        let state = &self.state;
        registry
            .on::<MessageCreated, _>(apply(state, MessageState::created))?
            .on::<MessageUpdated, _>(apply(state, MessageState::updated))?
            .on::<MessageDeleted, _>(apply(state, MessageState::deleted))?
            .on::<MessageRead, _>(apply(state, MessageState::read))?
            .on::<MessageStamped, _>(apply(state, MessageState::stamped))?
            .on::<MessageUnstamped, _>(apply(state, MessageState::unstamped))?
            .on::<MessagePinned, _>(apply(state, MessageState::pinned))?
            .on::<MessageUnpinned, _>(apply(state, MessageState::unpinned))?;
        Ok(())
    }
}
