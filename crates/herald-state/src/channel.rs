//! Channel domain: channel tree membership, stars and viewers.

use std::collections::{BTreeSet, HashMap, HashSet};
use std::sync::Arc;

use herald_core::{
    ChannelCreated, ChannelDeleted, ChannelStared, ChannelUnstared, ChannelUpdated,
    ChannelViewer, ChannelViewersChanged, HandlerSet, RegistryBuilder, RegistryResult,
};
use parking_lot::RwLock;
use tracing::debug;
use uuid::Uuid;

use crate::apply;

#[derive(Debug, Default)]
struct ChannelState {
    channels: HashSet<Uuid>,
    starred: HashSet<Uuid>,
    viewers: HashMap<Uuid, Vec<ChannelViewer>>,
    stale: BTreeSet<Uuid>,
}

impl ChannelState {
    fn created(&mut self, body: ChannelCreated) {
        debug!(channel = %body.id, "Channel created");
        self.channels.insert(body.id);
        self.stale.insert(body.id);
    }

    fn deleted(&mut self, body: ChannelDeleted) {
        debug!(channel = %body.id, "Channel deleted");
        self.channels.remove(&body.id);
        self.starred.remove(&body.id);
        self.viewers.remove(&body.id);
        self.stale.remove(&body.id);
    }

    fn updated(&mut self, body: ChannelUpdated) {
        self.channels.insert(body.id);
        self.stale.insert(body.id);
    }

    fn stared(&mut self, body: ChannelStared) {
        self.starred.insert(body.id);
    }

    fn unstared(&mut self, body: ChannelUnstared) {
        self.starred.remove(&body.id);
    }

    fn viewers_changed(&mut self, body: ChannelViewersChanged) {
        if body.viewers.is_empty() {
            self.viewers.remove(&body.id);
        } else {
            self.viewers.insert(body.id, body.viewers);
        }
    }
}

/// Channels known to the client.
#[derive(Debug, Clone, Default)]
pub struct ChannelStore {
    state: Arc<RwLock<ChannelState>>,
}

impl ChannelStore {
    pub fn new() -> Self {
        Self::default()
    }

    pub fn contains(&self, id: Uuid) -> bool {
        self.state.read().channels.contains(&id)
    }

    pub fn is_starred(&self, id: Uuid) -> bool {
        self.state.read().starred.contains(&id)
    }

    /// Starred channels, sorted.
    pub fn starred(&self) -> Vec<Uuid> {
        let mut starred: Vec<_> = self.state.read().starred.iter().copied().collect();
        starred.sort_unstable();
        starred
    }

    /// Current viewers of a channel, as last reported.
    pub fn viewers(&self, id: Uuid) -> Vec<ChannelViewer> {
        self.state
            .read()
            .viewers
            .get(&id)
            .cloned()
            .unwrap_or_default()
    }

    pub fn len(&self) -> usize {
        self.state.read().channels.len()
    }

    pub fn is_empty(&self) -> bool {
        self.state.read().channels.is_empty()
    }

    /// Drains the channels that must be refetched, sorted.
    pub fn take_stale(&self) -> Vec<Uuid> {
        std::mem::take(&mut self.state.write().stale)
            .into_iter()
            .collect()
    }
}

impl HandlerSet for ChannelStore {
    fn domain(&self) -> &'static str {
        "channel"
    }

    fn register(&self, registry: &mut RegistryBuilder) -> RegistryResult<()> {
        let state = &self.state;
        registry
            .on::<ChannelCreated, _>(apply(state, ChannelState::created))?
            .on::<ChannelDeleted, _>(apply(state, ChannelState::deleted))?
            .on::<ChannelUpdated, _>(apply(state, ChannelState::updated))?
            .on::<ChannelStared, _>(apply(state, ChannelState::stared))?
            .on::<ChannelUnstared, _>(apply(state, ChannelState::unstared))?
            .on::<ChannelViewersChanged, _>(apply(state, ChannelState::viewers_changed))?;
        Ok(())
    }
}
