//! Stamp domain.
//!
//! Palette events are part of the protocol but have no store here.

use std::collections::{BTreeSet, HashSet};
use std::sync::Arc;

use herald_core::{
    HandlerSet, RegistryBuilder, RegistryResult, StampCreated, StampDeleted, StampUpdated,
};
use parking_lot::RwLock;
use uuid::Uuid;

use crate::apply;

#[derive(Debug, Default)]
struct StampState {
    known: HashSet<Uuid>,
    stale: BTreeSet<Uuid>,
}

impl StampState {
    fn created(&mut self, body: StampCreated) {
        self.known.insert(body.id);
        self.stale.insert(body.id);
    }

    fn updated(&mut self, body: StampUpdated) {
        self.known.insert(body.id);
        self.stale.insert(body.id);
    }

    fn deleted(&mut self, body: StampDeleted) {
        self.known.remove(&body.id);
        self.stale.remove(&body.id);
    }
}

/// Custom stamps known to the client.
#[derive(Debug, Clone, Default)]
pub struct StampStore {
    state: Arc<RwLock<StampState>>,
}

impl StampStore {
    pub fn new() -> Self {
        Self::default()
    }

    pub fn contains(&self, id: Uuid) -> bool {
        self.state.read().known.contains(&id)
    }

    pub fn len(&self) -> usize {
        self.state.read().known.len()
    }

    pub fn is_empty(&self) -> bool {
        self.state.read().known.is_empty()
    }

    /// Drains the stamps whose images must be refetched, sorted.
    pub fn take_stale(&self) -> Vec<Uuid> {
        std::mem::take(&mut self.state.write().stale)
            .into_iter()
            .collect()
    }
}

impl HandlerSet for StampStore {
    fn domain(&self) -> &'static str {
        "stamp"
    }

    fn register(&self, registry: &mut RegistryBuilder) -> RegistryResult<()> {
        let state = &self.state;
        registry
            .on::<StampCreated, _>(apply(state, StampState::created))?
            .on::<StampUpdated, _>(apply(state, StampState::updated))?
            .on::<StampDeleted, _>(apply(state, StampState::deleted))?;
        Ok(())
    }
}
