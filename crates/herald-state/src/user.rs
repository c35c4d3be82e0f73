//! User domain: presence, icons, call sessions and groups.

use std::collections::{BTreeSet, HashMap, HashSet};
use std::sync::Arc;

use herald_core::{
    HandlerSet, RegistryBuilder, RegistryResult, UserGroupCreated, UserGroupDeleted,
    UserGroupUpdated, UserIconUpdated, UserJoined, UserLeft, UserOffline, UserOnline,
    UserTagsUpdated, UserWebRtcStateChanged, WebRtcSession,
};
use parking_lot::RwLock;
use tracing::{debug, trace};
use uuid::Uuid;

use crate::apply;

/// Where a user currently is in calls.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct WebRtcPresence {
    pub channel_id: Uuid,
    pub sessions: Vec<WebRtcSession>,
}

/// Ids drained from [`UserStore::take_stale`], sorted.
#[derive(Debug, Clone, Default, PartialEq, Eq)]
pub struct StaleUsers {
    pub users: Vec<Uuid>,
    pub groups: Vec<Uuid>,
}

#[derive(Debug, Default)]
struct UserState {
    active: HashSet<Uuid>,
    online: HashSet<Uuid>,
    icon_revisions: HashMap<Uuid, u64>,
    webrtc: HashMap<Uuid, WebRtcPresence>,
    groups: HashSet<Uuid>,
    stale_users: BTreeSet<Uuid>,
    stale_groups: BTreeSet<Uuid>,
}

impl UserState {
    fn joined(&mut self, body: UserJoined) {
        debug!(user = %body.id, "User joined");
        self.active.insert(body.id);
        self.stale_users.insert(body.id);
    }

    fn left(&mut self, body: UserLeft) {
        debug!(user = %body.id, "User left");
        self.active.remove(&body.id);
        self.online.remove(&body.id);
        self.webrtc.remove(&body.id);
        self.stale_users.insert(body.id);
    }

    fn tags_updated(&mut self, body: UserTagsUpdated) {
        trace!(user = %body.id, tag = %body.tag_id, "User tags updated");
        self.stale_users.insert(body.id);
    }

    fn icon_updated(&mut self, body: UserIconUpdated) {
        *self.icon_revisions.entry(body.id).or_default() += 1;
    }

    fn online(&mut self, body: UserOnline) {
        self.online.insert(body.id);
    }

    fn offline(&mut self, body: UserOffline) {
        self.online.remove(&body.id);
    }

    fn webrtc_state_changed(&mut self, body: UserWebRtcStateChanged) {
        if body.sessions.is_empty() {
            self.webrtc.remove(&body.user_id);
        } else {
            self.webrtc.insert(
                body.user_id,
                WebRtcPresence {
                    channel_id: body.channel_id,
                    sessions: body.sessions,
                },
            );
        }
    }

    fn group_created(&mut self, body: UserGroupCreated) {
        self.groups.insert(body.id);
        self.stale_groups.insert(body.id);
    }

    fn group_updated(&mut self, body: UserGroupUpdated) {
        self.groups.insert(body.id);
        self.stale_groups.insert(body.id);
    }

    fn group_deleted(&mut self, body: UserGroupDeleted) {
        self.groups.remove(&body.id);
        self.stale_groups.remove(&body.id);
    }
}

/// Users known to the client.
#[derive(Debug, Clone, Default)]
pub struct UserStore {
    state: Arc<RwLock<UserState>>,
}

impl UserStore {
    /// Creates an empty store.
    pub fn new() -> Self {
        Self::default()
    }

    /// Returns `true` if the user joined and has not left.
    pub fn is_active(&self, id: Uuid) -> bool {
        self.state.read().active.contains(&id)
    }

    /// Returns `true` if the user has an open connection.
    pub fn is_online(&self, id: Uuid) -> bool {
        self.state.read().online.contains(&id)
    }

    /// Online users, sorted.
    pub fn online_users(&self) -> Vec<Uuid> {
        let mut users: Vec<_> = self.state.read().online.iter().copied().collect();
        users.sort_unstable();
        users
    }

    /// How many times the user's icon changed since startup.
    ///
    /// Appended to icon URLs to bust caches.
    pub fn icon_revision(&self, id: Uuid) -> u64 {
        self.state.read().icon_revisions.get(&id).copied().unwrap_or(0)
    }

    /// The user's current call sessions, if any.
    pub fn webrtc_presence(&self, id: Uuid) -> Option<WebRtcPresence> {
        self.state.read().webrtc.get(&id).cloned()
    }

    /// Returns `true` if the group exists.
    pub fn has_group(&self, id: Uuid) -> bool {
        self.state.read().groups.contains(&id)
    }

    /// Number of active users.
    pub fn len(&self) -> usize {
        self.state.read().active.len()
    }

    /// Returns `true` if no user is active.
    pub fn is_empty(&self) -> bool {
        self.state.read().active.is_empty()
    }

    /// Number of known groups.
    pub fn group_count(&self) -> usize {
        self.state.read().groups.len()
    }

    /// Drains the users and groups that must be refetched.
    pub fn take_stale(&self) -> StaleUsers {
        let mut state = self.state.write();
        StaleUsers {
            users: std::mem::take(&mut state.stale_users).into_iter().collect(),
            groups: std::mem::take(&mut state.stale_groups).into_iter().collect(),
        }
    }
}

impl HandlerSet for UserStore {
    fn domain(&self) -> &'static str {
        "user"
    }

    fn register(&self, registry: &mut RegistryBuilder) -> RegistryResult<()> {
        let state = &self.state;
        registry
            .on::<UserJoined, _>(apply(state, UserState::joined))?
            .on::<UserLeft, _>(apply(state, UserState::left))?
            .on::<UserTagsUpdated, _>(apply(state, UserState::tags_updated))?
            .on::<UserIconUpdated, _>(apply(state, UserState::icon_updated))?
            .on::<UserOnline, _>(apply(state, UserState::online))?
            .on::<UserOffline, _>(apply(state, UserState::offline))?
            .on::<UserWebRtcStateChanged, _>(apply(state, UserState::webrtc_state_changed))?
            .on::<UserGroupCreated, _>(apply(state, UserState::group_created))?
            .on::<UserGroupUpdated, _>(apply(state, UserState::group_updated))?
            .on::<UserGroupDeleted, _>(apply(state, UserState::group_deleted))?;
        Ok(())
    }
}
