//! Channel lifecycle, starring and viewer events.

use serde::{Deserialize, Serialize};
use uuid::Uuid;

id_body! {
    /// Body of `CHANNEL_CREATED`.
    ChannelCreated;
    /// Body of `CHANNEL_DELETED`.
    ChannelDeleted;
    /// Body of `CHANNEL_UPDATED`.
    ChannelUpdated;
    /// Body of `CHANNEL_STARED`.
    ChannelStared;
    /// Body of `CHANNEL_UNSTARED`.
    ChannelUnstared;
}

/// Body of `CHANNEL_VIEWERS_CHANGED`.
///
/// Carries the complete viewer list, not a delta.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct ChannelViewersChanged {
    /// The channel being viewed.
    pub id: Uuid,
    #[serde(default)]
    pub viewers: Vec<ChannelViewer>,
}

/// A user currently looking at a channel.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct ChannelViewer {
    pub user_id: Uuid,
    /// View state: `"none"`, `"monitoring"` or `"editing"`.
    pub state: String,
    /// RFC 3339 timestamp of the last state change.
    pub updated_at: String,
}
