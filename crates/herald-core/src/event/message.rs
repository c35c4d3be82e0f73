//! Message lifecycle, read-state, stamp and pin events.

use serde::{Deserialize, Serialize};
use uuid::Uuid;

id_body! {
    /// Body of `MESSAGE_UPDATED`.
    MessageUpdated;
    /// Body of `MESSAGE_DELETED`.
    MessageDeleted;
    /// Body of `MESSAGE_READ`. The id is the channel that was read.
    MessageRead;
}

/// Body of `MESSAGE_CREATED`.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct MessageCreated {
    pub id: Uuid,
    /// Whether the message quotes one of the current user's messages.
    #[serde(default)]
    pub is_citing: bool,
}

/// Body of `MESSAGE_STAMPED`.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct MessageStamped {
    pub message_id: Uuid,
    pub user_id: Uuid,
    pub stamp_id: Uuid,
    /// How many times `user_id` has pressed this stamp on the message.
    pub count: u32,
    pub created_at: String,
}

/// Body of `MESSAGE_UNSTAMPED`.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct MessageUnstamped {
    pub message_id: Uuid,
    pub user_id: Uuid,
    pub stamp_id: Uuid,
}

/// Body of `MESSAGE_PINNED`.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct MessagePinned {
    pub message_id: Uuid,
    pub channel_id: Uuid,
}

/// Body of `MESSAGE_UNPINNED`.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct MessageUnpinned {
    pub message_id: Uuid,
    pub channel_id: Uuid,
}
