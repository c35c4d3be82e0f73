//! User presence, identity and membership events.

use serde::{Deserialize, Serialize};
use uuid::Uuid;

id_body! {
    /// Body of `USER_JOINED`.
    UserJoined;
    /// Body of `USER_LEFT`.
    UserLeft;
    /// Body of `USER_UPDATED`.
    UserUpdated;
    /// Body of `USER_ICON_UPDATED`.
    UserIconUpdated;
    /// Body of `USER_ONLINE`.
    UserOnline;
    /// Body of `USER_OFFLINE`.
    UserOffline;
    /// Body of `USER_GROUP_CREATED`.
    UserGroupCreated;
    /// Body of `USER_GROUP_UPDATED`.
    UserGroupUpdated;
    /// Body of `USER_GROUP_DELETED`.
    UserGroupDeleted;
}

/// Body of `USER_TAGS_UPDATED`.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct UserTagsUpdated {
    /// The tagged user.
    pub id: Uuid,
    /// The tag that changed.
    pub tag_id: Uuid,
}

/// Body of `USER_WEBRTC_STATE_CHANGED`.
///
/// An empty `sessions` list means the user left every call; `channel_id` is
/// then the nil UUID.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct UserWebRtcStateChanged {
    pub user_id: Uuid,
    pub channel_id: Uuid,
    #[serde(default)]
    pub sessions: Vec<WebRtcSession>,
}

/// One call session of a user.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct WebRtcSession {
    /// Session state, e.g. `"joined"` or `"screen.sharing"`.
    pub state: String,
    pub session_id: String,
}
