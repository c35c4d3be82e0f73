//! Sample payloads shared by the unit tests.

use serde_json::{Value, json};

use crate::event::EventKind;

const USER: &str = "0e4f8a8d-5f4b-4a8e-9a1c-3d6a2b7c9e01";
const OTHER: &str = "6b1f2c3d-4e5f-4a6b-8c7d-9e0f1a2b3c4d";
const CHANNEL: &str = "9a8b7c6d-5e4f-4321-8fed-cba987654321";
const MESSAGE: &str = "f1e2d3c4-b5a6-4978-8695-a4b3c2d1e0f9";
const STAMP: &str = "11111111-2222-4333-8444-555555555555";

/// A valid body for `kind`.
pub(crate) fn sample_body(kind: EventKind) -> Value {
    use EventKind::*;

    match kind {
        UserJoined | UserLeft | UserUpdated | UserIconUpdated | UserOnline | UserOffline => {
            json!({ "id": USER })
        }
        UserTagsUpdated => json!({ "id": USER, "tag_id": OTHER }),
        UserWebRtcStateChanged => json!({
            "user_id": USER,
            "channel_id": CHANNEL,
            "sessions": [{ "state": "joined", "sessionId": "qall-7f3a" }],
        }),
        UserGroupCreated | UserGroupUpdated | UserGroupDeleted => json!({ "id": OTHER }),
        ChannelCreated | ChannelDeleted | ChannelUpdated | ChannelStared | ChannelUnstared => {
            json!({ "id": CHANNEL })
        }
        ChannelViewersChanged => json!({
            "id": CHANNEL,
            "viewers": [
                { "userId": USER, "state": "editing", "updatedAt": "2024-05-01T12:00:00Z" },
                { "userId": OTHER, "state": "monitoring", "updatedAt": "2024-05-01T12:00:03Z" },
            ],
        }),
        MessageCreated => json!({ "id": MESSAGE, "is_citing": false }),
        MessageUpdated | MessageDeleted => json!({ "id": MESSAGE }),
        MessageRead => json!({ "id": CHANNEL }),
        MessageStamped => json!({
            "message_id": MESSAGE,
            "user_id": USER,
            "stamp_id": STAMP,
            "count": 2,
            "created_at": "2024-05-01T12:00:05Z",
        }),
        MessageUnstamped => json!({ "message_id": MESSAGE, "user_id": USER, "stamp_id": STAMP }),
        MessagePinned | MessageUnpinned => json!({ "message_id": MESSAGE, "channel_id": CHANNEL }),
        StampCreated | StampUpdated | StampDeleted => json!({ "id": STAMP }),
        StampPaletteCreated | StampPaletteUpdated | StampPaletteDeleted | ClipFolderCreated
        | ClipFolderUpdated | ClipFolderDeleted => json!({ "id": OTHER }),
    }
}

/// A complete wire frame for `kind`.
pub(crate) fn sample_frame(kind: EventKind) -> String {
    json!({ "type": kind.as_str(), "body": sample_body(kind) }).to_string()
}
