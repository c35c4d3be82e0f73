//! Event envelope model.
//!
//! Every inbound frame decodes into one [`Event`]: a closed tagged union with
//! one variant per [`EventKind`], each carrying a dedicated payload struct.
//! Kinds this build does not recognize decode into [`Event::Unknown`] so that
//! newer servers can talk to older clients.
//!
//! # Kind Table
//!
//! ```text
//! Event
//! ├── USER_*            → user.rs     (presence, identity, groups)
//! ├── CHANNEL_*         → channel.rs  (lifecycle, stars, viewers)
//! ├── MESSAGE_*         → message.rs  (lifecycle, read state, stamps, pins)
//! ├── STAMP_*           → stamp.rs    (stamps and stamp palettes)
//! ├── CLIP_FOLDER_*     → clip.rs
//! └── <anything else>   → Event::Unknown
//! ```
//!
//! # Wire Shape
//!
//! ```json
//! { "type": "MESSAGE_CREATED", "body": { "id": "…", "is_citing": false } }
//! ```

use std::fmt;

use serde_json::{Value, json};

/// Declares payload structs that only carry the id of the affected entity.
macro_rules! id_body {
    ($( $(#[$meta:meta])* $name:ident; )+) => {
        $(
            $(#[$meta])*
            #[derive(Debug, Clone, PartialEq, Eq, ::serde::Serialize, ::serde::Deserialize)]
            pub struct $name {
                /// Id of the affected entity.
                pub id: ::uuid::Uuid,
            }
        )+
    };
}

pub mod channel;
pub mod clip;
pub mod message;
pub mod stamp;
pub mod user;

pub use channel::*;
pub use clip::*;
pub use message::*;
pub use stamp::*;
pub use user::*;

/// A payload type bound to exactly one [`EventKind`].
///
/// Implemented for every payload struct by the kind table below. The
/// registry keys typed handlers by [`EventBody::KIND`], so a handler for
/// `MessageCreated` can only ever be routed `MESSAGE_CREATED` events.
pub trait EventBody: Sized + Send + 'static {
    /// The kind this payload belongs to.
    const KIND: EventKind;

    /// Takes the payload out of an envelope of the matching kind.
    fn from_event(event: Event) -> Option<Self>;
}

macro_rules! events {
    ($( $(#[$meta:meta])* $variant:ident => $wire:literal, )+) => {
        /// Discriminator of a recognized event.
        #[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, PartialOrd, Ord)]
        pub enum EventKind {
            $( $(#[$meta])* $variant, )+
        }

        impl EventKind {
            /// Every kind this build recognizes, in declaration order.
            pub const ALL: &'static [EventKind] = &[$(EventKind::$variant),+];

            /// Returns the wire tag, e.g. `"MESSAGE_CREATED"`.
            pub const fn as_str(self) -> &'static str {
                match self {
                    $(EventKind::$variant => $wire,)+
                }
            }

            /// Looks up a kind by its wire tag.
            pub fn from_wire(tag: &str) -> Option<Self> {
                match tag {
                    $($wire => Some(EventKind::$variant),)+
                    _ => None,
                }
            }
        }

        /// One decoded inbound event (the envelope).
        #[derive(Debug, Clone, PartialEq)]
        pub enum Event {
            $( $(#[$meta])* $variant($variant), )+
            /// An event whose kind this build does not recognize.
            Unknown(UnknownEvent),
        }

        impl Event {
            /// Returns the kind, or `None` for [`Event::Unknown`].
            pub fn kind(&self) -> Option<EventKind> {
                match self {
                    $(Event::$variant(_) => Some(EventKind::$variant),)+
                    Event::Unknown(_) => None,
                }
            }

            /// Reads `body` as the payload of `kind`.
            pub(crate) fn from_body(kind: EventKind, body: Value) -> serde_json::Result<Self> {
                match kind {
                    $(EventKind::$variant => serde_json::from_value(body).map(Event::$variant),)+
                }
            }

            fn body_value(&self) -> serde_json::Result<Value> {
                match self {
                    $(Event::$variant(body) => serde_json::to_value(body),)+
                    Event::Unknown(unknown) => Ok(unknown.body.clone()),
                }
            }
        }

        $(
            impl EventBody for $variant {
                const KIND: EventKind = EventKind::$variant;

                fn from_event(event: Event) -> Option<Self> {
                    match event {
                        Event::$variant(body) => Some(body),
                        _ => None,
                    }
                }
            }

            impl From<$variant> for Event {
                fn from(body: $variant) -> Self {
                    Event::$variant(body)
                }
            }
        )+
    };
}

events! {
    /// A user account was created.
    UserJoined => "USER_JOINED",
    /// A user account was deactivated.
    UserLeft => "USER_LEFT",
    /// A user's profile changed.
    UserUpdated => "USER_UPDATED",
    /// A tag on a user was added, edited or removed.
    UserTagsUpdated => "USER_TAGS_UPDATED",
    /// A user's icon changed.
    UserIconUpdated => "USER_ICON_UPDATED",
    /// A user connected.
    UserOnline => "USER_ONLINE",
    /// A user's last connection closed.
    UserOffline => "USER_OFFLINE",
    /// A user's call sessions changed.
    UserWebRtcStateChanged => "USER_WEBRTC_STATE_CHANGED",
    /// A user group was created.
    UserGroupCreated => "USER_GROUP_CREATED",
    /// A user group or its membership changed.
    UserGroupUpdated => "USER_GROUP_UPDATED",
    /// A user group was deleted.
    UserGroupDeleted => "USER_GROUP_DELETED",
    /// A channel was created.
    ChannelCreated => "CHANNEL_CREATED",
    /// A channel was deleted.
    ChannelDeleted => "CHANNEL_DELETED",
    /// A channel's name, topic or parent changed.
    ChannelUpdated => "CHANNEL_UPDATED",
    /// The current user starred a channel.
    ChannelStared => "CHANNEL_STARED",
    /// The current user unstarred a channel.
    ChannelUnstared => "CHANNEL_UNSTARED",
    /// The set of users viewing a channel changed.
    ChannelViewersChanged => "CHANNEL_VIEWERS_CHANGED",
    /// A message was posted.
    MessageCreated => "MESSAGE_CREATED",
    /// A message was edited.
    MessageUpdated => "MESSAGE_UPDATED",
    /// A message was deleted.
    MessageDeleted => "MESSAGE_DELETED",
    /// The current user read a channel on another connection.
    MessageRead => "MESSAGE_READ",
    /// A stamp was added to a message.
    MessageStamped => "MESSAGE_STAMPED",
    /// A stamp was removed from a message.
    MessageUnstamped => "MESSAGE_UNSTAMPED",
    /// A message was pinned.
    MessagePinned => "MESSAGE_PINNED",
    /// A message was unpinned.
    MessageUnpinned => "MESSAGE_UNPINNED",
    /// A stamp was created.
    StampCreated => "STAMP_CREATED",
    /// A stamp was renamed or its image replaced.
    StampUpdated => "STAMP_UPDATED",
    /// A stamp was deleted.
    StampDeleted => "STAMP_DELETED",
    /// A stamp palette was created.
    StampPaletteCreated => "STAMP_PALETTE_CREATED",
    /// A stamp palette was edited.
    StampPaletteUpdated => "STAMP_PALETTE_UPDATED",
    /// A stamp palette was deleted.
    StampPaletteDeleted => "STAMP_PALETTE_DELETED",
    /// A clip folder was created.
    ClipFolderCreated => "CLIP_FOLDER_CREATED",
    /// A clip folder was edited.
    ClipFolderUpdated => "CLIP_FOLDER_UPDATED",
    /// A clip folder was deleted.
    ClipFolderDeleted => "CLIP_FOLDER_DELETED",
}

impl fmt::Display for EventKind {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.as_str())
    }
}

/// Payload of an event whose kind is not part of [`EventKind`].
///
/// The body is kept opaque; nothing in this crate inspects it.
#[derive(Debug, Clone, PartialEq)]
pub struct UnknownEvent {
    /// The wire tag as received.
    pub kind: String,
    /// The raw body, `null` when the frame had none.
    pub body: Value,
}

impl Event {
    /// Returns the wire tag of this event, recognized or not.
    pub fn wire_kind(&self) -> &str {
        match self {
            Event::Unknown(unknown) => &unknown.kind,
            known => known.kind().map_or("", EventKind::as_str),
        }
    }

    /// Returns `true` unless this is an [`Event::Unknown`].
    pub fn is_recognized(&self) -> bool {
        !matches!(self, Event::Unknown(_))
    }

    /// Encodes this event back into a wire frame.
    pub fn to_frame(&self) -> serde_json::Result<String> {
        let body = self.body_value()?;
        serde_json::to_string(&json!({ "type": self.wire_kind(), "body": body }))
    }
}
