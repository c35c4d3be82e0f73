//! Frame decoder.
//!
//! Turns one raw text frame into an [`Event`]. The decoder is stateless: the
//! same frame always yields an equal envelope.

use serde_json::Value;

use crate::error::{DecodeError, DecodeResult};
use crate::event::{Event, EventKind, UnknownEvent};

/// Decodes a single frame.
///
/// - not JSON → [`DecodeError::Malformed`]
/// - no string `type` → [`DecodeError::MissingKind`]
/// - unrecognized `type` → `Ok(Event::Unknown(..))`
/// - recognized `type` with an unreadable body → [`DecodeError::InvalidBody`]
///
/// Unknown fields inside a body are ignored.
pub fn decode(frame: &str) -> DecodeResult<Event> {
    let value: Value = serde_json::from_str(frame).map_err(DecodeError::Malformed)?;

    let Value::Object(mut object) = value else {
        return Err(DecodeError::MissingKind);
    };

    let tag = match object.remove("type") {
        Some(Value::String(tag)) => tag,
        _ => return Err(DecodeError::MissingKind),
    };
    let body = object.remove("body").unwrap_or(Value::Null);

    match EventKind::from_wire(&tag) {
        Some(kind) => {
            Event::from_body(kind, body).map_err(|source| DecodeError::InvalidBody { kind, source })
        }
        None => Ok(Event::Unknown(UnknownEvent { kind: tag, body })),
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::event::{MessageCreated, UserWebRtcStateChanged};
    use crate::testing::{sample_body, sample_frame};
    use serde_json::json;
    use uuid::Uuid;

    #[test]
    fn test_decodes_every_kind() {
        for kind in EventKind::ALL {
            let event = decode(&sample_frame(*kind)).unwrap();
            assert_eq!(event.kind(), Some(*kind), "{kind}");
        }
    }

    #[test]
    fn test_not_json_is_malformed() {
        assert!(matches!(decode("not json"), Err(DecodeError::Malformed(_))));
        assert!(matches!(decode(""), Err(DecodeError::Malformed(_))));
        assert!(matches!(
            decode(r#"{"type": "USER_JOINED""#),
            Err(DecodeError::Malformed(_))
        ));
    }

    #[test]
    fn test_missing_type_is_missing_kind() {
        assert!(matches!(
            decode(r#"{"body": {}}"#),
            Err(DecodeError::MissingKind)
        ));
    }

    #[test]
    fn test_non_string_type_is_missing_kind() {
        assert!(matches!(
            decode(r#"{"type": 3, "body": {}}"#),
            Err(DecodeError::MissingKind)
        ));
        assert!(matches!(
            decode(r#"{"type": null, "body": {}}"#),
            Err(DecodeError::MissingKind)
        ));
    }

    #[test]
    fn test_non_object_is_missing_kind() {
        assert!(matches!(decode("[1, 2]"), Err(DecodeError::MissingKind)));
        assert!(matches!(decode("\"USER_JOINED\""), Err(DecodeError::MissingKind)));
    }

    #[test]
    fn test_unknown_kind_decodes() {
        let event = decode(r#"{"type": "NOT_A_REAL_KIND", "body": {"x": 1}}"#).unwrap();
        assert_eq!(
            event,
            Event::Unknown(UnknownEvent {
                kind: "NOT_A_REAL_KIND".to_string(),
                body: json!({ "x": 1 }),
            })
        );
    }

    #[test]
    fn test_unknown_kind_without_body() {
        let event = decode(r#"{"type": "NOT_A_REAL_KIND"}"#).unwrap();
        assert_eq!(event.wire_kind(), "NOT_A_REAL_KIND");
        assert!(matches!(event, Event::Unknown(UnknownEvent { body: Value::Null, .. })));
    }

    #[test]
    fn test_invalid_body_reports_kind() {
        let result = decode(r#"{"type": "MESSAGE_CREATED", "body": {"id": "not-a-uuid"}}"#);
        assert!(matches!(
            result,
            Err(DecodeError::InvalidBody {
                kind: EventKind::MessageCreated,
                ..
            })
        ));
    }

    #[test]
    fn test_missing_body_for_known_kind_is_invalid() {
        assert!(matches!(
            decode(r#"{"type": "STAMP_DELETED"}"#),
            Err(DecodeError::InvalidBody {
                kind: EventKind::StampDeleted,
                ..
            })
        ));
    }

    #[test]
    fn test_extra_fields_are_ignored() {
        let id = Uuid::new_v4();
        let frame = json!({
            "type": "MESSAGE_CREATED",
            "body": { "id": id, "is_citing": true, "added_later": [1, 2, 3] },
            "seq": 42,
        })
        .to_string();
        assert_eq!(
            decode(&frame).unwrap(),
            Event::MessageCreated(MessageCreated { id, is_citing: true })
        );
    }

    #[test]
    fn test_optional_fields_default() {
        let id = Uuid::new_v4();
        let frame = json!({ "type": "MESSAGE_CREATED", "body": { "id": id } }).to_string();
        assert_eq!(
            decode(&frame).unwrap(),
            Event::MessageCreated(MessageCreated { id, is_citing: false })
        );
    }

    #[test]
    fn test_webrtc_sessions_use_camel_case() {
        let frame = sample_frame(EventKind::UserWebRtcStateChanged);
        let Event::UserWebRtcStateChanged(UserWebRtcStateChanged { sessions, .. }) =
            decode(&frame).unwrap()
        else {
            panic!("wrong variant");
        };
        assert_eq!(
            sessions[0].session_id,
            sample_body(EventKind::UserWebRtcStateChanged)["sessions"][0]["sessionId"]
        );
    }

    #[test]
    fn test_decode_is_idempotent() {
        for kind in EventKind::ALL {
            let frame = sample_frame(*kind);
            assert_eq!(decode(&frame).unwrap(), decode(&frame).unwrap());
        }
    }

    #[test]
    fn test_to_frame_decodes_to_equal_event() {
        let original = decode(&sample_frame(EventKind::ChannelViewersChanged)).unwrap();
        let reencoded = decode(&original.to_frame().unwrap()).unwrap();
        assert_eq!(original, reencoded);
    }
}
