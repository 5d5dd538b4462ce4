use super::*;
use serde_json::json;

// =============================================================
// ClientEvent wire shape
// =============================================================

#[test]
fn join_event_uses_event_and_data_keys() {
    let event = ClientEvent::Join { room: "r1".into(), username: "alice".into() };
    let value: serde_json::Value = serde_json::from_str(&encode(&event).expect("encode")).expect("json");
    assert_eq!(value, json!({"event": "join", "data": {"room": "r1", "username": "alice"}}));
}

#[test]
fn send_message_event_carries_room_username_and_text() {
    let event = ClientEvent::SendMessage { room: "r1".into(), username: "alice".into(), message: "hello".into() };
    let value: serde_json::Value = serde_json::from_str(&encode(&event).expect("encode")).expect("json");
    assert_eq!(value["event"], "send_message");
    assert_eq!(value["data"], json!({"room": "r1", "username": "alice", "message": "hello"}));
}

#[test]
fn disconnect_event_has_no_payload() {
    let text = encode(&ClientEvent::Disconnect).expect("encode");
    let value: serde_json::Value = serde_json::from_str(&text).expect("json");
    assert_eq!(value, json!({"event": "disconnect"}));
    let decoded: ClientEvent = decode(r#"{"event":"disconnect"}"#).expect("decode");
    assert_eq!(decoded, ClientEvent::Disconnect);
}

#[test]
fn decode_rejects_unknown_event_name() {
    let err = decode::<ClientEvent>(r#"{"event":"shout","data":{}}"#).expect_err("unknown event");
    assert!(matches!(err, CodecError::Json(_)));
}

#[test]
fn client_event_names_match_wire_tags() {
    assert_eq!(ClientEvent::Disconnect.name(), "disconnect");
    assert_eq!(ClientEvent::UpdateUsername { username: "bob".into() }.name(), "update_username");
}

// =============================================================
// MessagePayload → InboundEvent
// =============================================================

#[test]
fn message_received_decodes_optional_fields() {
    let event: ServerEvent = decode(
        r#"{"event":"message_received","data":{"type":"system","message":"alice joined","username":"alice","room":"r1"}}"#,
    )
    .expect("decode");
    let ServerEvent::MessageReceived(payload) = event;
    assert_eq!(payload.code, None);
    assert_eq!(payload.room.as_deref(), Some("r1"));
    assert!(payload.is_system());
}

#[test]
fn system_payload_with_409_is_conflict() {
    let event = MessagePayload::system("name taken", Some(CONFLICT_CODE)).into_event();
    assert!(event.is_conflict());
}

#[test]
fn upper_case_system_type_is_system() {
    let payload = MessagePayload { kind: "SYSTEM_MESSAGE".into(), message: "hi".into(), ..MessagePayload::default() };
    assert!(matches!(payload.into_event(), InboundEvent::System { .. }));
}

#[test]
fn non_system_payload_becomes_chat_with_empty_name_fallback() {
    let payload = MessagePayload { kind: "USER_MESSAGE".into(), message: "yo".into(), ..MessagePayload::default() };
    assert_eq!(payload.into_event(), InboundEvent::Chat { username: String::new(), message: "yo".into() });
}

#[test]
fn failure_codes_are_errors_and_success_is_not() {
    let gateway = MessagePayload::system("upstream connect failed", Some(BAD_GATEWAY_CODE)).into_event();
    assert!(gateway.is_error());
    assert!(!gateway.is_conflict());

    assert!(MessagePayload::system("taken", Some(CONFLICT_CODE)).into_event().is_error());
    assert!(!MessagePayload::system("joined", Some(OK_CODE)).into_event().is_error());
    assert!(!MessagePayload::system("joined", None).into_event().is_error());
    assert!(!InboundEvent::Chat { username: "bob".into(), message: "500".into() }.is_error());
}

#[test]
fn chat_event_is_never_conflict() {
    let event = InboundEvent::Chat { username: "bob".into(), message: "409".into() };
    assert!(!event.is_conflict());
}

#[test]
fn server_event_omits_absent_fields() {
    let event = ServerEvent::MessageReceived(MessagePayload::chat("bob", "hi"));
    let value: serde_json::Value = serde_json::from_str(&encode(&event).expect("encode")).expect("json");
    assert_eq!(
        value,
        json!({"event": "message_received", "data": {"type": "chat", "message": "hi", "username": "bob"}})
    );
}
