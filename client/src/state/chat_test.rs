use super::*;

#[test]
fn other_message_is_prefixed_with_sender() {
    let msg = ChatMessage::other("bob", "hi there");
    assert_eq!(msg.kind, MessageKind::Other);
    assert_eq!(msg.display_text(), "bob: hi there");
}

#[test]
fn own_message_shows_bare_text() {
    let msg = ChatMessage::own("alice", "hello");
    assert_eq!(msg.kind, MessageKind::Own);
    assert_eq!(msg.display_text(), "hello");
}

#[test]
fn system_message_has_no_sender() {
    let msg = ChatMessage::system("alice joined");
    assert!(msg.sender.is_empty());
    assert_eq!(msg.display_text(), "alice joined");
}

#[test]
fn markup_is_kept_verbatim() {
    let msg = ChatMessage::other("eve", "<b>bold</b>");
    assert_eq!(msg.display_text(), "eve: <b>bold</b>");
}
