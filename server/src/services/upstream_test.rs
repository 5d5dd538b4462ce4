use super::*;
use frames::upstream::UpstreamKind;
use tokio::net::TcpListener;
use tokio::time::{Duration, timeout};

async fn recv_event(rx: &mut mpsc::Receiver<UpstreamEvent>) -> UpstreamEvent {
    timeout(Duration::from_millis(500), rx.recv())
        .await
        .expect("upstream event timed out")
        .expect("upstream channel closed")
}

#[tokio::test]
async fn link_writes_requests_and_reads_replies() {
    let listener = TcpListener::bind("127.0.0.1:0").await.expect("bind");
    let addr = listener.local_addr().expect("addr");

    let server = tokio::spawn(async move {
        let (tcp, _) = listener.accept().await.expect("accept");
        let mut ws = tokio_tungstenite::accept_async(tcp).await.expect("handshake");
        let Some(Ok(Message::Text(text))) = ws.next().await else {
            panic!("expected a text frame");
        };
        let join: UpstreamMessage = frames::decode(text.as_str()).expect("decode join");

        let mut reply = UpstreamMessage::join("alice", "r1");
        reply.kind = UpstreamKind::SystemMessage;
        reply.message = "alice joined r1".into();
        ws.send(Message::Text(frames::encode(&reply).expect("encode").into())).await.expect("send");
        ws.send(Message::Text("not json".into())).await.expect("send junk");
        ws.close(None).await.expect("close");
        join
    });

    let (mut link, mut rx) = UpstreamLink::connect(&format!("ws://{addr}")).await.expect("connect");
    link.send(&UpstreamMessage::join("alice", "r1")).await.expect("send join");

    let UpstreamEvent::Message(reply) = recv_event(&mut rx).await else {
        panic!("expected a message");
    };
    assert_eq!(reply.kind, UpstreamKind::SystemMessage);
    assert_eq!(reply.message, "alice joined r1");
    // The undecodable frame is skipped; the close comes next.
    assert_eq!(recv_event(&mut rx).await, UpstreamEvent::Closed);

    let join = server.await.expect("server task");
    assert_eq!(join, UpstreamMessage::join("alice", "r1"));
}

#[tokio::test]
async fn unreachable_upstream_is_a_connect_error() {
    let listener = TcpListener::bind("127.0.0.1:0").await.expect("bind");
    let addr = listener.local_addr().expect("addr");
    drop(listener);

    let Err(err) = UpstreamLink::connect(&format!("ws://{addr}")).await else {
        panic!("connect should fail");
    };
    assert!(matches!(err, RelayError::UpstreamConnect(_)));
    assert_eq!(err.status_code(), frames::BAD_GATEWAY_CODE);
}
