use super::*;
use frames::MessagePayload;
use tokio::net::TcpListener;
use tokio::time::{Duration, timeout};

fn channel_transport() -> (ChannelTransport, mpsc::UnboundedReceiver<Command>) {
    let (tx, rx) = mpsc::unbounded_channel();
    (ChannelTransport::new(tx), rx)
}

// =============================================================
// ChannelTransport
// =============================================================

#[test]
fn emit_before_connect_is_closed() {
    let (mut transport, _rx) = channel_transport();
    let err = transport.emit(ClientEvent::Disconnect).expect_err("closed");
    assert!(matches!(err, TransportError::Closed));
}

#[test]
fn connect_is_queued_once() {
    let (mut transport, mut rx) = channel_transport();
    transport.connect().expect("connect");
    transport.connect().expect("connect again");
    assert!(transport.is_open());
    assert_eq!(rx.try_recv().expect("command"), Command::Connect);
    assert!(rx.try_recv().is_err());
}

#[test]
fn emit_and_close_are_queued_in_order() {
    let (mut transport, mut rx) = channel_transport();
    transport.connect().expect("connect");
    transport.emit(ClientEvent::Disconnect).expect("emit");
    transport.close();
    transport.close();

    assert_eq!(rx.try_recv().expect("connect"), Command::Connect);
    assert_eq!(rx.try_recv().expect("send"), Command::Send(ClientEvent::Disconnect));
    assert_eq!(rx.try_recv().expect("close"), Command::Close);
    assert!(rx.try_recv().is_err());
    assert!(!transport.is_open());
}

#[test]
fn emit_after_task_exit_reports_send_error() {
    let (mut transport, rx) = channel_transport();
    transport.connect().expect("connect");
    drop(rx);
    let err = transport.emit(ClientEvent::UpdateUsername { username: "bob".into() }).expect_err("gone");
    assert!(matches!(err, TransportError::Send { event: "update_username", .. }));
}

// =============================================================
// run_connection against a local websocket server
// =============================================================

#[tokio::test]
async fn connection_task_relays_events_both_ways() {
    let listener = TcpListener::bind("127.0.0.1:0").await.expect("bind");
    let addr = listener.local_addr().expect("addr");

    let server = tokio::spawn(async move {
        let (tcp, _) = listener.accept().await.expect("accept");
        let mut ws = tokio_tungstenite::accept_async(tcp).await.expect("handshake");

        let Some(Ok(Message::Text(text))) = ws.next().await else {
            panic!("expected join text frame");
        };
        let join: ClientEvent = frames::decode(text.as_str()).expect("join event");

        let reply = ServerEvent::MessageReceived(MessagePayload::system("alice joined", None));
        ws.send(Message::Text(frames::encode(&reply).expect("encode").into())).await.expect("reply");
        join
    });

    let (cmd_tx, cmd_rx) = mpsc::unbounded_channel();
    let (event_tx, mut event_rx) = mpsc::unbounded_channel();
    let task = tokio::spawn(run_connection(format!("ws://{addr}"), cmd_rx, event_tx));

    cmd_tx.send(Command::Connect).expect("connect");
    cmd_tx
        .send(Command::Send(ClientEvent::Join { room: "r1".into(), username: "alice".into() }))
        .expect("join");

    let join = timeout(Duration::from_secs(2), server).await.expect("server timed out").expect("server task");
    assert_eq!(join, ClientEvent::Join { room: "r1".into(), username: "alice".into() });

    let event = timeout(Duration::from_secs(2), event_rx.recv()).await.expect("event timed out").expect("event");
    match event {
        AppEvent::Inbound(payload) => assert_eq!(payload.message, "alice joined"),
        other => panic!("unexpected event: {other:?}"),
    }

    drop(cmd_tx);
    timeout(Duration::from_secs(2), task).await.expect("task timed out").expect("task");
}

#[tokio::test]
async fn connect_failure_is_reported() {
    let listener = TcpListener::bind("127.0.0.1:0").await.expect("bind");
    let addr = listener.local_addr().expect("addr");
    drop(listener);

    let (cmd_tx, cmd_rx) = mpsc::unbounded_channel();
    let (event_tx, mut event_rx) = mpsc::unbounded_channel();
    let task = tokio::spawn(run_connection(format!("ws://{addr}"), cmd_rx, event_tx));
    cmd_tx.send(Command::Connect).expect("connect");

    let event = timeout(Duration::from_secs(2), event_rx.recv()).await.expect("timed out").expect("event");
    assert!(matches!(event, AppEvent::ConnectionFailed(_)));

    drop(cmd_tx);
    timeout(Duration::from_secs(2), task).await.expect("task timed out").expect("task");
}
