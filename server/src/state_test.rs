use super::*;
use super::test_helpers::test_app_state;

fn test_state() -> AppState {
    test_app_state("ws://127.0.0.1:1")
}

fn alice() -> SessionInfo {
    SessionInfo { username: "alice".into(), room: "r1".into() }
}

#[tokio::test]
async fn registered_clients_count_until_unregistered() {
    let state = test_state();
    let (a, b) = (Uuid::new_v4(), Uuid::new_v4());
    state.register(a).await;
    state.register(b).await;
    assert_eq!(state.counts().await, (2, 0));

    state.set_session(a, Some(alice())).await;
    assert_eq!(state.counts().await, (2, 1));

    state.unregister(a).await;
    assert_eq!(state.counts().await, (1, 0));
}

#[tokio::test]
async fn set_session_ignores_unknown_clients() {
    let state = test_state();
    state.set_session(Uuid::new_v4(), Some(alice())).await;
    assert_eq!(state.counts().await, (0, 0));
}

#[tokio::test]
async fn clones_share_the_registry() {
    let state = test_state();
    let clone = state.clone();
    let id = Uuid::new_v4();
    clone.register(id).await;
    assert_eq!(state.counts().await, (1, 0));
    assert_eq!(state.clients.read().await.get(&id), Some(&None));
}
