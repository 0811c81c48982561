//! `HttpBackend` against the embedded REST router served on a real socket.

use std::sync::Arc;

use nelson_gpt::api;
use nelson_gpt::backend::{BackendError, ChatBackend, HttpBackend, MemoryBackend};
use nelson_gpt::models::{Mode, Role, Theme, UserSettings};
use nelson_gpt::query::DataClient;

/// Serve the embedded router on an ephemeral port and return a client for it.
async fn spawn_actor() -> HttpBackend {
    let client = DataClient::new(Arc::new(MemoryBackend::new()));
    let app = axum::Router::new().nest(
        "/backend",
        api::backend::build_router().with_state(client),
    );
    let listener = tokio::net::TcpListener::bind("127.0.0.1:0")
        .await
        .expect("bind");
    let addr = listener.local_addr().expect("local addr");
    tokio::spawn(async move {
        axum::serve(listener, app).await.expect("serve");
    });
    HttpBackend::new(format!("http://{addr}/backend")).expect("client")
}

#[tokio::test]
async fn test_chat_lifecycle_over_http() {
    let backend = spawn_actor().await;

    let chat_id = backend.create_chat("New Chat").await.unwrap();
    let message_id = backend
        .add_message(chat_id, Role::Assistant, "Give **10 mg/kg**")
        .await
        .unwrap();
    let citation_id = backend
        .add_citation(chat_id, message_id, "Nelson ch. 202", "Antipyretics")
        .await
        .unwrap();
    let follow_up_id = backend
        .add_follow_up(chat_id, message_id, "Maximum daily dose?")
        .await
        .unwrap();
    assert_eq!(citation_id, 1);
    assert_eq!(follow_up_id, 1);

    backend.rename_chat(chat_id, "Fever").await.unwrap();
    backend.pin_chat(chat_id).await.unwrap();

    let chat = backend.get_chat(chat_id).await.unwrap().expect("chat exists");
    assert_eq!(chat.title, "Fever");
    assert!(chat.pinned);
    assert_eq!(chat.messages.len(), 1);
    assert_eq!(chat.messages[0].citations[0].reference, "Nelson ch. 202");
    assert_eq!(chat.messages[0].follow_ups[0].question, "Maximum daily dose?");

    let pinned = backend.get_pinned_chats().await.unwrap();
    assert_eq!(pinned.len(), 1);

    backend.unpin_chat(chat_id).await.unwrap();
    assert!(backend.get_pinned_chats().await.unwrap().is_empty());

    backend.delete_chat(chat_id).await.unwrap();
    assert!(backend.get_chat(chat_id).await.unwrap().is_none());
    assert!(backend.get_all_chats().await.unwrap().is_empty());
}

#[tokio::test]
async fn test_missing_chat_writes_are_not_found() {
    let backend = spawn_actor().await;

    let err = backend
        .add_message(42, Role::User, "hello")
        .await
        .unwrap_err();
    assert!(matches!(err, BackendError::NotFound(_)), "{err:?}");
    assert!(backend.pin_chat(42).await.unwrap_err().is_not_found());
}

#[tokio::test]
async fn test_settings_round_trip_and_mode() {
    let backend = spawn_actor().await;

    // user ids are path-encoded
    let user = "dr smith/peds";
    assert!(backend.get_user_settings(user).await.unwrap().is_none());

    backend.update_user_mode(user, Mode::Clinical).await.unwrap();
    let created = backend.get_user_settings(user).await.unwrap().unwrap();
    assert_eq!(created.mode, Mode::Clinical);
    assert_eq!(created.theme, Theme::Light);

    let settings = UserSettings {
        theme: Theme::Dark,
        ..created
    };
    backend.save_user_settings(user, &settings).await.unwrap();
    let saved = backend.get_user_settings(user).await.unwrap().unwrap();
    assert_eq!(saved, settings);
}

#[tokio::test]
async fn test_unreachable_actor_is_unavailable() {
    // Bind then drop to get a port nobody listens on.
    let listener = tokio::net::TcpListener::bind("127.0.0.1:0").await.unwrap();
    let addr = listener.local_addr().unwrap();
    drop(listener);

    let backend = HttpBackend::new(format!("http://{addr}/backend")).unwrap();
    let err = backend.get_all_chats().await.unwrap_err();
    assert!(matches!(err, BackendError::Unavailable(_)), "{err:?}");
}
