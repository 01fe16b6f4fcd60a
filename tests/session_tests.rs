//! Integration tests for chat sessions sharing one message store.

use polyglot_chat::chat::{InMemoryMessageStore, MessageStore};
use polyglot_chat::identity::{IdentityKind, LocalIdentityProvider};
use polyglot_chat::mocks::{MockHttpTransport, MockIdentityProvider, MockTranslator};
use polyglot_chat::observability::NoopLogger;
use polyglot_chat::session::TRANSLATING_PLACEHOLDER;
use polyglot_chat::{ChatConfig, ChatSession, SendOutcome, TranslatorBuilder};
use secrecy::SecretString;
use std::sync::Arc;

fn chat_config(token: Option<&str>, language: &str) -> ChatConfig {
    ChatConfig {
        app_id: "test-app".to_string(),
        initial_auth_token: token.map(|t| SecretString::new(t.to_string())),
        default_target_language: language.to_string(),
    }
}

#[tokio::test]
async fn test_two_users_see_each_others_messages() {
    // Arrange
    let store: Arc<dyn MessageStore> = Arc::new(InMemoryMessageStore::new());
    let translator = Arc::new(MockTranslator::new());
    let provider = LocalIdentityProvider::new();

    let alice = ChatSession::connect(
        store.clone(),
        translator.clone(),
        &provider,
        &chat_config(Some("alice-token"), "es"),
    )
    .await
    .with_logger(Arc::new(NoopLogger));
    let bob = ChatSession::connect(store.clone(), translator.clone(), &provider, &chat_config(None, "fr"))
        .await
        .with_logger(Arc::new(NoopLogger));

    // Act
    let outcome = alice.send_message("Hello Bob").await;
    assert!(matches!(outcome, SendOutcome::Sent(_)));
    assert!(bob.sync().await);

    // Assert
    assert_eq!(alice.identity().kind, IdentityKind::Token);
    assert_eq!(bob.identity().kind, IdentityKind::Anonymous);

    let messages = bob.messages();
    assert_eq!(messages.len(), 1);
    assert!(!bob.is_own_message(&messages[0]));
    assert_eq!(messages[0].display_name, alice.identity().display_name());

    let translation = bob.translate(&messages[0]).await.unwrap();
    assert_eq!(translation.language, "French");
    assert_eq!(translation.text, "Hello Bob (French)");
}

#[tokio::test]
async fn test_same_token_resolves_to_same_user() {
    let store: Arc<dyn MessageStore> = Arc::new(InMemoryMessageStore::new());
    let translator = Arc::new(MockTranslator::new());
    let provider = LocalIdentityProvider::new();
    let config = chat_config(Some("shared-token"), "es");

    let first = ChatSession::connect(store.clone(), translator.clone(), &provider, &config).await;
    let second = ChatSession::connect(store, translator, &provider, &config).await;

    assert_eq!(first.identity(), second.identity());
}

#[tokio::test]
async fn test_identity_falls_back_to_local_id() {
    let store: Arc<dyn MessageStore> = Arc::new(InMemoryMessageStore::new());
    let provider = MockIdentityProvider::new();

    let session = ChatSession::connect(
        store,
        Arc::new(MockTranslator::new()),
        &provider,
        &chat_config(Some("token"), "es"),
    )
    .await;

    assert_eq!(session.identity().kind, IdentityKind::Local);
    assert!(session.identity().user_id.starts_with("anon-local-"));
    assert_eq!(provider.token_calls(), 1);
    assert_eq!(provider.anonymous_calls(), 1);
}

#[tokio::test]
async fn test_pending_timestamp_then_resolved() {
    let store = Arc::new(InMemoryMessageStore::with_pending_timestamps());
    let session = ChatSession::connect(
        store.clone(),
        Arc::new(MockTranslator::new()),
        &LocalIdentityProvider::new(),
        &chat_config(None, "es"),
    )
    .await;

    session.send_message("first").await;
    session.sync().await;
    assert_eq!(session.messages()[0].display_time(), "Sending...");

    store.resolve_pending_timestamps();
    session.sync().await;
    assert_ne!(session.messages()[0].display_time(), "Sending...");
}

#[tokio::test(start_paused = true)]
async fn test_session_translation_through_gemini_translator() {
    // Arrange
    let transport = Arc::new(MockHttpTransport::new());
    transport.enqueue_json_response(401, "denied");
    transport.enqueue_json_response(
        200,
        r#"{"candidates":[{"content":{"parts":[{"text":"こんにちは"}]}}]}"#,
    );
    let translator = TranslatorBuilder::new()
        .api_key(SecretString::new("test-key".into()))
        .transport(transport.clone())
        .logger(Arc::new(NoopLogger))
        .build()
        .unwrap();

    let store: Arc<dyn MessageStore> = Arc::new(InMemoryMessageStore::new());
    let session = ChatSession::connect(
        store,
        Arc::new(translator),
        &LocalIdentityProvider::new(),
        &chat_config(None, "ja"),
    )
    .await
    .with_logger(Arc::new(NoopLogger));
    session.send_message("Hello").await;
    session.sync().await;
    let message = session.messages().remove(0);

    // Act
    let failed = session.translate(&message).await.unwrap();
    let succeeded = session.translate(&message).await.unwrap();

    // Assert
    assert_eq!(failed.text, polyglot_chat::NETWORK_FAILURE_FALLBACK);
    assert_eq!(succeeded.text, "こんにちは");
    assert_eq!(succeeded.language, "Japanese");
    assert_ne!(
        session.translation_for(&message.id).map(|t| t.text),
        Some(TRANSLATING_PLACEHOLDER.to_string())
    );
    transport.verify_request_count(2);
}
