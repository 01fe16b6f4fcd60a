//! Chat session state: sending, the live message list and per-message
//! translations.

use futures::FutureExt;
use serde_json::json;
use std::collections::{HashMap, HashSet};
use std::sync::{Arc, Mutex as StateMutex, MutexGuard, PoisonError};
use tokio::sync::Mutex;

use crate::chat::{ChatMessage, MessageStore, MessageSubscription, NewMessage};
use crate::config::ChatConfig;
use crate::error::StoreError;
use crate::identity::{resolve_identity, IdentityProvider, UserIdentity};
use crate::observability::{default_logger, Logger};
use crate::translation::{language_name, TranslationResult, Translator, DEFAULT_TARGET_LANGUAGE};

/// Text shown for a translation that is still running.
pub const TRANSLATING_PLACEHOLDER: &str = "Translating...";

/// Notice added to the message list when a send fails.
pub const SEND_FAILURE_NOTICE: &str = "Failed to send message.";

/// Result of [`ChatSession::send_message`].
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum SendOutcome {
    /// Stored under the given id.
    Sent(String),
    /// Blank input, nothing was written.
    Skipped,
    /// The store rejected the write; a notice was added locally.
    Failed(StoreError),
}

#[derive(Debug)]
struct SessionState {
    target_language: String,
    // Bumped on every language change so late results for the old
    // language are not stored.
    generation: u64,
    snapshot: Vec<ChatMessage>,
    notices: Vec<ChatMessage>,
    translations: HashMap<String, TranslationResult>,
    in_flight: HashSet<String>,
}

fn lock(state: &StateMutex<SessionState>) -> MutexGuard<'_, SessionState> {
    state.lock().unwrap_or_else(PoisonError::into_inner)
}

/// Releases a message's in-flight slot when a translation ends, including
/// when the translating future is dropped before the translator answers.
struct InFlightSlot<'a> {
    state: &'a StateMutex<SessionState>,
    message_id: &'a str,
    completed: bool,
}

impl InFlightSlot<'_> {
    fn complete(mut self, generation: u64, result: &TranslationResult, logger: &dyn Logger) {
        let mut state = lock(self.state);
        state.in_flight.remove(self.message_id);
        if state.generation == generation {
            state
                .translations
                .insert(self.message_id.to_string(), result.clone());
        } else {
            logger.debug(
                "Discarding translation for a previous target language",
                json!({ "message_id": self.message_id }),
            );
        }
        self.completed = true;
    }
}

impl Drop for InFlightSlot<'_> {
    fn drop(&mut self) {
        if self.completed {
            return;
        }
        let mut state = lock(self.state);
        state.in_flight.remove(self.message_id);
        let placeholder_left = state
            .translations
            .get(self.message_id)
            .is_some_and(|t| t.text == TRANSLATING_PLACEHOLDER);
        if placeholder_left {
            state.translations.remove(self.message_id);
        }
    }
}

/// One user's view of the chat.
pub struct ChatSession {
    store: Arc<dyn MessageStore>,
    translator: Arc<dyn Translator>,
    identity: UserIdentity,
    subscription: Mutex<MessageSubscription>,
    // Never held across an await.
    state: StateMutex<SessionState>,
    logger: Arc<dyn Logger>,
}

impl ChatSession {
    /// Creates a session for `identity` and subscribes to `store`.
    ///
    /// The store's current snapshot is taken over immediately when it is
    /// already available.
    pub fn new(
        store: Arc<dyn MessageStore>,
        translator: Arc<dyn Translator>,
        identity: UserIdentity,
    ) -> Self {
        let mut subscription = store.subscribe();
        let snapshot = subscription
            .next_snapshot()
            .now_or_never()
            .flatten()
            .unwrap_or_default();

        Self {
            store,
            translator,
            identity,
            subscription: Mutex::new(subscription),
            state: StateMutex::new(SessionState {
                target_language: DEFAULT_TARGET_LANGUAGE.to_string(),
                generation: 0,
                snapshot,
                notices: Vec::new(),
                translations: HashMap::new(),
                in_flight: HashSet::new(),
            }),
            logger: default_logger("polyglot.session"),
        }
    }

    /// Signs in through `provider` and creates a session configured by `config`.
    pub async fn connect(
        store: Arc<dyn MessageStore>,
        translator: Arc<dyn Translator>,
        provider: &dyn IdentityProvider,
        config: &ChatConfig,
    ) -> Self {
        let identity = resolve_identity(provider, config.initial_auth_token.as_ref()).await;
        let session = Self::new(store, translator, identity);
        session
            .logger
            .info("Chat session started", json!({ "collection": config.collection_path() }));
        session.set_target_language(&config.default_target_language);
        session
    }

    /// Replaces the component logger.
    pub fn with_logger(mut self, logger: Arc<dyn Logger>) -> Self {
        self.logger = logger;
        self
    }

    /// The signed-in user.
    pub fn identity(&self) -> &UserIdentity {
        &self.identity
    }

    /// Whether `message` was written by this session's user.
    pub fn is_own_message(&self, message: &ChatMessage) -> bool {
        message.user_id == self.identity.user_id
    }

    /// Sends `text` as this session's user. Surrounding whitespace is trimmed.
    pub async fn send_message(&self, text: &str) -> SendOutcome {
        let text = text.trim();
        if text.is_empty() {
            return SendOutcome::Skipped;
        }

        let message = NewMessage::new(
            text,
            self.identity.user_id.clone(),
            self.identity.display_name(),
        );

        match self.store.append(message).await {
            Ok(id) => {
                self.logger.debug("Message sent", json!({ "message_id": id }));
                SendOutcome::Sent(id)
            }
            Err(e) => {
                self.logger.error(
                    "Error sending message",
                    json!({ "error": e.to_string(), "user": self.identity.user_id }),
                );
                lock(&self.state)
                    .notices
                    .push(ChatMessage::system_notice(SEND_FAILURE_NOTICE));
                SendOutcome::Failed(e)
            }
        }
    }

    /// The latest store snapshot followed by local notices.
    pub fn messages(&self) -> Vec<ChatMessage> {
        let state = lock(&self.state);
        state
            .snapshot
            .iter()
            .chain(state.notices.iter())
            .cloned()
            .collect()
    }

    /// Waits for the next store snapshot. Returns `false` once the store has closed.
    ///
    /// Local notices are dropped when a new snapshot arrives.
    pub async fn sync(&self) -> bool {
        let next = self.subscription.lock().await.next_snapshot().await;
        match next {
            Some(snapshot) => {
                let mut state = lock(&self.state);
                state.snapshot = snapshot;
                state.notices.clear();
                true
            }
            None => {
                self.logger.warn("Message subscription ended", json!({}));
                false
            }
        }
    }

    /// Current target language code.
    pub fn target_language(&self) -> String {
        lock(&self.state).target_language.clone()
    }

    /// Display name of the current target language.
    pub fn target_language_name(&self) -> &'static str {
        language_name(&lock(&self.state).target_language)
    }

    /// Changes the target language and forgets all translations.
    pub fn set_target_language(&self, code: &str) {
        let mut state = lock(&self.state);
        if state.target_language != code {
            self.logger.debug(
                "Target language changed",
                json!({ "from": state.target_language, "to": code }),
            );
        }
        state.target_language = code.to_string();
        state.generation += 1;
        state.translations.clear();
    }

    /// Translates `message` into the current target language.
    ///
    /// Returns `None` without calling the translator when the same message
    /// is already being translated. While the call runs,
    /// [`translation_for`](Self::translation_for) reports
    /// [`TRANSLATING_PLACEHOLDER`]. Dropping the returned future before it
    /// completes clears the placeholder and the in-flight mark.
    pub async fn translate(&self, message: &ChatMessage) -> Option<TranslationResult> {
        let (language, generation) = {
            let mut state = lock(&self.state);
            if !state.in_flight.insert(message.id.clone()) {
                return None;
            }
            let language = language_name(&state.target_language).to_string();
            state.translations.insert(
                message.id.clone(),
                TranslationResult {
                    text: TRANSLATING_PLACEHOLDER.to_string(),
                    language: language.clone(),
                },
            );
            (language, state.generation)
        };

        let slot = InFlightSlot {
            state: &self.state,
            message_id: &message.id,
            completed: false,
        };

        let text = self.translator.translate(&message.text, &language).await;
        let result = TranslationResult { text, language };
        slot.complete(generation, &result, self.logger.as_ref());
        Some(result)
    }

    /// The stored translation (or placeholder) for a message id.
    pub fn translation_for(&self, message_id: &str) -> Option<TranslationResult> {
        lock(&self.state).translations.get(message_id).cloned()
    }

    /// Whether a translation of the message is running.
    pub fn is_translating(&self, message_id: &str) -> bool {
        lock(&self.state).in_flight.contains(message_id)
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::chat::{InMemoryMessageStore, SYSTEM_USER};
    use crate::identity::IdentityKind;
    use crate::mocks::{MockMessageStore, MockTranslator};
    use crate::observability::NoopLogger;
    use pretty_assertions::assert_eq;
    use std::time::Duration;
    use tokio::sync::Notify;

    fn identity() -> UserIdentity {
        UserIdentity::new("user-12345678-abc", IdentityKind::Anonymous)
    }

    fn session_with(store: Arc<dyn MessageStore>, translator: Arc<MockTranslator>) -> ChatSession {
        ChatSession::new(store, translator, identity()).with_logger(Arc::new(NoopLogger))
    }

    #[tokio::test]
    async fn test_send_message_appends_with_identity() {
        let store = Arc::new(InMemoryMessageStore::new());
        let session = session_with(store.clone(), Arc::new(MockTranslator::new()));

        let outcome = session.send_message("  Hello there  ").await;

        let SendOutcome::Sent(id) = outcome else {
            panic!("expected Sent, got {outcome:?}");
        };
        let stored = store.snapshot();
        assert_eq!(stored.len(), 1);
        assert_eq!(stored[0].id, id);
        assert_eq!(stored[0].text, "Hello there");
        assert_eq!(stored[0].user_id, "user-12345678-abc");
        assert_eq!(stored[0].display_name, "User-user-123");
    }

    #[tokio::test]
    async fn test_blank_message_is_skipped() {
        let store = Arc::new(InMemoryMessageStore::new());
        let session = session_with(store.clone(), Arc::new(MockTranslator::new()));

        assert_eq!(session.send_message("   ").await, SendOutcome::Skipped);
        assert!(store.is_empty());
    }

    #[tokio::test]
    async fn test_failed_send_adds_notice() {
        let store = Arc::new(MockMessageStore::new());
        store.set_fail_writes(true);
        let session = session_with(store.clone(), Arc::new(MockTranslator::new()));

        let outcome = session.send_message("hi").await;

        assert!(matches!(outcome, SendOutcome::Failed(StoreError::WriteRejected { .. })));
        let messages = session.messages();
        assert_eq!(messages.len(), 1);
        assert_eq!(messages[0].text, SEND_FAILURE_NOTICE);
        assert_eq!(messages[0].user_id, SYSTEM_USER);
    }

    #[tokio::test]
    async fn test_notice_cleared_by_next_snapshot() {
        let store = Arc::new(MockMessageStore::new());
        let session = session_with(store.clone(), Arc::new(MockTranslator::new()));
        store.set_fail_writes(true);
        session.send_message("lost").await;
        assert_eq!(session.messages().len(), 1);

        store.set_fail_writes(false);
        session.send_message("delivered").await;
        assert!(session.sync().await);

        let messages = session.messages();
        assert_eq!(messages.len(), 1);
        assert_eq!(messages[0].text, "delivered");
        assert!(messages.iter().all(|m| m.text != SEND_FAILURE_NOTICE));
    }

    #[tokio::test]
    async fn test_sync_picks_up_new_snapshots() {
        let store = Arc::new(InMemoryMessageStore::new());
        let session = session_with(store.clone(), Arc::new(MockTranslator::new()));
        assert!(session.messages().is_empty());

        session.send_message("one").await;
        assert!(session.sync().await);

        let messages = session.messages();
        assert_eq!(messages.len(), 1);
        assert!(session.is_own_message(&messages[0]));
    }

    #[tokio::test]
    async fn test_sync_reports_closed_store() {
        let store = Arc::new(InMemoryMessageStore::new());
        let session = session_with(store.clone(), Arc::new(MockTranslator::new()));

        store.close();
        assert!(!session.sync().await);
    }

    #[tokio::test]
    async fn test_translate_stores_result() {
        let store = Arc::new(InMemoryMessageStore::new());
        let translator = Arc::new(MockTranslator::new());
        let session = session_with(store.clone(), translator.clone());
        session.send_message("Good morning").await;
        session.sync().await;
        let message = session.messages().remove(0);

        let result = session.translate(&message).await.unwrap();

        assert_eq!(result.text, "Good morning (Spanish)");
        assert_eq!(result.language, "Spanish");
        assert_eq!(session.translation_for(&message.id), Some(result));
        assert_eq!(
            translator.calls(),
            vec![("Good morning".to_string(), "Spanish".to_string())]
        );
    }

    #[tokio::test]
    async fn test_placeholder_and_in_flight_guard() {
        let store = Arc::new(InMemoryMessageStore::new());
        let gate = Arc::new(Notify::new());
        let translator = Arc::new(MockTranslator::new().with_gate(gate.clone()));
        let session = Arc::new(session_with(store.clone(), translator.clone()));
        let message = ChatMessage::system_notice("Bonjour");

        let task = {
            let session = session.clone();
            let message = message.clone();
            tokio::spawn(async move { session.translate(&message).await })
        };

        while !session.is_translating(&message.id) {
            tokio::task::yield_now().await;
        }

        let placeholder = session.translation_for(&message.id).unwrap();
        assert_eq!(placeholder.text, TRANSLATING_PLACEHOLDER);
        assert_eq!(session.translate(&message).await, None);

        gate.notify_one();
        let result = task.await.unwrap().unwrap();

        assert_eq!(result.text, "Bonjour (Spanish)");
        assert!(!session.is_translating(&message.id));
        assert_eq!(translator.call_count(), 1);
    }

    #[tokio::test(start_paused = true)]
    async fn test_abandoned_translation_can_be_retried() {
        // Arrange
        let store = Arc::new(InMemoryMessageStore::new());
        let gate = Arc::new(Notify::new());
        let translator = Arc::new(MockTranslator::new().with_gate(gate.clone()));
        let session = session_with(store, translator.clone());
        let message = ChatMessage::system_notice("Hallo");

        // Act
        let abandoned =
            tokio::time::timeout(Duration::from_millis(20), session.translate(&message)).await;

        // Assert
        assert!(abandoned.is_err());
        assert!(!session.is_translating(&message.id));
        assert_eq!(session.translation_for(&message.id), None);

        gate.notify_one();
        let result = session.translate(&message).await.unwrap();
        assert_eq!(result.text, "Hallo (Spanish)");
        assert_eq!(session.translation_for(&message.id), Some(result));
        assert!(!session.is_translating(&message.id));
        assert_eq!(translator.call_count(), 2);
    }

    #[tokio::test]
    async fn test_language_change_clears_translations() {
        let store = Arc::new(InMemoryMessageStore::new());
        let session = session_with(store, Arc::new(MockTranslator::new()));
        let message = ChatMessage::system_notice("Hello");

        session.translate(&message).await.unwrap();
        session.set_target_language("ja");

        assert_eq!(session.translation_for(&message.id), None);
        assert_eq!(session.target_language_name(), "Japanese");

        let result = session.translate(&message).await.unwrap();
        assert_eq!(result.language, "Japanese");
    }

    #[tokio::test]
    async fn test_unknown_language_translates_to_english() {
        let store = Arc::new(InMemoryMessageStore::new());
        let session = session_with(store, Arc::new(MockTranslator::new()));
        session.set_target_language("tlh");

        assert_eq!(session.target_language(), "tlh");
        assert_eq!(session.target_language_name(), "English");
    }
}
