//! Mock implementations for testing.
//!
//! Test doubles for every seam of the crate: the HTTP transport, the request
//! executor, the translator, the identity provider, authentication and the
//! message store. They record what they were asked to do so tests can
//! verify interactions.

use async_trait::async_trait;
use bytes::Bytes;
use secrecy::SecretString;
use std::collections::{HashMap, VecDeque};
use std::sync::atomic::{AtomicBool, AtomicUsize, Ordering};
use std::sync::{Arc, Mutex, MutexGuard, PoisonError};
use tokio::sync::Notify;
use tokio::time::Instant;
use url::Url;

use crate::auth::{AuthManager, API_KEY_HEADER};
use crate::chat::{InMemoryMessageStore, MessageStore, MessageSubscription, NewMessage};
use crate::error::{IdentityError, RequestError, StoreError};
use crate::identity::IdentityProvider;
use crate::resilience::RequestExecutor;
use crate::transport::{HttpMethod, HttpRequest, HttpResponse, HttpTransport, TransportError};
use crate::translation::Translator;

fn lock<T>(mutex: &Mutex<T>) -> MutexGuard<'_, T> {
    mutex.lock().unwrap_or_else(PoisonError::into_inner)
}

fn json_response(status: u16, body: &str) -> HttpResponse {
    let mut headers = HashMap::new();
    headers.insert("content-type".to_string(), "application/json".to_string());
    HttpResponse {
        status,
        headers,
        body: Bytes::from(body.to_string()),
    }
}

/// Mock HTTP transport for testing.
///
/// Responses are returned in the order they were enqueued. Every request is
/// recorded together with the (tokio) instant it was sent, so backoff can be
/// measured under paused time.
///
/// # Example
///
/// ```
/// use polyglot_chat::mocks::MockHttpTransport;
/// use polyglot_chat::transport::{HttpMethod, HttpRequest, HttpTransport};
/// use std::collections::HashMap;
///
/// tokio_test::block_on(async {
///     let transport = MockHttpTransport::new();
///     transport.enqueue_json_response(200, r#"{"status": "ok"}"#);
///
///     let request = HttpRequest {
///         method: HttpMethod::Get,
///         url: "https://example.com".to_string(),
///         headers: HashMap::new(),
///         body: None,
///     };
///
///     let response = transport.send(request).await.unwrap();
///     assert_eq!(response.status, 200);
///     transport.verify_request_count(1);
/// });
/// ```
#[derive(Default)]
pub struct MockHttpTransport {
    responses: Mutex<VecDeque<Result<HttpResponse, TransportError>>>,
    requests: Mutex<Vec<(HttpRequest, Instant)>>,
}

impl MockHttpTransport {
    /// Create a new mock HTTP transport.
    pub fn new() -> Self {
        Self::default()
    }

    /// Enqueue a response to be returned by the next request.
    pub fn enqueue_response(&self, response: Result<HttpResponse, TransportError>) {
        lock(&self.responses).push_back(response);
    }

    /// Enqueue a JSON response with the given status code and body.
    pub fn enqueue_json_response(&self, status: u16, body: &str) {
        self.enqueue_response(Ok(json_response(status, body)));
    }

    /// Enqueue a transport failure.
    pub fn enqueue_error(&self, error: TransportError) {
        self.enqueue_response(Err(error));
    }

    /// Get all requests that were made.
    pub fn get_requests(&self) -> Vec<HttpRequest> {
        lock(&self.requests).iter().map(|(r, _)| r.clone()).collect()
    }

    /// Get the last request that was made.
    pub fn last_request(&self) -> Option<HttpRequest> {
        lock(&self.requests).last().map(|(r, _)| r.clone())
    }

    /// Instants at which each request was sent.
    pub fn request_instants(&self) -> Vec<Instant> {
        lock(&self.requests).iter().map(|(_, at)| *at).collect()
    }

    /// Verify that exactly `expected` requests were made.
    pub fn verify_request_count(&self, expected: usize) {
        let actual = lock(&self.requests).len();
        assert_eq!(actual, expected, "Expected {} requests, got {}", expected, actual);
    }

    /// Verify that a request was made with the expected method and URL.
    pub fn verify_request(&self, index: usize, method: HttpMethod, url_contains: &str) {
        let requests = lock(&self.requests);
        assert!(index < requests.len(), "No request at index {}", index);

        let request = &requests[index].0;
        assert_eq!(request.method, method, "Expected method {:?}, got {:?}", method, request.method);
        assert!(
            request.url.contains(url_contains),
            "Expected URL to contain '{}', got '{}'",
            url_contains,
            request.url
        );
    }

    /// Verify that a request carried a specific header.
    pub fn verify_header(&self, index: usize, header_name: &str, header_value: &str) {
        let requests = lock(&self.requests);
        assert!(index < requests.len(), "No request at index {}", index);

        let actual_value = requests[index].0.headers.get(header_name);
        assert_eq!(
            actual_value.map(String::as_str),
            Some(header_value),
            "Expected header '{}' to be '{}', got {:?}",
            header_name,
            header_value,
            actual_value
        );
    }
}

#[async_trait]
impl HttpTransport for MockHttpTransport {
    async fn send(&self, request: HttpRequest) -> Result<HttpResponse, TransportError> {
        lock(&self.requests).push((request, Instant::now()));

        lock(&self.responses).pop_front().unwrap_or_else(|| {
            Err(TransportError::Connection(
                "No response configured in MockHttpTransport".to_string(),
            ))
        })
    }
}

/// Scripted [`RequestExecutor`]: returns enqueued outcomes without retrying.
#[derive(Default)]
pub struct MockRequestExecutor {
    outcomes: Mutex<VecDeque<Result<HttpResponse, RequestError>>>,
    requests: Mutex<Vec<HttpRequest>>,
}

impl MockRequestExecutor {
    /// Create an executor with no scripted outcomes.
    pub fn new() -> Self {
        Self::default()
    }

    /// Enqueue a successful response with a JSON body.
    pub fn enqueue_json(&self, status: u16, body: &str) {
        lock(&self.outcomes).push_back(Ok(json_response(status, body)));
    }

    /// Enqueue a terminal failure.
    pub fn enqueue_error(&self, error: RequestError) {
        lock(&self.outcomes).push_back(Err(error));
    }

    /// Get the last request that was executed.
    pub fn last_request(&self) -> Option<HttpRequest> {
        lock(&self.requests).last().cloned()
    }

    /// Verify that exactly `expected` requests were executed.
    pub fn verify_request_count(&self, expected: usize) {
        let actual = lock(&self.requests).len();
        assert_eq!(actual, expected, "Expected {} requests, got {}", expected, actual);
    }
}

#[async_trait]
impl RequestExecutor for MockRequestExecutor {
    async fn execute(&self, request: HttpRequest) -> Result<HttpResponse, RequestError> {
        lock(&self.requests).push(request);

        lock(&self.outcomes).pop_front().unwrap_or_else(|| {
            Err(RequestError::Transport {
                message: "No response configured in MockRequestExecutor".to_string(),
            })
        })
    }
}

/// Translator that answers `"{text} ({language})"` unless told otherwise.
///
/// With a gate the translator waits for a notification before answering,
/// which lets tests observe a translation while it is in flight.
#[derive(Default)]
pub struct MockTranslator {
    responses: Mutex<VecDeque<String>>,
    calls: Mutex<Vec<(String, String)>>,
    gate: Option<Arc<Notify>>,
}

impl MockTranslator {
    /// Create a translator with the default echo behaviour.
    pub fn new() -> Self {
        Self::default()
    }

    /// Hold every translation until `gate` is notified.
    pub fn with_gate(mut self, gate: Arc<Notify>) -> Self {
        self.gate = Some(gate);
        self
    }

    /// Answer the next call with `response`.
    pub fn enqueue_response(&self, response: &str) {
        lock(&self.responses).push_back(response.to_string());
    }

    /// `(text, language)` of every call so far.
    pub fn calls(&self) -> Vec<(String, String)> {
        lock(&self.calls).clone()
    }

    /// Number of calls so far.
    pub fn call_count(&self) -> usize {
        lock(&self.calls).len()
    }
}

#[async_trait]
impl Translator for MockTranslator {
    async fn translate(&self, text: &str, target_lang_name: &str) -> String {
        lock(&self.calls).push((text.to_string(), target_lang_name.to_string()));

        if let Some(gate) = &self.gate {
            gate.notified().await;
        }

        let scripted = lock(&self.responses).pop_front();
        scripted.unwrap_or_else(|| format!("{} ({})", text, target_lang_name))
    }
}

/// Identity provider whose sign-in results are fixed up front.
///
/// Both sign-in methods fail until a user id is configured for them.
#[derive(Default)]
pub struct MockIdentityProvider {
    token_user: Option<String>,
    anonymous_user: Option<String>,
    token_calls: AtomicUsize,
    anonymous_calls: AtomicUsize,
}

impl MockIdentityProvider {
    /// Create a provider where every sign-in fails.
    pub fn new() -> Self {
        Self::default()
    }

    /// Token sign-in succeeds with `user_id`.
    pub fn with_token_user(mut self, user_id: &str) -> Self {
        self.token_user = Some(user_id.to_string());
        self
    }

    /// Anonymous sign-in succeeds with `user_id`.
    pub fn with_anonymous_user(mut self, user_id: &str) -> Self {
        self.anonymous_user = Some(user_id.to_string());
        self
    }

    /// Number of token sign-in attempts.
    pub fn token_calls(&self) -> usize {
        self.token_calls.load(Ordering::SeqCst)
    }

    /// Number of anonymous sign-in attempts.
    pub fn anonymous_calls(&self) -> usize {
        self.anonymous_calls.load(Ordering::SeqCst)
    }
}

#[async_trait]
impl IdentityProvider for MockIdentityProvider {
    async fn sign_in_with_token(&self, _token: &SecretString) -> Result<String, IdentityError> {
        self.token_calls.fetch_add(1, Ordering::SeqCst);
        self.token_user.clone().ok_or_else(|| IdentityError::TokenRejected {
            message: "mock token rejected".to_string(),
        })
    }

    async fn sign_in_anonymously(&self) -> Result<String, IdentityError> {
        self.anonymous_calls.fetch_add(1, Ordering::SeqCst);
        self.anonymous_user
            .clone()
            .ok_or_else(|| IdentityError::AnonymousUnavailable {
                message: "mock anonymous sign-in disabled".to_string(),
            })
    }
}

/// Mock authentication manager that always sends a fixed key header.
///
/// # Example
///
/// ```
/// use polyglot_chat::auth::{AuthManager, API_KEY_HEADER};
/// use polyglot_chat::mocks::MockAuthManager;
/// use std::collections::HashMap;
///
/// let auth = MockAuthManager::new("test-api-key");
/// let mut url = url::Url::parse("https://example.test/v1beta/models").unwrap();
/// let mut headers = HashMap::new();
/// auth.authorize(&mut url, &mut headers);
///
/// assert_eq!(headers[API_KEY_HEADER], "test-api-key");
/// assert_eq!(auth.authorize_count(), 1);
/// ```
pub struct MockAuthManager {
    api_key: String,
    authorize_calls: AtomicUsize,
}

impl MockAuthManager {
    /// Create a mock auth manager that sends the key as a header.
    pub fn new(api_key: &str) -> Self {
        Self {
            api_key: api_key.to_string(),
            authorize_calls: AtomicUsize::new(0),
        }
    }

    /// Number of requests authorized so far.
    pub fn authorize_count(&self) -> usize {
        self.authorize_calls.load(Ordering::SeqCst)
    }
}

impl AuthManager for MockAuthManager {
    fn authorize(&self, _url: &mut Url, headers: &mut HashMap<String, String>) {
        self.authorize_calls.fetch_add(1, Ordering::SeqCst);
        headers.insert(API_KEY_HEADER.to_string(), self.api_key.clone());
    }
}

/// Message store whose writes can be made to fail.
#[derive(Default)]
pub struct MockMessageStore {
    inner: InMemoryMessageStore,
    fail_writes: AtomicBool,
    append_calls: AtomicUsize,
}

impl MockMessageStore {
    /// Create an empty store that accepts writes.
    pub fn new() -> Self {
        Self::default()
    }

    /// Make subsequent writes fail (or succeed again).
    pub fn set_fail_writes(&self, fail: bool) {
        self.fail_writes.store(fail, Ordering::SeqCst);
    }

    /// Number of append attempts, including rejected ones.
    pub fn append_calls(&self) -> usize {
        self.append_calls.load(Ordering::SeqCst)
    }

    /// The backing store.
    pub fn inner(&self) -> &InMemoryMessageStore {
        &self.inner
    }
}

#[async_trait]
impl MessageStore for MockMessageStore {
    fn subscribe(&self) -> MessageSubscription {
        self.inner.subscribe()
    }

    async fn append(&self, message: NewMessage) -> Result<String, StoreError> {
        self.append_calls.fetch_add(1, Ordering::SeqCst);
        if self.fail_writes.load(Ordering::SeqCst) {
            return Err(StoreError::WriteRejected {
                message: "writes disabled by test".to_string(),
            });
        }
        self.inner.append(message).await
    }
}
