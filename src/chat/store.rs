use async_trait::async_trait;
use chrono::Utc;
use futures::stream::{self, BoxStream, Stream, StreamExt};
use std::pin::Pin;
use std::sync::{Mutex, PoisonError};
use std::task::{Context, Poll};
use tokio::sync::watch;
use uuid::Uuid;

use super::message::{order_messages, ChatMessage, NewMessage};
use crate::error::StoreError;

/// A live, ordered list of messages.
#[async_trait]
pub trait MessageStore: Send + Sync {
    /// Subscribe to ordered snapshots. The first item is the current list.
    fn subscribe(&self) -> MessageSubscription;

    /// Write a message and return its id. The store assigns the timestamp.
    async fn append(&self, message: NewMessage) -> Result<String, StoreError>;
}

/// Stream of whole message snapshots. Ends when the store closes.
pub struct MessageSubscription {
    inner: BoxStream<'static, Vec<ChatMessage>>,
}

impl MessageSubscription {
    /// Wraps any snapshot stream.
    pub fn new<S>(snapshots: S) -> Self
    where
        S: Stream<Item = Vec<ChatMessage>> + Send + 'static,
    {
        Self {
            inner: snapshots.boxed(),
        }
    }

    /// Yields the receiver's current value, then one value per change.
    ///
    /// Changes that land between two polls are coalesced into the latest
    /// snapshot.
    pub fn from_watch(receiver: watch::Receiver<Vec<ChatMessage>>) -> Self {
        Self::new(stream::unfold(
            (receiver, true),
            |(mut receiver, first)| async move {
                if !first {
                    receiver.changed().await.ok()?;
                }
                let snapshot = receiver.borrow_and_update().clone();
                Some((snapshot, (receiver, false)))
            },
        ))
    }

    /// Waits for the next snapshot; `None` once the store has closed.
    pub async fn next_snapshot(&mut self) -> Option<Vec<ChatMessage>> {
        self.inner.next().await
    }
}

impl Stream for MessageSubscription {
    type Item = Vec<ChatMessage>;

    fn poll_next(mut self: Pin<&mut Self>, cx: &mut Context<'_>) -> Poll<Option<Self::Item>> {
        self.inner.poll_next_unpin(cx)
    }
}

impl std::fmt::Debug for MessageSubscription {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.debug_struct("MessageSubscription").finish_non_exhaustive()
    }
}

/// In-process [`MessageStore`] built on a `tokio::sync::watch` channel.
///
/// By default a message is timestamped as it is appended. With
/// [`with_pending_timestamps`](Self::with_pending_timestamps) appended
/// messages stay pending until
/// [`resolve_pending_timestamps`](Self::resolve_pending_timestamps) runs,
/// the way a hosted store fills in server timestamps later.
#[derive(Debug)]
pub struct InMemoryMessageStore {
    sender: Mutex<Option<watch::Sender<Vec<ChatMessage>>>>,
    receiver: watch::Receiver<Vec<ChatMessage>>,
    pending_timestamps: bool,
}

impl Default for InMemoryMessageStore {
    fn default() -> Self {
        Self::new()
    }
}

impl InMemoryMessageStore {
    /// Creates an empty store.
    pub fn new() -> Self {
        let (sender, receiver) = watch::channel(Vec::new());
        Self {
            sender: Mutex::new(Some(sender)),
            receiver,
            pending_timestamps: false,
        }
    }

    /// Creates an empty store that leaves timestamps pending on append.
    pub fn with_pending_timestamps() -> Self {
        Self {
            pending_timestamps: true,
            ..Self::new()
        }
    }

    /// The current ordered list.
    pub fn snapshot(&self) -> Vec<ChatMessage> {
        self.receiver.borrow().clone()
    }

    /// Number of stored messages.
    pub fn len(&self) -> usize {
        self.receiver.borrow().len()
    }

    /// Whether the store holds no messages.
    pub fn is_empty(&self) -> bool {
        self.len() == 0
    }

    /// Stamps every pending message with the current time and returns how
    /// many were updated.
    pub fn resolve_pending_timestamps(&self) -> usize {
        let guard = self.sender.lock().unwrap_or_else(PoisonError::into_inner);
        let Some(sender) = guard.as_ref() else {
            return 0;
        };

        let mut resolved = 0;
        sender.send_if_modified(|messages| {
            let now = Utc::now();
            for message in messages.iter_mut().filter(|m| m.timestamp.is_none()) {
                message.timestamp = Some(now);
                resolved += 1;
            }
            if resolved > 0 {
                order_messages(messages);
            }
            resolved > 0
        });
        resolved
    }

    /// Closes the store. Subscriptions end and further writes fail.
    pub fn close(&self) {
        let sender = self.sender.lock().unwrap_or_else(PoisonError::into_inner).take();
        if sender.is_some() {
            tracing::debug!("Message store closed");
        }
    }

    /// Whether [`close`](Self::close) has been called.
    pub fn is_closed(&self) -> bool {
        self.sender
            .lock()
            .unwrap_or_else(PoisonError::into_inner)
            .is_none()
    }
}

#[async_trait]
impl MessageStore for InMemoryMessageStore {
    fn subscribe(&self) -> MessageSubscription {
        MessageSubscription::from_watch(self.receiver.clone())
    }

    async fn append(&self, message: NewMessage) -> Result<String, StoreError> {
        let guard = self.sender.lock().unwrap_or_else(PoisonError::into_inner);
        let sender = guard.as_ref().ok_or(StoreError::Closed)?;

        let id = Uuid::new_v4().to_string();
        let record = ChatMessage {
            id: id.clone(),
            text: message.text,
            user_id: message.user_id,
            display_name: message.display_name,
            timestamp: if self.pending_timestamps {
                None
            } else {
                Some(Utc::now())
            },
        };

        sender.send_modify(|messages| {
            messages.push(record);
            order_messages(messages);
        });

        tracing::debug!(message_id = %id, "Message appended");
        Ok(id)
    }
}
