//! Chat messages and the live message store.
//!
//! The store is a capability: [`MessageStore::subscribe`] yields whole,
//! ordered snapshots and [`MessageStore::append`] writes a new record.
//! [`InMemoryMessageStore`] implements it in-process.

mod message;
mod store;

pub use message::{order_messages, ChatMessage, NewMessage, PENDING_TIMESTAMP_LABEL, SYSTEM_USER};
pub use store::{InMemoryMessageStore, MessageStore, MessageSubscription};

/// Document collection holding the public messages of `app_id`.
pub fn collection_path(app_id: &str) -> String {
    format!("/artifacts/{}/public/data/messages", app_id)
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_collection_path() {
        assert_eq!(
            collection_path("my-app"),
            "/artifacts/my-app/public/data/messages"
        );
    }
}
