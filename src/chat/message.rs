use chrono::{DateTime, Utc};
use serde::{Deserialize, Serialize};
use std::cmp::Ordering;
use uuid::Uuid;

/// Label shown instead of a time while the server timestamp is pending.
pub const PENDING_TIMESTAMP_LABEL: &str = "Sending...";

/// Author id and display name of locally generated notices.
pub const SYSTEM_USER: &str = "System";

/// A stored chat message.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct ChatMessage {
    /// Opaque document id.
    pub id: String,
    /// Message body.
    pub text: String,
    /// Id of the author.
    pub user_id: String,
    /// Author name shown in the UI.
    pub display_name: String,
    /// Server-assigned time, `None` until the server has assigned it.
    pub timestamp: Option<DateTime<Utc>>,
}

impl ChatMessage {
    /// A notice from [`SYSTEM_USER`], stamped with the current time.
    pub fn system_notice(text: impl Into<String>) -> Self {
        Self {
            id: format!("notice-{}", Uuid::new_v4().simple()),
            text: text.into(),
            user_id: SYSTEM_USER.to_string(),
            display_name: SYSTEM_USER.to_string(),
            timestamp: Some(Utc::now()),
        }
    }

    /// `HH:MM` in UTC, or [`PENDING_TIMESTAMP_LABEL`].
    pub fn display_time(&self) -> String {
        match self.timestamp {
            Some(ts) => ts.format("%H:%M").to_string(),
            None => PENDING_TIMESTAMP_LABEL.to_string(),
        }
    }

    /// Whether the server timestamp is still pending.
    pub fn is_pending(&self) -> bool {
        self.timestamp.is_none()
    }
}

/// A message about to be written. The store assigns id and timestamp.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct NewMessage {
    /// Message body.
    pub text: String,
    /// Id of the author.
    pub user_id: String,
    /// Author name shown in the UI.
    pub display_name: String,
}

impl NewMessage {
    /// Creates a message to append.
    pub fn new(
        text: impl Into<String>,
        user_id: impl Into<String>,
        display_name: impl Into<String>,
    ) -> Self {
        Self {
            text: text.into(),
            user_id: user_id.into(),
            display_name: display_name.into(),
        }
    }
}

fn compare_timestamps(a: &Option<DateTime<Utc>>, b: &Option<DateTime<Utc>>) -> Ordering {
    match (a, b) {
        (Some(a), Some(b)) => a.cmp(b),
        (Some(_), None) => Ordering::Less,
        (None, Some(_)) => Ordering::Greater,
        (None, None) => Ordering::Equal,
    }
}

/// Sorts by timestamp, oldest first. Pending messages go last; ties keep
/// their current order.
pub fn order_messages(messages: &mut [ChatMessage]) {
    messages.sort_by(|a, b| compare_timestamps(&a.timestamp, &b.timestamp));
}
