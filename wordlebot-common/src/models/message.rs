use chrono::{DateTime, Utc};
use serde::{Deserialize, Serialize};

/// A user explicitly mentioned in a message.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct MentionedUser {
    pub id: String,
    pub display_name: String,
}

impl MentionedUser {
    pub fn new(id: impl Into<String>, display_name: impl Into<String>) -> Self {
        Self {
            id: id.into(),
            display_name: display_name.into(),
        }
    }
}

/// One message of channel history, already stripped of platform specifics.
///
/// `timestamp` is `None` when the platform timestamp could not be turned into
/// a UTC instant.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct ChatMessage {
    pub id: u64,
    pub author_id: String,
    pub timestamp: Option<DateTime<Utc>>,
    pub content: String,
    pub mentions: Vec<MentionedUser>,
}
