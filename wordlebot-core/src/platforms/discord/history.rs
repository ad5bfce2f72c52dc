// File: src/platforms/discord/history.rs
//
// Converts twilight messages into `ChatMessage` records and decides how to
// page through channel history for a window.

use chrono::{DateTime, Utc};
use twilight_model::channel::Message;
use twilight_model::channel::message::Mention;

use wordlebot_common::models::message::{ChatMessage, MentionedUser};
use wordlebot_common::models::window::TimeWindow;

/// Discord's maximum page size for channel history.
pub const PAGE_SIZE: u16 = 100;

pub fn to_chat_message(msg: &Message) -> ChatMessage {
    ChatMessage {
        id: msg.id.get(),
        author_id: msg.author.id.get().to_string(),
        timestamp: DateTime::<Utc>::from_timestamp_micros(msg.timestamp.as_micros()),
        content: msg.content.clone(),
        mentions: msg.mentions.iter().map(to_mentioned_user).collect(),
    }
}

/// Guild nickname when present, account name otherwise.
fn to_mentioned_user(mention: &Mention) -> MentionedUser {
    let display_name = mention
        .member
        .as_ref()
        .and_then(|m| m.nick.clone())
        .unwrap_or_else(|| mention.name.clone());
    MentionedUser::new(mention.id.get().to_string(), display_name)
}

/// Keeps the in-window part of one history page.
///
/// Returns the cursor for the next page, or `None` once history is exhausted
/// or has reached the end of the window. Messages whose timestamp could not
/// be resolved are kept; their position is only known from paging.
pub fn absorb_page(page: Vec<ChatMessage>, window: &TimeWindow, out: &mut Vec<ChatMessage>) -> Option<u64> {
    if page.is_empty() {
        return None;
    }

    let full_page = page.len() >= PAGE_SIZE as usize;
    let next_cursor = page.iter().map(|m| m.id).max();
    let reached_end = page
        .iter()
        .any(|m| m.timestamp.is_some_and(|ts| ts >= window.end));

    out.extend(
        page.into_iter()
            .filter(|m| m.timestamp.is_none_or(|ts| window.contains(ts))),
    );

    if reached_end || !full_page {
        None
    } else {
        next_cursor
    }
}

/// Oldest first; snowflakes are time-ordered.
pub fn sort_chronologically(messages: &mut [ChatMessage]) {
    messages.sort_by_key(|m| m.id);
}
