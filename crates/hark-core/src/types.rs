// SPDX-FileCopyrightText: 2026 Hark Contributors
// SPDX-License-Identifier: MIT OR Apache-2.0

//! Update model shared by the transport layer and the listener engine.
//!
//! These are in-memory payloads: the transport decodes protocol objects into
//! them and the engine only ever reads them.

use chrono::{DateTime, Utc};
use serde::{Deserialize, Serialize};
use strum::{Display, EnumIter, EnumString};

/// Unique identifier for a chat (private chat, group or channel).
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, PartialOrd, Ord, Serialize, Deserialize)]
pub struct ChatId(pub i64);

/// Unique identifier for a user.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, PartialOrd, Ord, Serialize, Deserialize)]
pub struct UserId(pub i64);

/// Identifier of a message, unique within its chat.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, PartialOrd, Ord, Serialize, Deserialize)]
pub struct MessageId(pub i32);

/// The closed set of event kinds a listener can wait for.
///
/// Kinds partition the listener registry; matching never crosses kinds.
#[derive(
    Debug,
    Clone,
    Copy,
    PartialEq,
    Eq,
    Hash,
    Display,
    EnumString,
    EnumIter,
    Serialize,
    Deserialize,
)]
#[strum(serialize_all = "snake_case")]
#[serde(rename_all = "snake_case")]
pub enum ListenerTypes {
    Message,
    CallbackQuery,
}

/// A chat message.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct Message {
    pub id: MessageId,
    pub chat: ChatId,
    /// Sender, absent for anonymous channel posts.
    #[serde(default)]
    pub from: Option<UserId>,
    /// Whether the message was sent by this client.
    #[serde(default)]
    pub outgoing: bool,
    #[serde(default)]
    pub text: Option<String>,
    pub date: DateTime<Utc>,
}

/// A press on an inline keyboard button.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct CallbackQuery {
    pub id: String,
    pub from: UserId,
    /// The message carrying the keyboard, absent for inline-mode messages.
    #[serde(default)]
    pub message: Option<Message>,
    #[serde(default)]
    pub inline_message_id: Option<String>,
    #[serde(default)]
    pub data: Option<String>,
}

/// An incoming update offered to the listener engine.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(tag = "type", rename_all = "snake_case")]
pub enum Update {
    Message(Message),
    CallbackQuery(CallbackQuery),
}

impl Update {
    /// The listener kind this update can resolve.
    pub fn listener_type(&self) -> ListenerTypes {
        match self {
            Update::Message(_) => ListenerTypes::Message,
            Update::CallbackQuery(_) => ListenerTypes::CallbackQuery,
        }
    }

    /// The message carried by this update, if any.
    pub fn message(&self) -> Option<&Message> {
        match self {
            Update::Message(msg) => Some(msg),
            Update::CallbackQuery(query) => query.message.as_ref(),
        }
    }

    /// Text of a message, or data of a callback query.
    pub fn text(&self) -> Option<&str> {
        match self {
            Update::Message(msg) => msg.text.as_deref(),
            Update::CallbackQuery(query) => query.data.as_deref(),
        }
    }

    /// The user who caused this update, if known.
    pub fn sender(&self) -> Option<UserId> {
        match self {
            Update::Message(msg) => msg.from,
            Update::CallbackQuery(query) => Some(query.from),
        }
    }
}

impl From<Message> for Update {
    fn from(msg: Message) -> Self {
        Update::Message(msg)
    }
}

impl From<CallbackQuery> for Update {
    fn from(query: CallbackQuery) -> Self {
        Update::CallbackQuery(query)
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    fn sample_message() -> Message {
        serde_json::from_value(serde_json::json!({
            "id": 42,
            "chat": -100123,
            "from": 7,
            "text": "hello",
            "date": "2026-01-01T00:00:00Z",
        }))
        .expect("failed to deserialize sample message")
    }

    #[test]
    fn message_defaults_optional_fields() {
        let msg = sample_message();
        assert_eq!(msg.id, MessageId(42));
        assert_eq!(msg.chat, ChatId(-100123));
        assert_eq!(msg.from, Some(UserId(7)));
        assert!(!msg.outgoing);
    }

    #[test]
    fn update_maps_to_listener_type() {
        let msg = sample_message();
        let query = CallbackQuery {
            id: "q1".into(),
            from: UserId(9),
            message: Some(msg.clone()),
            inline_message_id: None,
            data: Some("yes".into()),
        };

        let update = Update::from(msg);
        assert_eq!(update.listener_type(), ListenerTypes::Message);
        assert_eq!(update.text(), Some("hello"));
        assert_eq!(update.sender(), Some(UserId(7)));

        let update = Update::from(query);
        assert_eq!(update.listener_type(), ListenerTypes::CallbackQuery);
        assert_eq!(update.text(), Some("yes"));
        assert_eq!(update.sender(), Some(UserId(9)));
        assert_eq!(update.message().map(|m| m.id), Some(MessageId(42)));
    }

    #[test]
    fn update_is_tagged_in_json() {
        let update = Update::from(sample_message());
        let json = serde_json::to_value(&update).expect("should serialize");
        assert_eq!(json["type"], "message");
    }
}
