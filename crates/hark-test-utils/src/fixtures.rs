// SPDX-FileCopyrightText: 2026 Hark Contributors
// SPDX-License-Identifier: MIT OR Apache-2.0

//! Update fixtures.

use chrono::Utc;
use hark_core::{CallbackQuery, ChatId, Message, MessageId, Update, UserId};

/// An incoming text message from `from` in `chat`.
pub fn message(chat: i64, from: i64, id: i32, text: &str) -> Update {
    Update::Message(Message {
        id: MessageId(id),
        chat: ChatId(chat),
        from: Some(UserId(from)),
        outgoing: false,
        text: Some(text.to_string()),
        date: Utc::now(),
    })
}

/// A message sent by the client itself.
pub fn outgoing_message(chat: i64, id: i32, text: &str) -> Update {
    Update::Message(Message {
        id: MessageId(id),
        chat: ChatId(chat),
        from: None,
        outgoing: true,
        text: Some(text.to_string()),
        date: Utc::now(),
    })
}

/// A button press by `from` on the keyboard attached to message `message_id` in `chat`.
pub fn callback_query(query_id: &str, chat: i64, from: i64, message_id: i32, data: &str) -> Update {
    Update::CallbackQuery(CallbackQuery {
        id: query_id.to_string(),
        from: UserId(from),
        message: Some(Message {
            id: MessageId(message_id),
            chat: ChatId(chat),
            from: None,
            outgoing: true,
            text: None,
            date: Utc::now(),
        }),
        inline_message_id: None,
        data: Some(data.to_string()),
    })
}

/// A button press on an inline-mode message, which carries no chat.
pub fn inline_callback_query(query_id: &str, from: i64, inline_message_id: &str, data: &str) -> Update {
    Update::CallbackQuery(CallbackQuery {
        id: query_id.to_string(),
        from: UserId(from),
        message: None,
        inline_message_id: Some(inline_message_id.to_string()),
        data: Some(data.to_string()),
    })
}
