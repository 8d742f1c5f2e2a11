// SPDX-FileCopyrightText: 2026 Hark Contributors
// SPDX-License-Identifier: MIT OR Apache-2.0

//! Transport trait for the protocol client the listener engine is embedded in.

use async_trait::async_trait;

use crate::error::HarkError;
use crate::types::{ChatId, Message};

/// The subset of protocol RPCs the listener engine needs.
///
/// The transport owns the connection; the engine only asks it to send a
/// prompt (for `ask`) and to answer callback queries pressed by users a
/// listener is not waiting for.
#[async_trait]
pub trait Transport: Send + Sync + 'static {
    /// Sends a text message to a chat and returns the message as delivered.
    async fn send_message(&self, chat_id: ChatId, text: &str) -> Result<Message, HarkError>;

    /// Answers a callback query, optionally as a modal alert.
    async fn answer_callback_query(
        &self,
        query_id: &str,
        text: &str,
        show_alert: bool,
    ) -> Result<(), HarkError>;
}
