// SPDX-FileCopyrightText: 2026 Hark Contributors
// SPDX-License-Identifier: MIT OR Apache-2.0

//! Mock transport for deterministic testing.
//!
//! `MockTransport` implements [`Transport`] without a network: prompts and
//! callback answers are captured for assertion, and failures can be injected.

use std::sync::Arc;
use std::sync::atomic::{AtomicBool, AtomicI32, Ordering};

use async_trait::async_trait;
use chrono::Utc;
use tokio::sync::Mutex;

use hark_core::{ChatId, HarkError, Message, MessageId, Transport};

/// A prompt passed to `send_message`.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct SentMessage {
    pub chat_id: ChatId,
    pub message_id: MessageId,
    pub text: String,
}

/// A callback query answered through `answer_callback_query`.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct AnsweredQuery {
    pub query_id: String,
    pub text: String,
    pub show_alert: bool,
}

/// A mock transport for testing.
pub struct MockTransport {
    sent: Arc<Mutex<Vec<SentMessage>>>,
    answered: Arc<Mutex<Vec<AnsweredQuery>>>,
    next_message_id: AtomicI32,
    fail: AtomicBool,
}

impl MockTransport {
    /// Create a transport whose first sent message gets id 1000.
    pub fn new() -> Self {
        Self {
            sent: Arc::new(Mutex::new(Vec::new())),
            answered: Arc::new(Mutex::new(Vec::new())),
            next_message_id: AtomicI32::new(1000),
            fail: AtomicBool::new(false),
        }
    }

    /// Make every subsequent call fail with a transport error.
    pub fn fail_requests(&self, fail: bool) {
        self.fail.store(fail, Ordering::SeqCst);
    }

    pub async fn sent_messages(&self) -> Vec<SentMessage> {
        self.sent.lock().await.clone()
    }

    pub async fn answered_queries(&self) -> Vec<AnsweredQuery> {
        self.answered.lock().await.clone()
    }

    fn check_failure(&self) -> Result<(), HarkError> {
        if self.fail.load(Ordering::SeqCst) {
            return Err(HarkError::Transport {
                message: "mock transport configured to fail".into(),
                source: None,
            });
        }
        Ok(())
    }
}

impl Default for MockTransport {
    fn default() -> Self {
        Self::new()
    }
}

#[async_trait]
impl Transport for MockTransport {
    async fn send_message(&self, chat_id: ChatId, text: &str) -> Result<Message, HarkError> {
        self.check_failure()?;
        let message_id = MessageId(self.next_message_id.fetch_add(1, Ordering::SeqCst));
        self.sent.lock().await.push(SentMessage {
            chat_id,
            message_id,
            text: text.to_string(),
        });
        Ok(Message {
            id: message_id,
            chat: chat_id,
            from: None,
            outgoing: true,
            text: Some(text.to_string()),
            date: Utc::now(),
        })
    }

    async fn answer_callback_query(
        &self,
        query_id: &str,
        text: &str,
        show_alert: bool,
    ) -> Result<(), HarkError> {
        self.check_failure()?;
        self.answered.lock().await.push(AnsweredQuery {
            query_id: query_id.to_string(),
            text: text.to_string(),
            show_alert,
        });
        Ok(())
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[tokio::test]
    async fn send_records_and_numbers_messages() {
        let transport = MockTransport::new();
        let first = transport.send_message(ChatId(1), "hi").await.unwrap();
        let second = transport.send_message(ChatId(1), "again").await.unwrap();
        assert_eq!(first.id, MessageId(1000));
        assert_eq!(second.id, MessageId(1001));
        assert!(first.outgoing);
        assert_eq!(transport.sent_messages().await.len(), 2);
    }

    #[tokio::test]
    async fn injected_failure_is_returned() {
        let transport = MockTransport::new();
        transport.fail_requests(true);
        let err = transport.send_message(ChatId(1), "hi").await.unwrap_err();
        assert!(matches!(err, HarkError::Transport { .. }));
        assert!(transport.sent_messages().await.is_empty());
    }

    #[tokio::test]
    async fn answers_are_recorded() {
        let transport = MockTransport::new();
        transport.answer_callback_query("q1", "nope", true).await.unwrap();
        let answered = transport.answered_queries().await;
        assert_eq!(answered.len(), 1);
        assert!(answered[0].show_alert);
    }
}
