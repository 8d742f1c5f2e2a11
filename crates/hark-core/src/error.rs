// SPDX-FileCopyrightText: 2026 Hark Contributors
// SPDX-License-Identifier: MIT OR Apache-2.0

//! Error types for the Hark listener engine.

use std::time::Duration;

use strum::Display;
use thiserror::Error;

/// Why a pending listener was cancelled instead of resolved.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Display)]
#[strum(serialize_all = "snake_case")]
pub enum StopReason {
    /// The waiting caller (or code acting for it) stopped the listener.
    Caller,
    /// The client is shutting down and drained every pending listener.
    Shutdown,
}

/// The primary error type used across the Hark workspace.
#[derive(Debug, Error)]
pub enum HarkError {
    /// The listener's deadline elapsed before any matching update arrived.
    #[error("listener timed out after {timeout:?}")]
    ListenerTimeout { timeout: Duration },

    /// The listener was cancelled before any matching update arrived.
    #[error("listener cancelled ({reason})")]
    ListenerCancelled { reason: StopReason },

    /// A pattern's custom predicate failed while being evaluated.
    ///
    /// Contained by the resolver: the listener is treated as non-matching.
    #[error("predicate evaluation failed: {message}")]
    Predicate { message: String },

    /// The transport collaborator failed (sending a prompt, answering a query).
    #[error("transport error: {message}")]
    Transport {
        message: String,
        source: Option<Box<dyn std::error::Error + Send + Sync>>,
    },

    /// Configuration errors (invalid values, unreadable files).
    #[error("configuration error: {0}")]
    Config(String),

    /// Internal or unexpected errors.
    #[error("internal error: {0}")]
    Internal(String),
}

impl HarkError {
    /// Returns `true` for the two terminal failures a waiter can observe.
    pub fn is_listener_failure(&self) -> bool {
        matches!(
            self,
            HarkError::ListenerTimeout { .. } | HarkError::ListenerCancelled { .. }
        )
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn display_includes_stop_reason() {
        let err = HarkError::ListenerCancelled {
            reason: StopReason::Shutdown,
        };
        assert_eq!(err.to_string(), "listener cancelled (shutdown)");
    }

    #[test]
    fn timeout_display_includes_duration() {
        let err = HarkError::ListenerTimeout {
            timeout: Duration::from_millis(250),
        };
        assert!(err.to_string().contains("250ms"));
        assert!(err.is_listener_failure());
    }

    #[test]
    fn transport_errors_are_not_listener_failures() {
        let err = HarkError::Transport {
            message: "connection reset".into(),
            source: Some(Box::new(std::io::Error::other("reset"))),
        };
        assert!(!err.is_listener_failure());
        assert_eq!(err.to_string(), "transport error: connection reset");
    }
}
