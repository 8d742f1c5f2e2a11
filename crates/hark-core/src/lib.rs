// SPDX-FileCopyrightText: 2026 Hark Contributors
// SPDX-License-Identifier: MIT OR Apache-2.0

//! Core library for the Hark listener engine.
//!
//! This crate provides the error type, the in-memory update model delivered by
//! the transport layer, the closed set of listener kinds, and the trait the
//! engine uses to talk back to the transport. Everything else in the workspace
//! builds on these definitions.

pub mod error;
pub mod traits;
pub mod types;

// Re-export key items at crate root for ergonomic imports.
pub use error::{HarkError, StopReason};
pub use traits::Transport;
pub use types::{CallbackQuery, ChatId, ListenerTypes, Message, MessageId, Update, UserId};

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn hark_error_has_all_variants() {
        let _timeout = HarkError::ListenerTimeout {
            timeout: std::time::Duration::from_secs(30),
        };
        let _cancelled = HarkError::ListenerCancelled {
            reason: StopReason::Caller,
        };
        let _predicate = HarkError::Predicate {
            message: "boom".into(),
        };
        let _transport = HarkError::Transport {
            message: "send failed".into(),
            source: None,
        };
        let _config = HarkError::Config("bad".into());
        let _internal = HarkError::Internal("oops".into());
    }

    #[test]
    fn listener_types_round_trip_through_strings() {
        use std::str::FromStr;
        use strum::IntoEnumIterator;

        let kinds: Vec<ListenerTypes> = ListenerTypes::iter().collect();
        assert_eq!(kinds.len(), 2, "ListenerTypes must have exactly 2 variants");

        for kind in kinds {
            let s = kind.to_string();
            let parsed = ListenerTypes::from_str(&s).expect("should parse back");
            assert_eq!(kind, parsed);
        }
    }

    #[test]
    fn transport_trait_is_object_safe() {
        fn _assert_transport(_t: &dyn Transport) {}
    }
}
