// SPDX-FileCopyrightText: 2026 Hark Contributors
// SPDX-License-Identifier: MIT OR Apache-2.0

//! Hook the update pipeline calls before running its regular handlers.

use hark_core::{ListenerTypes, Update};
use tracing::{debug, warn};

use crate::identifier::Identifier;
use crate::listener::ListenerId;
use crate::listeners::Listeners;

/// What the listener engine did with an update.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum DispatchOutcome {
    /// A listener received the update.
    Consumed { listener_id: ListenerId },
    /// A callback query was pressed by someone a listener on that message is
    /// not waiting for; the presser was shown an alert.
    Rejected { listener_id: ListenerId },
    /// No listener wanted the update; regular handlers should see it.
    Unclaimed,
}

impl DispatchOutcome {
    pub fn is_consumed(&self) -> bool {
        matches!(self, DispatchOutcome::Consumed { .. })
    }
}

impl Listeners {
    /// Offer an update to the pending listeners.
    ///
    /// At most one listener is resolved. For an unclaimed callback query, a
    /// listener registered on the same keyboard message for another user may
    /// answer the query with an alert; failures to deliver that alert are
    /// logged and otherwise ignored.
    pub async fn dispatch(&self, update: &Update) -> DispatchOutcome {
        let concrete = Identifier::from_update(update);
        if let Some(listener) = self
            .resolver
            .resolve_with(update.listener_type(), &concrete, update)
        {
            return DispatchOutcome::Consumed {
                listener_id: listener.id(),
            };
        }

        match update {
            Update::CallbackQuery(query) => self.reject_foreign_click(&query.id, &concrete).await,
            Update::Message(_) => DispatchOutcome::Unclaimed,
        }
    }

    async fn reject_foreign_click(&self, query_id: &str, concrete: &Identifier) -> DispatchOutcome {
        let locator = concrete.message_locator();
        if locator.count_populated() == 0 {
            // Nothing identifies the keyboard; every listener would match.
            return DispatchOutcome::Unclaimed;
        }

        let Some(listener) = self
            .resolver
            .find_by_pattern(&locator, ListenerTypes::CallbackQuery)
        else {
            return DispatchOutcome::Unclaimed;
        };
        let Some(text) = self.settings.alert_text(listener.unallowed_click_alert()) else {
            return DispatchOutcome::Unclaimed;
        };

        debug!(listener_id = %listener.id(), query_id, "rejecting click from unexpected user");
        if let Some(transport) = &self.transport {
            if let Err(err) = transport.answer_callback_query(query_id, text, true).await {
                warn!(query_id, error = %err, "failed to answer unexpected click");
            }
        }

        DispatchOutcome::Rejected {
            listener_id: listener.id(),
        }
    }
}
