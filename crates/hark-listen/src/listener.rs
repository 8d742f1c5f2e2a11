// SPDX-FileCopyrightText: 2026 Hark Contributors
// SPDX-License-Identifier: MIT OR Apache-2.0

//! A registered waiter and its single-assignment resolution slot.

use std::fmt;
use std::sync::{Mutex, MutexGuard, PoisonError};
use std::time::Duration;

use chrono::{DateTime, Utc};
use hark_core::{HarkError, ListenerTypes, Update};
use tokio::sync::oneshot;
use tokio_util::sync::CancellationToken;
use uuid::Uuid;

use crate::identifier::Identifier;

/// What a waiter eventually receives.
pub type Outcome = Result<Update, HarkError>;

/// Unique identifier for a registered listener.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub struct ListenerId(pub Uuid);

impl ListenerId {
    pub fn new() -> Self {
        Self(Uuid::new_v4())
    }
}

impl Default for ListenerId {
    fn default() -> Self {
        Self::new()
    }
}

impl fmt::Display for ListenerId {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        self.0.fmt(f)
    }
}

/// Lifecycle state of a listener. Every state but `Pending` is terminal.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum ListenerState {
    Pending,
    Resolved,
    Cancelled,
    TimedOut,
}

/// How to answer a callback query pressed by a user the listener does not wait for.
#[derive(Debug, Clone, PartialEq, Eq, Default)]
pub enum UnallowedClickAlert {
    /// Stay silent.
    Off,
    /// Use the configured alert text, if alerts are enabled.
    #[default]
    Default,
    /// Always answer with this text.
    Custom(String),
}

/// Where the outcome goes once a listener settles.
pub(crate) enum Delivery {
    Future(oneshot::Sender<Outcome>),
    Callback(Box<dyn FnOnce(Outcome) + Send>),
}

impl Delivery {
    /// Hand the outcome over. Must be called with no registry lock held.
    pub(crate) fn deliver(self, outcome: Outcome) {
        match self {
            // The waiter may have gone away; nobody is left to tell.
            Delivery::Future(tx) => {
                let _ = tx.send(outcome);
            }
            Delivery::Callback(callback) => callback(outcome),
        }
    }
}

struct Slot {
    state: ListenerState,
    delivery: Option<Delivery>,
}

/// A registered request to be notified once when a future update matches.
pub struct Listener {
    id: ListenerId,
    identifier: Identifier,
    listener_type: ListenerTypes,
    registered_at: DateTime<Utc>,
    timeout: Option<Duration>,
    unallowed_click_alert: UnallowedClickAlert,
    slot: Mutex<Slot>,
    /// Cancelled when the listener settles or the registry shuts down; stops the deadline timer.
    timer: CancellationToken,
}

impl Listener {
    pub(crate) fn new(
        identifier: Identifier,
        listener_type: ListenerTypes,
        timeout: Option<Duration>,
        unallowed_click_alert: UnallowedClickAlert,
        delivery: Delivery,
        timer: CancellationToken,
    ) -> Self {
        Self {
            id: ListenerId::new(),
            identifier,
            listener_type,
            registered_at: Utc::now(),
            timeout,
            unallowed_click_alert,
            slot: Mutex::new(Slot {
                state: ListenerState::Pending,
                delivery: Some(delivery),
            }),
            timer,
        }
    }

    pub fn id(&self) -> ListenerId {
        self.id
    }

    pub fn identifier(&self) -> &Identifier {
        &self.identifier
    }

    pub fn listener_type(&self) -> ListenerTypes {
        self.listener_type
    }

    pub fn registered_at(&self) -> DateTime<Utc> {
        self.registered_at
    }

    pub fn timeout(&self) -> Option<Duration> {
        self.timeout
    }

    /// Wall-clock time at which the listener times out, if it has a timeout.
    ///
    /// `None` also when the deadline lies beyond what a timestamp can hold.
    pub fn deadline(&self) -> Option<DateTime<Utc>> {
        self.timeout
            .and_then(|t| chrono::Duration::from_std(t).ok())
            .and_then(|t| self.registered_at.checked_add_signed(t))
    }

    pub fn unallowed_click_alert(&self) -> &UnallowedClickAlert {
        &self.unallowed_click_alert
    }

    pub fn state(&self) -> ListenerState {
        self.lock_slot().state
    }

    pub fn is_pending(&self) -> bool {
        self.state() == ListenerState::Pending
    }

    pub(crate) fn timer_token(&self) -> CancellationToken {
        self.timer.clone()
    }

    /// Move a pending listener to `next` and take its delivery.
    ///
    /// Returns `None` if another path already settled it. This is the only
    /// transition out of `Pending`, so whoever gets `Some` owns the outcome.
    pub(crate) fn claim(&self, next: ListenerState) -> Option<Delivery> {
        let mut slot = self.lock_slot();
        if slot.state != ListenerState::Pending {
            return None;
        }
        slot.state = next;
        self.timer.cancel();
        slot.delivery.take()
    }

    fn lock_slot(&self) -> MutexGuard<'_, Slot> {
        // A panicking callback never runs under this lock, so the slot is consistent.
        self.slot.lock().unwrap_or_else(PoisonError::into_inner)
    }
}

impl fmt::Debug for Listener {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.debug_struct("Listener")
            .field("id", &self.id)
            .field("listener_type", &self.listener_type)
            .field("identifier", &self.identifier)
            .field("registered_at", &self.registered_at)
            .field("timeout", &self.timeout)
            .field("state", &self.state())
            .finish()
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    fn pending_listener() -> (Listener, oneshot::Receiver<Outcome>) {
        let (tx, rx) = oneshot::channel();
        let listener = Listener::new(
            Identifier::new(),
            ListenerTypes::Message,
            Some(Duration::from_secs(5)),
            UnallowedClickAlert::Default,
            Delivery::Future(tx),
            CancellationToken::new(),
        );
        (listener, rx)
    }

    #[test]
    fn claim_succeeds_once() {
        let (listener, _rx) = pending_listener();
        assert!(listener.claim(ListenerState::Cancelled).is_some());
        assert!(listener.claim(ListenerState::Resolved).is_none());
        assert!(listener.claim(ListenerState::TimedOut).is_none());
        assert_eq!(listener.state(), ListenerState::Cancelled);
    }

    #[test]
    fn claim_stops_the_timer() {
        let (listener, _rx) = pending_listener();
        let token = listener.timer_token();
        assert!(!token.is_cancelled());
        let _ = listener.claim(ListenerState::Resolved);
        assert!(token.is_cancelled());
    }

    #[test]
    fn deadline_follows_registration() {
        let (listener, _rx) = pending_listener();
        let deadline = listener.deadline().unwrap();
        assert_eq!(deadline - listener.registered_at(), chrono::Duration::seconds(5));
    }

    #[test]
    fn unrepresentable_deadline_is_none() {
        // Roughly a hundred million years: a valid delta, but past the last timestamp.
        let timeout = Duration::from_secs(100_000_000 * 365 * 24 * 60 * 60);
        let (tx, _rx) = oneshot::channel();
        let listener = Listener::new(
            Identifier::new(),
            ListenerTypes::Message,
            Some(timeout),
            UnallowedClickAlert::Default,
            Delivery::Future(tx),
            CancellationToken::new(),
        );
        assert!(chrono::Duration::from_std(timeout).is_ok());
        assert_eq!(listener.deadline(), None);
    }

    #[tokio::test]
    async fn delivery_reaches_the_waiter() {
        let (listener, rx) = pending_listener();
        let delivery = listener.claim(ListenerState::Cancelled).unwrap();
        delivery.deliver(Err(HarkError::ListenerCancelled {
            reason: hark_core::StopReason::Caller,
        }));
        let outcome = rx.await.unwrap();
        assert!(matches!(outcome, Err(HarkError::ListenerCancelled { .. })));
    }

    #[test]
    fn delivery_to_a_dropped_waiter_is_silent() {
        let (listener, rx) = pending_listener();
        drop(rx);
        let delivery = listener.claim(ListenerState::TimedOut).unwrap();
        delivery.deliver(Err(HarkError::ListenerTimeout {
            timeout: Duration::from_secs(5),
        }));
    }
}
