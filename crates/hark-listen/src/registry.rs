// SPDX-FileCopyrightText: 2026 Hark Contributors
// SPDX-License-Identifier: MIT OR Apache-2.0

//! Registry of pending listeners, partitioned by listener kind.
//!
//! Each kind owns one insertion-ordered bucket behind its own mutex. The
//! resolver runs its "enumerate candidates, claim the winner, remove it"
//! sequence inside [`ListenerRegistry::with_bucket`], so two dispatches can
//! never pick the same listener. Lock order is bucket first, then a
//! listener's slot; cancellation and timeouts claim the slot before touching
//! the bucket, so they never hold both.

use std::collections::HashMap;
use std::sync::{Arc, Mutex, MutexGuard, PoisonError};

use hark_core::{HarkError, ListenerTypes, StopReason};
use strum::IntoEnumIterator;
use tokio_util::sync::CancellationToken;
use tracing::{debug, info};

use crate::listener::{Listener, ListenerState};

/// Owns every pending [`Listener`] of one client.
pub struct ListenerRegistry {
    buckets: HashMap<ListenerTypes, Mutex<Vec<Arc<Listener>>>>,
    shutdown: CancellationToken,
}

impl ListenerRegistry {
    /// Create an empty registry with one bucket per listener kind.
    pub fn new() -> Self {
        Self {
            buckets: ListenerTypes::iter()
                .map(|kind| (kind, Mutex::new(Vec::new())))
                .collect(),
            shutdown: CancellationToken::new(),
        }
    }

    /// Append a listener to its kind's bucket.
    ///
    /// Duplicate patterns are allowed. Once the registry has been drained the
    /// listener is not stored; it is cancelled with [`StopReason::Shutdown`]
    /// instead, and `false` is returned.
    pub fn register(&self, listener: Arc<Listener>) -> bool {
        {
            let mut bucket = self.lock(listener.listener_type());
            if !self.shutdown.is_cancelled() {
                bucket.push(Arc::clone(&listener));
                debug!(
                    listener_id = %listener.id(),
                    listener_type = %listener.listener_type(),
                    specificity = listener.identifier().count_populated(),
                    "listener registered"
                );
                return true;
            }
        }

        if let Some(delivery) = listener.claim(ListenerState::Cancelled) {
            delivery.deliver(Err(HarkError::ListenerCancelled {
                reason: StopReason::Shutdown,
            }));
        }
        false
    }

    /// Remove a listener by identity. Returns whether it was still present.
    pub fn remove(&self, listener: &Listener) -> bool {
        let mut bucket = self.lock(listener.listener_type());
        let before = bucket.len();
        bucket.retain(|l| l.id() != listener.id());
        before != bucket.len()
    }

    /// Snapshot of the listeners currently registered for a kind, oldest first.
    pub fn all(&self, listener_type: ListenerTypes) -> Vec<Arc<Listener>> {
        self.lock(listener_type).clone()
    }

    pub fn len(&self, listener_type: ListenerTypes) -> usize {
        self.lock(listener_type).len()
    }

    pub fn is_empty(&self) -> bool {
        ListenerTypes::iter().all(|kind| self.lock(kind).is_empty())
    }

    /// Whether [`ListenerRegistry::drain`] has run.
    pub fn is_shut_down(&self) -> bool {
        self.shutdown.is_cancelled()
    }

    /// Run `f` with exclusive access to one kind's bucket.
    ///
    /// `f` must not call back into the registry for the same kind.
    pub(crate) fn with_bucket<R>(
        &self,
        listener_type: ListenerTypes,
        f: impl FnOnce(&mut Vec<Arc<Listener>>) -> R,
    ) -> R {
        f(&mut self.lock(listener_type))
    }

    /// A token cancelled when the registry is drained; parents every deadline timer.
    pub(crate) fn timer_token(&self) -> CancellationToken {
        self.shutdown.child_token()
    }

    /// Cancel every pending listener with [`StopReason::Shutdown`] and refuse new ones.
    ///
    /// Returns how many listeners were cancelled.
    pub fn drain(&self) -> usize {
        self.shutdown.cancel();

        let mut cancelled = 0;
        for kind in ListenerTypes::iter() {
            let drained = std::mem::take(&mut *self.lock(kind));
            for listener in drained {
                if let Some(delivery) = listener.claim(ListenerState::Cancelled) {
                    delivery.deliver(Err(HarkError::ListenerCancelled {
                        reason: StopReason::Shutdown,
                    }));
                    cancelled += 1;
                }
            }
        }

        info!(count = cancelled, "listener registry drained");
        cancelled
    }

    fn lock(&self, listener_type: ListenerTypes) -> MutexGuard<'_, Vec<Arc<Listener>>> {
        // Buckets exist for every kind from construction onwards.
        self.buckets[&listener_type]
            .lock()
            .unwrap_or_else(PoisonError::into_inner)
    }
}

impl Default for ListenerRegistry {
    fn default() -> Self {
        Self::new()
    }
}

impl std::fmt::Debug for ListenerRegistry {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        let mut map = f.debug_map();
        for kind in ListenerTypes::iter() {
            map.entry(&kind, &self.len(kind));
        }
        map.finish()
    }
}
