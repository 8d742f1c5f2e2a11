// SPDX-FileCopyrightText: 2026 Hark Contributors
// SPDX-License-Identifier: MIT OR Apache-2.0

//! Cancellation and deadline paths out of `Pending`.
//!
//! Both race the resolver through [`Listener::claim`]: the first path to
//! claim the slot delivers the outcome, the others become no-ops.

use std::sync::Arc;
use std::time::Duration;

use hark_core::{HarkError, StopReason};
use tracing::debug;

use crate::listener::{Listener, ListenerState};
use crate::registry::ListenerRegistry;

/// Cancel a pending listener. Returns `false` if it had already settled.
pub fn cancel(registry: &ListenerRegistry, listener: &Listener, reason: StopReason) -> bool {
    let Some(delivery) = listener.claim(ListenerState::Cancelled) else {
        return false;
    };
    registry.remove(listener);
    debug!(listener_id = %listener.id(), %reason, "listener cancelled");
    delivery.deliver(Err(HarkError::ListenerCancelled { reason }));
    true
}

/// Time out a pending listener. Returns `false` if it had already settled.
pub fn expire(registry: &ListenerRegistry, listener: &Listener, timeout: Duration) -> bool {
    let Some(delivery) = listener.claim(ListenerState::TimedOut) else {
        return false;
    };
    registry.remove(listener);
    debug!(listener_id = %listener.id(), ?timeout, "listener timed out");
    delivery.deliver(Err(HarkError::ListenerTimeout { timeout }));
    true
}

/// Spawn the deadline timer for a listener.
///
/// The task exits early when the listener settles another way or the
/// registry is drained. Requires a tokio runtime.
pub(crate) fn arm_timer(
    registry: Arc<ListenerRegistry>,
    listener: Arc<Listener>,
    timeout: Duration,
) {
    let token = listener.timer_token();
    tokio::spawn(async move {
        tokio::select! {
            _ = tokio::time::sleep(timeout) => {
                expire(&registry, &listener, timeout);
            }
            _ = token.cancelled() => {}
        }
    });
}
