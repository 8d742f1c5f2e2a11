// SPDX-FileCopyrightText: 2026 Hark Contributors
// SPDX-License-Identifier: MIT OR Apache-2.0

//! The caller's side of a registered listener.

use std::future::IntoFuture;
use std::sync::Arc;

use futures::future::BoxFuture;
use hark_core::{HarkError, StopReason, Update};
use tokio::sync::oneshot;

use crate::lifecycle;
use crate::listener::{Listener, ListenerId, Outcome};
use crate::registry::ListenerRegistry;

/// Suspension handle returned by [`Listeners::listen`](crate::Listeners::listen).
///
/// Await it (or call [`ListenerHandle::wait`]) to get the matched update or a
/// timeout/cancellation error. Dropping a handle whose listener is still
/// pending cancels the listener, so abandoned waits never linger in the
/// registry.
pub struct ListenerHandle {
    listener: Arc<Listener>,
    registry: Arc<ListenerRegistry>,
    rx: Option<oneshot::Receiver<Outcome>>,
}

impl ListenerHandle {
    pub(crate) fn new(
        listener: Arc<Listener>,
        registry: Arc<ListenerRegistry>,
        rx: oneshot::Receiver<Outcome>,
    ) -> Self {
        Self {
            listener,
            registry,
            rx: Some(rx),
        }
    }

    pub fn id(&self) -> ListenerId {
        self.listener.id()
    }

    /// The registered listener, e.g. to stop it from another task.
    pub fn listener(&self) -> &Arc<Listener> {
        &self.listener
    }

    /// Cancel the listener. Returns `false` if it had already settled.
    pub fn cancel(&self) -> bool {
        lifecycle::cancel(&self.registry, &self.listener, StopReason::Caller)
    }

    /// Suspend until the listener is resolved, cancelled or timed out.
    pub async fn wait(mut self) -> Result<Update, HarkError> {
        let rx = self
            .rx
            .take()
            .ok_or_else(|| HarkError::Internal("listener handle already awaited".into()))?;
        rx.await.unwrap_or_else(|_| {
            Err(HarkError::Internal(
                "listener was dropped without being settled".into(),
            ))
        })
    }
}

impl IntoFuture for ListenerHandle {
    type Output = Result<Update, HarkError>;
    type IntoFuture = BoxFuture<'static, Self::Output>;

    fn into_future(self) -> Self::IntoFuture {
        Box::pin(self.wait())
    }
}

impl Drop for ListenerHandle {
    fn drop(&mut self) {
        if self.listener.is_pending() {
            lifecycle::cancel(&self.registry, &self.listener, StopReason::Caller);
        }
    }
}

impl std::fmt::Debug for ListenerHandle {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.debug_struct("ListenerHandle")
            .field("listener", &self.listener)
            .field("awaited", &self.rx.is_none())
            .finish()
    }
}
